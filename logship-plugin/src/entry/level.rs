/// Severity levels carried by every log entry
use serde::Serialize;
use std::str::FromStr;
use strum_macros::{Display, EnumString, FromRepr, IntoStaticStr, VariantNames};

/// Closed severity scale, in ascending order of severity.
///
/// Names parse case-insensitively and always render in uppercase.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Display,
    EnumString,
    FromRepr,
    IntoStaticStr,
    VariantNames,
    Serialize,
)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
#[serde(rename_all = "UPPERCASE")]
#[repr(u8)]
pub enum Level {
    #[default]
    Debug = 0,
    Info = 1,
    Log = 2,
    Warn = 3,
    Error = 4,
    Severe = 5,
    Panic = 6,
}

impl Level {
    /// Look a level up by its raw ordinal.
    pub fn from_ordinal(ordinal: i64) -> Option<Self> {
        u8::try_from(ordinal).ok().and_then(Level::from_repr)
    }

    /// Parse a level the way the `lvl` field is parsed.
    ///
    /// The trimmed value is first matched against the level names, then read
    /// as a base-10 ordinal. Anything else yields `None`.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if let Ok(level) = Level::from_str(value) {
            return Some(level);
        }

        value.parse::<i64>().ok().and_then(Level::from_ordinal)
    }

    /// Uppercase name of the level.
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Name for a raw ordinal. Anything past SEVERE, or below DEBUG, is PANIC.
    pub fn name_for_ordinal(ordinal: i64) -> &'static str {
        match Level::from_ordinal(ordinal) {
            Some(level) if level < Level::Panic => level.name(),
            _ => Level::Panic.name(),
        }
    }

    pub fn ordinal(self) -> u8 {
        self as u8
    }
}

impl TryFrom<i64> for Level {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, String> {
        Level::from_ordinal(value).ok_or_else(|| format!("Invalid level ordinal: {value}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::VariantNames;

    #[test]
    fn test_level_display() {
        assert_eq!(Level::Debug.to_string(), "DEBUG");
        assert_eq!(Level::Info.to_string(), "INFO");
        assert_eq!(Level::Log.to_string(), "LOG");
        assert_eq!(Level::Warn.to_string(), "WARN");
        assert_eq!(Level::Error.to_string(), "ERROR");
        assert_eq!(Level::Severe.to_string(), "SEVERE");
        assert_eq!(Level::Panic.to_string(), "PANIC");
    }

    #[test]
    fn test_level_variant_names() {
        assert_eq!(
            Level::VARIANTS,
            &["DEBUG", "INFO", "LOG", "WARN", "ERROR", "SEVERE", "PANIC"]
        );
    }

    #[test]
    fn test_level_from_str_is_case_insensitive() {
        assert_eq!(Level::from_str("warn").unwrap(), Level::Warn);
        assert_eq!(Level::from_str("WARN").unwrap(), Level::Warn);
        assert_eq!(Level::from_str("Severe").unwrap(), Level::Severe);
        assert!(Level::from_str("warning").is_err());
    }

    #[test]
    fn test_level_try_from() {
        assert_eq!(Level::try_from(0).unwrap(), Level::Debug);
        assert_eq!(Level::try_from(3).unwrap(), Level::Warn);
        assert_eq!(Level::try_from(6).unwrap(), Level::Panic);
        assert!(Level::try_from(7).is_err());
        assert!(Level::try_from(-1).is_err());
        assert!(Level::try_from(256).is_err());
    }

    #[test]
    fn test_level_parse() {
        assert_eq!(Level::parse("warn"), Some(Level::Warn));
        assert_eq!(Level::parse("  ERROR \n"), Some(Level::Error));
        assert_eq!(Level::parse("3"), Some(Level::Warn));
        assert_eq!(Level::parse(" 6 "), Some(Level::Panic));
        assert_eq!(Level::parse("99"), None);
        assert_eq!(Level::parse("-1"), None);
        assert_eq!(Level::parse("notalevel"), None);
        assert_eq!(Level::parse(""), None);
    }

    #[test]
    fn test_level_name_for_ordinal() {
        assert_eq!(Level::name_for_ordinal(0), "DEBUG");
        assert_eq!(Level::name_for_ordinal(5), "SEVERE");
        assert_eq!(Level::name_for_ordinal(6), "PANIC");
        assert_eq!(Level::name_for_ordinal(42), "PANIC");
        assert_eq!(Level::name_for_ordinal(-3), "PANIC");
    }

    #[test]
    fn test_level_ordering() {
        assert!(Level::Debug < Level::Info);
        assert!(Level::Severe < Level::Panic);
        assert_eq!(Level::Warn.ordinal(), 3);
    }

    #[test]
    fn test_level_default() {
        assert_eq!(Level::default(), Level::Debug);
    }
}
