/// Canonical field keys and the extension field-name grammar
use regex::Regex;
use std::sync::LazyLock;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

/// The eight well-known keys that map onto canonical `LogEntry` attributes.
///
/// Keys are matched exactly (case-sensitive) and render as the wire key.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, AsRefStr, IntoStaticStr,
)]
pub enum CanonicalField {
    #[strum(serialize = "tsrc")]
    SourceTime,
    #[strum(serialize = "pid")]
    ProcessId,
    #[strum(serialize = "src")]
    LogSource,
    #[strum(serialize = "lvl")]
    Level,
    #[strum(serialize = "msg")]
    Message,
    #[strum(serialize = "trcv")]
    ReceiveTime,
    #[strum(serialize = "ip")]
    SourceIp,
    #[strum(serialize = "app")]
    AppName,
}

impl CanonicalField {
    /// Wire key for this field.
    pub fn key(self) -> &'static str {
        self.into()
    }
}

#[allow(clippy::expect_used)] // literal pattern
static FIELD_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_]+$").expect("valid field name pattern"));

/// Whether `name` is acceptable as an extension field name:
/// an ASCII letter followed by one or more ASCII word characters.
pub fn is_valid_field_name(name: &str) -> bool {
    FIELD_NAME.is_match(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_canonical_field_from_str() {
        assert_eq!(
            CanonicalField::from_str("tsrc").unwrap(),
            CanonicalField::SourceTime
        );
        assert_eq!(
            CanonicalField::from_str("lvl").unwrap(),
            CanonicalField::Level
        );
        assert_eq!(
            CanonicalField::from_str("app").unwrap(),
            CanonicalField::AppName
        );
        assert!(CanonicalField::from_str("LVL").is_err());
        assert!(CanonicalField::from_str("level").is_err());
    }

    #[test]
    fn test_canonical_field_key_matches_display() {
        for field in CanonicalField::iter() {
            assert_eq!(field.key(), field.to_string());
            assert_eq!(field.key(), field.as_ref());
            assert_eq!(CanonicalField::from_str(field.key()).unwrap(), field);
        }
    }

    #[test]
    fn test_canonical_field_wire_keys() {
        let keys: Vec<&str> = CanonicalField::iter().map(CanonicalField::key).collect();
        assert_eq!(keys, vec!["tsrc", "pid", "src", "lvl", "msg", "trcv", "ip", "app"]);
    }

    #[test]
    fn test_canonical_field_count() {
        assert_eq!(CanonicalField::iter().count(), 8);
    }

    #[test]
    fn test_valid_field_names() {
        assert!(is_valid_field_name("ok_1"));
        assert!(is_valid_field_name("ab"));
        assert!(is_valid_field_name("Host_Name_2"));
    }

    #[test]
    fn test_invalid_field_names() {
        assert!(!is_valid_field_name("1bad"));
        assert!(!is_valid_field_name("a"));
        assert!(!is_valid_field_name("_ab"));
        assert!(!is_valid_field_name("has-dash"));
        assert!(!is_valid_field_name("has space"));
        assert!(!is_valid_field_name("caf\u{e9}"));
        assert!(!is_valid_field_name(""));
    }
}
