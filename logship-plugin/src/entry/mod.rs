//! Canonical in-memory representation of a single log event.
//!
//! A [`LogEntry`] carries eight canonical attributes, each addressable both
//! through a typed accessor and through its well-known key, plus an open map of
//! extension fields for producer-defined metadata.
//!
//! Entries are built by the ingesting side through [`LogEntry::set_field`],
//! which never fails: malformed field names are dropped with a warning and
//! unparseable levels are ignored.
//!
//! # Example
//!
//! ```
//! use logship_plugin::entry::{Level, LogEntry};
//!
//! let mut entry = LogEntry::new();
//! entry.set_field("lvl", "warn");
//! entry.set_field("msg", "disk almost full");
//! entry.set_field("mount", "/var");
//!
//! assert_eq!(entry.level(), Level::Warn);
//! assert_eq!(entry.level_name(), "WARN");
//! assert_eq!(entry.message(), "disk almost full");
//! assert_eq!(entry.get_field("mount"), "/var");
//! ```

mod field;
mod level;

pub use field::{is_valid_field_name, CanonicalField};
pub use level::Level;

use serde::Serialize;
use std::collections::HashMap;
use std::str::FromStr;

/// One log event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    #[serde(rename = "ip")]
    ip: String,
    #[serde(rename = "tsrc")]
    src_time: String,
    #[serde(rename = "trcv")]
    rcv_time: String,
    #[serde(rename = "pid")]
    pid: String,
    #[serde(rename = "src")]
    source: String,
    #[serde(rename = "msg")]
    message: String,
    #[serde(rename = "app")]
    app_name: String,
    #[serde(rename = "lvl")]
    level: Level,

    #[serde(flatten)]
    fields: HashMap<String, String>,
}

impl LogEntry {
    /// Create an empty entry: blank canonical attributes, DEBUG level, no extension fields.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field by name.
    ///
    /// The name is trimmed; an empty name is ignored. Canonical keys route into
    /// their attribute (the value stored verbatim, except `lvl` which is parsed
    /// by name then ordinal and otherwise left unchanged). Any other name must
    /// satisfy the extension grammar or the field is dropped.
    pub fn set_field(&mut self, name: &str, value: &str) {
        let name = name.trim();
        if name.is_empty() {
            return;
        }

        match CanonicalField::from_str(name) {
            Ok(field) => match self.canonical_mut(field) {
                Some(slot) => *slot = value.to_string(),
                None => {
                    if let Some(level) = Level::parse(value) {
                        self.level = level;
                    }
                }
            },
            Err(_) => {
                if !is_valid_field_name(name) {
                    log::warn!("Field name doesn't match convention: '{name}'");
                    return;
                }
                self.fields.insert(name.to_string(), value.to_string());
            }
        }
    }

    /// Build an entry from whitespace-separated `key=value` tokens.
    ///
    /// Every token is applied through [`LogEntry::set_field`]. Tokens without
    /// a key become the message when no `msg` token is present.
    pub fn from_kv_line(line: &str) -> Self {
        let mut entry = LogEntry::new();
        let mut words = Vec::new();

        for token in line.split_whitespace() {
            match token.split_once('=') {
                Some((name, value)) if !name.is_empty() => entry.set_field(name, value),
                _ => words.push(token),
            }
        }

        if entry.message.is_empty() && !words.is_empty() {
            entry.message = words.join(" ");
        }
        entry
    }

    /// Extension field value, or `""` when absent.
    ///
    /// Canonical attributes are not visible here; use the typed accessors or
    /// [`LogEntry::canonical`].
    pub fn get_field(&self, name: &str) -> &str {
        self.fields.get(name).map(String::as_str).unwrap_or("")
    }

    /// Names of the extension fields currently present, in no particular order.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.keys().map(String::as_str).collect()
    }

    /// Iterate over extension fields.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// String view of a canonical attribute. The level renders as its name.
    pub fn canonical(&self, field: CanonicalField) -> &str {
        match field {
            CanonicalField::SourceTime => &self.src_time,
            CanonicalField::ProcessId => &self.pid,
            CanonicalField::LogSource => &self.source,
            CanonicalField::Level => self.level.name(),
            CanonicalField::Message => &self.message,
            CanonicalField::ReceiveTime => &self.rcv_time,
            CanonicalField::SourceIp => &self.ip,
            CanonicalField::AppName => &self.app_name,
        }
    }

    // None for the level, which is not string-backed
    fn canonical_mut(&mut self, field: CanonicalField) -> Option<&mut String> {
        match field {
            CanonicalField::SourceTime => Some(&mut self.src_time),
            CanonicalField::ProcessId => Some(&mut self.pid),
            CanonicalField::LogSource => Some(&mut self.source),
            CanonicalField::Level => None,
            CanonicalField::Message => Some(&mut self.message),
            CanonicalField::ReceiveTime => Some(&mut self.rcv_time),
            CanonicalField::SourceIp => Some(&mut self.ip),
            CanonicalField::AppName => Some(&mut self.app_name),
        }
    }

    pub fn set_level(&mut self, level: Level) {
        self.level = level;
    }

    pub fn level(&self) -> Level {
        self.level
    }

    /// Uppercase name of the current level.
    pub fn level_name(&self) -> &'static str {
        Level::name_for_ordinal(i64::from(self.level.ordinal()))
    }

    pub fn ip(&self) -> &str {
        &self.ip
    }

    pub fn src_time(&self) -> &str {
        &self.src_time
    }

    pub fn rcv_time(&self) -> &str {
        &self.rcv_time
    }

    pub fn pid(&self) -> &str {
        &self.pid
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Compact JSON rendering: canonical keys, level name, extension fields inline.
    pub fn to_json(&self) -> Result<String, String> {
        serde_json::to_string(self).map_err(|e| format!("Failed to serialize log entry: {e}"))
    }
}

impl<K: AsRef<str>, V: AsRef<str>> FromIterator<(K, V)> for LogEntry {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut entry = LogEntry::new();
        for (name, value) in iter {
            entry.set_field(name.as_ref(), value.as_ref());
        }
        entry
    }
}
