/// Host configuration document
use crate::host::HostError;
use crate::plugin::PluginConfig;
use serde_json::{Map, Value};
use std::path::Path;
use std::str::FromStr;

/// Configuration for every sink, keyed by section name.
///
/// The document is a JSON object whose top-level keys are the names returned
/// by each plugin's `config_section_name()`:
///
/// ```json
/// {
///     "ndjson": { "max_pending": 65536 },
///     "file": { "path": "/var/log/shipped.log" }
/// }
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HostConfig {
    sections: Map<String, Value>,
}

impl HostConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_path(path: &Path) -> Result<Self, HostError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| HostError::Config(format!("{}: {e}", path.display())))?;
        text.parse()
    }

    /// Add or replace a section.
    pub fn with_section(mut self, name: &str, value: Value) -> Self {
        self.sections.insert(name.to_string(), value);
        self
    }

    /// Payload for `name`; an absent section yields an empty payload.
    pub fn section(&self, name: &str) -> PluginConfig {
        self.sections
            .get(name)
            .cloned()
            .map(PluginConfig::new)
            .unwrap_or_default()
    }

    pub fn has_section(&self, name: &str) -> bool {
        self.sections.contains_key(name)
    }

    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }
}

impl FromStr for HostConfig {
    type Err = HostError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(sections)) => Ok(Self { sections }),
            Ok(_) => Err(HostError::Config(
                "top-level value must be an object".to_string(),
            )),
            Err(e) => Err(HostError::Config(e.to_string())),
        }
    }
}
