use serde::de::DeserializeOwned;
use serde_json::Value;

/// Opaque configuration payload handed to a sink's `configure`.
///
/// The host only locates the block; its schema belongs to the sink. Helpers
/// cover the common lookups, and `deserialize` maps the whole block onto a
/// sink-defined settings type.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PluginConfig {
    value: Value,
}

impl PluginConfig {
    pub fn new(value: Value) -> Self {
        Self { value }
    }

    /// Payload for a sink that has no configuration block.
    pub fn empty() -> Self {
        Self { value: Value::Null }
    }

    pub fn is_empty(&self) -> bool {
        match &self.value {
            Value::Null => true,
            Value::Object(map) => map.is_empty(),
            _ => false,
        }
    }

    pub fn raw(&self) -> &Value {
        &self.value
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.value.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.get(key).and_then(Value::as_u64)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    /// Deserialize the whole block into a sink-defined type.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, String> {
        serde_json::from_value(self.value.clone())
            .map_err(|e| format!("Invalid plugin configuration: {e}"))
    }
}

impl From<Value> for PluginConfig {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}
