//! Global configuration store: keyed lookup with optional-value
//! semantics, layered below integration-record fields during profile
//! resolution.

use std::collections::HashMap;

use serde_json::Value;

/// Keyed lookup into the surrounding application's configuration.
pub trait ConfigStore: Send + Sync {
    fn lookup(&self, key: &str) -> Option<Value>;

    /// String setting, `None` when absent or empty.
    fn text(&self, key: &str) -> Option<String> {
        match self.lookup(key) {
            Some(Value::String(s)) if !s.is_empty() => Some(s),
            _ => None,
        }
    }

    /// Integer setting, e.g. a timeout in seconds. Accepts numeric
    /// strings, which is how environment-based sources deliver numbers.
    fn seconds(&self, key: &str) -> Option<u64> {
        match self.lookup(key)? {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

/// In-memory store for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemoryConfig {
    values: HashMap<String, Value>,
}

impl MemoryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }
}

impl ConfigStore for MemoryConfig {
    fn lookup(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }
}

/// Applications that load settings with the `config` crate can hand the
/// built `Config` to the dispatcher directly.
impl ConfigStore for config::Config {
    fn lookup(&self, key: &str) -> Option<Value> {
        self.get::<Value>(key).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_helpers() {
        let store = MemoryConfig::new()
            .with("gatewayApiTimeout", 45)
            .with("gatewayApiBaseUrl", "https://example.test")
            .with("empty", "");

        assert_eq!(store.seconds("gatewayApiTimeout"), Some(45));
        assert_eq!(
            MemoryConfig::new().with("t", "45").seconds("t"),
            Some(45),
            "env-style numeric strings parse"
        );
        assert_eq!(store.text("gatewayApiBaseUrl"), Some("https://example.test".to_string()));
        assert_eq!(store.text("empty"), None);
        assert_eq!(store.text("missing"), None);
    }

    #[test]
    fn config_crate_adapter() {
        let config = config::Config::builder()
            .set_default("sms77SmsSendTimeout", 15)
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(ConfigStore::seconds(&config, "sms77SmsSendTimeout"), Some(15));
        assert_eq!(ConfigStore::text(&config, "absent"), None);
    }
}
