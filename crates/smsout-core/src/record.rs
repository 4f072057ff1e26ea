//! Integration records: externally persisted enablement/credential
//! bundles, one per provider, keyed by provider name.

use std::collections::HashMap;

use serde_json::Value;

/// One provider's integration record: an enabled flag plus arbitrary
/// named string/bool fields. Read-only from this layer's point of view.
#[derive(Debug, Clone, Default)]
pub struct IntegrationRecord {
    pub enabled: bool,
    fields: HashMap<String, Value>,
}

impl IntegrationRecord {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            fields: HashMap::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// String field, `None` when absent or empty.
    pub fn text(&self, name: &str) -> Option<String> {
        match self.fields.get(name) {
            Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
            _ => None,
        }
    }

    /// Boolean field, `None` when absent.
    pub fn flag(&self, name: &str) -> Option<bool> {
        self.fields.get(name).and_then(Value::as_bool)
    }
}

/// Keyed lookup into the surrounding application's integration storage.
pub trait IntegrationStore: Send + Sync {
    /// Record for a provider, `None` when none exists.
    fn fetch(&self, provider: &str) -> Option<IntegrationRecord>;
}

/// In-memory store for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemoryIntegrations {
    records: HashMap<String, IntegrationRecord>,
}

impl MemoryIntegrations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, provider: impl Into<String>, record: IntegrationRecord) -> Self {
        self.records.insert(provider.into(), record);
        self
    }
}

impl IntegrationStore for MemoryIntegrations {
    fn fetch(&self, provider: &str) -> Option<IntegrationRecord> {
        self.records.get(provider).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_fields_read_as_absent() {
        let record = IntegrationRecord::new(true)
            .with_field("token", "")
            .with_field("sender", "Acme")
            .with_field("test", true);

        assert_eq!(record.text("token"), None);
        assert_eq!(record.text("sender"), Some("Acme".to_string()));
        assert_eq!(record.flag("test"), Some(true));
        assert_eq!(record.flag("missing"), None);
    }

    #[test]
    fn store_lookup_by_provider_name() {
        let store = MemoryIntegrations::new().with("GatewayAPI", IntegrationRecord::new(true));

        assert!(store.fetch("GatewayAPI").is_some());
        assert!(store.fetch("Sms77").is_none());
    }
}
