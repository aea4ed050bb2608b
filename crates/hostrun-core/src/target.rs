//! Targets and target selection.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::ids::TargetId;

/// An addressable remote host selected for command execution.
///
/// Immutable once resolved; created per invocation and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    /// Provider identifier of the host.
    pub id: TargetId,

    /// Primary (private) network address.
    pub address: String,

    /// Secondary (public) address, when the provider exposes one.
    pub public_address: Option<String>,
}

impl Target {
    /// Create a new Target.
    pub fn new(id: TargetId, address: impl Into<String>) -> Self {
        Self {
            id,
            address: address.into(),
            public_address: None,
        }
    }

    /// Builder method to attach a public address.
    pub fn with_public_address(mut self, address: impl Into<String>) -> Self {
        self.public_address = Some(address.into());
        self
    }
}

/// Raw inventory row returned by the target lookup collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceRecord {
    /// Provider identifier of the instance.
    pub id: TargetId,

    /// Private network address.
    pub private_address: String,

    /// Public address, if any.
    pub public_address: Option<String>,
}

impl From<InstanceRecord> for Target {
    fn from(record: InstanceRecord) -> Self {
        Self {
            id: record.id,
            address: record.private_address,
            public_address: record.public_address,
        }
    }
}

/// One equality filter in a selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    /// Provider filter key, e.g. `tag:Name`.
    pub key: String,
    /// Exact value the key must carry.
    pub value: String,
}

/// Conjunction of equality filters narrowing the inventory to one host.
///
/// The selector is passed verbatim to the inventory backend; matching
/// semantics are provider-side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetSelector {
    /// All filters must match.
    pub filters: Vec<Filter>,
}

impl TargetSelector {
    /// Filter key for the host name tag.
    pub const NAME_TAG: &'static str = "tag:Name";

    /// Filter key for the host lifecycle state.
    pub const LIFECYCLE_STATE: &'static str = "instance-state-name";

    /// Create an empty selector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to add an arbitrary equality filter.
    pub fn with_filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push(Filter {
            key: key.into(),
            value: value.into(),
        });
        self
    }

    /// Builder method to require a name tag value.
    pub fn name_tag(self, value: impl Into<String>) -> Self {
        self.with_filter(Self::NAME_TAG, value)
    }

    /// Builder method to require a lifecycle state.
    pub fn lifecycle_state(self, value: impl Into<String>) -> Self {
        self.with_filter(Self::LIFECYCLE_STATE, value)
    }

    /// Check that the selector can be sent to an inventory backend.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.filters.is_empty() {
            return Err(CoreError::InvalidSelector(
                "selector has no filters".to_string(),
            ));
        }
        if let Some(filter) = self.filters.iter().find(|f| f.key.is_empty()) {
            return Err(CoreError::InvalidSelector(format!(
                "filter with empty key (value '{}')",
                filter.value
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_builders() {
        let selector = TargetSelector::new()
            .name_tag("alpha")
            .lifecycle_state("running");

        assert_eq!(selector.filters.len(), 2);
        assert_eq!(selector.filters[0].key, TargetSelector::NAME_TAG);
        assert_eq!(selector.filters[0].value, "alpha");
        assert!(selector.validate().is_ok());
    }

    #[test]
    fn test_empty_selector_is_invalid() {
        let selector = TargetSelector::new();
        assert!(selector.validate().is_err());
    }

    #[test]
    fn test_empty_filter_key_is_invalid() {
        let selector = TargetSelector::new().with_filter("", "x");
        assert!(selector.validate().is_err());
    }

    #[test]
    fn test_record_to_target_keeps_addresses() {
        let record = InstanceRecord {
            id: TargetId::new("i-1"),
            private_address: "10.0.0.5".to_string(),
            public_address: Some("203.0.113.9".to_string()),
        };

        let target: Target = record.into();
        assert_eq!(target.id.as_str(), "i-1");
        assert_eq!(target.address, "10.0.0.5");
        assert_eq!(target.public_address.as_deref(), Some("203.0.113.9"));
    }
}
