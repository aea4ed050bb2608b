//! Target resolution against the inventory backend.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use hostrun_core::{CoreError, Target, TargetSelector};

use crate::backend::{BackendError, TargetInventory};

/// Errors that can occur while resolving a selector.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The selector cannot be sent to the inventory.
    #[error(transparent)]
    InvalidSelector(#[from] CoreError),

    /// The inventory backend failed.
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Resolves a selection predicate to at most one addressable target.
pub struct TargetResolver {
    inventory: Arc<dyn TargetInventory>,
}

impl TargetResolver {
    /// Create a resolver over the given inventory.
    pub fn new(inventory: Arc<dyn TargetInventory>) -> Self {
        Self { inventory }
    }

    /// Query the inventory for the selector.
    ///
    /// `Ok(None)` means no instance matched, which is a normal outcome
    /// rather than a fault. When several instances match, the first in
    /// provider order wins; callers must not rely on that tie-break being
    /// stable. Read-only, no side effects.
    pub async fn resolve(
        &self,
        selector: &TargetSelector,
    ) -> Result<Option<Target>, ResolveError> {
        selector.validate()?;

        let records = self.inventory.query(selector).await?;
        if records.len() > 1 {
            debug!(
                matches = records.len(),
                "Selector matched multiple instances, taking the first"
            );
        }

        match records.into_iter().next() {
            Some(record) => {
                let target: Target = record.into();
                info!(target_id = %target.id, address = %target.address, "Resolved target");
                Ok(Some(target))
            }
            None => {
                info!("No instance matched the selector");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{one_instance, ScriptedInventory};
    use hostrun_core::{InstanceRecord, TargetId};

    fn selector() -> TargetSelector {
        TargetSelector::new()
            .name_tag("alpha")
            .lifecycle_state("running")
    }

    #[tokio::test]
    async fn test_resolve_returns_single_match() {
        let inventory = Arc::new(ScriptedInventory::new([one_instance("i-1", "10.0.0.5")]));
        let resolver = TargetResolver::new(inventory.clone());

        let target = resolver.resolve(&selector()).await.unwrap().unwrap();
        assert_eq!(target.id.as_str(), "i-1");
        assert_eq!(target.address, "10.0.0.5");
        assert_eq!(inventory.query_count(), 1);
    }

    #[tokio::test]
    async fn test_resolve_returns_none_for_zero_matches() {
        let inventory = Arc::new(ScriptedInventory::new([Ok(Vec::new())]));
        let resolver = TargetResolver::new(inventory);

        let target = resolver.resolve(&selector()).await.unwrap();
        assert!(target.is_none());
    }

    #[tokio::test]
    async fn test_resolve_takes_first_of_many() {
        let records = vec![
            InstanceRecord {
                id: TargetId::new("i-1"),
                private_address: "10.0.0.5".to_string(),
                public_address: None,
            },
            InstanceRecord {
                id: TargetId::new("i-2"),
                private_address: "10.0.0.6".to_string(),
                public_address: None,
            },
        ];
        let inventory = Arc::new(ScriptedInventory::new([Ok(records)]));
        let resolver = TargetResolver::new(inventory);

        let target = resolver.resolve(&selector()).await.unwrap().unwrap();
        assert_eq!(target.id.as_str(), "i-1");
    }

    #[tokio::test]
    async fn test_resolve_rejects_empty_selector_without_querying() {
        let inventory = Arc::new(ScriptedInventory::new([]));
        let resolver = TargetResolver::new(inventory.clone());

        let result = resolver.resolve(&TargetSelector::new()).await;
        assert!(matches!(result, Err(ResolveError::InvalidSelector(_))));
        assert_eq!(inventory.query_count(), 0);
    }

    #[tokio::test]
    async fn test_resolve_propagates_backend_error() {
        let inventory = Arc::new(ScriptedInventory::new([Err(BackendError::Unreachable(
            "connection refused".to_string(),
        ))]));
        let resolver = TargetResolver::new(inventory);

        let result = resolver.resolve(&selector()).await;
        assert!(matches!(result, Err(ResolveError::Backend(_))));
    }
}
