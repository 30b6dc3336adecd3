// Assignment Domain Model

use super::error::{DomainError, Result};
use super::ids::{ConsumerId, ContainerId, ProductId};
use serde::{Deserialize, Serialize};

/// (container, consumer) pair an assignment is stored under
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssignmentKey {
    pub container: ContainerId,
    pub consumer: ConsumerId,
}

impl AssignmentKey {
    pub fn new(container: ContainerId, consumer: ConsumerId) -> Self {
        Self {
            container,
            consumer,
        }
    }

    /// Build a key from a render context that may lack a container
    pub fn from_render(container: Option<ContainerId>, consumer: ConsumerId) -> Result<Self> {
        container
            .map(|container| Self::new(container, consumer))
            .ok_or(DomainError::NoContainerIdentity)
    }

    /// Persisted layout: `assignment:<container>:<consumer>`
    pub fn storage_key(&self) -> String {
        format!("assignment:{}:{}", self.container, self.consumer)
    }
}

/// Write-once binding of one claimed product to one (container, consumer) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub key: AssignmentKey,
    pub product_id: ProductId,
    pub assigned_at: i64, // epoch ms
}

impl Assignment {
    pub fn new(key: AssignmentKey, product_id: ProductId, assigned_at: i64) -> Self {
        Self {
            key,
            product_id,
            assigned_at,
        }
    }
}

/// Outcome of resolving a consumer's product.
///
/// `Unassigned` and `NoContainer` are normal outcomes, not failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Durable assignment already existed; nothing was mutated
    Existing(ProductId),
    /// Queue head was claimed and persisted by this call
    Claimed(ProductId),
    /// Nothing queued for the acting user
    Unassigned,
    /// Render context has no container to persist into
    NoContainer,
}

impl Resolution {
    pub fn product_id(&self) -> Option<ProductId> {
        match self {
            Resolution::Existing(id) | Resolution::Claimed(id) => Some(*id),
            Resolution::Unassigned | Resolution::NoContainer => None,
        }
    }

    pub fn status(&self) -> &'static str {
        match self {
            Resolution::Existing(_) => "existing",
            Resolution::Claimed(_) => "claimed",
            Resolution::Unassigned => "unassigned",
            Resolution::NoContainer => "no_container",
        }
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.product_id() {
            Some(id) => write!(f, "{} ({})", self.status(), id),
            None => f.write_str(self.status()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(container: &str, consumer: &str) -> AssignmentKey {
        AssignmentKey::new(
            ContainerId::parse(container).unwrap(),
            ConsumerId::parse(consumer).unwrap(),
        )
    }

    #[test]
    fn test_storage_key_layout() {
        assert_eq!(key("postA", "w1").storage_key(), "assignment:postA:w1");
    }

    #[test]
    fn test_from_render_without_container() {
        let consumer = ConsumerId::parse("w1").unwrap();
        let err = AssignmentKey::from_render(None, consumer).unwrap_err();
        assert_eq!(err, DomainError::NoContainerIdentity);
    }

    #[test]
    fn test_resolution_product_id() {
        let id = ProductId::new(7);
        assert_eq!(Resolution::Claimed(id).product_id(), Some(id));
        assert_eq!(Resolution::Existing(id).product_id(), Some(id));
        assert_eq!(Resolution::Unassigned.product_id(), None);
        assert_eq!(Resolution::NoContainer.to_string(), "no_container");
        assert_eq!(Resolution::Claimed(id).to_string(), "claimed (7)");
    }
}
