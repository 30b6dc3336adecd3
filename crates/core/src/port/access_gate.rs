// Access Gate Port (security + capability checks as pass/fail)

use crate::domain::UserId;
use std::collections::HashSet;
use subtle::ConstantTimeEq;

pub trait AccessGate: Send + Sync {
    /// Request token check
    fn verify_nonce(&self, nonce: &str) -> bool;

    /// Capability check for the producer
    fn can_create_products(&self, user: UserId) -> bool;
}

/// Shared-secret token plus optional user allow-list (production)
///
/// `None` for either part disables that check.
#[derive(Debug, Clone, Default)]
pub struct SharedSecretGate {
    nonce: Option<String>,
    allowed_users: Option<HashSet<UserId>>,
}

impl SharedSecretGate {
    pub fn new(nonce: Option<String>, allowed_users: Option<HashSet<UserId>>) -> Self {
        Self {
            nonce,
            allowed_users,
        }
    }

    /// Gate that lets every request through
    pub fn open() -> Self {
        Self::default()
    }
}

impl AccessGate for SharedSecretGate {
    fn verify_nonce(&self, nonce: &str) -> bool {
        match &self.nonce {
            Some(expected) => expected.as_bytes().ct_eq(nonce.as_bytes()).into(),
            None => true,
        }
    }

    fn can_create_products(&self, user: UserId) -> bool {
        match &self.allowed_users {
            Some(allowed) => allowed.contains(&user),
            None => true,
        }
    }
}
