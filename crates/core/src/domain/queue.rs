// Queue Domain Model

use super::ids::{ProductId, UserId};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Unclaimed entries expire after one day
pub const DEFAULT_QUEUE_TTL_MS: i64 = 24 * 60 * 60 * 1000;

/// Transient key of a user's queue: `queue:<user>`
pub fn queue_key(user: UserId) -> String {
    format!("queue:{}", user)
}

/// FIFO of product ids waiting to be claimed (serialized as a JSON array)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PendingQueue(VecDeque<ProductId>);

impl PendingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append at the tail
    pub fn push(&mut self, entry: ProductId) {
        self.0.push_back(entry);
    }

    /// Remove from the head
    pub fn pop(&mut self) -> Option<ProductId> {
        self.0.pop_front()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_vec(&self) -> Vec<ProductId> {
        self.0.iter().copied().collect()
    }

    pub fn decode(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }

    pub fn encode(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
