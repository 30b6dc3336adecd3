// Queue Store - per-user FIFO of unclaimed product ids on top of a TransientStore

use crate::domain::{queue_key, PendingQueue, ProductId, UserId};
use crate::error::{AppError, Result};
use crate::port::TransientStore;
use std::sync::Arc;
use tracing::{debug, warn};

/// Per-user queues; every mutation is a single `TransientStore::update`
pub struct QueueStore {
    store: Arc<dyn TransientStore>,
    ttl_ms: i64,
}

impl QueueStore {
    pub fn new(store: Arc<dyn TransientStore>, ttl_ms: i64) -> Self {
        Self { store, ttl_ms }
    }

    pub fn ttl_ms(&self) -> i64 {
        self.ttl_ms
    }

    /// Append `entry` at the tail of the user's queue.
    ///
    /// Creates the queue if absent and resets its expiry to `now + ttl`.
    ///
    /// # Returns
    /// Queue length after the append
    pub async fn enqueue(&self, user: UserId, entry: ProductId) -> Result<usize> {
        if !entry.is_valid() {
            return Err(AppError::Validation(format!(
                "Invalid product id: {}",
                entry
            )));
        }

        let key = queue_key(user);
        let mut len = 0;
        self.store
            .update(&key, self.ttl_ms, &mut |current| {
                let mut queue = decode(&key, current);
                queue.push(entry);
                len = queue.len();
                Ok(Some(queue.encode()?))
            })
            .await?;

        debug!(user = %user, product_id = %entry, len, "Enqueued product");
        Ok(len)
    }

    /// Remove and return the head of the user's queue.
    ///
    /// Absent or empty queues yield `None` and are left untouched.
    pub async fn dequeue_head(&self, user: UserId) -> Result<Option<ProductId>> {
        let key = queue_key(user);
        let mut head = None;
        let mut remaining = 0;
        self.store
            .update(&key, self.ttl_ms, &mut |current| {
                let Some(value) = current else {
                    return Ok(None);
                };
                let mut queue = decode(&key, Some(value));
                head = queue.pop();
                if head.is_none() {
                    return Ok(None);
                }
                remaining = queue.len();
                Ok(Some(queue.encode()?))
            })
            .await?;

        if let Some(id) = head {
            debug!(user = %user, product_id = %id, remaining, "Dequeued product");
        }
        Ok(head)
    }

    /// Snapshot of the user's pending entries, oldest first
    pub async fn pending(&self, user: UserId) -> Result<Vec<ProductId>> {
        let key = queue_key(user);
        let current = self.store.get(&key).await?;
        Ok(decode(&key, current.as_ref().map(|t| t.value.as_str())).to_vec())
    }

    /// Drop the user's queue. Returns true if one existed.
    pub async fn clear(&self, user: UserId) -> Result<bool> {
        self.store.delete(&queue_key(user)).await
    }
}

// A value that is not a list of ids is treated as an empty queue
fn decode(key: &str, current: Option<&str>) -> PendingQueue {
    match current {
        None => PendingQueue::new(),
        Some(value) => PendingQueue::decode(value).unwrap_or_else(|e| {
            warn!(key = %key, error = %e, "Discarding malformed queue value");
            PendingQueue::new()
        }),
    }
}
