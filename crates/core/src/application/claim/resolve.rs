// Resolve Use Case - which product does this consumer own?

use crate::application::events::{ClaimEvent, EventBus};
use crate::application::queue_store::QueueStore;
use crate::domain::{Assignment, AssignmentKey, ConsumerId, ContainerId, Resolution, UserId};
use crate::error::{AppError, Result};
use crate::port::{AssignmentRepository, TimeProvider};
use tracing::{debug, warn};

/// Render context of one consumer
#[derive(Debug, Clone)]
pub struct ResolveRequest {
    pub container: Option<ContainerId>,
    pub consumer: ConsumerId,
    pub user: UserId,
}

/// Execute resolve use case
///
/// 1. No container: `NoContainer`
/// 2. Durable assignment present: return it, no mutation
/// 3. Otherwise claim the queue head and persist it before returning
///
/// A failed durable write after the dequeue loses the entry; it is not
/// pushed back.
pub async fn execute(
    queue: &QueueStore,
    assignments: &dyn AssignmentRepository,
    time_provider: &dyn TimeProvider,
    events: &EventBus,
    req: ResolveRequest,
) -> Result<Resolution> {
    let key = match AssignmentKey::from_render(req.container, req.consumer) {
        Ok(key) => key,
        Err(_) => return Ok(Resolution::NoContainer),
    };

    // Fast path: write-once assignment
    if let Some(existing) = assignments.find(&key).await? {
        return Ok(Resolution::Existing(existing.product_id));
    }

    let Some(product_id) = queue.dequeue_head(req.user).await? else {
        debug!(user = %req.user, key = %key.storage_key(), "Nothing queued to claim");
        return Ok(Resolution::Unassigned);
    };

    let assignment = Assignment::new(key.clone(), product_id, time_provider.now_millis());
    let inserted = match assignments.insert_if_absent(&assignment).await {
        Ok(inserted) => inserted,
        Err(e) => {
            warn!(
                user = %req.user,
                key = %key.storage_key(),
                product_id = %product_id,
                error = %e,
                "Assignment write failed after dequeue; entry lost"
            );
            return Err(e);
        }
    };

    if !inserted {
        // A concurrent resolve for the same pair got there first
        let existing = assignments.find(&key).await?.ok_or_else(|| {
            AppError::Conflict(format!("Assignment {} vanished", key.storage_key()))
        })?;
        warn!(
            key = %key.storage_key(),
            orphaned = %product_id,
            kept = %existing.product_id,
            "Pair already assigned; dequeued entry orphaned"
        );
        return Ok(Resolution::Existing(existing.product_id));
    }

    events.publish(&ClaimEvent::ProductClaimed {
        user: req.user,
        key,
        product_id,
    });

    Ok(Resolution::Claimed(product_id))
}
