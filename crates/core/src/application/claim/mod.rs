// Claim Service - the process-wide handle composed by the daemon

pub mod create_product;
pub mod resolve;

pub use create_product::CreateProductRequest;
pub use resolve::ResolveRequest;

use crate::application::events::EventBus;
use crate::application::queue_store::QueueStore;
use crate::domain::{
    Assignment, AssignmentKey, ConsumerId, ContainerId, CreatedProduct, ProductId, Resolution,
    UserId, DEFAULT_QUEUE_TTL_MS,
};
use crate::error::Result;
use crate::port::{AccessGate, AssignmentRepository, ProductCreator, TimeProvider, TransientStore};
use std::sync::Arc;

pub struct ClaimService {
    transients: Arc<dyn TransientStore>,
    queue: QueueStore,
    assignments: Arc<dyn AssignmentRepository>,
    creator: Arc<dyn ProductCreator>,
    gate: Arc<dyn AccessGate>,
    time_provider: Arc<dyn TimeProvider>,
    events: EventBus,
}

impl ClaimService {
    pub fn new(
        transients: Arc<dyn TransientStore>,
        assignments: Arc<dyn AssignmentRepository>,
        creator: Arc<dyn ProductCreator>,
        gate: Arc<dyn AccessGate>,
        time_provider: Arc<dyn TimeProvider>,
        events: EventBus,
    ) -> Self {
        Self {
            queue: QueueStore::new(transients.clone(), DEFAULT_QUEUE_TTL_MS),
            transients,
            assignments,
            creator,
            gate,
            time_provider,
            events,
        }
    }

    /// Override the queue TTL (default one day)
    pub fn with_queue_ttl(mut self, ttl_ms: i64) -> Self {
        self.queue = QueueStore::new(self.transients.clone(), ttl_ms);
        self
    }

    pub fn queue(&self) -> &QueueStore {
        &self.queue
    }

    /// Create a product and queue it for the acting user
    pub async fn create_product(&self, req: CreateProductRequest) -> Result<CreatedProduct> {
        create_product::execute(
            self.gate.as_ref(),
            self.creator.as_ref(),
            &self.queue,
            &self.events,
            req,
        )
        .await
    }

    /// Resolve the product owned by a consumer, claiming one if needed
    pub async fn resolve(&self, req: ResolveRequest) -> Result<Resolution> {
        resolve::execute(
            &self.queue,
            self.assignments.as_ref(),
            self.time_provider.as_ref(),
            &self.events,
            req,
        )
        .await
    }

    /// Read-only lookup of a stored assignment
    ///
    /// # Errors
    /// `NoContainerIdentity` when `container` is `None`
    pub async fn assignment(
        &self,
        container: Option<ContainerId>,
        consumer: ConsumerId,
    ) -> Result<Option<Assignment>> {
        let key = AssignmentKey::from_render(container, consumer)?;
        self.assignments.find(&key).await
    }

    pub async fn pending(&self, user: UserId) -> Result<Vec<ProductId>> {
        self.queue.pending(user).await
    }

    pub async fn clear_queue(&self, user: UserId) -> Result<bool> {
        self.queue.clear(user).await
    }

    pub async fn assignment_count(&self) -> Result<i64> {
        self.assignments.count().await
    }

    /// Drop expired transients (queues nobody claimed in time)
    pub async fn purge_expired(&self) -> Result<u64> {
        self.transients.purge_expired().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::memory::{MemoryAssignmentRepository, MemoryTransientStore};
    use crate::port::{ManualTimeProvider, SharedSecretGate};
    use async_trait::async_trait;

    struct NeverCreator;

    #[async_trait]
    impl ProductCreator for NeverCreator {
        async fn create(&self, _draft: &crate::domain::ProductDraft) -> Result<CreatedProduct> {
            Err(AppError::CreationFailed("offline".to_string()))
        }
    }

    fn service(clock: Arc<ManualTimeProvider>) -> ClaimService {
        ClaimService::new(
            Arc::new(MemoryTransientStore::new(clock.clone())),
            Arc::new(MemoryAssignmentRepository::new()),
            Arc::new(NeverCreator),
            Arc::new(SharedSecretGate::open()),
            clock,
            EventBus::default(),
        )
    }

    #[tokio::test]
    async fn test_assignment_lookup_requires_container() {
        let svc = service(Arc::new(ManualTimeProvider::new(0)));
        let err = svc
            .assignment(None, ConsumerId::parse("w1").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NoContainerIdentity));
    }

    #[tokio::test]
    async fn test_custom_ttl_and_purge() {
        let clock = Arc::new(ManualTimeProvider::new(0));
        let svc = service(clock.clone()).with_queue_ttl(1_000);
        let user = UserId::new(3);

        svc.queue().enqueue(user, ProductId::new(1)).await.unwrap();
        clock.advance(999);
        assert_eq!(svc.pending(user).await.unwrap().len(), 1);

        clock.advance(1);
        assert!(svc.pending(user).await.unwrap().is_empty());
        assert_eq!(svc.purge_expired().await.unwrap(), 1);
    }
}
