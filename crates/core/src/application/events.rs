// Typed event bus
//
// Handlers are registered per event kind when the service is composed;
// publishing is a plain loop over the matching list.

use crate::domain::{AssignmentKey, CreatedProduct, ProductId, UserId};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, PartialEq)]
pub enum ClaimEvent {
    /// Producer created a product and queued it for `user`
    ProductCreated {
        user: UserId,
        product: CreatedProduct,
        queue_len: usize,
    },
    /// A consumer claimed the head of `user`'s queue
    ProductClaimed {
        user: UserId,
        key: AssignmentKey,
        product_id: ProductId,
    },
}

pub trait EventHandler: Send + Sync {
    fn handle(&self, event: &ClaimEvent);
}

/// Fixed set of handler lists, one per event kind
#[derive(Clone, Default)]
pub struct EventBus {
    on_created: Vec<Arc<dyn EventHandler>>,
    on_claimed: Vec<Arc<dyn EventHandler>>,
}

impl EventBus {
    pub fn builder() -> EventBusBuilder {
        EventBusBuilder::default()
    }

    /// Deliver to every handler registered for the event's kind, in order
    pub fn publish(&self, event: &ClaimEvent) {
        let handlers = match event {
            ClaimEvent::ProductCreated { .. } => &self.on_created,
            ClaimEvent::ProductClaimed { .. } => &self.on_claimed,
        };
        for handler in handlers {
            handler.handle(event);
        }
    }
}

#[derive(Default)]
pub struct EventBusBuilder {
    bus: EventBus,
}

impl EventBusBuilder {
    pub fn on_product_created(mut self, handler: Arc<dyn EventHandler>) -> Self {
        self.bus.on_created.push(handler);
        self
    }

    pub fn on_product_claimed(mut self, handler: Arc<dyn EventHandler>) -> Self {
        self.bus.on_claimed.push(handler);
        self
    }

    /// Register for every event kind
    pub fn on_all(self, handler: Arc<dyn EventHandler>) -> Self {
        self.on_product_created(handler.clone())
            .on_product_claimed(handler)
    }

    pub fn build(self) -> EventBus {
        self.bus
    }
}

/// Structured log line per event
pub struct TracingEventHandler;

impl EventHandler for TracingEventHandler {
    fn handle(&self, event: &ClaimEvent) {
        match event {
            ClaimEvent::ProductCreated {
                user,
                product,
                queue_len,
            } => info!(
                user = %user,
                product_id = %product.product_id,
                name = %product.name,
                queue_len = queue_len,
                "Product created and queued"
            ),
            ClaimEvent::ProductClaimed {
                user,
                key,
                product_id,
            } => info!(
                user = %user,
                container = %key.container,
                consumer = %key.consumer,
                product_id = %product_id,
                "Product claimed"
            ),
        }
    }
}
