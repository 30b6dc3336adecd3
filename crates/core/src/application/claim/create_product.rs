// Create Product Use Case (the producer)

use crate::application::events::{ClaimEvent, EventBus};
use crate::application::queue_store::QueueStore;
use crate::domain::{CreatedProduct, ProductDraft, UserId};
use crate::error::{AppError, Result};
use crate::port::{AccessGate, ProductCreator};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Raw producer input as submitted by the popup form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProductRequest {
    pub nonce: String,
    pub user: UserId,
    pub name: String,
    pub price: f64,

    #[serde(default)]
    pub description: Option<String>,
}

/// Execute create-product use case
///
/// Gates run in order: nonce, capability, input validation. Only then is
/// the creator called and the new id queued for the acting user.
///
/// # Arguments
///
/// * `gate` - Security and capability checks
/// * `creator` - Opaque product creation
/// * `queue` - Queue the new id is appended to
/// * `events` - Receives `ProductCreated`
/// * `req` - Producer input
pub async fn execute(
    gate: &dyn AccessGate,
    creator: &dyn ProductCreator,
    queue: &QueueStore,
    events: &EventBus,
    req: CreateProductRequest,
) -> Result<CreatedProduct> {
    if !gate.verify_nonce(&req.nonce) {
        return Err(AppError::SecurityCheckFailed(
            "Security check failed. Please refresh the page and try again.".to_string(),
        ));
    }

    if !gate.can_create_products(req.user) {
        return Err(AppError::PermissionDenied(
            "You do not have permission to create products.".to_string(),
        ));
    }

    let draft = ProductDraft::parse(&req.name, req.price, req.description.as_deref())?;

    let product = creator.create(&draft).await.map_err(|e| match e {
        AppError::CreationFailed(msg) => AppError::CreationFailed(msg),
        other => AppError::CreationFailed(other.user_message()),
    })?;

    if !product.product_id.is_valid() {
        warn!(name = %product.name, "Creator returned a product without an id");
        return Err(AppError::CreationFailed(
            "Product was created but ID is missing. Please check WooCommerce.".to_string(),
        ));
    }

    let queue_len = queue.enqueue(req.user, product.product_id).await?;

    events.publish(&ClaimEvent::ProductCreated {
        user: req.user,
        product: product.clone(),
        queue_len,
    });

    Ok(product)
}
