// Product Creator Port
//
// Creation itself is opaque: it yields a product summary or fails.

use crate::domain::{CreatedProduct, ProductDraft};
use crate::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait ProductCreator: Send + Sync {
    /// Create a store product
    ///
    /// # Errors
    /// `AppError::CreationFailed` with a human-readable message
    async fn create(&self, draft: &ProductDraft) -> Result<CreatedProduct>;
}
