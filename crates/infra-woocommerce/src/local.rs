// Local ProductCreator - in-process ids for runs without a store backend

use async_trait::async_trait;
use claimq_core::domain::{CreatedProduct, ProductDraft, ProductId};
use claimq_core::error::Result;
use claimq_core::port::ProductCreator;
use std::sync::atomic::{AtomicU64, Ordering};

pub struct LocalProductCreator {
    base_url: String,
    next_id: AtomicU64,
}

impl LocalProductCreator {
    /// Ids are handed out sequentially from `first_id` (0 is bumped to 1)
    pub fn new(base_url: impl Into<String>, first_id: u64) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            next_id: AtomicU64::new(first_id.max(1)),
        }
    }
}

#[async_trait]
impl ProductCreator for LocalProductCreator {
    async fn create(&self, draft: &ProductDraft) -> Result<CreatedProduct> {
        let product_id = ProductId::new(self.next_id.fetch_add(1, Ordering::SeqCst));
        Ok(CreatedProduct {
            product_id,
            name: draft.name.clone(),
            price: draft.price_string(),
            permalink: format!("{}/?post_type=product&p={}", self.base_url, product_id),
            edit_url: format!(
                "{}/wp-admin/post.php?post={}&action=edit",
                self.base_url, product_id
            ),
        })
    }
}
