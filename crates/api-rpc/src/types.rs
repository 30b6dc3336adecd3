//! RPC Request/Response Types

use serde::{Deserialize, Serialize};

/// product.create.v1 - Create a product and queue it for the acting user
#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    #[serde(default)]
    pub nonce: String,
    pub user_id: u64,
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProductResponse {
    pub message: String,
    pub product_id: u64,
    pub product_name: String,
    pub product_price: String,
    pub product_url: String,
    pub edit_url: String,
}

/// claim.resolve.v1 - Resolve (and possibly claim) a consumer's product
#[derive(Debug, Deserialize)]
pub struct ResolveRequest {
    #[serde(default)]
    pub container_id: Option<String>,
    pub consumer_id: String,
    pub user_id: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveResponse {
    /// existing | claimed | unassigned | no_container
    pub status: String,
    pub product_id: Option<u64>,
}

/// claim.lookup.v1 - Read a stored assignment without touching the queue
#[derive(Debug, Deserialize)]
pub struct LookupRequest {
    #[serde(default)]
    pub container_id: Option<String>,
    pub consumer_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupResponse {
    pub storage_key: String,
    pub product_id: Option<u64>,
    pub assigned_at: Option<i64>,
}

/// queue.pending.v1 / queue.clear.v1
#[derive(Debug, Deserialize)]
pub struct QueueRequest {
    pub user_id: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingResponse {
    pub user_id: u64,
    pub product_ids: Vec<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClearResponse {
    pub user_id: u64,
    pub cleared: bool,
}

/// admin.purge.v1 - Drop expired queues now
#[derive(Debug, Default, Deserialize)]
pub struct PurgeRequest {
    // No parameters needed
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurgeResponse {
    pub purged: u64,
}

/// admin.stats.v1
#[derive(Debug, Default, Deserialize)]
pub struct StatsRequest {
    // No parameters needed
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    pub version: String,
    pub assignments: i64,
    pub uptime_seconds: u64,
}
