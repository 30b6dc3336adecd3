//! RPC Method Handlers
//!
//! Thin translation between wire types and the ClaimService.

use crate::error::to_rpc_error;
use crate::types::{
    ClearResponse, CreateProductRequest, CreateProductResponse, LookupRequest, LookupResponse,
    PendingResponse, PurgeRequest, PurgeResponse, QueueRequest, ResolveRequest, ResolveResponse,
    StatsRequest, StatsResponse,
};
use claimq_core::application::claim;
use claimq_core::application::ClaimService;
use claimq_core::domain::{AssignmentKey, ConsumerId, ContainerId, UserId};
use claimq_core::error::AppError;
use jsonrpsee::types::ErrorObjectOwned;
use std::sync::Arc;
use std::time::Instant;

/// RPC Handler with injected service
pub struct RpcHandler {
    service: Arc<ClaimService>,
    start_time: Instant,
}

// Blank or missing container means the render context has no identity
fn parse_container(raw: Option<String>) -> Result<Option<ContainerId>, ErrorObjectOwned> {
    match raw {
        Some(raw) if !raw.trim().is_empty() => ContainerId::parse(raw)
            .map(Some)
            .map_err(|e| to_rpc_error(AppError::from(e))),
        _ => Ok(None),
    }
}

fn parse_consumer(raw: String) -> Result<ConsumerId, ErrorObjectOwned> {
    ConsumerId::parse(raw).map_err(|e| to_rpc_error(AppError::from(e)))
}

impl RpcHandler {
    pub fn new(service: Arc<ClaimService>) -> Self {
        Self {
            service,
            start_time: Instant::now(),
        }
    }

    /// product.create.v1
    pub async fn create_product(
        &self,
        params: CreateProductRequest,
    ) -> Result<CreateProductResponse, ErrorObjectOwned> {
        let req = claim::CreateProductRequest {
            nonce: params.nonce,
            user: UserId::new(params.user_id),
            name: params.name,
            price: params.price,
            description: params.description,
        };

        let product = self
            .service
            .create_product(req)
            .await
            .map_err(to_rpc_error)?;

        Ok(CreateProductResponse {
            message: "Product created successfully!".to_string(),
            product_id: product.product_id.get(),
            product_name: product.name,
            product_price: product.price,
            product_url: product.permalink,
            edit_url: product.edit_url,
        })
    }

    /// claim.resolve.v1
    pub async fn resolve(
        &self,
        params: ResolveRequest,
    ) -> Result<ResolveResponse, ErrorObjectOwned> {
        let req = claim::ResolveRequest {
            container: parse_container(params.container_id)?,
            consumer: parse_consumer(params.consumer_id)?,
            user: UserId::new(params.user_id),
        };

        let resolution = self.service.resolve(req).await.map_err(to_rpc_error)?;

        Ok(ResolveResponse {
            status: resolution.status().to_string(),
            product_id: resolution.product_id().map(|id| id.get()),
        })
    }

    /// claim.lookup.v1
    pub async fn lookup(&self, params: LookupRequest) -> Result<LookupResponse, ErrorObjectOwned> {
        let container = parse_container(params.container_id)?;
        let consumer = parse_consumer(params.consumer_id)?;

        let storage_key = container
            .clone()
            .map(|c| AssignmentKey::new(c, consumer.clone()).storage_key())
            .unwrap_or_default();

        let assignment = self
            .service
            .assignment(container, consumer)
            .await
            .map_err(to_rpc_error)?;

        Ok(LookupResponse {
            storage_key,
            product_id: assignment.as_ref().map(|a| a.product_id.get()),
            assigned_at: assignment.map(|a| a.assigned_at),
        })
    }

    /// queue.pending.v1
    pub async fn pending(&self, params: QueueRequest) -> Result<PendingResponse, ErrorObjectOwned> {
        let ids = self
            .service
            .pending(UserId::new(params.user_id))
            .await
            .map_err(to_rpc_error)?;

        Ok(PendingResponse {
            user_id: params.user_id,
            product_ids: ids.into_iter().map(|id| id.get()).collect(),
        })
    }

    /// queue.clear.v1
    pub async fn clear(&self, params: QueueRequest) -> Result<ClearResponse, ErrorObjectOwned> {
        let cleared = self
            .service
            .clear_queue(UserId::new(params.user_id))
            .await
            .map_err(to_rpc_error)?;

        Ok(ClearResponse {
            user_id: params.user_id,
            cleared,
        })
    }

    /// admin.purge.v1
    pub async fn purge(&self, _params: PurgeRequest) -> Result<PurgeResponse, ErrorObjectOwned> {
        let purged = self.service.purge_expired().await.map_err(to_rpc_error)?;
        Ok(PurgeResponse { purged })
    }

    /// admin.stats.v1
    pub async fn stats(&self, _params: StatsRequest) -> Result<StatsResponse, ErrorObjectOwned> {
        let assignments = self
            .service
            .assignment_count()
            .await
            .map_err(to_rpc_error)?;

        Ok(StatsResponse {
            version: claimq_core::VERSION.to_string(),
            assignments,
            uptime_seconds: self.start_time.elapsed().as_secs(),
        })
    }
}
