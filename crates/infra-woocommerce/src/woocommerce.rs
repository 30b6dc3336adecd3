// WooCommerce REST ProductCreator
//
// POST {base}/wp-json/wc/v3/products with consumer key/secret as basic auth.

use async_trait::async_trait;
use claimq_core::domain::{CreatedProduct, ProductDraft, ProductId};
use claimq_core::error::{AppError, Result};
use claimq_core::port::ProductCreator;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

const DEFAULT_ERROR_MESSAGE: &str = "Failed to create product. Please try again.";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone)]
pub struct WooCommerceConfig {
    pub base_url: String,
    pub consumer_key: String,
    pub consumer_secret: String,
    pub timeout: Duration,
}

impl WooCommerceConfig {
    pub fn new(
        base_url: impl Into<String>,
        consumer_key: impl Into<String>,
        consumer_secret: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    fn products_url(&self) -> String {
        format!("{}/wp-json/wc/v3/products", self.base_url)
    }

    fn edit_url(&self, id: ProductId) -> String {
        format!("{}/wp-admin/post.php?post={}&action=edit", self.base_url, id)
    }
}

pub struct WooCommerceProductCreator {
    client: reqwest::Client,
    config: WooCommerceConfig,
}

impl WooCommerceProductCreator {
    pub fn new(config: WooCommerceConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::Config(format!("HTTP client: {}", e)))?;
        Ok(Self { client, config })
    }
}

/// Request body: a published, visible simple product without stock management
#[derive(Debug, Serialize)]
struct ProductPayload<'a> {
    name: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
    regular_price: String,
    status: &'static str,
    catalog_visibility: &'static str,
    manage_stock: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
}

impl<'a> From<&'a ProductDraft> for ProductPayload<'a> {
    fn from(draft: &'a ProductDraft) -> Self {
        Self {
            name: &draft.name,
            kind: "simple",
            regular_price: draft.price_string(),
            status: "publish",
            catalog_visibility: "visible",
            manage_stock: false,
            description: draft.description.as_deref(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ProductResponse {
    #[serde(default)]
    id: u64,
    #[serde(default)]
    name: String,
    #[serde(default)]
    price: String,
    #[serde(default)]
    permalink: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    message: Option<String>,
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .and_then(|e| e.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_string())
}

fn into_created(config: &WooCommerceConfig, resp: ProductResponse) -> CreatedProduct {
    let product_id = ProductId::new(resp.id);
    CreatedProduct {
        product_id,
        name: resp.name,
        price: resp.price,
        permalink: resp.permalink,
        edit_url: config.edit_url(product_id),
    }
}

#[async_trait]
impl ProductCreator for WooCommerceProductCreator {
    async fn create(&self, draft: &ProductDraft) -> Result<CreatedProduct> {
        let payload = ProductPayload::from(draft);

        let response = self
            .client
            .post(self.config.products_url())
            .basic_auth(&self.config.consumer_key, Some(&self.config.consumer_secret))
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "WooCommerce request failed");
                AppError::CreationFailed(DEFAULT_ERROR_MESSAGE.to_string())
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::CreationFailed(format!("Unreadable response: {}", e)))?;

        if !status.is_success() {
            warn!(status = %status, "WooCommerce rejected product");
            return Err(AppError::CreationFailed(error_message(&body)));
        }

        let parsed: ProductResponse = serde_json::from_str(&body)
            .map_err(|e| AppError::CreationFailed(format!("Unexpected response: {}", e)))?;

        let created = into_created(&self.config, parsed);
        info!(product_id = %created.product_id, "WooCommerce product created");
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config() -> WooCommerceConfig {
        WooCommerceConfig::new("https://shop.test/", "ck_1", "cs_1")
    }

    #[test]
    fn test_urls() {
        let config = config();
        assert_eq!(
            config.products_url(),
            "https://shop.test/wp-json/wc/v3/products"
        );
        assert_eq!(
            config.edit_url(ProductId::new(12)),
            "https://shop.test/wp-admin/post.php?post=12&action=edit"
        );
    }

    #[test]
    fn test_payload_shape() {
        let draft = ProductDraft::parse("Mug", 9.5, Some("Ceramic")).unwrap();
        let value = serde_json::to_value(ProductPayload::from(&draft)).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "Mug",
                "type": "simple",
                "regular_price": "9.5",
                "status": "publish",
                "catalog_visibility": "visible",
                "manage_stock": false,
                "description": "Ceramic",
            })
        );
    }

    #[test]
    fn test_payload_omits_missing_description() {
        let draft = ProductDraft::parse("Mug", 3.0, None).unwrap();
        let value = serde_json::to_value(ProductPayload::from(&draft)).unwrap();
        assert!(value.get("description").is_none());
        assert_eq!(value["regular_price"], "3");
    }

    #[test]
    fn test_response_mapping() {
        let resp: ProductResponse = serde_json::from_value(json!({
            "id": 501,
            "name": "Mug",
            "price": "9.5",
            "permalink": "https://shop.test/product/mug/",
            "status": "publish"
        }))
        .unwrap();

        let created = into_created(&config(), resp);
        assert_eq!(created.product_id, ProductId::new(501));
        assert_eq!(created.permalink, "https://shop.test/product/mug/");
        assert!(created.edit_url.ends_with("post=501&action=edit"));
    }

    #[test]
    fn test_response_without_id_maps_to_zero() {
        let resp: ProductResponse = serde_json::from_value(json!({"name": "Mug"})).unwrap();
        assert!(!into_created(&config(), resp).product_id.is_valid());
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(
            error_message(r#"{"code":"woocommerce_rest_cannot_create","message":"Sorry, you are not allowed to create resources."}"#),
            "Sorry, you are not allowed to create resources."
        );
        assert_eq!(error_message("<html>502</html>"), DEFAULT_ERROR_MESSAGE);
        assert_eq!(error_message(r#"{"message":""}"#), DEFAULT_ERROR_MESSAGE);
    }
}
