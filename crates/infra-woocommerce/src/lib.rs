// Claimq Infrastructure - Product creators
// Implements: ProductCreator (WooCommerce REST API, local in-process catalog)

mod local;
mod woocommerce;

pub use local::LocalProductCreator;
pub use woocommerce::{WooCommerceConfig, WooCommerceProductCreator};
