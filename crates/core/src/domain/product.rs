// Product Domain Model
//
// The product is opaque to the queue; only the producer input and the summary
// returned by the creator are modeled.

use super::error::{DomainError, Result};
use super::ids::ProductId;
use serde::{Deserialize, Serialize};

/// Validated producer input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub name: String,
    pub price: f64,
    pub description: Option<String>,
}

impl ProductDraft {
    /// Sanitize and validate raw form input
    ///
    /// # Errors
    ///
    /// * name empty after sanitizing
    /// * price not a finite number greater than 0
    pub fn parse(name: &str, price: f64, description: Option<&str>) -> Result<Self> {
        let name = sanitize_line(name);
        if name.is_empty() {
            return Err(DomainError::Validation(
                "Product name is required.".to_string(),
            ));
        }

        if !price.is_finite() || price <= 0.0 {
            return Err(DomainError::Validation(
                "Product price must be greater than 0.".to_string(),
            ));
        }

        let description = description
            .map(sanitize_text)
            .filter(|text| !text.is_empty());

        Ok(Self {
            name,
            price,
            description,
        })
    }

    /// Price as the decimal string store APIs expect
    pub fn price_string(&self) -> String {
        self.price.to_string()
    }
}

/// Summary of a product returned by the creator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedProduct {
    pub product_id: ProductId,
    pub name: String,
    pub price: String,
    pub permalink: String,
    pub edit_url: String,
}

// Single-line field: control characters (newlines included) collapse to spaces
fn sanitize_line(raw: &str) -> String {
    raw.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

// Multi-line field: keep newlines, drop other control characters
fn sanitize_text(raw: &str) -> String {
    raw.chars()
        .filter(|c| *c == '\n' || !c.is_control())
        .collect::<String>()
        .trim()
        .to_string()
}
