//! Product catalog model and JSON loader.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::path::Path;
use tracing::info;

use crate::text::normalize;

/// Product identifier as it appears in the catalog file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductId {
    Number(u64),
    Text(String),
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => write!(f, "{}", s),
        }
    }
}

/// A single catalog entry.
///
/// Only `name` and `description` take part in search. Fields beyond the four
/// required ones are kept in `extra` and returned to callers untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Product {
    /// Create a product with no extra fields.
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        description: impl Into<String>,
        price: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            price,
            extra: Map::new(),
        }
    }

    /// Normalized `name + " " + description`, the text both indices are built from.
    pub fn searchable_text(&self) -> String {
        normalize(&format!("{} {}", self.name, self.description))
    }
}

impl From<u64> for ProductId {
    fn from(value: u64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for ProductId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ProductId {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Ordered, read-only list of products. A product's position is its identity
/// inside the engine.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// Load a catalog from a JSON array of product records.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog from {:?}", path))?;

        let catalog = Self::from_json(&content)
            .with_context(|| format!("Failed to parse catalog from {:?}", path))?;

        info!(products = catalog.len(), path = %path.display(), "Catalog loaded");
        Ok(catalog)
    }

    /// Parse a catalog from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let products: Vec<Product> = serde_json::from_str(json)?;
        Ok(Self::new(products))
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&Product> {
        self.products.get(position)
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Normalized searchable text of every product, in catalog order.
    pub fn searchable_texts(&self) -> Vec<String> {
        self.products.iter().map(Product::searchable_text).collect()
    }
}
