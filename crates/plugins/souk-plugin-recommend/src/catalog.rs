//! Catalog persistence
//!
//! The catalog is a JSON array of products, loaded once at startup and
//! rewritten wholesale on every boost update. The overwrite is not
//! transactional; concurrent writers race and the last one wins.

use std::fs;
use std::path::Path;

use souk_core::{Product, Result, SoukError};

/// An in-memory product catalog
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog from already-loaded products
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// Load a catalog from a JSON array file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = fs::read_to_string(path.as_ref()).map_err(|e| {
            SoukError::catalog(format!(
                "Failed to read catalog {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        let products: Vec<Product> = serde_json::from_str(&raw).map_err(|e| {
            SoukError::catalog(format!(
                "Failed to parse catalog {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        tracing::info!(
            count = products.len(),
            path = %path.as_ref().display(),
            "Catalog loaded"
        );
        Ok(Self { products })
    }

    /// Persist the full catalog back to disk, pretty-printed
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.products)?;
        fs::write(path.as_ref(), json).map_err(|e| {
            SoukError::persistence(format!(
                "Failed to write catalog {}: {}",
                path.as_ref().display(),
                e
            ))
        })
    }

    /// All products, catalog order
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Mutable product lookup by id
    pub fn product_mut(&mut self, id: u64) -> Option<&mut Product> {
        self.products.iter_mut().find(|p| p.id == id)
    }

    /// Number of products
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// First catalog category appearing (case-insensitively) as a
    /// substring of any of the given messages, scanning messages in order.
    pub fn detect_category(&self, messages: &[String]) -> Option<String> {
        for message in messages {
            let lower = message.to_lowercase();
            for product in &self.products {
                if lower.contains(&product.category.to_lowercase()) {
                    return Some(product.category.clone());
                }
            }
        }
        None
    }
}
