use crate::domain::model::{
    DrugConcept, EligibilityStatus, InventoryItem, NewInventoryItem, UrlReport,
};
use crate::utils::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait InventoryStore: Send + Sync {
    async fn insert(&self, item: &NewInventoryItem) -> Result<i64>;
    async fn list(&self, status: Option<EligibilityStatus>) -> Result<Vec<InventoryItem>>;
}

#[async_trait]
pub trait DrugNameService: Send + Sync {
    /// Standardize a free-text drug name. `Ok(None)` means the service
    /// answered but had no matching concept.
    async fn standardize(&self, name: &str) -> Result<Option<DrugConcept>>;
}

#[async_trait]
pub trait UrlScanner: Send + Sync {
    async fn analyze(&self, url: &str) -> Result<UrlReport>;
}

/// Local GTIN → product-name table. Synchronous on purpose: lookups never
/// leave the process.
pub trait ProductLookup: Send + Sync {
    fn name_for(&self, gtin: &str) -> Option<String>;
}
