//! Local GTIN → product-name catalog, loaded from a TOML `[products]` table.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::domain::ports::ProductLookup;
use crate::utils::error::{AppError, Result};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductCatalog {
    #[serde(default)]
    products: HashMap<String, String>,
}

impl ProductCatalog {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| AppError::ConfigError {
            message: format!("Catalog parsing error: {}", e),
        })
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl ProductLookup for ProductCatalog {
    fn name_for(&self, gtin: &str) -> Option<String> {
        self.products.get(gtin).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_catalog_and_lookup() {
        let catalog = ProductCatalog::from_toml_str(
            r#"
[products]
"00012345678905" = "Paracetamol 500mg Tablets"
"09876543210982" = "Ibuprofen 200mg Capsules"
"#,
        )
        .unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(
            catalog.name_for("00012345678905").as_deref(),
            Some("Paracetamol 500mg Tablets")
        );
        assert_eq!(catalog.name_for("11111111111111"), None);
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = ProductCatalog::from_toml_str("").unwrap();
        assert!(catalog.is_empty());
        assert_eq!(catalog.name_for("00012345678905"), None);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = ProductCatalog::from_toml_str("not valid [ toml").unwrap_err();
        assert!(matches!(err, AppError::ConfigError { .. }));
    }
}
