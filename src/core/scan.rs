use chrono::NaiveDate;

use crate::core::eligibility::classify_eligibility;
use crate::core::gs1::{decode_gs1_with, Gs1DecodeOptions};
use crate::domain::model::{NewInventoryItem, ScanOutcome, NOT_AVAILABLE};
use crate::domain::ports::{DrugNameService, InventoryStore, ProductLookup};
use crate::utils::error::{AppError, Result};

const UNKNOWN_PRODUCT: &str = "Unknown";

/// Drives a single intake scan end to end: decode the barcode, resolve and
/// standardize the product name, classify recycling eligibility and persist
/// the flattened record.
pub struct ScanService<S: InventoryStore, D: DrugNameService, P: ProductLookup> {
    store: S,
    drug_names: D,
    products: P,
    min_shelf_life_days: i64,
    gs1_options: Gs1DecodeOptions,
}

impl<S: InventoryStore, D: DrugNameService, P: ProductLookup> ScanService<S, D, P> {
    pub fn new(
        store: S,
        drug_names: D,
        products: P,
        min_shelf_life_days: i64,
        gs1_options: Gs1DecodeOptions,
    ) -> Self {
        Self {
            store,
            drug_names,
            products,
            min_shelf_life_days,
            gs1_options,
        }
    }

    pub async fn process_scan(
        &self,
        raw_barcode: &str,
        is_sealed: bool,
        name_hint: Option<&str>,
        today: NaiveDate,
    ) -> Result<ScanOutcome> {
        let record = decode_gs1_with(raw_barcode, &self.gs1_options);
        tracing::debug!(
            "Decoded barcode: expiry={:?} batch={} gtin={:?}",
            record.expiry_date_full,
            record.batch,
            record.gtin
        );

        let expiry_date = record
            .expiry_date_full
            .ok_or_else(|| AppError::ValidationError {
                message: "Barcode invalid or Expiry Date not found (AI 17).".to_string(),
            })?;

        let (name, rxcui) = self.resolve_name(name_hint, record.gtin.as_deref()).await;

        let verdict =
            classify_eligibility(&expiry_date, is_sealed, today, self.min_shelf_life_days)?;
        let message = format!(
            "{} (RxCUI: {}) Batch {}: {}",
            name, rxcui, record.batch, verdict.message
        );

        let item = NewInventoryItem {
            gtin: record.gtin.clone(),
            name: name.clone(),
            rxcui: rxcui.clone(),
            batch: record.batch.clone(),
            expiry_date: expiry_date.clone(),
            is_sealed,
            status: verdict.status,
        };
        let id = self.store.insert(&item).await?;
        tracing::debug!("Stored inventory record #{} as {:?}", id, verdict.status);

        Ok(ScanOutcome {
            name,
            rxcui,
            gtin: record.gtin,
            batch: record.batch,
            expiry_date,
            status: verdict.status,
            remaining_days: verdict.remaining_days,
            message,
        })
    }

    /// Product name resolution: an explicit hint from the caller beats the
    /// local catalog; whichever we have goes through RxNorm. A pack we cannot
    /// name at all skips the RxNorm round-trip entirely.
    async fn resolve_name(&self, name_hint: Option<&str>, gtin: Option<&str>) -> (String, String) {
        let hint = name_hint
            .map(str::to_string)
            .or_else(|| gtin.and_then(|g| self.products.name_for(g)));

        let hint = match hint {
            Some(hint) => hint,
            None => return (UNKNOWN_PRODUCT.to_string(), NOT_AVAILABLE.to_string()),
        };

        match self.drug_names.standardize(&hint).await {
            Ok(Some(concept)) => (concept.name, concept.rxcui),
            Ok(None) => {
                tracing::warn!("No RxNorm concept for '{}', keeping scanned name", hint);
                (hint, NOT_AVAILABLE.to_string())
            }
            Err(e) => {
                tracing::warn!("RxNorm standardization failed: {}", e);
                (hint, NOT_AVAILABLE.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{DrugConcept, EligibilityStatus, InventoryItem};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone, Default)]
    struct MockStore {
        items: Arc<Mutex<Vec<NewInventoryItem>>>,
    }

    #[async_trait]
    impl InventoryStore for MockStore {
        async fn insert(&self, item: &NewInventoryItem) -> crate::utils::error::Result<i64> {
            let mut items = self.items.lock().await;
            items.push(item.clone());
            Ok(items.len() as i64)
        }

        async fn list(
            &self,
            _status: Option<EligibilityStatus>,
        ) -> crate::utils::error::Result<Vec<InventoryItem>> {
            Ok(Vec::new())
        }
    }

    enum MockNames {
        Match(DrugConcept),
        NoMatch,
        Unavailable,
    }

    #[async_trait]
    impl DrugNameService for MockNames {
        async fn standardize(
            &self,
            _name: &str,
        ) -> crate::utils::error::Result<Option<DrugConcept>> {
            match self {
                MockNames::Match(concept) => Ok(Some(concept.clone())),
                MockNames::NoMatch => Ok(None),
                MockNames::Unavailable => Err(AppError::UpstreamUnavailable {
                    service: "RxNorm".to_string(),
                    reason: "HTTP 503".to_string(),
                }),
            }
        }
    }

    struct MockCatalog(HashMap<String, String>);

    impl ProductLookup for MockCatalog {
        fn name_for(&self, gtin: &str) -> Option<String> {
            self.0.get(gtin).cloned()
        }
    }

    fn catalog_with_default_gtin() -> MockCatalog {
        let mut products = HashMap::new();
        products.insert(
            "00012345678905".to_string(),
            "Paracetamol 500mg".to_string(),
        );
        MockCatalog(products)
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    #[tokio::test]
    async fn test_scan_persists_flattened_record() {
        let store = MockStore::default();
        let names = MockNames::Match(DrugConcept {
            name: "acetaminophen 500 MG Oral Tablet".to_string(),
            rxcui: "198440".to_string(),
        });
        let service = ScanService::new(
            store.clone(),
            names,
            catalog_with_default_gtin(),
            180,
            Gs1DecodeOptions::default(),
        );

        let outcome = service
            .process_scan(
                "(01)00012345678905(17)251231(10)ABC123",
                true,
                None,
                today(),
            )
            .await
            .unwrap();

        assert_eq!(outcome.status, EligibilityStatus::ReadyForRecycle);
        assert_eq!(outcome.name, "acetaminophen 500 MG Oral Tablet");
        assert_eq!(outcome.rxcui, "198440");
        assert!(outcome.message.starts_with(
            "acetaminophen 500 MG Oral Tablet (RxCUI: 198440) Batch ABC123: ✅ READY FOR RECYCLING!"
        ));

        let items = store.items.lock().await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].gtin.as_deref(), Some("00012345678905"));
        assert_eq!(items[0].expiry_date, "20251231");
        assert_eq!(items[0].batch, "ABC123");
        assert!(items[0].is_sealed);
        assert_eq!(items[0].status, EligibilityStatus::ReadyForRecycle);
    }

    #[tokio::test]
    async fn test_scan_without_expiry_is_validation_error() {
        let store = MockStore::default();
        let service = ScanService::new(
            store.clone(),
            MockNames::NoMatch,
            MockCatalog(HashMap::new()),
            180,
            Gs1DecodeOptions::default(),
        );

        let err = service
            .process_scan("(01)00012345678905(10)B1", true, None, today())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError { .. }));
        assert_eq!(
            err.to_string(),
            "Validation error: Barcode invalid or Expiry Date not found (AI 17)."
        );

        // Nothing may be persisted for a rejected scan.
        assert!(store.items.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_upstream_failure_falls_back_to_scanned_name() {
        let service = ScanService::new(
            MockStore::default(),
            MockNames::Unavailable,
            catalog_with_default_gtin(),
            180,
            Gs1DecodeOptions::default(),
        );

        let outcome = service
            .process_scan("(01)00012345678905(17)251231", true, None, today())
            .await
            .unwrap();

        assert_eq!(outcome.name, "Paracetamol 500mg");
        assert_eq!(outcome.rxcui, "N/A");
    }

    #[tokio::test]
    async fn test_name_hint_beats_catalog() {
        let service = ScanService::new(
            MockStore::default(),
            MockNames::NoMatch,
            catalog_with_default_gtin(),
            180,
            Gs1DecodeOptions::default(),
        );

        let outcome = service
            .process_scan(
                "(01)00012345678905(17)251231",
                true,
                Some("Ibuprofen 200mg"),
                today(),
            )
            .await
            .unwrap();

        assert_eq!(outcome.name, "Ibuprofen 200mg");
        assert_eq!(outcome.rxcui, "N/A");
    }

    #[tokio::test]
    async fn test_unnamed_pack_skips_standardization() {
        // Upstream would fail; the service must not call it without a name.
        let service = ScanService::new(
            MockStore::default(),
            MockNames::Unavailable,
            MockCatalog(HashMap::new()),
            180,
            Gs1DecodeOptions::default(),
        );

        let outcome = service
            .process_scan("(17)251231(10)L7", false, None, today())
            .await
            .unwrap();

        assert_eq!(outcome.name, "Unknown");
        assert_eq!(outcome.rxcui, "N/A");
        assert_eq!(outcome.status, EligibilityStatus::UnsealedDisposal);
        assert_eq!(
            outcome.message,
            "Unknown (RxCUI: N/A) Batch L7: ⚠️ UNSEALED. Disposal required, ineligible for recycling."
        );
    }
}
