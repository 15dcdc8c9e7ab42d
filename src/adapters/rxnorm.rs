//! RxNorm terminology client: a thin request/response wrapper around
//! `GET {base}/drugs.json?name=...`. No retry or backoff; the scan flow
//! degrades gracefully when standardization is unavailable.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::domain::model::DrugConcept;
use crate::domain::ports::DrugNameService;
use crate::utils::error::{AppError, Result};

pub struct RxNormClient {
    client: Client,
    base_url: String,
}

impl RxNormClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl DrugNameService for RxNormClient {
    async fn standardize(&self, name: &str) -> Result<Option<DrugConcept>> {
        let url = format!("{}/drugs.json", self.base_url);
        tracing::debug!("Querying RxNorm for '{}'", name);

        let response = self.client.get(&url).query(&[("name", name)]).send().await?;
        if !response.status().is_success() {
            return Err(AppError::UpstreamUnavailable {
                service: "RxNorm".to_string(),
                reason: format!("HTTP {}", response.status()),
            });
        }

        let data: Value = response.json().await?;
        Ok(first_concept(&data))
    }
}

/// Walk `drugGroup.conceptGroup[*].conceptProperties[0]`. Concept groups
/// without properties (term-type buckets RxNorm returns empty) are skipped.
fn first_concept(data: &Value) -> Option<DrugConcept> {
    let groups = data.get("drugGroup")?.get("conceptGroup")?.as_array()?;
    groups.iter().find_map(|group| {
        let first = group.get("conceptProperties")?.as_array()?.first()?;
        Some(DrugConcept {
            name: first.get("name")?.as_str()?.to_string(),
            rxcui: first.get("rxcui")?.as_str()?.to_string(),
        })
    })
}
