//! VirusTotal URL analysis client.
//!
//! Submit-then-fetch wrapper over the v3 API: `POST /urls` queues the scan,
//! and after a short delay the aggregated verdict is read back from
//! `GET /urls/{id}` where `id` is the base64url (unpadded) form of the URL.

use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use reqwest::Client;
use serde_json::Value;

use crate::domain::model::{SafetyLevel, UrlReport};
use crate::domain::ports::UrlScanner;
use crate::utils::error::{AppError, Result};

pub struct VirusTotalClient {
    client: Client,
    base_url: String,
    api_key: String,
    poll_delay: Duration,
}

impl VirusTotalClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
        poll_delay: Duration,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            poll_delay,
        })
    }

    fn url_id(url: &str) -> String {
        URL_SAFE_NO_PAD.encode(url.as_bytes())
    }
}

#[async_trait]
impl UrlScanner for VirusTotalClient {
    async fn analyze(&self, url: &str) -> Result<UrlReport> {
        if self.api_key.trim().is_empty() {
            return Err(AppError::MissingConfigError {
                field: "virustotal.api_key".to_string(),
            });
        }

        tracing::debug!("Submitting URL to VirusTotal");
        let submit = self
            .client
            .post(format!("{}/urls", self.base_url))
            .header("x-apikey", &self.api_key)
            .form(&[("url", url)])
            .send()
            .await
            .map_err(|e| upstream(format!("submission failed: {}", e)))?;
        if !submit.status().is_success() {
            return Err(upstream(format!(
                "submission returned HTTP {}",
                submit.status()
            )));
        }

        // The analysis is not retrievable immediately after submission.
        tokio::time::sleep(self.poll_delay).await;

        let response = self
            .client
            .get(format!("{}/urls/{}", self.base_url, Self::url_id(url)))
            .header("x-apikey", &self.api_key)
            .send()
            .await
            .map_err(|e| upstream(format!("analysis fetch failed: {}", e)))?;
        if !response.status().is_success() {
            return Err(upstream(format!(
                "analysis returned HTTP {}",
                response.status()
            )));
        }

        let data: Value = response
            .json()
            .await
            .map_err(|e| upstream(format!("analysis body unreadable: {}", e)))?;

        report_from_analysis(url, &data)
            .ok_or_else(|| upstream("malformed analysis response".to_string()))
    }
}

fn upstream(reason: String) -> AppError {
    AppError::UpstreamUnavailable {
        service: "VirusTotal".to_string(),
        reason,
    }
}

fn report_from_analysis(url: &str, data: &Value) -> Option<UrlReport> {
    let attributes = data.get("data")?.get("attributes")?;
    let stats = attributes.get("last_analysis_stats")?;

    let count = |key: &str| stats.get(key).and_then(Value::as_u64).unwrap_or(0);
    let malicious = count("malicious");
    let suspicious = count("suspicious");
    let harmless = count("harmless");
    let undetected = count("undetected");

    let details = attributes
        .get("last_analysis_results")
        .cloned()
        .unwrap_or_else(|| Value::Object(Default::default()));
    let total = details.as_object().map(|m| m.len() as u64).unwrap_or(0);

    let safety_level = if malicious > 0 || suspicious > 2 {
        SafetyLevel::Dangerous
    } else if suspicious > 0 {
        SafetyLevel::Suspicious
    } else {
        SafetyLevel::Safe
    };

    Some(UrlReport {
        url: url.to_string(),
        malicious,
        suspicious,
        harmless,
        undetected,
        total,
        details,
        safety_level,
    })
}
