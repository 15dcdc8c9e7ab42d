use serde::{Deserialize, Serialize};

/// Sentinel for fields the barcode or an upstream lookup could not provide.
pub const NOT_AVAILABLE: &str = "N/A";

/// Fields decoded from a GS1 element string.
///
/// `expiry_date_full` is `None` whenever the AI-17 element is absent or
/// malformed; the decoder never guesses a partial date. `batch` falls back to
/// [`NOT_AVAILABLE`] when AI-10 is missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Gs1Record {
    pub expiry_date_full: Option<String>,
    pub batch: String,
    pub gtin: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EligibilityStatus {
    Expired,
    UnsealedDisposal,
    ReadyForRecycle,
    Available,
}

impl EligibilityStatus {
    pub fn as_db_str(&self) -> &'static str {
        match self {
            EligibilityStatus::Expired => "expired",
            EligibilityStatus::UnsealedDisposal => "unsealed_disposal",
            EligibilityStatus::ReadyForRecycle => "ready_for_recycle",
            EligibilityStatus::Available => "available",
        }
    }

    pub fn from_db_str(raw: &str) -> Option<Self> {
        match raw {
            "expired" => Some(EligibilityStatus::Expired),
            "unsealed_disposal" => Some(EligibilityStatus::UnsealedDisposal),
            "ready_for_recycle" => Some(EligibilityStatus::ReadyForRecycle),
            "available" => Some(EligibilityStatus::Available),
            _ => None,
        }
    }
}

/// Outcome of the recycling-eligibility decision for a single scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EligibilityResult {
    pub status: EligibilityStatus,
    pub remaining_days: i64,
    pub message: String,
}

/// A standardized drug concept from the RxNorm terminology service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrugConcept {
    pub name: String,
    pub rxcui: String,
}

/// Flattened record handed to the inventory store after a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInventoryItem {
    pub gtin: Option<String>,
    pub name: String,
    pub rxcui: String,
    pub batch: String,
    pub expiry_date: String,
    pub is_sealed: bool,
    pub status: EligibilityStatus,
}

/// Inventory row as persisted. `status` is kept as the stored text so rows
/// written by older schema revisions still list cleanly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryItem {
    pub id: i64,
    pub gtin: Option<String>,
    pub name: String,
    pub rxcui: String,
    pub batch: String,
    pub expiry_date: String,
    pub is_sealed: bool,
    pub status: String,
}

/// Full response returned to the scanner frontend after processing a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanOutcome {
    pub name: String,
    pub rxcui: String,
    pub gtin: Option<String>,
    pub batch: String,
    pub expiry_date: String,
    pub status: EligibilityStatus,
    pub remaining_days: i64,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SafetyLevel {
    Safe,
    Suspicious,
    Dangerous,
}

/// Aggregated URL analysis relayed from the scanning service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UrlReport {
    pub url: String,
    pub malicious: u64,
    pub suspicious: u64,
    pub harmless: u64,
    pub undetected: u64,
    pub total: u64,
    pub details: serde_json::Value,
    pub safety_level: SafetyLevel,
}
