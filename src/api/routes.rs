//! HTTP endpoints and router.
//!
//! "Today" is read from the wall clock here, at the boundary, and injected
//! into the core. The decision logic never touches the system clock.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::adapters::lookup::ProductCatalog;
use crate::adapters::rxnorm::RxNormClient;
use crate::adapters::sqlite::SqliteInventory;
use crate::adapters::virustotal::VirusTotalClient;
use crate::core::gs1::{decode_gs1_with, Gs1DecodeOptions};
use crate::core::scan::ScanService;
use crate::domain::model::{EligibilityStatus, InventoryItem, ScanOutcome, UrlReport};
use crate::domain::ports::{InventoryStore, ProductLookup, UrlScanner};
use crate::utils::error::{AppError, Result};

#[derive(Clone)]
pub struct AppState {
    pub inventory: SqliteInventory,
    pub scans: Arc<ScanService<SqliteInventory, RxNormClient, ProductCatalog>>,
    pub url_scanner: Arc<VirusTotalClient>,
    pub catalog: Arc<ProductCatalog>,
    pub min_shelf_life_days: i64,
    pub gs1_options: Gs1DecodeOptions,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/scan_data", post(scan_data))
        .route("/scan_barcode", post(scan_barcode))
        .route("/manifest", get(manifest))
        .route("/inventory", get(inventory))
        .route("/api/check-url", post(check_url))
        .with_state(state)
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Debug, Deserialize)]
pub struct ScanRequest {
    #[serde(default)]
    pub barcode: String,
    #[serde(default)]
    pub is_sealed: bool,
    /// Optional product name from the frontend, used when the GTIN is not in
    /// the local catalog.
    #[serde(default)]
    pub name: Option<String>,
}

/// `POST /scan_data` — full intake scan: decode, standardize, classify,
/// persist.
async fn scan_data(
    State(state): State<AppState>,
    Json(request): Json<ScanRequest>,
) -> Result<Json<ScanOutcome>> {
    let today = Local::now().date_naive();
    let outcome = state
        .scans
        .process_scan(
            &request.barcode,
            request.is_sealed,
            request.name.as_deref(),
            today,
        )
        .await?;
    tracing::info!(
        "Scan processed: {:?} ({} days remaining)",
        outcome.status,
        outcome.remaining_days
    );
    Ok(Json(outcome))
}

#[derive(Debug, Deserialize)]
pub struct BarcodeLookupRequest {
    #[serde(default)]
    pub barcode: String,
}

#[derive(Serialize)]
pub struct BarcodeLookupResponse {
    pub name: String,
    pub expiry_date: String,
    pub status: &'static str,
}

/// `POST /scan_barcode` — lightweight lookup for the handheld scanner:
/// product name from the local catalog plus a valid/expired verdict. Nothing
/// is persisted.
async fn scan_barcode(
    State(state): State<AppState>,
    Json(request): Json<BarcodeLookupRequest>,
) -> Result<Json<BarcodeLookupResponse>> {
    let record = decode_gs1_with(&request.barcode, &state.gs1_options);
    let expiry_date = record
        .expiry_date_full
        .ok_or_else(|| AppError::ValidationError {
            message: "Barcode invalid or Expiry Date not found (AI 17).".to_string(),
        })?;

    let expiry = NaiveDate::parse_from_str(&expiry_date, "%Y%m%d").map_err(|_| {
        AppError::ValidationError {
            message: format!("Invalid expiry date '{}' in barcode", expiry_date),
        }
    })?;

    let name = record
        .gtin
        .as_deref()
        .and_then(|gtin| state.catalog.name_for(gtin))
        .unwrap_or_else(|| "Unknown product".to_string());

    let today = Local::now().date_naive();
    let status = if expiry < today { "expired" } else { "valid" };

    Ok(Json(BarcodeLookupResponse {
        name,
        expiry_date,
        status,
    }))
}

#[derive(Serialize)]
pub struct ManifestResponse {
    pub items: Vec<InventoryItem>,
    pub min_days: i64,
}

/// `GET /manifest` — packs ready to be transferred back to the manufacturer.
async fn manifest(State(state): State<AppState>) -> Result<Json<ManifestResponse>> {
    let items = state
        .inventory
        .list(Some(EligibilityStatus::ReadyForRecycle))
        .await?;
    Ok(Json(ManifestResponse {
        items,
        min_days: state.min_shelf_life_days,
    }))
}

#[derive(Debug, Deserialize)]
pub struct InventoryQuery {
    pub status: Option<String>,
}

/// `GET /inventory` — all records, optionally `?status=<status>`.
async fn inventory(
    State(state): State<AppState>,
    Query(query): Query<InventoryQuery>,
) -> Result<Json<Vec<InventoryItem>>> {
    let status = match query.status.as_deref() {
        Some(raw) => Some(EligibilityStatus::from_db_str(raw).ok_or_else(|| {
            AppError::ValidationError {
                message: format!("Unknown status '{}'", raw),
            }
        })?),
        None => None,
    };
    Ok(Json(state.inventory.list(status).await?))
}

#[derive(Debug, Deserialize)]
pub struct CheckUrlRequest {
    #[serde(default)]
    pub url: String,
}

/// `POST /api/check-url` — relay a URL to the scanning service and return
/// the aggregated verdict.
async fn check_url(
    State(state): State<AppState>,
    Json(request): Json<CheckUrlRequest>,
) -> Result<Json<UrlReport>> {
    let url = request.url.trim();
    if url.is_empty() {
        return Err(AppError::ValidationError {
            message: "Please enter a URL to check".to_string(),
        });
    }
    let report = state.url_scanner.analyze(url).await?;
    tracing::info!("URL check verdict: {:?}", report.safety_level);
    Ok(Json(report))
}
