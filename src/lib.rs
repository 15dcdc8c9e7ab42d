pub mod adapters;
pub mod api;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use api::{build_router, AppState};
pub use config::{AppConfig, CliConfig};
pub use core::eligibility::{classify_eligibility, DEFAULT_MIN_SHELF_LIFE_DAYS};
pub use core::gs1::{decode_gs1, decode_gs1_with, Gs1DecodeOptions};
pub use core::scan::ScanService;
pub use utils::error::{AppError, Result};
