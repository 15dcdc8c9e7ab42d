pub mod eligibility;
pub mod gs1;
pub mod scan;

pub use crate::domain::model::{EligibilityResult, EligibilityStatus, Gs1Record, ScanOutcome};
pub use crate::domain::ports::{DrugNameService, InventoryStore, ProductLookup, UrlScanner};
pub use crate::utils::error::Result;
