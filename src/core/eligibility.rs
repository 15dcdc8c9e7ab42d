//! Recycling-eligibility decision for a scanned medicine pack.

use chrono::NaiveDate;

use crate::domain::model::{EligibilityResult, EligibilityStatus};
use crate::utils::error::{AppError, Result};

/// Minimum remaining shelf life (in days) the take-back program requires
/// before a pack can be returned for recycling.
pub const DEFAULT_MIN_SHELF_LIFE_DAYS: i64 = 180;

const EXPIRY_DATE_FORMAT: &str = "%Y%m%d";

/// Classify a pack given its expiry date (`YYYYMMDD`), seal state and the
/// caller's notion of "today".
///
/// The branches are evaluated in priority order: expiry first, then the seal
/// check. An unsealed-and-expired pack therefore reports `Expired`, not
/// `UnsealedDisposal`; the expiry verdict carries the stricter disposal
/// obligation.
pub fn classify_eligibility(
    expiry_date_full: &str,
    is_sealed: bool,
    today: NaiveDate,
    min_shelf_life_days: i64,
) -> Result<EligibilityResult> {
    let expiry =
        NaiveDate::parse_from_str(expiry_date_full, EXPIRY_DATE_FORMAT).map_err(|_| {
            AppError::ValidationError {
                message: format!(
                    "Invalid expiry date '{}': expected a calendar date in YYYYMMDD form",
                    expiry_date_full
                ),
            }
        })?;

    let remaining_days = (expiry - today).num_days();

    let status = if remaining_days < 0 {
        EligibilityStatus::Expired
    } else if !is_sealed {
        EligibilityStatus::UnsealedDisposal
    } else if remaining_days >= min_shelf_life_days {
        EligibilityStatus::ReadyForRecycle
    } else {
        EligibilityStatus::Available
    };

    let message = match status {
        EligibilityStatus::Expired => "❌ EXPIRED. Must be disposed.".to_string(),
        EligibilityStatus::UnsealedDisposal => {
            "⚠️ UNSEALED. Disposal required, ineligible for recycling.".to_string()
        }
        EligibilityStatus::ReadyForRecycle => format!(
            "✅ READY FOR RECYCLING! Expires {}. Meets {}-day minimum.",
            expiry_date_full, min_shelf_life_days
        ),
        EligibilityStatus::Available => format!(
            "⏳ VALID, but insufficient time for recycling ({} days left).",
            remaining_days
        ),
    };

    Ok(EligibilityResult {
        status,
        remaining_days,
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_past_expiry_is_expired() {
        let result =
            classify_eligibility("20240101", true, date(2024, 6, 1), DEFAULT_MIN_SHELF_LIFE_DAYS)
                .unwrap();
        assert_eq!(result.status, EligibilityStatus::Expired);
        assert!(result.remaining_days < 0);
        assert_eq!(result.message, "❌ EXPIRED. Must be disposed.");
    }

    #[test]
    fn test_expired_wins_over_unsealed() {
        // Deliberate tie-break: the expiry check runs before the seal check.
        let result =
            classify_eligibility("20240101", false, date(2024, 6, 1), DEFAULT_MIN_SHELF_LIFE_DAYS)
                .unwrap();
        assert_eq!(result.status, EligibilityStatus::Expired);
    }

    #[test]
    fn test_unsealed_wins_over_sufficient_shelf_life() {
        // 200 days out, but opened packaging disqualifies recycling.
        let result =
            classify_eligibility("20240719", false, date(2024, 1, 1), DEFAULT_MIN_SHELF_LIFE_DAYS)
                .unwrap();
        assert_eq!(result.status, EligibilityStatus::UnsealedDisposal);
        assert_eq!(result.remaining_days, 200);
        assert_eq!(
            result.message,
            "⚠️ UNSEALED. Disposal required, ineligible for recycling."
        );
    }

    #[test]
    fn test_sealed_with_sufficient_shelf_life_is_ready() {
        let result =
            classify_eligibility("20240719", true, date(2024, 1, 1), DEFAULT_MIN_SHELF_LIFE_DAYS)
                .unwrap();
        assert_eq!(result.status, EligibilityStatus::ReadyForRecycle);
        assert_eq!(result.remaining_days, 200);
        assert_eq!(
            result.message,
            "✅ READY FOR RECYCLING! Expires 20240719. Meets 180-day minimum."
        );
    }

    #[test]
    fn test_sealed_with_short_shelf_life_is_available() {
        let result =
            classify_eligibility("20240131", true, date(2024, 1, 1), DEFAULT_MIN_SHELF_LIFE_DAYS)
                .unwrap();
        assert_eq!(result.status, EligibilityStatus::Available);
        assert_eq!(result.remaining_days, 30);
        assert_eq!(
            result.message,
            "⏳ VALID, but insufficient time for recycling (30 days left)."
        );
    }

    #[test]
    fn test_threshold_boundary_is_inclusive() {
        // Exactly the minimum qualifies.
        let result = classify_eligibility("20240111", true, date(2024, 1, 1), 10).unwrap();
        assert_eq!(result.remaining_days, 10);
        assert_eq!(result.status, EligibilityStatus::ReadyForRecycle);

        let result = classify_eligibility("20240110", true, date(2024, 1, 1), 10).unwrap();
        assert_eq!(result.remaining_days, 9);
        assert_eq!(result.status, EligibilityStatus::Available);
    }

    #[test]
    fn test_expiring_today_is_not_expired() {
        let result =
            classify_eligibility("20240601", true, date(2024, 6, 1), DEFAULT_MIN_SHELF_LIFE_DAYS)
                .unwrap();
        assert_eq!(result.status, EligibilityStatus::Available);
        assert_eq!(result.remaining_days, 0);
    }

    #[test]
    fn test_threshold_is_injected() {
        let result = classify_eligibility("20240131", true, date(2024, 1, 1), 14).unwrap();
        assert_eq!(result.status, EligibilityStatus::ReadyForRecycle);
        assert_eq!(
            result.message,
            "✅ READY FOR RECYCLING! Expires 20240131. Meets 14-day minimum."
        );
    }

    #[test]
    fn test_unparseable_date_is_validation_error() {
        let err = classify_eligibility("2024-01-01", true, date(2024, 1, 1), 180).unwrap_err();
        assert!(matches!(err, AppError::ValidationError { .. }));

        // Eight digits that are not a real calendar date.
        let err = classify_eligibility("20241332", true, date(2024, 1, 1), 180).unwrap_err();
        assert!(matches!(err, AppError::ValidationError { .. }));
    }
}
