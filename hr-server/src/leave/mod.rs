//! Vacation-day accounting
//!
//! Pure rules for the vacation ledger: inclusive day counts, the clamped
//! remaining-day balance, and the request status machine. Aggregation over
//! stored requests lives in [`crate::db::repository::vacation`]; handlers
//! combine the two.
//!
//! Two distinct usage aggregates exist on purpose (they diverge in whether
//! `completed` requests count) and both are preserved as named queries in the
//! repository rather than unified; see the repository module docs.

use chrono::NaiveDate;
use shared::error::ErrorCode;
use shared::models::VacationStatus;

use crate::db::repository::{RepoError, RepoResult};

/// Inclusive day count of a date range: `(end - start).days + 1`.
///
/// Fails when the end date is not strictly after the start date.
pub fn requested_day_count(start: NaiveDate, end: NaiveDate) -> RepoResult<i64> {
    if end <= start {
        return Err(RepoError::Business(
            ErrorCode::InvalidDateRange,
            "End date must be after start date".into(),
        ));
    }
    Ok((end - start).num_days() + 1)
}

/// Days still available given an annual allotment and days already used.
/// Clamped at zero - never negative.
pub fn remaining(allotment: i64, used: i64) -> i64 {
    (allotment - used).max(0)
}

/// First and last day of a calendar year, for `start_date` range filters.
pub fn year_bounds(year: i32) -> (NaiveDate, NaiveDate) {
    // Both unwraps are infallible for Jan 1 / Dec 31 of any supported year.
    (
        NaiveDate::from_ymd_opt(year, 1, 1).expect("valid date"),
        NaiveDate::from_ymd_opt(year, 12, 31).expect("valid date"),
    )
}

/// Action requested on a pending vacation request (path parameter).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionAction {
    Approve,
    Reject,
}

impl DecisionAction {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "approve" => Some(Self::Approve),
            "reject" => Some(Self::Reject),
            _ => None,
        }
    }

    pub fn target_status(self) -> VacationStatus {
        match self {
            Self::Approve => VacationStatus::Approved,
            Self::Reject => VacationStatus::Rejected,
        }
    }

    pub fn success_message(self) -> &'static str {
        match self {
            Self::Approve => "Vacation request approved",
            Self::Reject => "Vacation request rejected",
        }
    }
}

/// Result of applying a decision to a request's current status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The request moves to the new status (approver and timestamp recorded
    /// by the caller).
    Applied(VacationStatus),
    /// The request was already decided; state unchanged, surfaced to the
    /// caller as a warning rather than an error.
    AlreadyDecided(VacationStatus),
}

/// Status machine: `pending -> approved` and `pending -> rejected` only.
/// Any other starting state is a no-op.
pub fn apply_decision(current: VacationStatus, action: DecisionAction) -> Transition {
    if current.is_pending() {
        Transition::Applied(action.target_status())
    } else {
        Transition::AlreadyDecided(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn day_count_is_inclusive() {
        assert_eq!(
            requested_day_count(date(2024, 1, 1), date(2024, 1, 5)).unwrap(),
            5
        );
        assert_eq!(
            requested_day_count(date(2024, 1, 1), date(2024, 1, 2)).unwrap(),
            2
        );
        // Across a month boundary
        assert_eq!(
            requested_day_count(date(2024, 2, 26), date(2024, 3, 3)).unwrap(),
            7
        );
    }

    #[test]
    fn day_count_rejects_non_positive_ranges() {
        let equal = requested_day_count(date(2024, 1, 5), date(2024, 1, 5));
        assert!(matches!(
            equal,
            Err(RepoError::Business(ErrorCode::InvalidDateRange, _))
        ));

        let inverted = requested_day_count(date(2024, 1, 5), date(2024, 1, 1));
        assert!(inverted.is_err());
    }

    #[test]
    fn remaining_never_negative() {
        assert_eq!(remaining(15, 0), 15);
        assert_eq!(remaining(15, 10), 5);
        assert_eq!(remaining(15, 15), 0);
        assert_eq!(remaining(15, 17), 0);
        assert_eq!(remaining(15, 1000), 0);
    }

    #[test]
    fn year_bounds_cover_full_year() {
        let (start, end) = year_bounds(2024);
        assert_eq!(start, date(2024, 1, 1));
        assert_eq!(end, date(2024, 12, 31));
    }

    #[test]
    fn pending_requests_can_be_decided_once() {
        assert_eq!(
            apply_decision(VacationStatus::Pending, DecisionAction::Approve),
            Transition::Applied(VacationStatus::Approved)
        );
        assert_eq!(
            apply_decision(VacationStatus::Pending, DecisionAction::Reject),
            Transition::Applied(VacationStatus::Rejected)
        );
    }

    #[test]
    fn decided_requests_stay_unchanged() {
        for status in [
            VacationStatus::Approved,
            VacationStatus::Rejected,
            VacationStatus::InProgress,
            VacationStatus::Completed,
        ] {
            assert_eq!(
                apply_decision(status, DecisionAction::Approve),
                Transition::AlreadyDecided(status)
            );
            assert_eq!(
                apply_decision(status, DecisionAction::Reject),
                Transition::AlreadyDecided(status)
            );
        }
    }

    #[test]
    fn action_parsing_matches_path_parameters() {
        assert_eq!(DecisionAction::parse("approve"), Some(DecisionAction::Approve));
        assert_eq!(DecisionAction::parse("reject"), Some(DecisionAction::Reject));
        assert_eq!(DecisionAction::parse("cancel"), None);
    }
}
