use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{TicketCategory, TicketPriority, TicketStatus};
use crate::Id;

/// Query-string value selecting tickets without an assignee.
pub const UNASSIGNED: &str = "unassigned";

/// Admin filter values as submitted, echoed back into the filter form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TicketFilterParams {
    pub search: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub category: Option<String>,
    pub assigned_to: Option<String>,
    pub month: Option<String>,
    pub year: Option<String>,
}

impl TicketFilterParams {
    /// Trims every value and drops the blank ones.
    pub fn normalized(&self) -> Self {
        fn clean(value: &Option<String>) -> Option<String> {
            value.as_deref().map(str::trim).filter(|v| !v.is_empty()).map(str::to_owned)
        }
        Self {
            search: clean(&self.search),
            status: clean(&self.status),
            priority: clean(&self.priority),
            category: clean(&self.category),
            assigned_to: clean(&self.assigned_to),
            month: clean(&self.month),
            year: clean(&self.year),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssigneeFilter {
    Unassigned,
    Account(Id),
}

/// Creation-time restriction, evaluated as a half-open UTC range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreatedWindow {
    Month { year: i32, month: u32 },
    Year(i32),
}

impl CreatedWindow {
    /// `[start, end)` of the window.
    pub fn bounds(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        match *self {
            CreatedWindow::Month { year, month } => {
                let next = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
                (first_instant(year, month), first_instant(next.0, next.1))
            }
            CreatedWindow::Year(year) => (first_instant(year, 1), first_instant(year + 1, 1)),
        }
    }
}

fn first_instant(year: i32, month: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|d| d.and_utc())
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// `Ok(None)` when absent, `Err` when present but not a known choice.
fn exact<T: FromStr>(raw: Option<&str>) -> Result<Option<T>, ()> {
    raw.map(|r| r.parse().map_err(|_| ())).transpose()
}

const MIN_YEAR: i32 = 1;
const MAX_YEAR: i32 = 9998;

/// Parsed admin filter. Every condition present must hold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketFilter {
    /// Lower-cased substring matched against number, title and both parties' names.
    pub search: Option<String>,
    pub status: Option<TicketStatus>,
    pub priority: Option<TicketPriority>,
    pub category: Option<TicketCategory>,
    pub assignee: Option<AssigneeFilter>,
    pub created: Option<CreatedWindow>,
    /// Set when a status, priority or category value names no known choice.
    /// No ticket can carry such a value, so nothing matches.
    pub matches_nothing: bool,
}

impl TicketFilter {
    /// An unknown status, priority or category still filters and matches
    /// nothing. An unparseable assignee, month or year is ignored.
    pub fn from_params(params: &TicketFilterParams, current_year: i32) -> Self {
        let params = params.normalized();
        let assignee = params.assigned_to.as_deref().and_then(|raw| {
            if raw == UNASSIGNED {
                Some(AssigneeFilter::Unassigned)
            } else {
                raw.parse().ok().map(AssigneeFilter::Account)
            }
        });
        let month = params
            .month
            .as_deref()
            .and_then(|m| m.parse::<u32>().ok())
            .filter(|m| (1..=12).contains(m));
        let year = params
            .year
            .as_deref()
            .and_then(|y| y.parse::<i32>().ok())
            .filter(|y| (MIN_YEAR..=MAX_YEAR).contains(y));
        let created = match (month, year) {
            (Some(month), Some(year)) => Some(CreatedWindow::Month { year, month }),
            (Some(month), None) => Some(CreatedWindow::Month { year: current_year, month }),
            (None, Some(year)) => Some(CreatedWindow::Year(year)),
            (None, None) => None,
        };
        let status = exact::<TicketStatus>(params.status.as_deref());
        let priority = exact::<TicketPriority>(params.priority.as_deref());
        let category = exact::<TicketCategory>(params.category.as_deref());
        let matches_nothing = status.is_err() || priority.is_err() || category.is_err();
        Self {
            search: params.search.map(|s| s.to_lowercase()),
            status: status.unwrap_or_default(),
            priority: priority.unwrap_or_default(),
            category: category.unwrap_or_default(),
            assignee,
            created,
            matches_nothing,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn params() -> TicketFilterParams {
        TicketFilterParams::default()
    }

    #[test]
    fn blank_values_are_absent() {
        let raw = TicketFilterParams {
            search: Some("   ".into()),
            status: Some("".into()),
            ..params()
        };
        assert!(TicketFilter::from_params(&raw, 2025).is_empty());
    }

    #[test]
    fn search_is_trimmed_and_lowercased() {
        let raw = TicketFilterParams { search: Some("  Printer ".into()), ..params() };
        assert_eq!(Some("printer".to_owned()), TicketFilter::from_params(&raw, 2025).search);
    }

    #[test]
    fn unassigned_and_account_ids() {
        let raw = TicketFilterParams { assigned_to: Some("unassigned".into()), ..params() };
        assert_eq!(
            Some(AssigneeFilter::Unassigned),
            TicketFilter::from_params(&raw, 2025).assignee
        );
        let raw = TicketFilterParams { assigned_to: Some("12".into()), ..params() };
        assert_eq!(
            Some(AssigneeFilter::Account(12)),
            TicketFilter::from_params(&raw, 2025).assignee
        );
    }

    #[test]
    fn unparseable_assignee_and_dates_are_ignored() {
        let raw = TicketFilterParams {
            assigned_to: Some("bob".into()),
            month: Some("13".into()),
            year: Some("twenty".into()),
            ..params()
        };
        assert!(TicketFilter::from_params(&raw, 2025).is_empty());
    }

    #[test]
    fn unknown_choice_matches_nothing() {
        let raw = TicketFilterParams {
            status: Some("pending".into()),
            category: Some("printer".into()),
            ..params()
        };
        let filter = TicketFilter::from_params(&raw, 2025);
        assert!(filter.matches_nothing);
        assert!(!filter.is_empty());

        let raw = TicketFilterParams { priority: Some("urgent".into()), ..params() };
        assert!(TicketFilter::from_params(&raw, 2025).matches_nothing);

        let raw = TicketFilterParams { status: Some("closed".into()), ..params() };
        let filter = TicketFilter::from_params(&raw, 2025);
        assert!(!filter.matches_nothing);
        assert_eq!(Some(TicketStatus::Closed), filter.status);
    }

    #[test]
    fn month_without_year_uses_current_year() {
        let raw = TicketFilterParams { month: Some("3".into()), ..params() };
        assert_eq!(
            Some(CreatedWindow::Month { year: 2025, month: 3 }),
            TicketFilter::from_params(&raw, 2025).created
        );
    }

    #[test]
    fn year_only_window() {
        let raw = TicketFilterParams { year: Some("2024".into()), ..params() };
        let window = TicketFilter::from_params(&raw, 2025).created.unwrap();
        let (start, end) = window.bounds();
        assert_eq!(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(), start);
        assert_eq!(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(), end);
    }

    #[test]
    fn december_rolls_into_next_year() {
        let (start, end) = CreatedWindow::Month { year: 2024, month: 12 }.bounds();
        assert_eq!(Utc.with_ymd_and_hms(2024, 12, 1, 0, 0, 0).unwrap(), start);
        assert_eq!(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(), end);
    }
}
