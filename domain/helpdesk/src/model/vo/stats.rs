use serde::Serialize;

/// Whole-store counters shown on the admin dashboard, independent of filters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TicketStats {
    pub total: u64,
    pub open: u64,
    pub in_progress: u64,
    pub resolved: u64,
    pub closed: u64,
    pub unassigned: u64,
}

/// Counters over one requester's own tickets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RequesterStats {
    pub total: u64,
    pub open: u64,
    pub in_progress: u64,
}

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthOption {
    pub value: u32,
    pub name: &'static str,
}

pub fn month_options() -> Vec<MonthOption> {
    (1..)
        .zip(MONTH_NAMES)
        .map(|(value, name)| MonthOption { value, name })
        .collect()
}
