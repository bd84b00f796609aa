use serde::Serialize;

use super::{Choice, MonthOption, RequesterStats, TicketFilterParams, TicketStats};
use crate::model::entity::{Account, CommentRecord, Ticket, TicketRecord};

/// A requester's own tickets, newest first.
#[derive(Debug, Clone, Serialize)]
pub struct RequesterDashboard {
    pub tickets: Vec<Ticket>,
    pub stats: RequesterStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct TicketDetail {
    #[serde(flatten)]
    pub record: TicketRecord,
    /// Oldest first.
    pub comments: Vec<CommentRecord>,
}

/// Filtered tickets plus everything the admin filter form needs.
#[derive(Debug, Clone, Serialize)]
pub struct AdminDashboard {
    pub tickets: Vec<TicketRecord>,
    pub stats: TicketStats,
    /// Applied raw values, trimmed, for re-populating the form.
    pub filters: TicketFilterParams,
    /// Distinct creation years, newest first.
    pub years: Vec<i32>,
    pub months: Vec<MonthOption>,
    pub status_choices: Vec<Choice>,
    pub priority_choices: Vec<Choice>,
    pub category_choices: Vec<Choice>,
    pub assignable: Vec<Account>,
    pub current_year: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct AccountListing {
    pub accounts: Vec<Account>,
    pub search: String,
    pub staff_count: usize,
    pub active_count: usize,
}

impl AccountListing {
    pub fn new(accounts: Vec<Account>, search: String) -> Self {
        let staff_count = accounts.iter().filter(|a| a.is_staff).count();
        let active_count = accounts.iter().filter(|a| a.is_active).count();
        Self { accounts, search, staff_count, active_count }
    }
}
