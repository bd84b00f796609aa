use anyhow::Context;
use chrono::{DateTime, Duration, DurationRound, Utc};
use database_model::ticket;
use serde::Serialize;

use super::Account;
use crate::model::vo::{TicketCategory, TicketNumber, TicketPriority, TicketStatus};
use crate::Id;

/// Truncates to the precision every supported store keeps.
pub fn store_precision(at: DateTime<Utc>) -> DateTime<Utc> {
    at.duration_trunc(Duration::microseconds(1)).unwrap_or(at)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ticket {
    pub id: Id,
    pub ticket_number: TicketNumber,
    pub requester_id: Id,
    pub title: String,
    pub description: String,
    pub category: TicketCategory,
    pub priority: TicketPriority,
    pub status: TicketStatus,
    pub assigned_to_id: Option<Id>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Ticket {
    /// Overwrites the staff-editable fields and refreshes `updated_at`.
    pub fn apply_update(
        &mut self,
        status: TicketStatus,
        priority: TicketPriority,
        assigned_to_id: Option<Id>,
        now: DateTime<Utc>,
    ) {
        self.status = status;
        self.priority = priority;
        self.assigned_to_id = assigned_to_id;
        self.touch(now);
    }

    /// Moves `updated_at` forward, strictly, even when the clock has not.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        let now = store_precision(now);
        self.updated_at = if now > self.updated_at {
            now
        } else {
            self.updated_at + Duration::microseconds(1)
        };
    }
}

impl TryFrom<ticket::Model> for Ticket {
    type Error = anyhow::Error;

    fn try_from(model: ticket::Model) -> Result<Self, Self::Error> {
        let ticket::Model {
            id,
            ticket_number,
            requester_id,
            title,
            description,
            category,
            priority,
            status,
            assigned_to_id,
            created_at,
            updated_at,
        } = model;
        Ok(Self {
            id,
            ticket_number: ticket_number.parse()?,
            requester_id,
            title,
            description,
            category: category.parse().with_context(|| format!("ticket {id}"))?,
            priority: priority.parse().with_context(|| format!("ticket {id}"))?,
            status: status.parse().with_context(|| format!("ticket {id}"))?,
            assigned_to_id,
            created_at,
            updated_at,
        })
    }
}

/// A ticket before its first persistence; the number is allocated at insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTicket {
    pub requester_id: Id,
    pub title: String,
    pub description: String,
    pub category: TicketCategory,
    pub priority: TicketPriority,
    pub status: TicketStatus,
    pub created_at: DateTime<Utc>,
}

impl NewTicket {
    pub fn open(
        requester_id: Id,
        title: String,
        description: String,
        category: TicketCategory,
        priority: TicketPriority,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            requester_id,
            title,
            description,
            category,
            priority,
            status: TicketStatus::Open,
            created_at: store_precision(now),
        }
    }
}

/// A ticket together with its requester and assignee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TicketRecord {
    pub ticket: Ticket,
    pub requester: Account,
    pub assignee: Option<Account>,
}
