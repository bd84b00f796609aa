use async_trait::async_trait;

use crate::model::entity::{NewTicket, Ticket, TicketRecord};
use crate::model::vo::{TicketFilter, TicketNumber, TicketStatus};
use crate::Id;

/// Conditions for a ticket count; unset fields do not restrict.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TicketCountQuery {
    pub status: Option<TicketStatus>,
    pub unassigned: bool,
}

#[async_trait]
pub trait TicketRepo: Send + Sync {
    /// Number of the most recently inserted ticket, by row id.
    async fn last_inserted_number(&self) -> anyhow::Result<Option<TicketNumber>>;
    /// Fails with a wrapped integrity exception when the number is taken.
    async fn insert(&self, ticket: &NewTicket, number: &TicketNumber) -> anyhow::Result<Ticket>;
    async fn get_by_id(&self, id: Id) -> anyhow::Result<Option<Ticket>>;
    async fn get_record(&self, id: Id) -> anyhow::Result<Option<TicketRecord>>;
    /// Newest first.
    async fn list_by_requester(&self, requester_id: Id) -> anyhow::Result<Vec<Ticket>>;
    /// Newest first, unbounded.
    async fn search(&self, filter: &TicketFilter) -> anyhow::Result<Vec<TicketRecord>>;
    async fn count(&self, query: TicketCountQuery) -> anyhow::Result<u64>;
    /// Distinct creation years, newest first.
    async fn creation_years(&self) -> anyhow::Result<Vec<i32>>;
    /// Persists status, priority, assignee and `updated_at`.
    async fn update(&self, ticket: &Ticket) -> anyhow::Result<Ticket>;
    /// Removes the ticket and its comments.
    async fn delete_cascade(&self, id: Id) -> anyhow::Result<()>;
}
