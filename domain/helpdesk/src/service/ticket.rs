use async_trait::async_trait;

use crate::command::{AddCommentCommand, CreateTicketCommand, UpdateTicketCommand};
use crate::exception::HelpdeskResult;
use crate::model::entity::{Comment, Ticket, TicketRecord};
use crate::model::vo::{ActingIdentity, RequesterDashboard, TicketDetail, TicketNumber};
use crate::Id;

/// Ticket lifecycle. Every call carries the acting identity and enforces
/// ownership or staff rights itself.
#[async_trait]
pub trait TicketService: Send + Sync {
    /// Files a ticket for `actor`, allocating the next ticket number.
    async fn create_ticket(
        &self,
        actor: &ActingIdentity,
        command: CreateTicketCommand,
    ) -> HelpdeskResult<Ticket>;
    async fn requester_dashboard(&self, actor: &ActingIdentity) -> HelpdeskResult<RequesterDashboard>;
    /// Owner or staff.
    async fn ticket_detail(&self, actor: &ActingIdentity, id: Id) -> HelpdeskResult<TicketDetail>;
    /// Owner or staff.
    async fn add_comment(
        &self,
        actor: &ActingIdentity,
        id: Id,
        command: AddCommentCommand,
    ) -> HelpdeskResult<Comment>;
    /// Staff only; loads the ticket for the update and delete pages.
    async fn ticket_for_staff(&self, actor: &ActingIdentity, id: Id) -> HelpdeskResult<TicketRecord>;
    /// Staff only.
    async fn update_ticket(
        &self,
        actor: &ActingIdentity,
        id: Id,
        command: UpdateTicketCommand,
    ) -> HelpdeskResult<Ticket>;
    /// Staff only. Returns the number of the removed ticket.
    async fn delete_ticket(&self, actor: &ActingIdentity, id: Id) -> HelpdeskResult<TicketNumber>;
}
