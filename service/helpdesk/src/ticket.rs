use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use domain_helpdesk::{
    command::{AddCommentCommand, CreateTicketCommand, UpdateTicketCommand},
    exception::{HelpdeskException, HelpdeskResult},
    model::{
        entity::{store_precision, Comment, NewComment, NewTicket, Ticket, TicketRecord},
        vo::{
            ActingIdentity, RequesterDashboard, RequesterStats, TicketDetail, TicketNumber,
            TicketStatus,
        },
    },
    repository::{AccountRepo, CommentRepo, TicketRepo},
    service::TicketService,
    Id,
};
use tokio::sync::Mutex;
use typed_builder::TypedBuilder;

use crate::require_staff;

pub const VIEW_DENIED_NOTICE: &str = "You do not have permission to view this ticket.";

/// Attempts per creation when another writer takes the allocated number.
const NUMBERING_ATTEMPTS: usize = 2;

#[derive(TypedBuilder)]
pub struct TicketServiceImpl {
    ticket_repo: Arc<dyn TicketRepo>,
    comment_repo: Arc<dyn CommentRepo>,
    account_repo: Arc<dyn AccountRepo>,
    /// Serializes read-last-number-then-insert within this process.
    #[builder(default)]
    numbering: Mutex<()>,
}

impl TicketServiceImpl {
    async fn record(&self, id: Id) -> HelpdeskResult<TicketRecord> {
        self.ticket_repo
            .get_record(id)
            .await?
            .ok_or_else(|| HelpdeskException::not_found("Ticket", id))
    }

    async fn ticket(&self, id: Id) -> HelpdeskResult<Ticket> {
        self.ticket_repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| HelpdeskException::not_found("Ticket", id))
    }

    async fn insert_numbered(&self, ticket: &NewTicket) -> HelpdeskResult<Ticket> {
        let _guard = self.numbering.lock().await;
        let mut attempt = 1;
        loop {
            let last = self.ticket_repo.last_inserted_number().await?;
            let number = TicketNumber::after(last.as_ref());
            match self.ticket_repo.insert(ticket, &number).await.map_err(HelpdeskException::from) {
                Err(e) if e.is_integrity() && attempt < NUMBERING_ATTEMPTS => {
                    tracing::warn!("Ticket number {number} was taken concurrently, allocating again.");
                    attempt += 1;
                }
                Err(e) => {
                    if e.is_integrity() {
                        tracing::error!("Ticket number allocation failed after {attempt} attempts: {e}");
                    }
                    return Err(e);
                }
                Ok(inserted) => return Ok(inserted),
            }
        }
    }
}

#[async_trait]
impl TicketService for TicketServiceImpl {
    async fn create_ticket(
        &self,
        actor: &ActingIdentity,
        command: CreateTicketCommand,
    ) -> HelpdeskResult<Ticket> {
        let draft = command.validate()?;
        let new_ticket = NewTicket::open(
            actor.id,
            draft.title,
            draft.description,
            draft.category,
            draft.priority,
            Utc::now(),
        );
        let ticket = self.insert_numbered(&new_ticket).await?;
        tracing::info!("{} filed ticket {}.", actor.username, ticket.ticket_number);
        Ok(ticket)
    }

    async fn requester_dashboard(&self, actor: &ActingIdentity) -> HelpdeskResult<RequesterDashboard> {
        let tickets = self.ticket_repo.list_by_requester(actor.id).await?;
        let count = |status| tickets.iter().filter(|t| t.status == status).count() as u64;
        let stats = RequesterStats {
            total: tickets.len() as u64,
            open: count(TicketStatus::Open),
            in_progress: count(TicketStatus::InProgress),
        };
        Ok(RequesterDashboard { tickets, stats })
    }

    async fn ticket_detail(&self, actor: &ActingIdentity, id: Id) -> HelpdeskResult<TicketDetail> {
        let record = self.record(id).await?;
        if !actor.can_access(record.ticket.requester_id) {
            return Err(HelpdeskException::permission_denied(VIEW_DENIED_NOTICE));
        }
        let comments = self.comment_repo.list_for_ticket(id).await?;
        Ok(TicketDetail { record, comments })
    }

    async fn add_comment(
        &self,
        actor: &ActingIdentity,
        id: Id,
        command: AddCommentCommand,
    ) -> HelpdeskResult<Comment> {
        let ticket = self.ticket(id).await?;
        if !actor.can_access(ticket.requester_id) {
            return Err(HelpdeskException::permission_denied(VIEW_DENIED_NOTICE));
        }
        let text = command.validate()?;
        let comment = self
            .comment_repo
            .insert(&NewComment {
                ticket_id: ticket.id,
                author_id: actor.id,
                text,
                created_at: store_precision(Utc::now()),
            })
            .await?;
        tracing::info!("{} commented on ticket {}.", actor.username, ticket.ticket_number);
        Ok(comment)
    }

    async fn ticket_for_staff(&self, actor: &ActingIdentity, id: Id) -> HelpdeskResult<TicketRecord> {
        require_staff(actor)?;
        self.record(id).await
    }

    async fn update_ticket(
        &self,
        actor: &ActingIdentity,
        id: Id,
        command: UpdateTicketCommand,
    ) -> HelpdeskResult<Ticket> {
        require_staff(actor)?;
        let mut ticket = self.ticket(id).await?;
        let update = command.validate()?;
        if let Some(assignee_id) = update.assigned_to_id {
            if self.account_repo.get_by_id(assignee_id).await?.is_none() {
                return Err(HelpdeskException::validation(
                    "assigned_to",
                    "Select a valid choice. That choice is not one of the available choices.",
                ));
            }
        }
        ticket.apply_update(update.status, update.priority, update.assigned_to_id, Utc::now());
        let ticket = self.ticket_repo.update(&ticket).await?;
        tracing::info!(
            "{} updated ticket {} to {}.",
            actor.username,
            ticket.ticket_number,
            ticket.status
        );
        Ok(ticket)
    }

    async fn delete_ticket(&self, actor: &ActingIdentity, id: Id) -> HelpdeskResult<TicketNumber> {
        require_staff(actor)?;
        let ticket = self.ticket(id).await?;
        self.ticket_repo.delete_cascade(ticket.id).await?;
        tracing::info!("{} deleted ticket {}.", actor.username, ticket.ticket_number);
        Ok(ticket.ticket_number)
    }
}
