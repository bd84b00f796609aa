use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use domain_helpdesk::{
    exception::{HelpdeskException, HelpdeskResult},
    model::vo::{ActingIdentity, ReportDocument, ReportHeader},
    repository::{CommentRepo, TicketRepo},
    service::{RenderedReport, ReportRenderer, ReportService},
    Id,
};
use typed_builder::TypedBuilder;

pub const REPORT_DENIED_NOTICE: &str = "You do not have permission to generate the PDF for this ticket.";

#[derive(TypedBuilder)]
pub struct ReportServiceImpl {
    ticket_repo: Arc<dyn TicketRepo>,
    comment_repo: Arc<dyn CommentRepo>,
    renderer: Arc<dyn ReportRenderer>,
    #[builder(default)]
    header: ReportHeader,
}

#[async_trait]
impl ReportService for ReportServiceImpl {
    async fn build_report(&self, actor: &ActingIdentity, ticket_id: Id) -> HelpdeskResult<ReportDocument> {
        let record = self
            .ticket_repo
            .get_record(ticket_id)
            .await?
            .ok_or_else(|| HelpdeskException::not_found("Ticket", ticket_id))?;
        if !actor.can_access(record.ticket.requester_id) {
            return Err(HelpdeskException::permission_denied(REPORT_DENIED_NOTICE));
        }
        let comments = self.comment_repo.list_for_ticket(ticket_id).await?;
        Ok(ReportDocument::assemble(&record, &comments, self.header.clone(), Utc::now()))
    }

    async fn render_report(&self, actor: &ActingIdentity, ticket_id: Id) -> HelpdeskResult<RenderedReport> {
        let document = self.build_report(actor, ticket_id).await?;
        let content = self.renderer.render(&document)?;
        tracing::info!(
            "{} exported report for ticket {} ({} bytes).",
            actor.username,
            document.ticket_number,
            content.len()
        );
        Ok(RenderedReport {
            filename: document.filename(),
            content_type: self.renderer.content_type(),
            content,
        })
    }
}
