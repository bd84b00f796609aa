use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Datelike, Utc};
use domain_helpdesk::{
    exception::HelpdeskResult,
    model::{
        entity::Account,
        vo::{
            month_options, ActingIdentity, AdminDashboard, TicketCategory, TicketFilter,
            TicketFilterParams, TicketPriority, TicketStats, TicketStatus,
        },
    },
    repository::{AccountRepo, TicketCountQuery, TicketRepo},
    service::TicketQueryService,
};
use typed_builder::TypedBuilder;

use crate::require_staff;

#[derive(TypedBuilder)]
pub struct TicketQueryServiceImpl {
    ticket_repo: Arc<dyn TicketRepo>,
    account_repo: Arc<dyn AccountRepo>,
}

impl TicketQueryServiceImpl {
    /// Counters over the whole store; filters never apply here.
    async fn stats(&self) -> HelpdeskResult<TicketStats> {
        let by_status = |status| TicketCountQuery { status: Some(status), ..Default::default() };
        Ok(TicketStats {
            total: self.ticket_repo.count(TicketCountQuery::default()).await?,
            open: self.ticket_repo.count(by_status(TicketStatus::Open)).await?,
            in_progress: self.ticket_repo.count(by_status(TicketStatus::InProgress)).await?,
            resolved: self.ticket_repo.count(by_status(TicketStatus::Resolved)).await?,
            closed: self.ticket_repo.count(by_status(TicketStatus::Closed)).await?,
            unassigned: self
                .ticket_repo
                .count(TicketCountQuery { unassigned: true, ..Default::default() })
                .await?,
        })
    }
}

#[async_trait]
impl TicketQueryService for TicketQueryServiceImpl {
    async fn admin_dashboard(
        &self,
        actor: &ActingIdentity,
        params: TicketFilterParams,
    ) -> HelpdeskResult<AdminDashboard> {
        require_staff(actor)?;
        let current_year = Utc::now().year();
        let filter = TicketFilter::from_params(&params, current_year);
        tracing::debug!("Admin ticket filter: {filter:?}");
        let tickets = self.ticket_repo.search(&filter).await?;
        Ok(AdminDashboard {
            tickets,
            stats: self.stats().await?,
            filters: params.normalized(),
            years: self.ticket_repo.creation_years().await?,
            months: month_options(),
            status_choices: TicketStatus::choices(),
            priority_choices: TicketPriority::choices(),
            category_choices: TicketCategory::choices(),
            assignable: self.account_repo.list_assignable().await?,
            current_year,
        })
    }

    async fn assignable_accounts(&self, actor: &ActingIdentity) -> HelpdeskResult<Vec<Account>> {
        require_staff(actor)?;
        Ok(self.account_repo.list_assignable().await?)
    }
}
