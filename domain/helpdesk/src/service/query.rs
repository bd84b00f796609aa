use async_trait::async_trait;

use crate::exception::HelpdeskResult;
use crate::model::entity::Account;
use crate::model::vo::{ActingIdentity, AdminDashboard, TicketFilterParams};

/// Staff-side filtering and counters.
#[async_trait]
pub trait TicketQueryService: Send + Sync {
    async fn admin_dashboard(
        &self,
        actor: &ActingIdentity,
        params: TicketFilterParams,
    ) -> HelpdeskResult<AdminDashboard>;
    /// Accounts a ticket may be assigned to.
    async fn assignable_accounts(&self, actor: &ActingIdentity) -> HelpdeskResult<Vec<Account>>;
}
