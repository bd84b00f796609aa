mod account;
mod auth;
pub mod password;
mod query;
mod report;
mod ticket;

use domain_helpdesk::exception::{HelpdeskException, HelpdeskResult};
use domain_helpdesk::model::vo::ActingIdentity;

#[rustfmt::skip]
pub use {
    account::AccountServiceImpl,
    auth::AuthServiceImpl,
    query::TicketQueryServiceImpl,
    report::ReportServiceImpl,
    ticket::TicketServiceImpl,
};

pub const STAFF_ONLY_NOTICE: &str = "You do not have permission to access the administration area.";

fn require_staff(actor: &ActingIdentity) -> HelpdeskResult<()> {
    if actor.can_administer() {
        Ok(())
    } else {
        Err(HelpdeskException::permission_denied(STAFF_ONLY_NOTICE))
    }
}
