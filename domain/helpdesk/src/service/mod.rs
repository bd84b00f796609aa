mod account;
mod auth;
mod query;
mod report;
mod ticket;

#[rustfmt::skip]
pub use {
    account::AccountService,
    auth::AuthService,
    query::TicketQueryService,
    report::{RenderedReport, ReportRenderer, ReportService},
    ticket::TicketService,
};
