mod account;
mod comment;
mod session;
mod ticket;

#[rustfmt::skip]
pub use {
    account::AccountRepo,
    comment::CommentRepo,
    session::SessionRepo,
    ticket::{TicketCountQuery, TicketRepo},
};
