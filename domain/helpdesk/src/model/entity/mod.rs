mod account;
mod comment;
mod session;
mod ticket;

#[rustfmt::skip]
pub use {
    account::*,
    comment::*,
    session::Session,
    ticket::*,
};
