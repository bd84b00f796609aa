mod account;
mod comment;
mod session;
mod ticket;
