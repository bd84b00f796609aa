//! Helpdesk ticketing web application: actix-web handlers, sea-orm
//! repositories and the server bootstrap.

pub mod api;
pub mod infrastructure;
pub mod server;
