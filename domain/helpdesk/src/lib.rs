//! Helpdesk domain: tickets, their numbering and lifecycle, comments, accounts
//! and the staff-side query model.

pub mod command;
pub mod exception;
#[cfg(feature = "mock")]
pub mod mock;
pub mod model;
pub mod repository;
pub mod service;

/// Internal row identifier shared by every stored record.
pub type Id = i32;
