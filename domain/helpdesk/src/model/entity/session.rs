use chrono::{DateTime, Utc};
use database_model::session;

use crate::Id;

/// Server-side login session addressed by the cookie token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub account_id: Id,
    pub created_at: DateTime<Utc>,
    /// Serialized pending notice.
    pub flash: Option<String>,
}

impl From<session::Model> for Session {
    fn from(model: session::Model) -> Self {
        let session::Model { token, account_id, created_at, flash } = model;
        Self { token, account_id, created_at, flash }
    }
}
