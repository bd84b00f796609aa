use serde::Serialize;

use crate::Id;

/// The authenticated account performing an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActingIdentity {
    pub id: Id,
    pub username: String,
    pub is_staff: bool,
    pub is_superuser: bool,
}

impl ActingIdentity {
    /// Staff or superuser.
    pub fn can_administer(&self) -> bool {
        self.is_staff || self.is_superuser
    }

    /// Owners read their own records, administrators read everything.
    pub fn can_access(&self, owner_id: Id) -> bool {
        self.id == owner_id || self.can_administer()
    }
}
