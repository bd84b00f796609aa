use chrono::{DateTime, Utc};
use database_model::{account, profile};
use serde::Serialize;

use crate::model::vo::ActingIdentity;
use crate::Id;

/// Contact data attached to exactly one account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Profile {
    pub job_title: String,
    pub department: String,
    pub phone: String,
    pub extension: String,
    pub mobile: String,
}

impl Profile {
    /// Office phone with the extension appended, e.g. `555-0100 Ext. 12`.
    pub fn phone_with_extension(&self) -> String {
        if self.extension.is_empty() {
            self.phone.clone()
        } else {
            format!("{} Ext. {}", self.phone, self.extension)
        }
    }
}

impl From<profile::Model> for Profile {
    fn from(model: profile::Model) -> Self {
        let profile::Model {
            id: _,
            account_id: _,
            job_title,
            department,
            phone,
            extension,
            mobile,
        } = model;
        Self { job_title, department, phone, extension, mobile }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    pub id: Id,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub date_joined: DateTime<Utc>,
    pub profile: Profile,
}

impl Account {
    /// `first last`, trimmed; empty when neither name is set.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_owned()
    }

    /// Full name, falling back to the username.
    pub fn display_name(&self) -> String {
        let full_name = self.full_name();
        if full_name.is_empty() {
            self.username.clone()
        } else {
            full_name
        }
    }

    pub fn can_administer(&self) -> bool {
        self.is_staff || self.is_superuser
    }

    pub fn identity(&self) -> ActingIdentity {
        ActingIdentity {
            id: self.id,
            username: self.username.clone(),
            is_staff: self.is_staff,
            is_superuser: self.is_superuser,
        }
    }

    /// Joins an account row with its profile row. A missing profile reads as empty.
    pub fn from_models(account: account::Model, profile: Option<profile::Model>) -> Self {
        let account::Model {
            id,
            username,
            first_name,
            last_name,
            email,
            password_hash: _,
            is_active,
            is_staff,
            is_superuser,
            date_joined,
        } = account;
        Self {
            id,
            username,
            first_name,
            last_name,
            email,
            is_active,
            is_staff,
            is_superuser,
            date_joined,
            profile: profile.map(Profile::from).unwrap_or_default(),
        }
    }
}

/// Account plus the stored password hash, only read during login.
#[derive(Debug, Clone)]
pub struct AccountCredentials {
    pub account: Account,
    pub password_hash: String,
}

/// Account and profile to be written together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub date_joined: DateTime<Utc>,
    pub profile: Profile,
}

/// Editable account fields; the password and superuser flag are left alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountChanges {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub profile: Profile,
}
