use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};

use crate::exception::{FieldErrors, HelpdeskResult};
use crate::model::entity::{AccountChanges, Profile};
use crate::model::vo::{TicketCategory, TicketPriority, TicketStatus};
use crate::Id;

pub const REQUIRED: &str = "This field is required.";
pub const TITLE_MAX_CHARS: usize = 200;
pub const USERNAME_MAX_CHARS: usize = 150;
pub const NAME_MAX_CHARS: usize = 30;
pub const EMAIL_MAX_CHARS: usize = 254;
pub const PASSWORD_MIN_CHARS: usize = 8;

static USERNAME_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\w.@+-]+$").unwrap());

/// HTML checkboxes post `on` when ticked and nothing otherwise.
fn checkbox<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(matches!(raw.as_str(), "on" | "true" | "1" | "yes"))
}

fn required(errors: &mut FieldErrors, field: &'static str, value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        errors.add(field, REQUIRED);
    }
    value.to_owned()
}

fn max_chars(errors: &mut FieldErrors, field: &'static str, value: &str, limit: usize) {
    let count = value.chars().count();
    if count > limit {
        errors.add(
            field,
            format!("Ensure this value has at most {limit} characters (it has {count})."),
        );
    }
}

fn choice<T: std::str::FromStr + Default>(
    errors: &mut FieldErrors,
    field: &'static str,
    value: &str,
) -> T {
    let value = value.trim();
    if value.is_empty() {
        return T::default();
    }
    value.parse().unwrap_or_else(|_| {
        errors.add(field, format!("Select a valid choice. {value} is not one of the available choices."));
        T::default()
    })
}

/// Fields filed by a requester.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateTicketCommand {
    pub title: String,
    pub description: String,
    pub category: String,
    pub priority: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketDraft {
    pub title: String,
    pub description: String,
    pub category: TicketCategory,
    pub priority: TicketPriority,
}

impl CreateTicketCommand {
    pub fn validate(&self) -> HelpdeskResult<TicketDraft> {
        let mut errors = FieldErrors::new();
        let title = required(&mut errors, "title", &self.title);
        max_chars(&mut errors, "title", &title, TITLE_MAX_CHARS);
        let description = required(&mut errors, "description", &self.description);
        let category = choice(&mut errors, "category", &self.category);
        let priority = choice(&mut errors, "priority", &self.priority);
        errors.into_result()?;
        Ok(TicketDraft { title, description, category, priority })
    }
}

/// Staff-side overwrite of status, priority and assignee.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateTicketCommand {
    pub status: String,
    pub priority: String,
    /// Account id; empty clears the assignee.
    pub assigned_to: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TicketUpdate {
    pub status: TicketStatus,
    pub priority: TicketPriority,
    pub assigned_to_id: Option<Id>,
}

impl UpdateTicketCommand {
    pub fn validate(&self) -> HelpdeskResult<TicketUpdate> {
        let mut errors = FieldErrors::new();
        if self.status.trim().is_empty() {
            errors.add("status", REQUIRED);
        }
        if self.priority.trim().is_empty() {
            errors.add("priority", REQUIRED);
        }
        let status = choice(&mut errors, "status", &self.status);
        let priority = choice(&mut errors, "priority", &self.priority);
        let assigned_to = self.assigned_to.trim();
        let assigned_to_id = if assigned_to.is_empty() {
            None
        } else {
            match assigned_to.parse() {
                Ok(id) => Some(id),
                Err(_) => {
                    errors.add("assigned_to", "Select a valid choice.");
                    None
                }
            }
        };
        errors.into_result()?;
        Ok(TicketUpdate { status, priority, assigned_to_id })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AddCommentCommand {
    pub text: String,
}

impl AddCommentCommand {
    pub fn validate(&self) -> HelpdeskResult<String> {
        let mut errors = FieldErrors::new();
        let text = required(&mut errors, "text", &self.text);
        errors.into_result()?;
        Ok(text)
    }
}

/// Profile inputs shared by the account forms.
fn profile(
    errors: &mut FieldErrors,
    job_title: &str,
    department: &str,
    phone: &str,
    extension: &str,
    mobile: &str,
) -> Profile {
    let fields = [
        ("job_title", job_title, 100),
        ("department", department, 100),
        ("phone", phone, 20),
        ("extension", extension, 10),
        ("mobile", mobile, 10),
    ];
    for (field, value, limit) in fields {
        max_chars(errors, field, value.trim(), limit);
    }
    Profile {
        job_title: job_title.trim().to_owned(),
        department: department.trim().to_owned(),
        phone: phone.trim().to_owned(),
        extension: extension.trim().to_owned(),
        mobile: mobile.trim().to_owned(),
    }
}

/// Checks shared by create and edit. Uniqueness is checked against the store.
fn identity_fields(
    errors: &mut FieldErrors,
    username: &str,
    email: &str,
    first_name: &str,
    last_name: &str,
) -> (String, String, String, String) {
    let username = required(errors, "username", username);
    max_chars(errors, "username", &username, USERNAME_MAX_CHARS);
    if !username.is_empty() && !USERNAME_PATTERN.is_match(&username) {
        errors.add(
            "username",
            "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
        );
    }
    let email = required(errors, "email", email);
    max_chars(errors, "email", &email, EMAIL_MAX_CHARS);
    if !email.is_empty() && !is_email(&email) {
        errors.add("email", "Enter a valid email address.");
    }
    let first_name = required(errors, "first_name", first_name);
    max_chars(errors, "first_name", &first_name, NAME_MAX_CHARS);
    let last_name = required(errors, "last_name", last_name);
    max_chars(errors, "last_name", &last_name, NAME_MAX_CHARS);
    (username, email, first_name, last_name)
}

fn is_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !domain.contains('@') && !value.contains(char::is_whitespace)
        }
        None => false,
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateAccountCommand {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing)]
    pub password1: String,
    #[serde(skip_serializing)]
    pub password2: String,
    #[serde(deserialize_with = "checkbox")]
    pub is_staff: bool,
    pub job_title: String,
    pub department: String,
    pub phone: String,
    pub extension: String,
    pub mobile: String,
}

/// Validated account input; the password is still plain text here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountDraft {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub is_staff: bool,
    pub profile: Profile,
}

impl CreateAccountCommand {
    pub fn validate(&self) -> HelpdeskResult<AccountDraft> {
        let mut errors = FieldErrors::new();
        let (username, email, first_name, last_name) = identity_fields(
            &mut errors,
            &self.username,
            &self.email,
            &self.first_name,
            &self.last_name,
        );
        if self.password1.is_empty() {
            errors.add("password1", REQUIRED);
        }
        if self.password2.is_empty() {
            errors.add("password2", REQUIRED);
        } else if self.password1 != self.password2 {
            errors.add("password2", "The two password fields didn't match.");
        } else {
            check_password(&mut errors, &self.password2);
        }
        let profile = profile(
            &mut errors,
            &self.job_title,
            &self.department,
            &self.phone,
            &self.extension,
            &self.mobile,
        );
        errors.into_result()?;
        Ok(AccountDraft {
            username,
            email,
            first_name,
            last_name,
            password: self.password1.clone(),
            is_staff: self.is_staff,
            profile,
        })
    }
}

fn check_password(errors: &mut FieldErrors, password: &str) {
    if password.chars().count() < PASSWORD_MIN_CHARS {
        errors.add(
            "password2",
            format!("This password is too short. It must contain at least {PASSWORD_MIN_CHARS} characters."),
        );
    }
    if password.chars().all(|c| c.is_ascii_digit()) {
        errors.add("password2", "This password is entirely numeric.");
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EditAccountCommand {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(deserialize_with = "checkbox")]
    pub is_staff: bool,
    #[serde(deserialize_with = "checkbox")]
    pub is_active: bool,
    pub job_title: String,
    pub department: String,
    pub phone: String,
    pub extension: String,
    pub mobile: String,
}

impl EditAccountCommand {
    pub fn validate(&self) -> HelpdeskResult<AccountChanges> {
        let mut errors = FieldErrors::new();
        let (username, email, first_name, last_name) = identity_fields(
            &mut errors,
            &self.username,
            &self.email,
            &self.first_name,
            &self.last_name,
        );
        let profile = profile(
            &mut errors,
            &self.job_title,
            &self.department,
            &self.phone,
            &self.extension,
            &self.mobile,
        );
        errors.into_result()?;
        Ok(AccountChanges {
            username,
            first_name,
            last_name,
            email,
            is_active: self.is_active,
            is_staff: self.is_staff,
            profile,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginCommand {
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exception::HelpdeskException;

    fn errors<T: std::fmt::Debug>(result: HelpdeskResult<T>) -> FieldErrors {
        match result {
            Err(HelpdeskException::Validation { errors }) => errors,
            other => panic!("expected validation errors, got {other:?}"),
        }
    }

    #[test]
    fn whitespace_title_is_required() {
        let command = CreateTicketCommand {
            title: "   ".into(),
            description: "Broken".into(),
            ..Default::default()
        };
        let errors = errors(command.validate());
        assert_eq!([REQUIRED.to_owned()], errors.get("title"));
        assert!(!errors.contains("description"));
    }

    #[test]
    fn ticket_defaults_for_blank_choices() {
        let draft = CreateTicketCommand {
            title: " Printer ".into(),
            description: "Jammed".into(),
            ..Default::default()
        }
        .validate()
        .unwrap();
        assert_eq!("Printer", draft.title);
        assert_eq!(TicketCategory::Other, draft.category);
        assert_eq!(TicketPriority::Medium, draft.priority);
    }

    #[test]
    fn title_length_is_limited() {
        let command = CreateTicketCommand {
            title: "x".repeat(TITLE_MAX_CHARS + 1),
            description: "d".into(),
            ..Default::default()
        };
        assert!(errors(command.validate()).contains("title"));
    }

    #[test]
    fn empty_assignee_clears() {
        let update = UpdateTicketCommand {
            status: "closed".into(),
            priority: "low".into(),
            assigned_to: "".into(),
        }
        .validate()
        .unwrap();
        assert_eq!(None, update.assigned_to_id);
        assert_eq!(TicketStatus::Closed, update.status);
    }

    #[test]
    fn update_rejects_unknown_status() {
        let command = UpdateTicketCommand {
            status: "archived".into(),
            priority: "low".into(),
            assigned_to: "abc".into(),
        };
        let errors = errors(command.validate());
        assert!(errors.contains("status"));
        assert!(errors.contains("assigned_to"));
    }

    #[test]
    fn comment_text_is_required() {
        let errors = errors(AddCommentCommand { text: "\n ".into() }.validate());
        assert!(errors.contains("text"));
    }

    fn account_command() -> CreateAccountCommand {
        CreateAccountCommand {
            username: "maria.p".into(),
            email: "maria@example.com".into(),
            first_name: "Maria".into(),
            last_name: "Perez".into(),
            password1: "s3cret-pass".into(),
            password2: "s3cret-pass".into(),
            ..Default::default()
        }
    }

    #[test]
    fn valid_account_passes() {
        let draft = account_command().validate().unwrap();
        assert_eq!("maria.p", draft.username);
        assert!(!draft.is_staff);
    }

    #[test]
    fn username_charset_is_enforced() {
        let command = CreateAccountCommand { username: "maria p!".into(), ..account_command() };
        assert!(errors(command.validate()).contains("username"));
    }

    #[test]
    fn passwords_must_match_and_be_strong() {
        let command = CreateAccountCommand { password2: "other-pass".into(), ..account_command() };
        assert!(errors(command.validate()).contains("password2"));

        let command = CreateAccountCommand {
            password1: "12345678".into(),
            password2: "12345678".into(),
            ..account_command()
        };
        assert_eq!(
            ["This password is entirely numeric.".to_owned()],
            errors(command.validate()).get("password2")
        );

        let command = CreateAccountCommand {
            password1: "short".into(),
            password2: "short".into(),
            ..account_command()
        };
        assert!(errors(command.validate()).contains("password2"));
    }

    #[test]
    fn email_needs_an_at_sign() {
        let command = CreateAccountCommand { email: "maria.example.com".into(), ..account_command() };
        assert!(errors(command.validate()).contains("email"));
    }

    #[test]
    fn profile_limits_apply() {
        let command = CreateAccountCommand { extension: "12345678901".into(), ..account_command() };
        assert!(errors(command.validate()).contains("extension"));
    }

    #[test]
    fn checkbox_reads_on() {
        let command: EditAccountCommand =
            serde_json::from_str(r#"{"username":"a","is_staff":"on"}"#).unwrap();
        assert!(command.is_staff);
        assert!(!command.is_active);
    }
}
