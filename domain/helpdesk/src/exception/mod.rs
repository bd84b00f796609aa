use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

pub type HelpdeskResult<T> = Result<T, HelpdeskException>;

/// Messages per form field. Nothing is applied while any are present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<&'static str, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    /// `Ok(())` when empty, otherwise a validation exception carrying the messages.
    pub fn into_result(self) -> HelpdeskResult<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(HelpdeskException::Validation { errors: self })
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                first = false;
                write!(f, "{field}: {message}")?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum HelpdeskException {
    #[error("Invalid input: {errors}")]
    Validation { errors: FieldErrors },

    #[error("Permission denied: {notice}")]
    PermissionDenied { notice: String },

    #[error("{entity} with id: {id} not found.")]
    NotFound { entity: &'static str, id: String },

    #[error("Integrity violation: {detail}")]
    Integrity { detail: String },

    #[error("Helpdesk internal error: {source}")]
    InternalError {
        #[source]
        source: anyhow::Error,
    },
}

impl HelpdeskException {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.add(field, message);
        HelpdeskException::Validation { errors }
    }

    pub fn permission_denied(notice: impl Into<String>) -> Self {
        HelpdeskException::PermissionDenied { notice: notice.into() }
    }

    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        HelpdeskException::NotFound { entity, id: id.to_string() }
    }

    pub fn is_integrity(&self) -> bool {
        matches!(self, HelpdeskException::Integrity { .. })
    }
}

/// Repositories wrap domain exceptions (unique violations) in `anyhow`; those
/// come back out unchanged, anything else is internal.
impl From<anyhow::Error> for HelpdeskException {
    fn from(e: anyhow::Error) -> Self {
        match e.downcast::<HelpdeskException>() {
            Ok(exception) => exception,
            Err(source) => HelpdeskException::InternalError { source },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integrity_survives_anyhow_round_trip() {
        let wrapped = anyhow::Error::new(HelpdeskException::Integrity {
            detail: "ticket_number".into(),
        });
        assert!(HelpdeskException::from(wrapped).is_integrity());
    }

    #[test]
    fn other_errors_become_internal() {
        let exception = HelpdeskException::from(anyhow::anyhow!("connection reset"));
        assert!(matches!(exception, HelpdeskException::InternalError { .. }));
    }

    #[test]
    fn field_errors_collect_per_field() {
        let mut errors = FieldErrors::new();
        errors.add("title", "This field is required.");
        errors.add("title", "Too long.");
        errors.add("description", "This field is required.");
        assert_eq!(2, errors.get("title").len());
        assert!(errors.get("priority").is_empty());
        assert_eq!(
            "description: This field is required.; title: This field is required.; title: Too long.",
            errors.to_string()
        );
    }
}
