use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown {kind} value: `{value}`.")]
pub struct UnknownChoice {
    pub kind: &'static str,
    pub value: String,
}

/// One `(value, label)` pair offered in a select box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Choice {
    pub value: &'static str,
    pub label: &'static str,
}

/// Closed set of string-stored choices with a human label per variant.
macro_rules! choices {
    (
        $(#[$meta:meta])*
        $name:ident ($kind:literal), default $default:ident {
            $($variant:ident => ($value:literal, $label:literal)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value),+
                }
            }

            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }

            pub fn choices() -> Vec<Choice> {
                Self::ALL
                    .iter()
                    .map(|c| Choice { value: c.as_str(), label: c.label() })
                    .collect()
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownChoice;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($value => Ok($name::$variant),)+
                    _ => Err(UnknownChoice { kind: $kind, value: s.to_owned() }),
                }
            }
        }
    };
}

choices! {
    /// Where a ticket is in its handling. Staff may move between any two values.
    TicketStatus("status"), default Open {
        Open => ("open", "Open"),
        InProgress => ("in_progress", "In Progress"),
        Resolved => ("resolved", "Resolved"),
        Closed => ("closed", "Closed"),
    }
}

choices! {
    TicketPriority("priority"), default Medium {
        Low => ("low", "Low"),
        Medium => ("medium", "Medium"),
        High => ("high", "High"),
        Critical => ("critical", "Critical"),
    }
}

choices! {
    TicketCategory("category"), default Other {
        Hardware => ("hardware", "Hardware"),
        Software => ("software", "Software"),
        Network => ("network", "Network"),
        Account => ("account", "Account"),
        Other => ("other", "Other"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_new_ticket_values() {
        assert_eq!(TicketStatus::Open, TicketStatus::default());
        assert_eq!(TicketPriority::Medium, TicketPriority::default());
        assert_eq!(TicketCategory::Other, TicketCategory::default());
    }

    #[test]
    fn stored_values_parse_back() {
        for status in TicketStatus::ALL {
            assert_eq!(*status, status.as_str().parse().unwrap());
        }
        assert_eq!(TicketStatus::InProgress, "in_progress".parse().unwrap());
    }

    #[test]
    fn unknown_values_are_rejected() {
        let err = "urgent".parse::<TicketPriority>().unwrap_err();
        assert_eq!("priority", err.kind);
        assert!("Open".parse::<TicketStatus>().is_err());
    }

    #[test]
    fn serde_uses_stored_values() {
        assert_eq!(
            "\"in_progress\"",
            serde_json::to_string(&TicketStatus::InProgress).unwrap()
        );
        let category: TicketCategory = serde_json::from_str("\"network\"").unwrap();
        assert_eq!(TicketCategory::Network, category);
    }
}
