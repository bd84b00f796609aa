use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const TICKET_NUMBER_PREFIX: &str = "TKT-";
/// Minimum digit count; larger sequences keep growing instead of wrapping.
const TICKET_NUMBER_WIDTH: usize = 5;

/// Human-facing sequential identifier of a ticket, e.g. `TKT-00042`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TicketNumber(u32);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("`{0}` is not a ticket number of the form {TICKET_NUMBER_PREFIX}NNNNN.")]
pub struct ParseTicketNumberError(String);

impl TicketNumber {
    pub const FIRST: TicketNumber = TicketNumber(1);

    pub fn sequence(&self) -> u32 {
        self.0
    }

    /// Number following the most recently inserted one, or the first number
    /// when the store is empty.
    pub fn after(last: Option<&TicketNumber>) -> Self {
        match last {
            Some(last) => TicketNumber(last.0.saturating_add(1)),
            None => Self::FIRST,
        }
    }
}

impl fmt::Display for TicketNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{TICKET_NUMBER_PREFIX}{:0width$}", self.0, width = TICKET_NUMBER_WIDTH)
    }
}

impl FromStr for TicketNumber {
    type Err = ParseTicketNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix(TICKET_NUMBER_PREFIX)
            .filter(|d| !d.is_empty() && d.bytes().all(|b| b.is_ascii_digit()))
            .ok_or_else(|| ParseTicketNumberError(s.to_owned()))?;
        digits.parse().map(TicketNumber).map_err(|_| ParseTicketNumberError(s.to_owned()))
    }
}

impl TryFrom<String> for TicketNumber {
    type Error = ParseTicketNumberError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TicketNumber> for String {
    fn from(value: TicketNumber) -> Self {
        value.to_string()
    }
}
