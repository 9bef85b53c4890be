//! Ticket number allocation
//!
//! Allocation is a pure step: the caller passes the highest sequence already
//! issued in the active scope and the newest stored ticket. The issued
//! counter keeps a deleted ticket from being handed out again.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ticket prefix shown on the queue display
pub const TICKET_PREFIX: &str = "A";

/// Which records the "last ticket" lookup considers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketScope {
    /// Latest record of the current numbering epoch, regardless of date
    Global,
    /// Latest record of the current epoch created since the start of today
    #[default]
    Daily,
}

impl TicketScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Global => "global",
            Self::Daily => "daily",
        }
    }
}

impl fmt::Display for TicketScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "global" => Ok(Self::Global),
            "daily" => Ok(Self::Daily),
            other => Err(format!("invalid ticket scope '{other}', expected global or daily")),
        }
    }
}

/// Numeric part of a ticket: its trailing ASCII digits
///
/// Returns 0 when there are no digits or they overflow.
pub fn ticket_sequence(ticket: &str) -> u64 {
    let digits_at = ticket
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i);

    digits_at
        .and_then(|i| ticket[i..].parse::<u64>().ok())
        .unwrap_or(0)
}

/// Render a sequence number as a ticket (`A001`, ..., `A999`, `A1000`)
pub fn format_ticket(sequence: u64) -> String {
    format!("{TICKET_PREFIX}{sequence:03}")
}

/// Next sequence of the scope: one past the issued counter or the newest
/// stored ticket, whichever is higher
pub fn next_sequence(issued: u64, last: Option<&str>) -> u64 {
    let stored = last.map(ticket_sequence).unwrap_or(0);
    issued.max(stored).saturating_add(1)
}

/// Next ticket after the last one of the scope
pub fn next_ticket(last: Option<&str>) -> String {
    format_ticket(next_sequence(0, last))
}
