//! Status lifecycle: Menunggu → Diproses → Selesai
//!
//! Transitions overwrite the status with their target. The current value is
//! not checked, so a call on a finished ticket moves it back to Diproses.

use serde::{Deserialize, Serialize};

use crate::models::ComplaintStatus;

/// Front desk buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    /// Call the customer to the desk
    Call,
    /// Mark handling as done
    Finish,
}

impl Transition {
    /// Status the button is meant for
    pub fn source(&self) -> ComplaintStatus {
        match self {
            Self::Call => ComplaintStatus::Menunggu,
            Self::Finish => ComplaintStatus::Diproses,
        }
    }

    pub fn target(&self) -> ComplaintStatus {
        match self {
            Self::Call => ComplaintStatus::Diproses,
            Self::Finish => ComplaintStatus::Selesai,
        }
    }

    /// Status after applying the transition to `current`
    pub fn apply(&self, current: ComplaintStatus) -> ComplaintStatus {
        if current != self.source() {
            tracing::debug!(
                transition = ?self,
                from = %current,
                "Transition applied outside its usual source status"
            );
        }
        self.target()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Call => "call",
            Self::Finish => "finish",
        }
    }
}
