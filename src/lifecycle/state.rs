//! Request State Definitions
//!
//! State IDs are designed for PostgreSQL storage as SMALLINT.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Request lifecycle states
///
/// Shared by payment records and reservation requests. Terminal states:
/// APPROVED (10), REJECTED (-10). There are no transitions out of a
/// terminal state: re-payment for the same month creates a new record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i16)]
pub enum RequestState {
    /// Initial state - submitted and waiting for an admin decision
    Pending = 0,

    /// Terminal: accepted by the condominium's admin
    Approved = 10,

    /// Terminal: rejected by the condominium's admin
    Rejected = -10,
}

impl RequestState {
    /// Check if this is a terminal state (no more transitions possible)
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, RequestState::Approved | RequestState::Rejected)
    }

    /// Get the numeric state ID for PostgreSQL storage
    #[inline]
    pub fn id(&self) -> i16 {
        *self as i16
    }

    /// Convert from PostgreSQL state ID
    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            0 => Some(RequestState::Pending),
            10 => Some(RequestState::Approved),
            -10 => Some(RequestState::Rejected),
            _ => None,
        }
    }

    /// Get human-readable state name
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestState::Pending => "PENDING",
            RequestState::Approved => "APPROVED",
            RequestState::Rejected => "REJECTED",
        }
    }
}

impl fmt::Display for RequestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<i16> for RequestState {
    type Error = ();

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        RequestState::from_id(value).ok_or(())
    }
}

/// An admin's decision on a pending request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionOutcome {
    Approve,
    Reject,
}

impl DecisionOutcome {
    /// The terminal state this decision transitions a pending request to.
    pub fn target_state(&self) -> RequestState {
        match self {
            DecisionOutcome::Approve => RequestState::Approved,
            DecisionOutcome::Reject => RequestState::Rejected,
        }
    }
}
