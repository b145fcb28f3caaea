//! Core types used throughout the engine
//!
//! Entity identifiers and the calendar `Period` every monthly expense and
//! payment is keyed by.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Condominium ID - the top-level tenant entity.
///
/// Primary key for condominiums; every department, common area and monthly
/// expense belongs to exactly one.
pub type CondominiumId = Uuid;

/// Department ID - an individually owned unit within a condominium.
pub type DepartmentId = Uuid;

/// User ID - admins, owners and guards share one account namespace.
pub type UserId = Uuid;

/// Calendar month a monthly expense belongs to.
///
/// Unique per condominium: recording a second expense for the same period is
/// a conflict, not an upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Period {
    year: i32,
    month: u32,
}

impl Period {
    /// Create a period, validating the month is in 1..=12.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if (1..=12).contains(&month) {
            Some(Self { year, month })
        } else {
            None
        }
    }

    /// The period containing the current wall-clock instant (UTC).
    pub fn current() -> Self {
        let now = Utc::now();
        Self {
            year: now.year(),
            month: now.month(),
        }
    }

    #[inline]
    pub fn year(&self) -> i32 {
        self.year
    }

    #[inline]
    pub fn month(&self) -> u32 {
        self.month
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Error parsing a `Period` from its `YYYY-MM` form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid period (expected YYYY-MM): {0}")]
pub struct ParsePeriodError(pub String);

impl FromStr for Period {
    type Err = ParsePeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s
            .split_once('-')
            .ok_or_else(|| ParsePeriodError(s.to_string()))?;
        let year: i32 = year.parse().map_err(|_| ParsePeriodError(s.to_string()))?;
        let month: u32 = month.parse().map_err(|_| ParsePeriodError(s.to_string()))?;
        Period::new(year, month).ok_or_else(|| ParsePeriodError(s.to_string()))
    }
}
