//! Monthly Expenses
//!
//! A recorded total cost for a condominium for one calendar period,
//! apportioned across departments by share. Immutable once created; a
//! correction is a new record, never an update.

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core_types::{CondominiumId, Period};
use crate::error::EngineError;
use crate::money;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyExpense {
    pub condominium_id: CondominiumId,
    /// Unique per condominium; a second expense for the same period is a
    /// `PeriodConflict`.
    pub period: Period,
    /// Non-negative. Full precision is kept internally; display rounding
    /// happens in [`crate::money`].
    pub total_amount: Decimal,
    pub description: Option<String>,
    /// Creation timestamp (millis).
    pub created_at: i64,
}

impl MonthlyExpense {
    /// Validate and build a new expense record.
    ///
    /// # Errors
    /// * `InvalidAmount` - negative or sub-cent `total_amount`
    pub fn new(
        condominium_id: CondominiumId,
        period: Period,
        total_amount: Decimal,
        description: Option<String>,
    ) -> Result<Self, EngineError> {
        let total_amount = money::validate_amount(total_amount)?;
        let description = description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        Ok(Self {
            condominium_id,
            period,
            total_amount,
            description,
            created_at: Utc::now().timestamp_millis(),
        })
    }
}
