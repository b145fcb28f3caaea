//! Engine Error Types
//!
//! The typed failure taxonomy returned by every engine operation. The API
//! layer maps these to targeted messages; nothing is surfaced as a generic
//! error string.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::core_types::Period;
use crate::money::MoneyError;

/// Engine error taxonomy
///
/// Error codes are stable strings for consistent API responses. All variants
/// are recoverable by the caller; `Unavailable` signals a persistence
/// failure and is never retried by the engine itself.
#[derive(Error, Debug, Clone)]
pub enum EngineError {
    // === Share assignment ===
    #[error("Share sum would exceed 1 (computed total {would_be_total})")]
    ShareOverflow { would_be_total: Decimal },

    #[error("Share must be greater than zero")]
    InvalidShare,

    #[error("No departments selected")]
    EmptyDepartmentSet,

    // === Expenses ===
    #[error("A monthly expense already exists for period {0}")]
    PeriodConflict(Period),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    // === Payments ===
    #[error("An approved payment already exists for this department and period")]
    AlreadySettled,

    // === Lifecycle transitions ===
    #[error("Invalid state transition: {0}")]
    InvalidTransition(String),

    #[error("Actor is not an administrator of this condominium")]
    Unauthorized,

    #[error("Rejection requires a non-empty reason")]
    MissingReason,

    // === Reservations / registrations ===
    #[error("Reservation time range is invalid")]
    InvalidTimeRange,

    #[error("Invalid registration: {0}")]
    InvalidRegistration(String),

    // === Lookups ===
    #[error("Condominium not found: {0}")]
    CondominiumNotFound(String),

    #[error("Department not found: {0}")]
    DepartmentNotFound(String),

    #[error("No monthly expense recorded for period {0}")]
    ExpenseNotFound(Period),

    #[error("Payment not found: {0}")]
    PaymentNotFound(String),

    #[error("Reservation not found: {0}")]
    ReservationNotFound(String),

    #[error("Common area not found: {0}")]
    AreaNotFound(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    // === System ===
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

impl EngineError {
    /// Get the error code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::ShareOverflow { .. } => "SHARE_OVERFLOW",
            EngineError::InvalidShare => "INVALID_SHARE",
            EngineError::EmptyDepartmentSet => "EMPTY_DEPARTMENT_SET",
            EngineError::PeriodConflict(_) => "PERIOD_CONFLICT",
            EngineError::InvalidAmount(_) => "INVALID_AMOUNT",
            EngineError::AlreadySettled => "ALREADY_SETTLED",
            EngineError::InvalidTransition(_) => "INVALID_TRANSITION",
            EngineError::Unauthorized => "UNAUTHORIZED",
            EngineError::MissingReason => "MISSING_REASON",
            EngineError::InvalidTimeRange => "INVALID_TIME_RANGE",
            EngineError::InvalidRegistration(_) => "INVALID_REGISTRATION",
            EngineError::CondominiumNotFound(_) => "CONDOMINIUM_NOT_FOUND",
            EngineError::DepartmentNotFound(_) => "DEPARTMENT_NOT_FOUND",
            EngineError::ExpenseNotFound(_) => "EXPENSE_NOT_FOUND",
            EngineError::PaymentNotFound(_) => "PAYMENT_NOT_FOUND",
            EngineError::ReservationNotFound(_) => "RESERVATION_NOT_FOUND",
            EngineError::AreaNotFound(_) => "AREA_NOT_FOUND",
            EngineError::UserNotFound(_) => "USER_NOT_FOUND",
            EngineError::Unavailable(_) => "UNAVAILABLE",
        }
    }

    /// Get HTTP status code suggestion
    pub fn http_status(&self) -> u16 {
        match self {
            EngineError::Unauthorized => 403,
            EngineError::InvalidShare
            | EngineError::EmptyDepartmentSet
            | EngineError::InvalidAmount(_)
            | EngineError::MissingReason
            | EngineError::InvalidTimeRange
            | EngineError::InvalidRegistration(_) => 400,
            EngineError::ShareOverflow { .. }
            | EngineError::PeriodConflict(_)
            | EngineError::AlreadySettled
            | EngineError::InvalidTransition(_) => 409,
            EngineError::CondominiumNotFound(_)
            | EngineError::DepartmentNotFound(_)
            | EngineError::ExpenseNotFound(_)
            | EngineError::PaymentNotFound(_)
            | EngineError::ReservationNotFound(_)
            | EngineError::AreaNotFound(_)
            | EngineError::UserNotFound(_) => 404,
            EngineError::Unavailable(_) => 503,
        }
    }
}

impl From<sqlx::Error> for EngineError {
    fn from(e: sqlx::Error) -> Self {
        EngineError::Unavailable(e.to_string())
    }
}

impl From<anyhow::Error> for EngineError {
    fn from(e: anyhow::Error) -> Self {
        EngineError::Unavailable(e.to_string())
    }
}

impl From<MoneyError> for EngineError {
    fn from(e: MoneyError) -> Self {
        EngineError::InvalidAmount(e.to_string())
    }
}
