//! Lifecycle Record Types
//!
//! Payment and reservation records plus the registration input. Records are
//! append-only: state moves through CAS updates, rows are never deleted.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::state::RequestState;
use crate::core_types::{CondominiumId, DepartmentId, Period, UserId};
use crate::models::Role;

/// Payment record identifier - ULID-based.
///
/// Monotonic and sortable, generated without coordination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaymentId(ulid::Ulid);

impl PaymentId {
    /// Generate a new unique PaymentId
    pub fn new() -> Self {
        Self(ulid::Ulid::new())
    }

    /// Get the inner ULID value
    pub fn inner(&self) -> ulid::Ulid {
        self.0
    }
}

impl Default for PaymentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PaymentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PaymentId {
    type Err = ulid::DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(ulid::Ulid::from_string(s)?))
    }
}

/// Reservation request identifier - ULID-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReservationId(ulid::Ulid);

impl ReservationId {
    pub fn new() -> Self {
        Self(ulid::Ulid::new())
    }

    pub fn inner(&self) -> ulid::Ulid {
        self.0
    }
}

impl Default for ReservationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ReservationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ReservationId {
    type Err = ulid::DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(ulid::Ulid::from_string(s)?))
    }
}

/// How an owner paid their monthly obligation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i16)]
pub enum PaymentMethod {
    Cash = 1,
    Transfer = 2,
}

impl PaymentMethod {
    #[inline]
    pub fn id(&self) -> i16 {
        *self as i16
    }

    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            1 => Some(PaymentMethod::Cash),
            2 => Some(PaymentMethod::Transfer),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "CASH",
            PaymentMethod::Transfer => "TRANSFER",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<i16> for PaymentMethod {
    type Error = ();

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        PaymentMethod::from_id(value).ok_or(())
    }
}

/// One department's payment attempt for one period.
///
/// `amount_paid` is frozen at submission time from the share assignment of
/// that moment; later share re-assignment never alters what a department
/// was charged for a month it already paid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub payment_id: PaymentId,
    pub condominium_id: CondominiumId,
    pub department_id: DepartmentId,
    /// Who submitted the payment. Non-owning reference, kept for display
    /// and authorization checks only.
    pub paid_by: UserId,
    pub period: Period,
    /// Frozen at submission; never recomputed after creation.
    pub amount_paid: Decimal,
    pub method: PaymentMethod,
    pub state: RequestState,
    /// Submission timestamp (millis)
    pub submitted_at: i64,
    /// Decision timestamp (millis), set when the record leaves `Pending`
    pub decided_at: Option<i64>,
}

impl PaymentRecord {
    /// Create a new record in `Pending` state.
    pub fn new(
        condominium_id: CondominiumId,
        department_id: DepartmentId,
        paid_by: UserId,
        period: Period,
        amount_paid: Decimal,
        method: PaymentMethod,
    ) -> Self {
        Self {
            payment_id: PaymentId::new(),
            condominium_id,
            department_id,
            paid_by,
            period,
            amount_paid,
            method,
            state: RequestState::Pending,
            submitted_at: Utc::now().timestamp_millis(),
            decided_at: None,
        }
    }
}

impl fmt::Display for PaymentRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Payment[{}] department={} period={} amount={} method={} state={}",
            self.payment_id,
            self.department_id,
            self.period,
            self.amount_paid,
            self.method,
            self.state
        )
    }
}

/// A request to book a common area for a time range, subject to admin
/// approval. Rejection always carries a non-empty reason.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationRequest {
    pub reservation_id: ReservationId,
    pub condominium_id: CondominiumId,
    pub area_name: String,
    /// Who requested the booking. Non-owning reference.
    pub requested_by: UserId,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub state: RequestState,
    pub rejection_reason: Option<String>,
    /// Submission timestamp (millis)
    pub submitted_at: i64,
    /// Decision timestamp (millis)
    pub decided_at: Option<i64>,
}

impl ReservationRequest {
    /// Create a new request in `Pending` state.
    pub fn new(
        condominium_id: CondominiumId,
        area_name: String,
        requested_by: UserId,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
    ) -> Self {
        Self {
            reservation_id: ReservationId::new(),
            condominium_id,
            area_name,
            requested_by,
            starts_at,
            ends_at,
            state: RequestState::Pending,
            rejection_reason: None,
            submitted_at: Utc::now().timestamp_millis(),
            decided_at: None,
        }
    }
}

impl fmt::Display for ReservationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Reservation[{}] area={} {} -> {} state={}",
            self.reservation_id, self.area_name, self.starts_at, self.ends_at, self.state
        )
    }
}

/// Self-registration payload for owner and guard accounts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationInput {
    pub name: String,
    pub email: String,
    pub role: Role,
    pub condominium_id: CondominiumId,
    /// Required for owners, ignored for guards.
    pub department_id: Option<DepartmentId>,
}
