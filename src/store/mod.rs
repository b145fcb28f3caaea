//! Persistence Boundary
//!
//! The engine talks to storage through [`EngineStore`]. Two implementations:
//! [`postgres::PgStore`] for production and [`memory::MemoryStore`] for
//! tests and demos.
//!
//! Every state mutation is expressed as a compare-and-swap so concurrent
//! writers serialize at this boundary: `update_*_state_if` returns `false`
//! when the expected state no longer matches, and `store_shares_if` returns
//! `false` when the condominium's share version moved. Storage failures
//! surface as `EngineError::Unavailable` and are never retried here.

pub mod memory;
pub mod postgres;
pub mod schema;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::core_types::{CondominiumId, DepartmentId, Period, UserId};
use crate::error::EngineError;
use crate::expense::MonthlyExpense;
use crate::lifecycle::state::RequestState;
use crate::lifecycle::types::{PaymentId, PaymentRecord, ReservationId, ReservationRequest};
use crate::models::{AccountStatus, CommonArea, Condominium, Department, User};

/// Storage operations the engine depends on.
#[async_trait]
pub trait EngineStore: Send + Sync {
    // === Entities ===

    async fn condominium(&self, id: CondominiumId) -> Result<Option<Condominium>, EngineError>;

    async fn department(&self, id: DepartmentId) -> Result<Option<Department>, EngineError>;

    async fn common_area(
        &self,
        condominium_id: CondominiumId,
        name: &str,
    ) -> Result<Option<CommonArea>, EngineError>;

    async fn user(&self, id: UserId) -> Result<Option<User>, EngineError>;

    async fn insert_user(&self, user: &User) -> Result<(), EngineError>;

    /// CAS on account status. Returns false when the current status does
    /// not match `expected`.
    async fn update_user_status_if(
        &self,
        id: UserId,
        expected: AccountStatus,
        new: AccountStatus,
    ) -> Result<bool, EngineError>;

    // === Shares ===

    /// All (department, share) entries of a condominium, including
    /// unassigned departments with share 0, plus the share version.
    async fn load_shares(
        &self,
        condominium_id: CondominiumId,
    ) -> Result<(Vec<(DepartmentId, Decimal)>, i64), EngineError>;

    /// Apply share updates atomically iff the condominium's share version
    /// still equals `expected_version`. Returns false on a version miss.
    async fn store_shares_if(
        &self,
        condominium_id: CondominiumId,
        expected_version: i64,
        updates: &[(DepartmentId, Decimal)],
    ) -> Result<bool, EngineError>;

    // === Expenses ===

    async fn expense(
        &self,
        condominium_id: CondominiumId,
        period: Period,
    ) -> Result<Option<MonthlyExpense>, EngineError>;

    /// Insert a monthly expense. Fails with `PeriodConflict` when one
    /// already exists for (condominium, period).
    async fn insert_expense(&self, expense: &MonthlyExpense) -> Result<(), EngineError>;

    // === Payments ===

    async fn payment(&self, id: PaymentId) -> Result<Option<PaymentRecord>, EngineError>;

    async fn insert_payment(&self, record: &PaymentRecord) -> Result<(), EngineError>;

    /// Whether an APPROVED payment exists for (department, period).
    async fn has_approved_payment(
        &self,
        department_id: DepartmentId,
        period: Period,
    ) -> Result<bool, EngineError>;

    /// CAS on payment state; stamps `decided_at` on success. Returns false
    /// when the current state does not match `expected`.
    async fn update_payment_state_if(
        &self,
        id: PaymentId,
        expected: RequestState,
        new: RequestState,
    ) -> Result<bool, EngineError>;

    // === Reservations ===

    async fn reservation(
        &self,
        id: ReservationId,
    ) -> Result<Option<ReservationRequest>, EngineError>;

    async fn insert_reservation(&self, record: &ReservationRequest) -> Result<(), EngineError>;

    /// CAS on reservation state; stores the rejection reason and stamps
    /// `decided_at` on success.
    async fn update_reservation_state_if(
        &self,
        id: ReservationId,
        expected: RequestState,
        new: RequestState,
        rejection_reason: Option<&str>,
    ) -> Result<bool, EngineError>;
}
