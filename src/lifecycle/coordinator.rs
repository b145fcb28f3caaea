//! Approval Coordinator
//!
//! Single entry point for every mutation of the engine. Enforces that only
//! the owning condominium's admin (or a super-admin) decides requests,
//! translates domain failures into the typed taxonomy, and carries the one
//! defined side effect beyond a record's own state field: activating a user
//! account when its registration is approved.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::{info, warn};

use super::payment::PaymentLifecycle;
use super::request::RequestLifecycle;
use super::state::DecisionOutcome;
use super::types::{
    PaymentId, PaymentMethod, PaymentRecord, RegistrationInput, ReservationId, ReservationRequest,
};
use crate::apportion;
use crate::core_types::{CondominiumId, DepartmentId, Period, UserId};
use crate::error::EngineError;
use crate::expense::MonthlyExpense;
use crate::models::{AccountStatus, Actor, Role, User};
use crate::share_ledger::{ShareLedger, ShareSummary};
use crate::store::EngineStore;

/// Attempts at the share-version CAS before giving up. A miss means a
/// concurrent conflicting assignment; the ledger is re-loaded and the sum
/// invariant re-validated on every retry.
const SHARE_CAS_ATTEMPTS: u32 = 3;

/// Orchestrates the lifecycles and the share ledger over one store.
pub struct ApprovalCoordinator {
    store: Arc<dyn EngineStore>,
    payments: PaymentLifecycle,
    requests: RequestLifecycle,
}

impl ApprovalCoordinator {
    pub fn new(store: Arc<dyn EngineStore>) -> Self {
        Self {
            payments: PaymentLifecycle::new(store.clone()),
            requests: RequestLifecycle::new(store.clone()),
            store,
        }
    }

    /// Require `actor` to be the condominium's own admin or a super-admin.
    ///
    /// The admin relation is checked against the stored condominium record,
    /// not against anything the actor claims about itself.
    async fn authorize_admin(
        &self,
        actor: &Actor,
        condominium_id: CondominiumId,
    ) -> Result<(), EngineError> {
        if actor.role == Role::SuperAdmin {
            return Ok(());
        }

        let condominium = self
            .store
            .condominium(condominium_id)
            .await?
            .ok_or_else(|| EngineError::CondominiumNotFound(condominium_id.to_string()))?;

        if actor.role == Role::Admin && condominium.admin_id == actor.user_id {
            Ok(())
        } else {
            Err(EngineError::Unauthorized)
        }
    }

    // ========================================================================
    // Shares
    // ========================================================================

    /// Set every selected department's share to exactly `new_share`.
    ///
    /// Atomic across the whole selection: the write is a compare-and-swap on
    /// the condominium's share version, retried against fresh state on
    /// conflict so the sum invariant can never be observed violated.
    pub async fn assign_shares(
        &self,
        actor: &Actor,
        condominium_id: CondominiumId,
        department_ids: &[DepartmentId],
        new_share: Decimal,
    ) -> Result<ShareSummary, EngineError> {
        self.authorize_admin(actor, condominium_id).await?;

        let selection: HashSet<DepartmentId> = department_ids.iter().copied().collect();

        for attempt in 1..=SHARE_CAS_ATTEMPTS {
            let (entries, version) = self.store.load_shares(condominium_id).await?;
            let mut ledger = ShareLedger::from_entries(condominium_id, entries, version);

            ledger.assign(&selection, new_share)?;

            let updates: Vec<(DepartmentId, Decimal)> =
                selection.iter().map(|id| (*id, new_share)).collect();
            if self
                .store
                .store_shares_if(condominium_id, version, &updates)
                .await?
            {
                let summary = ledger.summary();
                info!(
                    condominium_id = %condominium_id,
                    departments = selection.len(),
                    share = %new_share,
                    total = %summary.total,
                    "Shares assigned"
                );
                if summary.under_allocated {
                    warn!(
                        condominium_id = %condominium_id,
                        total = %summary.total,
                        "Share sum is below 1 (under-allocated)"
                    );
                }
                return Ok(summary);
            }

            warn!(
                condominium_id = %condominium_id,
                attempt,
                "Share version conflict, reloading ledger"
            );
        }

        Err(EngineError::Unavailable(
            "share ledger version conflict persisted across retries".into(),
        ))
    }

    /// Current share sum and under-allocation flag for display.
    pub async fn share_summary(
        &self,
        condominium_id: CondominiumId,
    ) -> Result<ShareSummary, EngineError> {
        let (entries, version) = self.store.load_shares(condominium_id).await?;
        Ok(ShareLedger::from_entries(condominium_id, entries, version).summary())
    }

    // ========================================================================
    // Expenses
    // ========================================================================

    /// Record a condominium's total expense for one period.
    ///
    /// Fails with `PeriodConflict` if an expense already exists for the
    /// period; corrections are new records, never updates.
    pub async fn record_monthly_expense(
        &self,
        actor: &Actor,
        condominium_id: CondominiumId,
        period: Period,
        total_amount: Decimal,
        description: Option<String>,
    ) -> Result<MonthlyExpense, EngineError> {
        self.authorize_admin(actor, condominium_id).await?;

        let expense = MonthlyExpense::new(condominium_id, period, total_amount, description)?;
        self.store.insert_expense(&expense).await?;

        info!(
            condominium_id = %condominium_id,
            period = %period,
            total = %expense.total_amount,
            "Monthly expense recorded"
        );

        Ok(expense)
    }

    /// Display-only value per unit of share for a period's expense:
    /// `total_amount / current share total`, 0 when nothing is allocated.
    pub async fn per_unit_value(
        &self,
        condominium_id: CondominiumId,
        period: Period,
    ) -> Result<Decimal, EngineError> {
        let expense = self
            .store
            .expense(condominium_id, period)
            .await?
            .ok_or(EngineError::ExpenseNotFound(period))?;
        let (entries, version) = self.store.load_shares(condominium_id).await?;
        let ledger = ShareLedger::from_entries(condominium_id, entries, version);
        // Display value divides by the rounded total, like the share sum
        // shown next to it; the authoritative owed amount never does.
        Ok(apportion::per_unit_value(
            expense.total_amount,
            ledger.current_total(),
        ))
    }

    // ========================================================================
    // Payments
    // ========================================================================

    /// Submit a payment for a department's obligation in `period`.
    pub async fn submit_payment(
        &self,
        actor: &Actor,
        department_id: DepartmentId,
        period: Period,
        method: PaymentMethod,
    ) -> Result<PaymentRecord, EngineError> {
        self.payments.submit(actor, department_id, period, method).await
    }

    /// Decide a pending payment as the owning condominium's admin.
    pub async fn decide_payment(
        &self,
        actor: &Actor,
        payment_id: PaymentId,
        outcome: DecisionOutcome,
    ) -> Result<PaymentRecord, EngineError> {
        let record = self
            .store
            .payment(payment_id)
            .await?
            .ok_or_else(|| EngineError::PaymentNotFound(payment_id.to_string()))?;
        self.authorize_admin(actor, record.condominium_id).await?;
        self.payments.decide(payment_id, outcome).await
    }

    /// Re-query a payment's current state.
    pub async fn payment(
        &self,
        payment_id: PaymentId,
    ) -> Result<Option<PaymentRecord>, EngineError> {
        self.store.payment(payment_id).await
    }

    // ========================================================================
    // Reservations
    // ========================================================================

    /// Request a common-area booking.
    pub async fn submit_reservation(
        &self,
        actor: &Actor,
        condominium_id: CondominiumId,
        area_name: &str,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
    ) -> Result<ReservationRequest, EngineError> {
        self.requests
            .create_reservation(actor, condominium_id, area_name, starts_at, ends_at)
            .await
    }

    /// Decide a pending reservation as the owning condominium's admin.
    /// Rejection requires a non-empty reason.
    pub async fn decide_reservation(
        &self,
        actor: &Actor,
        reservation_id: ReservationId,
        outcome: DecisionOutcome,
        reason: Option<&str>,
    ) -> Result<ReservationRequest, EngineError> {
        let record = self
            .store
            .reservation(reservation_id)
            .await?
            .ok_or_else(|| EngineError::ReservationNotFound(reservation_id.to_string()))?;
        self.authorize_admin(actor, record.condominium_id).await?;
        self.requests
            .decide_reservation(reservation_id, outcome, reason)
            .await
    }

    /// Re-query a reservation's current state.
    pub async fn reservation(
        &self,
        reservation_id: ReservationId,
    ) -> Result<Option<ReservationRequest>, EngineError> {
        self.store.reservation(reservation_id).await
    }

    // ========================================================================
    // Registrations and account status
    // ========================================================================

    /// Self-register an owner or guard account (starts `Inactive`).
    pub async fn register_user(&self, input: RegistrationInput) -> Result<User, EngineError> {
        self.requests.register(input).await
    }

    /// Approve a pending registration, activating the account.
    ///
    /// This is the one defined side effect beyond a record's own state
    /// field: the user account flips `INACTIVE -> ACTIVE`.
    pub async fn approve_registration(
        &self,
        actor: &Actor,
        user_id: UserId,
    ) -> Result<User, EngineError> {
        let user = self
            .store
            .user(user_id)
            .await?
            .ok_or_else(|| EngineError::UserNotFound(user_id.to_string()))?;

        let condominium_id = user.condominium_id.ok_or(EngineError::Unauthorized)?;
        self.authorize_admin(actor, condominium_id).await?;

        if !self
            .store
            .update_user_status_if(user_id, AccountStatus::Inactive, AccountStatus::Active)
            .await?
        {
            return Err(EngineError::InvalidTransition(format!(
                "user {} is already active",
                user_id
            )));
        }

        info!(user_id = %user_id, "Registration approved, account activated");

        self.store
            .user(user_id)
            .await?
            .ok_or_else(|| EngineError::UserNotFound(user_id.to_string()))
    }

    /// Enable or disable an owner/guard account.
    ///
    /// Admin accounts are managed by super-admins only; super-admin accounts
    /// are not managed through the engine at all.
    pub async fn set_user_status(
        &self,
        actor: &Actor,
        user_id: UserId,
        status: AccountStatus,
    ) -> Result<User, EngineError> {
        let user = self
            .store
            .user(user_id)
            .await?
            .ok_or_else(|| EngineError::UserNotFound(user_id.to_string()))?;

        match user.role {
            Role::Owner | Role::Guard => {
                let condominium_id = user.condominium_id.ok_or(EngineError::Unauthorized)?;
                self.authorize_admin(actor, condominium_id).await?;
            }
            Role::Admin => {
                if actor.role != Role::SuperAdmin {
                    return Err(EngineError::Unauthorized);
                }
            }
            Role::SuperAdmin => return Err(EngineError::Unauthorized),
        }

        if !self
            .store
            .update_user_status_if(user_id, status.opposite(), status)
            .await?
        {
            return Err(EngineError::InvalidTransition(format!(
                "user {} is already {}",
                user_id, status
            )));
        }

        info!(user_id = %user_id, status = %status, "Account status changed");

        self.store
            .user(user_id)
            .await?
            .ok_or_else(|| EngineError::UserNotFound(user_id.to_string()))
    }
}
