//! Payment Lifecycle
//!
//! State machine for a department's payment of its monthly obligation:
//! `PENDING -> APPROVED | REJECTED`, both terminal. The owed amount is
//! computed from the share assignment at submission time and frozen on the
//! record.

use std::sync::Arc;

use tracing::info;

use super::state::{DecisionOutcome, RequestState};
use super::types::{PaymentId, PaymentMethod, PaymentRecord};
use crate::apportion;
use crate::core_types::{DepartmentId, Period};
use crate::error::EngineError;
use crate::models::{Actor, Role};
use crate::store::EngineStore;

/// Drives payment records through their lifecycle.
///
/// Authorization for `decide` is enforced by the
/// [`ApprovalCoordinator`](super::coordinator::ApprovalCoordinator), the
/// single public entry point; this type owns the state rules.
pub struct PaymentLifecycle {
    store: Arc<dyn EngineStore>,
}

impl PaymentLifecycle {
    pub fn new(store: Arc<dyn EngineStore>) -> Self {
        Self { store }
    }

    /// Submit a payment for a department's obligation in `period`.
    ///
    /// The amount is `share_of(department) * expense.total_amount` at this
    /// moment, frozen on the record.
    ///
    /// # Errors
    /// * `Unauthorized` - actor is not the owner assigned to the department
    /// * `DepartmentNotFound` / `ExpenseNotFound`
    /// * `AlreadySettled` - an approved record already exists for
    ///   (department, period); a rejected one does not block resubmission
    pub async fn submit(
        &self,
        actor: &Actor,
        department_id: DepartmentId,
        period: Period,
        method: PaymentMethod,
    ) -> Result<PaymentRecord, EngineError> {
        let department = self
            .store
            .department(department_id)
            .await?
            .ok_or_else(|| EngineError::DepartmentNotFound(department_id.to_string()))?;

        if actor.role != Role::Owner || actor.department_id != Some(department_id) {
            return Err(EngineError::Unauthorized);
        }

        let expense = self
            .store
            .expense(department.condominium_id, period)
            .await?
            .ok_or(EngineError::ExpenseNotFound(period))?;

        if self.store.has_approved_payment(department_id, period).await? {
            return Err(EngineError::AlreadySettled);
        }

        let amount_paid = apportion::amount_owed(department.share, expense.total_amount);
        let record = PaymentRecord::new(
            department.condominium_id,
            department_id,
            actor.user_id,
            period,
            amount_paid,
            method,
        );
        self.store.insert_payment(&record).await?;

        info!(
            payment_id = %record.payment_id,
            department_id = %department_id,
            period = %period,
            amount = %amount_paid,
            "Payment submitted"
        );

        Ok(record)
    }

    /// Decide a pending payment.
    ///
    /// The transition is a CAS `PENDING -> outcome`; losing the race to a
    /// concurrent decision fails with `InvalidTransition`, and the record
    /// keeps whichever state the winner wrote.
    pub async fn decide(
        &self,
        payment_id: PaymentId,
        outcome: DecisionOutcome,
    ) -> Result<PaymentRecord, EngineError> {
        let record = self
            .store
            .payment(payment_id)
            .await?
            .ok_or_else(|| EngineError::PaymentNotFound(payment_id.to_string()))?;

        if record.state.is_terminal() {
            return Err(EngineError::InvalidTransition(format!(
                "payment {} is already {}",
                payment_id, record.state
            )));
        }

        let target = outcome.target_state();
        if !self
            .store
            .update_payment_state_if(payment_id, RequestState::Pending, target)
            .await?
        {
            // Another decision got there first - report the state it wrote
            let current = self
                .store
                .payment(payment_id)
                .await?
                .ok_or_else(|| EngineError::PaymentNotFound(payment_id.to_string()))?;
            return Err(EngineError::InvalidTransition(format!(
                "payment {} is already {}",
                payment_id, current.state
            )));
        }

        info!(payment_id = %payment_id, state = %target, "Payment decided");

        self.store
            .payment(payment_id)
            .await?
            .ok_or_else(|| EngineError::PaymentNotFound(payment_id.to_string()))
    }
}
