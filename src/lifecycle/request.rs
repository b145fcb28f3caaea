//! Request Lifecycle
//!
//! The generic pending/approved/rejected machine reused by common-area
//! reservation requests and owner/guard registrations. Registrations use
//! the same two-outcome shape with the rejected outcome unused: an account
//! goes `INACTIVE -> ACTIVE` and an admin simply leaves it inactive
//! otherwise.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use super::state::{DecisionOutcome, RequestState};
use super::types::{RegistrationInput, ReservationId, ReservationRequest};
use crate::core_types::CondominiumId;
use crate::error::EngineError;
use crate::models::{AccountStatus, Actor, Role, User};
use crate::store::EngineStore;

/// Drives reservation requests and registrations.
///
/// Authorization for `decide_reservation` is enforced by the
/// [`ApprovalCoordinator`](super::coordinator::ApprovalCoordinator).
pub struct RequestLifecycle {
    store: Arc<dyn EngineStore>,
}

impl RequestLifecycle {
    pub fn new(store: Arc<dyn EngineStore>) -> Self {
        Self { store }
    }

    /// Create a reservation request for a common area.
    ///
    /// Overlap with other reservations for the same area and window is NOT
    /// checked; first-come-first-served vs. conflict rejection is an open
    /// product question.
    ///
    /// # Errors
    /// * `Unauthorized` - actor is not an owner of this condominium
    /// * `AreaNotFound` - no such common area in the condominium
    /// * `InvalidTimeRange` - empty/inverted range or a start in the past
    pub async fn create_reservation(
        &self,
        actor: &Actor,
        condominium_id: CondominiumId,
        area_name: &str,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
    ) -> Result<ReservationRequest, EngineError> {
        if actor.role != Role::Owner || actor.condominium_id != Some(condominium_id) {
            return Err(EngineError::Unauthorized);
        }

        self.store
            .common_area(condominium_id, area_name)
            .await?
            .ok_or_else(|| EngineError::AreaNotFound(area_name.to_string()))?;

        if starts_at >= ends_at || starts_at < Utc::now() {
            return Err(EngineError::InvalidTimeRange);
        }

        let record = ReservationRequest::new(
            condominium_id,
            area_name.to_string(),
            actor.user_id,
            starts_at,
            ends_at,
        );
        self.store.insert_reservation(&record).await?;

        info!(
            reservation_id = %record.reservation_id,
            area = area_name,
            "Reservation requested"
        );

        Ok(record)
    }

    /// Decide a pending reservation.
    ///
    /// Rejection requires a non-empty reason after trimming; approval
    /// ignores `reason`.
    pub async fn decide_reservation(
        &self,
        reservation_id: ReservationId,
        outcome: DecisionOutcome,
        reason: Option<&str>,
    ) -> Result<ReservationRequest, EngineError> {
        let record = self
            .store
            .reservation(reservation_id)
            .await?
            .ok_or_else(|| EngineError::ReservationNotFound(reservation_id.to_string()))?;

        if record.state.is_terminal() {
            return Err(EngineError::InvalidTransition(format!(
                "reservation {} is already {}",
                reservation_id, record.state
            )));
        }

        let rejection_reason = match outcome {
            DecisionOutcome::Reject => {
                let trimmed = reason.map(str::trim).unwrap_or("");
                if trimmed.is_empty() {
                    return Err(EngineError::MissingReason);
                }
                Some(trimmed.to_string())
            }
            DecisionOutcome::Approve => None,
        };

        let target = outcome.target_state();
        if !self
            .store
            .update_reservation_state_if(
                reservation_id,
                RequestState::Pending,
                target,
                rejection_reason.as_deref(),
            )
            .await?
        {
            let current = self
                .store
                .reservation(reservation_id)
                .await?
                .ok_or_else(|| EngineError::ReservationNotFound(reservation_id.to_string()))?;
            return Err(EngineError::InvalidTransition(format!(
                "reservation {} is already {}",
                reservation_id, current.state
            )));
        }

        info!(reservation_id = %reservation_id, state = %target, "Reservation decided");

        self.store
            .reservation(reservation_id)
            .await?
            .ok_or_else(|| EngineError::ReservationNotFound(reservation_id.to_string()))
    }

    /// Self-register an owner or guard account, starting `Inactive`.
    ///
    /// # Errors
    /// * `InvalidRegistration` - wrong role, blank fields, malformed email,
    ///   or an owner without a department
    /// * `CondominiumNotFound` / `DepartmentNotFound`
    pub async fn register(&self, input: RegistrationInput) -> Result<User, EngineError> {
        if !matches!(input.role, Role::Owner | Role::Guard) {
            return Err(EngineError::InvalidRegistration(
                "only owner and guard accounts self-register".into(),
            ));
        }

        let name = input.name.trim();
        if name.is_empty() {
            return Err(EngineError::InvalidRegistration("name is required".into()));
        }
        let email = input.email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(EngineError::InvalidRegistration(
                "a valid email is required".into(),
            ));
        }

        self.store
            .condominium(input.condominium_id)
            .await?
            .ok_or_else(|| EngineError::CondominiumNotFound(input.condominium_id.to_string()))?;

        let department_id = match input.role {
            Role::Owner => {
                let department_id = input.department_id.ok_or_else(|| {
                    EngineError::InvalidRegistration(
                        "owner registration requires a department".into(),
                    )
                })?;
                let department = self
                    .store
                    .department(department_id)
                    .await?
                    .ok_or_else(|| EngineError::DepartmentNotFound(department_id.to_string()))?;
                if department.condominium_id != input.condominium_id {
                    return Err(EngineError::DepartmentNotFound(department_id.to_string()));
                }
                Some(department_id)
            }
            _ => None,
        };

        let user = User {
            user_id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            role: input.role,
            status: AccountStatus::Inactive,
            condominium_id: Some(input.condominium_id),
            department_id,
        };
        self.store.insert_user(&user).await?;

        info!(user_id = %user.user_id, role = %user.role, "Registration received");

        Ok(user)
    }
}
