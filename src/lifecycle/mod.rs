//! Approval Lifecycles
//!
//! The payment, reservation and registration state machines plus the
//! coordinator that is the engine's single public mutation surface.
//!
//! # State Machines
//!
//! ```text
//! payments / reservations:   PENDING -> APPROVED | REJECTED   (terminal)
//! registrations:             INACTIVE -> ACTIVE
//! ```
//!
//! # Safety Invariants
//!
//! 1. **CAS transitions**: every state change is an atomic compare-and-swap
//!    at the store; concurrent decisions on one record serialize and the
//!    loser gets `InvalidTransition`
//! 2. **Frozen amounts**: a payment's `amount_paid` is computed from the
//!    share assignment at submission time and never recomputed
//! 3. **Admin-only decisions**: only the owning condominium's admin or a
//!    super-admin decides a request

pub mod coordinator;
pub mod payment;
pub mod request;
pub mod state;
pub mod types;


// Re-exports for convenience
pub use coordinator::ApprovalCoordinator;
pub use payment::PaymentLifecycle;
pub use request::RequestLifecycle;
pub use state::{DecisionOutcome, RequestState};
pub use types::{
    PaymentId, PaymentMethod, PaymentRecord, RegistrationInput, ReservationId, ReservationRequest,
};
