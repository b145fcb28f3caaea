//! condoledger - Financial Apportionment & Approval Workflow Engine
//!
//! Core business rules for condominium management: splitting a recurring
//! monthly expense across departments by normalized proportional shares
//! ("alicuotas"), computing what each department owes, and driving payment,
//! reservation and registration requests through their approval lifecycles.
//!
//! The HTTP/UI tier is an external collaborator; it calls the engine through
//! [`ApprovalCoordinator`], the single public mutation surface.
//!
//! # Modules
//!
//! - [`core_types`] - Entity identifiers and the calendar `Period`
//! - [`money`] - Currency parsing and display rounding
//! - [`share_ledger`] - Per-condominium shares and the sum invariant
//! - [`apportion`] - Pure share-to-owed-amount conversion
//! - [`expense`] - Monthly expense records
//! - [`models`] - Condominiums, departments, areas and user accounts
//! - [`lifecycle`] - Payment/reservation/registration state machines
//! - [`store`] - Persistence boundary (PostgreSQL and in-memory)
//! - [`error`] - Typed failure taxonomy
//! - [`config`], [`logging`] - Runtime configuration and tracing setup

pub mod apportion;
pub mod config;
pub mod core_types;
pub mod error;
pub mod expense;
pub mod lifecycle;
pub mod logging;
pub mod models;
pub mod money;
pub mod share_ledger;
pub mod store;

// Convenient re-exports at crate root
pub use apportion::{amount_owed, per_unit_value};
pub use core_types::{CondominiumId, DepartmentId, Period, UserId};
pub use error::EngineError;
pub use expense::MonthlyExpense;
pub use lifecycle::{
    ApprovalCoordinator, DecisionOutcome, PaymentId, PaymentLifecycle, PaymentMethod,
    PaymentRecord, RegistrationInput, RequestLifecycle, RequestState, ReservationId,
    ReservationRequest,
};
pub use models::{AccountStatus, Actor, CommonArea, Condominium, Department, Role, User};
pub use share_ledger::{ShareLedger, ShareSummary};
pub use store::{EngineStore, memory::MemoryStore, postgres::PgStore};
