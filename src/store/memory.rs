//! In-Memory Store
//!
//! `HashMap`-backed [`EngineStore`] used by tests and demos. One mutex
//! guards all state, so the CAS methods get the same serialization
//! guarantees the PostgreSQL store gets from atomic UPDATEs.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;

use super::EngineStore;
use crate::core_types::{CondominiumId, DepartmentId, Period, UserId};
use crate::error::EngineError;
use crate::expense::MonthlyExpense;
use crate::lifecycle::state::RequestState;
use crate::lifecycle::types::{PaymentId, PaymentRecord, ReservationId, ReservationRequest};
use crate::models::{AccountStatus, CommonArea, Condominium, Department, User};

#[derive(Default)]
struct Inner {
    condominiums: HashMap<CondominiumId, Condominium>,
    departments: HashMap<DepartmentId, Department>,
    areas: HashMap<(CondominiumId, String), CommonArea>,
    users: HashMap<UserId, User>,
    share_versions: HashMap<CondominiumId, i64>,
    expenses: HashMap<(CondominiumId, Period), MonthlyExpense>,
    payments: HashMap<PaymentId, PaymentRecord>,
    reservations: HashMap<ReservationId, ReservationRequest>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // === Seeding helpers (entity CRUD lives outside the engine) ===

    pub fn seed_condominium(&self, condominium: Condominium) {
        let mut inner = self.inner.lock().unwrap();
        inner
            .share_versions
            .entry(condominium.condominium_id)
            .or_insert(0);
        inner
            .condominiums
            .insert(condominium.condominium_id, condominium);
    }

    pub fn seed_department(&self, department: Department) {
        self.inner
            .lock()
            .unwrap()
            .departments
            .insert(department.department_id, department);
    }

    pub fn seed_area(&self, area: CommonArea) {
        self.inner
            .lock()
            .unwrap()
            .areas
            .insert((area.condominium_id, area.name.clone()), area);
    }

    pub fn seed_user(&self, user: User) {
        self.inner.lock().unwrap().users.insert(user.user_id, user);
    }
}

#[async_trait]
impl EngineStore for MemoryStore {
    async fn condominium(&self, id: CondominiumId) -> Result<Option<Condominium>, EngineError> {
        Ok(self.inner.lock().unwrap().condominiums.get(&id).cloned())
    }

    async fn department(&self, id: DepartmentId) -> Result<Option<Department>, EngineError> {
        Ok(self.inner.lock().unwrap().departments.get(&id).cloned())
    }

    async fn common_area(
        &self,
        condominium_id: CondominiumId,
        name: &str,
    ) -> Result<Option<CommonArea>, EngineError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .areas
            .get(&(condominium_id, name.to_string()))
            .cloned())
    }

    async fn user(&self, id: UserId) -> Result<Option<User>, EngineError> {
        Ok(self.inner.lock().unwrap().users.get(&id).cloned())
    }

    async fn insert_user(&self, user: &User) -> Result<(), EngineError> {
        self.inner
            .lock()
            .unwrap()
            .users
            .insert(user.user_id, user.clone());
        Ok(())
    }

    async fn update_user_status_if(
        &self,
        id: UserId,
        expected: AccountStatus,
        new: AccountStatus,
    ) -> Result<bool, EngineError> {
        let mut inner = self.inner.lock().unwrap();
        match inner.users.get_mut(&id) {
            Some(user) if user.status == expected => {
                user.status = new;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn load_shares(
        &self,
        condominium_id: CondominiumId,
    ) -> Result<(Vec<(DepartmentId, Decimal)>, i64), EngineError> {
        let inner = self.inner.lock().unwrap();
        let entries = inner
            .departments
            .values()
            .filter(|d| d.condominium_id == condominium_id)
            .map(|d| (d.department_id, d.share))
            .collect();
        let version = inner
            .share_versions
            .get(&condominium_id)
            .copied()
            .unwrap_or(0);
        Ok((entries, version))
    }

    async fn store_shares_if(
        &self,
        condominium_id: CondominiumId,
        expected_version: i64,
        updates: &[(DepartmentId, Decimal)],
    ) -> Result<bool, EngineError> {
        let mut inner = self.inner.lock().unwrap();
        let version = inner
            .share_versions
            .get(&condominium_id)
            .copied()
            .unwrap_or(0);
        if version != expected_version {
            return Ok(false);
        }

        for (department_id, share) in updates {
            if let Some(department) = inner.departments.get_mut(department_id) {
                department.share = *share;
            }
        }
        inner.share_versions.insert(condominium_id, version + 1);
        Ok(true)
    }

    async fn expense(
        &self,
        condominium_id: CondominiumId,
        period: Period,
    ) -> Result<Option<MonthlyExpense>, EngineError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .expenses
            .get(&(condominium_id, period))
            .cloned())
    }

    async fn insert_expense(&self, expense: &MonthlyExpense) -> Result<(), EngineError> {
        let mut inner = self.inner.lock().unwrap();
        let key = (expense.condominium_id, expense.period);
        if inner.expenses.contains_key(&key) {
            return Err(EngineError::PeriodConflict(expense.period));
        }
        inner.expenses.insert(key, expense.clone());
        Ok(())
    }

    async fn payment(&self, id: PaymentId) -> Result<Option<PaymentRecord>, EngineError> {
        Ok(self.inner.lock().unwrap().payments.get(&id).cloned())
    }

    async fn insert_payment(&self, record: &PaymentRecord) -> Result<(), EngineError> {
        self.inner
            .lock()
            .unwrap()
            .payments
            .insert(record.payment_id, record.clone());
        Ok(())
    }

    async fn has_approved_payment(
        &self,
        department_id: DepartmentId,
        period: Period,
    ) -> Result<bool, EngineError> {
        Ok(self.inner.lock().unwrap().payments.values().any(|p| {
            p.department_id == department_id
                && p.period == period
                && p.state == RequestState::Approved
        }))
    }

    async fn update_payment_state_if(
        &self,
        id: PaymentId,
        expected: RequestState,
        new: RequestState,
    ) -> Result<bool, EngineError> {
        let mut inner = self.inner.lock().unwrap();
        match inner.payments.get_mut(&id) {
            Some(record) if record.state == expected => {
                record.state = new;
                record.decided_at = Some(Utc::now().timestamp_millis());
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn reservation(
        &self,
        id: ReservationId,
    ) -> Result<Option<ReservationRequest>, EngineError> {
        Ok(self.inner.lock().unwrap().reservations.get(&id).cloned())
    }

    async fn insert_reservation(&self, record: &ReservationRequest) -> Result<(), EngineError> {
        self.inner
            .lock()
            .unwrap()
            .reservations
            .insert(record.reservation_id, record.clone());
        Ok(())
    }

    async fn update_reservation_state_if(
        &self,
        id: ReservationId,
        expected: RequestState,
        new: RequestState,
        rejection_reason: Option<&str>,
    ) -> Result<bool, EngineError> {
        let mut inner = self.inner.lock().unwrap();
        match inner.reservations.get_mut(&id) {
            Some(record) if record.state == expected => {
                record.state = new;
                record.rejection_reason = rejection_reason.map(str::to_string);
                record.decided_at = Some(Utc::now().timestamp_millis());
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
