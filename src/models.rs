//! Domain models
//!
//! Condominiums, departments, common areas and user accounts. These are the
//! persisted entities the lifecycles operate on; request records live in
//! [`crate::lifecycle::types`].

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core_types::{CondominiumId, DepartmentId, UserId};

/// User roles
///
/// Role IDs are designed for PostgreSQL storage as SMALLINT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i16)]
pub enum Role {
    /// Manages admins and condominiums across the whole system
    SuperAdmin = 1,
    /// Administers exactly one condominium and decides its requests
    Admin = 2,
    /// Owns a department; submits payments and reservation requests
    Owner = 3,
    /// Gate security staff of one condominium
    Guard = 4,
}

impl Role {
    /// Get the numeric role ID for PostgreSQL storage
    #[inline]
    pub fn id(&self) -> i16 {
        *self as i16
    }

    /// Convert from PostgreSQL role ID
    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            1 => Some(Role::SuperAdmin),
            2 => Some(Role::Admin),
            3 => Some(Role::Owner),
            4 => Some(Role::Guard),
            _ => None,
        }
    }

    /// Get human-readable role name
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "SUPER_ADMIN",
            Role::Admin => "ADMIN",
            Role::Owner => "OWNER",
            Role::Guard => "GUARD",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<i16> for Role {
    type Error = ();

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        Role::from_id(value).ok_or(())
    }
}

/// Account status - the two-state registration lifecycle.
///
/// A self-registered account starts `Inactive` and becomes `Active` when an
/// admin approves it. There is no explicit rejected state: an admin leaves
/// the account inactive or deletes it out-of-band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i16)]
pub enum AccountStatus {
    Inactive = 0,
    Active = 1,
}

impl AccountStatus {
    #[inline]
    pub fn id(&self) -> i16 {
        *self as i16
    }

    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            0 => Some(AccountStatus::Inactive),
            1 => Some(AccountStatus::Active),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Inactive => "INACTIVE",
            AccountStatus::Active => "ACTIVE",
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        matches!(self, AccountStatus::Active)
    }

    /// The only state this one can be reached from.
    pub fn opposite(&self) -> Self {
        match self {
            AccountStatus::Inactive => AccountStatus::Active,
            AccountStatus::Active => AccountStatus::Inactive,
        }
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<i16> for AccountStatus {
    type Error = ();

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        AccountStatus::from_id(value).ok_or(())
    }
}

/// The top-level tenant entity grouping departments, common areas and
/// monthly expenses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Condominium {
    pub condominium_id: CondominiumId,
    pub name: String,
    /// The one admin allowed to decide requests for this condominium.
    pub admin_id: UserId,
    pub active: bool,
}

/// An individually owned unit within a condominium.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Department {
    pub department_id: DepartmentId,
    pub condominium_id: CondominiumId,
    /// Display label, e.g. "A-101".
    pub code: String,
    /// Normalized proportional claim on the condominium's monthly expense,
    /// in [0, 1]. Stored with at least 3 decimal places of precision.
    pub share: Decimal,
}

/// A bookable shared space (pool, event hall, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommonArea {
    pub condominium_id: CondominiumId,
    /// Unique per condominium; reservation requests reference it by name.
    pub name: String,
    pub capacity: Option<u32>,
    pub description: Option<String>,
}

/// A user account. Owners and guards self-register `Inactive` and wait for
/// admin approval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub user_id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub status: AccountStatus,
    /// The condominium this account belongs to (owners and guards).
    pub condominium_id: Option<CondominiumId>,
    /// The department an owner account is attached to.
    pub department_id: Option<DepartmentId>,
}

/// The authenticated identity performing an operation.
///
/// Built by the (external) API layer from its session; the engine only
/// trusts the fields it re-checks against the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: UserId,
    pub role: Role,
    pub condominium_id: Option<CondominiumId>,
    pub department_id: Option<DepartmentId>,
}

impl Actor {
    pub fn from_user(user: &User) -> Self {
        Self {
            user_id: user.user_id,
            role: user.role,
            condominium_id: user.condominium_id,
            department_id: user.department_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_id_roundtrip() {
        for role in [Role::SuperAdmin, Role::Admin, Role::Owner, Role::Guard] {
            assert_eq!(Role::from_id(role.id()), Some(role));
        }
        assert_eq!(Role::from_id(0), None);
        assert_eq!(Role::from_id(5), None);
    }

    #[test]
    fn test_account_status_roundtrip() {
        assert_eq!(AccountStatus::from_id(0), Some(AccountStatus::Inactive));
        assert_eq!(AccountStatus::from_id(1), Some(AccountStatus::Active));
        assert_eq!(AccountStatus::from_id(2), None);

        assert!(AccountStatus::Active.is_active());
        assert!(!AccountStatus::Inactive.is_active());
    }

    #[test]
    fn test_status_opposite() {
        assert_eq!(AccountStatus::Active.opposite(), AccountStatus::Inactive);
        assert_eq!(AccountStatus::Inactive.opposite(), AccountStatus::Active);
    }

    #[test]
    fn test_display() {
        assert_eq!(Role::Admin.to_string(), "ADMIN");
        assert_eq!(AccountStatus::Inactive.to_string(), "INACTIVE");
    }
}
