//! Share Ledger
//!
//! Owns the per-department proportional shares ("alicuotas") of one
//! condominium and guards the sum-of-shares invariant: the raw sum of all
//! active departments' shares never exceeds 1 plus an additive tolerance.
//!
//! The ledger is an in-memory snapshot loaded from the store together with a
//! version counter. Writers persist through a compare-and-swap on that
//! version, so two concurrent conflicting assignments cannot both commit and
//! the invariant is re-validated against fresh state on every retry.
//!
//! Display rounding (3 decimals) and the authoritative overflow comparison
//! are deliberately separate: the overflow check uses the raw sum with an
//! epsilon tolerance, never the rounded total.

use std::collections::{HashMap, HashSet};

use rust_decimal::Decimal;

use crate::core_types::{CondominiumId, DepartmentId};
use crate::error::EngineError;
use crate::money;

/// Additive tolerance on the raw share sum. Absorbs rounding noise from
/// share values that originated as floating-point input upstream.
pub fn share_epsilon() -> Decimal {
    Decimal::new(1, 3) // 0.001
}

/// Outcome summary of a ledger read or a committed assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShareSummary {
    /// Condominium-wide share sum rounded to 3 decimals for display.
    pub total: Decimal,
    /// True when the rounded total is strictly below 1. A warning state,
    /// not an error: departments may exist with share 0.
    pub under_allocated: bool,
}

/// Per-condominium share ledger snapshot.
///
/// # Invariants (enforced by [`ShareLedger::assign`]):
/// - raw sum of shares <= 1 + epsilon at all times
/// - shares are set to exact values, never incremented
/// - an assignment is all-or-nothing across its whole selection
#[derive(Debug, Clone)]
pub struct ShareLedger {
    condominium_id: CondominiumId,
    shares: HashMap<DepartmentId, Decimal>,
    version: i64,
}

impl ShareLedger {
    /// Build a ledger snapshot from stored entries.
    ///
    /// `entries` must contain every department of the condominium,
    /// unassigned ones with share 0 - membership of the map is what makes
    /// a department assignable.
    pub fn from_entries(
        condominium_id: CondominiumId,
        entries: impl IntoIterator<Item = (DepartmentId, Decimal)>,
        version: i64,
    ) -> Self {
        Self {
            condominium_id,
            shares: entries.into_iter().collect(),
            version,
        }
    }

    #[inline]
    pub fn condominium_id(&self) -> CondominiumId {
        self.condominium_id
    }

    /// Store version this snapshot was loaded at.
    #[inline]
    pub fn version(&self) -> i64 {
        self.version
    }

    /// Current share of a department, 0 if unassigned.
    pub fn share_of(&self, department_id: DepartmentId) -> Decimal {
        self.shares
            .get(&department_id)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Raw condominium-wide sum, full precision. Authoritative input to the
    /// overflow comparison.
    pub fn raw_total(&self) -> Decimal {
        self.shares.values().copied().sum()
    }

    /// Condominium-wide sum rounded to 3 decimals for display.
    pub fn current_total(&self) -> Decimal {
        money::round_share_total(self.raw_total())
    }

    /// Rounded total strictly below 1. Valid but worth surfacing to the
    /// admin: part of the expense is not apportioned to anyone.
    pub fn is_under_allocated(&self) -> bool {
        self.current_total() < Decimal::ONE
    }

    pub fn summary(&self) -> ShareSummary {
        ShareSummary {
            total: self.current_total(),
            under_allocated: self.is_under_allocated(),
        }
    }

    /// The raw total the ledger would have after assigning `new_share` to
    /// every department in `selection`. Sums over everyone NOT selected,
    /// so a department already carrying a share is never double counted.
    pub fn would_be_total(
        &self,
        selection: &HashSet<DepartmentId>,
        new_share: Decimal,
    ) -> Decimal {
        let others: Decimal = self
            .shares
            .iter()
            .filter(|(id, _)| !selection.contains(*id))
            .map(|(_, share)| *share)
            .sum();
        others + new_share * Decimal::from(selection.len() as u64)
    }

    /// Set every department in `selection` to exactly `new_share`.
    ///
    /// All-or-nothing: validation happens before any share is touched.
    /// Returns the new raw total on success.
    ///
    /// # Errors
    /// * `EmptyDepartmentSet` - nothing selected
    /// * `InvalidShare` - `new_share` is zero or negative
    /// * `DepartmentNotFound` - a selected department is not in this ledger
    /// * `ShareOverflow` - the recomputed raw total would exceed 1 + epsilon;
    ///   carries the computed total so the caller can display it
    pub fn assign(
        &mut self,
        selection: &HashSet<DepartmentId>,
        new_share: Decimal,
    ) -> Result<Decimal, EngineError> {
        if selection.is_empty() {
            return Err(EngineError::EmptyDepartmentSet);
        }
        if new_share <= Decimal::ZERO {
            return Err(EngineError::InvalidShare);
        }
        for id in selection {
            if !self.shares.contains_key(id) {
                return Err(EngineError::DepartmentNotFound(id.to_string()));
            }
        }

        let would_be = self.would_be_total(selection, new_share);
        if would_be > Decimal::ONE + share_epsilon() {
            return Err(EngineError::ShareOverflow {
                would_be_total: would_be,
            });
        }

        for id in selection {
            self.shares.insert(*id, new_share);
        }
        self.version += 1;

        Ok(would_be)
    }

    /// Iterate over (department, share) entries.
    pub fn entries(&self) -> impl Iterator<Item = (DepartmentId, Decimal)> + '_ {
        self.shares.iter().map(|(id, share)| (*id, *share))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn ledger(shares: &[(DepartmentId, &str)]) -> ShareLedger {
        ShareLedger::from_entries(
            Uuid::new_v4(),
            shares.iter().map(|(id, s)| (*id, dec(s))),
            0,
        )
    }

    #[test]
    fn test_share_of_unassigned_is_zero() {
        let d1 = Uuid::new_v4();
        let l = ledger(&[(d1, "0")]);
        assert_eq!(l.share_of(d1), Decimal::ZERO);
        assert_eq!(l.share_of(Uuid::new_v4()), Decimal::ZERO);
    }

    #[test]
    fn test_assign_sets_exact_value() {
        let (d1, d2) = (Uuid::new_v4(), Uuid::new_v4());
        let mut l = ledger(&[(d1, "0.2"), (d2, "0.3")]);

        let total = l.assign(&HashSet::from([d1]), dec("0.5")).unwrap();
        // Set, not incremented
        assert_eq!(l.share_of(d1), dec("0.5"));
        assert_eq!(total, dec("0.8"));
    }

    #[test]
    fn test_assign_is_atomic_on_overflow() {
        let (d1, d2) = (Uuid::new_v4(), Uuid::new_v4());
        let mut l = ledger(&[(d1, "0.4"), (d2, "0.6")]);

        let err = l
            .assign(&HashSet::from([d1, d2]), dec("0.6"))
            .unwrap_err();
        match err {
            EngineError::ShareOverflow { would_be_total } => {
                assert_eq!(would_be_total, dec("1.2"));
            }
            other => panic!("expected ShareOverflow, got {other:?}"),
        }
        // No partial writes
        assert_eq!(l.share_of(d1), dec("0.4"));
        assert_eq!(l.share_of(d2), dec("0.6"));
        assert_eq!(l.version(), 0);
    }

    #[test]
    fn test_reassignment_does_not_double_count() {
        let (d1, d2) = (Uuid::new_v4(), Uuid::new_v4());
        let mut l = ledger(&[(d1, "0.4"), (d2, "0.6")]);

        // 0.4 + 0.6 is already 1.0; setting both to 0.5 keeps the sum at 1.0
        // and must succeed because the old shares of the selection are
        // excluded from the recomputed total.
        let total = l.assign(&HashSet::from([d1, d2]), dec("0.5")).unwrap();
        assert_eq!(total, Decimal::ONE);
        assert_eq!(l.share_of(d1), dec("0.5"));
        assert_eq!(l.share_of(d2), dec("0.5"));
    }

    #[test]
    fn test_epsilon_boundary() {
        let (d1, d2) = (Uuid::new_v4(), Uuid::new_v4());

        // 0.6 + 0.4005 = 1.0005, within the 0.001 tolerance
        let mut l = ledger(&[(d1, "0"), (d2, "0.6")]);
        assert!(l.assign(&HashSet::from([d1]), dec("0.4005")).is_ok());

        // 0.6 + 0.402 = 1.002, outside
        let mut l = ledger(&[(d1, "0"), (d2, "0.6")]);
        let err = l.assign(&HashSet::from([d1]), dec("0.402")).unwrap_err();
        assert!(matches!(err, EngineError::ShareOverflow { .. }));
    }

    #[test]
    fn test_assign_validation() {
        let d1 = Uuid::new_v4();
        let mut l = ledger(&[(d1, "0.4")]);

        assert!(matches!(
            l.assign(&HashSet::new(), dec("0.5")),
            Err(EngineError::EmptyDepartmentSet)
        ));
        assert!(matches!(
            l.assign(&HashSet::from([d1]), Decimal::ZERO),
            Err(EngineError::InvalidShare)
        ));
        assert!(matches!(
            l.assign(&HashSet::from([d1]), dec("-0.1")),
            Err(EngineError::InvalidShare)
        ));
        assert!(matches!(
            l.assign(&HashSet::from([Uuid::new_v4()]), dec("0.1")),
            Err(EngineError::DepartmentNotFound(_))
        ));
    }

    #[test]
    fn test_under_allocation_warning() {
        let (d1, d2) = (Uuid::new_v4(), Uuid::new_v4());

        let l = ledger(&[(d1, "0.3"), (d2, "0.3")]);
        assert_eq!(l.current_total(), dec("0.600"));
        assert!(l.is_under_allocated());

        let l = ledger(&[(d1, "0.4"), (d2, "0.6")]);
        assert!(!l.is_under_allocated());

        // Within tolerance above 1 is not "under"
        let l = ledger(&[(d1, "0.4005"), (d2, "0.6")]);
        assert!(!l.is_under_allocated());
    }

    #[test]
    fn test_display_rounding_is_not_authoritative() {
        let (d1, d2) = (Uuid::new_v4(), Uuid::new_v4());
        // Raw sum 1.0005 rounds to 1.000 for display but the raw value is
        // what the overflow comparison saw.
        let l = ledger(&[(d1, "0.4005"), (d2, "0.6")]);
        assert_eq!(l.raw_total(), dec("1.0005"));
        assert_eq!(l.current_total(), dec("1.000"));
    }

    #[test]
    fn test_version_increments_on_success_only() {
        let d1 = Uuid::new_v4();
        let mut l = ledger(&[(d1, "0.4")]);
        assert_eq!(l.version(), 0);

        l.assign(&HashSet::from([d1]), dec("0.5")).unwrap();
        assert_eq!(l.version(), 1);

        let _ = l.assign(&HashSet::from([d1]), dec("1.5"));
        assert_eq!(l.version(), 1);
    }
}
