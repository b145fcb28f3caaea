//! Expense Apportionment
//!
//! Pure conversion from a share ledger snapshot and a monthly expense to
//! per-department owed amounts. No side effects, no rounding: callers format
//! through [`crate::money`] at the presentation boundary.

use rust_decimal::Decimal;

use crate::core_types::DepartmentId;
use crate::expense::MonthlyExpense;
use crate::share_ledger::ShareLedger;

/// What a department owes for an expense: `share * total_amount`.
///
/// Defined for any ledger total, including under-allocated condominiums:
/// the owed amount depends only on the department's own share and the raw
/// expense total, never on other departments or on the ledger sum.
pub fn amount_owed(share: Decimal, total_amount: Decimal) -> Decimal {
    share * total_amount
}

/// Owed amount for a department straight from a ledger snapshot.
pub fn amount_owed_for(
    ledger: &ShareLedger,
    department_id: DepartmentId,
    expense: &MonthlyExpense,
) -> Decimal {
    amount_owed(ledger.share_of(department_id), expense.total_amount)
}

/// Display-only "value per unit of share": `total_amount / ledger_total`,
/// or 0 when nothing is allocated. Never an input to the owed amount.
pub fn per_unit_value(total_amount: Decimal, ledger_total: Decimal) -> Decimal {
    if ledger_total > Decimal::ZERO {
        total_amount / ledger_total
    } else {
        Decimal::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_amount_owed_is_share_times_total() {
        assert_eq!(amount_owed(dec("0.4"), dec("1000")), dec("400"));
        assert_eq!(amount_owed(dec("0.6"), dec("1000")), dec("600"));
        assert_eq!(amount_owed(Decimal::ZERO, dec("1000")), Decimal::ZERO);
    }

    #[test]
    fn test_amount_owed_independent_of_ledger_total() {
        // Under-allocated condominium: 0.3 of $1000 is still $300
        assert_eq!(amount_owed(dec("0.3"), dec("1000")), dec("300"));
    }

    #[test]
    fn test_amount_owed_for_reads_ledger() {
        let (d1, d2) = (Uuid::new_v4(), Uuid::new_v4());
        let condominium_id = Uuid::new_v4();
        let ledger = ShareLedger::from_entries(
            condominium_id,
            [(d1, dec("0.4")), (d2, dec("0.6"))],
            0,
        );
        let expense = MonthlyExpense::new(
            condominium_id,
            crate::core_types::Period::new(2025, 7).unwrap(),
            dec("1000"),
            None,
        )
        .unwrap();

        assert_eq!(amount_owed_for(&ledger, d1, &expense), dec("400"));
        assert_eq!(amount_owed_for(&ledger, d2, &expense), dec("600"));
        // Unknown department owes nothing
        assert_eq!(
            amount_owed_for(&ledger, Uuid::new_v4(), &expense),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_per_unit_value() {
        assert_eq!(per_unit_value(dec("1000"), Decimal::ONE), dec("1000"));
        assert_eq!(per_unit_value(dec("1000"), dec("0.5")), dec("2000"));
        assert_eq!(per_unit_value(dec("1000"), Decimal::ZERO), Decimal::ZERO);
    }
}
