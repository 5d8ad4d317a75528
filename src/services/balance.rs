//! Balance aggregation

use crate::models::{Amount, Transaction};

/// Total cash-in minus total cash-out.
///
/// Both sides are summed separately and then subtracted, so the result can
/// differ in the last bits from summing `Transaction::balance()` per row.
pub fn compute_balance(transactions: &[Transaction]) -> Amount {
    let cash_in: Amount = transactions.iter().map(|t| t.cash_in).sum();
    let cash_out: Amount = transactions.iter().map(|t| t.cash_out).sum();
    cash_in - cash_out
}
