use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::decimal::Money;
use crate::rows::LedgerRow;

/// prepare a manually inserted unscheduled-payment row
///
/// The period number lands between its neighbors: midpoint when both
/// exist, preceding + 0.5 at the tail, 0.5 at the head. The preceding
/// row's balances are carried forward as a display placeholder until the
/// next recalculation stamps real ones.
pub fn prepare_inserted_row(
    preceding_period: Option<Decimal>,
    following_period: Option<Decimal>,
    preceding_interest_balance: Money,
    preceding_principal_balance: Money,
    paid_on: NaiveDate,
) -> LedgerRow {
    let period = match (preceding_period, following_period) {
        (Some(before), Some(after)) => (before + after) / dec!(2),
        (Some(before), None) => before + dec!(0.5),
        _ => dec!(0.5),
    };

    let mut row = LedgerRow::unscheduled(Some(period), paid_on);
    row.interest_balance = preceding_interest_balance;
    row.principal_balance = preceding_principal_balance;
    row.total_balance = preceding_interest_balance + preceding_principal_balance;
    row
}
