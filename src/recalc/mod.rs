pub mod allocate;
pub mod recast;

pub use allocate::{allocate, AllocationInput};
pub use recast::{reamortize_future, recast};

use crate::config::LoanTerms;
use crate::decimal::Money;
use crate::events::{Event, EventStore};
use crate::interest::{annuity, AccrualEngine, PeriodBudget};
use crate::rows::LedgerRow;
use crate::schedule::classify;
use crate::types::{DueSplit, PaymentFrequency, RecalcSummary};

/// recalculate every due amount and running balance in the row table
///
/// One full chronological pass: interest accrues per sub-interval (split
/// around unscheduled payments), dues are decided per period, recorded
/// payments reduce the running balances, early payoff zeroes the rest of
/// the schedule, and an amortizing prepayment re-derives future rows.
/// The pass reads nothing but the table and the terms, so re-running it
/// with the same stored payments reproduces the same output.
pub fn recalculate(
    rows: &mut [LedgerRow],
    terms: &LoanTerms,
    events: &mut EventStore,
) -> RecalcSummary {
    let classified = classify(rows);
    let mut summary = RecalcSummary::default();
    if classified.scheduled.is_empty() {
        return summary;
    }

    let scheduled_split = if terms.amortize && terms.payment_frequency == PaymentFrequency::Monthly
    {
        Some(annuity::solve(
            terms.monthly_rate(),
            terms.term_months,
            terms.principal,
        ))
    } else {
        None
    };

    let accrual = AccrualEngine::new(terms);
    let mut running_principal = terms.principal;
    let mut running_interest = Money::ZERO;
    let mut running_fees = Money::ZERO;
    let mut last_end = terms.closing_date;
    let mut cursor = 0usize;
    let mut extra_payment_occurred = false;

    for (pos, &idx) in classified.scheduled.iter().enumerate() {
        let period = rows[idx].scheduled_period().unwrap_or(0);
        let period_end = rows[idx].period_end.unwrap_or(last_end);

        // the prorated stub starts on the closing date itself
        let period_start = if period == 0 && terms.prorate_first {
            last_end
        } else {
            crate::dates::next_day(last_end)
        };

        let mut budget = PeriodBudget::new(period_start, period_end);
        let mut accrued_this_period = Money::ZERO;
        let mut unscheduled_principal = Money::ZERO;
        let mut sub_start = period_start;

        // interleave unscheduled payments dated inside this period
        while let Some(&uidx) = classified.unscheduled.get(cursor) {
            let Some(paid_on) = rows[uidx].paid_on else {
                cursor += 1;
                continue;
            };
            if paid_on > period_end {
                break;
            }

            if paid_on >= sub_start {
                let accrued =
                    accrual.accrue(running_principal, sub_start, paid_on, period, &mut budget);
                running_interest += accrued;
                accrued_this_period += accrued;
            }

            apply_payment(
                &mut running_principal,
                &mut running_interest,
                &mut running_fees,
                &mut rows[uidx],
            );
            if rows[uidx].principal_paid.is_positive() {
                unscheduled_principal += rows[uidx].principal_paid;
            }
            rows[uidx].stamp_balances(running_interest, running_principal, running_fees);

            events.emit(Event::UnscheduledPaymentApplied {
                loan_id: terms.loan_id,
                paid_on,
                principal_paid: rows[uidx].principal_paid,
                interest_paid: rows[uidx].interest_paid,
                remaining_principal: running_principal,
            });
            summary.unscheduled_applied += 1;

            sub_start = crate::dates::next_day(paid_on);
            cursor += 1;
        }

        // remaining accrual up to the period end
        if sub_start <= period_end {
            let accrued =
                accrual.accrue(running_principal, sub_start, period_end, period, &mut budget);
            running_interest += accrued;
            accrued_this_period += accrued;
        }

        // decide this period's dues
        let split = allocate(
            terms,
            &AllocationInput {
                period_number: period,
                is_final_period: period == terms.final_period_number(),
                interest_accrued_this_period: accrued_this_period,
                interest_outstanding: running_interest,
                principal_outstanding: running_principal,
                scheduled_interest: scheduled_split
                    .as_ref()
                    .map(|s| s.interest_for(period))
                    .unwrap_or(Money::ZERO),
                scheduled_principal: scheduled_split
                    .as_ref()
                    .map(|s| s.principal_for(period))
                    .unwrap_or(Money::ZERO),
                had_extra_payment_earlier: extra_payment_occurred,
                extra_payment_this_period: unscheduled_principal.is_positive(),
                was_reamortized: rows[idx].has_reamortized,
                stored: DueSplit {
                    interest_due: rows[idx].interest_due,
                    principal_due: rows[idx].principal_due,
                },
            },
        );
        rows[idx].interest_due = split.interest_due;
        rows[idx].principal_due = split.principal_due;
        rows[idx].total_due = split.interest_due + split.principal_due + rows[idx].fees_due;

        // apply this row's own recorded payments
        apply_payment(
            &mut running_principal,
            &mut running_interest,
            &mut running_fees,
            &mut rows[idx],
        );
        summary.periods_processed += 1;

        // early payoff: zero out every remaining due and stop
        if running_principal.is_negligible() {
            summary.paid_off = true;
            rows[idx].zero_dues();
            rows[idx].stamp_balances(running_interest, running_principal, running_fees);
            for &later in &classified.scheduled[pos + 1..] {
                rows[later].zero_dues();
            }
            events.emit(Event::LoanPaidOff {
                loan_id: terms.loan_id,
                period,
            });
            break;
        }

        // a principal payment on an amortizing loan re-derives future rows
        let principal_paid_here = rows[idx].principal_paid.is_positive();
        if terms.amortize && (principal_paid_here || unscheduled_principal.is_positive()) {
            let leftover_periods = terms.term_months.saturating_sub(period);
            let future = &classified.scheduled[pos + 1..];
            if reamortize_future(
                rows,
                future,
                running_principal,
                leftover_periods,
                terms.monthly_rate(),
            ) {
                summary.reamortizations += 1;
                events.emit(Event::ReAmortized {
                    loan_id: terms.loan_id,
                    from_period: period,
                    leftover_principal: running_principal,
                    leftover_periods,
                });
            }
            extra_payment_occurred = true;
        }

        rows[idx].stamp_balances(running_interest, running_principal, running_fees);
        last_end = period_end;
    }

    summary.ending_principal = running_principal;
    summary.ending_interest = running_interest;
    events.emit(Event::RecalculationCompleted {
        loan_id: terms.loan_id,
        periods_processed: summary.periods_processed,
        ending_principal: running_principal,
        ending_interest: running_interest,
    });
    summary
}

/// reduce the running balances by a row's recorded payments and stamp its
/// total-paid column; unpaid fees-due flow into the running fee balance
fn apply_payment(
    running_principal: &mut Money,
    running_interest: &mut Money,
    running_fees: &mut Money,
    row: &mut LedgerRow,
) {
    let fee_delta = row.fees_paid - row.fees_due;
    *running_fees = (*running_fees - fee_delta).max(Money::ZERO);
    *running_interest = (*running_interest - row.interest_paid).max(Money::ZERO);
    *running_principal = (*running_principal - row.principal_paid).max(Money::ZERO);
    row.total_paid = row.principal_paid + row.interest_paid + row.fees_paid;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoanInput;
    use crate::decimal::Rate;
    use crate::schedule::build;
    use crate::types::DayCountMethod;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn amortizing_input() -> LoanInput {
        LoanInput {
            loan_id: Uuid::new_v4(),
            principal: Money::from_major(100_000),
            annual_rate: Rate::from_percentage(5),
            closing_date: date(2024, 1, 15),
            term_months: 12,
            payment_frequency: PaymentFrequency::Monthly,
            day_count: DayCountMethod::Periodic,
            days_per_year: 360,
            prorate_first: false,
            amortize: true,
            prepaid_until: None,
            origination_fee_pct: Rate::ZERO,
            exit_fee_pct: Rate::ZERO,
        }
    }

    fn recalc(rows: &mut [LedgerRow], terms: &LoanTerms) -> RecalcSummary {
        let mut events = EventStore::new();
        recalculate(rows, terms, &mut events)
    }

    /// record every scheduled due as paid on its due date
    fn pay_all_scheduled(rows: &mut [LedgerRow]) {
        for row in rows.iter_mut() {
            if row.is_scheduled() {
                row.paid_on = row.due_date;
                row.principal_paid = row.principal_due;
                row.interest_paid = row.interest_due;
                row.fees_paid = row.fees_due;
            }
        }
    }

    #[test]
    fn test_empty_table_is_untouched() {
        let terms = LoanTerms::from_input(amortizing_input());
        let mut rows: Vec<LedgerRow> = Vec::new();
        let summary = recalc(&mut rows, &terms);
        assert_eq!(summary.periods_processed, 0);
    }

    #[test]
    fn test_amortizing_dues_follow_annuity_split() {
        let terms = LoanTerms::from_input(amortizing_input());
        let mut rows = build(&terms);
        recalc(&mut rows, &terms);

        let expected = annuity::solve(terms.monthly_rate(), 12, terms.principal);
        for (i, row) in rows.iter().enumerate() {
            let k = (i + 1) as u32;
            assert_eq!(row.interest_due, expected.interest_for(k));
            assert_eq!(row.principal_due, expected.principal_for(k));
        }
    }

    #[test]
    fn test_total_due_constant_for_level_payments() {
        let terms = LoanTerms::from_input(amortizing_input());
        let mut rows = build(&terms);
        recalc(&mut rows, &terms);

        let first = rows[0].total_due;
        for row in &rows {
            assert!((row.total_due - first).abs() < Money::from_str_exact("0.01").unwrap());
        }
    }

    #[test]
    fn test_principal_due_conserves_financed_principal() {
        let terms = LoanTerms::from_input(amortizing_input());
        let mut rows = build(&terms);
        recalc(&mut rows, &terms);

        let total: Money = rows.iter().fold(Money::ZERO, |acc, r| acc + r.principal_due);
        assert!((total - terms.principal).abs() <= Money::EPSILON);
    }

    #[test]
    fn test_fully_paid_loan_reaches_zero_balance() {
        let terms = LoanTerms::from_input(amortizing_input());
        let mut rows = build(&terms);
        recalc(&mut rows, &terms);
        pay_all_scheduled(&mut rows);
        let summary = recalc(&mut rows, &terms);

        assert!(summary.ending_principal.is_negligible());
        assert!(rows.last().unwrap().principal_balance.is_negligible());
    }

    #[test]
    fn test_recalculation_is_idempotent() {
        let terms = LoanTerms::from_input(amortizing_input());
        let mut rows = build(&terms);
        rows.push(LedgerRow::unscheduled(Some(dec!(2.5)), date(2024, 3, 20)));
        let extra = rows.len() - 1;
        rows[extra].principal_paid = Money::from_major(5_000);

        recalc(&mut rows, &terms);
        let snapshot = rows.to_vec();
        recalc(&mut rows, &terms);
        assert_eq!(rows, snapshot);
    }

    #[test]
    fn test_unscheduled_payment_reduces_balance_and_stamps_row() {
        let terms = LoanTerms::from_input(amortizing_input());
        let mut rows = build(&terms);
        let mut extra = LedgerRow::unscheduled(Some(dec!(1.5)), date(2024, 2, 20));
        extra.principal_paid = Money::from_major(10_000);
        rows.push(extra);
        let extra = rows.len() - 1;

        recalc(&mut rows, &terms);

        assert_eq!(rows[extra].total_paid, Money::from_major(10_000));
        // stamped balance reflects the principal reduction
        assert!(rows[extra].principal_balance < terms.principal);
        // interest accrued up to the payment date is on the stamped balance
        assert!(rows[extra].interest_balance.is_positive());
    }

    #[test]
    fn test_prepayment_triggers_reamortization_of_future_rows() {
        let terms = LoanTerms::from_input(amortizing_input());
        let mut rows = build(&terms);
        let mut extra = LedgerRow::unscheduled(Some(dec!(1.5)), date(2024, 2, 20));
        extra.principal_paid = Money::from_major(10_000);
        rows.push(extra);

        let summary = recalc(&mut rows, &terms);
        assert_eq!(summary.reamortizations, 1);
        // rows after period 1 carry the flag
        assert!(rows[1].has_reamortized);
        assert!(rows[11].has_reamortized);
        assert!(!rows[0].has_reamortized);
    }

    #[test]
    fn test_early_payoff_zeroes_remaining_schedule() {
        let terms = LoanTerms::from_input(amortizing_input());
        let mut rows = build(&terms);
        recalc(&mut rows, &terms);

        // pay period 1 as scheduled, then clear the whole balance in period 2
        rows[0].paid_on = rows[0].due_date;
        rows[0].interest_paid = rows[0].interest_due;
        rows[0].principal_paid = rows[0].principal_due;
        rows[1].paid_on = rows[1].due_date;
        rows[1].interest_paid = Money::from_major(1_000);
        rows[1].principal_paid = Money::from_major(100_000); // more than enough

        let summary = recalc(&mut rows, &terms);
        assert!(summary.paid_off);

        assert_eq!(rows[1].total_due, Money::ZERO);
        for row in &rows[2..] {
            assert_eq!(row.total_due, Money::ZERO);
            assert_eq!(row.principal_due, Money::ZERO);
            assert_eq!(row.interest_due, Money::ZERO);
        }
    }

    #[test]
    fn test_unscheduled_after_payoff_is_ignored() {
        let terms = LoanTerms::from_input(amortizing_input());
        let mut rows = build(&terms);
        recalc(&mut rows, &terms);

        rows[0].paid_on = rows[0].due_date;
        rows[0].interest_paid = rows[0].interest_due;
        rows[0].principal_paid = Money::from_major(100_000);

        let mut late = LedgerRow::unscheduled(Some(dec!(5.5)), date(2024, 7, 1));
        late.principal_paid = Money::from_major(500);
        rows.push(late);
        let late = rows.len() - 1;

        let summary = recalc(&mut rows, &terms);
        assert!(summary.paid_off);
        // the post-payoff payment is never consumed: no balance stamps
        assert_eq!(rows[late].total_paid, Money::ZERO);
        assert_eq!(rows[late].principal_balance, Money::ZERO);
        assert_eq!(summary.unscheduled_applied, 0);
    }

    #[test]
    fn test_interest_only_loan_accumulates_unpaid_interest() {
        let mut input = amortizing_input();
        input.principal = Money::from_major(50_000);
        input.annual_rate = Rate::from_percentage(6);
        input.term_months = 6;
        input.amortize = false;
        let terms = LoanTerms::from_input(input);
        let mut rows = build(&terms);
        recalc(&mut rows, &terms);

        for row in &rows[..5] {
            assert_eq!(row.principal_due, Money::ZERO);
            assert_eq!(row.interest_due.round_dp(2), Money::from_major(250));
        }
        let last = &rows[5];
        assert_eq!(last.principal_due, Money::from_major(50_000));
        assert_eq!(last.interest_due.round_dp(2), Money::from_major(250));

        // nothing paid: unpaid interest piles up in the balance column
        assert_eq!(rows[4].interest_balance.round_dp(2), Money::from_major(1_250));
        assert_eq!(rows[5].interest_balance.round_dp(2), Money::from_major(1_500));
        assert_eq!(rows[5].principal_balance, Money::from_major(50_000));
    }

    #[test]
    fn test_exit_fee_flows_into_fee_balance() {
        let mut input = amortizing_input();
        input.exit_fee_pct = Rate::from_percentage(1);
        let terms = LoanTerms::from_input(input);
        let mut rows = build(&terms);
        recalc(&mut rows, &terms);

        let last = rows.last().unwrap();
        assert_eq!(last.fees_due, Money::from_major(1_000));
        // unpaid exit fee shows in the total balance
        assert_eq!(
            last.total_balance,
            last.interest_balance + last.principal_balance + Money::from_major(1_000)
        );
    }

    #[test]
    fn test_prorated_stub_accrues_from_closing_date() {
        let mut input = amortizing_input();
        input.prorate_first = true;
        input.closing_date = date(2024, 1, 15);
        let terms = LoanTerms::from_input(input);
        assert!(terms.prorate_first);
        let mut rows = build(&terms);
        recalc(&mut rows, &terms);

        // stub covers jan 15-31 inclusive: 17 actual days at 5%/360
        let expected = Money::from_major(100_000)
            .as_decimal()
            * dec!(0.05)
            / dec!(360)
            * dec!(17);
        assert_eq!(
            rows[0].interest_balance.round_dp(4),
            Money::from_decimal(expected).round_dp(4)
        );
    }
}
