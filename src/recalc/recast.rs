use crate::config::LoanTerms;
use crate::decimal::{Money, Rate};
use crate::events::{Event, EventStore};
use crate::interest::annuity;
use crate::rows::LedgerRow;
use crate::schedule::classify;

/// rewrite the dues of the given scheduled rows from a fresh annuity run
///
/// `future` holds row indices in chronological order; the first receives
/// period 1 of the new split. Rows touched are flagged as re-amortized.
/// No-op when there is nothing left to spread or nowhere to spread it.
pub fn reamortize_future(
    rows: &mut [LedgerRow],
    future: &[usize],
    leftover_principal: Money,
    leftover_periods: u32,
    rate_per_period: Rate,
) -> bool {
    if leftover_principal.is_negligible() || leftover_periods == 0 || future.is_empty() {
        return false;
    }

    let split = annuity::solve(rate_per_period, leftover_periods, leftover_principal);
    for (k, &idx) in (1..=leftover_periods).zip(future.iter()) {
        let row = &mut rows[idx];
        row.interest_due = split.interest_for(k);
        row.principal_due = split.principal_for(k);
        row.total_due = row.interest_due + row.principal_due + row.fees_due;
        row.has_reamortized = true;
    }
    true
}

/// user-invoked recast: re-derive all remaining scheduled payments
///
/// Finds the first scheduled row that is not fully paid (cumulative paid
/// short of cumulative due) and re-amortizes from that row onward using
/// its current principal balance. Unlike the automatic re-split during
/// recalculation, this changes the future payment amounts themselves.
pub fn recast(rows: &mut [LedgerRow], terms: &LoanTerms, events: &mut EventStore) -> bool {
    let classified = classify(rows);

    let mut cumulative_due = Money::ZERO;
    let mut cumulative_paid = Money::ZERO;
    let mut from: Option<usize> = None;
    for (pos, &idx) in classified.scheduled.iter().enumerate() {
        cumulative_due += rows[idx].total_due;
        cumulative_paid += rows[idx].total_paid;
        if cumulative_paid < cumulative_due {
            from = Some(pos);
            break;
        }
    }
    let Some(from) = from else {
        return false; // everything paid up; nothing to recast
    };

    let anchor = classified.scheduled[from];
    let period = rows[anchor].scheduled_period().unwrap_or(0);
    // unpaid dues never reduced the running balance, so the anchor row's
    // stamped balance is the balance entering it
    let leftover_principal = rows[anchor].principal_balance;
    let leftover_periods = terms.term_months.saturating_sub(period) + 1;
    let future = &classified.scheduled[from..];

    events.emit(Event::RecastRequested {
        loan_id: terms.loan_id,
        from_period: period,
        principal_balance: leftover_principal,
    });

    let applied = reamortize_future(
        rows,
        future,
        leftover_principal,
        leftover_periods,
        terms.monthly_rate(),
    );
    if applied {
        events.emit(Event::ReAmortized {
            loan_id: terms.loan_id,
            from_period: period,
            leftover_principal,
            leftover_periods,
        });
    }
    applied
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoanInput;
    use crate::types::{DayCountMethod, PaymentFrequency};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn terms() -> LoanTerms {
        LoanTerms::from_input(LoanInput {
            loan_id: Uuid::new_v4(),
            principal: Money::from_major(12_000),
            annual_rate: Rate::from_percentage(6),
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
        })
    }

    fn schedule_rows(n: u32) -> Vec<LedgerRow> {
        (1..=n)
            .map(|p| {
                LedgerRow::scheduled(
                    p,
                    date(2024, p, 28),
                    date(2024, p, 28).succ_opt().unwrap(),
                    30,
                )
            })
            .collect()
    }

    #[test]
    fn test_reamortize_writes_dues_and_flags() {
        let mut rows = schedule_rows(6);
        let future: Vec<usize> = (2..6).collect();
        let applied = reamortize_future(
            &mut rows,
            &future,
            Money::from_major(4_000),
            4,
            Rate::from_percentage(6).monthly_rate(),
        );
        assert!(applied);

        // untouched rows keep zero dues and no flag
        assert_eq!(rows[0].total_due, Money::ZERO);
        assert!(!rows[0].has_reamortized);

        // rewritten rows carry the fresh annuity split
        for idx in 2..6 {
            assert!(rows[idx].has_reamortized);
            assert!(rows[idx].total_due.is_positive());
        }
        let total_principal: Money = rows[2..6]
            .iter()
            .fold(Money::ZERO, |acc, r| acc + r.principal_due);
        assert_eq!(total_principal, Money::from_major(4_000));
    }

    #[test]
    fn test_reamortize_noop_on_negligible_principal() {
        let mut rows = schedule_rows(3);
        let future: Vec<usize> = (0..3).collect();
        assert!(!reamortize_future(
            &mut rows,
            &future,
            Money::from_str_exact("0.0000001").unwrap(),
            3,
            Rate::from_percentage(6).monthly_rate(),
        ));
        assert!(!reamortize_future(
            &mut rows,
            &future,
            Money::from_major(1_000),
            0,
            Rate::from_percentage(6).monthly_rate(),
        ));
        assert!(rows.iter().all(|r| !r.has_reamortized));
    }

    #[test]
    fn test_reamortize_skips_unscheduled_rows_by_construction() {
        // the future slice only ever carries scheduled indices; a mixed
        // table keeps its unscheduled rows untouched
        let mut rows = schedule_rows(4);
        rows.insert(2, LedgerRow::unscheduled(Some(dec!(2.5)), date(2024, 3, 5)));
        let future: Vec<usize> = vec![3, 4]; // scheduled rows after the insert
        reamortize_future(
            &mut rows,
            &future,
            Money::from_major(2_000),
            2,
            Rate::from_percentage(6).monthly_rate(),
        );
        assert_eq!(rows[2].total_due, Money::ZERO);
        assert!(!rows[2].has_reamortized);
        assert!(rows[3].has_reamortized && rows[4].has_reamortized);
    }

    #[test]
    fn test_recast_starts_at_first_unpaid_row() {
        let t = terms();
        let mut rows = schedule_rows(12);
        // first three rows fully paid, the rest due but unpaid
        for (i, row) in rows.iter_mut().enumerate() {
            row.total_due = Money::from_major(1_050);
            if i < 3 {
                row.total_paid = Money::from_major(1_050);
            }
            row.principal_balance = Money::from_major(12_000 - (i as i64).min(3) * 1_000);
        }
        rows[3].principal_balance = Money::from_major(9_000);

        let mut events = EventStore::new();
        assert!(recast(&mut rows, &t, &mut events));

        // rows 0..3 untouched, rows 3.. rewritten
        assert!(!rows[2].has_reamortized);
        assert!(rows[3].has_reamortized);
        assert!(rows[11].has_reamortized);

        // the rewritten dues spread the anchor's balance over periods 4..=12
        let principal_total: Money = rows[3..]
            .iter()
            .fold(Money::ZERO, |acc, r| acc + r.principal_due);
        assert_eq!(principal_total, Money::from_major(9_000));

        assert!(matches!(
            events.events()[0],
            Event::RecastRequested { from_period: 4, .. }
        ));
    }

    #[test]
    fn test_recast_noop_when_fully_paid() {
        let t = terms();
        let mut rows = schedule_rows(12);
        for row in rows.iter_mut() {
            row.total_due = Money::from_major(1_000);
            row.total_paid = Money::from_major(1_000);
        }
        let mut events = EventStore::new();
        assert!(!recast(&mut rows, &t, &mut events));
        assert!(events.events().is_empty());
    }
}
