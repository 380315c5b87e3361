use chrono::{Datelike, NaiveDate};

use crate::config::LoanTerms;
use crate::dates::{
    add_months, days_between, days_between_inclusive, last_day_of_month,
    last_day_of_month_after_adding, next_day,
};
use crate::events::{Event, EventStore};
use crate::rows::LedgerRow;
use crate::types::DayCountMethod;

/// build the initial ordered period rows for a loan
///
/// Period count is term_months, plus a period-0 stub when the first period
/// is prorated to the calendar month of closing. Due and paid financials
/// start zeroed; only the balance recalculator writes due amounts.
pub fn build(terms: &LoanTerms) -> Vec<LedgerRow> {
    if terms.term_months == 0 {
        return Vec::new();
    }

    let first_period = if terms.prorate_first { 0 } else { 1 };
    let mut rows = Vec::with_capacity((terms.term_months + 1 - first_period) as usize);

    let mut prev_end: Option<NaiveDate> = None;
    for period in first_period..=terms.term_months {
        let period_end = period_end_date(terms, period);
        let approx_days = match prev_end {
            // first row shows the inclusive run-up from closing
            None => days_between_inclusive(terms.closing_date, period_end),
            Some(prev) => match terms.day_count {
                DayCountMethod::Periodic => 30,
                DayCountMethod::Actual => days_between(prev, period_end),
            },
        };

        rows.push(LedgerRow::scheduled(
            period,
            period_end,
            next_day(period_end),
            approx_days,
        ));
        prev_end = Some(period_end);
    }

    annotate_financing(terms, &mut rows);
    annotate_exit_fee(terms, &mut rows);

    rows
}

/// build and report the generated schedule
pub fn generate(terms: &LoanTerms, events: &mut EventStore) -> Vec<LedgerRow> {
    let rows = build(terms);
    events.emit(Event::ScheduleGenerated {
        loan_id: terms.loan_id,
        periods: rows.len() as u32,
        principal: terms.principal,
    });
    rows
}

fn period_end_date(terms: &LoanTerms, period: u32) -> NaiveDate {
    let closing = terms.closing_date;

    if terms.prorate_first {
        // stub ends with closing's month; later periods track month ends
        return if period == 0 {
            last_day_of_month(closing)
        } else {
            last_day_of_month_after_adding(closing, period)
        };
    }

    // non-prorated: anchor on the closing day-of-month
    if closing.day() == 1 {
        last_day_of_month_after_adding(closing, period - 1)
    } else if closing.day() > 28 {
        last_day_of_month_after_adding(closing, period)
    } else {
        add_months(closing, period)
            .pred_opt()
            .unwrap_or(closing)
    }
}

fn annotate_financing(terms: &LoanTerms, rows: &mut [LedgerRow]) {
    let mut parts = Vec::new();
    if terms.financed_fee.is_positive() {
        parts.push(format!(
            "financed {}% origination fee",
            terms.origination_fee_pct.as_percentage().normalize()
        ));
    }
    if terms.financed_prepaid_interest.is_positive() {
        parts.push(format!(
            "financed ${} prepaid interest",
            terms.financed_prepaid_interest.round_dp(2)
        ));
    }
    if let (Some(first), false) = (rows.first_mut(), parts.is_empty()) {
        first.notes = format!("({})", parts.join("; "));
    }
}

fn annotate_exit_fee(terms: &LoanTerms, rows: &mut [LedgerRow]) {
    if !terms.exit_fee.is_positive() {
        return;
    }
    if let Some(last) = rows.last_mut() {
        last.fees_due = terms.exit_fee;
        let note = format!("(${} exit fee)", terms.exit_fee.round_dp(2));
        if last.notes.is_empty() {
            last.notes = note;
        } else {
            last.notes = format!("{} {}", last.notes, note);
        }
    }
}
