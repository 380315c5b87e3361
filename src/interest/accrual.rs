use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::config::LoanTerms;
use crate::dates::days_between_inclusive;
use crate::decimal::{Money, Rate};
use crate::types::DayCountMethod;

/// inclusive days in [start, end] that actually accrue interest, given a
/// prepaid-through date: days before `prepaid_until` are already paid for
pub fn unpaid_days(start: NaiveDate, end: NaiveDate, prepaid_until: Option<NaiveDate>) -> i64 {
    if end < start {
        return 0;
    }
    let full = days_between_inclusive(start, end);
    match prepaid_until {
        None => full,
        Some(p) if end < p => 0,
        Some(p) if start >= p => full,
        Some(p) => days_between_inclusive(p, end),
    }
}

/// per-period state for the 30/360 method: the calendar length of the
/// enclosing period and the unconsumed share of its 30-day month
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodBudget {
    period_days: Decimal,
    remaining: Decimal,
}

impl PeriodBudget {
    /// computed once per period from its full calendar span
    pub fn new(period_start: NaiveDate, period_end: NaiveDate) -> Self {
        let raw = days_between_inclusive(period_start, period_end);
        let period_days = if raw < 1 { 30 } else { raw };
        Self {
            period_days: Decimal::from(period_days),
            remaining: dec!(30),
        }
    }

    pub fn remaining(&self) -> Decimal {
        self.remaining
    }

    /// convert a raw sub-interval day count to its scaled 30-day share,
    /// clamped to whatever is left of this period's budget
    fn consume(&mut self, raw_days: i64) -> Decimal {
        let scaled = Decimal::from(raw_days.max(0)) / self.period_days * dec!(30);
        let taken = scaled.min(self.remaining).max(Decimal::ZERO);
        self.remaining -= taken;
        taken
    }
}

/// engine for accruing interest over date intervals
pub struct AccrualEngine<'a> {
    terms: &'a LoanTerms,
}

impl<'a> AccrualEngine<'a> {
    pub fn new(terms: &'a LoanTerms) -> Self {
        Self { terms }
    }

    /// interest accrued on `principal` over the inclusive interval
    /// [start, end] inside period `period_number`
    ///
    /// The actual-day formula applies for single-period loans, the Actual
    /// day-count method, and the prorated stub (period 0); otherwise the
    /// sub-interval is scaled into the period's 30-day budget.
    pub fn accrue(
        &self,
        principal: Money,
        start: NaiveDate,
        end: NaiveDate,
        period_number: u32,
        budget: &mut PeriodBudget,
    ) -> Money {
        // fully paid off; nothing left to accrue on
        if principal.is_negligible() || principal.is_negative() {
            return Money::ZERO;
        }
        if end < start {
            return Money::ZERO;
        }

        let actual = self.terms.is_single_period()
            || self.terms.day_count == DayCountMethod::Actual
            || period_number == 0;

        if actual {
            self.accrue_actual(principal, start, end)
        } else {
            self.accrue_periodic(principal, start, end, budget)
        }
    }

    fn accrue_actual(&self, principal: Money, start: NaiveDate, end: NaiveDate) -> Money {
        let days = unpaid_days(start, end, self.terms.prepaid_until);
        let per_diem = self.terms.per_diem_rate();
        Money::from_decimal(principal.as_decimal() * per_diem.as_decimal() * Decimal::from(days))
    }

    fn accrue_periodic(
        &self,
        principal: Money,
        start: NaiveDate,
        end: NaiveDate,
        budget: &mut PeriodBudget,
    ) -> Money {
        let scaled_days = budget.consume(days_between_inclusive(start, end));
        let daily_rate = self.daily_periodic_rate();
        Money::from_decimal(principal.as_decimal() * daily_rate.as_decimal() * scaled_days)
    }

    /// (annual * 30/days_per_year) / 30, or monthly/30 with no year basis
    fn daily_periodic_rate(&self) -> Rate {
        if self.terms.days_per_year > 0 {
            let monthly_share = self.terms.annual_rate.as_decimal() * dec!(30)
                / Decimal::from(self.terms.days_per_year);
            Rate::from_decimal(monthly_share / dec!(30))
        } else {
            Rate::from_decimal(self.terms.monthly_rate().as_decimal() / dec!(30))
        }
    }
}
