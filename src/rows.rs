use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;

/// one line of the loan's row table
///
/// A row with an integer period number and a period-end date is a scheduled
/// period; a row with a fractional or blank period number and a paid-on date
/// is an unscheduled payment. Rows matching neither are blank capacity and
/// ignored everywhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct LedgerRow {
    /// integer for scheduled periods; fractional or blank for unscheduled rows
    pub period: Option<Decimal>,
    pub period_end: Option<NaiveDate>,
    /// period end plus one day
    pub due_date: Option<NaiveDate>,
    /// display estimate only, never an input to interest math
    pub approx_days: i64,
    pub paid_on: Option<NaiveDate>,
    pub total_due: Money,
    pub total_paid: Money,
    pub principal_due: Money,
    pub principal_paid: Money,
    pub interest_due: Money,
    pub interest_paid: Money,
    pub fees_due: Money,
    pub fees_paid: Money,
    pub interest_balance: Money,
    pub principal_balance: Money,
    pub total_balance: Money,
    pub notes: String,
    /// set when this row's due amounts came from a recast rather than the
    /// original annuity split; survives until the schedule is regenerated
    #[serde(default)]
    pub has_reamortized: bool,
}

impl LedgerRow {
    /// scheduled period skeleton with zeroed financials
    pub fn scheduled(
        period: u32,
        period_end: NaiveDate,
        due_date: NaiveDate,
        approx_days: i64,
    ) -> Self {
        Self {
            period: Some(Decimal::from(period)),
            period_end: Some(period_end),
            due_date: Some(due_date),
            approx_days,
            ..Self::default()
        }
    }

    /// unscheduled payment row (fractional period number, dated payment)
    pub fn unscheduled(period: Option<Decimal>, paid_on: NaiveDate) -> Self {
        Self {
            period,
            paid_on: Some(paid_on),
            ..Self::default()
        }
    }

    /// period number when this row is a scheduled period
    pub fn scheduled_period(&self) -> Option<u32> {
        let p = self.period?;
        self.period_end?;
        if p.fract().is_zero() && !p.is_sign_negative() {
            p.to_u32()
        } else {
            None
        }
    }

    pub fn is_scheduled(&self) -> bool {
        self.scheduled_period().is_some()
    }

    pub fn is_unscheduled(&self) -> bool {
        let integer_period = self.period.map(|p| p.fract().is_zero()).unwrap_or(false);
        !integer_period && self.paid_on.is_some()
    }

    /// clear the due side of the row (used once a loan pays off early)
    pub fn zero_dues(&mut self) {
        self.principal_due = Money::ZERO;
        self.interest_due = Money::ZERO;
        self.total_due = Money::ZERO;
    }

    /// stamp the running balances onto the row
    pub fn stamp_balances(&mut self, interest: Money, principal: Money, fees: Money) {
        self.interest_balance = interest;
        self.principal_balance = principal;
        self.total_balance = interest + principal + fees;
    }
}
