use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::dates::{days_between, is_edge_day};
use crate::decimal::{Money, Rate};
use crate::types::{DayCountMethod, LoanId, PaymentFrequency};

/// raw loan parameters as handed over by the input collaborator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanInput {
    pub loan_id: LoanId,
    pub principal: Money,
    pub annual_rate: Rate,
    pub closing_date: NaiveDate,
    pub term_months: u32,
    pub payment_frequency: PaymentFrequency,
    pub day_count: DayCountMethod,
    /// 0 means absent; the per-diem rate degrades to zero
    pub days_per_year: u32,
    pub prorate_first: bool,
    pub amortize: bool,
    /// first day interest resumes normal accrual after prepaid interest
    pub prepaid_until: Option<NaiveDate>,
    pub origination_fee_pct: Rate,
    pub exit_fee_pct: Rate,
}

/// normalized loan terms, immutable for the duration of a recalculation pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanTerms {
    pub loan_id: LoanId,
    /// principal as entered, before any fee financing
    pub original_principal: Money,
    /// principal actually owed: original plus financed fee and prepaid interest
    pub principal: Money,
    pub annual_rate: Rate,
    pub closing_date: NaiveDate,
    pub term_months: u32,
    pub payment_frequency: PaymentFrequency,
    pub day_count: DayCountMethod,
    pub days_per_year: u32,
    pub prorate_first: bool,
    pub amortize: bool,
    pub prepaid_until: Option<NaiveDate>,
    pub origination_fee_pct: Rate,
    pub exit_fee_pct: Rate,
    pub financed_fee: Money,
    pub financed_prepaid_interest: Money,
    /// charged on the last period, computed off the unfinanced principal
    pub exit_fee: Money,
}

impl LoanTerms {
    /// normalize raw input and derive the financed amounts
    pub fn from_input(input: LoanInput) -> Self {
        // a closing on the 1st or past the 28th cannot carry a prorated stub
        let prorate_first = input.prorate_first && !is_edge_day(input.closing_date);

        // a single-period loan always counts actual days and never amortizes
        let (day_count, amortize) = match input.payment_frequency {
            PaymentFrequency::SinglePeriod => (DayCountMethod::Actual, false),
            PaymentFrequency::Monthly => (input.day_count, input.amortize),
        };

        let financed_fee = input.principal.times_rate(input.origination_fee_pct);
        let financed_prepaid_interest = financed_prepaid_interest(
            input.principal + financed_fee,
            input.annual_rate.per_diem(input.days_per_year),
            input.closing_date,
            input.prepaid_until,
        );
        let exit_fee = input.principal.times_rate(input.exit_fee_pct);

        Self {
            loan_id: input.loan_id,
            original_principal: input.principal,
            principal: input.principal + financed_fee + financed_prepaid_interest,
            annual_rate: input.annual_rate,
            closing_date: input.closing_date,
            term_months: input.term_months,
            payment_frequency: input.payment_frequency,
            day_count,
            days_per_year: input.days_per_year,
            prorate_first,
            amortize,
            prepaid_until: input.prepaid_until,
            origination_fee_pct: input.origination_fee_pct,
            exit_fee_pct: input.exit_fee_pct,
            financed_fee,
            financed_prepaid_interest,
            exit_fee,
        }
    }

    pub fn per_diem_rate(&self) -> Rate {
        self.annual_rate.per_diem(self.days_per_year)
    }

    pub fn monthly_rate(&self) -> Rate {
        self.annual_rate.monthly_rate()
    }

    pub fn is_single_period(&self) -> bool {
        self.payment_frequency == PaymentFrequency::SinglePeriod
    }

    /// period number of the last scheduled period
    pub fn final_period_number(&self) -> u32 {
        self.term_months
    }
}

/// interest owed for the prepaid window, grossed up because financing it
/// increases the balance it accrues on: p' = p * q / (1 - q)
fn financed_prepaid_interest(
    principal: Money,
    per_diem: Rate,
    closing: NaiveDate,
    prepaid_until: Option<NaiveDate>,
) -> Money {
    let Some(until) = prepaid_until else {
        return Money::ZERO;
    };
    let prepaid_days = days_between(closing, until).max(0);
    if prepaid_days == 0 || per_diem.is_zero() {
        return Money::ZERO;
    }

    let q = per_diem.as_decimal() * Decimal::from(prepaid_days);
    // a full year of prepaid interest at the note rate would divide by zero
    if q >= Decimal::ONE {
        return Money::ZERO;
    }

    Money::from_decimal(principal.as_decimal() * q / (Decimal::ONE - q))
}
