use crate::config::LoanTerms;
use crate::decimal::Money;
use crate::types::{DueSplit, PaymentFrequency};

/// everything the due-amount decision needs for one period
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AllocationInput {
    pub period_number: u32,
    pub is_final_period: bool,
    /// interest accrued within this period only
    pub interest_accrued_this_period: Money,
    /// running unpaid interest, including this period's accrual
    pub interest_outstanding: Money,
    /// running principal balance entering the due decision
    pub principal_outstanding: Money,
    /// original annuity split for this period (zero when not amortizing)
    pub scheduled_interest: Money,
    pub scheduled_principal: Money,
    /// an extra principal payment happened in some earlier period
    pub had_extra_payment_earlier: bool,
    /// an extra principal payment happened within this period
    pub extra_payment_this_period: bool,
    /// this row's dues were previously written by a recast
    pub was_reamortized: bool,
    /// the dues currently stored on the row
    pub stored: DueSplit,
}

/// decide a period's interest-due / principal-due split
///
/// Three loan shapes: single-period balloon, interest-only, amortizing.
/// For amortizing loans a prepayment anywhere in the loan's history
/// re-splits the unchanged scheduled total against actual accrued
/// interest; rows rewritten by a recast keep their stored dues as long as
/// no prepayment exists.
pub fn allocate(terms: &LoanTerms, input: &AllocationInput) -> DueSplit {
    match (terms.payment_frequency, terms.amortize) {
        (PaymentFrequency::SinglePeriod, _) => {
            if input.is_final_period {
                DueSplit {
                    interest_due: input.interest_outstanding,
                    principal_due: input.principal_outstanding,
                }
            } else {
                DueSplit::default()
            }
        }
        (PaymentFrequency::Monthly, false) => DueSplit {
            interest_due: input.interest_accrued_this_period,
            principal_due: if input.is_final_period {
                input.principal_outstanding
            } else {
                Money::ZERO
            },
        },
        (PaymentFrequency::Monthly, true) => allocate_amortizing(input),
    }
}

fn allocate_amortizing(input: &AllocationInput) -> DueSplit {
    let extra_anywhere = input.extra_payment_this_period || input.had_extra_payment_earlier;

    // a recast row keeps its rewritten dues until a prepayment forces a re-split
    if input.was_reamortized && !extra_anywhere {
        return input.stored;
    }

    if extra_anywhere {
        // keep the original scheduled total, re-split for lower actual interest;
        // the cap prevents a negative principal portion
        let scheduled_total = input.scheduled_interest + input.scheduled_principal;
        let interest_due = input.interest_accrued_this_period.min(scheduled_total);
        return DueSplit {
            interest_due,
            principal_due: scheduled_total - interest_due,
        };
    }

    // untouched loan: the original annuity split stands
    DueSplit {
        interest_due: input.scheduled_interest,
        principal_due: input.scheduled_principal,
    }
}
