use rust_decimal::Decimal;

use crate::decimal::{Money, Rate};

/// per-period interest/principal split for an amortizing loan
#[derive(Debug, Clone, PartialEq)]
pub struct AnnuitySplit {
    /// the level payment amount
    pub payment: Money,
    interest: Vec<Money>,
    principal: Vec<Money>,
}

impl AnnuitySplit {
    pub fn periods(&self) -> u32 {
        self.interest.len() as u32
    }

    /// scheduled interest for a 1-indexed period; zero out of range
    pub fn interest_for(&self, period: u32) -> Money {
        period
            .checked_sub(1)
            .and_then(|i| self.interest.get(i as usize))
            .copied()
            .unwrap_or(Money::ZERO)
    }

    /// scheduled principal for a 1-indexed period; zero out of range
    pub fn principal_for(&self, period: u32) -> Money {
        period
            .checked_sub(1)
            .and_then(|i| self.principal.get(i as usize))
            .copied()
            .unwrap_or(Money::ZERO)
    }

    pub fn total_principal(&self) -> Money {
        self.principal
            .iter()
            .fold(Money::ZERO, |acc, &p| acc + p)
    }
}

/// closed-form annuity split over `total_periods` periods
///
/// Used once for the original term, and again with the leftover principal
/// and period count whenever the remaining schedule is re-amortized.
pub fn solve(rate_per_period: Rate, total_periods: u32, principal: Money) -> AnnuitySplit {
    let mut interest = Vec::with_capacity(total_periods as usize);
    let mut principal_parts = Vec::with_capacity(total_periods as usize);

    if total_periods == 0 {
        return AnnuitySplit {
            payment: Money::ZERO,
            interest,
            principal: principal_parts,
        };
    }

    let i = rate_per_period.as_decimal();
    let payment = annuity_payment(principal, rate_per_period, total_periods);

    let mut balance = principal;
    for k in 1..=total_periods {
        let interest_k = Money::from_decimal(balance.as_decimal() * i);
        // fold the rounding remainder into the final period
        let principal_k = if k == total_periods {
            balance
        } else {
            payment - interest_k
        };

        interest.push(interest_k);
        principal_parts.push(principal_k);
        balance = (balance - principal_k).max(Money::ZERO);
    }

    AnnuitySplit {
        payment,
        interest,
        principal: principal_parts,
    }
}

/// level payment: A = P * i * (1+i)^n / ((1+i)^n - 1), or P/n when i = 0
fn annuity_payment(principal: Money, rate_per_period: Rate, periods: u32) -> Money {
    if periods == 0 {
        return principal;
    }

    let i = rate_per_period.as_decimal();
    if i.is_zero() {
        return principal / Decimal::from(periods);
    }

    let mut compound = Decimal::ONE;
    let base = Decimal::ONE + i;
    for _ in 0..periods {
        compound *= base;
    }

    let numerator = principal.as_decimal() * i * compound;
    let denominator = compound - Decimal::ONE;

    Money::from_decimal(numerator / denominator)
}
