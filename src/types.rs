use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::Money;

/// unique identifier for a loan
pub type LoanId = Uuid;

/// how often scheduled payments fall due
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentFrequency {
    /// everything due in a single balloon at maturity
    SinglePeriod,
    /// one scheduled payment per month
    Monthly,
}

/// convention for measuring elapsed time for interest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DayCountMethod {
    /// real calendar days at a per-diem rate
    Actual,
    /// 30-day months / 360-day year style
    Periodic,
}

/// interest/principal split decided for one period
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct DueSplit {
    pub interest_due: Money,
    pub principal_due: Money,
}

impl DueSplit {
    pub fn total(&self) -> Money {
        self.interest_due + self.principal_due
    }
}

/// outcome summary of one recalculation pass
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct RecalcSummary {
    pub periods_processed: u32,
    pub unscheduled_applied: u32,
    pub reamortizations: u32,
    pub paid_off: bool,
    pub ending_principal: Money,
    pub ending_interest: Money,
}
