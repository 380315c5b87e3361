use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::LoanId;

/// all events emitted while generating or recalculating a schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    // schedule lifecycle
    ScheduleGenerated {
        loan_id: LoanId,
        periods: u32,
        principal: Money,
    },
    RecalculationCompleted {
        loan_id: LoanId,
        periods_processed: u32,
        ending_principal: Money,
        ending_interest: Money,
    },

    // payment events
    UnscheduledPaymentApplied {
        loan_id: LoanId,
        paid_on: NaiveDate,
        principal_paid: Money,
        interest_paid: Money,
        remaining_principal: Money,
    },
    LoanPaidOff {
        loan_id: LoanId,
        period: u32,
    },

    // schedule rewrites
    ReAmortized {
        loan_id: LoanId,
        from_period: u32,
        leftover_principal: Money,
        leftover_periods: u32,
    },
    RecastRequested {
        loan_id: LoanId,
        from_period: u32,
        principal_balance: Money,
    },
}

/// event store for collecting events during operations
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
