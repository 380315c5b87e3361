/// extra payment - record an unscheduled prepayment and watch the
/// remaining schedule re-amortize
use chrono::NaiveDate;
use loan_ledger_rs::{
    build, recalculate, DayCountMethod, Event, EventStore, LedgerRow, LoanInput, LoanTerms,
    Money, PaymentFrequency, Rate, Uuid,
};
use rust_decimal_macros::dec;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== extra payment example ===\n");

    let terms = LoanTerms::from_input(LoanInput {
        loan_id: Uuid::new_v4(),
        principal: Money::from_major(10_000),
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
    });

    let mut rows = build(&terms);
    let mut events = EventStore::new();
    recalculate(&mut rows, &terms, &mut events);

    // pay the first two periods as scheduled
    for row in rows.iter_mut().take(2) {
        row.paid_on = row.due_date;
        row.interest_paid = row.interest_due;
        row.principal_paid = row.principal_due;
    }

    // then an extra $1,000 toward principal, mid-period
    let mut extra = LedgerRow::unscheduled(Some(dec!(2.5)), date(2024, 3, 20));
    extra.principal_paid = Money::from_major(1_000);
    rows.push(extra);
    println!("recorded $1,000 unscheduled principal payment on 2024-03-20\n");

    events.clear();
    recalculate(&mut rows, &terms, &mut events);

    for event in events.events() {
        if let Event::ReAmortized {
            from_period,
            leftover_principal,
            leftover_periods,
            ..
        } = event
        {
            println!(
                "re-amortized from period {}: {} over {} periods",
                from_period,
                leftover_principal.round_dp(2),
                leftover_periods,
            );
        }
    }

    println!("\nupdated schedule:");
    for row in rows.iter().filter(|r| r.is_scheduled()) {
        println!(
            "period {:>2}  interest {:>7}  principal {:>8}  balance {:>9}",
            row.scheduled_period().unwrap_or(0),
            row.interest_due.round_dp(2),
            row.principal_due.round_dp(2),
            row.principal_balance.round_dp(2),
        );
    }

    Ok(())
}
