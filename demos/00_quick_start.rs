/// quick start - build a schedule and recalculate it
use chrono::NaiveDate;
use loan_ledger_rs::{
    build, recalculate, DayCountMethod, EventStore, LoanInput, LoanTerms, Money,
    PaymentFrequency, Rate, Uuid,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // a $100,000 loan at 5% over 12 months
    let terms = LoanTerms::from_input(LoanInput {
        loan_id: Uuid::new_v4(),
        principal: Money::from_major(100_000),
        annual_rate: Rate::from_percentage(5),
        closing_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
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

    // generate the schedule rows and fill in the dues
    let mut rows = build(&terms);
    let mut events = EventStore::new();
    let summary = recalculate(&mut rows, &terms, &mut events);

    for row in &rows {
        println!(
            "period {:>2}  due {}  interest {:>8}  principal {:>8}  total {:>9}",
            row.scheduled_period().unwrap_or(0),
            row.due_date.unwrap(),
            row.interest_due.round_dp(2),
            row.principal_due.round_dp(2),
            row.total_due.round_dp(2),
        );
    }
    println!("\nending principal: {}", summary.ending_principal.round_dp(2));

    Ok(())
}
