/// interest only - a non-amortizing loan with a balloon at maturity
use chrono::NaiveDate;
use loan_ledger_rs::{
    build, recalculate, DayCountMethod, EventStore, LoanInput, LoanTerms, Money,
    PaymentFrequency, Rate, Uuid,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== interest only example ===\n");

    let terms = LoanTerms::from_input(LoanInput {
        loan_id: Uuid::new_v4(),
        principal: Money::from_major(50_000),
        annual_rate: Rate::from_percentage(6),
        closing_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        term_months: 6,
        payment_frequency: PaymentFrequency::Monthly,
        day_count: DayCountMethod::Periodic,
        days_per_year: 360,
        prorate_first: false,
        amortize: false,
        prepaid_until: None,
        origination_fee_pct: Rate::ZERO,
        exit_fee_pct: Rate::from_percentage(1),
    });

    let mut rows = build(&terms);
    let mut events = EventStore::new();
    recalculate(&mut rows, &terms, &mut events);

    for row in &rows {
        println!(
            "period {}  interest {:>7}  principal {:>9}  fees {:>7}  total {:>9}",
            row.scheduled_period().unwrap_or(0),
            row.interest_due.round_dp(2),
            row.principal_due.round_dp(2),
            row.fees_due.round_dp(2),
            row.total_due.round_dp(2),
        );
        if !row.notes.is_empty() {
            println!("          {}", row.notes);
        }
    }

    Ok(())
}
