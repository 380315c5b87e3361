use chrono::{Datelike, Duration, NaiveDate};

/// signed calendar-day difference, time-of-day has no say
pub fn days_between(a: NaiveDate, b: NaiveDate) -> i64 {
    (b - a).num_days()
}

/// inclusive day count: both endpoints counted
pub fn days_between_inclusive(a: NaiveDate, b: NaiveDate) -> i64 {
    days_between(a, b) + 1
}

/// next calendar day
pub fn next_day(d: NaiveDate) -> NaiveDate {
    d.succ_opt().unwrap_or(d)
}

/// true if the day-of-month is 1 or past 28
pub fn is_edge_day(d: NaiveDate) -> bool {
    d.day() == 1 || d.day() > 28
}

/// last calendar day of the month containing `d`
pub fn last_day_of_month(d: NaiveDate) -> NaiveDate {
    last_day_of_ym(d.year(), d.month())
}

/// last calendar day of the month `months` after `d`'s month
pub fn last_day_of_month_after_adding(d: NaiveDate, months: u32) -> NaiveDate {
    let (y, m) = shift_ym(d.year(), d.month(), months as i32);
    last_day_of_ym(y, m)
}

/// `d` plus `months`, day-of-month clamped to the target month's length
pub fn add_months(d: NaiveDate, months: u32) -> NaiveDate {
    let (y, m) = shift_ym(d.year(), d.month(), months as i32);
    let day = d.day().min(days_in_month(y, m));
    NaiveDate::from_ymd_opt(y, m, day).unwrap_or(d)
}

fn shift_ym(year: i32, month: u32, delta_months: i32) -> (i32, u32) {
    let zero_based = year * 12 + month as i32 - 1 + delta_months;
    (zero_based.div_euclid(12), (zero_based.rem_euclid(12) + 1) as u32)
}

fn last_day_of_ym(year: i32, month: u32) -> NaiveDate {
    let (ny, nm) = shift_ym(year, month, 1);
    NaiveDate::from_ymd_opt(ny, nm, 1)
        .and_then(|first| first.checked_sub_signed(Duration::days(1)))
        .unwrap_or(NaiveDate::MAX)
}

fn days_in_month(year: i32, month: u32) -> u32 {
    last_day_of_ym(year, month).day()
}
