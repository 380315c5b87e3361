use crate::rows::LedgerRow;

/// row indices partitioned by kind, each in chronological order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Classified {
    /// scheduled periods, ascending by period-end date
    pub scheduled: Vec<usize>,
    /// unscheduled payments, ascending by paid-on date
    pub unscheduled: Vec<usize>,
}

/// partition the row table into scheduled periods and unscheduled payments
///
/// Scheduled: integer period number plus a period-end date. Unscheduled:
/// non-integer or blank period number plus a paid-on date. Everything else
/// is blank capacity and lands in neither list. Sorting is stable, so rows
/// sharing a date keep their original relative order.
pub fn classify(rows: &[LedgerRow]) -> Classified {
    let mut scheduled: Vec<usize> = rows
        .iter()
        .enumerate()
        .filter(|(_, row)| row.is_scheduled())
        .map(|(i, _)| i)
        .collect();
    scheduled.sort_by_key(|&i| rows[i].period_end);

    let mut unscheduled: Vec<usize> = rows
        .iter()
        .enumerate()
        .filter(|(_, row)| row.is_unscheduled())
        .map(|(i, _)| i)
        .collect();
    unscheduled.sort_by_key(|&i| rows[i].paid_on);

    Classified {
        scheduled,
        unscheduled,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_partition_by_kind() {
        let rows = vec![
            LedgerRow::scheduled(1, date(2024, 4, 14), date(2024, 4, 15), 31),
            LedgerRow::unscheduled(Some(dec!(1.5)), date(2024, 4, 20)),
            LedgerRow::scheduled(2, date(2024, 5, 14), date(2024, 5, 15), 30),
            LedgerRow::default(), // blank capacity
        ];

        let c = classify(&rows);
        assert_eq!(c.scheduled, vec![0, 2]);
        assert_eq!(c.unscheduled, vec![1]);
    }

    #[test]
    fn test_sorted_chronologically_not_by_position() {
        let rows = vec![
            LedgerRow::scheduled(2, date(2024, 5, 14), date(2024, 5, 15), 30),
            LedgerRow::unscheduled(None, date(2024, 6, 1)),
            LedgerRow::scheduled(1, date(2024, 4, 14), date(2024, 4, 15), 31),
            LedgerRow::unscheduled(None, date(2024, 4, 25)),
        ];

        let c = classify(&rows);
        assert_eq!(c.scheduled, vec![2, 0]);
        assert_eq!(c.unscheduled, vec![3, 1]);
    }

    #[test]
    fn test_equal_dates_keep_original_order() {
        let same_day = date(2024, 4, 20);
        let rows = vec![
            LedgerRow::unscheduled(Some(dec!(1.5)), same_day),
            LedgerRow::unscheduled(Some(dec!(1.75)), same_day),
            LedgerRow::unscheduled(None, same_day),
        ];

        let c = classify(&rows);
        assert_eq!(c.unscheduled, vec![0, 1, 2]);
    }

    #[test]
    fn test_malformed_rows_dropped_from_both_lists() {
        let rows = vec![
            // integer period but no period end
            LedgerRow {
                period: Some(dec!(3)),
                ..LedgerRow::default()
            },
            // fractional period but no paid date
            LedgerRow {
                period: Some(dec!(3.5)),
                ..LedgerRow::default()
            },
        ];

        let c = classify(&rows);
        assert!(c.scheduled.is_empty());
        assert!(c.unscheduled.is_empty());
    }

    #[test]
    fn test_empty_table() {
        let c = classify(&[]);
        assert!(c.scheduled.is_empty());
        assert!(c.unscheduled.is_empty());
    }
}
