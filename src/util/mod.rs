use std::ops::Range;
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use crate::report::MonthKey;

/// First day of a month up to (excluding) the first day of the next month
pub(crate) fn month_range(month: MonthKey) -> Option<Range<NaiveDate>> {
    let first_day = NaiveDate::from_ymd_opt(month.year, month.month, 1)?;
    let (next_year, next_month) = if month.month == 12 { (month.year + 1, 1) } else { (month.year, month.month + 1) };
    let first_day_next_month = NaiveDate::from_ymd_opt(next_year, next_month, 1)?;
    Some(first_day..first_day_next_month)
}

/// First day of every month from the month of `from` through the month of `to`
pub(crate) fn month_starts(from: NaiveDate, to: NaiveDate) -> Vec<NaiveDate> {
    let mut starts = vec![];
    let mut current = NaiveDate::from_ymd_opt(from.year(), from.month(), 1);
    while let Some(day) = current {
        if day > to {
            break;
        }
        starts.push(day);
        current = month_range(MonthKey::of(day)).map(|r| r.end);
    }
    starts
}

/// Format amount with exactly two decimals
pub(crate) fn format_amount(amount: Decimal) -> String {
    let mut amount = amount;
    amount.rescale(2);
    amount.to_string()
}

pub(crate) fn format_currency(amount: Decimal) -> String {
    format!("€{}", format_amount(amount))
}

/// Cut text to `width` characters, marking the cut with a trailing `...`
pub(crate) fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() > width {
        let mut cut: String = text.chars().take(width).collect();
        cut.push_str("...");
        cut
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use crate::report::MonthKey;
    use crate::util::{format_amount, format_currency, month_range, month_starts, truncate};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_month_range() {
        let range = month_range(MonthKey { year: 2023, month: 12 }).unwrap();
        assert_eq!(range, date(2023, 12, 1)..date(2024, 1, 1));
        let range = month_range(MonthKey { year: 2024, month: 2 }).unwrap();
        assert_eq!((range.end - range.start).num_days(), 29);
        assert!(month_range(MonthKey { year: 2024, month: 13 }).is_none());
    }

    #[test]
    fn test_month_starts() {
        let starts = month_starts(date(2023, 11, 20), date(2024, 2, 1));
        assert_eq!(starts, vec![date(2023, 11, 1), date(2023, 12, 1), date(2024, 1, 1), date(2024, 2, 1)]);
        assert_eq!(month_starts(date(2024, 3, 5), date(2024, 3, 9)), vec![date(2024, 3, 1)]);
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(Decimal::from_str("-50").unwrap()), "-50.00");
        assert_eq!(format_amount(Decimal::from_str("1234.5").unwrap()), "1234.50");
        assert_eq!(format_amount(Decimal::from_str("0.125").unwrap()), "0.13");
        assert_eq!(format_currency(Decimal::from_str("-10.1").unwrap()), "€-10.10");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Miete", 42), "Miete");
        assert_eq!(truncate("abcdef", 6), "abcdef");
        assert_eq!(truncate("abcdefg", 6), "abcdef...");
        assert_eq!(truncate("Überweisung", 3), "Übe...");
    }
}
