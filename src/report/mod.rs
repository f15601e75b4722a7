use std::fmt;
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use crate::transaction::TransactionRecord;

/// Number of expenses listed per month unless configured otherwise
pub(crate) const DEFAULT_TOP_K: usize = 10;

/// A calendar month, ordered chronologically
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct MonthKey {
    pub(crate) year: i32,
    pub(crate) month: u32,
}

impl MonthKey {
    pub(crate) fn of(date: NaiveDate) -> MonthKey {
        MonthKey { year: date.year(), month: date.month() }
    }

    pub(crate) fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Records booked within one month, in file order
pub(crate) struct MonthlyBucket<'a> {
    pub(crate) month: MonthKey,
    pub(crate) records: Vec<&'a TransactionRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct MonthlySummary {
    pub(crate) month: MonthKey,
    pub(crate) total_in: Decimal,
    pub(crate) total_out: Decimal,
    pub(crate) net: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct MonthStatistics {
    pub(crate) month: MonthKey,
    pub(crate) transaction_count: usize,
    pub(crate) starting_balance: Decimal,
    pub(crate) ending_balance: Decimal,
    pub(crate) net_change: Decimal,
}

/// Group records by booking month. Months appear in the order they are first seen,
/// records without a booking date belong to no month.
pub(crate) fn monthly_buckets(records: &[TransactionRecord]) -> Vec<MonthlyBucket<'_>> {
    let mut buckets: Vec<MonthlyBucket> = vec![];
    for r in records {
        let Some(date) = r.booking_date else {
            continue;
        };
        let month = MonthKey::of(date);
        match buckets.iter_mut().find(|b| b.month == month) {
            Some(bucket) => bucket.records.push(r),
            None => buckets.push(MonthlyBucket { month, records: vec![r] }),
        }
    }
    buckets
}

/// Money in, money out and net per month, in the order months are first seen in `records`
pub(crate) fn monthly_summary(records: &[TransactionRecord]) -> Vec<MonthlySummary> {
    monthly_buckets(records).iter()
        .map(summarize)
        .collect()
}

fn summarize(bucket: &MonthlyBucket) -> MonthlySummary {
    let mut total_in = Decimal::ZERO;
    let mut total_out = Decimal::ZERO;
    for r in &bucket.records {
        if r.amount > Decimal::ZERO {
            total_in += r.amount;
        } else if r.amount < Decimal::ZERO {
            total_out += r.amount;
        }
    }

    MonthlySummary {
        month: bucket.month,
        total_in,
        total_out,
        net: total_in + total_out,
    }
}

pub(crate) fn sort_chronologically(summary: &mut [MonthlySummary]) {
    summary.sort_by_key(|s| s.month);
}

/// Distinct booking months, newest first
pub(crate) fn available_months(records: &[TransactionRecord]) -> Vec<MonthKey> {
    let mut months: Vec<MonthKey> = monthly_buckets(records).iter().map(|b| b.month).collect();
    months.sort_by(|a, b| b.cmp(a));
    months
}

/// The `k` most negative transactions of `month`, most negative first.
/// Equal amounts keep their file order.
pub(crate) fn top_negative(records: &[TransactionRecord], month: MonthKey, k: usize) -> Vec<&TransactionRecord> {
    let mut negative: Vec<&TransactionRecord> = records.iter()
        .filter(|r| r.booking_date.map_or(false, |d| month.contains(d)))
        .filter(|r| r.amount < Decimal::ZERO)
        .collect();
    negative.sort_by(|a, b| a.amount.cmp(&b.amount));
    negative.truncate(k);
    negative
}

/// Balance before and after a month, taken from the earliest and latest booking by virtual booking time
pub(crate) fn month_statistics(records: &[TransactionRecord], month: MonthKey) -> Option<MonthStatistics> {
    let in_month: Vec<&TransactionRecord> = records.iter()
        .filter(|r| r.booking_date.map_or(false, |d| month.contains(d)))
        .collect();

    let earliest = in_month.iter().min_by_key(|r| r.plot_time())?;
    let latest = in_month.iter().max_by_key(|r| r.plot_time())?;

    Some(MonthStatistics {
        month,
        transaction_count: in_month.len(),
        starting_balance: earliest.balance_after_booking,
        ending_balance: latest.balance_after_booking,
        net_change: latest.balance_after_booking - earliest.balance_after_booking,
    })
}
