use std::collections::HashMap;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// A normalized row of an online banking export
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TransactionRecord {
    pub(crate) account_name: String,
    pub(crate) iban_account: String,
    pub(crate) bic_account: String,
    pub(crate) bank_name_account: String,
    pub(crate) booking_date: Option<NaiveDate>,
    pub(crate) value_date: Option<NaiveDate>,
    pub(crate) payer_name: String,
    pub(crate) payer_iban: String,
    pub(crate) payer_bic: String,
    pub(crate) booking_text: String,
    pub(crate) purpose: String,
    pub(crate) amount: Decimal,
    pub(crate) currency: String,
    pub(crate) balance_after_booking: Decimal,
    pub(crate) remark: String,
    pub(crate) category: String,
    pub(crate) tax_relevant: Option<String>,
    pub(crate) creditor_id: Option<String>,
    pub(crate) mandate_reference: Option<String>,

    /// Columns outside the rename table, kept under their original header
    pub(crate) extra_columns: Vec<(String, String)>,

    /// 0-based rank among rows sharing the same booking date, in file order
    pub(crate) transaction_order: usize,
    pub(crate) transactions_per_day: usize,
    /// Position within the booking day, 1.0 for the first row of a day
    pub(crate) virtual_timestamp: f64,
    /// Booking date shifted by `virtual_timestamp` days. Only used to place chart points.
    pub(crate) virtual_booking_date: Option<NaiveDateTime>,
}

impl TransactionRecord {
    /// Booking time used for ordering points within a chart, falls back to midnight of the booking day
    pub(crate) fn plot_time(&self) -> Option<NaiveDateTime> {
        self.virtual_booking_date
            .or_else(|| self.booking_date.and_then(|d| d.and_hms_opt(0, 0, 0)))
    }
}

/// Spread rows sharing a booking date across that day.
///
/// Rows are ranked per booking date in the order they appear. The first row of a day gets
/// the latest virtual time, so a newest-first export draws left to right without overlapping points.
/// Rows without a booking date are ranked as one group of their own.
pub(crate) fn assign_virtual_order(records: &mut [TransactionRecord]) {
    let mut per_day: HashMap<Option<NaiveDate>, usize> = HashMap::new();
    for r in records.iter() {
        *per_day.entry(r.booking_date).or_insert(0) += 1;
    }

    let mut seen: HashMap<Option<NaiveDate>, usize> = HashMap::new();
    for r in records.iter_mut() {
        let order = seen.entry(r.booking_date).or_insert(0);
        r.transaction_order = *order;
        *order += 1;

        r.transactions_per_day = per_day[&r.booking_date];
        r.virtual_timestamp = virtual_timestamp(r.transaction_order, r.transactions_per_day);
        r.virtual_booking_date = r.booking_date.and_then(|d| shift_by_fraction(d, r.virtual_timestamp));
    }
}

fn virtual_timestamp(order: usize, per_day: usize) -> f64 {
    if per_day == 0 {
        return 1.0;
    }
    (1.0 - order as f64 / per_day as f64).clamp(0.0, 1.0)
}

fn shift_by_fraction(date: NaiveDate, fraction: f64) -> Option<NaiveDateTime> {
    let midnight = date.and_hms_opt(0, 0, 0)?;
    let seconds = (fraction * SECONDS_PER_DAY).round() as i64;
    midnight.checked_add_signed(Duration::seconds(seconds))
}

#[cfg(test)]
pub(crate) mod testutils {
    use std::str::FromStr;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use crate::transaction::TransactionRecord;

    /// Build a record with only the fields the aggregation cares about
    pub(crate) fn record(date: Option<(i32, u32, u32)>, amount: &str, balance: &str) -> TransactionRecord {
        TransactionRecord {
            account_name: "Girokonto".to_string(),
            iban_account: "DE02120300000000202051".to_string(),
            bic_account: "BYLADEM1001".to_string(),
            bank_name_account: "Testbank".to_string(),
            booking_date: date.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
            value_date: None,
            payer_name: format!("Payee {amount}"),
            payer_iban: String::new(),
            payer_bic: String::new(),
            booking_text: "Lastschrift".to_string(),
            purpose: format!("Purpose {amount}"),
            amount: Decimal::from_str(amount).unwrap(),
            currency: "EUR".to_string(),
            balance_after_booking: Decimal::from_str(balance).unwrap(),
            remark: String::new(),
            category: String::new(),
            tax_relevant: None,
            creditor_id: None,
            mandate_reference: None,
            extra_columns: vec![],
            transaction_order: 0,
            transactions_per_day: 1,
            virtual_timestamp: 1.0,
            virtual_booking_date: None,
        }
    }
}
