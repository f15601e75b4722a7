use std::path::{Path, PathBuf};
use std::str::FromStr;
use chrono::NaiveDate;
use csv::StringRecord;
use lazy_static::lazy_static;
use log::{info, warn};
use regex::Regex;
use rust_decimal::Decimal;
use thiserror::Error;
use crate::transaction::{assign_virtual_order, TransactionRecord};

pub(crate) mod column;


use column::ColumnInfo;

#[derive(Debug, Error)]
pub(crate) enum LoadError {
    #[error("source file '{}' was not found", .0.display())]
    SourceNotFound(PathBuf),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("required column '{0}' is missing")]
    MissingColumn(String),

    #[error("could not convert column {column} to a number in row {row}: '{value}'")]
    InvalidAmount {
        column: &'static str,
        row: usize,
        value: String,
    },
}

/// Transactions of one export file after normalization
pub(crate) struct Ledger {
    /// Column names after renaming, in file order
    pub(crate) columns: Vec<String>,
    pub(crate) records: Vec<TransactionRecord>,
}

lazy_static! {
    /// Decimal comma amount with dots grouping thousands, e.g. -1.234.567,89
    static ref GROUPED_AMOUNT: Regex = Regex::new(r"^[+-]?\d{1,3}(\.\d{3})+,\d+$").unwrap();
}

/// Read a semicolon delimited online banking export and normalize its rows.
pub(crate) fn load_and_preprocess(file_path: &Path) -> Result<Ledger, LoadError> {
    if !file_path.exists() {
        return Err(LoadError::SourceNotFound(file_path.to_path_buf()));
    }

    info!("Loading transactions from {}", file_path.display());
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(true)
        .from_path(file_path)?;
    let column_info = ColumnInfo::from_headers(rdr.headers()?)?;

    let mut records: Vec<TransactionRecord> = vec![];
    for (i, result) in rdr.records().enumerate() {
        let row = result?;
        records.push(parse_row(&row, &column_info, i + 1)?);
    }

    assign_virtual_order(&mut records);

    let undated = records.iter().filter(|r| r.booking_date.is_none()).count();
    if undated > 0 {
        warn!("{undated} transactions have no valid booking date and are left out of monthly reports");
    }
    info!("Loaded {} transactions", records.len());

    Ok(Ledger {
        columns: column_info.column_names(),
        records,
    })
}

fn parse_row(row: &StringRecord, column_info: &ColumnInfo, row_number: usize) -> Result<TransactionRecord, LoadError> {
    let text = |field: &str| column_info.get(row, field).to_string();
    let amount = |field: &'static str| {
        let value = column_info.get(row, field);
        parse_amount(value).ok_or_else(|| LoadError::InvalidAmount {
            column: field,
            row: row_number,
            value: value.to_string(),
        })
    };

    let extra_columns = column_info.extra.iter()
        .map(|(i, header)| (header.clone(), row.get(*i).unwrap_or("").to_string()))
        .collect();

    Ok(TransactionRecord {
        account_name: text("account_name"),
        iban_account: text("iban_account"),
        bic_account: text("bic_account"),
        bank_name_account: text("bank_name_account"),
        booking_date: parse_date(column_info.get(row, "booking_date")),
        value_date: parse_date(column_info.get(row, "value_date")),
        payer_name: text("payer_name"),
        payer_iban: text("payer_iban"),
        payer_bic: text("payer_bic"),
        booking_text: text("booking_text"),
        purpose: text("purpose"),
        amount: amount("amount")?,
        currency: text("currency"),
        balance_after_booking: amount("balance_after_booking")?,
        remark: text("remark"),
        category: text("category"),
        tax_relevant: optional(column_info.get(row, "tax_relevant")),
        creditor_id: optional(column_info.get(row, "creditor_id")),
        mandate_reference: optional(column_info.get(row, "mandate_reference")),
        extra_columns,
        transaction_order: 0,
        transactions_per_day: 0,
        virtual_timestamp: 0.0,
        virtual_booking_date: None,
    })
}

/// Parse a DD.MM.YYYY date, anything else is an unknown date
pub(crate) fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%d.%m.%Y").ok()
}

/// Parse a decimal comma amount such as `-50,00` or `1.234,56`
pub(crate) fn parse_amount(s: &str) -> Option<Decimal> {
    let s = s.trim();
    let normalized = if GROUPED_AMOUNT.is_match(s) {
        s.replace('.', "").replace(',', ".")
    } else {
        s.replace(',', ".")
    };
    Decimal::from_str(&normalized).ok()
}

fn optional(s: &str) -> Option<String> {
    match s.trim() {
        "" => None,
        v => Some(v.to_string())
    }
}
