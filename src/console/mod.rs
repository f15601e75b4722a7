use comfy_table::{Cell, CellAlignment, Color, Table, TableComponent};
use rust_decimal::Decimal;
use crate::report::{MonthStatistics, MonthlySummary};
use crate::transaction::TransactionRecord;
use crate::util::{format_amount, format_currency, truncate};

/// Rows shown in the preview of a freshly loaded export
pub(crate) const PREVIEW_ROWS: usize = 5;
const PURPOSE_WIDTH: usize = 70;

fn new_table() -> Table {
    let mut table = Table::new();
    table.remove_style(TableComponent::HorizontalLines);
    table.remove_style(TableComponent::MiddleIntersections);
    table.remove_style(TableComponent::LeftBorderIntersections);
    table.remove_style(TableComponent::RightBorderIntersections);
    table
}

fn amount_cell(amount: Decimal) -> Cell {
    let cell = Cell::new(format_amount(amount)).set_alignment(CellAlignment::Right);
    if amount < Decimal::ZERO {
        cell.fg(Color::Red)
    } else {
        cell
    }
}

pub(crate) fn print_columns(columns: &[String]) {
    println!("Columns in the CSV file:");
    println!("{}", columns.join(", "));
}

/// Print the first few normalized rows
pub(crate) fn print_head(records: &[TransactionRecord]) {
    let mut table = new_table();
    table.set_header(vec!["Booking date", "Name", "Purpose", "Amount", "Currency", "Balance"]);
    for r in records.iter().take(PREVIEW_ROWS) {
        table.add_row(vec![
            Cell::new(format_date(r)),
            Cell::new(truncate(&r.payer_name, 30)),
            Cell::new(truncate(&r.purpose, 40)),
            amount_cell(r.amount),
            Cell::new(r.currency.as_str()),
            amount_cell(r.balance_after_booking),
        ]);
    }
    println!("{table}");
}

pub(crate) fn print_summary(summary: &[MonthlySummary]) {
    let mut table = new_table();
    table.set_header(vec!["Month", "Total In", "Total Out", "Net"]);
    for s in summary {
        table.add_row(vec![
            Cell::new(s.month.to_string()),
            amount_cell(s.total_in),
            amount_cell(s.total_out),
            amount_cell(s.net),
        ]);
    }
    println!("{table}");
}

pub(crate) fn print_month_statistics(stats: &MonthStatistics) {
    println!("\n{} Statistics:", stats.month);
    println!("{:<25} {}", "Number of transactions:", stats.transaction_count);
    println!("{:<25} {}", "Starting balance:", format_currency(stats.starting_balance));
    println!("{:<25} {}", "Ending balance:", format_currency(stats.ending_balance));
    println!("{:<25} {}", "Net change:", format_currency(stats.net_change));
}

pub(crate) fn print_top_negative(top: &[&TransactionRecord]) {
    let mut table = new_table();
    table.set_header(vec!["Date", "Amount", "Name", "Purpose"]);
    for r in top {
        table.add_row(vec![
            Cell::new(format_date(r)).set_alignment(CellAlignment::Center),
            Cell::new(format_currency(r.amount)).set_alignment(CellAlignment::Right),
            Cell::new(r.payer_name.as_str()),
            Cell::new(truncate(&r.purpose, PURPOSE_WIDTH)),
        ]);
    }
    println!("\nTop {} Largest Negative Transactions:", top.len());
    println!("{table}");
}

fn format_date(r: &TransactionRecord) -> String {
    match r.booking_date {
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None => "unknown".to_string()
    }
}
