use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use crate::render::{RenderConfig, FONT};
use crate::transaction::TransactionRecord;
use crate::util::{format_amount, truncate};

const HEADER: [&str; 4] = ["Date", "Amount", "Name", "Purpose"];
/// Relative width of Date, Amount, Name and Purpose
const COLUMN_WIDTHS: [f64; 4] = [0.10, 0.08, 0.35, 0.35];
const MAX_ROW_HEIGHT: i32 = 48;
const CELL_PADDING: i32 = 6;

/// Cell texts of the expense table, without header
pub(crate) fn table_rows(top: &[&TransactionRecord], text_width: usize) -> Vec<[String; 4]> {
    top.iter()
        .map(|r| [
            r.booking_date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default(),
            format_amount(r.amount),
            truncate(&r.payer_name, text_width),
            truncate(&r.purpose, text_width),
        ])
        .collect()
}

/// Left and right pixel edge of every column, spread over `width`
fn column_edges(width: i32) -> [(i32, i32); 4] {
    let total: f64 = COLUMN_WIDTHS.iter().sum();
    let mut edges = [(0, 0); 4];
    let mut left = 0.0;
    for (i, w) in COLUMN_WIDTHS.iter().enumerate() {
        let right = left + w / total * width as f64;
        edges[i] = (left.round() as i32, right.round() as i32);
        left = right;
    }
    edges
}

pub(crate) fn draw_expense_table<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    top: &[&TransactionRecord],
    config: &RenderConfig,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let (width, height) = area.dim_in_pixel();
    let rows = table_rows(top, config.text_width);
    let row_height = (height as i32 / (rows.len() as i32 + 1)).min(MAX_ROW_HEIGHT);
    let edges = column_edges(width as i32);

    let header_style = (FONT, 16).into_font().style(FontStyle::Bold).color(&config.label)
        .pos(Pos::new(HPos::Left, VPos::Center));
    let cell_style = (FONT, 14).into_font().color(&config.label)
        .pos(Pos::new(HPos::Left, VPos::Center));

    let header = HEADER.map(str::to_string);
    for (i, row) in std::iter::once(&header).chain(rows.iter()).enumerate() {
        let top_edge = i as i32 * row_height;
        let style = if i == 0 { &header_style } else { &cell_style };
        for (text, (left, right)) in row.iter().zip(edges.iter()) {
            let corners = [(*left, top_edge), (*right, top_edge + row_height)];
            area.draw(&Rectangle::new(corners, config.axes.filled()))?;
            area.draw(&Rectangle::new(corners, config.label.stroke_width(1)))?;
            area.draw(&Text::new(text.clone(), (*left + CELL_PADDING, top_edge + row_height / 2), style.clone()))?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::render::table::{column_edges, table_rows};
    use crate::transaction::testutils::record;

    #[test]
    fn test_column_edges_fill_width() {
        let edges = column_edges(880);
        assert_eq!(edges[0], (0, 100));
        assert_eq!(edges[1], (100, 180));
        assert_eq!(edges[3].1, 880);
        assert!(edges.windows(2).all(|w| w[0].1 == w[1].0));
    }

    #[test]
    fn test_table_rows_truncate_text() {
        let mut r = record(Some((2024, 2, 3)), "-84.2", "0");
        r.payer_name = "Stadtwerke".to_string();
        r.purpose = "x".repeat(50);

        let rows = table_rows(&[&r], 42);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][0], "2024-02-03");
        assert_eq!(rows[0][1], "-84.20");
        assert_eq!(rows[0][2], "Stadtwerke");
        assert_eq!(rows[0][3], format!("{}...", "x".repeat(42)));
    }
}
