use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{anyhow, Context};
use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use log::{info, warn};
use plotters::prelude::*;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use crate::config::Config;
use crate::report::{MonthKey, MonthlyBucket};
use crate::transaction::TransactionRecord;
use crate::util::{month_range, month_starts};

mod table;

const FONT: &str = "sans-serif";
const HISTORY_FILE: &str = "balance_graph_all.png";
const MONTHLY_DIR: &str = "monthly_graphs";

/// Everything that decides how a chart looks
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RenderConfig {
    pub(crate) face: RGBColor,
    pub(crate) axes: RGBColor,
    pub(crate) label: RGBColor,
    pub(crate) line: RGBColor,
    pub(crate) guide: RGBColor,
    /// Characters kept of payer name and purpose in the expense table
    pub(crate) text_width: usize,
    pub(crate) history_size: (u32, u32),
    pub(crate) month_size: (u32, u32),
}

impl RenderConfig {
    pub(crate) fn from_config(config: &Config) -> anyhow::Result<RenderConfig> {
        let color = |name: &str, value: &str| {
            parse_hex_color(value).ok_or_else(|| anyhow!("invalid {name} colour '{value}', expected #RRGGBB"))
        };

        Ok(RenderConfig {
            face: color("face", &config.theme.face)?,
            axes: color("axes", &config.theme.axes)?,
            label: color("label", &config.theme.label)?,
            line: color("line", &config.theme.line)?,
            guide: RGBColor(128, 128, 128),
            text_width: config.text_width,
            history_size: (1200, 600),
            month_size: (1200, 1400),
        })
    }

    fn text(&self, size: u32) -> TextStyle<'static> {
        (FONT, size).into_font().color(&self.label)
    }
}

/// Parse `#RRGGBB`
pub(crate) fn parse_hex_color(s: &str) -> Option<RGBColor> {
    let hex = s.trim().strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(RGBColor(channel(0)?, channel(2)?, channel(4)?))
}

pub(crate) fn history_path(output_dir: &Path) -> PathBuf {
    output_dir.join(HISTORY_FILE)
}

pub(crate) fn month_path(output_dir: &Path, month: MonthKey) -> PathBuf {
    output_dir.join(MONTHLY_DIR).join(format!("{month}_graph.png"))
}

/// Chart x position of a timestamp, in days
fn x_of(time: NaiveDateTime) -> f64 {
    time.date().num_days_from_ce() as f64 + time.num_seconds_from_midnight() as f64 / 86_400.0
}

fn x_of_date(date: NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}

fn date_of_x(x: f64) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(x.floor() as i32)
}

fn y_of(amount: Decimal) -> f64 {
    amount.to_f64().unwrap_or_default()
}

/// Y range covering all balances with a little headroom
fn balance_range(points: &[(f64, f64)]) -> std::ops::Range<f64> {
    let min = points.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
    let max = points.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);
    let padding = if max > min { (max - min) * 0.05 } else { 1.0 };
    (min - padding)..(max + padding)
}

fn ensure_parent(path: &Path) -> anyhow::Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    Ok(())
}

/// Draw the balance after every booking over the whole export
pub(crate) fn render_balance_history(records: &[TransactionRecord], path: &Path, config: &RenderConfig) -> anyhow::Result<()> {
    let mut dated: Vec<&TransactionRecord> = records.iter().filter(|r| r.booking_date.is_some()).collect();
    dated.sort_by_key(|r| r.plot_time());
    let points: Vec<(f64, f64)> = dated.iter()
        .filter_map(|r| r.booking_date.map(|d| (x_of_date(d), y_of(r.balance_after_booking))))
        .collect();
    let (Some(first), Some(last)) = (dated.first().and_then(|r| r.booking_date), dated.last().and_then(|r| r.booking_date)) else {
        warn!("No dated transactions, skipping {}", path.display());
        return Ok(());
    };

    ensure_parent(path)?;
    let root = BitMapBackend::new(path, config.history_size).into_drawing_area();
    root.fill(&config.face)?;

    let guides = month_starts(first, last);
    let x_start = guides.first().map_or(x_of_date(first), |d| x_of_date(*d));
    let x_range = x_start..x_of_date(last) + 1.0;
    let y_range = balance_range(&points);

    let mut chart = ChartBuilder::on(&root)
        .caption("Account Balance Over Time", config.text(24))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(80)
        .build_cartesian_2d(x_range, y_range.clone())?;
    chart.plotting_area().fill(&config.axes)?;

    let month_label = |x: &f64| date_of_x(*x).map(|d| d.format("%b %Y").to_string()).unwrap_or_default();
    chart.configure_mesh()
        .disable_x_mesh()
        .x_labels(guides.len().clamp(2, 24))
        .x_label_formatter(&month_label)
        .x_desc("Date")
        .y_desc("Balance")
        .axis_style(config.label.stroke_width(1))
        .label_style(config.text(14))
        .axis_desc_style(config.text(16))
        .bold_line_style(config.guide.mix(0.3).stroke_width(1))
        .light_line_style(config.axes)
        .draw()?;

    for month_start in &guides {
        let x = x_of_date(*month_start);
        chart.draw_series(DashedLineSeries::new(
            vec![(x, y_range.start), (x, y_range.end)],
            6,
            4,
            config.guide.mix(0.5).stroke_width(1),
        ))?;
    }
    chart.draw_series(LineSeries::new(points, config.line.stroke_width(2)))?;

    root.present()?;
    info!("Balance history written to {}", path.display());
    Ok(())
}

/// Draw one month: its balance curve above a table of its largest expenses
pub(crate) fn render_month(bucket: &MonthlyBucket, top: &[&TransactionRecord], path: &Path, config: &RenderConfig) -> anyhow::Result<()> {
    let range = month_range(bucket.month).ok_or_else(|| anyhow!("invalid month {}", bucket.month))?;

    let mut timed: Vec<(NaiveDateTime, Decimal)> = bucket.records.iter()
        .filter_map(|r| r.plot_time().map(|t| (t, r.balance_after_booking)))
        .collect();
    timed.sort_by_key(|(t, _)| *t);
    let points: Vec<(f64, f64)> = timed.iter().map(|(t, b)| (x_of(*t), y_of(*b))).collect();
    if points.is_empty() {
        warn!("No dated transactions in {}, skipping {}", bucket.month, path.display());
        return Ok(());
    }

    ensure_parent(path)?;
    let root = BitMapBackend::new(path, config.month_size).into_drawing_area();
    root.fill(&config.face)?;
    let height = config.month_size.1 as i32;
    let (upper, lower) = root.split_vertically(height * 2 / 3);

    // a virtual timestamp of 1.0 on the last day lands on the first of the next month
    let x_range = x_of_date(range.start)..x_of_date(range.end);
    let y_range = balance_range(&points);
    let days = (range.end - range.start).num_days() as usize;

    let mut chart = ChartBuilder::on(&upper)
        .caption(format!("Account Balance - {}", bucket.month), config.text(28))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(80)
        .build_cartesian_2d(x_range, y_range.clone())?;
    chart.plotting_area().fill(&config.axes)?;

    let day_label = |x: &f64| date_of_x(*x).map(|d| d.format("%d").to_string()).unwrap_or_default();
    chart.configure_mesh()
        .x_labels(days + 1)
        .x_label_formatter(&day_label)
        .x_desc("Date")
        .y_desc("Balance")
        .axis_style(config.label.stroke_width(1))
        .label_style(config.text(12))
        .axis_desc_style(config.text(14))
        .bold_line_style(config.guide.mix(0.25).stroke_width(1))
        .light_line_style(config.axes)
        .draw()?;

    let mut booking_days: Vec<NaiveDate> = bucket.records.iter().filter_map(|r| r.booking_date).collect();
    booking_days.sort();
    booking_days.dedup();
    for day in booking_days {
        let x = x_of_date(day);
        chart.draw_series(DashedLineSeries::new(
            vec![(x, y_range.start), (x, y_range.end)],
            6,
            4,
            config.guide.mix(0.5).stroke_width(1),
        ))?;
    }
    chart.draw_series(LineSeries::new(points, config.line.stroke_width(2)).point_size(4))?;

    let title = format!("Top {} Largest Negative Transactions", top.len());
    let table_area = lower.margin(10, 20, 20, 20).titled(&title, config.text(22))?;
    table::draw_expense_table(&table_area, top, config)?;

    root.present()?;
    info!("Report for {} written to {}", bucket.month, path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use plotters::style::RGBColor;
    use crate::config::Config;
    use crate::report::{monthly_buckets, top_negative, MonthKey};
    use crate::render::{date_of_x, history_path, month_path, parse_hex_color, render_balance_history, render_month, x_of, RenderConfig};
    use crate::transaction::assign_virtual_order;
    use crate::transaction::testutils::record;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#87CEEB"), Some(RGBColor(0x87, 0xCE, 0xEB)));
        assert_eq!(parse_hex_color(" #000000 "), Some(RGBColor(0, 0, 0)));
        assert_eq!(parse_hex_color("87CEEB"), None);
        assert_eq!(parse_hex_color("#87CEE"), None);
        assert_eq!(parse_hex_color("#GGGGGG"), None);
    }

    #[test]
    fn test_invalid_theme_is_rejected() {
        let mut config = Config::default();
        assert!(RenderConfig::from_config(&config).is_ok());
        config.theme.line = "skyblue".to_string();
        assert!(RenderConfig::from_config(&config).is_err());
    }

    #[test]
    fn test_x_coordinates() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let noon = date.and_hms_opt(12, 0, 0).unwrap();
        let x = x_of(noon);
        assert_eq!(x.fract(), 0.5);
        assert_eq!(date_of_x(x), Some(date));
    }

    #[test]
    fn test_output_paths() {
        let dir = std::path::Path::new("out");
        assert_eq!(history_path(dir), dir.join("balance_graph_all.png"));
        assert_eq!(month_path(dir, MonthKey { year: 2024, month: 2 }), dir.join("monthly_graphs").join("2024-02_graph.png"));
    }

    #[test]
    fn test_render_images() {
        let mut records = vec![
            record(Some((2024, 2, 3)), "-84.20", "1915.80"),
            record(Some((2024, 2, 3)), "-45.99", "2000.00"),
            record(Some((2024, 2, 1)), "2500.00", "2045.99"),
            record(Some((2024, 1, 28)), "-950.00", "-454.01"),
            record(None, "-1.00", "0"),
        ];
        records[0].purpose = "Abschlag Strom Februar 2024 Vertragskonto 4711 Zaehler 0815".to_string();
        assign_virtual_order(&mut records);

        let dir = tempfile::tempdir().unwrap();
        let config = RenderConfig::from_config(&Config::default()).unwrap();

        let path = history_path(dir.path());
        render_balance_history(&records, &path, &config).unwrap();
        assert!(path.metadata().unwrap().len() > 0);

        let buckets = monthly_buckets(&records);
        let top = top_negative(&records, buckets[0].month, 10);
        let path = month_path(dir.path(), buckets[0].month);
        render_month(&buckets[0], &top, &path, &config).unwrap();
        assert!(path.metadata().unwrap().len() > 0);
    }

    #[test]
    fn test_render_history_without_dates_writes_nothing() {
        let records = vec![record(None, "-1.00", "0")];
        let dir = tempfile::tempdir().unwrap();
        let config = RenderConfig::from_config(&Config::default()).unwrap();
        let path = history_path(dir.path());
        render_balance_history(&records, &path, &config).unwrap();
        assert!(!path.exists());
    }
}
