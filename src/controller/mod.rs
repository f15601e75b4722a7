use std::path::{Path, PathBuf};
use log::{info, warn};
use crate::config::Config;
use crate::console;
use crate::csv_reader::{load_and_preprocess, Ledger};
use crate::export::export_summary;
use crate::prompt;
use crate::render;
use crate::render::RenderConfig;
use crate::report::{available_months, month_statistics, monthly_buckets, monthly_summary, sort_chronologically, top_negative, MonthKey, MonthlyBucket};

/// What a single run produces besides the console summary
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct RunOptions {
    /// Report on one month picked at the prompt instead of every month
    pub(crate) interactive: bool,
    /// Write the monthly summary to this file
    pub(crate) export_summary: Option<PathBuf>,
    /// Print tables only, write no images
    pub(crate) no_charts: bool,
}

/// Load the export at `input` and produce the configured reports
pub(crate) fn run(input: &Path, config: &Config, options: &RunOptions) -> anyhow::Result<()> {
    run_with(input, config, options, prompt::select_month)
}

/// Like [`run`], with `select_month` deciding the month of an interactive run
fn run_with<F>(input: &Path, config: &Config, options: &RunOptions, select_month: F) -> anyhow::Result<()>
where
    F: FnOnce(&[MonthKey]) -> anyhow::Result<MonthKey>,
{
    let ledger = load_and_preprocess(input)?;
    console::print_columns(&ledger.columns);
    console::print_head(&ledger.records);

    let mut summary = monthly_summary(&ledger.records);
    if config.chronological {
        sort_chronologically(&mut summary);
    }
    println!("\nMonthly Summary:");
    console::print_summary(&summary);

    if let Some(path) = &options.export_summary {
        export_summary(&summary, path)?;
    }

    let render_config = if options.no_charts { None } else { Some(RenderConfig::from_config(config)?) };
    if let Some(render_config) = &render_config {
        render::render_balance_history(&ledger.records, &render::history_path(&config.output_dir), render_config)?;
    }

    let mut buckets = monthly_buckets(&ledger.records);
    if options.interactive {
        let month = select_month(&available_months(&ledger.records))?;
        buckets.retain(|b| b.month == month);
    } else {
        buckets.sort_by_key(|b| b.month);
    }
    for bucket in &buckets {
        report_month(&ledger, bucket, config, render_config.as_ref())?;
    }

    info!("Processed {} transactions from {}", ledger.records.len(), input.display());
    Ok(())
}

/// Print one month's statistics and largest expenses, and draw its chart unless charts are off
fn report_month(ledger: &Ledger, bucket: &MonthlyBucket, config: &Config, render_config: Option<&RenderConfig>) -> anyhow::Result<()> {
    let month = bucket.month;
    let Some(stats) = month_statistics(&ledger.records, month) else {
        warn!("No transactions in {month}");
        return Ok(());
    };
    let top = top_negative(&ledger.records, month, config.top);
    console::print_month_statistics(&stats);
    console::print_top_negative(&top);

    if let Some(render_config) = render_config {
        render::render_month(bucket, &top, &render::month_path(&config.output_dir, month), render_config)?;
    }
    Ok(())
}
