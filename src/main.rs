use std::path::PathBuf;
use clap::Parser;
use env_logger::Env;
use log::error;

use crate::config::Config;
use crate::controller::RunOptions;

mod config;
mod console;
mod controller;
mod csv_reader;
mod export;
mod prompt;
mod render;
mod report;
mod transaction;
mod util;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(propagate_version = true)]
struct Cli {
    /// Online banking CSV export, defaults to the `input` configured
    file: Option<PathBuf>,

    /// Config file path, defaults to <config dir>/saldo/config.toml
    #[clap(long)]
    config: Option<PathBuf>,

    /// Directory receiving the chart images
    #[clap(long)]
    output_dir: Option<PathBuf>,

    /// Number of largest expenses listed per month
    #[clap(long)]
    top: Option<usize>,

    /// Characters of payer name and purpose kept in chart tables
    #[clap(long)]
    text_width: Option<usize>,

    /// List months in calendar order
    #[clap(long)]
    chronological: bool,

    /// Pick a single month to report on
    #[clap(short, long)]
    interactive: bool,

    /// Write the monthly summary to a .csv or .json file
    #[clap(long)]
    export_summary: Option<PathBuf>,

    /// Print tables only, do not draw charts
    #[clap(long)]
    no_charts: bool,
}

impl Cli {
    /// Command line values take precedence over the config file
    fn apply_to(&self, config: &mut Config) {
        if let Some(file) = &self.file {
            config.input = file.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(top) = self.top {
            config.top = top;
        }
        if let Some(width) = self.text_width {
            config.text_width = width;
        }
        if self.chronological {
            config.chronological = true;
        }
    }

    fn run_options(&self) -> RunOptions {
        RunOptions {
            interactive: self.interactive,
            export_summary: self.export_summary.clone(),
            no_charts: self.no_charts,
        }
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match cli.config.clone().or_else(Config::default_path) {
        Some(path) => Config::load_from_file(&path)?,
        None => Config::default(),
    };
    cli.apply_to(&mut config);
    Ok(config)
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli: Cli = Cli::parse();

    let result = load_config(&cli)
        .and_then(|config| controller::run(&config.input, &config, &cli.run_options()));
    if let Err(err) = result {
        error!("{:#}", err);
        std::process::exit(1);
    }
}
