use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::LevelFilter;

use exifgeo::config::{Config, OutputFormat, OutputSettings};
use exifgeo::coordinate::format_dms;
use exifgeo::gps_record::NormalizedGpsRecord;
use exifgeo::scanner::{self, ImageOutcome, ImageResult, ScanReport};

// --- CLI Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("APP_GIT_HASH"), ")"),
    about = "Extracts GPS coordinates, altitude, speed, track and UTC time from image EXIF data.",
    long_about = None
)]
struct Cli {
    /// Image files or directories (searched recursively)
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Config file (default: <config dir>/exifgeo.toml if it exists)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print a JSON array instead of one line per image
    #[arg(long)]
    json: bool,

    /// Decimal places for coordinates
    #[arg(long)]
    precision: Option<usize>,

    /// Also print coordinates as degrees/minutes/seconds
    #[arg(long)]
    dms: bool,

    /// Only list images that carry a position
    #[arg(long)]
    located_only: bool,

    /// Extra comma-separated file extensions to scan
    #[arg(long, value_delimiter = ',')]
    ext: Vec<String>,

    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    fn log_level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::Error;
        }
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    /// CLI flags override config file values
    fn apply_to(&self, config: &mut Config) {
        if self.json {
            config.output.format = OutputFormat::Json;
        }
        if let Some(p) = self.precision {
            config.output.precision = p;
        }
        if self.dms {
            config.output.show_dms = true;
        }
        config.scan.extensions.extend(self.ext.iter().cloned());
    }
}

// --- Output Helpers ---

fn format_coord(v: Option<f64>, out: &OutputSettings) -> String {
    match v {
        Some(v) if out.show_dms => format!("{:.*} ({})", out.precision, v, format_dms(v)),
        Some(v) => format!("{:.*}", out.precision, v),
        None => "-".to_string(),
    }
}

fn format_record(record: &NormalizedGpsRecord, out: &OutputSettings) -> String {
    let alt = record.altitude_m().map(|a| format!("{:.1}m", a)).unwrap_or_else(|| "-".to_string());
    let time = record
        .timestamp
        .map(|t| t.format("%Y-%m-%d %H:%M:%S%.6f UTC").to_string())
        .unwrap_or_else(|| "-".to_string());
    format!(
        "{} | {} | {} | {}",
        format_coord(record.latitude, out),
        format_coord(record.longitude, out),
        alt,
        time
    )
}

fn print_text(results: &[&ImageResult], out: &OutputSettings) {
    for res in results {
        match &res.outcome {
            ImageOutcome::Record(r) => println!("{} | {}", res.path.display(), format_record(r, out)),
            ImageOutcome::Error(e) => println!("{} | ERROR: {}", res.path.display(), e),
        }
    }
}

fn print_summary(report: &ScanReport) {
    println!(
        "Extracted EXIF info from {} files, found {} with missing GPS info ({} failed)",
        report.results.len(),
        report.missing_gps + report.failed,
        report.failed
    );
}

fn main() -> Result<()> {
    let args = Cli::parse();
    colog::default_builder().filter_level(args.log_level()).init();

    let mut config = Config::load(args.config.as_deref()).context("Config error")?;
    args.apply_to(&mut config);
    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    let extensions = config.normalized_extensions();
    let report = scanner::scan(&args.paths, &config.scan, &extensions);

    let shown: Vec<&ImageResult> = report
        .results
        .iter()
        .filter(|r| !args.located_only || r.record().is_some_and(|rec| rec.has_position()))
        .collect();

    match config.output.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&shown).context("Failed to serialize results")?;
            println!("{}", json);
            log::info!(
                "{} files, {} located, {} missing GPS, {} failed",
                report.results.len(),
                report.located,
                report.missing_gps,
                report.failed
            );
        }
        OutputFormat::Text => {
            print_text(&shown, &config.output);
            print_summary(&report);
        }
    }

    Ok(())
}
