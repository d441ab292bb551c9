//! groupsync - CLI entry point.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use groupsync::config::{
    DEFAULT_METADATA_PREFIX, DEFAULT_PACKAGE_PREFIX, DEFAULT_TEST_MARKER, MarkerTokens, ScanConfig,
};
use groupsync::report::{GroupStatistics, ReportPaths, generate_reports};
use groupsync::{ScanOutput, SyncOptions, process_csv, search_directory};

/// Report test case groups to a CSV, or write an edited CSV back into the sources.
#[derive(Parser, Debug)]
#[command(name = "groupsync")]
#[command(about = "Report test case groups to a CSV, or write an edited CSV back into the sources")]
#[command(version)]
struct Cli {
    /// Directory from which to start searching for test cases
    #[arg(long, default_value = ".")]
    search_root: PathBuf,

    /// Only check files whose name starts with this prefix
    #[arg(long, default_value = "TC")]
    search_filename_prefix: String,

    /// Only check files whose name ends with this suffix
    #[arg(long, default_value = ".java")]
    search_filename_suffix: String,

    /// Name of the CSV file to write test case data to
    #[arg(long, default_value = "test_case_data.csv")]
    out_csv_name: PathBuf,

    /// CSV file with (edited) test case data to write back into the sources
    #[arg(long)]
    in_csv_name: Option<PathBuf>,

    /// Update files even if they were modified more recently than the input CSV
    #[arg(long)]
    force_changes: bool,

    /// Directory for the group histogram and membership files
    #[arg(long, default_value = ".")]
    report_dir: PathBuf,

    /// Token that starts a test method annotation
    #[arg(long, default_value = DEFAULT_TEST_MARKER)]
    marker: String,

    /// Prefix of further annotations between the test marker and the method
    #[arg(long, default_value = DEFAULT_METADATA_PREFIX)]
    metadata_prefix: String,

    /// Keyword of the package statement
    #[arg(long, default_value = DEFAULT_PACKAGE_PREFIX)]
    package_prefix: String,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    fn scan_config(&self) -> ScanConfig {
        ScanConfig {
            search_root: self.search_root.clone(),
            filename_prefix: self.search_filename_prefix.clone(),
            filename_suffix: self.search_filename_suffix.clone(),
            markers: MarkerTokens {
                test_marker: self.marker.clone(),
                metadata_prefix: self.metadata_prefix.clone(),
                package_prefix: self.package_prefix.clone(),
            },
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let config = cli.scan_config();

    let Some(in_csv) = &cli.in_csv_name else {
        let paths = ReportPaths::new(&cli.out_csv_name, &cli.report_dir);
        search_and_report(&config, &paths)?;
        return Ok(());
    };

    // Reverse mode: write the CSV back into the sources
    let options = SyncOptions {
        force_changes: cli.force_changes,
        markers: config.markers.clone(),
    };
    println!("Reading data from {}", in_csv.display());
    println!("Checking files for test annotation differences...");
    let report = process_csv(in_csv, &options)
        .with_context(|| format!("Failed to apply {}", in_csv.display()))?;

    if !report.any_modified() {
        println!("No files changed");
        return Ok(());
    }

    println!(
        "Modified {} annotation(s) in {} file(s)",
        report.modified_rows(),
        report.modified_files().len()
    );
    println!(
        "Updating {} and statistics files to reflect these changes...",
        in_csv.display()
    );
    let paths = ReportPaths::new(in_csv, &cli.report_dir);
    search_and_report(&config, &paths)?;

    Ok(())
}

/// Scan the search root and write all report files.
fn search_and_report(config: &ScanConfig, paths: &ReportPaths) -> Result<()> {
    println!(
        "Searching {} and subdirectories for files like \"{}*{}\" ...",
        config.search_root.display(),
        config.filename_prefix,
        config.filename_suffix
    );
    let output = search_directory(config).context("Failed to search for test cases")?;

    println!("Generating reports...");
    let stats = generate_reports(&output.records, paths).context("Failed to write reports")?;

    print_summary(&output, &stats);
    Ok(())
}

fn print_summary(output: &ScanOutput, stats: &GroupStatistics) {
    let summary = &output.summary;
    println!(
        "✓ {} test cases in {} of {} matching files, {} groups",
        stats.test_cases(),
        summary.files_with_annotations,
        summary.files_matched,
        stats.group_count()
    );

    if summary.group_parse_failures > 0 {
        println!(
            "  {} annotation(s) without a recognizable groups clause were reported as UNKNOWN",
            summary.group_parse_failures
        );
    }
    if summary.unterminated_markers > 0 {
        println!(
            "  {} marker(s) without a following declaration were ignored",
            summary.unterminated_markers
        );
    }
    if summary.files_skipped > 0 {
        println!("  {} file(s) could not be read", summary.files_skipped);
    }
    if summary.lossy_files > 0 {
        println!(
            "  {} file(s) were not valid UTF-8 and were decoded lossily",
            summary.lossy_files
        );
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = if quiet {
        "warn"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
