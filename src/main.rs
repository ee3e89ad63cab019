use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};
use folder_organizer::services::{parse_slot_limit, DEFAULT_SLOT_LIMIT};
use folder_organizer::{
    default_target_dir, AppConfig, ExportConfig, RunMode, Session, SessionSummary,
    TARGET_DIR_ENV,
};
use std::io;
use std::path::PathBuf;
use tracing::{debug, info, warn, Level};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Parse command line arguments
    let matches = Command::new("Folder Organizer")
        .version(env!("CARGO_PKG_VERSION"))
        .about(
            "Copies txt, png and jpg files into per-extension folders, \
             optionally exporting them to a USB drive",
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .value_name("LEVEL")
                .help("Set the log level (trace, debug, info, warn, error)")
                .default_value("info"),
        )
        .arg(
            Arg::new("target")
                .long("target")
                .value_name("DIR")
                .help(format!(
                    "Destination root for organized files [env: {}]",
                    TARGET_DIR_ENV
                )),
        )
        .arg(
            Arg::new("mode")
                .long("mode")
                .value_name("MODE")
                .help("Run mode (active or dry); prompts when omitted"),
        )
        .arg(
            Arg::new("usb-root")
                .long("usb-root")
                .value_name("DIR")
                .help("Use this directory as the removable drive instead of detecting one"),
        )
        .arg(
            Arg::new("export-prefix")
                .long("export-prefix")
                .value_name("NAME")
                .help("Prefix of the numbered export folders on the removable drive")
                .default_value(folder_organizer::services::DEFAULT_EXPORT_PREFIX),
        )
        .arg(
            Arg::new("max-slots")
                .long("max-slots")
                .value_name("COUNT")
                .help(format!(
                    "Number of export folder slots to search [default: {}]",
                    DEFAULT_SLOT_LIMIT
                )),
        )
        .get_matches();

    let log_level = string_arg(&matches, "log-level").unwrap_or_else(|| "info".to_string());

    // Initialize logging
    initialize_logging(&log_level)?;

    // Load environment variables before resolving defaults that read them
    load_environment_variables();

    // Initialize configuration from command line arguments
    let config = create_app_config(&matches, log_level)?;

    // Run the application
    run_application(config)
}

fn string_arg(matches: &ArgMatches, name: &str) -> Option<String> {
    matches.get_one::<String>(name).cloned()
}

/// Create application configuration from CLI arguments, falling back to the environment
fn create_app_config(matches: &ArgMatches, log_level: String) -> Result<AppConfig> {
    let target_dir = string_arg(matches, "target")
        .map(PathBuf::from)
        .unwrap_or_else(default_target_dir);

    let mode = string_arg(matches, "mode")
        .map(|mode| mode.parse::<RunMode>())
        .transpose()?;

    let usb_root = string_arg(matches, "usb-root").map(PathBuf::from);

    let prefix = string_arg(matches, "export-prefix").unwrap_or_default();

    let slot_limit = parse_slot_limit(string_arg(matches, "max-slots").as_deref())?;

    Ok(AppConfig {
        target_dir,
        mode,
        usb_root,
        export: ExportConfig {
            prefix,
            slot_limit,
            ..ExportConfig::default()
        },
        log_level,
    })
}

/// Initialize structured logging with tracing
fn initialize_logging(log_level: &str) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    // Prompts own stdout, log lines go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))
}

/// Load the optional .env file
fn load_environment_variables() {
    match dotenvy::dotenv() {
        Ok(path) => debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => debug!("No .env file found, using system environment variables"),
        Err(e) => warn!("Failed to load .env file: {}", e),
    }
}

/// Main application logic
fn run_application(config: AppConfig) -> Result<()> {
    info!("Starting Folder Organizer");
    info!("Configuration: {:#?}", config);

    let locator = config.drive_locator();
    let stdin = io::stdin();
    let stdout = io::stdout();
    let summary = Session::new(stdin.lock(), stdout.lock(), &config, locator.as_ref())
        .run()
        .context("Console session ended unexpectedly")?;

    print_final_summary(&summary);

    info!("Application completed successfully");
    Ok(())
}

/// Print final application summary
fn print_final_summary(summary: &SessionSummary) {
    info!("=== FINAL SUMMARY ===");
    match summary.mode {
        Some(mode) => info!("Mode: {}", mode),
        None => info!("Mode: not selected"),
    }
    info!("Organize runs: {}", summary.organize_reports.len());
    info!("Exports: {}", summary.exports.len());
    info!("Files copied: {}", summary.files_copied());
    info!("Files listed in dry run: {}", summary.files_planned());

    let total_errors: usize = summary
        .organize_reports
        .iter()
        .chain(summary.exports.iter().map(|export| &export.report))
        .map(|report| report.errors.len())
        .sum();
    if total_errors > 0 {
        warn!("Errors encountered: {}", total_errors);
    }
}
