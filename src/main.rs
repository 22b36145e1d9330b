//! Age Sorter - sort photos into folders by the subject's age
//!
//! Scans input directories for photos, works out how old the subject was
//! when each one was taken and copies it into the matching age folder.

use age_sorter::i18n::Strings;
use age_sorter::organize::ItemStatus;
use age_sorter::{
    Cli, Config, FsMetadataResolver, ManifestIndex, MediaIndex, NoopIndex, OrganizeOutcome,
    Organizer, scan,
};
use anyhow::Result;
use chrono::Local;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{Level, error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

// CLI Output Module
mod cli_output {
    //! Colored summary output for the command line

    use crossterm::{
        ExecutableCommand,
        style::{Color, Print, Stylize, style},
    };
    use std::io::stdout;

    /// CLI theme colors
    pub struct CliTheme;

    impl CliTheme {
        pub const SUCCESS: Color = Color::Green;
        pub const WARNING: Color = Color::Yellow;
        pub const ERROR: Color = Color::Red;
        pub const HINT: Color = Color::DarkGrey;
        pub const ACCENT: Color = Color::Cyan;
    }

    pub fn print_separator() {
        let _ = stdout().execute(Print(format!("{}\n", "─".repeat(60))));
    }

    pub fn print_title(title: &str) {
        let padding = 60usize.saturating_sub(title.chars().count()) / 2;
        let _ = stdout().execute(Print(" ".repeat(padding)));
        let _ = stdout().execute(Print(style(title).bold()));
        let _ = stdout().execute(Print("\n\n"));
    }

    pub fn print_warning(msg: &str) {
        let _ = stdout().execute(Print(style("⚠ ").with(CliTheme::WARNING).bold()));
        let _ = stdout().execute(Print(format!("{}\n", msg)));
    }

    pub fn print_error(msg: &str) {
        let _ = stdout().execute(Print(style("✗ ").with(CliTheme::ERROR).bold()));
        let _ = stdout().execute(Print(format!("{}\n", msg)));
    }

    pub fn print_hint(msg: &str) {
        let _ = stdout().execute(Print(style("→ ").with(CliTheme::HINT)));
        let _ = stdout().execute(Print(format!("{}\n", msg)));
    }

    /// Print an aligned key/value pair
    pub fn print_key_value(key: &str, value: &str, value_color: Color) {
        let _ = stdout().execute(Print("  "));
        let _ = stdout().execute(Print(style(key).with(CliTheme::HINT)));
        let _ = stdout().execute(Print(": "));
        let _ = stdout().execute(Print(style(value).with(value_color)));
        let _ = stdout().execute(Print("\n"));
    }

    pub fn print_stat(key: &str, value: usize, color: Color) {
        let _ = stdout().execute(Print("  "));
        let _ = stdout().execute(Print(style(key).with(CliTheme::HINT)));
        let _ = stdout().execute(Print(": "));
        let _ = stdout().execute(Print(style(value.to_string()).with(color).bold()));
        let _ = stdout().execute(Print("\n"));
    }

    /// Print one per-photo result line
    pub fn print_result(status_icon: &str, status_color: Color, photo: &str, detail: &str) {
        let _ = stdout().execute(Print("  "));
        let _ = stdout().execute(Print(style(status_icon).with(status_color).bold()));
        let _ = stdout().execute(Print(" "));
        let _ = stdout().execute(Print(style(photo).italic()));
        let _ = stdout().execute(Print(" "));
        let _ = stdout().execute(Print(style(detail).with(CliTheme::HINT)));
        let _ = stdout().execute(Print("\n"));
    }

    pub fn print_log_path(label: &str, path: &str) {
        let _ = stdout().execute(Print("\n  "));
        let _ = stdout().execute(Print(style(label).with(CliTheme::HINT)));
        let _ = stdout().execute(Print(format!("{}\n", path)));
    }

    pub fn print_blank() {
        let _ = stdout().execute(Print("\n"));
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(ref path) = cli.init_config {
        Config::write_sample(path)?;
        println!("{} {}", Strings::sample_config_written(), path.display());
        return Ok(());
    }

    let exe_dir = get_executable_dir()?;
    let log_path = get_log_path(&exe_dir, &cli);
    let _guard = setup_logging(&cli, &log_path)?;

    info!(version = env!("CARGO_PKG_VERSION"), "Age Sorter starting");

    let config = load_config(&cli, &exe_dir)?;
    if config.verbose {
        info!(?config, "Configuration loaded");
    }
    info!(log_file = %log_path.display(), "Log file location");

    validate_config(&config)?;

    let photos = scan::collect_photos(&config, &FsMetadataResolver);
    info!(count = photos.len(), "Found photos");
    if photos.is_empty() {
        cli_output::print_warning(Strings::no_photos_found());
    }

    let index: Box<dyn MediaIndex> = if config.register_media {
        Box::new(ManifestIndex::in_root(&config.output_dir))
    } else {
        Box::new(NoopIndex)
    };
    let organizer = Organizer::new(config.organizer_options()).with_media_index(index);

    match organizer.organize(&photos, config.birth_date, &config.output_dir) {
        Ok(outcome) => {
            print_summary(&outcome, &config, &log_path);
            info!(log_file = %log_path.display(), "Organization complete. Log saved to");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Organization failed");
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn print_summary(outcome: &OrganizeOutcome, config: &Config, log_path: &Path) {
    use cli_output::*;

    print_separator();
    print_title(Strings::processing_complete());
    print_separator();

    let succeeded_label = if config.dry_run {
        Strings::stat_planned()
    } else {
        Strings::stat_copied()
    };

    print_blank();
    print_stat(Strings::stat_requested(), outcome.total_requested, CliTheme::ACCENT);
    print_stat(succeeded_label, outcome.succeeded, CliTheme::SUCCESS);
    print_stat(Strings::stat_failed(), outcome.failed(), CliTheme::ERROR);
    print_stat(Strings::stat_warnings(), outcome.warnings.len(), CliTheme::WARNING);
    print_blank();

    if config.verbose && !outcome.results.is_empty() {
        print_separator();
        print_hint(Strings::detailed_results());
        print_blank();

        for result in &outcome.results {
            let dest = result
                .destination
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default();
            let (icon, color) = match result.status {
                ItemStatus::Copied => ("✓", CliTheme::SUCCESS),
                ItemStatus::Planned => ("~", CliTheme::ACCENT),
                ItemStatus::Failed => ("✗", CliTheme::ERROR),
            };
            print_result(icon, color, &result.photo, &format!("[{}] → {}", result.label, dest));
        }
    }

    if !outcome.failures.is_empty() {
        print_separator();
        print_error(Strings::failed_files());
        print_blank();
        for failure in &outcome.failures {
            print_key_value(&failure.photo, &failure.error.to_string(), CliTheme::ERROR);
        }
    }

    if !outcome.warnings.is_empty() {
        print_separator();
        print_warning(Strings::warning_files());
        print_blank();
        for warning in &outcome.warnings {
            print_key_value(&warning.photo, &warning.error.to_string(), CliTheme::WARNING);
        }
    }

    if config.dry_run {
        print_separator();
        print_warning(Strings::dry_run_notice());
    }

    print_separator();
    print_log_path(Strings::log_file(), &log_path.display().to_string());
}

/// Get the directory where the executable is located
fn get_executable_dir() -> Result<PathBuf> {
    let exe_path = std::env::current_exe()?;
    Ok(exe_path
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".")))
}

/// Determine the log file path based on config file or timestamp
fn get_log_path(exe_dir: &Path, cli: &Cli) -> PathBuf {
    let log_dir = exe_dir.join("Log");
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");

    match cli.config_name() {
        Some(config_name) => log_dir
            .join(&config_name)
            .join(format!("{}_{}.log", config_name, timestamp)),
        None => log_dir.join(format!("CLIRun_{}.log", timestamp)),
    }
}

/// Resolve config path - supports shorthand syntax
///
/// `-C kid` finds `kid`, `kid.toml`, then `<exe_dir>/Config/kid.toml`.
fn resolve_config_path(exe_dir: &Path, config_path: &Path) -> PathBuf {
    if config_path.exists() {
        return config_path.to_path_buf();
    }

    let with_extension = if config_path.extension().is_none() {
        config_path.with_extension("toml")
    } else {
        config_path.to_path_buf()
    };
    if with_extension.exists() {
        return with_extension;
    }

    let filename = config_path.file_name().unwrap_or(config_path.as_os_str());
    let mut in_config_dir = exe_dir.join("Config").join(filename);
    if in_config_dir.extension().is_none() {
        in_config_dir = in_config_dir.with_extension("toml");
    }
    if in_config_dir.exists() {
        return in_config_dir;
    }

    config_path.to_path_buf()
}

/// Load configuration from file or CLI arguments
fn load_config(cli: &Cli, exe_dir: &Path) -> Result<Config> {
    let config = if let Some(ref config_path) = cli.config {
        let resolved_path = resolve_config_path(exe_dir, config_path);
        info!(config_file = %resolved_path.display(), "Loading configuration from file");
        let file_config = Config::load_from_file(&resolved_path)?;
        cli.merge_with_config(file_config)
    } else {
        cli.to_config()
    };

    if config.input_dirs.is_empty() {
        anyhow::bail!("{}", Strings::no_input_dirs_error());
    }
    if config.birth_date.is_none() {
        anyhow::bail!("{}", Strings::no_birth_date_error());
    }

    Ok(config)
}

/// Setup logging (file + console)
fn setup_logging(cli: &Cli, log_path: &Path) -> Result<WorkerGuard> {
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(log_path)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    let subscriber = tracing_subscriber::registry().with(env_filter);

    if cli.json_log {
        subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_writer(non_blocking),
            )
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(fmt::layer().with_ansi(false).with_writer(non_blocking))
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    Ok(guard)
}

/// Validate configuration before processing
fn validate_config(config: &Config) -> Result<()> {
    for input_dir in &config.input_dirs {
        if !input_dir.exists() {
            cli_output::print_warning(&format!(
                "{} {}",
                Strings::input_dir_not_exist(),
                input_dir.display()
            ));
        }
    }

    let output_root = config.output_dir.join(config.root_label.trim());
    for input_dir in &config.input_dirs {
        if output_root.starts_with(input_dir) {
            anyhow::bail!(
                "{} {} ({})",
                Strings::output_inside_input_error(),
                output_root.display(),
                input_dir.display()
            );
        }
    }

    Ok(())
}
