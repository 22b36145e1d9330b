//! CLI argument parsing with clap

use crate::config::Config;
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

/// Age Sorter - sort photos into folders by the subject's age
///
/// Copies photos into `<output>/<root-label>/<age>/` where the age folder is
/// derived from the months between the birth date and the capture date,
/// e.g. `newborn`, `3rd_month`, `1st_year_2nd_month`.
#[derive(Parser, Debug)]
#[command(name = "age-sorter")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to configuration file (TOML format)
    ///
    /// When specified, settings from the config file are used as defaults.
    /// CLI arguments will override config file settings.
    #[arg(short = 'C', long)]
    pub config: Option<PathBuf>,

    /// Input directories to scan for photos
    #[arg(short, long, num_args = 1..)]
    pub input: Option<Vec<PathBuf>>,

    /// Destination root for the age folders
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Reference birth date (YYYY-MM-DD)
    #[arg(short, long, env = "AGE_SORTER_BIRTH_DATE")]
    pub birth_date: Option<NaiveDate>,

    /// Folder created between the destination root and the age folders
    #[arg(short = 'r', long)]
    pub root_label: Option<String>,

    /// Do not record copied photos in the media index manifest
    #[arg(long)]
    pub no_register: bool,

    /// Write a commented sample configuration to this path and exit
    #[arg(long, value_name = "PATH")]
    pub init_config: Option<PathBuf>,

    /// Dry run mode - show what would be done without doing it
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Output log format as JSON
    #[arg(long)]
    pub json_log: bool,
}

impl Cli {
    /// Get config file name (without extension) for log naming
    pub fn config_name(&self) -> Option<String> {
        self.config.as_ref().and_then(|p| {
            p.file_stem()
                .and_then(|s| s.to_str())
                .map(|s| s.to_string())
        })
    }

    /// Merge CLI arguments with config from file
    /// CLI arguments take precedence over config file settings
    pub fn merge_with_config(&self, mut config: Config) -> Config {
        if let Some(ref inputs) = self.input {
            config.input_dirs = inputs.clone();
        }
        if let Some(ref output) = self.output {
            config.output_dir = output.clone();
        }
        if let Some(birth_date) = self.birth_date {
            config.birth_date = Some(birth_date);
        }
        if let Some(ref root_label) = self.root_label {
            config.root_label = root_label.clone();
        }
        if self.no_register {
            config.register_media = false;
        }
        if self.dry_run {
            config.dry_run = true;
        }
        if self.verbose {
            config.verbose = true;
        }

        config
    }

    /// Convert CLI arguments to Config (when no config file is used)
    pub fn to_config(&self) -> Config {
        self.merge_with_config(Config::default())
    }
}
