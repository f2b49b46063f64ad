use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::report::TableFormat;

#[derive(Parser, Debug)]
#[command(
    name = "loglicense",
    about = "Log the licenses of your Python dependencies and check them against a policy",
    version
)]
pub struct Cli {
    /// Show debug logs (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Hide the progress bar and print a one-line summary
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print a table of the licenses of every dependency
    Report(ReportArgs),
    /// Check dependency licenses against the policy in a config file
    Check(CheckArgs),
}

#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Dependency file (poetry.lock, requirements.txt or pyproject.toml);
    /// searched for in the current directory when omitted
    #[arg(long = "dependency-file", value_name = "FILE")]
    pub dependency_file_flag: Option<PathBuf>,

    #[arg(value_name = "DEPENDENCY_FILE", conflicts_with = "dependency_file_flag")]
    pub dependency_file: Option<PathBuf>,

    /// Registry fields to include; the first must be `name`
    #[arg(
        long = "info-columns",
        value_name = "COLUMN",
        value_delimiter = ',',
        default_values_t = ["name".to_string(), "license".to_string()]
    )]
    pub info_columns: Vec<String>,

    /// Table format
    #[arg(long, value_name = "FORMAT", default_value = "pipe")]
    pub tablefmt: TableFormat,

    /// Write the table to this file instead of stdout
    #[arg(long = "output-file", value_name = "PATH")]
    pub output_file: Option<PathBuf>,

    #[command(flatten)]
    pub registry: RegistryArgs,
}

impl ReportArgs {
    pub fn dependency_file(&self) -> Option<&PathBuf> {
        self.dependency_file
            .as_ref()
            .or(self.dependency_file_flag.as_ref())
    }
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Dependency file (poetry.lock, requirements.txt or pyproject.toml)
    #[arg(value_name = "DEPENDENCY_FILE")]
    pub dependency_file: PathBuf,

    /// INI file with a [loglicense] section
    #[arg(long = "config-file", value_name = "FILE", default_value = ".loglicense")]
    pub config_file: PathBuf,

    /// Print the validated table (default)
    #[arg(long, overrides_with = "no_show_report")]
    pub show_report: bool,

    /// Do not print the validated table
    #[arg(long, overrides_with = "show_report")]
    pub no_show_report: bool,

    /// Table format
    #[arg(long, value_name = "FORMAT", default_value = "pipe")]
    pub tablefmt: TableFormat,

    #[command(flatten)]
    pub registry: RegistryArgs,
}

impl CheckArgs {
    pub fn show_report(&self) -> bool {
        self.show_report || !self.no_show_report
    }
}

#[derive(Args, Debug, Clone)]
pub struct RegistryArgs {
    /// Package manager whose registry is queried
    #[arg(long = "package-manager", value_name = "NAME", default_value = "pypi")]
    pub package_manager: String,

    /// Include development dependencies
    #[arg(long)]
    pub develop: bool,

    /// Registry base URL, e.g. a private mirror
    #[arg(long = "registry-url", value_name = "URL", env = "LOGLICENSE_REGISTRY_URL")]
    pub registry_url: Option<String>,

    /// Maximum number of concurrent registry requests
    #[arg(long, value_name = "N", default_value_t = 8)]
    pub jobs: usize,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS", default_value_t = 10)]
    pub timeout: u64,

    /// Look up the exact versions pinned in the dependency file
    #[arg(long = "pin-versions")]
    pub pin_versions: bool,
}
