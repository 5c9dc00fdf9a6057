//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    completions::CompletionsArgs,
    config::ConfigCommands,
    data::{DataCollectionArgs, DataListArgs, SampleDataArgs, SourcesArgs},
    factors::{FactorValuesArgs, FactorsArgs},
    names::VariableNamesArgs,
    studies::StudiesArgs,
    summary::{GroupsArgs, SummaryArgs},
};
use crate::core::Config;

#[derive(Parser)]
#[command(name = "isaslice")]
#[command(author, version, about = "Query and slice ISA-Tab metadata")]
#[command(long_about = "Lists factors, selects samples by factor value and collects their data files from an unpacked ISA-Tab directory.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Only log errors
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Directory holding the unpacked ISA-Tab files
    #[arg(long, short = 'i', global = true, default_value = ".", env = "ISASLICE_INPUT")]
    pub input: PathBuf,

    /// Restrict to one study (file name or identifier)
    #[arg(long, short = 's', global = true)]
    pub study: Option<String>,
}

impl GlobalOpts {
    /// The requested format, falling back to the configured default for `auto`
    pub fn output_format(&self, config: &Config) -> OutputFormat {
        if self.format != OutputFormat::Auto {
            return self.format;
        }
        config
            .default_format
            .as_deref()
            .and_then(|f| OutputFormat::from_str(f, true).ok())
            .unwrap_or(OutputFormat::Auto)
    }

    /// Logging directive from the flags, if any was given
    pub fn log_directive(&self) -> Option<&str> {
        if let Some(level) = self.log_level.as_deref() {
            Some(level)
        } else if self.quiet {
            Some("error")
        } else if self.verbose {
            Some("debug")
        } else {
            None
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the studies of the investigation
    Studies(StudiesArgs),

    /// List factor names found in study and assay sheets
    Factors(FactorsArgs),

    /// List the values of one factor
    FactorValues(FactorValuesArgs),

    /// Select samples by factor value and list their data files
    DataList(DataListArgs),

    /// Copy the data files of selected samples into a directory
    DataCollection(DataCollectionArgs),

    /// Per-sample summary of factor values and characteristics
    Summary(SummaryArgs),

    /// Study groups and their sample counts
    Groups(GroupsArgs),

    /// Sources a sample derives from
    Sources(SourcesArgs),

    /// Data files generated from a sample
    SampleData(SampleDataArgs),

    /// Derive normalized variable names from a sheet's axis columns
    VariableNames(VariableNamesArgs),

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Choose per command (JSON for selections and summaries, TSV for lists)
    #[default]
    Auto,
    /// JSON format (for programming)
    Json,
    /// Tab-separated values (for piping)
    Tsv,
    /// CSV format (for spreadsheets)
    Csv,
    /// Markdown tables
    Md,
}
