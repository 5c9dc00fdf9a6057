//! `isaslice config` command - Configuration inspection

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::GlobalOpts;
use crate::core::config::LOCAL_CONFIG_FILE;
use crate::core::Config;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show(ShowArgs),

    /// Show paths to configuration files
    Path,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Show only this key's value
    pub key: Option<String>,

    /// Print the merged configuration as YAML
    #[arg(long)]
    pub yaml: bool,
}

/// Valid configuration keys
const VALID_KEYS: &[(&str, &str)] = &[
    ("default_format", "Default output format (json, tsv, csv, md)"),
    ("log_level", "Log level when no flag or ISASLICE_LOG is given"),
    ("missing_values", "Extra cell values read as missing"),
    ("axis_columns", "Columns joined into variable names"),
];

pub fn run(cmd: ConfigCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ConfigCommands::Show(args) => run_show(args, global),
        ConfigCommands::Path => run_path(global),
    }
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load(Some(&global.input));

    if let Some(key) = &args.key {
        if !VALID_KEYS.iter().any(|(k, _)| k == key) {
            return Err(miette::miette!(
                help = "use `isaslice config show` to list the keys",
                "Unknown configuration key '{}'",
                key
            ));
        }
        println!("{}", config_value(&config, key));
        return Ok(());
    }

    if args.yaml {
        print!("{}", serde_yml::to_string(&config).into_diagnostic()?);
        return Ok(());
    }

    println!("{}", style("Effective Configuration").bold().underlined());
    println!();
    for (key, description) in VALID_KEYS {
        println!(
            "  {:<16} {}  {}",
            style(key).cyan(),
            style(config_value(&config, key)).yellow(),
            style(description).dim()
        );
    }

    println!();
    println!("{}", style("Config Sources (in priority order):").dim());
    println!("  1. Environment variables (ISASLICE_FORMAT, ISASLICE_LOG_LEVEL)");
    println!("  2. Input directory config ({})", LOCAL_CONFIG_FILE);
    println!("  3. Global config (~/.config/isaslice/config.yaml)");

    Ok(())
}

fn run_path(global: &GlobalOpts) -> Result<()> {
    let global_path = Config::global_config_path()
        .ok_or_else(|| miette::miette!("Could not determine global config directory"))?;
    let local_path = global.input.join(LOCAL_CONFIG_FILE);

    for (label, path) in [("Global:", global_path), ("Input:", local_path)] {
        let state = if path.exists() {
            style("(exists)").green()
        } else {
            style("(not created)").dim()
        };
        println!("  {:<8} {} {}", style(label).cyan(), path.display(), state);
    }

    Ok(())
}

fn config_value(config: &Config, key: &str) -> String {
    match key {
        "default_format" => config.default_format.clone().unwrap_or_else(|| "auto".to_string()),
        "log_level" => config.log_level.clone().unwrap_or_else(|| "warn".to_string()),
        "missing_values" => config.missing_values().join(", "),
        "axis_columns" => config.axis_columns().join(", "),
        _ => String::new(),
    }
}
