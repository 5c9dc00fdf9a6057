use clap::Parser;
use miette::Result;
use isaslice::cli::commands::{completions, config, data, factors, names, studies, summary};
use isaslice::cli::{Cli, Commands, GlobalOpts};
use isaslice::core::Config;

const DEFAULT_LOG_LEVEL: &str = "warn";

fn main() -> Result<()> {
    // Terminate silently on a closed pipe (`isaslice factors | head`)
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;

    let config = Config::load(Some(&global.input));
    init_tracing(&global, &config)?;

    match cli.command {
        Commands::Studies(args) => studies::run(args, &global),
        Commands::Factors(args) => factors::run_factors(args, &global),
        Commands::FactorValues(args) => factors::run_factor_values(args, &global),
        Commands::DataList(args) => data::run_data_list(args, &global),
        Commands::DataCollection(args) => data::run_data_collection(args, &global),
        Commands::Summary(args) => summary::run_summary(args, &global),
        Commands::Groups(args) => summary::run_groups(args, &global),
        Commands::Sources(args) => data::run_sources(args, &global),
        Commands::SampleData(args) => data::run_sample_data(args, &global),
        Commands::VariableNames(args) => names::run(args, &global),
        Commands::Config(cmd) => config::run(cmd, &global),
        Commands::Completions(args) => completions::run(args),
    }
}

/// Log to stderr; `ISASLICE_LOG` overrides the flags and the configured level
fn init_tracing(global: &GlobalOpts, config: &Config) -> Result<()> {
    let level = global
        .log_directive()
        .or(config.log_level.as_deref())
        .unwrap_or(DEFAULT_LOG_LEVEL);

    let filter = tracing_subscriber::EnvFilter::try_from_env("ISASLICE_LOG")
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .map_err(|e| miette::miette!("Invalid log level '{}': {}", level, e))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| miette::miette!("Failed to initialize logging: {}", e))?;

    Ok(())
}
