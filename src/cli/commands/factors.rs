//! `isaslice factors` and `isaslice factor-values` commands

use miette::Result;
use std::path::PathBuf;

use crate::cli::helpers::{load_document, render_list, write_output};
use crate::cli::GlobalOpts;
use crate::core::Config;
use crate::engine::factors::{factor_values, factors, require_factor};

#[derive(clap::Args, Debug)]
pub struct FactorsArgs {
    /// Output to file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct FactorValuesArgs {
    /// Factor name, as written inside `Factor Value[..]`
    pub factor: String,

    /// Fail when no sheet declares the factor
    #[arg(long)]
    pub strict: bool,

    /// Output to file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

pub fn run_factors(args: FactorsArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load(Some(&global.input));
    let Some(document) = load_document(global, &config)? else {
        return Ok(());
    };

    let names: Vec<String> = factors(&document).into_iter().collect();
    tracing::debug!(count = names.len(), "factors found");

    let content = render_list("factor", &names, global.output_format(&config))?;
    write_output(&content, args.output.as_deref())
}

pub fn run_factor_values(args: FactorValuesArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load(Some(&global.input));
    let Some(document) = load_document(global, &config)? else {
        return Ok(());
    };

    let values = if args.strict {
        require_factor(&document, &args.factor)?
    } else {
        factor_values(&document, &args.factor)
    };
    if values.is_empty() {
        tracing::warn!(factor = %args.factor, "no values found for factor");
    }

    let values: Vec<String> = values.into_iter().collect();
    let content = render_list("value", &values, global.output_format(&config))?;
    write_output(&content, args.output.as_deref())
}
