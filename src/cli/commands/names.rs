//! `isaslice variable-names` command - Normalized names from axis columns

use miette::Result;
use std::path::PathBuf;

use crate::cli::helpers::{render_list, resolve_input_file, write_output};
use crate::cli::GlobalOpts;
use crate::core::{read_table, Config, LoadOptions};
use crate::engine::names::variable_names;

#[derive(clap::Args, Debug)]
pub struct VariableNamesArgs {
    /// Sheet to read (a path, or a file name inside the input directory)
    pub table: PathBuf,

    /// Axis column joined into the names (repeatable; default from config)
    #[arg(long = "axis", value_name = "COLUMN")]
    pub axes: Vec<String>,

    /// Make the names unique with `.N` suffixes
    #[arg(long)]
    pub unique: bool,

    /// Output to file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

pub fn run(args: VariableNamesArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load(Some(&global.input));
    let path = resolve_input_file(global, &args.table);
    let options = LoadOptions {
        missing_values: config.missing_values(),
    };
    let table = read_table(&path, &options)?;

    let axes = if args.axes.is_empty() {
        config.axis_columns()
    } else {
        args.axes
    };
    for axis in axes.iter().filter(|a| !table.has_column(a)) {
        tracing::warn!(column = %axis, sheet = %table.name(), "axis column not found");
    }

    let names = variable_names(&table, &axes, args.unique);
    let content = render_list("variable_name", &names, global.output_format(&config))?;
    write_output(&content, args.output.as_deref())
}
