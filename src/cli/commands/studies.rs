//! `isaslice studies` command - List the studies of an investigation

use miette::Result;

use crate::cli::helpers::{load_document, render_rows, write_output};
use crate::cli::GlobalOpts;
use crate::core::Config;

#[derive(clap::Args, Debug)]
pub struct StudiesArgs {}

pub fn run(_args: StudiesArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load(Some(&global.input));
    let Some(document) = load_document(global, &config)? else {
        return Ok(());
    };

    let rows: Vec<Vec<String>> = document
        .studies
        .iter()
        .map(|study| {
            vec![
                study.filename.clone(),
                study.identifier.clone(),
                study
                    .assays
                    .iter()
                    .map(|a| a.filename.as_str())
                    .collect::<Vec<_>>()
                    .join(","),
                study.declared_factors.join(","),
                study.samples.len().to_string(),
            ]
        })
        .collect();

    let content = render_rows(
        &["file", "identifier", "assays", "factors", "samples"],
        &rows,
        global.output_format(&config),
    )?;
    write_output(&content, None)
}
