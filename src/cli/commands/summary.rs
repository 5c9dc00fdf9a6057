//! `isaslice summary` and `isaslice groups` commands

use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;

use crate::cli::helpers::{load_document, render_rows, write_output};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::Config;
use crate::engine::factors::factor_combinations;
use crate::engine::summary::{
    characteristics_summary, factor_summary, group_by_factors, group_sizes, sample_summary,
};
use crate::report::{self, ReportGenerator};

#[derive(clap::Args, Debug)]
pub struct SummaryArgs {
    /// Write the summary records as JSON to this file
    #[arg(long, value_name = "FILE")]
    pub json_output: Option<PathBuf>,

    /// Write an HTML table of study groups to this file
    #[arg(long, value_name = "FILE")]
    pub html_output: Option<PathBuf>,

    /// Summarize source characteristics only
    #[arg(long)]
    pub characteristics: bool,
}

#[derive(clap::Args, Debug)]
pub struct GroupsArgs {
    /// List distinct factor value combinations found on sheet rows instead
    #[arg(long)]
    pub combinations: bool,
}

pub fn run_summary(args: SummaryArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load(Some(&global.input));
    let Some(document) = load_document(global, &config)? else {
        return Ok(());
    };

    let records = if args.characteristics {
        characteristics_summary(&document)
    } else {
        sample_summary(&document)
    };
    tracing::debug!(records = records.len(), "summary built");

    let json = format!("{}\n", serde_json::to_string_pretty(&records).into_diagnostic()?);
    if let Some(path) = &args.json_output {
        write_output(&json, Some(path.as_path()))?;
    }

    if let Some(path) = &args.html_output {
        let groups = group_by_factors(&factor_summary(&document));
        let html = ReportGenerator::new()
            .and_then(|generator| generator.render_summary_html(&groups))
            .into_diagnostic()?;
        write_output(&html, Some(path.as_path()))?;
    }

    if args.json_output.is_some() || args.html_output.is_some() {
        return Ok(());
    }

    let content = match global.output_format(&config) {
        OutputFormat::Auto | OutputFormat::Json => json,
        OutputFormat::Md => format!("{}\n", report::summary_table(&records)),
        format => {
            let columns = report::summary_columns(&records);
            let headers: Vec<&str> = columns.iter().map(String::as_str).collect();
            render_rows(&headers, &report::summary_rows(&records), format)?
        }
    };
    write_output(&content, None)
}

pub fn run_groups(args: GroupsArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load(Some(&global.input));
    let Some(document) = load_document(global, &config)? else {
        return Ok(());
    };
    let format = global.output_format(&config);

    if args.combinations {
        let rows: Vec<Vec<String>> = factor_combinations(&document)
            .into_iter()
            .map(|combination| {
                let label = combination
                    .iter()
                    .map(|(factor, value)| format!("{}: {}", factor, value))
                    .collect::<Vec<_>>()
                    .join(", ");
                vec![label]
            })
            .collect();
        let content = render_rows(&["combination"], &rows, format)?;
        return write_output(&content, None);
    }

    let groups = group_by_factors(&factor_summary(&document));
    let content = match format {
        OutputFormat::Md => format!("{}\n", report::groups_table(&groups)),
        format => {
            let rows: Vec<Vec<String>> = group_sizes(&groups)
                .into_iter()
                .map(|(label, size)| vec![label, size.to_string()])
                .collect();
            render_rows(&["group", "samples"], &rows, format)?
        }
    };
    write_output(&content, None)
}
