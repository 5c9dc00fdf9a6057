//! Shared helper functions for CLI commands

use console::style;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tabled::{builder::Builder, settings::Style};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{load_bundle, Config, LoadOptions};
use crate::entities::Investigation;

/// Load the document named by the global options
///
/// Returns `Ok(None)` for an investigation without studies, after telling
/// the user; callers then have nothing to do.
pub fn load_document(global: &GlobalOpts, config: &Config) -> Result<Option<Investigation>> {
    let options = LoadOptions {
        missing_values: config.missing_values(),
    };

    let document = match load_bundle(&global.input, &options) {
        Ok(document) => document,
        Err(e) if e.is_empty_document() => {
            tracing::info!(input = %global.input.display(), "no studies in investigation");
            if !global.quiet {
                eprintln!("{} No studies found in {}", style("ℹ").blue(), global.input.display());
            }
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };

    match global.study.as_deref() {
        Some(study) => Ok(Some(document.restrict_to(study)?)),
        None => Ok(Some(document)),
    }
}

/// Resolve a sheet argument: taken as given if it exists, else relative to the input directory
pub fn resolve_input_file(global: &GlobalOpts, name: &Path) -> PathBuf {
    if name.is_file() {
        name.to_path_buf()
    } else {
        global.input.join(name)
    }
}

/// Escape a string for CSV output
///
/// Handles commas, quotes, and newlines according to RFC 4180.
pub fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Render rows in a tabular format; `Auto` renders as TSV
///
/// JSON renders an array of objects keyed by the headers.
pub fn render_rows(headers: &[&str], rows: &[Vec<String>], format: OutputFormat) -> Result<String> {
    let mut out = String::new();
    match format {
        OutputFormat::Json => {
            let objects: Vec<serde_json::Map<String, serde_json::Value>> = rows
                .iter()
                .map(|row| {
                    headers
                        .iter()
                        .zip(row)
                        .map(|(h, v)| (h.to_string(), serde_json::Value::String(v.clone())))
                        .collect()
                })
                .collect();
            out.push_str(&serde_json::to_string_pretty(&objects).into_diagnostic()?);
            out.push('\n');
        }
        OutputFormat::Csv => {
            out.push_str(&headers.join(","));
            out.push('\n');
            for row in rows {
                let cells: Vec<String> = row.iter().map(|c| escape_csv(c)).collect();
                out.push_str(&cells.join(","));
                out.push('\n');
            }
        }
        OutputFormat::Md => {
            let mut builder = Builder::default();
            builder.push_record(headers.iter().copied());
            for row in rows {
                builder.push_record(row.iter().map(String::as_str));
            }
            out.push_str(&builder.build().with(Style::markdown()).to_string());
            out.push('\n');
        }
        OutputFormat::Tsv | OutputFormat::Auto => {
            out.push_str(&headers.join("\t"));
            out.push('\n');
            for row in rows {
                out.push_str(&row.join("\t"));
                out.push('\n');
            }
        }
    }
    Ok(out)
}

/// Render a plain list: one item per line, a JSON array, or a one-column table
pub fn render_list<S: AsRef<str>>(header: &str, items: &[S], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            let items: Vec<&str> = items.iter().map(|i| i.as_ref()).collect();
            Ok(format!("{}\n", serde_json::to_string_pretty(&items).into_diagnostic()?))
        }
        OutputFormat::Md | OutputFormat::Csv => {
            let rows: Vec<Vec<String>> = items.iter().map(|i| vec![i.as_ref().to_string()]).collect();
            render_rows(&[header], &rows, format)
        }
        OutputFormat::Tsv | OutputFormat::Auto => {
            let mut out = String::new();
            for item in items {
                out.push_str(item.as_ref());
                out.push('\n');
            }
            Ok(out)
        }
    }
}

/// Write to a file, or print to stdout when no path is given
pub fn write_output(content: &str, output_path: Option<&Path>) -> Result<()> {
    match output_path {
        Some(path) => {
            let file = File::create(path).into_diagnostic()?;
            let mut writer = BufWriter::new(file);
            writer.write_all(content.as_bytes()).into_diagnostic()?;
            writer.flush().into_diagnostic()?;
            tracing::info!(path = %path.display(), "output written");
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
