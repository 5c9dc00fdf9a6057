//! Data file commands: `data-list`, `data-collection`, `sources`, `sample-data`

use console::style;
use miette::{IntoDiagnostic, Result};
use std::collections::{HashMap, HashSet};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::helpers::{load_document, render_list, render_rows, write_output};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::Config;
use crate::engine::slice::{data_for_sample, slice, sources_for_sample, FactorSelection, SliceEntry};

/// Factor selection options shared by `data-list` and `data-collection`
#[derive(clap::Args, Debug)]
pub struct SelectionArgs {
    /// JSON object of factor names to values, e.g. '{"Gender": "Male"}'
    #[arg(long, conflicts_with = "galaxy_parameters_file")]
    pub json_query: Option<String>,

    /// Galaxy tool parameters file holding a `factor_value_series` list
    #[arg(long, value_name = "FILE")]
    pub galaxy_parameters_file: Option<PathBuf>,
}

impl SelectionArgs {
    fn selection(&self) -> Result<Option<FactorSelection>> {
        if let Some(query) = &self.json_query {
            tracing::debug!(%query, "using JSON query");
            return FactorSelection::from_json(query).into_diagnostic().map(Some);
        }
        if let Some(path) = &self.galaxy_parameters_file {
            tracing::debug!(path = %path.display(), "using Galaxy parameters");
            let content = fs::read_to_string(path)
                .map_err(|e| miette::miette!("Failed to read {}: {}", path.display(), e))?;
            return FactorSelection::from_galaxy_parameters(&content)
                .into_diagnostic()
                .map(Some);
        }
        tracing::debug!("no query specified");
        Ok(None)
    }
}

#[derive(clap::Args, Debug)]
pub struct DataListArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Output to file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct DataCollectionArgs {
    /// Directory the data files are copied into (created if missing)
    pub output_dir: PathBuf,

    #[command(flatten)]
    pub selection: SelectionArgs,
}

#[derive(clap::Args, Debug)]
pub struct SourcesArgs {
    /// Sample name
    pub sample: String,
}

#[derive(clap::Args, Debug)]
pub struct SampleDataArgs {
    /// Sample name
    pub sample: String,

    /// Expect exactly one data file for the sample in this assay
    #[arg(long, value_name = "FILE")]
    pub assay: Option<String>,
}

pub fn run_data_list(args: DataListArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load(Some(&global.input));
    let selection = args.selection.selection()?;
    let Some(document) = load_document(global, &config)? else {
        return Ok(());
    };

    let entries = slice(&document, selection.as_ref())?;
    tracing::info!(samples = entries.len(), "samples selected");

    let content = match global.output_format(&config) {
        OutputFormat::Auto | OutputFormat::Json => {
            format!("{}\n", serde_json::to_string_pretty(&entries).into_diagnostic()?)
        }
        format => render_rows(&["sample", "data_files"], &entry_rows(&entries), format)?,
    };
    write_output(&content, args.output.as_deref())
}

fn entry_rows(entries: &[SliceEntry]) -> Vec<Vec<String>> {
    entries
        .iter()
        .map(|e| vec![e.sample.clone(), e.data_files.join(",")])
        .collect()
}

pub fn run_data_collection(args: DataCollectionArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load(Some(&global.input));
    let selection = args.selection.selection()?;
    let Some(document) = load_document(global, &config)? else {
        return Ok(());
    };

    let entries = slice(&document, selection.as_ref())?;
    fs::create_dir_all(&args.output_dir).into_diagnostic()?;

    let outcome = copy_data_files(&entries, &global.input, &args.output_dir)?;

    if !global.quiet {
        println!(
            "{} Copied {} data file(s) to {}",
            style("✓").green(),
            style(outcome.copied).cyan(),
            args.output_dir.display()
        );
        if !outcome.missing.is_empty() {
            println!(
                "{} {} file(s) not found in {}: {}",
                style("!").yellow(),
                outcome.missing.len(),
                global.input.display(),
                outcome.missing.join(", ")
            );
        }
        if !outcome.collisions.is_empty() {
            println!(
                "{} {} file(s) skipped, name already copied from another path: {}",
                style("!").yellow(),
                outcome.collisions.len(),
                outcome.collisions.join(", ")
            );
        }
    }
    Ok(())
}

#[derive(Debug, Default)]
struct CopyOutcome {
    copied: usize,
    missing: Vec<String>,
    /// Files whose base name was already taken by a file from another path
    collisions: Vec<String>,
}

/// Copy every listed file once into `output_dir`, keeping its base name
///
/// The first file to claim a base name wins; later files with the same
/// base name are reported as collisions and never overwrite it.
fn copy_data_files(entries: &[SliceEntry], input_dir: &Path, output_dir: &Path) -> Result<CopyOutcome> {
    let mut outcome = CopyOutcome::default();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut written: HashMap<OsString, &str> = HashMap::new();

    for name in entries.iter().flat_map(|e| e.data_files.iter()) {
        if !seen.insert(name.as_str()) {
            continue;
        }
        let source = input_dir.join(name);
        let Some(file_name) = Path::new(name).file_name() else {
            continue;
        };
        if !source.is_file() {
            tracing::warn!(file = %name, "data file not found");
            outcome.missing.push(name.clone());
            continue;
        }
        if let Some(first) = written.get(file_name) {
            tracing::warn!(file = %name, existing = %first, "data file name already copied");
            outcome.collisions.push(name.clone());
            continue;
        }
        tracing::info!(file = %name, "copying");
        fs::copy(&source, output_dir.join(file_name)).into_diagnostic()?;
        written.insert(file_name.to_os_string(), name.as_str());
        outcome.copied += 1;
    }

    Ok(outcome)
}

pub fn run_sources(args: SourcesArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load(Some(&global.input));
    let Some(document) = load_document(global, &config)? else {
        return Ok(());
    };

    let sources = sources_for_sample(&document, &args.sample);
    if sources.is_empty() {
        tracing::warn!(sample = %args.sample, "no sources found for sample");
    }
    let content = render_list("source", &sources, global.output_format(&config))?;
    write_output(&content, None)
}

pub fn run_sample_data(args: SampleDataArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load(Some(&global.input));
    let Some(document) = load_document(global, &config)? else {
        return Ok(());
    };
    let format = global.output_format(&config);

    if let Some(assay_name) = &args.assay {
        let study = document.select_study(global.study.as_deref())?;
        let assay = study
            .assays
            .iter()
            .find(|a| &a.filename == assay_name)
            .ok_or_else(|| {
                miette::miette!(
                    "Assay '{}' is not part of study '{}'",
                    assay_name,
                    study.filename
                )
            })?;
        let files: Vec<String> = assay.single_data_file(&args.sample)?.into_iter().collect();
        if files.is_empty() {
            tracing::warn!(sample = %args.sample, assay = %assay_name, "no data file for sample");
        }
        let content = render_list("data_file", &files, format)?;
        return write_output(&content, None);
    }

    let rows: Vec<Vec<String>> = data_for_sample(&document, &args.sample)
        .into_iter()
        .map(|data| vec![data.filename.clone(), data.label.to_string()])
        .collect();
    if rows.is_empty() {
        tracing::warn!(sample = %args.sample, "no data files generated from sample");
    }
    let content = match format {
        OutputFormat::Auto => {
            let files: Vec<&str> = rows.iter().map(|r| r[0].as_str()).collect();
            render_list("data_file", &files, format)?
        }
        format => render_rows(&["data_file", "type"], &rows, format)?,
    };
    write_output(&content, None)
}
