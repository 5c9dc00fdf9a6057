//! Rendered reports: the HTML factor summary and terminal tables

use rust_embed::Embed;
use serde::Serialize;
use tabled::{builder::Builder, settings::Style};
use tera::Tera;
use thiserror::Error;

use crate::engine::summary::{StudyGroup, SummaryRecord, SAMPLE_NAME_KEY};

#[derive(Embed)]
#[folder = "templates/"]
struct EmbeddedTemplates;

const SUMMARY_TEMPLATE: &str = "summary.html.tera";
const SUMMARY_TITLE: &str = "ISA-Tab Factors Summary";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Template rendering error: {0}")]
    RenderError(String),
}

#[derive(Serialize)]
struct GroupRow {
    label: String,
    size: usize,
}

/// Report renderer using Tera with embedded templates
pub struct ReportGenerator {
    tera: Tera,
}

impl ReportGenerator {
    pub fn new() -> Result<Self, ReportError> {
        let mut tera = Tera::default();

        for file in EmbeddedTemplates::iter() {
            let filename = file.as_ref();
            if let Some(content) = EmbeddedTemplates::get(filename) {
                if let Ok(template_str) = std::str::from_utf8(&content.data) {
                    tera.add_raw_template(filename, template_str)
                        .map_err(|e| ReportError::RenderError(e.to_string()))?;
                }
            }
        }

        Ok(Self { tera })
    }

    /// HTML table of study groups and their sample counts
    pub fn render_summary_html(&self, groups: &[StudyGroup]) -> Result<String, ReportError> {
        let rows: Vec<GroupRow> = groups
            .iter()
            .map(|g| GroupRow {
                label: g.label(),
                size: g.size(),
            })
            .collect();

        let mut context = tera::Context::new();
        context.insert("title", SUMMARY_TITLE);
        context.insert("groups", &rows);

        if self.tera.get_template_names().any(|n| n == SUMMARY_TEMPLATE) {
            self.tera
                .render(SUMMARY_TEMPLATE, &context)
                .map_err(|e| ReportError::RenderError(e.to_string()))
        } else {
            Ok(hardcoded_summary_html(&rows))
        }
    }
}

fn hardcoded_summary_html(rows: &[GroupRow]) -> String {
    let mut table = String::from("<table>\n<tr><th>Study group</th><th>Number of samples</th></tr>\n");
    for row in rows {
        table.push_str(&format!(
            "<tr><td>{}</td><td>{}</td></tr>\n",
            escape_html(&row.label),
            row.size
        ));
    }
    table.push_str("</table>");
    format!(
        "<html>\n<head>\n<title>{}</title>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        SUMMARY_TITLE, table
    )
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Markdown table of study groups
pub fn groups_table(groups: &[StudyGroup]) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Study group", "Number of samples"]);
    for group in groups {
        builder.push_record([group.label(), group.size().to_string()]);
    }
    builder.build().with(Style::markdown()).to_string()
}

/// Column order for a set of heterogeneous records: `sample_name`, then
/// every other key in first-seen order
pub fn summary_columns(records: &[SummaryRecord]) -> Vec<String> {
    let mut columns = vec![SAMPLE_NAME_KEY.to_string()];
    for record in records {
        for (key, _) in record.fields() {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
    }
    columns
}

/// Records as rows aligned on [`summary_columns`], absent keys left empty
pub fn summary_rows(records: &[SummaryRecord]) -> Vec<Vec<String>> {
    let columns = summary_columns(records);
    records
        .iter()
        .map(|record| {
            columns
                .iter()
                .map(|c| {
                    if c == SAMPLE_NAME_KEY {
                        record.sample_name.clone()
                    } else {
                        record.get(c).unwrap_or_default().to_string()
                    }
                })
                .collect()
        })
        .collect()
}

/// Markdown table of summary records
pub fn summary_table(records: &[SummaryRecord]) -> String {
    let mut builder = Builder::default();
    builder.push_record(summary_columns(records));
    for row in summary_rows(records) {
        builder.push_record(row);
    }
    builder.build().with(Style::markdown()).to_string()
}
