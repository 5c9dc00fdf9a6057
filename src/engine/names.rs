//! Name normalization for exported matrix headers
//!
//! Sample and variable names end up as row/column headers of exported
//! matrices, which downstream tools read as identifiers. Names are made
//! syntactically safe (letters, digits, `_` and `.` only, starting with a
//! letter or a dot not followed by a digit) and, on request, unique.

use std::collections::{HashMap, HashSet};

use crate::core::table::Table;

/// Replacement for empty names
const PLACEHOLDER: &str = "X";

/// Separator between axis values in derived variable names
const AXIS_SEPARATOR: &str = "_";

/// Normalize a sequence of names
///
/// Length and order are preserved. Empty names become `X`, `X.1`, `X.2`, ...
/// in encounter order; other names have every character outside
/// `[A-Za-z0-9_.]` replaced by `.`. With `unique`, repeated names keep their
/// first occurrence and later ones get the smallest `.N` suffix not used by
/// any other final name.
///
/// # Examples
/// ```
/// use isaslice::engine::names::normalize;
///
/// assert_eq!(normalize(&["a b", "a.b", ""], true), vec!["a.b", "a.b.1", "X"]);
/// ```
pub fn normalize<S: AsRef<str>>(names: &[S], unique: bool) -> Vec<String> {
    let mut placeholders = 0usize;
    let mut normalized: Vec<String> = names
        .iter()
        .map(|name| {
            let name = name.as_ref();
            if name.is_empty() {
                let generated = match placeholders {
                    0 => PLACEHOLDER.to_string(),
                    n => format!("{}.{}", PLACEHOLDER, n),
                };
                placeholders += 1;
                generated
            } else {
                sanitize(name)
            }
        })
        .collect();

    if unique {
        make_unique(&mut normalized);
    }
    normalized
}

/// Replace unsafe characters and fix an invalid leading character
fn sanitize(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '.' {
                c
            } else {
                '.'
            }
        })
        .collect();

    let mut chars = cleaned.chars();
    let valid_start = match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => true,
        Some('.') => !chars.next().is_some_and(|c| c.is_ascii_digit()),
        _ => false,
    };

    if valid_start {
        cleaned
    } else {
        format!("{}{}", PLACEHOLDER, cleaned)
    }
}

fn make_unique(names: &mut [String]) {
    let mut taken: HashSet<String> = names.iter().cloned().collect();
    let mut seen: HashSet<String> = HashSet::with_capacity(names.len());
    let mut next_suffix: HashMap<String, usize> = HashMap::new();

    for name in names.iter_mut() {
        if seen.insert(name.clone()) {
            continue;
        }
        let counter = next_suffix.entry(name.clone()).or_insert(1);
        let candidate = loop {
            let candidate = format!("{}.{}", name, counter);
            *counter += 1;
            if !taken.contains(&candidate) {
                break candidate;
            }
        };
        taken.insert(candidate.clone());
        seen.insert(candidate.clone());
        *name = candidate;
    }
}

/// Build one name per row from the values of the axis columns
///
/// Values of axis columns that exist and are non-missing are joined with
/// `_`; rows without any contributing value yield an empty name, which
/// [`normalize`] later turns into a placeholder.
pub fn derive_variable_names<S: AsRef<str>>(table: &Table, axis_columns: &[S]) -> Vec<String> {
    let indices: Vec<usize> = axis_columns
        .iter()
        .filter_map(|c| table.column_index(c.as_ref()))
        .collect();

    table
        .rows()
        .map(|row| {
            indices
                .iter()
                .filter_map(|&i| row.cell(i))
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .collect::<Vec<_>>()
                .join(AXIS_SEPARATOR)
        })
        .collect()
}

/// Derived and normalized variable names, ready for use as headers
pub fn variable_names<S: AsRef<str>>(table: &Table, axis_columns: &[S], unique: bool) -> Vec<String> {
    normalize(&derive_variable_names(table, axis_columns), unique)
}
