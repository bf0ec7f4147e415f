// Roster parsing: free-form text and imported files into participant names.
//
// Pasted text splits on `;` and newlines. Imported files additionally split
// on carriage returns, keep only the first comma-separated field of each line
// and skip a `name` header row. Imports merge into the existing roster as a
// set union; plain text edits replace it.

use std::collections::HashSet;

/// Delimiters for text typed or pasted into the roster editor.
fn is_text_delimiter(c: char) -> bool {
    c == ';' || c == '\n'
}

/// Delimiters for imported `.csv` / `.txt` files.
fn is_file_delimiter(c: char) -> bool {
    c == ';' || c == '\n' || c == '\r'
}

/// Header cell that marks the first row of an exported name list.
const HEADER_FIELD: &str = "name";

/// Parse raw editor text into an ordered list of names.
///
/// Runs of delimiters collapse into a single split point, every candidate is
/// trimmed, and empty results are dropped. Duplicates are kept.
pub fn parse(raw: &str) -> Vec<String> {
    raw.split(is_text_delimiter)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(String::from)
        .collect()
}

/// Parse the contents of an imported file into an ordered list of names.
///
/// Each line may be a CSV row; only its first field is used. A line whose
/// first field is `name` (any case) is treated as a header and skipped.
/// Duplicates are kept here; [`merge_import`] collapses them.
pub fn parse_file(content: &str) -> Vec<String> {
    content
        .split(is_file_delimiter)
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| line.split(',').next())
        .map(str::trim)
        .filter(|name| !name.is_empty() && name.to_lowercase() != HEADER_FIELD)
        .map(String::from)
        .collect()
}

/// Outcome of merging imported names into an existing roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeReport {
    /// The merged roster: prior names first, new unique names appended.
    pub roster: Vec<String>,
    /// Names appended by the import.
    pub added: usize,
    /// Imported names dropped because they were already present.
    pub skipped: usize,
}

/// Merge imported names into `existing` as an ordered set union.
///
/// The result keeps the existing roster's order, then appends every imported
/// name that has not been seen yet. Duplicates already in `existing` collapse
/// too, so re-importing the same file never grows the roster.
pub fn merge_import(existing: &[String], imported: Vec<String>) -> MergeReport {
    let mut seen: HashSet<String> = HashSet::with_capacity(existing.len() + imported.len());
    let mut roster = Vec::with_capacity(existing.len() + imported.len());

    for name in existing {
        if seen.insert(name.clone()) {
            roster.push(name.clone());
        }
    }
    let before = roster.len();

    let imported_total = imported.len();
    for name in imported {
        if seen.insert(name.clone()) {
            roster.push(name);
        }
    }

    let added = roster.len() - before;
    MergeReport {
        roster,
        added,
        skipped: imported_total - added,
    }
}

/// Remove duplicate names, keeping each name's first occurrence.
pub fn dedupe(roster: &[String]) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(roster.len());
    roster
        .iter()
        .filter(|name| seen.insert(name.as_str()))
        .cloned()
        .collect()
}

/// Render a roster back into editor text, one name per line.
pub fn join(roster: &[String]) -> String {
    roster.join("\n")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
