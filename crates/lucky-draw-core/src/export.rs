// History export: round history as a spreadsheet-friendly CSV file.
//
// Output layout:
//
//   <BOM>Round,Timestamp,Winners
//   2,"2026/10/19 15:04:05","Amy;Bob"
//   1,"2026/10/19 15:01:44","Cy"
//
// Rows follow history order (newest first). Text fields are quoted with
// embedded quotes doubled; the round number is written bare.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, NaiveDate, Utc};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use thiserror::Error;
use tracing::info;

use crate::history::History;

/// MIME type of the exported file.
pub const CSV_MIME_TYPE: &str = "text/csv";

/// UTF-8 byte-order marker so spreadsheet tools detect the encoding.
pub const UTF8_BOM: &str = "\u{FEFF}";

/// Header line of the exported table.
pub const HEADER: &str = "Round,Timestamp,Winners";

/// Separator between winner names inside the Winners column.
pub const WINNER_SEPARATOR: &str = ";";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("no rounds to export")]
    EmptyHistory,

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("export produced invalid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// File name for an export made on `date`: `lucky_draw_results_<YYYY-MM-DD>.csv`.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("lucky_draw_results_{}.csv", date.format("%Y-%m-%d"))
}

/// Render a timestamp in local time with a `chrono` format string.
///
/// Falls back to RFC 3339 if the format string cannot be rendered.
pub fn format_timestamp(timestamp: &DateTime<Utc>, format: &str) -> String {
    let local = timestamp.with_timezone(&Local);
    let mut out = String::new();
    if write!(out, "{}", local.format(format)).is_err() {
        return local.to_rfc3339();
    }
    out
}

/// Serialize `history` into the CSV table, BOM included.
pub fn to_table(history: &History, timestamp_format: &str) -> Result<String, ExportError> {
    let mut out = Vec::new();
    out.extend_from_slice(UTF8_BOM.as_bytes());
    out.extend_from_slice(HEADER.as_bytes());
    out.push(b'\n');

    for record in history {
        out.extend_from_slice(record.round.to_string().as_bytes());
        out.push(b',');
        let text = quoted_fields([
            format_timestamp(&record.timestamp, timestamp_format),
            record.winners.join(WINNER_SEPARATOR),
        ])?;
        out.extend_from_slice(&text);
    }

    Ok(String::from_utf8(out)?)
}

/// Write one CSV row with every field quoted, whatever it looks like.
fn quoted_fields<const N: usize>(fields: [String; N]) -> Result<Vec<u8>, ExportError> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record(&fields)?;
    writer
        .into_inner()
        .map_err(|e| ExportError::Csv(csv::Error::from(e.into_error())))
}

/// Write the export for `history` into `dir`, named after `date`.
///
/// Creates `dir` when missing. Returns the written path. An empty history is
/// rejected with [`ExportError::EmptyHistory`] and nothing is written.
pub fn write_export(
    dir: &Path,
    history: &History,
    timestamp_format: &str,
    date: NaiveDate,
) -> Result<PathBuf, ExportError> {
    if history.is_empty() {
        return Err(ExportError::EmptyHistory);
    }

    let table = to_table(history, timestamp_format)?;
    std::fs::create_dir_all(dir).map_err(|e| ExportError::Io {
        path: dir.to_path_buf(),
        source: e,
    })?;
    let path = dir.join(export_file_name(date));
    std::fs::write(&path, table).map_err(|e| ExportError::Io {
        path: path.clone(),
        source: e,
    })?;

    info!(
        "Exported {} rounds to {} ({})",
        history.len(),
        path.display(),
        CSV_MIME_TYPE
    );
    Ok(path)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
