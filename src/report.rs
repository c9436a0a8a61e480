//! CSV report assembly.
//!
//! The report is a semicolon-separated table with one row per processed
//! input file, prefixed by a fixed header. The only transformation applied
//! to field values is replacing every literal newline with the two-character
//! sequence `\n`, so multi-line OCR text stays on one CSV line.
//!
//! Fields are not quoted and the separator itself is not escaped: a `;`
//! inside recognised text will produce a spurious column when parsed by a
//! strict CSV reader. Known limitation, kept for compatibility with the
//! report format downstream consumers already parse.

use serde::{Deserialize, Serialize};

/// Separator between fields of a report row.
pub const CELL_SEPARATOR: char = ';';

/// Sentinel written to the output-path and content fields of a failed row.
pub const ERROR_MARKER: &str = "ERROR";

/// Fixed header row of the report.
pub const REPORT_HEADER: [&str; 3] = ["Input File Name", "Output File Name", "Parsed Content"];

/// One line of the summary report.
///
/// `output` and `content` both hold [`ERROR_MARKER`] for failed files; the
/// computed output path is deliberately not reported on failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    pub input: String,
    pub output: String,
    pub content: String,
}

impl ReportRow {
    /// Row for a successfully processed file.
    pub fn ok(input: impl Into<String>, output: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            content: content.into(),
        }
    }

    /// Row for a failed file: both the output and content fields carry the
    /// error sentinel.
    pub fn error(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            output: ERROR_MARKER.to_string(),
            content: ERROR_MARKER.to_string(),
        }
    }

    fn fields(&self) -> [&str; 3] {
        [&self.input, &self.output, &self.content]
    }
}

/// The accumulated report for one run, in file-processing order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Report {
    rows: Vec<ReportRow>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row. Insertion order is the only meaningful order.
    pub fn push(&mut self, row: ReportRow) {
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Serialise the report: header first, then every data row, each
    /// terminated by a newline (including the last).
    pub fn to_csv(&self) -> String {
        let mut csv = encode_row(&REPORT_HEADER);
        for row in &self.rows {
            csv.push_str(&encode_row(&row.fields()));
        }
        csv
    }
}

/// Encode an arbitrary sequence of rows, one newline-terminated line each.
pub fn encode_rows<R, F>(rows: &[R]) -> String
where
    R: AsRef<[F]>,
    F: AsRef<str>,
{
    rows.iter().map(|r| encode_row(r.as_ref())).collect()
}

fn encode_row<F: AsRef<str>>(fields: &[F]) -> String {
    let mut line = fields
        .iter()
        .map(|f| escape_field(f.as_ref()))
        .collect::<Vec<_>>()
        .join(&CELL_SEPARATOR.to_string());
    line.push('\n');
    line
}

/// Replace literal newlines with the two characters `\` `n`.
pub fn escape_field(field: &str) -> String {
    field.replace('\n', "\\n")
}

/// Reverse [`escape_field`] exactly.
pub fn unescape_field(field: &str) -> String {
    field.replace("\\n", "\n")
}
