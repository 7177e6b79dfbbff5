//! End-to-end conversion: input lines → FedEx address-book CSV.
//!
//! Stage 1 (line parsing + payload flattening) is pure per line, so it runs
//! across a worker pool: the line range is split into disjoint contiguous
//! chunks and each worker writes only into its own chunk of the pre-sized
//! results vector. No locks, because slot ownership never overlaps.
//!
//! Stages 2-4 (field mapping, transliteration, CSV encoding, row assembly)
//! run strictly sequentially in index order: output order must mirror input
//! order, and a single output buffer is being appended to.
//!
//! # Example
//!
//! ```rust,ignore
//! use tnt2fedex::{convert_file, ConvertOptions};
//! use std::path::Path;
//!
//! let result = convert_file(Path::new("000040562.txt"), &ConvertOptions::default())?;
//! std::fs::write("FedExAddressBook.csv", &result.csv)?;
//! println!("{} rows", result.rows);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::encoder::{encode_field, header_line};
use crate::error::{InputError, PipelineError};
use crate::parser::{decode_input, detect_encoding, parse_line, PayloadOutcome, Record};
use crate::schema::{address_book_rules, is_germanic, COUNTRY_ATTRIBUTE};
use crate::translit::normalize;

use super::rules::{map_row, ColumnRule};

/// Options for a conversion run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertOptions {
    /// Treat input line 0 as a header and drop it before parsing.
    pub skip_header: bool,

    /// Worker count for the parse stage. `None` uses the available
    /// hardware parallelism.
    pub threads: Option<usize>,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            skip_header: false,
            threads: None,
        }
    }
}

/// Result of a conversion run.
#[derive(Debug, Clone, Serialize)]
pub struct ConvertResult {
    /// The complete output document, header line included.
    pub csv: String,

    /// Number of data rows written (equals the input line count after any
    /// header skip).
    pub rows: usize,

    /// Lines whose embedded payload failed to parse as JSON. These rows are
    /// still written, with empty attribute-backed cells.
    pub parse_failures: usize,

    /// Detected input encoding.
    pub encoding: String,
}

/// Convert an input file. Encoding is auto-detected.
pub fn convert_file(path: &Path, options: &ConvertOptions) -> Result<ConvertResult, PipelineError> {
    let bytes = std::fs::read(path).map_err(InputError::from)?;
    convert_bytes(&bytes, options)
}

/// Convert an input file and write the CSV next to it in one step.
pub fn convert_file_to_file(
    input: &Path,
    output: &Path,
    options: &ConvertOptions,
) -> Result<ConvertResult, PipelineError> {
    let result = convert_file(input, options)?;
    std::fs::write(output, &result.csv).map_err(PipelineError::Output)?;
    Ok(result)
}

/// Convert raw input bytes. Encoding is auto-detected.
pub fn convert_bytes(bytes: &[u8], options: &ConvertOptions) -> Result<ConvertResult, PipelineError> {
    let encoding = detect_encoding(bytes);
    debug!(%encoding, "decoding input");
    let content = decode_input(bytes, &encoding)?;

    let mut lines: Vec<&str> = content.lines().collect();
    if options.skip_header && !lines.is_empty() {
        lines.remove(0);
    }

    let mut result = convert_lines(&lines, options);
    result.encoding = encoding;
    Ok(result)
}

/// Convert already-decoded input lines.
///
/// This is the core of the pipeline; it cannot fail. One corrupt line never
/// prevents the remaining lines from being converted.
pub fn convert_lines(lines: &[&str], options: &ConvertOptions) -> ConvertResult {
    let records = parse_stage(lines, worker_count(options, lines.len()));

    let rules = address_book_rules();
    let mut csv = String::new();
    csv.push_str(&header_line());
    csv.push('\n');

    let mut parse_failures = 0;
    for record in &records {
        if record.payload == PayloadOutcome::Invalid {
            parse_failures += 1;
        }
        write_row(&mut csv, record, rules);
    }

    if parse_failures > 0 {
        warn!(
            parse_failures,
            total = records.len(),
            "some payloads were not valid JSON; affected rows written with empty attribute cells"
        );
    }
    debug!(rows = records.len(), "conversion finished");

    ConvertResult {
        csv,
        rows: records.len(),
        parse_failures,
        encoding: "utf-8".to_string(),
    }
}

fn worker_count(options: &ConvertOptions, line_count: usize) -> usize {
    let hw = options.threads.unwrap_or_else(|| {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    });
    hw.clamp(1, line_count.max(1))
}

/// Parse all lines into records, in parallel over disjoint index ranges.
///
/// Each worker owns one contiguous chunk of the results vector; the slot
/// index is fixed up front so output order is input order by construction.
fn parse_stage(lines: &[&str], workers: usize) -> Vec<Record> {
    if lines.is_empty() {
        return Vec::new();
    }

    let mut records: Vec<Record> = (0..lines.len()).map(Record::blank).collect();

    if workers <= 1 {
        for (slot, line) in records.iter_mut().zip(lines) {
            *slot = parse_line(slot.index, line);
        }
        return records;
    }

    let chunk = lines.len().div_ceil(workers);
    debug!(lines = lines.len(), workers, chunk, "parse stage");

    std::thread::scope(|scope| {
        for (slots, chunk_lines) in records.chunks_mut(chunk).zip(lines.chunks(chunk)) {
            scope.spawn(move || {
                for (slot, line) in slots.iter_mut().zip(chunk_lines) {
                    *slot = parse_line(slot.index, line);
                }
            });
        }
    });

    records
}

/// Map, transliterate, encode and append one output row.
fn write_row(out: &mut String, record: &Record, rules: &[ColumnRule]) {
    let expand_germanic = record
        .get(COUNTRY_ATTRIBUTE)
        .map(is_germanic)
        .unwrap_or(false);

    let cells = map_row(record, rules);
    for (i, cell) in cells.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        if let Some(value) = cell {
            let normalized = normalize(value, expand_germanic);
            out.push_str(&encode_field(&normalized));
        }
    }
    out.push('\n');
}
