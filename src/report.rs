// src/report.rs

use std::fs::File;
use std::io::Read;
use std::path::Path;

use flate2::read::MultiGzDecoder;

use crate::error::EngineError;
use crate::types::{RankCode, TaxonRecord, Totals};

/// Spaces of indentation per tree level in the name column.
pub const INDENT_UNIT: usize = 2;

/// A parsed report snapshot: the two reserved totals rows folded into
/// `Totals`, and the taxon rows in file order (depth-first pre-order,
/// starting with the root row).
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedReport {
    pub totals: Totals,
    pub records: Vec<TaxonRecord>,
}

/// Read a report file into memory. A `.gz` suffix is decompressed
/// transparently. Any I/O failure maps to `MissingFile` so the engine can
/// fall back to its placeholder result.
pub fn read_report_file<P: AsRef<Path>>(path: P) -> Result<String, EngineError> {
    let path = path.as_ref();
    let missing = |source| EngineError::MissingFile {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(missing)?;
    let is_gz = path
        .extension()
        .map(|ext| ext == "gz")
        .unwrap_or(false);

    let mut text = String::new();
    if is_gz {
        MultiGzDecoder::new(file)
            .read_to_string(&mut text)
            .map_err(missing)?;
    } else {
        let mut file = file;
        file.read_to_string(&mut text).map_err(missing)?;
    }
    Ok(text)
}

/// Parse the full report text into records plus the side-channel totals.
///
/// Expected columns per row, tab-separated:
/// percent, cumulative reads, assigned reads, rank code, tax id, name.
/// The name column carries the indentation that encodes tree depth.
/// The first two rows are the reserved "unclassified" and "root" totals,
/// identified by position; the root row also anchors the tree.
pub fn parse_report(text: &str) -> Result<ParsedReport, EngineError> {
    let mut rows: Vec<TaxonRecord> = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        rows.push(parse_row(idx + 1, line)?);
    }

    if rows.len() < 2 {
        return Err(EngineError::parse(
            rows.len(),
            "truncated report, reserved totals rows missing",
        ));
    }

    let unclassified = rows.remove(0);
    // The root row seeds the totals and stays on as the tree anchor.
    let root = &rows[0];
    let totals = Totals {
        classified_reads: root.reads_cumulative,
        unclassified_reads: unclassified.reads_cumulative,
        classified_percent: root.percent,
        unclassified_percent: unclassified.percent,
        total_reads: root.reads_cumulative + unclassified.reads_cumulative,
    };

    Ok(ParsedReport {
        totals,
        records: rows,
    })
}

fn parse_row(line_no: usize, line: &str) -> Result<TaxonRecord, EngineError> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < 6 {
        return Err(EngineError::parse(
            line_no,
            format!("expected 6 tab-separated fields, found {}", fields.len()),
        ));
    }

    // Some report flavors insert extra count columns in the middle; the
    // leading read counts and the trailing rank/id/name are fixed.
    let n = fields.len();
    let percent: f64 = fields[0]
        .trim()
        .parse()
        .map_err(|_| EngineError::parse(line_no, format!("bad percent field '{}'", fields[0])))?;
    if !(0.0..=100.0).contains(&percent) {
        return Err(EngineError::parse(
            line_no,
            format!("percent {percent} out of range"),
        ));
    }
    let reads_cumulative: u64 = fields[1].trim().parse().map_err(|_| {
        EngineError::parse(line_no, format!("bad cumulative reads field '{}'", fields[1]))
    })?;
    let reads_assigned: u64 = fields[2].trim().parse().map_err(|_| {
        EngineError::parse(line_no, format!("bad assigned reads field '{}'", fields[2]))
    })?;
    let rank = RankCode::from_code(fields[n - 3])
        .ok_or_else(|| EngineError::parse(line_no, format!("bad rank code '{}'", fields[n - 3])))?;
    let tax_id: u32 = fields[n - 2]
        .trim()
        .parse()
        .map_err(|_| EngineError::parse(line_no, format!("bad tax id field '{}'", fields[n - 2])))?;

    let name_field = fields[n - 1];
    let indent = name_field.len() - name_field.trim_start_matches(' ').len();
    let name = name_field.trim().to_string();
    if name.is_empty() {
        return Err(EngineError::parse(line_no, "empty taxon name"));
    }

    Ok(TaxonRecord {
        rank,
        tax_id,
        name,
        depth: indent / INDENT_UNIT,
        reads_cumulative,
        reads_assigned,
        percent,
    })
}
