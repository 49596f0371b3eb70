//! Parsers for rating record files.
//!
//! Supported layouts:
//! - JSON array: `[{"actor_id": "a", "item_id": "x", "rating": 4.0}, ...]`
//! - JSON lines: one such object per line
//! - Delimited text: `actor::item::rating` per line
//!
//! Every parsed record is validated before it is returned, so malformed
//! input is rejected here instead of reaching the recommendation core.

use crate::error::{DataLoadError, Result};
use crate::index::validate_records;
use crate::types::*;
use std::fs;
use std::path::Path;

/// On-disk layout of a record file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFormat {
    JsonArray,
    JsonLines,
    Delimited,
}

/// Load and validate every record in `path`
pub fn load_records(path: &Path, format: RecordFormat) -> Result<Vec<RatingRecord>> {
    match format {
        RecordFormat::JsonArray => parse_json_records(path),
        RecordFormat::JsonLines => parse_json_lines(path),
        RecordFormat::Delimited => parse_delimited(path),
    }
}

pub(crate) fn read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => DataLoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DataLoadError::IoError(e),
    })
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Parse a JSON array of rating records
pub fn parse_json_records(path: &Path) -> Result<Vec<RatingRecord>> {
    let content = read_to_string(path)?;
    let records: Vec<RatingRecord> = serde_json::from_str(&content)?;
    validate_records(&records)?;
    Ok(records)
}

/// Parse one JSON rating record per line, skipping blank lines
pub fn parse_json_lines(path: &Path) -> Result<Vec<RatingRecord>> {
    let content = read_to_string(path)?;
    let file = file_name(path);
    let mut records = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        let line_trimmed = line.trim();
        if line_trimmed.is_empty() {
            continue;
        }
        let record: RatingRecord =
            serde_json::from_str(line_trimmed).map_err(|e| DataLoadError::ParseError {
                file: file.clone(),
                line: idx + 1,
                reason: e.to_string(),
            })?;
        records.push(record);
    }

    validate_records(&records)?;
    Ok(records)
}

/// Parse `actor::item::rating` lines
pub fn parse_delimited(path: &Path) -> Result<Vec<RatingRecord>> {
    let content = read_to_string(path)?;
    let file = file_name(path);
    let mut records = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;
        let line_trimmed = line.trim();
        if line_trimmed.is_empty() {
            continue;
        }
        records.push(parse_delimited_line(line_trimmed, &file, line_no)?);
    }

    validate_records(&records)?;
    Ok(records)
}

fn parse_delimited_line(line: &str, file: &str, line_no: usize) -> Result<RatingRecord> {
    let missing = |field: &str| DataLoadError::ParseError {
        file: file.to_string(),
        line: line_no,
        reason: format!("Missing {}", field),
    };

    let mut parts = line.split("::");
    let actor_id = parts.next().ok_or_else(|| missing("actor_id"))?;
    let item_id = parts.next().ok_or_else(|| missing("item_id"))?;
    let rating = parts.next().ok_or_else(|| missing("rating"))?;

    if parts.next().is_some() {
        return Err(DataLoadError::ParseError {
            file: file.to_string(),
            line: line_no,
            reason: "Too many fields".to_string(),
        });
    }

    Ok(RatingRecord {
        actor_id: actor_id.trim().to_string(),
        item_id: item_id.trim().to_string(),
        rating: rating.trim().parse().map_err(|e| DataLoadError::ParseError {
            file: file.to_string(),
            line: line_no,
            reason: format!("Invalid rating: {}", e),
        })?,
    })
}
