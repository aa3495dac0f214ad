//! Street map loader for the block text format.
//!
//! # Format
//!
//! One block per street, repeated until end of input.  Blank lines between
//! blocks are ignored.
//!
//! ```text
//! 10th Helena Drive
//! 1
//! 34.0547000 -118.4794734 34.0544590 -118.4801137
//! 12th Street
//! 2
//! 34.0198855 -118.4876744 34.0215000 -118.4856000
//! 34.0215000 -118.4856000 34.0231900 -118.4833700
//! ```
//!
//! Each segment line holds start latitude, start longitude, end latitude and
//! end longitude separated by whitespace.  Coordinate text is kept verbatim,
//! so the same point must be spelled the same way wherever it appears.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::info;

use courier_core::{Coordinate, StreetSegment, TableConfig};

use crate::{MapError, MapResult, StreetGraphIndex};

// ── Public entry points ───────────────────────────────────────────────────────

/// Load a street map file into a fresh [`StreetGraphIndex`].
///
/// # Errors
///
/// [`MapError::Io`] if the file cannot be read, [`MapError::Parse`] on
/// malformed content.
pub fn load_map(path: &Path) -> MapResult<StreetGraphIndex> {
    let file = File::open(path)?;
    load_map_reader(BufReader::new(file))
}

/// Like [`load_map`] but accepts any `BufRead` source.
///
/// Useful for testing (pass a `std::io::Cursor`).
pub fn load_map_reader<R: BufRead>(reader: R) -> MapResult<StreetGraphIndex> {
    load_map_with_config(reader, TableConfig::default())
}

/// Like [`load_map_reader`] but sizes the index's bucket table from `config`.
///
/// # Errors
///
/// [`MapError::Core`] if `config` is invalid, otherwise as [`load_map`].
pub fn load_map_with_config<R: BufRead>(reader: R, config: TableConfig) -> MapResult<StreetGraphIndex> {
    let mut index = StreetGraphIndex::with_config(config)?;
    let mut lines = NumberedLines::new(reader);
    let mut streets = 0usize;

    while let Some((line_no, line)) = lines.next_non_blank()? {
        let name = line.trim().to_owned();

        let (count_line_no, count_line) = lines
            .next_non_blank()?
            .ok_or_else(|| parse_error(line_no, format!("street {name:?} has no segment count")))?;
        let count: usize = count_line.trim().parse().map_err(|_| {
            parse_error(count_line_no, format!("bad segment count {:?}", count_line.trim()))
        })?;

        for remaining in (1..=count).rev() {
            let (seg_line_no, seg_line) = lines.next_line()?.ok_or_else(|| {
                parse_error(
                    count_line_no,
                    format!("street {name:?} ends {remaining} segment(s) early"),
                )
            })?;
            index.add_segment(parse_segment(seg_line_no, &seg_line, &name)?);
        }
        streets += 1;
    }

    info!(
        streets,
        segments = index.segment_count() / 2,
        coordinates = index.coordinate_count(),
        resizes = index.resize_count(),
        "street map loaded"
    );
    Ok(index)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn parse_segment(line_no: usize, line: &str, name: &str) -> MapResult<StreetSegment> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let [start_lat, start_lon, end_lat, end_lon] = fields[..] else {
        return Err(parse_error(
            line_no,
            format!("expected 4 coordinate fields, found {}", fields.len()),
        ));
    };

    let start = Coordinate::new(start_lat, start_lon).map_err(|e| parse_error(line_no, e.to_string()))?;
    let end = Coordinate::new(end_lat, end_lon).map_err(|e| parse_error(line_no, e.to_string()))?;
    Ok(StreetSegment::new(start, end, name))
}

fn parse_error(line: usize, message: String) -> MapError {
    MapError::Parse { line, message }
}

/// Line reader that tracks 1-based line numbers for error messages.
struct NumberedLines<R> {
    lines:   std::io::Lines<R>,
    line_no: usize,
}

impl<R: BufRead> NumberedLines<R> {
    fn new(reader: R) -> Self {
        Self { lines: reader.lines(), line_no: 0 }
    }

    fn next_line(&mut self) -> MapResult<Option<(usize, String)>> {
        match self.lines.next() {
            None => Ok(None),
            Some(line) => {
                self.line_no += 1;
                Ok(Some((self.line_no, line?)))
            }
        }
    }

    fn next_non_blank(&mut self) -> MapResult<Option<(usize, String)>> {
        while let Some((no, line)) = self.next_line()? {
            if !line.trim().is_empty() {
                return Ok(Some((no, line)));
            }
        }
        Ok(None)
    }
}
