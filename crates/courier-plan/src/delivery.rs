//! Delivery requests and the CSV delivery loader.
//!
//! # CSV format
//!
//! One row per delivery, in the order the customer listed them.
//!
//! ```csv
//! latitude,longitude,item
//! 34.0712323,-118.4505969,Chicken tenders
//! 34.0687443,-118.4449195,B-Plate salmon
//! ```
//!
//! Coordinate text is kept verbatim and must match the map's spelling of
//! the same point exactly.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use courier_core::Coordinate;

use crate::{PlanError, PlanResult};

/// One item to drop off at one map coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryRequest {
    pub item:     String,
    pub location: Coordinate,
}

impl DeliveryRequest {
    pub fn new(item: impl Into<String>, location: Coordinate) -> Self {
        Self { item: item.into(), location }
    }
}

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct DeliveryRecord {
    latitude:  String,
    longitude: String,
    item:      String,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load delivery requests from a CSV file.
pub fn load_deliveries_csv(path: &Path) -> PlanResult<Vec<DeliveryRequest>> {
    let file = std::fs::File::open(path)?;
    load_deliveries_reader(file)
}

/// Like [`load_deliveries_csv`] but accepts any `Read` source.
pub fn load_deliveries_reader<R: Read>(reader: R) -> PlanResult<Vec<DeliveryRequest>> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut requests = Vec::new();

    for (row, result) in csv_reader.deserialize::<DeliveryRecord>().enumerate() {
        let record = result.map_err(|e| PlanError::Parse(e.to_string()))?;
        let location = Coordinate::new(&record.latitude, &record.longitude)
            .map_err(|e| PlanError::Parse(format!("row {}: {e}", row + 1)))?;
        requests.push(DeliveryRequest { item: record.item, location });
    }

    Ok(requests)
}
