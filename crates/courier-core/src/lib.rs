//! `courier-core` — foundational types for the courier routing workspace.
//!
//! This crate is a dependency of every other `courier-*` crate.  It has no
//! workspace dependencies and few external ones (`rustc-hash`, `thiserror`,
//! `tracing`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`geo`]     | `Coordinate`, haversine distance in miles                 |
//! | [`segment`] | `StreetSegment`, bearings, `angle_between`                |
//! | [`table`]   | `KeyedBucketTable`, `TableConfig`                         |
//! | [`set`]     | `BucketSet`                                               |
//! | [`error`]   | `CoreError`, `CoreResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to `Coordinate` and         |
//! |         | `StreetSegment`.                                           |

pub mod error;
pub mod geo;
pub mod segment;
pub mod set;
pub mod table;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use geo::Coordinate;
pub use segment::{angle_between, StreetSegment};
pub use set::BucketSet;
pub use table::{KeyedBucketTable, TableConfig};
