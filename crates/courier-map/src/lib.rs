//! `courier-map` — street graph index, route search, and map loading.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                   |
//! |------------|------------------------------------------------------------|
//! | [`index`]  | `StreetGraphIndex` (coordinate → outgoing segments)       |
//! | [`router`] | `Router` trait, `Route`, `RouteSearch`                     |
//! | [`loader`] | `load_map`, `load_map_reader`, `load_map_with_config`     |
//! | [`error`]  | `MapError`, `MapResult<T>`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on core types.             |
//!
//! # Threading
//!
//! A built [`StreetGraphIndex`] is never mutated by searches, so any number
//! of [`RouteSearch`] queries may share one `&StreetGraphIndex` across
//! threads.

pub mod error;
pub mod index;
pub mod loader;
pub mod router;


pub use error::{MapError, MapResult};
pub use index::StreetGraphIndex;
pub use loader::{load_map, load_map_reader, load_map_with_config};
pub use router::{Route, RouteSearch, Router};
