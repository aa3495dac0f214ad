//! Street graph index.
//!
//! # Data layout
//!
//! One [`KeyedBucketTable`] maps each coordinate to the segments that
//! **start** there, in insertion order:
//!
//! ```text
//! (34.05, -118.25) → [ Main St: A→B, Elm St: A→D ]
//! (34.06, -118.25) → [ Main St: B→A, Main St: B→C ]
//! ```
//!
//! Every physical segment is stored twice, forward under its start and
//! reversed under its end, so the directed index describes an undirected
//! road graph.  Repeated segments are kept as given; nothing is
//! deduplicated.

use courier_core::{Coordinate, KeyedBucketTable, StreetSegment, TableConfig};

use crate::MapResult;

/// Coordinate → outgoing-segment index over a street map.
///
/// Built serially with [`add_segment`](Self::add_segment) and then only
/// read.
///
/// # Example
///
/// ```
/// use courier_core::Coordinate;
/// use courier_map::StreetGraphIndex;
///
/// let a: Coordinate = "34.0500 -118.2500".parse().unwrap();
/// let b: Coordinate = "34.0510 -118.2500".parse().unwrap();
///
/// let mut index = StreetGraphIndex::new();
/// index.add_street("Main St", a.clone(), b.clone());
///
/// assert_eq!(index.segments_from(&a).unwrap().len(), 1);
/// assert_eq!(index.segments_from(&b).unwrap()[0].end(), &a);
/// assert_eq!(index.segment_count(), 2); // both directions
/// ```
#[derive(Debug)]
pub struct StreetGraphIndex {
    adjacency: KeyedBucketTable<Coordinate, Vec<StreetSegment>>,
    segments:  usize,
}

impl StreetGraphIndex {
    pub fn new() -> Self {
        Self { adjacency: KeyedBucketTable::new(), segments: 0 }
    }

    /// Empty index whose coordinate table uses `config`.
    pub fn with_config(config: TableConfig) -> MapResult<Self> {
        Ok(Self {
            adjacency: KeyedBucketTable::with_config(config)?,
            segments:  0,
        })
    }

    /// Register `segment` under its start and its reverse under its end.
    pub fn add_segment(&mut self, segment: StreetSegment) {
        let reverse = segment.reversed();
        self.push(segment);
        self.push(reverse);
    }

    /// Convenience: build the segment from its parts and add it.
    pub fn add_street(&mut self, name: &str, start: Coordinate, end: Coordinate) {
        self.add_segment(StreetSegment::new(start, end, name));
    }

    fn push(&mut self, segment: StreetSegment) {
        self.adjacency
            .get_or_insert_with(segment.start().clone(), Vec::new)
            .push(segment);
        self.segments += 1;
    }

    /// All segments starting exactly at `at`, in insertion order.
    ///
    /// `None` means `at` is not on the map at all.  A coordinate that is on
    /// the map always has at least one outgoing segment.
    #[inline]
    pub fn segments_from(&self, at: &Coordinate) -> Option<&[StreetSegment]> {
        self.adjacency.find(at).map(Vec::as_slice)
    }

    #[inline]
    pub fn contains(&self, at: &Coordinate) -> bool {
        self.adjacency.contains_key(at)
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    /// Distinct coordinates that start at least one segment.
    pub fn coordinate_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Directed segments stored (twice the physical segments added).
    pub fn segment_count(&self) -> usize {
        self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    pub fn bucket_count(&self) -> usize {
        self.adjacency.bucket_count()
    }

    pub fn resize_count(&self) -> usize {
        self.adjacency.resize_count()
    }

    /// Every coordinate on the map, in table order.
    pub fn coordinates(&self) -> impl Iterator<Item = &Coordinate> + '_ {
        self.adjacency.iter().map(|(c, _)| c)
    }
}

impl Default for StreetGraphIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl Extend<StreetSegment> for StreetGraphIndex {
    fn extend<I: IntoIterator<Item = StreetSegment>>(&mut self, iter: I) {
        for segment in iter {
            self.add_segment(segment);
        }
    }
}

impl FromIterator<StreetSegment> for StreetGraphIndex {
    fn from_iter<I: IntoIterator<Item = StreetSegment>>(iter: I) -> Self {
        let mut index = StreetGraphIndex::new();
        index.extend(iter);
        index
    }
}
