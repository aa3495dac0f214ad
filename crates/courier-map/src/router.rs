//! Routing trait and the default greedy-ordered breadth-first search.
//!
//! # Pluggability
//!
//! `courier-plan` calls routing through the [`Router`] trait, so planners can
//! run against a stub router in tests or a different search later.
//!
//! # Search order
//!
//! [`RouteSearch`] walks the map breadth-first from the start coordinate.
//! Before a coordinate's outgoing segments are enqueued they are sorted by
//! the great-circle distance from each segment's end to the destination,
//! nearest first.  Every edge is still enqueued; the sort only biases which
//! neighbours are discovered first.  The result is *a* connecting route, not
//! necessarily the shortest one.

use std::collections::VecDeque;

use tracing::debug;

use courier_core::{BucketSet, Coordinate, KeyedBucketTable, StreetSegment};

use crate::{MapError, MapResult, StreetGraphIndex};

// ── Route ─────────────────────────────────────────────────────────────────────

/// The result of a routing query: segments in travel order and their summed
/// length.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Segments to traverse in order, from source to destination.
    pub segments: Vec<StreetSegment>,
    /// Sum of segment lengths, miles.
    pub distance_miles: f64,
}

impl Route {
    /// `true` if the source and destination are the same coordinate.
    pub fn is_trivial(&self) -> bool {
        self.segments.is_empty()
    }

    /// First coordinate of the route, `None` for a trivial route.
    pub fn start(&self) -> Option<&Coordinate> {
        self.segments.first().map(StreetSegment::start)
    }

    /// Last coordinate of the route, `None` for a trivial route.
    pub fn end(&self) -> Option<&Coordinate> {
        self.segments.last().map(StreetSegment::end)
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable point-to-point routing engine.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync` so planners can route independent
/// legs on Rayon worker threads.
pub trait Router: Send + Sync {
    /// Compute a route from `from` to `to`.
    ///
    /// `from == to` (for a coordinate on the map) is an empty route, not an
    /// error.
    ///
    /// # Errors
    ///
    /// [`MapError::UnknownCoordinate`] if either endpoint is off the map,
    /// [`MapError::NoRoute`] if they are not connected.
    fn route(&self, from: &Coordinate, to: &Coordinate) -> MapResult<Route>;
}

// ── RouteSearch ───────────────────────────────────────────────────────────────

/// Greedy-ordered breadth-first search over a [`StreetGraphIndex`].
///
/// Holds only a shared borrow of the index; each call to
/// [`find`](Self::find) owns its own visited set and predecessor table.
#[derive(Clone, Copy, Debug)]
pub struct RouteSearch<'a> {
    index: &'a StreetGraphIndex,
}

impl<'a> RouteSearch<'a> {
    pub fn new(index: &'a StreetGraphIndex) -> Self {
        Self { index }
    }

    pub fn index(&self) -> &'a StreetGraphIndex {
        self.index
    }

    /// Find a route from `start` to `end`.
    ///
    /// A query with no route explores the whole connected component of
    /// `start` before giving up.
    pub fn find(&self, start: &Coordinate, end: &Coordinate) -> MapResult<Route> {
        for endpoint in [start, end] {
            if !self.index.contains(endpoint) {
                debug!(%endpoint, "route endpoint not on map");
                return Err(MapError::UnknownCoordinate(endpoint.clone()));
            }
        }

        let mut frontier: VecDeque<Coordinate> = VecDeque::new();
        let mut visited: BucketSet<Coordinate> = BucketSet::new();
        // predecessor[c] = coordinate that c was first reached from.
        let mut predecessor: KeyedBucketTable<Coordinate, Coordinate> = KeyedBucketTable::new();

        frontier.push_back(start.clone());
        visited.insert(start.clone());

        let mut expanded = 0usize;
        while let Some(current) = frontier.pop_front() {
            if &current == end {
                let route = self.reconstruct(start, end, &predecessor)?;
                debug!(
                    %start,
                    %end,
                    expanded,
                    segments = route.segments.len(),
                    miles = route.distance_miles,
                    "route found"
                );
                return Ok(route);
            }
            expanded += 1;

            let Some(outgoing) = self.index.segments_from(&current) else {
                continue;
            };

            // Nearest-to-destination first; stable so equal distances keep
            // insertion order.
            let mut ranked: Vec<(f64, &StreetSegment)> = outgoing
                .iter()
                .map(|s| (s.end().distance_miles(end), s))
                .collect();
            ranked.sort_by(|a, b| a.0.total_cmp(&b.0));

            for (_, segment) in ranked {
                if visited.insert(segment.end().clone()) {
                    predecessor.associate(segment.end().clone(), segment.start().clone());
                    frontier.push_back(segment.end().clone());
                }
            }
        }

        debug!(%start, %end, expanded, "no route");
        Err(MapError::NoRoute { from: start.clone(), to: end.clone() })
    }

    /// Walk the predecessor chain back from `end`, recovering each traversed
    /// segment from the predecessor's outgoing list.
    ///
    /// Where parallel segments join the same two coordinates, the first one
    /// in insertion order is reported.
    fn reconstruct(
        &self,
        start: &Coordinate,
        end: &Coordinate,
        predecessor: &KeyedBucketTable<Coordinate, Coordinate>,
    ) -> MapResult<Route> {
        let broken = || MapError::NoRoute { from: start.clone(), to: end.clone() };

        let mut segments = Vec::new();
        let mut distance_miles = 0.0;
        let mut current = end;

        while current != start {
            let prev = predecessor.find(current).ok_or_else(broken)?;
            let segment = self
                .index
                .segments_from(prev)
                .and_then(|out| out.iter().find(|s| s.end() == current))
                .ok_or_else(broken)?;

            distance_miles += segment.length_miles();
            segments.push(segment.clone());
            current = prev;
        }

        segments.reverse();
        Ok(Route { segments, distance_miles })
    }
}

impl Router for RouteSearch<'_> {
    fn route(&self, from: &Coordinate, to: &Coordinate) -> MapResult<Route> {
        self.find(from, to)
    }
}
