//! Directed street segments.
//!
//! Raw map data describes one physical segment per record; the index stores
//! it twice, once per direction, via [`StreetSegment::reversed`].

use std::fmt;
use std::sync::Arc;

use crate::Coordinate;

/// A directed edge from `start` to `end` along the named street.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StreetSegment {
    start: Coordinate,
    end:   Coordinate,
    name:  Arc<str>,
}

impl StreetSegment {
    pub fn new(start: Coordinate, end: Coordinate, name: impl Into<Arc<str>>) -> Self {
        Self { start, end, name: name.into() }
    }

    #[inline]
    pub fn start(&self) -> &Coordinate {
        &self.start
    }

    #[inline]
    pub fn end(&self) -> &Coordinate {
        &self.end
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The same street travelled the other way.
    pub fn reversed(&self) -> StreetSegment {
        StreetSegment {
            start: self.end.clone(),
            end:   self.start.clone(),
            name:  Arc::clone(&self.name),
        }
    }

    /// Great-circle length of the segment in miles.
    #[inline]
    pub fn length_miles(&self) -> f64 {
        self.start.distance_miles(&self.end)
    }

    /// Direction of travel in degrees, counter-clockwise from east, in
    /// `[0, 360)`.
    ///
    /// Computed in flat lat/lon space, which is what the compass classifier
    /// expects; it is not a true geodesic bearing.
    pub fn bearing_deg(&self) -> f64 {
        let d_lat = self.end.latitude() - self.start.latitude();
        let d_lon = self.end.longitude() - self.start.longitude();
        normalize_deg(d_lat.atan2(d_lon).to_degrees())
    }
}

impl fmt::Display for StreetSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} -> {}", self.name, self.start, self.end)
    }
}

/// Angle turned when leaving `from` onto `to`, in `[0, 360)`.
///
/// Small values are gentle left turns, values just under 360 gentle rights.
pub fn angle_between(from: &StreetSegment, to: &StreetSegment) -> f64 {
    normalize_deg(to.bearing_deg() - from.bearing_deg())
}

#[inline]
fn normalize_deg(deg: f64) -> f64 {
    let d = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs.
    if d >= 360.0 { 0.0 } else { d }
}
