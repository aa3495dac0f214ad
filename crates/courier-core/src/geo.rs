//! Geographic coordinate type and great-circle distance.
//!
//! A `Coordinate` keeps its latitude and longitude as the **exact text** they
//! were read from.  Equality and hashing compare that text, so the same map
//! point appearing as the endpoint of many segments always resolves to the
//! same table key.  The parsed `f64` values ride along for geometry only.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::Arc;

use crate::{CoreError, CoreResult};

/// Mean Earth radius, kilometres.
const EARTH_RADIUS_KM: f64 = 6_371.0;
const KM_PER_MILE:     f64 = 1.609_344;

/// A WGS-84 coordinate whose identity is its decimal text.
///
/// Cloning is cheap: both text fields are reference-counted.
#[derive(Clone)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "CoordinateText", into = "CoordinateText")
)]
pub struct Coordinate {
    latitude_text:  Arc<str>,
    longitude_text: Arc<str>,
    latitude:       f64,
    longitude:      f64,
}

impl Coordinate {
    /// Build a coordinate from its latitude and longitude text.
    ///
    /// Surrounding whitespace is trimmed; everything else is kept verbatim.
    ///
    /// # Errors
    ///
    /// [`CoreError::Parse`] if either field is not a number or lies outside
    /// `[-90, 90]` / `[-180, 180]`.
    pub fn new(latitude: &str, longitude: &str) -> CoreResult<Self> {
        let latitude_text = latitude.trim();
        let longitude_text = longitude.trim();

        let fail = |reason: String| CoreError::Parse {
            latitude:  latitude_text.to_owned(),
            longitude: longitude_text.to_owned(),
            reason,
        };

        let lat: f64 = latitude_text
            .parse()
            .map_err(|e| fail(format!("latitude: {e}")))?;
        let lon: f64 = longitude_text
            .parse()
            .map_err(|e| fail(format!("longitude: {e}")))?;

        if !(-90.0..=90.0).contains(&lat) {
            return Err(fail(format!("latitude {lat} out of range")));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(fail(format!("longitude {lon} out of range")));
        }

        Ok(Self {
            latitude_text:  Arc::from(latitude_text),
            longitude_text: Arc::from(longitude_text),
            latitude:       lat,
            longitude:      lon,
        })
    }

    #[inline]
    pub fn latitude_text(&self) -> &str {
        &self.latitude_text
    }

    #[inline]
    pub fn longitude_text(&self) -> &str {
        &self.longitude_text
    }

    #[inline]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    #[inline]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Haversine great-circle distance in miles.
    pub fn distance_miles(&self, other: &Coordinate) -> f64 {
        let d_lat = (other.latitude - self.latitude).to_radians();
        let d_lon = (other.longitude - self.longitude).to_radians();

        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);

        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_KM * c / KM_PER_MILE
    }
}

impl PartialEq for Coordinate {
    fn eq(&self, other: &Self) -> bool {
        self.latitude_text == other.latitude_text && self.longitude_text == other.longitude_text
    }
}

impl Eq for Coordinate {}

impl Hash for Coordinate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.latitude_text.hash(state);
        self.longitude_text.hash(state);
    }
}

/// Parses `"lat lon"` or `"lat,lon"`.
impl FromStr for Coordinate {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut fields = s
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|f| !f.is_empty());

        match (fields.next(), fields.next(), fields.next()) {
            (Some(lat), Some(lon), None) => Coordinate::new(lat, lon),
            _ => Err(CoreError::Parse {
                latitude:  s.trim().to_owned(),
                longitude: String::new(),
                reason:    "expected exactly two fields".to_owned(),
            }),
        }
    }
}

impl fmt::Debug for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Coordinate({}, {})", self.latitude_text, self.longitude_text)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.latitude_text, self.longitude_text)
    }
}

// ── serde shape ───────────────────────────────────────────────────────────────

/// Wire form of a [`Coordinate`]: the two text fields only.
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct CoordinateText {
    latitude:  String,
    longitude: String,
}

#[cfg(feature = "serde")]
impl TryFrom<CoordinateText> for Coordinate {
    type Error = CoreError;

    fn try_from(raw: CoordinateText) -> Result<Self, Self::Error> {
        Coordinate::new(&raw.latitude, &raw.longitude)
    }
}

#[cfg(feature = "serde")]
impl From<Coordinate> for CoordinateText {
    fn from(c: Coordinate) -> Self {
        Self {
            latitude:  c.latitude_text.to_string(),
            longitude: c.longitude_text.to_string(),
        }
    }
}
