//! Compass headings and turn classification.
//!
//! Bearings come from [`StreetSegment::bearing_deg`]: degrees
//! counter-clockwise from east in `[0, 360)`.
//!
//! | Bearing          | Heading   |
//! |------------------|-----------|
//! | `[0, 22.5)`      | east      |
//! | `[22.5, 67.5)`   | northeast |
//! | `[67.5, 112.5)`  | north     |
//! | `[112.5, 157.5)` | northwest |
//! | `[157.5, 202.5)` | west      |
//! | `[202.5, 247.5)` | southwest |
//! | `[247.5, 292.5)` | south     |
//! | `[292.5, 337.5)` | southeast |
//! | `[337.5, 360)`   | east      |

use std::fmt;

use courier_core::{angle_between, StreetSegment};

use crate::{PlanError, PlanResult};

/// One of the eight compass points.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CompassDirection {
    East,
    Northeast,
    North,
    Northwest,
    West,
    Southwest,
    South,
    Southeast,
}

impl CompassDirection {
    /// Sector containing `bearing_deg` (degrees counter-clockwise from east).
    pub fn from_bearing(bearing_deg: f64) -> Self {
        const SECTORS: [CompassDirection; 8] = [
            CompassDirection::East,
            CompassDirection::Northeast,
            CompassDirection::North,
            CompassDirection::Northwest,
            CompassDirection::West,
            CompassDirection::Southwest,
            CompassDirection::South,
            CompassDirection::Southeast,
        ];
        let shifted = (bearing_deg + 22.5).rem_euclid(360.0);
        SECTORS[((shifted / 45.0) as usize) % 8]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CompassDirection::East      => "east",
            CompassDirection::Northeast => "northeast",
            CompassDirection::North     => "north",
            CompassDirection::Northwest => "northwest",
            CompassDirection::West      => "west",
            CompassDirection::Southwest => "southwest",
            CompassDirection::South     => "south",
            CompassDirection::Southeast => "southeast",
        }
    }
}

impl fmt::Display for CompassDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TurnSide {
    Left,
    Right,
}

impl fmt::Display for TurnSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TurnSide::Left  => "left",
            TurnSide::Right => "right",
        })
    }
}

/// Classifies segment headings and the turns between consecutive segments.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DirectionClassifier {
    /// Turns within this many degrees of straight ahead are not turns.
    straight_tolerance_deg: f64,
}

impl DirectionClassifier {
    pub const DEFAULT_STRAIGHT_TOLERANCE_DEG: f64 = 1.0;

    /// # Errors
    ///
    /// [`PlanError::Config`] unless `straight_tolerance_deg` is in `[0, 180)`.
    pub fn new(straight_tolerance_deg: f64) -> PlanResult<Self> {
        if !(0.0..180.0).contains(&straight_tolerance_deg) {
            return Err(PlanError::Config(format!(
                "straight_tolerance_deg must be in [0, 180), got {straight_tolerance_deg}"
            )));
        }
        Ok(Self { straight_tolerance_deg })
    }

    pub fn straight_tolerance_deg(&self) -> f64 {
        self.straight_tolerance_deg
    }

    /// Heading of travel along `segment`.
    pub fn heading(&self, segment: &StreetSegment) -> CompassDirection {
        CompassDirection::from_bearing(segment.bearing_deg())
    }

    /// Which way the driver turns leaving `from` onto `to`, or `None` when
    /// the two are (nearly) in line.
    pub fn turn(&self, from: &StreetSegment, to: &StreetSegment) -> Option<TurnSide> {
        let angle = angle_between(from, to);
        let tol = self.straight_tolerance_deg;
        if angle < tol || angle > 360.0 - tol {
            None
        } else if angle < 180.0 {
            Some(TurnSide::Left)
        } else {
            Some(TurnSide::Right)
        }
    }
}

impl Default for DirectionClassifier {
    fn default() -> Self {
        Self { straight_tolerance_deg: Self::DEFAULT_STRAIGHT_TOLERANCE_DEG }
    }
}
