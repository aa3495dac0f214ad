//! Driver-facing delivery commands.

use std::fmt;

use crate::{CompassDirection, TurnSide};

/// One instruction in a delivery plan.
#[derive(Debug, Clone, PartialEq)]
pub enum DeliveryCommand {
    /// Drive along one street, possibly over several consecutive segments.
    Proceed {
        direction:      CompassDirection,
        street:         String,
        distance_miles: f64,
    },
    /// Turn onto a different street.
    Turn { side: TurnSide, street: String },
    /// Hand over the item at the current location.
    Deliver { item: String },
}

impl DeliveryCommand {
    /// Miles covered by this command (zero for turns and deliveries).
    pub fn distance_miles(&self) -> f64 {
        match self {
            DeliveryCommand::Proceed { distance_miles, .. } => *distance_miles,
            DeliveryCommand::Turn { .. } | DeliveryCommand::Deliver { .. } => 0.0,
        }
    }
}

impl fmt::Display for DeliveryCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryCommand::Proceed { direction, street, distance_miles } => {
                write!(f, "Proceed {direction} on {street} for {distance_miles:.2} miles")
            }
            DeliveryCommand::Turn { side, street } => write!(f, "Turn {side} on {street}"),
            DeliveryCommand::Deliver { item } => write!(f, "Deliver {item}"),
        }
    }
}
