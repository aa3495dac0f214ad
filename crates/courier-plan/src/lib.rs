//! `courier-plan` — turn a depot and a list of deliveries into driving
//! commands.
//!
//! # Pipeline
//!
//! ```text
//! deliveries ─▶ optimize_delivery_order ─▶ Router (one call per leg)
//!            ─▶ DirectionClassifier      ─▶ Vec<DeliveryCommand>
//! ```
//!
//! Legs are depot → first stop, stop → next stop, last stop → depot.  Any
//! leg that fails to route fails the whole plan.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Routes the legs of a plan on Rayon's thread pool.      |

pub mod command;
pub mod delivery;
pub mod directions;
pub mod error;
pub mod optimizer;
pub mod planner;

#[cfg(test)]
mod tests;

pub use command::DeliveryCommand;
pub use delivery::{load_deliveries_csv, load_deliveries_reader, DeliveryRequest};
pub use directions::{CompassDirection, DirectionClassifier, TurnSide};
pub use error::{PlanError, PlanResult};
pub use optimizer::{crow_distance, optimize_delivery_order, OrderSummary};
pub use planner::{DeliveryPlan, DeliveryPlanner, PlannerConfig};
