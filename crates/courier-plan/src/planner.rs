//! Multi-leg delivery planner.

use tracing::{info, warn};

use courier_core::{Coordinate, StreetSegment};
use courier_map::{Route, Router};

use crate::{
    optimize_delivery_order, DeliveryCommand, DeliveryRequest, DirectionClassifier, OrderSummary,
    PlanError, PlanResult,
};

// ── Configuration ─────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlannerConfig {
    /// Reorder deliveries by nearest neighbour before routing.
    pub optimize_order: bool,
    /// Turns within this many degrees of straight ahead produce no `Turn`.
    pub straight_tolerance_deg: f64,
}

impl PlannerConfig {
    pub fn validate(&self) -> PlanResult<()> {
        DirectionClassifier::new(self.straight_tolerance_deg).map(|_| ())
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            optimize_order:         true,
            straight_tolerance_deg: DirectionClassifier::DEFAULT_STRAIGHT_TOLERANCE_DEG,
        }
    }
}

// ── DeliveryPlan ──────────────────────────────────────────────────────────────

/// Everything a driver needs for one round trip from the depot.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryPlan {
    pub commands:       Vec<DeliveryCommand>,
    /// Road miles over all legs, depot back to depot.
    pub distance_miles: f64,
    /// Deliveries in the order they are made.
    pub order:          Vec<DeliveryRequest>,
    /// Crow-flies comparison, present when the order was optimized.
    pub summary:        Option<OrderSummary>,
}

impl DeliveryPlan {
    fn empty() -> Self {
        Self { commands: Vec::new(), distance_miles: 0.0, order: Vec::new(), summary: None }
    }
}

// ── DeliveryPlanner ───────────────────────────────────────────────────────────

/// Plans a round trip through any [`Router`].
///
/// # Example
///
/// ```rust,ignore
/// let index = courier_map::load_map(Path::new("mapdata.txt"))?;
/// let planner = DeliveryPlanner::new(RouteSearch::new(&index));
/// let plan = planner.plan(&depot, &deliveries)?;
/// for command in &plan.commands {
///     println!("{command}");
/// }
/// ```
pub struct DeliveryPlanner<R: Router> {
    router:     R,
    config:     PlannerConfig,
    classifier: DirectionClassifier,
}

impl<R: Router> DeliveryPlanner<R> {
    pub fn new(router: R) -> Self {
        Self {
            router,
            config:     PlannerConfig::default(),
            classifier: DirectionClassifier::default(),
        }
    }

    pub fn with_config(router: R, config: PlannerConfig) -> PlanResult<Self> {
        let classifier = DirectionClassifier::new(config.straight_tolerance_deg)?;
        Ok(Self { router, config, classifier })
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn router(&self) -> &R {
        &self.router
    }

    /// Plan depot → every delivery → depot.
    ///
    /// # Errors
    ///
    /// [`PlanError::Route`] as soon as any leg cannot be routed; no partial
    /// plan is returned.
    pub fn plan(&self, depot: &Coordinate, deliveries: &[DeliveryRequest]) -> PlanResult<DeliveryPlan> {
        if deliveries.is_empty() {
            return Ok(DeliveryPlan::empty());
        }

        let mut order = deliveries.to_vec();
        let summary = self
            .config
            .optimize_order
            .then(|| optimize_delivery_order(depot, &mut order));

        let mut stops: Vec<&Coordinate> = Vec::with_capacity(order.len() + 2);
        stops.push(depot);
        stops.extend(order.iter().map(|d| &d.location));
        stops.push(depot);

        let legs: Vec<(&Coordinate, &Coordinate)> = stops.windows(2).map(|w| (w[0], w[1])).collect();
        let routes = self.route_legs(&legs)?;

        let mut commands = Vec::new();
        let mut distance_miles = 0.0;
        for (i, route) in routes.iter().enumerate() {
            distance_miles += route.distance_miles;
            self.append_leg_commands(route, &mut commands);
            // Every leg but the last ends at order[i].
            if let Some(delivery) = order.get(i) {
                commands.push(DeliveryCommand::Deliver { item: delivery.item.clone() });
            }
        }

        info!(
            legs = routes.len(),
            commands = commands.len(),
            miles = distance_miles,
            "delivery plan ready"
        );
        Ok(DeliveryPlan { commands, distance_miles, order, summary })
    }

    fn route_legs(&self, legs: &[(&Coordinate, &Coordinate)]) -> PlanResult<Vec<Route>> {
        #[cfg(not(feature = "parallel"))]
        {
            legs.iter().map(|&(from, to)| self.route_leg(from, to)).collect()
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            legs.par_iter().map(|&(from, to)| self.route_leg(from, to)).collect()
        }
    }

    fn route_leg(&self, from: &Coordinate, to: &Coordinate) -> PlanResult<Route> {
        self.router.route(from, to).map_err(|e| {
            warn!(%from, %to, error = %e, "delivery leg could not be routed");
            PlanError::Route(e)
        })
    }

    /// One `Proceed` per run of same-named segments, with a `Turn` between
    /// runs unless the streets continue straight on.
    fn append_leg_commands(&self, route: &Route, out: &mut Vec<DeliveryCommand>) {
        let mut previous: Option<&StreetSegment> = None;

        for run in route.segments.chunk_by(|a, b| a.name() == b.name()) {
            let (Some(first), Some(last)) = (run.first(), run.last()) else { continue };

            if let Some(side) = previous.and_then(|prev| self.classifier.turn(prev, first)) {
                out.push(DeliveryCommand::Turn { side, street: first.name().to_owned() });
            }

            out.push(DeliveryCommand::Proceed {
                direction:      self.classifier.heading(first),
                street:         first.name().to_owned(),
                distance_miles: run.iter().map(StreetSegment::length_miles).sum(),
            });
            previous = Some(last);
        }
    }
}
