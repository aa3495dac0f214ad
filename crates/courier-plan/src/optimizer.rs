//! Delivery-order heuristic.
//!
//! Pure straight-line geometry: no map lookups.  Starting at the depot, the
//! next stop is always the nearest remaining delivery (successive nearest
//! neighbour).  Greedy, so it can occasionally lengthen a tour.

use courier_core::Coordinate;

use crate::DeliveryRequest;

/// Crow-flies tour lengths before and after reordering.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct OrderSummary {
    pub old_crow_miles: f64,
    pub new_crow_miles: f64,
}

/// Straight-line miles of depot → each delivery in order → depot.
///
/// Zero when there are no deliveries.
pub fn crow_distance(depot: &Coordinate, deliveries: &[DeliveryRequest]) -> f64 {
    let (Some(first), Some(last)) = (deliveries.first(), deliveries.last()) else {
        return 0.0;
    };

    let between: f64 = deliveries
        .windows(2)
        .map(|pair| pair[0].location.distance_miles(&pair[1].location))
        .sum();

    depot.distance_miles(&first.location) + between + last.location.distance_miles(depot)
}

/// Reorder `deliveries` in place by successive nearest neighbour from
/// `depot`.
///
/// Ties keep the request that came first.
pub fn optimize_delivery_order(depot: &Coordinate, deliveries: &mut [DeliveryRequest]) -> OrderSummary {
    let old_crow_miles = crow_distance(depot, deliveries);

    let mut here = depot.clone();
    for i in 0..deliveries.len() {
        let nearest = deliveries[i..]
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                here.distance_miles(&a.location).total_cmp(&here.distance_miles(&b.location))
            })
            .map_or(0, |(offset, _)| offset);

        // Remaining stops keep their relative order.
        deliveries[i..=i + nearest].rotate_right(1);
        here = deliveries[i].location.clone();
    }

    OrderSummary {
        old_crow_miles,
        new_crow_miles: crow_distance(depot, deliveries),
    }
}
