//! Unit tests for courier-plan.

#[cfg(test)]
mod helpers {
    use courier_core::{Coordinate, StreetSegment};
    use courier_map::StreetGraphIndex;

    use crate::DeliveryRequest;

    pub fn coord(lat: &str, lon: &str) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    pub fn delivery(item: &str, lat: &str, lon: &str) -> DeliveryRequest {
        DeliveryRequest::new(item, coord(lat, lon))
    }

    /// An L-shaped town:
    ///
    /// ```text
    ///                    O1
    ///                    │ Oak Ave
    ///   D ── M1 ── M2 ───┘
    ///     Main St
    /// ```
    ///
    /// D is the depot.
    pub fn l_town() -> (StreetGraphIndex, Coordinate, Coordinate) {
        let d = coord("0.000", "0.000");
        let m1 = coord("0.000", "0.001");
        let m2 = coord("0.000", "0.002");
        let o1 = coord("0.001", "0.002");

        let mut index = StreetGraphIndex::new();
        index.add_segment(StreetSegment::new(d.clone(), m1.clone(), "Main St"));
        index.add_segment(StreetSegment::new(m1, m2.clone(), "Main St"));
        index.add_segment(StreetSegment::new(m2, o1.clone(), "Oak Ave"));
        (index, d, o1)
    }
}

// ── Directions ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod directions {
    use courier_core::StreetSegment;

    use super::helpers::coord;
    use crate::{CompassDirection, DirectionClassifier, PlanError, TurnSide};

    #[test]
    fn compass_sectors() {
        use CompassDirection::*;
        let cases = [
            (0.0, East),
            (22.4, East),
            (22.5, Northeast),
            (67.5, North),
            (112.5, Northwest),
            (157.5, West),
            (202.5, Southwest),
            (247.5, South),
            (292.5, Southeast),
            (337.4, Southeast),
            (337.5, East),
            (359.9, East),
        ];
        for (bearing, expected) in cases {
            assert_eq!(CompassDirection::from_bearing(bearing), expected, "bearing {bearing}");
        }
    }

    #[test]
    fn display_is_lowercase() {
        assert_eq!(CompassDirection::Northwest.to_string(), "northwest");
        assert_eq!(TurnSide::Right.to_string(), "right");
    }

    #[test]
    fn heading_of_segment() {
        let c = DirectionClassifier::default();
        let north = StreetSegment::new(coord("0", "0"), coord("1", "0"), "N");
        let southwest = StreetSegment::new(coord("0", "0"), coord("-1", "-1"), "SW");
        assert_eq!(c.heading(&north), CompassDirection::North);
        assert_eq!(c.heading(&southwest), CompassDirection::Southwest);
    }

    #[test]
    fn turns() {
        let c = DirectionClassifier::default();
        let east = StreetSegment::new(coord("0", "0"), coord("0", "1"), "E");
        let north = StreetSegment::new(coord("0", "1"), coord("1", "1"), "N");
        let south = StreetSegment::new(coord("0", "1"), coord("-1", "1"), "S");
        let onward = StreetSegment::new(coord("0", "1"), coord("0", "2"), "E2");

        assert_eq!(c.turn(&east, &north), Some(TurnSide::Left));
        assert_eq!(c.turn(&east, &south), Some(TurnSide::Right));
        assert_eq!(c.turn(&east, &onward), None);
    }

    #[test]
    fn slight_bend_within_tolerance_is_straight() {
        // ~0.57° to the left.
        let east = StreetSegment::new(coord("0", "0"), coord("0", "1"), "E");
        let bend = StreetSegment::new(coord("0", "1"), coord("0.01", "2"), "E");

        assert_eq!(DirectionClassifier::default().turn(&east, &bend), None);
        let strict = DirectionClassifier::new(0.1).unwrap();
        assert_eq!(strict.turn(&east, &bend), Some(TurnSide::Left));
    }

    #[test]
    fn tolerance_must_be_in_half_circle() {
        for bad in [-0.5, 180.0, 720.0, f64::NAN] {
            assert!(
                matches!(DirectionClassifier::new(bad), Err(PlanError::Config(_))),
                "accepted {bad}"
            );
        }
        assert_eq!(DirectionClassifier::new(0.0).unwrap().straight_tolerance_deg(), 0.0);
        assert_eq!(
            DirectionClassifier::new(DirectionClassifier::DEFAULT_STRAIGHT_TOLERANCE_DEG).unwrap(),
            DirectionClassifier::default()
        );
    }
}

// ── Delivery order ────────────────────────────────────────────────────────────

#[cfg(test)]
mod optimizer {
    use super::helpers::{coord, delivery};
    use crate::{crow_distance, optimize_delivery_order};

    const MILES_PER_DEGREE: f64 = 69.09;

    #[test]
    fn no_deliveries() {
        let depot = coord("0", "0");
        let summary = optimize_delivery_order(&depot, &mut []);
        assert_eq!(summary.old_crow_miles, 0.0);
        assert_eq!(summary.new_crow_miles, 0.0);
        assert_eq!(crow_distance(&depot, &[]), 0.0);
    }

    #[test]
    fn single_delivery_round_trip() {
        let depot = coord("0", "0");
        let d = [delivery("x", "1.0", "0")];
        let miles = crow_distance(&depot, &d);
        assert!((miles - 2.0 * MILES_PER_DEGREE).abs() < 0.2, "got {miles}");
    }

    #[test]
    fn nearest_neighbour_order() {
        let depot = coord("0.00", "0.00");
        let mut deliveries = vec![
            delivery("far", "0.00", "0.03"),
            delivery("near", "0.00", "0.01"),
            delivery("mid", "0.00", "0.02"),
        ];
        let summary = optimize_delivery_order(&depot, &mut deliveries);

        let items: Vec<_> = deliveries.iter().map(|d| d.item.as_str()).collect();
        assert_eq!(items, ["near", "mid", "far"]);

        // 0.03 + 0.02 + 0.01 + 0.02 degrees before, 0.01 × 3 + 0.03 after.
        assert!((summary.old_crow_miles - 0.08 * MILES_PER_DEGREE).abs() < 0.01);
        assert!((summary.new_crow_miles - 0.06 * MILES_PER_DEGREE).abs() < 0.01);
        assert!(summary.new_crow_miles < summary.old_crow_miles);
    }

    #[test]
    fn ties_keep_original_order() {
        let depot = coord("0", "0");
        let mut deliveries = vec![
            delivery("first", "0.01", "0"),
            delivery("second", "0.01", "0"),
            delivery("third", "0.01", "0"),
        ];
        optimize_delivery_order(&depot, &mut deliveries);
        let items: Vec<_> = deliveries.iter().map(|d| d.item.as_str()).collect();
        assert_eq!(items, ["first", "second", "third"]);
    }

    #[test]
    fn result_is_a_permutation() {
        let depot = coord("34.05", "-118.25");
        let original: Vec<_> = (0..20)
            .map(|i| {
                let lat = format!("{:.3}", 34.0 + ((i * 7) % 20) as f64 * 0.01);
                let lon = format!("{:.3}", -118.3 + ((i * 13) % 20) as f64 * 0.01);
                delivery(&format!("item{i}"), &lat, &lon)
            })
            .collect();

        let mut reordered = original.clone();
        optimize_delivery_order(&depot, &mut reordered);

        let mut a: Vec<_> = original.iter().map(|d| d.item.clone()).collect();
        let mut b: Vec<_> = reordered.iter().map(|d| d.item.clone()).collect();
        a.sort();
        b.sort();
        assert_eq!(a, b);
    }
}

// ── Delivery CSV ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod delivery_csv {
    use std::io::{Cursor, Write};

    use super::helpers::coord;
    use crate::{load_deliveries_csv, load_deliveries_reader, PlanError};

    const CSV: &str = "\
latitude,longitude,item
34.0712323,-118.4505969,Chicken tenders
34.0687443 , -118.4449195 , B-Plate salmon
";

    #[test]
    fn parses_rows_in_order() {
        let d = load_deliveries_reader(Cursor::new(CSV)).unwrap();
        assert_eq!(d.len(), 2);
        assert_eq!(d[0].item, "Chicken tenders");
        assert_eq!(d[0].location, coord("34.0712323", "-118.4505969"));
        // Fields are trimmed.
        assert_eq!(d[1].item, "B-Plate salmon");
        assert_eq!(d[1].location.latitude_text(), "34.0687443");
    }

    #[test]
    fn header_only_is_empty() {
        let d = load_deliveries_reader(Cursor::new("latitude,longitude,item\n")).unwrap();
        assert!(d.is_empty());
    }

    #[test]
    fn bad_coordinate() {
        let err = load_deliveries_reader(Cursor::new("latitude,longitude,item\nabc,1.0,x\n")).unwrap_err();
        assert!(matches!(err, PlanError::Parse(ref m) if m.contains("row 1")), "{err}");
    }

    #[test]
    fn missing_column() {
        let err = load_deliveries_reader(Cursor::new("latitude,longitude\n1.0,1.0\n")).unwrap_err();
        assert!(matches!(err, PlanError::Parse(_)), "{err}");
    }

    #[test]
    fn from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CSV.as_bytes()).unwrap();
        assert_eq!(load_deliveries_csv(file.path()).unwrap().len(), 2);
    }
}

// ── Planner ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod planner {
    use courier_core::{Coordinate, StreetSegment};
    use courier_map::{MapError, MapResult, Route, RouteSearch, Router, StreetGraphIndex};

    use super::helpers::{coord, delivery, l_town};
    use crate::{
        CompassDirection, DeliveryCommand, DeliveryPlanner, PlanError, PlannerConfig, TurnSide,
    };

    /// A router for a city with no roads at all.
    struct Nowhere;

    impl Router for Nowhere {
        fn route(&self, from: &Coordinate, to: &Coordinate) -> MapResult<Route> {
            Err(MapError::NoRoute { from: from.clone(), to: to.clone() })
        }
    }

    fn is_proceed(command: &DeliveryCommand, direction: CompassDirection, street: &str) -> bool {
        matches!(
            command,
            DeliveryCommand::Proceed { direction: d, street: s, .. } if *d == direction && s == street
        )
    }

    #[test]
    fn no_deliveries_is_empty_plan() {
        let (index, depot, _) = l_town();
        let plan = DeliveryPlanner::new(RouteSearch::new(&index)).plan(&depot, &[]).unwrap();
        assert!(plan.commands.is_empty());
        assert_eq!(plan.distance_miles, 0.0);
        assert!(plan.summary.is_none());
    }

    #[test]
    fn out_and_back_commands() {
        let (index, depot, o1) = l_town();
        let planner = DeliveryPlanner::new(RouteSearch::new(&index));
        let deliveries = [delivery("pizza", o1.latitude_text(), o1.longitude_text())];

        let plan = planner.plan(&depot, &deliveries).unwrap();
        let c = &plan.commands;
        assert_eq!(c.len(), 7, "{c:#?}");

        // Outbound: two Main St segments merge into one Proceed.
        assert!(is_proceed(&c[0], CompassDirection::East, "Main St"));
        assert_eq!(c[1], DeliveryCommand::Turn { side: TurnSide::Left, street: "Oak Ave".into() });
        assert!(is_proceed(&c[2], CompassDirection::North, "Oak Ave"));
        assert_eq!(c[3], DeliveryCommand::Deliver { item: "pizza".into() });

        // Return leg to the depot; no Deliver at the end.
        assert!(is_proceed(&c[4], CompassDirection::South, "Oak Ave"));
        assert_eq!(c[5], DeliveryCommand::Turn { side: TurnSide::Right, street: "Main St".into() });
        assert!(is_proceed(&c[6], CompassDirection::West, "Main St"));

        // Main St is 0.002° of longitude, Oak Ave 0.001° of latitude.
        let main = c[0].distance_miles();
        assert!((main - 0.002 * 69.09).abs() < 1e-3, "got {main}");

        let driven: f64 = c.iter().map(DeliveryCommand::distance_miles).sum();
        assert!((driven - plan.distance_miles).abs() < 1e-9);
    }

    #[test]
    fn straight_street_change_has_no_turn() {
        let a = coord("0", "0.000");
        let b = coord("0", "0.001");
        let c = coord("0", "0.002");
        let mut index = StreetGraphIndex::new();
        index.add_segment(StreetSegment::new(a.clone(), b.clone(), "Main St"));
        index.add_segment(StreetSegment::new(b, c.clone(), "Broadway"));

        let planner = DeliveryPlanner::new(RouteSearch::new(&index));
        let plan = planner.plan(&a, &[delivery("mail", "0", "0.002")]).unwrap();

        let outbound: Vec<_> = plan.commands.iter().take(3).collect();
        assert!(is_proceed(outbound[0], CompassDirection::East, "Main St"));
        assert!(is_proceed(outbound[1], CompassDirection::East, "Broadway"));
        assert_eq!(*outbound[2], DeliveryCommand::Deliver { item: "mail".into() });
        assert!(!plan.commands.iter().any(|c| matches!(c, DeliveryCommand::Turn { .. })));
    }

    #[test]
    fn delivery_at_depot_delivers_immediately() {
        let (index, depot, _) = l_town();
        let planner = DeliveryPlanner::new(RouteSearch::new(&index));
        let plan = planner.plan(&depot, &[delivery("keys", "0.000", "0.000")]).unwrap();
        assert_eq!(plan.commands, vec![DeliveryCommand::Deliver { item: "keys".into() }]);
        assert_eq!(plan.distance_miles, 0.0);
    }

    #[test]
    fn off_map_delivery_fails_whole_plan() {
        let (index, depot, o1) = l_town();
        let planner = DeliveryPlanner::new(RouteSearch::new(&index));
        let deliveries = [
            delivery("pizza", o1.latitude_text(), o1.longitude_text()),
            delivery("ghost", "45.0", "45.0"),
        ];
        let err = planner.plan(&depot, &deliveries).unwrap_err();
        assert!(matches!(err, PlanError::Route(MapError::UnknownCoordinate(_))), "{err}");
    }

    #[test]
    fn router_failure_propagates() {
        let planner = DeliveryPlanner::new(Nowhere);
        let err = planner.plan(&coord("0", "0"), &[delivery("x", "1", "1")]).unwrap_err();
        assert!(matches!(err, PlanError::Route(MapError::NoRoute { .. })));
    }

    #[test]
    fn unoptimized_plan_keeps_request_order() {
        let (index, depot, o1) = l_town();
        let config = PlannerConfig { optimize_order: false, ..PlannerConfig::default() };
        let planner = DeliveryPlanner::with_config(RouteSearch::new(&index), config).unwrap();

        let deliveries = [
            delivery("far", o1.latitude_text(), o1.longitude_text()),
            delivery("near", "0.000", "0.001"),
        ];
        let plan = planner.plan(&depot, &deliveries).unwrap();
        let items: Vec<_> = plan.order.iter().map(|d| d.item.as_str()).collect();
        assert_eq!(items, ["far", "near"]);
        assert!(plan.summary.is_none());

        let delivered: Vec<_> = plan
            .commands
            .iter()
            .filter_map(|c| match c {
                DeliveryCommand::Deliver { item } => Some(item.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(delivered, ["far", "near"]);
    }

    #[test]
    fn optimized_plan_reorders_and_summarizes() {
        let (index, depot, o1) = l_town();
        let planner = DeliveryPlanner::new(RouteSearch::new(&index));
        let deliveries = [
            delivery("far", o1.latitude_text(), o1.longitude_text()),
            delivery("near", "0.000", "0.001"),
        ];
        let plan = planner.plan(&depot, &deliveries).unwrap();
        let items: Vec<_> = plan.order.iter().map(|d| d.item.as_str()).collect();
        assert_eq!(items, ["near", "far"]);
        assert!(plan.summary.is_some());
    }

    #[test]
    fn config_validation() {
        let (index, _, _) = l_town();
        for tolerance in [200.0, -1.0] {
            let bad = PlannerConfig { straight_tolerance_deg: tolerance, ..PlannerConfig::default() };
            assert!(matches!(bad.validate(), Err(PlanError::Config(_))));
            assert!(matches!(
                DeliveryPlanner::with_config(RouteSearch::new(&index), bad),
                Err(PlanError::Config(_))
            ));
        }
    }

    #[test]
    fn command_display() {
        let proceed = DeliveryCommand::Proceed {
            direction:      CompassDirection::North,
            street:         "Main St".into(),
            distance_miles: 1.2,
        };
        assert_eq!(proceed.to_string(), "Proceed north on Main St for 1.20 miles");
        let turn = DeliveryCommand::Turn { side: TurnSide::Left, street: "Elm St".into() };
        assert_eq!(turn.to_string(), "Turn left on Elm St");
        assert_eq!(DeliveryCommand::Deliver { item: "pizza".into() }.to_string(), "Deliver pizza");
    }
}

// ── Parallel leg routing ──────────────────────────────────────────────────────

#[cfg(all(test, feature = "parallel"))]
mod parallel_legs {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    use courier_core::Coordinate;
    use courier_map::{MapResult, Route, RouteSearch, Router};

    use super::helpers::{delivery, l_town};
    use crate::{DeliveryPlanner, PlannerConfig};

    /// Delays the earliest calls longest, so legs finish out of order.
    struct Staggered<'a> {
        inner: RouteSearch<'a>,
        calls: AtomicUsize,
    }

    impl Router for Staggered<'_> {
        fn route(&self, from: &Coordinate, to: &Coordinate) -> MapResult<Route> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(10 * 4u64.saturating_sub(n as u64)));
            self.inner.route(from, to)
        }
    }

    #[test]
    fn commands_follow_stop_order() {
        let (index, depot, _) = l_town();
        let deliveries = vec![
            delivery("bread", "0.000", "0.001"),
            delivery("milk", "0.001", "0.002"),
            delivery("eggs", "0.000", "0.002"),
        ];
        let config = PlannerConfig { optimize_order: false, ..PlannerConfig::default() };

        let staggered = Staggered { inner: RouteSearch::new(&index), calls: AtomicUsize::new(0) };
        let plan = DeliveryPlanner::with_config(staggered, config)
            .unwrap()
            .plan(&depot, &deliveries)
            .unwrap();

        let text: Vec<String> = plan.commands.iter().map(ToString::to_string).collect();
        assert_eq!(
            text,
            [
                "Proceed east on Main St for 0.07 miles",
                "Deliver bread",
                "Proceed east on Main St for 0.07 miles",
                "Turn left on Oak Ave",
                "Proceed north on Oak Ave for 0.07 miles",
                "Deliver milk",
                "Proceed south on Oak Ave for 0.07 miles",
                "Deliver eggs",
                "Proceed west on Main St for 0.14 miles",
            ]
        );

        let direct = DeliveryPlanner::with_config(RouteSearch::new(&index), config)
            .unwrap()
            .plan(&depot, &deliveries)
            .unwrap();
        assert_eq!(plan, direct);
    }
}
