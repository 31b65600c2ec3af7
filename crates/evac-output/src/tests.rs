//! Unit tests for evac-output.

#[cfg(test)]
mod helpers {
    use evac_core::GeoPoint;
    use evac_spatial::{DijkstraRouter, RoadNetwork, RoadNetworkBuilder, Router};

    use crate::RouteReport;

    /// Diamond A→D with two tied paths, plus a severe road D-E.
    /// Every location but C has a coordinate.
    pub fn network() -> RoadNetwork {
        let mut b = RoadNetworkBuilder::new();
        for (a, c, dist, time, traffic) in [
            ("A", "B", 4.0, 5.0, 1.0),
            ("B", "D", 4.0, 5.0, 1.0),
            ("A", "C", 4.0, 5.0, 1.0),
            ("C", "D", 4.0, 5.0, 1.0),
            ("D", "E", 2.0, 1.0, 3.0),
        ] {
            b.add_road_by_name(a, c, dist, time, traffic).unwrap();
        }
        for (name, lat, lon) in [("A", 27.70, 85.30), ("B", 27.71, 85.30), ("D", 27.71, 85.31), ("E", 27.72, 85.32)] {
            let id = b.node_id(name).unwrap();
            b.set_position(id, GeoPoint::new(lat, lon));
        }
        b.build()
    }

    pub fn report(net: &RoadNetwork, from: &str, to: &str) -> RouteReport {
        let (f, t) = (net.node_id(from).unwrap(), net.node_id(to).unwrap());
        let routes = DijkstraRouter.optimal_routes(net, f, t).unwrap();
        RouteReport::for_routes(net, &routes)
    }
}

#[cfg(test)]
mod text {
    use evac_spatial::{DijkstraRouter, Router, nearest_facility};

    use crate::{ReportKind, RouteReport};

    use super::helpers::{network, report};

    #[test]
    fn route_lists_every_tied_path() {
        let net = network();
        let r = report(&net, "A", "D");
        assert_eq!(r.kind, ReportKind::Route);
        assert_eq!(
            r.to_string(),
            "Fastest evacuation time: 10 minutes\n\
             Shortest distance: 8 km\n\
             All optimal paths:\n\
             A -> B -> D\n\
             A -> C -> D\n"
        );
    }

    #[test]
    fn stops_accumulate_totals() {
        let net = network();
        let r = report(&net, "A", "E");
        let path = &r.paths[0];
        assert_eq!(path.len(), 4);
        assert_eq!(path[0].elapsed_time.as_f64(), 0.0);
        assert_eq!(path[0].traffic, None);
        assert_eq!(path[3].elapsed_time.as_f64(), 12.5);
        assert_eq!(path[3].elapsed_distance.as_f64(), 10.0);
        assert_eq!(path[3].traffic, Some(evac_core::TrafficCondition::Severe));
        assert_eq!(path[3].elapsed_time, r.total_time);
    }

    #[test]
    fn trivial_route() {
        let net = network();
        let r = report(&net, "B", "B");
        assert_eq!(r.paths.len(), 1);
        assert_eq!(r.to_string().lines().last(), Some("B"));
    }

    #[test]
    fn nearest_facility_text() {
        let net = network();
        let from = net.node_id("A").unwrap();
        let list = [net.node_id("E").unwrap(), net.node_id("B").unwrap()];
        let found = nearest_facility(&net, from, &list).unwrap();
        let r = RouteReport::for_facility(&net, &found, Some(1));
        assert_eq!(r.facility(), Some("B"));
        assert_eq!(
            r.to_string(),
            "Nearest Hospital: B\n\
             Path: A -> B\n\
             Distance: 4\n\
             Total Time: 5 minutes\n"
        );
    }

    #[test]
    fn single_path_text() {
        let net = network();
        let (a, d) = (net.node_id("A").unwrap(), net.node_id("D").unwrap());
        let route = DijkstraRouter.route(&net, a, d).unwrap();
        let r = RouteReport::for_route(&net, &route);
        assert_eq!(r.kind, ReportKind::SinglePath);
        assert_eq!(r.facility(), None);
        assert_eq!(
            r.to_string(),
            "Fastest evacuation time: 10 minutes\n\
             Shortest distance: 8 km\n\
             Path: A -> B -> D\n"
        );
    }

    #[test]
    fn facility_limit() {
        let net = network();
        let from = net.node_id("A").unwrap();
        let found = nearest_facility(&net, from, &[net.node_id("D").unwrap()]).unwrap();
        assert_eq!(RouteReport::for_facility(&net, &found, None).paths.len(), 2);
        assert_eq!(RouteReport::for_facility(&net, &found, Some(1)).paths.len(), 1);
    }
}

#[cfg(test)]
mod csv_tests {
    use crate::csv::CsvWriter;
    use crate::writer::OutputWriter;

    use super::helpers::{network, report};

    #[test]
    fn header_and_rows() {
        let net = network();
        let mut w = CsvWriter::from_writer(Vec::new()).unwrap();
        w.write_report(&report(&net, "A", "D")).unwrap();
        w.finish().unwrap();
        let bytes = w.into_inner().unwrap();

        let mut rdr = csv::Reader::from_reader(bytes.as_slice());
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(
            headers,
            ["path", "step", "location", "lat", "lon", "elapsed_time", "elapsed_distance", "traffic"]
        );

        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 6); // two paths × three stops
        assert_eq!(&rows[0][2], "A");
        assert_eq!(&rows[0][7], "");
        assert_eq!(&rows[2][0], "0");
        assert_eq!(&rows[2][5], "10");
        assert_eq!(&rows[2][7], "normal");
        assert_eq!(&rows[4][0], "1");
        assert_eq!(&rows[4][2], "C");
        assert_eq!(&rows[4][3], "", "C has no coordinate");
    }

    #[test]
    fn file_created() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("route.csv");
        let mut w = CsvWriter::new(&path).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
        assert!(path.exists());
    }
}

#[cfg(test)]
mod geojson_tests {
    use serde_json::Value;

    use crate::geojson::{GeoJsonWriter, features};
    use crate::writer::OutputWriter;

    use super::helpers::{network, report};

    #[test]
    fn lines_and_markers() {
        let net = network();
        let feats = features(&report(&net, "A", "D"));

        let lines: Vec<&Value> = feats.iter().filter(|f| f["geometry"]["type"] == "LineString").collect();
        // A-C-D has only two located stops (C has none), still a line.
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["geometry"]["coordinates"][0], serde_json::json!([85.30, 27.70]));
        assert_eq!(lines[0]["properties"]["total_time"], 10.0);
        assert_eq!(lines[0]["properties"]["facility"], Value::Null);

        let roles: Vec<&str> = feats
            .iter()
            .filter(|f| f["geometry"]["type"] == "Point")
            .map(|f| f["properties"]["role"].as_str().unwrap())
            .collect();
        assert_eq!(roles, ["start", "via", "end"]);
    }

    #[test]
    fn unlocated_path_has_no_line() {
        let net = network();
        let feats = features(&report(&net, "C", "C"));
        assert!(feats.is_empty());
    }

    #[test]
    fn writes_feature_collection() {
        let net = network();
        let mut w = GeoJsonWriter::from_writer(Vec::new());
        w.write_report(&report(&net, "A", "E")).unwrap();
        let bytes = w.into_inner().unwrap();

        let doc: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(doc["type"], "FeatureCollection");
        let n = doc["features"].as_array().unwrap().len();
        // 2 lines + markers for A, B, D, E on the first path.
        assert_eq!(n, 6);
    }
}
