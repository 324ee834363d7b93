mod common;

use common::*;
use geo::{coord, Point};
use serde_json::{json, Value};
use zonal::{io, Config, ConfigError, Corner, ScoreTable, Sensor, SensorId, StreetSegment, ZoneMap};

/// One camera on each side of the Park / Lexington, East 40 / East 42 block:
/// west and east on East 41, south on East 40 and north on East 42.
fn cameras() -> Vec<Sensor> {
    vec![
        Sensor::new(1, "park and 41", Point::new(-73.9799, 40.752)),
        Sensor::new(2, "lexington and 41", Point::new(-73.9751, 40.752)),
        Sensor::new(3, "mid 40", Point::new(-73.9775, 40.75005)),
        Sensor::new(4, "mid 42", Point::new(-73.9775, 40.75395)),
    ]
}

fn config() -> Config {
    let mut config = Config::default();
    config.corridor.corners = midtown_rules();
    config.corridor.search = Some([-73.99, 40.74, -73.96, 40.76]);
    config.walkable.buffer_width = 10.0;
    config
}

#[test]
fn builds_the_midtown_block() {
    let map = ZoneMap::build(&midtown_grid(), &cameras(), &config()).unwrap();

    assert_eq!(map.corridor().corner(Corner::SE), coord! { x: LEXINGTON, y: EAST_40 });
    assert!(map.walkable().is_some_and(|w| !w.is_empty()));

    assert_eq!(map.zones().len(), 4);
    for (zone, sensor) in map.zones().iter().zip(&cameras()) {
        assert_eq!(zone.sensor(), sensor.id);
        assert!(!zone.is_approximated(), "zone {} is approximated", zone.sensor());
        assert!(zone.contains(&sensor.position), "zone {} misses its sensor", zone.sensor());
    }

    // East 41 links west and east; the avenues link both to north and south.
    let graph = map.graph();
    let expected = [(1, 2), (1, 3), (1, 4), (2, 3), (2, 4)];
    assert_eq!(graph.edge_count(), expected.len());
    for (a, b) in expected {
        assert!(graph.are_adjacent(SensorId(a), SensorId(b)), "{a} and {b} should be adjacent");
    }
    assert!(!graph.are_adjacent(SensorId(3), SensorId(4)));
}

#[test]
fn stress_reaches_the_opposite_side_in_two_hops() {
    let map = ZoneMap::build(&midtown_grid(), &cameras(), &config()).unwrap();
    let scores = ScoreTable::from_iter([(SensorId(3), 10.0)]);

    let north = map.propagate(&scores, cameras()[3].position);
    assert_eq!(north.zone, SensorId(4));
    assert_eq!(north.base, 0.0);
    assert_eq!(north.direct, 0.0);
    assert_eq!(north.second_order, 2.5);
    assert_eq!(north.total, 2.5);

    let west = map.propagate(&scores, cameras()[0].position);
    assert_eq!(west.direct, 5.0);
    assert_eq!(west.total, 5.0);
}

#[test]
fn without_walkable_clip_zones_cover_the_corridor() {
    let mut config = config();
    config.walkable.enabled = false;
    let map = ZoneMap::build(&midtown_grid(), &cameras(), &config).unwrap();

    assert!(map.walkable().is_none());
    // The whole block is a zone: its centre belongs to someone.
    let centre = Point::new((PARK + LEXINGTON) / 2.0, EAST_41 + 0.0005);
    let (_, approximated) = map.engine().locate(&centre);
    assert!(!approximated);
}

#[test]
fn invalid_config_is_rejected_before_building() {
    let mut config = config();
    config.walkable.buffer_width = 0.0;
    assert!(ZoneMap::build(&midtown_grid(), &cameras(), &config).is_err());

    let mut config = self::config();
    config.corridor.search = None;
    let err = ZoneMap::build(&midtown_grid(), &cameras(), &config).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::InvalidParameter { name: "corridor.search", .. })
    ));
}

fn streets_geojson(streets: &[StreetSegment]) -> Value {
    let features = streets.iter()
        .map(|street| json!({
            "type": "Feature",
            "geometry": {
                "type": "LineString",
                "coordinates": street.line.coords().map(|c| json!([c.x, c.y])).collect::<Vec<_>>(),
            },
            "properties": { "id": street.id, "name": street.name, "borough": street.borough },
        }))
        .collect::<Vec<_>>();
    json!({ "type": "FeatureCollection", "features": features })
}

fn sensors_geojson(sensors: &[Sensor]) -> Value {
    let features = sensors.iter()
        .map(|sensor| json!({
            "type": "Feature",
            "geometry": { "type": "Point", "coordinates": [sensor.position.x(), sensor.position.y()] },
            "properties": { "id": sensor.id.0, "name": sensor.name },
        }))
        .collect::<Vec<_>>();
    json!({ "type": "FeatureCollection", "features": features })
}

#[test]
fn files_round_trip_through_the_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let streets_path = dir.path().join("streets.geojson");
    let sensors_path = dir.path().join("sensors.geojson");
    io::write_json(&streets_path, &streets_geojson(&midtown_grid()), false).unwrap();
    io::write_json(&sensors_path, &sensors_geojson(&cameras()), false).unwrap();

    let streets = io::read_streets(&io::read_file(&streets_path).unwrap()).unwrap();
    let sensors = io::read_sensors(&io::read_file(&sensors_path).unwrap()).unwrap();
    assert_eq!(streets, midtown_grid());
    assert_eq!(sensors, cameras());

    let map = ZoneMap::build(&streets, &sensors, &config()).unwrap();

    let zones_path = dir.path().join("zones.geojson");
    io::write_json(&zones_path, &io::zones_to_geojson(map.zones()), false).unwrap();
    let zones: Value = serde_json::from_slice(&io::read_file(&zones_path).unwrap()).unwrap();
    let features = zones["features"].as_array().unwrap();
    assert_eq!(features.len(), 4);
    assert_eq!(features[0]["properties"]["sensor"], json!(1));
    assert_eq!(features[0]["geometry"]["type"], json!("Polygon"));
    assert_eq!(features[2]["properties"]["approximated"], json!(false));

    // Refuses to clobber without force.
    assert!(io::write_json(&zones_path, &json!({}), false).is_err());
    io::write_json(&zones_path, &json!({}), true).unwrap();

    let adjacency = io::adjacency_to_json(map.graph());
    assert_eq!(adjacency["3"], json!([1, 2]));
    assert_eq!(adjacency["1"], json!([2, 3, 4]));

    let scores = io::read_scores(br#"{ "3": 10.0 }"#).unwrap();
    let points = io::read_points(br#"[[-73.9775, 40.75395], [-73.9799, 40.752]]"#).unwrap();
    let results = io::results_to_json(&map.propagate_all(&scores, &points));
    assert_eq!(results[0]["zone"], json!(4));
    assert_eq!(results[0]["total"], json!(2.5));
    assert_eq!(results[1]["direct"], json!(5.0));
}
