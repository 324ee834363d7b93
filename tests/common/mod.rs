#![allow(dead_code)]

use geo::{coord, line_string, Coord, LineString, Point, Polygon, Rect};
use zonal::{Corner, CornerRule, NamePattern, Projection, Sensor, StreetSegment};

/// Origin of the metric test fixtures, in Midtown Manhattan.
pub const ORIGIN: Coord<f64> = Coord { x: -73.98, y: 40.75 };

pub fn projection() -> Projection {
    Projection::utm(ORIGIN).unwrap()
}

/// Lon/lat position `(dx, dy)` metres from [`ORIGIN`] in its UTM zone.
pub fn offset(projection: &Projection, dx: f64, dy: f64) -> Coord<f64> {
    let origin = projection.to_metric_coord(ORIGIN).unwrap();
    projection.to_geographic_coord(coord! { x: origin.x + dx, y: origin.y + dy }).unwrap()
}

/// Axis-aligned (in UTM) rectangle `width` x `height` metres with its
/// south-west corner at [`ORIGIN`].
pub fn rectangle(projection: &Projection, width: f64, height: f64) -> Polygon<f64> {
    let ring = [(0.0, 0.0), (width, 0.0), (width, height), (0.0, height)]
        .iter()
        .map(|&(dx, dy)| offset(projection, dx, dy))
        .collect::<Vec<_>>();
    Polygon::new(LineString::from(ring), vec![])
}

/// Sensors at metric offsets from [`ORIGIN`], numbered from 1.
pub fn sensors_at(projection: &Projection, offsets: &[(f64, f64)]) -> Vec<Sensor> {
    offsets.iter().enumerate()
        .map(|(i, &(dx, dy))| Sensor::new(i as u32 + 1, format!("cam {}", i + 1), Point::from(offset(projection, dx, dy))))
        .collect()
}

pub const PARK: f64 = -73.980;
pub const LEXINGTON: f64 = -73.975;
pub const THIRD: f64 = -73.970;
pub const EAST_40: f64 = 40.750;
pub const EAST_41: f64 = 40.752;
pub const EAST_42: f64 = 40.754;

/// North-south avenue at longitude `x`, with a vertex at every crossing.
fn avenue(id: &str, name: &str, x: f64) -> StreetSegment {
    let line = [40.746, EAST_40, EAST_41, EAST_42, 40.758]
        .iter()
        .map(|&y| coord! { x: x, y: y })
        .collect::<Vec<_>>();
    StreetSegment::new(id, name, LineString::from(line), "Manhattan")
}

/// East-west street at latitude `y`, with a vertex at every crossing.
fn street(id: &str, name: &str, y: f64) -> StreetSegment {
    let line = [-73.985, PARK, LEXINGTON, THIRD, -73.965]
        .iter()
        .map(|&x| coord! { x: x, y: y })
        .collect::<Vec<_>>();
    StreetSegment::new(id, name, LineString::from(line), "Manhattan")
}

/// A small Midtown grid: three avenues crossed by three numbered streets,
/// every polyline carrying a vertex at each crossing. A Brooklyn street
/// named like a Manhattan one sits far away.
pub fn midtown_grid() -> Vec<StreetSegment> {
    vec![
        avenue("a1", "Park Avenue", PARK),
        avenue("a2", "Lexington Avenue", LEXINGTON),
        avenue("a3", "Third Avenue", THIRD),
        street("s40", "East 40 Street", EAST_40),
        street("s41", "East 41 Street", EAST_41),
        street("s42", "East 42 Street", EAST_42),
        StreetSegment::new(
            "b1",
            "Park Avenue",
            line_string![(x: -73.95, y: 40.68), (x: -73.95, y: 40.70)],
            "Brooklyn",
        ),
    ]
}

/// Rough box around the Manhattan grid, leaving out Brooklyn.
pub fn midtown_search() -> Rect<f64> {
    Rect::new(coord! { x: -73.99, y: 40.74 }, coord! { x: -73.96, y: 40.76 })
}

fn contains(text: &str) -> Vec<NamePattern> {
    vec![NamePattern::Contains(text.into())]
}

/// Park / Lexington between East 40 and East 42.
pub fn midtown_rules() -> Vec<CornerRule> {
    vec![
        CornerRule { corner: Corner::NW, first: contains("park"), second: contains("east 42") },
        CornerRule { corner: Corner::NE, first: contains("lexington"), second: contains("east 42") },
        CornerRule { corner: Corner::SE, first: contains("lexington"), second: contains("east 40") },
        CornerRule { corner: Corner::SW, first: contains("park"), second: contains("east 40") },
    ]
}
