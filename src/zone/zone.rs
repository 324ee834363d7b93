use geo::{Centroid, Contains, Coord, Point, Polygon};
use serde::Serialize;

use crate::types::SensorId;

/// Why a zone is not the exact clipped Voronoi cell of its sensor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Approximation {
    /// The clipped cell was empty; the zone is a fallback disk around the sensor.
    EmptyClip,
    /// The clipped cell had `parts` disconnected components; only the largest is kept.
    MultiPart { parts: usize },
}

/// The region owned by one sensor, in lon/lat.
#[derive(Clone, Debug, PartialEq)]
pub struct Zone {
    sensor: SensorId,
    polygon: Polygon<f64>,
    area: f64,
    approximation: Option<Approximation>,
}

impl Zone {
    pub fn new(sensor: SensorId, polygon: Polygon<f64>, area: f64, approximation: Option<Approximation>) -> Self {
        Self { sensor, polygon, area, approximation }
    }

    #[inline] pub fn sensor(&self) -> SensorId { self.sensor }

    #[inline] pub fn polygon(&self) -> &Polygon<f64> { &self.polygon }

    /// Area in square metres, measured in the metric projection used to build the zone.
    #[inline] pub fn area(&self) -> f64 { self.area }

    #[inline] pub fn approximation(&self) -> Option<Approximation> { self.approximation }

    #[inline] pub fn is_approximated(&self) -> bool { self.approximation.is_some() }

    /// Exterior ring vertices, without the closing repeat of the first vertex.
    pub fn vertices(&self) -> &[Coord<f64>] {
        let ring = &self.polygon.exterior().0;
        match ring.split_last() {
            Some((last, rest)) if rest.first() == Some(last) => rest,
            _ => ring,
        }
    }

    /// Area-weighted centroid of the zone polygon.
    pub fn centroid(&self) -> Option<Point<f64>> { self.polygon.centroid() }

    /// Whether `point` lies in the interior of the zone (boundary excluded).
    #[inline] pub fn contains(&self, point: &Point<f64>) -> bool { self.polygon.contains(point) }
}

#[cfg(test)]
mod tests {
    use geo::polygon;

    use super::*;

    fn unit_square() -> Zone {
        let square = polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0), (x: 0.0, y: 1.0)];
        Zone::new(SensorId(7), square, 1.0, None)
    }

    #[test]
    fn vertices_drop_closing_coordinate() {
        let zone = unit_square();
        assert_eq!(zone.polygon().exterior().0.len(), 5);
        assert_eq!(zone.vertices().len(), 4);
        assert_eq!(zone.vertices()[0], Coord { x: 0.0, y: 0.0 });
    }

    #[test]
    fn boundary_is_not_contained() {
        let zone = unit_square();
        assert!(zone.contains(&Point::new(0.5, 0.5)));
        assert!(!zone.contains(&Point::new(1.0, 0.5)));
        assert!(!zone.contains(&Point::new(2.0, 0.5)));
    }

    #[test]
    fn approximation_flag_follows_reason() {
        let exact = unit_square();
        assert!(!exact.is_approximated());

        let approx = Zone::new(SensorId(1), exact.polygon().clone(), 1.0, Some(Approximation::MultiPart { parts: 3 }));
        assert!(approx.is_approximated());
        assert_eq!(approx.approximation(), Some(Approximation::MultiPart { parts: 3 }));
        assert_eq!(approx.centroid(), Some(Point::new(0.5, 0.5)));
    }
}
