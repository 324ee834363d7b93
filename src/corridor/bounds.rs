use anyhow::{bail, Result};
use geo::{Coord, LineString, Polygon, Rect};

use crate::corridor::Corner;
use crate::ConfigError;

/// The four resolved corners of the corridor plus the margin used to derive
/// its rectangular extent.
#[derive(Clone, Debug, PartialEq)]
pub struct CorridorBounds {
    corners: [Coord<f64>; 4], // indexed by Corner::index
    margin: f64,
}

impl CorridorBounds {
    /// Build the corridor from its corners. Fails unless all four are distinct.
    pub fn new(corners: [Coord<f64>; 4], margin: f64) -> Result<Self> {
        if !(margin >= 0.0) {
            bail!(ConfigError::InvalidParameter { name: "corridor.margin", reason: format!("{margin} is negative") });
        }
        for i in 0..4 {
            for j in i + 1..4 {
                if corners[i] == corners[j] {
                    bail!(ConfigError::DuplicateCorners(Corner::ALL[i], Corner::ALL[j]));
                }
            }
        }
        Ok(Self { corners, margin })
    }

    /// Position of one corner.
    #[inline] pub fn corner(&self, corner: Corner) -> Coord<f64> { self.corners[corner.index()] }

    /// All four corners as `(name, position)` in ring order NW, NE, SE, SW.
    pub fn corners(&self) -> impl Iterator<Item = (Corner, Coord<f64>)> + '_ {
        Corner::ALL.iter().map(|&c| (c, self.corner(c)))
    }

    #[inline] pub fn margin(&self) -> f64 { self.margin }

    /// Corner quadrilateral NW → NE → SE → SW, the bounding polygon for zones.
    pub fn polygon(&self) -> Polygon<f64> {
        Polygon::new(LineString::from(self.corners.to_vec()), vec![])
    }

    /// Bounding box of the corners, grown by the margin on every side.
    pub fn extent(&self) -> Rect<f64> {
        let (mut min, mut max) = (self.corners[0], self.corners[0]);
        for c in &self.corners[1..] {
            min = Coord { x: min.x.min(c.x), y: min.y.min(c.y) };
            max = Coord { x: max.x.max(c.x), y: max.y.max(c.y) };
        }
        Rect::new(
            Coord { x: min.x - self.margin, y: min.y - self.margin },
            Coord { x: max.x + self.margin, y: max.y + self.margin },
        )
    }
}

#[cfg(test)]
mod tests {
    use geo::{coord, Area};

    use super::*;

    fn square() -> [Coord<f64>; 4] {
        [coord! { x: 0.0, y: 1.0 }, coord! { x: 1.0, y: 1.0 }, coord! { x: 1.0, y: 0.0 }, coord! { x: 0.0, y: 0.0 }]
    }

    #[test]
    fn polygon_follows_corner_order() {
        let bounds = CorridorBounds::new(square(), 0.0).unwrap();
        let polygon = bounds.polygon();
        assert_eq!(polygon.exterior().0.len(), 5);
        assert_eq!(polygon.exterior().0[0], bounds.corner(Corner::NW));
        assert_eq!(polygon.exterior().0[2], bounds.corner(Corner::SE));
        assert!((polygon.unsigned_area() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn extent_includes_margin() {
        let bounds = CorridorBounds::new(square(), 0.25).unwrap();
        let extent = bounds.extent();
        assert_eq!(extent.min(), coord! { x: -0.25, y: -0.25 });
        assert_eq!(extent.max(), coord! { x: 1.25, y: 1.25 });
    }

    #[test]
    fn duplicate_corners_are_rejected() {
        let mut corners = square();
        corners[3] = corners[1];
        let err = CorridorBounds::new(corners, 0.0).unwrap_err();
        assert_eq!(err.downcast_ref::<ConfigError>(), Some(&ConfigError::DuplicateCorners(Corner::NE, Corner::SW)));
    }

    #[test]
    fn negative_margin_is_rejected() {
        assert!(CorridorBounds::new(square(), -1.0).is_err());
    }
}
