use std::fmt;

use anyhow::{anyhow, Context, Result};
use geo::{BoundingRect, Coord, MapCoords, Point, Rect};
use proj4rs::{proj::Proj as Proj4, transform::transform};

/// PROJ.4 string for the geographic (lon/lat, WGS84) input space.
const GEOGRAPHIC_PROJ4: &str = "+proj=longlat +datum=WGS84 +no_defs +type=crs";

/// A locally-flat metric space for a lon/lat region: the UTM zone containing
/// the region's centre.
///
/// All distance-sensitive work (buffering, Voronoi, areas) happens in this
/// space; results are mapped back to lon/lat before they leave the crate.
pub struct Projection {
    geographic: Proj4,
    metric: Proj4,
    zone: u32,
    south: bool,
}

impl fmt::Debug for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Projection")
            .field("zone", &self.zone)
            .field("south", &self.south)
            .finish()
    }
}

impl Projection {
    /// Build the UTM projection for the zone containing `center` (lon/lat degrees).
    pub fn utm(center: Coord<f64>) -> Result<Self> {
        let zone = (((center.x + 180.0) / 6.0).floor() as i32 + 1).clamp(1, 60) as u32;
        let south = center.y < 0.0;

        let geographic = Proj4::from_proj_string(GEOGRAPHIC_PROJ4)
            .with_context(|| anyhow!("failed to build source PROJ.4: {GEOGRAPHIC_PROJ4}"))?;

        let metric = {
            let south = if south { " +south" } else { "" };
            let proj_string = format!("+proj=utm +zone={zone}{south} +datum=WGS84 +units=m +no_defs +type=crs");
            Proj4::from_proj_string(&proj_string)
                .with_context(|| anyhow!("failed to build target PROJ.4: {proj_string}"))?
        };

        Ok(Self { geographic, metric, zone, south })
    }

    /// Build the projection for the centre of `rect`.
    #[inline] pub fn for_rect(rect: Rect<f64>) -> Result<Self> { Self::utm(rect.center()) }

    /// Build the projection for the centre of the bounding box of `points`.
    pub fn for_points<'a>(points: impl IntoIterator<Item = &'a Point<f64>>) -> Result<Self> {
        let multi = geo::MultiPoint::from(points.into_iter().copied().collect::<Vec<_>>());
        let rect = multi.bounding_rect()
            .ok_or_else(|| anyhow!("cannot choose a projection for an empty point set"))?;
        Self::for_rect(rect)
    }

    /// UTM zone number (1..=60).
    #[inline] pub fn zone(&self) -> u32 { self.zone }

    /// Whether this is a southern-hemisphere zone.
    #[inline] pub fn is_south(&self) -> bool { self.south }

    /// Project a lon/lat coordinate (degrees) to metres.
    pub fn to_metric_coord(&self, coord: Coord<f64>) -> Result<Coord<f64>> {
        let mut point = (coord.x.to_radians(), coord.y.to_radians(), 0.0);
        transform(&self.geographic, &self.metric, &mut point)
            .with_context(|| anyhow!("CRS transform failed for ({}, {})", coord.x, coord.y))?;
        Ok(Coord { x: point.0, y: point.1 })
    }

    /// Inverse of [`Projection::to_metric_coord`].
    pub fn to_geographic_coord(&self, coord: Coord<f64>) -> Result<Coord<f64>> {
        let mut point = (coord.x, coord.y, 0.0);
        transform(&self.metric, &self.geographic, &mut point)
            .with_context(|| anyhow!("inverse CRS transform failed for ({}, {})", coord.x, coord.y))?;
        Ok(Coord { x: point.0.to_degrees(), y: point.1.to_degrees() })
    }

    /// Project any geometry from lon/lat to metres.
    pub fn to_metric<G>(&self, geom: &G) -> Result<G>
    where G: MapCoords<f64, f64, Output = G>
    {
        geom.try_map_coords(|coord| self.to_metric_coord(coord))
    }

    /// Project any geometry from metres back to lon/lat.
    pub fn to_geographic<G>(&self, geom: &G) -> Result<G>
    where G: MapCoords<f64, f64, Output = G>
    {
        geom.try_map_coords(|coord| self.to_geographic_coord(coord))
    }
}
