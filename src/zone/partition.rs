use anyhow::{anyhow, bail, Context, Result};
use geo::{Area, BooleanOps, BoundingRect, Coord, LineString, MultiPoint, MultiPolygon, Point, Polygon, Rect};
use tracing::{debug, info, warn};

use crate::geom::{clip_to_rect, disk, envelope, largest_polygon, snap_polygons, BoundingBox, Projection};
use crate::types::Sensor;
use crate::walkable::WalkableArea;
use crate::zone::{voronoi::voronoi_cells, Approximation, Zone};
use crate::ConfigError;

/// Overlay components at or below this area (m²) are numerical slivers.
const SLIVER_AREA: f64 = 1e-4;

/// Vertex count of the fallback disk.
const DISK_SEGMENTS: usize = 32;

/// Splits a bounding polygon among sensors by nearest-sensor (Voronoi)
/// assignment, optionally restricted to a walkable area.
///
/// ```ignore
/// let zones = ZonePartitioner::new(&corridor.polygon())
///     .with_walkable(&walkable)
///     .partition(&sensors)?;
/// ```
#[derive(Clone, Copy, Debug)]
pub struct ZonePartitioner<'a> {
    bounds: &'a Polygon<f64>,
    walkable: Option<&'a WalkableArea>,
    fallback_radius: f64,
    snap_tolerance: f64,
}

impl<'a> ZonePartitioner<'a> {
    /// Radius (m) of the disk used when a sensor's clipped cell is empty.
    pub const DEFAULT_FALLBACK_RADIUS: f64 = 15.0;

    /// Distance (m) within which zone vertices are merged.
    pub const DEFAULT_SNAP_TOLERANCE: f64 = 1e-3;

    /// Partition `bounds` (lon/lat) with no walkable restriction.
    pub fn new(bounds: &'a Polygon<f64>) -> Self {
        Self {
            bounds,
            walkable: None,
            fallback_radius: Self::DEFAULT_FALLBACK_RADIUS,
            snap_tolerance: Self::DEFAULT_SNAP_TOLERANCE,
        }
    }

    /// Also clip every zone to `walkable`.
    pub fn with_walkable(mut self, walkable: &'a WalkableArea) -> Self {
        self.walkable = Some(walkable);
        self
    }

    pub fn with_fallback_radius(mut self, radius: f64) -> Self {
        self.fallback_radius = radius;
        self
    }

    pub fn with_snap_tolerance(mut self, tolerance: f64) -> Self {
        self.snap_tolerance = tolerance;
        self
    }

    /// One zone per sensor, in input order.
    ///
    /// Zones are pairwise interior-disjoint. Without a walkable area and with
    /// every sensor's cell meeting the bounds, their union is the bounding
    /// polygon. Cells that clip to nothing or to several pieces are repaired
    /// and flagged (see [`Approximation`]).
    pub fn partition(&self, sensors: &[Sensor]) -> Result<Vec<Zone>> {
        if sensors.len() < 2 { bail!(ConfigError::TooFewSensors(sensors.len())) }
        if !(self.fallback_radius > 0.0 && self.fallback_radius.is_finite()) {
            bail!(ConfigError::InvalidParameter {
                name: "partition.fallback_radius",
                reason: format!("{} is not a positive distance", self.fallback_radius),
            });
        }
        if !(self.snap_tolerance >= 0.0 && self.snap_tolerance.is_finite()) {
            bail!(ConfigError::InvalidParameter {
                name: "partition.snap_tolerance",
                reason: format!("{} is not a non-negative distance", self.snap_tolerance),
            });
        }
        if self.bounds.exterior().0.len() < 4 { bail!("bounding polygon has no area") }

        let projection = Projection::for_points(
            &self.bounds.exterior().points()
                .chain(sensors.iter().map(|s| s.position))
                .collect::<Vec<Point<f64>>>()
        )?;

        let sites = sensors.iter()
            .map(|sensor| projection.to_metric_coord(sensor.position.0)
                .with_context(|| anyhow!("failed to project sensor {}", sensor.id)))
            .collect::<Result<Vec<_>>>()?;

        // Sites closer than the snap tolerance would collapse their shared edge.
        let tree = BoundingBox::index(sites.iter().map(|&c| Rect::new(c, c)).enumerate());
        for (i, site) in sites.iter().enumerate() {
            let first = tree.locate_in_envelope_intersecting(&envelope(&Rect::new(*site, *site), self.snap_tolerance))
                .map(|b| b.idx())
                .filter(|&j| j < i && (sites[j].x - site.x).hypot(sites[j].y - site.y) <= self.snap_tolerance)
                .min();
            if let Some(j) = first {
                bail!(ConfigError::DuplicateSensorPosition(sensors[j].id, sensors[i].id));
            }
        }

        let bounds = projection.to_metric(self.bounds).context("failed to project bounding polygon")?;
        let walkable = self.walkable
            .map(|w| projection.to_metric(w.geometry()))
            .transpose()
            .context("failed to project walkable area")?;

        // Everything the cells are clipped to lies inside `clip`.
        let region = MultiPoint::from(bounds.exterior().points().chain(sites.iter().map(|&c| Point::from(c))).collect::<Vec<_>>())
            .bounding_rect()
            .ok_or_else(|| anyhow!("bounding polygon is empty"))?;
        let margin = region.width().hypot(region.height()).max(1.0);
        let clip = Rect::new(
            Coord { x: region.min().x - margin, y: region.min().y - margin },
            Coord { x: region.max().x + margin, y: region.max().y + margin },
        );
        let reach = clip.width().hypot(clip.height());

        let cells = voronoi_cells(&sites, reach)?;

        let mut polygons = Vec::with_capacity(sensors.len());
        let mut approximations = Vec::with_capacity(sensors.len());

        for ((sensor, site), cell) in sensors.iter().zip(&sites).zip(cells) {
            let cell = Polygon::new(LineString::from(clip_to_rect(&cell, clip)), vec![]);
            let in_bounds = cell.intersection(&bounds);
            let clipped = match &walkable {
                Some(walkable) => in_bounds.intersection(walkable),
                None => in_bounds.clone(),
            };

            let (polygon, approximation) = match largest_polygon(clipped, SLIVER_AREA) {
                (Some(polygon), 1) => (polygon, None),
                (Some(polygon), parts) => {
                    warn!(sensor = %sensor.id, parts, "zone is split; keeping the largest part");
                    (polygon, Some(Approximation::MultiPart { parts }))
                }
                (None, _) => {
                    warn!(sensor = %sensor.id, radius = self.fallback_radius, "zone is empty after clipping; using a fallback disk");
                    (self.fallback(*site, &cell, &in_bounds), Some(Approximation::EmptyClip))
                }
            };
            debug!(sensor = %sensor.id, vertices = polygon.exterior().0.len(), area_m2 = polygon.unsigned_area(), "clipped cell");

            polygons.push(polygon);
            approximations.push(approximation);
        }

        snap_polygons(&mut polygons, self.snap_tolerance);

        let zones = sensors.iter().zip(polygons).zip(approximations)
            .map(|((sensor, polygon), approximation)| -> Result<Zone> {
                let area = polygon.unsigned_area();
                let polygon = projection.to_geographic(&polygon)
                    .with_context(|| anyhow!("failed to unproject zone of sensor {}", sensor.id))?;
                Ok(Zone::new(sensor.id, polygon, area, approximation))
            })
            .collect::<Result<Vec<_>>>()?;

        info!(
            zones = zones.len(),
            approximated = zones.iter().filter(|z| z.is_approximated()).count(),
            utm_zone = projection.zone(),
            "partitioned bounds into sensor zones"
        );

        Ok(zones)
    }

    /// Disk around the sensor, kept inside its own cell and, when possible,
    /// inside the bounds.
    fn fallback(&self, site: Coord<f64>, cell: &Polygon<f64>, cell_in_bounds: &MultiPolygon<f64>) -> Polygon<f64> {
        let disk = disk(site, self.fallback_radius, DISK_SEGMENTS);
        if let (Some(polygon), _) = largest_polygon(disk.intersection(cell_in_bounds), SLIVER_AREA) {
            return polygon
        }
        match largest_polygon(disk.intersection(cell), SLIVER_AREA) {
            (Some(polygon), _) => polygon,
            (None, _) => disk,
        }
    }
}
