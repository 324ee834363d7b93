use anyhow::{bail, Context, Result};
use geo::{Area, BooleanOps, BoundingRect, Buffer, Intersects, LineString, MultiLineString, MultiPolygon, Rect};
use tracing::{debug, info};

use crate::geom::Projection;
use crate::types::StreetSegment;
use crate::ConfigError;

/// Pedestrian-accessible ground: the buffered union of street centerlines,
/// in geographic coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct WalkableArea {
    geometry: MultiPolygon<f64>,
}

impl WalkableArea {
    /// Wrap an existing walkable geometry (lon/lat).
    pub fn new(geometry: MultiPolygon<f64>) -> Self { Self { geometry } }

    /// Buffer every centerline by `buffer_width` metres and union the results.
    ///
    /// Buffering happens in the UTM zone of the streets' bounding box, never
    /// in lon/lat, so the width is the same in every direction.
    pub fn build<'a>(streets: impl IntoIterator<Item = &'a StreetSegment>, buffer_width: f64) -> Result<Self> {
        if !(buffer_width > 0.0 && buffer_width.is_finite()) {
            bail!(ConfigError::InvalidBufferWidth(buffer_width));
        }

        let lines = streets.into_iter()
            .filter(|street| street.line.0.len() >= 2)
            .map(|street| street.line.clone())
            .collect::<Vec<LineString<f64>>>();
        if lines.is_empty() { bail!(ConfigError::EmptyStreets) }

        let bounds = MultiLineString::new(lines.clone()).bounding_rect()
            .ok_or(ConfigError::EmptyStreets)?;
        let projection = Projection::for_rect(bounds)?;

        let buffered = lines.iter()
            .map(|line| -> Result<MultiPolygon<f64>> { Ok(projection.to_metric(line)?.buffer(buffer_width)) })
            .collect::<Result<Vec<MultiPolygon<f64>>>>()
            .context("failed to project street centerlines")?;

        let merged = buffered.into_iter()
            .reduce(|a, b| a.union(&b))
            .unwrap_or_else(|| MultiPolygon::new(vec![]));

        info!(streets = lines.len(), parts = merged.0.len(), area_m2 = merged.unsigned_area(), "built walkable area");

        Ok(Self { geometry: projection.to_geographic(&merged)? })
    }

    /// The walkable geometry in lon/lat.
    #[inline] pub fn geometry(&self) -> &MultiPolygon<f64> { &self.geometry }

    #[inline] pub fn is_empty(&self) -> bool { self.geometry.0.is_empty() }
}

/// Streets relevant to a corridor: centerlines meeting `extent`, optionally
/// restricted to a set of boroughs (case-insensitive).
pub fn select_streets<'a>(
    streets: &'a [StreetSegment],
    extent: Rect<f64>,
    boroughs: Option<&[String]>,
) -> Vec<&'a StreetSegment> {
    let selected = streets.iter()
        .filter(|street| boroughs.is_none_or(|names| names.iter().any(|b| street.in_borough(b))))
        .filter(|street| extent.intersects(&street.line))
        .collect::<Vec<_>>();
    debug!(total = streets.len(), selected = selected.len(), "selected corridor streets");
    selected
}
