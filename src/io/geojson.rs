use anyhow::{anyhow, bail, Context, Result};
use geo::{Coord, LineString, MultiPolygon, Point, Polygon};
use serde_json::{json, Map, Value};
use tracing::{debug, info};

use crate::corridor::CorridorBounds;
use crate::types::{Sensor, StreetSegment};
use crate::walkable::WalkableArea;
use crate::zone::Zone;

/// Features of a GeoJSON FeatureCollection.
fn features(bytes: &[u8]) -> Result<Vec<Value>> {
    let mut value: Value = serde_json::from_slice(bytes).context("failed to parse GeoJSON")?;
    if value["type"].as_str() != Some("FeatureCollection") {
        bail!("expected a GeoJSON FeatureCollection");
    }
    match value["features"].take() {
        Value::Array(features) => Ok(features),
        _ => bail!("FeatureCollection has no features array"),
    }
}

fn parse_coord(value: &Value) -> Result<Coord<f64>> {
    let pair = value.as_array().filter(|a| a.len() >= 2)
        .ok_or_else(|| anyhow!("invalid position: {value}"))?;
    let x = pair[0].as_f64().ok_or_else(|| anyhow!("invalid coordinate: x must be a number"))?;
    let y = pair[1].as_f64().ok_or_else(|| anyhow!("invalid coordinate: y must be a number"))?;
    Ok(Coord { x, y })
}

fn parse_line(value: &Value) -> Result<LineString<f64>> {
    let coords = value.as_array().ok_or_else(|| anyhow!("invalid LineString coordinates"))?;
    Ok(LineString(coords.iter().map(parse_coord).collect::<Result<Vec<_>>>()?))
}

/// A property as text: strings verbatim, numbers printed.
fn text_property(properties: &Value, key: &str) -> Option<String> {
    match &properties[key] {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Read street centerlines. Each LineString feature is one segment; each
/// part of a MultiLineString feature is its own segment with id `<id>:<part>`.
/// Features without an `id` property are numbered by position.
pub fn read_streets(bytes: &[u8]) -> Result<Vec<StreetSegment>> {
    let mut streets = Vec::new();
    let mut skipped = 0;

    for (idx, feature) in features(bytes)?.iter().enumerate() {
        let properties = &feature["properties"];
        let id = text_property(properties, "id").unwrap_or_else(|| idx.to_string());
        let name = text_property(properties, "name").unwrap_or_default();
        let borough = text_property(properties, "borough").unwrap_or_default();
        let geometry = &feature["geometry"];

        match geometry["type"].as_str() {
            Some("LineString") => {
                let line = parse_line(&geometry["coordinates"])
                    .with_context(|| anyhow!("street feature {idx} ({id})"))?;
                streets.push(StreetSegment::new(id, name, line, borough));
            }
            Some("MultiLineString") => {
                let parts = geometry["coordinates"].as_array()
                    .ok_or_else(|| anyhow!("street feature {idx} ({id}): invalid MultiLineString"))?;
                for (part, coords) in parts.iter().enumerate() {
                    let line = parse_line(coords)
                        .with_context(|| anyhow!("street feature {idx} ({id}), part {part}"))?;
                    streets.push(StreetSegment::new(format!("{id}:{part}"), name.clone(), line, borough.clone()));
                }
            }
            other => {
                debug!(feature = idx, geometry = ?other, "skipping non-line street feature");
                skipped += 1;
            }
        }
    }

    info!(segments = streets.len(), skipped, "read street network");
    Ok(streets)
}

/// Read sensors from Point features with an integer `id` and optional `name`.
pub fn read_sensors(bytes: &[u8]) -> Result<Vec<Sensor>> {
    let sensors = features(bytes)?.iter().enumerate()
        .map(|(idx, feature)| {
            let properties = &feature["properties"];
            let id = properties["id"].as_u64()
                .and_then(|id| u32::try_from(id).ok())
                .ok_or_else(|| anyhow!("sensor feature {idx}: `id` must be a non-negative 32-bit integer"))?;
            let name = text_property(properties, "name").unwrap_or_else(|| format!("sensor {id}"));

            let geometry = &feature["geometry"];
            if geometry["type"].as_str() != Some("Point") {
                bail!("sensor feature {idx} ({id}): geometry must be a Point");
            }
            let position = parse_coord(&geometry["coordinates"])
                .with_context(|| anyhow!("sensor feature {idx} ({id})"))?;
            Ok(Sensor::new(id, name, Point::from(position)))
        })
        .collect::<Result<Vec<_>>>()?;

    info!(sensors = sensors.len(), "read sensors");
    Ok(sensors)
}

fn ring_to_json(ring: &LineString<f64>) -> Value {
    Value::Array(ring.coords().map(|c| json!([c.x, c.y])).collect())
}

fn polygon_to_json(polygon: &Polygon<f64>) -> Value {
    Value::Array(std::iter::once(polygon.exterior()).chain(polygon.interiors()).map(ring_to_json).collect())
}

fn feature_collection(features: Vec<Value>) -> Value {
    json!({ "type": "FeatureCollection", "features": features })
}

/// Zones as Polygon features with `sensor`, `area_m2`, `approximated` and
/// `approximation` properties.
pub fn zones_to_geojson(zones: &[Zone]) -> Value {
    feature_collection(zones.iter()
        .map(|zone| json!({
            "type": "Feature",
            "geometry": { "type": "Polygon", "coordinates": polygon_to_json(zone.polygon()) },
            "properties": {
                "sensor": zone.sensor(),
                "area_m2": zone.area(),
                "approximated": zone.is_approximated(),
                "approximation": zone.approximation(),
            },
        }))
        .collect())
}

/// The corridor quadrilateral, with each corner and the extent as properties.
pub fn corridor_to_geojson(corridor: &CorridorBounds) -> Value {
    let corners = corridor.corners()
        .map(|(corner, c)| (corner.to_string(), json!([c.x, c.y])))
        .collect::<Map<_, _>>();
    let extent = corridor.extent();

    feature_collection(vec![json!({
        "type": "Feature",
        "geometry": { "type": "Polygon", "coordinates": polygon_to_json(&corridor.polygon()) },
        "properties": {
            "corners": corners,
            "margin": corridor.margin(),
            "extent": [extent.min().x, extent.min().y, extent.max().x, extent.max().y],
        },
    })])
}

/// The walkable area as a single MultiPolygon feature.
pub fn walkable_to_geojson(walkable: &WalkableArea) -> Value {
    let MultiPolygon(polygons) = walkable.geometry();
    feature_collection(vec![json!({
        "type": "Feature",
        "geometry": {
            "type": "MultiPolygon",
            "coordinates": polygons.iter().map(polygon_to_json).collect::<Vec<_>>(),
        },
        "properties": {},
    })])
}
