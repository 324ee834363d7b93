use std::cmp::Ordering;
use std::f64::consts::TAU;

use geo::{Area, Coord, LineString, MultiPolygon, Polygon, Rect};

/// Regular `segments`-gon approximating the disk of `radius` around `center`.
pub(crate) fn disk(center: Coord<f64>, radius: f64, segments: usize) -> Polygon<f64> {
    debug_assert!(segments >= 3, "segments must be at least 3");
    let ring = (0..segments)
        .map(|i| {
            let theta = TAU * i as f64 / segments as f64;
            Coord { x: center.x + radius * theta.cos(), y: center.y + radius * theta.sin() }
        })
        .collect::<Vec<_>>();
    Polygon::new(LineString::from(ring), vec![])
}

/// Split a clip result into its largest-area component and the number of
/// non-degenerate components it had. Parts with area at or below `min_area`
/// are slivers left by the overlay and are not counted.
///
/// Ties keep the first component in overlay output order.
pub(crate) fn largest_polygon(parts: MultiPolygon<f64>, min_area: f64) -> (Option<Polygon<f64>>, usize) {
    let mut count = 0;
    let mut best: Option<(f64, Polygon<f64>)> = None;
    for polygon in parts {
        let area = polygon.unsigned_area();
        if area <= min_area { continue }
        count += 1;
        if best.as_ref().is_none_or(|(best_area, _)| area > *best_area) {
            best = Some((area, polygon));
        }
    }
    (best.map(|(_, polygon)| polygon), count)
}

/// Order `points` by angle around their mean, dropping near-duplicates, so
/// that the points of a convex cell form a simple counter-clockwise ring.
pub(crate) fn angular_sort(points: &[Coord<f64>], tol: f64) -> Vec<Coord<f64>> {
    if points.is_empty() { return Vec::new() }

    let n = points.len() as f64;
    let center = Coord {
        x: points.iter().map(|c| c.x).sum::<f64>() / n,
        y: points.iter().map(|c| c.y).sum::<f64>() / n,
    };

    let mut sorted = points.iter()
        .map(|&c| ((c.y - center.y).atan2(c.x - center.x), c))
        .collect::<Vec<_>>();
    sorted.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal)
        .then_with(|| a.1.x.partial_cmp(&b.1.x).unwrap_or(Ordering::Equal))
        .then_with(|| a.1.y.partial_cmp(&b.1.y).unwrap_or(Ordering::Equal)));

    let mut ring: Vec<Coord<f64>> = Vec::with_capacity(sorted.len());
    for (_, c) in sorted {
        if ring.iter().any(|r| (r.x - c.x).abs() <= tol && (r.y - c.y).abs() <= tol) { continue }
        ring.push(c);
    }
    ring
}

/// Clip an open convex ring to an axis-aligned rectangle (Sutherland-Hodgman).
///
/// Keeps coordinate magnitudes bounded before the ring meets the general
/// overlay, which works on a grid sized to its inputs.
pub(crate) fn clip_to_rect(ring: &[Coord<f64>], rect: Rect<f64>) -> Vec<Coord<f64>> {
    let (min, max) = (rect.min(), rect.max());
    let mut ring = ring.to_vec();
    for edge in 0..4 {
        if ring.is_empty() { break }
        let inside = |c: &Coord<f64>| match edge {
            0 => c.x >= min.x,
            1 => c.x <= max.x,
            2 => c.y >= min.y,
            _ => c.y <= max.y,
        };
        let crossing = |a: Coord<f64>, b: Coord<f64>| {
            let t = match edge {
                0 => (min.x - a.x) / (b.x - a.x),
                1 => (max.x - a.x) / (b.x - a.x),
                2 => (min.y - a.y) / (b.y - a.y),
                _ => (max.y - a.y) / (b.y - a.y),
            };
            let mut c = Coord { x: a.x + t * (b.x - a.x), y: a.y + t * (b.y - a.y) };
            match edge {
                0 => c.x = min.x,
                1 => c.x = max.x,
                2 => c.y = min.y,
                _ => c.y = max.y,
            }
            c
        };

        let mut clipped = Vec::with_capacity(ring.len() + 1);
        for i in 0..ring.len() {
            let (a, b) = (ring[i], ring[(i + 1) % ring.len()]);
            match (inside(&a), inside(&b)) {
                (true, true) => clipped.push(b),
                (true, false) => clipped.push(crossing(a, b)),
                (false, true) => { clipped.push(crossing(a, b)); clipped.push(b); }
                (false, false) => {}
            }
        }
        ring = clipped;
    }
    ring
}
