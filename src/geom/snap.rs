use geo::{Coord, LineString, Polygon};
use rstar::{primitives::GeomWithData, RTree};

/// Snap near-coincident vertices to a canonical position, repairing the
/// floating-point drift that independent overlay operations leave along
/// boundaries that should be shared exactly.
///
/// `rings` is a flat slice over all shapes; each entry is the list of rings
/// (outer + holes) for one shape, and each ring is an open sequence of
/// coordinates (no repeated closing coordinate). Coordinates are modified in
/// place. Every cluster of vertices within `tolerance` of its first member
/// collapses onto that first member, where "first" is the order of `rings`;
/// the result therefore depends only on the input, never on R-tree layout.
///
/// Consecutive vertices that become identical are merged.
pub(crate) fn snap_vertices(rings: &mut [Vec<Vec<Coord<f64>>>], tolerance: f64) {
    if tolerance <= 0.0 { return }

    let coords = rings.iter()
        .flat_map(|shape| shape.iter().flatten())
        .copied()
        .collect::<Vec<_>>();

    let tree = RTree::bulk_load(
        coords.iter().enumerate()
            .map(|(i, c)| GeomWithData::new([c.x, c.y], i))
            .collect()
    );

    // Canonical coordinate for every vertex, assigned in input order.
    let mut canonical: Vec<Option<Coord<f64>>> = vec![None; coords.len()];
    for i in 0..coords.len() {
        if canonical[i].is_some() { continue }
        let anchor = coords[i];
        canonical[i] = Some(anchor);
        for near in tree.locate_within_distance([anchor.x, anchor.y], tolerance * tolerance) {
            canonical[near.data].get_or_insert(anchor);
        }
    }

    let mut next = 0;
    for ring in rings.iter_mut().flat_map(|shape| shape.iter_mut()) {
        for coord in ring.iter_mut() {
            if let Some(c) = canonical[next] { *coord = c }
            next += 1;
        }
        ring.dedup();
        while ring.len() > 1 && ring.first() == ring.last() { ring.pop(); }
    }
}

/// Apply [`snap_vertices`] across a set of polygons.
///
/// Holes that collapse below three vertices are dropped; a polygon whose
/// exterior collapses is left unsnapped.
pub(crate) fn snap_polygons(polygons: &mut [Polygon<f64>], tolerance: f64) {
    fn open_ring(ring: &LineString<f64>) -> Vec<Coord<f64>> {
        let mut coords = ring.0.clone();
        if coords.len() > 1 && coords.first() == coords.last() { coords.pop(); }
        coords
    }

    let mut rings = polygons.iter()
        .map(|polygon| std::iter::once(polygon.exterior())
            .chain(polygon.interiors())
            .map(open_ring)
            .collect::<Vec<_>>())
        .collect::<Vec<_>>();

    snap_vertices(&mut rings, tolerance);

    for (polygon, shape) in polygons.iter_mut().zip(rings) {
        let mut shape = shape.into_iter();
        let Some(exterior) = shape.next() else { continue };
        if exterior.len() < 3 { continue }
        let interiors = shape
            .filter(|ring| ring.len() >= 3)
            .map(LineString::from)
            .collect();
        *polygon = Polygon::new(LineString::from(exterior), interiors);
    }
}
