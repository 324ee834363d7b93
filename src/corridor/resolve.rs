use anyhow::{bail, Result};
use geo::{line_intersection::{line_intersection, LineIntersection}, BoundingRect, Coord, Intersects, LineString, Rect};
use tracing::{debug, info};

use crate::corridor::{bounds::CorridorBounds, predicate::check_predicates, Corner, CornerPredicate};
use crate::geom::{envelope, BoundingBox};
use crate::types::StreetSegment;
use crate::ConfigError;

/// Crossings closer than this (in input units) count as the same point.
const SAME_POINT_TOL: f64 = 1e-12;

/// Resolve the four corridor corners from named street geometry.
///
/// Candidate segments are those whose name could satisfy some predicate and
/// whose bounding box meets the rough `search` box. Pairs are visited in
/// ascending input order (`i < j`); a pair is considered only when the two
/// polylines cross in exactly one point. The first pair to satisfy a corner's
/// predicate fixes that corner. A pair satisfying two predicates at once is a
/// configuration conflict.
pub fn resolve_corridor(
    streets: &[StreetSegment],
    predicates: &[CornerPredicate],
    search: Rect<f64>,
    margin: f64,
) -> Result<CorridorBounds> {
    check_predicates(predicates)?;

    let names = streets.iter().map(|s| s.name.to_lowercase()).collect::<Vec<_>>();

    // Pre-filter: plausible names inside the rough search box.
    let mut candidates = streets.iter().enumerate()
        .filter(|&(i, _)| predicates.iter().any(|p| p.mentions(&names[i])))
        .filter_map(|(i, street)| street.bounds().map(|rect| (i, rect)))
        .filter(|(_, rect)| search.intersects(rect))
        .collect::<Vec<_>>();
    candidates.sort_unstable_by_key(|&(i, _)| i);

    info!(segments = streets.len(), candidates = candidates.len(), "resolving corridor corners");

    let tree = BoundingBox::index(candidates.iter().copied());
    let mut found: [Option<Coord<f64>>; 4] = [None; 4];

    for &(i, rect) in &candidates {
        let mut partners = tree.locate_in_envelope_intersecting(&envelope(&rect, 0.0))
            .map(|b| b.idx())
            .filter(|&j| j > i)
            .collect::<Vec<_>>();
        partners.sort_unstable();

        for j in partners {
            let Some(point) = single_crossing(&streets[i].line, &streets[j].line) else { continue };

            let mut matched = predicates.iter().filter(|p| p.matches_pair(&names[i], &names[j]));
            let Some(predicate) = matched.next() else { continue };
            if let Some(other) = matched.next() {
                bail!(ConfigError::CornerConflict {
                    first: streets[i].name.clone(),
                    second: streets[j].name.clone(),
                    a: predicate.corner(),
                    b: other.corner(),
                });
            }

            let slot = &mut found[predicate.corner().index()];
            if slot.is_none() {
                debug!(corner = %predicate.corner(), first = %streets[i].name, second = %streets[j].name,
                    x = point.x, y = point.y, "resolved corner");
                *slot = Some(point);
            }
        }
    }

    let [Some(nw), Some(ne), Some(se), Some(sw)] = found else {
        let missing = Corner::ALL.iter().copied()
            .filter(|c| found[c.index()].is_none())
            .collect::<Vec<_>>();
        bail!(ConfigError::MissingCorners { found: 4 - missing.len(), missing });
    };

    CorridorBounds::new([nw, ne, se, sw], margin)
}

/// The unique point where two polylines meet, or `None` if they do not meet,
/// overlap along a line, or meet in more than one place.
pub(crate) fn single_crossing(a: &LineString<f64>, b: &LineString<f64>) -> Option<Coord<f64>> {
    let mut point: Option<Coord<f64>> = None;
    for la in a.lines() {
        let ra = la.bounding_rect();
        for lb in b.lines() {
            if !ra.intersects(&lb.bounding_rect()) { continue }
            match line_intersection(la, lb) {
                None => {}
                Some(LineIntersection::Collinear { .. }) => return None,
                Some(LineIntersection::SinglePoint { intersection, .. }) => match point {
                    None => point = Some(intersection),
                    Some(p) if (p.x - intersection.x).abs() <= SAME_POINT_TOL
                        && (p.y - intersection.y).abs() <= SAME_POINT_TOL => {}
                    Some(_) => return None,
                },
            }
        }
    }
    point
}

#[cfg(test)]
mod tests {
    use geo::{coord, line_string};

    use super::*;

    #[test]
    fn crossing_at_shared_vertex_is_exact() {
        let a = line_string![(x: -1.0, y: 0.0), (x: 0.5, y: 0.25), (x: 1.0, y: 0.0)];
        let b = line_string![(x: 0.5, y: -1.0), (x: 0.5, y: 0.25), (x: 0.5, y: 1.0)];
        assert_eq!(single_crossing(&a, &b), Some(coord! { x: 0.5, y: 0.25 }));
    }

    #[test]
    fn proper_crossing_is_found() {
        let a = line_string![(x: -1.0, y: 0.0), (x: 1.0, y: 0.0)];
        let b = line_string![(x: 0.0, y: -1.0), (x: 0.0, y: 1.0)];
        let point = single_crossing(&a, &b).unwrap();
        assert!(point.x.abs() < 1e-12 && point.y.abs() < 1e-12);
    }

    #[test]
    fn overlap_is_not_a_crossing() {
        let a = line_string![(x: 0.0, y: 0.0), (x: 2.0, y: 0.0)];
        let b = line_string![(x: 1.0, y: 0.0), (x: 3.0, y: 0.0)];
        assert_eq!(single_crossing(&a, &b), None);
    }

    #[test]
    fn two_crossings_are_not_a_single_point() {
        let a = line_string![(x: 0.0, y: 0.0), (x: 4.0, y: 0.0)];
        let b = line_string![(x: 1.0, y: -1.0), (x: 1.0, y: 1.0), (x: 3.0, y: 1.0), (x: 3.0, y: -1.0)];
        assert_eq!(single_crossing(&a, &b), None);
    }

    #[test]
    fn disjoint_lines_do_not_cross() {
        let a = line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0)];
        let b = line_string![(x: 0.0, y: 1.0), (x: 1.0, y: 1.0)];
        assert_eq!(single_crossing(&a, &b), None);
    }
}
