use std::f64::consts::{FRAC_PI_8, TAU};

use anyhow::{anyhow, bail, Result};
use geo::Coord;
use spade::{DelaunayTriangulation, Point2, Triangulation};

use crate::geom::angular_sort;

/// Points closer than this (metres) are the same cell vertex.
const VERTEX_TOL: f64 = 1e-9;

#[inline]
fn coord(p: Point2<f64>) -> Coord<f64> { Coord { x: p.x, y: p.y } }

#[inline]
fn unit(c: Coord<f64>) -> Coord<f64> {
    let len = c.x.hypot(c.y);
    Coord { x: c.x / len, y: c.y / len }
}

/// A half-line on the boundary of an unbounded cell.
#[derive(Clone, Copy, Debug)]
struct Ray {
    origin: Coord<f64>,
    direction: Coord<f64>, // unit length
}

/// Voronoi cells of `sites` (metric coordinates), one open ring per site in
/// input order.
///
/// Bounded cells are the circumcenters of the Delaunay triangles around the
/// site. Cells of convex-hull sites are open; each of their open edges is
/// extended along its perpendicular bisector, toward the outer face of the
/// triangulation, to a synthetic vertex beyond `reach`, and the gap between
/// the two open edges is closed by an arc of far vertices. `reach` must be at
/// least the diameter of the region the cells will be clipped to.
///
/// Sites must be pairwise distinct.
pub(crate) fn voronoi_cells(sites: &[Coord<f64>], reach: f64) -> Result<Vec<Vec<Coord<f64>>>> {
    if sites.len() < 2 { bail!("need at least two sites, got {}", sites.len()) }

    let mut triangulation: DelaunayTriangulation<Point2<f64>> = DelaunayTriangulation::new();
    let handles = sites.iter().enumerate()
        .map(|(i, site)| triangulation.insert(Point2::new(site.x, site.y))
            .map_err(|err| anyhow!("cannot triangulate site {i} at ({}, {}): {err:?}", site.x, site.y)))
        .collect::<Result<Vec<_>>>()?;
    if triangulation.num_vertices() != sites.len() {
        bail!("{} sites collapsed to {} distinct positions", sites.len(), triangulation.num_vertices());
    }

    let n = sites.len() as f64;
    let centroid = Coord {
        x: sites.iter().map(|s| s.x).sum::<f64>() / n,
        y: sites.iter().map(|s| s.y).sum::<f64>() / n,
    };

    let cells = handles.iter().zip(sites)
        .map(|(&handle, &site)| {
            let vertex = triangulation.vertex(handle);
            let mut points = Vec::new();
            let mut rays = Vec::new();

            for edge in vertex.out_edges() {
                if let Some(face) = edge.face().as_inner() {
                    points.push(coord(face.circumcenter()));
                }

                let (left_outer, right_outer) = (edge.face().is_outer(), edge.rev().face().is_outer());
                if !left_outer && !right_outer { continue }

                let (a, b) = (coord(edge.from().position()), coord(edge.to().position()));
                let mid = Coord { x: (a.x + b.x) / 2.0, y: (a.y + b.y) / 2.0 };
                let normal = unit(Coord { x: a.y - b.y, y: b.x - a.x });

                if left_outer && right_outer {
                    // All sites collinear: the bisector is open in both directions.
                    rays.push(Ray { origin: mid, direction: normal });
                    rays.push(Ray { origin: mid, direction: -normal });
                } else {
                    // `normal` points to the left of the edge, where `face()` lies.
                    let (inner, direction) = if left_outer { (edge.rev().face(), normal) } else { (edge.face(), -normal) };
                    let origin = inner.as_inner().map(|face| coord(face.circumcenter())).unwrap_or(mid);
                    rays.push(Ray { origin, direction });
                }
            }

            if rays.is_empty() { return angular_sort(&points, VERTEX_TOL) }

            // Far enough that the closing chords clear the clip region.
            let far = 4.0 * reach + points.iter()
                .map(|p| (p.x - site.x).hypot(p.y - site.y))
                .fold(0.0, f64::max);

            points.extend(rays.iter().map(|ray| ray.origin + ray.direction * far));

            if let [first, second] = rays[..] {
                let through = {
                    let sum = first.direction + second.direction;
                    // Nearly opposite rays leave the side ambiguous; the hull faces away from the centroid.
                    if sum.x.hypot(sum.y) > 1e-6 { sum } else { Coord { x: site.x - centroid.x, y: site.y - centroid.y } }
                };
                points.extend(arc(first.direction, second.direction, through).into_iter()
                    .map(|theta| Coord { x: site.x + far * theta.cos(), y: site.y + far * theta.sin() }));
            }

            angular_sort(&points, VERTEX_TOL)
        })
        .collect();

    Ok(cells)
}

/// Interior angles (exclusive of both ends) sampling the arc from direction
/// `from` to direction `to` that passes through direction `through`, at most
/// π/8 apart.
fn arc(from: Coord<f64>, to: Coord<f64>, through: Coord<f64>) -> Vec<f64> {
    let angle = |c: Coord<f64>| c.y.atan2(c.x);
    let (a0, a1, at) = (angle(from), angle(to), angle(through));

    // Counter-clockwise sweep from `from` to `to`, or the complementary one.
    let ccw = (a1 - a0).rem_euclid(TAU);
    let (start, sweep) = if (at - a0).rem_euclid(TAU) <= ccw { (a0, ccw) } else { (a1, TAU - ccw) };
    if sweep < 1e-12 { return Vec::new() }

    let steps = (sweep / FRAC_PI_8 - 1e-9).ceil().max(1.0) as usize;
    (1..steps).map(|k| start + sweep * k as f64 / steps as f64).collect()
}
