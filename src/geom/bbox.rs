use geo::Rect;
use rstar::{RTree, RTreeObject, AABB};

/// A bounding box in an R-tree, associated with an input geometry by index.
#[derive(Debug, Clone)]
pub(crate) struct BoundingBox {
    idx: usize, // Index of the corresponding geometry in the caller's slice
    bbox: Rect<f64>,
}

impl BoundingBox {
    pub(crate) fn new(idx: usize, bbox: Rect<f64>) -> Self {
        Self { idx, bbox }
    }

    /// Get the index of the corresponding geometry.
    #[inline] pub(crate) fn idx(&self) -> usize { self.idx }

    /// Bulk-load an R-tree from `(index, rect)` pairs.
    pub(crate) fn index(rects: impl IntoIterator<Item = (usize, Rect<f64>)>) -> RTree<Self> {
        RTree::bulk_load(rects.into_iter().map(|(idx, bbox)| Self::new(idx, bbox)).collect())
    }
}

impl RTreeObject for BoundingBox {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        envelope(&self.bbox, 0.0)
    }
}

/// R-tree envelope of `rect`, grown by `tol` on every side.
#[inline]
pub(crate) fn envelope(rect: &Rect<f64>, tol: f64) -> AABB<[f64; 2]> {
    AABB::from_corners(
        [rect.min().x - tol, rect.min().y - tol],
        [rect.max().x + tol, rect.max().y + tol],
    )
}
