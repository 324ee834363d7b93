use geo::{BoundingRect, LineString, Rect};

/// One record of the street-network dataset: a named centerline polyline.
#[derive(Clone, Debug, PartialEq)]
pub struct StreetSegment {
    pub id: String,
    /// Free-text street name, e.g. "Lexington Avenue" or "West 40 Street".
    pub name: String,
    pub line: LineString<f64>,
    pub borough: String,
}

impl StreetSegment {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        line: LineString<f64>,
        borough: impl Into<String>,
    ) -> Self {
        Self { id: id.into(), name: name.into(), line, borough: borough.into() }
    }

    /// Bounding rectangle of the centerline, `None` for an empty polyline.
    #[inline] pub fn bounds(&self) -> Option<Rect<f64>> { self.line.bounding_rect() }

    /// Case-insensitive borough comparison.
    #[inline]
    pub fn in_borough(&self, borough: &str) -> bool {
        self.borough.eq_ignore_ascii_case(borough)
    }
}
