//! Projection from SVG user space into the map CRS.
//!
//! Offsets are applied once per coordinate, always in this order:
//! layer offset, then registration offset, then the height inversion
//! that flips the vertical axis and swaps the axes into `(row, column)`
//! order:
//!
//! ```text
//! x' = round(height - (y - layer.oy - registration.oy))
//! y' = round(x - layer.ox - registration.ox)
//! ```

use crate::types::{CrsRegistration, Geometry, Multipolygon, Offset, Point, Subpolygon};

/// Round to `precision` decimal places, half away from zero.
///
/// Negative zero is normalized to zero so it never prints as `-0`.
#[must_use]
pub fn round_to(value: f64, precision: u32) -> f64 {
    let scale = 10_f64.powi(i32::try_from(precision).unwrap_or(i32::MAX));
    if !scale.is_finite() {
        return value + 0.0;
    }
    (value * scale).round() / scale + 0.0
}

/// Layer offset and registration for one projection.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Projector {
    /// Translation of the layer holding the shapes.
    pub layer_offset: Offset,
    /// Global registration of the CRS.
    pub registration: CrsRegistration,
    /// Decimal places kept in projected values.
    pub precision: u32,
}

impl Projector {
    /// Create a projector.
    #[must_use]
    pub const fn new(layer_offset: Offset, registration: CrsRegistration, precision: u32) -> Self {
        Self {
            layer_offset,
            registration,
            precision,
        }
    }

    /// Project a single point.
    #[must_use]
    pub fn point(&self, point: Point) -> Point {
        project(point, self.layer_offset, self.registration, self.precision)
    }

    /// Project every point of a ring, keeping order.
    #[must_use]
    pub fn subpolygon(&self, ring: &Subpolygon) -> Subpolygon {
        Subpolygon::new(ring.points().iter().map(|&p| self.point(p)).collect())
    }

    /// Project every ring of a multipolygon, keeping order.
    #[must_use]
    pub fn multipolygon(&self, polygon: &Multipolygon) -> Multipolygon {
        Multipolygon::new(polygon.rings().iter().map(|r| self.subpolygon(r)).collect())
    }

    /// Project a shape geometry.
    ///
    /// Positions are projected; sizes (radii) are rounded but not
    /// translated, and rotation is rounded but not transformed.
    #[must_use]
    pub fn geometry(&self, geometry: &Geometry) -> Geometry {
        let round = |v: f64| round_to(v, self.precision);
        match geometry {
            Geometry::Marker(p) => Geometry::Marker(self.point(*p)),
            Geometry::Circle { center, radius } => Geometry::Circle {
                center: self.point(*center),
                radius: round(*radius),
            },
            Geometry::Ellipse {
                center,
                rx,
                ry,
                rotation,
            } => Geometry::Ellipse {
                center: self.point(*center),
                rx: round(*rx),
                ry: round(*ry),
                rotation: round(*rotation),
            },
            Geometry::Rect { corners } => Geometry::Rect {
                corners: corners.map(|c| self.point(c)),
            },
            Geometry::Polygon(polygon) => Geometry::Polygon(self.multipolygon(polygon)),
        }
    }
}

/// Project one point from SVG user space into the CRS.
#[must_use]
pub fn project(
    point: Point,
    layer_offset: Offset,
    registration: CrsRegistration,
    precision: u32,
) -> Point {
    let x = registration.height - (point.y - layer_offset.oy - registration.oy);
    let y = point.x - layer_offset.ox - registration.ox;
    Point::new(round_to(x, precision), round_to(y, precision))
}
