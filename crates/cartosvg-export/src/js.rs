//! Bracket notation for the map client.
//!
//! The client evaluates coordinates as JavaScript array literals, so the
//! exact spacing is part of the contract:
//!
//! - point: `[x,y]` (no spaces);
//! - ring: `[ [x,y], [x,y] ]`;
//! - one-ring polygon: the ring itself, without an outer wrapper;
//! - several rings: `[ ring, ring ]`;
//! - nothing at all: `[]`.
//!
//! Numbers use the shortest `Display` form of the already rounded value
//! (`100`, `1.5`, `-3.25`).
//!
//! This is a pure function set with no I/O -- every function returns a
//! `String`.

use std::fmt::Write;

use cartosvg_pipeline::{Geometry, Multipolygon, Point, Subpolygon};

fn write_point(out: &mut String, point: Point) {
    let _ = write!(out, "[{},{}]", point.x, point.y);
}

/// Write `[ a, b, c ]`, or `[]` when there are no items.
fn write_list<T>(out: &mut String, items: &[T], mut item: impl FnMut(&mut String, &T)) {
    if items.is_empty() {
        out.push_str("[]");
        return;
    }
    out.push_str("[ ");
    for (i, value) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        item(out, value);
    }
    out.push_str(" ]");
}

fn write_ring(out: &mut String, ring: &Subpolygon) {
    write_list(out, ring.points(), |out, p| write_point(out, *p));
}

fn write_multipolygon(out: &mut String, polygon: &Multipolygon) {
    match polygon.rings() {
        [single] => write_ring(out, single),
        rings => write_list(out, rings, write_ring),
    }
}

/// `[x,y]`
#[must_use]
pub fn point_js(point: Point) -> String {
    let mut out = String::new();
    write_point(&mut out, point);
    out
}

/// `[ [x,y], [x,y], ... ]`
#[must_use]
pub fn ring_js(ring: &Subpolygon) -> String {
    let mut out = String::new();
    write_ring(&mut out, ring);
    out
}

/// A single ring unwrapped, several rings wrapped once more.
///
/// # Examples
///
/// ```
/// use cartosvg_export::multipolygon_js;
/// use cartosvg_pipeline::{Multipolygon, Point, Subpolygon};
///
/// let square = Subpolygon::new(vec![Point::new(0.0, 0.0), Point::new(1.5, 0.0)]);
/// let polygon = Multipolygon::new(vec![square]);
/// assert_eq!(multipolygon_js(&polygon), "[ [0,0], [1.5,0] ]");
/// ```
#[must_use]
pub fn multipolygon_js(polygon: &Multipolygon) -> String {
    let mut out = String::new();
    write_multipolygon(&mut out, polygon);
    out
}

/// Notation for any projected geometry.
///
/// Rects become their two corners as a ring, ellipses become
/// `[ [cx,cy], [rx,ry], rotation ]`, and circles and markers become
/// their center point (a circle's radius travels separately).
#[must_use]
pub fn geometry_js(geometry: &Geometry) -> String {
    let mut out = String::new();
    match geometry {
        Geometry::Marker(center) | Geometry::Circle { center, .. } => {
            write_point(&mut out, *center);
        }
        Geometry::Rect { corners } => {
            write_list(&mut out, corners.as_slice(), |out, p| write_point(out, *p));
        }
        Geometry::Ellipse {
            center,
            rx,
            ry,
            rotation,
        } => {
            out.push_str("[ ");
            write_point(&mut out, *center);
            out.push_str(", ");
            write_point(&mut out, Point::new(*rx, *ry));
            let _ = write!(out, ", {rotation} ]");
        }
        Geometry::Polygon(polygon) => write_multipolygon(&mut out, polygon),
    }
    out
}
