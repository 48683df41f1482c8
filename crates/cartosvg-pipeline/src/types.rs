//! Shared types for the cartosvg parsing pipeline.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::style::ShapeStyle;

/// A 2D point, either in SVG user space or in the map CRS.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position (or CRS row after projection).
    pub x: f64,
    /// Vertical position (or CRS column after projection).
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The origin, `(0, 0)`.
    pub const ORIGIN: Self = Self::new(0.0, 0.0);

    /// Component-wise sum, used for relative pen movement.
    #[must_use]
    pub fn offset_by(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// One closed ring of a polygon, in source order.
///
/// The closing point is not repeated: a square parsed from
/// `M 0,0 L 1,0 L 1,1 L 0,1 Z` holds four points.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Subpolygon(Vec<Point>);

impl Subpolygon {
    /// Create a new ring from a vector of points.
    #[must_use]
    pub const fn new(points: Vec<Point>) -> Self {
        Self(points)
    }

    /// Returns `true` if the ring has no points.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of points in the ring.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns the first point, if any.
    #[must_use]
    pub fn first(&self) -> Option<&Point> {
        self.0.first()
    }

    /// Returns a slice of all points.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.0
    }

    /// Append a point to the end of the ring.
    pub fn push(&mut self, point: Point) {
        self.0.push(point);
    }

    /// Consumes the ring and returns the underlying vector of points.
    #[must_use]
    pub fn into_points(self) -> Vec<Point> {
        self.0
    }
}

/// The ordered rings produced by parsing one `<path>` element.
///
/// Empty when the path data was rejected (curves, arcs, missing
/// close-path) or contained no usable points.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Multipolygon(Vec<Subpolygon>);

impl Multipolygon {
    /// Create a multipolygon from its rings.
    #[must_use]
    pub const fn new(rings: Vec<Subpolygon>) -> Self {
        Self(rings)
    }

    /// Returns `true` if there are no rings.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of rings.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if at least one ring holds a point.  Consecutive
    /// close-paths or fully malformed operands leave empty rings behind.
    #[must_use]
    pub fn has_points(&self) -> bool {
        self.0.iter().any(|ring| !ring.is_empty())
    }

    /// Returns a slice of all rings.
    #[must_use]
    pub fn rings(&self) -> &[Subpolygon] {
        &self.0
    }

    /// Append a ring.
    pub fn push(&mut self, ring: Subpolygon) {
        self.0.push(ring);
    }

    /// Consumes the multipolygon and returns the rings.
    #[must_use]
    pub fn into_rings(self) -> Vec<Subpolygon> {
        self.0
    }
}

/// Translation taken from a `translate(ox, oy)` transform.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Offset {
    /// Horizontal translation.
    pub ox: f64,
    /// Vertical translation.
    pub oy: f64,
}

impl Offset {
    /// Create a new offset.
    #[must_use]
    pub const fn new(ox: f64, oy: f64) -> Self {
        Self { ox, oy }
    }
}

/// Global projection parameters mapping SVG user space onto the map CRS.
///
/// `ox`/`oy` locate the registration origin (usually the background
/// image corner) and `height` is the canvas height used for the
/// vertical flip.  The all-zero default leaves coordinates untranslated
/// apart from the axis swap.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CrsRegistration {
    /// Registration origin, horizontal.
    pub ox: f64,
    /// Registration origin, vertical.
    pub oy: f64,
    /// Canvas height used for the axis flip.
    pub height: f64,
}

impl CrsRegistration {
    /// Create a new registration.
    #[must_use]
    pub const fn new(ox: f64, oy: f64, height: f64) -> Self {
        Self { ox, oy, height }
    }

    /// Register the CRS on a background image: its placed origin and its
    /// height.
    #[must_use]
    pub const fn from_image(image: &ImageInfo) -> Self {
        Self::new(image.ox, image.oy, image.height)
    }
}

/// Placement of one `<image>` element on an image layer.
///
/// `ox`/`oy` already include the layer translation.  The default value
/// stands in for a missing image and has `is_present == false`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ImageInfo {
    /// Image width in user units.
    pub width: f64,
    /// Image height in user units.
    pub height: f64,
    /// Placed origin, horizontal.
    pub ox: f64,
    /// Placed origin, vertical.
    pub oy: f64,
    /// `xlink:href` of the image (often a relative file name or data URI).
    pub href: String,
    /// Whether an image was found at the requested index.
    pub is_present: bool,
}

/// Configuration for shape parsing.
///
/// Passed by reference into every adapter call; nothing about a parse is
/// remembered between calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseConfig {
    /// Keep shapes whose geometry is invalid (empty path, zero-size rect,
    /// zero radius) instead of dropping them from layer output.
    pub allow_empty_elements: bool,

    /// Emit ellipses as ellipses.  When `false` an ellipse degrades to a
    /// circle of radius `(rx + ry) / 2`.
    pub allow_ellipse: bool,

    /// Number of decimal places kept in every output coordinate and size.
    pub round_precision: u32,

    /// Resolve vendor attributes (`inkscape:*`, `sodipodi:*`) by namespace.
    /// When `false` they are recovered from raw element markup only.
    pub register_namespaces: bool,
}

impl ParseConfig {
    /// Default for [`allow_empty_elements`](Self::allow_empty_elements).
    pub const DEFAULT_ALLOW_EMPTY_ELEMENTS: bool = false;
    /// Default for [`allow_ellipse`](Self::allow_ellipse).
    pub const DEFAULT_ALLOW_ELLIPSE: bool = false;
    /// Default for [`round_precision`](Self::round_precision).
    pub const DEFAULT_ROUND_PRECISION: u32 = 4;
    /// Default for [`register_namespaces`](Self::register_namespaces).
    pub const DEFAULT_REGISTER_NAMESPACES: bool = true;
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            allow_empty_elements: Self::DEFAULT_ALLOW_EMPTY_ELEMENTS,
            allow_ellipse: Self::DEFAULT_ALLOW_ELLIPSE,
            round_precision: Self::DEFAULT_ROUND_PRECISION,
            register_namespaces: Self::DEFAULT_REGISTER_NAMESPACES,
        }
    }
}

/// The element kind a shape was declared with (its tag name).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    /// `<path>`; may turn out to be a marker (Inkscape spiral).
    Path,
    /// `<rect>`.
    Rect,
    /// `<circle>`.
    Circle,
    /// `<ellipse>`.
    Ellipse,
}

impl ShapeKind {
    /// All kinds, in the order layers are scanned.
    pub const ALL: [Self; 4] = [Self::Path, Self::Rect, Self::Circle, Self::Ellipse];

    /// SVG tag name of this kind.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Path => "path",
            Self::Rect => "rect",
            Self::Circle => "circle",
            Self::Ellipse => "ellipse",
        }
    }
}

/// Geometry of one shape, before or after CRS projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Geometry {
    /// A point of interest (spiral center).
    Marker(Point),
    /// A circle (also a degraded ellipse).
    Circle {
        /// Center point.
        center: Point,
        /// Radius in user units.
        radius: f64,
    },
    /// An ellipse, kept when ellipse support is enabled.
    Ellipse {
        /// Center point.
        center: Point,
        /// Horizontal radius.
        rx: f64,
        /// Vertical radius.
        ry: f64,
        /// Rotation in degrees from the element's `rotate()` transform.
        rotation: f64,
    },
    /// Two opposite corners of a rectangle.
    Rect {
        /// `(x, y)` and `(x + width, y + height)`.
        corners: [Point; 2],
    },
    /// Closed rings from path data.
    Polygon(Multipolygon),
}

impl Geometry {
    /// The kind name reported to the map client.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Marker(_) => "marker",
            Self::Circle { .. } => "circle",
            Self::Ellipse { .. } => "ellipse",
            Self::Rect { .. } => "rect",
            Self::Polygon(_) => "polygon",
        }
    }

    /// Radius, for circles only.
    #[must_use]
    pub const fn radius(&self) -> Option<f64> {
        match self {
            Self::Circle { radius, .. } => Some(*radius),
            _ => None,
        }
    }
}

/// The fully parsed and projected form of one shape element.
///
/// Built once by [`parse_shape`](crate::parse_shape) and never mutated
/// afterwards.  Invalid shapes are still returned, carrying whatever
/// metadata could be read, so callers can decide whether to keep them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedShape {
    /// `id` attribute (empty when absent).
    pub id: String,
    /// `inkscape:label`, falling back to `id`.
    pub label: String,
    /// Name of the layer the shape was read from.
    pub layer: String,
    /// Projected geometry.
    pub geometry: Geometry,
    /// Fill and border attributes.
    pub style: ShapeStyle,
    /// HTML-escaped text of the `<title>` child.
    pub title: Option<String>,
    /// HTML-escaped text of the `<desc>` child.
    pub desc: Option<String>,
    /// Event handler attributes, keyed by attribute name.
    pub interactive: BTreeMap<String, String>,
    /// Whether the geometry is usable.
    pub valid: bool,
}

impl ParsedShape {
    /// The kind name reported to the map client.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        self.geometry.kind_name()
    }
}

/// Reasons path data is refused before tokenizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum UnsupportedPath {
    /// The `d` attribute is empty or whitespace.
    #[error("path data is empty")]
    Empty,

    /// The path does not end with a close-path command.
    #[error("path data does not end with a close-path command")]
    Unterminated,

    /// The path contains a curve or arc command.
    #[error("path data contains unsupported curve or arc command `{0}`")]
    Curve(char),
}
