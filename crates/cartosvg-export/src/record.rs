//! Output records handed to the map client as JSON.
//!
//! Field names are camelCase and absent optional values are omitted,
//! matching what the client's layer loader reads.

use std::collections::BTreeMap;
use std::fmt::Write;

use cartosvg_pipeline::{Geometry, ImageInfo, ParsedShape, Point};
use serde::Serialize;
use serde_json::{Value, json};

use crate::js::geometry_js;

/// One shape as delivered to the client.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeRecord {
    /// Element `id`, empty when the element has none.
    pub id: String,
    /// `inkscape:label`, or the id when unlabelled.
    pub label: String,
    /// `polygon`, `rect`, `circle`, `ellipse` or `marker`.
    pub kind: String,
    /// Name the shape's layer was requested by.
    pub layer: String,
    /// Projected coordinates as nested arrays.
    pub coords: Value,
    /// The same coordinates in bracket notation.
    pub js: String,
    /// Fill color as `#rrggbb`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<String>,
    /// Fill opacity in `0..=1`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_opacity: Option<f64>,
    /// `nonzero` when the style sets it; absent means the client default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_rule: Option<String>,
    /// Stroke color as `#rrggbb`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    /// Stroke width in user units.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_width: Option<f64>,
    /// Stroke opacity in `0..=1`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_opacity: Option<f64>,
    /// HTML-escaped text of the first `<title>` child.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// HTML-escaped text of the first `<desc>` child.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    /// Radius of circles and degraded ellipses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    /// Event handler source keyed by attribute name.
    pub interactive: BTreeMap<String, String>,
    /// Whether the geometry is usable; `false` only appears when empty
    /// elements are allowed.
    pub valid: bool,
}

fn point_value(point: Point) -> Value {
    json!([point.x, point.y])
}

/// Coordinates of a geometry as JSON arrays.
///
/// Unlike the bracket notation, polygons always keep their ring list,
/// even with a single ring.
#[must_use]
pub fn coords_value(geometry: &Geometry) -> Value {
    match geometry {
        Geometry::Marker(center) | Geometry::Circle { center, .. } => point_value(*center),
        Geometry::Rect { corners } => Value::Array(corners.iter().copied().map(point_value).collect()),
        Geometry::Ellipse {
            center,
            rx,
            ry,
            rotation,
        } => json!([point_value(*center), [rx, ry], rotation]),
        Geometry::Polygon(polygon) => Value::Array(
            polygon
                .rings()
                .iter()
                .map(|ring| Value::Array(ring.points().iter().copied().map(point_value).collect()))
                .collect(),
        ),
    }
}

impl ShapeRecord {
    /// Build the client record of a parsed shape.
    #[must_use]
    pub fn from_parsed(shape: &ParsedShape) -> Self {
        let style = &shape.style;
        Self {
            id: shape.id.clone(),
            label: shape.label.clone(),
            kind: shape.kind().to_owned(),
            layer: shape.layer.clone(),
            coords: coords_value(&shape.geometry),
            js: geometry_js(&shape.geometry),
            fill_color: style.fill_color.clone(),
            fill_opacity: style.fill_opacity,
            fill_rule: style.fill_rule.clone(),
            border_color: style.border_color.clone(),
            border_width: style.border_width,
            border_opacity: style.border_opacity,
            title: shape.title.clone(),
            desc: shape.desc.clone(),
            radius: shape.geometry.radius(),
            interactive: shape.interactive.clone(),
            valid: shape.valid,
        }
    }
}

impl From<&ParsedShape> for ShapeRecord {
    fn from(shape: &ParsedShape) -> Self {
        Self::from_parsed(shape)
    }
}

/// Placement of one background image.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRecord {
    /// Image width in user units.
    pub width: f64,
    /// Image height in user units.
    pub height: f64,
    /// Left edge, including the layer translation.
    pub ox: f64,
    /// Top edge, including the layer translation.
    pub oy: f64,
    /// `xlink:href` (or plain `href`) of the image.
    pub href: String,
    /// `false` for the placeholder returned for a missing index.
    pub is_present: bool,
}

impl From<&ImageInfo> for ImageRecord {
    fn from(image: &ImageInfo) -> Self {
        Self {
            width: image.width,
            height: image.height,
            ox: image.ox,
            oy: image.oy,
            href: image.href.clone(),
            is_present: image.is_present,
        }
    }
}

/// Everything exported from one shapes layer.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct LayerExport {
    /// Name of the shapes layer.
    pub layer: String,
    /// Images of the background layer, if one was read.
    pub images: Vec<ImageRecord>,
    /// Shapes in layer order.
    pub shapes: Vec<ShapeRecord>,
}

impl LayerExport {
    /// Collect parsed shapes and images into one export.
    #[must_use]
    pub fn new(layer: &str, shapes: &[ParsedShape], images: &[ImageInfo]) -> Self {
        Self {
            layer: layer.to_owned(),
            images: images.iter().map(ImageRecord::from).collect(),
            shapes: shapes.iter().map(ShapeRecord::from).collect(),
        }
    }
}

/// Serialize an export to JSON.
///
/// # Errors
///
/// Returns the serializer error if a value cannot be represented
/// (non-finite numbers serialize as `null`, so this is not expected for
/// records built by this crate).
pub fn to_json(export: &LayerExport, pretty: bool) -> Result<String, serde_json::Error> {
    if pretty {
        serde_json::to_string_pretty(export)
    } else {
        serde_json::to_string(export)
    }
}

/// One `id<TAB>js` line per shape.
#[must_use]
pub fn js_listing(export: &LayerExport) -> String {
    let mut out = String::new();
    for shape in &export.shapes {
        let _ = writeln!(out, "{}\t{}", shape.id, shape.js);
    }
    out
}
