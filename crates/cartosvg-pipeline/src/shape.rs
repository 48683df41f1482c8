//! Shape adapters: one element in, one [`ParsedShape`] out.
//!
//! Each declared kind has its own geometry reader.  A `<path>` carrying
//! `sodipodi:type="spiral"` is not a polygon at all but a point of
//! interest placed at the spiral center.
//!
//! Adapters never fail.  Unusable geometry is reported through
//! [`ParsedShape::valid`] and the shape still carries its metadata.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use crate::element::{ShapeElement, Vendor, vendor_attribute};
use crate::path::parse_path;
use crate::project::{Projector, round_to};
use crate::style::{LayerDefaults, html_escape, parse_style};
use crate::transform::parse_rotate;
use crate::types::{CrsRegistration, Geometry, Offset, ParseConfig, ParsedShape, Point, ShapeKind};

/// Event handler attributes passed through to the map client.
pub const INTERACTIVE_ATTRIBUTES: [&str; 8] = [
    "onclick",
    "onmouseover",
    "onmouseout",
    "onmousedown",
    "onmousemove",
    "onfocusin",
    "onfocusout",
    "onload",
];

#[allow(clippy::expect_used)] // literal pattern, verified by tests
static NUMERIC_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*[-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?").expect("valid number pattern")
});

/// Per-layer inputs of a shape parse.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayerContext<'a> {
    /// Layer name, copied into every shape.
    pub name: &'a str,
    /// Translation of the layer group.
    pub offset: Offset,
    /// Fallback presentation for the layer's shapes.
    pub defaults: Option<&'a LayerDefaults>,
}

impl<'a> LayerContext<'a> {
    /// Create a context without defaults.
    #[must_use]
    pub const fn new(name: &'a str, offset: Offset) -> Self {
        Self {
            name,
            offset,
            defaults: None,
        }
    }

    /// Attach layer defaults.
    #[must_use]
    pub const fn with_defaults(mut self, defaults: &'a LayerDefaults) -> Self {
        self.defaults = Some(defaults);
        self
    }
}

/// Read the numeric prefix of an attribute value (`"12px"` is 12).
///
/// Missing, non-numeric or overflowing text reads as zero.
#[must_use]
pub fn lenient_number(text: &str) -> f64 {
    NUMERIC_PREFIX
        .find(text)
        .and_then(|m| m.as_str().trim_start().parse().ok())
        .filter(|v: &f64| v.is_finite())
        .unwrap_or(0.0)
}

fn number<E: ShapeElement + ?Sized>(element: &E, name: &str) -> f64 {
    element.attribute(None, name).map_or(0.0, lenient_number)
}

fn is_spiral<E: ShapeElement + ?Sized>(element: &E, config: &ParseConfig) -> bool {
    vendor_attribute(element, Vendor::Sodipodi, "type", config).is_some_and(|t| t == "spiral")
}

/// Read the unprojected geometry of an element and judge its validity.
///
/// Sizes are compared after rounding at the configured precision, so a
/// radius of `0.00001` is invalid at the default precision of 4.
pub fn adapt<E: ShapeElement + ?Sized>(
    element: &E,
    kind: ShapeKind,
    config: &ParseConfig,
) -> (Geometry, bool) {
    let precision = config.round_precision;
    let is_zero = |v: f64| round_to(v, precision) == 0.0;

    match kind {
        ShapeKind::Path if is_spiral(element, config) => {
            let cx = vendor_attribute(element, Vendor::Sodipodi, "cx", config);
            let cy = vendor_attribute(element, Vendor::Sodipodi, "cy", config);
            let valid = cx.is_some() && cy.is_some();
            let center = Point::new(
                cx.as_deref().map_or(0.0, lenient_number),
                cy.as_deref().map_or(0.0, lenient_number),
            );
            (Geometry::Marker(center), valid)
        }
        ShapeKind::Path => {
            let polygon = parse_path(element.attribute(None, "d").unwrap_or_default());
            let valid = polygon.has_points();
            (Geometry::Polygon(polygon), valid)
        }
        ShapeKind::Rect => {
            let x = number(element, "x");
            let y = number(element, "y");
            let width = number(element, "width");
            let height = number(element, "height");
            let corners = [Point::new(x, y), Point::new(x + width, y + height)];
            (Geometry::Rect { corners }, !is_zero(width + height))
        }
        ShapeKind::Circle => {
            let center = Point::new(number(element, "cx"), number(element, "cy"));
            let radius = number(element, "r");
            (Geometry::Circle { center, radius }, !is_zero(radius))
        }
        ShapeKind::Ellipse => {
            let center = Point::new(number(element, "cx"), number(element, "cy"));
            let rx = number(element, "rx");
            let ry = number(element, "ry");
            let valid = !is_zero(rx + ry);
            let geometry = if config.allow_ellipse {
                Geometry::Ellipse {
                    center,
                    rx,
                    ry,
                    rotation: parse_rotate(element.attribute(None, "transform").unwrap_or_default()),
                }
            } else {
                Geometry::Circle {
                    center,
                    radius: (rx + ry) / 2.0,
                }
            };
            (geometry, valid)
        }
    }
}

fn child_text<E: ShapeElement>(element: &E, tag: &str) -> Option<String> {
    element
        .children(tag)
        .first()
        .and_then(ShapeElement::text)
        .filter(|text| !text.is_empty())
        .map(html_escape)
}

/// Parse one shape element of a layer into its projected record.
///
/// Pure: the same element, layer, registration and configuration always
/// produce the same record.
pub fn parse_shape<E: ShapeElement>(
    element: &E,
    kind: ShapeKind,
    layer: &LayerContext<'_>,
    registration: CrsRegistration,
    config: &ParseConfig,
) -> ParsedShape {
    let (geometry, valid) = adapt(element, kind, config);
    let projector = Projector::new(layer.offset, registration, config.round_precision);

    let id = element.attribute(None, "id").unwrap_or_default().to_owned();
    let label = vendor_attribute(element, Vendor::Inkscape, "label", config)
        .unwrap_or_else(|| id.clone());

    let mut style = parse_style(
        element.attribute(None, "style").unwrap_or_default(),
        config.round_precision,
    );
    if let Some(defaults) = layer.defaults {
        defaults.apply(&mut style);
    }

    let interactive: BTreeMap<String, String> = INTERACTIVE_ATTRIBUTES
        .iter()
        .filter_map(|&name| {
            element
                .attribute(None, name)
                .map(|handler| (name.to_owned(), handler.to_owned()))
        })
        .collect();

    let shape = ParsedShape {
        geometry: projector.geometry(&geometry),
        title: child_text(element, "title"),
        desc: child_text(element, "desc"),
        layer: layer.name.to_owned(),
        id,
        label,
        style,
        interactive,
        valid,
    };
    trace!(id = %shape.id, kind = shape.kind(), valid, "parsed shape");
    shape
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::element::fake::FakeElement;
    use crate::element::ns;
    use crate::types::{Multipolygon, Subpolygon};

    fn parse(element: &FakeElement, kind: ShapeKind, config: &ParseConfig) -> ParsedShape {
        parse_shape(
            element,
            kind,
            &LayerContext::new("regions", Offset::default()),
            CrsRegistration::default(),
            config,
        )
    }

    fn rect(width: &str, height: &str) -> FakeElement {
        FakeElement::new("rect")
            .attr("id", "r1")
            .attr("x", "10")
            .attr("y", "20")
            .attr("width", width)
            .attr("height", height)
    }

    #[test]
    fn lenient_number_reads_prefix() {
        assert!((lenient_number("12px") - 12.0).abs() < f64::EPSILON);
        assert!((lenient_number(" -3.5e1mm") + 35.0).abs() < f64::EPSILON);
        assert!((lenient_number(".5") - 0.5).abs() < f64::EPSILON);
        assert!(lenient_number("auto").abs() < f64::EPSILON);
        assert!(lenient_number("").abs() < f64::EPSILON);
    }

    #[test]
    fn lenient_number_rejects_overflow() {
        assert!(lenient_number("1e999").abs() < f64::EPSILON);
        assert!(lenient_number(&"9".repeat(400)).abs() < f64::EPSILON);
    }

    #[test]
    fn zero_rect_is_invalid() {
        let shape = parse(&rect("0", "0"), ShapeKind::Rect, &ParseConfig::default());
        assert!(!shape.valid);
        assert_eq!(shape.kind(), "rect");
        assert_eq!(shape.id, "r1");
    }

    #[test]
    fn flat_rect_is_valid() {
        let shape = parse(&rect("0", "5"), ShapeKind::Rect, &ParseConfig::default());
        assert!(shape.valid);
        assert_eq!(
            shape.geometry,
            Geometry::Rect {
                corners: [Point::new(-20.0, 10.0), Point::new(-25.0, 10.0)],
            }
        );
    }

    #[test]
    fn tiny_circle_is_invalid_at_precision() {
        let circle = FakeElement::new("circle")
            .attr("cx", "1")
            .attr("cy", "1")
            .attr("r", "0.00004");
        let shape = parse(&circle, ShapeKind::Circle, &ParseConfig::default());
        assert!(!shape.valid);

        let precise = ParseConfig {
            round_precision: 6,
            ..ParseConfig::default()
        };
        assert!(parse(&circle, ShapeKind::Circle, &precise).valid);
    }

    #[test]
    fn circle_radius_is_rounded_not_translated() {
        let circle = FakeElement::new("circle")
            .attr("cx", "10")
            .attr("cy", "20")
            .attr("r", "2.345678");
        let shape = parse_shape(
            &circle,
            ShapeKind::Circle,
            &LayerContext::new("pois", Offset::new(5.0, 5.0)),
            CrsRegistration::new(0.0, 0.0, 100.0),
            &ParseConfig::default(),
        );
        assert_eq!(
            shape.geometry,
            Geometry::Circle {
                center: Point::new(85.0, 5.0),
                radius: 2.3457,
            }
        );
    }

    #[test]
    fn ellipse_degrades_to_circle_by_default() {
        let ellipse = FakeElement::new("ellipse")
            .attr("cx", "0")
            .attr("cy", "0")
            .attr("rx", "4")
            .attr("ry", "2")
            .attr("transform", "rotate(30)");
        let shape = parse(&ellipse, ShapeKind::Ellipse, &ParseConfig::default());
        assert_eq!(shape.kind(), "circle");
        assert_eq!(shape.geometry.radius(), Some(3.0));
        assert!(shape.valid);
    }

    #[test]
    fn ellipse_kept_with_rotation_when_allowed() {
        let ellipse = FakeElement::new("ellipse")
            .attr("cx", "1")
            .attr("cy", "2")
            .attr("rx", "4")
            .attr("ry", "2")
            .attr("transform", "rotate(-15.5)");
        let config = ParseConfig {
            allow_ellipse: true,
            ..ParseConfig::default()
        };
        let shape = parse(&ellipse, ShapeKind::Ellipse, &config);
        assert_eq!(
            shape.geometry,
            Geometry::Ellipse {
                center: Point::new(-2.0, 1.0),
                rx: 4.0,
                ry: 2.0,
                rotation: -15.5,
            }
        );
    }

    #[test]
    fn zero_ellipse_is_invalid() {
        let ellipse = FakeElement::new("ellipse").attr("rx", "0").attr("ry", "0");
        assert!(!parse(&ellipse, ShapeKind::Ellipse, &ParseConfig::default()).valid);
    }

    #[test]
    fn spiral_path_becomes_marker() {
        let spiral = FakeElement::new("path")
            .attr("id", "poi")
            .attr("d", "m 1,1 c 0,1 1,1 1,0")
            .ns_attr(ns::SODIPODI, "type", "spiral")
            .ns_attr(ns::SODIPODI, "cx", "30")
            .ns_attr(ns::SODIPODI, "cy", "40");
        let shape = parse(&spiral, ShapeKind::Path, &ParseConfig::default());
        assert_eq!(shape.kind(), "marker");
        assert_eq!(shape.geometry, Geometry::Marker(Point::new(-40.0, 30.0)));
        assert!(shape.valid);
    }

    #[test]
    fn spiral_without_center_is_invalid() {
        let spiral = FakeElement::new("path")
            .ns_attr(ns::SODIPODI, "type", "spiral")
            .ns_attr(ns::SODIPODI, "cx", "30");
        let shape = parse(&spiral, ShapeKind::Path, &ParseConfig::default());
        assert_eq!(shape.kind(), "marker");
        assert!(!shape.valid);
    }

    #[test]
    fn square_path_projects_to_polygon() {
        let path = FakeElement::new("path").attr("d", "M 0,0 L 10,0 L 10,10 L 0,10 Z");
        let shape = parse_shape(
            &path,
            ShapeKind::Path,
            &LayerContext::new("regions", Offset::default()),
            CrsRegistration::new(0.0, 0.0, 100.0),
            &ParseConfig::default(),
        );
        assert!(shape.valid);
        let expected = Multipolygon::new(vec![Subpolygon::new(vec![
            Point::new(100.0, 0.0),
            Point::new(100.0, 10.0),
            Point::new(90.0, 10.0),
            Point::new(90.0, 0.0),
        ])]);
        assert_eq!(shape.geometry, Geometry::Polygon(expected));
    }

    #[test]
    fn path_without_points_is_invalid() {
        // Without spaces every fragment is an operand no command accepts.
        for d in ["M0,0 L10,0 L10,10 L0,10 Z", "Z", "z Z"] {
            let path = FakeElement::new("path").attr("d", d);
            let shape = parse(&path, ShapeKind::Path, &ParseConfig::default());
            assert!(!shape.valid, "{d:?} should be invalid");
        }
    }

    #[test]
    fn trailing_empty_ring_keeps_path_valid() {
        let path = FakeElement::new("path").attr("d", "M 0,0 L 1,0 Z Z");
        let shape = parse(&path, ShapeKind::Path, &ParseConfig::default());
        assert!(shape.valid);
    }

    #[test]
    fn curved_path_is_invalid_but_keeps_metadata() {
        let path = FakeElement::new("path")
            .attr("id", "blob")
            .attr("d", "M 0,0 C 1,1 2,2 3,3 Z")
            .attr("style", "fill:#123456")
            .attr("onclick", "select('blob')");
        let shape = parse(&path, ShapeKind::Path, &ParseConfig::default());
        assert!(!shape.valid);
        assert_eq!(shape.geometry, Geometry::Polygon(Multipolygon::default()));
        assert_eq!(shape.style.fill_color.as_deref(), Some("#123456"));
        assert_eq!(shape.interactive["onclick"], "select('blob')");
    }

    #[test]
    fn label_falls_back_to_id() {
        let plain = rect("1", "1");
        assert_eq!(parse(&plain, ShapeKind::Rect, &ParseConfig::default()).label, "r1");

        let labelled = rect("1", "1").ns_attr(ns::INKSCAPE, "label", "Hall A");
        assert_eq!(
            parse(&labelled, ShapeKind::Rect, &ParseConfig::default()).label,
            "Hall A"
        );
    }

    #[test]
    fn title_and_desc_are_escaped() {
        let element = rect("1", "1")
            .child(FakeElement::new("title").with_text("Tom & Jerry's"))
            .child(FakeElement::new("desc").with_text("<b>open</b>"))
            .child(FakeElement::new("title").with_text("ignored"));
        let shape = parse(&element, ShapeKind::Rect, &ParseConfig::default());
        assert_eq!(shape.title.as_deref(), Some("Tom &amp; Jerry&apos;s"));
        assert_eq!(shape.desc.as_deref(), Some("&lt;b&gt;open&lt;/b&gt;"));
    }

    #[test]
    fn empty_title_is_absent() {
        let element = rect("1", "1").child(FakeElement::new("title"));
        assert_eq!(
            parse(&element, ShapeKind::Rect, &ParseConfig::default()).title,
            None
        );
    }

    #[test]
    fn interactive_collects_known_handlers_only() {
        let element = rect("1", "1")
            .attr("onmouseover", "hover()")
            .attr("onload", "init()")
            .attr("ondblclick", "nope()");
        let shape = parse(&element, ShapeKind::Rect, &ParseConfig::default());
        let names: Vec<_> = shape.interactive.keys().map(String::as_str).collect();
        assert_eq!(names, ["onload", "onmouseover"]);
    }

    #[test]
    fn layer_defaults_fill_style_gaps() {
        let defaults: LayerDefaults = serde_json::from_str(
            r##"{"empty": {"fill": true, "fillColor": "#ff0000", "fillOpacity": 0.5}}"##,
        )
        .unwrap();
        let layer = LayerContext::new("regions", Offset::default()).with_defaults(&defaults);
        let shape = parse_shape(
            &rect("1", "1"),
            ShapeKind::Rect,
            &layer,
            CrsRegistration::default(),
            &ParseConfig::default(),
        );
        assert_eq!(shape.style.fill_color.as_deref(), Some("#ff0000"));
        assert_eq!(shape.style.fill_opacity, Some(0.5));
        assert_eq!(shape.layer, "regions");
    }

    #[test]
    fn parsing_is_repeatable() {
        let path = FakeElement::new("path")
            .attr("id", "p")
            .attr("d", "m 5,5 l 1,0 0,1 z");
        let config = ParseConfig::default();
        assert_eq!(
            parse(&path, ShapeKind::Path, &config),
            parse(&path, ShapeKind::Path, &config)
        );
    }
}
