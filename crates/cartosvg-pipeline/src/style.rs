//! Presentation attributes read from an element's `style` string.
//!
//! Only the handful of properties the map client can render are
//! extracted; everything else in the CSS declaration list is ignored.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::project::round_to;

#[allow(clippy::expect_used)] // literal pattern, verified by tests
static FILL_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|[;\s])fill:([#\w]{7})").expect("valid fill pattern"));

#[allow(clippy::expect_used)] // literal pattern, verified by tests
static FILL_OPACITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"fill-opacity:(\d?\.\d{0,8}|\d)").expect("valid fill-opacity pattern")
});

#[allow(clippy::expect_used)] // literal pattern, verified by tests
static FILL_RULE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"fill-rule:(evenodd|nonzero)").expect("valid fill-rule pattern")
});

#[allow(clippy::expect_used)] // literal pattern, verified by tests
static STROKE_COLOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[;\s])stroke:([#\w]{7})").expect("valid stroke pattern")
});

#[allow(clippy::expect_used)] // literal pattern, verified by tests
static STROKE_WIDTH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"stroke-width:(\d+(?:\.\d+)?|\.\d+)").expect("valid stroke-width pattern")
});

#[allow(clippy::expect_used)] // literal pattern, verified by tests
static STROKE_OPACITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"stroke-opacity:(\d?\.\d{0,8}|\d)").expect("valid stroke-opacity pattern")
});

/// Fill and border presentation of one shape.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ShapeStyle {
    /// `#rrggbb` fill color.
    pub fill_color: Option<String>,
    /// Fill opacity in `[0, 1]`.
    pub fill_opacity: Option<f64>,
    /// `nonzero` when set explicitly; `evenodd` is the client default and
    /// is never carried.
    pub fill_rule: Option<String>,
    /// `#rrggbb` stroke color.
    pub border_color: Option<String>,
    /// Stroke width in user units.
    pub border_width: Option<f64>,
    /// Stroke opacity in `[0, 1]`.
    pub border_opacity: Option<f64>,
}

fn capture<'a>(re: &Regex, text: &'a str) -> Option<&'a str> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

fn number(re: &Regex, text: &str, precision: u32) -> Option<f64> {
    capture(re, text)
        .and_then(|v| v.parse::<f64>().ok())
        .map(|v| round_to(v, precision))
}

/// Extract the supported properties from a `style` attribute.
#[must_use]
pub fn parse_style(style: &str, precision: u32) -> ShapeStyle {
    ShapeStyle {
        fill_color: capture(&FILL_COLOR, style).map(str::to_owned),
        fill_opacity: number(&FILL_OPACITY, style, precision),
        fill_rule: capture(&FILL_RULE, style)
            .filter(|rule| *rule == "nonzero")
            .map(str::to_owned),
        border_color: capture(&STROKE_COLOR, style).map(str::to_owned),
        border_width: number(&STROKE_WIDTH, style, precision),
        border_opacity: number(&STROKE_OPACITY, style, precision),
    }
}

/// Fallback presentation for shapes of one layer.
///
/// Read from JSON such as
/// `{"empty": {"fill": true, "fillColor": "#ff0000", "fillOpacity": 0.4}}`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerDefaults {
    /// Values used where a shape's own style is silent.
    pub empty: EmptyStyle,
}

/// The `empty` block of [`LayerDefaults`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EmptyStyle {
    /// Apply the fill defaults.
    pub fill: bool,
    /// Default fill color.
    pub fill_color: Option<String>,
    /// Default fill opacity.
    pub fill_opacity: Option<f64>,
    /// Apply the border defaults.
    pub stroke: bool,
    /// Default border color.
    pub border_color: Option<String>,
    /// Default border width.
    pub border_width: Option<f64>,
    /// Default border opacity.
    pub border_opacity: Option<f64>,
}

impl LayerDefaults {
    /// Fill in the gaps of `style` from these defaults.
    ///
    /// Values the shape declares itself always win.
    pub fn apply(&self, style: &mut ShapeStyle) {
        let empty = &self.empty;
        if empty.fill {
            fill_gap(&mut style.fill_color, empty.fill_color.as_ref());
            fill_gap(&mut style.fill_opacity, empty.fill_opacity.as_ref());
        }
        if empty.stroke {
            fill_gap(&mut style.border_color, empty.border_color.as_ref());
            fill_gap(&mut style.border_width, empty.border_width.as_ref());
            fill_gap(&mut style.border_opacity, empty.border_opacity.as_ref());
        }
    }
}

fn fill_gap<T: Clone>(slot: &mut Option<T>, default: Option<&T>) {
    if slot.is_none() {
        *slot = default.cloned();
    }
}

/// Escape text for embedding in HTML, quotes included.
#[must_use]
pub fn html_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const INKSCAPE_STYLE: &str = "fill:#aa00ff;fill-opacity:0.45678912;fill-rule:nonzero;\
                                  stroke:#000000;stroke-width:1.5px;stroke-opacity:1";

    #[test]
    fn parses_inkscape_style() {
        let style = parse_style(INKSCAPE_STYLE, 4);
        assert_eq!(style.fill_color.as_deref(), Some("#aa00ff"));
        assert_eq!(style.fill_opacity, Some(0.4568));
        assert_eq!(style.fill_rule.as_deref(), Some("nonzero"));
        assert_eq!(style.border_color.as_deref(), Some("#000000"));
        assert_eq!(style.border_width, Some(1.5));
        assert_eq!(style.border_opacity, Some(1.0));
    }

    #[test]
    fn evenodd_is_not_carried() {
        let style = parse_style("fill:#ffffff;fill-rule:evenodd", 4);
        assert_eq!(style.fill_rule, None);
    }

    #[test]
    fn short_or_named_colors_are_ignored() {
        assert_eq!(parse_style("fill:none", 4).fill_color, None);
        assert_eq!(parse_style("fill:#fff", 4).fill_color, None);
    }

    #[test]
    fn fill_opacity_does_not_match_stroke_prefix() {
        let style = parse_style("stroke:#123456", 4);
        assert_eq!(style.fill_color, None);
        assert_eq!(style.border_color.as_deref(), Some("#123456"));
    }

    #[test]
    fn empty_style_is_all_none() {
        assert_eq!(parse_style("", 4), ShapeStyle::default());
    }

    #[test]
    fn defaults_fill_only_gaps() {
        let defaults: LayerDefaults = serde_json::from_str(
            r##"{"empty": {"fill": true, "fillColor": "#ff0000", "fillOpacity": 0.3}}"##,
        )
        .unwrap();
        let mut style = parse_style("fill:#00ff00", 4);
        defaults.apply(&mut style);
        assert_eq!(style.fill_color.as_deref(), Some("#00ff00"));
        assert_eq!(style.fill_opacity, Some(0.3));
        assert_eq!(style.border_color, None);
    }

    #[test]
    fn defaults_disabled_flags_do_nothing() {
        let defaults: LayerDefaults = serde_json::from_str(
            r##"{"empty": {"fillColor": "#ff0000", "borderColor": "#0000ff"}}"##,
        )
        .unwrap();
        let mut style = ShapeStyle::default();
        defaults.apply(&mut style);
        assert_eq!(style, ShapeStyle::default());
    }

    #[test]
    fn defaults_stroke() {
        let defaults = LayerDefaults {
            empty: EmptyStyle {
                stroke: true,
                border_color: Some("#0000ff".to_string()),
                border_width: Some(2.0),
                ..EmptyStyle::default()
            },
        };
        let mut style = ShapeStyle::default();
        defaults.apply(&mut style);
        assert_eq!(style.border_color.as_deref(), Some("#0000ff"));
        assert_eq!(style.border_width, Some(2.0));
        assert_eq!(style.border_opacity, None);
    }

    #[test]
    fn html_escape_quotes_and_markup() {
        assert_eq!(
            html_escape(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &apos;Jerry&apos;&lt;/b&gt;"
        );
    }
}
