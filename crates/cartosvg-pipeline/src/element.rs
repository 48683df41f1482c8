//! Element access seam between the parser core and an XML tree.
//!
//! The core never touches an XML library.  Shape adapters read elements
//! through [`ShapeElement`]; `cartosvg-io` implements it over
//! `roxmltree`, and tests implement it over plain structs.
//!
//! Inkscape stores editor data in vendor namespaces (`inkscape:label`,
//! `sodipodi:type`, ...).  Files written by old Sodipodi/Inkscape
//! releases bind those prefixes to URIs other than the ones in [`ns`],
//! so [`vendor_attribute`] falls back to scanning the element's raw
//! markup by prefix.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

use crate::types::ParseConfig;

/// Namespace URIs of the vocabularies found in Inkscape documents.
pub mod ns {
    /// SVG itself.
    pub const SVG: &str = "http://www.w3.org/2000/svg";
    /// XLink (`xlink:href` on images).
    pub const XLINK: &str = "http://www.w3.org/1999/xlink";
    /// Inkscape editor attributes.
    pub const INKSCAPE: &str = "http://www.inkscape.org/namespaces/inkscape";
    /// Sodipodi editor attributes (shape types, spiral centers).
    pub const SODIPODI: &str = "http://sodipodi.sourceforge.net/DTD/sodipodi-0.dtd";
    /// RDF metadata.
    pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
}

/// Read-only view of one element of a document tree.
pub trait ShapeElement {
    /// Attribute value by namespace URI (`None` for unprefixed
    /// attributes) and local name.
    fn attribute(&self, namespace: Option<&str>, name: &str) -> Option<&str>;

    /// Direct child elements with the given local tag name, in document
    /// order.
    fn children(&self, tag: &str) -> Vec<Self>
    where
        Self: Sized;

    /// Text content of the element, if it starts with text.
    fn text(&self) -> Option<&str>;

    /// Source markup of the element, starting at its opening tag.
    fn raw_markup(&self) -> Cow<'_, str>;
}

/// Vendor vocabularies whose attributes are looked up by prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vendor {
    /// `inkscape:*`
    Inkscape,
    /// `sodipodi:*`
    Sodipodi,
    /// `xlink:*`
    Xlink,
}

impl Vendor {
    /// Conventional prefix.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Inkscape => "inkscape",
            Self::Sodipodi => "sodipodi",
            Self::Xlink => "xlink",
        }
    }

    /// Current namespace URI.
    #[must_use]
    pub const fn namespace(self) -> &'static str {
        match self {
            Self::Inkscape => ns::INKSCAPE,
            Self::Sodipodi => ns::SODIPODI,
            Self::Xlink => ns::XLINK,
        }
    }
}

#[allow(clippy::expect_used)] // literal pattern, verified by tests
static RAW_ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([A-Za-z_][\w.-]*):([A-Za-z_][\w.-]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
        .expect("valid raw attribute pattern")
});

/// Look up a vendor attribute.
///
/// With `register_namespaces` the namespace-aware lookup is tried first;
/// the raw-markup scan is always the fallback.
pub fn vendor_attribute<E: ShapeElement + ?Sized>(
    element: &E,
    vendor: Vendor,
    name: &str,
    config: &ParseConfig,
) -> Option<String> {
    if config.register_namespaces
        && let Some(value) = element.attribute(Some(vendor.namespace()), name)
    {
        return Some(value.to_owned());
    }
    raw_attribute(&element.raw_markup(), vendor.prefix(), name)
}

/// Find `prefix:name="value"` in the opening tag of raw markup.
#[must_use]
pub fn raw_attribute(markup: &str, prefix: &str, name: &str) -> Option<String> {
    RAW_ATTRIBUTE
        .captures_iter(opening_tag(markup))
        .find(|caps| {
            caps.get(1).is_some_and(|p| p.as_str() == prefix)
                && caps.get(2).is_some_and(|n| n.as_str() == name)
        })
        .and_then(|caps| caps.get(3).or_else(|| caps.get(4)))
        .map(|value| unescape(value.as_str()))
}

/// The opening tag of `markup`, up to the first `>` outside quotes.
fn opening_tag(markup: &str) -> &str {
    let mut quote = None;
    for (i, c) in markup.char_indices() {
        match (quote, c) {
            (None, '"' | '\'') => quote = Some(c),
            (Some(q), _) if q == c => quote = None,
            (None, '>') => return &markup[..=i],
            _ => {}
        }
    }
    markup
}

fn unescape(value: &str) -> String {
    value
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}
