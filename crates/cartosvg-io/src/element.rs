//! [`ShapeElement`] over `roxmltree` nodes.

use std::borrow::Cow;

use cartosvg_pipeline::ShapeElement;
use cartosvg_pipeline::element::ns;
use roxmltree::Node;

/// An element node of a parsed SVG document.
#[derive(Debug, Clone, Copy)]
pub struct SvgElement<'a, 'input>(pub Node<'a, 'input>);

/// Whether `node` is an SVG element named `tag`.
///
/// Elements with no namespace are accepted too; hand-written files often
/// omit `xmlns`.
pub(crate) fn is_svg_element(node: Node<'_, '_>, tag: &str) -> bool {
    node.is_element()
        && node.tag_name().name() == tag
        && node.tag_name().namespace().is_none_or(|uri| uri == ns::SVG)
}

impl<'a, 'input> SvgElement<'a, 'input> {
    /// The wrapped node.
    #[must_use]
    pub const fn node(&self) -> Node<'a, 'input> {
        self.0
    }
}

impl ShapeElement for SvgElement<'_, '_> {
    fn attribute(&self, namespace: Option<&str>, name: &str) -> Option<&str> {
        match namespace {
            Some(uri) => self.0.attribute((uri, name)),
            None => self.0.attribute(name),
        }
    }

    fn children(&self, tag: &str) -> Vec<Self> {
        self.0
            .children()
            .filter(|child| is_svg_element(*child, tag))
            .map(SvgElement)
            .collect()
    }

    fn text(&self) -> Option<&str> {
        self.0.text()
    }

    fn raw_markup(&self) -> Cow<'_, str> {
        let input = self.0.document().input_text();
        Cow::Borrowed(input.get(self.0.range()).unwrap_or_default())
    }
}
