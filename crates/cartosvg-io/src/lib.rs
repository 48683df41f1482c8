//! cartosvg-io: Document loading and layer access.
//!
//! Parses Inkscape SVG text with `roxmltree`, finds shapes layers and
//! background image layers by their `inkscape:label`, and adapts XML
//! nodes to the `ShapeElement` trait the pipeline reads shapes through.

pub mod document;
pub mod element;
pub mod layer;

pub use document::{LoadError, SvgDocument, read_to_string};
pub use element::SvgElement;
pub use layer::{ImageLayer, Layer};
