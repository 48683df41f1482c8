//! cartosvg-pipeline: Inkscape SVG shapes to map coordinates (sans-IO).
//!
//! Turns shape elements of an Inkscape drawing into projected map
//! geometry through:
//! element -> shape adapter -> path lexer / pen state machine ->
//! CRS projection -> [`ParsedShape`].
//!
//! This crate has **no XML or filesystem dependencies**.  Elements are
//! read through the [`ShapeElement`] trait; loading documents and
//! finding layers lives in `cartosvg-io`, and text output lives in
//! `cartosvg-export`.

pub mod element;
pub mod path;
pub mod project;
pub mod shape;
pub mod style;
pub mod transform;
pub mod types;

pub use element::{ShapeElement, Vendor, vendor_attribute};
pub use path::{check_path, parse_path};
pub use project::{Projector, project, round_to};
pub use shape::{INTERACTIVE_ATTRIBUTES, LayerContext, adapt, lenient_number, parse_shape};
pub use style::{EmptyStyle, LayerDefaults, ShapeStyle, html_escape, parse_style};
pub use transform::{parse_rotate, parse_translate};
pub use types::{
    CrsRegistration, Geometry, ImageInfo, Multipolygon, Offset, ParseConfig, ParsedShape, Point,
    ShapeKind, Subpolygon, UnsupportedPath,
};
