//! cartosvg-export: Pure output serializers (sans-IO)
//!
//! Converts parsed shapes into what the map client consumes: the
//! bracket-notation coordinate strings and the camelCase JSON layer
//! export that carries them.

#![warn(missing_docs)]

pub mod js;
pub mod record;

pub use js::{geometry_js, multipolygon_js, point_js, ring_js};
pub use record::{ImageRecord, LayerExport, ShapeRecord, coords_value, js_listing, to_json};
