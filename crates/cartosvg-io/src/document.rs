//! Loading Inkscape SVG documents and finding their layers.

use std::path::{Path, PathBuf};

use cartosvg_pipeline::{ParseConfig, Vendor, vendor_attribute};
use roxmltree::{Document, Node, ParsingOptions};
use tracing::{debug, warn};

use crate::element::{SvgElement, is_svg_element};
use crate::layer::{ImageLayer, Layer};

/// Errors that can occur while loading a document.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The document text is empty.
    #[error("SVG document is empty")]
    Empty,

    /// The document is not well-formed XML.
    #[error("malformed SVG document: {0}")]
    Xml(#[from] roxmltree::Error),
}

/// Read a document from disk.
///
/// # Errors
///
/// Returns [`LoadError::Io`] if the file cannot be read as UTF-8 text.
pub fn read_to_string(path: &Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// A parsed SVG document borrowing its source text.
#[derive(Debug)]
pub struct SvgDocument<'input> {
    doc: Document<'input>,
}

impl<'input> SvgDocument<'input> {
    /// Parse document text.  DTDs are allowed: Inkscape used to emit one.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Empty`] for empty or whitespace-only text and
    /// [`LoadError::Xml`] for malformed XML.
    pub fn parse(text: &'input str) -> Result<Self, LoadError> {
        if text.trim().is_empty() {
            return Err(LoadError::Empty);
        }
        let options = ParsingOptions {
            allow_dtd: true,
            ..ParsingOptions::default()
        };
        let doc = Document::parse_with_options(text, options)?;
        debug!(nodes = doc.descendants().count(), "parsed SVG document");
        Ok(Self { doc })
    }

    /// The root `<svg>` element.
    #[must_use]
    pub fn root(&self) -> SvgElement<'_, 'input> {
        SvgElement(self.doc.root_element())
    }

    /// First group, in document order, whose `inkscape:label` starts
    /// with `name`.
    fn find_group(&self, name: &str, config: &ParseConfig) -> Option<Node<'_, 'input>> {
        self.doc.descendants().find(|node| {
            is_svg_element(*node, "g")
                && vendor_attribute(&SvgElement(*node), Vendor::Inkscape, "label", config)
                    .is_some_and(|label| label.starts_with(name))
        })
    }

    /// Find a shapes layer.
    ///
    /// An empty name selects the root `<svg>` element.  Returns `None` when
    /// no group label starts with `name`.  Labels are read the way
    /// `config.register_namespaces` asks for.
    #[must_use]
    pub fn layer(&self, name: &str, config: &ParseConfig) -> Option<Layer<'_, 'input>> {
        if name.is_empty() {
            return Some(Layer::new(self.root(), name, config));
        }
        let layer = self
            .find_group(name, config)
            .map(|node| Layer::new(SvgElement(node), name, config));
        if layer.is_none() {
            warn!(layer = name, "layer not found");
        }
        layer
    }

    /// Find an image layer.
    ///
    /// An empty name collects every `<image>` of the document, without
    /// any layer translation.
    #[must_use]
    pub fn image_layer(
        &self,
        name: &str,
        config: &ParseConfig,
    ) -> Option<ImageLayer<'_, 'input>> {
        if name.is_empty() {
            let images = self
                .doc
                .descendants()
                .filter(|node| is_svg_element(*node, "image"))
                .map(SvgElement)
                .collect();
            return Some(ImageLayer::new(images, None, config));
        }
        let Some(group) = self.find_group(name, config) else {
            warn!(layer = name, "image layer not found");
            return None;
        };
        let images = group
            .children()
            .filter(|node| is_svg_element(*node, "image"))
            .map(SvgElement)
            .collect();
        Some(ImageLayer::new(
            images,
            group.attribute("transform"),
            config,
        ))
    }
}
