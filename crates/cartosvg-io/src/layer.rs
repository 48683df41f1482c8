//! Shapes layers and image layers of a document.

use cartosvg_pipeline::{
    CrsRegistration, ImageInfo, LayerContext, LayerDefaults, Offset, ParseConfig, ParsedShape,
    ShapeElement, ShapeKind, Vendor, lenient_number, parse_shape, parse_translate, round_to,
    vendor_attribute,
};
use tracing::debug;

use crate::element::SvgElement;

/// A group (or the root `<svg>`) whose direct children are map shapes.
#[derive(Debug, Clone)]
pub struct Layer<'a, 'input> {
    element: SvgElement<'a, 'input>,
    name: String,
    offset: Offset,
    config: ParseConfig,
}

impl<'a, 'input> Layer<'a, 'input> {
    pub(crate) fn new(element: SvgElement<'a, 'input>, name: &str, config: &ParseConfig) -> Self {
        let offset = element
            .attribute(None, "transform")
            .map(parse_translate)
            .unwrap_or_default();
        Self {
            element,
            name: name.to_owned(),
            offset,
            config: config.clone(),
        }
    }

    /// The name the layer was requested by.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full `inkscape:label` of the group, read with the config the
    /// layer was looked up with.
    #[must_use]
    pub fn label(&self) -> Option<String> {
        vendor_attribute(&self.element, Vendor::Inkscape, "label", &self.config)
    }

    /// Translation of the group, zero when it has none.
    #[must_use]
    pub const fn offset(&self) -> Offset {
        self.offset
    }

    /// The underlying element.
    #[must_use]
    pub const fn element(&self) -> SvgElement<'a, 'input> {
        self.element
    }

    /// Parse every shape of the layer.
    ///
    /// Shapes come out grouped by kind (paths, rects, circles, ellipses)
    /// and in document order within a kind.  Invalid shapes are dropped
    /// unless `allow_empty_elements` is set.
    #[must_use]
    pub fn shapes(
        &self,
        registration: CrsRegistration,
        config: &ParseConfig,
        defaults: Option<&LayerDefaults>,
    ) -> Vec<ParsedShape> {
        let context = LayerContext {
            name: &self.name,
            offset: self.offset,
            defaults,
        };
        let mut shapes = Vec::new();
        for kind in ShapeKind::ALL {
            for child in self.element.children(kind.tag()) {
                let shape = parse_shape(&child, kind, &context, registration, config);
                if shape.valid || config.allow_empty_elements {
                    shapes.push(shape);
                } else {
                    debug!(id = %shape.id, kind = shape.kind(), "dropping invalid shape");
                }
            }
        }
        shapes
    }
}

/// The `<image>` elements of a background layer.
#[derive(Debug, Clone)]
pub struct ImageLayer<'a, 'input> {
    images: Vec<SvgElement<'a, 'input>>,
    offset: Offset,
    config: ParseConfig,
}

impl<'a, 'input> ImageLayer<'a, 'input> {
    pub(crate) fn new(
        images: Vec<SvgElement<'a, 'input>>,
        transform: Option<&str>,
        config: &ParseConfig,
    ) -> Self {
        Self {
            images,
            offset: transform.map(parse_translate).unwrap_or_default(),
            config: config.clone(),
        }
    }

    /// Number of images on the layer.
    #[must_use]
    pub fn count(&self) -> usize {
        self.images.len()
    }

    /// Translation of the layer group.
    #[must_use]
    pub const fn offset(&self) -> Offset {
        self.offset
    }

    /// Placement of the image at `index`, rounded at the configured
    /// precision.
    ///
    /// An index past the end yields the default placement with
    /// `is_present == false`.
    #[must_use]
    pub fn image_info(&self, index: usize) -> ImageInfo {
        let Some(image) = self.images.get(index) else {
            return ImageInfo::default();
        };
        let number = |name: &str| image.attribute(None, name).map_or(0.0, lenient_number);
        let round = |v: f64| round_to(v, self.config.round_precision);
        let href = vendor_attribute(image, Vendor::Xlink, "href", &self.config)
            .or_else(|| image.attribute(None, "href").map(str::to_owned))
            .unwrap_or_default();
        ImageInfo {
            width: round(number("width")),
            height: round(number("height")),
            ox: round(number("x") + self.offset.ox),
            oy: round(number("y") + self.offset.oy),
            href,
            is_present: true,
        }
    }

    /// Placement of every image, in document order.
    #[must_use]
    pub fn image_infos(&self) -> Vec<ImageInfo> {
        (0..self.count()).map(|i| self.image_info(i)).collect()
    }
}
