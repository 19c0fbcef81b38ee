//! Page input seam: the interface to the document-decoding collaborator.

use caplink_core::BBox;

/// Pre-extracted geometry for one page.
///
/// Implemented by whatever decodes the document format; the linking core
/// never touches the format itself. All rects use the top-left-origin
/// coordinate system of [`BBox`].
pub trait PageSource {
    /// Text blocks with their content, in extraction order.
    fn text_blocks(&self) -> Vec<(BBox, String)>;

    /// Bounding rects of raster images placed on the page.
    fn image_rects(&self) -> Vec<BBox>;

    /// Bounding rects of vector drawing primitives. Thin, wide rects among
    /// these are treated as horizontal rule candidates.
    fn drawing_rects(&self) -> Vec<BBox>;

    /// Text content inside a region, used to re-run caption classification
    /// on subtracted portions of clustered regions.
    fn text_in_region(&self, region: &BBox) -> String;
}

/// A [`PageSource`] over already-extracted, in-memory geometry.
///
/// Used by tests and by callers that run extraction elsewhere.
/// `text_in_region` is block-granular: it returns the joined text of every
/// block whose rect intersects the query region.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MemoryPage {
    #[cfg_attr(feature = "serde", serde(default))]
    text_blocks: Vec<(BBox, String)>,
    #[cfg_attr(feature = "serde", serde(default))]
    image_rects: Vec<BBox>,
    #[cfg_attr(feature = "serde", serde(default))]
    drawing_rects: Vec<BBox>,
}

impl MemoryPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_content(
        text_blocks: Vec<(BBox, String)>,
        image_rects: Vec<BBox>,
        drawing_rects: Vec<BBox>,
    ) -> Self {
        Self {
            text_blocks,
            image_rects,
            drawing_rects,
        }
    }

    pub fn push_text_block(&mut self, bbox: BBox, text: impl Into<String>) {
        self.text_blocks.push((bbox, text.into()));
    }

    pub fn push_image(&mut self, bbox: BBox) {
        self.image_rects.push(bbox);
    }

    pub fn push_drawing(&mut self, bbox: BBox) {
        self.drawing_rects.push(bbox);
    }
}

impl PageSource for MemoryPage {
    fn text_blocks(&self) -> Vec<(BBox, String)> {
        self.text_blocks.clone()
    }

    fn image_rects(&self) -> Vec<BBox> {
        self.image_rects.clone()
    }

    fn drawing_rects(&self) -> Vec<BBox> {
        self.drawing_rects.clone()
    }

    fn text_in_region(&self, region: &BBox) -> String {
        let mut parts = Vec::new();
        for (bbox, text) in &self.text_blocks {
            if bbox.intersects(region) {
                parts.push(text.as_str());
            }
        }
        parts.join("\n")
    }
}
