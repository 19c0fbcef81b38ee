//! caplink: Link table and figure captions to the page regions they refer to.
//!
//! This is the public API facade. It re-exports the geometric types and
//! algorithms from caplink-core and adds the page-input seam and the
//! document driver.
//!
//! # Architecture
//!
//! - **caplink-core**: backend-independent geometry and algorithms
//! - **caplink** (this crate): the [`PageSource`] collaborator interface and
//!   the per-page pipeline that orders the stages and merges results
//!
//! Document decoding is not part of this crate: implement [`PageSource`]
//! over whatever extracts your page geometry, or use [`MemoryPage`] when the
//! geometry is already in memory.
//!
//! # Example
//!
//! ```
//! use caplink::{BBox, LinkOptions, MemoryPage, link_document};
//!
//! let mut page = MemoryPage::new();
//! page.push_text_block(BBox::new(0.0, 50.0, 100.0, 62.0), "Table 1.");
//! page.push_drawing(BBox::new(0.0, 70.0, 100.0, 71.5));
//!
//! let layout = link_document(&[page], &LinkOptions::default()).unwrap();
//! assert_eq!(layout.table_regions.len(), 1);
//! assert_eq!(layout.table_regions[0].bbox, BBox::new(0.0, 70.0, 100.0, 71.5));
//! ```

mod page;
mod pipeline;

pub use caplink_core;

pub use caplink_core::{
    BBox, Caption, CaptionClassifier, CaptionKind, CaptionMatch, CaptionRules, Column,
    LayoutWarning, LayoutWarningCode, LinkOptions, PatternError, Point, RegionMatch, TableRegion,
};

pub use page::{MemoryPage, PageSource};
pub use pipeline::{DocumentLayout, LinkError, link_document};

#[cfg(feature = "parallel")]
pub use pipeline::link_document_parallel;
