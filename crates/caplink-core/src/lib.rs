//! caplink-core: Backend-independent geometry and algorithms for
//! caption-to-region linking.
//!
//! This crate provides the geometric primitives ([`BBox`], [`Point`]) and the
//! linking algorithms (proximity clustering, column detection, table boundary
//! resolution, caption–cluster matching, absorption) used by caplink. It
//! performs no I/O: page geometry arrives pre-extracted and results are plain
//! data structures.

pub mod absorb;
pub mod caption;
pub mod cluster;
pub mod columns;
pub mod error;
pub mod geometry;
pub mod matching;
pub mod options;
pub mod table;

pub use absorb::absorb_unmatched;
pub use caption::{Caption, CaptionClassifier, CaptionKind, CaptionMatch, CaptionRules};
pub use cluster::{bound_clusters, cluster_rects};
pub use columns::{Column, detect_columns, dominant_columns};
pub use error::{LayoutWarning, LayoutWarningCode, PatternError};
pub use geometry::{BBox, Point, merge_overlapping, subtract};
pub use matching::{RegionMatch, match_captions};
pub use options::LinkOptions;
pub use table::{TableRegion, filter_table_blocks, resolve_table_regions};
