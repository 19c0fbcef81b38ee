//! Configuration for the linking pipeline.

use crate::caption::CaptionRules;

/// Tunables for every stage of caption-to-region linking.
///
/// All distances are in page units (points for PDF-derived geometry).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinkOptions {
    /// Tolerance on both x-edges when grouping text blocks into column
    /// bands. Default: 10.
    pub column_tolerance: f64,
    /// A column group is kept as an obstacle source only while its width is
    /// at least this fraction of the previously kept group's width.
    /// Default: 0.9.
    pub column_width_ratio: f64,
    /// Maximum center-x offset between a caption and a horizontal rule for
    /// the rule to count as aligned. Default: 10.
    pub caption_align_tolerance: f64,
    /// Tolerance on both x-edges when grouping rule candidates into runs.
    /// Default: 10.
    pub rule_group_tolerance: f64,
    /// Proximity threshold for clustering page elements into candidate
    /// figure regions. Default: 20.
    pub cluster_proximity: f64,
    /// Proximity threshold for the initial pass that coalesces raw graphic
    /// fragments before region clustering. Default: 5.
    pub initial_cluster_proximity: f64,
    /// Clusters narrower or shorter than this are discarded. Default: 5.
    pub min_cluster_dimension: f64,
    /// Overlap ratio above which two regions are considered duplicates.
    /// Default: 0.8.
    pub duplicate_overlap_threshold: f64,
    /// Height of the region synthesized below a table caption when no rule
    /// evidence exists. Default: 20.
    pub fallback_table_height: f64,
    /// How many leftover rule runs to try when a resolved table candidate
    /// duplicates an existing region (supports stacked sub-tables sharing
    /// one caption). Default: 1.
    pub nested_table_retries: usize,
    /// A drawing rect is a horizontal rule candidate when its height is
    /// below this value. Default: 2.
    pub rule_max_height: f64,
    /// A drawing rect is a horizontal rule candidate when its width exceeds
    /// this value. Default: 20.
    pub rule_min_width: f64,
    /// Drawing rects shorter than this count as thin strokes; a thin stroke
    /// whose center lies inside a table region belongs to the table body.
    /// Default: 3.
    pub thin_element_height: f64,
    /// Skip the text-augmentation clustering pass on the first page, which
    /// is usually title matter. Default: true.
    pub skip_first_page_augmentation: bool,
    /// Caption prefix synonyms.
    pub caption_rules: CaptionRules,
}

impl Default for LinkOptions {
    fn default() -> Self {
        Self {
            column_tolerance: 10.0,
            column_width_ratio: 0.9,
            caption_align_tolerance: 10.0,
            rule_group_tolerance: 10.0,
            cluster_proximity: 20.0,
            initial_cluster_proximity: 5.0,
            min_cluster_dimension: 5.0,
            duplicate_overlap_threshold: 0.8,
            fallback_table_height: 20.0,
            nested_table_retries: 1,
            rule_max_height: 2.0,
            rule_min_width: 20.0,
            thin_element_height: 3.0,
            skip_first_page_augmentation: true,
            caption_rules: CaptionRules::default(),
        }
    }
}
