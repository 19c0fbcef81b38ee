//! The per-page linking pipeline and the document driver.
//!
//! Per page, strictly ordered: classify text blocks, detect columns, resolve
//! table regions, cluster graphic elements, re-detect captions inside
//! clusters, augment clusters with leftover text, match figure captions, and
//! absorb unmatched clusters. Pages are mutually independent; the driver
//! merges per-page results into document-level collections keyed by page
//! number.

use std::collections::{BTreeMap, HashSet};

use caplink_core::{
    BBox, Caption, CaptionClassifier, CaptionKind, LayoutWarning, LayoutWarningCode, LinkOptions,
    PatternError, RegionMatch, TableRegion, absorb_unmatched, bound_clusters, detect_columns,
    dominant_columns, filter_table_blocks, match_captions, merge_overlapping,
    resolve_table_regions, subtract,
};
use thiserror::Error;

use crate::page::PageSource;

/// Fatal errors from the document driver.
///
/// Geometric degradation never produces an error (it produces warnings);
/// only invalid configuration or ambiguous caption labeling does.
#[derive(Debug, Error)]
pub enum LinkError {
    /// Two captions on one page produced the same label. Persistence and
    /// matching key on labels, so this is surfaced instead of silently
    /// overwriting one caption's result with the other's.
    #[error("duplicate caption label '{label}' on page {page}")]
    DuplicateLabel { page: usize, label: String },
    /// User-supplied caption prefixes failed to compile.
    #[error(transparent)]
    Pattern(#[from] PatternError),
}

/// The deliverable output for one document.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DocumentLayout {
    /// Accepted table regions, in page then caption order.
    pub table_regions: Vec<TableRegion>,
    /// Figure caption matches keyed by page, then by caption label.
    pub matches: BTreeMap<usize, BTreeMap<String, RegionMatch>>,
    /// All classified captions, including those re-detected inside clusters.
    pub captions: Vec<Caption>,
    /// Non-fatal diagnostics collected across all pages.
    pub warnings: Vec<LayoutWarning>,
}

/// Per-page result, merged by the driver.
struct PageOutcome {
    page: usize,
    table_regions: Vec<TableRegion>,
    matches: BTreeMap<String, RegionMatch>,
    captions: Vec<Caption>,
    warnings: Vec<LayoutWarning>,
}

/// Link every page of a document sequentially.
pub fn link_document<P: PageSource>(
    pages: &[P],
    options: &LinkOptions,
) -> Result<DocumentLayout, LinkError> {
    let classifier = CaptionClassifier::new(&options.caption_rules)?;
    let mut outcomes = Vec::with_capacity(pages.len());
    for (page_number, page) in pages.iter().enumerate() {
        outcomes.push(link_page(page_number, page, &classifier, options)?);
    }
    Ok(merge_outcomes(outcomes))
}

/// Link pages in parallel with rayon, one worker per page.
///
/// Pages share no mutable state; per-page outcomes are merged in page order,
/// so the result is identical to [`link_document`].
#[cfg(feature = "parallel")]
pub fn link_document_parallel<P: PageSource + Sync>(
    pages: &[P],
    options: &LinkOptions,
) -> Result<DocumentLayout, LinkError> {
    use rayon::prelude::*;

    let classifier = CaptionClassifier::new(&options.caption_rules)?;
    let outcomes = pages
        .par_iter()
        .enumerate()
        .map(|(page_number, page)| link_page(page_number, page, &classifier, options))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(merge_outcomes(outcomes))
}

fn merge_outcomes(outcomes: Vec<PageOutcome>) -> DocumentLayout {
    let mut layout = DocumentLayout {
        table_regions: Vec::new(),
        matches: BTreeMap::new(),
        captions: Vec::new(),
        warnings: Vec::new(),
    };
    for outcome in outcomes {
        layout.table_regions.extend(outcome.table_regions);
        if !outcome.matches.is_empty() {
            layout.matches.insert(outcome.page, outcome.matches);
        }
        layout.captions.extend(outcome.captions);
        layout.warnings.extend(outcome.warnings);
    }
    layout
}

fn link_page<P: PageSource>(
    page_number: usize,
    source: &P,
    classifier: &CaptionClassifier,
    options: &LinkOptions,
) -> Result<PageOutcome, LinkError> {
    let mut warnings = Vec::new();

    // Classify text blocks into captions and plain prose.
    let mut table_captions: Vec<Caption> = Vec::new();
    let mut figure_captions: Vec<Caption> = Vec::new();
    let mut plain: Vec<(BBox, String)> = Vec::new();
    for (bbox, text) in source.text_blocks() {
        if text.trim().is_empty() || bbox.is_degenerate() {
            continue;
        }
        match classifier.classify(&text) {
            Some(m) => {
                let caption = Caption {
                    bbox,
                    label: m.label(),
                    text,
                    page: page_number,
                    kind: m.kind,
                };
                match caption.kind {
                    CaptionKind::Table => table_captions.push(caption),
                    CaptionKind::Figure => figure_captions.push(caption),
                }
            }
            None => plain.push((bbox, text)),
        }
    }

    let mut seen: HashSet<&str> = HashSet::new();
    for caption in table_captions.iter().chain(figure_captions.iter()) {
        if !seen.insert(caption.label.as_str()) {
            return Err(LinkError::DuplicateLabel {
                page: page_number,
                label: caption.label.clone(),
            });
        }
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(
        page = page_number,
        tables = table_captions.len(),
        figures = figure_captions.len(),
        blocks = plain.len(),
        "classified text blocks"
    );

    // Column bands give the table resolver its fallback x-context.
    let plain_rects: Vec<BBox> = plain.iter().map(|(r, _)| *r).collect();
    let bands: Vec<BBox> = detect_columns(&plain_rects, options.column_tolerance)
        .into_iter()
        .map(|c| c.bbox)
        .collect();

    let drawings = source.drawing_rects();
    let rules: Vec<BBox> = drawings
        .iter()
        .filter(|r| r.height() < options.rule_max_height && r.width() > options.rule_min_width)
        .copied()
        .collect();

    let table_regions = resolve_table_regions(
        page_number,
        &table_captions,
        &rules,
        &bands,
        options,
        &mut warnings,
    );
    let table_boxes: Vec<BBox> = table_regions.iter().map(|t| t.bbox).collect();

    // Blocks inside a resolved table are body cells, not prose.
    let survivors = filter_table_blocks(&plain_rects, &table_regions);
    let plain: Vec<(BBox, String)> = survivors.into_iter().map(|i| plain[i].clone()).collect();
    let plain_rects: Vec<BBox> = plain.iter().map(|(r, _)| *r).collect();

    #[cfg(feature = "tracing")]
    tracing::debug!(
        page = page_number,
        regions = table_regions.len(),
        "resolved table regions"
    );

    // Dominant column members become absorption obstacles; their union
    // limits which drawing elements are worth clustering.
    let columns = detect_columns(&plain_rects, options.column_tolerance);
    let dominant = dominant_columns(&columns, options.column_width_ratio);
    let obstacles: Vec<BBox> = dominant
        .iter()
        .flat_map(|c| c.members.iter().map(|&i| plain_rects[i]))
        .collect();
    let column_union = dominant
        .iter()
        .map(|c| c.bbox)
        .reduce(|a, b| a.union(&b));

    let mut caption_rects: Vec<BBox> = table_captions
        .iter()
        .chain(figure_captions.iter())
        .map(|c| c.bbox)
        .collect();

    // Graphic elements that still belong to nobody.
    let mut elements: Vec<BBox> = Vec::new();
    for rect in source.image_rects() {
        if rect.is_degenerate() {
            continue;
        }
        if caption_rects
            .iter()
            .any(|c| c.overlap_ratio(&rect) > options.duplicate_overlap_threshold)
        {
            continue;
        }
        if table_boxes
            .iter()
            .any(|t| t.overlap_ratio(&rect) > options.duplicate_overlap_threshold)
        {
            continue;
        }
        elements.push(rect);
    }
    for rect in &drawings {
        if rect.is_degenerate() {
            continue;
        }
        if !column_union.is_some_and(|cu| cu.intersects(rect)) {
            continue;
        }
        if claimed_by_table(rect, &table_boxes, options) {
            continue;
        }
        if caption_rects.iter().any(|c| c.contains(rect) || c.intersects(rect)) {
            continue;
        }
        elements.push(*rect);
    }

    // Coalesce raw fragments first, then cluster into candidate regions.
    let seeds = bound_clusters(&elements, options.initial_cluster_proximity, 0.0);
    let mut clusters = bound_clusters(&seeds, options.cluster_proximity, options.min_cluster_dimension);

    #[cfg(feature = "tracing")]
    tracing::debug!(
        page = page_number,
        elements = elements.len(),
        clusters = clusters.len(),
        "clustered graphic elements"
    );

    // A caption can hide inside a clustered region's text block: subtract
    // the cluster and re-classify what remains.
    let mut redetected: Vec<Caption> = Vec::new();
    for (rect, _) in &plain {
        for cluster in &clusters {
            if !rect.intersects(cluster) {
                continue;
            }
            for candidate in subtract(rect, cluster) {
                let text = source.text_in_region(&candidate);
                if text.trim().is_empty() {
                    continue;
                }
                let Some(m) = classifier.classify(&text) else {
                    continue;
                };
                let label = m.label();
                let exists = table_captions
                    .iter()
                    .chain(figure_captions.iter())
                    .chain(redetected.iter())
                    .any(|c| c.label == label);
                if exists {
                    warnings.push(LayoutWarning::new(
                        LayoutWarningCode::DuplicateCaption,
                        page_number,
                        format!("re-detected caption '{label}' already present; dropped"),
                    ));
                    continue;
                }
                redetected.push(Caption {
                    bbox: candidate,
                    label,
                    text: text.trim().to_string(),
                    page: page_number,
                    kind: m.kind,
                });
            }
        }
    }
    for caption in redetected {
        caption_rects.push(caption.bbox);
        match caption.kind {
            CaptionKind::Table => table_captions.push(caption),
            CaptionKind::Figure => figure_captions.push(caption),
        }
    }

    // Text augmentation: leftover prose outside the dominant columns can be
    // part of a figure (axis labels, legends) and joins the cluster set.
    // The first page is title matter and produces giant false clusters.
    if !(options.skip_first_page_augmentation && page_number == 0) {
        let mut text_elements: Vec<BBox> = Vec::new();
        for (rect, _) in &plain {
            if rect.is_degenerate() {
                continue;
            }
            if !column_union.is_some_and(|cu| cu.intersects(rect)) {
                continue;
            }
            if claimed_by_table(rect, &table_boxes, options) {
                continue;
            }
            if caption_rects.iter().any(|c| c.contains(rect) || c.intersects(rect)) {
                continue;
            }
            if obstacles.iter().any(|o| o.contains(rect) || o.intersects(rect)) {
                continue;
            }
            text_elements.push(*rect);
        }
        let extra = bound_clusters(
            &text_elements,
            options.cluster_proximity,
            options.min_cluster_dimension,
        );
        if !extra.is_empty() {
            clusters.extend(extra);
            clusters = merge_overlapping(clusters);
        }
    }

    let mut matches = match_captions(&figure_captions, &clusters);
    for caption in &figure_captions {
        if !matches.contains_key(&caption.label) {
            warnings.push(LayoutWarning::new(
                LayoutWarningCode::UnmatchedCaption,
                page_number,
                format!("'{}' matched no cluster", caption.label),
            ));
        }
    }

    let all_captions: Vec<Caption> = table_captions
        .iter()
        .chain(figure_captions.iter())
        .cloned()
        .collect();
    absorb_unmatched(
        &mut matches,
        &clusters,
        &obstacles,
        &table_boxes,
        &all_captions,
        page_number,
        &mut warnings,
    );

    #[cfg(feature = "tracing")]
    tracing::debug!(
        page = page_number,
        matches = matches.len(),
        warnings = warnings.len(),
        "page linked"
    );

    Ok(PageOutcome {
        page: page_number,
        table_regions,
        matches,
        captions: all_captions,
        warnings,
    })
}

/// Whether a drawing or text rect belongs to an already-resolved table.
fn claimed_by_table(rect: &BBox, tables: &[BBox], options: &LinkOptions) -> bool {
    tables.iter().any(|t| {
        t.overlap_ratio(rect) > options.duplicate_overlap_threshold
            || (rect.height() < options.thin_element_height && t.contains_point(&rect.center()))
            || t.contains(rect)
            || t.intersects(rect)
    })
}
