//! Integration tests for the document linking pipeline.
//!
//! These exercise the full per-page flow (classification, column detection,
//! table resolution, clustering, re-detection, matching, absorption) through
//! the public API with in-memory page geometry.

use caplink::{
    BBox, CaptionKind, LayoutWarningCode, LinkError, LinkOptions, MemoryPage, PageSource,
    link_document,
};

#[test]
fn table_caption_anchors_on_rule_below() {
    let mut page = MemoryPage::new();
    page.push_text_block(BBox::new(0.0, 50.0, 100.0, 62.0), "Table 1.");
    page.push_drawing(BBox::new(0.0, 70.0, 100.0, 71.5));

    let layout = link_document(&[page], &LinkOptions::default()).unwrap();
    assert_eq!(layout.table_regions.len(), 1);
    let region = &layout.table_regions[0];
    assert_eq!(region.page, 0);
    assert_eq!(region.label, "Table 1");
    assert_eq!(region.bbox, BBox::new(0.0, 70.0, 100.0, 71.5));
    assert_eq!(layout.captions.len(), 1);
    assert_eq!(layout.captions[0].kind, CaptionKind::Table);
}

#[test]
fn figure_captions_pair_with_nearest_clusters() {
    let mut page = MemoryPage::new();
    page.push_text_block(BBox::new(0.0, 0.0, 50.0, 10.0), "Figure 1.");
    page.push_text_block(BBox::new(200.0, 0.0, 250.0, 10.0), "Figure 2.");
    page.push_image(BBox::new(0.0, 20.0, 50.0, 60.0));
    page.push_image(BBox::new(200.0, 20.0, 250.0, 60.0));

    let layout = link_document(&[page], &LinkOptions::default()).unwrap();
    let matches = &layout.matches[&0];
    assert_eq!(matches.len(), 2);
    assert_eq!(matches["Figure 1"].bbox, BBox::new(0.0, 20.0, 50.0, 60.0));
    assert_eq!(matches["Figure 2"].bbox, BBox::new(200.0, 20.0, 250.0, 60.0));
    assert_eq!(matches["Figure 1"].distance, 10.0);
}

#[test]
fn fallback_region_sits_directly_below_caption() {
    let mut page = MemoryPage::new();
    page.push_text_block(BBox::new(20.0, 50.0, 120.0, 62.0), "Table 3.");

    let options = LinkOptions::default();
    let layout = link_document(&[page], &options).unwrap();
    assert_eq!(layout.table_regions.len(), 1);
    let bbox = layout.table_regions[0].bbox;
    assert_eq!(bbox.top, 62.0);
    assert_eq!(bbox.height(), options.fallback_table_height);
    assert!(
        layout
            .warnings
            .iter()
            .any(|w| w.code == LayoutWarningCode::FallbackRegion)
    );
}

#[test]
fn duplicate_labels_on_one_page_are_an_error() {
    let mut page = MemoryPage::new();
    page.push_text_block(BBox::new(0.0, 0.0, 100.0, 12.0), "Table 1.");
    page.push_text_block(BBox::new(0.0, 300.0, 100.0, 312.0), "Table 1.");

    let err = link_document(&[page], &LinkOptions::default()).unwrap_err();
    match err {
        LinkError::DuplicateLabel { page, label } => {
            assert_eq!(page, 0);
            assert_eq!(label, "Table 1");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn empty_pages_produce_empty_layout() {
    let layout = link_document::<MemoryPage>(&[], &LinkOptions::default()).unwrap();
    assert!(layout.table_regions.is_empty());
    assert!(layout.matches.is_empty());
    assert!(layout.captions.is_empty());
    assert!(layout.warnings.is_empty());

    let layout = link_document(&[MemoryPage::new()], &LinkOptions::default()).unwrap();
    assert!(layout.table_regions.is_empty());
    assert!(layout.matches.is_empty());
}

#[test]
fn unmatched_cluster_is_absorbed_into_nearest_match() {
    let mut page = MemoryPage::new();
    page.push_text_block(BBox::new(0.0, 0.0, 50.0, 10.0), "Figure 1.");
    // Two image groups too far apart to share a cluster.
    page.push_image(BBox::new(0.0, 20.0, 50.0, 60.0));
    page.push_image(BBox::new(0.0, 90.0, 50.0, 130.0));

    let layout = link_document(&[page], &LinkOptions::default()).unwrap();
    let matches = &layout.matches[&0];
    assert_eq!(matches.len(), 1);
    // The far cluster is folded into the matched region.
    assert_eq!(matches["Figure 1"].bbox, BBox::new(0.0, 20.0, 50.0, 130.0));
    // Provenance still describes the original match.
    assert_eq!(matches["Figure 1"].distance, 10.0);
}

#[test]
fn absorption_refuses_to_cross_other_regions() {
    let mut page = MemoryPage::new();
    page.push_text_block(BBox::new(0.0, 0.0, 50.0, 10.0), "Figure 1.");
    // A table caption (with no rule evidence) sits between the figure's
    // cluster and the leftover cluster; its fallback region blocks the union.
    page.push_text_block(BBox::new(10.0, 60.0, 40.0, 70.0), "Table 9.");
    page.push_image(BBox::new(0.0, 20.0, 50.0, 55.0));
    page.push_image(BBox::new(0.0, 110.0, 50.0, 150.0));

    let layout = link_document(&[page], &LinkOptions::default()).unwrap();
    let matches = &layout.matches[&0];
    assert_eq!(matches["Figure 1"].bbox, BBox::new(0.0, 20.0, 50.0, 55.0));
    assert!(
        layout
            .warnings
            .iter()
            .any(|w| w.code == LayoutWarningCode::AbsorptionConflict)
    );
}

/// A page source whose region queries return text the block list cannot:
/// simulates clipping a caption line out of a larger paragraph block.
struct RedetectionPage;

impl PageSource for RedetectionPage {
    fn text_blocks(&self) -> Vec<(BBox, String)> {
        vec![(
            BBox::new(0.0, 60.0, 100.0, 120.0),
            "A paragraph that swallowed its caption line".to_string(),
        )]
    }

    fn image_rects(&self) -> Vec<BBox> {
        vec![BBox::new(0.0, 0.0, 100.0, 80.0)]
    }

    fn drawing_rects(&self) -> Vec<BBox> {
        Vec::new()
    }

    fn text_in_region(&self, region: &BBox) -> String {
        if region.top >= 80.0 {
            "Fig 9:".to_string()
        } else {
            String::new()
        }
    }
}

#[test]
fn caption_is_redetected_inside_subtracted_cluster_remainder() {
    let layout = link_document(&[RedetectionPage], &LinkOptions::default()).unwrap();
    let caption = layout
        .captions
        .iter()
        .find(|c| c.label == "Figure 9")
        .expect("re-detected caption");
    assert_eq!(caption.kind, CaptionKind::Figure);
    // The caption rect is the paragraph remainder below the cluster.
    assert_eq!(caption.bbox, BBox::new(0.0, 80.0, 100.0, 120.0));
    // And it matches the cluster it was carved out of.
    let matches = &layout.matches[&0];
    assert_eq!(matches["Figure 9"].bbox, BBox::new(0.0, 0.0, 100.0, 80.0));
    assert_eq!(matches["Figure 9"].distance, 0.0);
}

#[test]
fn results_merge_across_pages_in_order() {
    let mut first = MemoryPage::new();
    first.push_text_block(BBox::new(0.0, 50.0, 100.0, 62.0), "Table 1.");
    first.push_drawing(BBox::new(0.0, 70.0, 100.0, 71.5));

    let mut second = MemoryPage::new();
    second.push_text_block(BBox::new(0.0, 0.0, 50.0, 10.0), "Figure 1.");
    second.push_image(BBox::new(0.0, 20.0, 50.0, 60.0));

    let layout = link_document(&[first, second], &LinkOptions::default()).unwrap();
    assert_eq!(layout.table_regions.len(), 1);
    assert_eq!(layout.table_regions[0].page, 0);
    assert!(!layout.matches.contains_key(&0));
    assert_eq!(layout.matches[&1]["Figure 1"].bbox, BBox::new(0.0, 20.0, 50.0, 60.0));
    assert_eq!(layout.captions.len(), 2);
    assert_eq!(layout.captions[1].page, 1);
}

#[test]
fn degenerate_text_blocks_are_dropped() {
    let mut page = MemoryPage::new();
    // Zero-width prose and a zero-height caption: both must be ignored.
    page.push_text_block(BBox::new(40.0, 10.0, 40.0, 30.0), "sidebar note");
    page.push_text_block(BBox::new(0.0, 90.0, 50.0, 90.0), "Figure 9.");
    page.push_text_block(BBox::new(0.0, 50.0, 100.0, 62.0), "Table 1.");
    page.push_drawing(BBox::new(0.0, 70.0, 100.0, 71.5));

    let layout = link_document(&[page], &LinkOptions::default()).unwrap();
    assert_eq!(layout.table_regions.len(), 1);
    assert_eq!(layout.captions.len(), 1);
    assert_eq!(layout.captions[0].label, "Table 1");
    assert!(layout.matches.is_empty());
}

/// A page whose only figure evidence is a stray prose block sitting in the
/// gap of the dominant column: it becomes a cluster only through the
/// text-augmentation pass.
fn page_with_stray_prose() -> MemoryPage {
    let mut page = MemoryPage::new();
    page.push_text_block(BBox::new(210.0, 215.0, 260.0, 225.0), "Figure 1.");
    page.push_text_block(BBox::new(200.0, 0.0, 500.0, 100.0), "column paragraph one");
    page.push_text_block(BBox::new(200.0, 110.0, 500.0, 200.0), "column paragraph two");
    page.push_text_block(BBox::new(210.0, 101.0, 300.0, 109.0), "axis labels");
    page
}

#[test]
fn text_augmentation_is_skipped_on_the_first_page() {
    let page = page_with_stray_prose();
    let layout = link_document(&[page.clone(), page], &LinkOptions::default()).unwrap();

    // Page 0: no text-derived cluster, so the caption stays unmatched.
    assert!(!layout.matches.contains_key(&0));
    assert!(
        layout
            .warnings
            .iter()
            .any(|w| w.code == LayoutWarningCode::UnmatchedCaption && w.page == 0)
    );

    // Page 1: identical geometry, but the stray block clusters and matches.
    assert_eq!(
        layout.matches[&1]["Figure 1"].bbox,
        BBox::new(210.0, 101.0, 300.0, 109.0)
    );
}

#[test]
fn first_page_augmentation_can_be_reenabled() {
    let options = LinkOptions {
        skip_first_page_augmentation: false,
        ..LinkOptions::default()
    };
    let layout = link_document(&[page_with_stray_prose()], &options).unwrap();
    assert_eq!(
        layout.matches[&0]["Figure 1"].bbox,
        BBox::new(210.0, 101.0, 300.0, 109.0)
    );
}

#[cfg(feature = "parallel")]
#[test]
fn parallel_linking_matches_sequential() {
    use caplink::link_document_parallel;

    let mut pages = Vec::new();
    for i in 0..4 {
        let mut page = MemoryPage::new();
        let y = 50.0 + i as f64;
        page.push_text_block(BBox::new(0.0, y, 100.0, y + 12.0), "Table 1.");
        page.push_drawing(BBox::new(0.0, y + 20.0, 100.0, y + 21.0));
        page.push_text_block(BBox::new(200.0, 0.0, 250.0, 10.0), "Figure 1.");
        page.push_image(BBox::new(200.0, 20.0, 250.0, 60.0));
        pages.push(page);
    }
    let options = LinkOptions::default();
    let sequential = link_document(&pages, &options).unwrap();
    let parallel = link_document_parallel(&pages, &options).unwrap();
    assert_eq!(sequential, parallel);
}
