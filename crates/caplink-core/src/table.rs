//! Table boundary resolution from horizontal rule evidence.
//!
//! For each table caption, infers the table's bounding rectangle from rule
//! candidates aligned with the caption, falling back to column context and
//! finally to a synthesized fixed-height region. Duplicate candidates are
//! retried against leftover rule runs so stacked sub-tables sharing one
//! caption can resolve to a second, nested region.

use crate::caption::Caption;
use crate::error::{LayoutWarning, LayoutWarningCode};
use crate::geometry::BBox;
use crate::options::LinkOptions;

/// A resolved table region.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TableRegion {
    /// Page the region lies on (0-based).
    pub page: usize,
    /// The table's bounding rectangle.
    pub bbox: BBox,
    /// Label of the caption the region belongs to.
    pub label: String,
}

/// Resolve a table region for every table caption on a page.
///
/// `captions` are the page's table captions, `rules` the horizontal rule
/// candidates, `columns` the detected column bands (most dominant first).
/// Regions are returned in caption order; at most one per caption. Captions
/// that resolve only to a duplicate of an earlier region, or whose rule
/// evidence collapses entirely, produce a warning instead of a region.
pub fn resolve_table_regions(
    page: usize,
    captions: &[Caption],
    rules: &[BBox],
    columns: &[BBox],
    options: &LinkOptions,
    warnings: &mut Vec<LayoutWarning>,
) -> Vec<TableRegion> {
    let mut regions: Vec<TableRegion> = Vec::new();
    let tol = options.caption_align_tolerance;

    for (cap_idx, caption) in captions.iter().enumerate() {
        let center = caption.bbox.center();

        // Step 1: rules whose center-x aligns with the caption.
        let aligned: Vec<BBox> = rules
            .iter()
            .filter(|rule| (rule.center().x - center.x).abs() <= tol)
            .copied()
            .collect();

        // Step 2: column fallback. A caption served by its column band
        // instead of direct alignment is "boundless": no strict y-ordering
        // is enforced on its candidates.
        let (selected, boundless, x_range) = if aligned.is_empty() {
            let range = columns
                .iter()
                .find(|col| col.x0 <= center.x && center.x <= col.x1)
                .map(|col| (col.x0, col.x1))
                .unwrap_or((caption.bbox.x0, caption.bbox.x1));
            let in_band: Vec<BBox> = rules
                .iter()
                .filter(|rule| rule.x0 <= range.1 + tol && rule.x1 >= range.0 - tol)
                .copied()
                .collect();
            (in_band, true, range)
        } else {
            (aligned, false, (caption.bbox.x0, caption.bbox.x1))
        };

        // Step 3: no rule evidence at all — synthesize a region directly
        // below the caption.
        if selected.is_empty() {
            let fallback = BBox::new(
                x_range.0,
                caption.bbox.bottom,
                x_range.1,
                caption.bbox.bottom + options.fallback_table_height,
            );
            if is_duplicate(&regions, &fallback, options.duplicate_overlap_threshold) {
                warnings.push(LayoutWarning::new(
                    LayoutWarningCode::DuplicateRegion,
                    page,
                    format!("fallback region for '{}' duplicates an existing table", caption.label),
                ));
            } else {
                warnings.push(LayoutWarning::new(
                    LayoutWarningCode::FallbackRegion,
                    page,
                    format!("no rule evidence for '{}'; synthesized fixed-height region", caption.label),
                ));
                regions.push(TableRegion {
                    page,
                    bbox: fallback,
                    label: caption.label.clone(),
                });
            }
            continue;
        }

        // Step 4: anchor rule and search direction.
        let anchor = nearest_rule(&selected, center.y);
        let below = anchor.center().y > center.y;

        let candidates: Vec<BBox> = selected
            .iter()
            .filter(|rule| {
                boundless
                    || (same_side(rule.center().y, center.y, below) && !rule.intersects(&caption.bbox))
            })
            .copied()
            .collect();

        // The nearest same-x-aligned caption on the search side bounds the
        // y-range, so this table's rules cannot cross a neighboring caption.
        let boundary_y = if boundless {
            None
        } else {
            neighbor_boundary(captions, cap_idx, &center, below, tol)
        };

        let bounded: Vec<BBox> = candidates
            .into_iter()
            .filter(|rule| {
                if boundless {
                    return true;
                }
                let y = rule.center().y;
                same_side(y, center.y, below)
                    && boundary_y.is_none_or(|b| if below { y < b } else { y > b })
            })
            .collect();

        // Step 5: group into rule runs by x-range similarity; the run
        // containing the anchor is the first candidate.
        let mut runs = group_rule_runs(&bounded, options.rule_group_tolerance);
        let mut chosen = runs.iter().position(|run| run.contains(&anchor));

        // Step 6/7: record the candidate, retrying on leftover runs when it
        // duplicates an existing region.
        let mut retries_left = options.nested_table_retries;
        loop {
            let Some(pos) = chosen else {
                warnings.push(LayoutWarning::new(
                    LayoutWarningCode::RegionNotFound,
                    page,
                    format!("no rule run survived filtering for '{}'", caption.label),
                ));
                break;
            };
            let run = runs.swap_remove(pos);
            let bbox = bound_run(&run);
            if !is_duplicate(&regions, &bbox, options.duplicate_overlap_threshold) {
                regions.push(TableRegion {
                    page,
                    bbox,
                    label: caption.label.clone(),
                });
                break;
            }
            if retries_left == 0 || runs.is_empty() {
                warnings.push(LayoutWarning::new(
                    LayoutWarningCode::DuplicateRegion,
                    page,
                    format!("all rule runs for '{}' duplicate existing tables", caption.label),
                ));
                break;
            }
            retries_left -= 1;
            chosen = nearest_run(&runs, center.y);
        }
    }
    regions
}

/// Remove text blocks that intersect any resolved table region.
///
/// Blocks inside a table are body cells, not prose, and must not feed the
/// column or clustering stages. Returns the indices of the surviving blocks.
pub fn filter_table_blocks(blocks: &[BBox], regions: &[TableRegion]) -> Vec<usize> {
    (0..blocks.len())
        .filter(|&i| !regions.iter().any(|r| r.bbox.intersects(&blocks[i])))
        .collect()
}

fn is_duplicate(regions: &[TableRegion], candidate: &BBox, threshold: f64) -> bool {
    regions
        .iter()
        .any(|r| r.bbox.overlap_ratio(candidate) > threshold)
}

fn same_side(y: f64, center_y: f64, below: bool) -> bool {
    if below { y > center_y } else { y < center_y }
}

fn nearest_rule(rules: &[BBox], center_y: f64) -> BBox {
    let mut best = rules[0];
    let mut best_diff = (best.center().y - center_y).abs();
    for rule in &rules[1..] {
        let diff = (rule.center().y - center_y).abs();
        if diff < best_diff {
            best = *rule;
            best_diff = diff;
        }
    }
    best
}

/// Index of the run whose nearest member rule is closest to the caption.
fn nearest_run(runs: &[Vec<BBox>], center_y: f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, run) in runs.iter().enumerate() {
        for rule in run {
            let diff = (rule.center().y - center_y).abs();
            if best.is_none_or(|(_, d)| diff < d) {
                best = Some((i, diff));
            }
        }
    }
    best.map(|(i, _)| i)
}

/// The center-y of the nearest other caption aligned with this one on the
/// search side, if any.
fn neighbor_boundary(
    captions: &[Caption],
    cap_idx: usize,
    center: &crate::geometry::Point,
    below: bool,
    tolerance: f64,
) -> Option<f64> {
    let mut boundary: Option<f64> = None;
    for (i, other) in captions.iter().enumerate() {
        if i == cap_idx {
            continue;
        }
        let oc = other.bbox.center();
        if (oc.x - center.x).abs() > tolerance || !same_side(oc.y, center.y, below) {
            continue;
        }
        boundary = Some(match boundary {
            None => oc.y,
            Some(b) => {
                if below {
                    b.min(oc.y)
                } else {
                    b.max(oc.y)
                }
            }
        });
    }
    boundary
}

/// Group rules into runs by x-range similarity: a rule joins the first run
/// whose first member has both edges within `tolerance` of its own.
fn group_rule_runs(rules: &[BBox], tolerance: f64) -> Vec<Vec<BBox>> {
    let mut runs: Vec<Vec<BBox>> = Vec::new();
    for rule in rules {
        let placed = runs.iter_mut().find(|run| {
            let rep = run[0];
            (rule.x0 - rep.x0).abs() <= tolerance && (rule.x1 - rep.x1).abs() <= tolerance
        });
        match placed {
            Some(run) => run.push(*rule),
            None => runs.push(vec![*rule]),
        }
    }
    runs
}

fn bound_run(run: &[BBox]) -> BBox {
    let mut iter = run.iter();
    // Runs are never empty by construction.
    let first = *iter.next().unwrap_or(&BBox::new(0.0, 0.0, 0.0, 0.0));
    iter.fold(first, |acc, r| acc.union(r))
}
