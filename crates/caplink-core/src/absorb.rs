//! Absorption of unmatched clusters into existing matches.
//!
//! Clusters the matcher left unassigned are folded into the nearest matched
//! region, closest first, unless the grown region would collide with other
//! page geometry. A rejected candidate is skipped, never retried.

use std::collections::BTreeMap;

use crate::caption::Caption;
use crate::error::{LayoutWarning, LayoutWarningCode};
use crate::geometry::BBox;
use crate::matching::RegionMatch;

/// Coordinate tolerance when testing whether a cluster is already matched.
const MATCHED_EPSILON: f64 = 1e-3;

/// Grow matched regions by absorbing unmatched clusters.
///
/// For each unmatched cluster, the nearest matched region is found and the
/// `(distance, label, cluster)` triples are processed in ascending distance
/// order, so the closest clusters claim first. A candidate union is rejected
/// when it would intersect or contain any `obstacle` rect or table region,
/// or intersect, contain, or be contained by another label's caption rect.
/// Accepted unions replace the match's region immediately, so later triples
/// in the same pass see the grown region.
pub fn absorb_unmatched(
    matches: &mut BTreeMap<String, RegionMatch>,
    clusters: &[BBox],
    obstacles: &[BBox],
    table_regions: &[BBox],
    captions: &[Caption],
    page: usize,
    warnings: &mut Vec<LayoutWarning>,
) {
    if matches.is_empty() {
        return;
    }

    let unmatched: Vec<BBox> = clusters
        .iter()
        .filter(|cluster| !matches.values().any(|m| approx_eq(&m.bbox, cluster)))
        .copied()
        .collect();

    let mut triples: Vec<(f64, String, BBox)> = unmatched
        .into_iter()
        .filter_map(|cluster| {
            let (label, distance) = matches
                .iter()
                .map(|(label, m)| (label, cluster.distance(&m.bbox)))
                .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
                .map(|(label, d)| (label.clone(), d))?;
            Some((distance, label, cluster))
        })
        .collect();
    triples.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

    for (_, label, cluster) in triples {
        let Some(current) = matches.get(&label) else {
            continue;
        };
        let union = current.bbox.union(&cluster);

        let blocked = obstacles
            .iter()
            .chain(table_regions.iter())
            .any(|r| union.intersects(r) || union.contains(r))
            || captions.iter().any(|cap| {
                cap.label != label
                    && (union.intersects(&cap.bbox)
                        || union.contains(&cap.bbox)
                        || cap.bbox.contains(&union))
            });
        if blocked {
            warnings.push(LayoutWarning::new(
                LayoutWarningCode::AbsorptionConflict,
                page,
                format!("cluster near '{label}' left unmatched: union would conflict"),
            ));
            continue;
        }
        if let Some(m) = matches.get_mut(&label) {
            m.bbox = union;
        }
    }
}

fn approx_eq(a: &BBox, b: &BBox) -> bool {
    (a.x0 - b.x0).abs() < MATCHED_EPSILON
        && (a.top - b.top).abs() < MATCHED_EPSILON
        && (a.x1 - b.x1).abs() < MATCHED_EPSILON
        && (a.bottom - b.bottom).abs() < MATCHED_EPSILON
}
