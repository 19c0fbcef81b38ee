//! Bipartite matching of figure captions to clusters.
//!
//! Each caption ranks the page's clusters by nearest-boundary distance and
//! the matcher computes a maximum-cardinality assignment by augmenting
//! paths: a caption that wants an already-claimed cluster tries to re-home
//! the rival caption to one of its remaining candidates. The result is
//! injective in both directions but not guaranteed minimal in total
//! distance.

use std::collections::BTreeMap;

use crate::caption::Caption;
use crate::geometry::{BBox, Point};

/// A caption matched to a cluster region, with provenance for diagnostics.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegionMatch {
    /// The matched cluster's bounding box. May grow by union during the
    /// absorption pass.
    pub bbox: BBox,
    /// Closest point on the cluster at match time.
    pub region_point: Point,
    /// Closest point on the caption at match time.
    pub caption_point: Point,
    /// Distance between the closest points at match time.
    pub distance: f64,
}

struct Candidate {
    cluster: usize,
    distance: f64,
    region_point: Point,
    caption_point: Point,
}

/// Match captions to clusters, keyed by caption label.
///
/// Caption labels are assumed unique on the page; the driver validates this
/// before calling. At most `min(captions, clusters)` entries are returned.
pub fn match_captions(captions: &[Caption], clusters: &[BBox]) -> BTreeMap<String, RegionMatch> {
    if captions.is_empty() || clusters.is_empty() {
        return BTreeMap::new();
    }

    let candidates: Vec<Vec<Candidate>> = captions
        .iter()
        .map(|caption| {
            let mut list: Vec<Candidate> = clusters
                .iter()
                .enumerate()
                .map(|(j, cluster)| {
                    let (region_point, caption_point) = cluster.closest_points(&caption.bbox);
                    Candidate {
                        cluster: j,
                        distance: region_point.distance_to(&caption_point),
                        region_point,
                        caption_point,
                    }
                })
                .collect();
            list.sort_by(|a, b| {
                a.distance
                    .partial_cmp(&b.distance)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
            list
        })
        .collect();

    // assignment[cluster] = caption currently holding it.
    let mut assignment: Vec<Option<usize>> = vec![None; clusters.len()];
    for caption_idx in 0..captions.len() {
        let mut visited = vec![false; clusters.len()];
        augment(caption_idx, &candidates, &mut assignment, &mut visited);
    }

    let mut matches = BTreeMap::new();
    for (cluster_idx, holder) in assignment.iter().enumerate() {
        let Some(caption_idx) = holder else { continue };
        let Some(chosen) = candidates[*caption_idx]
            .iter()
            .find(|c| c.cluster == cluster_idx)
        else {
            continue;
        };
        matches.insert(
            captions[*caption_idx].label.clone(),
            RegionMatch {
                bbox: clusters[cluster_idx],
                region_point: chosen.region_point,
                caption_point: chosen.caption_point,
                distance: chosen.distance,
            },
        );
    }
    matches
}

/// Try to assign `caption_idx` to one of its candidates, displacing rivals
/// recursively. `visited` guards each cluster once per augmenting attempt.
fn augment(
    caption_idx: usize,
    candidates: &[Vec<Candidate>],
    assignment: &mut [Option<usize>],
    visited: &mut [bool],
) -> bool {
    for candidate in &candidates[caption_idx] {
        if visited[candidate.cluster] {
            continue;
        }
        visited[candidate.cluster] = true;
        let free = match assignment[candidate.cluster] {
            None => true,
            Some(rival) => augment(rival, candidates, assignment, visited),
        };
        if free {
            assignment[candidate.cluster] = Some(caption_idx);
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::caption::CaptionKind;

    fn figure_caption(label: &str, x0: f64, top: f64, x1: f64, bottom: f64) -> Caption {
        Caption {
            bbox: BBox::new(x0, top, x1, bottom),
            label: label.to_string(),
            text: format!("{label}."),
            page: 0,
            kind: CaptionKind::Figure,
        }
    }

    #[test]
    fn test_nearest_pairing_no_cross_assignment() {
        let captions = [
            figure_caption("Figure 1", 0.0, 0.0, 50.0, 10.0),
            figure_caption("Figure 2", 200.0, 0.0, 250.0, 10.0),
        ];
        let clusters = [
            BBox::new(0.0, 20.0, 50.0, 60.0),
            BBox::new(200.0, 20.0, 250.0, 60.0),
        ];
        let matches = match_captions(&captions, &clusters);
        assert_eq!(matches.len(), 2);
        assert_eq!(matches["Figure 1"].bbox, clusters[0]);
        assert_eq!(matches["Figure 2"].bbox, clusters[1]);
        assert_eq!(matches["Figure 1"].distance, 10.0);
    }

    #[test]
    fn test_augmenting_path_rehomes_rival() {
        // Both captions are closest to cluster 0; the matcher must still
        // place both by pushing one caption to cluster 1.
        let captions = [
            figure_caption("Figure 1", 0.0, 0.0, 50.0, 10.0),
            figure_caption("Figure 2", 0.0, 70.0, 50.0, 80.0),
        ];
        let clusters = [
            BBox::new(0.0, 20.0, 50.0, 60.0),
            BBox::new(0.0, 200.0, 50.0, 240.0),
        ];
        let matches = match_captions(&captions, &clusters);
        assert_eq!(matches.len(), 2);
        assert_ne!(matches["Figure 1"].bbox, matches["Figure 2"].bbox);
    }

    #[test]
    fn test_injectivity_with_more_captions_than_clusters() {
        let captions = [
            figure_caption("Figure 1", 0.0, 0.0, 50.0, 10.0),
            figure_caption("Figure 2", 0.0, 70.0, 50.0, 80.0),
            figure_caption("Figure 3", 0.0, 300.0, 50.0, 310.0),
        ];
        let clusters = [
            BBox::new(0.0, 20.0, 50.0, 60.0),
            BBox::new(0.0, 100.0, 50.0, 140.0),
        ];
        let matches = match_captions(&captions, &clusters);
        assert_eq!(matches.len(), 2);
        let boxes: Vec<BBox> = matches.values().map(|m| m.bbox).collect();
        assert_ne!(boxes[0], boxes[1]);
    }

    #[test]
    fn test_provenance_points() {
        let captions = [figure_caption("Figure 1", 0.0, 0.0, 50.0, 10.0)];
        let clusters = [BBox::new(0.0, 20.0, 50.0, 60.0)];
        let matches = match_captions(&captions, &clusters);
        let m = &matches["Figure 1"];
        assert_eq!(m.region_point, Point::new(25.0, 20.0));
        assert_eq!(m.caption_point, Point::new(25.0, 10.0));
        assert_eq!(m.distance, 10.0);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(match_captions(&[], &[BBox::new(0.0, 0.0, 1.0, 1.0)]).is_empty());
        let captions = [figure_caption("Figure 1", 0.0, 0.0, 50.0, 10.0)];
        assert!(match_captions(&captions, &[]).is_empty());
    }
}
