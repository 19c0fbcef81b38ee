//! Proximity-based clustering of page elements.
//!
//! Builds the connected components of the implicit graph whose edges join
//! rects within a distance threshold of each other ([`BBox::is_near`]), then
//! bounds each component into a single candidate region.

use std::collections::VecDeque;

use crate::geometry::{BBox, merge_overlapping};

/// Partition rects into connected components under the proximity threshold.
///
/// Every input rect appears in exactly one component. With a threshold of 0
/// only overlapping or touching rects share a component. Traversal is
/// breadth-first with an explicit queue and visited set.
pub fn cluster_rects(rects: &[BBox], threshold: f64) -> Vec<Vec<BBox>> {
    let mut visited = vec![false; rects.len()];
    let mut clusters = Vec::new();

    for start in 0..rects.len() {
        if visited[start] {
            continue;
        }
        let mut cluster = Vec::new();
        let mut queue = VecDeque::from([start]);
        while let Some(idx) = queue.pop_front() {
            if visited[idx] {
                continue;
            }
            visited[idx] = true;
            cluster.push(rects[idx]);
            for (j, other) in rects.iter().enumerate() {
                if !visited[j] && rects[idx].is_near(other, threshold) {
                    queue.push_back(j);
                }
            }
        }
        clusters.push(cluster);
    }
    clusters
}

/// Cluster rects and bound each component into a single box.
///
/// Components whose bounding box is narrower or shorter than
/// `min_dimension` are dropped, and the surviving boxes are merged to a
/// fixed point so the result contains no overlapping or nested regions.
pub fn bound_clusters(rects: &[BBox], threshold: f64, min_dimension: f64) -> Vec<BBox> {
    let mut bounded = Vec::new();
    for cluster in cluster_rects(rects, threshold) {
        let mut iter = cluster.into_iter();
        let Some(first) = iter.next() else {
            continue;
        };
        let bbox = iter.fold(first, |acc, r| acc.union(&r));
        if bbox.width() < min_dimension || bbox.height() < min_dimension {
            continue;
        }
        bounded.push(bbox);
    }
    merge_overlapping(bounded)
}
