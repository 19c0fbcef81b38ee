//! Column band detection from text-block geometry.
//!
//! A column band is a horizontal page region dominated by text blocks that
//! share similar left/right x-extents. Bands serve as fallback spatial
//! context for table-boundary search and as the source of obstacle
//! rectangles during absorption.

use crate::geometry::BBox;

/// A detected column band.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Column {
    /// Bounding box of the band's member blocks.
    pub bbox: BBox,
    /// Indices into the input block slice.
    pub members: Vec<usize>,
}

/// Greedily partition text blocks into column bands, most dominant first.
///
/// Repeat until no blocks remain: group blocks by representative x-range
/// (both edges within `tolerance` of the group's first member), take the
/// group with the largest total area as the next band, then drop every
/// remaining block whose x-range horizontally overlaps the band.
/// Degenerate blocks are ignored.
pub fn detect_columns(blocks: &[BBox], tolerance: f64) -> Vec<Column> {
    // A zero-area block never x-overlaps the band that consumed it and
    // would never leave the remaining set.
    let mut remaining: Vec<usize> = (0..blocks.len())
        .filter(|&i| !blocks[i].is_degenerate())
        .collect();
    let mut columns = Vec::new();

    while !remaining.is_empty() {
        let mut groups: Vec<Vec<usize>> = Vec::new();
        for &idx in &remaining {
            let rect = blocks[idx];
            let placed = groups.iter_mut().find(|group| {
                let rep = blocks[group[0]];
                (rect.x0 - rep.x0).abs() <= tolerance && (rect.x1 - rep.x1).abs() <= tolerance
            });
            match placed {
                Some(group) => group.push(idx),
                None => groups.push(vec![idx]),
            }
        }

        let mut dominant = 0;
        let mut best_area = f64::NEG_INFINITY;
        for (i, group) in groups.iter().enumerate() {
            let area: f64 = group.iter().map(|&idx| blocks[idx].area()).sum();
            if area > best_area {
                best_area = area;
                dominant = i;
            }
        }
        let members = groups.swap_remove(dominant);
        let mut iter = members.iter();
        // Groups are never empty by construction.
        let Some(&first) = iter.next() else {
            break;
        };
        let bbox = iter.fold(blocks[first], |acc, &idx| acc.union(&blocks[idx]));

        remaining.retain(|&idx| !(blocks[idx].x1 > bbox.x0 && blocks[idx].x0 < bbox.x1));
        columns.push(Column { bbox, members });
    }
    columns
}

/// Keep the widest bands: the widest first, then each next-widest band whose
/// width is at least `width_ratio` of the previously kept one.
///
/// Narrow stray bands (margin notes, page decorations) are excluded from the
/// obstacle set this way, leaving their blocks available for text
/// augmentation clustering.
pub fn dominant_columns(columns: &[Column], width_ratio: f64) -> Vec<Column> {
    let mut by_width: Vec<&Column> = columns.iter().collect();
    by_width.sort_by(|a, b| {
        b.bbox
            .width()
            .partial_cmp(&a.bbox.width())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut kept: Vec<Column> = Vec::new();
    for column in by_width {
        match kept.last() {
            None => kept.push(column.clone()),
            Some(prev) if column.bbox.width() >= prev.bbox.width() * width_ratio => {
                kept.push(column.clone());
            }
            Some(_) => break,
        }
    }
    kept
}
