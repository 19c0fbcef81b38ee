//! Rectangle algebra used throughout the linking pipeline.
//!
//! Every downstream component (clustering, column detection, table boundary
//! resolution, matching, absorption) works on [`BBox`] values produced here.
//!
//! Boundary convention: [`BBox::intersects`] requires strictly positive
//! overlap on both axes, so rectangles that merely share an edge do *not*
//! intersect. [`BBox::contains`] is closed — shared edges are allowed.

/// A point on the page.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Bounding box with top-left origin coordinate system.
///
/// - `x0`: left edge
/// - `top`: top edge (distance from top of page)
/// - `x1`: right edge
/// - `bottom`: bottom edge (distance from top of page)
///
/// A well-formed box has `x1 >= x0` and `bottom >= top`. Degenerate boxes
/// (non-positive area) are rejected by consumers via [`BBox::is_degenerate`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BBox {
    pub x0: f64,
    pub top: f64,
    pub x1: f64,
    pub bottom: f64,
}

impl BBox {
    pub fn new(x0: f64, top: f64, x1: f64, bottom: f64) -> Self {
        Self {
            x0,
            top,
            x1,
            bottom,
        }
    }

    /// Width of the bounding box.
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    /// Height of the bounding box.
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Area of the bounding box.
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Returns true if the box has non-positive area.
    pub fn is_degenerate(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    /// Center point of the box.
    pub fn center(&self) -> Point {
        Point::new((self.x0 + self.x1) / 2.0, (self.top + self.bottom) / 2.0)
    }

    /// Compute the union of two bounding boxes.
    pub fn union(&self, other: &BBox) -> BBox {
        BBox {
            x0: self.x0.min(other.x0),
            top: self.top.min(other.top),
            x1: self.x1.max(other.x1),
            bottom: self.bottom.max(other.bottom),
        }
    }

    /// Compute the intersection of two bounding boxes, if it has positive area.
    pub fn intersection(&self, other: &BBox) -> Option<BBox> {
        let x0 = self.x0.max(other.x0);
        let top = self.top.max(other.top);
        let x1 = self.x1.min(other.x1);
        let bottom = self.bottom.min(other.bottom);
        if x1 > x0 && bottom > top {
            Some(BBox::new(x0, top, x1, bottom))
        } else {
            None
        }
    }

    /// Returns true if the boxes overlap with positive area on both axes.
    ///
    /// Rectangles that only share an edge or a corner do not intersect.
    pub fn intersects(&self, other: &BBox) -> bool {
        self.x0 < other.x1 && other.x0 < self.x1 && self.top < other.bottom && other.top < self.bottom
    }

    /// Returns true if `other` lies entirely inside this box (closed test:
    /// shared edges are allowed).
    pub fn contains(&self, other: &BBox) -> bool {
        self.x0 <= other.x0 && self.top <= other.top && other.x1 <= self.x1 && other.bottom <= self.bottom
    }

    /// Returns true if the point lies inside this box (closed test).
    pub fn contains_point(&self, point: &Point) -> bool {
        self.x0 <= point.x && point.x <= self.x1 && self.top <= point.y && point.y <= self.bottom
    }

    /// Overlap area as a fraction of the smaller box's area.
    ///
    /// Returns 0 for disjoint or degenerate boxes. Symmetric in its arguments.
    pub fn overlap_ratio(&self, other: &BBox) -> f64 {
        if self.is_degenerate() || other.is_degenerate() {
            return 0.0;
        }
        match self.intersection(other) {
            Some(inter) => inter.area() / self.area().min(other.area()),
            None => 0.0,
        }
    }

    /// Returns true if the closest boundary points of the two boxes are within
    /// `threshold` of each other. The per-axis gap is clamped at zero, so
    /// overlapping boxes are near at any threshold.
    pub fn is_near(&self, other: &BBox, threshold: f64) -> bool {
        let dx = (self.x0 - other.x1).max(other.x0 - self.x1).max(0.0);
        let dy = (self.top - other.bottom).max(other.top - self.bottom).max(0.0);
        dx.hypot(dy) <= threshold
    }

    /// Closest pair of boundary points between two boxes.
    ///
    /// Per axis: if the boxes are separated, the closest coordinates lie on
    /// the facing edges; if they overlap on that axis, both points take the
    /// midpoint of the overlap interval. The returned pair is
    /// `(point on self, point on other)`.
    pub fn closest_points(&self, other: &BBox) -> (Point, Point) {
        let (sx, ox) = if self.x1 < other.x0 {
            (self.x1, other.x0)
        } else if other.x1 < self.x0 {
            (self.x0, other.x1)
        } else {
            let mid = (self.x0.max(other.x0) + self.x1.min(other.x1)) / 2.0;
            (mid, mid)
        };
        let (sy, oy) = if self.bottom < other.top {
            (self.bottom, other.top)
        } else if other.bottom < self.top {
            (self.top, other.bottom)
        } else {
            let mid = (self.top.max(other.top) + self.bottom.min(other.bottom)) / 2.0;
            (mid, mid)
        };
        (Point::new(sx, sy), Point::new(ox, oy))
    }

    /// Distance between the closest boundary points of the two boxes.
    ///
    /// Zero exactly when the boxes overlap (or touch) on both axes.
    pub fn distance(&self, other: &BBox) -> f64 {
        let (p1, p2) = self.closest_points(other);
        p1.distance_to(&p2)
    }
}

/// Repeatedly union boxes that intersect or contain one another until no
/// pass produces a merge.
///
/// The output boxes are pairwise disjoint (neither intersecting nor nested),
/// so a second application returns its input unchanged. Terminates because
/// every merging pass strictly reduces the box count.
pub fn merge_overlapping(rects: Vec<BBox>) -> Vec<BBox> {
    let mut merged = rects;
    loop {
        let mut changed = false;
        let mut out: Vec<BBox> = Vec::with_capacity(merged.len());
        let mut pending = merged;
        while let Some(mut current) = pending.pop() {
            let mut i = 0;
            while i < pending.len() {
                let other = pending[i];
                if current.intersects(&other) || current.contains(&other) || other.contains(&current) {
                    current = current.union(&other);
                    pending.swap_remove(i);
                    changed = true;
                } else {
                    i += 1;
                }
            }
            out.push(current);
        }
        merged = out;
        if !changed {
            return merged;
        }
    }
}

/// Subtract `cut` from `original`, returning up to four axis-aligned strips.
///
/// If the boxes do not intersect, returns `[original]` unchanged. Otherwise
/// the strips partition `original \ (original ∩ cut)` without overlap: a top
/// and bottom strip spanning the full width of `original`, plus left and
/// right strips limited to the intersection's vertical extent. Strips with
/// non-positive area are dropped.
pub fn subtract(original: &BBox, cut: &BBox) -> Vec<BBox> {
    let Some(inter) = original.intersection(cut) else {
        return vec![*original];
    };
    let mut candidates = Vec::with_capacity(4);
    if inter.top > original.top {
        candidates.push(BBox::new(original.x0, original.top, original.x1, inter.top));
    }
    if inter.bottom < original.bottom {
        candidates.push(BBox::new(original.x0, inter.bottom, original.x1, original.bottom));
    }
    if inter.x0 > original.x0 {
        candidates.push(BBox::new(original.x0, inter.top, inter.x0, inter.bottom));
    }
    if inter.x1 < original.x1 {
        candidates.push(BBox::new(inter.x1, inter.top, original.x1, inter.bottom));
    }
    candidates.retain(|c| !c.is_degenerate());
    candidates
}
