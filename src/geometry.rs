//! Axis-aligned box geometry.
//!
//! Everything in this module is pure integer/float arithmetic over pixel
//! coordinates. These primitives back the marker-association decision:
//! - `overlap_ratio`: intersection-over-union of two boxes
//! - `center_inside`: closed-rectangle containment of a box midpoint

/// Denominator guard for near-zero unions.
const UNION_EPSILON: f32 = 1e-6;

/// Axis-aligned bounding box in pixel coordinates.
///
/// Invariant: `x1 <= x2` and `y1 <= y2`, maintained by construction.
/// Degenerate (zero-area) boxes are valid and overlap nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundingBox {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl BoundingBox {
    /// Build a box from two corners, ordering coordinates so the invariant holds.
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self {
            x1: x1.min(x2),
            y1: y1.min(y2),
            x2: x1.max(x2),
            y2: y1.max(y2),
        }
    }

    pub fn width(&self) -> i32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> i32 {
        self.y2 - self.y1
    }

    pub fn area(&self) -> i64 {
        self.width() as i64 * self.height() as i64
    }

    /// Midpoint with floor division, matching the containment test below.
    pub fn center(&self) -> (i32, i32) {
        (
            (self.x1 + self.x2).div_euclid(2),
            (self.y1 + self.y2).div_euclid(2),
        )
    }
}

/// Intersection-over-union of two boxes, in `[0, 1]`.
///
/// Returns `0.0` immediately when the intersection area is zero; the
/// division never runs on that path, so degenerate boxes cannot produce a
/// divide-by-zero. The union denominator is clamped to `1e-6`.
///
/// Symmetric: `overlap_ratio(a, b) == overlap_ratio(b, a)`.
pub fn overlap_ratio(a: BoundingBox, b: BoundingBox) -> f32 {
    let ix1 = a.x1.max(b.x1);
    let iy1 = a.y1.max(b.y1);
    let ix2 = a.x2.min(b.x2);
    let iy2 = a.y2.min(b.y2);

    let iw = (ix2 - ix1).max(0) as i64;
    let ih = (iy2 - iy1).max(0) as i64;
    let inter = iw * ih;
    if inter == 0 {
        return 0.0;
    }

    let union = (a.area() + b.area() - inter) as f32;
    inter as f32 / union.max(UNION_EPSILON)
}

/// True iff the floor-division midpoint of `inner` lies within `outer`'s
/// closed rectangle, all four edges inclusive.
///
/// Asymmetric: callers pass the subject region as `outer` and the candidate
/// marker as `inner`. Swapping the arguments is a different test.
pub fn center_inside(outer: BoundingBox, inner: BoundingBox) -> bool {
    let (cx, cy) = inner.center();
    outer.x1 <= cx && cx <= outer.x2 && outer.y1 <= cy && cy <= outer.y2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_orders_corners() {
        let b = BoundingBox::new(10, 20, 2, 4);
        assert_eq!(b, BoundingBox::new(2, 4, 10, 20));
        assert!(b.x1 <= b.x2 && b.y1 <= b.y2);
    }

    #[test]
    fn overlap_with_self_is_one() {
        let b = BoundingBox::new(3, 4, 50, 60);
        assert_eq!(overlap_ratio(b, b), 1.0);
    }

    #[test]
    fn disjoint_boxes_have_zero_overlap() {
        let a = BoundingBox::new(0, 0, 10, 10);
        let b = BoundingBox::new(20, 20, 30, 30);
        assert_eq!(overlap_ratio(a, b), 0.0);
    }

    #[test]
    fn touching_edges_have_zero_overlap() {
        // Shared edge, zero intersection area.
        let a = BoundingBox::new(0, 0, 10, 10);
        let b = BoundingBox::new(10, 0, 20, 10);
        assert_eq!(overlap_ratio(a, b), 0.0);
    }

    #[test]
    fn degenerate_box_overlaps_nothing() {
        let point = BoundingBox::new(5, 5, 5, 5);
        let a = BoundingBox::new(0, 0, 10, 10);
        assert_eq!(overlap_ratio(point, a), 0.0);
        assert_eq!(overlap_ratio(point, point), 0.0);
    }

    #[test]
    fn overlap_is_symmetric() {
        let a = BoundingBox::new(0, 0, 10, 10);
        let b = BoundingBox::new(5, 5, 15, 15);
        assert_eq!(overlap_ratio(a, b), overlap_ratio(b, a));
    }

    #[test]
    fn partial_overlap_value() {
        // 5x5 intersection, union 100 + 100 - 25 = 175.
        let a = BoundingBox::new(0, 0, 10, 10);
        let b = BoundingBox::new(5, 5, 15, 15);
        let got = overlap_ratio(a, b);
        assert!((got - 25.0 / 175.0).abs() < 1e-6);
    }

    #[test]
    fn center_uses_floor_division() {
        assert_eq!(BoundingBox::new(0, 0, 5, 5).center(), (2, 2));
        assert_eq!(BoundingBox::new(-5, -5, 0, 0).center(), (-3, -3));
    }

    #[test]
    fn center_inside_is_boundary_inclusive() {
        let outer = BoundingBox::new(0, 0, 10, 10);
        // Midpoint (10, 10) lands exactly on the outer corner.
        let inner = BoundingBox::new(5, 5, 15, 15);
        assert!(center_inside(outer, inner));
        // Midpoint (10, 5) on the right edge.
        let edge = BoundingBox::new(8, 0, 12, 10);
        assert!(center_inside(outer, edge));
    }

    #[test]
    fn center_outside_fails() {
        let outer = BoundingBox::new(0, 0, 10, 10);
        let inner = BoundingBox::new(7, 7, 16, 16);
        // Midpoint (11, 11) lies past the corner.
        assert!(!center_inside(outer, inner));
    }

    #[test]
    fn center_inside_is_asymmetric() {
        let outer = BoundingBox::new(0, 0, 100, 100);
        let inner = BoundingBox::new(40, 40, 44, 44);
        assert!(center_inside(outer, inner));
        assert!(!center_inside(inner, outer));
    }
}
