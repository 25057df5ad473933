#![forbid(unsafe_code)]

//! Geometric primitives.

use serde::{Deserialize, Serialize};

/// A point in host pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    /// Create a new point.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned pixel rectangle for layout bounds and hit testing.
///
/// Origin at top-left; `width`/`height` are never negative once produced by
/// the constructors (negative inputs are clamped to zero).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge (inclusive).
    pub x: i32,
    /// Top edge (inclusive).
    pub y: i32,
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width: if width < 0 { 0 } else { width },
            height: if height < 0 { 0 } else { height },
        }
    }

    /// Create a rectangle from origin with given size.
    #[inline]
    #[must_use]
    pub const fn from_size(width: i32, height: i32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Right edge (exclusive).
    #[inline]
    #[must_use]
    pub const fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge (exclusive).
    #[inline]
    #[must_use]
    pub const fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// Check if the rectangle has zero area.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    #[must_use]
    pub const fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// Grow the rectangle by `amount` on every side (shrink when negative).
    #[must_use]
    pub const fn expand(&self, amount: i32) -> Self {
        let grow = amount.saturating_mul(2);
        Self::new(
            self.x.saturating_sub(amount),
            self.y.saturating_sub(amount),
            self.width.saturating_add(grow),
            self.height.saturating_add(grow),
        )
    }

    /// Create a new rectangle inside the current one with the given margin.
    #[must_use]
    pub fn inner(&self, margin: Sides) -> Self {
        Self::new(
            self.x.saturating_add(margin.left),
            self.y.saturating_add(margin.top),
            self.width - margin.horizontal_sum(),
            self.height - margin.vertical_sum(),
        )
    }
}

/// Sides for margins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Sides {
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    pub left: i32,
}

impl Sides {
    /// Create new sides with equal values.
    #[must_use]
    pub const fn all(val: i32) -> Self {
        Self {
            top: val,
            right: val,
            bottom: val,
            left: val,
        }
    }

    /// Create new sides with specific values.
    #[must_use]
    pub const fn new(top: i32, right: i32, bottom: i32, left: i32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Sum of left and right.
    #[inline]
    #[must_use]
    pub const fn horizontal_sum(&self) -> i32 {
        self.left.saturating_add(self.right)
    }

    /// Sum of top and bottom.
    #[inline]
    #[must_use]
    pub const fn vertical_sum(&self) -> i32 {
        self.top.saturating_add(self.bottom)
    }
}

#[cfg(test)]
mod tests {
    use super::{Point, Rect, Sides};
    use proptest::prelude::*;

    #[test]
    fn rect_contains_edges() {
        let rect = Rect::new(2, 3, 4, 5);
        assert!(rect.contains(Point::new(2, 3)));
        assert!(rect.contains(Point::new(5, 7)));
        assert!(!rect.contains(Point::new(6, 3)));
        assert!(!rect.contains(Point::new(2, 8)));
    }

    #[test]
    fn negative_extent_is_clamped() {
        let rect = Rect::new(10, 10, -4, 3);
        assert_eq!(rect.width, 0);
        assert!(rect.is_empty());
    }

    #[test]
    fn expand_grows_every_side() {
        let sash = Rect::new(198, 0, 4, 300);
        let hit = sash.expand(5);
        assert_eq!(hit, Rect::new(193, -5, 14, 310));
        assert!(hit.contains(Point::new(195, 150)));
        assert!(!hit.contains(Point::new(192, 150)));
    }

    #[test]
    fn expand_saturates_at_extremes() {
        let rect = Rect::new(i32::MIN + 1, 0, 10, 10);
        let hit = rect.expand(i32::MAX);
        assert_eq!(hit.x, i32::MIN);
        assert_eq!(hit.width, i32::MAX);
        assert_eq!(hit.height, i32::MAX);
    }

    #[test]
    fn rect_inner_reduces() {
        let rect = Rect::new(0, 0, 10, 10);
        let inner = rect.inner(Sides::new(1, 2, 3, 4));
        assert_eq!(inner, Rect::new(4, 1, 4, 6));
    }

    #[test]
    fn inner_with_oversized_margin_is_empty() {
        let rect = Rect::new(0, 0, 10, 10);
        assert!(rect.inner(Sides::all(8)).is_empty());
    }

    proptest! {
        #[test]
        fn expanded_rect_contains_original_corners(
            x in -500i32..500, y in -500i32..500, w in 1i32..400, h in 1i32..400,
            amount in 0i32..20,
        ) {
            let rect = Rect::new(x, y, w, h);
            let hit = rect.expand(amount);
            prop_assert!(hit.contains(Point::new(rect.x, rect.y)));
            prop_assert!(hit.contains(Point::new(rect.right() - 1, rect.bottom() - 1)));
            prop_assert!(!hit.contains(Point::new(rect.x - amount - 1, rect.y)));
        }
    }
}
