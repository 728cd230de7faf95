// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Integer geometry and the rectangle algebra used for damage tracking.
//!
//! All coordinates are pixel-aligned `i32` values. Rectangles are half-open:
//! `x0..x1` by `y0..y1`. A rectangle is *empty* when `x0 >= x1` or
//! `y0 >= y1`; empty results are normalized to [`IntRect::ZERO`].
//!
//! Besides the usual intersection and union, this module provides three
//! cheap approximations used to keep region lists small:
//!
//! - [`IntRect::winnow`] trims a rectangle by another only when the trim
//!   leaves a single rectangle.
//! - [`disjoin`] applies `winnow` to whichever of two rectangles it affects.
//! - [`IntRect::merge`] unions two rectangles only when the union covers
//!   exactly the same pixels.
//!
//! These under-merge rather than over-merge: they never claim coverage of
//! pixels that were not in the inputs.

use alloc::vec::Vec;

/// A point in integer pixel coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct IntPoint {
    /// Horizontal coordinate.
    pub x: i32,
    /// Vertical coordinate.
    pub y: i32,
}

impl IntPoint {
    /// The origin.
    pub const ZERO: Self = Self { x: 0, y: 0 };

    /// Creates a point.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns this point shifted by `(dx, dy)`.
    #[inline]
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Converts to a `kurbo` point.
    #[inline]
    #[must_use]
    pub fn to_kurbo(self) -> kurbo::Point {
        kurbo::Point::new(f64::from(self.x), f64::from(self.y))
    }
}

impl From<IntPoint> for kurbo::Point {
    fn from(p: IntPoint) -> Self {
        p.to_kurbo()
    }
}

/// A width and height in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct IntSize {
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

impl IntSize {
    /// Zero width and height.
    pub const ZERO: Self = Self::new(0, 0);

    /// Creates a size.
    #[inline]
    #[must_use]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Returns the size with width and height exchanged.
    #[inline]
    #[must_use]
    pub const fn transposed(self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }
}

/// An axis-aligned, half-open integer rectangle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct IntRect {
    /// Left edge (inclusive).
    pub x0: i32,
    /// Top edge (inclusive).
    pub y0: i32,
    /// Right edge (exclusive).
    pub x1: i32,
    /// Bottom edge (exclusive).
    pub y1: i32,
}

/// Horizontal and vertical placement of a smaller box inside a rectangle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Gravity {
    /// Top-left corner.
    TopLeft,
    /// Centered horizontally along the top edge.
    Top,
    /// Top-right corner.
    TopRight,
    /// Centered vertically along the left edge.
    Left,
    /// Centered on both axes.
    #[default]
    Center,
    /// Centered vertically along the right edge.
    Right,
    /// Bottom-left corner.
    BottomLeft,
    /// Centered horizontally along the bottom edge.
    Bottom,
    /// Bottom-right corner.
    BottomRight,
}

impl Gravity {
    /// Returns `(horizontal, vertical)` placement, each `-1`, `0`, or `1`.
    const fn axes(self) -> (i8, i8) {
        match self {
            Self::TopLeft => (-1, -1),
            Self::Top => (0, -1),
            Self::TopRight => (1, -1),
            Self::Left => (-1, 0),
            Self::Center => (0, 0),
            Self::Right => (1, 0),
            Self::BottomLeft => (-1, 1),
            Self::Bottom => (0, 1),
            Self::BottomRight => (1, 1),
        }
    }
}

/// The edge a [`IntRect::slice`] is taken from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Edge {
    /// Slice columns off the left edge.
    Left,
    /// Slice columns off the right edge.
    Right,
    /// Slice rows off the top edge.
    Top,
    /// Slice rows off the bottom edge.
    Bottom,
}

impl IntRect {
    /// The canonical empty rectangle.
    pub const ZERO: Self = Self {
        x0: 0,
        y0: 0,
        x1: 0,
        y1: 0,
    };

    /// Creates a rectangle from its edges.
    #[inline]
    #[must_use]
    pub const fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Creates a rectangle from an origin and a size.
    #[inline]
    #[must_use]
    pub const fn from_origin_size(origin: IntPoint, size: IntSize) -> Self {
        Self {
            x0: origin.x,
            y0: origin.y,
            x1: origin.x + size.width,
            y1: origin.y + size.height,
        }
    }

    /// Creates a rectangle at the origin with the given size.
    #[inline]
    #[must_use]
    pub const fn from_size(size: IntSize) -> Self {
        Self::from_origin_size(IntPoint::ZERO, size)
    }

    /// Width in pixels (may be negative for malformed rectangles).
    #[inline]
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.x1 - self.x0
    }

    /// Height in pixels (may be negative for malformed rectangles).
    #[inline]
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.y1 - self.y0
    }

    /// Returns the top-left corner.
    #[inline]
    #[must_use]
    pub const fn origin(&self) -> IntPoint {
        IntPoint {
            x: self.x0,
            y: self.y0,
        }
    }

    /// Returns the size.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> IntSize {
        IntSize {
            width: self.width(),
            height: self.height(),
        }
    }

    /// Returns `true` if the rectangle contains no pixels.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.x0 >= self.x1 || self.y0 >= self.y1
    }

    /// Number of pixels covered (zero when empty).
    #[must_use]
    pub fn area(&self) -> u64 {
        if self.is_empty() {
            0
        } else {
            u64::from(self.width().unsigned_abs()) * u64::from(self.height().unsigned_abs())
        }
    }

    /// Returns `true` if `p` lies inside the rectangle.
    #[inline]
    #[must_use]
    pub const fn contains(&self, p: IntPoint) -> bool {
        p.x >= self.x0 && p.x < self.x1 && p.y >= self.y0 && p.y < self.y1
    }

    /// Returns `true` if every pixel of `other` lies inside `self`.
    ///
    /// An empty rectangle is inside every rectangle.
    #[must_use]
    pub const fn contains_rect(&self, other: &Self) -> bool {
        if other.is_empty() {
            return true;
        }
        other.x0 >= self.x0 && other.x1 <= self.x1 && other.y0 >= self.y0 && other.y1 <= self.y1
    }

    /// Returns `true` if the two rectangles share at least one pixel.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.x0 < other.x1
            && other.x0 < self.x1
            && self.y0 < other.y1
            && other.y0 < self.y1
    }

    /// Returns the largest rectangle contained in both inputs, or
    /// [`IntRect::ZERO`] when they do not overlap.
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Self {
        let r = Self {
            x0: self.x0.max(other.x0),
            y0: self.y0.max(other.y0),
            x1: self.x1.min(other.x1),
            y1: self.y1.min(other.y1),
        };
        if r.is_empty() { Self::ZERO } else { r }
    }

    /// Returns the smallest rectangle containing both inputs. Empty inputs
    /// are ignored.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        Self {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    /// Returns this rectangle shifted by `(dx, dy)`.
    #[inline]
    #[must_use]
    pub const fn offset(&self, dx: i32, dy: i32) -> Self {
        Self {
            x0: self.x0 + dx,
            y0: self.y0 + dy,
            x1: self.x1 + dx,
            y1: self.y1 + dy,
        }
    }

    /// Returns this rectangle shrunk by `n` pixels on every side.
    #[must_use]
    pub const fn inset(&self, n: i32) -> Self {
        Self {
            x0: self.x0 + n,
            y0: self.y0 + n,
            x1: self.x1 - n,
            y1: self.y1 - n,
        }
    }

    /// Removes the parts of `self` covered by `remove`, but only along an
    /// edge that `remove` spans completely.
    ///
    /// If `remove` covers the full width of `self` and reaches its top (or
    /// bottom) edge, those rows are trimmed. The same then applies to
    /// columns when `remove` covers the full height. In any other overlap
    /// the rectangle is returned unchanged, since the remainder would not be
    /// a single rectangle. A fully covered rectangle becomes
    /// [`IntRect::ZERO`].
    #[must_use]
    pub fn winnow(&self, remove: &Self) -> Self {
        let mut r = *self;
        if remove.x0 <= r.x0 && remove.x1 >= r.x1 {
            if remove.y0 <= r.y0 && remove.y1 > r.y0 {
                r.y0 = remove.y1;
            } else if remove.y1 >= r.y1 && remove.y0 < r.y1 {
                r.y1 = remove.y0;
            }
        }
        if remove.y0 <= r.y0 && remove.y1 >= r.y1 {
            if remove.x0 <= r.x0 && remove.x1 > r.x0 {
                r.x0 = remove.x1;
            } else if remove.x1 >= r.x1 && remove.x0 < r.x1 {
                r.x1 = remove.x0;
            }
        }
        if r.is_empty() { Self::ZERO } else { r }
    }

    /// Returns a single rectangle covering exactly `self ∪ other`, or
    /// [`IntRect::ZERO`] when no such rectangle exists.
    ///
    /// Succeeds when the rectangles have the same horizontal span and
    /// touching or overlapping vertical spans (or vice versa), or when one
    /// contains the other.
    #[must_use]
    pub fn merge(&self, other: &Self) -> Self {
        if other.y0 > self.y1 || other.y1 < self.y0 || other.x0 > self.x1 || other.x1 < self.x0 {
            return Self::ZERO;
        }
        if self.x0 == other.x0 && self.x1 == other.x1 {
            Self {
                y0: self.y0.min(other.y0),
                y1: self.y1.max(other.y1),
                ..*self
            }
        } else if self.y0 == other.y0 && self.y1 == other.y1 {
            Self {
                x0: self.x0.min(other.x0),
                x1: self.x1.max(other.x1),
                ..*self
            }
        } else if self.contains_rect(other) {
            *self
        } else if other.contains_rect(self) {
            *other
        } else {
            Self::ZERO
        }
    }

    /// Places a box of `size` inside this rectangle according to `gravity`.
    #[must_use]
    pub fn aligned(&self, size: IntSize, gravity: Gravity) -> Self {
        let (gx, gy) = gravity.axes();
        let x0 = match gx {
            -1 => self.x0,
            0 => self.x0 + (self.width() - size.width) / 2,
            _ => self.x1 - size.width,
        };
        let y0 = match gy {
            -1 => self.y0,
            0 => self.y0 + (self.height() - size.height) / 2,
            _ => self.y1 - size.height,
        };
        Self::from_origin_size(IntPoint::new(x0, y0), size)
    }

    /// Cuts a band of `size` pixels off `edge` and returns it, leaving the
    /// remainder (minus `pad` pixels of spacing) in `self`.
    pub fn slice(&mut self, size: i32, pad: i32, edge: Edge) -> Self {
        let mut sliced = *self;
        match edge {
            Edge::Left => {
                sliced.x1 = sliced.x0 + size;
                self.x0 = sliced.x1 + pad;
            }
            Edge::Right => {
                sliced.x0 = sliced.x1 - size;
                self.x1 = sliced.x0 - pad;
            }
            Edge::Top => {
                sliced.y1 = sliced.y0 + size;
                self.y0 = sliced.y1 + pad;
            }
            Edge::Bottom => {
                sliced.y0 = sliced.y1 - size;
                self.y1 = sliced.y0 - pad;
            }
        }
        sliced
    }

    /// Splits this rectangle into `count` equal bands from `edge`, separated
    /// by `pad` pixels. Leftover pixels stay unassigned.
    #[must_use]
    pub fn divide(&self, count: i32, pad: i32, edge: Edge) -> Vec<Self> {
        if count <= 0 {
            return Vec::new();
        }
        let extent = match edge {
            Edge::Left | Edge::Right => self.width(),
            Edge::Top | Edge::Bottom => self.height(),
        };
        let size = (extent + pad) / count - pad;
        if size <= 0 {
            return Vec::new();
        }
        let mut remain = *self;
        let mut bands = Vec::new();
        for _ in 0..count {
            bands.push(remain.slice(size, pad, edge));
        }
        bands
    }

    /// Converts to a `kurbo` rectangle.
    #[inline]
    #[must_use]
    pub fn to_kurbo(&self) -> kurbo::Rect {
        kurbo::Rect::new(
            f64::from(self.x0),
            f64::from(self.y0),
            f64::from(self.x1),
            f64::from(self.y1),
        )
    }
}

impl From<IntRect> for kurbo::Rect {
    fn from(r: IntRect) -> Self {
        r.to_kurbo()
    }
}

/// Shrinks one of two overlapping rectangles so that they no longer overlap,
/// when that can be done by trimming a fully covered edge.
///
/// `a` is winnowed by `b` first; if that leaves `a` unchanged, `b` is
/// winnowed by `a`. Returns `true` if either rectangle was modified.
pub fn disjoin(a: &mut IntRect, b: &mut IntRect) -> bool {
    let trimmed = a.winnow(b);
    if trimmed != *a {
        *a = trimmed;
        return true;
    }
    let trimmed = b.winnow(a);
    if trimmed != *b {
        *b = trimmed;
        return true;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    const fn r(x0: i32, y0: i32, x1: i32, y1: i32) -> IntRect {
        IntRect::new(x0, y0, x1, y1)
    }

    #[test]
    fn intersect_and_union() {
        let a = r(0, 0, 10, 10);
        let b = r(5, 5, 15, 15);
        assert_eq!(a.intersect(&b), r(5, 5, 10, 10), "overlapping intersect");
        assert_eq!(a.union(&b), r(0, 0, 15, 15), "bounding union");
        assert_eq!(a.intersect(&r(20, 20, 30, 30)), IntRect::ZERO, "disjoint");
        assert_eq!(IntRect::ZERO.union(&b), b, "empty is ignored by union");
    }

    #[test]
    fn winnow_trims_top_and_keeps_width() {
        let rect = r(0, 0, 10, 10);
        let remove = r(-5, -5, 20, 4);
        assert_eq!(rect.winnow(&remove), r(0, 4, 10, 10), "top rows removed");
    }

    #[test]
    fn winnow_trims_bottom_left_and_right() {
        let rect = r(0, 0, 10, 10);
        assert_eq!(rect.winnow(&r(0, 6, 10, 12)), r(0, 0, 10, 6), "bottom");
        assert_eq!(rect.winnow(&r(-1, 0, 3, 10)), r(3, 0, 10, 10), "left");
        assert_eq!(rect.winnow(&r(5, 0, 15, 10)), r(0, 0, 5, 10), "right");
    }

    #[test]
    fn winnow_non_spanning_is_identity() {
        let rect = r(0, 0, 10, 10);
        // Covers the middle only.
        assert_eq!(rect.winnow(&r(2, 2, 8, 8)), rect, "hole in the middle");
        // Spans the width but sits strictly inside vertically.
        assert_eq!(rect.winnow(&r(0, 3, 10, 6)), rect, "band across the middle");
        // Disjoint.
        assert_eq!(rect.winnow(&r(20, 0, 30, 10)), rect, "no overlap");
    }

    #[test]
    fn winnow_full_cover_is_empty() {
        let rect = r(2, 2, 8, 8);
        assert_eq!(rect.winnow(&r(0, 0, 10, 10)), IntRect::ZERO, "fully covered");
    }

    #[test]
    fn disjoin_separates_side_by_side() {
        let mut a = r(0, 0, 10, 10);
        let mut b = r(5, 0, 15, 10);
        assert!(disjoin(&mut a, &mut b), "rects should change");
        assert!(!a.overlaps(&b), "rects should be disjoint: {a:?} {b:?}");
        assert_eq!(
            a.width() + b.width(),
            a.union(&b).width(),
            "widths add up to the union"
        );
    }

    #[test]
    fn disjoin_leaves_crossing_rects_alone() {
        let mut a = r(0, 4, 10, 6);
        let mut b = r(4, 0, 6, 10);
        assert!(!disjoin(&mut a, &mut b), "a plus sign cannot be disjoined");
        assert_eq!(a, r(0, 4, 10, 6), "a unchanged");
        assert_eq!(b, r(4, 0, 6, 10), "b unchanged");
    }

    #[test]
    fn merge_adjacent_columns_and_rows() {
        assert_eq!(
            r(0, 0, 10, 10).merge(&r(10, 0, 20, 10)),
            r(0, 0, 20, 10),
            "touching on the right"
        );
        assert_eq!(
            r(0, 10, 10, 20).merge(&r(0, 0, 10, 12)),
            r(0, 0, 10, 20),
            "overlapping from above"
        );
    }

    #[test]
    fn merge_containment() {
        let outer = r(0, 0, 10, 10);
        let inner = r(2, 2, 4, 4);
        assert_eq!(outer.merge(&inner), outer, "outer contains inner");
        assert_eq!(inner.merge(&outer), outer, "inner inside outer");
    }

    #[test]
    fn merge_is_exact_or_empty() {
        // Exhaustive over small rectangles: a non-empty merge must cover
        // both inputs and nothing else.
        let mut rects = Vec::new();
        for i in 0..256_i32 {
            let x0 = (i >> 6) & 3;
            let y0 = (i >> 4) & 3;
            let w = ((i >> 2) & 3) + 1;
            let h = (i & 3) + 1;
            rects.push(r(x0, y0, x0 + w, y0 + h));
        }
        for a in &rects {
            for b in &rects {
                let m = a.merge(b);
                if m.is_empty() {
                    continue;
                }
                assert!(m.contains_rect(a) && m.contains_rect(b), "{m:?} covers inputs");
                for y in m.y0..m.y1 {
                    for x in m.x0..m.x1 {
                        let p = IntPoint::new(x, y);
                        assert!(
                            a.contains(p) || b.contains(p),
                            "merge of {a:?} and {b:?} invented pixel {p:?}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn merge_rejects_l_shapes() {
        assert_eq!(
            r(0, 0, 10, 10).merge(&r(5, 10, 15, 20)),
            IntRect::ZERO,
            "offset rows do not merge"
        );
    }

    #[test]
    fn aligned_and_slice() {
        let area = r(0, 0, 100, 50);
        let size = IntSize::new(20, 10);
        assert_eq!(area.aligned(size, Gravity::Center), r(40, 20, 60, 30), "center");
        assert_eq!(
            area.aligned(size, Gravity::BottomRight),
            r(80, 40, 100, 50),
            "bottom right"
        );

        let mut layout = area;
        let top = layout.slice(10, 5, Edge::Top);
        assert_eq!(top, r(0, 0, 100, 10), "sliced band");
        assert_eq!(layout, r(0, 15, 100, 50), "remainder after padding");
    }

    #[test]
    fn divide_into_columns() {
        let cols = r(0, 0, 100, 10).divide(4, 4, Edge::Left);
        assert_eq!(cols.len(), 4, "four columns");
        assert_eq!(cols[0], r(0, 0, 22, 10), "first column");
        assert_eq!(cols[3], r(78, 0, 100, 10), "last column");
    }

    #[test]
    fn kurbo_conversion() {
        let k = r(1, 2, 3, 4).to_kurbo();
        assert_eq!(k, kurbo::Rect::new(1.0, 2.0, 3.0, 4.0), "edges preserved");
    }
}
