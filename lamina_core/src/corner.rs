// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rounded-corner masks from precomputed inset tables.
//!
//! Corners are not rasterized as curves. Each supported radius has a small
//! table giving, for each of the first `radius` rows, how many pixels at the
//! start and end of that row lie outside the rounded shape. The same table is
//! mirrored for the bottom rows.

use alloc::vec;
use alloc::vec::Vec;

use crate::buffer::BufferView;
use crate::color::Rgba8;
use crate::geometry::IntRect;

/// Largest radius with an inset table.
pub const MAX_RADIUS: u32 = 9;

/// Color painted into the corners of masks whose radius has no table, so the
/// misconfiguration is visible on screen.
pub const UNSUPPORTED_RADIUS_COLOR: Rgba8 = Rgba8::new(0, 0xFF, 0, 0x80);

/// Pixels to cut from each end of row `i` for radius `r` is `INSETS[r][i]`.
const INSETS: [&[u8]; MAX_RADIUS as usize + 1] = [
    &[],
    &[1],
    &[2, 1],
    &[3, 2, 1],
    &[4, 2, 1, 1],
    &[5, 3, 2, 1, 1],
    &[6, 4, 3, 2, 1, 1],
    &[7, 5, 3, 2, 2, 1, 1],
    &[8, 6, 4, 3, 2, 2, 1, 1],
    &[9, 7, 5, 4, 3, 2, 2, 1, 1],
];

/// Returns the inset table for a supported radius.
#[must_use]
pub fn insets(radius: u32) -> Option<&'static [u8]> {
    INSETS.get(usize::try_from(radius).ok()?).copied()
}

/// A rectangle with rounded corners, described without any pixel storage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CornerMask {
    /// The rectangle whose corners are rounded.
    pub rect: IntRect,
    /// Corner radius in pixels. Zero disables masking.
    pub radius: u32,
}

impl CornerMask {
    /// Creates a mask.
    #[inline]
    #[must_use]
    pub const fn new(rect: IntRect, radius: u32) -> Self {
        Self { rect, radius }
    }

    /// Number of pixels to skip at each end of row `y`.
    ///
    /// Zero outside the top and bottom corner bands, and for radii without
    /// an inset table.
    #[must_use]
    pub fn row_inset(&self, y: i32) -> i32 {
        let Some(table) = insets(self.radius) else {
            return 0;
        };
        let r = i32::try_from(self.radius).unwrap_or(i32::MAX);
        let mut row = y - self.rect.y0;
        if row >= r {
            row = self.rect.height() - row - 1;
        }
        if row < 0 || row >= r {
            return 0;
        }
        usize::try_from(row)
            .ok()
            .and_then(|i| table.get(i))
            .map_or(0, |&inset| i32::from(inset))
    }

    /// Returns the cross-shaped region guaranteed to be unaffected by the
    /// corners, as a vertical band and a horizontal band.
    #[must_use]
    pub fn opaque_rects(&self) -> (IntRect, IntRect) {
        let r = i32::try_from(self.radius).unwrap_or(i32::MAX / 2);
        let IntRect { x0, y0, x1, y1 } = self.rect;
        (
            IntRect::new(x0 + r, y0, x1 - r, y1),
            IntRect::new(x0, y0 + r, x1, y1 - r),
        )
    }

    /// Returns `true` if drawing inside `rect` may touch a corner.
    #[must_use]
    pub fn touches_corners(&self, rect: &IntRect) -> bool {
        if self.radius == 0 {
            return false;
        }
        let (v, h) = self.opaque_rects();
        !(v.contains_rect(rect) || h.contains_rect(rect))
    }

    /// Visits every pixel outside the rounded shape with `f(x, y)`.
    ///
    /// Radii without a table visit the largest table instead.
    fn for_each_corner_pixel(&self, radius: u32, mut f: impl FnMut(i32, i32)) {
        let Some(table) = insets(radius) else {
            return;
        };
        let IntRect { x0, y0, x1, y1 } = self.rect;
        for (row, &inset) in (0_i32..).zip(table) {
            let (top, bottom) = (y0 + row, y1 - row - 1);
            for col in 0..i32::from(inset) {
                let (left, right) = (x0 + col, x1 - col - 1);
                f(left, top);
                f(right, top);
                f(left, bottom);
                f(right, bottom);
            }
        }
    }

    /// Clears the four corners of `view` to transparent.
    ///
    /// Unsupported radii paint [`UNSUPPORTED_RADIUS_COLOR`] into the largest
    /// supported corner shape instead.
    pub fn erase_corners(&self, view: &mut BufferView<'_>) {
        if self.radius == 0 {
            return;
        }
        let (radius, color) = if self.radius > MAX_RADIUS {
            (MAX_RADIUS, UNSUPPORTED_RADIUS_COLOR)
        } else {
            (self.radius, Rgba8::TRANSPARENT)
        };
        self.for_each_corner_pixel(radius, |x, y| view.put_pixel(x, y, color));
    }

    /// Builds a coverage stencil of uniform `opacity` with the corners
    /// removed.
    ///
    /// Returns `None` when no stencil is needed: the rectangle is empty, or
    /// the mask is fully opaque and has no supported rounding.
    #[must_use]
    pub fn alpha_image(&self, opacity: u8) -> Option<AlphaMask> {
        let r = self.radius;
        if self.rect.is_empty() || ((r == 0 || r > MAX_RADIUS) && opacity == 0xFF) {
            return None;
        }
        let width = usize::try_from(self.rect.width()).ok()?;
        let height = usize::try_from(self.rect.height()).ok()?;
        let mut mask = AlphaMask {
            rect: self.rect,
            data: vec![opacity; width * height],
        };
        if r > 0 {
            let (radius, cut) = if r > MAX_RADIUS {
                (MAX_RADIUS, UNSUPPORTED_RADIUS_COLOR.a)
            } else {
                (r, 0)
            };
            self.for_each_corner_pixel(radius, |x, y| mask.set(x, y, cut));
        }
        Some(mask)
    }
}

/// An 8-bit coverage stencil over a rectangle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AlphaMask {
    rect: IntRect,
    data: Vec<u8>,
}

impl AlphaMask {
    /// The area the stencil covers.
    #[must_use]
    pub fn rect(&self) -> IntRect {
        self.rect
    }

    /// Coverage at `(x, y)`; zero outside the stencil.
    #[must_use]
    pub fn coverage(&self, x: i32, y: i32) -> u8 {
        self.index(x, y).map_or(0, |i| self.data[i])
    }

    /// Coverage values for row `y`, starting at the stencil's left edge.
    #[must_use]
    pub fn row(&self, y: i32) -> Option<&[u8]> {
        let start = self.index(self.rect.x0, y)?;
        let width = usize::try_from(self.rect.width()).ok()?;
        self.data.get(start..start + width)
    }

    fn set(&mut self, x: i32, y: i32, v: u8) {
        if let Some(i) = self.index(x, y) {
            self.data[i] = v;
        }
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if !self.rect.contains(crate::geometry::IntPoint::new(x, y)) {
            return None;
        }
        let col = usize::try_from(x - self.rect.x0).ok()?;
        let row = usize::try_from(y - self.rect.y0).ok()?;
        let width = usize::try_from(self.rect.width()).ok()?;
        Some(row * width + col)
    }
}
