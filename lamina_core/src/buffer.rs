// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Owned RGBA rasters and the clipped views used to draw into them.
//!
//! A [`PixelBuffer`] owns `width × height × 4` bytes of premultiplied RGBA.
//! All drawing goes through a [`BufferView`], which borrows the buffer's
//! storage mutably and carries:
//!
//! - a **clip** rectangle, in the view's own coordinates, that every write is
//!   silently clipped to;
//! - an **origin**, translating view coordinates into buffer coordinates, so
//!   that a layer can draw in its own coordinate space;
//! - an optional **damage sink**, a [`RegionList`] that receives the
//!   buffer-space rectangles touched by [`fill`](BufferView::fill) and the
//!   other drawing helpers.
//!
//! [`clip`](BufferView::clip) narrows a view without moving its origin;
//! [`sub_view`](BufferView::sub_view) narrows it to a child frame and moves
//! the origin to that frame's top-left corner. Neither copies pixels; the
//! borrow checker guarantees a parent view is not used while a narrowed view
//! is alive.

use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

use crate::color::{BlendMode, Rgba8};
use crate::corner::{AlphaMask, CornerMask, MAX_RADIUS};
use crate::geometry::{IntPoint, IntRect, IntSize};
use crate::region::RegionList;

/// Converts a coordinate already known to be non-negative into an index.
#[inline]
fn ix(v: i32) -> usize {
    usize::try_from(v).unwrap_or(0)
}

/// Fills `buf` with a repeating 4-byte pattern, doubling the copied span on
/// each pass.
fn fill_pattern(buf: &mut [u8], pattern: [u8; 4]) {
    let n = buf.len().min(4);
    buf[..n].copy_from_slice(&pattern[..n]);
    let mut filled = n;
    while filled > 0 && filled < buf.len() {
        let count = filled.min(buf.len() - filled);
        buf.copy_within(0..count, filled);
        filled += count;
    }
}

/// Premultiplied source-over for one channel: `s + (inv * d) >> 8`.
#[inline]
#[expect(
    clippy::cast_possible_truncation,
    reason = "inv * d >> 8 is at most 253 for byte inputs"
)]
fn over_channel(s: u8, d: u8, inv: u32) -> u8 {
    s.wrapping_add(((inv * u32::from(d)) >> 8) as u8)
}

/// Blends `src` over `dst`, both tightly packed RGBA rows of equal length.
fn blend_over(dst: &mut [u8], src: &[u8]) {
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        match s[3] {
            0 => {}
            0xFF => d.copy_from_slice(s),
            sa => {
                let inv = u32::from(0xFF - sa);
                for c in 0..4 {
                    d[c] = over_channel(s[c], d[c], inv);
                }
            }
        }
    }
}

/// An owned premultiplied RGBA raster.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    size: IntSize,
    data: Vec<u8>,
}

impl fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

impl PixelBuffer {
    /// Creates a transparent buffer. Negative dimensions are treated as zero.
    #[must_use]
    pub fn new(size: IntSize) -> Self {
        let size = IntSize::new(size.width.max(0), size.height.max(0));
        Self {
            size,
            data: vec![0; ix(size.width) * ix(size.height) * 4],
        }
    }

    /// Wraps premultiplied RGBA bytes. Returns `None` if the length does not
    /// match `size`.
    #[must_use]
    pub fn from_premultiplied(size: IntSize, data: Vec<u8>) -> Option<Self> {
        if size.width < 0 || size.height < 0 || data.len() != ix(size.width) * ix(size.height) * 4
        {
            return None;
        }
        Some(Self { size, data })
    }

    /// Copies straight-alpha RGBA bytes (as produced by most image decoders),
    /// premultiplying them. Returns `None` if the length does not match.
    #[must_use]
    pub fn from_straight(size: IntSize, rgba: &[u8]) -> Option<Self> {
        if size.width < 0 || size.height < 0 || rgba.len() != ix(size.width) * ix(size.height) * 4
        {
            return None;
        }
        let data = rgba
            .chunks_exact(4)
            .flat_map(|px| Rgba8::from_straight(px[0], px[1], px[2], px[3]).to_bytes())
            .collect();
        Some(Self { size, data })
    }

    /// Buffer dimensions.
    #[inline]
    #[must_use]
    pub fn size(&self) -> IntSize {
        self.size
    }

    /// The rectangle `(0, 0)..(width, height)`.
    #[inline]
    #[must_use]
    pub fn bounds(&self) -> IntRect {
        IntRect::from_size(self.size)
    }

    /// Bytes per row.
    #[inline]
    #[must_use]
    pub fn stride(&self) -> usize {
        ix(self.size.width) * 4
    }

    /// The raw premultiplied RGBA bytes, row-major.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Returns pixels `x0..x1` of row `y`, or `None` if the span is outside
    /// the buffer.
    #[must_use]
    pub fn row_span(&self, y: i32, x0: i32, x1: i32) -> Option<&[u8]> {
        if y < 0 || y >= self.size.height || x0 < 0 || x1 > self.size.width || x0 > x1 {
            return None;
        }
        let start = ix(y) * self.stride() + ix(x0) * 4;
        self.data.get(start..start + ix(x1 - x0) * 4)
    }

    /// Reads one pixel.
    #[must_use]
    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgba8> {
        let px = self.row_span(y, x, x + 1)?;
        Some(Rgba8::from_bytes([px[0], px[1], px[2], px[3]]))
    }

    /// Iterates over all pixels, row-major.
    pub fn pixels(&self) -> impl Iterator<Item = Rgba8> + '_ {
        self.data
            .chunks_exact(4)
            .map(|px| Rgba8::from_bytes([px[0], px[1], px[2], px[3]]))
    }

    /// Sets every pixel to `color`.
    pub fn reset(&mut self, color: Rgba8) {
        fill_pattern(&mut self.data, color.to_bytes());
    }

    /// Returns an unclipped view of the whole buffer with no damage sink.
    pub fn view(&mut self) -> BufferView<'_> {
        BufferView {
            backing: self.size,
            stride: self.stride(),
            data: &mut self.data,
            origin: IntPoint::ZERO,
            clip: IntRect::from_size(self.size),
            sink: None,
        }
    }

    /// Returns an unclipped view that reports damage into `sink`.
    pub fn view_with_sink<'a>(&'a mut self, sink: &'a mut RegionList) -> BufferView<'a> {
        let mut view = self.view();
        view.sink = Some(sink);
        view
    }
}

/// A clipped, translated window onto a [`PixelBuffer`].
pub struct BufferView<'a> {
    data: &'a mut [u8],
    stride: usize,
    backing: IntSize,
    origin: IntPoint,
    clip: IntRect,
    sink: Option<&'a mut RegionList>,
}

impl fmt::Debug for BufferView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufferView")
            .field("origin", &self.origin)
            .field("clip", &self.clip)
            .field("has_sink", &self.sink.is_some())
            .finish_non_exhaustive()
    }
}

impl BufferView<'_> {
    /// The drawable area, in view coordinates.
    #[inline]
    #[must_use]
    pub fn bounds(&self) -> IntRect {
        self.clip
    }

    /// Where view coordinate `(0, 0)` lies in the backing buffer.
    #[inline]
    #[must_use]
    pub fn origin(&self) -> IntPoint {
        self.origin
    }

    /// Returns `true` if this view covers its entire backing buffer without
    /// translation.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.origin == IntPoint::ZERO && self.clip == IntRect::from_size(self.backing)
    }

    /// Returns a view restricted to `rect ∩ bounds`, in the same coordinate
    /// space, or `None` if the intersection is empty.
    pub fn clip(&mut self, rect: IntRect) -> Option<BufferView<'_>> {
        let clip = self.clip.intersect(&rect);
        if clip.is_empty() {
            return None;
        }
        Some(BufferView {
            data: &mut *self.data,
            stride: self.stride,
            backing: self.backing,
            origin: self.origin,
            clip,
            sink: self.sink.as_deref_mut(),
        })
    }

    /// Returns a view restricted to `frame ∩ bounds` whose coordinate space
    /// starts at `frame`'s top-left corner, or `None` if nothing is visible.
    pub fn sub_view(&mut self, frame: IntRect) -> Option<BufferView<'_>> {
        let visible = self.clip.intersect(&frame);
        if visible.is_empty() {
            return None;
        }
        Some(BufferView {
            data: &mut *self.data,
            stride: self.stride,
            backing: self.backing,
            origin: self.origin.offset(frame.x0, frame.y0),
            clip: visible.offset(-frame.x0, -frame.y0),
            sink: self.sink.as_deref_mut(),
        })
    }

    #[inline]
    fn offset(&self, x: i32, y: i32) -> usize {
        ix(y + self.origin.y) * self.stride + ix(x + self.origin.x) * 4
    }

    /// Writes a row of RGBA pixels starting at `(x, y)`, clipped to the
    /// view's bounds.
    pub fn write_row(&mut self, row: &[u8], x: i32, y: i32, mode: BlendMode) {
        if y < self.clip.y0 || y >= self.clip.y1 {
            return;
        }
        let count = i32::try_from(row.len() / 4).unwrap_or(i32::MAX);
        let start = x.max(self.clip.x0);
        let end = x.saturating_add(count).min(self.clip.x1);
        if start >= end {
            return;
        }
        let src = &row[ix(start - x) * 4..ix(end - x) * 4];
        let offset = self.offset(start, y);
        let dst = &mut self.data[offset..offset + src.len()];
        match mode {
            BlendMode::Replace => dst.copy_from_slice(src),
            BlendMode::Over => blend_over(dst, src),
        }
    }

    /// Replaces a single pixel, if it is inside the view.
    pub fn put_pixel(&mut self, x: i32, y: i32, color: Rgba8) {
        if self.clip.contains(IntPoint::new(x, y)) {
            let offset = self.offset(x, y);
            self.data[offset..offset + 4].copy_from_slice(&color.to_bytes());
        }
    }

    /// Reads a single pixel, if it is inside the view.
    #[must_use]
    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgba8> {
        if !self.clip.contains(IntPoint::new(x, y)) {
            return None;
        }
        let offset = self.offset(x, y);
        let px = &self.data[offset..offset + 4];
        Some(Rgba8::from_bytes([px[0], px[1], px[2], px[3]]))
    }

    /// Clears the whole view to transparent. Does not report damage.
    pub fn clear(&mut self) {
        if self.is_full() {
            self.data.fill(0);
            return;
        }
        let IntRect { x0, y0, x1, y1 } = self.clip;
        for y in y0..y1 {
            let (start, end) = (self.offset(x0, y), self.offset(x1, y));
            self.data[start..end].fill(0);
        }
    }

    /// Fills `rect` with `color`, rounding the corners by `radius`.
    ///
    /// Opaque colors replace the destination; translucent colors are
    /// composited with source-over, and fully transparent colors draw
    /// nothing. Filling the entire area of an unclipped view takes a faster
    /// path that produces the same pixels as filling a cleared buffer.
    pub fn fill(&mut self, rect: IntRect, color: Rgba8, radius: u32) {
        let mask = CornerMask::new(rect, radius);
        if rect == self.clip && self.is_full() {
            fill_pattern(self.data, color.to_bytes());
            mask.erase_corners(self);
            self.set_dirty(rect);
            return;
        }
        if color.a == 0 || rect.is_empty() {
            return;
        }

        let width = rect.width();
        let mut row = vec![0_u8; ix(width) * 4];
        fill_pattern(&mut row, color.to_bytes());
        let mode = BlendMode::for_color(color);

        for y in rect.y0.max(self.clip.y0)..rect.y1.min(self.clip.y1) {
            let inset = mask.row_inset(y);
            if 2 * inset >= width {
                continue;
            }
            let cut = ix(inset) * 4;
            self.write_row(&row[cut..row.len() - cut], rect.x0 + inset, y, mode);
        }
        if radius > MAX_RADIUS {
            mask.erase_corners(self);
        }
        self.set_dirty(rect);
    }

    /// Draws all of `src` with its top-left corner at `at`.
    pub fn draw_buffer(&mut self, src: &PixelBuffer, at: IntPoint, mode: BlendMode) {
        let dst = IntRect::from_origin_size(at, src.size()).intersect(&self.clip);
        if dst.is_empty() {
            return;
        }
        for y in dst.y0..dst.y1 {
            if let Some(row) = src.row_span(y - at.y, dst.x0 - at.x, dst.x1 - at.x) {
                self.write_row(row, dst.x0, y, mode);
            }
        }
        self.set_dirty(dst);
    }

    /// Draws `src` at `at`, scaling each pixel by the coverage in `mask`.
    ///
    /// `mask` is addressed in view coordinates; pixels outside it are not
    /// drawn.
    pub fn draw_buffer_masked(&mut self, src: &PixelBuffer, at: IntPoint, mask: &AlphaMask) {
        let dst = IntRect::from_origin_size(at, src.size())
            .intersect(&self.clip)
            .intersect(&mask.rect());
        if dst.is_empty() {
            return;
        }
        let mut scratch = Vec::with_capacity(ix(dst.width()) * 4);
        for y in dst.y0..dst.y1 {
            let Some(row) = src.row_span(y - at.y, dst.x0 - at.x, dst.x1 - at.x) else {
                continue;
            };
            scratch.clear();
            for (x, px) in (dst.x0..).zip(row.chunks_exact(4)) {
                let color = Rgba8::from_bytes([px[0], px[1], px[2], px[3]]);
                scratch.extend_from_slice(&color.scaled(mask.coverage(x, y)).to_bytes());
            }
            self.write_row(&scratch, dst.x0, y, BlendMode::Over);
        }
        self.set_dirty(dst);
    }

    /// Paints `tint` through the alpha channel of `src`, placed at `at`.
    pub fn draw_tinted(&mut self, src: &PixelBuffer, at: IntPoint, tint: Rgba8) {
        let dst = IntRect::from_origin_size(at, src.size()).intersect(&self.clip);
        if dst.is_empty() {
            return;
        }
        let mut scratch = Vec::with_capacity(ix(dst.width()) * 4);
        for y in dst.y0..dst.y1 {
            let Some(row) = src.row_span(y - at.y, dst.x0 - at.x, dst.x1 - at.x) else {
                continue;
            };
            scratch.clear();
            for px in row.chunks_exact(4) {
                scratch.extend_from_slice(&tint.scaled(px[3]).to_bytes());
            }
            self.write_row(&scratch, dst.x0, y, BlendMode::Over);
        }
        self.set_dirty(dst);
    }

    /// Reports `rect ∩ bounds` as damaged. Views without a sink ignore this.
    pub fn set_dirty(&mut self, rect: IntRect) {
        let (ox, oy) = (self.origin.x, self.origin.y);
        let visible = rect.intersect(&self.clip);
        if let Some(sink) = self.sink.as_deref_mut()
            && !visible.is_empty()
        {
            sink.add_rect(visible.offset(ox, oy));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer(w: i32, h: i32) -> PixelBuffer {
        PixelBuffer::new(IntSize::new(w, h))
    }

    #[test]
    fn replace_copies_exactly() {
        let mut buf = buffer(4, 2);
        let row = [1, 2, 3, 4, 5, 6, 7, 8];
        buf.view().write_row(&row, 1, 1, BlendMode::Replace);
        assert_eq!(buf.pixel(1, 1), Some(Rgba8::new(1, 2, 3, 4)), "first pixel");
        assert_eq!(buf.pixel(2, 1), Some(Rgba8::new(5, 6, 7, 8)), "second pixel");
        assert_eq!(buf.pixel(0, 1), Some(Rgba8::TRANSPARENT), "untouched");
    }

    #[test]
    fn over_opaque_source_copies() {
        let mut buf = buffer(1, 1);
        buf.reset(Rgba8::opaque(10, 20, 30));
        buf.view()
            .write_row(&Rgba8::opaque(200, 100, 50).to_bytes(), 0, 0, BlendMode::Over);
        assert_eq!(buf.pixel(0, 0), Some(Rgba8::opaque(200, 100, 50)), "opaque wins");
    }

    #[test]
    fn over_translucent_matches_formula() {
        let mut buf = buffer(1, 1);
        let dst = Rgba8::opaque(200, 100, 40);
        buf.reset(dst);
        let src = Rgba8::new(64, 32, 16, 0x80);
        buf.view().write_row(&src.to_bytes(), 0, 0, BlendMode::Over);

        let inv = 0xFF - u32::from(src.a);
        let expect = |s: u8, d: u8| s + u8::try_from((inv * u32::from(d)) >> 8).unwrap();
        assert_eq!(
            buf.pixel(0, 0),
            Some(Rgba8::new(
                expect(src.r, dst.r),
                expect(src.g, dst.g),
                expect(src.b, dst.b),
                expect(src.a, dst.a),
            )),
            "premultiplied source-over"
        );
    }

    #[test]
    fn over_skips_transparent_source() {
        let mut buf = buffer(1, 1);
        buf.reset(Rgba8::opaque(9, 9, 9));
        buf.view().write_row(&[0, 0, 0, 0], 0, 0, BlendMode::Over);
        assert_eq!(buf.pixel(0, 0), Some(Rgba8::opaque(9, 9, 9)), "unchanged");
    }

    #[test]
    fn write_row_clips_silently() {
        let mut buf = buffer(4, 4);
        let row = [0xFF_u8; 4 * 8];
        let mut view = buf.view();
        view.write_row(&row, -2, 0, BlendMode::Replace);
        view.write_row(&row, 3, 1, BlendMode::Replace);
        view.write_row(&row, 0, -1, BlendMode::Replace);
        view.write_row(&row, 0, 4, BlendMode::Replace);
        view.write_row(&row, 10, 2, BlendMode::Replace);
        view.write_row(&row, i32::MAX - 1, 2, BlendMode::Replace);
        assert_eq!(buf.pixel(3, 0), Some(Rgba8::WHITE), "left-clipped row fills");
        assert_eq!(buf.pixel(3, 1), Some(Rgba8::WHITE), "right-clipped row");
        assert_eq!(buf.pixel(2, 1), Some(Rgba8::TRANSPARENT), "before start");
        assert_eq!(buf.pixel(0, 2), Some(Rgba8::TRANSPARENT), "beyond extents");
    }

    #[test]
    fn clip_aliases_parent_storage() {
        let mut buf = buffer(10, 10);
        {
            let mut view = buf.view();
            let mut clipped = view.clip(IntRect::new(2, 2, 5, 5)).expect("overlaps");
            assert_eq!(clipped.bounds(), IntRect::new(2, 2, 5, 5), "clip bounds");
            clipped.fill(IntRect::new(0, 0, 10, 10), Rgba8::WHITE, 0);
        }
        assert_eq!(buf.pixel(2, 2), Some(Rgba8::WHITE), "inside clip");
        assert_eq!(buf.pixel(5, 5), Some(Rgba8::TRANSPARENT), "outside clip");
        assert!(buf.view().clip(IntRect::new(20, 20, 30, 30)).is_none(), "disjoint");
    }

    #[test]
    fn sub_view_translates() {
        let mut buf = buffer(10, 10);
        {
            let mut view = buf.view();
            let mut child = view.sub_view(IntRect::new(4, 4, 20, 20)).expect("visible");
            assert_eq!(child.bounds(), IntRect::new(0, 0, 6, 6), "clipped to parent");
            child.put_pixel(0, 0, Rgba8::WHITE);
            child.put_pixel(-1, 0, Rgba8::WHITE);
        }
        assert_eq!(buf.pixel(4, 4), Some(Rgba8::WHITE), "child origin");
        assert_eq!(buf.pixel(3, 4), Some(Rgba8::TRANSPARENT), "outside child");
    }

    #[test]
    fn damage_reports_in_buffer_space() {
        let mut buf = buffer(10, 10);
        let mut damage = RegionList::new();
        {
            let mut view = buf.view_with_sink(&mut damage);
            let mut child = view.sub_view(IntRect::new(2, 3, 8, 8)).expect("visible");
            child.fill(IntRect::new(0, 0, 100, 2), Rgba8::WHITE, 0);
            child.set_dirty(IntRect::new(50, 50, 60, 60));
        }
        assert_eq!(damage.rects(), &[IntRect::new(2, 3, 8, 5)], "translated and clipped");

        let mut silent = buffer(4, 4);
        silent.view().set_dirty(IntRect::new(0, 0, 4, 4));
    }

    #[test]
    fn fast_fill_matches_row_fill() {
        let size = IntSize::new(12, 9);
        let color = Rgba8::from_straight(30, 60, 90, 0xC0);

        let mut fast = PixelBuffer::new(size);
        let mut view = fast.view();
        let bounds = view.bounds();
        view.fill(bounds, color, 4);

        // Drawing through a translated view forces the row path.
        let mut slow = PixelBuffer::new(IntSize::new(size.width + 2, size.height + 2));
        {
            let mut view = slow.view();
            let mut inner = view.sub_view(bounds.offset(1, 1)).expect("visible");
            assert!(!inner.is_full(), "translated view");
            inner.fill(bounds, color, 4);
        }
        for y in 0..size.height {
            for x in 0..size.width {
                assert_eq!(fast.pixel(x, y), slow.pixel(x + 1, y + 1), "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn transparent_fill_draws_nothing() {
        let mut buf = buffer(4, 4);
        buf.reset(Rgba8::BLACK);
        let mut view = buf.view();
        view.fill(IntRect::new(1, 1, 3, 3), Rgba8::TRANSPARENT, 0);
        assert!(buf.pixels().all(|px| px == Rgba8::BLACK), "no change");
    }

    #[test]
    fn draw_buffer_and_mask() {
        let mut src = buffer(4, 4);
        src.reset(Rgba8::WHITE);

        let mut dst = buffer(8, 8);
        dst.view().draw_buffer(&src, IntPoint::new(6, 6), BlendMode::Over);
        assert_eq!(dst.pixel(7, 7), Some(Rgba8::WHITE), "clipped composite");
        assert_eq!(dst.pixel(5, 5), Some(Rgba8::TRANSPARENT), "outside source");

        let mut masked = buffer(4, 4);
        let stencil = CornerMask::new(IntRect::new(0, 0, 4, 4), 1)
            .alpha_image(0xFF)
            .expect("rounded");
        masked
            .view()
            .draw_buffer_masked(&src, IntPoint::ZERO, &stencil);
        assert_eq!(masked.pixel(0, 0), Some(Rgba8::TRANSPARENT), "corner masked");
        assert_eq!(masked.pixel(1, 1), Some(Rgba8::WHITE), "interior drawn");
    }

    #[test]
    fn tint_uses_source_alpha() {
        let mut glyph = buffer(2, 1);
        glyph.view().put_pixel(0, 0, Rgba8::new(0, 0, 0, 0xFF));
        let mut dst = buffer(2, 1);
        dst.view()
            .draw_tinted(&glyph, IntPoint::ZERO, Rgba8::opaque(0xFF, 0, 0));
        assert_eq!(dst.pixel(0, 0), Some(Rgba8::opaque(0xFF, 0, 0)), "covered");
        assert_eq!(dst.pixel(1, 0), Some(Rgba8::TRANSPARENT), "uncovered");
    }

    #[test]
    fn clear_respects_clip() {
        let mut buf = buffer(4, 4);
        buf.reset(Rgba8::WHITE);
        buf.view()
            .clip(IntRect::new(0, 0, 2, 4))
            .expect("overlaps")
            .clear();
        assert_eq!(buf.pixel(1, 0), Some(Rgba8::TRANSPARENT), "cleared");
        assert_eq!(buf.pixel(2, 0), Some(Rgba8::WHITE), "kept");
    }

    #[test]
    fn straight_images_are_premultiplied() {
        let img = PixelBuffer::from_straight(IntSize::new(1, 1), &[255, 255, 255, 128])
            .expect("length matches");
        assert_eq!(img.pixel(0, 0), Some(Rgba8::new(128, 128, 128, 128)), "premultiplied");
        assert!(
            PixelBuffer::from_straight(IntSize::new(2, 2), &[0; 4]).is_none(),
            "length mismatch"
        );
    }
}
