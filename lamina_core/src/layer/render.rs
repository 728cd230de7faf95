// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Occlusion-aware rendering.
//!
//! Each layer first draws its own content into the part of the view not
//! covered by an opaque child (computed with [`IntRect::winnow`], so only
//! children spanning a full edge are subtracted), then renders its children
//! bottom to top, each into a sub-view translated to the child's frame.
//!
//! Buffered layers re-render only their invalid rectangles into their own
//! buffer (each rectangle is cleared first) and composite the whole buffer
//! over the parent's view with source-over.

use super::delegate::DrawCx;
use super::id::{INVALID, LayerId};
use super::store::{Backing, LayerTree};
use crate::buffer::BufferView;
use crate::color::BlendMode;
use crate::geometry::{IntPoint, IntRect};
use crate::region::RegionList;
use crate::text::FontBook;

impl LayerTree {
    /// Renders the subtree rooted at `id` into `view`, which must be in
    /// `id`'s coordinates.
    pub fn render(&mut self, id: LayerId, view: &mut BufferView<'_>, fonts: &FontBook) {
        self.validate(id);
        self.render_layer(id.idx, view, fonts);
    }

    /// Brings a buffered layer's own buffer up to date, reporting every
    /// rectangle it redraws into `damage` in buffer coordinates.
    ///
    /// Returns the number of invalid rectangles that were re-rendered. A
    /// non-buffered layer renders nothing.
    pub fn render_root(&mut self, id: LayerId, fonts: &FontBook, damage: &mut RegionList) -> usize {
        self.validate(id);
        let idx = id.idx;
        let Some(mut backing) = self.backing[idx as usize].take() else {
            return 0;
        };
        let rects = backing.invalid.dequeue();
        for &rect in &rects {
            let mut view = backing.buffer.view_with_sink(damage);
            if let Some(mut clipped) = view.clip(rect) {
                let area = clipped.bounds();
                clipped.clear();
                clipped.set_dirty(area);
                self.render_contents(idx, &mut clipped, fonts);
            }
        }
        self.backing[idx as usize] = Some(backing);
        rects.len()
    }

    fn render_layer(&mut self, idx: u32, view: &mut BufferView<'_>, fonts: &FontBook) {
        match self.backing[idx as usize].take() {
            Some(mut backing) => {
                self.refresh_backing(idx, &mut backing, fonts);
                view.draw_buffer(&backing.buffer, IntPoint::ZERO, BlendMode::Over);
                self.backing[idx as usize] = Some(backing);
            }
            None => self.render_contents(idx, view, fonts),
        }
    }

    fn refresh_backing(&mut self, idx: u32, backing: &mut Backing, fonts: &FontBook) {
        for rect in backing.invalid.dequeue() {
            let mut view = backing.buffer.view();
            if let Some(mut clipped) = view.clip(rect) {
                clipped.clear();
                self.render_contents(idx, &mut clipped, fonts);
            }
        }
    }

    fn render_contents(&mut self, idx: u32, view: &mut BufferView<'_>, fonts: &FontBook) {
        let mut own = view.bounds();
        let mut child = self.first_child[idx as usize];
        while child != INVALID {
            if self.is_opaque_at(child) {
                own = own.winnow(&self.frame[child as usize]);
            }
            child = self.next_sibling[child as usize];
        }
        if let Some(mut clipped) = view.clip(own) {
            self.draw_own(idx, &mut clipped, fonts);
        }

        let mut child = self.first_child[idx as usize];
        while child != INVALID {
            let frame = self.frame[child as usize];
            if let Some(mut sub) = view.sub_view(frame) {
                self.render_layer(child, &mut sub, fonts);
            }
            child = self.next_sibling[child as usize];
        }
    }

    fn draw_own(&mut self, idx: u32, view: &mut BufferView<'_>, fonts: &FontBook) {
        let i = idx as usize;
        let bounds: IntRect = self.local_bounds(idx);
        let mut cx = DrawCx::new(
            view,
            fonts,
            bounds,
            self.background[i],
            self.corner_radius[i],
        );
        match self.delegate[i].as_deref_mut() {
            Some(delegate) => delegate.draw(&mut cx),
            None => cx.draw_background(),
        }
    }
}
