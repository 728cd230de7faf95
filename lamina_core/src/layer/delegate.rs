// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-layer behaviour.
//!
//! A layer's drawing and touch handling are supplied by a boxed
//! [`LayerDelegate`]. Every method has a default, so a delegate overrides
//! only what it needs; an override always replaces the default behaviour
//! (a delegate that draws must call [`DrawCx::draw_background`] itself if it
//! wants the background).

use core::any::Any;

use super::id::LayerId;
use super::store::LayerTree;
use crate::buffer::BufferView;
use crate::color::Rgba8;
use crate::geometry::IntRect;
use crate::text::{FontBook, FontId};
use crate::touch::TouchEvent;

/// Drawing and touch behaviour attached to a layer.
///
/// Touch callbacks receive events in the layer's own coordinates. The tree
/// lends the delegate out for the duration of each callback, so the callback
/// may freely mutate the tree through [`TouchCx::tree`], including destroying
/// this very layer.
pub trait LayerDelegate: Any {
    /// Draws the layer's own content (not its children) into `cx`.
    ///
    /// The default draws the background.
    fn draw(&mut self, cx: &mut DrawCx<'_, '_>) {
        cx.draw_background();
    }

    /// Whether hit-testing may select this layer as a touch target.
    fn is_interactive(&self) -> bool {
        false
    }

    /// Whether a long-press timer should be armed when a touch starts on this
    /// layer.
    fn wants_long_press(&self) -> bool {
        false
    }

    /// A touch went down on this layer.
    fn start_touch(&mut self, cx: &mut TouchCx<'_>, event: &TouchEvent) {
        _ = (cx, event);
    }

    /// The tracked touch moved.
    fn update_touch(&mut self, cx: &mut TouchCx<'_>, event: &TouchEvent) {
        _ = (cx, event);
    }

    /// The tracked touch was released.
    fn end_touch(&mut self, cx: &mut TouchCx<'_>, event: &TouchEvent) {
        _ = (cx, event);
    }

    /// The tracked touch was cancelled; no `end_touch` will follow.
    fn cancel_touch(&mut self, cx: &mut TouchCx<'_>) {
        _ = cx;
    }

    /// The touch has been held in place for the long-press delay.
    fn long_press(&mut self, cx: &mut TouchCx<'_>) {
        _ = cx;
    }
}

/// What a delegate draws with.
///
/// The view is in the layer's coordinates and already clipped to the part of
/// the layer that needs drawing.
pub struct DrawCx<'v, 'a> {
    view: &'v mut BufferView<'a>,
    fonts: &'v FontBook,
    bounds: IntRect,
    background: Option<Rgba8>,
    radius: u32,
}

impl core::fmt::Debug for DrawCx<'_, '_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DrawCx")
            .field("bounds", &self.bounds)
            .field("clip", &self.view.bounds())
            .finish_non_exhaustive()
    }
}

impl<'v, 'a> DrawCx<'v, 'a> {
    pub(crate) fn new(
        view: &'v mut BufferView<'a>,
        fonts: &'v FontBook,
        bounds: IntRect,
        background: Option<Rgba8>,
        radius: u32,
    ) -> Self {
        Self {
            view,
            fonts,
            bounds,
            background,
            radius,
        }
    }

    /// The layer's full bounds, `(0, 0)..(width, height)`.
    #[must_use]
    pub fn bounds(&self) -> IntRect {
        self.bounds
    }

    /// The part of the layer being redrawn.
    #[must_use]
    pub fn clip(&self) -> IntRect {
        self.view.bounds()
    }

    /// The layer's background color.
    #[must_use]
    pub fn background(&self) -> Option<Rgba8> {
        self.background
    }

    /// The layer's corner radius.
    #[must_use]
    pub fn corner_radius(&self) -> u32 {
        self.radius
    }

    /// The fonts available for text.
    #[must_use]
    pub fn fonts(&self) -> &FontBook {
        self.fonts
    }

    /// Direct access to the target pixels.
    pub fn view(&mut self) -> &mut BufferView<'a> {
        self.view
    }

    /// Fills the layer with its background, rounded by its corner radius.
    pub fn draw_background(&mut self) {
        if let Some(background) = self.background {
            self.view.fill(self.bounds, background, self.radius);
        }
    }

    /// Fills `rect` with `color`.
    pub fn fill(&mut self, rect: IntRect, color: Rgba8, radius: u32) {
        self.view.fill(rect, color, radius);
    }

    /// Draws `text` in `font` inside `rect`.
    ///
    /// Missing fonts and rasterizer failures skip the draw.
    pub fn draw_text(&mut self, font: FontId, text: &str, rect: IntRect, color: Rgba8) {
        let _ = self.fonts.draw(self.view, font, text, rect, color);
    }
}

/// What a delegate handles touches with.
pub struct TouchCx<'a> {
    tree: &'a mut LayerTree,
    layer: LayerId,
    cancel_requested: bool,
}

impl core::fmt::Debug for TouchCx<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TouchCx")
            .field("layer", &self.layer)
            .field("cancel_requested", &self.cancel_requested)
            .finish_non_exhaustive()
    }
}

impl<'a> TouchCx<'a> {
    pub(crate) fn new(tree: &'a mut LayerTree, layer: LayerId) -> Self {
        Self {
            tree,
            layer,
            cancel_requested: false,
        }
    }

    /// The layer receiving the callback.
    #[must_use]
    pub fn layer(&self) -> LayerId {
        self.layer
    }

    /// The receiving layer's bounds, or an empty rectangle if the layer was
    /// destroyed during the callback.
    #[must_use]
    pub fn bounds(&self) -> IntRect {
        if self.tree.is_alive(self.layer) {
            self.tree.bounds(self.layer)
        } else {
            IntRect::ZERO
        }
    }

    /// The layer tree, for arbitrary mutation.
    pub fn tree(&mut self) -> &mut LayerTree {
        self.tree
    }

    /// Schedules a redraw of the receiving layer.
    pub fn invalidate(&mut self) {
        if self.tree.is_alive(self.layer) {
            self.tree.invalidate(self.layer);
        }
    }

    /// Ends the current gesture: the delegate receives `cancel_touch` and
    /// later samples are ignored until the finger lifts.
    pub fn cancel_gesture(&mut self) {
        self.cancel_requested = true;
    }

    pub(crate) fn cancel_requested(&self) -> bool {
        self.cancel_requested
    }
}

impl LayerTree {
    /// Lends the layer's delegate to `f` along with a [`TouchCx`].
    ///
    /// Returns `None` if the layer has no delegate. The delegate is returned
    /// to the layer afterwards unless the layer died or received a new
    /// delegate in the meantime. The flag reports whether `f` asked for the
    /// gesture to be cancelled.
    pub(crate) fn with_delegate<R>(
        &mut self,
        id: LayerId,
        f: impl FnOnce(&mut dyn LayerDelegate, &mut TouchCx<'_>) -> R,
    ) -> Option<(R, bool)> {
        if !self.is_alive(id) {
            return None;
        }
        let mut delegate = self.delegate[id.idx as usize].take()?;
        let mut cx = TouchCx::new(self, id);
        let result = f(delegate.as_mut(), &mut cx);
        let cancel = cx.cancel_requested();
        if self.is_alive(id) && self.delegate[id.idx as usize].is_none() {
            self.delegate[id.idx as usize] = Some(delegate);
        }
        Some((result, cancel))
    }

    /// Whether the layer's delegate accepts touches.
    pub(crate) fn is_interactive_at(&self, idx: u32) -> bool {
        self.delegate[idx as usize]
            .as_deref()
            .is_some_and(|d| d.is_interactive())
    }

    /// Whether the layer's delegate wants a long-press timer.
    #[must_use]
    pub fn wants_long_press(&self, id: LayerId) -> bool {
        self.validate(id);
        self.delegate[id.idx as usize]
            .as_deref()
            .is_some_and(|d| d.wants_long_press())
    }
}
