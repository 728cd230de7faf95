// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The window: a layer tree bound to a display.
//!
//! A [`Window`] owns a buffered root layer sized to the screen. Each
//! [`update`](Window::update) runs the composite pass:
//!
//! ```text
//!   evaluate ──► render invalid regions of the root ──► reduce damage
//!       ──► mask screen corners (if a damaged rect reaches one)
//!       ──► convert + write damaged rects to the display ──► clear damage
//! ```
//!
//! Touch samples enter through [`touch`](Window::touch), which calibrates
//! them and hands them to the window's [`Dispatcher`].

#[cfg(feature = "trace-rich")]
use alloc::vec::Vec;

use crate::corner::{CornerMask, MAX_RADIUS};
use crate::display::{Display, DisplayError, FramebufferDevice};
use crate::geometry::{IntRect, IntSize};
use crate::layer::{FrameChanges, LayerId, LayerTree};
use crate::region::RegionList;
use crate::text::FontBook;
use crate::touch::{
    Dispatcher, LongPressTimer, LongPressToken, TouchEvent, TouchscreenCalibration,
};
use crate::trace::{
    FlushEvent, FrameBeginEvent, FrameSummary, FrameSummaryBuilder, PhaseBeginEvent, PhaseEndEvent,
    PhaseKind, Tracer,
};

/// A screen-sized layer tree and the display it is shown on.
pub struct Window<D> {
    tree: LayerTree,
    root: LayerId,
    display: Display<D>,
    fonts: FontBook,
    damage: RegionList,
    changes: FrameChanges,
    calibration: Option<TouchscreenCalibration>,
    dispatcher: Dispatcher,
    corner_radius: u32,
    frame_index: u64,
}

impl<D> core::fmt::Debug for Window<D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Window")
            .field("root", &self.root)
            .field("display", &self.display)
            .field("corner_radius", &self.corner_radius)
            .field("frame_index", &self.frame_index)
            .finish_non_exhaustive()
    }
}

impl<D: FramebufferDevice> Window<D> {
    /// Creates a window covering `display`.
    ///
    /// The root layer starts without a background and fully invalid, so the
    /// first update draws the whole screen. Screen corners are rounded with
    /// the largest supported radius.
    pub fn new(display: Display<D>, fonts: FontBook) -> Self {
        let mut tree = LayerTree::new();
        let root = tree.create_buffered_layer();
        tree.set_frame(root, display.bounds());
        Self {
            tree,
            root,
            display,
            fonts,
            damage: RegionList::new(),
            changes: FrameChanges::default(),
            calibration: None,
            dispatcher: Dispatcher::default(),
            corner_radius: MAX_RADIUS,
            frame_index: 0,
        }
    }

    /// The root layer.
    #[must_use]
    pub fn root(&self) -> LayerId {
        self.root
    }

    /// The layer tree.
    #[must_use]
    pub fn tree(&self) -> &LayerTree {
        &self.tree
    }

    /// The layer tree, for mutation.
    pub fn tree_mut(&mut self) -> &mut LayerTree {
        &mut self.tree
    }

    /// The fonts passed to every draw.
    pub fn fonts_mut(&mut self) -> &mut FontBook {
        &mut self.fonts
    }

    /// The display.
    #[must_use]
    pub fn display(&self) -> &Display<D> {
        &self.display
    }

    /// Screen size in pixels.
    #[must_use]
    pub fn size(&self) -> IntSize {
        self.display.size()
    }

    /// The composited screen image.
    #[must_use]
    pub fn screen(&self) -> Option<&crate::buffer::PixelBuffer> {
        self.tree.buffer(self.root)
    }

    /// Sets the radius of the rounded screen corners; 0 disables masking.
    pub fn set_screen_corner_radius(&mut self, radius: u32) {
        self.corner_radius = radius;
        self.tree.invalidate(self.root);
    }

    /// Installs (or removes) the touchscreen calibration.
    ///
    /// The calibration is oriented to the display's rotation and prepared for
    /// its size here. Without one, samples pass through unchanged.
    pub fn set_calibration(&mut self, calibration: Option<TouchscreenCalibration>) {
        self.calibration = calibration.map(|mut cal| {
            cal.orient(self.display.rotation());
            cal.prepare(self.display.size());
            cal
        });
    }

    /// Replaces the touch dispatcher, dropping any gesture in progress.
    pub fn set_dispatcher(&mut self, dispatcher: Dispatcher) {
        self.dispatcher = dispatcher;
    }

    /// Maps a raw sample to screen space with the installed calibration.
    pub fn adjust_touch(&self, event: &mut TouchEvent) {
        if let Some(cal) = &self.calibration {
            cal.adjust(event);
        }
    }

    /// Calibrates a raw sample and dispatches it.
    ///
    /// Returns `true` if a layer handled it.
    pub fn touch(&mut self, mut raw: TouchEvent, timer: &mut dyn LongPressTimer) -> bool {
        self.adjust_touch(&mut raw);
        self.dispatcher.handle(&mut self.tree, self.root, raw, timer)
    }

    /// Delivers an expired long-press timer.
    pub fn fire_long_press(&mut self, token: LongPressToken, timer: &mut dyn LongPressTimer) -> bool {
        self.dispatcher.fire_long_press(&mut self.tree, token, timer)
    }

    /// Cancels the gesture in progress, if any.
    pub fn cancel_touch(&mut self, timer: &mut dyn LongPressTimer) -> bool {
        self.dispatcher.cancel(&mut self.tree, timer)
    }

    /// Returns `true` if an update would draw something.
    #[must_use]
    pub fn needs_update(&self) -> bool {
        !self.tree.invalid_rects(self.root).is_empty()
            || self.tree.has_deferred()
            || !self.damage.is_empty()
    }

    /// Runs one composite pass without tracing.
    pub fn update(&mut self) -> Result<FrameSummary, DisplayError<D::Error>> {
        self.update_traced(&mut Tracer::none(), &mut || 0)
    }

    /// Redraws and flushes the whole screen.
    pub fn redraw(&mut self) -> Result<FrameSummary, DisplayError<D::Error>> {
        self.tree.invalidate(self.root);
        self.update()
    }

    /// Runs one composite pass, reporting each phase to `tracer` with
    /// timestamps read from `now_us`.
    ///
    /// If a display write fails, the rectangles not yet written stay damaged
    /// and are flushed by the next update.
    pub fn update_traced(
        &mut self,
        tracer: &mut Tracer<'_>,
        now_us: &mut dyn FnMut() -> u64,
    ) -> Result<FrameSummary, DisplayError<D::Error>> {
        let frame_index = self.frame_index;
        self.frame_index += 1;
        let mut summary = FrameSummaryBuilder::new(frame_index);
        tracer.frame_begin(&FrameBeginEvent {
            frame_index,
            timestamp_us: now_us(),
        });

        stamp(tracer, &mut summary, now_us, frame_index, PhaseKind::Evaluate, true);
        self.tree.evaluate_into(&mut self.changes);
        #[cfg(feature = "trace-rich")]
        tracer.layer_changes(frame_index, &layer_changes(&self.changes));
        stamp(tracer, &mut summary, now_us, frame_index, PhaseKind::Evaluate, false);

        stamp(tracer, &mut summary, now_us, frame_index, PhaseKind::Render, true);
        self.tree.render_root(self.root, &self.fonts, &mut self.damage);
        let rects = self.damage.dequeue();
        #[cfg(feature = "trace-rich")]
        tracer.damage_rects(
            frame_index,
            &rects
                .iter()
                .map(|&r| crate::trace::DamageRect::from(r))
                .collect::<Vec<_>>(),
        );
        stamp(tracer, &mut summary, now_us, frame_index, PhaseKind::Render, false);

        stamp(tracer, &mut summary, now_us, frame_index, PhaseKind::Mask, true);
        let masked = self.mask_corners(&rects);
        summary.set_corners_masked(masked);
        stamp(tracer, &mut summary, now_us, frame_index, PhaseKind::Mask, false);

        stamp(tracer, &mut summary, now_us, frame_index, PhaseKind::Flush, true);
        let mut pixels = 0_u64;
        if let Some(screen) = self.tree.buffer(self.root) {
            for (i, rect) in rects.iter().enumerate() {
                if let Err(err) = self.display.write_rows(*rect, screen) {
                    self.damage.extend(rects[i..].iter().copied());
                    return Err(err);
                }
                pixels += rect.area();
            }
        }
        let flushed = u32::try_from(rects.len()).unwrap_or(u32::MAX);
        let end = stamp(tracer, &mut summary, now_us, frame_index, PhaseKind::Flush, false);
        tracer.flush(&FlushEvent {
            frame_index,
            rects: flushed,
            pixels,
            timestamp_us: end,
        });

        summary.set_flushed(flushed, pixels);
        let summary = summary.finish();
        tracer.frame_summary(&summary);
        Ok(summary)
    }

    /// Clears the screen and releases the device.
    pub fn close(self) -> Result<D, DisplayError<D::Error>> {
        self.display.close()
    }

    /// Erases the rounded screen corners from the root buffer if any damaged
    /// rectangle may have painted over one.
    fn mask_corners(&mut self, rects: &[IntRect]) -> bool {
        let mask = CornerMask::new(self.display.bounds(), self.corner_radius);
        if !rects.iter().any(|r| mask.touches_corners(r)) {
            return false;
        }
        match self.tree.buffer_mut(self.root) {
            Some(screen) => {
                mask.erase_corners(&mut screen.view());
                true
            }
            None => false,
        }
    }
}

/// Records a phase boundary in both the summary and the tracer.
fn stamp(
    tracer: &mut Tracer<'_>,
    summary: &mut FrameSummaryBuilder,
    now_us: &mut dyn FnMut() -> u64,
    frame_index: u64,
    phase: PhaseKind,
    begin: bool,
) -> u64 {
    let timestamp_us = now_us();
    if begin {
        summary.phase_begin(phase, timestamp_us);
        tracer.phase_begin(&PhaseBeginEvent {
            frame_index,
            phase,
            timestamp_us,
        });
    } else {
        summary.phase_end(phase, timestamp_us);
        tracer.phase_end(&PhaseEndEvent {
            frame_index,
            phase,
            timestamp_us,
        });
    }
    timestamp_us
}

#[cfg(feature = "trace-rich")]
fn layer_changes(changes: &FrameChanges) -> Vec<crate::trace::LayerChange> {
    use crate::trace::{LayerChange, LayerField};

    let tagged = |ids: &[u32], field: LayerField| {
        ids.iter()
            .map(move |&layer_index| LayerChange { layer_index, field })
            .collect::<Vec<_>>()
    };
    let mut out = tagged(&changes.frames, LayerField::Frame);
    out.extend(tagged(&changes.content, LayerField::Content));
    out.extend(tagged(&changes.deferred, LayerField::Deferred));
    out.extend(tagged(&changes.added, LayerField::Topology));
    out.extend(tagged(&changes.removed, LayerField::Topology));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{Rgb565, Rgba8};
    use crate::display::{MemoryFramebuffer, Rotation};
    use crate::geometry::IntPoint;
    use crate::touch::ManualTimer;

    fn window(w: i32, h: i32) -> Window<MemoryFramebuffer> {
        let fb = MemoryFramebuffer::for_size(IntSize::new(w, h));
        let display = Display::open(w, h, Rotation::R0, fb).expect("fits");
        Window::new(display, FontBook::new())
    }

    fn pixel(win: &Window<MemoryFramebuffer>, x: i32, y: i32) -> Option<Rgba8> {
        win.screen().and_then(|s| s.pixel(x, y))
    }

    #[test]
    fn opaque_child_composites_exactly() {
        let mut win = window(100, 100);
        win.set_screen_corner_radius(0);
        let root = win.root();
        let tree = win.tree_mut();
        tree.set_background(root, Some(Rgba8::BLACK));
        let child = tree.create_layer();
        tree.set_frame(child, IntRect::new(20, 20, 50, 50));
        tree.set_background(child, Some(Rgba8::WHITE));
        tree.add_child(root, child);
        tree.invalidate(root);

        let stats = win.update().expect("flushed");
        assert_eq!(stats.rects, 1, "damage reduced to one rectangle");
        assert_eq!(stats.pixels, 100 * 100, "the whole screen");

        let screen = win.screen().expect("root is buffered");
        for y in 0..100 {
            for x in 0..100 {
                let inside = (20..50).contains(&x) && (20..50).contains(&y);
                let expected = if inside { Rgba8::WHITE } else { Rgba8::BLACK };
                assert_eq!(screen.pixel(x, y), Some(expected), "pixel ({x}, {y})");
            }
        }
        let white = Rgb565::from_rgb(0xFF, 0xFF, 0xFF);
        let fb = win.display().device();
        assert_eq!(fb.pixel_at(2 * (20 * 100 + 20)), Some(white), "device updated");
        assert_eq!(fb.pixel_at(0), Some(Rgb565([0, 0])), "black stays black");
    }

    #[test]
    fn opaque_child_change_flushes_only_its_frame() {
        let mut win = window(100, 100);
        let root = win.root();
        let tree = win.tree_mut();
        tree.set_background(root, Some(Rgba8::BLACK));
        let child = tree.create_layer();
        tree.set_frame(child, IntRect::new(20, 20, 50, 50));
        tree.set_background(child, Some(Rgba8::WHITE));
        tree.add_child(root, child);
        win.update().expect("first frame");
        assert!(!win.needs_update(), "idle");

        win.tree_mut().set_background(child, Some(Rgba8::opaque(0, 0, 0xFF)));
        assert!(win.needs_update(), "change parked at the child");
        let stats = win.update().expect("second frame");
        assert_eq!(stats.rects, 1, "one rect");
        assert_eq!(stats.pixels, 30 * 30, "just the child");
        assert!(!stats.corners_masked, "interior change");
        assert_eq!(pixel(&win, 30, 30), Some(Rgba8::opaque(0, 0, 0xFF)), "recolored");
    }

    #[test]
    fn screen_corners_are_masked_when_touched() {
        let mut win = window(40, 40);
        let root = win.root();
        win.tree_mut().set_background(root, Some(Rgba8::WHITE));
        let stats = win.update().expect("flushed");
        assert!(stats.corners_masked, "full-screen damage reaches the corners");
        assert_eq!(pixel(&win, 0, 0), Some(Rgba8::TRANSPARENT), "corner erased");
        assert_eq!(pixel(&win, 20, 0), Some(Rgba8::WHITE), "edge kept");
    }

    #[test]
    fn nothing_to_do_flushes_nothing() {
        let mut win = window(10, 10);
        win.update().expect("first frame");
        let stats = win.update().expect("idle frame");
        assert_eq!((stats.rects, stats.pixels), (0, 0), "no damage");
        assert_eq!(stats.frame_index, 1, "counter advances");
    }

    #[test]
    fn redraw_flushes_everything() {
        let mut win = window(10, 10);
        win.update().expect("first frame");
        let stats = win.redraw().expect("redraw");
        assert_eq!(stats.pixels, 100, "full screen");
    }

    #[test]
    fn failed_flush_keeps_damage_for_the_next_update() {
        use alloc::rc::Rc;
        use core::cell::Cell;

        use crate::display::OutOfRange;

        struct Flaky {
            inner: MemoryFramebuffer,
            fail_next: Rc<Cell<bool>>,
        }

        impl FramebufferDevice for Flaky {
            type Error = OutOfRange;

            fn len(&self) -> usize {
                self.inner.len()
            }

            fn write_at(&mut self, offset: usize, bytes: &[u8]) -> Result<(), OutOfRange> {
                if self.fail_next.replace(false) {
                    return Err(OutOfRange {
                        offset,
                        len: bytes.len(),
                    });
                }
                self.inner.write_at(offset, bytes)
            }
        }

        let fail_next = Rc::new(Cell::new(false));
        let device = Flaky {
            inner: MemoryFramebuffer::for_size(IntSize::new(10, 10)),
            fail_next: fail_next.clone(),
        };
        let display = Display::open(10, 10, Rotation::R0, device).expect("fits");
        let mut win = Window::new(display, FontBook::new());
        win.set_screen_corner_radius(0);
        let root = win.root();
        win.tree_mut().set_background(root, Some(Rgba8::WHITE));

        fail_next.set(true);
        assert!(win.update().is_err(), "first write fails");
        assert!(win.needs_update(), "unwritten damage is pending");

        let stats = win.update().expect("retried");
        assert_eq!(stats.pixels, 100, "whole screen flushed on retry");
        let white = Rgb565::encode(Rgba8::WHITE).to_bytes();
        assert!(
            win.display().device().inner.bytes().chunks_exact(2).all(|p| p == white),
            "device shows the frame"
        );
        assert!(!win.needs_update(), "nothing left");
    }

    #[test]
    fn touches_are_calibrated_then_dispatched() {
        use alloc::boxed::Box;

        use crate::layer::{LayerDelegate, TouchCx};

        #[derive(Default)]
        struct Spot(Option<IntPoint>);

        impl LayerDelegate for Spot {
            fn is_interactive(&self) -> bool {
                true
            }

            fn start_touch(&mut self, _cx: &mut TouchCx<'_>, event: &TouchEvent) {
                self.0 = Some(event.point);
            }
        }

        let mut win = window(100, 100);
        win.set_calibration(Some(TouchscreenCalibration::new(0, 1000, 1000, 0, 0, 1)));
        let root = win.root();
        let tree = win.tree_mut();
        let target = tree.create_layer();
        tree.set_frame(target, IntRect::new(40, 40, 60, 60));
        tree.set_delegate(target, Box::new(Spot::default()));
        tree.add_child(root, target);

        let mut timer = ManualTimer::new();
        let raw = TouchEvent::new(IntPoint::new(500, 500), true, 1);
        assert!(win.touch(raw, &mut timer), "hit");
        let got = win.tree().delegate::<Spot>(target).and_then(|s| s.0);
        assert_eq!(got, Some(IntPoint::new(9, 9)), "raw 500 maps to 49, local 9");
    }

    #[test]
    fn close_clears_the_framebuffer() {
        let mut win = window(8, 8);
        let root = win.root();
        win.tree_mut().set_background(root, Some(Rgba8::WHITE));
        win.update().expect("drawn");
        let fb = win.close().expect("closed");
        assert!(fb.bytes().iter().all(|&b| b == 0), "cleared");
    }
}
