// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the composite pass.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that
//! [`Window::update_traced`](crate::window::Window::update_traced) calls at
//! each stage. All method bodies default to no-ops, so implementing only the
//! events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! Timestamps are microseconds from a caller-supplied clock; the core crate
//! has no notion of wall time.
//!
//! # Crate features
//!
//! - `trace`: enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`): gates [`LayerChange`] and [`DamageRect`]
//!   events plus the corresponding `TraceSink` methods.

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which phase of a window update is being measured.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PhaseKind {
    /// Layer tree evaluation (deferred invalidations, change collection).
    Evaluate,
    /// Compositing invalid regions into the screen buffer.
    Render,
    /// Screen corner masking.
    Mask,
    /// Converting and writing damaged rectangles to the display.
    Flush,
}

impl PhaseKind {
    /// All phases, in update order.
    pub const ALL: [Self; 4] = [Self::Evaluate, Self::Render, Self::Mask, Self::Flush];

    /// A short lowercase name for printing.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Evaluate => "evaluate",
            Self::Render => "render",
            Self::Mask => "mask",
            Self::Flush => "flush",
        }
    }
}

/// Which property of a layer changed.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayerField {
    /// Frame rectangle.
    Frame,
    /// Drawn content (background, corner radius, delegate state).
    Content,
    /// Invalidation held at an opaque layer until evaluation.
    Deferred,
    /// Topology (parent/child relationships).
    Topology,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when a window update starts.
#[derive(Clone, Copy, Debug)]
pub struct FrameBeginEvent {
    /// Monotonic update counter.
    pub frame_index: u64,
    /// Clock reading at the start of the update.
    pub timestamp_us: u64,
}

/// Marks the beginning of an update phase.
#[derive(Clone, Copy, Debug)]
pub struct PhaseBeginEvent {
    /// Update counter.
    pub frame_index: u64,
    /// Which phase is starting.
    pub phase: PhaseKind,
    /// Clock reading at the start of the phase.
    pub timestamp_us: u64,
}

/// Marks the end of an update phase.
#[derive(Clone, Copy, Debug)]
pub struct PhaseEndEvent {
    /// Update counter.
    pub frame_index: u64,
    /// Which phase is ending.
    pub phase: PhaseKind,
    /// Clock reading at the end of the phase.
    pub timestamp_us: u64,
}

/// Emitted after damaged rectangles were written to the display.
#[derive(Clone, Copy, Debug)]
pub struct FlushEvent {
    /// Update counter.
    pub frame_index: u64,
    /// Number of rectangles written.
    pub rects: u32,
    /// Number of pixels written.
    pub pixels: u64,
    /// Clock reading after the last write.
    pub timestamp_us: u64,
}

/// Per-update timing summary produced by [`FrameSummaryBuilder`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameSummary {
    /// Update counter.
    pub frame_index: u64,
    /// Evaluate phase duration in µs (0 if not measured).
    pub eval_us: u64,
    /// Render phase duration in µs (0 if not measured).
    pub render_us: u64,
    /// Mask phase duration in µs (0 if not measured).
    pub mask_us: u64,
    /// Flush phase duration in µs (0 if not measured).
    pub flush_us: u64,
    /// Rectangles flushed.
    pub rects: u32,
    /// Pixels flushed.
    pub pixels: u64,
    /// Whether the screen corners had to be re-masked.
    pub corners_masked: bool,
}

/// A per-update layer change record.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayerChange {
    /// Slot index of the layer that changed.
    pub layer_index: u32,
    /// Which field changed.
    pub field: LayerField,
}

/// An axis-aligned damage rectangle, in screen-buffer coordinates.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DamageRect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width.
    pub width: u32,
    /// Height.
    pub height: u32,
}

#[cfg(feature = "trace-rich")]
impl From<crate::geometry::IntRect> for DamageRect {
    fn from(r: crate::geometry::IntRect) -> Self {
        Self {
            x: r.x0,
            y: r.y0,
            width: r.width().unsigned_abs(),
            height: r.height().unsigned_abs(),
        }
    }
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from window updates.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when an update begins.
    fn on_frame_begin(&mut self, e: &FrameBeginEvent) {
        _ = e;
    }

    /// Called at the beginning of an update phase.
    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        _ = e;
    }

    /// Called at the end of an update phase.
    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        _ = e;
    }

    /// Called after damage was written to the display.
    fn on_flush(&mut self, e: &FlushEvent) {
        _ = e;
    }

    /// Called with a per-update timing summary.
    fn on_frame_summary(&mut self, s: &FrameSummary) {
        _ = s;
    }

    /// Called with per-update layer changes (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_layer_changes(&mut self, frame_index: u64, changes: &[LayerChange]) {
        _ = (frame_index, changes);
    }

    /// Called with per-update damage rectangles (requires `trace-rich`
    /// feature).
    #[cfg(feature = "trace-rich")]
    fn on_damage_rects(&mut self, frame_index: u64, rects: &[DamageRect]) {
        _ = (frame_index, rects);
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`FrameBeginEvent`].
    #[inline]
    pub fn frame_begin(&mut self, e: &FrameBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_frame_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PhaseBeginEvent`].
    #[inline]
    pub fn phase_begin(&mut self, e: &PhaseBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_phase_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PhaseEndEvent`].
    #[inline]
    pub fn phase_end(&mut self, e: &PhaseEndEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_phase_end(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`FlushEvent`].
    #[inline]
    pub fn flush(&mut self, e: &FlushEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_flush(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`FrameSummary`].
    #[inline]
    pub fn frame_summary(&mut self, s: &FrameSummary) {
        #[cfg(feature = "trace")]
        if let Some(sink) = &mut self.sink {
            sink.on_frame_summary(s);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = s;
        }
    }

    /// Emits layer changes (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn layer_changes(&mut self, frame_index: u64, changes: &[LayerChange]) {
        if let Some(s) = &mut self.sink {
            s.on_layer_changes(frame_index, changes);
        }
    }

    /// Emits damage rectangles (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn damage_rects(&mut self, frame_index: u64, rects: &[DamageRect]) {
        if let Some(s) = &mut self.sink {
            s.on_damage_rects(frame_index, rects);
        }
    }
}

// ---------------------------------------------------------------------------
// FrameSummaryBuilder
// ---------------------------------------------------------------------------

/// Collects phase timestamps during an update and produces a
/// [`FrameSummary`].
#[derive(Debug)]
pub struct FrameSummaryBuilder {
    frame_index: u64,
    phase_starts: [Option<u64>; 4],
    phase_ends: [Option<u64>; 4],
    rects: u32,
    pixels: u64,
    corners_masked: bool,
}

impl FrameSummaryBuilder {
    /// Starts building a summary for the given update.
    #[must_use]
    pub fn new(frame_index: u64) -> Self {
        Self {
            frame_index,
            phase_starts: [None; 4],
            phase_ends: [None; 4],
            rects: 0,
            pixels: 0,
            corners_masked: false,
        }
    }

    /// Records the start of a phase.
    pub fn phase_begin(&mut self, phase: PhaseKind, t_us: u64) {
        self.phase_starts[phase_index(phase)] = Some(t_us);
    }

    /// Records the end of a phase.
    pub fn phase_end(&mut self, phase: PhaseKind, t_us: u64) {
        self.phase_ends[phase_index(phase)] = Some(t_us);
    }

    /// Records what was flushed.
    pub fn set_flushed(&mut self, rects: u32, pixels: u64) {
        self.rects = rects;
        self.pixels = pixels;
    }

    /// Records whether the screen corners were re-masked.
    pub fn set_corners_masked(&mut self, masked: bool) {
        self.corners_masked = masked;
    }

    /// Consumes the builder and produces the final [`FrameSummary`].
    #[must_use]
    pub fn finish(self) -> FrameSummary {
        FrameSummary {
            frame_index: self.frame_index,
            eval_us: self.phase_duration(PhaseKind::Evaluate),
            render_us: self.phase_duration(PhaseKind::Render),
            mask_us: self.phase_duration(PhaseKind::Mask),
            flush_us: self.phase_duration(PhaseKind::Flush),
            rects: self.rects,
            pixels: self.pixels,
            corners_masked: self.corners_masked,
        }
    }

    fn phase_duration(&self, phase: PhaseKind) -> u64 {
        let idx = phase_index(phase);
        match (self.phase_starts[idx], self.phase_ends[idx]) {
            (Some(start), Some(end)) => end.saturating_sub(start),
            _ => 0,
        }
    }
}

/// Maps a [`PhaseKind`] to an array index.
const fn phase_index(phase: PhaseKind) -> usize {
    match phase {
        PhaseKind::Evaluate => 0,
        PhaseKind::Render => 1,
        PhaseKind::Mask => 2,
        PhaseKind::Flush => 3,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_sink_compiles() {
        let mut sink = NoopSink;
        sink.on_frame_begin(&FrameBeginEvent {
            frame_index: 0,
            timestamp_us: 0,
        });
        sink.on_frame_summary(&FrameSummary::default());
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tracer = Tracer::none();
        tracer.frame_begin(&FrameBeginEvent {
            frame_index: 1,
            timestamp_us: 5,
        });
        tracer.flush(&FlushEvent {
            frame_index: 1,
            rects: 2,
            pixels: 100,
            timestamp_us: 9,
        });
    }

    #[test]
    fn summary_builder_computes_durations() {
        let mut builder = FrameSummaryBuilder::new(42);
        builder.phase_begin(PhaseKind::Evaluate, 1_000);
        builder.phase_end(PhaseKind::Evaluate, 1_010);
        builder.phase_begin(PhaseKind::Render, 1_010);
        builder.phase_end(PhaseKind::Render, 1_400);
        builder.phase_begin(PhaseKind::Mask, 1_400);
        builder.phase_end(PhaseKind::Mask, 1_405);
        builder.phase_begin(PhaseKind::Flush, 1_405);
        builder.phase_end(PhaseKind::Flush, 2_000);
        builder.set_flushed(3, 1_200);
        builder.set_corners_masked(true);

        let summary = builder.finish();
        assert_eq!(summary.eval_us, 10, "evaluate");
        assert_eq!(summary.render_us, 390, "render");
        assert_eq!(summary.mask_us, 5, "mask");
        assert_eq!(summary.flush_us, 595, "flush");
        assert_eq!((summary.rects, summary.pixels), (3, 1_200), "flushed");
        assert!(summary.corners_masked, "masked");
        assert_eq!(summary.frame_index, 42, "index");
    }

    #[test]
    fn summary_builder_missing_phases_are_zero() {
        let mut builder = FrameSummaryBuilder::new(0);
        builder.phase_begin(PhaseKind::Render, 50);
        let summary = builder.finish();
        assert_eq!(summary.render_us, 0, "unterminated phase");
        assert_eq!(summary.eval_us + summary.mask_us + summary.flush_us, 0, "absent");
    }

    #[test]
    fn backwards_clock_saturates() {
        let mut builder = FrameSummaryBuilder::new(0);
        builder.phase_begin(PhaseKind::Flush, 100);
        builder.phase_end(PhaseKind::Flush, 90);
        assert_eq!(builder.finish().flush_us, 0, "no underflow");
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        use alloc::vec::Vec;

        struct RecordingSink {
            phases: Vec<(PhaseKind, u64)>,
        }
        impl TraceSink for RecordingSink {
            fn on_phase_end(&mut self, e: &PhaseEndEvent) {
                self.phases.push((e.phase, e.timestamp_us));
            }
        }

        let mut sink = RecordingSink { phases: Vec::new() };
        let mut tracer = Tracer::new(&mut sink);
        tracer.phase_end(&PhaseEndEvent {
            frame_index: 3,
            phase: PhaseKind::Mask,
            timestamp_us: 77,
        });
        drop(tracer);
        assert_eq!(sink.phases, &[(PhaseKind::Mask, 77)], "one phase end recorded");
    }
}
