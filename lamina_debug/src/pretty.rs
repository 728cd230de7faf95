// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] writes one line per event to any [`Write`]. Write
//! errors are counted rather than propagated, since [`TraceSink`] methods
//! cannot fail.

use std::io::Write;

use lamina_core::trace::{
    DamageRect, FlushEvent, FrameBeginEvent, FrameSummary, LayerChange, PhaseBeginEvent,
    PhaseEndEvent, TraceSink,
};

/// A [`TraceSink`] that prints one line per event.
#[derive(Debug)]
pub struct PrettyPrintSink<W> {
    out: W,
    errors: u64,
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink printing to `out`.
    pub fn new(out: W) -> Self {
        Self { out, errors: 0 }
    }

    /// Number of lines that failed to write.
    #[must_use]
    pub fn write_errors(&self) -> u64 {
        self.errors
    }

    /// Consumes the sink and returns the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, args: core::fmt::Arguments<'_>) {
        if writeln!(self.out, "{args}").is_err() {
            self.errors += 1;
        }
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_frame_begin(&mut self, e: &FrameBeginEvent) {
        self.line(format_args!("[{:>6}] frame begin @ {}us", e.frame_index, e.timestamp_us));
    }

    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        self.line(format_args!(
            "[{:>6}]   {} begin @ {}us",
            e.frame_index,
            e.phase.name(),
            e.timestamp_us
        ));
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        self.line(format_args!(
            "[{:>6}]   {} end @ {}us",
            e.frame_index,
            e.phase.name(),
            e.timestamp_us
        ));
    }

    fn on_flush(&mut self, e: &FlushEvent) {
        self.line(format_args!(
            "[{:>6}] flush {} rects, {} px @ {}us",
            e.frame_index, e.rects, e.pixels, e.timestamp_us
        ));
    }

    fn on_frame_summary(&mut self, s: &FrameSummary) {
        self.line(format_args!(
            "[{:>6}] summary eval={}us render={}us mask={}us flush={}us rects={} px={}{}",
            s.frame_index,
            s.eval_us,
            s.render_us,
            s.mask_us,
            s.flush_us,
            s.rects,
            s.pixels,
            if s.corners_masked { " corners" } else { "" }
        ));
    }

    fn on_layer_changes(&mut self, frame_index: u64, changes: &[LayerChange]) {
        self.line(format_args!("[{frame_index:>6}]   {} layer changes", changes.len()));
        for c in changes {
            self.line(format_args!(
                "[{frame_index:>6}]     layer {} {:?}",
                c.layer_index, c.field
            ));
        }
    }

    fn on_damage_rects(&mut self, frame_index: u64, rects: &[DamageRect]) {
        for r in rects {
            self.line(format_args!(
                "[{frame_index:>6}]   damage {}x{} at ({}, {})",
                r.width, r.height, r.x, r.y
            ));
        }
    }
}
