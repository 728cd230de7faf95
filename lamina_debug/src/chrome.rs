// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][format] JSON to the given writer.
//!
//! [format]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use crate::recorder::{RecordedEvent, decode};

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
///
/// Recorded timestamps are already in microseconds. Rich events carry no
/// timestamp of their own and are placed at the last one seen.
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();
    let mut last_ts = 0_u64;

    for recorded in decode(bytes) {
        match recorded {
            RecordedEvent::FrameBegin(e) => {
                last_ts = e.timestamp_us;
                events.push(json!({
                    "ph": "i",
                    "name": "FrameBegin",
                    "cat": "Window",
                    "ts": e.timestamp_us,
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "frame_index": e.frame_index,
                    }
                }));
            }
            RecordedEvent::PhaseBegin(e) => {
                last_ts = e.timestamp_us;
                events.push(json!({
                    "ph": "B",
                    "name": e.phase.name(),
                    "cat": "Update",
                    "ts": e.timestamp_us,
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "frame_index": e.frame_index,
                    }
                }));
            }
            RecordedEvent::PhaseEnd(e) => {
                last_ts = e.timestamp_us;
                events.push(json!({
                    "ph": "E",
                    "name": e.phase.name(),
                    "cat": "Update",
                    "ts": e.timestamp_us,
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "frame_index": e.frame_index,
                    }
                }));
            }
            RecordedEvent::Flush(e) => {
                last_ts = e.timestamp_us;
                events.push(json!({
                    "ph": "i",
                    "name": "Flush",
                    "cat": "Update",
                    "ts": e.timestamp_us,
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "frame_index": e.frame_index,
                        "rects": e.rects,
                        "pixels": e.pixels,
                    }
                }));
            }
            RecordedEvent::FrameSummary(s) => {
                events.push(json!({
                    "ph": "i",
                    "name": "FrameSummary",
                    "cat": "Summary",
                    "ts": last_ts,
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "frame_index": s.frame_index,
                        "eval_us": s.eval_us,
                        "render_us": s.render_us,
                        "mask_us": s.mask_us,
                        "flush_us": s.flush_us,
                        "rects": s.rects,
                        "pixels": s.pixels,
                        "corners_masked": s.corners_masked,
                    }
                }));
            }
            RecordedEvent::LayerChangesCount { frame_index, count } => {
                events.push(json!({
                    "ph": "i",
                    "name": "LayerChanges",
                    "cat": "Rich",
                    "ts": last_ts,
                    "pid": 0,
                    "tid": 0,
                    "s": "p",
                    "args": {
                        "frame_index": frame_index,
                        "count": count,
                    }
                }));
            }
            RecordedEvent::DamageRects { frame_index, rects } => {
                let rects: Vec<Value> = rects
                    .iter()
                    .map(|r| json!([r.x, r.y, r.width, r.height]))
                    .collect();
                events.push(json!({
                    "ph": "i",
                    "name": "DamageRects",
                    "cat": "Rich",
                    "ts": last_ts,
                    "pid": 0,
                    "tid": 0,
                    "s": "p",
                    "args": {
                        "frame_index": frame_index,
                        "count": rects.len(),
                        "rects": rects,
                    }
                }));
            }
        }
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}
