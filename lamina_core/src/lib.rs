// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Damage-tracked layer tree and software compositor for small framebuffer
//! displays.
//!
//! `lamina_core` composes a tree of rectangular layers into a premultiplied
//! RGBA screen buffer, tracks which parts of the screen changed, and writes
//! only those parts to an RGB565 framebuffer. It also calibrates resistive
//! touch samples and routes them to layers. It is `no_std` compatible (with
//! `alloc`); devices, input readers and timers live in backend crates.
//!
//! # Architecture
//!
//! Every visible change travels the same path to the panel:
//!
//! ```text
//!   property setter / TouchCx::invalidate
//!       │
//!       ▼
//!   LayerTree::invalidate ──► buffered ancestors' invalid lists
//!       │                      (or parked behind an opaque layer)
//!       ▼
//!   Window::update
//!       ├─ LayerTree::evaluate ──► FrameChanges
//!       ├─ LayerTree::render_root ──► screen buffer + damage RegionList
//!       ├─ CornerMask::erase_corners (screen corners touched by damage)
//!       └─ Display::write_rows ──► RGB565 FramebufferDevice
//! ```
//!
//! **[`geometry`]**: Integer rectangles with the region algebra (winnow,
//! merge, disjoin) plus layout helpers.
//!
//! **[`region`]**: [`RegionList`](region::RegionList), the damage
//! accumulator that keeps its rectangles few and non-overlapping.
//!
//! **[`buffer`]**: [`PixelBuffer`](buffer::PixelBuffer) rasters and
//! clipped, translated [`BufferView`](buffer::BufferView)s that report what
//! they touch.
//!
//! **[`color`]**: Premultiplied RGBA and the RGB565 wire format.
//!
//! **[`corner`]**: Rounded-corner masks.
//!
//! **[`layer`]**: Struct-of-arrays layer tree with generational handles,
//! invalidation, occlusion-aware rendering and hit-testing.
//!
//! **[`dirty`]**: Dirty channels via `understory_dirty`.
//!
//! **[`touch`]**: Calibration and the gesture dispatcher.
//!
//! **[`widget`]**: Stock delegates: buttons, labels and images.
//!
//! **[`display`]**: The framebuffer device seam and the RGB565 sink.
//!
//! **[`window`]**: Ties a tree, a display and a dispatcher together.
//!
//! **[`text`]**: Text measurement and drawing seam.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! update instrumentation, with zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-layer
//!   change and damage-rect events.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod buffer;
pub mod color;
pub mod corner;
pub mod dirty;
pub mod display;
pub mod geometry;
pub mod layer;
pub mod region;
pub mod text;
pub mod touch;
pub mod trace;
pub mod widget;
pub mod window;
