// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layer tree data model.
//!
//! A *layer* is a rectangular node in a compositing tree. Each layer has:
//!
//! - An identity ([`LayerId`]), a generational handle that becomes stale when
//!   the layer is destroyed, preventing use-after-free bugs at the API level.
//! - Topology: parent, first-child, and sibling links forming an ordered
//!   tree. Child order is z-order; later children draw on top.
//! - Properties set by the caller: [`frame`](LayerTree::set_frame) in parent
//!   coordinates, [`background`](LayerTree::set_background),
//!   [`corner radius`](LayerTree::set_corner_radius), and a boxed
//!   [`LayerDelegate`] that draws and handles touches.
//! - Optionally, an off-screen buffer
//!   ([`create_buffered_layer`](LayerTree::create_buffered_layer)) holding
//!   the rendered subtree and the buffer-local rectangles still to redraw.
//!
//! Layers are stored in struct-of-arrays layout with index-based handles.
//!
//! # Invalidation
//!
//! [`invalidate_rect`](LayerTree::invalidate_rect) walks from a layer up to
//! its root, clipping the rectangle to each layer and recording it in every
//! buffered layer on the way. A layer with an opaque, square background
//! holds the rectangle back until the next [`evaluate`](LayerTree::evaluate),
//! which forwards it; the root's invalid list is the window's damage.
//!
//! # Dirty tracking
//!
//! Mutations also mark the channels in [`dirty`](crate::dirty), which
//! `evaluate` reports as [`FrameChanges`].

mod delegate;
mod evaluate;
mod hit;
mod id;
mod invalidate;
mod render;
mod store;
mod traverse;

pub use delegate::{DrawCx, LayerDelegate, TouchCx};
pub use evaluate::FrameChanges;
pub use hit::HitTarget;
pub use id::{INVALID, LayerId};
pub use store::LayerTree;
pub use traverse::Children;
