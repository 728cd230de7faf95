// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channel constants.
//!
//! Lamina uses multi-channel dirty tracking (via [`understory_dirty`]) to
//! record which layers changed between window updates. Each channel
//! represents an independent category of change.
//!
//! - **FRAME** propagates to descendants through child-to-parent dependency
//!   edges, since moving a layer moves everything inside it on screen.
//! - **CONTENT**, **DEFERRED** and **TOPOLOGY** are local-only.
//!
//! Pixels are invalidated geometrically (see
//! [`LayerTree::invalidate_rect`](crate::layer::LayerTree::invalidate_rect));
//! the channels only report *which* layers changed.
//!
//! # Consumption
//!
//! [`LayerTree::evaluate`](crate::layer::LayerTree::evaluate) drains all
//! channels and surfaces the results as
//! [`FrameChanges`](crate::layer::FrameChanges). The [`DEFERRED`] channel is
//! also load-bearing: evaluation forwards each marked layer's held-back
//! invalidation to its ancestors.

use understory_dirty::Channel;

/// Frame rectangle changed.
pub const FRAME: Channel = Channel::new(0);

/// Drawn content changed (background, corner radius, delegate state, or an
/// explicit invalidation).
pub const CONTENT: Channel = Channel::new(1);

/// An invalidation stopped at an opaque layer and is waiting to be forwarded.
pub const DEFERRED: Channel = Channel::new(2);

/// Tree topology changed (create/destroy, attach/detach).
pub const TOPOLOGY: Channel = Channel::new(3);
