// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stock layer delegates.
//!
//! Each widget is a [`LayerDelegate`](crate::layer::LayerDelegate) with an
//! `attach` helper that creates a layer for it. Widgets hold their own state;
//! reach them afterwards through
//! [`LayerTree::update_delegate`](crate::layer::LayerTree::update_delegate),
//! which also schedules the redraw.

mod button;
mod image;
mod label;

pub use button::{Action, BUTTON_RADIUS, Button, ButtonColors};
pub use image::ImageView;
pub use label::TextLabel;

/// Interaction state of a control.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ControlState {
    /// A touch is currently inside the control.
    pub highlighted: bool,
    /// The control ignores touches.
    pub disabled: bool,
}

impl ControlState {
    /// Enabled and not highlighted.
    pub const NORMAL: Self = Self {
        highlighted: false,
        disabled: false,
    };
}
