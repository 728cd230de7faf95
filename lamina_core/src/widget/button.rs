// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::boxed::Box;
use alloc::string::String;
use core::fmt;

use super::ControlState;
use crate::buffer::PixelBuffer;
use crate::color::{BlendMode, Rgba8};
use crate::geometry::{Edge, Gravity, IntPoint, IntRect};
use crate::layer::{DrawCx, LayerDelegate, LayerId, LayerTree, TouchCx};
use crate::text::FontId;
use crate::touch::{GestureConfig, TouchEvent};

/// Corner radius of a button's face.
pub const BUTTON_RADIUS: u32 = 5;

/// Space between the face edge and its content.
const CONTENT_INSET: i32 = 8;

/// Space between the icon and the label.
const ICON_GAP: i32 = 5;

/// A callback run on the loop thread in response to a gesture.
pub type Action = Box<dyn FnMut(&mut TouchCx<'_>)>;

/// Face and label colors for one control state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ButtonColors {
    /// Fill of the rounded face.
    pub face: Rgba8,
    /// Label text and icon tint.
    pub label: Rgba8,
}

impl ButtonColors {
    /// Off-white face, black label.
    pub const NORMAL: Self = Self {
        face: Rgba8::opaque(0xFF, 0xFE, 0xFC),
        label: Rgba8::BLACK,
    };
    /// Blue face, white label.
    pub const HIGHLIGHTED: Self = Self {
        face: Rgba8::opaque(0x66, 0x99, 0xCC),
        label: Rgba8::WHITE,
    };
    /// Translucent grey face, grey label.
    pub const DISABLED: Self = Self {
        face: Rgba8::from_straight(0xBB, 0xBB, 0xBB, 0xDD),
        label: Rgba8::gray(0x77),
    };

    /// The scheme for `state`. Disabled wins over highlighted.
    #[must_use]
    pub const fn for_state(state: ControlState) -> Self {
        if state.disabled {
            Self::DISABLED
        } else if state.highlighted {
            Self::HIGHLIGHTED
        } else {
            Self::NORMAL
        }
    }
}

/// A rounded push button with a centered label and an optional icon.
///
/// The button highlights while the touch is inside it. It taps when the
/// touch ends inside it, provided the touch never wandered further than the
/// long-press radius from where it started and no long press fired.
pub struct Button {
    label: String,
    font: FontId,
    icon: Option<PixelBuffer>,
    state: ControlState,
    on_tap: Option<Action>,
    on_long_press: Option<Action>,
    slop: i32,
    origin: IntPoint,
    tap_pending: bool,
}

impl fmt::Debug for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Button")
            .field("label", &self.label)
            .field("font", &self.font)
            .field("state", &self.state)
            .field("has_icon", &self.icon.is_some())
            .field("has_on_tap", &self.on_tap.is_some())
            .field("has_on_long_press", &self.on_long_press.is_some())
            .finish_non_exhaustive()
    }
}

impl Button {
    /// Creates an enabled button with a text label.
    pub fn new(label: impl Into<String>, font: FontId) -> Self {
        Self {
            label: label.into(),
            font,
            icon: None,
            state: ControlState::NORMAL,
            on_tap: None,
            on_long_press: None,
            slop: GestureConfig::DEFAULT.long_press_radius,
            origin: IntPoint::ZERO,
            tap_pending: false,
        }
    }

    /// Sets the icon drawn above the label, tinted with the label color.
    #[must_use]
    pub fn with_icon(mut self, icon: PixelBuffer) -> Self {
        self.icon = Some(icon);
        self
    }

    /// Sets the tap action.
    #[must_use]
    pub fn on_tap(mut self, action: impl FnMut(&mut TouchCx<'_>) + 'static) -> Self {
        self.on_tap = Some(Box::new(action));
        self
    }

    /// Sets the long-press action. Buttons without one never arm the
    /// long-press timer.
    #[must_use]
    pub fn on_long_press(mut self, action: impl FnMut(&mut TouchCx<'_>) + 'static) -> Self {
        self.on_long_press = Some(Box::new(action));
        self
    }

    /// Sets how far a touch may move before it no longer counts as a tap.
    #[must_use]
    pub fn with_slop(mut self, radius: i32) -> Self {
        self.slop = radius;
        self
    }

    /// Creates a layer for this button inside `parent`.
    pub fn attach(self, tree: &mut LayerTree, parent: LayerId, frame: IntRect) -> LayerId {
        let id = tree.create_layer();
        tree.set_frame(id, frame);
        tree.set_corner_radius(id, BUTTON_RADIUS);
        tree.set_delegate(id, Box::new(self));
        tree.add_child(parent, id);
        id
    }

    /// The label text.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Replaces the label text.
    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    /// The current control state.
    #[must_use]
    pub fn state(&self) -> ControlState {
        self.state
    }

    /// Enables or disables the button. Disabling drops any highlight.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.state.disabled = disabled;
        if disabled {
            self.state.highlighted = false;
            self.tap_pending = false;
        }
    }

    /// Changes the highlight, returning whether the state changed.
    /// Disabled buttons never highlight.
    fn set_highlighted(&mut self, highlighted: bool) -> bool {
        let highlighted = highlighted && !self.state.disabled;
        let changed = self.state.highlighted != highlighted;
        self.state.highlighted = highlighted;
        changed
    }

    fn track(&mut self, cx: &mut TouchCx<'_>, event: &TouchEvent) {
        if self.set_highlighted(event.is_in(&cx.bounds())) {
            cx.invalidate();
        }
    }
}

impl LayerDelegate for Button {
    fn draw(&mut self, cx: &mut DrawCx<'_, '_>) {
        let colors = ButtonColors::for_state(self.state);
        let bounds = cx.bounds();
        cx.fill(bounds, colors.face, BUTTON_RADIUS);

        let mut layout = bounds.inset(CONTENT_INSET);
        if let Some(icon) = &self.icon {
            let size = icon.size();
            let at = layout
                .slice(size.height, ICON_GAP, Edge::Top)
                .aligned(size, Gravity::Center)
                .origin();
            if colors == ButtonColors::NORMAL {
                cx.view().draw_buffer(icon, at, BlendMode::Over);
            } else {
                cx.view().draw_tinted(icon, at, colors.label);
            }
        }

        let Some(size) = cx.fonts().measure(self.font, &self.label, layout.size()) else {
            return;
        };
        let rect = layout.aligned(size, Gravity::Center);
        cx.draw_text(self.font, &self.label, rect, colors.label);
    }

    fn is_interactive(&self) -> bool {
        true
    }

    fn wants_long_press(&self) -> bool {
        self.on_long_press.is_some() && !self.state.disabled
    }

    fn start_touch(&mut self, cx: &mut TouchCx<'_>, event: &TouchEvent) {
        self.origin = event.point;
        self.tap_pending = !self.state.disabled;
        self.track(cx, event);
    }

    fn update_touch(&mut self, cx: &mut TouchCx<'_>, event: &TouchEvent) {
        if !event.in_radius(self.origin, self.slop) {
            self.tap_pending = false;
        }
        self.track(cx, event);
    }

    fn end_touch(&mut self, cx: &mut TouchCx<'_>, event: &TouchEvent) {
        let tap = self.tap_pending && !self.state.disabled && event.is_in(&cx.bounds());
        self.tap_pending = false;
        if self.set_highlighted(false) {
            cx.invalidate();
        }
        if tap && let Some(action) = &mut self.on_tap {
            action(cx);
        }
    }

    fn cancel_touch(&mut self, cx: &mut TouchCx<'_>) {
        self.tap_pending = false;
        if self.set_highlighted(false) {
            cx.invalidate();
        }
    }

    fn long_press(&mut self, cx: &mut TouchCx<'_>) {
        self.tap_pending = false;
        if self.state.disabled {
            return;
        }
        if let Some(action) = &mut self.on_long_press {
            action(cx);
        }
    }
}
