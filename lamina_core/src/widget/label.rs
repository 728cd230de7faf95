// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::boxed::Box;
use alloc::string::String;

use crate::color::Rgba8;
use crate::geometry::{Gravity, IntRect};
use crate::layer::{DrawCx, LayerDelegate, LayerId, LayerTree};
use crate::text::FontId;

/// A single line of text placed inside the layer by a [`Gravity`].
///
/// The layer's background, if any, is drawn underneath.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextLabel {
    text: String,
    font: FontId,
    color: Rgba8,
    gravity: Gravity,
}

impl TextLabel {
    /// Black, left-aligned text.
    pub fn new(text: impl Into<String>, font: FontId) -> Self {
        Self {
            text: text.into(),
            font,
            color: Rgba8::BLACK,
            gravity: Gravity::Left,
        }
    }

    /// Sets the text color.
    #[must_use]
    pub fn with_color(mut self, color: Rgba8) -> Self {
        self.color = color;
        self
    }

    /// Sets where the text sits inside the layer.
    #[must_use]
    pub fn with_gravity(mut self, gravity: Gravity) -> Self {
        self.gravity = gravity;
        self
    }

    /// Creates a layer for this label inside `parent`.
    pub fn attach(self, tree: &mut LayerTree, parent: LayerId, frame: IntRect) -> LayerId {
        let id = tree.create_layer();
        tree.set_frame(id, frame);
        tree.set_delegate(id, Box::new(self));
        tree.add_child(parent, id);
        id
    }

    /// The displayed text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replaces the displayed text.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Changes the text color.
    pub fn set_color(&mut self, color: Rgba8) {
        self.color = color;
    }

    /// Changes where the text sits.
    pub fn set_gravity(&mut self, gravity: Gravity) {
        self.gravity = gravity;
    }
}

impl LayerDelegate for TextLabel {
    fn draw(&mut self, cx: &mut DrawCx<'_, '_>) {
        cx.draw_background();
        let bounds = cx.bounds();
        let Some(size) = cx.fonts().measure(self.font, &self.text, bounds.size()) else {
            return;
        };
        let rect = bounds.aligned(size, self.gravity);
        cx.draw_text(self.font, &self.text, rect, self.color);
    }
}
