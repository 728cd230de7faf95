// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::boxed::Box;

use crate::buffer::PixelBuffer;
use crate::color::{BlendMode, Rgba8};
use crate::corner::CornerMask;
use crate::geometry::{Gravity, IntRect};
use crate::layer::{DrawCx, LayerDelegate, LayerId, LayerTree};

/// A decoded image placed inside the layer by a [`Gravity`].
///
/// A tinted image is drawn as a stencil: only its alpha is used, filled with
/// the tint color. An untinted image may have its own corners rounded.
#[derive(Clone, Debug)]
pub struct ImageView {
    image: PixelBuffer,
    gravity: Gravity,
    tint: Option<Rgba8>,
    image_radius: u32,
}

impl ImageView {
    /// Centers `image` without tint or rounding.
    #[must_use]
    pub fn new(image: PixelBuffer) -> Self {
        Self {
            image,
            gravity: Gravity::Center,
            tint: None,
            image_radius: 0,
        }
    }

    /// Sets where the image sits inside the layer.
    #[must_use]
    pub fn with_gravity(mut self, gravity: Gravity) -> Self {
        self.gravity = gravity;
        self
    }

    /// Draws the image's alpha channel in `tint`.
    #[must_use]
    pub fn with_tint(mut self, tint: Rgba8) -> Self {
        self.tint = Some(tint);
        self
    }

    /// Rounds the image's own corners.
    #[must_use]
    pub fn with_image_radius(mut self, radius: u32) -> Self {
        self.image_radius = radius;
        self
    }

    /// Creates a layer for this image inside `parent`.
    pub fn attach(self, tree: &mut LayerTree, parent: LayerId, frame: IntRect) -> LayerId {
        let id = tree.create_layer();
        tree.set_frame(id, frame);
        tree.set_delegate(id, Box::new(self));
        tree.add_child(parent, id);
        id
    }

    /// The displayed image.
    #[must_use]
    pub fn image(&self) -> &PixelBuffer {
        &self.image
    }

    /// Replaces the displayed image.
    pub fn set_image(&mut self, image: PixelBuffer) {
        self.image = image;
    }

    /// Changes or removes the tint.
    pub fn set_tint(&mut self, tint: Option<Rgba8>) {
        self.tint = tint;
    }
}

impl LayerDelegate for ImageView {
    fn draw(&mut self, cx: &mut DrawCx<'_, '_>) {
        cx.draw_background();
        let rect = cx.bounds().aligned(self.image.size(), self.gravity);
        let at = rect.origin();
        if let Some(tint) = self.tint {
            cx.view().draw_tinted(&self.image, at, tint);
            return;
        }
        match CornerMask::new(rect, self.image_radius).alpha_image(0xFF) {
            Some(mask) => cx.view().draw_buffer_masked(&self.image, at, &mask),
            None => cx.view().draw_buffer(&self.image, at, BlendMode::Over),
        }
    }
}
