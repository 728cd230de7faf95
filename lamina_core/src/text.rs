// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text rendering seam.
//!
//! Glyph rasterization lives outside this crate. A [`TextRenderer`] measures
//! and draws strings; a [`FontBook`] owns the renderers an application uses
//! and is passed explicitly into rendering, so there is no global font cache.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use crate::buffer::BufferView;
use crate::color::Rgba8;
use crate::geometry::{IntRect, IntSize};

/// Index of a font in a [`FontBook`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FontId(pub u16);

/// Errors reported by text rendering.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextError {
    /// The font book has no font with this id.
    MissingFont(FontId),
    /// The renderer cannot draw this character.
    UnsupportedGlyph(char),
    /// The renderer failed for a reason of its own.
    Backend(&'static str),
}

impl fmt::Display for TextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingFont(id) => write!(f, "no font with id {}", id.0),
            Self::UnsupportedGlyph(c) => write!(f, "glyph {c:?} is not supported"),
            Self::Backend(msg) => write!(f, "text backend failed: {msg}"),
        }
    }
}

impl core::error::Error for TextError {}

/// Measures and draws single-line text.
pub trait TextRenderer {
    /// Returns the size `text` occupies, clamped to `max`.
    fn measure(&self, text: &str, max: IntSize) -> IntSize;

    /// Draws `text` with its top-left corner at `rect`'s origin, clipped to
    /// `rect`, compositing `color` over what is already in `view`.
    fn draw_into(
        &self,
        view: &mut BufferView<'_>,
        text: &str,
        rect: IntRect,
        color: Rgba8,
    ) -> Result<(), TextError>;
}

/// The fonts available to widgets.
#[derive(Default)]
pub struct FontBook {
    fonts: Vec<Box<dyn TextRenderer>>,
}

impl fmt::Debug for FontBook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontBook")
            .field("fonts", &self.fonts.len())
            .finish()
    }
}

impl FontBook {
    /// Creates an empty font book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a font and returns its id.
    ///
    /// # Panics
    ///
    /// Panics if more than `u16::MAX` fonts are added.
    pub fn add(&mut self, renderer: Box<dyn TextRenderer>) -> FontId {
        let idx = u16::try_from(self.fonts.len()).unwrap_or(u16::MAX);
        assert!(idx < u16::MAX, "too many fonts");
        self.fonts.push(renderer);
        FontId(idx)
    }

    /// Returns the renderer for `id`.
    #[must_use]
    pub fn get(&self, id: FontId) -> Option<&dyn TextRenderer> {
        self.fonts.get(usize::from(id.0)).map(|font| &**font)
    }

    /// Measures `text` in `font`, or `None` if the font is missing.
    #[must_use]
    pub fn measure(&self, font: FontId, text: &str, max: IntSize) -> Option<IntSize> {
        Some(self.get(font)?.measure(text, max))
    }

    /// Draws `text` in `font`.
    pub fn draw(
        &self,
        view: &mut BufferView<'_>,
        font: FontId,
        text: &str,
        rect: IntRect,
        color: Rgba8,
    ) -> Result<(), TextError> {
        self.get(font)
            .ok_or(TextError::MissingFont(font))?
            .draw_into(view, text, rect, color)
    }
}

/// A fixed-metrics renderer that draws every visible character as a solid
/// cell.
///
/// Useful for bring-up on a new panel and for tests that need predictable
/// text geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockFont {
    /// Horizontal advance per character.
    pub advance: i32,
    /// Line height.
    pub height: i32,
}

impl BlockFont {
    /// Creates a block font.
    #[must_use]
    pub const fn new(advance: i32, height: i32) -> Self {
        Self { advance, height }
    }

    fn cells(text: &str) -> i32 {
        i32::try_from(text.chars().count()).unwrap_or(i32::MAX)
    }
}

impl TextRenderer for BlockFont {
    fn measure(&self, text: &str, max: IntSize) -> IntSize {
        IntSize::new(
            Self::cells(text).saturating_mul(self.advance).min(max.width),
            self.height.min(max.height),
        )
    }

    fn draw_into(
        &self,
        view: &mut BufferView<'_>,
        text: &str,
        rect: IntRect,
        color: Rgba8,
    ) -> Result<(), TextError> {
        let mut x = rect.x0;
        for c in text.chars() {
            if c.is_control() {
                return Err(TextError::UnsupportedGlyph(c));
            }
            if !c.is_whitespace() {
                let cell = IntRect::new(x, rect.y0, x + self.advance - 1, rect.y0 + self.height);
                view.fill(cell.intersect(&rect), color, 0);
            }
            x = x.saturating_add(self.advance);
        }
        Ok(())
    }
}
