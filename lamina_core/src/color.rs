// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pixel colors and the 16-bit framebuffer codec.
//!
//! Compositing happens in 8-bit RGBA with **premultiplied** alpha
//! ([`Rgba8`]). Framebuffers take packed 5-6-5 pixels ([`Rgb565`]); alpha is
//! dropped on conversion, which for premultiplied colors is the same as
//! flattening over black.

/// A premultiplied 8-bit RGBA color.
///
/// Each color channel must be less than or equal to `a`. Use
/// [`from_straight`](Self::from_straight) to convert from non-premultiplied
/// values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgba8 {
    /// Red, premultiplied.
    pub r: u8,
    /// Green, premultiplied.
    pub g: u8,
    /// Blue, premultiplied.
    pub b: u8,
    /// Alpha.
    pub a: u8,
}

impl Rgba8 {
    /// Fully transparent.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    /// Opaque black.
    pub const BLACK: Self = Self::new(0, 0, 0, 0xFF);
    /// Opaque white.
    pub const WHITE: Self = Self::new(0xFF, 0xFF, 0xFF, 0xFF);

    /// Creates a color from premultiplied components.
    #[inline]
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Creates an opaque color.
    #[inline]
    #[must_use]
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 0xFF)
    }

    /// Creates an opaque gray.
    #[inline]
    #[must_use]
    pub const fn gray(v: u8) -> Self {
        Self::new(v, v, v, 0xFF)
    }

    /// Creates a color from straight (non-premultiplied) components.
    #[must_use]
    pub const fn from_straight(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: mul_div_255(r, a),
            g: mul_div_255(g, a),
            b: mul_div_255(b, a),
            a,
        }
    }

    /// Returns the straight (non-premultiplied) components.
    #[must_use]
    pub fn to_straight(self) -> [u8; 4] {
        if self.a == 0 {
            return [0; 4];
        }
        let a = u32::from(self.a);
        let un = |c: u8| -> u8 {
            let v = (u32::from(c) * 255 + a / 2) / a;
            u8::try_from(v.min(255)).unwrap_or(u8::MAX)
        };
        [un(self.r), un(self.g), un(self.b), self.a]
    }

    /// Returns `true` if the color fully covers what is beneath it.
    #[inline]
    #[must_use]
    pub const fn is_opaque(self) -> bool {
        self.a == 0xFF
    }

    /// Returns `[r, g, b, a]`, the in-memory pixel layout.
    #[inline]
    #[must_use]
    pub const fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Builds a color from an in-memory pixel.
    #[inline]
    #[must_use]
    pub const fn from_bytes(px: [u8; 4]) -> Self {
        Self::new(px[0], px[1], px[2], px[3])
    }

    /// Scales all four channels by `coverage / 255`.
    #[must_use]
    pub const fn scaled(self, coverage: u8) -> Self {
        Self {
            r: mul_div_255(self.r, coverage),
            g: mul_div_255(self.g, coverage),
            b: mul_div_255(self.b, coverage),
            a: mul_div_255(self.a, coverage),
        }
    }
}

/// `round(a * b / 255)` without division.
#[inline]
#[expect(
    clippy::cast_possible_truncation,
    reason = "the rounded product of two bytes divided by 255 fits in a byte"
)]
const fn mul_div_255(a: u8, b: u8) -> u8 {
    let t = a as u32 * b as u32 + 128;
    ((t + (t >> 8)) >> 8) as u8
}

/// How source pixels are combined with the destination.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BlendMode {
    /// Source pixels replace destination pixels.
    Replace,
    /// Premultiplied source-over.
    #[default]
    Over,
}

impl BlendMode {
    /// `Replace` for opaque colors, `Over` otherwise.
    #[inline]
    #[must_use]
    pub const fn for_color(color: Rgba8) -> Self {
        if color.is_opaque() {
            Self::Replace
        } else {
            Self::Over
        }
    }
}

/// A packed 16-bit framebuffer pixel in the device's byte order.
///
/// Bits are `RRRRRGGG GGGBBBBB` stored little-endian, so the first byte
/// carries the low three green bits and blue.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgb565(pub [u8; 2]);

impl Rgb565 {
    /// Packs 8-bit channels, discarding low bits.
    #[inline]
    #[must_use]
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self([((g >> 2) & 0b111) << 5 | b >> 3, (r & 0xF8) | g >> 5])
    }

    /// Packs a composited color, ignoring alpha.
    #[inline]
    #[must_use]
    pub const fn encode(color: Rgba8) -> Self {
        Self::from_rgb(color.r, color.g, color.b)
    }

    /// Returns the two device bytes.
    #[inline]
    #[must_use]
    pub const fn to_bytes(self) -> [u8; 2] {
        self.0
    }

    /// Expands back to opaque 8-bit channels, replicating high bits into the
    /// low bits so that full-scale values stay full-scale.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "each field is masked to at most six bits before the cast"
    )]
    pub const fn decode(self) -> Rgba8 {
        let v = u16::from_le_bytes(self.0);
        let r5 = (v >> 11) as u8;
        let g6 = ((v >> 5) & 0x3F) as u8;
        let b5 = (v & 0x1F) as u8;
        Rgba8::opaque(r5 << 3 | r5 >> 2, g6 << 2 | g6 >> 4, b5 << 3 | b5 >> 2)
    }
}
