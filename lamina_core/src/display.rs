// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The display sink.
//!
//! A [`Display`] owns a 16-bit framebuffer device and copies damaged
//! rectangles of the composited screen buffer into it, converting each pixel
//! to [`Rgb565`]. The device itself is abstracted as "write bytes at an
//! offset" ([`FramebufferDevice`]); mapping real hardware is the backend's
//! job.

use alloc::vec::Vec;
use core::fmt;

use crate::buffer::PixelBuffer;
use crate::color::Rgb565;
use crate::geometry::{IntRect, IntSize};

/// Bytes per device pixel.
pub const BYTES_PER_PIXEL: usize = 2;

/// Whole-display rotation, applied once when the display is opened.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Rotation {
    /// Natural orientation.
    #[default]
    R0,
    /// Rotated a quarter turn clockwise.
    R90,
    /// Upside down.
    R180,
    /// Rotated a quarter turn counter-clockwise.
    R270,
}

impl Rotation {
    /// Parses an angle in degrees; only right angles are accepted.
    #[must_use]
    pub const fn from_degrees(degrees: u32) -> Option<Self> {
        match degrees % 360 {
            0 => Some(Self::R0),
            90 => Some(Self::R90),
            180 => Some(Self::R180),
            270 => Some(Self::R270),
            _ => None,
        }
    }

    /// The angle in degrees.
    #[must_use]
    pub const fn degrees(self) -> u32 {
        match self {
            Self::R0 => 0,
            Self::R90 => 90,
            Self::R180 => 180,
            Self::R270 => 270,
        }
    }

    /// Whether width and height trade places.
    #[must_use]
    pub const fn swaps_axes(self) -> bool {
        matches!(self, Self::R90 | Self::R270)
    }
}

/// A byte-addressed 16-bit framebuffer.
pub trait FramebufferDevice {
    /// Error reported by writes.
    type Error;

    /// Size of the device in bytes.
    fn len(&self) -> usize;

    /// Returns `true` if the device has no bytes.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Writes `bytes` starting at byte `offset`.
    fn write_at(&mut self, offset: usize, bytes: &[u8]) -> Result<(), Self::Error>;

    /// Writes `len` zero bytes starting at byte `offset`.
    fn zero(&mut self, offset: usize, len: usize) -> Result<(), Self::Error> {
        const CHUNK: [u8; 256] = [0; 256];
        let mut done = 0;
        while done < len {
            let n = (len - done).min(CHUNK.len());
            self.write_at(offset + done, &CHUNK[..n])?;
            done += n;
        }
        Ok(())
    }
}

/// Errors reported by a [`Display`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DisplayError<E> {
    /// The device rejected a write.
    Device(E),
    /// The device cannot hold a full screen.
    DeviceTooSmall {
        /// Bytes a full screen needs.
        needed: usize,
        /// Bytes the device has.
        available: usize,
    },
    /// A source buffer is not the size of the screen.
    SizeMismatch {
        /// Screen size.
        expected: IntSize,
        /// Buffer size.
        actual: IntSize,
    },
}

impl<E: fmt::Display> fmt::Display for DisplayError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Device(err) => write!(f, "framebuffer write failed: {err}"),
            Self::DeviceTooSmall { needed, available } => write!(
                f,
                "framebuffer holds {available} bytes but the screen needs {needed}"
            ),
            Self::SizeMismatch { expected, actual } => write!(
                f,
                "size mismatch: expected {}x{}, got {}x{}",
                expected.width, expected.height, actual.width, actual.height
            ),
        }
    }
}

impl<E: fmt::Debug + fmt::Display> core::error::Error for DisplayError<E> {}

/// A framebuffer-backed screen.
pub struct Display<D> {
    device: D,
    size: IntSize,
    rotation: Rotation,
    row: Vec<u8>,
}

impl<D> fmt::Debug for Display<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Display")
            .field("size", &self.size)
            .field("rotation", &self.rotation)
            .finish_non_exhaustive()
    }
}

impl<D: FramebufferDevice> Display<D> {
    /// Opens a display of the panel's natural `width × height`.
    ///
    /// A rotation that swaps axes swaps the screen dimensions too. Fails if
    /// the device is too small to hold a full screen.
    pub fn open(
        width: i32,
        height: i32,
        rotation: Rotation,
        device: D,
    ) -> Result<Self, DisplayError<D::Error>> {
        let natural = IntSize::new(width.max(0), height.max(0));
        let size = if rotation.swaps_axes() {
            natural.transposed()
        } else {
            natural
        };
        let needed = byte_len(size);
        if device.len() < needed {
            return Err(DisplayError::DeviceTooSmall {
                needed,
                available: device.len(),
            });
        }
        Ok(Self {
            device,
            size,
            rotation,
            row: Vec::new(),
        })
    }

    /// The screen size in pixels, after rotation.
    #[must_use]
    pub fn size(&self) -> IntSize {
        self.size
    }

    /// The screen rectangle.
    #[must_use]
    pub fn bounds(&self) -> IntRect {
        IntRect::from_size(self.size)
    }

    /// The rotation the display was opened with.
    #[must_use]
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// The underlying device.
    #[must_use]
    pub fn device(&self) -> &D {
        &self.device
    }

    /// Converts the pixels of `source` inside `dirty` to 5-6-5 and writes
    /// them to the device, one row at a time.
    ///
    /// `dirty` is clipped to the screen. `source` must be exactly the screen
    /// size.
    pub fn write_rows(
        &mut self,
        dirty: IntRect,
        source: &PixelBuffer,
    ) -> Result<(), DisplayError<D::Error>> {
        if source.size() != self.size {
            return Err(DisplayError::SizeMismatch {
                expected: self.size,
                actual: source.size(),
            });
        }
        let rect = dirty.intersect(&self.bounds());
        if rect.is_empty() {
            return Ok(());
        }
        let stride = row_bytes(self.size);
        let x_offset = px(rect.x0) * BYTES_PER_PIXEL;
        for y in rect.y0..rect.y1 {
            let Some(src) = source.row_span(y, rect.x0, rect.x1) else {
                continue;
            };
            self.row.clear();
            self.row.extend(
                src.chunks_exact(4)
                    .flat_map(|p| Rgb565::from_rgb(p[0], p[1], p[2]).to_bytes()),
            );
            self.device
                .write_at(px(y) * stride + x_offset, &self.row)
                .map_err(DisplayError::Device)?;
        }
        Ok(())
    }

    /// Zero-fills the whole framebuffer.
    pub fn clear(&mut self) -> Result<(), DisplayError<D::Error>> {
        self.device
            .zero(0, byte_len(self.size))
            .map_err(DisplayError::Device)
    }

    /// Clears the screen and hands the device back for release.
    pub fn close(mut self) -> Result<D, DisplayError<D::Error>> {
        self.clear()?;
        Ok(self.device)
    }
}

fn px(v: i32) -> usize {
    usize::try_from(v).unwrap_or(0)
}

fn row_bytes(size: IntSize) -> usize {
    px(size.width) * BYTES_PER_PIXEL
}

fn byte_len(size: IntSize) -> usize {
    row_bytes(size) * px(size.height)
}

/// A write landed outside a [`MemoryFramebuffer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OutOfRange {
    /// First byte of the rejected write.
    pub offset: usize,
    /// Length of the rejected write.
    pub len: usize,
}

impl fmt::Display for OutOfRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "write of {} bytes at offset {} is out of range",
            self.len, self.offset
        )
    }
}

impl core::error::Error for OutOfRange {}

/// A framebuffer held in memory.
///
/// Useful for tests and for hosts that present the screen some other way.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryFramebuffer {
    bytes: Vec<u8>,
    writes: usize,
}

impl MemoryFramebuffer {
    /// Creates a zeroed framebuffer of `len` bytes.
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            bytes: alloc::vec![0; len],
            writes: 0,
        }
    }

    /// Creates a zeroed framebuffer large enough for `size` pixels.
    #[must_use]
    pub fn for_size(size: IntSize) -> Self {
        Self::new(byte_len(size))
    }

    /// The raw contents.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of successful writes so far.
    #[must_use]
    pub fn writes(&self) -> usize {
        self.writes
    }

    /// Reads the pixel at byte `offset`.
    #[must_use]
    pub fn pixel_at(&self, offset: usize) -> Option<Rgb565> {
        let b = self.bytes.get(offset..offset + BYTES_PER_PIXEL)?;
        Some(Rgb565([b[0], b[1]]))
    }
}

impl FramebufferDevice for MemoryFramebuffer {
    type Error = OutOfRange;

    fn len(&self) -> usize {
        self.bytes.len()
    }

    fn write_at(&mut self, offset: usize, bytes: &[u8]) -> Result<(), OutOfRange> {
        let err = OutOfRange {
            offset,
            len: bytes.len(),
        };
        let end = offset.checked_add(bytes.len()).ok_or(err)?;
        self.bytes
            .get_mut(offset..end)
            .ok_or(err)?
            .copy_from_slice(bytes);
        self.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba8;

    fn screen(w: i32, h: i32) -> Display<MemoryFramebuffer> {
        let size = IntSize::new(w, h);
        Display::open(w, h, Rotation::R0, MemoryFramebuffer::for_size(size)).expect("fits")
    }

    #[test]
    fn rotation_parses_right_angles() {
        assert_eq!(Rotation::from_degrees(450), Some(Rotation::R90), "wraps");
        assert_eq!(Rotation::from_degrees(45), None, "not a right angle");
        assert!(Rotation::R270.swaps_axes(), "quarter turn");
        assert!(!Rotation::R180.swaps_axes(), "half turn");
    }

    #[test]
    fn rotation_swaps_dimensions() {
        let fb = MemoryFramebuffer::for_size(IntSize::new(320, 480));
        let display = Display::open(320, 480, Rotation::R90, fb).expect("fits");
        assert_eq!(display.size(), IntSize::new(480, 320), "landscape");
    }

    #[test]
    fn small_device_is_rejected() {
        let result = Display::open(10, 10, Rotation::R0, MemoryFramebuffer::new(100));
        assert!(
            matches!(
                result,
                Err(DisplayError::DeviceTooSmall {
                    needed: 200,
                    available: 100
                })
            ),
            "needs 200 bytes"
        );
    }

    #[test]
    fn only_dirty_rows_are_written() {
        let mut display = screen(4, 4);
        let mut buf = PixelBuffer::new(IntSize::new(4, 4));
        buf.reset(Rgba8::opaque(0xFF, 0, 0));
        display
            .write_rows(IntRect::new(1, 1, 3, 2), &buf)
            .expect("in range");

        let fb = display.device();
        assert_eq!(fb.writes(), 1, "one row");
        assert_eq!(fb.pixel_at(0), Some(Rgb565([0, 0])), "outside untouched");
        let red = Rgb565::from_rgb(0xFF, 0, 0);
        assert_eq!(fb.pixel_at(2 * (4 + 1)), Some(red), "x=1, y=1");
        assert_eq!(fb.pixel_at(2 * (4 + 2)), Some(red), "x=2, y=1");
        assert_eq!(fb.pixel_at(2 * (4 + 3)), Some(Rgb565([0, 0])), "x=3 clean");
    }

    #[test]
    fn dirty_rect_is_clipped_to_screen() {
        let mut display = screen(2, 2);
        let mut buf = PixelBuffer::new(IntSize::new(2, 2));
        buf.reset(Rgba8::WHITE);
        display
            .write_rows(IntRect::new(-5, -5, 50, 50), &buf)
            .expect("clipped");
        assert!(display.device().bytes().iter().all(|&b| b == 0xFF), "full white");
    }

    #[test]
    fn wrong_source_size_is_an_error() {
        let mut display = screen(2, 2);
        let buf = PixelBuffer::new(IntSize::new(3, 2));
        assert!(
            matches!(
                display.write_rows(IntRect::new(0, 0, 2, 2), &buf),
                Err(DisplayError::SizeMismatch { .. })
            ),
            "mismatched buffer"
        );
    }

    #[test]
    fn close_clears_the_device() {
        let mut display = screen(300, 2);
        let mut buf = PixelBuffer::new(IntSize::new(300, 2));
        buf.reset(Rgba8::WHITE);
        display
            .write_rows(IntRect::new(0, 0, 300, 2), &buf)
            .expect("in range");
        let fb = display.close().expect("cleared");
        assert!(fb.bytes().iter().all(|&b| b == 0), "zeroed across chunks");
    }

    #[test]
    fn memory_framebuffer_rejects_overflow() {
        let mut fb = MemoryFramebuffer::new(4);
        assert_eq!(
            fb.write_at(3, &[1, 2]),
            Err(OutOfRange { offset: 3, len: 2 }),
            "past the end"
        );
        assert!(fb.write_at(usize::MAX, &[1]).is_err(), "overflowing offset");
    }
}
