// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::display::Rotation;
use crate::geometry::IntSize;

use super::TouchEvent;

/// Maps raw digitizer samples to screen pixels and normalized pressure.
///
/// The raw fields hold the digitizer readings at the screen edges and at a
/// weak and a strong press, in the panel's natural orientation. A range may
/// run backwards (e.g. `top > bottom`) when the digitizer axis is inverted
/// relative to the screen.
///
/// Call [`orient`](Self::orient) and then [`prepare`](Self::prepare) once,
/// before the first [`adjust`](Self::adjust).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TouchscreenCalibration {
    /// Raw x at the left screen edge.
    pub left: i32,
    /// Raw y at the top screen edge.
    pub top: i32,
    /// Raw x at the right screen edge.
    pub right: i32,
    /// Raw y at the bottom screen edge.
    pub bottom: i32,
    /// Raw pressure reading of a light touch.
    pub weak: i32,
    /// Raw pressure reading of a firm touch. Resistive panels report lower
    /// readings for firmer presses.
    pub strong: i32,
    swap_axes: bool,
    prepared: bool,
    conv_w: i64,
    conv_h: i64,
    conv_z: i64,
}

impl TouchscreenCalibration {
    /// Creates a calibration from raw edge and pressure readings.
    ///
    /// Screen y grows from the `bottom` reading towards the `top` reading.
    #[must_use]
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32, weak: i32, strong: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
            weak,
            strong,
            swap_axes: false,
            prepared: false,
            conv_w: 0,
            conv_h: 0,
            conv_z: 0,
        }
    }

    /// The resistive panel of a 3.5" 320×480 display HAT.
    pub const PITFT_35: Self = Self::new(235, 3800, 3750, 80, 180, 80);

    /// Whether raw x and y trade places before mapping.
    #[must_use]
    pub fn swaps_axes(&self) -> bool {
        self.swap_axes
    }

    /// Adapts the raw ranges to a rotated display.
    ///
    /// A quarter turn swaps the axes; the ranges are then reflected so that
    /// screen coordinates still grow rightwards and downwards.
    pub fn orient(&mut self, rotation: Rotation) {
        let (x0, x1, y0, y1) = (self.left, self.right, self.bottom, self.top);
        let (x0, x1, y0, y1) = match rotation {
            Rotation::R0 => (x0, x1, y0, y1),
            Rotation::R90 => (y1, y0, x0, x1),
            Rotation::R180 => (x1, x0, y1, y0),
            Rotation::R270 => (y0, y1, x1, x0),
        };
        self.left = x0;
        self.right = x1;
        self.bottom = y0;
        self.top = y1;
        self.swap_axes = rotation.swaps_axes();
        self.prepared = false;
    }

    /// Derives the 16.16 fixed-point scale factors for a screen of `size`
    /// (already rotated).
    ///
    /// Pressure scales from the `strong` reading at 0 to the `weak` reading
    /// at 256, clamped to `0..=255`. A degenerate raw range maps every sample
    /// on that axis to 0.
    pub fn prepare(&mut self, size: IntSize) {
        self.conv_w = fixed_ratio(size.width, self.right - self.left);
        self.conv_h = fixed_ratio(size.height, self.top - self.bottom);
        self.conv_z = fixed_ratio(256, self.weak - self.strong);
        self.prepared = true;
    }

    /// Maps a raw sample to screen coordinates and `0..=255` pressure.
    pub fn adjust(&self, event: &mut TouchEvent) {
        debug_assert!(self.prepared, "calibration used before prepare");
        let (raw_x, raw_y) = if self.swap_axes {
            (event.point.y, event.point.x)
        } else {
            (event.point.x, event.point.y)
        };
        event.point.x = scale(raw_x, self.left, self.conv_w);
        event.point.y = scale(raw_y, self.bottom, self.conv_h);
        event.pressure = scale(event.pressure, self.strong, self.conv_z).clamp(0, 0xFF);
    }
}

fn fixed_ratio(screen: i32, raw_span: i32) -> i64 {
    (i64::from(screen) << 16)
        .checked_div(i64::from(raw_span))
        .unwrap_or(0)
}

fn scale(raw: i32, origin: i32, conv: i64) -> i32 {
    let v = ((i64::from(raw) - i64::from(origin)) * conv) >> 16;
    i32::try_from(v).unwrap_or(if v < 0 { i32::MIN } else { i32::MAX })
}
