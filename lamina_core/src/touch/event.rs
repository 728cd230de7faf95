// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::geometry::{IntPoint, IntRect};

/// One touch sample.
///
/// Raw samples from a digitizer carry device units; after
/// [`TouchscreenCalibration::adjust`](super::TouchscreenCalibration::adjust)
/// the point is in screen pixels and the pressure in `0..=255`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TouchEvent {
    /// Location of the contact.
    pub point: IntPoint,
    /// Whether the surface is being touched.
    pub pressed: bool,
    /// Contact pressure.
    pub pressure: i32,
}

impl TouchEvent {
    /// Creates a sample.
    #[must_use]
    pub const fn new(point: IntPoint, pressed: bool, pressure: i32) -> Self {
        Self {
            point,
            pressed,
            pressure,
        }
    }

    /// Returns the same sample shifted by `(dx, dy)`.
    #[must_use]
    pub const fn translated(self, dx: i32, dy: i32) -> Self {
        Self {
            point: self.point.offset(dx, dy),
            ..self
        }
    }

    /// Returns `true` if the sample lies inside `rect`.
    #[must_use]
    pub const fn is_in(&self, rect: &IntRect) -> bool {
        rect.contains(self.point)
    }

    /// Returns `true` if the sample lies within `radius` pixels of `origin`.
    #[must_use]
    pub fn in_radius(&self, origin: IntPoint, radius: i32) -> bool {
        self.point.to_kurbo().distance(origin.to_kurbo()) <= f64::from(radius)
    }
}
