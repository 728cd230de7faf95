// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Device and run-loop configuration presets.

use std::path::PathBuf;
use std::time::Duration;

use lamina_core::corner::MAX_RADIUS;
use lamina_core::display::Rotation;
use lamina_core::touch::{GestureConfig, TouchscreenCalibration};

use crate::error::OpenError;

/// Which devices to open and how the panel is mounted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceConfig {
    /// The framebuffer device, e.g. `/dev/fb1`.
    pub framebuffer_path: PathBuf,
    /// The evdev touch device, or `None` to run without input.
    pub input_path: Option<PathBuf>,
    /// Panel width in its natural orientation.
    pub width: i32,
    /// Panel height in its natural orientation.
    pub height: i32,
    /// How the panel is mounted.
    pub rotation: Rotation,
    /// Digitizer calibration for the natural orientation. `None` passes raw
    /// samples through.
    pub calibration: Option<TouchscreenCalibration>,
    /// Radius of the panel's physical corners; `0` disables corner masking.
    pub screen_corner_radius: u32,
    /// Long-press timing.
    pub gesture: GestureConfig,
}

impl DeviceConfig {
    /// A 3.5" 320×480 resistive panel on `/dev/fb1` with its touch
    /// controller on `/dev/input/event0`.
    #[must_use]
    pub fn pitft_35() -> Self {
        Self {
            framebuffer_path: PathBuf::from("/dev/fb1"),
            input_path: Some(PathBuf::from("/dev/input/event0")),
            width: 320,
            height: 480,
            rotation: Rotation::R0,
            calibration: Some(TouchscreenCalibration::PITFT_35),
            screen_corner_radius: MAX_RADIUS,
            gesture: GestureConfig::DEFAULT,
        }
    }

    /// A square-cornered `width × height` surface on `/dev/fb0` with no
    /// touch input and no calibration.
    #[must_use]
    pub fn windowed(width: i32, height: i32) -> Self {
        Self {
            framebuffer_path: PathBuf::from("/dev/fb0"),
            input_path: None,
            width,
            height,
            rotation: Rotation::R0,
            calibration: None,
            screen_corner_radius: 0,
            gesture: GestureConfig::DEFAULT,
        }
    }

    /// Sets the rotation from a clockwise angle in degrees.
    pub fn with_rotation_degrees(mut self, degrees: u32) -> Result<Self, OpenError> {
        self.rotation = Rotation::from_degrees(degrees).ok_or(OpenError::InvalidRotation(degrees))?;
        Ok(self)
    }

    /// Bytes of RGB565 framebuffer one screen needs.
    #[must_use]
    pub fn framebuffer_len(&self) -> usize {
        let w = usize::try_from(self.width).unwrap_or(0);
        let h = usize::try_from(self.height).unwrap_or(0);
        w * h * lamina_core::display::BYTES_PER_PIXEL
    }
}

/// How the run loop drains its queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunLoopConfig {
    /// Capacity of the bounded event queue.
    pub queue_capacity: usize,
    /// Events handled before the loop stops to update the screen.
    pub max_events_per_turn: usize,
    /// How long a producer waits on a full queue before checking whether the
    /// loop is still running, when the event must not be dropped.
    pub transition_retry: Duration,
}

impl RunLoopConfig {
    /// 100 queued events, 32 per turn, 5 ms retry.
    pub const DEFAULT: Self = Self {
        queue_capacity: 100,
        max_events_per_turn: 32,
        transition_retry: Duration::from_millis(5),
    };
}

impl Default for RunLoopConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
