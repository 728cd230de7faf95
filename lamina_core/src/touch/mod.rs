// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Touch input.
//!
//! Raw digitizer samples become [`TouchEvent`]s in the input backend, are
//! mapped to screen space by a [`TouchscreenCalibration`], and are routed
//! through the layer tree by a [`Dispatcher`]:
//!
//! ```text
//!   raw sample ──► TouchscreenCalibration::adjust ──► Dispatcher::handle
//!                                                          │
//!                         hit_test on press ◄──────────────┤
//!                                                          ▼
//!              LayerDelegate::{start,update,end,cancel}_touch, long_press
//! ```
//!
//! Long presses are timed outside the core crate through the
//! [`LongPressTimer`] trait; the dispatcher only arms and cancels tokens.

mod calibration;
mod dispatch;
mod event;

pub use calibration::TouchscreenCalibration;
pub use dispatch::{Dispatcher, GestureConfig, LongPressTimer, LongPressToken, ManualTimer};
pub use event::TouchEvent;
