// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Linux framebuffer backend for lamina.
//!
//! This crate drives a [`Window`](lamina_core::window::Window) on real
//! hardware:
//!
//! - [`FileFramebuffer`]: an RGB565 framebuffer device (`/dev/fbN`)
//! - evdev touch decoding on a reader thread
//! - long-press timers on a timer thread
//! - [`RunLoop`]: the single thread that owns the window, fed through a
//!   bounded queue
//!
//! ```no_run
//! use lamina_core::text::FontBook;
//! use lamina_fbdev::{DeviceConfig, RunLoop, RunLoopConfig, open_input, open_window};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = DeviceConfig::pitft_35();
//! let window = open_window(&config, FontBook::new())?;
//! let run_loop = RunLoop::new(window, RunLoopConfig::DEFAULT)?;
//! if let Some(input) = open_input(&config)? {
//!     run_loop.spawn_input(input)?;
//! }
//! run_loop.run()?;
//! # Ok(())
//! # }
//! ```
//!
//! Logging goes through the [`log`] facade; install any logger to see
//! per-update timings at `debug` level.

mod config;
mod error;
mod framebuffer;
mod input;
mod run_loop;
mod timer;

pub use config::{DeviceConfig, RunLoopConfig};
pub use error::{OpenError, PostError};
pub use framebuffer::{FileFramebuffer, open_input, open_window};
pub use input::{InputRecord, InputStats, RECORD_SIZE, TouchDecoder};
pub use run_loop::{RunLoop, RunLoopHandle, Task};
pub use timer::ThreadTimer;
