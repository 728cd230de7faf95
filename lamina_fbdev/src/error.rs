// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Errors raised while opening the devices. All are fatal at startup.
#[derive(Debug)]
pub enum OpenError {
    /// The framebuffer device could not be opened.
    Framebuffer {
        /// The device path.
        path: PathBuf,
        /// The underlying error.
        source: io::Error,
    },
    /// The framebuffer is smaller than one screen.
    FramebufferTooSmall {
        /// Bytes one screen needs.
        needed: usize,
        /// Bytes the device holds.
        available: usize,
    },
    /// The touch input device could not be opened.
    Input {
        /// The device path.
        path: PathBuf,
        /// The underlying error.
        source: io::Error,
    },
    /// The rotation is not a multiple of 90 degrees below 360.
    InvalidRotation(u32),
}

impl fmt::Display for OpenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Framebuffer { path, source } => {
                write!(f, "cannot open framebuffer {}: {source}", path.display())
            }
            Self::FramebufferTooSmall { needed, available } => write!(
                f,
                "framebuffer holds {available} bytes, one screen needs {needed}"
            ),
            Self::Input { path, source } => {
                write!(f, "cannot open input device {}: {source}", path.display())
            }
            Self::InvalidRotation(degrees) => {
                write!(f, "unsupported rotation of {degrees} degrees")
            }
        }
    }
}

impl core::error::Error for OpenError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Framebuffer { source, .. } | Self::Input { source, .. } => Some(source),
            Self::FramebufferTooSmall { .. } | Self::InvalidRotation(_) => None,
        }
    }
}

/// A task was posted to a run loop that has stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PostError;

impl fmt::Display for PostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("run loop has stopped")
    }
}

impl core::error::Error for PostError {}
