// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The Linux framebuffer device and window setup.

use std::fs::{File, OpenOptions};
use std::io;
use std::os::unix::fs::FileExt;
use std::path::Path;

use lamina_core::display::{Display, DisplayError, FramebufferDevice};
use lamina_core::text::FontBook;
use lamina_core::touch::Dispatcher;
use lamina_core::window::Window;

use crate::config::DeviceConfig;
use crate::error::OpenError;

/// A framebuffer written with positioned writes on the device file.
///
/// Character devices report no length, so the caller states how many bytes
/// the device holds. A regular file (useful for capturing frames) is checked
/// against that length when opened.
#[derive(Debug)]
pub struct FileFramebuffer {
    file: File,
    len: usize,
}

impl FileFramebuffer {
    /// Opens `path` for writing, expecting it to hold `len` bytes.
    pub fn open(path: &Path, len: usize) -> Result<Self, OpenError> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|source| OpenError::Framebuffer {
                path: path.to_path_buf(),
                source,
            })?;
        let metadata = file.metadata().map_err(|source| OpenError::Framebuffer {
            path: path.to_path_buf(),
            source,
        })?;
        if metadata.is_file() {
            let available = usize::try_from(metadata.len()).unwrap_or(usize::MAX);
            if available < len {
                return Err(OpenError::FramebufferTooSmall {
                    needed: len,
                    available,
                });
            }
        }
        Ok(Self { file, len })
    }
}

impl FramebufferDevice for FileFramebuffer {
    type Error = io::Error;

    fn len(&self) -> usize {
        self.len
    }

    fn write_at(&mut self, offset: usize, bytes: &[u8]) -> Result<(), io::Error> {
        let end = offset.checked_add(bytes.len());
        if end.is_none_or(|end| end > self.len) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "write past the end of the framebuffer",
            ));
        }
        let offset = u64::try_from(offset).map_err(|_| io::ErrorKind::InvalidInput)?;
        self.file.write_all_at(bytes, offset)
    }
}

/// Opens the framebuffer named by `config` and builds a window on it, with
/// the configured corner radius, calibration and gesture timing applied.
pub fn open_window(
    config: &DeviceConfig,
    fonts: FontBook,
) -> Result<Window<FileFramebuffer>, OpenError> {
    let device = FileFramebuffer::open(&config.framebuffer_path, config.framebuffer_len())?;
    let display = Display::open(config.width, config.height, config.rotation, device)
        .map_err(|err| display_error(config, err))?;
    let mut window = Window::new(display, fonts);
    window.set_screen_corner_radius(config.screen_corner_radius);
    window.set_calibration(config.calibration);
    window.set_dispatcher(Dispatcher::new(config.gesture));
    Ok(window)
}

fn display_error(config: &DeviceConfig, err: DisplayError<io::Error>) -> OpenError {
    match err {
        DisplayError::DeviceTooSmall { needed, available } => {
            OpenError::FramebufferTooSmall { needed, available }
        }
        DisplayError::Device(source) => OpenError::Framebuffer {
            path: config.framebuffer_path.clone(),
            source,
        },
        other @ DisplayError::SizeMismatch { .. } => OpenError::Framebuffer {
            path: config.framebuffer_path.clone(),
            source: io::Error::other(other.to_string()),
        },
    }
}

/// Opens the touch device named by `config`, if any.
pub fn open_input(config: &DeviceConfig) -> Result<Option<File>, OpenError> {
    let Some(path) = &config.input_path else {
        return Ok(None);
    };
    File::open(path)
        .map(Some)
        .map_err(|source| OpenError::Input {
            path: path.clone(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicU32, Ordering};

    use lamina_core::color::Rgba8;
    use lamina_core::geometry::IntSize;

    use super::*;

    static NEXT: AtomicU32 = AtomicU32::new(0);

    /// A scratch file of `len` zero bytes, removed on drop.
    struct Scratch(PathBuf);

    impl Scratch {
        fn new(len: u64) -> Self {
            let name = format!(
                "lamina-fb-{}-{}",
                std::process::id(),
                NEXT.fetch_add(1, Ordering::Relaxed)
            );
            let path = std::env::temp_dir().join(name);
            let file = File::create(&path).expect("create scratch file");
            file.set_len(len).expect("size scratch file");
            Self(path)
        }
    }

    impl Drop for Scratch {
        fn drop(&mut self) {
            let _ = std::fs::remove_file(&self.0);
        }
    }

    #[test]
    fn short_file_is_rejected() {
        let scratch = Scratch::new(10);
        let err = FileFramebuffer::open(&scratch.0, 20);
        assert!(
            matches!(
                err,
                Err(OpenError::FramebufferTooSmall {
                    needed: 20,
                    available: 10
                })
            ),
            "too small"
        );
    }

    #[test]
    fn missing_device_names_the_path() {
        let path = std::env::temp_dir().join("lamina-no-such-fb");
        let err = FileFramebuffer::open(&path, 4);
        assert!(
            matches!(&err, Err(OpenError::Framebuffer { path: p, .. }) if *p == path),
            "open failure carries the path"
        );
    }

    #[test]
    fn writes_land_at_their_offset() {
        let scratch = Scratch::new(8);
        let mut fb = FileFramebuffer::open(&scratch.0, 8).expect("open");
        fb.write_at(2, &[0xAB, 0xCD]).expect("write");
        assert!(fb.write_at(7, &[1, 2]).is_err(), "past the end");
        drop(fb);
        let bytes = std::fs::read(&scratch.0).expect("read back");
        assert_eq!(bytes, [0, 0, 0xAB, 0xCD, 0, 0, 0, 0], "positioned write");
    }

    #[test]
    fn window_flushes_to_the_file() {
        let mut config = DeviceConfig::windowed(4, 2);
        let scratch = Scratch::new(16);
        config.framebuffer_path = scratch.0.clone();
        let mut window = open_window(&config, FontBook::new()).expect("open window");
        let root = window.root();
        window
            .tree_mut()
            .set_background(root, Some(Rgba8::WHITE));
        let stats = window.update().expect("flush");
        assert_eq!(stats.pixels, 8, "whole screen");
        assert_eq!(window.size(), IntSize::new(4, 2), "size");
        drop(window);
        let bytes = std::fs::read(&scratch.0).expect("read back");
        assert!(bytes.iter().all(|&b| b == 0xFF), "white is all ones in rgb565");
    }
}
