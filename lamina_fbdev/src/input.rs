// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Evdev touch input.
//!
//! The kernel delivers `struct input_event` records: a `timeval`, then
//! `type: u16`, `code: u16` and `value: i32`, all little-endian on the
//! targets this backend runs on. [`TouchDecoder`] accumulates axis and button
//! records and emits a [`TouchEvent`] on every sync record.
//!
//! [`RunLoop::spawn_input`](crate::RunLoop::spawn_input) runs the decoder on
//! its own thread and feeds the run loop. Motion samples are offered without
//! blocking and dropped when the queue is full; the next sample supersedes
//! them. Press and release transitions are retried until the loop takes them
//! or stops.

use std::io::{self, Read};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam::channel::{SendTimeoutError, Sender, TrySendError};
use lamina_core::touch::TouchEvent;
use log::{debug, info};

use crate::run_loop::LoopEvent;

/// Size of one `input_event` record with a 64-bit `timeval`.
pub const RECORD_SIZE: usize = 24;

const EV_SYN: u16 = 0x00;
const EV_KEY: u16 = 0x01;
const EV_ABS: u16 = 0x03;

const BTN_TOUCH: u16 = 0x14a;

const ABS_X: u16 = 0x00;
const ABS_Y: u16 = 0x01;
const ABS_PRESSURE: u16 = 0x18;

/// One raw evdev record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InputRecord {
    /// Seconds part of the kernel timestamp.
    pub seconds: i64,
    /// Microseconds part of the kernel timestamp.
    pub micros: i64,
    /// Event type (`EV_SYN`, `EV_KEY`, `EV_ABS`, ...).
    pub kind: u16,
    /// Event code within the type.
    pub code: u16,
    /// Event value.
    pub value: i32,
}

impl InputRecord {
    /// Decodes a record from its wire bytes.
    #[must_use]
    pub fn from_bytes(bytes: &[u8; RECORD_SIZE]) -> Self {
        let i64_at = |at: usize| {
            let mut b = [0_u8; 8];
            b.copy_from_slice(&bytes[at..at + 8]);
            i64::from_le_bytes(b)
        };
        Self {
            seconds: i64_at(0),
            micros: i64_at(8),
            kind: u16::from_le_bytes([bytes[16], bytes[17]]),
            code: u16::from_le_bytes([bytes[18], bytes[19]]),
            value: i32::from_le_bytes([bytes[20], bytes[21], bytes[22], bytes[23]]),
        }
    }

    /// Reads the next record. Returns `None` at a clean end of stream; a
    /// record cut short is an error.
    pub fn read_from(reader: &mut impl Read) -> io::Result<Option<Self>> {
        let mut bytes = [0_u8; RECORD_SIZE];
        let mut filled = 0;
        while filled < RECORD_SIZE {
            match reader.read(&mut bytes[filled..]) {
                Ok(0) if filled == 0 => return Ok(None),
                Ok(0) => return Err(io::ErrorKind::UnexpectedEof.into()),
                Ok(n) => filled += n,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(err) => return Err(err),
            }
        }
        Ok(Some(Self::from_bytes(&bytes)))
    }
}

/// Accumulates evdev records into touch samples.
#[derive(Clone, Copy, Debug, Default)]
pub struct TouchDecoder {
    current: TouchEvent,
}

impl TouchDecoder {
    /// Creates a decoder with the finger up at the origin.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one record, returning a sample when the record is a sync.
    ///
    /// Records with a zero timestamp are ignored; some drivers emit them as
    /// padding.
    pub fn feed(&mut self, record: &InputRecord) -> Option<TouchEvent> {
        if record.seconds == 0 {
            return None;
        }
        match (record.kind, record.code) {
            (EV_SYN, _) => return Some(self.current),
            (EV_KEY, BTN_TOUCH) => self.current.pressed = record.value > 0,
            (EV_ABS, ABS_X) => self.current.point.x = record.value,
            (EV_ABS, ABS_Y) => self.current.point.y = record.value,
            (EV_ABS, ABS_PRESSURE) => self.current.pressure = record.value,
            _ => {}
        }
        None
    }
}

/// Counts kept by the reader thread.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputStats {
    /// Samples the run loop accepted.
    pub delivered: u64,
    /// Motion samples dropped because the queue was full.
    pub coalesced: u64,
}

/// Where the reader thread sends samples.
#[derive(Clone, Debug)]
pub(crate) struct SampleSink {
    pub(crate) events: Sender<LoopEvent>,
    pub(crate) running: Arc<AtomicBool>,
    pub(crate) retry: Duration,
}

impl SampleSink {
    /// Offers a sample. Returns `false` once the loop is gone.
    fn offer(&self, event: TouchEvent, transition: bool, stats: &mut InputStats) -> bool {
        if !transition {
            return match self.events.try_send(LoopEvent::Touch(event)) {
                Ok(()) => {
                    stats.delivered += 1;
                    true
                }
                Err(TrySendError::Full(_)) => {
                    stats.coalesced += 1;
                    true
                }
                Err(TrySendError::Disconnected(_)) => false,
            };
        }
        let delivered = deliver(&self.events, LoopEvent::Touch(event), self.retry, &self.running);
        if delivered {
            stats.delivered += 1;
        }
        delivered
    }
}

/// Sends `event`, waiting in `retry` slices while the loop is running.
///
/// Returns `false` if the loop stopped or went away first.
pub(crate) fn deliver(
    events: &Sender<LoopEvent>,
    mut event: LoopEvent,
    retry: Duration,
    running: &AtomicBool,
) -> bool {
    loop {
        match events.send_timeout(event, retry) {
            Ok(()) => return true,
            Err(SendTimeoutError::Timeout(back)) => {
                if !running.load(Ordering::Acquire) {
                    return false;
                }
                event = back;
            }
            Err(SendTimeoutError::Disconnected(_)) => return false,
        }
    }
}

/// Decodes `reader` until it ends, sending samples to `sink`.
pub(crate) fn pump(mut reader: impl Read, sink: &SampleSink) -> InputStats {
    let mut decoder = TouchDecoder::new();
    let mut stats = InputStats::default();
    let mut pressed = false;
    while sink.running.load(Ordering::Acquire) {
        let record = match InputRecord::read_from(&mut reader) {
            Ok(Some(record)) => record,
            Ok(None) => break,
            Err(err) => {
                debug!("input read failed: {err}");
                break;
            }
        };
        let Some(event) = decoder.feed(&record) else {
            continue;
        };
        let transition = event.pressed != pressed;
        pressed = event.pressed;
        if !sink.offer(event, transition, &mut stats) {
            break;
        }
    }
    stats
}

/// Starts a thread that decodes `reader` into the run loop's queue.
///
/// The thread ends when the device ends or fails, or at the first record
/// boundary after the run loop stops, dropping `reader` and so closing the
/// device. A read already blocked waits for the next record. The returned
/// handle yields the thread's counts.
pub(crate) fn spawn_reader<R>(reader: R, sink: SampleSink) -> io::Result<JoinHandle<InputStats>>
where
    R: Read + Send + 'static,
{
    thread::Builder::new()
        .name("lamina-input".into())
        .spawn(move || {
            let stats = pump(reader, &sink);
            debug!("input device closed");
            info!(
                "input ended: {} samples delivered, {} coalesced",
                stats.delivered, stats.coalesced
            );
            stats
        })
}
