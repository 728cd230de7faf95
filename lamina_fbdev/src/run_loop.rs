// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The single-threaded event loop.
//!
//! ```text
//!   input thread ──┐                 ┌──► Window::touch / fire_long_press
//!   timer thread ──┼──► bounded ──► RunLoop::turn ──► tasks on the tree
//!   RunLoopHandle ─┘     queue        │
//!                                     └──► Window::update (once per turn)
//! ```
//!
//! The loop thread owns the window and so the tree, the damage list and the
//! screen buffer. Everything else talks to it through the queue. Redraw
//! requests share one pending flag and enqueue at most one wake-up.

use std::fmt;
use std::io::{self, Read};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crossbeam::channel::{self, Receiver, Sender};
use lamina_core::display::{DisplayError, FramebufferDevice};
use lamina_core::layer::LayerTree;
use lamina_core::touch::{LongPressToken, TouchEvent};
use lamina_core::trace::{TraceSink, Tracer};
use lamina_core::window::Window;
use log::{debug, info, warn};

use crate::config::RunLoopConfig;
use crate::error::PostError;
use crate::input::{InputStats, SampleSink, deliver, spawn_reader};
use crate::timer::{ThreadTimer, TimerThread};

/// A closure run on the loop thread with the layer tree.
pub type Task = Box<dyn FnOnce(&mut LayerTree) + Send>;

pub(crate) enum LoopEvent {
    Touch(TouchEvent),
    LongPress(LongPressToken),
    Task(Task),
    CancelTouch,
    Wake,
}

impl fmt::Debug for LoopEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Touch(event) => f.debug_tuple("Touch").field(event).finish(),
            Self::LongPress(token) => f.debug_tuple("LongPress").field(token).finish(),
            Self::Task(_) => f.write_str("Task"),
            Self::CancelTouch => f.write_str("CancelTouch"),
            Self::Wake => f.write_str("Wake"),
        }
    }
}

/// Talks to a [`RunLoop`] from any thread.
#[derive(Clone, Debug)]
pub struct RunLoopHandle {
    events: Sender<LoopEvent>,
    redraw: Arc<AtomicBool>,
    running: Arc<AtomicBool>,
    retry: Duration,
}

impl RunLoopHandle {
    /// Runs `task` on the loop thread.
    ///
    /// Waits while the queue is full, but gives up once the loop stops.
    pub fn post(&self, task: impl FnOnce(&mut LayerTree) + Send + 'static) -> Result<(), PostError> {
        self.send(LoopEvent::Task(Box::new(task)))
    }

    /// Asks for a screen update. Never blocks; requests made before the loop
    /// gets to them collapse into one.
    pub fn request_redraw(&self) {
        if !self.redraw.swap(true, Ordering::AcqRel) {
            // A full queue wakes the loop anyway, and the flag is checked
            // every turn.
            let _ = self.events.try_send(LoopEvent::Wake);
        }
    }

    /// Cancels the touch gesture in progress, if any.
    pub fn cancel_touch(&self) -> Result<(), PostError> {
        self.send(LoopEvent::CancelTouch)
    }

    /// Stops the loop after its current turn.
    pub fn shutdown(&self) {
        self.running.store(false, Ordering::Release);
        let _ = self.events.try_send(LoopEvent::Wake);
    }

    /// Whether the loop is still accepting work.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    fn send(&self, event: LoopEvent) -> Result<(), PostError> {
        if !self.is_running() {
            return Err(PostError);
        }
        if deliver(&self.events, event, self.retry, &self.running) {
            Ok(())
        } else {
            Err(PostError)
        }
    }
}

/// Owns a [`Window`] and feeds it events until shut down.
pub struct RunLoop<D: FramebufferDevice> {
    window: Window<D>,
    config: RunLoopConfig,
    sender: Sender<LoopEvent>,
    events: Receiver<LoopEvent>,
    redraw: Arc<AtomicBool>,
    running: Arc<AtomicBool>,
    timer: ThreadTimer,
    trace: Option<Box<dyn TraceSink>>,
    // Dropped after `timer`, which only holds a command sender.
    _timers: TimerThread,
}

impl<D: FramebufferDevice> fmt::Debug for RunLoop<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunLoop")
            .field("config", &self.config)
            .field("queued", &self.events.len())
            .field("redraw_pending", &self.redraw.load(Ordering::Relaxed))
            .field("running", &self.running.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl<D> RunLoop<D>
where
    D: FramebufferDevice,
    D::Error: fmt::Display,
{
    /// Creates a loop around `window` and starts its timer thread.
    pub fn new(window: Window<D>, config: RunLoopConfig) -> io::Result<Self> {
        let (sender, events) = channel::bounded(config.queue_capacity.max(1));
        let running = Arc::new(AtomicBool::new(true));
        let timers = TimerThread::spawn(sender.clone(), running.clone(), config.transition_retry)?;
        Ok(Self {
            window,
            config,
            sender,
            events,
            redraw: Arc::new(AtomicBool::new(false)),
            running,
            timer: timers.timer(),
            trace: None,
            _timers: timers,
        })
    }

    /// A handle for other threads.
    #[must_use]
    pub fn handle(&self) -> RunLoopHandle {
        RunLoopHandle {
            events: self.sender.clone(),
            redraw: self.redraw.clone(),
            running: self.running.clone(),
            retry: self.config.transition_retry,
        }
    }

    /// The window being driven.
    #[must_use]
    pub fn window(&self) -> &Window<D> {
        &self.window
    }

    /// Mutable access to the window, for setup before [`run`](Self::run).
    pub fn window_mut(&mut self) -> &mut Window<D> {
        &mut self.window
    }

    /// Reports every update to `sink`.
    pub fn set_trace_sink(&mut self, sink: Option<Box<dyn TraceSink>>) {
        self.trace = sink;
    }

    /// Starts a thread that decodes evdev records from `reader` into touch
    /// events for this loop.
    pub fn spawn_input<R>(&self, reader: R) -> io::Result<JoinHandle<InputStats>>
    where
        R: Read + Send + 'static,
    {
        spawn_reader(
            reader,
            SampleSink {
                events: self.sender.clone(),
                running: self.running.clone(),
                retry: self.config.transition_retry,
            },
        )
    }

    /// Draws the initial screen, then handles events until
    /// [`RunLoopHandle::shutdown`] is called. Returns the device after
    /// clearing it.
    ///
    /// Input threads from [`spawn_input`](Self::spawn_input) are not joined.
    /// Each drops its device at its next record boundary; a read already
    /// blocked on an idle device holds it until the next record arrives.
    pub fn run(mut self) -> Result<D, DisplayError<D::Error>> {
        let size = self.window.size();
        info!("run loop started on a {}x{} screen", size.width, size.height);
        self.present();
        while self.running.load(Ordering::Acquire) {
            self.turn(true);
        }
        info!("run loop stopped");
        let Self { window, .. } = self;
        window.close()
    }

    /// Handles up to `max_events_per_turn` queued events, then updates the
    /// screen if anything changed or a redraw was requested.
    ///
    /// With `wait` set, blocks until at least one event arrives. Returns the
    /// number of events handled.
    pub fn turn(&mut self, wait: bool) -> usize {
        let first = if wait {
            self.events.recv().ok()
        } else {
            self.events.try_recv().ok()
        };
        let mut handled = 0;
        if let Some(event) = first {
            self.dispatch(event);
            handled = 1;
            while handled < self.config.max_events_per_turn {
                let Ok(event) = self.events.try_recv() else {
                    break;
                };
                self.dispatch(event);
                handled += 1;
            }
        }
        let requested = self.redraw.swap(false, Ordering::AcqRel);
        if requested || self.window.needs_update() {
            self.present();
        }
        handled
    }

    fn dispatch(&mut self, event: LoopEvent) {
        match event {
            LoopEvent::Touch(touch) => {
                self.window.touch(touch, &mut self.timer);
            }
            LoopEvent::LongPress(token) => {
                self.window.fire_long_press(token, &mut self.timer);
            }
            LoopEvent::Task(task) => task(self.window.tree_mut()),
            LoopEvent::CancelTouch => {
                self.window.cancel_touch(&mut self.timer);
            }
            LoopEvent::Wake => {}
        }
    }

    fn present(&mut self) {
        let start = Instant::now();
        let mut now_us = || u64::try_from(start.elapsed().as_micros()).unwrap_or(u64::MAX);
        let mut tracer = match self.trace.as_deref_mut() {
            Some(sink) => Tracer::new(sink),
            None => Tracer::none(),
        };
        match self.window.update_traced(&mut tracer, &mut now_us) {
            Ok(summary) if summary.rects > 0 => debug!(
                "draw {:?} / flush {:?} in {} rects",
                Duration::from_micros(summary.render_us),
                Duration::from_micros(summary.flush_us),
                summary.rects
            ),
            Ok(_) => {}
            Err(err) => warn!("flush failed: {err}"),
        }
    }
}
