// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Long-press timers on a dedicated thread.
//!
//! The dispatcher arms and cancels timers through a [`ThreadTimer`], which
//! only sends commands. The timer thread keeps the deadlines and, when one
//! passes, enqueues a long-press event for the run loop; it never touches the
//! layer tree.

use std::io;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender};
use lamina_core::touch::{LongPressTimer, LongPressToken};
use log::warn;

use crate::input::deliver;
use crate::run_loop::LoopEvent;

#[derive(Debug)]
enum Command {
    Arm(LongPressToken, Instant),
    Cancel(LongPressToken),
    Stop,
}

/// A [`LongPressTimer`] backed by the timer thread.
#[derive(Clone, Debug)]
pub struct ThreadTimer {
    commands: Sender<Command>,
}

impl LongPressTimer for ThreadTimer {
    fn arm(&mut self, token: LongPressToken, delay: Duration) {
        // A stopped thread means the loop is shutting down; nothing will fire.
        let _ = self.commands.send(Command::Arm(token, Instant::now() + delay));
    }

    fn cancel(&mut self, token: LongPressToken) {
        let _ = self.commands.send(Command::Cancel(token));
    }
}

/// Owns the timer thread; stops and joins it on drop.
#[derive(Debug)]
pub(crate) struct TimerThread {
    commands: Sender<Command>,
    thread: Option<JoinHandle<()>>,
}

impl TimerThread {
    pub(crate) fn spawn(
        events: Sender<LoopEvent>,
        running: Arc<AtomicBool>,
        retry: Duration,
    ) -> io::Result<Self> {
        let (commands, rx) = channel::unbounded();
        let thread = thread::Builder::new()
            .name("lamina-timer".into())
            .spawn(move || run(&rx, &events, retry, &running))?;
        Ok(Self {
            commands,
            thread: Some(thread),
        })
    }

    pub(crate) fn timer(&self) -> ThreadTimer {
        ThreadTimer {
            commands: self.commands.clone(),
        }
    }
}

impl Drop for TimerThread {
    fn drop(&mut self) {
        let _ = self.commands.send(Command::Stop);
        if let Some(thread) = self.thread.take()
            && thread.join().is_err()
        {
            warn!("timer thread panicked");
        }
    }
}

fn run(commands: &Receiver<Command>, events: &Sender<LoopEvent>, retry: Duration, running: &AtomicBool) {
    let mut armed: Vec<(Instant, LongPressToken)> = Vec::new();
    loop {
        let next = armed.iter().map(|&(deadline, _)| deadline).min();
        let command = match next {
            Some(deadline) => match commands.recv_deadline(deadline) {
                Ok(command) => Some(command),
                Err(RecvTimeoutError::Timeout) => None,
                Err(RecvTimeoutError::Disconnected) => return,
            },
            None => match commands.recv() {
                Ok(command) => Some(command),
                Err(_) => return,
            },
        };
        match command {
            Some(Command::Arm(token, deadline)) => armed.push((deadline, token)),
            Some(Command::Cancel(token)) => armed.retain(|&(_, t)| t != token),
            Some(Command::Stop) => return,
            None => {
                let now = Instant::now();
                let (due, pending): (Vec<_>, Vec<_>) =
                    armed.into_iter().partition(|&(deadline, _)| deadline <= now);
                armed = pending;
                for (_, token) in due {
                    if !deliver(events, LoopEvent::LongPress(token), retry, running) {
                        return;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fired(rx: &Receiver<LoopEvent>, within: Duration) -> Option<LongPressToken> {
        match rx.recv_timeout(within) {
            Ok(LoopEvent::LongPress(token)) => Some(token),
            _ => None,
        }
    }

    fn start() -> (TimerThread, Receiver<LoopEvent>) {
        let (tx, rx) = channel::bounded(4);
        let thread = TimerThread::spawn(tx, Arc::new(AtomicBool::new(true)), Duration::from_millis(1))
            .expect("spawn timer thread");
        (thread, rx)
    }

    #[test]
    fn armed_timer_fires_once() {
        let (thread, rx) = start();
        let token = LongPressToken::from_raw(7);
        thread.timer().arm(token, Duration::from_millis(5));
        assert_eq!(fired(&rx, Duration::from_secs(2)), Some(token), "fired");
        assert_eq!(fired(&rx, Duration::from_millis(30)), None, "only once");
    }

    #[test]
    fn cancelled_timer_stays_silent() {
        let (thread, rx) = start();
        let mut timer = thread.timer();
        let token = LongPressToken::from_raw(1);
        timer.arm(token, Duration::from_millis(20));
        timer.cancel(token);
        assert_eq!(fired(&rx, Duration::from_millis(60)), None, "cancelled");
    }

    #[test]
    fn earliest_deadline_fires_first() {
        let (thread, rx) = start();
        let mut timer = thread.timer();
        let (late, early) = (LongPressToken::from_raw(1), LongPressToken::from_raw(2));
        timer.arm(late, Duration::from_millis(40));
        timer.arm(early, Duration::from_millis(5));
        assert_eq!(fired(&rx, Duration::from_secs(2)), Some(early), "early first");
        assert_eq!(fired(&rx, Duration::from_secs(2)), Some(late), "then late");
    }

    #[test]
    fn drop_joins_the_thread() {
        let (thread, _rx) = start();
        let mut timer = thread.timer();
        drop(thread);
        // Arming after shutdown is ignored rather than a panic.
        timer.arm(LongPressToken::from_raw(3), Duration::ZERO);
    }
}
