// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::time::Duration;

use super::TouchEvent;
use crate::geometry::IntPoint;
use crate::layer::{HitTarget, LayerId, LayerTree};

/// Gesture tuning.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GestureConfig {
    /// How long a touch must be held before a long press fires.
    pub long_press_delay: Duration,
    /// How far (in pixels) the touch may wander from where it started
    /// before a pending long press is abandoned.
    pub long_press_radius: i32,
}

impl GestureConfig {
    /// 400 ms, 10 px.
    pub const DEFAULT: Self = Self {
        long_press_delay: Duration::from_millis(400),
        long_press_radius: 10,
    };
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Identifies one armed long-press timer.
///
/// Tokens are never reused by a [`Dispatcher`], so a timer that fires after
/// its gesture ended is recognised as stale and ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LongPressToken(u64);

impl LongPressToken {
    /// Wraps a raw token value, for timers that carry tokens across a
    /// boundary that loses the type.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw token value.
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Schedules long-press callbacks.
///
/// When an armed timer expires, its owner must call
/// [`Dispatcher::fire_long_press`] with the token on the thread that owns the
/// layer tree.
pub trait LongPressTimer {
    /// Starts a timer that expires after `delay`.
    fn arm(&mut self, token: LongPressToken, delay: Duration);
    /// Stops a timer. Cancelling an expired or unknown token does nothing.
    fn cancel(&mut self, token: LongPressToken);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    /// No finger down, or a finger down over nothing that takes touches.
    Idle,
    Tracking {
        target: LayerId,
        /// Screen point where the touch started.
        origin: IntPoint,
        armed: Option<LongPressToken>,
    },
    /// The gesture was cancelled; samples are ignored until release.
    Canceled,
}

/// Routes touch samples to a single target layer at a time.
///
/// While no finger is down over an interactive layer, every pressed sample is
/// hit-tested, so a finger sliding onto a control starts a gesture there.
/// Once a target is found it receives every sample until release, wherever
/// the finger goes. Samples are delivered in the target's own coordinates.
#[derive(Debug)]
pub struct Dispatcher {
    config: GestureConfig,
    state: State,
    next_token: u64,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(GestureConfig::DEFAULT)
    }
}

impl Dispatcher {
    /// Creates an idle dispatcher.
    #[must_use]
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            state: State::Idle,
            next_token: 0,
        }
    }

    /// The gesture tuning in use.
    #[must_use]
    pub fn config(&self) -> GestureConfig {
        self.config
    }

    /// The layer currently receiving the gesture, if any.
    #[must_use]
    pub fn target(&self) -> Option<LayerId> {
        match self.state {
            State::Tracking { target, .. } => Some(target),
            _ => None,
        }
    }

    /// Whether a long press is pending for the current gesture.
    #[must_use]
    pub fn long_press_armed(&self) -> bool {
        matches!(self.state, State::Tracking { armed: Some(_), .. })
    }

    /// Processes one calibrated sample in screen coordinates.
    ///
    /// `root` is the layer hit-testing starts from. Returns `true` if a
    /// delegate was notified, in which case the screen may need updating.
    pub fn handle(
        &mut self,
        tree: &mut LayerTree,
        root: LayerId,
        event: TouchEvent,
        timer: &mut dyn LongPressTimer,
    ) -> bool {
        match (self.state, event.pressed) {
            (State::Idle, true) => self.begin(tree, root, event, timer),
            (State::Idle, false) => false,
            (State::Canceled, pressed) => {
                if !pressed {
                    self.state = State::Idle;
                }
                false
            }
            (
                State::Tracking {
                    target,
                    origin,
                    armed,
                },
                true,
            ) => {
                if !tree.is_alive(target) {
                    self.abandon(timer);
                    return false;
                }
                if let Some(token) = armed
                    && !event.in_radius(origin, self.config.long_press_radius)
                {
                    timer.cancel(token);
                    self.state = State::Tracking {
                        target,
                        origin,
                        armed: None,
                    };
                }
                let local = to_local(tree, target, event);
                let cancel = tree
                    .with_delegate(target, |d, cx| d.update_touch(cx, &local))
                    .is_some_and(|(_, cancel)| cancel);
                if cancel {
                    self.cancel(tree, timer);
                }
                true
            }
            (State::Tracking { target, armed, .. }, false) => {
                if let Some(token) = armed {
                    timer.cancel(token);
                }
                self.state = State::Idle;
                if !tree.is_alive(target) {
                    return false;
                }
                let local = to_local(tree, target, event);
                tree.with_delegate(target, |d, cx| d.end_touch(cx, &local))
                    .is_some()
            }
        }
    }

    /// Delivers an expired long-press timer.
    ///
    /// Stale tokens (from a gesture that already moved away, ended, or was
    /// cancelled) are ignored. Tracking continues after the long press.
    /// Returns `true` if the target was notified.
    pub fn fire_long_press(
        &mut self,
        tree: &mut LayerTree,
        token: LongPressToken,
        timer: &mut dyn LongPressTimer,
    ) -> bool {
        let State::Tracking {
            target,
            origin,
            armed: Some(armed),
        } = self.state
        else {
            return false;
        };
        if armed != token {
            return false;
        }
        self.state = State::Tracking {
            target,
            origin,
            armed: None,
        };
        let cancel = match tree.with_delegate(target, |d, cx| d.long_press(cx)) {
            Some((_, cancel)) => cancel,
            None => return false,
        };
        if cancel {
            self.cancel(tree, timer);
        }
        true
    }

    /// Cancels the current gesture from outside.
    ///
    /// The target receives `cancel_touch` and the remaining samples of the
    /// touch are ignored. Returns `true` if a gesture was in progress.
    pub fn cancel(&mut self, tree: &mut LayerTree, timer: &mut dyn LongPressTimer) -> bool {
        let State::Tracking { target, armed, .. } = self.state else {
            return false;
        };
        if let Some(token) = armed {
            timer.cancel(token);
        }
        self.state = State::Canceled;
        let _ = tree.with_delegate(target, |d, cx| d.cancel_touch(cx));
        true
    }

    fn begin(
        &mut self,
        tree: &mut LayerTree,
        root: LayerId,
        event: TouchEvent,
        timer: &mut dyn LongPressTimer,
    ) -> bool {
        let Some(HitTarget::Layer(target)) = tree.hit_test(root, event.point) else {
            return false;
        };
        let armed = tree.wants_long_press(target).then(|| {
            let token = LongPressToken(self.next_token);
            self.next_token += 1;
            timer.arm(token, self.config.long_press_delay);
            token
        });
        self.state = State::Tracking {
            target,
            origin: event.point,
            armed,
        };
        let local = to_local(tree, target, event);
        let cancel = tree
            .with_delegate(target, |d, cx| d.start_touch(cx, &local))
            .is_some_and(|(_, cancel)| cancel);
        if cancel {
            self.cancel(tree, timer);
        }
        true
    }

    /// Drops a gesture whose target died, without notifying anyone.
    fn abandon(&mut self, timer: &mut dyn LongPressTimer) {
        if let State::Tracking {
            armed: Some(token), ..
        } = self.state
        {
            timer.cancel(token);
        }
        self.state = State::Canceled;
    }
}

fn to_local(tree: &LayerTree, target: LayerId, event: TouchEvent) -> TouchEvent {
    let origin = tree.screen_origin(target);
    event.translated(-origin.x, -origin.y)
}

/// A [`LongPressTimer`] that never fires on its own.
///
/// Records what was armed and cancelled; tests and single-threaded hosts fire
/// tokens by hand.
#[derive(Clone, Debug, Default)]
pub struct ManualTimer {
    armed: alloc::vec::Vec<(LongPressToken, Duration)>,
    cancelled: alloc::vec::Vec<LongPressToken>,
}

impl ManualTimer {
    /// Creates a timer with nothing armed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Tokens that are armed and not cancelled, oldest first.
    pub fn pending(&self) -> impl Iterator<Item = LongPressToken> + '_ {
        self.armed.iter().map(|&(token, _)| token)
    }

    /// Every token cancelled so far.
    #[must_use]
    pub fn cancelled(&self) -> &[LongPressToken] {
        &self.cancelled
    }

    /// Removes and returns the oldest pending token, as if it expired.
    pub fn expire(&mut self) -> Option<LongPressToken> {
        (!self.armed.is_empty()).then(|| self.armed.remove(0).0)
    }
}

impl LongPressTimer for ManualTimer {
    fn arm(&mut self, token: LongPressToken, delay: Duration) {
        self.armed.push((token, delay));
    }

    fn cancel(&mut self, token: LongPressToken) {
        self.armed.retain(|&(t, _)| t != token);
        self.cancelled.push(token);
    }
}
