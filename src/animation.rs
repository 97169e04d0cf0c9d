//! The self-scheduling frame loop.
//!
//! ```text
//! Idle --start--> Running --tick--> Running --tick (cancelled)--> Disposed
//! ```
//!
//! A running loop asks the host for exactly one more display frame at the
//! end of each tick, so frames never overlap and never run ahead of the
//! display. Hosts that stop delivering frames while hidden (browsers do,
//! the native host does while occluded) suspend the loop for free.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::time::FrameClock;

/// Host hook that fires the next tick on the next display refresh.
pub trait FrameScheduler {
    fn request_frame(&mut self);
}

/// Scheduler that only counts requests; for headless runs and tests.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CountingScheduler {
    pub requests: u64,
}

impl FrameScheduler for CountingScheduler {
    fn request_frame(&mut self) {
        self.requests += 1;
    }
}

/// Shared disposal flag. Cancelling stops the loop before its next reschedule.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Running,
    Disposed,
}

#[derive(Debug)]
pub struct AnimationLoop {
    state: LoopState,
    token: CancelToken,
    clock: FrameClock,
}

impl AnimationLoop {
    pub fn new() -> Self {
        Self {
            state: LoopState::Idle,
            token: CancelToken::new(),
            clock: FrameClock::new(),
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    /// A handle that can dispose the loop from elsewhere.
    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    /// Leave `Idle` and request the first frame. No-op in any other state.
    pub fn start(&mut self, scheduler: &mut dyn FrameScheduler) -> bool {
        if self.state != LoopState::Idle || self.token.is_cancelled() {
            return false;
        }
        self.state = LoopState::Running;
        scheduler.request_frame();
        true
    }

    /// Run one frame's work, then request the next frame unless cancelled.
    ///
    /// Returns `false` (without running `frame`) once the loop is not running.
    pub fn tick(&mut self, scheduler: &mut dyn FrameScheduler, frame: impl FnOnce()) -> bool {
        if self.state != LoopState::Running {
            return false;
        }
        if self.token.is_cancelled() {
            self.state = LoopState::Disposed;
            return false;
        }

        frame();

        if let Some(fps) = self.clock.tick() {
            tracing::debug!(fps, frame = self.clock.frame(), "animation loop");
        }

        if self.token.is_cancelled() {
            self.state = LoopState::Disposed;
        } else {
            scheduler.request_frame();
        }
        true
    }

    /// Stop for good. Any pending frame becomes a no-op.
    pub fn dispose(&mut self) {
        self.token.cancel();
        self.state = LoopState::Disposed;
    }
}

impl Default for AnimationLoop {
    fn default() -> Self {
        Self::new()
    }
}
