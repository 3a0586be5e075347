//! Running/Stopped state machine for the per-frame update.
//!
//! The loop never owns a thread. It asks a `FrameScheduler` for exactly one
//! pending frame at a time and only honours the callback that matches it, so
//! a callback that was already queued when `stop()` ran is dropped on the
//! floor instead of mutating state.

use crate::api::error::EngineError;

/// Opaque id of one scheduled frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameRequest(pub i32);

/// Host facility that invokes a callback once per display refresh.
pub trait FrameScheduler {
    /// Schedule one callback. The host later delivers it with this request id.
    fn request_frame(&mut self) -> Result<FrameRequest, EngineError>;

    /// Best-effort cancellation of a scheduled callback.
    fn cancel_frame(&mut self, request: FrameRequest);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Stopped,
    Running,
}

pub struct FrameLoop<S: FrameScheduler> {
    scheduler: S,
    state: LoopState,
    pending: Option<FrameRequest>,
}

impl<S: FrameScheduler> FrameLoop<S> {
    pub fn new(scheduler: S) -> Self {
        Self {
            scheduler,
            state: LoopState::Stopped,
            pending: None,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    /// Stopped → Running. Returns `Ok(false)` if already running.
    pub fn start(&mut self) -> Result<bool, EngineError> {
        if self.is_running() {
            return Ok(false);
        }
        let request = self.scheduler.request_frame()?;
        self.pending = Some(request);
        self.state = LoopState::Running;
        Ok(true)
    }

    /// Any state → Stopped, cancelling the pending request. Idempotent.
    /// Returns whether the loop was running.
    pub fn stop(&mut self) -> bool {
        if let Some(request) = self.pending.take() {
            self.scheduler.cancel_frame(request);
        }
        let was_running = self.is_running();
        self.state = LoopState::Stopped;
        was_running
    }

    /// Called when a frame callback fires. Returns `true` if the tick should
    /// run; stale or post-stop callbacks return `false`.
    pub fn begin_frame(&mut self, request: FrameRequest) -> bool {
        if self.state != LoopState::Running || self.pending != Some(request) {
            return false;
        }
        self.pending = None;
        true
    }

    /// Schedule the next tick after a completed one. If scheduling fails the
    /// loop stops and the error is returned.
    pub fn end_frame(&mut self) -> Result<(), EngineError> {
        if self.state != LoopState::Running || self.pending.is_some() {
            return Ok(());
        }
        match self.scheduler.request_frame() {
            Ok(request) => {
                self.pending = Some(request);
                Ok(())
            }
            Err(e) => {
                self.state = LoopState::Stopped;
                Err(e)
            }
        }
    }

    pub fn pending(&self) -> Option<FrameRequest> {
        self.pending
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }
}

/// Scheduler driven by hand: headless hosts and tests decide when a
/// requested frame "fires" by calling `take_due` and delivering the ids.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: i32,
    due: Vec<FrameRequest>,
    cancelled: Vec<FrameRequest>,
    unavailable: bool,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// A scheduler whose every request fails.
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    /// Drain the requests that would fire on the next refresh.
    pub fn take_due(&mut self) -> Vec<FrameRequest> {
        std::mem::take(&mut self.due)
    }

    pub fn due_len(&self) -> usize {
        self.due.len()
    }

    pub fn cancelled(&self) -> &[FrameRequest] {
        &self.cancelled
    }

    pub fn set_unavailable(&mut self, unavailable: bool) {
        self.unavailable = unavailable;
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> Result<FrameRequest, EngineError> {
        if self.unavailable {
            return Err(EngineError::SchedulerUnavailable("manual scheduler disabled".into()));
        }
        self.next_id += 1;
        let request = FrameRequest(self.next_id);
        self.due.push(request);
        Ok(request)
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        self.due.retain(|&r| r != request);
        self.cancelled.push(request);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_stopped() {
        let frame_loop = FrameLoop::new(ManualScheduler::new());
        assert_eq!(frame_loop.state(), LoopState::Stopped);
        assert_eq!(frame_loop.pending(), None);
    }

    #[test]
    fn start_requests_one_frame() {
        let mut frame_loop = FrameLoop::new(ManualScheduler::new());
        assert!(frame_loop.start().unwrap());
        assert!(!frame_loop.start().unwrap());
        assert_eq!(frame_loop.scheduler().due_len(), 1);
        assert!(frame_loop.is_running());
    }

    #[test]
    fn frame_cycle_reschedules() {
        let mut frame_loop = FrameLoop::new(ManualScheduler::new());
        frame_loop.start().unwrap();
        for _ in 0..3 {
            let due = frame_loop.scheduler_mut().take_due();
            assert_eq!(due.len(), 1);
            assert!(frame_loop.begin_frame(due[0]));
            frame_loop.end_frame().unwrap();
        }
        assert_eq!(frame_loop.scheduler().due_len(), 1);
    }

    #[test]
    fn stop_cancels_pending_and_is_idempotent() {
        let mut frame_loop = FrameLoop::new(ManualScheduler::new());
        frame_loop.start().unwrap();
        let pending = frame_loop.pending().unwrap();

        assert!(frame_loop.stop());
        assert!(!frame_loop.stop());
        assert_eq!(frame_loop.state(), LoopState::Stopped);
        assert_eq!(frame_loop.scheduler().cancelled(), &[pending]);
        assert_eq!(frame_loop.scheduler().due_len(), 0);
    }

    #[test]
    fn callback_queued_before_stop_is_rejected() {
        let mut frame_loop = FrameLoop::new(ManualScheduler::new());
        frame_loop.start().unwrap();
        // The host already queued this callback when stop() ran.
        let stale = frame_loop.scheduler_mut().take_due()[0];
        frame_loop.stop();
        assert!(!frame_loop.begin_frame(stale));
    }

    #[test]
    fn callback_from_previous_run_is_rejected_after_restart() {
        let mut frame_loop = FrameLoop::new(ManualScheduler::new());
        frame_loop.start().unwrap();
        let old = frame_loop.pending().unwrap();
        frame_loop.stop();
        frame_loop.start().unwrap();
        assert!(!frame_loop.begin_frame(old));
        let current = frame_loop.pending().unwrap();
        assert!(frame_loop.begin_frame(current));
    }

    #[test]
    fn end_frame_after_stop_schedules_nothing() {
        let mut frame_loop = FrameLoop::new(ManualScheduler::new());
        frame_loop.start().unwrap();
        let req = frame_loop.scheduler_mut().take_due()[0];
        assert!(frame_loop.begin_frame(req));
        frame_loop.stop();
        frame_loop.end_frame().unwrap();
        assert_eq!(frame_loop.scheduler().due_len(), 0);
    }

    #[test]
    fn unavailable_scheduler_fails_start() {
        let mut frame_loop = FrameLoop::new(ManualScheduler::unavailable());
        assert!(matches!(frame_loop.start(), Err(EngineError::SchedulerUnavailable(_))));
        assert!(!frame_loop.is_running());
    }

    #[test]
    fn scheduling_failure_mid_run_stops_loop() {
        let mut frame_loop = FrameLoop::new(ManualScheduler::new());
        frame_loop.start().unwrap();
        let req = frame_loop.scheduler_mut().take_due()[0];
        assert!(frame_loop.begin_frame(req));
        frame_loop.scheduler_mut().set_unavailable(true);
        assert!(frame_loop.end_frame().is_err());
        assert!(!frame_loop.is_running());
    }
}
