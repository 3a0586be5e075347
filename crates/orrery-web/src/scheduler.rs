use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use orrery_engine::{EngineError, FrameRequest, FrameScheduler};
use wasm_bindgen::prelude::*;

/// Ids of scheduled `requestAnimationFrame` callbacks, oldest first.
///
/// The browser hands the callback only a timestamp, but it fires callbacks
/// in request order, so each delivery belongs to the oldest id still
/// outstanding. Cancelled ids are removed so they never match a delivery.
#[derive(Debug, Default)]
pub struct IssuedRequests {
    outstanding: VecDeque<i32>,
}

impl IssuedRequests {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issued(&mut self, id: i32) {
        self.outstanding.push_back(id);
    }

    pub fn cancelled(&mut self, id: i32) {
        self.outstanding.retain(|&r| r != id);
    }

    /// The request a delivery answers, if any is outstanding.
    pub fn delivered(&mut self) -> Option<FrameRequest> {
        self.outstanding.pop_front().map(FrameRequest)
    }

    pub fn len(&self) -> usize {
        self.outstanding.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outstanding.is_empty()
    }
}

/// `requestAnimationFrame`-backed scheduler. Each delivery carries the id
/// of the request it answers, so the frame loop can drop stale callbacks.
pub struct RafScheduler {
    window: web_sys::Window,
    callback: Closure<dyn FnMut(f64)>,
    issued: Rc<RefCell<IssuedRequests>>,
}

impl RafScheduler {
    pub fn new(mut on_frame: impl FnMut(FrameRequest, f64) + 'static) -> Result<Self, EngineError> {
        let window = web_sys::window()
            .ok_or_else(|| EngineError::SchedulerUnavailable("no global window".into()))?;
        let issued = Rc::new(RefCell::new(IssuedRequests::new()));
        let delivered = Rc::clone(&issued);
        let callback = Closure::<dyn FnMut(f64)>::new(move |timestamp: f64| {
            // Release the borrow before `on_frame` requests the next frame.
            let request = delivered.borrow_mut().delivered();
            match request {
                Some(request) => on_frame(request, timestamp),
                None => log::debug!("animation frame with no outstanding request"),
            }
        });
        Ok(Self {
            window,
            callback,
            issued,
        })
    }
}

impl FrameScheduler for RafScheduler {
    fn request_frame(&mut self) -> Result<FrameRequest, EngineError> {
        let id = self
            .window
            .request_animation_frame(self.callback.as_ref().unchecked_ref())
            .map_err(|e| EngineError::SchedulerUnavailable(format!("{e:?}")))?;
        self.issued.borrow_mut().issued(id);
        Ok(FrameRequest(id))
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        match self.window.cancel_animation_frame(request.0) {
            Ok(()) => self.issued.borrow_mut().cancelled(request.0),
            // The callback may still fire; keep its id so it is matched as stale.
            Err(e) => log::warn!("cancelAnimationFrame({}) failed: {e:?}", request.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orrery_engine::{FrameLoop, ManualScheduler};

    #[test]
    fn deliveries_match_requests_in_order() {
        let mut issued = IssuedRequests::new();
        issued.issued(7);
        issued.issued(8);
        assert_eq!(issued.delivered(), Some(FrameRequest(7)));
        assert_eq!(issued.delivered(), Some(FrameRequest(8)));
        assert_eq!(issued.delivered(), None);
        assert!(issued.is_empty());
    }

    #[test]
    fn cancelled_id_is_skipped() {
        let mut issued = IssuedRequests::new();
        issued.issued(1);
        issued.issued(2);
        issued.cancelled(1);
        assert_eq!(issued.len(), 1);
        assert_eq!(issued.delivered(), Some(FrameRequest(2)));
    }

    #[test]
    fn callback_that_outlived_a_restart_is_rejected() {
        // Stop fails to cancel request 1, then a restart issues request 2.
        let mut issued = IssuedRequests::new();
        let mut frame_loop = FrameLoop::new(ManualScheduler::new());
        frame_loop.start().unwrap();
        let first = frame_loop.pending().unwrap();
        issued.issued(first.0);
        frame_loop.stop();
        frame_loop.start().unwrap();
        let second = frame_loop.pending().unwrap();
        issued.issued(second.0);

        assert!(!frame_loop.begin_frame(issued.delivered().unwrap()));
        assert!(frame_loop.begin_frame(issued.delivered().unwrap()));
    }
}
