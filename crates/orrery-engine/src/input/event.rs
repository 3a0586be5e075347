/// Input event types the engine understands.
/// Generic: no view-specific semantics. Coordinates are viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A press began at (x, y).
    PointerDown { x: f32, y: f32 },
    /// The pointer moved to (x, y).
    PointerMove { x: f32, y: f32 },
    /// A press ended at (x, y).
    PointerUp { x: f32, y: f32 },
    /// Wheel scrolled; positive `delta_y` moves away from the target.
    Wheel { delta_y: f32 },
    /// The host asked for the default camera view.
    ResetView,
}

impl InputEvent {
    /// Non-finite coordinates or deltas are dropped at the boundary.
    pub fn is_finite(&self) -> bool {
        match *self {
            InputEvent::PointerDown { x, y }
            | InputEvent::PointerMove { x, y }
            | InputEvent::PointerUp { x, y } => x.is_finite() && y.is_finite(),
            InputEvent::Wheel { delta_y } => delta_y.is_finite(),
            InputEvent::ResetView => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nan_wheel_is_not_finite() {
        assert!(!InputEvent::Wheel { delta_y: f32::NAN }.is_finite());
        assert!(InputEvent::Wheel { delta_y: -3.0 }.is_finite());
    }

    #[test]
    fn infinite_pointer_is_not_finite() {
        assert!(!InputEvent::PointerMove { x: f32::INFINITY, y: 0.0 }.is_finite());
        assert!(InputEvent::PointerDown { x: 1.0, y: 2.0 }.is_finite());
    }
}
