use serde::Deserialize;
use crate::api::types::FrameStep;

/// Nominal display refresh the per-tick increments are tuned for.
pub const NOMINAL_FRAME_MS: f64 = 1000.0 / 60.0;

/// Upper bound on a delta-scaled step (prevents a jump after a long stall).
const MAX_STEP_SCALE: f64 = 10.0;

/// How per-tick increments relate to wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeStepMode {
    /// Every tick advances by exactly one nominal step. Apparent speed scales
    /// with the display's frame rate.
    #[default]
    Fixed,
    /// Each tick is scaled by `frame_delta / NOMINAL_FRAME_MS`.
    DeltaScaled,
}

/// Turns frame timestamps into `FrameStep`s.
#[derive(Debug, Clone)]
pub struct FrameClock {
    mode: TimeStepMode,
    last_timestamp: Option<f64>,
    frame: u64,
}

impl FrameClock {
    pub fn new(mode: TimeStepMode) -> Self {
        Self {
            mode,
            last_timestamp: None,
            frame: 0,
        }
    }

    /// Produce the step for a frame delivered at `timestamp_ms`.
    pub fn advance(&mut self, timestamp_ms: f64) -> FrameStep {
        let scale = match self.mode {
            TimeStepMode::Fixed => 1.0,
            TimeStepMode::DeltaScaled => match self.last_timestamp {
                Some(last) if timestamp_ms.is_finite() && timestamp_ms > last => {
                    ((timestamp_ms - last) / NOMINAL_FRAME_MS).min(MAX_STEP_SCALE)
                }
                // First frame after (re)start, or a timestamp going backwards.
                _ => 1.0,
            },
        };
        if timestamp_ms.is_finite() {
            self.last_timestamp = Some(timestamp_ms);
        }
        let step = FrameStep {
            scale,
            frame: self.frame,
        };
        self.frame += 1;
        step
    }

    /// Forget the last timestamp so the first frame after a restart is not
    /// scaled by the time spent stopped.
    pub fn resync(&mut self) {
        self.last_timestamp = None;
    }

    pub fn mode(&self) -> TimeStepMode {
        self.mode
    }

    /// Number of steps produced so far.
    pub fn frames(&self) -> u64 {
        self.frame
    }
}
