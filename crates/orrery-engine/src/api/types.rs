/// Unique identifier for an entity in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

/// Per-tick step information handed to `View::update`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStep {
    /// Multiplier for every per-tick increment. Exactly 1.0 in fixed-step mode.
    pub scale: f64,
    /// Number of ticks run before this one.
    pub frame: u64,
}

impl FrameStep {
    pub fn fixed(frame: u64) -> Self {
        Self { scale: 1.0, frame }
    }
}
