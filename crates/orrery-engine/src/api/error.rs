use thiserror::Error;

/// Errors raised while setting up or configuring a view.
///
/// All of these are fatal to the view: the bridge logs them once and leaves
/// the view uninitialized.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("configuration parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("frame scheduler unavailable: {0}")]
    SchedulerUnavailable(String),

    #[error("render target unavailable: {0}")]
    TargetUnavailable(String),

    #[error("{what} capacity exceeded: needs {needed}, buffer holds {capacity}")]
    CapacityExceeded {
        what: &'static str,
        needed: usize,
        capacity: usize,
    },
}

/// Errors reported by a render target while presenting a frame.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("render context lost")]
    ContextLost,

    #[error("{what} capacity exceeded: frame has {needed}, buffer holds {capacity}")]
    CapacityExceeded {
        what: &'static str,
        needed: usize,
        capacity: usize,
    },
}

pub type Result<T> = std::result::Result<T, EngineError>;
