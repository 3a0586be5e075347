use serde::Deserialize;

use crate::api::error::EngineError;
use crate::api::types::{EntityId, FrameStep};
use crate::components::points::PointStore;
use crate::core::scene::Scene;
use crate::core::time::TimeStepMode;
use crate::extensions::transform::TransformGraph;
use crate::input::event::InputEvent;
use crate::renderer::camera::{PerspectiveCamera, Viewport};

/// Configuration for the engine, provided by the view.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// How frame timestamps turn into step scales (default: fixed).
    pub time_step: TimeStepMode,
    /// Maximum number of render instances (default: 64).
    pub max_instances: usize,
    /// Maximum number of point-cloud vertices (default: 16384).
    pub max_points: usize,
    /// Vertical field of view in degrees (default: 75).
    pub fov_y_degrees: f32,
    /// Near clip plane (default: 0.1).
    pub near: f32,
    /// Far clip plane (default: 10000).
    pub far: f32,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            time_step: TimeStepMode::Fixed,
            max_instances: 64,
            max_points: 16384,
            fov_y_degrees: 75.0,
            near: 0.1,
            far: 10_000.0,
        }
    }
}

impl ViewConfig {
    /// Reject values the camera or the shared buffer cannot work with.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.max_instances == 0 {
            return Err(EngineError::InvalidConfig("max_instances must be > 0".into()));
        }
        if !(self.fov_y_degrees > 0.0 && self.fov_y_degrees < 180.0) {
            return Err(EngineError::InvalidConfig(format!(
                "fov_y_degrees must be in (0, 180), got {}",
                self.fov_y_degrees
            )));
        }
        if !(self.near > 0.0 && self.far > self.near) {
            return Err(EngineError::InvalidConfig(format!(
                "clip planes must satisfy 0 < near < far, got near={} far={}",
                self.near, self.far
            )));
        }
        Ok(())
    }
}

/// The contract every hosted view must fulfill.
pub trait View {
    /// Return engine configuration. Called once before init.
    fn config(&self) -> ViewConfig {
        ViewConfig::default()
    }

    /// Build the scene and place the camera. An error leaves the view
    /// uninitialized.
    fn init(&mut self, ctx: &mut EngineContext) -> Result<(), EngineError>;

    /// One tick of simulation. Only called while the loop is running.
    fn update(&mut self, ctx: &mut EngineContext, step: FrameStep);

    /// Apply one input event. Runs whether or not the loop is running.
    fn handle_input(&mut self, ctx: &mut EngineContext, event: &InputEvent);

    /// Pick whatever lies under viewport pixel (x, y). Returns whether
    /// something was hit; a miss keeps the current selection.
    fn select_at(&mut self, _ctx: &EngineContext, _x: f32, _y: f32) -> bool {
        false
    }

    /// The current selection as JSON, if any.
    fn selection_json(&self) -> Option<String> {
        None
    }

    /// Drop the current selection.
    fn clear_selection(&mut self) {}
}

/// Mutable access to engine state, passed to every `View` hook.
pub struct EngineContext {
    pub scene: Scene,
    pub transforms: TransformGraph,
    pub points: PointStore,
    pub camera: PerspectiveCamera,
    next_id: u32,
}

impl EngineContext {
    pub fn new(config: &ViewConfig, viewport: Viewport) -> Self {
        Self {
            scene: Scene::new(),
            transforms: TransformGraph::new(),
            points: PointStore::new(),
            camera: PerspectiveCamera::new(config.fov_y_degrees, config.near, config.far, viewport),
            next_id: 1,
        }
    }

    /// Generate the next unique entity ID.
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Bring world positions in line with the transform hierarchy.
    pub fn propagate_transforms(&mut self) {
        self.transforms.propagate(&mut self.scene);
    }
}
