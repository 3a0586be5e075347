//! Render target contract.
//!
//! The engine never rasterizes. Each tick it hands a `FrameData` snapshot to
//! a `Renderer`; the web bridge's implementation packs it into the shared
//! buffer the host page draws from, and a native backend could draw directly.

use crate::api::error::RenderError;
use crate::components::points::PointVertex;
use super::camera::CameraUniform;
use super::instance::SceneInstance;

/// Complete frame data for rendering.
pub struct FrameData<'a> {
    /// Scene instances (alpha-blended first, then additive).
    pub instances: &'a [SceneInstance],
    /// Index of the first additive instance.
    pub additive_split: u32,
    /// All static point-cloud vertices.
    pub points: &'a [PointVertex],
    /// Bumps whenever `points` changes.
    pub points_generation: u32,
    pub camera: CameraUniform,
    pub viewport_width: f32,
    pub viewport_height: f32,
    /// Ticks run so far.
    pub frame: u64,
    /// Whether the animation loop is running.
    pub running: bool,
}

pub trait Renderer {
    /// Backend identifier (e.g., "shared-buffer", "webgpu").
    fn backend(&self) -> &'static str;

    /// Present one frame. An error is fatal to the running loop.
    fn draw(&mut self, frame: &FrameData) -> Result<(), RenderError>;

    /// Resize output buffers to the viewport, in pixels.
    fn resize(&mut self, width: u32, height: u32);

    /// The output surface went away. Later draws fail with `ContextLost`.
    fn invalidate(&mut self) {}
}
