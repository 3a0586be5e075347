pub mod api;
pub mod core;
pub mod components;
pub mod systems;
pub mod renderer;
pub mod bridge;
pub mod input;
pub mod extensions;

// Re-export key types at crate root for convenience
pub use api::view::{View, ViewConfig, EngineContext};
pub use api::types::{EntityId, FrameStep};
pub use api::error::{EngineError, RenderError};
pub use components::entity::Entity;
pub use components::mesh::{MeshComponent, Shape, Color, BlendMode};
pub use components::points::{PointStore, PointVertex, PointCloudId, PointRange};
pub use core::scene::Scene;
pub use core::time::{FrameClock, TimeStepMode, NOMINAL_FRAME_MS};
pub use core::frame_loop::{FrameLoop, FrameRequest, FrameScheduler, LoopState, ManualScheduler};
pub use core::ray::Ray;
pub use core::rng::Rng;
pub use renderer::instance::{SceneInstance, InstanceBuffer};
pub use renderer::camera::{PerspectiveCamera, Viewport, CameraUniform};
pub use renderer::{FrameData, Renderer};
pub use input::event::InputEvent;
pub use bridge::protocol::ProtocolLayout;
pub use systems::render::build_instance_buffer;

// Extensions
pub use extensions::{TransformGraph, LocalTransform};
