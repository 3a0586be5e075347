/// SharedArrayBuffer layout.
/// Must stay in sync with the host's `protocol.ts`.
///
/// Layout (all values in f32 / 4 bytes):
/// ```text
/// [Header: 16 floats]
/// [Instances: max_instances × 16 floats]
/// [Points: max_points × 8 floats]
/// ```
///
/// Capacities are written into the header on every frame.
/// The host reads them from the header to compute offsets dynamically.
/// The camera uniform lives in its own 20-float buffer.

use crate::api::error::RenderError;
use crate::api::view::ViewConfig;
use crate::components::points::PointVertex;
use crate::renderer::instance::SceneInstance;
use crate::renderer::traits::FrameData;

/// Number of floats in the header section.
pub const HEADER_FLOATS: usize = 16;

/// Header field indices.
pub const HEADER_PROTOCOL_VERSION: usize = 0;
pub const HEADER_FRAME_COUNTER: usize = 1;
pub const HEADER_MAX_INSTANCES: usize = 2;
pub const HEADER_INSTANCE_COUNT: usize = 3;
pub const HEADER_ADDITIVE_SPLIT: usize = 4;
pub const HEADER_MAX_POINTS: usize = 5;
pub const HEADER_POINT_COUNT: usize = 6;
pub const HEADER_POINTS_GENERATION: usize = 7;
pub const HEADER_VIEWPORT_WIDTH: usize = 8;
pub const HEADER_VIEWPORT_HEIGHT: usize = 9;
pub const HEADER_CAMERA_X: usize = 10;
pub const HEADER_CAMERA_Y: usize = 11;
pub const HEADER_CAMERA_Z: usize = 12;
pub const HEADER_RUNNING: usize = 13;

/// Protocol version written into the header.
pub const PROTOCOL_VERSION: f32 = 1.0;

/// Floats per scene instance (fixed by the wire format).
pub const INSTANCE_FLOATS: usize = SceneInstance::FLOATS;

/// Floats per point vertex: x, y, z, r, g, b, size, alpha.
pub const POINT_FLOATS: usize = PointVertex::FLOATS;

/// Runtime-computed buffer layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolLayout {
    /// Maximum scene instances.
    pub max_instances: usize,
    /// Maximum point-cloud vertices.
    pub max_points: usize,

    /// Size of instance data section in floats.
    pub instance_data_floats: usize,
    /// Size of point data section in floats.
    pub point_data_floats: usize,

    /// Offset (in floats) where instance data begins.
    pub instance_data_offset: usize,
    /// Offset (in floats) where point data begins.
    pub point_data_offset: usize,

    /// Total buffer size in floats.
    pub buffer_total_floats: usize,
    /// Total buffer size in bytes.
    pub buffer_total_bytes: usize,
}

impl ProtocolLayout {
    /// Compute layout from raw capacity values.
    pub fn new(max_instances: usize, max_points: usize) -> Self {
        let instance_data_floats = max_instances * INSTANCE_FLOATS;
        let point_data_floats = max_points * POINT_FLOATS;

        let instance_data_offset = HEADER_FLOATS;
        let point_data_offset = instance_data_offset + instance_data_floats;

        let buffer_total_floats = point_data_offset + point_data_floats;
        let buffer_total_bytes = buffer_total_floats * 4;

        Self {
            max_instances,
            max_points,
            instance_data_floats,
            point_data_floats,
            instance_data_offset,
            point_data_offset,
            buffer_total_floats,
            buffer_total_bytes,
        }
    }

    /// Compute layout from a ViewConfig.
    pub fn from_config(config: &ViewConfig) -> Self {
        Self::new(config.max_instances, config.max_points)
    }

    /// Pack one frame into `buf`, which must be `buffer_total_floats` long.
    ///
    /// Point data is only rewritten when `frame.points_generation` differs
    /// from `uploaded_generation`; returns the generation now in the buffer.
    pub fn write_frame(
        &self,
        buf: &mut [f32],
        frame: &FrameData,
        uploaded_generation: Option<u32>,
    ) -> Result<u32, RenderError> {
        if frame.instances.len() > self.max_instances {
            return Err(RenderError::CapacityExceeded {
                what: "instance",
                needed: frame.instances.len(),
                capacity: self.max_instances,
            });
        }
        if frame.points.len() > self.max_points {
            return Err(RenderError::CapacityExceeded {
                what: "point",
                needed: frame.points.len(),
                capacity: self.max_points,
            });
        }
        if buf.len() < self.buffer_total_floats {
            return Err(RenderError::CapacityExceeded {
                what: "buffer",
                needed: self.buffer_total_floats,
                capacity: buf.len(),
            });
        }

        let header = &mut buf[..HEADER_FLOATS];
        header[HEADER_PROTOCOL_VERSION] = PROTOCOL_VERSION;
        header[HEADER_FRAME_COUNTER] = frame.frame as f32;
        header[HEADER_MAX_INSTANCES] = self.max_instances as f32;
        header[HEADER_INSTANCE_COUNT] = frame.instances.len() as f32;
        header[HEADER_ADDITIVE_SPLIT] = frame.additive_split as f32;
        header[HEADER_MAX_POINTS] = self.max_points as f32;
        header[HEADER_POINT_COUNT] = frame.points.len() as f32;
        header[HEADER_POINTS_GENERATION] = frame.points_generation as f32;
        header[HEADER_VIEWPORT_WIDTH] = frame.viewport_width;
        header[HEADER_VIEWPORT_HEIGHT] = frame.viewport_height;
        header[HEADER_CAMERA_X] = frame.camera.eye[0];
        header[HEADER_CAMERA_Y] = frame.camera.eye[1];
        header[HEADER_CAMERA_Z] = frame.camera.eye[2];
        header[HEADER_RUNNING] = if frame.running { 1.0 } else { 0.0 };

        let instance_floats: &[f32] = bytemuck::cast_slice(frame.instances);
        let start = self.instance_data_offset;
        buf[start..start + instance_floats.len()].copy_from_slice(instance_floats);

        if uploaded_generation != Some(frame.points_generation) {
            let point_floats: &[f32] = bytemuck::cast_slice(frame.points);
            let start = self.point_data_offset;
            buf[start..start + point_floats.len()].copy_from_slice(point_floats);
        }

        Ok(frame.points_generation)
    }
}
