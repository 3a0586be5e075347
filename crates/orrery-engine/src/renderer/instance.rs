use bytemuck::{Pod, Zeroable};

/// Per-instance render data for the host renderer.
/// Wire format: 16 floats = 64 bytes stride.
///
/// `shape` selects how `p0`/`p1` are read: 0 sphere (`p0` radius, `p1`
/// specular shininess),
/// 1 ring (`p0` inner, `p1` outer radius), 2 point cloud (`p0` first point,
/// `p1` point count).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct SceneInstance {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// Orientation quaternion.
    pub qx: f32,
    pub qy: f32,
    pub qz: f32,
    pub qw: f32,
    /// Uniform world scale.
    pub scale: f32,
    pub shape: f32,
    pub p0: f32,
    pub p1: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub alpha: f32,
    pub emissive: f32,
}

impl SceneInstance {
    pub const FLOATS: usize = 16;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;
}

/// Instances for one frame, alpha-blended first, then additive after
/// `additive_split`.
pub struct InstanceBuffer {
    instances: Vec<SceneInstance>,
    additive_split: u32,
}

impl InstanceBuffer {
    pub fn with_capacity(max: usize) -> Self {
        Self {
            instances: Vec::with_capacity(max),
            additive_split: 0,
        }
    }

    pub fn clear(&mut self) {
        self.instances.clear();
        self.additive_split = 0;
    }

    pub fn push(&mut self, instance: SceneInstance) {
        self.instances.push(instance);
    }

    pub fn set_additive_split(&mut self, split: u32) {
        self.additive_split = split;
    }

    pub fn additive_split(&self) -> u32 {
        self.additive_split
    }

    pub fn instances(&self) -> &[SceneInstance] {
        &self.instances
    }

    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }
}

impl Default for InstanceBuffer {
    fn default() -> Self {
        Self::with_capacity(64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scene_instance_is_16_floats() {
        assert_eq!(std::mem::size_of::<SceneInstance>(), SceneInstance::STRIDE_BYTES);
        assert_eq!(SceneInstance::FLOATS, 16);
    }

    #[test]
    fn clear_resets_split() {
        let mut buf = InstanceBuffer::default();
        buf.push(SceneInstance::default());
        buf.set_additive_split(1);
        buf.clear();
        assert_eq!(buf.instance_count(), 0);
        assert_eq!(buf.additive_split(), 0);
    }
}
