use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use crate::components::mesh::Color;

/// Handle to a point cloud registered in a `PointStore`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PointCloudId(pub u32);

/// One point of a static cloud. Wire format: 8 floats = 32 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct PointVertex {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    /// Point size in world units.
    pub size: f32,
    pub alpha: f32,
}

impl PointVertex {
    pub const FLOATS: usize = 8;

    pub fn new(pos: Vec3, color: Color, size: f32, alpha: f32) -> Self {
        Self {
            x: pos.x,
            y: pos.y,
            z: pos.z,
            r: color.r,
            g: color.g,
            b: color.b,
            size,
            alpha,
        }
    }
}

/// Location of one cloud inside the shared vertex list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointRange {
    pub start: u32,
    pub len: u32,
}

/// All static point clouds, packed back to back.
///
/// Clouds are positioned by the entity that references them, so the vertex
/// data never changes after upload. `generation` bumps on every add so the
/// host can tell when to re-upload.
#[derive(Debug, Default)]
pub struct PointStore {
    vertices: Vec<PointVertex>,
    ranges: Vec<PointRange>,
    generation: u32,
}

impl PointStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a cloud and return its handle.
    pub fn add(&mut self, points: impl IntoIterator<Item = PointVertex>) -> PointCloudId {
        let start = self.vertices.len() as u32;
        self.vertices.extend(points);
        let len = self.vertices.len() as u32 - start;
        self.ranges.push(PointRange { start, len });
        self.generation = self.generation.wrapping_add(1);
        PointCloudId(self.ranges.len() as u32 - 1)
    }

    pub fn range(&self, id: PointCloudId) -> Option<PointRange> {
        self.ranges.get(id.0 as usize).copied()
    }

    pub fn vertices(&self) -> &[PointVertex] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.ranges.clear();
        self.generation = self.generation.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cloud(n: usize) -> Vec<PointVertex> {
        (0..n)
            .map(|i| PointVertex::new(Vec3::splat(i as f32), Color::WHITE, 1.0, 1.0))
            .collect()
    }

    #[test]
    fn point_vertex_is_8_floats() {
        assert_eq!(std::mem::size_of::<PointVertex>(), 32);
    }

    #[test]
    fn clouds_pack_back_to_back() {
        let mut store = PointStore::new();
        let a = store.add(cloud(3));
        let b = store.add(cloud(5));
        assert_eq!(store.range(a), Some(PointRange { start: 0, len: 3 }));
        assert_eq!(store.range(b), Some(PointRange { start: 3, len: 5 }));
        assert_eq!(store.len(), 8);
        assert_eq!(store.generation(), 2);
    }

    #[test]
    fn unknown_cloud_has_no_range() {
        let store = PointStore::new();
        assert_eq!(store.range(PointCloudId(7)), None);
    }
}
