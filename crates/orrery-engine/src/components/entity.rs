use glam::{Quat, Vec3};
use crate::api::types::EntityId;
use crate::components::mesh::MeshComponent;

/// One scene object: a single struct with optional components.
///
/// `pos`, `rotation` and `scale` are world-space. Entities registered in a
/// `TransformGraph` have them rewritten on every propagate.
#[derive(Debug, Clone)]
pub struct Entity {
    /// Unique identifier.
    pub id: EntityId,
    /// String tag for finding entities by name.
    pub tag: String,
    /// Whether this entity is active (inactive entities are skipped).
    pub active: bool,
    /// Position in world space.
    pub pos: Vec3,
    /// Orientation in world space.
    pub rotation: Quat,
    /// Uniform scale.
    pub scale: f32,
    /// Renderable shape and material (entities without a mesh are invisible).
    pub mesh: Option<MeshComponent>,
    /// Radius of the bounding sphere used for ray picking. `None` = not pickable.
    pub pick_radius: Option<f32>,
}

impl Entity {
    /// Create a new entity with the given ID at the origin.
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            tag: String::new(),
            active: true,
            pos: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: 1.0,
            mesh: None,
            pick_radius: None,
        }
    }

    // -- Builder pattern --

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_pos(mut self, pos: Vec3) -> Self {
        self.pos = pos;
        self
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_mesh(mut self, mesh: MeshComponent) -> Self {
        self.mesh = Some(mesh);
        self
    }

    /// Make the entity hit-testable with a bounding sphere of `radius`
    /// (before scale).
    pub fn pickable(mut self, radius: f32) -> Self {
        self.pick_radius = Some(radius);
        self
    }

    /// World-space bounding sphere radius, if pickable.
    pub fn world_pick_radius(&self) -> Option<f32> {
        self.pick_radius.map(|r| r * self.scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_entity_is_unpickable_and_invisible() {
        let e = Entity::new(EntityId(3));
        assert!(e.active);
        assert!(e.mesh.is_none());
        assert_eq!(e.world_pick_radius(), None);
    }

    #[test]
    fn pick_radius_follows_scale() {
        let e = Entity::new(EntityId(1)).pickable(2.0).with_scale(3.0);
        assert_eq!(e.world_pick_radius(), Some(6.0));
    }
}
