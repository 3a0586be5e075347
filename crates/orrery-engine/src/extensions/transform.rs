// extensions/transform.rs
//
// Transform hierarchy: tracks parent-child relationships by EntityId and
// composes local poses into the world-space pos/rotation/scale of entities.
//
// Usage:
//   let mut graph = TransformGraph::new();
//   graph.register_with(moon, LocalTransform::new().with_offset(Vec3::X * 4.0));
//   graph.set_parent(moon, Some(earth));
//   graph.propagate(&mut scene);  // Updates world transforms from local poses

use std::collections::HashMap;
use glam::{Quat, Vec3};
use crate::api::types::EntityId;
use crate::core::scene::Scene;

/// Pose of an entity relative to its parent (or the world if it has none).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalTransform {
    pub offset: Vec3,
    pub rotation: Quat,
    pub scale: f32,
}

impl Default for LocalTransform {
    fn default() -> Self {
        Self {
            offset: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: 1.0,
        }
    }
}

impl LocalTransform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_offset(mut self, offset: Vec3) -> Self {
        self.offset = offset;
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
}

#[derive(Debug, Clone, Default)]
struct TransformNode {
    parent: Option<EntityId>,
    children: Vec<EntityId>,
    local: LocalTransform,
}

/// Transform hierarchy graph. Manages parent-child relationships.
///
/// Lives beside the Scene rather than inside Entity so that simulation code
/// writes local poses only and never touches world transforms directly.
#[derive(Debug, Default)]
pub struct TransformGraph {
    nodes: HashMap<EntityId, TransformNode>,
    /// Entities with no parent, in registration order.
    roots: Vec<EntityId>,
    /// Set when a pose or the hierarchy changes, cleared after propagate.
    dirty: bool,
}

impl TransformGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity as a root with the given local transform.
    pub fn register_with(&mut self, id: EntityId, local: LocalTransform) {
        let node = self.nodes.entry(id).or_default();
        node.local = local;
        if node.parent.is_none() && !self.roots.contains(&id) {
            self.roots.push(id);
        }
        self.dirty = true;
    }

    /// Set the parent of an entity. Pass `None` to make it a root.
    pub fn set_parent(&mut self, child: EntityId, parent: Option<EntityId>) {
        self.nodes.entry(child).or_default();
        if let Some(p) = parent {
            self.nodes.entry(p).or_default();
            if !self.roots.contains(&p) && self.parent(p).is_none() {
                self.roots.push(p);
            }
        }

        if let Some(old_parent) = self.parent(child) {
            if let Some(old_node) = self.nodes.get_mut(&old_parent) {
                old_node.children.retain(|&c| c != child);
            }
        }

        if let Some(node) = self.nodes.get_mut(&child) {
            node.parent = parent;
        }

        match parent {
            Some(p) => {
                if let Some(parent_node) = self.nodes.get_mut(&p) {
                    if !parent_node.children.contains(&child) {
                        parent_node.children.push(child);
                    }
                }
                self.roots.retain(|&r| r != child);
            }
            None => {
                if !self.roots.contains(&child) {
                    self.roots.push(child);
                }
            }
        }

        self.dirty = true;
    }

    /// Replace the local transform of a registered entity.
    pub fn set_local(&mut self, id: EntityId, local: LocalTransform) {
        if let Some(node) = self.nodes.get_mut(&id) {
            if node.local != local {
                node.local = local;
                self.dirty = true;
            }
        }
    }

    pub fn local(&self, id: EntityId) -> Option<&LocalTransform> {
        self.nodes.get(&id).map(|n| &n.local)
    }

    pub fn parent(&self, id: EntityId) -> Option<EntityId> {
        self.nodes.get(&id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: EntityId) -> Option<&[EntityId]> {
        self.nodes.get(&id).map(|n| n.children.as_slice())
    }

    /// Recompute world transforms from the roots down, if anything changed.
    pub fn propagate(&mut self, scene: &mut Scene) {
        if !self.dirty {
            return;
        }
        for &root in &self.roots {
            self.propagate_recursive(root, Vec3::ZERO, Quat::IDENTITY, 1.0, scene);
        }
        self.dirty = false;
    }

    fn propagate_recursive(
        &self,
        id: EntityId,
        parent_pos: Vec3,
        parent_rot: Quat,
        parent_scale: f32,
        scene: &mut Scene,
    ) {
        let Some(node) = self.nodes.get(&id) else { return };
        let local = &node.local;

        let world_pos = parent_pos + parent_rot * (local.offset * parent_scale);
        let world_rot = (parent_rot * local.rotation).normalize();
        let world_scale = parent_scale * local.scale;

        if let Some(entity) = scene.get_mut(id) {
            entity.pos = world_pos;
            entity.rotation = world_rot;
            entity.scale = world_scale;
        }

        for &child in &node.children {
            self.propagate_recursive(child, world_pos, world_rot, world_scale, scene);
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.roots.clear();
        self.dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::entity::Entity;
    use std::f32::consts::FRAC_PI_2;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn parent_child_relationship() {
        let mut graph = TransformGraph::new();
        let parent = EntityId(1);
        let child = EntityId(2);

        graph.register_with(parent, LocalTransform::new());
        graph.register_with(child, LocalTransform::new());
        graph.set_parent(child, Some(parent));

        assert_eq!(graph.parent(child), Some(parent));
        assert_eq!(graph.children(parent), Some([child].as_slice()));
        assert!(!graph.roots.contains(&child));
    }

    #[test]
    fn child_offset_follows_parent_position() {
        let mut graph = TransformGraph::new();
        let mut scene = Scene::new();
        let parent = scene.spawn(Entity::new(EntityId(1)));
        let child = scene.spawn(Entity::new(EntityId(2)));

        graph.register_with(parent, LocalTransform::new().with_offset(Vec3::new(50.0, 0.0, 0.0)));
        graph.register_with(child, LocalTransform::new().with_offset(Vec3::new(4.0, 0.0, 0.0)));
        graph.set_parent(child, Some(parent));
        graph.propagate(&mut scene);

        assert!(approx(scene.get(child).unwrap().pos, Vec3::new(54.0, 0.0, 0.0)));
    }

    #[test]
    fn parent_spin_carries_child_offset() {
        let mut graph = TransformGraph::new();
        let mut scene = Scene::new();
        let parent = scene.spawn(Entity::new(EntityId(1)));
        let child = scene.spawn(Entity::new(EntityId(2)));

        graph.register_with(
            parent,
            LocalTransform::new().with_rotation(Quat::from_rotation_y(FRAC_PI_2)),
        );
        graph.register_with(child, LocalTransform::new().with_offset(Vec3::new(4.0, 0.0, 0.0)));
        graph.set_parent(child, Some(parent));
        graph.propagate(&mut scene);

        // +X rotated a quarter turn about +Y lands on -Z.
        assert!(approx(scene.get(child).unwrap().pos, Vec3::new(0.0, 0.0, -4.0)));
    }

    #[test]
    fn propagate_is_skipped_when_clean() {
        let mut graph = TransformGraph::new();
        let mut scene = Scene::new();
        let id = scene.spawn(Entity::new(EntityId(1)));
        graph.register_with(id, LocalTransform::new().with_offset(Vec3::X));
        graph.propagate(&mut scene);
        assert!(!graph.is_dirty());

        scene.get_mut(id).unwrap().pos = Vec3::ZERO;
        graph.propagate(&mut scene);
        assert_eq!(scene.get(id).unwrap().pos, Vec3::ZERO);

        graph.set_local(id, LocalTransform::new().with_offset(Vec3::Y));
        assert!(graph.is_dirty());
        graph.propagate(&mut scene);
        assert!(approx(scene.get(id).unwrap().pos, Vec3::Y));
    }
}
