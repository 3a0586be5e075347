use crate::components::entity::Entity;
use crate::components::mesh::{BlendMode, MeshComponent, Shape};
use crate::components::points::PointStore;
use crate::renderer::instance::{InstanceBuffer, SceneInstance};

/// Build the instance buffer from a set of entities.
/// Groups entities by blend mode: alpha-blended first, then additive, and
/// sets `additive_split` at the boundary. Point-cloud meshes whose cloud is
/// unknown to `points` are skipped.
pub fn build_instance_buffer<'a>(
    entities: impl Iterator<Item = &'a Entity>,
    points: &PointStore,
    buffer: &mut InstanceBuffer,
) {
    buffer.clear();

    let mut additive: Vec<SceneInstance> = Vec::new();

    for entity in entities {
        if !entity.active {
            continue;
        }
        let Some(mesh) = &entity.mesh else { continue };
        let Some(instance) = instance_for(entity, mesh, points) else { continue };

        match mesh.blend {
            BlendMode::Alpha => buffer.push(instance),
            BlendMode::Additive => additive.push(instance),
        }
    }

    buffer.set_additive_split(buffer.instance_count() as u32);
    for instance in additive {
        buffer.push(instance);
    }
}

fn instance_for(entity: &Entity, mesh: &MeshComponent, points: &PointStore) -> Option<SceneInstance> {
    let (p0, p1) = match mesh.shape {
        Shape::Sphere { radius } => (radius, mesh.shininess),
        Shape::Ring { inner, outer } => (inner, outer),
        Shape::Points { cloud } => {
            let range = points.range(cloud)?;
            (range.start as f32, range.len as f32)
        }
    };
    Some(SceneInstance {
        x: entity.pos.x,
        y: entity.pos.y,
        z: entity.pos.z,
        qx: entity.rotation.x,
        qy: entity.rotation.y,
        qz: entity.rotation.z,
        qw: entity.rotation.w,
        scale: entity.scale,
        shape: mesh.shape.wire_code(),
        p0,
        p1,
        r: mesh.color.r,
        g: mesh.color.g,
        b: mesh.color.b,
        alpha: mesh.alpha,
        emissive: mesh.emissive,
    })
}
