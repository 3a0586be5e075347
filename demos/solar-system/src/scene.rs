/// Scene construction from the body registry, plus the per-tick sync that
/// pushes simulation poses into the transform graph.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use glam::{Quat, Vec3};
use orrery_engine::{
    BlendMode, Color, EngineContext, Entity, EntityId, LocalTransform, MeshComponent, PointVertex,
    Rng, TransformGraph,
};

use crate::animation::Simulation;
use crate::bodies::{self, CelestialBody};
use crate::config::SceneConfig;

// ── Sun decorations ──────────────────────────────────────────────────

const CORONA_RADIUS: f32 = 12.0;
const CORONA_ALPHA: f32 = 0.3;
const HALO_RADIUS_MIN: f32 = 15.0;
const HALO_RADIUS_MAX: f32 = 25.0;
const HALO_POINT_SIZE: f32 = 0.5;
const HALO_ALPHA: f32 = 0.6;

// ── Orbit guides and rings ───────────────────────────────────────────

const ORBIT_GUIDE_HALF_WIDTH: f32 = 0.1;
const ORBIT_GUIDE_COLOR: Color = Color::from_hex(0x444444);
const ORBIT_GUIDE_ALPHA: f32 = 0.3;
const SATURN_RING_INNER: f32 = 1.5;
const SATURN_RING_OUTER: f32 = 2.5;
const SATURN_RING_COLOR: Color = Color::from_hex(0xaaaaaa);
const SATURN_RING_ALPHA: f32 = 0.6;

// ── Backdrop ─────────────────────────────────────────────────────────

const STAR_RADIUS_MIN: f32 = 1000.0;
const STAR_RADIUS_MAX: f32 = 5000.0;
const STAR_SIZE: f32 = 2.0;
const STAR_ALPHA: f32 = 0.8;
/// Cumulative thresholds: white, blue, yellow, red.
const STAR_PALETTE: [(f32, Color); 4] = [
    (0.70, Color::new(1.0, 1.0, 1.0)),
    (0.85, Color::new(0.7, 0.8, 1.0)),
    (0.95, Color::new(1.0, 1.0, 0.7)),
    (1.00, Color::new(1.0, 0.7, 0.7)),
];

const BELT_DISTANCE_MIN: f32 = 85.0;
const BELT_DISTANCE_MAX: f32 = 110.0;
const BELT_HALF_HEIGHT: f32 = 1.5;
const BELT_COLOR: Color = Color::from_hex(0x8c7853);
const BELT_POINT_SIZE: f32 = 0.5;
const BELT_ALPHA: f32 = 0.8;

/// A node the inspector can report on.
#[derive(Debug, Clone, Copy)]
pub struct Selectable {
    pub id: EntityId,
    pub body: &'static CelestialBody,
}

/// Entity handles of everything the simulation moves.
#[derive(Debug, Clone)]
pub struct SceneNodes {
    pub sun: EntityId,
    /// In `bodies::planets()` order.
    pub planets: Vec<EntityId>,
    pub moon: EntityId,
    pub starfield: EntityId,
    pub belt: EntityId,
    /// Sun, planets and moon. Decorations are never selectable.
    pub selectable: Vec<Selectable>,
}

impl SceneNodes {
    /// Write the simulation's poses into the transform graph.
    pub fn sync(&self, sim: &Simulation, graph: &mut TransformGraph) {
        graph.set_local(self.sun, LocalTransform::new().with_rotation(sim.sun_rotation()));

        for (&id, planet) in self.planets.iter().zip(sim.planets()) {
            graph.set_local(
                id,
                LocalTransform::new()
                    .with_offset(planet.position())
                    .with_rotation(planet.rotation()),
            );
        }

        graph.set_local(
            self.moon,
            LocalTransform::new()
                .with_offset(sim.moon_offset())
                .with_rotation(sim.moon_rotation()),
        );
        graph.set_local(self.starfield, LocalTransform::new().with_rotation(sim.starfield_rotation()));
        graph.set_local(self.belt, LocalTransform::new().with_rotation(sim.belt_rotation()));
    }
}

/// Spawn the whole system into `ctx`. Poses are placeholders until the
/// first `SceneNodes::sync`.
pub fn build(ctx: &mut EngineContext, config: &SceneConfig, rng: &mut Rng) -> SceneNodes {
    let mut selectable = Vec::with_capacity(bodies::BODY_COUNT);

    // ── Backdrop ─────────────────────────────────────────────────────
    let stars = ctx.points.add(starfield_points(rng, config.star_count));
    let id = ctx.next_id();
    let starfield = spawn_root(
        ctx,
        Entity::new(id).with_tag("starfield").with_mesh(MeshComponent::points(stars)),
        LocalTransform::new(),
    );

    // ── Sun ──────────────────────────────────────────────────────────
    let sun_body = bodies::sun();
    let id = ctx.next_id();
    let sun = spawn_root(ctx, body_entity(id, sun_body), LocalTransform::new());
    selectable.push(Selectable { id: sun, body: sun_body });

    let corona = ctx.next_id();
    ctx.scene.spawn(
        Entity::new(corona).with_tag("corona").with_mesh(
            MeshComponent::sphere(CORONA_RADIUS, sun_body.color).with_alpha(CORONA_ALPHA),
        ),
    );
    attach(&mut ctx.transforms, corona, sun, LocalTransform::new());

    let halo_cloud = ctx.points.add(halo_points(rng, config.sun_particle_count, sun_body.color));
    let halo = ctx.next_id();
    ctx.scene.spawn(
        Entity::new(halo)
            .with_tag("sun-halo")
            .with_mesh(MeshComponent::points(halo_cloud).with_blend(BlendMode::Additive)),
    );
    attach(&mut ctx.transforms, halo, sun, LocalTransform::new());

    // ── Orbit guides ─────────────────────────────────────────────────
    let flat = Quat::from_rotation_x(FRAC_PI_2);
    for body in bodies::planets() {
        let id = ctx.next_id();
        spawn_root(
            ctx,
            Entity::new(id).with_tag(format!("orbit-{}", body.name)).with_mesh(
                MeshComponent::ring(
                    body.orbit_distance - ORBIT_GUIDE_HALF_WIDTH,
                    body.orbit_distance + ORBIT_GUIDE_HALF_WIDTH,
                    ORBIT_GUIDE_COLOR,
                )
                .with_alpha(ORBIT_GUIDE_ALPHA),
            ),
            LocalTransform::new().with_rotation(flat),
        );
    }

    // ── Planets ──────────────────────────────────────────────────────
    let mut planets = Vec::with_capacity(bodies::planets().len());
    for body in bodies::planets() {
        let id = ctx.next_id();
        spawn_root(
            ctx,
            body_entity(id, body),
            LocalTransform::new().with_offset(Vec3::X * body.orbit_distance),
        );
        planets.push(id);
        selectable.push(Selectable { id, body });
    }

    let saturn = planets[bodies::SATURN - bodies::PLANET_RANGE.start];
    let saturn_body = &bodies::BODIES[bodies::SATURN];
    let rings = ctx.next_id();
    ctx.scene.spawn(
        Entity::new(rings).with_tag("saturn-rings").with_mesh(
            MeshComponent::ring(
                saturn_body.visual_radius * SATURN_RING_INNER,
                saturn_body.visual_radius * SATURN_RING_OUTER,
                SATURN_RING_COLOR,
            )
            .with_alpha(SATURN_RING_ALPHA),
        ),
    );
    attach(&mut ctx.transforms, rings, saturn, LocalTransform::new().with_rotation(flat));

    // ── Moon ─────────────────────────────────────────────────────────
    let earth = planets[bodies::EARTH - bodies::PLANET_RANGE.start];
    let moon_body = bodies::moon();
    let moon = ctx.next_id();
    ctx.scene.spawn(body_entity(moon, moon_body));
    attach(
        &mut ctx.transforms,
        moon,
        earth,
        LocalTransform::new().with_offset(Vec3::X * moon_body.orbit_distance),
    );
    selectable.push(Selectable { id: moon, body: moon_body });

    // ── Asteroid belt ────────────────────────────────────────────────
    let belt_cloud = ctx.points.add(belt_points(rng, config.belt_count));
    let id = ctx.next_id();
    let belt = spawn_root(
        ctx,
        Entity::new(id).with_tag("asteroid-belt").with_mesh(MeshComponent::points(belt_cloud)),
        LocalTransform::new(),
    );

    log::info!(
        "scene built: {} entities, {} selectable, {} points",
        ctx.scene.len(),
        selectable.len(),
        ctx.points.len()
    );

    SceneNodes { sun, planets, moon, starfield, belt, selectable }
}

fn body_entity(id: EntityId, body: &CelestialBody) -> Entity {
    Entity::new(id)
        .with_tag(body.name)
        .with_mesh(
            MeshComponent::sphere(body.visual_radius, body.color)
                .with_shininess(body.shininess)
                .with_emissive(body.emissive),
        )
        .pickable(body.visual_radius)
}

fn spawn_root(ctx: &mut EngineContext, entity: Entity, local: LocalTransform) -> EntityId {
    let id = ctx.scene.spawn(entity);
    ctx.transforms.register_with(id, local);
    id
}

fn attach(graph: &mut TransformGraph, child: EntityId, parent: EntityId, local: LocalTransform) {
    graph.register_with(child, local);
    graph.set_parent(child, Some(parent));
}

/// Point on a sphere of `radius`, with polar angle drawn uniformly.
fn sphere_point(rng: &mut Rng, radius: f32) -> Vec3 {
    let theta = rng.range_f32(0.0, TAU);
    let phi = rng.range_f32(0.0, PI);
    Vec3::new(
        radius * phi.sin() * theta.cos(),
        radius * phi.sin() * theta.sin(),
        radius * phi.cos(),
    )
}

pub fn starfield_points(rng: &mut Rng, count: usize) -> Vec<PointVertex> {
    (0..count)
        .map(|_| {
            let radius = rng.range_f32(STAR_RADIUS_MIN, STAR_RADIUS_MAX);
            let pos = sphere_point(rng, radius);
            let pick = rng.next_f32();
            let color = STAR_PALETTE
                .iter()
                .find(|(threshold, _)| pick < *threshold)
                .map_or(Color::WHITE, |&(_, color)| color);
            PointVertex::new(pos, color, STAR_SIZE, STAR_ALPHA)
        })
        .collect()
}

pub fn halo_points(rng: &mut Rng, count: usize, color: Color) -> Vec<PointVertex> {
    (0..count)
        .map(|_| {
            let radius = rng.range_f32(HALO_RADIUS_MIN, HALO_RADIUS_MAX);
            PointVertex::new(sphere_point(rng, radius), color, HALO_POINT_SIZE, HALO_ALPHA)
        })
        .collect()
}

pub fn belt_points(rng: &mut Rng, count: usize) -> Vec<PointVertex> {
    (0..count)
        .map(|_| {
            let distance = rng.range_f32(BELT_DISTANCE_MIN, BELT_DISTANCE_MAX);
            let angle = rng.range_f32(0.0, TAU);
            let height = rng.range_f32(-BELT_HALF_HEIGHT, BELT_HALF_HEIGHT);
            let pos = Vec3::new(angle.cos() * distance, height, angle.sin() * distance);
            PointVertex::new(pos, BELT_COLOR, BELT_POINT_SIZE, BELT_ALPHA)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnimationConfig;
    use orrery_engine::{ViewConfig, Viewport};

    fn built() -> (EngineContext, SceneNodes) {
        let mut ctx = EngineContext::new(&ViewConfig::default(), Viewport::new(800.0, 600.0));
        let config = SceneConfig { star_count: 50, belt_count: 20, sun_particle_count: 10, ..SceneConfig::default() };
        let nodes = build(&mut ctx, &config, &mut Rng::new(1));
        (ctx, nodes)
    }

    #[test]
    fn selectable_set_is_sun_planets_and_moon() {
        let (ctx, nodes) = built();
        let names: Vec<&str> = nodes.selectable.iter().map(|s| s.body.name).collect();
        assert_eq!(names.len(), 11);
        assert_eq!(names[0], "Sun");
        assert!(names.contains(&"Moon"));
        assert_eq!(ctx.scene.pickable().count(), 11);
        assert!(ctx.scene.find_by_tag("corona").unwrap().pick_radius.is_none());
    }

    #[test]
    fn body_shininess_reaches_instances() {
        let (mut ctx, _) = built();
        ctx.propagate_transforms();
        let mut buffer = orrery_engine::InstanceBuffer::default();
        orrery_engine::build_instance_buffer(ctx.scene.iter(), &ctx.points, &mut buffer);

        let venus = ctx.scene.find_by_tag("Venus").unwrap().pos;
        let inst = buffer
            .instances()
            .iter()
            .find(|i| i.shape == 0.0 && Vec3::new(i.x, i.y, i.z) == venus)
            .unwrap();
        assert_eq!(inst.p1, 100.0);
    }

    #[test]
    fn point_clouds_are_registered() {
        let (ctx, _) = built();
        assert_eq!(ctx.points.len(), 80);
    }

    #[test]
    fn moon_follows_earth() {
        let (mut ctx, nodes) = built();
        let mut sim = Simulation::new(AnimationConfig::default());
        for _ in 0..100 {
            sim.step(1.0);
        }
        nodes.sync(&sim, &mut ctx.transforms);
        ctx.propagate_transforms();

        let earth = ctx.scene.get(nodes.planets[2]).unwrap().pos;
        let moon = ctx.scene.get(nodes.moon).unwrap().pos;
        assert!((earth - Vec3::new(27.015, 0.0, 42.074)).length() < 0.01);
        assert!(((moon - earth).length() - 4.0).abs() < 1e-3);
    }

    #[test]
    fn earth_spin_carries_moon() {
        let (mut ctx, nodes) = built();
        let sim = Simulation::new(AnimationConfig::default());
        nodes.sync(&sim, &mut ctx.transforms);
        ctx.propagate_transforms();
        let before = ctx.scene.get(nodes.moon).unwrap().pos;

        // Same moon offset, Earth turned a quarter: offset swings from +X to -Z.
        let earth = nodes.planets[2];
        let local = *ctx.transforms.local(earth).unwrap();
        ctx.transforms.set_local(earth, local.with_rotation(Quat::from_rotation_y(FRAC_PI_2)));
        ctx.propagate_transforms();
        let after = ctx.scene.get(nodes.moon).unwrap().pos;

        let earth_pos = ctx.scene.get(earth).unwrap().pos;
        assert!(((before - earth_pos) - Vec3::new(4.0, 0.0, 0.0)).length() < 1e-4);
        assert!(((after - earth_pos) - Vec3::new(0.0, 0.0, -4.0)).length() < 1e-4);
    }

    #[test]
    fn starfield_stays_in_shell() {
        let points = starfield_points(&mut Rng::new(3), 500);
        for p in &points {
            let r = Vec3::new(p.x, p.y, p.z).length();
            assert!(r >= STAR_RADIUS_MIN - 0.5 && r <= STAR_RADIUS_MAX + 0.5, "r = {r}");
        }
    }

    #[test]
    fn star_colors_follow_palette_split() {
        let points = starfield_points(&mut Rng::new(11), 10_000);
        let white = points.iter().filter(|p| p.r == 1.0 && p.g == 1.0 && p.b == 1.0).count();
        let red = points.iter().filter(|p| p.g == 0.7 && p.b == 0.7).count();
        assert!((6500..7500).contains(&white), "white = {white}");
        assert!((300..700).contains(&red), "red = {red}");
    }

    #[test]
    fn belt_stays_in_band() {
        for p in belt_points(&mut Rng::new(5), 500) {
            let d = (p.x * p.x + p.z * p.z).sqrt();
            assert!(d >= BELT_DISTANCE_MIN - 0.01 && d <= BELT_DISTANCE_MAX + 0.01);
            assert!(p.y.abs() <= BELT_HALF_HEIGHT);
        }
    }
}
