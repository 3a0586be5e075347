/// Orbit and spin bookkeeping, advanced once per tick.
///
/// Pure state: nothing here touches the scene. `SolarSystem` pushes the
/// resulting poses into the transform graph after each step.
///
/// Angles are kept in f64 and grow without bound; they are wrapped to one
/// turn only when converted to f32 for rendering.

use std::f64::consts::TAU;

use glam::{Quat, Vec3};
use orrery_engine::Rng;

use crate::bodies::{self, CelestialBody};
use crate::config::AnimationConfig;

/// Mutable motion state of one orbiting body.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OrbitState {
    /// Position on the orbit, radians.
    pub angle: f64,
    /// Rotation about the body's own axis, radians.
    pub spin: f64,
}

#[derive(Debug, Clone)]
pub struct PlanetMotion {
    pub body: &'static CelestialBody,
    pub state: OrbitState,
}

impl PlanetMotion {
    /// Position on the circular orbit in the XZ plane.
    pub fn position(&self) -> Vec3 {
        let d = self.body.orbit_distance as f64;
        Vec3::new(
            (self.state.angle.cos() * d) as f32,
            0.0,
            (self.state.angle.sin() * d) as f32,
        )
    }

    pub fn rotation(&self) -> Quat {
        spin_quat(self.state.spin)
    }
}

pub struct Simulation {
    /// Global elapsed time (nominal units: `time_per_tick` per tick).
    elapsed: f64,
    sun_spin: f64,
    planets: Vec<PlanetMotion>,
    /// Moon spin. Its orbit angle is derived from `elapsed`.
    moon_spin: f64,
    starfield_angle: f64,
    belt_angle: f64,
    config: AnimationConfig,
}

impl Simulation {
    /// All planets start at angle 0.
    pub fn new(config: AnimationConfig) -> Self {
        let planets = bodies::planets()
            .iter()
            .map(|body| PlanetMotion { body, state: OrbitState::default() })
            .collect();
        Self {
            elapsed: 0.0,
            sun_spin: 0.0,
            planets,
            moon_spin: 0.0,
            starfield_angle: 0.0,
            belt_angle: 0.0,
            config,
        }
    }

    /// Planets start at a seeded random point on their orbit.
    pub fn with_random_angles(config: AnimationConfig, rng: &mut Rng) -> Self {
        let mut sim = Self::new(config);
        for planet in &mut sim.planets {
            planet.state.angle = rng.next_f64() * TAU;
        }
        sim
    }

    /// Advance one tick. `scale` is 1.0 in fixed-step mode.
    pub fn step(&mut self, scale: f64) {
        self.elapsed += self.config.time_per_tick * scale;
        self.sun_spin += bodies::sun().spin_speed * scale;

        for planet in &mut self.planets {
            planet.state.angle += planet.body.orbit_speed * scale;
            planet.state.spin += planet.body.spin_speed * scale;
        }

        self.moon_spin += bodies::moon().spin_speed * scale;
        self.starfield_angle += self.config.starfield_spin * scale;
        self.belt_angle += self.config.belt_spin * scale;
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn planets(&self) -> &[PlanetMotion] {
        &self.planets
    }

    pub fn planet(&self, name: &str) -> Option<&PlanetMotion> {
        self.planets.iter().find(|p| p.body.name == name)
    }

    pub fn sun_rotation(&self) -> Quat {
        spin_quat(self.sun_spin)
    }

    pub fn moon_angle(&self) -> f64 {
        self.elapsed * bodies::moon().orbit_speed
    }

    /// Moon position relative to Earth, before Earth's spin is applied.
    pub fn moon_offset(&self) -> Vec3 {
        let angle = self.moon_angle();
        let d = bodies::moon().orbit_distance as f64;
        Vec3::new((angle.cos() * d) as f32, 0.0, (angle.sin() * d) as f32)
    }

    pub fn moon_rotation(&self) -> Quat {
        spin_quat(self.moon_spin)
    }

    pub fn starfield_rotation(&self) -> Quat {
        spin_quat(self.starfield_angle)
    }

    pub fn belt_rotation(&self) -> Quat {
        spin_quat(self.belt_angle)
    }
}

fn spin_quat(angle: f64) -> Quat {
    Quat::from_rotation_y(angle.rem_euclid(TAU) as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sim() -> Simulation {
        Simulation::new(AnimationConfig::default())
    }

    #[test]
    fn fixed_steps_accumulate_exactly() {
        let mut s = sim();
        for _ in 0..250 {
            s.step(1.0);
        }
        for planet in s.planets() {
            let expected = 250.0 * planet.body.orbit_speed;
            assert!((planet.state.angle - expected).abs() < 1e-9, "{}", planet.body.name);
            assert!((planet.state.spin - 250.0 * planet.body.spin_speed).abs() < 1e-9);
        }
    }

    #[test]
    fn earth_after_100_ticks() {
        let mut s = sim();
        for _ in 0..100 {
            s.step(1.0);
        }
        let earth = s.planet("Earth").unwrap();
        assert!((earth.state.angle - 1.0).abs() < 1e-9);
        let pos = earth.position();
        assert!((pos.x - 27.015).abs() < 0.01, "x = {}", pos.x);
        assert_eq!(pos.y, 0.0);
        assert!((pos.z - 42.074).abs() < 0.01, "z = {}", pos.z);
    }

    #[test]
    fn moon_angle_follows_elapsed_time() {
        let mut s = sim();
        for _ in 0..100 {
            s.step(1.0);
        }
        assert!((s.elapsed() - 1.0).abs() < 1e-9);
        assert!((s.moon_angle() - 0.1).abs() < 1e-9);
        assert!((s.moon_offset().length() - 4.0).abs() < 1e-5);
    }

    #[test]
    fn step_scale_multiplies_increments() {
        let mut a = sim();
        let mut b = sim();
        a.step(2.0);
        b.step(1.0);
        b.step(1.0);
        let ea = a.planet("Mars").unwrap().state;
        let eb = b.planet("Mars").unwrap().state;
        assert!((ea.angle - eb.angle).abs() < 1e-12);
        assert!((a.moon_angle() - b.moon_angle()).abs() < 1e-12);
    }

    #[test]
    fn random_start_angles_are_seeded() {
        let a = Simulation::with_random_angles(AnimationConfig::default(), &mut Rng::new(7));
        let b = Simulation::with_random_angles(AnimationConfig::default(), &mut Rng::new(7));
        for (pa, pb) in a.planets().iter().zip(b.planets()) {
            assert_eq!(pa.state.angle, pb.state.angle);
            assert!(pa.state.angle >= 0.0 && pa.state.angle < TAU);
        }
    }

    #[test]
    fn large_angles_still_produce_unit_rotations() {
        let q = spin_quat(1.0e9);
        assert!((q.length() - 1.0).abs() < 1e-5);
    }
}
