/// Tunables for the solar system view.
///
/// Every section is `#[serde(default)]`, so the host can pass a partial JSON
/// document and only override what it names:
///
/// ```json
/// { "controls": { "max_distance": 1200 }, "animation": { "time_step": "delta_scaled" } }
/// ```

use orrery_engine::{EngineError, TimeStepMode};
use serde::Deserialize;

/// Smallest accepted pole margin. At zero the camera can sit on the Y axis,
/// where a Y-up look-at matrix degenerates.
pub const MIN_POLAR_MARGIN: f32 = 0.01;

// ── Controls ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    /// Radians of orbit per pixel dragged.
    pub rotation_speed: f32,
    /// Scene units of zoom per wheel delta unit.
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Keeps the camera this far (radians) from either pole. At least
    /// `MIN_POLAR_MARGIN`.
    pub polar_margin: f32,
    /// Pointer travel in pixels up to which a press-release is a click.
    pub click_threshold_px: f32,
    /// Camera position restored by reset. Its radius and polar angle are
    /// clamped into the distance and pole bounds.
    pub home_position: [f32; 3],
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            rotation_speed: 0.005,
            zoom_speed: 0.1,
            min_distance: 20.0,
            max_distance: 800.0,
            polar_margin: 0.1,
            click_threshold_px: 5.0,
            home_position: [0.0, 100.0, 200.0],
        }
    }
}

// ── Animation ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub time_step: TimeStepMode,
    /// Elapsed-time units added per nominal tick (drives the moon).
    pub time_per_tick: f64,
    /// Backdrop rotation per nominal tick, radians.
    pub starfield_spin: f64,
    pub belt_spin: f64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            time_step: TimeStepMode::Fixed,
            time_per_tick: 0.01,
            starfield_spin: 0.0001,
            belt_spin: 0.0005,
        }
    }
}

// ── Scene ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Seed for star, belt and halo placement and initial orbit angles.
    pub seed: u64,
    pub star_count: usize,
    pub belt_count: usize,
    pub sun_particle_count: usize,
    /// Start planets at random orbit angles instead of all at angle 0.
    pub random_start_angles: bool,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            star_count: 10_000,
            belt_count: 2_000,
            sun_particle_count: 1_000,
            random_start_angles: true,
        }
    }
}

impl SceneConfig {
    pub fn total_points(&self) -> usize {
        self.star_count + self.belt_count + self.sun_particle_count
    }
}

// ── Root ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct SolarSystemConfig {
    pub controls: ControlsConfig,
    pub animation: AnimationConfig,
    pub scene: SceneConfig,
}

impl SolarSystemConfig {
    /// Parse a (possibly partial) JSON document and validate it.
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        let c = &self.controls;
        positive("controls.rotation_speed", c.rotation_speed)?;
        positive("controls.zoom_speed", c.zoom_speed)?;
        positive("controls.min_distance", c.min_distance)?;
        if !(c.max_distance >= c.min_distance) {
            return Err(EngineError::InvalidConfig(format!(
                "controls.min_distance ({}) exceeds controls.max_distance ({})",
                c.min_distance, c.max_distance
            )));
        }
        if !(c.polar_margin >= MIN_POLAR_MARGIN && c.polar_margin < std::f32::consts::FRAC_PI_2) {
            return Err(EngineError::InvalidConfig(format!(
                "controls.polar_margin must be in [{MIN_POLAR_MARGIN}, π/2), got {}",
                c.polar_margin
            )));
        }
        if !(c.click_threshold_px >= 0.0) {
            return Err(EngineError::InvalidConfig(
                "controls.click_threshold_px must be >= 0".into(),
            ));
        }
        if c.home_position.iter().any(|v| !v.is_finite()) || c.home_position == [0.0; 3] {
            return Err(EngineError::InvalidConfig(
                "controls.home_position must be finite and away from the origin".into(),
            ));
        }

        let a = &self.animation;
        positive("animation.time_per_tick", a.time_per_tick as f32)?;
        if !(a.starfield_spin.is_finite() && a.belt_spin.is_finite()) {
            return Err(EngineError::InvalidConfig("backdrop spin rates must be finite".into()));
        }
        Ok(())
    }
}

fn positive(name: &str, value: f32) -> Result<(), EngineError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(EngineError::InvalidConfig(format!("{name} must be > 0, got {value}")))
    }
}
