/// Orbit camera controls: pointer drag orbits, wheel zooms, no inertia.
///
/// Camera state is spherical around the origin. Polar angle is measured from
/// +Y, azimuth about +Y from +Z:
/// `position = (r·sinφ·sinθ, r·cosφ, r·sinφ·cosθ)`.

use glam::Vec3;
use orrery_engine::PerspectiveCamera;

use crate::config::ControlsConfig;

/// Spherical camera coordinates around the look-at origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    pub azimuth: f32,
    pub polar: f32,
    pub radius: f32,
}

impl CameraState {
    pub fn from_position(position: Vec3) -> Self {
        let radius = position.length();
        if radius <= f32::EPSILON {
            return Self { azimuth: 0.0, polar: std::f32::consts::FRAC_PI_2, radius: 0.0 };
        }
        Self {
            azimuth: position.x.atan2(position.z),
            polar: (position.y / radius).clamp(-1.0, 1.0).acos(),
            radius,
        }
    }

    pub fn position(&self) -> Vec3 {
        let (sin_p, cos_p) = self.polar.sin_cos();
        let (sin_a, cos_a) = self.azimuth.sin_cos();
        Vec3::new(
            self.radius * sin_p * sin_a,
            self.radius * cos_p,
            self.radius * sin_p * cos_a,
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct DragState {
    active: bool,
    last_x: f32,
    last_y: f32,
    start_x: f32,
    start_y: f32,
}

/// Outcome of releasing the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Release {
    /// No press was in progress.
    Idle,
    /// The pointer barely moved: treat as a click at (x, y).
    Click { x: f32, y: f32 },
    /// The press orbited the camera.
    Drag,
}

pub struct OrbitControls {
    config: ControlsConfig,
    state: CameraState,
    drag: DragState,
}

impl OrbitControls {
    pub fn new(config: ControlsConfig) -> Self {
        let state = Self::home_state(&config);
        Self { config, state, drag: DragState::default() }
    }

    /// The configured home position, pulled inside the distance and pole
    /// bounds.
    fn home_state(config: &ControlsConfig) -> CameraState {
        let mut state = CameraState::from_position(Vec3::from_array(config.home_position));
        state.radius = state.radius.clamp(config.min_distance, config.max_distance);
        state.polar = state
            .polar
            .clamp(config.polar_margin, std::f32::consts::PI - config.polar_margin);
        state
    }

    pub fn state(&self) -> CameraState {
        self.state
    }

    pub fn position(&self) -> Vec3 {
        self.state.position()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.active
    }

    pub fn on_pointer_down(&mut self, x: f32, y: f32) {
        self.drag = DragState { active: true, last_x: x, last_y: y, start_x: x, start_y: y };
    }

    /// Orbit by the pointer delta. Returns whether the camera moved.
    pub fn on_pointer_move(&mut self, x: f32, y: f32) -> bool {
        if !self.drag.active {
            return false;
        }
        let dx = x - self.drag.last_x;
        let dy = y - self.drag.last_y;
        self.state.azimuth -= dx * self.config.rotation_speed;
        self.state.polar = (self.state.polar + dy * self.config.rotation_speed)
            .clamp(self.config.polar_margin, std::f32::consts::PI - self.config.polar_margin);
        self.drag.last_x = x;
        self.drag.last_y = y;
        true
    }

    pub fn on_pointer_up(&mut self, x: f32, y: f32) -> Release {
        if !self.drag.active {
            return Release::Idle;
        }
        let travel = (x - self.drag.start_x).hypot(y - self.drag.start_y);
        self.drag = DragState::default();
        if travel <= self.config.click_threshold_px {
            Release::Click { x, y }
        } else {
            Release::Drag
        }
    }

    /// Move along the view direction, clamped to the distance bounds.
    pub fn on_wheel(&mut self, delta_y: f32) {
        if !delta_y.is_finite() {
            log::warn!("ignoring non-finite wheel delta");
            return;
        }
        self.state.radius = (self.state.radius + delta_y * self.config.zoom_speed)
            .clamp(self.config.min_distance, self.config.max_distance);
    }

    /// Back to the home view, dropping any drag in progress.
    pub fn reset(&mut self) {
        self.state = Self::home_state(&self.config);
        self.drag = DragState::default();
    }

    /// Aim `camera` at the origin from the current position.
    pub fn apply(&self, camera: &mut PerspectiveCamera) {
        camera.target = Vec3::ZERO;
        camera.set_position(self.position());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controls() -> OrbitControls {
        OrbitControls::new(ControlsConfig::default())
    }

    #[test]
    fn home_state_matches_default_position() {
        let c = controls();
        assert!((c.state().radius - 223.607).abs() < 1e-3);
        assert!(c.state().azimuth.abs() < 1e-6);
        assert!((c.position() - Vec3::new(0.0, 100.0, 200.0)).length() < 1e-3);
    }

    #[test]
    fn move_without_press_is_ignored() {
        let mut c = controls();
        let before = c.state();
        assert!(!c.on_pointer_move(50.0, 50.0));
        assert_eq!(c.state(), before);
    }

    #[test]
    fn drag_right_decreases_azimuth() {
        let mut c = controls();
        c.on_pointer_down(100.0, 100.0);
        c.on_pointer_move(120.0, 100.0);
        assert!((c.state().azimuth + 0.1).abs() < 1e-6);
        assert_eq!(c.on_pointer_up(120.0, 100.0), Release::Drag);
        assert!(!c.is_dragging());
    }

    #[test]
    fn polar_stays_off_the_poles() {
        let mut c = controls();
        c.on_pointer_down(0.0, 0.0);
        for step in 1..=50 {
            c.on_pointer_move(0.0, step as f32 * 1000.0);
            let polar = c.state().polar;
            assert!(polar >= 0.1 - 1e-6 && polar <= std::f32::consts::PI - 0.1 + 1e-6);
        }
        for step in 1..=50 {
            c.on_pointer_move(0.0, -(step as f32) * 1000.0);
            assert!(c.state().polar >= 0.1 - 1e-6);
        }
    }

    #[test]
    fn wheel_clamps_to_max_distance() {
        let mut c = controls();
        for _ in 0..100 {
            c.on_wheel(100.0);
        }
        assert_eq!(c.state().radius, 800.0);
    }

    #[test]
    fn wheel_clamps_to_min_distance() {
        let mut c = controls();
        c.on_wheel(-1.0e6);
        assert_eq!(c.state().radius, 20.0);
    }

    #[test]
    fn wheel_keeps_direction() {
        let mut c = controls();
        let dir = c.position().normalize();
        c.on_wheel(-500.0);
        assert!((c.position().normalize() - dir).length() < 1e-5);
        assert!((c.state().radius - 173.607).abs() < 1e-3);
    }

    #[test]
    fn nan_wheel_is_ignored() {
        let mut c = controls();
        let before = c.state();
        c.on_wheel(f32::NAN);
        assert_eq!(c.state(), before);
    }

    #[test]
    fn small_release_is_a_click() {
        let mut c = controls();
        c.on_pointer_down(10.0, 10.0);
        c.on_pointer_move(12.0, 13.0);
        assert_eq!(c.on_pointer_up(13.0, 14.0), Release::Click { x: 13.0, y: 14.0 });
        assert_eq!(c.on_pointer_up(13.0, 14.0), Release::Idle);
    }

    #[test]
    fn reset_is_idempotent() {
        let mut c = controls();
        c.on_pointer_down(0.0, 0.0);
        c.on_pointer_move(300.0, -80.0);
        c.on_wheel(250.0);

        c.reset();
        let once = c.state();
        c.reset();
        assert_eq!(c.state(), once);
        assert!(!c.is_dragging());
        assert!((c.position() - Vec3::new(0.0, 100.0, 200.0)).length() < 1e-3);
    }

    #[test]
    fn home_on_the_pole_is_pulled_inside_margin() {
        let config = ControlsConfig { home_position: [0.0, 100.0, 0.0], ..ControlsConfig::default() };
        let mut cam = PerspectiveCamera::new(75.0, 0.1, 10_000.0, orrery_engine::Viewport::new(800.0, 600.0));
        let c = OrbitControls::new(config);
        assert!((c.state().polar - 0.1).abs() < 1e-6);
        assert!((c.state().radius - 100.0).abs() < 1e-4);

        c.apply(&mut cam);
        assert!(cam.view_projection().is_finite());
        assert!(cam.ray_through(400.0, 300.0).is_some());
    }

    #[test]
    fn home_radius_respects_distance_bounds() {
        let near = ControlsConfig { max_distance: 100.0, ..ControlsConfig::default() };
        let mut c = OrbitControls::new(near);
        assert_eq!(c.state().radius, 100.0);
        c.on_wheel(50.0);
        c.reset();
        assert_eq!(c.state().radius, 100.0);

        let far = ControlsConfig { min_distance: 300.0, ..ControlsConfig::default() };
        assert_eq!(OrbitControls::new(far).state().radius, 300.0);
    }

    #[test]
    fn apply_aims_camera_at_origin() {
        use orrery_engine::Viewport;
        let mut cam = PerspectiveCamera::new(75.0, 0.1, 10_000.0, Viewport::new(800.0, 600.0));
        let mut c = controls();
        c.on_wheel(100.0);
        c.apply(&mut cam);
        assert_eq!(cam.target, Vec3::ZERO);
        assert!((cam.position.length() - c.state().radius).abs() < 1e-3);
    }
}
