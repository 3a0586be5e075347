use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2, Vec3, Vec4Swizzles};
use crate::core::ray::Ray;

/// Smallest viewport edge accepted from the host, in pixels.
pub const MIN_VIEWPORT_EDGE: f32 = 1.0;

/// On-page rectangle the frame is drawn into, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    /// A viewport anchored at the page origin. Degenerate or non-finite sizes
    /// are clamped to `MIN_VIEWPORT_EDGE`.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            width: sanitize_edge(width),
            height: sanitize_edge(height),
        }
    }

    pub fn with_origin(mut self, left: f32, top: f32) -> Self {
        self.left = left;
        self.top = top;
        self
    }

    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }

    /// Map a point in page pixels to normalized device coordinates
    /// (x right, y up, both in [-1, 1] inside the rect).
    pub fn to_ndc(&self, x: f32, y: f32) -> Vec2 {
        Vec2::new(
            (x - self.left) / self.width * 2.0 - 1.0,
            -((y - self.top) / self.height) * 2.0 + 1.0,
        )
    }
}

fn sanitize_edge(v: f32) -> f32 {
    if v.is_finite() {
        v.max(MIN_VIEWPORT_EDGE)
    } else {
        MIN_VIEWPORT_EDGE
    }
}

/// GPU-side uniform data for the camera.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_projection: [[f32; 4]; 4],
    /// World-space eye position (w unused).
    pub eye: [f32; 4],
}

impl CameraUniform {
    pub const FLOATS: usize = 20;

    /// View-projection (column-major) followed by the eye position.
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(std::slice::from_ref(self))
    }
}

/// Perspective camera that always looks at `target`.
#[derive(Debug, Clone)]
pub struct PerspectiveCamera {
    pub position: Vec3,
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    viewport: Viewport,
}

impl PerspectiveCamera {
    pub fn new(fov_y_degrees: f32, near: f32, far: f32, viewport: Viewport) -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 1.0),
            target: Vec3::ZERO,
            fov_y_degrees,
            near,
            far,
            viewport,
        }
    }

    /// Move the eye, keeping the look-at target.
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Track a new viewport size (sizes are clamped, see `Viewport::new`).
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = Viewport {
            width: sanitize_edge(viewport.width),
            height: sanitize_edge(viewport.height),
            ..viewport
        };
    }

    pub fn aspect(&self) -> f32 {
        self.viewport.aspect()
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    /// Right-handed perspective with depth in [0, 1] (WebGPU convention).
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fov_y_degrees.to_radians(),
            self.aspect(),
            self.near,
            self.far,
        )
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn uniform(&self) -> CameraUniform {
        CameraUniform {
            view_projection: self.view_projection().to_cols_array_2d(),
            eye: self.position.extend(1.0).to_array(),
        }
    }

    /// World-space ray from the eye through a point given in page pixels.
    pub fn ray_through(&self, x: f32, y: f32) -> Option<Ray> {
        let ndc = self.viewport.to_ndc(x, y);
        let inverse = self.view_projection().inverse();
        let far = inverse * ndc.extend(1.0).extend(1.0);
        if far.w.abs() < f32::EPSILON {
            return None;
        }
        let far = far.xyz() / far.w;
        Ray::new(self.position, far - self.position)
    }

    /// Project a world point into page pixels. `None` if behind the eye.
    pub fn project(&self, world: Vec3) -> Option<Vec2> {
        let clip = self.view_projection() * world.extend(1.0);
        if clip.w <= 0.0 {
            return None;
        }
        let ndc = clip.xy() / clip.w;
        Some(Vec2::new(
            self.viewport.left + (ndc.x + 1.0) * 0.5 * self.viewport.width,
            self.viewport.top + (1.0 - ndc.y) * 0.5 * self.viewport.height,
        ))
    }
}
