//! Perspective camera and screen-space conversions.
//!
//! These types avoid platform-specific APIs so the projection and picking
//! math can be exercised on the host.

use super::framing::CameraState;
use glam::{Mat4, Vec3, Vec4};

pub const CAMERA_ZNEAR: f32 = 0.1;
pub const CAMERA_ZFAR: f32 = 1000.0;

/// Right-handed camera looking down -Z at the origin.
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    pub fn from_state(state: &CameraState, aspect: f64) -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, state.distance_z as f32),
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect: aspect.max(1e-6) as f32,
            fovy_radians: (state.fov_deg as f32).to_radians(),
            znear: CAMERA_ZNEAR,
            zfar: CAMERA_ZFAR,
        }
    }

    /// Projection for the renderer (depth in 0..1).
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }

    /// Projection with depth in -1..1, used for marker visibility tests.
    pub fn projection_matrix_gl(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    /// World-space ray through a point given in CSS px relative to the render
    /// surface's bounding rect. Returns `(origin, direction)`.
    pub fn ray_through(&self, x_css: f32, y_css: f32, width: f32, height: f32) -> (Vec3, Vec3) {
        let w = width.max(1.0);
        let h = height.max(1.0);
        let ndc_x = (2.0 * x_css / w) - 1.0;
        let ndc_y = 1.0 - (2.0 * y_css / h);
        let inv = (self.projection_matrix() * self.view_matrix()).inverse();
        let p_far = inv * Vec4::new(ndc_x, ndc_y, 1.0, 1.0);
        let p1: Vec3 = p_far.truncate() / p_far.w;
        let ro = self.eye;
        let rd = (p1 - ro).normalize_or_zero();
        (ro, rd)
    }
}

/// Smallest non-negative ray parameter where the ray meets the sphere.
#[inline]
pub fn ray_sphere(ray_origin: Vec3, ray_dir: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let oc = ray_origin - center;
    let b = oc.dot(ray_dir);
    let c = oc.dot(oc) - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let sq = disc.sqrt();
    let t = -b - sq;
    if t >= 0.0 {
        return Some(t);
    }
    // Origin inside the sphere.
    let t_exit = -b + sq;
    (t_exit >= 0.0).then_some(0.0)
}
