//! Camera and picking-ray types shared with the web frontend.
//!
//! These types avoid referencing platform-specific APIs. The web frontend
//! feeds the canvas aspect in and reads the matrices back out for rendering.

use crate::constants::{CAMERA_FOVY_DEG, CAMERA_ZFAR, CAMERA_ZNEAR};
use glam::{Mat3, Mat4, Vec2, Vec3, Vec4};

/// Simple right-handed camera description with perspective projection.
#[derive(Clone, Debug)]
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
    /// Perspective camera at `eye` looking at `target` with the default lens.
    pub fn looking_at(eye: Vec3, target: Vec3) -> Self {
        Self {
            eye,
            target,
            up: Vec3::Y,
            aspect: 1.0,
            fovy_radians: CAMERA_FOVY_DEG.to_radians(),
            znear: CAMERA_ZNEAR,
            zfar: CAMERA_ZFAR,
        }
    }

    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }

    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Inverse of the projection times the view with its translation removed.
    /// Unprojecting an NDC point with it yields a world-space direction, which
    /// is what a background cube map is sampled with.
    pub fn inverse_sky_view_projection(&self) -> Mat4 {
        let rotation_only = Mat4::from_mat3(Mat3::from_mat4(self.view_matrix()));
        (self.projection_matrix() * rotation_only).inverse()
    }

    /// World-space ray from the eye through a point in normalized device
    /// coordinates (`x`, `y` in `[-1, 1]`, `y` up).
    pub fn ray_through_ndc(&self, ndc: Vec2) -> Ray {
        let inv = self.view_projection().inverse();
        let far = inv * Vec4::new(ndc.x, ndc.y, 1.0, 1.0);
        let far = far.truncate() / far.w;
        Ray::new(self.eye, far - self.eye)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    /// Build a ray; `dir` is normalized so hit distances are in world units.
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self {
            origin,
            dir: dir.normalize_or_zero(),
        }
    }

    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.dir * t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_ray_points_at_target() {
        let cam = Camera::looking_at(Vec3::new(0.0, 1.0, 3.0), Vec3::ZERO);
        let ray = cam.ray_through_ndc(Vec2::ZERO);
        let expected = (Vec3::ZERO - cam.eye).normalize();
        assert!(ray.dir.abs_diff_eq(expected, 1e-4), "{:?}", ray.dir);
        assert_eq!(ray.origin, cam.eye);
    }

    #[test]
    fn right_edge_ray_leans_right() {
        let mut cam = Camera::looking_at(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO);
        cam.aspect = 16.0 / 9.0;
        let ray = cam.ray_through_ndc(Vec2::new(1.0, 0.0));
        assert!(ray.dir.x > 0.0);
        assert!(ray.dir.z < 0.0);
        assert!(ray.dir.y.abs() < 1e-4);
    }

    #[test]
    fn sky_matrix_ignores_eye_position() {
        let near = Camera::looking_at(Vec3::new(0.0, 1.0, 3.0), Vec3::ZERO);
        let mut moved = near.clone();
        moved.eye += Vec3::new(-1.5, 0.3, 0.0);
        moved.target += Vec3::new(-1.5, 0.3, 0.0);
        assert!(near
            .inverse_sky_view_projection()
            .abs_diff_eq(moved.inverse_sky_view_projection(), 1e-4));

        let far = near.inverse_sky_view_projection() * Vec4::new(0.0, 0.0, 1.0, 1.0);
        let dir = (far.truncate() / far.w).normalize();
        let expected = (near.target - near.eye).normalize();
        assert!(dir.abs_diff_eq(expected, 1e-3), "{dir:?}");
    }
}
