//! Camera parameters and the matrices derived from them.
//!
//! Projection uses a left-handed reversed-Z convention: the `projection`
//! matrix swaps near/far for better depth precision, while
//! `real_projection` keeps the conventional order for consumers that need
//! linear depth (frustum construction, cascade fitting — both external to
//! this core).

use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::transform::TransformComponent;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraComponent {
    pub width: f32,
    pub height: f32,
    pub z_near: f32,
    pub z_far: f32,
    /// Vertical field of view in radians.
    pub fov: f32,

    pub eye: Vec3,
    pub at: Vec3,
    pub up: Vec3,

    /// Reversed-Z projection.
    pub projection: Mat4,
    /// Conventional-Z projection.
    pub real_projection: Mat4,
    pub view: Mat4,
    pub view_projection: Mat4,
    pub inv_view: Mat4,
    pub inv_projection: Mat4,
    pub inv_view_projection: Mat4,
}

impl Default for CameraComponent {
    fn default() -> Self {
        let mut camera = Self {
            width: 16.0,
            height: 9.0,
            z_near: 0.1,
            z_far: 800.0,
            fov: std::f32::consts::FRAC_PI_3,
            eye: Vec3::ZERO,
            at: Vec3::Z,
            up: Vec3::Y,
            projection: Mat4::IDENTITY,
            real_projection: Mat4::IDENTITY,
            view: Mat4::IDENTITY,
            view_projection: Mat4::IDENTITY,
            inv_view: Mat4::IDENTITY,
            inv_projection: Mat4::IDENTITY,
            inv_view_projection: Mat4::IDENTITY,
        };
        camera.update_projection();
        camera.update(None);
        camera
    }
}

impl CameraComponent {
    /// Set perspective parameters and rebuild everything.
    pub fn create_perspective(&mut self, width: f32, height: f32, z_near: f32, z_far: f32, fov: f32) {
        self.width = width;
        self.height = height;
        self.z_near = z_near;
        self.z_far = z_far;
        self.fov = fov;
        self.eye = Vec3::ZERO;
        self.at = Vec3::Z;
        self.up = Vec3::Y;
        self.update_projection();
        self.update(None);
    }

    pub fn update_projection(&mut self) {
        let aspect = self.width / self.height;
        self.projection = Mat4::perspective_lh(self.fov, aspect, self.z_far, self.z_near);
        self.real_projection = Mat4::perspective_lh(self.fov, aspect, self.z_near, self.z_far);
    }

    /// Rebuild the view-dependent matrices.
    ///
    /// With a transform, the camera basis is decomposed from its world
    /// matrix (eye at the translation, looking along the rotated +Z, up
    /// along the rotated +Y). Without one, the stored eye/at/up are used
    /// as-is.
    pub fn update(&mut self, transform: Option<&TransformComponent>) {
        if let Some(transform) = transform {
            let (_, rotation, translation) = transform.world.to_scale_rotation_translation();
            self.eye = translation;
            self.at = rotation * Vec3::Z;
            self.up = rotation * Vec3::Y;
        }

        self.view = Mat4::look_to_lh(self.eye, self.at, self.up);
        self.view_projection = self.projection * self.view;
        self.inv_view = self.view.inverse();
        self.inv_projection = self.projection.inverse();
        self.inv_view_projection = self.view_projection.inverse();
    }

    /// World-space camera rotation, recovered from the inverse view.
    pub fn rotation(&self) -> Quat {
        let (_, rotation, _) = self.inv_view.to_scale_rotation_translation();
        rotation
    }
}
