//! # Transform — Local S/R/T with a Cached World Matrix
//!
//! A [`TransformComponent`] stores its pose twice: as editable local
//! scale/rotation/translation fields, and as a cached world matrix derived
//! from them. A dirty flag ties the two together — every mutator sets it,
//! nothing recomputes eagerly, and the per-frame transform pass calls
//! [`recompute`](TransformComponent::recompute) exactly once per entity.
//!
//! ## Dirty Flag Lifecycle
//!
//! ```text
//! translate()/rotate()/...  ─→ Dirty
//! recompute()               ─→ world = S·R·T of locals, Clean
//! hierarchy pass            ─→ world = parent ∘ bind⁻¹ ∘ base (see below)
//! ```
//!
//! The parented update ([`update_parented`](TransformComponent::update_parented))
//! runs *after* the plain recompute pass each frame and must not apply the
//! parent a second time to a matrix that already includes it. Which base
//! matrix it combines from depends on whether the parent is still dirty —
//! see the function's own docs for the two branches.

use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::math::catmull_rom;

/// Local pose plus the cached world matrix derived from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformComponent {
    pub translation_local: Vec3,
    pub rotation_local: Quat,
    pub scale_local: Vec3,
    /// Cached world matrix. Valid after a recompute or hierarchy pass;
    /// under hierarchy propagation it also encodes the parent chain.
    pub world: Mat4,
    dirty: bool,
}

impl Default for TransformComponent {
    fn default() -> Self {
        Self {
            translation_local: Vec3::ZERO,
            rotation_local: Quat::IDENTITY,
            scale_local: Vec3::ONE,
            world: Mat4::IDENTITY,
            dirty: true,
        }
    }
}

impl TransformComponent {
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn set_dirty(&mut self) {
        self.dirty = true;
    }

    /// World-space position, read straight off the cached matrix.
    pub fn world_position(&self) -> Vec3 {
        self.world.w_axis.truncate()
    }

    /// World-space rotation, decomposed from the cached matrix.
    pub fn world_rotation(&self) -> Quat {
        let (_, rotation, _) = self.world.to_scale_rotation_translation();
        rotation
    }

    /// World-space scale, decomposed from the cached matrix.
    pub fn world_scale(&self) -> Vec3 {
        let (scale, _, _) = self.world.to_scale_rotation_translation();
        scale
    }

    /// Rebuild the world matrix from the local fields if dirty; no-op when
    /// clean. Scale is applied first, then rotation, then translation.
    pub fn recompute(&mut self) {
        if self.dirty {
            self.dirty = false;
            self.world = self.local_matrix();
        }
    }

    /// The local-only pose matrix, ignoring the cache and the parent chain.
    pub fn local_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            self.scale_local,
            self.rotation_local,
            self.translation_local,
        )
    }

    /// Combine this transform with its parent.
    ///
    /// Normally every transform is clean by the time the hierarchy pass
    /// runs (the plain recompute pass just cleared them), and the stored
    /// world matrix may still hold the *previous* hierarchy result — so the
    /// clean branch combines from the local fields to avoid applying the
    /// parent twice. If the parent is still dirty (it was touched outside
    /// the frame pass: an attach, a late mutation), the change is flowing
    /// down right now: keep this entity dirty too and combine from its
    /// current world matrix.
    ///
    /// Final world = parent world ∘ bind inverse ∘ base.
    pub fn update_parented(&mut self, parent: &TransformComponent, bind_inverse: Mat4) {
        let base = if parent.is_dirty() {
            self.dirty = true;
            self.world
        } else {
            self.local_matrix()
        };
        self.world = parent.world * bind_inverse * base;
    }

    /// Bake the current world matrix back into the local fields, replacing
    /// them. Used on detach so an entity keeps its world pose after losing
    /// its parent.
    pub fn apply_current_world(&mut self) {
        self.dirty = true;
        let (scale, rotation, translation) = self.world.to_scale_rotation_translation();
        self.scale_local = scale;
        self.rotation_local = rotation;
        self.translation_local = translation;
    }

    /// Reset the local fields to identity.
    pub fn clear_to_identity(&mut self) {
        self.dirty = true;
        self.translation_local = Vec3::ZERO;
        self.rotation_local = Quat::IDENTITY;
        self.scale_local = Vec3::ONE;
    }

    pub fn translate(&mut self, value: Vec3) {
        self.dirty = true;
        self.translation_local += value;
    }

    /// Compose a rotation onto the current local rotation (the new rotation
    /// is applied after the existing one), then renormalize.
    pub fn rotate(&mut self, value: Quat) {
        self.dirty = true;
        self.rotation_local = (value * self.rotation_local).normalize();
    }

    /// Per-axis Euler composition: pitch about the current local frame
    /// first, then yaw, then roll. Matches the usual editor gizmo feel;
    /// not equivalent to a single from-euler quaternion.
    pub fn rotate_roll_pitch_yaw(&mut self, value: Vec3) {
        self.dirty = true;
        let x = Quat::from_rotation_x(value.x);
        let y = Quat::from_rotation_y(value.y);
        let z = Quat::from_rotation_z(value.z);

        let mut q = self.rotation_local;
        q = q * x;
        q = y * q;
        q = q * z;
        self.rotation_local = q.normalize();
    }

    /// Multiply the local scale componentwise.
    pub fn scale(&mut self, value: Vec3) {
        self.dirty = true;
        self.scale_local *= value;
    }

    /// Decompose an arbitrary matrix and compose it with the current local
    /// fields: scales multiply, rotations compose, translations add.
    pub fn apply_matrix(&mut self, matrix: Mat4) {
        self.dirty = true;
        let (scale, rotation, translation) = matrix.to_scale_rotation_translation();
        self.scale_local *= scale;
        self.rotation_local = rotation * self.rotation_local;
        self.translation_local += translation;
    }

    /// Write the blend of two transforms' *world* poses into this one's
    /// local fields: linear for translation and scale, spherical
    /// (shortest-path, renormalized) for rotation. Marks dirty; the caller
    /// triggers the recompute.
    pub fn lerp(&mut self, a: &TransformComponent, b: &TransformComponent, t: f32) {
        self.dirty = true;

        let (a_scale, a_rotation, a_translation) = a.world.to_scale_rotation_translation();
        let (b_scale, b_rotation, b_translation) = b.world.to_scale_rotation_translation();

        self.scale_local = a_scale.lerp(b_scale, t);
        self.rotation_local = a_rotation.slerp(b_rotation, t).normalize();
        self.translation_local = a_translation.lerp(b_translation, t);
    }

    /// Four-point Catmull-Rom spline through the inputs' world poses.
    ///
    /// Rotation runs the spline over raw quaternion components and
    /// renormalizes — an approximation that degrades for large rotation
    /// deltas across the four samples.
    pub fn catmull_rom(
        &mut self,
        a: &TransformComponent,
        b: &TransformComponent,
        c: &TransformComponent,
        d: &TransformComponent,
        t: f32,
    ) {
        self.dirty = true;

        let (a_scale, a_rotation, a_translation) = a.world.to_scale_rotation_translation();
        let (b_scale, b_rotation, b_translation) = b.world.to_scale_rotation_translation();
        let (c_scale, c_rotation, c_translation) = c.world.to_scale_rotation_translation();
        let (d_scale, d_rotation, d_translation) = d.world.to_scale_rotation_translation();

        self.translation_local =
            catmull_rom(a_translation, b_translation, c_translation, d_translation, t);

        let rotation = catmull_rom(
            glam::Vec4::from(a_rotation),
            glam::Vec4::from(b_rotation),
            glam::Vec4::from(c_rotation),
            glam::Vec4::from(d_rotation),
            t,
        );
        self.rotation_local = Quat::from_vec4(rotation).normalize();

        self.scale_local = catmull_rom(a_scale, b_scale, c_scale, d_scale, t);
    }
}

/// Last frame's world matrix, snapshotted at the top of every frame before
/// any system writes transforms. Renderers read it for motion vectors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviousFrameTransformComponent {
    pub world_prev: Mat4,
}

impl Default for PreviousFrameTransformComponent {
    fn default() -> Self {
        Self {
            world_prev: Mat4::IDENTITY,
        }
    }
}
