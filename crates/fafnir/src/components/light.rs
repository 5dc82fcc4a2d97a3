//! Light sources and their per-frame derived basis.
//!
//! Position, rotation, and direction are derived from the entity's world
//! transform each frame by the light pass; shadow-map camera placement
//! (cascades for directionals, cube faces for points) is the renderer's
//! job and happens outside this core.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LightType {
    Directional,
    #[default]
    Point,
    Spot,
    Sphere,
    Disc,
    Rectangle,
    Tube,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LightComponent {
    pub light_type: LightType,
    pub color: Vec3,
    pub energy: f32,
    pub range: f32,
    /// Cone angle in radians; spot lights only.
    pub fov: f32,
    pub cast_shadow: bool,
    /// Area-light extents; sphere/disc radius in x, rectangle in xy, tube
    /// length in x.
    pub area_size: Vec3,

    // Derived per frame from the world transform:
    pub position: Vec3,
    pub rotation: Quat,
    /// The transform's +Y axis in world space.
    pub direction: Vec3,
    /// Area-light basis vectors.
    pub right: Vec3,
    pub front: Vec3,
}

impl Default for LightComponent {
    fn default() -> Self {
        Self {
            light_type: LightType::Point,
            color: Vec3::ONE,
            energy: 1.0,
            range: 10.0,
            fov: std::f32::consts::FRAC_PI_4,
            cast_shadow: false,
            area_size: Vec3::ONE,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            direction: Vec3::Y,
            right: Vec3::X,
            front: Vec3::Z,
        }
    }
}

impl LightComponent {
    pub fn is_casting_shadow(&self) -> bool {
        self.cast_shadow
    }
}
