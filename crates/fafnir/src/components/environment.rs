//! Environment components: weather, force fields, reflection probes, and
//! decals.
//!
//! The derived fields on probes, forces, and decals are recomputed each
//! frame in the last derived-state stage; they are mutually independent, so
//! their pass order among each other doesn't matter.

use glam::{Mat4, Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::services::TextureHandle;

/// Scene-wide sky, sun, fog, and wind state. The scene mirrors its first
/// weather entity into `Scene::weather` at the top of every frame; the
/// directional-light pass then writes the sun fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherComponent {
    pub sun_color: Vec3,
    pub sun_direction: Vec3,
    pub horizon: Vec3,
    pub zenith: Vec3,
    pub ambient: Vec3,
    pub fog_start: f32,
    pub fog_end: f32,
    pub fog_height: f32,
    pub cloudiness: f32,
    pub wind_direction: Vec3,
    pub wind_randomness: f32,
    pub wind_wave_size: f32,
}

impl Default for WeatherComponent {
    fn default() -> Self {
        Self {
            sun_color: Vec3::ZERO,
            sun_direction: Vec3::Y,
            horizon: Vec3::splat(0.3),
            zenith: Vec3::new(0.0, 0.05, 0.2),
            ambient: Vec3::splat(0.2),
            fog_start: 100.0,
            fog_end: 1000.0,
            fog_height: 0.0,
            cloudiness: 0.0,
            wind_direction: Vec3::ZERO,
            wind_randomness: 0.5,
            wind_wave_size: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ForceFieldType {
    /// Attracts (or repels, with negative gravity) toward a point.
    #[default]
    Point,
    /// Pushes along a plane normal.
    Plane,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForceFieldComponent {
    pub field_type: ForceFieldType,
    pub gravity: f32,
    pub range: f32,

    // Derived per frame:
    pub position: Vec3,
    /// The transform's -Y axis in world space, normalized.
    pub direction: Vec3,
}

impl Default for ForceFieldComponent {
    fn default() -> Self {
        Self {
            field_type: ForceFieldType::Point,
            gravity: 0.0,
            range: 0.0,
            position: Vec3::ZERO,
            direction: Vec3::NEG_Y,
        }
    }
}

/// Environment reflection probe. The captured cubemap lives on the host;
/// this core derives the probe's placement volume.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentProbeComponent {
    pub realtime: bool,
    /// Host-side: capture needs to re-render.
    pub dirty: bool,

    // Derived per frame:
    pub position: Vec3,
    pub range: f32,
    /// World-to-probe-volume matrix for parallax correction.
    pub inverse_matrix: Mat4,
}

impl Default for EnvironmentProbeComponent {
    fn default() -> Self {
        Self {
            realtime: false,
            dirty: true,
            position: Vec3::ZERO,
            range: 1.0,
            inverse_matrix: Mat4::IDENTITY,
        }
    }
}

/// A projected decal. The unit cube under the entity's world transform is
/// the projection volume; textures come from the sibling material.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecalComponent {
    /// Atlas placement, managed by the host renderer.
    pub atlas_mul_add: Vec4,

    // Derived per frame:
    pub world: Mat4,
    pub position: Vec3,
    /// Projection direction: the transform's +Z axis in world space.
    pub front: Vec3,
    pub range: f32,
    pub color: Vec4,
    pub emissive: f32,
    pub texture: Option<TextureHandle>,
    pub normal: Option<TextureHandle>,
}

impl Default for DecalComponent {
    fn default() -> Self {
        Self {
            atlas_mul_add: Vec4::new(1.0, 1.0, 0.0, 0.0),
            world: Mat4::IDENTITY,
            position: Vec3::ZERO,
            front: Vec3::Z,
            range: 1.0,
            color: Vec4::ONE,
            emissive: 0.0,
            texture: None,
            normal: None,
        }
    }
}
