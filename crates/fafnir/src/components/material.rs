//! Surface parameters plus per-frame texture animation state.
//!
//! Texture slots are stored both ways: the source *name* (what the asset
//! referenced) and the resolved [`TextureHandle`]. Resolution happens once
//! at creation through the
//! [`TextureResolver`](crate::services::TextureResolver) service — names
//! that don't load resolve to the solid-white fallback, so a handle that is
//! `Some` is always bindable. `None` means the slot was never assigned.

use glam::{Vec2, Vec4};
use serde::{Deserialize, Serialize};

use crate::services::TextureHandle;

/// How the surface blends into the framebuffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BlendMode {
    #[default]
    Opaque,
    Alpha,
    Premultiplied,
    Additive,
}

/// Stencil group the renderer tags this surface with, derived per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StencilRef {
    #[default]
    Default,
    Skin,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialComponent {
    pub base_color: Vec4,
    pub emissive: f32,
    pub roughness: f32,
    pub metalness: f32,
    pub reflectance: f32,
    pub subsurface_scattering: f32,
    pub blend_mode: BlendMode,
    pub cast_shadow: bool,
    pub water: bool,

    /// UV transform: xy scale, zw offset.
    pub tex_mul_add: Vec4,
    /// UV offset added per animation tick.
    pub tex_anim_direction: Vec2,
    /// Animation ticks per second; zero disables scrolling.
    pub tex_anim_frame_rate: f32,
    /// Countdown to the next animation tick.
    pub tex_anim_sleep: f32,

    pub base_color_map_name: String,
    pub normal_map_name: String,
    pub surface_map_name: String,
    pub base_color_map: Option<TextureHandle>,
    pub normal_map: Option<TextureHandle>,
    pub surface_map: Option<TextureHandle>,

    /// Derived each frame by the material pass.
    pub stencil_ref: StencilRef,

    /// Set when GPU-visible state changed and the host must refresh its
    /// constant buffer.
    dirty: bool,
}

impl Default for MaterialComponent {
    fn default() -> Self {
        Self {
            base_color: Vec4::ONE,
            emissive: 0.0,
            roughness: 0.2,
            metalness: 0.0,
            reflectance: 0.02,
            subsurface_scattering: 0.0,
            blend_mode: BlendMode::Opaque,
            cast_shadow: true,
            water: false,
            tex_mul_add: Vec4::new(1.0, 1.0, 0.0, 0.0),
            tex_anim_direction: Vec2::ZERO,
            tex_anim_frame_rate: 0.0,
            tex_anim_sleep: 0.0,
            base_color_map_name: String::new(),
            normal_map_name: String::new(),
            surface_map_name: String::new(),
            base_color_map: None,
            normal_map: None,
            surface_map: None,
            stencil_ref: StencilRef::Default,
            dirty: true,
        }
    }
}

impl MaterialComponent {
    pub fn is_transparent(&self) -> bool {
        self.blend_mode != BlendMode::Opaque
    }

    pub fn is_water(&self) -> bool {
        self.water
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn set_dirty(&mut self) {
        self.dirty = true;
    }

    /// Host acknowledges the constant-buffer refresh.
    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }
}
