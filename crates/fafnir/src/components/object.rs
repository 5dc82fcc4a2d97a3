//! Renderable object: a mesh reference plus per-frame derived render state.
//!
//! Everything except `mesh_id` is recomputed by the object pass each frame
//! (stage 8) from the entity's transform, the referenced mesh, and the
//! mesh's materials. A renderer reads these fields after `Scene::update`
//! returns; it never needs to chase the mesh/material stores itself for
//! culling and queue sorting.

use bitflags::bitflags;
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::ecs::Entity;

bitflags! {
    /// Which render queues this object participates in, derived from its
    /// materials.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
    pub struct RenderTypeMask: u32 {
        const OPAQUE = 1 << 0;
        const TRANSPARENT = 1 << 1;
        const WATER = 1 << 2;
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectComponent {
    /// The mesh entity this object instances. [`Entity::INVALID`] renders
    /// nothing.
    pub mesh_id: Entity,

    // Derived per frame:
    pub position: Vec3,
    pub render_type: RenderTypeMask,
    pub dynamic: bool,
    pub cast_shadow: bool,
}

impl Default for ObjectComponent {
    fn default() -> Self {
        Self {
            mesh_id: Entity::INVALID,
            position: Vec3::ZERO,
            render_type: RenderTypeMask::empty(),
            dynamic: false,
            cast_shadow: false,
        }
    }
}
