//! Parent links with attach-time bind state.
//!
//! A [`HierarchyComponent`] on an entity makes it a child of `parent`. The
//! link caches two things captured at attach time: the inverse of the
//! parent's world matrix (so the child's world pose is continuous across
//! re-parenting) and the child's layer mask (so detaching can restore it).
//!
//! The hierarchy *store* carries an ordering guarantee the component itself
//! can't express: for any two linked entities where one was an ancestor of
//! the other at attach time, the ancestor's link precedes the descendant's
//! in iteration order. Attachment maintains this with a single-level
//! bubble-move (see `Scene::attach`), not a full topological sort.

use glam::Mat4;
use serde::{Deserialize, Serialize};

use crate::ecs::Entity;

/// Child-side link to a parent entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HierarchyComponent {
    pub parent: Entity,
    /// Inverse of the parent's world matrix at attach time.
    pub bind_inverse: Mat4,
    /// The child's layer mask at attach time, restored on detach.
    pub layer_mask_bind: u32,
}

impl Default for HierarchyComponent {
    fn default() -> Self {
        Self {
            parent: Entity::INVALID,
            bind_inverse: Mat4::IDENTITY,
            layer_mask_bind: u32::MAX,
        }
    }
}
