//! Skeletons: bone entity lists and the skinning matrices derived from
//! them.
//!
//! Bones are ordinary entities with transforms, usually parented into a
//! chain through the hierarchy store — which is why the skinning pass runs
//! after hierarchy propagation. The armature pass composes, per bone:
//! remap ∘ bone world ∘ inverse bind, into `skinning_matrices` for the
//! host's skinning shader.

use glam::Mat4;
use serde::{Deserialize, Serialize};

use crate::ecs::Entity;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArmatureComponent {
    /// One entity per bone, in the order the skin indices reference them.
    pub bone_collection: Vec<Entity>,
    /// One inverse bind matrix per bone, captured at skinning time.
    pub inverse_bind_matrices: Vec<Mat4>,
    /// Maps the armature's rest space into the model's space.
    pub remap_matrix: Mat4,

    /// Derived per frame; same length as `bone_collection`.
    #[serde(skip)]
    pub skinning_matrices: Vec<Mat4>,
}
