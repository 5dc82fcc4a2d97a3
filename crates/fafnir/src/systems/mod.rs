//! The per-frame systems, in their fixed pass order.
//!
//! [`Scene::update`](crate::scene::Scene::update) runs these once per
//! frame, in order:
//!
//! | stage | pass |
//! |-------|------|
//! | 1  | [`run_previous_frame_transform_update`] |
//! | 2  | [`run_animation_update`] |
//! | 3  | external physics step |
//! | 4  | [`run_transform_update`] |
//! | 5  | [`run_hierarchy_update`] |
//! | 6  | [`run_armature_update`] |
//! | 7  | [`run_material_update`] |
//! | 8  | [`run_object_update`] |
//! | 9  | [`run_camera_update`] |
//! | 10 | [`run_decal_update`], [`run_probe_update`], [`run_force_update`], [`run_light_update`] |
//! | 11 | [`run_particle_update`] |
//!
//! The order is a correctness invariant: animation writes local fields and
//! must precede the local recompute; anything reading a parented entity's
//! transform must run after hierarchy propagation. The four stage-10
//! passes are mutually independent.
//!
//! Each pass is a free function over the stores it touches, so hosts that
//! don't use [`Scene`](crate::scene::Scene) can assemble their own loop
//! from the same parts — as long as they keep the barriers.

pub mod animation;
pub mod derived;
pub mod transform;

pub use animation::run_animation_update;
pub use derived::{
    is_renderable, run_armature_update, run_camera_update, run_decal_update, run_force_update,
    run_light_update, run_material_update, run_object_update, run_particle_update,
    run_probe_update,
};
pub use transform::{
    run_hierarchy_update, run_previous_frame_transform_update, run_transform_update,
};
