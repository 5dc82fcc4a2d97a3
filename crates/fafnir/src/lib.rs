//! # Fafnir — Scene-Graph Core for a Real-Time Engine
//!
//! Generic entity/component storage plus the ordered per-frame systems
//! that keep transforms, hierarchy, and animation state consistent. No
//! rendering, no physics, no asset import — those are external
//! collaborators behind the traits in [`services`].
//!
//! Start with `use fafnir::prelude::*`, build a [`Scene`](scene::Scene),
//! and call [`Scene::update`](scene::Scene::update) once per frame.

pub mod components;
pub mod ecs;
pub mod math;
pub mod prelude;
pub mod scene;
pub mod services;
pub mod systems;
