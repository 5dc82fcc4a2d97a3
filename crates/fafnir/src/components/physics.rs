//! Physics body descriptions, consumed by the external physics step.
//!
//! These components are plain data: the engine behind the
//! [`PhysicsEngine`](crate::services::PhysicsEngine) trait reads them,
//! simulates, and writes results back into the transform store. Nothing in
//! this core interprets them.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CollisionShape {
    #[default]
    Box,
    Sphere,
    Capsule,
    ConvexHull,
    TriangleMesh,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RigidBodyComponent {
    pub shape: CollisionShape,
    pub mass: f32,
    pub friction: f32,
    pub restitution: f32,
    pub damping: f32,
    /// Driven by gameplay, not by simulation.
    pub kinematic: bool,
    /// Excluded from the simulation without removing the component.
    pub disable_deactivation: bool,
}

impl Default for RigidBodyComponent {
    fn default() -> Self {
        Self {
            shape: CollisionShape::Box,
            mass: 1.0,
            friction: 0.5,
            restitution: 0.0,
            damping: 0.0,
            kinematic: false,
            disable_deactivation: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoftBodyComponent {
    pub mass: f32,
    pub friction: f32,
    /// Indices of mesh vertices pinned to the entity's transform.
    pub goal_vertex_indices: Vec<u32>,
    pub goal_strength: f32,
}

impl Default for SoftBodyComponent {
    fn default() -> Self {
        Self {
            mass: 1.0,
            friction: 0.5,
            goal_vertex_indices: Vec::new(),
            goal_strength: 1.0,
        }
    }
}
