//! # Services — External Collaborators as Explicit Objects
//!
//! The scene core consumes three outside systems: a GPU resource layer, a
//! texture loader, and a physics engine. Each is a trait passed into the
//! call that needs it — there is no process-wide singleton to look up, so
//! hosts and tests can substitute their own implementations freely.
//!
//! ## The Handle Pattern
//!
//! GPU resources never cross this boundary as live objects. Uploading
//! returns a [`BufferHandle`] / [`TextureHandle`] — a cheap, copyable token
//! the host's renderer maps back to the real resource. Components stay
//! `Copy`-friendly and resource lifetime stays on the host's side.

use serde::{Deserialize, Serialize};

use crate::components::{
    MeshComponent, ObjectComponent, RigidBodyComponent, SoftBodyComponent, TransformComponent,
    WeatherComponent,
};
use crate::ecs::ComponentStore;

/// Opaque token for an uploaded GPU buffer. Lightweight and `Copy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BufferHandle(pub u64);

/// Opaque token for a resolved texture. Lightweight and `Copy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextureHandle(pub u64);

/// What an uploaded buffer will be bound as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferKind {
    Vertex,
    Index,
}

/// GPU resource creation: raw bytes in, opaque handle out.
///
/// Mesh finalization packs vertex arrays and hands them here; everything
/// else about buffer management belongs to the host.
pub trait RenderDevice {
    fn upload_buffer(&mut self, kind: BufferKind, bytes: &[u8]) -> BufferHandle;
}

/// Resolves texture names to handles.
///
/// `resolve` never fails: a name that can't be loaded yields the same
/// fallback handle as [`white`](TextureResolver::white) (a solid-white
/// texture), so materials can always be bound.
pub trait TextureResolver {
    fn resolve(&mut self, name: &str) -> TextureHandle;

    /// The solid-white fallback texture.
    fn white(&self) -> TextureHandle;
}

/// The black-box physics step, run once per frame between animation
/// sampling and the local transform recompute.
///
/// The engine may write transforms in place (ragdolls, dynamic bodies) and
/// update rigid/soft body state. It must mark any transform it writes as
/// dirty so the recompute and hierarchy passes pick the change up.
pub trait PhysicsEngine {
    #[allow(clippy::too_many_arguments)]
    fn step(
        &mut self,
        weather: &WeatherComponent,
        transforms: &mut ComponentStore<TransformComponent>,
        meshes: &ComponentStore<MeshComponent>,
        objects: &ComponentStore<ObjectComponent>,
        rigidbodies: &mut ComponentStore<RigidBodyComponent>,
        softbodies: &mut ComponentStore<SoftBodyComponent>,
        dt: f32,
    );
}

/// A physics engine that does nothing. For hosts without physics, and for
/// tests that only exercise the scene systems.
#[derive(Debug, Default)]
pub struct NullPhysics;

impl PhysicsEngine for NullPhysics {
    fn step(
        &mut self,
        _weather: &WeatherComponent,
        _transforms: &mut ComponentStore<TransformComponent>,
        _meshes: &ComponentStore<MeshComponent>,
        _objects: &ComponentStore<ObjectComponent>,
        _rigidbodies: &mut ComponentStore<RigidBodyComponent>,
        _softbodies: &mut ComponentStore<SoftBodyComponent>,
        _dt: f32,
    ) {
    }
}
