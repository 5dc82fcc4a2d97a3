//! Common imports for scene hosts: `use fafnir::prelude::*`.

pub use crate::components::{
    AnimationChannel, AnimationComponent, AnimationSampler, ArmatureComponent, BlendMode,
    CameraComponent, ChannelPath, DecalComponent, EmitterComponent, EnvironmentProbeComponent,
    ForceFieldComponent, HairParticleComponent, HierarchyComponent, LayerComponent,
    LightComponent, LightType, MaterialComponent, MeshComponent, MeshSubset, NameComponent,
    ObjectComponent, PreviousFrameTransformComponent, RenderTypeMask, RigidBodyComponent,
    SamplerMode, SoftBodyComponent, TransformComponent, WeatherComponent,
};
pub use crate::ecs::{ComponentStore, Entity, EntityGenerator};
pub use crate::math::{Aabb, Mat4, Quat, Vec2, Vec3, Vec4};
pub use crate::scene::Scene;
pub use crate::services::{
    BufferHandle, BufferKind, NullPhysics, PhysicsEngine, RenderDevice, TextureHandle,
    TextureResolver,
};
