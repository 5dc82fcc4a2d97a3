//! All component kinds the scene stores.
//!
//! A component is plain data; an entity "is" whatever components it has.
//! The factories on [`Scene`](crate::scene::Scene) populate conventional
//! sets (an object gets name + layer + transform + bounds + object), but
//! nothing enforces those combinations — every system checks for the
//! components it needs and skips entities missing them.

pub mod animation;
pub mod armature;
pub mod camera;
pub mod environment;
pub mod hierarchy;
pub mod light;
pub mod material;
pub mod mesh;
pub mod object;
pub mod particles;
pub mod physics;
pub mod transform;

pub use animation::{
    AnimationChannel, AnimationComponent, AnimationSampler, ChannelPath, SamplerMode,
};
pub use armature::ArmatureComponent;
pub use camera::CameraComponent;
pub use environment::{
    DecalComponent, EnvironmentProbeComponent, ForceFieldComponent, ForceFieldType,
    WeatherComponent,
};
pub use hierarchy::HierarchyComponent;
pub use light::{LightComponent, LightType};
pub use material::{BlendMode, MaterialComponent, StencilRef};
pub use mesh::{MeshComponent, MeshSubset};
pub use object::{ObjectComponent, RenderTypeMask};
pub use particles::{EmitterComponent, HairParticleComponent};
pub use physics::{CollisionShape, RigidBodyComponent, SoftBodyComponent};
pub use transform::{PreviousFrameTransformComponent, TransformComponent};

use serde::{Deserialize, Serialize};

/// A display name. Scene lookup by name is a linear scan — names are a
/// tooling affordance, not an index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameComponent {
    pub name: String,
}

impl NameComponent {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl PartialEq<str> for NameComponent {
    fn eq(&self, other: &str) -> bool {
        self.name == other
    }
}

/// A 32-bit visibility/collision mask. Hierarchy propagation ANDs a
/// child's attach-time mask with its parent's current mask, so masks only
/// ever narrow going down a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerComponent {
    pub mask: u32,
}

impl Default for LayerComponent {
    fn default() -> Self {
        Self { mask: u32::MAX }
    }
}

impl LayerComponent {
    pub fn mask(&self) -> u32 {
        self.mask
    }
}
