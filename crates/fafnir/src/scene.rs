//! # Scene — Store Ownership, Entity Lifecycle, and the Frame Loop
//!
//! The [`Scene`] owns one [`ComponentStore`] per component kind, all keyed
//! by a shared entity namespace. It is the only owner: components never
//! hold references to each other, only entity ids that are re-resolved
//! through the stores every pass. That makes removal and reordering
//! between frames safe by construction — a stale id just fails its lookup.
//!
//! ## Entity Factories
//!
//! `create_*_entity` functions allocate one id and populate the minimal
//! component set for that kind of thing. The sets are a naming convention,
//! not a schema: nothing stops a host from removing a component later or
//! gluing unrelated ones on, and no system assumes component X implies
//! component Y without checking.
//!
//! ## The Frame
//!
//! [`update`](Scene::update) runs the eleven fixed stages documented in
//! [`systems`](crate::systems), synchronously, to completion. The pass
//! order is a correctness invariant; see the module docs there.

use glam::{Vec3, Vec4};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::components::{
    AnimationComponent, ArmatureComponent, BlendMode, CameraComponent, DecalComponent,
    EmitterComponent, EnvironmentProbeComponent, ForceFieldComponent, HairParticleComponent,
    HierarchyComponent, LayerComponent, LightComponent, LightType, MaterialComponent,
    MeshComponent, NameComponent, ObjectComponent, PreviousFrameTransformComponent,
    RigidBodyComponent, SoftBodyComponent, TransformComponent, WeatherComponent,
};
use crate::ecs::{ComponentStore, Entity, EntityGenerator};
use crate::math::Aabb;
use crate::services::{PhysicsEngine, TextureResolver};
use crate::systems;

/// The aggregate owner of all component stores under one entity namespace.
pub struct Scene {
    pub names: ComponentStore<NameComponent>,
    pub layers: ComponentStore<LayerComponent>,
    pub transforms: ComponentStore<TransformComponent>,
    pub prev_transforms: ComponentStore<PreviousFrameTransformComponent>,
    pub hierarchy: ComponentStore<HierarchyComponent>,
    pub materials: ComponentStore<MaterialComponent>,
    pub meshes: ComponentStore<MeshComponent>,
    pub objects: ComponentStore<ObjectComponent>,
    pub aabb_objects: ComponentStore<Aabb>,
    pub rigidbodies: ComponentStore<RigidBodyComponent>,
    pub softbodies: ComponentStore<SoftBodyComponent>,
    pub armatures: ComponentStore<ArmatureComponent>,
    pub lights: ComponentStore<LightComponent>,
    pub aabb_lights: ComponentStore<Aabb>,
    pub cameras: ComponentStore<CameraComponent>,
    pub probes: ComponentStore<EnvironmentProbeComponent>,
    pub aabb_probes: ComponentStore<Aabb>,
    pub forces: ComponentStore<ForceFieldComponent>,
    pub decals: ComponentStore<DecalComponent>,
    pub aabb_decals: ComponentStore<Aabb>,
    pub animations: ComponentStore<AnimationComponent>,
    pub emitters: ComponentStore<EmitterComponent>,
    pub hairs: ComponentStore<HairParticleComponent>,
    pub weathers: ComponentStore<WeatherComponent>,

    /// Union of every object's world-space bounds, rebuilt each frame.
    pub bounds: Aabb,
    /// Mirror of the first weather entity, refreshed each frame.
    pub weather: WeatherComponent,
    /// Plane of the most recently seen water surface.
    pub water_plane: Vec4,

    generator: EntityGenerator,
    rng: StdRng,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        // Wall-clock seeding is enough here: the RNG only feeds duplicate
        // ids, which need uniqueness, not unpredictability.
        let seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0);
        Self::with_rng_seed(seed)
    }

    /// A scene with a deterministic duplication RNG. Ids from
    /// [`create_entity`](Self::create_entity) are deterministic either way.
    pub fn with_rng_seed(seed: u64) -> Self {
        Self {
            names: ComponentStore::new(),
            layers: ComponentStore::new(),
            transforms: ComponentStore::new(),
            prev_transforms: ComponentStore::new(),
            hierarchy: ComponentStore::new(),
            materials: ComponentStore::new(),
            meshes: ComponentStore::new(),
            objects: ComponentStore::new(),
            aabb_objects: ComponentStore::new(),
            rigidbodies: ComponentStore::new(),
            softbodies: ComponentStore::new(),
            armatures: ComponentStore::new(),
            lights: ComponentStore::new(),
            aabb_lights: ComponentStore::new(),
            cameras: ComponentStore::new(),
            probes: ComponentStore::new(),
            aabb_probes: ComponentStore::new(),
            forces: ComponentStore::new(),
            decals: ComponentStore::new(),
            aabb_decals: ComponentStore::new(),
            animations: ComponentStore::new(),
            emitters: ComponentStore::new(),
            hairs: ComponentStore::new(),
            weathers: ComponentStore::new(),
            bounds: Aabb::default(),
            weather: WeatherComponent::default(),
            water_plane: Vec4::new(0.0, 1.0, 0.0, 0.0),
            generator: EntityGenerator::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Allocate a fresh entity id. The id belongs to no store until
    /// something is created for it.
    pub fn create_entity(&mut self) -> Entity {
        self.generator.generate()
    }

    // ── Frame update ─────────────────────────────────────────────────

    /// Run one frame: the eleven fixed stages, synchronously, to
    /// completion. `physics` is the external stage-3 collaborator; pass
    /// [`NullPhysics`](crate::services::NullPhysics) when there is none.
    pub fn update(&mut self, physics: &mut dyn PhysicsEngine, dt: f32) {
        if !self.weathers.is_empty() {
            self.weather = self.weathers[0].clone();
        }

        systems::run_previous_frame_transform_update(&self.transforms, &mut self.prev_transforms);

        systems::run_animation_update(&mut self.animations, &mut self.transforms, dt);

        physics.step(
            &self.weather,
            &mut self.transforms,
            &self.meshes,
            &self.objects,
            &mut self.rigidbodies,
            &mut self.softbodies,
            dt,
        );

        systems::run_transform_update(&mut self.transforms);

        systems::run_hierarchy_update(&self.hierarchy, &mut self.transforms, &mut self.layers);

        systems::run_armature_update(&self.transforms, &mut self.armatures);

        systems::run_material_update(&mut self.materials, dt);

        systems::run_object_update(
            &self.transforms,
            &self.meshes,
            &self.materials,
            &mut self.objects,
            &mut self.aabb_objects,
            &mut self.bounds,
            &mut self.water_plane,
        );

        systems::run_camera_update(&self.transforms, &mut self.cameras);

        systems::run_decal_update(
            &self.transforms,
            &self.materials,
            &mut self.aabb_decals,
            &mut self.decals,
        );

        systems::run_probe_update(&self.transforms, &mut self.aabb_probes, &mut self.probes);

        systems::run_force_update(&self.transforms, &mut self.forces);

        systems::run_light_update(
            &self.transforms,
            &mut self.aabb_lights,
            &mut self.lights,
            &mut self.weather,
        );

        systems::run_particle_update(
            &self.transforms,
            &self.meshes,
            &mut self.emitters,
            &mut self.hairs,
            dt,
        );
    }

    // ── Scene-level operations ───────────────────────────────────────

    /// Empty every store and reset the derived state. Entity ids are not
    /// recycled.
    pub fn clear(&mut self) {
        self.names.clear();
        self.layers.clear();
        self.transforms.clear();
        self.prev_transforms.clear();
        self.hierarchy.clear();
        self.materials.clear();
        self.meshes.clear();
        self.objects.clear();
        self.aabb_objects.clear();
        self.rigidbodies.clear();
        self.softbodies.clear();
        self.armatures.clear();
        self.lights.clear();
        self.aabb_lights.clear();
        self.cameras.clear();
        self.probes.clear();
        self.aabb_probes.clear();
        self.forces.clear();
        self.decals.clear();
        self.aabb_decals.clear();
        self.animations.clear();
        self.emitters.clear();
        self.hairs.clear();
        self.weathers.clear();
        self.bounds = Aabb::default();
    }

    /// Absorb another scene's contents, leaving it empty.
    ///
    /// Caller contract: the two scenes' entity namespaces are disjoint (a
    /// loader-side remap guarantees this before merging). The scene
    /// bounding volume becomes the union of both.
    pub fn merge(&mut self, other: &mut Scene) {
        log::debug!(
            "merging scene: {} entities into {}",
            other.count_entities(),
            self.count_entities()
        );

        self.names.merge(&mut other.names);
        self.layers.merge(&mut other.layers);
        self.transforms.merge(&mut other.transforms);
        self.prev_transforms.merge(&mut other.prev_transforms);
        self.hierarchy.merge(&mut other.hierarchy);
        self.materials.merge(&mut other.materials);
        self.meshes.merge(&mut other.meshes);
        self.objects.merge(&mut other.objects);
        self.aabb_objects.merge(&mut other.aabb_objects);
        self.rigidbodies.merge(&mut other.rigidbodies);
        self.softbodies.merge(&mut other.softbodies);
        self.armatures.merge(&mut other.armatures);
        self.lights.merge(&mut other.lights);
        self.aabb_lights.merge(&mut other.aabb_lights);
        self.cameras.merge(&mut other.cameras);
        self.probes.merge(&mut other.probes);
        self.aabb_probes.merge(&mut other.aabb_probes);
        self.forces.merge(&mut other.forces);
        self.decals.merge(&mut other.decals);
        self.aabb_decals.merge(&mut other.aabb_decals);
        self.animations.merge(&mut other.animations);
        self.emitters.merge(&mut other.emitters);
        self.hairs.merge(&mut other.hairs);
        self.weathers.merge(&mut other.weathers);

        self.bounds = Aabb::merge(self.bounds, other.bounds);
    }

    /// Upper bound on distinct entities: ids are unique within a store, so
    /// the most populated store is the count.
    pub fn count_entities(&self) -> usize {
        let mut count = 0;
        count = count.max(self.names.len());
        count = count.max(self.layers.len());
        count = count.max(self.transforms.len());
        count = count.max(self.prev_transforms.len());
        count = count.max(self.hierarchy.len());
        count = count.max(self.materials.len());
        count = count.max(self.meshes.len());
        count = count.max(self.objects.len());
        count = count.max(self.aabb_objects.len());
        count = count.max(self.rigidbodies.len());
        count = count.max(self.softbodies.len());
        count = count.max(self.armatures.len());
        count = count.max(self.lights.len());
        count = count.max(self.aabb_lights.len());
        count = count.max(self.cameras.len());
        count = count.max(self.probes.len());
        count = count.max(self.aabb_probes.len());
        count = count.max(self.forces.len());
        count = count.max(self.decals.len());
        count = count.max(self.aabb_decals.len());
        count = count.max(self.animations.len());
        count = count.max(self.emitters.len());
        count = count.max(self.hairs.len());
        count
    }

    // ── Entity lifecycle ─────────────────────────────────────────────

    /// Remove an entity from every store. Stores that don't have it are
    /// no-ops; the hierarchy store keeps its ordering guarantee.
    pub fn remove(&mut self, entity: Entity) {
        self.names.remove(entity);
        self.layers.remove(entity);
        self.transforms.remove(entity);
        self.prev_transforms.remove(entity);
        self.hierarchy.remove_keep_sorted(entity);
        self.materials.remove(entity);
        self.meshes.remove(entity);
        self.objects.remove(entity);
        self.aabb_objects.remove(entity);
        self.rigidbodies.remove(entity);
        self.softbodies.remove(entity);
        self.armatures.remove(entity);
        self.lights.remove(entity);
        self.aabb_lights.remove(entity);
        self.cameras.remove(entity);
        self.probes.remove(entity);
        self.aabb_probes.remove(entity);
        self.forces.remove(entity);
        self.decals.remove(entity);
        self.aabb_decals.remove(entity);
        self.animations.remove(entity);
        self.emitters.remove(entity);
        self.hairs.remove(entity);
        self.weathers.remove(entity);
    }

    /// Linear scan for the first entity with this name.
    pub fn find_by_name(&self, name: &str) -> Option<Entity> {
        self.names
            .iter()
            .find(|(_, n)| n.name == name)
            .map(|(entity, _)| entity)
    }

    /// Deep-copy an entity's full component set under a fresh random id.
    ///
    /// The component set round-trips through a transient byte buffer, so
    /// the copy shares no instance with the original. Entity *references*
    /// inside components (an object's mesh, a link's parent) still point
    /// at the original targets — the copy is a sibling, not a subtree
    /// clone. Returns [`Entity::INVALID`] if the round-trip fails.
    pub fn duplicate(&mut self, entity: Entity) -> Entity {
        let archive = self.archive_entity(entity);
        let bytes = match serde_json::to_vec(&archive) {
            Ok(bytes) => bytes,
            Err(err) => {
                log::error!("failed to serialize {entity:?} for duplication: {err}");
                return Entity::INVALID;
            }
        };
        let archive: EntityArchive = match serde_json::from_slice(&bytes) {
            Ok(archive) => archive,
            Err(err) => {
                log::error!("failed to deserialize duplicated {entity:?}: {err}");
                return Entity::INVALID;
            }
        };

        let fresh = EntityGenerator::random(&mut self.rng, entity);
        self.restore_entity(fresh, archive);
        fresh
    }

    // ── Factories ────────────────────────────────────────────────────

    pub fn create_material_entity(&mut self, name: &str) -> Entity {
        let entity = self.create_entity();
        *self.names.create(entity) = NameComponent::new(name);
        self.materials.create(entity);
        entity
    }

    pub fn create_mesh_entity(&mut self, name: &str) -> Entity {
        let entity = self.create_entity();
        *self.names.create(entity) = NameComponent::new(name);
        self.meshes.create(entity);
        entity
    }

    pub fn create_object_entity(&mut self, name: &str) -> Entity {
        let entity = self.create_entity();
        *self.names.create(entity) = NameComponent::new(name);
        self.layers.create(entity);
        self.transforms.create(entity);
        self.prev_transforms.create(entity);
        self.aabb_objects.create(entity);
        self.objects.create(entity);
        entity
    }

    pub fn create_light_entity(
        &mut self,
        name: &str,
        position: Vec3,
        color: Vec3,
        energy: f32,
        range: f32,
    ) -> Entity {
        let entity = self.create_entity();
        *self.names.create(entity) = NameComponent::new(name);
        self.layers.create(entity);

        let transform = self.transforms.create(entity);
        transform.translate(position);
        transform.recompute();

        *self.aabb_lights.create(entity) = Aabb::from_half_width(position, Vec3::splat(range));

        let light = self.lights.create(entity);
        light.light_type = LightType::Point;
        light.color = color;
        light.energy = energy;
        light.range = range;
        light.fov = std::f32::consts::FRAC_PI_4;

        entity
    }

    pub fn create_force_entity(&mut self, name: &str, position: Vec3) -> Entity {
        let entity = self.create_entity();
        *self.names.create(entity) = NameComponent::new(name);
        self.layers.create(entity);

        let transform = self.transforms.create(entity);
        transform.translate(position);
        transform.recompute();

        self.forces.create(entity);
        entity
    }

    pub fn create_probe_entity(&mut self, name: &str, position: Vec3) -> Entity {
        let entity = self.create_entity();
        *self.names.create(entity) = NameComponent::new(name);
        self.layers.create(entity);

        let transform = self.transforms.create(entity);
        transform.translate(position);
        transform.recompute();

        self.aabb_probes.create(entity);
        self.probes.create(entity);
        entity
    }

    pub fn create_decal_entity(
        &mut self,
        name: &str,
        texture_name: &str,
        normal_map_name: &str,
        textures: &mut dyn TextureResolver,
    ) -> Entity {
        let entity = self.create_entity();
        *self.names.create(entity) = NameComponent::new(name);
        self.layers.create(entity);
        self.transforms.create(entity);
        self.aabb_decals.create(entity);
        self.decals.create(entity);

        let material = self.materials.create(entity);
        if !texture_name.is_empty() {
            material.base_color_map_name = texture_name.to_owned();
            material.base_color_map = Some(textures.resolve(texture_name));
        }
        if !normal_map_name.is_empty() {
            material.normal_map_name = normal_map_name.to_owned();
            material.normal_map = Some(textures.resolve(normal_map_name));
        }

        entity
    }

    pub fn create_camera_entity(
        &mut self,
        name: &str,
        width: f32,
        height: f32,
        z_near: f32,
        z_far: f32,
        fov: f32,
    ) -> Entity {
        let entity = self.create_entity();
        *self.names.create(entity) = NameComponent::new(name);
        self.layers.create(entity);
        self.transforms.create(entity);
        self.cameras
            .create(entity)
            .create_perspective(width, height, z_near, z_far, fov);
        entity
    }

    pub fn create_emitter_entity(&mut self, name: &str, position: Vec3) -> Entity {
        let entity = self.create_entity();
        *self.names.create(entity) = NameComponent::new(name);
        self.emitters.create(entity);

        let transform = self.transforms.create(entity);
        transform.translate(position);
        transform.recompute();

        self.materials.create(entity).blend_mode = BlendMode::Alpha;
        entity
    }

    pub fn create_hair_entity(&mut self, name: &str, position: Vec3) -> Entity {
        let entity = self.create_entity();
        *self.names.create(entity) = NameComponent::new(name);
        self.hairs.create(entity);

        let transform = self.transforms.create(entity);
        transform.translate(position);
        transform.recompute();

        self.materials.create(entity);
        entity
    }

    // ── Hierarchy structure ──────────────────────────────────────────

    /// Parent `entity` under `parent`.
    ///
    /// Re-parenting is always detach-then-attach. The new link lands at
    /// the end of the hierarchy store; if `entity` already has children of
    /// its own, the link is bubbled to just before the first of them so
    /// the ancestors-first iteration order holds. The parent's inverse
    /// world matrix and the child's layer mask are snapshotted into the
    /// link, and the child's world transform is combined immediately so it
    /// is correct before the next frame's pass.
    pub fn attach(&mut self, entity: Entity, parent: Entity) {
        debug_assert_ne!(entity, parent, "attach: entity cannot be its own parent");

        if self.hierarchy.contains(entity) {
            self.detach(entity);
        }

        self.hierarchy.create(entity).parent = parent;

        // The new link sits at the end. Any existing link that names
        // `entity` as its parent must come after it.
        for i in 0..self.hierarchy.len() {
            if self.hierarchy[i].parent == entity {
                self.hierarchy.move_last_to(i);
                break;
            }
        }

        if let Some(parent_transform) = self.transforms.get(parent).cloned() {
            let bind_inverse = parent_transform.world.inverse();
            if let Some(link) = self.hierarchy.get_mut(entity) {
                link.bind_inverse = bind_inverse;
            }
            if let Some(child_transform) = self.transforms.get_mut(entity) {
                child_transform.update_parented(&parent_transform, bind_inverse);
            }
        }

        if let Some(layer) = self.layers.get(entity) {
            let mask = layer.mask();
            if let Some(link) = self.hierarchy.get_mut(entity) {
                link.layer_mask_bind = mask;
            }
        }
    }

    /// Unlink `entity` from its parent, keeping its world pose: the
    /// current world matrix is baked into the local fields, and the layer
    /// mask snapshotted at attach time is restored.
    pub fn detach(&mut self, entity: Entity) {
        let Some(link) = self.hierarchy.get(entity) else {
            return;
        };
        let layer_mask_bind = link.layer_mask_bind;

        if let Some(transform) = self.transforms.get_mut(entity) {
            transform.apply_current_world();
        }
        if let Some(layer) = self.layers.get_mut(entity) {
            layer.mask = layer_mask_bind;
        }

        self.hierarchy.remove_keep_sorted(entity);
    }

    /// Detach every direct child of `parent`. Grandchildren keep their
    /// links — this is one level, not a subtree operation.
    pub fn detach_children(&mut self, parent: Entity) {
        let mut i = 0;
        while i < self.hierarchy.len() {
            if self.hierarchy[i].parent == parent {
                let child = self.hierarchy.entity_at(i);
                self.detach(child);
                // The removal shifted the next link into slot i.
            } else {
                i += 1;
            }
        }
    }

    // ── Duplication plumbing ─────────────────────────────────────────

    fn archive_entity(&self, entity: Entity) -> EntityArchive {
        EntityArchive {
            name: self.names.get(entity).cloned(),
            layer: self.layers.get(entity).cloned(),
            transform: self.transforms.get(entity).cloned(),
            prev_transform: self.prev_transforms.get(entity).cloned(),
            hierarchy: self.hierarchy.get(entity).cloned(),
            material: self.materials.get(entity).cloned(),
            mesh: self.meshes.get(entity).cloned(),
            object: self.objects.get(entity).cloned(),
            aabb_object: self.aabb_objects.get(entity).cloned(),
            rigidbody: self.rigidbodies.get(entity).cloned(),
            softbody: self.softbodies.get(entity).cloned(),
            armature: self.armatures.get(entity).cloned(),
            light: self.lights.get(entity).cloned(),
            aabb_light: self.aabb_lights.get(entity).cloned(),
            camera: self.cameras.get(entity).cloned(),
            probe: self.probes.get(entity).cloned(),
            aabb_probe: self.aabb_probes.get(entity).cloned(),
            force: self.forces.get(entity).cloned(),
            decal: self.decals.get(entity).cloned(),
            aabb_decal: self.aabb_decals.get(entity).cloned(),
            animation: self.animations.get(entity).cloned(),
            emitter: self.emitters.get(entity).cloned(),
            hair: self.hairs.get(entity).cloned(),
            weather: self.weathers.get(entity).cloned(),
        }
    }

    fn restore_entity(&mut self, entity: Entity, archive: EntityArchive) {
        if let Some(c) = archive.name {
            *self.names.create(entity) = c;
        }
        if let Some(c) = archive.layer {
            *self.layers.create(entity) = c;
        }
        if let Some(c) = archive.transform {
            *self.transforms.create(entity) = c;
        }
        if let Some(c) = archive.prev_transform {
            *self.prev_transforms.create(entity) = c;
        }
        if let Some(c) = archive.hierarchy {
            *self.hierarchy.create(entity) = c;
        }
        if let Some(c) = archive.material {
            *self.materials.create(entity) = c;
        }
        if let Some(c) = archive.mesh {
            *self.meshes.create(entity) = c;
        }
        if let Some(c) = archive.object {
            *self.objects.create(entity) = c;
        }
        if let Some(c) = archive.aabb_object {
            *self.aabb_objects.create(entity) = c;
        }
        if let Some(c) = archive.rigidbody {
            *self.rigidbodies.create(entity) = c;
        }
        if let Some(c) = archive.softbody {
            *self.softbodies.create(entity) = c;
        }
        if let Some(c) = archive.armature {
            *self.armatures.create(entity) = c;
        }
        if let Some(c) = archive.light {
            *self.lights.create(entity) = c;
        }
        if let Some(c) = archive.aabb_light {
            *self.aabb_lights.create(entity) = c;
        }
        if let Some(c) = archive.camera {
            *self.cameras.create(entity) = c;
        }
        if let Some(c) = archive.probe {
            *self.probes.create(entity) = c;
        }
        if let Some(c) = archive.aabb_probe {
            *self.aabb_probes.create(entity) = c;
        }
        if let Some(c) = archive.force {
            *self.forces.create(entity) = c;
        }
        if let Some(c) = archive.decal {
            *self.decals.create(entity) = c;
        }
        if let Some(c) = archive.aabb_decal {
            *self.aabb_decals.create(entity) = c;
        }
        if let Some(c) = archive.animation {
            *self.animations.create(entity) = c;
        }
        if let Some(c) = archive.emitter {
            *self.emitters.create(entity) = c;
        }
        if let Some(c) = archive.hair {
            *self.hairs.create(entity) = c;
        }
        if let Some(c) = archive.weather {
            *self.weathers.create(entity) = c;
        }
    }
}

/// One entity's full component set, as serialized by duplication. Only
/// ever lives in a transient byte buffer — this is not an on-disk format.
#[derive(Debug, Default, Serialize, Deserialize)]
struct EntityArchive {
    name: Option<NameComponent>,
    layer: Option<LayerComponent>,
    transform: Option<TransformComponent>,
    prev_transform: Option<PreviousFrameTransformComponent>,
    hierarchy: Option<HierarchyComponent>,
    material: Option<MaterialComponent>,
    mesh: Option<MeshComponent>,
    object: Option<ObjectComponent>,
    aabb_object: Option<Aabb>,
    rigidbody: Option<RigidBodyComponent>,
    softbody: Option<SoftBodyComponent>,
    armature: Option<ArmatureComponent>,
    light: Option<LightComponent>,
    aabb_light: Option<Aabb>,
    camera: Option<CameraComponent>,
    probe: Option<EnvironmentProbeComponent>,
    aabb_probe: Option<Aabb>,
    force: Option<ForceFieldComponent>,
    decal: Option<DecalComponent>,
    aabb_decal: Option<Aabb>,
    animation: Option<AnimationComponent>,
    emitter: Option<EmitterComponent>,
    hair: Option<HairParticleComponent>,
    weather: Option<WeatherComponent>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{AnimationChannel, AnimationSampler, ChannelPath, SamplerMode};
    use crate::services::NullPhysics;

    fn scene() -> Scene {
        Scene::with_rng_seed(42)
    }

    #[test]
    fn object_factory_populates_expected_stores() {
        let mut scene = scene();
        let e = scene.create_object_entity("crate");

        assert!(scene.names.contains(e));
        assert!(scene.layers.contains(e));
        assert!(scene.transforms.contains(e));
        assert!(scene.prev_transforms.contains(e));
        assert!(scene.objects.contains(e));
        assert!(scene.aabb_objects.contains(e));
        assert!(!scene.meshes.contains(e));
        assert_eq!(scene.find_by_name("crate"), Some(e));
    }

    #[test]
    fn light_factory_places_the_light() {
        let mut scene = scene();
        let e = scene.create_light_entity(
            "lamp",
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::ONE,
            5.0,
            10.0,
        );
        let transform = scene.transforms.get(e).unwrap();
        assert_eq!(transform.world_position(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(scene.lights.get(e).unwrap().range, 10.0);
    }

    #[test]
    fn remove_is_unconditional_across_stores() {
        let mut scene = scene();
        let e = scene.create_object_entity("doomed");
        scene.remove(e);

        assert_eq!(scene.count_entities(), 0);
        assert_eq!(scene.find_by_name("doomed"), None);
        // Removing again is harmless.
        scene.remove(e);
    }

    #[test]
    fn attach_then_move_parent_propagates() {
        let mut scene = scene();
        let parent = scene.create_object_entity("parent");
        let child = scene.create_object_entity("child");

        scene
            .transforms
            .get_mut(parent)
            .unwrap()
            .translate(Vec3::new(10.0, 0.0, 0.0));
        scene
            .transforms
            .get_mut(child)
            .unwrap()
            .translate(Vec3::new(1.0, 0.0, 0.0));
        scene.update(&mut NullPhysics, 0.0);

        scene.attach(child, parent);
        scene.update(&mut NullPhysics, 0.0);
        let p = scene.transforms.get(child).unwrap().world_position();
        assert!((p - Vec3::new(1.0, 0.0, 0.0)).length() < 1e-4);

        // Parent moves; the child follows through the bind relation.
        scene
            .transforms
            .get_mut(parent)
            .unwrap()
            .translate(Vec3::new(0.0, 7.0, 0.0));
        scene.update(&mut NullPhysics, 0.0);
        let p = scene.transforms.get(child).unwrap().world_position();
        assert!((p - Vec3::new(1.0, 7.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn detach_preserves_world_pose_and_breaks_the_link() {
        let mut scene = scene();
        let parent = scene.create_object_entity("parent");
        let child = scene.create_object_entity("child");

        scene
            .transforms
            .get_mut(parent)
            .unwrap()
            .translate(Vec3::new(5.0, 0.0, 0.0));
        scene.attach(child, parent);
        scene.update(&mut NullPhysics, 0.0);
        let before = scene.transforms.get(child).unwrap().world_position();

        scene.detach(child);
        let after = scene.transforms.get(child).unwrap().world_position();
        assert!((before - after).length() < 1e-4);

        // Further parent movement no longer affects the child.
        scene
            .transforms
            .get_mut(parent)
            .unwrap()
            .translate(Vec3::new(0.0, 50.0, 0.0));
        scene.update(&mut NullPhysics, 0.0);
        let p = scene.transforms.get(child).unwrap().world_position();
        assert!((p - after).length() < 1e-4);
    }

    #[test]
    fn reattach_under_new_parent_is_detach_then_attach() {
        let mut scene = scene();
        let a = scene.create_object_entity("a");
        let b = scene.create_object_entity("b");
        let child = scene.create_object_entity("child");

        scene.attach(child, a);
        scene.attach(child, b);

        assert_eq!(scene.hierarchy.len(), 1);
        assert_eq!(scene.hierarchy.get(child).unwrap().parent, b);
    }

    #[test]
    fn attach_orders_ancestors_before_descendants() {
        let mut scene = scene();
        let grandparent = scene.create_object_entity("grandparent");
        let parent = scene.create_object_entity("parent");
        let child = scene.create_object_entity("child");

        // Attach bottom-up, the worst case for ordering: the parent's own
        // link is created after its child's.
        scene.attach(child, parent);
        scene.attach(parent, grandparent);

        let parent_slot = scene.hierarchy.index_of(parent).unwrap();
        let child_slot = scene.hierarchy.index_of(child).unwrap();
        assert!(parent_slot < child_slot);

        // And a full chain actually propagates root-first in one pass.
        scene
            .transforms
            .get_mut(grandparent)
            .unwrap()
            .translate(Vec3::new(0.0, 0.0, 4.0));
        scene.update(&mut NullPhysics, 0.0);
        let p = scene.transforms.get(child).unwrap().world_position();
        assert!((p.z - 4.0).abs() < 1e-4);
    }

    #[test]
    fn detach_children_is_single_level() {
        let mut scene = scene();
        let root = scene.create_object_entity("root");
        let mid = scene.create_object_entity("mid");
        let leaf = scene.create_object_entity("leaf");

        scene.attach(leaf, mid);
        scene.attach(mid, root);

        scene.detach_children(root);

        assert!(!scene.hierarchy.contains(mid));
        // The grandchild keeps its own link.
        assert!(scene.hierarchy.contains(leaf));
        assert_eq!(scene.hierarchy.get(leaf).unwrap().parent, mid);
    }

    #[test]
    fn detach_restores_layer_mask() {
        let mut scene = scene();
        let parent = scene.create_object_entity("parent");
        let child = scene.create_object_entity("child");

        scene.layers.get_mut(parent).unwrap().mask = 0b0011;
        scene.layers.get_mut(child).unwrap().mask = 0b1111;

        scene.attach(child, parent);
        scene.update(&mut NullPhysics, 0.0);
        // Narrowed while attached.
        assert_eq!(scene.layers.get(child).unwrap().mask, 0b0011);

        scene.detach(child);
        assert_eq!(scene.layers.get(child).unwrap().mask, 0b1111);
    }

    #[test]
    fn duplicate_is_a_deep_copy_under_a_fresh_id() {
        let mut scene = scene();
        let original = scene.create_object_entity("prop");
        scene
            .transforms
            .get_mut(original)
            .unwrap()
            .translate(Vec3::new(3.0, 0.0, 0.0));

        let copy = scene.duplicate(original);
        assert!(copy.is_valid());
        assert_ne!(copy, original);
        assert!(scene.transforms.contains(copy));
        assert_eq!(scene.names.get(copy).unwrap().name, "prop");

        // Mutating the original must not leak into the copy.
        scene
            .transforms
            .get_mut(original)
            .unwrap()
            .translate(Vec3::new(100.0, 0.0, 0.0));
        let copy_translation = scene.transforms.get(copy).unwrap().translation_local;
        assert!((copy_translation - Vec3::new(3.0, 0.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn merge_disjoint_scenes_sums_entities_and_unions_bounds() {
        let mut a = Scene::with_rng_seed(1);
        let mut b = Scene::with_rng_seed(2);

        let mesh_a = a.create_mesh_entity("mesh_a");
        a.meshes.get_mut(mesh_a).unwrap().aabb = Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0));
        let obj_a = a.create_object_entity("obj_a");
        a.objects.get_mut(obj_a).unwrap().mesh_id = mesh_a;

        // Disjoint namespace: b's ids start beyond a's (the loader-side
        // remap, done by hand here).
        for _ in 0..16 {
            b.create_entity();
        }
        let mesh_b = b.create_mesh_entity("mesh_b");
        b.meshes.get_mut(mesh_b).unwrap().aabb = Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0));
        let obj_b = b.create_object_entity("obj_b");
        b.objects.get_mut(obj_b).unwrap().mesh_id = mesh_b;
        b.transforms
            .get_mut(obj_b)
            .unwrap()
            .translate(Vec3::new(20.0, 0.0, 0.0));

        a.update(&mut NullPhysics, 0.0);
        b.update(&mut NullPhysics, 0.0);
        let expected_bounds = Aabb::merge(a.bounds, b.bounds);
        let total_names = a.names.len() + b.names.len();

        a.merge(&mut b);

        assert_eq!(a.names.len(), total_names);
        assert_eq!(b.count_entities(), 0);
        assert_eq!(a.bounds, expected_bounds);
        assert!(a.objects.contains(obj_a));
        assert!(a.objects.contains(obj_b));
    }

    #[test]
    fn full_frame_runs_all_stages() {
        let mut scene = scene();

        // A weather entity that the frame mirrors into scene state.
        let weather_entity = scene.create_entity();
        scene.weathers.create(weather_entity).ambient = Vec3::splat(0.5);

        // An animated object under a parent, with a camera watching.
        let parent = scene.create_object_entity("rig");
        let child = scene.create_object_entity("prop");
        let mesh = scene.create_mesh_entity("prop_mesh");
        scene.meshes.get_mut(mesh).unwrap().aabb =
            Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0));
        scene.objects.get_mut(child).unwrap().mesh_id = mesh;
        scene.attach(child, parent);
        let _camera = scene.create_camera_entity("cam", 16.0, 9.0, 0.1, 100.0, 1.0);

        // Animation drives the parent to x=4 over one second.
        let clip_entity = scene.create_entity();
        let clip = scene.animations.create(clip_entity);
        clip.samplers.push(AnimationSampler {
            keyframe_times: vec![0.0, 1.0],
            keyframe_data: vec![0.0, 0.0, 0.0, 4.0, 0.0, 0.0],
            mode: SamplerMode::Linear,
        });
        clip.channels.push(AnimationChannel {
            target: parent,
            path: ChannelPath::Translation,
            sampler_index: 0,
        });
        clip.play();

        // Sampling happens before the timer advances, so it takes one
        // update past the clip length to sample the final key.
        for _ in 0..12 {
            scene.update(&mut NullPhysics, 0.1);
        }

        // Weather mirrored.
        assert_eq!(scene.weather.ambient, Vec3::splat(0.5));
        // Animation reached the last key and propagated through the
        // hierarchy into the child's world position and bounds.
        let p = scene.transforms.get(child).unwrap().world_position();
        assert!((p.x - 4.0).abs() < 1e-3);
        let child_slot = scene.objects.index_of(child).unwrap();
        assert!((scene.aabb_objects[child_slot].min.x - 3.0).abs() < 1e-3);
        assert!(scene.bounds.is_valid());
        // Previous-frame snapshot trails the current one after motion
        // stops.
        let prev = scene.prev_transforms.get(child).unwrap().world_prev;
        assert_eq!(prev, scene.transforms.get(child).unwrap().world);
    }

    #[test]
    fn clear_empties_the_scene() {
        let mut scene = scene();
        scene.create_object_entity("a");
        scene.create_light_entity("b", Vec3::ZERO, Vec3::ONE, 1.0, 1.0);
        scene.clear();
        assert_eq!(scene.count_entities(), 0);
        assert!(!scene.bounds.is_valid());
    }
}
