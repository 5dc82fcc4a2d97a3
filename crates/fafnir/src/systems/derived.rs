//! Derived-state passes: everything after hierarchy propagation.
//!
//! These systems read settled world transforms and write per-entity derived
//! state for the renderer (stages 6–10) plus the particle bookkeeping
//! (stage 11). They must all run after the hierarchy pass — a parented
//! light or probe placed before propagation would derive from a stale
//! matrix. Decal, probe, force, and light are mutually independent; any
//! order among those four is valid.

use glam::{Mat4, Vec3, Vec4};

use crate::components::{
    ArmatureComponent, CameraComponent, DecalComponent, EmitterComponent,
    EnvironmentProbeComponent, ForceFieldComponent, HairParticleComponent, LightComponent,
    LightType, MaterialComponent, MeshComponent, ObjectComponent, RenderTypeMask, StencilRef,
    TransformComponent, WeatherComponent,
};
use crate::ecs::{ComponentStore, Entity};
use crate::math::Aabb;

/// Stage 6: compose skinning matrices for every armature.
///
/// Per bone: remap ∘ bone world ∘ inverse bind. Bones whose transform is
/// missing keep their previous skinning matrix for the frame.
pub fn run_armature_update(
    transforms: &ComponentStore<TransformComponent>,
    armatures: &mut ComponentStore<ArmatureComponent>,
) {
    for i in 0..armatures.len() {
        let armature = &mut armatures[i];

        if armature.skinning_matrices.len() != armature.bone_collection.len() {
            armature
                .skinning_matrices
                .resize(armature.bone_collection.len(), Mat4::IDENTITY);
        }

        for (bone_index, &bone_entity) in armature.bone_collection.iter().enumerate() {
            let Some(bone) = transforms.get(bone_entity) else {
                continue;
            };
            let bind_inverse = armature
                .inverse_bind_matrices
                .get(bone_index)
                .copied()
                .unwrap_or(Mat4::IDENTITY);
            armature.skinning_matrices[bone_index] =
                armature.remap_matrix * bone.world * bind_inverse;
        }
    }
}

/// Stage 7: advance material texture animations and derive render flags.
pub fn run_material_update(materials: &mut ComponentStore<MaterialComponent>, dt: f32) {
    for i in 0..materials.len() {
        let material = &mut materials[i];

        material.tex_anim_sleep -= dt * material.tex_anim_frame_rate;
        if material.tex_anim_sleep <= 0.0 {
            material.tex_mul_add.z =
                (material.tex_mul_add.z + material.tex_anim_direction.x).fract();
            material.tex_mul_add.w =
                (material.tex_mul_add.w + material.tex_anim_direction.y).fract();
            material.tex_anim_sleep = 1.0;
            // The UV transform moved; the host must refresh its constants.
            material.set_dirty();
        }

        material.stencil_ref = if material.subsurface_scattering > 0.0 {
            StencilRef::Skin
        } else {
            StencilRef::Default
        };
    }
}

/// Stage 8: derive object bounds, render-type masks, the merged scene
/// bounds, and the water plane.
///
/// The object and bounds stores are created pairwise by the object factory
/// and mutated through the same scene operations, so they stay parallel;
/// iteration leans on that.
#[allow(clippy::too_many_arguments)]
pub fn run_object_update(
    transforms: &ComponentStore<TransformComponent>,
    meshes: &ComponentStore<MeshComponent>,
    materials: &ComponentStore<MaterialComponent>,
    objects: &mut ComponentStore<ObjectComponent>,
    aabb_objects: &mut ComponentStore<Aabb>,
    scene_bounds: &mut Aabb,
    water_plane: &mut Vec4,
) {
    debug_assert_eq!(objects.len(), aabb_objects.len());

    *scene_bounds = Aabb::default();

    for i in 0..objects.len() {
        let entity = objects.entity_at(i);
        let object = &mut objects[i];

        aabb_objects[i] = Aabb::default();
        object.render_type = RenderTypeMask::empty();
        object.dynamic = false;
        object.cast_shadow = false;

        if !object.mesh_id.is_valid() {
            continue;
        }
        let (Some(transform), Some(mesh)) =
            (transforms.get(entity), meshes.get(object.mesh_id))
        else {
            continue;
        };

        let aabb = mesh.aabb.transformed(transform.world);
        *scene_bounds = Aabb::merge(*scene_bounds, aabb);
        aabb_objects[i] = aabb;

        object.position = transform.world_position();

        if mesh.is_skinned() || mesh.is_dynamic() {
            object.dynamic = true;
        }

        for subset in &mesh.subsets {
            let Some(material) = materials.get(subset.material_id) else {
                continue;
            };

            if material.is_transparent() {
                object.render_type |= RenderTypeMask::TRANSPARENT;
            } else {
                object.render_type |= RenderTypeMask::OPAQUE;
            }

            if material.is_water() {
                object.render_type |= RenderTypeMask::TRANSPARENT | RenderTypeMask::WATER;
                // Horizontal plane through the water surface.
                let position = transform.world_position();
                *water_plane = Vec4::new(0.0, 1.0, 0.0, -position.y);
            }

            object.cast_shadow = material.cast_shadow;
        }
    }
}

/// Stage 9: rebuild camera matrices from the owning entity's transform.
pub fn run_camera_update(
    transforms: &ComponentStore<TransformComponent>,
    cameras: &mut ComponentStore<CameraComponent>,
) {
    for i in 0..cameras.len() {
        let entity = cameras.entity_at(i);
        let transform = transforms.get(entity);
        cameras[i].update(transform);
    }
}

/// Stage 10: decal placement and material snapshot.
pub fn run_decal_update(
    transforms: &ComponentStore<TransformComponent>,
    materials: &ComponentStore<MaterialComponent>,
    aabb_decals: &mut ComponentStore<Aabb>,
    decals: &mut ComponentStore<DecalComponent>,
) {
    debug_assert_eq!(decals.len(), aabb_decals.len());

    for i in 0..decals.len() {
        let entity = decals.entity_at(i);
        let decal = &mut decals[i];
        let Some(transform) = transforms.get(entity) else {
            continue;
        };

        decal.world = transform.world;
        decal.front = transform.world.transform_vector3(Vec3::Z);

        let (scale, _, translation) = transform.world.to_scale_rotation_translation();
        decal.position = translation;
        decal.range = scale.x.max(scale.y).max(scale.z) * 2.0;

        aabb_decals[i] =
            Aabb::from_half_width(Vec3::ZERO, Vec3::ONE).transformed(transform.world);

        if let Some(material) = materials.get(entity) {
            decal.color = material.base_color;
            decal.emissive = material.emissive;
            decal.texture = material.base_color_map;
            decal.normal = material.normal_map;
        }
    }
}

/// Stage 10: probe placement volume.
pub fn run_probe_update(
    transforms: &ComponentStore<TransformComponent>,
    aabb_probes: &mut ComponentStore<Aabb>,
    probes: &mut ComponentStore<EnvironmentProbeComponent>,
) {
    debug_assert_eq!(probes.len(), aabb_probes.len());

    for i in 0..probes.len() {
        let entity = probes.entity_at(i);
        let probe = &mut probes[i];
        let Some(transform) = transforms.get(entity) else {
            continue;
        };

        probe.position = transform.world_position();
        probe.inverse_matrix = transform.world.inverse();

        let (scale, _, _) = transform.world.to_scale_rotation_translation();
        probe.range = scale.x.max(scale.y).max(scale.z) * 2.0;

        aabb_probes[i] =
            Aabb::from_half_width(Vec3::ZERO, Vec3::ONE).transformed(transform.world);
    }
}

/// Stage 10: force-field position and push direction.
pub fn run_force_update(
    transforms: &ComponentStore<TransformComponent>,
    forces: &mut ComponentStore<ForceFieldComponent>,
) {
    for i in 0..forces.len() {
        let entity = forces.entity_at(i);
        let force = &mut forces[i];
        let Some(transform) = transforms.get(entity) else {
            continue;
        };

        force.position = transform.world_position();
        force.direction = transform
            .world
            .transform_vector3(Vec3::NEG_Y)
            .normalize_or_zero();
    }
}

/// Stage 10: light basis, bounds, and the sun mirror into weather.
///
/// Shadow-map camera placement is the renderer's problem; this pass only
/// settles where each light *is* and what it can reach.
pub fn run_light_update(
    transforms: &ComponentStore<TransformComponent>,
    aabb_lights: &mut ComponentStore<Aabb>,
    lights: &mut ComponentStore<LightComponent>,
    weather: &mut WeatherComponent,
) {
    debug_assert_eq!(lights.len(), aabb_lights.len());

    // Directional lights and unbounded area lights influence everything.
    const UNBOUNDED: Vec3 = Vec3::splat(10_000.0);

    for i in 0..lights.len() {
        let entity = lights.entity_at(i);
        let light = &mut lights[i];
        let Some(transform) = transforms.get(entity) else {
            continue;
        };

        let world = transform.world;
        let (_, rotation, translation) = world.to_scale_rotation_translation();
        light.position = translation;
        light.rotation = rotation;
        light.direction = world.transform_vector3(Vec3::Y);

        match light.light_type {
            LightType::Directional => {
                // The scene's sun: mirrored into the weather state so sky
                // and fog shading agree with the light.
                weather.sun_color = light.color;
                weather.sun_direction = light.direction;
                aabb_lights[i] = Aabb::from_half_width(Vec3::ZERO, UNBOUNDED);
            }
            LightType::Spot | LightType::Point => {
                aabb_lights[i] =
                    Aabb::from_half_width(light.position, Vec3::splat(light.range));
            }
            LightType::Sphere | LightType::Disc | LightType::Rectangle | LightType::Tube => {
                light.right = world.transform_vector3(Vec3::NEG_X).normalize_or_zero();
                light.front = world.transform_vector3(Vec3::NEG_Z).normalize_or_zero();
                aabb_lights[i] = Aabb::from_half_width(Vec3::ZERO, UNBOUNDED);
            }
        }
    }
}

/// Stage 11: particle bookkeeping — emitter accumulation and hair
/// placement. Simulation itself is external.
pub fn run_particle_update(
    transforms: &ComponentStore<TransformComponent>,
    meshes: &ComponentStore<MeshComponent>,
    emitters: &mut ComponentStore<EmitterComponent>,
    hairs: &mut ComponentStore<HairParticleComponent>,
    dt: f32,
) {
    for i in 0..emitters.len() {
        emitters[i].update(dt);
    }

    for i in 0..hairs.len() {
        let entity = hairs.entity_at(i);
        let hair = &mut hairs[i];
        let Some(transform) = transforms.get(entity) else {
            continue;
        };
        hair.world = transform.world;

        if hair.mesh_id.is_valid() {
            if let Some(mesh) = meshes.get(hair.mesh_id) {
                // Strands can reach `length` beyond the scalp in any
                // direction.
                let padded = Aabb::new(
                    mesh.aabb.min - Vec3::splat(hair.length),
                    mesh.aabb.max + Vec3::splat(hair.length),
                );
                hair.aabb = padded.transformed(hair.world);
            }
        }
    }
}

/// Convenience for hosts: does this entity render into any queue at all.
pub fn is_renderable(object: &ObjectComponent) -> bool {
    object.mesh_id != Entity::INVALID && !object.render_type.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{BlendMode, MeshSubset};
    use crate::ecs::Entity;

    fn entity(id: u32) -> Entity {
        Entity::from_bits(id)
    }

    fn transform_at(position: Vec3) -> TransformComponent {
        let mut t = TransformComponent::default();
        t.translate(position);
        t.recompute();
        t
    }

    #[test]
    fn armature_composes_skinning_matrices() {
        let mut transforms: ComponentStore<TransformComponent> = ComponentStore::new();
        let bone = entity(1);
        *transforms.create(bone) = transform_at(Vec3::new(0.0, 2.0, 0.0));

        let mut armatures: ComponentStore<ArmatureComponent> = ComponentStore::new();
        let armature = armatures.create(entity(2));
        armature.bone_collection = vec![bone];
        armature.inverse_bind_matrices = vec![Mat4::from_translation(Vec3::new(0.0, -1.0, 0.0))];
        armature.remap_matrix = Mat4::IDENTITY;

        run_armature_update(&transforms, &mut armatures);

        let skin = armatures[0].skinning_matrices[0];
        // Bind at y=1, bone now at y=2: a skinned vertex moves up by one.
        let p = skin.transform_point3(Vec3::new(0.0, 1.0, 0.0));
        assert!((p.y - 2.0).abs() < 1e-4);
    }

    #[test]
    fn material_texture_animation_scrolls_and_wraps() {
        let mut materials: ComponentStore<MaterialComponent> = ComponentStore::new();
        let material = materials.create(entity(1));
        material.tex_anim_frame_rate = 1.0;
        material.tex_anim_direction = glam::Vec2::new(0.75, 0.0);
        material.tex_anim_sleep = 0.0;
        material.clear_dirty();

        run_material_update(&mut materials, 0.5);
        assert!((materials[0].tex_mul_add.z - 0.75).abs() < 1e-6);
        assert!(materials[0].is_dirty());

        // Sleep was rearmed to 1.0; a small dt doesn't tick again.
        materials[0].clear_dirty();
        run_material_update(&mut materials, 0.1);
        assert!(!materials[0].is_dirty());
    }

    #[test]
    fn subsurface_scattering_selects_skin_stencil() {
        let mut materials: ComponentStore<MaterialComponent> = ComponentStore::new();
        materials.create(entity(1)).subsurface_scattering = 0.5;
        run_material_update(&mut materials, 0.016);
        assert_eq!(materials[0].stencil_ref, StencilRef::Skin);
    }

    fn object_fixture(
        blend: BlendMode,
        water: bool,
    ) -> (
        ComponentStore<TransformComponent>,
        ComponentStore<MeshComponent>,
        ComponentStore<MaterialComponent>,
        ComponentStore<ObjectComponent>,
        ComponentStore<Aabb>,
    ) {
        let mut transforms = ComponentStore::new();
        let mut meshes: ComponentStore<MeshComponent> = ComponentStore::new();
        let mut materials: ComponentStore<MaterialComponent> = ComponentStore::new();
        let mut objects: ComponentStore<ObjectComponent> = ComponentStore::new();
        let mut aabbs = ComponentStore::new();

        let mesh_entity = entity(10);
        let material_entity = entity(11);
        let object_entity = entity(12);

        let material = materials.create(material_entity);
        material.blend_mode = blend;
        material.water = water;

        let mesh = meshes.create(mesh_entity);
        mesh.aabb = Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0));
        mesh.subsets.push(MeshSubset {
            material_id: material_entity,
            index_offset: 0,
            index_count: 0,
        });

        *transforms.create(object_entity) = transform_at(Vec3::new(5.0, 3.0, 0.0));
        objects.create(object_entity).mesh_id = mesh_entity;
        aabbs.create(object_entity);

        (transforms, meshes, materials, objects, aabbs)
    }

    #[test]
    fn object_update_derives_bounds_and_flags() {
        let (transforms, meshes, materials, mut objects, mut aabbs) =
            object_fixture(BlendMode::Opaque, false);
        let mut bounds = Aabb::default();
        let mut water_plane = Vec4::ZERO;

        run_object_update(
            &transforms,
            &meshes,
            &materials,
            &mut objects,
            &mut aabbs,
            &mut bounds,
            &mut water_plane,
        );

        assert_eq!(objects[0].render_type, RenderTypeMask::OPAQUE);
        assert_eq!(objects[0].position, Vec3::new(5.0, 3.0, 0.0));
        assert_eq!(aabbs[0].min, Vec3::new(4.0, 2.0, -1.0));
        assert_eq!(bounds, aabbs[0]);
        assert!(is_renderable(&objects[0]));
    }

    #[test]
    fn water_material_sets_plane_and_mask() {
        let (transforms, meshes, materials, mut objects, mut aabbs) =
            object_fixture(BlendMode::Opaque, true);
        let mut bounds = Aabb::default();
        let mut water_plane = Vec4::ZERO;

        run_object_update(
            &transforms,
            &meshes,
            &materials,
            &mut objects,
            &mut aabbs,
            &mut bounds,
            &mut water_plane,
        );

        assert!(objects[0].render_type.contains(RenderTypeMask::WATER));
        assert!(objects[0].render_type.contains(RenderTypeMask::TRANSPARENT));
        // Plane passes through the object's height.
        assert_eq!(water_plane, Vec4::new(0.0, 1.0, 0.0, -3.0));
    }

    #[test]
    fn directional_light_feeds_weather_sun() {
        let mut transforms: ComponentStore<TransformComponent> = ComponentStore::new();
        let mut lights: ComponentStore<LightComponent> = ComponentStore::new();
        let mut aabbs: ComponentStore<Aabb> = ComponentStore::new();
        let mut weather = WeatherComponent::default();

        let sun = entity(1);
        transforms.create(sun).recompute();
        let light = lights.create(sun);
        light.light_type = LightType::Directional;
        light.color = Vec3::new(1.0, 0.9, 0.8);
        aabbs.create(sun);

        run_light_update(&transforms, &mut aabbs, &mut lights, &mut weather);

        assert_eq!(weather.sun_color, Vec3::new(1.0, 0.9, 0.8));
        assert!((weather.sun_direction - Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn point_light_bounds_follow_range() {
        let mut transforms: ComponentStore<TransformComponent> = ComponentStore::new();
        let mut lights: ComponentStore<LightComponent> = ComponentStore::new();
        let mut aabbs: ComponentStore<Aabb> = ComponentStore::new();
        let mut weather = WeatherComponent::default();

        let e = entity(1);
        *transforms.create(e) = transform_at(Vec3::new(4.0, 0.0, 0.0));
        let light = lights.create(e);
        light.light_type = LightType::Point;
        light.range = 2.0;
        aabbs.create(e);

        run_light_update(&transforms, &mut aabbs, &mut lights, &mut weather);

        assert_eq!(aabbs[0].min, Vec3::new(2.0, -2.0, -2.0));
        assert_eq!(aabbs[0].max, Vec3::new(6.0, 2.0, 2.0));
    }

    #[test]
    fn probe_derives_inverse_and_range() {
        let mut transforms: ComponentStore<TransformComponent> = ComponentStore::new();
        let mut probes: ComponentStore<EnvironmentProbeComponent> = ComponentStore::new();
        let mut aabbs: ComponentStore<Aabb> = ComponentStore::new();

        let e = entity(1);
        let t = transforms.create(e);
        t.translate(Vec3::new(1.0, 0.0, 0.0));
        t.scale(Vec3::splat(3.0));
        t.recompute();
        probes.create(e);
        aabbs.create(e);

        run_probe_update(&transforms, &mut aabbs, &mut probes);

        assert_eq!(probes[0].position, Vec3::new(1.0, 0.0, 0.0));
        assert!((probes[0].range - 6.0).abs() < 1e-4);
        // The inverse maps the probe center back to the origin.
        let p = probes[0].inverse_matrix.transform_point3(Vec3::new(1.0, 0.0, 0.0));
        assert!(p.length() < 1e-4);
    }

    #[test]
    fn force_direction_is_world_down() {
        let mut transforms: ComponentStore<TransformComponent> = ComponentStore::new();
        let mut forces: ComponentStore<ForceFieldComponent> = ComponentStore::new();

        let e = entity(1);
        let t = transforms.create(e);
        t.rotate(glam::Quat::from_rotation_z(std::f32::consts::PI));
        t.recompute();
        forces.create(e);

        run_force_update(&transforms, &mut forces);

        // Flipped upside down: "down" now points up.
        assert!((forces[0].direction - Vec3::Y).length() < 1e-4);
    }

    #[test]
    fn hair_bounds_padded_by_length() {
        let mut transforms: ComponentStore<TransformComponent> = ComponentStore::new();
        let mut meshes: ComponentStore<MeshComponent> = ComponentStore::new();
        let mut emitters: ComponentStore<EmitterComponent> = ComponentStore::new();
        let mut hairs: ComponentStore<HairParticleComponent> = ComponentStore::new();

        let scalp = entity(1);
        let hair_entity = entity(2);
        meshes.create(scalp).aabb = Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0));
        transforms.create(hair_entity).recompute();
        let hair = hairs.create(hair_entity);
        hair.mesh_id = scalp;
        hair.length = 0.5;

        run_particle_update(&transforms, &meshes, &mut emitters, &mut hairs, 0.016);

        assert_eq!(hairs[0].aabb.min, Vec3::splat(-1.5));
        assert_eq!(hairs[0].aabb.max, Vec3::splat(1.5));
    }
}
