//! Transform-related frame passes: the previous-frame snapshot, the local
//! recompute, and hierarchy propagation.
//!
//! Ordering between these three is a correctness invariant, not a
//! preference: the snapshot must run before anything writes transforms,
//! the local recompute must run after every system that edits local fields
//! (animation, physics), and the hierarchy pass must run last so parent
//! world matrices are settled when children combine against them.

use crate::components::{
    HierarchyComponent, LayerComponent, PreviousFrameTransformComponent, TransformComponent,
};
use crate::ecs::ComponentStore;

/// Stage 1: copy every tracked entity's world matrix into its
/// previous-frame component, before this frame mutates anything.
pub fn run_previous_frame_transform_update(
    transforms: &ComponentStore<TransformComponent>,
    prev_transforms: &mut ComponentStore<PreviousFrameTransformComponent>,
) {
    for i in 0..prev_transforms.len() {
        let entity = prev_transforms.entity_at(i);
        if let Some(transform) = transforms.get(entity) {
            prev_transforms[i].world_prev = transform.world;
        }
    }
}

/// Stage 4: recompute every dirty transform's world matrix from its local
/// fields and clear the flag. Clean transforms are untouched.
pub fn run_transform_update(transforms: &mut ComponentStore<TransformComponent>) {
    for i in 0..transforms.len() {
        transforms[i].recompute();
    }
}

/// Stage 5: propagate parent transforms to children, in link order.
///
/// The hierarchy store's ordering guarantee (ancestors before the entities
/// attached under them) makes a single linear walk sufficient: by the time
/// a link is processed, its parent's world matrix is final for this frame.
///
/// A link whose child or parent transform is missing (e.g. the parent was
/// removed this frame) is skipped whole — no error, no partial update. The
/// dangling link stays until a detach or removal cleans it up.
pub fn run_hierarchy_update(
    hierarchy: &ComponentStore<HierarchyComponent>,
    transforms: &mut ComponentStore<TransformComponent>,
    layers: &mut ComponentStore<LayerComponent>,
) {
    for i in 0..hierarchy.len() {
        let link = &hierarchy[i];
        let child = hierarchy.entity_at(i);

        let Some(parent_transform) = transforms.get(link.parent).cloned() else {
            continue;
        };
        let Some(child_transform) = transforms.get_mut(child) else {
            continue;
        };
        child_transform.update_parented(&parent_transform, link.bind_inverse);

        // Masks narrow monotonically down a chain: the child's effective
        // mask is its attach-time snapshot ANDed with whatever the parent
        // currently has (itself already narrowed by ITS parent).
        let parent_mask = layers.get(link.parent).map(LayerComponent::mask);
        if let (Some(parent_mask), Some(child_layer)) = (parent_mask, layers.get_mut(child)) {
            child_layer.mask = link.layer_mask_bind & parent_mask;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::Entity;
    use glam::{Mat4, Vec3};

    fn entity(id: u32) -> Entity {
        Entity::from_bits(id)
    }

    #[test]
    fn snapshot_records_last_frame_world() {
        let mut transforms: ComponentStore<TransformComponent> = ComponentStore::new();
        let mut prev: ComponentStore<PreviousFrameTransformComponent> = ComponentStore::new();
        let e = entity(1);
        transforms.create(e).translate(Vec3::X);
        prev.create(e);

        run_transform_update(&mut transforms);
        run_previous_frame_transform_update(&transforms, &mut prev);

        assert_eq!(prev.get(e).unwrap().world_prev, transforms.get(e).unwrap().world);
    }

    #[test]
    fn snapshot_skips_entities_without_transform() {
        let transforms: ComponentStore<TransformComponent> = ComponentStore::new();
        let mut prev: ComponentStore<PreviousFrameTransformComponent> = ComponentStore::new();
        prev.create(entity(1));
        run_previous_frame_transform_update(&transforms, &mut prev);
        assert_eq!(prev.get(entity(1)).unwrap().world_prev, Mat4::IDENTITY);
    }

    #[test]
    fn hierarchy_pass_skips_missing_parent() {
        let mut transforms: ComponentStore<TransformComponent> = ComponentStore::new();
        let mut layers: ComponentStore<LayerComponent> = ComponentStore::new();
        let mut hierarchy: ComponentStore<HierarchyComponent> = ComponentStore::new();

        let child = entity(2);
        transforms.create(child).translate(Vec3::X);
        run_transform_update(&mut transforms);
        let before = transforms.get(child).unwrap().world;

        let link = hierarchy.create(child);
        link.parent = entity(99); // never created

        run_hierarchy_update(&hierarchy, &mut transforms, &mut layers);
        assert_eq!(transforms.get(child).unwrap().world, before);
    }

    #[test]
    fn hierarchy_pass_combines_parent_world() {
        let mut transforms: ComponentStore<TransformComponent> = ComponentStore::new();
        let mut layers: ComponentStore<LayerComponent> = ComponentStore::new();
        let mut hierarchy: ComponentStore<HierarchyComponent> = ComponentStore::new();

        let parent = entity(1);
        let child = entity(2);
        transforms.create(parent).translate(Vec3::new(10.0, 0.0, 0.0));
        transforms.create(child).translate(Vec3::new(1.0, 0.0, 0.0));
        run_transform_update(&mut transforms);

        let link = hierarchy.create(child);
        link.parent = parent;
        link.bind_inverse = transforms.get(parent).unwrap().world.inverse();

        // Parent moves; the frame pass recomputes, then propagates.
        transforms.get_mut(parent).unwrap().translate(Vec3::new(0.0, 5.0, 0.0));
        run_transform_update(&mut transforms);
        run_hierarchy_update(&hierarchy, &mut transforms, &mut layers);

        let p = transforms.get(child).unwrap().world_position();
        assert!((p - Vec3::new(1.0, 5.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn layer_mask_narrows_down_chain() {
        let mut transforms: ComponentStore<TransformComponent> = ComponentStore::new();
        let mut layers: ComponentStore<LayerComponent> = ComponentStore::new();
        let mut hierarchy: ComponentStore<HierarchyComponent> = ComponentStore::new();

        let parent = entity(1);
        let child = entity(2);
        transforms.create(parent);
        transforms.create(child);
        layers.create(parent).mask = 0b1100;
        layers.create(child).mask = u32::MAX;
        run_transform_update(&mut transforms);

        let link = hierarchy.create(child);
        link.parent = parent;
        link.layer_mask_bind = 0b1010;

        run_hierarchy_update(&hierarchy, &mut transforms, &mut layers);
        assert_eq!(layers.get(child).unwrap().mask, 0b1000);
    }
}
