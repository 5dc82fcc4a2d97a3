//! # ComponentStore — Dense Per-Kind Component Storage
//!
//! One store holds every component of a single kind, packed into a dense
//! array so the per-frame systems can iterate it linearly. A parallel array
//! records which entity owns each slot, and a reverse map gives average
//! O(1) entity → slot lookup.
//!
//! ```text
//! components: [ T, T, T, T ]          ← dense, iterated by systems
//! entities:   [ 7, 3, 12, 9 ]         ← owner of each slot
//! lookup:     { 7→0, 3→1, 12→2, 9→3 } ← reverse map
//! ```
//!
//! ## Removal Semantics
//!
//! Two removal flavors with different guarantees:
//!
//! - [`remove`](ComponentStore::remove) swap-removes: O(1), but the last
//!   element is relocated and relative order is destroyed.
//! - [`remove_keep_sorted`](ComponentStore::remove_keep_sorted) shifts every
//!   later element down one slot: O(n), order of survivors preserved. The
//!   hierarchy store depends on iteration order, so it must use this one.
//!
//! Both fix up the reverse map so the dense arrays and the map are mutually
//! consistent after every operation.
//!
//! ## Caller Contracts (unchecked)
//!
//! - [`create`](ComponentStore::create) does not look for an existing entry;
//!   creating the same entity twice corrupts the reverse map.
//! - [`merge`](ComponentStore::merge) requires the two stores' entity
//!   namespaces to be disjoint (a loader-side remap guarantees this).
//!
//! Both are `debug_assert!`ed, never checked in release builds.

use std::collections::HashMap;
use std::ops::{Index, IndexMut};

use super::entity::Entity;

/// Dense storage for all components of kind `T`, indexed by [`Entity`].
#[derive(Debug, Clone, Default)]
pub struct ComponentStore<T> {
    components: Vec<T>,
    entities: Vec<Entity>,
    lookup: HashMap<Entity, usize>,
}

impl<T> ComponentStore<T> {
    pub fn new() -> Self {
        Self {
            components: Vec::new(),
            entities: Vec::new(),
            lookup: HashMap::new(),
        }
    }

    /// Append a default-valued component owned by `entity` and return a
    /// mutable reference to it.
    ///
    /// The reference is only good until the next structural mutation of
    /// this store (create/remove/move can all relocate elements).
    ///
    /// Caller contract: `entity` must not already be in this store.
    pub fn create(&mut self, entity: Entity) -> &mut T
    where
        T: Default,
    {
        debug_assert!(entity.is_valid(), "cannot create a component for Entity::INVALID");
        debug_assert!(
            !self.lookup.contains_key(&entity),
            "duplicate create for {entity:?}"
        );
        let index = self.components.len();
        self.lookup.insert(entity, index);
        self.components.push(T::default());
        self.entities.push(entity);
        &mut self.components[index]
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.lookup.contains_key(&entity)
    }

    /// Look up the component owned by `entity`. Absent entities are simply
    /// `None`, never an error.
    pub fn get(&self, entity: Entity) -> Option<&T> {
        self.lookup.get(&entity).map(|&index| &self.components[index])
    }

    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        match self.lookup.get(&entity) {
            Some(&index) => Some(&mut self.components[index]),
            None => None,
        }
    }

    /// The dense slot currently holding `entity`'s component.
    pub fn index_of(&self, entity: Entity) -> Option<usize> {
        self.lookup.get(&entity).copied()
    }

    /// The entity owning dense slot `index`.
    pub fn entity_at(&self, index: usize) -> Entity {
        self.entities[index]
    }

    /// Remove `entity`'s component by swapping the last element into its
    /// slot. O(1) amortized; relative order of the survivors changes.
    pub fn remove(&mut self, entity: Entity) {
        let Some(index) = self.lookup.remove(&entity) else {
            return;
        };
        let last = self.components.len() - 1;
        if index < last {
            self.components.swap(index, last);
            self.entities.swap(index, last);
            // The relocated element needs its reverse-map entry fixed.
            self.lookup.insert(self.entities[index], index);
        }
        self.components.pop();
        self.entities.pop();
    }

    /// Remove `entity`'s component, shifting every later element down one
    /// slot. O(n), but the relative order of the survivors is preserved.
    pub fn remove_keep_sorted(&mut self, entity: Entity) {
        let Some(index) = self.lookup.remove(&entity) else {
            return;
        };
        self.components.remove(index);
        self.entities.remove(index);
        for slot in index..self.entities.len() {
            self.lookup.insert(self.entities[slot], slot);
        }
    }

    /// Relocate the current last element into `index`, shifting the range
    /// `[index, len-1)` up by one slot.
    ///
    /// Used by hierarchy attachment to place a freshly appended link ahead
    /// of links that reference it as their parent.
    pub fn move_last_to(&mut self, index: usize) {
        let last_component = self.components.pop().expect("move_last_to on empty store");
        let last_entity = self.entities.pop().expect("move_last_to on empty store");
        self.components.insert(index, last_component);
        self.entities.insert(index, last_entity);
        for slot in index..self.entities.len() {
            self.lookup.insert(self.entities[slot], slot);
        }
    }

    /// Append everything from `other`, leaving it empty.
    ///
    /// Caller contract: the two stores' entity namespaces are disjoint.
    pub fn merge(&mut self, other: &mut ComponentStore<T>) {
        self.components.reserve(other.components.len());
        self.entities.reserve(other.entities.len());
        let components = std::mem::take(&mut other.components);
        let entities = std::mem::take(&mut other.entities);
        other.lookup.clear();
        for (entity, component) in entities.into_iter().zip(components) {
            debug_assert!(
                !self.lookup.contains_key(&entity),
                "merge with overlapping entity {entity:?}"
            );
            self.lookup.insert(entity, self.components.len());
            self.components.push(component);
            self.entities.push(entity);
        }
    }

    pub fn clear(&mut self) {
        self.components.clear();
        self.entities.clear();
        self.lookup.clear();
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Iterate `(owner, component)` pairs in dense order.
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.entities.iter().copied().zip(self.components.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> {
        self.entities.iter().copied().zip(self.components.iter_mut())
    }
}

impl<T> Index<usize> for ComponentStore<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.components[index]
    }
}

impl<T> IndexMut<usize> for ComponentStore<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.components[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn entity(id: u32) -> Entity {
        Entity::from_bits(id)
    }

    #[test]
    fn create_then_get() {
        let mut store: ComponentStore<i32> = ComponentStore::new();
        *store.create(entity(1)) = 41;
        *store.create(entity(2)) = 42;
        assert_eq!(store.get(entity(1)), Some(&41));
        assert_eq!(store.get(entity(2)), Some(&42));
        assert_eq!(store.get(entity(3)), None);
        assert!(store.contains(entity(1)));
        assert!(!store.contains(entity(99)));
    }

    #[test]
    fn remove_then_get_is_absent() {
        let mut store: ComponentStore<i32> = ComponentStore::new();
        *store.create(entity(1)) = 1;
        store.remove(entity(1));
        assert_eq!(store.get(entity(1)), None);
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn remove_missing_is_a_noop() {
        let mut store: ComponentStore<i32> = ComponentStore::new();
        *store.create(entity(1)) = 1;
        store.remove(entity(50));
        store.remove_keep_sorted(entity(50));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn swap_remove_relocates_last_and_fixes_lookup() {
        let mut store: ComponentStore<i32> = ComponentStore::new();
        *store.create(entity(1)) = 10;
        *store.create(entity(2)) = 20;
        *store.create(entity(3)) = 30;

        store.remove(entity(1));

        // Entity 3 moved into slot 0 and must still resolve.
        assert_eq!(store.get(entity(3)), Some(&30));
        assert_eq!(store.index_of(entity(3)), Some(0));
        assert_eq!(store.get(entity(2)), Some(&20));
    }

    #[test]
    fn random_churn_keeps_store_consistent() {
        let mut store: ComponentStore<u32> = ComponentStore::new();
        let mut rng = StdRng::seed_from_u64(1234);
        let mut live: HashMap<Entity, u32> = HashMap::new();
        let mut insertions = 0usize;
        let mut removals = 0usize;

        for id in 1..=200u32 {
            let e = entity(id);
            if rng.gen_bool(0.7) || live.is_empty() {
                *store.create(e) = id * 7;
                live.insert(e, id * 7);
                insertions += 1;
            } else {
                let victim = *live.keys().next().unwrap();
                store.remove(victim);
                live.remove(&victim);
                removals += 1;
            }
            // Occasionally rewrite a survivor: its latest value must be
            // the one that survives all the swap-removes.
            if rng.gen_bool(0.2) {
                if let Some(&target) = live.keys().next() {
                    let rewritten = id * 1000;
                    *store.get_mut(target).unwrap() = rewritten;
                    live.insert(target, rewritten);
                }
            }
        }

        assert_eq!(store.len(), insertions - removals);
        for (e, value) in &live {
            assert_eq!(store.get(*e), Some(value));
            // Dense slot and reverse map agree.
            let slot = store.index_of(*e).unwrap();
            assert_eq!(store.entity_at(slot), *e);
        }
    }

    #[test]
    fn remove_keep_sorted_preserves_order() {
        let mut store: ComponentStore<u32> = ComponentStore::new();
        for id in 1..=6 {
            *store.create(entity(id)) = id;
        }
        store.remove_keep_sorted(entity(3));

        let order: Vec<u32> = store.iter().map(|(e, _)| e.to_bits()).collect();
        assert_eq!(order, vec![1, 2, 4, 5, 6]);
        for (e, value) in store.iter() {
            assert_eq!(e.to_bits(), *value);
        }
    }

    #[test]
    fn move_last_to_shifts_range_up() {
        let mut store: ComponentStore<u32> = ComponentStore::new();
        for id in 1..=5 {
            *store.create(entity(id)) = id;
        }
        store.move_last_to(1);

        let order: Vec<u32> = store.iter().map(|(e, _)| e.to_bits()).collect();
        assert_eq!(order, vec![1, 5, 2, 3, 4]);
        // Every entity still resolves to its own value through the map.
        for id in 1..=5 {
            assert_eq!(store.get(entity(id)), Some(&id));
        }
    }

    #[test]
    fn merge_appends_and_empties_other() {
        let mut a: ComponentStore<u32> = ComponentStore::new();
        let mut b: ComponentStore<u32> = ComponentStore::new();
        *a.create(entity(1)) = 1;
        *a.create(entity(2)) = 2;
        *b.create(entity(100)) = 100;
        *b.create(entity(101)) = 101;

        a.merge(&mut b);

        assert_eq!(a.len(), 4);
        assert!(b.is_empty());
        assert_eq!(a.get(entity(100)), Some(&100));
        assert_eq!(a.get(entity(2)), Some(&2));
    }

    #[test]
    fn clear_empties_everything() {
        let mut store: ComponentStore<u32> = ComponentStore::new();
        *store.create(entity(1)) = 1;
        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.get(entity(1)), None);
    }

    #[test]
    fn indexed_access_matches_entity_at() {
        let mut store: ComponentStore<u32> = ComponentStore::new();
        *store.create(entity(9)) = 90;
        *store.create(entity(8)) = 80;
        for i in 0..store.len() {
            let e = store.entity_at(i);
            assert_eq!(store.get(e), Some(&store[i]));
        }
    }
}
