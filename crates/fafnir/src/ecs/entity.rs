//! # Entity — Lightweight Identifiers for Scene Objects
//!
//! An [`Entity`] is just a number — it doesn't "contain" anything. Component
//! stores map entities to data; an entity's "type" is nothing more than the
//! set of stores it appears in.
//!
//! ## Design: Opaque Non-Zero Ids
//!
//! Ids are process-unique `u32` values. Zero is reserved as the invalid
//! sentinel ([`Entity::INVALID`]) so components can hold an "empty"
//! reference (an object with no mesh, a link with no parent) without an
//! `Option` in hot data. Normal creation draws from a monotonic counter;
//! entity duplication draws a fresh *random* id so the copy can never
//! collide with its source (see [`EntityGenerator::random`]).
//!
//! There is no generation counter here: stores never hand out ids, and
//! stale ids simply fail their store lookup. That is the contract the frame
//! systems are written against — every cross-entity relation is re-resolved
//! through a store each pass, never cached.

use std::fmt;

use rand::Rng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

/// A lightweight handle to a scene object.
///
/// Zero is never a live entity; [`Entity::INVALID`] marks empty references.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Entity(u32);

impl Entity {
    /// The reserved "no entity" value.
    pub const INVALID: Entity = Entity(0);

    /// True for every id handed out by a generator, false for
    /// [`Entity::INVALID`].
    pub fn is_valid(self) -> bool {
        self.0 != 0
    }

    /// Raw id, for diagnostics and wire formats.
    pub fn to_bits(self) -> u32 {
        self.0
    }

    /// Rebuild an entity from its raw id.
    pub fn from_bits(bits: u32) -> Self {
        Entity(bits)
    }
}

impl Default for Entity {
    fn default() -> Self {
        Entity::INVALID
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hands out fresh entity ids.
///
/// Sequential ids start at 1 and never repeat within a generator's
/// lifetime. Random ids are used by duplication; the caller supplies the
/// RNG so tests can seed it.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct EntityGenerator {
    next: u32,
}

impl EntityGenerator {
    pub fn new() -> Self {
        Self { next: 0 }
    }

    /// The next sequential id.
    pub fn generate(&mut self) -> Entity {
        self.next = self.next.wrapping_add(1);
        if self.next == 0 {
            // 4 billion creations later: skip the reserved zero.
            self.next = 1;
        }
        Entity(self.next)
    }

    /// A random non-zero id, guaranteed different from `avoid`.
    pub fn random(rng: &mut StdRng, avoid: Entity) -> Entity {
        loop {
            let id = Entity(rng.gen_range(1..=u32::MAX));
            if id != avoid {
                return id;
            }
        }
    }
}
