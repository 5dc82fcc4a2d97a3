//! CPU-side particle bookkeeping.
//!
//! The actual particle simulation (GPU emit/advect for emitters, strand
//! physics for hair) is external. What lives here is the state the
//! simulator needs resolved against the scene each frame: emission
//! accumulation for emitters, and the world snapshot + padded bounds hair
//! grows from its scalp mesh.

use glam::Mat4;
use serde::{Deserialize, Serialize};

use crate::ecs::Entity;
use crate::math::Aabb;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmitterComponent {
    /// Particles per second.
    pub rate: f32,
    pub particle_life: f32,
    pub particle_size: f32,
    pub paused: bool,

    /// Fractional particles carried between frames.
    pub accumulation: f32,
    /// Whole particles to emit this frame, derived by the particle pass.
    pub emit_count: u32,
}

impl Default for EmitterComponent {
    fn default() -> Self {
        Self {
            rate: 10.0,
            particle_life: 1.0,
            particle_size: 1.0,
            paused: false,
            accumulation: 0.0,
            emit_count: 0,
        }
    }
}

impl EmitterComponent {
    /// Advance the emission accumulator, splitting out the whole particles
    /// due this frame.
    pub fn update(&mut self, dt: f32) {
        if self.paused {
            self.emit_count = 0;
            return;
        }
        self.accumulation += self.rate * dt;
        self.emit_count = self.accumulation as u32;
        self.accumulation -= self.emit_count as f32;
    }
}

/// Hair strands grown from a scalp mesh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HairParticleComponent {
    /// The scalp mesh entity strands are rooted on.
    pub mesh_id: Entity,
    /// Strand length; also pads the bounds in every direction.
    pub length: f32,
    pub strand_count: u32,

    // Derived per frame:
    pub world: Mat4,
    pub aabb: Aabb,
}

impl Default for HairParticleComponent {
    fn default() -> Self {
        Self {
            mesh_id: Entity::INVALID,
            length: 1.0,
            strand_count: 0,
            world: Mat4::IDENTITY,
            aabb: Aabb::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emitter_accumulates_fractional_particles() {
        let mut emitter = EmitterComponent {
            rate: 10.0,
            ..Default::default()
        };
        emitter.update(0.05); // 0.5 particles
        assert_eq!(emitter.emit_count, 0);
        emitter.update(0.05); // 1.0 accumulated
        assert_eq!(emitter.emit_count, 1);
        assert!(emitter.accumulation < 1.0);
    }

    #[test]
    fn paused_emitter_emits_nothing() {
        let mut emitter = EmitterComponent {
            rate: 100.0,
            paused: true,
            ..Default::default()
        };
        emitter.update(1.0);
        assert_eq!(emitter.emit_count, 0);
    }
}
