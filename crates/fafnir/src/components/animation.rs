//! # Animation — Keyframe Clips Driving Transform Fields
//!
//! An [`AnimationComponent`] is a clip: a list of channels, each binding a
//! target entity's translation, rotation, or scale to a sampler. A sampler
//! is the keyframe table — strictly increasing times, a flat value buffer
//! (3 floats per key for vectors, 4 for rotations), and an interpolation
//! mode.
//!
//! ```text
//! channels: [ (entity 7, Translation, sampler 0),
//!             (entity 7, Rotation,    sampler 1) ]
//! samplers: [ { times: [0, 1, 2], data: [x y z, x y z, x y z], Linear },
//!             { times: [0, 2],    data: [x y z w, x y z w],    Linear } ]
//! ```
//!
//! Playback state lives on the component: a timer, a playing flag, and a
//! loop flag. The animation system (stage 2 of the frame) samples every
//! active clip into the target transforms' *local* fields and advances the
//! timer; it never touches world matrices directly.

use serde::{Deserialize, Serialize};

use crate::ecs::Entity;

/// How a sampler blends between keyframes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SamplerMode {
    /// Snap to the left keyframe, no blending.
    Step,
    /// Lerp vectors, slerp rotations.
    #[default]
    Linear,
}

/// Which transform field a channel writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelPath {
    Translation,
    Rotation,
    Scale,
}

/// A keyframe table: times plus a flat value buffer.
///
/// `keyframe_data` holds 3 floats per keyframe for translation/scale
/// samplers and 4 for rotation samplers; times must be strictly
/// increasing. Malformed samplers are skipped at runtime, never an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnimationSampler {
    pub keyframe_times: Vec<f32>,
    pub keyframe_data: Vec<f32>,
    pub mode: SamplerMode,
}

/// Binds one target entity field to a sampler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimationChannel {
    pub target: Entity,
    pub path: ChannelPath,
    pub sampler_index: usize,
}

/// A keyframe clip with playback state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnimationComponent {
    pub channels: Vec<AnimationChannel>,
    pub samplers: Vec<AnimationSampler>,
    pub timer: f32,
    playing: bool,
    looped: bool,
}

impl AnimationComponent {
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_looped(&self) -> bool {
        self.looped
    }

    pub fn play(&mut self) {
        self.playing = true;
    }

    /// Freeze the timer in place; the clip's last sampled pose sticks.
    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Stop and rewind. The clip also stops being sampled (a paused clip
    /// mid-way through is still sampled each frame; a stopped one is not).
    pub fn stop(&mut self) {
        self.playing = false;
        self.timer = 0.0;
    }

    pub fn set_looped(&mut self, looped: bool) {
        self.looped = looped;
    }

    /// Clip length: the latest keyframe time across all samplers.
    pub fn length(&self) -> f32 {
        self.samplers
            .iter()
            .filter_map(|sampler| sampler.keyframe_times.last().copied())
            .fold(0.0, f32::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_is_latest_keyframe_across_samplers() {
        let mut animation = AnimationComponent::default();
        animation.samplers.push(AnimationSampler {
            keyframe_times: vec![0.0, 1.0],
            keyframe_data: vec![0.0; 6],
            mode: SamplerMode::Linear,
        });
        animation.samplers.push(AnimationSampler {
            keyframe_times: vec![0.0, 2.5],
            keyframe_data: vec![0.0; 6],
            mode: SamplerMode::Step,
        });
        assert_eq!(animation.length(), 2.5);
    }

    #[test]
    fn length_of_empty_clip_is_zero() {
        assert_eq!(AnimationComponent::default().length(), 0.0);
    }

    #[test]
    fn stop_rewinds_pause_does_not() {
        let mut animation = AnimationComponent::default();
        animation.play();
        animation.timer = 1.5;
        animation.pause();
        assert_eq!(animation.timer, 1.5);
        animation.stop();
        assert_eq!(animation.timer, 0.0);
        assert!(!animation.is_playing());
    }
}
