//! # Animation Pass — Sampling Clips into Transforms
//!
//! Stage 2 of the frame. For every clip that is playing (or paused mid-way,
//! timer ≠ 0), each channel samples its keyframe table at the current timer
//! and writes the result into the target transform's *local* fields,
//! marking it dirty. The local recompute pass (stage 4) folds the new
//! values into world matrices — animation never writes a world matrix
//! directly.
//!
//! ## Keyframe Search
//!
//! The right keyframe is found by a linear forward scan from the first key,
//! every update. Nothing is cached across frames: clips are bounded to a
//! few dozen keys in practice, and O(keys) per channel per update is cheap
//! compared to the bookkeeping a resume-cursor would need under timer
//! rewinds and loops.
//!
//! ## Timer Edge Cases (order matters)
//!
//! After sampling: the timer advances only while playing; a looped clip
//! that ran past the end wraps to exactly 0.0; and *then* the timer is
//! clamped to the clip length. The clamp runs after the wrap check, so a
//! looped clip is clamped back to its length on the very frame it would
//! otherwise wrap — it wraps on the following update.

use glam::{Quat, Vec3};

use crate::components::{AnimationComponent, ChannelPath, SamplerMode, TransformComponent};
use crate::ecs::ComponentStore;

/// Stage 2: sample every active animation into its target transforms and
/// advance the timers.
pub fn run_animation_update(
    animations: &mut ComponentStore<AnimationComponent>,
    transforms: &mut ComponentStore<TransformComponent>,
    dt: f32,
) {
    for i in 0..animations.len() {
        let animation = &mut animations[i];
        if !animation.is_playing() && animation.timer == 0.0 {
            continue;
        }

        for channel in &animation.channels {
            let Some(sampler) = animation.samplers.get(channel.sampler_index) else {
                log::warn!(
                    "animation channel targets sampler {} but only {} exist; skipping",
                    channel.sampler_index,
                    animation.samplers.len()
                );
                continue;
            };
            let Some(&last_time) = sampler.keyframe_times.last() else {
                continue;
            };

            let (key_left, key_right) = if last_time < animation.timer {
                // Timer ran past the final key: clamp both sides to it.
                let last = sampler.keyframe_times.len() - 1;
                (last, last)
            } else {
                // First key at or after the timer.
                let mut key_right = 0;
                while sampler.keyframe_times[key_right] < animation.timer {
                    key_right += 1;
                }
                (key_right.saturating_sub(1), key_right)
            };

            let Some(transform) = transforms.get_mut(channel.target) else {
                continue;
            };

            if sampler.mode == SamplerMode::Step || key_left == key_right {
                // Snap to the left key, no blending.
                match channel.path {
                    ChannelPath::Translation => {
                        if let Some(value) = read_vec3(&sampler.keyframe_data, key_left) {
                            transform.translation_local = value;
                        }
                    }
                    ChannelPath::Rotation => {
                        if let Some(value) = read_quat(&sampler.keyframe_data, key_left) {
                            transform.rotation_local = value;
                        }
                    }
                    ChannelPath::Scale => {
                        if let Some(value) = read_vec3(&sampler.keyframe_data, key_left) {
                            transform.scale_local = value;
                        }
                    }
                }
            } else {
                let left_time = sampler.keyframe_times[key_left];
                let right_time = sampler.keyframe_times[key_right];
                // Duplicate keyframe times would make this a 0/0; pin the
                // factor to the left key instead of letting NaN through.
                let t = if right_time > left_time {
                    (animation.timer - left_time) / (right_time - left_time)
                } else {
                    0.0
                };

                match channel.path {
                    ChannelPath::Translation => {
                        if let (Some(left), Some(right)) = (
                            read_vec3(&sampler.keyframe_data, key_left),
                            read_vec3(&sampler.keyframe_data, key_right),
                        ) {
                            transform.translation_local = left.lerp(right, t);
                        }
                    }
                    ChannelPath::Rotation => {
                        if let (Some(left), Some(right)) = (
                            read_quat(&sampler.keyframe_data, key_left),
                            read_quat(&sampler.keyframe_data, key_right),
                        ) {
                            transform.rotation_local = left.slerp(right, t).normalize();
                        }
                    }
                    ChannelPath::Scale => {
                        if let (Some(left), Some(right)) = (
                            read_vec3(&sampler.keyframe_data, key_left),
                            read_vec3(&sampler.keyframe_data, key_right),
                        ) {
                            transform.scale_local = left.lerp(right, t);
                        }
                    }
                }
            }

            transform.set_dirty();
        }

        if animation.is_playing() {
            animation.timer += dt;
        }

        let length = animation.length();
        if animation.is_looped() && animation.timer > length {
            animation.timer = 0.0;
        }
        animation.timer = animation.timer.min(length);
    }
}

fn read_vec3(data: &[f32], key: usize) -> Option<Vec3> {
    let chunk = data.get(key * 3..key * 3 + 3)?;
    Some(Vec3::new(chunk[0], chunk[1], chunk[2]))
}

fn read_quat(data: &[f32], key: usize) -> Option<Quat> {
    let chunk = data.get(key * 4..key * 4 + 4)?;
    Some(Quat::from_xyzw(chunk[0], chunk[1], chunk[2], chunk[3]))
}
