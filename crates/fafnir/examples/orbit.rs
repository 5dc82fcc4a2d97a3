//! A headless frame loop: an animated rig with a parented prop, stepped
//! for a few seconds while logging where things end up.
//!
//! Run with `RUST_LOG=info cargo run --example orbit`.

use fafnir::prelude::*;

fn main() {
    env_logger::init();

    let mut scene = Scene::new();

    // A sun so the weather state has something to mirror.
    let sun = scene.create_light_entity(
        "sun",
        Vec3::new(0.0, 50.0, 0.0),
        Vec3::new(1.0, 0.95, 0.9),
        8.0,
        0.0,
    );
    scene.lights.get_mut(sun).unwrap().light_type = LightType::Directional;

    // A rig spinning in place, with a prop held one unit out.
    let rig = scene.create_object_entity("rig");
    let prop = scene.create_object_entity("prop");
    scene
        .transforms
        .get_mut(prop)
        .unwrap()
        .translate(Vec3::new(1.0, 0.0, 0.0));
    scene.attach(prop, rig);

    // Keyframed quarter turns: a full revolution over four seconds.
    let quarter = |i: u32| Quat::from_rotation_y(i as f32 * std::f32::consts::FRAC_PI_2);
    let clip_entity = scene.create_entity();
    let clip = scene.animations.create(clip_entity);
    let mut times = Vec::new();
    let mut data = Vec::new();
    for i in 0..=4 {
        times.push(i as f32);
        let q = quarter(i);
        data.extend_from_slice(&[q.x, q.y, q.z, q.w]);
    }
    clip.samplers.push(AnimationSampler {
        keyframe_times: times,
        keyframe_data: data,
        mode: SamplerMode::Linear,
    });
    clip.channels.push(AnimationChannel {
        target: rig,
        path: ChannelPath::Rotation,
        sampler_index: 0,
    });
    clip.set_looped(true);
    clip.play();

    let camera = scene.create_camera_entity("main", 1920.0, 1080.0, 0.1, 500.0, 1.0);
    scene
        .transforms
        .get_mut(camera)
        .unwrap()
        .translate(Vec3::new(0.0, 2.0, -8.0));

    let dt = 1.0 / 60.0;
    for frame in 0..240 {
        scene.update(&mut NullPhysics, dt);

        if frame % 60 == 0 {
            let p = scene.transforms.get(prop).unwrap().world_position();
            log::info!(
                "t={:.2}s prop at ({:+.2}, {:+.2}, {:+.2})",
                frame as f32 * dt,
                p.x,
                p.y,
                p.z
            );
        }
    }

    let copy = scene.duplicate(prop);
    log::info!(
        "duplicated prop {} -> {} ({} entities total)",
        prop,
        copy,
        scene.count_entities()
    );
}
