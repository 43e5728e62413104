use cgmath::Matrix4;
use instant::Duration;
use slot_machine::{
    data_structures::instance::{Transform, WorldTransform},
    frame::FrameSlots,
    scene::{GLOBAL_UNIFORM_BINDING, INSTANCE_UNIFORM_BINDING},
};

use crate::common::test_utils::{
    FakeMesh, FakeSet, GLOBAL_SET, RecordingWriter, expected_mvp, frame, scene_with_offsets,
};

mod common;

const OFFSETS: [[f32; 3]; 3] = [[0.0, 0.0, 0.0], [-0.15, 0.93, -0.15], [2.0, -1.0, 3.0]];

#[test]
fn writes_exact_mvp_into_the_current_slot_only() {
    let mut scene = scene_with_offsets(&OFFSETS);
    let mut writer = RecordingWriter::default();

    scene.update_uniforms(&mut writer, &frame(1, 800.0 / 600.0)).unwrap();

    for (i, offset) in OFFSETS.iter().enumerate() {
        let writes = writer.for_set(i as u32 + 1);
        assert_eq!(writes.len(), 1, "instance {i} written {} times", writes.len());
        assert_eq!(writes[0].frame, 1);
        assert_eq!(writes[0].binding, INSTANCE_UNIFORM_BINDING);
        let world = WorldTransform::from(Transform::from(*offset));
        assert_eq!(writes[0].mvp(), expected_mvp(800.0 / 600.0, &world));
        assert_eq!(scene.instances()[i].uniform.mvp(), writes[0].mvp());
    }

    assert!(writer.writes.iter().all(|w| w.frame == 1));
    assert_eq!(writer.writes.len(), OFFSETS.len() + 1);
}

#[test]
fn global_block_is_written_once_per_frame() {
    let mut scene = scene_with_offsets(&OFFSETS);
    let mut writer = RecordingWriter::default();

    scene.update_uniforms(&mut writer, &frame(0, 1.0)).unwrap();

    let globals = writer.for_set(GLOBAL_SET.0);
    assert_eq!(globals.len(), 1);
    assert_eq!(globals[0].binding, GLOBAL_UNIFORM_BINDING);
    assert_eq!(globals[0].global().eye_pos, [6.0, 3.0, 10.0]);
    assert_eq!(globals[0].global().light_dir, [1.0, 2.0, 1.5]);
}

#[test]
fn consecutive_frames_alternate_slots() {
    let mut scene = scene_with_offsets(&OFFSETS[..1]);
    let mut writer = RecordingWriter::default();
    let mut slots = FrameSlots::new(2);

    for _ in 0..4 {
        scene.update_uniforms(&mut writer, &frame(slots.current(), 1.5)).unwrap();
        slots.advance();
    }

    let frames: Vec<_> = writer.for_set(1).iter().map(|w| w.frame).collect();
    assert_eq!(frames, vec![0, 1, 0, 1]);
}

#[test]
fn static_transforms_give_identical_frames() {
    let mut scene = scene_with_offsets(&OFFSETS);
    let mut writer = RecordingWriter::default();

    scene.update_uniforms(&mut writer, &frame(0, 1.5)).unwrap();
    scene.update_uniforms(&mut writer, &frame(1, 1.5)).unwrap();

    let first = writer.for_set(2);
    assert_eq!(first[0].data, first[1].data);
}

#[test]
fn animated_transform_advances_by_frame_delta() {
    let mut scene = scene_with_offsets(&[]);
    let mut elapsed = Duration::ZERO;
    scene.register(slot_machine::scene::RenderableInstance::new(
        "spinner",
        std::sync::Arc::new(FakeMesh {
            id: 2,
            index_count: 3,
        }),
        FakeSet(9),
        WorldTransform::animated(
            Transform::new(),
            Box::new(move |dt| {
                elapsed += dt;
                Transform::from([0.0, elapsed.as_secs_f32(), 0.0])
            }),
        ),
    ));
    let mut writer = RecordingWriter::default();

    // frame() carries a 16ms delta
    scene.update_uniforms(&mut writer, &frame(0, 1.0)).unwrap();
    scene.update_uniforms(&mut writer, &frame(1, 1.0)).unwrap();

    let moved = WorldTransform::from(Transform::from([0.0, 0.032, 0.0]));
    let last = writer.for_set(9)[1].mvp();
    let expected: Matrix4<f32> = expected_mvp(1.0, &moved);
    for c in 0..4 {
        for r in 0..4 {
            assert!((last[c][r] - expected[c][r]).abs() < 1e-5);
        }
    }
    assert!((scene.instances()[0].world.transform().position.y - 0.032).abs() < 1e-6);
}
