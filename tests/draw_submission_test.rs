use crate::common::test_utils::{
    Command, GLOBAL_SET, PIPELINE, RecordingTarget, RecordingWriter, frame, scene_with_offsets,
};

mod common;

#[test]
fn binds_pipeline_and_global_set_once_before_instances() {
    let scene = scene_with_offsets(&[[0.0; 3], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]]);
    let mut target = RecordingTarget::default();

    scene.populate_commands(&mut target, 1);

    let mut expected = vec![
        Command::BindPipeline(PIPELINE),
        Command::BindSet {
            slot: 0,
            set: GLOBAL_SET.0,
            frame: 1,
        },
    ];
    for set in 1..=3 {
        expected.push(Command::BindSet { slot: 1, set, frame: 1 });
        expected.push(Command::BindMesh(1));
        expected.push(Command::DrawIndexed {
            index_count: 36,
            instance_count: 1,
        });
    }
    assert_eq!(target.commands, expected);
}

#[test]
fn empty_scene_only_binds_shared_state() {
    let scene = scene_with_offsets(&[]);
    let mut target = RecordingTarget::default();

    scene.populate_commands(&mut target, 0);

    assert_eq!(target.commands.len(), 2);
    assert!(
        !target
            .commands
            .iter()
            .any(|c| matches!(c, Command::DrawIndexed { .. }))
    );
}

#[test]
fn draws_use_the_frame_slot_just_updated() {
    let mut scene = scene_with_offsets(&[[0.0; 3], [0.5, 0.5, 0.5]]);
    let mut writer = RecordingWriter::default();
    let mut target = RecordingTarget::default();

    let ctx = frame(1, 4.0 / 3.0);
    scene.update_uniforms(&mut writer, &ctx).unwrap();
    scene.populate_commands(&mut target, ctx.frame_index);

    for command in &target.commands {
        if let Command::BindSet { set, frame, .. } = command {
            assert_eq!(*frame, 1);
            assert!(writer.for_set(*set).iter().any(|w| w.frame == *frame));
        }
    }
}
