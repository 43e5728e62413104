use cgmath::{EuclideanSpace, InnerSpace, Point3, SquareMatrix, Transform as _, Vector3};
use slot_machine::{
    camera::{CameraState, ClipConvention, Projection, aspect_ratio},
    data_structures::instance::{Transform, WorldTransform},
};

use crate::common::test_utils::{RecordingWriter, frame, scene_with_offsets};

mod common;

const ASPECTS: [f32; 6] = [0.25, 0.75, 1.0, 4.0 / 3.0, 16.0 / 9.0, 3.5];

#[test]
fn y_flip_inverts_only_the_y_scale() {
    for aspect in ASPECTS {
        let flipped = Projection::default().calc_matrix(aspect);
        let upright = Projection::default()
            .with_convention(ClipConvention::YUp)
            .calc_matrix(aspect);
        assert!(flipped[1][1] < 0.0, "aspect {aspect}");
        assert_eq!(flipped[1][1].signum(), -upright[1][1].signum());
        assert_eq!(flipped[0], upright[0]);
        assert_eq!(flipped[2], upright[2]);
        assert_eq!(flipped[3], upright[3]);
    }
}

#[test]
fn projection_maps_near_and_far_to_unit_depth() {
    let projection = Projection::default();
    let proj = projection.calc_matrix(1.0);
    let near = proj.transform_point(Point3::new(0.0, 0.0, -projection.znear));
    let far = proj.transform_point(Point3::new(0.0, 0.0, -projection.zfar));
    assert!(near.z.abs() < 1e-5);
    assert!((far.z - 1.0).abs() < 1e-5);
}

#[test]
fn inverse_view_returns_to_the_eye() {
    let camera = CameraState::default();
    assert_eq!(camera.eye(), Point3::new(6.0, 3.0, 10.0));

    let inverse = camera.calc_matrix().invert().unwrap();
    let eye = inverse.transform_point(Point3::origin());
    assert!((eye - camera.eye()).magnitude() < 1e-5);

    // the camera looks down -z in view space
    let forward = inverse.transform_vector(-Vector3::unit_z());
    let to_target = (camera.target - camera.eye()).normalize();
    assert!((forward - to_target).magnitude() < 1e-5);
}

#[test]
fn resize_only_changes_the_aspect_ratio() {
    let mut scene = scene_with_offsets(&[[0.0; 3], [-0.15, 0.93, -0.15]]);
    let view = scene.camera.calc_matrix();
    let worlds: Vec<_> = scene.instances().iter().map(|i| i.world.matrix()).collect();

    let mut before = RecordingWriter::default();
    scene.update_uniforms(&mut before, &frame(0, aspect_ratio(800, 600))).unwrap();
    let mut after = RecordingWriter::default();
    scene.update_uniforms(&mut after, &frame(0, aspect_ratio(1024, 768))).unwrap();

    assert_eq!(scene.camera.calc_matrix(), view);
    let worlds_after: Vec<_> = scene.instances().iter().map(|i| i.world.matrix()).collect();
    assert_eq!(worlds, worlds_after);
    // 800x600 and 1024x768 share the 4:3 ratio
    assert_eq!(before.writes.len(), after.writes.len());
    for (b, a) in before.writes.iter().zip(&after.writes) {
        assert_eq!(b.data, a.data);
    }

    let mut wide = RecordingWriter::default();
    scene.update_uniforms(&mut wide, &frame(0, aspect_ratio(1280, 720))).unwrap();
    let mvp_4_3 = before.for_set(1)[0].mvp();
    let mvp_16_9 = wide.for_set(1)[0].mvp();
    assert_ne!(mvp_4_3, mvp_16_9);
    let proj_4_3 = scene.projection.calc_matrix(4.0 / 3.0);
    let proj_16_9 = scene.projection.calc_matrix(16.0 / 9.0);
    assert_eq!(mvp_16_9, proj_16_9 * view * worlds[0]);
    assert_eq!(mvp_4_3, proj_4_3 * view * worlds[0]);
}

#[test]
fn offsets_become_pure_translations() {
    let world = WorldTransform::from(Transform::from([0.15, 0.93, -0.15]));
    let m = world.matrix();
    assert_eq!(m.w.truncate(), Vector3::new(0.15, 0.93, -0.15));
    assert_eq!(m.x.truncate(), Vector3::unit_x());
    assert_eq!(m.y.truncate(), Vector3::unit_y());
    assert_eq!(m.z.truncate(), Vector3::unit_z());
}
