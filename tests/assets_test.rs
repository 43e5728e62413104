#![cfg(not(target_arch = "wasm32"))]

use slot_machine::slot_machine::{SlotAssets, layout};

fn load_shipped_assets() -> SlotAssets {
    tokio::runtime::Runtime::new()
        .unwrap()
        .block_on(SlotAssets::load(layout()))
        .unwrap()
}

#[test]
fn every_layout_asset_is_shipped_and_drawable() {
    let assets = load_shipped_assets();
    for desc in layout() {
        let mesh = assets.mesh(desc.model).unwrap();
        mesh.ensure_drawable(desc.model).unwrap();
        assert_eq!(mesh.indices.len() % 3, 0, "{}", desc.model);
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len()));

        let img = assets.image(desc.texture).unwrap();
        assert!(img.width() > 0 && img.height() > 0, "{}", desc.texture);
    }
}

#[test]
fn wheels_fit_on_top_of_the_body() {
    let assets = load_shipped_assets();
    let top = |path: &str| {
        assets
            .mesh(path)
            .unwrap()
            .vertices
            .iter()
            .map(|v| v.position[1])
            .fold(f32::MIN, f32::max)
    };
    let wheel_radius = top(layout()[1].model);
    // wheels are centred 0.93 up and must stay below the top of the body
    assert!(layout()[1].offset[1] + wheel_radius < top(layout()[0].model));
}
