//! Basic scene demo
//!
//! Builds a small scene (a green cube wearing a wireframe shell that shares a
//! clone of its geometry) and single-steps the loop manually. See the
//! `animate` binary for the canonical callback-driven form.

use scene_engine::foundation::logging;
use scene_engine::prelude::*;
use scene_engine::scene::hex_color;

const ALICE_BLUE: u32 = 0xF0F8FF;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();
    log::info!("starting basic demo...");

    let config = EngineConfig::default();
    let window = HeadlessWindow::create(&config.window)?;
    let mut engine = Engine::new(&config, Box::new(window), Box::new(NullBackend::new()));

    let scene = engine.scene_mut();
    scene.background = Some(hex_color(ALICE_BLUE));

    let cube_geometry = scene.add_geometry(Geometry::cube(1.0));
    let green = scene.add_material(Material::new().with_hex_color(0x00FF00));
    let cube = scene.spawn_mesh(cube_geometry, green);
    scene.add(scene.root(), cube)?;

    // Wireframe shell over the cube, sharing a clone of its geometry.
    let shell_geometry = scene
        .geometry(cube_geometry)
        .ok_or("cube geometry missing from registry")?
        .clone();
    let shell_geometry = scene.add_geometry(shell_geometry);
    let wire = scene.add_material(Material::new().with_hex_color(0xFFFFFF).with_wireframe(true));
    let shell = scene.spawn_mesh(shell_geometry, wire);
    scene.add(cube, shell)?;

    let light = scene.spawn_light(Light::ambient(0.8));
    scene.add(scene.root(), light)?;

    let camera = scene.spawn_camera(PerspectiveProjection::new(
        75.0,
        config.window.aspect(),
        0.1,
        1000.0,
    ));
    scene.add(scene.root(), camera)?;
    scene.set_position(camera, Vec3::new(0.0, 0.0, 5.0));
    engine.set_active_camera(camera);

    let viewport = engine.window_size();
    engine.add_controller(Box::new(OrbitControls::new(camera, Vec3::zeros(), viewport)));

    // Manual loop driving; without a user to close the window, stop after a
    // fixed number of frames. The close is observed at the top of the next
    // iteration, which also runs the loop teardown.
    let mut frames = 0u32;
    while engine.frame()? {
        frames += 1;
        if frames == 300 {
            engine.request_close();
        }
    }

    log::info!("basic demo finished after {} frames", engine.frame_count());
    Ok(())
}
