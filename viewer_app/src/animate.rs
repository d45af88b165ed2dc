//! Animated scene demo
//!
//! The canonical loop form: `animate` runs until the window closes, here
//! triggered by an auxiliary thread that requests close through the
//! thread-safe signal after a couple of seconds. The per-frame callback spins
//! the cube; the orbit controller owns the camera.

use scene_engine::prelude::*;
use scene_engine::scene::{hex_color, ShadingModel, Side};
use std::thread;
use std::time::Duration;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    log::info!("starting animate demo...");

    let config = EngineConfig::default();
    let window = HeadlessWindow::create(&config.window)?;
    let close_signal = window.close_signal();
    let mut engine = Engine::new(&config, Box::new(window), Box::new(NullBackend::new()));

    let scene = engine.scene_mut();
    scene.background = Some(hex_color(0xF0F8FF));

    // Gray ground plane, rotated flat and pushed down.
    let plane_geometry = scene.add_geometry(Geometry::plane(10.0, 10.0));
    let gray = scene.add_material(
        Material::new()
            .with_hex_color(0x808080)
            .with_side(Side::Double),
    );
    let ground = scene.spawn_mesh(plane_geometry, gray);
    scene.add(scene.root(), ground)?;
    if let Some(local) = scene.local_mut(ground) {
        local.rotation = Quat::from_axis_angle(&Vec3::x_axis(), (-90.0f32).to_radians());
        local.position = Vec3::new(0.0, -1.0, 0.0);
    }

    // Semi-transparent green cube with a wireframe shell child.
    let cube_geometry = scene.add_geometry(Geometry::cube(1.0));
    let green = scene.add_material(
        Material::new()
            .with_hex_color(0x00FF00)
            .with_opacity(0.5),
    );
    let cube = scene.spawn_mesh(cube_geometry, green);
    scene.add(scene.root(), cube)?;
    scene.set_position(cube, Vec3::new(-2.0, 0.0, 0.0));

    let shell_geometry = scene
        .geometry(cube_geometry)
        .ok_or("cube geometry missing from registry")?
        .clone();
    let shell_geometry = scene.add_geometry(shell_geometry);
    let wire = scene.add_material(Material::new().with_hex_color(0xFFFFFF).with_wireframe(true));
    let shell = scene.spawn_mesh(shell_geometry, wire);
    scene.add(cube, shell)?;

    // Blue sphere on the other side.
    let sphere_geometry = scene.add_geometry(Geometry::sphere(0.5, 24, 16));
    let blue = scene.add_material(
        Material::new()
            .with_hex_color(0x0000FF)
            .with_shading(ShadingModel::Lambert),
    );
    let sphere = scene.spawn_mesh(sphere_geometry, blue);
    scene.add(scene.root(), sphere)?;
    scene.set_position(sphere, Vec3::new(2.0, 0.0, 0.0));

    let ambient = scene.spawn_light(Light::ambient(0.4));
    scene.add(scene.root(), ambient)?;

    let point = scene.spawn_light(Light::point(1.0).with_color(1.0, 0.9, 0.8));
    scene.add(scene.root(), point)?;
    scene.set_position(point, Vec3::new(3.0, 3.0, 3.0));

    let camera = scene.spawn_camera(PerspectiveProjection::new(
        75.0,
        config.window.aspect(),
        0.1,
        1000.0,
    ));
    scene.add(scene.root(), camera)?;
    scene.set_position(camera, Vec3::new(0.0, 0.0, 10.0));
    engine.set_active_camera(camera);

    let viewport = engine.window_size();
    engine.add_controller(Box::new(OrbitControls::new(camera, Vec3::zeros(), viewport)));

    engine.set_on_close(|| log::info!("window closed, goodbye"));

    // Auxiliary thread: delayed close through the thread-safe signal only.
    thread::spawn(move || {
        thread::sleep(Duration::from_secs(2));
        log::info!("timed close firing");
        close_signal.request_close();
    });

    engine.animate(move |scene, dt| {
        if let Some(local) = scene.local_mut(cube) {
            let spin = Quat::from_axis_angle(&Vec3::y_axis(), 0.5 * dt)
                * Quat::from_axis_angle(&Vec3::x_axis(), 0.5 * dt);
            local.rotation = spin * local.rotation;
        }
        Ok(())
    })?;

    log::info!("animate demo finished after {} frames", engine.frame_count());
    Ok(())
}
