use std::path::PathBuf;

use clap::Parser;
use log::{error, info, warn};

use scanrast::camera::CameraController;
use scanrast::config::EngineConfig;
use scanrast::cull::CullMode;
use scanrast::engine::Engine;
use scanrast::math::Vec3;
use scanrast::mesh::Mesh;
use scanrast::projection::{Projection, ProjectionKind};
use scanrast::texture::Texture;
use scanrast::window::{FrameLimiter, Window, WindowEvent, WINDOW_HEIGHT, WINDOW_WIDTH};

const FOV_Y_DEGREES: f32 = 60.0;
const Z_NEAR: f32 = 0.1;
const Z_FAR: f32 = 100.0;
const ORTHO_HEIGHT: f32 = 6.0;
const MESH_DISTANCE: f32 = 5.0;

/// scanrast - software scanline rasterizer
#[derive(Parser, Debug)]
#[command(name = "scanrast", version, about = "CPU scanline rasterizer demo")]
struct Args {
    /// Window width in pixels
    #[arg(long, default_value_t = WINDOW_WIDTH)]
    width: u32,

    /// Window height in pixels
    #[arg(long, default_value_t = WINDOW_HEIGHT)]
    height: u32,

    /// OBJ mesh to display instead of the built-in cube
    #[arg(short, long)]
    obj: Option<PathBuf>,

    /// Texture image applied to the mesh
    #[arg(short, long)]
    texture: Option<PathBuf>,

    /// Start with an orthographic projection
    #[arg(long)]
    orthographic: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn projection_for(kind: ProjectionKind, width: u32, height: u32) -> Projection {
    let aspect_ratio = width as f32 / height.max(1) as f32;
    match kind {
        ProjectionKind::Perspective => {
            Projection::from_degrees(FOV_Y_DEGREES, aspect_ratio, Z_NEAR, Z_FAR)
        }
        ProjectionKind::Orthographic => {
            Projection::orthographic_fit(ORTHO_HEIGHT, aspect_ratio, Z_NEAR, Z_FAR)
        }
    }
}

fn main() {
    let args = Args::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp_millis()
        .init();

    if let Err(e) = run(args) {
        error!("{e}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), String> {
    let mut window = Window::new("scanrast", args.width, args.height)?;

    let kind = if args.orthographic {
        ProjectionKind::Orthographic
    } else {
        ProjectionKind::Perspective
    };
    let config = EngineConfig {
        projection: projection_for(kind, args.width, args.height),
        ..EngineConfig::default()
    };
    let mut engine = Engine::new(args.width, args.height, config);

    let mut mesh = match &args.obj {
        Some(path) => Mesh::from_obj(path).map_err(|e| e.to_string())?,
        None => Mesh::cube(),
    };
    mesh.transform_mut().set_position_xyz(0.0, 0.0, MESH_DISTANCE);
    if let Some(path) = &args.texture {
        let texture = Texture::from_file(path).map_err(|e| e.to_string())?;
        mesh.set_texture(Some(engine.add_texture(texture)));
    }
    let mesh_index = engine.add_mesh(mesh);

    info!("Keys: 1-6 render mode, C culling, P projection, G grid, WASD/arrows move");

    let controller = CameraController::default();
    let mut frame_limiter = FrameLimiter::new(&window);

    'running: loop {
        for event in window.poll_events() {
            match event {
                WindowEvent::Quit => break 'running,
                WindowEvent::Resize(width, height) => {
                    window.resize(width, height)?;
                    engine.resize(width, height);
                }
                WindowEvent::SetRenderMode(mode) => {
                    info!("Render mode: {mode:?}");
                    engine.set_render_mode(mode);
                }
                WindowEvent::ToggleCulling => {
                    let mode = match engine.cull_mode() {
                        CullMode::Backface => CullMode::None,
                        CullMode::None => CullMode::Backface,
                    };
                    info!("Cull mode: {mode:?}");
                    engine.set_cull_mode(mode);
                }
                WindowEvent::ToggleProjection => {
                    let kind = match engine.projection().kind() {
                        ProjectionKind::Perspective => ProjectionKind::Orthographic,
                        ProjectionKind::Orthographic => ProjectionKind::Perspective,
                    };
                    info!("Projection: {kind:?}");
                    engine.set_projection(projection_for(kind, engine.width(), engine.height()));
                }
                WindowEvent::ToggleGrid => {
                    let draw_grid = !engine.config().draw_grid;
                    engine.set_draw_grid(draw_grid);
                }
            }
        }

        let delta_time = frame_limiter.wait_and_get_delta(&window) as f32 / 1000.0;
        let input = window.camera_input();
        controller.update(engine.camera_mut(), &input, delta_time);

        if let Some(mesh) = engine.mesh_mut(mesh_index) {
            mesh.transform_mut()
                .rotate(Vec3::new(0.5, 0.7, 0.3) * delta_time);
        }

        if let Err(e) = engine.update() {
            warn!("{e}");
        }
        engine.render();
        window.present(engine.frame_buffer())?;
    }

    Ok(())
}
