//! Headless viewer demo
//!
//! Drives the sync controller through a scripted session the way a UI would:
//! pick an asset, rotate it, zoom, switch lights and background. Every step
//! renders a few frames into the headless backend and logs what was drawn.
//!
//! Usage: `viewer_demo [config.toml|config.ron]`

use model_viewer::foundation::logging;
use model_viewer::foundation::math::Transform;
use model_viewer::prelude::*;
use thiserror::Error;

const FRAMES_PER_STEP: usize = 3;

#[derive(Error, Debug)]
enum AppError {
    #[error(transparent)]
    Viewer(#[from] ViewerError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Bad script line {line}: {reason}")]
    Script { line: usize, reason: String },
}

/// One UI interaction
#[derive(Debug, Clone, PartialEq)]
enum Command {
    Load(AssetHandle),
    Rotate(RotateDirection),
    ZoomIn,
    ZoomOut,
    Scale(f32),
    Light(LightMode),
    Background(String),
}

impl Command {
    fn parse(line: usize, text: &str) -> Result<Self, AppError> {
        let bad = |reason: String| AppError::Script { line, reason };
        let mut words = text.split_whitespace();
        let verb = words.next().unwrap_or_default();
        let arg = words.next().unwrap_or_default();

        match verb {
            "load" => Ok(Self::Load(AssetHandle::new(arg))),
            "rotate" => arg.parse().map(Self::Rotate).map_err(|e| bad(e.to_string())),
            "zoom" if arg == "in" => Ok(Self::ZoomIn),
            "zoom" if arg == "out" => Ok(Self::ZoomOut),
            "scale" => arg.parse().map(Self::Scale).map_err(|e| bad(format!("{e}"))),
            "light" => arg.parse().map(Self::Light).map_err(|e| bad(e.to_string())),
            "background" => Ok(Self::Background(arg.to_string())),
            other => Err(bad(format!("unknown command '{other}'"))),
        }
    }
}

const SCRIPT: &str = "
    load demo://cube
    rotate up
    rotate up
    rotate left
    light point
    zoom in
    zoom in
    background #202830
    load demo://tower
    rotate right
    light directional
    zoom out
    load demo://missing
";

type Viewer = SyncController<HeadlessBackend, InMemoryLoader>;

struct DemoApp {
    viewer: Viewer,
    commands: Vec<Command>,
}

impl DemoApp {
    fn new(config: ViewerConfig) -> Result<Self, AppError> {
        let commands = SCRIPT
            .lines()
            .enumerate()
            .filter(|(_, text)| !text.trim().is_empty())
            .map(|(line, text)| Command::parse(line, text.trim()))
            .collect::<Result<Vec<_>, _>>()?;

        let viewer = SyncController::new(config, HeadlessBackend::new(), demo_assets())?;
        Ok(Self { viewer, commands })
    }

    fn run(&mut self) -> Result<(), AppError> {
        let commands = std::mem::take(&mut self.commands);
        for command in commands {
            log::info!("> {command:?}");
            self.execute(command)?;
            self.viewer.poll_loads();
            for _ in 0..FRAMES_PER_STEP {
                self.viewer.frame()?;
            }
            self.report();
        }
        self.viewer.shutdown();
        Ok(())
    }

    fn execute(&mut self, command: Command) -> Result<(), AppError> {
        match command {
            Command::Load(asset) => self.viewer.load_asset(asset)?,
            Command::Rotate(direction) => self.viewer.rotate_default(direction),
            Command::ZoomIn => self.viewer.zoom_in()?,
            Command::ZoomOut => self.viewer.zoom_out()?,
            Command::Scale(factor) => self.viewer.set_scale(factor)?,
            Command::Light(mode) => self.viewer.set_light_mode(mode)?,
            Command::Background(color) => self.viewer.set_background_color_str(&color)?,
        }
        Ok(())
    }

    fn report(&self) {
        let backend = self.viewer.backend();
        let Some(frame) = backend.last_frame() else {
            log::info!("  nothing drawn yet");
            return;
        };
        log::info!(
            "  {} | {} light | bg {} | objects {} | scale {:.2} | rot ({:.2}, {:.2}) | camera z {:.3}",
            self.viewer.generation(),
            frame.light_mode,
            frame.clear_color,
            frame.object_count,
            self.viewer.scale(),
            self.viewer.rotation().x,
            self.viewer.rotation().y,
            frame.camera_position.z,
        );
        log::debug!(
            "  {} draws, {} vertex bytes, {} rebuilds",
            backend.draw_count(),
            backend.bytes_submitted(),
            self.viewer.rebuild_count()
        );
    }
}

/// Procedural stand-ins for files a user would pick
fn demo_assets() -> InMemoryLoader {
    let mut loader = InMemoryLoader::new();
    loader.insert(
        AssetHandle::new("demo://cube"),
        ObjectTree::cuboid("cube", Vec3::new(10.0, 10.0, 10.0)),
    );

    let base = ObjectNode::new("base").with_primitive(Primitive::cuboid(Vec3::new(4.0, 1.0, 4.0)));
    let shaft = ObjectNode::new("shaft")
        .with_transform(Transform::from_position(Vec3::new(0.0, 6.0, 0.0)))
        .with_primitive(Primitive::cuboid(Vec3::new(1.0, 5.0, 1.0)));
    loader.insert(
        AssetHandle::new("demo://tower"),
        ObjectTree::new(ObjectNode::new("tower").with_child(base).with_child(shaft)),
    );
    loader
}

fn load_config() -> Result<ViewerConfig, AppError> {
    match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading config from {path}");
            Ok(ViewerConfig::load_from_file(&path)?)
        }
        None => Ok(ViewerConfig::default()),
    }
}

fn main() -> Result<(), AppError> {
    if !logging::init_with_default("info") {
        log::warn!("Logger was already installed");
    }
    log::info!("Starting headless viewer demo");

    let mut app = DemoApp::new(load_config()?)?;
    match app.run() {
        Ok(()) => {
            log::info!("Viewer demo completed successfully");
            Ok(())
        }
        Err(e) => {
            log::error!("Viewer demo failed: {e}");
            Err(e)
        }
    }
}
