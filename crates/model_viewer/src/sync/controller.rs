//! State-to-scene synchronization
//!
//! [`SyncController`] is the only writer of [`ViewState`]. Every setter turns
//! its change into a [`ChangeSet`], [`classify`] decides whether the live scene
//! is rebuilt or mutated, and the controller carries that out.

use super::policy::{classify, ChangeKind, ChangeSet};
use super::state::{RotateDirection, Rotation, ViewState};
use crate::assets::{AssetHandle, AssetLoader, LoadCompletion, LoadQueue};
use crate::config::ViewerConfig;
use crate::foundation::collections::Generation;
use crate::foundation::color::Color;
use crate::render::lighting::LightMode;
use crate::render::render_loop::{FrameOutcome, LoopToken};
use crate::render::{DisplaySurface, RenderBackend};
use crate::scene::{BuildRequest, SceneBuilder, SceneHandle};
use crate::ViewerError;

/// Owns the view state and keeps exactly one scene in sync with it
pub struct SyncController<B, L>
where
    B: RenderBackend + DisplaySurface,
    L: AssetLoader,
{
    config: ViewerConfig,
    builder: SceneBuilder,
    state: ViewState,
    generation: Generation,
    active: Option<SceneHandle>,
    loads: LoadQueue,
    backend: B,
    loader: L,
    rebuilds: u64,
    closed: bool,
}

impl<B, L> SyncController<B, L>
where
    B: RenderBackend + DisplaySurface,
    L: AssetLoader,
{
    /// Validate `config` and build the initial, asset-less scene
    pub fn new(config: ViewerConfig, backend: B, loader: L) -> Result<Self, ViewerError> {
        config.validate()?;
        let mut controller = Self {
            builder: SceneBuilder::from_config(&config),
            state: ViewState::from_config(&config),
            config,
            generation: Generation::INITIAL,
            active: None,
            loads: LoadQueue::new(),
            backend,
            loader,
            rebuilds: 0,
            closed: false,
        };
        controller.build_scene()?;
        log::info!(
            "Viewer ready ({}x{}, {:?})",
            controller.config.viewport.width,
            controller.config.viewport.height,
            controller.config.sync_policy
        );
        Ok(controller)
    }

    // ---- setters -------------------------------------------------------

    /// Set the clear color
    pub fn set_background_color(&mut self, color: Color) -> Result<(), ViewerError> {
        if color == self.state.background_color {
            return Ok(());
        }
        self.state.background_color = color;
        self.apply(ChangeSet::BACKGROUND)
    }

    /// Parse and set the clear color (`"white"`, `"#fff"`, `"#ffffff"`)
    pub fn set_background_color_str(&mut self, color: &str) -> Result<(), ViewerError> {
        let color: Color = color.parse()?;
        self.set_background_color(color)
    }

    /// Set the absolute uniform scale
    ///
    /// Non-positive and non-finite factors are rejected and leave the state
    /// untouched.
    #[allow(clippy::float_cmp)]
    pub fn set_scale(&mut self, factor: f32) -> Result<(), ViewerError> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(ViewerError::InvalidScale(factor));
        }
        if factor == self.state.scale {
            return Ok(());
        }
        self.state.scale = factor;
        self.apply(ChangeSet::SCALE)
    }

    /// Multiply the scale by the configured zoom-in factor
    pub fn zoom_in(&mut self) -> Result<(), ViewerError> {
        self.set_scale(self.state.scale * self.config.zoom_in_factor)
    }

    /// Multiply the scale by the configured zoom-out factor
    pub fn zoom_out(&mut self) -> Result<(), ViewerError> {
        self.set_scale(self.state.scale * self.config.zoom_out_factor)
    }

    /// Switch the lighting rig
    pub fn set_light_mode(&mut self, mode: LightMode) -> Result<(), ViewerError> {
        if mode == self.state.light_mode {
            return Ok(());
        }
        self.state.light_mode = mode;
        self.apply(ChangeSet::LIGHT)
    }

    /// Rotate by `angle` radians in `direction`
    ///
    /// The angle accumulates into the view state even when no object is
    /// attached yet; it is applied once one is.
    pub fn rotate(&mut self, direction: RotateDirection, angle: f32) {
        if !angle.is_finite() {
            log::warn!("Ignoring non-finite rotate step {angle}");
            return;
        }
        self.state.rotation += direction.delta(angle);
        debug_assert_eq!(
            classify(ChangeSet::ROTATION, self.config.sync_policy),
            ChangeKind::Incremental
        );
        self.apply_incremental(ChangeSet::ROTATION);
    }

    /// Rotate by the configured step
    pub fn rotate_default(&mut self, direction: RotateDirection) {
        self.rotate(direction, self.config.rotate_step);
    }

    /// Show `asset`, resetting scale and rotation
    ///
    /// Always rebuilds, even when `asset` is the one already shown.
    pub fn load_asset(&mut self, asset: AssetHandle) -> Result<(), ViewerError> {
        log::info!("Loading asset {asset}");
        self.state.reset_for_asset(asset);
        self.apply(ChangeSet::ASSET)
    }

    // ---- host hooks ----------------------------------------------------

    /// Apply every load completion that has arrived
    ///
    /// Completions for superseded scenes are dropped. Returns how many
    /// completions were applied to the live scene.
    pub fn poll_loads(&mut self) -> usize {
        let mut applied = 0;
        for completion in self.loads.drain() {
            if self.apply_completion(completion) {
                applied += 1;
            }
        }
        applied
    }

    /// Run one render loop tick of the live scene
    pub fn frame(&mut self) -> Result<FrameOutcome, ViewerError> {
        match self.active.as_mut() {
            Some(handle) => Ok(handle.render_frame(&self.state, &mut self.backend)?),
            None => Ok(FrameOutcome::Idle),
        }
    }

    /// Tear down the live scene; later changes only update the view state
    pub fn shutdown(&mut self) {
        if let Some(handle) = self.active.take() {
            handle.teardown(&mut self.backend);
        }
        if !self.closed {
            log::info!("Viewer shut down at {}", self.generation);
            self.closed = true;
        }
    }

    // ---- read access ---------------------------------------------------

    /// Current clear color
    pub const fn background_color(&self) -> Color {
        self.state.background_color
    }

    /// Current absolute scale
    pub const fn scale(&self) -> f32 {
        self.state.scale
    }

    /// Current lighting rig
    pub const fn light_mode(&self) -> LightMode {
        self.state.light_mode
    }

    /// Accumulated rotation
    pub const fn rotation(&self) -> Rotation {
        self.state.rotation
    }

    /// Full view state
    pub const fn view_state(&self) -> &ViewState {
        &self.state
    }

    /// Generation of the newest scene
    pub const fn generation(&self) -> Generation {
        self.generation
    }

    /// Configuration in use
    pub const fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// Live scene, if any
    pub const fn scene(&self) -> Option<&SceneHandle> {
        self.active.as_ref()
    }

    /// Whether the live scene has its object attached
    pub fn is_object_attached(&self) -> bool {
        self.active.as_ref().is_some_and(|handle| handle.object_ref().is_some())
    }

    /// Token of the live render loop, for host schedulers
    pub fn loop_token(&self) -> Option<LoopToken> {
        self.active.as_ref().map(|handle| handle.token().clone())
    }

    /// Structural rebuilds since construction
    pub const fn rebuild_count(&self) -> u64 {
        self.rebuilds
    }

    /// Rendering backend
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Rendering backend, mutably
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Asset loader
    pub const fn loader(&self) -> &L {
        &self.loader
    }

    /// Asset loader, mutably (e.g. to flush a deferred loader)
    pub fn loader_mut(&mut self) -> &mut L {
        &mut self.loader
    }

    // ---- internals -----------------------------------------------------

    fn apply(&mut self, changes: ChangeSet) -> Result<(), ViewerError> {
        match classify(changes, self.config.sync_policy) {
            ChangeKind::Structural => self.rebuild(changes),
            ChangeKind::Incremental => {
                self.apply_incremental(changes);
                Ok(())
            }
        }
    }

    fn apply_incremental(&mut self, changes: ChangeSet) {
        let Some(handle) = self.active.as_mut() else {
            return;
        };
        if changes.contains(ChangeSet::LIGHT) {
            handle.set_light_mode(self.state.light_mode);
        }
        if changes.contains(ChangeSet::ROTATION) {
            if let Some(object) = handle.object_ref().and_then(|object| handle.resolve_mut(object)) {
                object.set_rotation(self.state.rotation);
            }
        }
        // Background is read by the render loop every frame.
    }

    fn rebuild(&mut self, changes: ChangeSet) -> Result<(), ViewerError> {
        if self.closed {
            log::debug!("Viewer is shut down, not rebuilding for {changes:?}");
            return Ok(());
        }
        self.rebuilds += 1;
        log::info!("Rebuilding scene for {changes:?}");
        self.build_scene()
    }

    /// Tear down the live scene, then build the next generation
    fn build_scene(&mut self) -> Result<(), ViewerError> {
        if let Some(previous) = self.active.take() {
            previous.teardown(&mut self.backend);
        }
        self.generation = self.generation.next();
        let request = BuildRequest::from_state(self.generation, &self.state);
        let handle = self
            .builder
            .build(request, &mut self.backend, &mut self.loader, &self.loads)?;
        self.active = Some(handle);
        Ok(())
    }

    fn apply_completion(&mut self, completion: LoadCompletion) -> bool {
        let LoadCompletion { ticket, result } = completion;
        let handle = self.active.as_mut().filter(|handle| {
            handle.generation() == ticket.generation && handle.pending_asset() == Some(&ticket.asset)
        });
        let Some(handle) = handle else {
            log::debug!("Discarding stale load of {} from {}", ticket.asset, ticket.generation);
            return false;
        };

        match result {
            Ok(tree) => {
                handle.attach_loaded(ticket.asset.clone(), tree, self.state.scale, self.state.rotation);
                log::info!("Attached {} to {}", ticket.asset, ticket.generation);
            }
            Err(error) => {
                log::warn!("Failed to load {}: {error}", ticket.asset);
                handle.mark_load_failed(error);
            }
        }
        true
    }
}

impl<B, L> Drop for SyncController<B, L>
where
    B: RenderBackend + DisplaySurface,
    L: AssetLoader,
{
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{DeliveryMode, InMemoryLoader, ObjectTree};
    use crate::foundation::color::ColorError;
    use crate::foundation::math::Vec3;
    use crate::render::HeadlessBackend;
    use crate::sync::SyncPolicy;

    type Viewer = SyncController<HeadlessBackend, InMemoryLoader>;

    fn viewer_with(policy: SyncPolicy) -> Viewer {
        let mut loader = InMemoryLoader::new();
        loader.insert(AssetHandle::new("cube"), ObjectTree::cuboid("cube", Vec3::new(2.0, 2.0, 2.0)));
        SyncController::new(ViewerConfig::default().with_sync_policy(policy), HeadlessBackend::new(), loader)
            .expect("viewer")
    }

    #[test]
    fn test_new_builds_initial_scene() {
        let viewer = viewer_with(SyncPolicy::RebuildOnChange);
        assert_eq!(viewer.generation(), Generation::INITIAL.next());
        assert_eq!(viewer.rebuild_count(), 0);
        assert_eq!(viewer.backend().live_target_count(), 1);
        assert!(!viewer.is_object_attached());
        assert!(viewer.loop_token().is_some_and(|token| token.is_active()));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = ViewerConfig {
            zoom_in_factor: -1.0,
            ..ViewerConfig::default()
        };
        let result = Viewer::new(config, HeadlessBackend::new(), InMemoryLoader::new());
        assert!(matches!(result, Err(ViewerError::Config(_))));
    }

    #[test]
    fn test_unchanged_values_do_not_rebuild() {
        let mut viewer = viewer_with(SyncPolicy::RebuildOnChange);
        viewer.set_scale(1.0).expect("scale");
        viewer.set_background_color(Color::WHITE).expect("color");
        viewer.set_light_mode(LightMode::Ambient).expect("light");
        assert_eq!(viewer.rebuild_count(), 0);
    }

    #[test]
    fn test_invalid_scale_leaves_state() {
        let mut viewer = viewer_with(SyncPolicy::RebuildOnChange);
        for bad in [0.0, -2.0, f32::NAN, f32::INFINITY] {
            assert!(matches!(viewer.set_scale(bad), Err(ViewerError::InvalidScale(_))));
        }
        assert_eq!(viewer.scale(), 1.0);
        assert_eq!(viewer.rebuild_count(), 0);
    }

    #[test]
    fn test_invalid_color_string() {
        let mut viewer = viewer_with(SyncPolicy::RebuildOnChange);
        assert!(matches!(
            viewer.set_background_color_str("not-a-color"),
            Err(ViewerError::InvalidColor(ColorError::Unrecognized(input))) if input == "not-a-color"
        ));
        viewer.set_background_color_str("#000").expect("black");
        assert_eq!(viewer.background_color(), Color::BLACK);
    }

    #[test]
    fn test_rotation_mutates_live_object() {
        let mut viewer = viewer_with(SyncPolicy::RebuildOnChange);
        viewer.load_asset(AssetHandle::new("cube")).expect("load");
        assert_eq!(viewer.poll_loads(), 1);
        let rebuilds = viewer.rebuild_count();

        viewer.rotate(RotateDirection::Left, 0.5);
        viewer.rotate_default(RotateDirection::Up);

        assert_eq!(viewer.rebuild_count(), rebuilds);
        assert_eq!(viewer.rotation(), Rotation::new(0.1, 0.5));
        viewer.frame().expect("frame");
        let frame = viewer.backend().last_frame().expect("drawn");
        assert_eq!(frame.object_rotation, Some(Rotation::new(0.1, 0.5)));
    }

    #[test]
    fn test_shutdown_releases_and_stops_rebuilding() {
        let mut viewer = viewer_with(SyncPolicy::RebuildOnChange);
        let token = viewer.loop_token().expect("live loop");

        viewer.shutdown();
        viewer.set_scale(2.0).expect("state still updates");

        assert!(token.is_cancelled());
        assert_eq!(viewer.backend().live_target_count(), 0);
        assert_eq!(viewer.scale(), 2.0);
        assert_eq!(viewer.frame().expect("frame"), FrameOutcome::Idle);
    }

    #[test]
    fn test_deferred_mode_switch() {
        let mut viewer = viewer_with(SyncPolicy::RebuildOnChange);
        viewer.loader_mut().set_mode(DeliveryMode::Deferred);
        viewer.load_asset(AssetHandle::new("cube")).expect("load");
        assert_eq!(viewer.poll_loads(), 0);

        viewer.loader_mut().flush();
        assert_eq!(viewer.poll_loads(), 1);
        assert!(viewer.is_object_attached());
    }
}
