//! Scene construction and teardown
//!
//! [`SceneBuilder`] turns a view state snapshot into a live [`SceneHandle`]:
//! light, camera, a mounted render target, a fresh render loop and (when an
//! asset is set) an outstanding load. The handle owns all of it until
//! [`SceneHandle::teardown`] gives the target back to the backend.

use super::{AABB, GeometryFramer, LoadedObject, ObjectRef, Scene};
use crate::assets::{AssetError, AssetHandle, AssetLoader, LoadQueue, ObjectTree};
use crate::config::{CameraConfig, ViewerConfig};
use crate::foundation::collections::{Generation, ObjectKey};
use crate::foundation::math::Vec3;
use crate::render::lighting::{LightFactory, LightMode};
use crate::render::render_loop::{FrameOutcome, LoopToken, RenderLoop};
use crate::render::{Camera, DisplaySurface, RenderBackend, RenderError, TargetId, Viewport};
use crate::sync::{Rotation, ViewState};
use crate::ViewerError;

/// What to build
#[derive(Debug, Clone, PartialEq)]
pub struct BuildRequest {
    /// Epoch the new scene lives in
    pub generation: Generation,
    /// Asset to load, if any
    pub asset: Option<AssetHandle>,
    /// Lighting rig to install
    pub light_mode: LightMode,
}

impl BuildRequest {
    /// Snapshot the structural parts of `state`
    ///
    /// Scale and rotation are not captured here; they are read from the live
    /// state when the load completes.
    pub fn from_state(generation: Generation, state: &ViewState) -> Self {
        Self {
            generation,
            asset: state.asset.clone(),
            light_mode: state.light_mode,
        }
    }
}

/// Where the scene's asset load stands
#[derive(Debug, Clone, PartialEq)]
enum LoadStatus {
    NoAsset,
    Pending(AssetHandle),
    Attached(ObjectKey),
    Failed(AssetError),
}

/// Builds scenes with a fixed camera projection and viewport
#[derive(Debug, Clone)]
pub struct SceneBuilder {
    camera: CameraConfig,
    viewport: Viewport,
    framer: GeometryFramer,
}

impl SceneBuilder {
    /// Builder for the given configuration
    pub fn from_config(config: &ViewerConfig) -> Self {
        Self {
            camera: config.camera.clone(),
            viewport: config.viewport,
            framer: GeometryFramer::new(config.min_framing_distance),
        }
    }

    /// Viewport every target is allocated with
    pub const fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Camera every scene starts with, before any framing
    pub fn initial_camera(&self) -> Camera {
        Camera::perspective(
            Vec3::new(0.0, 0.0, self.camera.default_distance),
            self.camera.fov_degrees,
            self.viewport.aspect_ratio(),
            self.camera.near,
            self.camera.far,
        )
    }

    /// Build a scene for `request`
    ///
    /// Fails only when the backend cannot provide a mounted render target.
    /// The load (if any) is issued after the target is mounted and may
    /// complete during this call, later, or never.
    pub fn build<B, L>(
        &self,
        request: BuildRequest,
        backend: &mut B,
        loader: &mut L,
        loads: &LoadQueue,
    ) -> Result<SceneHandle, ViewerError>
    where
        B: RenderBackend + DisplaySurface + ?Sized,
        L: AssetLoader + ?Sized,
    {
        let scene = Scene::new(LightFactory::for_mode(request.light_mode));
        let camera = self.initial_camera();

        let target = backend.create_target(self.viewport)?;
        if let Err(e) = backend.mount(target) {
            backend.release_target(target);
            return Err(e.into());
        }

        let status = match request.asset {
            Some(asset) => {
                loader.load(loads.request(request.generation, asset.clone()));
                LoadStatus::Pending(asset)
            }
            None => LoadStatus::NoAsset,
        };

        log::debug!(
            "Built scene {} ({} light, target {:?})",
            request.generation,
            request.light_mode,
            target
        );

        Ok(SceneHandle {
            generation: request.generation,
            scene,
            camera,
            target,
            render_loop: RenderLoop::new(request.generation),
            framer: self.framer,
            status,
        })
    }
}

/// One live scene and everything it owns
#[derive(Debug)]
pub struct SceneHandle {
    generation: Generation,
    scene: Scene,
    camera: Camera,
    target: TargetId,
    render_loop: RenderLoop,
    framer: GeometryFramer,
    status: LoadStatus,
}

impl SceneHandle {
    /// Epoch this scene was built in
    pub const fn generation(&self) -> Generation {
        self.generation
    }

    /// Scene graph
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Camera
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Mounted render target
    pub const fn target(&self) -> TargetId {
        self.target
    }

    /// Render loop token
    pub fn token(&self) -> &LoopToken {
        self.render_loop.token()
    }

    /// Frames drawn by this scene's loop
    pub const fn frames_drawn(&self) -> u64 {
        self.render_loop.frames_drawn()
    }

    /// Asset whose load is still outstanding
    pub fn pending_asset(&self) -> Option<&AssetHandle> {
        match &self.status {
            LoadStatus::Pending(asset) => Some(asset),
            _ => None,
        }
    }

    /// Why the load failed, if it did
    pub fn load_error(&self) -> Option<&AssetError> {
        match &self.status {
            LoadStatus::Failed(error) => Some(error),
            _ => None,
        }
    }

    fn object_key(&self) -> Option<ObjectKey> {
        match self.status {
            LoadStatus::Attached(key) => Some(key),
            _ => None,
        }
    }

    /// Weak reference to the attached object
    pub fn object_ref(&self) -> Option<ObjectRef> {
        self.object_key().map(|key| ObjectRef {
            generation: self.generation,
            key,
        })
    }

    /// Resolve `object` against this scene
    ///
    /// References from other generations never resolve.
    pub fn resolve_mut(&mut self, object: ObjectRef) -> Option<&mut LoadedObject> {
        if object.generation != self.generation {
            return None;
        }
        self.scene.object_mut(object.key)
    }

    /// Swap the light for `mode`'s preset
    pub fn set_light_mode(&mut self, mode: LightMode) {
        let previous = self.scene.set_light(LightFactory::for_mode(mode));
        log::debug!("Scene {}: light {} -> {}", self.generation, previous.mode, mode);
    }

    /// Attach a loaded tree: frame it, then apply `scale` and `rotation`
    ///
    /// Framing uses the bounds before scaling, so the camera distance depends
    /// only on the asset itself.
    pub fn attach_loaded(
        &mut self,
        asset: AssetHandle,
        tree: ObjectTree,
        scale: f32,
        rotation: Rotation,
    ) -> ObjectRef {
        let bounds = tree.bounding_box().unwrap_or_else(|| {
            log::warn!("Asset {asset} has no geometry");
            AABB::from_center_size(Vec3::zeros(), Vec3::zeros())
        });
        let framing = self.framer.apply(&mut self.camera, &bounds);

        let mut object = LoadedObject::new(asset, tree);
        object.set_uniform_scale(scale);
        object.set_rotation(rotation);

        if let Some(previous) = self.object_key() {
            self.scene.remove_object(previous);
        }
        let key = self.scene.add_object(object);
        self.status = LoadStatus::Attached(key);

        log::debug!(
            "Scene {}: object attached, camera at distance {:.3}",
            self.generation,
            framing.distance
        );
        ObjectRef {
            generation: self.generation,
            key,
        }
    }

    /// Record a failed load; the scene stays lit and framed without an object
    pub fn mark_load_failed(&mut self, error: AssetError) {
        self.status = LoadStatus::Failed(error);
    }

    /// Run one render loop tick
    pub fn render_frame<B: RenderBackend + ?Sized>(
        &mut self,
        state: &ViewState,
        backend: &mut B,
    ) -> Result<FrameOutcome, RenderError> {
        let object = self.object_key();
        self.render_loop
            .tick(&mut self.scene, object, &self.camera, self.target, state, backend)
    }

    /// Cancel the loop, unmount and release the target
    ///
    /// An outstanding load is orphaned; its completion will carry a stale
    /// generation.
    pub fn teardown<B: RenderBackend + DisplaySurface + ?Sized>(self, backend: &mut B) {
        self.render_loop.cancel();
        backend.unmount(self.target);
        backend.release_target(self.target);
        if let LoadStatus::Pending(asset) = &self.status {
            log::debug!("Scene {}: orphaning load of {}", self.generation, asset);
        }
        log::debug!(
            "Tore down scene {} after {} frames",
            self.generation,
            self.render_loop.frames_drawn()
        );
    }
}
