//! End-to-end viewer scenarios driven through the public controller API
//! with the headless backend and the in-memory loader.

use approx::assert_relative_eq;
use model_viewer::assets::DeliveryMode;
use model_viewer::foundation::collections::Generation;
use model_viewer::prelude::*;

type Viewer = SyncController<HeadlessBackend, InMemoryLoader>;

const BOX: &str = "models/box.glb";
const OTHER: &str = "models/other.glb";

fn loader() -> InMemoryLoader {
    let mut loader = InMemoryLoader::new();
    loader.insert(AssetHandle::new(BOX), ObjectTree::cuboid("box", Vec3::new(10.0, 10.0, 10.0)));
    loader.insert(AssetHandle::new(OTHER), ObjectTree::cuboid("other", Vec3::new(1.0, 4.0, 2.0)));
    loader.insert_malformed(AssetHandle::new("models/broken.glb"), "truncated buffer");
    loader
}

fn viewer(policy: SyncPolicy) -> Viewer {
    SyncController::new(
        ViewerConfig::default().with_sync_policy(policy),
        HeadlessBackend::new(),
        loader(),
    )
    .expect("viewer")
}

fn viewer_with_box() -> Viewer {
    let mut viewer = viewer(SyncPolicy::RebuildOnChange);
    viewer.load_asset(AssetHandle::new(BOX)).expect("load");
    viewer.poll_loads();
    viewer
}

fn assert_single_live_scene(viewer: &Viewer) {
    let backend = viewer.backend();
    let scene = viewer.scene().expect("live scene");
    assert_eq!(backend.live_target_count(), 1);
    assert_eq!(backend.mounted_targets(), vec![scene.target()]);
    assert_eq!(scene.generation(), viewer.generation());
    assert!(scene.token().is_active());
}

#[test]
fn ten_unit_box_is_framed_at_expected_distance() {
    let mut viewer = viewer_with_box();
    assert!(viewer.is_object_attached());

    viewer.frame().expect("frame");

    let frame = viewer.backend().last_frame().expect("drawn");
    assert_relative_eq!(frame.camera_position.z, 6.516, epsilon = 1e-3);
    assert_relative_eq!(frame.camera_position.x, 0.0);
    assert_eq!(frame.camera_target, Vec3::zeros());
    assert_eq!(frame.object_count, 1);
}

#[test]
fn point_light_after_rotation_keeps_rotation() {
    let mut viewer = viewer_with_box();
    viewer.rotate(RotateDirection::Up, 0.1);
    viewer.rotate(RotateDirection::Up, 0.1);
    viewer.rotate(RotateDirection::Left, 0.1);

    viewer.set_light_mode(LightMode::Point).expect("light");
    viewer.poll_loads();
    viewer.frame().expect("frame");

    let frame = viewer.backend().last_frame().expect("drawn");
    assert_eq!(frame.light_mode, LightMode::Point);
    let rotation = frame.object_rotation.expect("object attached");
    assert_relative_eq!(rotation.x, 0.2, epsilon = 1e-6);
    assert_relative_eq!(rotation.y, 0.1, epsilon = 1e-6);
    assert_single_live_scene(&viewer);
}

#[test]
fn double_zoom_in_rebuilds_twice_and_keeps_asset() {
    let mut viewer = viewer_with_box();
    viewer.rotate(RotateDirection::Right, 0.3);
    let before = viewer.rebuild_count();

    viewer.zoom_in().expect("zoom");
    viewer.zoom_in().expect("zoom");
    viewer.poll_loads();
    viewer.frame().expect("frame");

    assert_relative_eq!(viewer.scale(), 1.44, epsilon = 1e-6);
    assert_eq!(viewer.rebuild_count(), before + 2);
    assert_eq!(viewer.view_state().asset, Some(AssetHandle::new(BOX)));
    assert_eq!(viewer.rotation(), Rotation::new(0.0, -0.3));

    let frame = viewer.backend().last_frame().expect("drawn");
    let scale = frame.object_scale.expect("object attached");
    assert_relative_eq!(scale, Vec3::new(1.44, 1.44, 1.44), epsilon = 1e-6);
    assert_eq!(frame.object_rotation, Some(Rotation::new(0.0, -0.3)));
}

#[test]
fn zoom_out_multiplies_scale() {
    let mut viewer = viewer_with_box();
    viewer.zoom_out().expect("zoom");
    assert_relative_eq!(viewer.scale(), 0.9, epsilon = 1e-6);
}

#[test]
fn rotation_before_attach_is_applied_on_attach() {
    let mut viewer = viewer(SyncPolicy::RebuildOnChange);
    viewer.loader_mut().set_mode(DeliveryMode::Deferred);
    viewer.load_asset(AssetHandle::new(BOX)).expect("load");

    viewer.rotate(RotateDirection::Down, 0.4);
    viewer.rotate(RotateDirection::Left, 0.2);
    assert!(!viewer.is_object_attached());

    viewer.loader_mut().flush();
    assert_eq!(viewer.poll_loads(), 1);
    viewer.frame().expect("frame");

    let frame = viewer.backend().last_frame().expect("drawn");
    assert_eq!(frame.object_rotation, Some(Rotation::new(-0.4, 0.2)));
}

#[test]
fn load_asset_resets_scale_and_rotation() {
    let mut viewer = viewer_with_box();
    viewer.set_scale(3.0).expect("scale");
    viewer.rotate(RotateDirection::Up, 1.0);
    viewer.set_light_mode(LightMode::Directional).expect("light");

    viewer.load_asset(AssetHandle::new(OTHER)).expect("load");
    viewer.poll_loads();

    assert_eq!(viewer.scale(), 1.0);
    assert_eq!(viewer.rotation(), Rotation::new(0.0, 0.0));
    assert_eq!(viewer.light_mode(), LightMode::Directional);
    assert_eq!(viewer.view_state().asset, Some(AssetHandle::new(OTHER)));
    assert!(viewer.is_object_attached());
}

#[test]
fn reloading_the_same_asset_still_rebuilds() {
    let mut viewer = viewer_with_box();
    let before = viewer.rebuild_count();
    viewer.load_asset(AssetHandle::new(BOX)).expect("load");
    assert_eq!(viewer.rebuild_count(), before + 1);
}

#[test]
fn every_structural_change_leaves_exactly_one_scene() {
    let mut viewer = viewer_with_box();
    let mut last_generation = viewer.generation();
    let mut tokens = vec![viewer.loop_token().expect("live loop")];
    let released_before = viewer.backend().released_targets().len();

    let changes: [fn(&mut Viewer) -> Result<(), ViewerError>; 5] = [
        |v| v.set_scale(2.0),
        |v| v.set_background_color(Color::BLACK),
        |v| v.set_light_mode(LightMode::Directional),
        |v| v.load_asset(AssetHandle::new(OTHER)),
        |v| v.zoom_in(),
    ];
    for change in changes {
        change(&mut viewer).expect("change");
        viewer.poll_loads();

        assert!(viewer.generation() > last_generation);
        last_generation = viewer.generation();
        assert_single_live_scene(&viewer);
        tokens.push(viewer.loop_token().expect("live loop"));
    }

    let (live, superseded) = tokens.split_last().expect("tokens");
    assert!(live.is_active());
    assert!(superseded.iter().all(LoopToken::is_cancelled));
    assert_eq!(
        viewer.backend().released_targets().len() - released_before,
        superseded.len()
    );
}

#[test]
fn superseded_loop_never_draws_again() {
    let mut viewer = viewer_with_box();
    let old_token = viewer.loop_token().expect("live loop");

    viewer.set_scale(2.0).expect("scale");
    viewer.poll_loads();
    let draws = viewer.backend().draw_count();
    viewer.frame().expect("frame");

    assert!(old_token.is_cancelled());
    assert_eq!(viewer.backend().draw_count(), draws + 1);
    let frame = viewer.backend().last_frame().expect("drawn");
    assert_eq!(Some(frame.target), viewer.scene().map(SceneHandle::target));
}

#[test]
fn stale_completion_is_ignored() {
    let mut viewer = viewer(SyncPolicy::RebuildOnChange);
    viewer.loader_mut().set_mode(DeliveryMode::Deferred);

    viewer.load_asset(AssetHandle::new(BOX)).expect("load");
    viewer.load_asset(AssetHandle::new(OTHER)).expect("load");
    assert_eq!(viewer.loader().pending_count(), 2);

    viewer.loader_mut().flush();
    assert_eq!(viewer.poll_loads(), 1);

    let scene = viewer.scene().expect("live scene");
    let object_count = scene.scene().object_count();
    let attached: Vec<_> = scene.scene().objects().map(|o| o.asset().clone()).collect();
    assert_eq!(object_count, 1);
    assert_eq!(attached, vec![AssetHandle::new(OTHER)]);
}

#[test]
fn completion_after_structural_change_is_stale() {
    let mut viewer = viewer(SyncPolicy::RebuildOnChange);
    viewer.loader_mut().set_mode(DeliveryMode::Deferred);
    viewer.load_asset(AssetHandle::new(BOX)).expect("load");
    viewer.set_light_mode(LightMode::Point).expect("light");

    viewer.loader_mut().flush();
    assert_eq!(viewer.poll_loads(), 1);
    assert!(viewer.is_object_attached());
    assert_eq!(viewer.scene().map(|s| s.scene().object_count()), Some(1));
}

#[test]
fn abandoned_load_leaves_viewable_scene() {
    let mut viewer = viewer(SyncPolicy::RebuildOnChange);
    viewer.loader_mut().set_mode(DeliveryMode::Deferred);
    viewer.load_asset(AssetHandle::new(BOX)).expect("load");

    assert_eq!(viewer.loader_mut().abandon_pending(), 1);
    assert_eq!(viewer.poll_loads(), 0);

    assert!(!viewer.is_object_attached());
    assert!(matches!(viewer.frame(), Ok(FrameOutcome::Drawn { .. })));
}

#[test]
fn failed_loads_leave_viewable_scene() {
    for asset in ["models/broken.glb", "models/missing.glb"] {
        let mut viewer = viewer(SyncPolicy::RebuildOnChange);
        viewer.load_asset(AssetHandle::new(asset)).expect("load is not fatal");
        assert_eq!(viewer.poll_loads(), 1);

        assert!(!viewer.is_object_attached());
        let scene = viewer.scene().expect("live scene");
        assert!(scene.load_error().is_some());
        assert_eq!(scene.scene().light().mode, LightMode::Ambient);

        viewer.frame().expect("frame");
        let frame = viewer.backend().last_frame().expect("drawn");
        assert_eq!(frame.object_count, 0);
        assert_eq!(frame.camera_position, Vec3::new(0.0, 0.0, 800.0));
    }
}

#[test]
fn in_place_policy_does_not_rebuild_for_background_or_light() {
    let mut viewer = viewer(SyncPolicy::MutateInPlace);
    viewer.load_asset(AssetHandle::new(BOX)).expect("load");
    viewer.poll_loads();
    let before = viewer.rebuild_count();
    let generation = viewer.generation();
    let loads = viewer.loader().requests_seen();

    viewer.set_background_color(Color::BLACK).expect("color");
    viewer.set_light_mode(LightMode::Directional).expect("light");
    viewer.frame().expect("frame");

    assert_eq!(viewer.rebuild_count(), before);
    assert_eq!(viewer.generation(), generation);
    assert_eq!(viewer.loader().requests_seen(), loads);
    let frame = viewer.backend().last_frame().expect("drawn");
    assert_eq!(frame.clear_color, Color::BLACK);
    assert_eq!(frame.light_mode, LightMode::Directional);
    assert_eq!(frame.object_count, 1);

    viewer.set_scale(2.0).expect("scale");
    assert_eq!(viewer.rebuild_count(), before + 1);
}

#[test]
fn default_policy_reloads_asset_on_background_change() {
    let mut viewer = viewer_with_box();
    let loads = viewer.loader().requests_seen();

    viewer.set_background_color(Color::BLACK).expect("color");
    viewer.poll_loads();
    viewer.frame().expect("frame");

    assert_eq!(viewer.loader().requests_seen(), loads + 1);
    let frame = viewer.backend().last_frame().expect("drawn");
    assert_eq!(frame.clear_color, Color::BLACK);
    assert_eq!(frame.object_count, 1);
}

#[test]
fn dropping_controller_releases_target() {
    let viewer = viewer_with_box();
    let token = viewer.loop_token().expect("live loop");
    drop(viewer);
    assert!(token.is_cancelled());
}

#[test]
fn generations_advance_from_initial() {
    let viewer = viewer(SyncPolicy::RebuildOnChange);
    assert!(viewer.generation() > Generation::INITIAL);
}

#[test]
fn point_light_rebuild_keeps_pitch_and_places_light() {
    let mut viewer = viewer_with_box();
    viewer.rotate(RotateDirection::Up, 0.3);

    viewer.set_light_mode(LightMode::Point).expect("light");
    viewer.poll_loads();

    let scene = viewer.scene().expect("live scene");
    let light = scene.scene().light();
    assert_eq!(light.mode, LightMode::Point);
    assert_eq!(light.position, Some(Vec3::new(50.0, 50.0, 50.0)));

    let object = scene.scene().objects().next().expect("object attached");
    assert_relative_eq!(object.rotation().x, 0.3);
    assert_relative_eq!(object.rotation().y, 0.0);
}

#[test]
fn small_asset_is_framed_closer_than_min_distance() {
    let mut viewer = viewer(SyncPolicy::RebuildOnChange);
    let bolt = AssetHandle::new("models/bolt.glb");
    viewer
        .loader_mut()
        .insert(bolt.clone(), ObjectTree::cuboid("bolt", Vec3::new(0.05, 0.02, 0.05)));

    viewer.load_asset(bolt).expect("load");
    viewer.poll_loads();
    viewer.frame().expect("frame");

    let fov = viewer.config().camera.fov_degrees.to_radians();
    let aspect = viewer.config().viewport.aspect_ratio();
    let expected = GeometryFramer::fit_distance(0.05, fov, aspect);
    assert!(expected < viewer.config().min_framing_distance);

    let frame = viewer.backend().last_frame().expect("drawn");
    assert_relative_eq!(frame.camera_position.z, expected, max_relative = 1e-5);
    assert_relative_eq!(frame.camera_position.z, 0.032_58, epsilon = 1e-4);
}

#[test]
fn asset_without_geometry_is_framed_at_min_distance() {
    let mut viewer = viewer(SyncPolicy::RebuildOnChange);
    let empty = AssetHandle::new("models/empty.glb");
    viewer
        .loader_mut()
        .insert(empty.clone(), ObjectTree::new(ObjectNode::new("empty")));

    viewer.load_asset(empty).expect("load");
    viewer.poll_loads();
    viewer.frame().expect("frame");

    assert!(viewer.is_object_attached());
    let min_distance = viewer.config().min_framing_distance;
    let frame = viewer.backend().last_frame().expect("drawn");
    assert_eq!(frame.camera_target, Vec3::zeros());
    assert_relative_eq!(frame.camera_position, Vec3::new(0.0, 0.0, min_distance));
}
