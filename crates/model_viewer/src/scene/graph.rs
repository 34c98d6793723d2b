//! Scene graph
//!
//! Retained-mode scene container plus the bounding-box math used for framing.

use crate::assets::{AssetHandle, ObjectNode, ObjectTree};
use crate::foundation::collections::{Generation, ObjectKey, SlotMap};
use crate::foundation::math::{Mat4, Point3, Transform, Vec3, utils};
use crate::render::lighting::Light;
use crate::sync::Rotation;

/// Axis-Aligned Bounding Box for framing queries
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    /// Minimum corner of the bounding box
    pub min: Vec3,
    /// Maximum corner of the bounding box
    pub max: Vec3,
}

impl AABB {
    /// Create a new AABB from min and max points
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create an AABB from its center and full size
    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Smallest box containing every point, `None` for no points
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        Some(points.fold(Self::new(first, first), |acc, p| Self {
            min: acc.min.inf(&p),
            max: acc.max.sup(&p),
        }))
    }

    /// Get the center of the AABB
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the full edge lengths of the AABB
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Longest edge
    pub fn max_dimension(&self) -> f32 {
        utils::max_component(&self.size())
    }

    /// Check if this AABB contains a point
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.x >= self.min.x && point.x <= self.max.x &&
        point.y >= self.min.y && point.y <= self.max.y &&
        point.z >= self.min.z && point.z <= self.max.z
    }

    /// Smallest box containing both
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.inf(&other.min),
            max: self.max.sup(&other.max),
        }
    }

    /// Bounds of this box's eight corners after `matrix`
    #[must_use]
    pub fn transformed(&self, matrix: &Mat4) -> Self {
        let corners = (0..8u8).map(|i| {
            let pick = |bit: u8, lo: f32, hi: f32| if i & bit == 0 { lo } else { hi };
            let corner = Point3::new(
                pick(1, self.min.x, self.max.x),
                pick(2, self.min.y, self.max.y),
                pick(4, self.min.z, self.max.z),
            );
            matrix.transform_point(&corner).coords
        });
        Self::from_points(corners).unwrap_or(*self)
    }
}

/// Weak reference to the object of one scene generation
///
/// Holding an `ObjectRef` never keeps an object alive; it resolves only
/// against the scene of the same generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectRef {
    /// Generation of the owning scene
    pub generation: Generation,
    /// Slot of the object in that scene's graph
    pub key: ObjectKey,
}

/// Asset attached to a live scene
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedObject {
    asset: AssetHandle,
    root: ObjectNode,
}

impl LoadedObject {
    /// Take ownership of a loaded tree
    pub fn new(asset: AssetHandle, tree: ObjectTree) -> Self {
        Self { asset, root: tree.root }
    }

    /// Asset the object was loaded from
    pub fn asset(&self) -> &AssetHandle {
        &self.asset
    }

    /// Root node (transform + renderable subtree)
    pub fn root(&self) -> &ObjectNode {
        &self.root
    }

    /// Root transform
    pub fn transform(&self) -> &Transform {
        &self.root.transform
    }

    /// Scale the whole object uniformly
    pub fn set_uniform_scale(&mut self, factor: f32) {
        self.root.transform.set_uniform_scale(factor);
    }

    /// Set the X/Y Euler angles, leaving Z untouched
    pub fn set_rotation(&mut self, rotation: Rotation) {
        self.root.transform.rotation.x = rotation.x;
        self.root.transform.rotation.y = rotation.y;
    }

    /// Current X/Y Euler angles
    pub fn rotation(&self) -> Rotation {
        Rotation::new(self.root.transform.rotation.x, self.root.transform.rotation.y)
    }

    /// World-space bounds with the current transform applied
    pub fn bounding_box(&self) -> Option<AABB> {
        self.root.bounds_under(&Mat4::identity())
    }
}

/// Scene container: one light and the attached objects
#[derive(Debug)]
pub struct Scene {
    light: Light,
    objects: SlotMap<ObjectKey, LoadedObject>,
}

impl Scene {
    /// Create an empty scene lit by `light`
    pub fn new(light: Light) -> Self {
        Self {
            light,
            objects: SlotMap::with_key(),
        }
    }

    /// Active light
    pub fn light(&self) -> &Light {
        &self.light
    }

    /// Replace the active light, returning the previous one
    pub fn set_light(&mut self, light: Light) -> Light {
        std::mem::replace(&mut self.light, light)
    }

    /// Attach an object
    pub fn add_object(&mut self, object: LoadedObject) -> ObjectKey {
        self.objects.insert(object)
    }

    /// Detach an object
    pub fn remove_object(&mut self, key: ObjectKey) -> Option<LoadedObject> {
        self.objects.remove(key)
    }

    /// Look up an object
    pub fn object(&self, key: ObjectKey) -> Option<&LoadedObject> {
        self.objects.get(key)
    }

    /// Look up an object for mutation
    pub fn object_mut(&mut self, key: ObjectKey) -> Option<&mut LoadedObject> {
        self.objects.get_mut(key)
    }

    /// Every attached object
    pub fn objects(&self) -> impl Iterator<Item = &LoadedObject> {
        self.objects.values()
    }

    /// Number of attached objects
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::lighting::{LightFactory, LightMode};
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_aabb_contains_point() {
        let aabb = AABB::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));

        assert!(aabb.contains_point(Vec3::zeros()));
        assert!(aabb.contains_point(Vec3::new(0.5, 0.5, 0.5)));
        assert!(!aabb.contains_point(Vec3::new(2.0, 0.0, 0.0)));
    }

    #[test]
    fn test_aabb_center_size() {
        let aabb = AABB::from_center_size(Vec3::new(1.0, 2.0, 3.0), Vec3::new(2.0, 4.0, 8.0));
        assert_relative_eq!(aabb.center(), Vec3::new(1.0, 2.0, 3.0), epsilon = EPSILON);
        assert_relative_eq!(aabb.size(), Vec3::new(2.0, 4.0, 8.0), epsilon = EPSILON);
        assert_eq!(aabb.max_dimension(), 8.0);
    }

    #[test]
    fn test_aabb_transformed_by_rotation_grows() {
        let aabb = AABB::from_center_size(Vec3::zeros(), Vec3::new(2.0, 2.0, 2.0));
        let rotated = aabb.transformed(&Mat4::from_axis_angle(&Vec3::y_axis(), std::f32::consts::FRAC_PI_4));
        let half_diagonal = 2.0_f32.sqrt();
        assert_relative_eq!(rotated.max.x, half_diagonal, epsilon = EPSILON);
        assert_relative_eq!(rotated.max.y, 1.0, epsilon = EPSILON);
    }

    #[test]
    fn test_from_points_empty() {
        assert!(AABB::from_points(std::iter::empty()).is_none());
    }

    #[test]
    fn test_scene_light_swap_and_objects() {
        let mut scene = Scene::new(LightFactory::for_mode(LightMode::Ambient));
        let previous = scene.set_light(LightFactory::for_mode(LightMode::Point));
        assert_eq!(previous.mode, LightMode::Ambient);
        assert_eq!(scene.light().mode, LightMode::Point);

        let key = scene.add_object(LoadedObject::new(
            AssetHandle::new("cube"),
            ObjectTree::cuboid("cube", Vec3::new(1.0, 1.0, 1.0)),
        ));
        assert_eq!(scene.object_count(), 1);

        scene.object_mut(key).expect("attached").set_rotation(Rotation::new(0.3, -0.2));
        assert_eq!(scene.object(key).map(LoadedObject::rotation), Some(Rotation::new(0.3, -0.2)));

        assert!(scene.remove_object(key).is_some());
        assert!(scene.object(key).is_none());
    }

    #[test]
    fn test_loaded_object_bounds_include_scale() {
        let mut object = LoadedObject::new(
            AssetHandle::new("cube"),
            ObjectTree::cuboid("cube", Vec3::new(2.0, 2.0, 2.0)),
        );
        object.set_uniform_scale(3.0);
        let bounds = object.bounding_box().expect("has geometry");
        assert_relative_eq!(bounds.size(), Vec3::new(6.0, 6.0, 6.0), epsilon = EPSILON);
    }
}
