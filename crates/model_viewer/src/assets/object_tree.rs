//! Loaded object trees
//!
//! An [`ObjectTree`] is what a loader hands back: a hierarchy of nodes, each
//! with a local transform and zero or more renderable primitives.

// `derive(Pod, Zeroable)` on `Vertex` emits `unsafe impl`s
#![allow(unsafe_code)]

use bytemuck::{Pod, Zeroable};

use crate::foundation::math::{Mat4, Transform, Vec3};
use crate::scene::AABB;

/// Vertex layout shared with render backends
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// Object-space position
    pub position: [f32; 3],
    /// Object-space normal
    pub normal: [f32; 3],
}

/// Indexed triangle list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Primitive {
    /// Vertex data
    pub vertices: Vec<Vertex>,
    /// Triangle indices into `vertices`
    pub indices: Vec<u32>,
}

impl Primitive {
    /// Create a primitive from vertices and indices
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    /// Axis-aligned box centered at the origin
    pub fn cuboid(half_extents: Vec3) -> Self {
        let (x, y, z) = (half_extents.x, half_extents.y, half_extents.z);
        // (normal, four corners counter-clockwise seen from outside)
        let faces: [([f32; 3], [[f32; 3]; 4]); 6] = [
            ([1.0, 0.0, 0.0], [[x, -y, -z], [x, y, -z], [x, y, z], [x, -y, z]]),
            ([-1.0, 0.0, 0.0], [[-x, -y, z], [-x, y, z], [-x, y, -z], [-x, -y, -z]]),
            ([0.0, 1.0, 0.0], [[-x, y, -z], [-x, y, z], [x, y, z], [x, y, -z]]),
            ([0.0, -1.0, 0.0], [[-x, -y, z], [-x, -y, -z], [x, -y, -z], [x, -y, z]]),
            ([0.0, 0.0, 1.0], [[-x, -y, z], [x, -y, z], [x, y, z], [-x, y, z]]),
            ([0.0, 0.0, -1.0], [[x, -y, -z], [-x, -y, -z], [-x, y, -z], [x, y, -z]]),
        ];

        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);
        for (normal, corners) in faces {
            let base = u32::try_from(vertices.len()).unwrap_or(u32::MAX);
            vertices.extend(corners.iter().map(|&position| Vertex { position, normal }));
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        Self { vertices, indices }
    }

    /// Bounds of the vertex positions, `None` for an empty primitive
    pub fn local_bounds(&self) -> Option<AABB> {
        AABB::from_points(self.vertices.iter().map(|v| Vec3::from(v.position)))
    }

    /// Raw vertex bytes as uploaded to a GPU buffer
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Node in an object hierarchy
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectNode {
    /// Node name from the source asset
    pub name: String,
    /// Transform relative to the parent node
    pub transform: Transform,
    /// Geometry attached to this node
    pub primitives: Vec<Primitive>,
    /// Child nodes
    pub children: Vec<ObjectNode>,
}

impl ObjectNode {
    /// Create an empty node with an identity transform
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Transform::identity(),
            primitives: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Attach a primitive
    #[must_use]
    pub fn with_primitive(mut self, primitive: Primitive) -> Self {
        self.primitives.push(primitive);
        self
    }

    /// Attach a child node
    #[must_use]
    pub fn with_child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    /// Set the local transform
    #[must_use]
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Bounds of this subtree under `parent` (world matrix of the parent)
    pub fn bounds_under(&self, parent: &Mat4) -> Option<AABB> {
        let world = parent * self.transform.to_matrix();
        let own = self
            .primitives
            .iter()
            .filter_map(Primitive::local_bounds)
            .map(|local| local.transformed(&world));
        let nested = self.children.iter().filter_map(|child| child.bounds_under(&world));
        own.chain(nested).reduce(|acc, next| acc.union(&next))
    }

    /// Visit every primitive in the subtree
    pub fn primitives_recursive(&self) -> Box<dyn Iterator<Item = &Primitive> + '_> {
        Box::new(
            self.primitives
                .iter()
                .chain(self.children.iter().flat_map(Self::primitives_recursive)),
        )
    }
}

/// Root of a loaded asset
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectTree {
    /// Root node; its transform is the one the viewer rotates and scales
    pub root: ObjectNode,
}

impl ObjectTree {
    /// Wrap a root node
    pub fn new(root: ObjectNode) -> Self {
        Self { root }
    }

    /// Single-node tree holding one box of the given full size
    pub fn cuboid(name: impl Into<String>, size: Vec3) -> Self {
        Self::new(ObjectNode::new(name).with_primitive(Primitive::cuboid(size * 0.5)))
    }

    /// World-space bounds including the root transform
    ///
    /// `None` when the tree holds no geometry at all.
    pub fn bounding_box(&self) -> Option<AABB> {
        self.root.bounds_under(&Mat4::identity())
    }

    /// Total vertex bytes across the tree
    pub fn vertex_byte_len(&self) -> usize {
        self.root.primitives_recursive().map(|p| p.vertex_bytes().len()).sum()
    }
}
