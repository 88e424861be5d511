/// Octree - per-frame spatial index for hierarchical occlusion culling.
///
/// Rebuilt from scratch every frame by `finish_cull`. Objects are stored
/// as indices into the bin's per-frame object list, together with their
/// world-space bounding spheres (passed to `build`).
///
/// Placement rule (multi-assignment): when a node subdivides, each object
/// is pushed into every child octant its sphere overlaps. An object that
/// straddles a splitting plane is therefore duplicated into 2, 4 or 8
/// children instead of being kept in the parent, so that boundary objects
/// still benefit from culling. The draw pass is responsible for drawing
/// duplicated objects only once.
///
/// Nodes live in a flat array. Children are created lazily and appended,
/// so node indices follow creation order, not octant order.

use std::fmt;
use glam::{Mat4, Vec3};
use crate::camera::Camera;
use crate::scene::BoundingSphere;

/// Index of a node in the octree's flat node array.
pub type NodeId = usize;

/// Index of the root node in the flat node array.
pub const ROOT: NodeId = 0;

/// Unit cube corner direction of each octant.
///
/// Octant bit layout: bit0 = X, bit1 = Y, bit2 = Z (0 = negative, 1 = positive).
pub const CORNER_DIRECTIONS: [Vec3; 8] = [
    Vec3::new(-1.0, -1.0, -1.0),
    Vec3::new( 1.0, -1.0, -1.0),
    Vec3::new(-1.0,  1.0, -1.0),
    Vec3::new( 1.0,  1.0, -1.0),
    Vec3::new(-1.0, -1.0,  1.0),
    Vec3::new( 1.0, -1.0,  1.0),
    Vec3::new(-1.0,  1.0,  1.0),
    Vec3::new( 1.0,  1.0,  1.0),
];

/// Occlusion state of a node for the current frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeVisibility {
    /// Not reached by the traversal (or its query is still pending)
    Untested,
    /// Query passed, near-plane exception, or queries unavailable
    Visible,
    /// Query reported zero fragments
    Occluded,
}

/// A cube-shaped cell of the octree.
#[derive(Debug, Clone)]
pub struct OctreeNode {
    /// Cube center
    mid: Vec3,
    /// Cube half-extent
    half_side: f32,
    /// Root = 0
    depth: u32,
    /// Objects held by this node (leaf placement), as object indices
    objects: Vec<usize>,
    /// Child per octant
    children: [Option<NodeId>; 8],
    /// Object references assigned to this node before subdivision
    total_object_count: usize,
    /// Camera depth of the node's nearest corner (valid after ordering)
    distance_to_camera: f32,
    visibility: NodeVisibility,
}

impl OctreeNode {
    fn new(mid: Vec3, half_side: f32, depth: u32) -> Self {
        Self {
            mid,
            half_side,
            depth,
            objects: Vec::new(),
            children: [None; 8],
            total_object_count: 0,
            distance_to_camera: 0.0,
            visibility: NodeVisibility::Untested,
        }
    }

    pub fn mid(&self) -> Vec3 {
        self.mid
    }

    pub fn half_side(&self) -> f32 {
        self.half_side
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn objects(&self) -> &[usize] {
        &self.objects
    }

    pub fn children(&self) -> [Option<NodeId>; 8] {
        self.children
    }

    pub fn child(&self, octant: usize) -> Option<NodeId> {
        self.children[octant]
    }

    pub fn is_leaf(&self) -> bool {
        self.children.iter().all(Option::is_none)
    }

    pub fn total_object_count(&self) -> usize {
        self.total_object_count
    }

    pub fn distance_to_camera(&self) -> f32 {
        self.distance_to_camera
    }

    pub fn visibility(&self) -> NodeVisibility {
        self.visibility
    }

    pub fn is_visible(&self) -> bool {
        self.visibility == NodeVisibility::Visible
    }

    pub(crate) fn set_visibility(&mut self, visibility: NodeVisibility) {
        self.visibility = visibility;
    }

    /// Whether a point lies inside (or on the boundary of) this node's cube.
    #[cfg(test)]
    pub fn contains_point(&self, point: Vec3) -> bool {
        ((point - self.mid).abs() - Vec3::splat(self.half_side)).max_element() <= 1e-4
    }

    /// Transform of the unit cube `[-1, 1]^3` onto this node's cube.
    pub fn cube_transform(&self) -> Mat4 {
        Mat4::from_translation(self.mid) * Mat4::from_scale(Vec3::splat(self.half_side))
    }
}

/// Per-frame octree over object bounding spheres.
pub struct Octree {
    /// Flat array of nodes (root first, children in creation order)
    nodes: Vec<OctreeNode>,
    /// Subdivision threshold
    max_objects_per_node: usize,
    /// Depth at which subdivision stops
    max_depth: u32,
    /// Octants sorted nearest-to-farthest from the camera (shared by all nodes)
    front_to_back: [usize; 8],
}

impl Octree {
    /// Create an octree holding a single empty root.
    ///
    /// # Arguments
    ///
    /// * `max_objects_per_node` - A node subdivides only above this count
    /// * `max_depth` - Maximum node depth (root = 0)
    pub fn new(max_objects_per_node: usize, max_depth: u32) -> Self {
        Self {
            nodes: vec![OctreeNode::new(Vec3::ZERO, 0.0, 0)],
            max_objects_per_node,
            max_depth,
            front_to_back: [0, 1, 2, 3, 4, 5, 6, 7],
        }
    }

    /// Drop every node and go back to a single empty root.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.nodes.push(OctreeNode::new(Vec3::ZERO, 0.0, 0));
        self.front_to_back = [0, 1, 2, 3, 4, 5, 6, 7];
    }

    // ===== CONSTRUCTION =====

    /// Build the tree over `spheres`. Object `i` is `spheres[i]`.
    ///
    /// The root cube encloses every sphere. With zero spheres the root
    /// stays an empty leaf with `half_side == 0`.
    pub fn build(&mut self, spheres: &[BoundingSphere]) {
        self.nodes.clear();

        let (mid, half_side) = Self::compute_bounds(spheres);
        let mut root = OctreeNode::new(mid, half_side, 0);
        root.objects = (0..spheres.len()).collect();
        self.nodes.push(root);

        self.group_objects(ROOT, spheres);
    }

    /// Root cube enclosing all spheres: center of their combined box and
    /// half of its largest extent.
    fn compute_bounds(spheres: &[BoundingSphere]) -> (Vec3, f32) {
        if spheres.is_empty() {
            return (Vec3::ZERO, 0.0);
        }

        let mut min = Vec3::splat(f32::MAX);
        let mut max = Vec3::splat(f32::MIN);
        for sphere in spheres {
            min = min.min(sphere.min());
            max = max.max(sphere.max());
        }

        let half_side = (max - min).max_element() * 0.5;
        ((min + max) * 0.5, half_side)
    }

    /// Recursively subdivide a node whose object count exceeds the threshold.
    fn group_objects(&mut self, node_id: NodeId, spheres: &[BoundingSphere]) {
        let node = &mut self.nodes[node_id];
        node.total_object_count = node.objects.len();

        if node.objects.len() <= self.max_objects_per_node || node.depth >= self.max_depth {
            return;
        }

        let objects = std::mem::take(&mut node.objects);
        let mid = node.mid;
        let first_new = self.nodes.len();

        for &object in &objects {
            let octants = Self::overlapped_octants(&spheres[object], mid);
            for octant in 0..8 {
                if octants & (1 << octant) != 0 {
                    let child = self.make_child(node_id, octant);
                    self.nodes[child].objects.push(object);
                }
            }
        }

        // Several children that each received every object: the set only
        // straddles and splitting again would duplicate it, so this node
        // stays a leaf. A single child is a tighter cube and keeps going.
        let created = &self.nodes[first_new..];
        let useless = created.len() > 1
            && created.iter().all(|child| child.objects.len() == objects.len());
        if useless {
            self.nodes.truncate(first_new);
            let node = &mut self.nodes[node_id];
            node.children = [None; 8];
            node.objects = objects;
            return;
        }

        let children = self.nodes[node_id].children;
        for child in children.into_iter().flatten() {
            self.group_objects(child, spheres);
        }
    }

    /// Bitmask of the child octants a sphere overlaps (bit `i` = octant `i`).
    ///
    /// Per axis the sphere is negative (`c + r <= mid`), positive
    /// (`c - r >= mid`) or straddling. Classified axes keep one side,
    /// straddling axes keep both.
    pub fn overlapped_octants(sphere: &BoundingSphere, mid: Vec3) -> u8 {
        let mut mask: u8 = 0xFF;

        for axis in 0..3 {
            let c = sphere.center[axis];
            let r = sphere.radius;
            let m = mid[axis];

            let positive = if c + r <= m {
                false
            } else if c - r >= m {
                true
            } else {
                continue; // straddles: both sides
            };

            for octant in 0..8 {
                let on_positive_side = octant & (1 << axis) != 0;
                if on_positive_side != positive {
                    mask &= !(1u8 << octant);
                }
            }
        }

        mask
    }

    /// Return the child of `parent` at `octant`, creating it if needed.
    fn make_child(&mut self, parent: NodeId, octant: usize) -> NodeId {
        if let Some(child) = self.nodes[parent].children[octant] {
            return child;
        }

        let parent_node = &self.nodes[parent];
        let half_side = parent_node.half_side * 0.5;
        let mid = parent_node.mid + CORNER_DIRECTIONS[octant] * half_side;
        let depth = parent_node.depth + 1;

        let child = self.nodes.len();
        self.nodes.push(OctreeNode::new(mid, half_side, depth));
        self.nodes[parent].children[octant] = Some(child);
        child
    }

    // ===== CAMERA ORDERING =====

    /// Compute the front-to-back octant order and every node's distance.
    ///
    /// The order ranks the 8 corner directions by their camera-space
    /// depth and is shared by all nodes. A node's distance is the camera
    /// depth of its corner in the nearest direction.
    pub fn compute_ordering(&mut self, camera: &Camera) {
        let mut depths = [0.0f32; 8];
        for (octant, direction) in CORNER_DIRECTIONS.iter().enumerate() {
            depths[octant] = camera.direction_depth(*direction);
        }

        let mut order = [0, 1, 2, 3, 4, 5, 6, 7];
        order.sort_by(|&a, &b| depths[a].total_cmp(&depths[b]));
        self.front_to_back = order;

        let nearest = CORNER_DIRECTIONS[order[0]];
        for node in &mut self.nodes {
            node.distance_to_camera = camera.distance_to(node.mid + nearest * node.half_side);
        }
    }

    /// Octants sorted nearest-to-farthest for the current camera.
    pub fn front_to_back(&self) -> [usize; 8] {
        self.front_to_back
    }

    /// Children of a node in front-to-back order.
    pub fn children_front_to_back(&self, node_id: NodeId) -> [Option<NodeId>; 8] {
        let children = self.nodes[node_id].children;
        let mut ordered = [None; 8];
        for (slot, &octant) in self.front_to_back.iter().enumerate() {
            ordered[slot] = children[octant];
        }
        ordered
    }

    // ===== ACCESS =====

    pub fn root(&self) -> &OctreeNode {
        &self.nodes[ROOT]
    }

    pub fn node(&self, node_id: NodeId) -> &OctreeNode {
        &self.nodes[node_id]
    }

    pub(crate) fn node_mut(&mut self, node_id: NodeId) -> &mut OctreeNode {
        &mut self.nodes[node_id]
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Deepest node level (root = 0).
    pub fn depth(&self) -> u32 {
        self.nodes.iter().map(|n| n.depth).max().unwrap_or(0)
    }

    /// Iterate over all nodes with their ids.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &OctreeNode)> {
        self.nodes.iter().enumerate()
    }

    /// Object references held by visible nodes (duplicates possible).
    pub fn visible_objects(&self) -> impl Iterator<Item = usize> + '_ {
        self.nodes.iter()
            .filter(|node| node.is_visible())
            .flat_map(|node| node.objects.iter().copied())
    }

    /// Distinct objects held anywhere in a node's subtree, sorted.
    #[cfg(test)]
    pub fn subtree_objects(&self, node_id: NodeId) -> Vec<usize> {
        let mut result = Vec::new();
        let mut stack = vec![node_id];
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id];
            result.extend_from_slice(&node.objects);
            stack.extend(node.children.iter().flatten());
        }
        result.sort_unstable();
        result.dedup();
        result
    }

    fn write_node(&self, f: &mut fmt::Formatter<'_>, node_id: NodeId, octant: Option<usize>) -> fmt::Result {
        let node = &self.nodes[node_id];
        let indent = "  ".repeat(node.depth as usize);
        let label = match octant {
            Some(octant) => format!("[{}] ", octant),
            None => String::new(),
        };
        writeln!(
            f,
            "{}{}OctreeNode mid=({:.2}, {:.2}, {:.2}) half_side={:.2} objects={} total={} distance={:.2} {:?}",
            indent, label,
            node.mid.x, node.mid.y, node.mid.z,
            node.half_side,
            node.objects.len(),
            node.total_object_count,
            node.distance_to_camera,
            node.visibility,
        )?;
        for (octant, child) in node.children.iter().enumerate() {
            if let Some(child) = child {
                self.write_node(f, *child, Some(octant))?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for Octree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_node(f, ROOT, None)
    }
}

#[cfg(test)]
#[path = "octree_tests.rs"]
mod tests;
