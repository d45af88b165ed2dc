//! Scene graph storage, mutation, and traversal

use slotmap::SlotMap;
use thiserror::Error;

use crate::foundation::math::{Transform, Vec3};
use crate::scene::camera::PerspectiveProjection;
use crate::scene::geometry::Geometry;
use crate::scene::light::Light;
use crate::scene::material::Material;
use crate::scene::node::{Node, NodeId, NodeKind};
use crate::scene::registry::{GeometryHandle, MaterialHandle, ResourceRegistry};

/// Scene graph mutation errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SceneError {
    /// Attaching the child would create a cycle
    #[error("attaching the node to one of its own descendants would create a cycle")]
    Cycle,

    /// A node id did not resolve to a live node
    #[error("node id is stale or belongs to another scene")]
    UnknownNode,
}

/// An ordered forest of nodes plus the registries their payloads reference
///
/// The scene owns all nodes in a slotmap arena; parent/child links are edited
/// only through [`Scene::add`], [`Scene::remove`] and [`Scene::despawn`], which
/// uphold the single-parent and no-cycle invariants.
pub struct Scene {
    nodes: SlotMap<NodeId, Node>,
    root: NodeId,
    geometries: ResourceRegistry<GeometryHandle, Geometry>,
    materials: ResourceRegistry<MaterialHandle, Material>,

    /// Background clear color, if the scene sets one
    pub background: Option<[f32; 3]>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Create an empty scene with a root group node
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Node::new(NodeKind::Group));
        Self {
            nodes,
            root,
            geometries: ResourceRegistry::default(),
            materials: ResourceRegistry::default(),
            background: None,
        }
    }

    /// The root group node
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of live nodes, root included
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Look up a node
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Look up a node mutably
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    // --- spawning ---------------------------------------------------------

    /// Create a detached group node
    pub fn spawn_group(&mut self) -> NodeId {
        self.nodes.insert(Node::new(NodeKind::Group))
    }

    /// Create a detached mesh node referencing registered resources
    pub fn spawn_mesh(&mut self, geometry: GeometryHandle, material: MaterialHandle) -> NodeId {
        self.nodes.insert(Node::new(NodeKind::Mesh { geometry, material }))
    }

    /// Create a detached light node
    pub fn spawn_light(&mut self, light: Light) -> NodeId {
        self.nodes.insert(Node::new(NodeKind::Light(light)))
    }

    /// Create a detached camera node
    pub fn spawn_camera(&mut self, projection: PerspectiveProjection) -> NodeId {
        self.nodes.insert(Node::new(NodeKind::Camera(projection)))
    }

    // --- resources --------------------------------------------------------

    /// Register a geometry, returning its shareable handle
    pub fn add_geometry(&mut self, geometry: Geometry) -> GeometryHandle {
        self.geometries.insert(geometry)
    }

    /// Register a material, returning its shareable handle
    pub fn add_material(&mut self, material: Material) -> MaterialHandle {
        self.materials.insert(material)
    }

    /// Look up a registered geometry
    pub fn geometry(&self, handle: GeometryHandle) -> Option<&Geometry> {
        self.geometries.get(handle)
    }

    /// Look up a registered material
    pub fn material(&self, handle: MaterialHandle) -> Option<&Material> {
        self.materials.get(handle)
    }

    /// Look up a registered material mutably
    pub fn material_mut(&mut self, handle: MaterialHandle) -> Option<&mut Material> {
        self.materials.get_mut(handle)
    }

    /// Number of registered geometries
    pub fn geometry_count(&self) -> usize {
        self.geometries.len()
    }

    /// Number of registered materials
    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    // --- structure --------------------------------------------------------

    /// Attach `child` to `parent`, appending it to the parent's child list
    ///
    /// A child already attached elsewhere is detached first. Fails with
    /// [`SceneError::Cycle`] when `child` is `parent` itself or one of its
    /// ancestors; the graph is left untouched in that case.
    pub fn add(&mut self, parent: NodeId, child: NodeId) -> Result<(), SceneError> {
        if !self.nodes.contains_key(parent) || !self.nodes.contains_key(child) {
            return Err(SceneError::UnknownNode);
        }
        if child == parent || self.is_ancestor(child, parent) {
            return Err(SceneError::Cycle);
        }

        self.detach(child);
        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.push(child);
        Ok(())
    }

    /// Detach a node (and thereby its subtree) from its parent
    ///
    /// The subtree stays alive and re-attachable; geometry and material
    /// registry entries are not touched.
    pub fn remove(&mut self, node: NodeId) {
        if !self.nodes.contains_key(node) {
            log::warn!("remove called with a stale node id");
            return;
        }
        self.detach(node);
    }

    /// Delete a node and its whole subtree from the arena
    ///
    /// Registry entries referenced by deleted meshes survive; other meshes may
    /// still share them.
    pub fn despawn(&mut self, node: NodeId) {
        if node == self.root {
            log::warn!("refusing to despawn the scene root");
            return;
        }
        if !self.nodes.contains_key(node) {
            log::warn!("despawn called with a stale node id");
            return;
        }

        self.detach(node);
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            if let Some(removed) = self.nodes.remove(id) {
                stack.extend(removed.children);
            }
        }
    }

    fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node].parent.take() {
            self.nodes[parent].children.retain(|&c| c != node);
        }
    }

    /// Whether `ancestor` appears on the parent chain of `node`
    fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = self.nodes[node].parent;
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes[id].parent;
        }
        false
    }

    // --- transforms -------------------------------------------------------

    /// Mutable access to a node's local transform
    pub fn local_mut(&mut self, node: NodeId) -> Option<&mut Transform> {
        self.nodes.get_mut(node).map(|n| &mut n.local)
    }

    /// Set a node's local position
    pub fn set_position(&mut self, node: NodeId, position: Vec3) {
        if let Some(n) = self.nodes.get_mut(node) {
            n.local.position = position;
        }
    }

    /// Orient a node so its local -Z axis points at a target
    ///
    /// The target is expressed in the node's parent space, which is world
    /// space for children of the root.
    pub fn look_at(&mut self, node: NodeId, target: Vec3, up: Vec3) {
        if let Some(n) = self.nodes.get_mut(node) {
            n.local.look_at(target, up);
        }
    }

    /// World transform of a node: ancestor locals composed root-to-node
    ///
    /// Recomputed on every call by walking the parent chain; nothing is
    /// cached.
    pub fn world_transform(&self, node: NodeId) -> Option<Transform> {
        self.nodes.get(node)?;

        let mut chain = Vec::new();
        let mut current = Some(node);
        while let Some(id) = current {
            chain.push(id);
            current = self.nodes[id].parent;
        }

        let mut world = Transform::identity();
        for id in chain.into_iter().rev() {
            world = world.combine(&self.nodes[id].local);
        }
        Some(world)
    }

    // --- traversal --------------------------------------------------------

    /// Depth-first traversal of the whole scene from the root
    pub fn iter(&self) -> Traversal<'_> {
        self.traverse(self.root)
    }

    /// Depth-first traversal of the subtree rooted at `from`
    ///
    /// Lazy and restartable: the iterator borrows the scene immutably and
    /// yields nodes in child-insertion order.
    pub fn traverse(&self, from: NodeId) -> Traversal<'_> {
        let stack = if self.nodes.contains_key(from) {
            vec![from]
        } else {
            Vec::new()
        };
        Traversal { scene: self, stack }
    }

    /// Depth-first traversal yielding each node with its world transform
    ///
    /// Transforms are composed root-to-node during the walk; like
    /// [`Scene::traverse`] this recomputes everything per call.
    pub fn walk(&self, from: NodeId) -> Walk<'_> {
        self.walk_inner(from, false)
    }

    /// Like [`Scene::walk`], but skips invisible nodes and their subtrees
    pub fn walk_visible(&self, from: NodeId) -> Walk<'_> {
        self.walk_inner(from, true)
    }

    fn walk_inner(&self, from: NodeId, visible_only: bool) -> Walk<'_> {
        let stack = match (self.nodes.get(from), self.nodes.get(from).and_then(|n| n.parent)) {
            (Some(_), Some(parent)) => {
                // world_transform(parent) is Some by construction here
                vec![(from, self.world_transform(parent).unwrap_or_default())]
            }
            (Some(_), None) => vec![(from, Transform::identity())],
            (None, _) => Vec::new(),
        };
        Walk {
            scene: self,
            stack,
            visible_only,
        }
    }
}

/// Lazy depth-first node iterator, see [`Scene::traverse`]
pub struct Traversal<'a> {
    scene: &'a Scene,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for Traversal<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let node = &self.scene.nodes[id];
        // Reverse push keeps insertion order on pop.
        self.stack.extend(node.children.iter().rev());
        Some(id)
    }
}

/// Lazy depth-first iterator yielding `(node, world transform)` pairs
pub struct Walk<'a> {
    scene: &'a Scene,
    stack: Vec<(NodeId, Transform)>,
    visible_only: bool,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (NodeId, Transform);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (id, parent_world) = self.stack.pop()?;
            let node = &self.scene.nodes[id];
            if self.visible_only && !node.visible {
                continue;
            }
            let world = parent_world.combine(&node.local);
            self.stack
                .extend(node.children.iter().rev().map(|&c| (c, world.clone())));
            return Some((id, world));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Quat, Vec3};
    use approx::assert_relative_eq;

    fn mesh_scene() -> (Scene, NodeId) {
        let mut scene = Scene::new();
        let geometry = scene.add_geometry(Geometry::cube(1.0));
        let material = scene.add_material(Material::new());
        let mesh = scene.spawn_mesh(geometry, material);
        (scene, mesh)
    }

    #[test]
    fn test_add_places_child_after_parent_in_traversal() {
        let mut scene = Scene::new();
        let parent = scene.spawn_group();
        let child = scene.spawn_group();
        scene.add(scene.root(), parent).unwrap();
        scene.add(parent, child).unwrap();

        let order: Vec<NodeId> = scene.iter().collect();
        let parent_pos = order.iter().position(|&n| n == parent).unwrap();
        let child_pos = order.iter().position(|&n| n == child).unwrap();
        assert!(parent_pos < child_pos);
    }

    #[test]
    fn test_traversal_respects_insertion_order() {
        let mut scene = Scene::new();
        let first = scene.spawn_group();
        let second = scene.spawn_group();
        let grandchild = scene.spawn_group();
        scene.add(scene.root(), first).unwrap();
        scene.add(scene.root(), second).unwrap();
        scene.add(first, grandchild).unwrap();

        let order: Vec<NodeId> = scene.iter().collect();
        assert_eq!(order, vec![scene.root(), first, grandchild, second]);
    }

    #[test]
    fn test_traversal_is_restartable() {
        let mut scene = Scene::new();
        let child = scene.spawn_group();
        scene.add(scene.root(), child).unwrap();

        let first: Vec<NodeId> = scene.iter().collect();
        let second: Vec<NodeId> = scene.iter().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_cycle_rejected_and_graph_unchanged() {
        let mut scene = Scene::new();
        let a = scene.spawn_group();
        let b = scene.spawn_group();
        let c = scene.spawn_group();
        scene.add(scene.root(), a).unwrap();
        scene.add(a, b).unwrap();
        scene.add(b, c).unwrap();

        let before: Vec<NodeId> = scene.iter().collect();

        // Attaching an ancestor (or self) under a descendant must fail.
        assert_eq!(scene.add(c, a), Err(SceneError::Cycle));
        assert_eq!(scene.add(b, a), Err(SceneError::Cycle));
        assert_eq!(scene.add(a, a), Err(SceneError::Cycle));

        let after: Vec<NodeId> = scene.iter().collect();
        assert_eq!(before, after);
        assert_eq!(scene.node(a).unwrap().parent(), Some(scene.root()));
    }

    #[test]
    fn test_reparenting_detaches_from_old_parent() {
        let mut scene = Scene::new();
        let left = scene.spawn_group();
        let right = scene.spawn_group();
        let child = scene.spawn_group();
        scene.add(scene.root(), left).unwrap();
        scene.add(scene.root(), right).unwrap();
        scene.add(left, child).unwrap();

        scene.add(right, child).unwrap();
        assert!(scene.node(left).unwrap().children().is_empty());
        assert_eq!(scene.node(child).unwrap().parent(), Some(right));
    }

    #[test]
    fn test_remove_detaches_subtree_but_keeps_payloads() {
        let (mut scene, mesh) = mesh_scene();
        scene.add(scene.root(), mesh).unwrap();
        assert_eq!(scene.iter().count(), 2);

        scene.remove(mesh);
        assert_eq!(scene.iter().count(), 1);
        // The node and its registry entries are all still alive.
        assert!(scene.node(mesh).is_some());
        assert_eq!(scene.geometry_count(), 1);
        assert_eq!(scene.material_count(), 1);

        // A detached subtree can be re-attached.
        scene.add(scene.root(), mesh).unwrap();
        assert_eq!(scene.iter().count(), 2);
    }

    #[test]
    fn test_despawn_deletes_subtree_nodes_only() {
        let (mut scene, mesh) = mesh_scene();
        let group = scene.spawn_group();
        scene.add(scene.root(), group).unwrap();
        scene.add(group, mesh).unwrap();

        scene.despawn(group);
        assert!(scene.node(group).is_none());
        assert!(scene.node(mesh).is_none());
        assert_eq!(scene.geometry_count(), 1);
        assert_eq!(scene.material_count(), 1);
    }

    #[test]
    fn test_world_transform_three_level_chain() {
        let mut scene = Scene::new();
        let a = scene.spawn_group();
        let b = scene.spawn_group();
        let c = scene.spawn_group();
        scene.add(scene.root(), a).unwrap();
        scene.add(a, b).unwrap();
        scene.add(b, c).unwrap();

        scene.local_mut(a).unwrap().position = Vec3::new(1.0, 0.0, 0.0);
        scene.local_mut(a).unwrap().rotation =
            Quat::from_axis_angle(&Vec3::y_axis(), std::f32::consts::FRAC_PI_2);
        scene.local_mut(b).unwrap().position = Vec3::new(0.0, 2.0, 0.0);
        scene.local_mut(b).unwrap().rotation =
            Quat::from_axis_angle(&Vec3::x_axis(), std::f32::consts::FRAC_PI_4);
        scene.local_mut(c).unwrap().position = Vec3::new(0.0, 0.0, 3.0);

        let expected = scene
            .node(a)
            .unwrap()
            .local
            .combine(&scene.node(b).unwrap().local)
            .combine(&scene.node(c).unwrap().local);
        let world = scene.world_transform(c).unwrap();

        assert_relative_eq!(world.position, expected.position, epsilon = 1e-5);
        assert_relative_eq!(
            world.rotation.to_homogeneous(),
            expected.rotation.to_homogeneous(),
            epsilon = 1e-5
        );

        // And the parent-composed form holds: world(c) == world(b) ∘ local(c).
        let via_parent = scene
            .world_transform(b)
            .unwrap()
            .combine(&scene.node(c).unwrap().local);
        assert_relative_eq!(world.position, via_parent.position, epsilon = 1e-5);
    }

    #[test]
    fn test_walk_matches_world_transform() {
        let mut scene = Scene::new();
        let child = scene.spawn_group();
        let grandchild = scene.spawn_group();
        scene.add(scene.root(), child).unwrap();
        scene.add(child, grandchild).unwrap();
        scene.local_mut(child).unwrap().position = Vec3::new(0.0, 1.0, 0.0);
        scene.local_mut(grandchild).unwrap().position = Vec3::new(2.0, 0.0, 0.0);

        for (id, world) in scene.walk(scene.root()) {
            let reference = scene.world_transform(id).unwrap();
            assert_relative_eq!(world.position, reference.position, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_walk_visible_prunes_hidden_subtrees() {
        let mut scene = Scene::new();
        let hidden = scene.spawn_group();
        let inside = scene.spawn_group();
        let shown = scene.spawn_group();
        scene.add(scene.root(), hidden).unwrap();
        scene.add(hidden, inside).unwrap();
        scene.add(scene.root(), shown).unwrap();
        scene.node_mut(hidden).unwrap().visible = false;

        let visited: Vec<NodeId> = scene.walk_visible(scene.root()).map(|(id, _)| id).collect();
        assert!(visited.contains(&shown));
        assert!(!visited.contains(&hidden));
        assert!(!visited.contains(&inside));
    }

    #[test]
    fn test_geometry_clone_shared_between_meshes_stays_independent() {
        let mut scene = Scene::new();
        let material = scene.add_material(Material::new().with_hex_color(0x00FF00));
        let original = Geometry::cube(1.0);
        let geometry = scene.add_geometry(original.clone());

        // Clone the registered geometry, edit the clone, register it separately.
        let mut edited = scene.geometry(geometry).unwrap().clone();
        for vertex in &mut edited.vertices {
            vertex.position = [0.0, 0.0, 0.0];
        }
        let collapsed = scene.add_geometry(edited);

        let first = scene.spawn_mesh(geometry, material);
        let second = scene.spawn_mesh(collapsed, material);
        scene.add(scene.root(), first).unwrap();
        scene.add(scene.root(), second).unwrap();

        // The first mesh still renders the untouched buffers.
        assert_eq!(scene.geometry(geometry).unwrap(), &original);
        assert_ne!(scene.geometry(collapsed).unwrap(), &original);
    }
}
