// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core arena implementation: structure, traversals, queries.

use alloc::boxed::Box;
use alloc::vec::Vec;
use arbor_paint::{PaintBuffer, PaintCommand};
use kurbo::{Point, Vec2};
use smallvec::SmallVec;

use crate::drawable::{ChildBox, Drawable};
use crate::event::NodeSignals;
use crate::types::{NodeId, NodeProps};

/// Result of a hit search.
#[derive(Clone, Debug)]
pub struct Hit {
    /// The matched node.
    pub node: NodeId,
    /// Path from the search root to the node (inclusive).
    pub path: Vec<NodeId>,
}

pub(crate) struct Node {
    generation: u32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    props: NodeProps,
    drawable: Box<dyn Drawable>,
    signals: NodeSignals,
}

/// The node arena: every node of one scene graph lives here.
///
/// Nodes are addressed by generational [`NodeId`] handles. A child stores
/// its parent's handle as a plain lookup key; the parent owns the ordered
/// list of child handles. Detachment is therefore pure bookkeeping and
/// reference cycles cannot form. Handles of disposed nodes go stale: every
/// query on a stale id answers `None`/empty and every mutation is a no-op.
///
/// Structural invariants maintained by construction:
///
/// - A node is a child of at most one parent at any time
///   ([`Scene::add_child`] detaches first).
/// - The graph is acyclic (attaching a node to itself or to one of its own
///   descendants is rejected).
/// - Only nodes whose behavior exposes the container capability
///   ([`Drawable::is_container`]) hold children.
///
/// ## Example
///
/// ```
/// use arbor_scene::{Group, NodeProps, Scene};
///
/// let mut scene = Scene::new();
/// let root = scene.insert(None, Group, NodeProps::default());
/// let child = scene.insert(
///     Some(root),
///     Group,
///     NodeProps {
///         x: 10.0,
///         width: 5.0,
///         ..NodeProps::default()
///     },
/// );
///
/// scene.update_layout(root);
/// assert_eq!(scene.props(root).unwrap().width, 15.0);
/// assert_eq!(scene.parent_of(child), Some(root));
/// ```
#[derive(Default)]
pub struct Scene {
    nodes: Vec<Option<Node>>,
    generations: Vec<u32>,
    free_list: Vec<usize>,
}

impl core::fmt::Debug for Scene {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("Scene")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &self.free_list.len())
            .finish_non_exhaustive()
    }
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    /// Whether the scene holds no live nodes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert a new node, optionally attaching it under `parent`.
    ///
    /// The node starts detached when `parent` is `None`, or when `parent`
    /// is stale or does not expose the container capability. Freed slots
    /// are reused with a bumped generation, so handles to previously
    /// disposed nodes stay dead.
    pub fn insert(
        &mut self,
        parent: Option<NodeId>,
        drawable: impl Drawable + 'static,
        props: NodeProps,
    ) -> NodeId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            (idx, generation)
        } else {
            self.nodes.push(None);
            self.generations.push(1);
            (self.nodes.len() - 1, 1_u32)
        };
        self.nodes[idx] = Some(Node {
            generation,
            parent: None,
            children: Vec::new(),
            props,
            drawable: Box::new(drawable),
            signals: NodeSignals::new(),
        });
        #[allow(
            clippy::cast_possible_truncation,
            reason = "NodeId uses 32-bit indices by design."
        )]
        let id = NodeId::new(idx as u32, generation);
        if let Some(parent) = parent {
            self.add_child(parent, id);
        }
        id
    }

    /// Attach `child` as the last child of `parent`, detaching it from any
    /// current parent first (a node belongs to at most one parent).
    ///
    /// Returns `child` for chaining. The call is a no-op when either handle
    /// is stale, when `parent`'s behavior does not accept children, or when
    /// the attachment would create a cycle (attaching a node to itself or
    /// to one of its own descendants).
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> NodeId {
        if !self.is_alive(parent) || !self.is_alive(child) {
            return child;
        }
        // Leaves hold no children, and attaching a node to itself or to one
        // of its own descendants would introduce a cycle. Both are
        // structural misuse and degrade to documented no-ops.
        if !self.node(parent).drawable.is_container() {
            return child;
        }
        if self.is_same_or_ancestor(child, parent) {
            return child;
        }
        if let Some(old) = self.node(child).parent {
            self.unlink(old, child);
        }
        self.node_mut(parent).children.push(child);
        self.node_mut(child).parent = Some(parent);
        child
    }

    /// Detach `child` from `parent` without disposing it.
    ///
    /// The child's parent backlink is cleared and the child stays live; an
    /// application holding its handle may re-attach it later. A no-op when
    /// `child` is not currently a child of `parent`.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) {
        if !self.is_alive(parent) || !self.is_alive(child) {
            return;
        }
        if self.node(child).parent == Some(parent) {
            self.unlink(parent, child);
        }
    }

    /// Detach every child of `parent` without disposing any of them.
    pub fn detach_all(&mut self, parent: NodeId) {
        if !self.is_alive(parent) {
            return;
        }
        let children = core::mem::take(&mut self.node_mut(parent).children);
        for child in children {
            self.node_mut(child).parent = None;
        }
    }

    /// Detach every child of `parent`, then dispose each former child.
    pub fn remove_all(&mut self, parent: NodeId) {
        if !self.is_alive(parent) {
            return;
        }
        let children = core::mem::take(&mut self.node_mut(parent).children);
        for &child in &children {
            self.node_mut(child).parent = None;
        }
        for child in children {
            self.dispose(child);
        }
    }

    /// Destroy a node and its subtree.
    ///
    /// Releases the node's signal listener lists, runs its behavior's
    /// [`Drawable::dispose`], recursively disposes its children, detaches
    /// it from any parent, and frees its slot. Idempotent: a second call
    /// sees a stale handle and does nothing. Detachment alone never
    /// disposes; this is the owner's explicit end-of-life call (or the
    /// [`Scene::remove_all`] path).
    pub fn dispose(&mut self, id: NodeId) {
        if !self.is_alive(id) {
            return;
        }
        if let Some(parent) = self.node(id).parent {
            self.unlink(parent, id);
        }
        self.dispose_subtree(id);
    }

    fn dispose_subtree(&mut self, id: NodeId) {
        let Some(mut node) = self.nodes[id.idx()].take() else {
            return;
        };
        self.free_list.push(id.idx());
        node.signals.clear_all();
        node.drawable.dispose();
        for child in node.children {
            self.dispose_subtree(child);
        }
    }

    /// Returns true if `id` refers to a live node.
    ///
    /// A handle is live while its slot holds a node of the same generation;
    /// disposal frees the slot and any later reuse bumps the generation.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .map(|n| n.generation == id.1)
            .unwrap_or(false)
    }

    /// Whether a live node's behavior accepts children (capability query).
    pub fn is_container(&self, id: NodeId) -> bool {
        self.node_opt(id)
            .map(|n| n.drawable.is_container())
            .unwrap_or(false)
    }

    /// The parent of a live node, or `None` for detached nodes and stale
    /// handles.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.node_opt(id).and_then(|n| n.parent)
    }

    /// The children of a node in insertion order, or an empty slice for
    /// stale handles. Insertion order is paint order; reversed, it is
    /// hit-test priority.
    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        self.node_opt(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Invoke `f` once per current child of `parent`, in insertion order.
    ///
    /// The scene is borrowed for the duration, so structural mutation from
    /// inside the callback is rejected at compile time.
    pub fn for_each_child(&self, parent: NodeId, mut f: impl FnMut(NodeId)) {
        for &child in self.children_of(parent) {
            f(child);
        }
    }

    /// A live node's local data.
    pub fn props(&self, id: NodeId) -> Option<&NodeProps> {
        self.node_opt(id).map(|n| &n.props)
    }

    /// Mutable access to a live node's local data.
    ///
    /// Writes are plain stores; nothing is redrawn until `updated` is
    /// emitted or the host forces an update.
    pub fn props_mut(&mut self, id: NodeId) -> Option<&mut NodeProps> {
        self.node_opt_mut(id).map(|n| &mut n.props)
    }

    /// A live node's signal set.
    pub fn signals(&self, id: NodeId) -> Option<&NodeSignals> {
        self.node_opt(id).map(|n| &n.signals)
    }

    /// A live node's behavior.
    pub fn drawable(&self, id: NodeId) -> Option<&dyn Drawable> {
        self.node_opt(id).map(|n| n.drawable.as_ref())
    }

    /// Mutable access to a live node's behavior.
    pub fn drawable_mut(&mut self, id: NodeId) -> Option<&mut dyn Drawable> {
        match self.node_opt_mut(id) {
            Some(n) => Some(n.drawable.as_mut()),
            None => None,
        }
    }

    /// A live node's name, if it has one.
    pub fn name_of(&self, id: NodeId) -> Option<&str> {
        self.node_opt(id).and_then(|n| n.props.name.as_deref())
    }

    /// The first live node carrying `name`. Names are not unique; which
    /// duplicate is found is unspecified.
    pub fn node_named(&self, name: &str) -> Option<NodeId> {
        for (idx, slot) in self.nodes.iter().enumerate() {
            if let Some(node) = slot
                && node.props.name.as_deref() == Some(name)
            {
                #[allow(
                    clippy::cast_possible_truncation,
                    reason = "NodeId uses 32-bit indices by design."
                )]
                let idx = idx as u32;
                return Some(NodeId::new(idx, node.generation));
            }
        }
        None
    }

    /// Emit a live node's `updated` signal, requesting a redraw.
    pub fn emit_updated(&self, id: NodeId) {
        if let Some(signals) = self.signals(id) {
            signals.updated.emit(&());
        }
    }

    /// Sum the `(x, y)` offsets from `id` up through `root`, yielding the
    /// node's origin in `root`'s coordinate space.
    ///
    /// Returns `None` when either handle is stale or when `id` is not
    /// reachable from `root`, never a garbage coordinate.
    pub fn global_origin(&self, root: NodeId, id: NodeId) -> Option<Point> {
        if !self.is_alive(root) || !self.is_alive(id) {
            return None;
        }
        let mut acc = Vec2::ZERO;
        let mut current = id;
        loop {
            let node = self.node(current);
            acc += node.props.origin().to_vec2();
            if current == root {
                return Some(acc.to_point());
            }
            current = node.parent?;
        }
    }

    /// Find the topmost node under `point` (given in `root`'s space).
    ///
    /// Children are searched in reverse insertion order, depth-first and
    /// before their parent, so the last-drawn node wins wherever boxes
    /// overlap; hit priority is exactly reverse paint order. Each
    /// candidate's [`Drawable::hit_test`] receives the point already
    /// transformed into that node's local space.
    pub fn hit_test_point(&self, root: NodeId, point: Point) -> Option<Hit> {
        if !self.is_alive(root) {
            return None;
        }
        let mut path = Vec::new();
        if self.hit_walk(root, point, &mut path) {
            let node = *path.last().expect("hit path is never empty on success");
            Some(Hit { node, path })
        } else {
            None
        }
    }

    fn hit_walk(&self, id: NodeId, point_in_parent: Point, path: &mut Vec<NodeId>) -> bool {
        let node = self.node(id);
        let local = point_in_parent - node.props.origin().to_vec2();
        path.push(id);
        for &child in node.children.iter().rev() {
            if self.hit_walk(child, local, path) {
                return true;
            }
        }
        if node.drawable.hit_test(&node.props, local) {
            return true;
        }
        path.pop();
        false
    }

    /// Run one layout pass over the subtree rooted at `root`.
    ///
    /// Depth-first, children before parents: each behavior's
    /// [`Drawable::update_layout`] sees its children's final boxes, may
    /// rewrite them (arrangers), and grows its own box. Exactly one pass
    /// runs per call; the exclusive borrow makes structural mutation from
    /// inside a layout callback unrepresentable.
    pub fn update_layout(&mut self, root: NodeId) {
        if !self.is_alive(root) {
            return;
        }
        self.layout_walk(root);
    }

    fn layout_walk(&mut self, id: NodeId) {
        let children = self.node(id).children.clone();
        for &child in &children {
            self.layout_walk(child);
        }
        let mut boxes: SmallVec<[ChildBox; 8]> = children
            .iter()
            .map(|&child| {
                let props = &self.node(child).props;
                ChildBox {
                    id: child,
                    x: props.x,
                    y: props.y,
                    width: props.width,
                    height: props.height,
                }
            })
            .collect();
        {
            let node = self.node_mut(id);
            let Node {
                props, drawable, ..
            } = node;
            drawable.update_layout(props, &mut boxes);
        }
        for b in &boxes {
            if let Some(props) = self.props_mut(b.id) {
                props.x = b.x;
                props.y = b.y;
                props.width = b.width;
                props.height = b.height;
            }
        }
    }

    /// Collect the subtree's paint commands into `out`, in paint order.
    ///
    /// Depth-first pre-order: a node's own visuals first, then each child
    /// in insertion order, recursively. Every node renders into a reused
    /// buffer in local coordinates; its commands are shifted by the
    /// accumulated ancestor offset before being appended, so `out` ends up
    /// entirely in `root`-space. Rendering borrows the scene immutably,
    /// so a render cannot mutate the tree.
    pub fn collect_paint(&self, root: NodeId, out: &mut Vec<PaintCommand>) {
        if !self.is_alive(root) {
            return;
        }
        let mut buffer = PaintBuffer::new();
        self.paint_walk(root, Vec2::ZERO, &mut buffer, out);
    }

    fn paint_walk(
        &self,
        id: NodeId,
        parent_origin: Vec2,
        buffer: &mut PaintBuffer,
        out: &mut Vec<PaintCommand>,
    ) {
        let node = self.node(id);
        let origin = parent_origin + node.props.origin().to_vec2();
        node.drawable.render(&node.props, buffer);
        if !buffer.is_empty() {
            let start = out.len();
            buffer.drain_into(out);
            for command in &mut out[start..] {
                command.translate(origin);
            }
        }
        for &child in &node.children {
            self.paint_walk(child, origin, buffer, out);
        }
    }

    /// Every node reachable from `root`, in depth-first pre-order.
    pub fn reachable(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if self.is_alive(root) {
            self.reach_walk(root, &mut out);
        }
        out
    }

    fn reach_walk(&self, id: NodeId, out: &mut Vec<NodeId>) {
        out.push(id);
        for &child in &self.node(id).children {
            self.reach_walk(child, out);
        }
    }

    // --- internals ---

    fn is_same_or_ancestor(&self, candidate: NodeId, of: NodeId) -> bool {
        let mut current = Some(of);
        while let Some(id) = current {
            if id == candidate {
                return true;
            }
            current = self.node(id).parent;
        }
        false
    }

    fn unlink(&mut self, parent: NodeId, child: NodeId) {
        self.node_mut(parent).children.retain(|c| *c != child);
        self.node_mut(child).parent = None;
    }

    /// Access a node; panics if `id` is stale.
    fn node(&self, id: NodeId) -> &Node {
        self.nodes[id.idx()].as_ref().expect("dangling NodeId")
    }

    /// Access a node mutably; panics if `id` is stale.
    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.nodes[id.idx()].as_mut().expect("dangling NodeId")
    }

    fn node_opt(&self, id: NodeId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.1).then_some(n)
    }

    fn node_opt_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        (n.generation == id.1).then_some(n)
    }
}
