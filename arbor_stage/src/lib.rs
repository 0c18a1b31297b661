// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arbor Stage: the root driver of a scene graph.
//!
//! A [`Stage`] owns one [`Scene`], the root container node, and the link to
//! the external painting [`Surface`]. The host loop talks to the stage and
//! to nothing else: it forwards pointer samples, asks
//! [`Stage::needs_update`] whenever it likes, and calls [`Stage::update`]
//! once per frame it decides to produce.
//!
//! ## The frame protocol
//!
//! [`Stage::update`] runs synchronously, start to finish:
//!
//! 1. Clear the surface and the pending-invalidation flag.
//! 2. Reconcile membership: walk the tree from the root; nodes that are no
//!    longer reachable are unregistered (their frame-scoped bookkeeping is
//!    dropped; disposal stays the owner's call), and
//!    newly reachable nodes are registered. Registration is what wires a
//!    node's `updated` signal to the stage's invalidation flag. If the
//!    hovered node vanished, hover resets with no `mouse_out`.
//! 3. Layout, depth-first, children before parents
//!    ([`Scene::update_layout`]).
//! 4. Push the root's resolved size to the surface when it changed.
//! 5. Collect the paint stream in paint order ([`Scene::collect_paint`])
//!    and submit it.
//!
//! The returned [`Frame`] summarizes what happened.
//!
//! ## Pointer routing
//!
//! [`Stage::pointer_move`] and [`Stage::pointer_click`] take a sample in
//! surface space, find the topmost hit (reverse paint order, see
//! [`Scene::hit_test_point`]), run the edge-triggered hover transition
//! (`mouse_out` on the old node, `mouse_over` on the new), then emit
//! `mouse_move` or `click` on the target. Payloads carry the sample in both
//! the target's local space and surface space.
//!
//! ## Example
//!
//! ```
//! use arbor_paint::{PaintCommand, Surface};
//! use arbor_scene::{Blank, NodeFlags, NodeProps};
//! use arbor_stage::Stage;
//! use kurbo::{Point, Size};
//!
//! struct NullSurface;
//!
//! impl Surface for NullSurface {
//!     fn clear(&mut self) {}
//!     fn set_size(&mut self, _size: Size) {}
//!     fn submit(&mut self, _commands: &[PaintCommand]) {}
//! }
//!
//! let mut stage = Stage::new(NullSurface, 320.0, 200.0);
//! let node = stage.scene_mut().insert(
//!     None,
//!     Blank,
//!     NodeProps {
//!         x: 10.0,
//!         y: 10.0,
//!         width: 50.0,
//!         height: 20.0,
//!         flags: NodeFlags::HIT_IN_BOUNDS,
//!         ..NodeProps::default()
//!     },
//! );
//! stage.add_child(node);
//! stage.update();
//!
//! stage.pointer_move(Point::new(30.0, 15.0));
//! assert_eq!(stage.hovered(), Some(node));
//! assert_eq!(stage.local_to_global(node), Some(Point::new(10.0, 10.0)));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::Cell;

use arbor_paint::{PaintCommand, Surface};
use arbor_scene::{Cursor, Group, NodeId, NodeProps, PointerEvent, Scene};
use arbor_signal::ListenerId;
use hashbrown::{HashMap, HashSet};
use kurbo::{Point, Size};

/// Summary of one [`Stage::update`] run.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Frame {
    /// Paint commands submitted to the surface.
    pub painted: usize,
    /// Nodes that became reachable and were registered.
    pub registered: usize,
    /// Nodes that stopped being reachable and were unregistered.
    pub unregistered: usize,
    /// Whether the surface was resized this frame.
    pub resized: bool,
}

/// The tree root and per-frame driver.
///
/// The stage's root node is a stock [`Group`], so every container operation
/// is available at the top level (delegating helpers below operate on the
/// root directly; [`Stage::scene_mut`] exposes the full arena). The stage's
/// own `width`/`height` live on the root's props and, like any node
/// geometry, grow under layout but never shrink.
pub struct Stage<S: Surface> {
    scene: Scene,
    root: NodeId,
    surface: S,
    /// Reachable set as of the last update, with the invalidation-listener
    /// registration each node carries while reachable.
    registered: HashMap<NodeId, ListenerId>,
    hovered: Option<NodeId>,
    invalidated: Rc<Cell<bool>>,
    pushed_size: Option<Size>,
    stream: Vec<PaintCommand>,
}

impl<S: Surface> core::fmt::Debug for Stage<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Stage")
            .field("scene", &self.scene)
            .field("registered", &self.registered.len())
            .field("hovered", &self.hovered)
            .finish_non_exhaustive()
    }
}

impl<S: Surface> Stage<S> {
    /// Create a stage bound to `surface`, with an initial size.
    ///
    /// A fresh stage reports [`Stage::needs_update`] until its first
    /// update, since nothing has been painted yet.
    pub fn new(surface: S, width: f64, height: f64) -> Self {
        let mut scene = Scene::new();
        let root = scene.insert(None, Group, NodeProps::sized(width, height));
        Self {
            scene,
            root,
            surface,
            registered: HashMap::new(),
            hovered: None,
            invalidated: Rc::new(Cell::new(true)),
            pushed_size: None,
            stream: Vec::new(),
        }
    }

    /// The root container's id.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The scene this stage drives.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Mutable access to the scene for structural edits.
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// The bound painting surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable access to the bound painting surface.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Current stage width (the root's width).
    pub fn width(&self) -> f64 {
        self.scene.props(self.root).map(|p| p.width).unwrap_or(0.0)
    }

    /// Current stage height (the root's height).
    pub fn height(&self) -> f64 {
        self.scene.props(self.root).map(|p| p.height).unwrap_or(0.0)
    }

    /// Set the stage size. A plain store; the surface is resized during the
    /// next update.
    pub fn set_size(&mut self, width: f64, height: f64) {
        if let Some(props) = self.scene.props_mut(self.root) {
            props.width = width;
            props.height = height;
        }
    }

    /// Attach `child` as the root's last child. See [`Scene::add_child`].
    pub fn add_child(&mut self, child: NodeId) -> NodeId {
        self.scene.add_child(self.root, child)
    }

    /// Detach `child` from the root without disposing it.
    pub fn remove_child(&mut self, child: NodeId) {
        self.scene.remove_child(self.root, child);
    }

    /// Detach every root child without disposing any of them.
    pub fn detach_all(&mut self) {
        self.scene.detach_all(self.root);
    }

    /// Detach every root child, then dispose each.
    pub fn remove_all(&mut self) {
        self.scene.remove_all(self.root);
    }

    /// The root's children in insertion (paint) order.
    pub fn children(&self) -> &[NodeId] {
        self.scene.children_of(self.root)
    }

    /// Whether a registered node has requested a redraw (or the stage has
    /// never painted).
    pub fn needs_update(&self) -> bool {
        self.invalidated.get()
    }

    /// Request a redraw without going through any node's `updated` signal.
    pub fn invalidate(&self) {
        self.invalidated.set(true);
    }

    /// Run one frame: reconcile membership, lay out, resize, paint.
    ///
    /// See the crate docs for the exact step order. Atomic and synchronous;
    /// returns a [`Frame`] summary.
    pub fn update(&mut self) -> Frame {
        self.invalidated.set(false);
        self.surface.clear();

        // Membership reconciliation. Reachability is recomputed from the
        // root; registration is what keeps a node's `updated` signal wired
        // to the invalidation flag.
        let reachable = self.scene.reachable(self.root);
        let reachable_set: HashSet<NodeId> = reachable.iter().copied().collect();

        let mut unregistered = 0;
        let scene = &self.scene;
        self.registered.retain(|&id, &mut listener| {
            if reachable_set.contains(&id) {
                return true;
            }
            if let Some(signals) = scene.signals(id) {
                signals.updated.remove(listener);
            }
            unregistered += 1;
            false
        });
        if let Some(hovered) = self.hovered
            && !reachable_set.contains(&hovered)
        {
            // The hovered node left the tree; there is no one to notify.
            self.hovered = None;
        }

        let mut registered = 0;
        for &id in &reachable {
            if self.registered.contains_key(&id) {
                continue;
            }
            if let Some(signals) = self.scene.signals(id) {
                let flag = self.invalidated.clone();
                let listener = signals.updated.add(self.root, move |()| flag.set(true));
                self.registered.insert(id, listener);
                registered += 1;
            }
        }

        // Layout, children before parents, so every container encloses its
        // children's final boxes, including the root itself.
        self.scene.update_layout(self.root);

        let size = self
            .scene
            .props(self.root)
            .map(|p| p.size())
            .unwrap_or_default();
        let resized = self.pushed_size != Some(size);
        if resized {
            self.surface.set_size(size);
            self.pushed_size = Some(size);
        }

        self.stream.clear();
        self.scene.collect_paint(self.root, &mut self.stream);
        self.surface.submit(&self.stream);

        Frame {
            painted: self.stream.len(),
            registered,
            unregistered,
            resized,
        }
    }

    /// Run the frame protocol regardless of the invalidation flag.
    ///
    /// Exists because not every redraw cause can be routed through a node's
    /// own `updated` emission (window exposure, external data, …).
    pub fn force_update(&mut self) -> Frame {
        self.update()
    }

    /// A node's origin in surface space, composed additively from its
    /// ancestors' offsets.
    ///
    /// Returns `None` when the node is not currently reachable from the
    /// stage, never a garbage coordinate.
    pub fn local_to_global(&self, id: NodeId) -> Option<Point> {
        self.scene.global_origin(self.root, id)
    }

    /// The node currently under the pointer, as of the last routed sample.
    pub fn hovered(&self) -> Option<NodeId> {
        self.hovered
    }

    /// The hovered node's cursor hint, or the default cursor.
    pub fn cursor(&self) -> Cursor {
        self.hovered
            .and_then(|id| self.scene.props(id))
            .map(|p| p.cursor)
            .unwrap_or_default()
    }

    /// Route a pointer move sample, given in surface space.
    ///
    /// Runs the hover transition, then emits `mouse_move` on the hit
    /// target, if any.
    pub fn pointer_move(&mut self, point: Point) {
        self.route(point, false);
    }

    /// Route a pointer click sample, given in surface space.
    ///
    /// Runs the hover transition, then emits `click` on the hit target, if
    /// any.
    pub fn pointer_click(&mut self, point: Point) {
        self.route(point, true);
    }

    fn route(&mut self, point: Point, click: bool) {
        let target = self.scene.hit_test_point(self.root, point).map(|h| h.node);

        // Hover transitions are edge-triggered: nothing fires while the
        // pointer stays inside one node's hit area.
        if target != self.hovered {
            if let Some(old) = self.hovered.take()
                && self.registered.contains_key(&old)
                && let Some(event) = self.event_for(old, point)
            {
                if let Some(signals) = self.scene.signals(old) {
                    signals.mouse_out.emit(&event);
                }
            }
            if let Some(new) = target
                && let Some(event) = self.event_for(new, point)
            {
                if let Some(signals) = self.scene.signals(new) {
                    signals.mouse_over.emit(&event);
                }
            }
            self.hovered = target;
        }

        if let Some(node) = target
            && let Some(event) = self.event_for(node, point)
        {
            if let Some(signals) = self.scene.signals(node) {
                if click {
                    signals.click.emit(&event);
                } else {
                    signals.mouse_move.emit(&event);
                }
            }
        }
    }

    fn event_for(&self, node: NodeId, global: Point) -> Option<PointerEvent> {
        let origin = self.scene.global_origin(self.root, node)?;
        Some(PointerEvent {
            local: global - origin.to_vec2(),
            global,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use arbor_paint::PaintBuffer;
    use arbor_scene::{Blank, Drawable, NodeFlags};

    /// Records everything the stage pushes at it.
    #[derive(Default)]
    struct TestSurface {
        cleared: u32,
        sizes: Vec<Size>,
        frames: Vec<Vec<PaintCommand>>,
    }

    impl Surface for TestSurface {
        fn clear(&mut self) {
            self.cleared += 1;
        }

        fn set_size(&mut self, size: Size) {
            self.sizes.push(size);
        }

        fn submit(&mut self, commands: &[PaintCommand]) {
            self.frames.push(commands.to_vec());
        }
    }

    /// Leaf that paints a single-point line at its local origin.
    struct Dot;

    impl Drawable for Dot {
        fn render(&self, _props: &NodeProps, tools: &mut PaintBuffer) {
            tools.line(vec![Point::ZERO], None);
        }
    }

    fn hittable(x: f64, y: f64, width: f64, height: f64) -> NodeProps {
        NodeProps {
            x,
            y,
            width,
            height,
            flags: NodeFlags::HIT_IN_BOUNDS,
            ..NodeProps::default()
        }
    }

    fn counted_listener(
        signal: &arbor_signal::Signal<PointerEvent, NodeId>,
        owner: NodeId,
    ) -> Rc<Cell<u32>> {
        let count = Rc::new(Cell::new(0_u32));
        let c = count.clone();
        signal.add(owner, move |_| c.set(c.get() + 1));
        count
    }

    #[test]
    fn update_clears_lays_out_and_submits() {
        let mut stage = Stage::new(TestSurface::default(), 100.0, 50.0);
        let a = stage.scene_mut().insert(
            None,
            Dot,
            NodeProps {
                x: 10.0,
                y: 10.0,
                ..NodeProps::default()
            },
        );
        stage.add_child(a);

        let frame = stage.update();
        assert_eq!(frame.painted, 1);
        assert_eq!(frame.registered, 2, "root and child register");
        assert!(frame.resized, "first frame pushes the initial size");

        let surface = stage.surface();
        assert_eq!(surface.cleared, 1);
        assert_eq!(surface.sizes, vec![Size::new(100.0, 50.0)]);
        assert_eq!(
            surface.frames[0],
            vec![PaintCommand::Line {
                points: vec![Point::new(10.0, 10.0)],
                color: None,
            }],
            "stream arrives in surface space"
        );
    }

    #[test]
    fn surface_is_resized_only_on_change() {
        let mut stage = Stage::new(TestSurface::default(), 100.0, 50.0);
        assert!(stage.update().resized);
        assert!(!stage.update().resized);

        stage.set_size(200.0, 50.0);
        let frame = stage.update();
        assert!(frame.resized);
        assert_eq!(stage.surface().sizes.last(), Some(&Size::new(200.0, 50.0)));
    }

    #[test]
    fn stage_grows_to_enclose_content() {
        let mut stage = Stage::new(TestSurface::default(), 100.0, 50.0);
        let wide = stage.scene_mut().insert(
            None,
            Blank,
            NodeProps {
                x: 150.0,
                width: 30.0,
                height: 10.0,
                ..NodeProps::default()
            },
        );
        stage.add_child(wide);

        stage.update();
        assert_eq!(stage.width(), 180.0, "root grew to fit the child");
        assert_eq!(stage.height(), 50.0, "dimensions never shrink");
    }

    #[test]
    fn updated_emissions_set_the_flag_only_while_registered() {
        let mut stage = Stage::new(TestSurface::default(), 100.0, 100.0);
        let node = stage.scene_mut().insert(None, Blank, NodeProps::default());
        stage.add_child(node);

        assert!(stage.needs_update(), "fresh stages have never painted");
        stage.update();
        assert!(!stage.needs_update());

        stage.scene().emit_updated(node);
        assert!(stage.needs_update(), "registered node invalidates");

        let frame = stage.update();
        assert_eq!(frame.registered, 0, "no membership change");

        stage.remove_child(node);
        let frame = stage.update();
        assert_eq!(frame.unregistered, 1);

        stage.scene().emit_updated(node);
        assert!(!stage.needs_update(), "unregistered node no longer flags");
    }

    #[test]
    fn force_update_repaints_without_invalidation() {
        let mut stage = Stage::new(TestSurface::default(), 10.0, 10.0);
        stage.update();
        assert!(!stage.needs_update());
        let frame = stage.force_update();
        assert_eq!(frame.registered, 0);
        assert_eq!(stage.surface().cleared, 2);
    }

    #[test]
    fn hover_transitions_are_edge_triggered() {
        let mut stage = Stage::new(TestSurface::default(), 200.0, 200.0);
        let a = stage
            .scene_mut()
            .insert(None, Blank, hittable(0.0, 0.0, 100.0, 100.0));
        let b = stage
            .scene_mut()
            .insert(None, Blank, hittable(100.0, 0.0, 100.0, 100.0));
        stage.add_child(a);
        stage.add_child(b);
        stage.update();

        let root = stage.root();
        let over_a = counted_listener(&stage.scene().signals(a).unwrap().mouse_over, root);
        let out_a = counted_listener(&stage.scene().signals(a).unwrap().mouse_out, root);
        let move_a = counted_listener(&stage.scene().signals(a).unwrap().mouse_move, root);
        let over_b = counted_listener(&stage.scene().signals(b).unwrap().mouse_over, root);

        stage.pointer_move(Point::new(10.0, 10.0));
        stage.pointer_move(Point::new(20.0, 20.0));
        assert_eq!(over_a.get(), 1, "enter fires once");
        assert_eq!(move_a.get(), 2, "move fires per sample");
        assert_eq!(out_a.get(), 0);
        assert_eq!(stage.hovered(), Some(a));

        stage.pointer_move(Point::new(150.0, 10.0));
        assert_eq!(out_a.get(), 1, "leaving fires exactly one mouse_out");
        assert_eq!(over_b.get(), 1);
        assert_eq!(stage.hovered(), Some(b));

        stage.pointer_move(Point::new(150.0, 150.0));
        assert_eq!(stage.hovered(), None, "empty space clears hover");
        assert_eq!(over_a.get(), 1);
        assert_eq!(out_a.get(), 1);
    }

    #[test]
    fn topmost_sibling_receives_the_click() {
        let mut stage = Stage::new(TestSurface::default(), 200.0, 200.0);
        let under = stage
            .scene_mut()
            .insert(None, Blank, hittable(0.0, 0.0, 100.0, 100.0));
        let over = stage
            .scene_mut()
            .insert(None, Blank, hittable(50.0, 50.0, 100.0, 100.0));
        stage.add_child(under);
        stage.add_child(over);
        stage.update();

        let root = stage.root();
        let clicks_under = counted_listener(&stage.scene().signals(under).unwrap().click, root);
        let clicks_over = counted_listener(&stage.scene().signals(over).unwrap().click, root);

        stage.pointer_click(Point::new(75.0, 75.0));
        assert_eq!(clicks_over.get(), 1, "later-drawn sibling wins overlap");
        assert_eq!(clicks_under.get(), 0);
    }

    #[test]
    fn pointer_payloads_are_localized() {
        let mut stage = Stage::new(TestSurface::default(), 200.0, 200.0);
        let panel = stage
            .scene_mut()
            .insert(None, Group, NodeProps {
                x: 10.0,
                y: 30.0,
                ..NodeProps::default()
            });
        let node = stage
            .scene_mut()
            .insert(Some(panel), Blank, hittable(20.0, 20.0, 40.0, 40.0));
        stage.add_child(panel);
        stage.update();

        let last = Rc::new(Cell::new(Point::ZERO));
        let l = last.clone();
        stage
            .scene()
            .signals(node)
            .unwrap()
            .click
            .add(stage.root(), move |ev: &PointerEvent| l.set(ev.local));

        stage.pointer_click(Point::new(40.0, 60.0));
        assert_eq!(last.get(), Point::new(10.0, 10.0));
        assert_eq!(stage.local_to_global(node), Some(Point::new(30.0, 50.0)));
    }

    #[test]
    fn local_to_global_fails_off_stage() {
        let mut stage = Stage::new(TestSurface::default(), 100.0, 100.0);
        let detached = stage.scene_mut().insert(None, Blank, NodeProps::default());
        assert_eq!(stage.local_to_global(detached), None);

        stage.add_child(detached);
        assert_eq!(stage.local_to_global(detached), Some(Point::ZERO));

        stage.remove_child(detached);
        assert_eq!(stage.local_to_global(detached), None);
    }

    #[test]
    fn vanished_hover_resets_without_mouse_out() {
        let mut stage = Stage::new(TestSurface::default(), 200.0, 200.0);
        let node = stage
            .scene_mut()
            .insert(None, Blank, hittable(0.0, 0.0, 100.0, 100.0));
        stage.add_child(node);
        stage.update();

        let out_count = counted_listener(&stage.scene().signals(node).unwrap().mouse_out, stage.root());
        stage.pointer_move(Point::new(10.0, 10.0));
        assert_eq!(stage.hovered(), Some(node));

        stage.remove_child(node);
        stage.update();
        assert_eq!(stage.hovered(), None, "hover reset during reconciliation");
        assert_eq!(out_count.get(), 0, "no mouse_out for unreachable nodes");
    }

    #[test]
    fn cursor_follows_the_hovered_node() {
        let mut stage = Stage::new(TestSurface::default(), 200.0, 200.0);
        let mut props = hittable(0.0, 0.0, 100.0, 100.0);
        props.cursor = Cursor::Pointer;
        let node = stage.scene_mut().insert(None, Blank, props);
        stage.add_child(node);
        stage.update();

        assert_eq!(stage.cursor(), Cursor::Default);
        stage.pointer_move(Point::new(10.0, 10.0));
        assert_eq!(stage.cursor(), Cursor::Pointer);
        stage.pointer_move(Point::new(150.0, 150.0));
        assert_eq!(stage.cursor(), Cursor::Default);
    }

    #[test]
    fn remove_all_disposal_unregisters_on_next_update() {
        let mut stage = Stage::new(TestSurface::default(), 100.0, 100.0);
        let a = stage.scene_mut().insert(None, Blank, NodeProps::default());
        let b = stage.scene_mut().insert(None, Blank, NodeProps::default());
        stage.add_child(a);
        stage.add_child(b);
        assert_eq!(stage.update().registered, 3);

        stage.remove_all();
        let frame = stage.update();
        assert_eq!(frame.unregistered, 2);
        assert!(!stage.scene().is_alive(a), "remove_all disposes children");
        assert!(!stage.scene().is_alive(b));
        assert_eq!(stage.children(), &[] as &[NodeId]);
    }
}
