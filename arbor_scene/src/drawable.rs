// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The drawable capability and the stock behaviors built on it.
//!
//! Concrete node kinds are not subclasses; they are values implementing
//! [`Drawable`], and the scene composes them by handle. Every method has a
//! default matching the plain-node contract, so a minimal drawable
//! implements nothing at all ([`Blank`]) and a container only needs to
//! opt in to the container capability and a layout policy ([`Group`]).

use arbor_paint::PaintBuffer;
use kurbo::Point;

use crate::types::{NodeFlags, NodeId, NodeProps};

/// Geometry snapshot of one direct child, handed to
/// [`Drawable::update_layout`].
///
/// Layout behaviors may rewrite the fields; the scene copies them back to
/// the children when the call returns, which is how arranging containers
/// (rows, columns, grids) reposition their content before the enclosing-box
/// computation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChildBox {
    /// The child this box belongs to.
    pub id: NodeId,
    /// Horizontal offset from the parent's origin.
    pub x: f64,
    /// Vertical offset from the parent's origin.
    pub y: f64,
    /// The child's width.
    pub width: f64,
    /// The child's height.
    pub height: f64,
}

/// Per-node behavior: rendering, hit testing, layout, disposal.
///
/// Implementations must not assume anything about the tree they are mounted
/// in; all structural context arrives through the arguments. `render` takes
/// `&self` and runs during an immutable scene traversal, so mutating the
/// tree from inside a render is unrepresentable rather than merely
/// forbidden.
pub trait Drawable {
    /// Append this node's paint commands, in local coordinates.
    ///
    /// The default draws nothing.
    fn render(&self, props: &NodeProps, tools: &mut PaintBuffer) {
        let _ = (props, tools);
    }

    /// Answer whether `point`, already in this node's local space, hits
    /// this node.
    ///
    /// The default answers `true` only when
    /// [`NodeFlags::HIT_IN_BOUNDS`] is set and the point lies inside the
    /// node's `width` × `height` box (edges inclusive). Override for
    /// non-rectangular hit areas.
    fn hit_test(&self, props: &NodeProps, point: Point) -> bool {
        props.flags.contains(NodeFlags::HIT_IN_BOUNDS) && props.contains_local(point)
    }

    /// Recompute layout from the direct children's boxes.
    ///
    /// Invoked by the scene depth-first, children before parents, so each
    /// child's `ChildBox` already holds its final size. Rewritten boxes are
    /// copied back to the children. The default does nothing, which is the
    /// correct behavior for leaves without intrinsic measurement.
    fn update_layout(&mut self, props: &mut NodeProps, children: &mut [ChildBox]) {
        let _ = (props, children);
    }

    /// Whether this behavior accepts children.
    ///
    /// A capability query, not a type tag: traversal code asks the value,
    /// and attaching a child to a node whose behavior answers `false` is
    /// rejected.
    fn is_container(&self) -> bool {
        false
    }

    /// Release resources beyond the node-owned signal lists, which the
    /// scene clears itself. Called at most once per node lifetime.
    fn dispose(&mut self) {}
}

/// Grow `props` to the smallest box enclosing every child box.
///
/// The stock growth policy: a dimension only ever grows
/// (`width = max(width, child.x + child.width)`, symmetric for height),
/// never shrinks. Arranging containers call this after repositioning their
/// children.
pub fn enclose_children(props: &mut NodeProps, children: &[ChildBox]) {
    for child in children {
        props.width = props.width.max(child.x + child.width);
        props.height = props.height.max(child.y + child.height);
    }
}

/// A node with no behavior of its own: invisible, transparent to the
/// pointer unless flagged, no layout.
#[derive(Clone, Copy, Debug, Default)]
pub struct Blank;

impl Drawable for Blank {}

/// The stock container behavior.
///
/// Draws nothing itself; accepts children and grows to enclose them via
/// [`enclose_children`].
#[derive(Clone, Copy, Debug, Default)]
pub struct Group;

impl Drawable for Group {
    fn update_layout(&mut self, props: &mut NodeProps, children: &mut [ChildBox]) {
        enclose_children(props, children);
    }

    fn is_container(&self) -> bool {
        true
    }
}
