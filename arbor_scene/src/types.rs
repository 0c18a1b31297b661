// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public node types: identifiers, flags, cursor tags, and local geometry.

use alloc::string::String;
use kurbo::{Point, Rect, Size};

/// Identifier for a node in the scene (generational).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// Node flags controlling default pointer behavior.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u8 {
        /// The default hit test answers for points inside the node's
        /// `width` × `height` box. Unset (the default), a node without an
        /// overridden hit test is transparent to the pointer.
        const HIT_IN_BOUNDS = 0b0000_0001;
    }
}

/// Cursor hint a node advertises while hovered.
///
/// The tag is advisory; the host maps it onto whatever cursor set the
/// environment provides.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Cursor {
    /// The environment's default arrow.
    #[default]
    Default,
    /// A pointing hand, for clickable content.
    Pointer,
    /// An I-beam, for selectable or editable text.
    Text,
    /// A four-way move cursor.
    Move,
    /// An open hand, for grabbable content.
    Grab,
    /// A crosshair, for precise picking.
    Crosshair,
    /// An action-not-available indicator.
    NotAllowed,
}

impl Cursor {
    /// A stable string tag for hosts that key cursors by name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Pointer => "pointer",
            Self::Text => "text",
            Self::Move => "move",
            Self::Grab => "grab",
            Self::Crosshair => "crosshair",
            Self::NotAllowed => "not-allowed",
        }
    }
}

/// Local data for a node.
///
/// `x`/`y` are relative to the parent's origin; `width`/`height` default to
/// zero and do not resize any visuals by themselves. All fields are plain
/// value stores: writing them never triggers a redraw. A node that wants
/// redraw-on-change emits its `updated` signal explicitly via
/// [`crate::Scene::emit_updated`]; invalidation is opt-in.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeProps {
    /// Horizontal offset from the parent's origin.
    pub x: f64,
    /// Vertical offset from the parent's origin.
    pub y: f64,
    /// Width of the node's own box.
    pub width: f64,
    /// Height of the node's own box.
    pub height: f64,
    /// Optional label. Not unique; purely for lookups and debugging.
    pub name: Option<String>,
    /// Cursor hint while hovered.
    pub cursor: Cursor,
    /// Pointer-behavior flags.
    pub flags: NodeFlags,
}

impl NodeProps {
    /// Props spanning a box of the given size at the parent's origin.
    pub fn sized(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// The node's origin in its parent's space.
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// The node's own size.
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// The node's box in its parent's space.
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    /// Whether a point in this node's local space falls inside its
    /// `width` × `height` box. Edges are inclusive.
    pub fn contains_local(&self, point: Point) -> bool {
        point.x >= 0.0 && point.x <= self.width && point.y >= 0.0 && point.y <= self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn props_default_to_empty_box() {
        let props = NodeProps::default();
        assert_eq!(props.origin(), Point::ZERO);
        assert_eq!(props.size(), Size::ZERO);
        assert_eq!(props.cursor, Cursor::Default);
        assert!(props.flags.is_empty());
        assert!(props.name.is_none());
    }

    #[test]
    fn contains_local_is_edge_inclusive() {
        let props = NodeProps::sized(10.0, 4.0);
        assert!(props.contains_local(Point::new(0.0, 0.0)));
        assert!(props.contains_local(Point::new(10.0, 4.0)));
        assert!(props.contains_local(Point::new(5.0, 2.0)));
        assert!(!props.contains_local(Point::new(-0.1, 2.0)));
        assert!(!props.contains_local(Point::new(10.1, 2.0)));
        assert!(!props.contains_local(Point::new(5.0, 4.1)));
    }

    #[test]
    fn bounds_are_offset_by_position() {
        let props = NodeProps {
            x: 3.0,
            y: 4.0,
            width: 10.0,
            height: 20.0,
            ..NodeProps::default()
        };
        assert_eq!(props.bounds(), Rect::new(3.0, 4.0, 13.0, 24.0));
    }

    #[test]
    fn cursor_tags_are_stable() {
        assert_eq!(Cursor::Default.as_str(), "default");
        assert_eq!(Cursor::Pointer.as_str(), "pointer");
        assert_eq!(Cursor::NotAllowed.as_str(), "not-allowed");
    }
}
