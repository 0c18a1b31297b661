// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arbor Scene: an arena-based retained scene graph.
//!
//! This crate holds the structural core of Arbor: the node arena
//! ([`Scene`]), the per-node data ([`NodeProps`], [`NodeSignals`]), and the
//! drawable capability ([`Drawable`]) that concrete node kinds implement.
//! It owns the tree invariants and the three traversals the stage drives
//! each frame; it knows nothing about surfaces, frames, or pointer routing.
//!
//! ## Handles, not references
//!
//! Nodes are addressed by generational [`NodeId`] handles into one arena.
//! A child records its parent's handle as a plain lookup key and the parent
//! owns the ordered child list, so the two-way tree carries no reference
//! cycles and detachment is pure bookkeeping. Handles of disposed nodes go
//! stale and answer `None`/empty everywhere.
//!
//! ## Capability, not inheritance
//!
//! A node's look and feel is a value implementing [`Drawable`]: `render`,
//! `hit_test`, `update_layout`, `dispose`, plus the container capability
//! query. [`Blank`] is the do-nothing leaf; [`Group`] is the stock
//! container, growing to enclose its children via [`enclose_children`].
//! Whether a node may hold children is asked of the value
//! ([`Scene::is_container`]), never read from a type tag.
//!
//! ## Ordering guarantees
//!
//! Insertion order of children is semantically load-bearing: it is paint
//! order ([`Scene::collect_paint`] walks depth-first pre-order, own visuals
//! before children) and, reversed, hit-test priority
//! ([`Scene::hit_test_point`] searches the same tree back to front, so the
//! topmost-drawn node wins overlapping pointer samples).
//!
//! ## Example
//!
//! ```
//! use arbor_scene::{Group, NodeFlags, NodeProps, Scene};
//! use kurbo::Point;
//!
//! let mut scene = Scene::new();
//! let root = scene.insert(None, Group, NodeProps::default());
//! let button = scene.insert(
//!     Some(root),
//!     Group,
//!     NodeProps {
//!         x: 10.0,
//!         y: 10.0,
//!         width: 80.0,
//!         height: 24.0,
//!         flags: NodeFlags::HIT_IN_BOUNDS,
//!         ..NodeProps::default()
//!     },
//! );
//!
//! let hit = scene.hit_test_point(root, Point::new(50.0, 20.0)).unwrap();
//! assert_eq!(hit.node, button);
//! assert_eq!(hit.path, vec![root, button]);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod drawable;
mod event;
mod scene;
mod types;

pub use drawable::{Blank, ChildBox, Drawable, Group, enclose_children};
pub use event::{NodeSignals, PointerEvent};
pub use scene::{Hit, Scene};
pub use types::{Cursor, NodeFlags, NodeId, NodeProps};
