// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer-event payloads and the per-node signal set.

use arbor_signal::Signal;
use kurbo::Point;

use crate::types::NodeId;

/// Payload delivered with pointer signals.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointerEvent {
    /// The sample position in the receiving node's local space.
    pub local: Point,
    /// The same sample in surface space.
    pub global: Point,
}

/// The signals every node carries.
///
/// The pointer signals fire from the stage's routing pass; `updated` is the
/// opt-in invalidation hook a node (or its owner) emits when it wants the
/// next frame redrawn. Listener contexts are node ids, so disposing an
/// owner can bulk-remove its registrations with
/// [`Signal::remove_context`].
#[derive(Debug, Default)]
pub struct NodeSignals {
    /// A click sample landed on this node.
    pub click: Signal<PointerEvent, NodeId>,
    /// A move sample landed on this node.
    pub mouse_move: Signal<PointerEvent, NodeId>,
    /// The pointer entered this node (edge-triggered).
    pub mouse_over: Signal<PointerEvent, NodeId>,
    /// The pointer left this node (edge-triggered).
    pub mouse_out: Signal<PointerEvent, NodeId>,
    /// Redraw requested. Payload-less; emission is always explicit.
    pub updated: Signal<(), NodeId>,
}

impl NodeSignals {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Drop every listener on every signal. Part of disposal.
    pub fn clear_all(&self) {
        self.click.clear();
        self.mouse_move.clear();
        self.mouse_over.clear();
        self.mouse_out.clear();
        self.updated.clear();
    }
}
