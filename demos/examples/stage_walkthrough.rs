// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end walkthrough: build a small scene, run frame updates, route
//! pointer samples.
//!
//! This example shows how the pieces fit together:
//! - `arbor_scene` for the node tree and drawable behaviors,
//! - `arbor_stage` for the per-frame protocol and pointer routing,
//! - `arbor_paint` for the command stream a surface consumes.
//!
//! The "surface" here just prints what it is asked to draw.
//!
//! Run:
//! - `cargo run -p arbor_demos --example stage_walkthrough`

use arbor_paint::{CircleSpec, PaintBuffer, PaintCommand, Surface, TextProps};
use arbor_scene::{Cursor, Drawable, Group, NodeFlags, NodeProps, PointerEvent};
use arbor_stage::Stage;
use kurbo::{Circle, Point, Size};

/// A painting backend that logs the stream instead of rasterizing it.
struct PrintSurface;

impl Surface for PrintSurface {
    fn clear(&mut self) {
        println!("surface: clear");
    }

    fn set_size(&mut self, size: Size) {
        println!("surface: resize to {} x {}", size.width, size.height);
    }

    fn submit(&mut self, commands: &[PaintCommand]) {
        println!("surface: {} command(s)", commands.len());
        for command in commands {
            match command {
                PaintCommand::Circle(spec) => println!(
                    "  circle at ({}, {}) r={}",
                    spec.circle.center.x, spec.circle.center.y, spec.circle.radius
                ),
                PaintCommand::Text { text, props } => {
                    println!("  text {text:?} at ({}, {})", props.origin.x, props.origin.y);
                }
                other => println!("  {other:?}"),
            }
        }
    }
}

/// A filled disc with a circular hit area.
struct Disc {
    color: &'static str,
}

impl Drawable for Disc {
    fn render(&self, props: &NodeProps, tools: &mut PaintBuffer) {
        let r = props.width / 2.0;
        tools.circle(CircleSpec::filled(Circle::new((r, r), r), self.color));
    }

    fn hit_test(&self, props: &NodeProps, point: Point) -> bool {
        let r = props.width / 2.0;
        let (dx, dy) = (point.x - r, point.y - r);
        dx * dx + dy * dy <= r * r
    }
}

/// A one-line text label, transparent to the pointer.
struct Label {
    text: &'static str,
}

impl Drawable for Label {
    fn render(&self, _props: &NodeProps, tools: &mut PaintBuffer) {
        tools.text(self.text, TextProps::at(Point::new(0.0, 12.0)));
    }
}

fn main() {
    let mut stage = Stage::new(PrintSurface, 320.0, 200.0);

    // A card containing a disc button and a caption.
    let card = stage.scene_mut().insert(
        None,
        Group,
        NodeProps {
            x: 20.0,
            y: 20.0,
            name: Some("card".into()),
            ..NodeProps::default()
        },
    );
    let button = stage.scene_mut().insert(
        Some(card),
        Disc { color: "tomato" },
        NodeProps {
            x: 10.0,
            y: 10.0,
            width: 40.0,
            height: 40.0,
            cursor: Cursor::Pointer,
            ..NodeProps::default()
        },
    );
    stage.scene_mut().insert(
        Some(card),
        Label { text: "press the disc" },
        NodeProps {
            x: 10.0,
            y: 60.0,
            width: 120.0,
            height: 16.0,
            ..NodeProps::default()
        },
    );
    stage.add_child(card);

    // A backdrop that catches whatever the card does not. Added first in
    // z terms it would be below, but insertion order is paint order, so
    // re-adding the card keeps it on top.
    let backdrop = stage.scene_mut().insert(
        None,
        Group,
        NodeProps {
            width: 320.0,
            height: 200.0,
            flags: NodeFlags::HIT_IN_BOUNDS,
            ..NodeProps::default()
        },
    );
    stage.add_child(backdrop);
    stage.add_child(card);

    // Wire a few listeners. Contexts are node ids; using the owning node
    // itself means disposal would drop these registrations in bulk.
    let signals = stage.scene().signals(button).expect("button is live");
    signals.mouse_over.add(button, |ev: &PointerEvent| {
        println!("button: hover at local ({}, {})", ev.local.x, ev.local.y);
    });
    signals.mouse_out.add(button, |_: &PointerEvent| {
        println!("button: hover left");
    });
    signals.click.add(button, |ev: &PointerEvent| {
        println!("button: clicked at local ({}, {})", ev.local.x, ev.local.y);
    });

    println!("-- first frame --");
    let frame = stage.update();
    println!(
        "frame: painted={} registered={} resized={}",
        frame.painted, frame.registered, frame.resized
    );
    println!(
        "button origin on surface: {:?}",
        stage.local_to_global(button)
    );

    println!("-- pointer --");
    // Into the disc's center: enters, moves, clicks.
    stage.pointer_move(Point::new(50.0, 50.0));
    println!("cursor: {}", stage.cursor().as_str());
    stage.pointer_click(Point::new(50.0, 50.0));
    // Corner of the disc's box: inside the box, outside the circle, so the
    // backdrop is the topmost hit and the button's hover ends.
    stage.pointer_move(Point::new(32.0, 32.0));
    println!("hovered now: {:?}", stage.hovered() == Some(backdrop));

    println!("-- second frame (nothing changed, host repaints anyway) --");
    stage.force_update();
}
