// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arbor Paint: paint-command records and the per-render accumulator.
//!
//! Drawable nodes do not paint pixels. During a render pass each node is
//! handed a [`PaintBuffer`] and appends [`PaintCommand`] records to it; the
//! stage flattens every node's output into one ordered stream and hands the
//! stream to an external [`Surface`]. Bit-for-bit drawing fidelity (color
//! parsing, font metrics, path tessellation) is the surface's job, so the
//! records here carry geometry plus opaque style tags and nothing is
//! validated beyond structural shape.
//!
//! ## Coordinate spaces
//!
//! A node renders in its own local space. When the stage collects a node's
//! buffer it shifts every command by the node's accumulated ancestor offset
//! ([`PaintCommand::translate`]), so the stream a [`Surface`] receives is
//! entirely in surface space.
//!
//! ## Example
//!
//! ```
//! use arbor_paint::{CircleSpec, PaintBuffer, TextProps};
//! use kurbo::{Circle, Point};
//!
//! let mut buffer = PaintBuffer::new();
//! buffer
//!     .circle(CircleSpec::filled(Circle::new((40.0, 40.0), 25.0), "tomato"))
//!     .text("hello", TextProps::at(Point::new(10.0, 90.0)));
//! assert_eq!(buffer.render_props().len(), 2);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use alloc::borrow::Cow;
use alloc::string::String;
use alloc::vec::Vec;
use kurbo::{Affine, BezPath, Circle, Point, Size, Vec2};

/// An opaque style tag naming a color.
///
/// The engine never interprets the tag; whatever convention the painting
/// backend resolves (`"#rrggbb"`, named colors, a palette key) is carried
/// through verbatim.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Color(Cow<'static, str>);

impl Color {
    /// Wrap a color tag.
    pub fn new(tag: impl Into<Cow<'static, str>>) -> Self {
        Self(tag.into())
    }

    /// The tag, exactly as supplied.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for Color {
    fn from(tag: &'static str) -> Self {
        Self(Cow::Borrowed(tag))
    }
}

impl From<String> for Color {
    fn from(tag: String) -> Self {
        Self(Cow::Owned(tag))
    }
}

/// Outline style for stroked primitives.
#[derive(Clone, Debug, PartialEq)]
pub struct Stroke {
    /// Stroke color tag.
    pub color: Color,
    /// Stroke width in surface units.
    pub width: f64,
}

impl Stroke {
    /// A one-unit-wide stroke of the given color.
    pub fn new(color: impl Into<Color>) -> Self {
        Self {
            color: color.into(),
            width: 1.0,
        }
    }

    /// Builder-style width override.
    pub fn with_width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }
}

/// Geometry and style for a circle command.
#[derive(Clone, Debug, PartialEq)]
pub struct CircleSpec {
    /// Center and radius, in the emitting node's local space.
    pub circle: Circle,
    /// Optional fill color tag.
    pub fill: Option<Color>,
    /// Optional outline.
    pub stroke: Option<Stroke>,
}

impl CircleSpec {
    /// A filled circle with no outline.
    pub fn filled(circle: Circle, fill: impl Into<Color>) -> Self {
        Self {
            circle,
            fill: Some(fill.into()),
            stroke: None,
        }
    }

    /// An outlined circle with no fill.
    pub fn stroked(circle: Circle, stroke: Stroke) -> Self {
        Self {
            circle,
            fill: None,
            stroke: Some(stroke),
        }
    }
}

/// Geometry and style for an arbitrary path command.
#[derive(Clone, Debug, PartialEq)]
pub struct ShapeSpec {
    /// The path, in the emitting node's local space.
    pub path: BezPath,
    /// Optional fill color tag.
    pub fill: Option<Color>,
    /// Optional outline.
    pub stroke: Option<Stroke>,
}

/// Placement and style for text commands.
///
/// Everything but the origin is an optional hint; the backend supplies its
/// own defaults for whatever is absent.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextProps {
    /// Baseline origin of the first line, in the emitting node's local space.
    pub origin: Point,
    /// Optional color tag.
    pub color: Option<Color>,
    /// Optional font-family tag, resolved by the backend.
    pub font: Option<String>,
    /// Optional font size in surface units.
    pub size: Option<f64>,
    /// Optional baseline-to-baseline distance for multi-line text.
    pub line_height: Option<f64>,
}

impl TextProps {
    /// Props with only an origin set.
    pub fn at(origin: Point) -> Self {
        Self {
            origin,
            ..Self::default()
        }
    }
}

/// A single paint primitive.
///
/// Commands are recorded in the emitting node's local space and shifted into
/// surface space by the collector; see the crate docs.
#[derive(Clone, Debug, PartialEq)]
pub enum PaintCommand {
    /// A polyline through `points`.
    Line {
        /// Vertices, in order; two or more make a visible line.
        points: Vec<Point>,
        /// Optional color tag.
        color: Option<Color>,
    },
    /// A circle.
    Circle(CircleSpec),
    /// An arbitrary filled/stroked path.
    Shape(ShapeSpec),
    /// A single run of text.
    Text {
        /// The text content.
        text: String,
        /// Placement and style.
        props: TextProps,
    },
    /// Several lines of text sharing one style, stacked by `line_height`.
    TextLines {
        /// The lines, top to bottom.
        lines: Vec<String>,
        /// Placement and style of the first line.
        props: TextProps,
    },
}

impl PaintCommand {
    /// Shift the command's geometry by `offset`.
    pub fn translate(&mut self, offset: Vec2) {
        match self {
            Self::Line { points, .. } => {
                for p in points {
                    *p += offset;
                }
            }
            Self::Circle(spec) => spec.circle.center += offset,
            Self::Shape(spec) => spec.path.apply_affine(Affine::translate(offset)),
            Self::Text { props, .. } | Self::TextLines { props, .. } => props.origin += offset,
        }
    }
}

/// The per-render command accumulator.
///
/// One buffer is handed to a node's `render`; the node appends commands via
/// the fluent methods and the collector reads them back through
/// [`PaintBuffer::render_props`]. Buffers may be reused across render calls
/// (the stage drains one buffer per node) but never across frames, so
/// cross-frame aliasing cannot occur.
#[derive(Debug, Default)]
pub struct PaintBuffer {
    commands: Vec<PaintCommand>,
}

impl PaintBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a polyline command.
    pub fn line(&mut self, points: impl Into<Vec<Point>>, color: Option<Color>) -> &mut Self {
        self.commands.push(PaintCommand::Line {
            points: points.into(),
            color,
        });
        self
    }

    /// Append a circle command.
    pub fn circle(&mut self, spec: CircleSpec) -> &mut Self {
        self.commands.push(PaintCommand::Circle(spec));
        self
    }

    /// Append a path command.
    pub fn shape(&mut self, spec: ShapeSpec) -> &mut Self {
        self.commands.push(PaintCommand::Shape(spec));
        self
    }

    /// Append a single-run text command.
    pub fn text(&mut self, text: impl Into<String>, props: TextProps) -> &mut Self {
        self.commands.push(PaintCommand::Text {
            text: text.into(),
            props,
        });
        self
    }

    /// Append a multi-line text command.
    pub fn text_lines(&mut self, lines: Vec<String>, props: TextProps) -> &mut Self {
        self.commands.push(PaintCommand::TextLines { lines, props });
        self
    }

    /// The accumulated commands, in append order.
    pub fn render_props(&self) -> &[PaintCommand] {
        &self.commands
    }

    /// Number of accumulated commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether nothing has been appended.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Drop all accumulated commands, keeping the allocation.
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Move the accumulated commands onto the end of `out`, leaving this
    /// buffer empty.
    pub fn drain_into(&mut self, out: &mut Vec<PaintCommand>) {
        out.append(&mut self.commands);
    }
}

/// The external painting backend.
///
/// A surface consumes one ordered command stream per frame; the commands are
/// already in surface space. How (or whether) pixels appear is entirely its
/// business.
pub trait Surface {
    /// Discard the previous frame's contents.
    fn clear(&mut self);

    /// Resize the backing store.
    fn set_size(&mut self, size: Size);

    /// Execute one frame's command stream.
    fn submit(&mut self, commands: &[PaintCommand]);
}
