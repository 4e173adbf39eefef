// Copyright 2025 the Strokefield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the surface: the line entity, theming, and the signals
//! mutating operations return.

use kurbo::Point;

/// A drawn line segment.
///
/// Plain value with mutable endpoints; equality is structural. Lines are
/// addressed by index or pointer key, never by value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Line {
    /// Where the stroke started.
    pub begin: Point,
    /// Where the stroke currently ends.
    pub end: Point,
}

impl Line {
    /// Create a line between two points.
    pub const fn new(begin: Point, end: Point) -> Self {
        Self { begin, end }
    }

    /// The degenerate line a stroke starts as: both endpoints at the
    /// initial contact position.
    pub const fn degenerate(at: Point) -> Self {
        Self {
            begin: at,
            end: at,
        }
    }

    /// This line as a [`kurbo::Line`] for geometry queries.
    pub const fn segment(&self) -> kurbo::Line {
        kurbo::Line {
            p0: self.begin,
            p1: self.end,
        }
    }
}

/// An 8-bit RGBA color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel; 255 is opaque.
    pub a: u8,
}

impl Color {
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque red.
    pub const RED: Self = Self::rgb(255, 0, 0);
    /// Opaque green.
    pub const GREEN: Self = Self::rgb(0, 255, 0);

    /// An opaque color from RGB channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

/// Rendering configuration for the surface.
///
/// Purely cosmetic: none of these values affect the gesture or selection
/// logic. The drawing adapter strokes every line as a round-capped segment
/// of `line_thickness`, picking the color by the line's state. Changing the
/// theme warrants a redraw but nothing else.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceTheme {
    /// Color for committed lines.
    pub finished_color: Color,
    /// Color for strokes still being drawn.
    pub active_color: Color,
    /// Color for the selected line, overriding `finished_color`.
    pub selected_color: Color,
    /// Stroke width in surface units.
    pub line_thickness: f64,
}

impl Default for SurfaceTheme {
    fn default() -> Self {
        Self {
            finished_color: Color::BLACK,
            active_color: Color::RED,
            selected_color: Color::GREEN,
            line_thickness: 10.0,
        }
    }
}

bitflags::bitflags! {
    /// Actions offered by the context menu.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct MenuActions: u8 {
        /// Delete the selected line.
        const DELETE = 0b0000_0001;
    }
}

/// Instruction for the external context-menu controller.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MenuSignal {
    /// Show the menu anchored near a point with the given actions.
    Show {
        /// Where the menu should appear (the triggering tap position).
        anchor: Point,
        /// The actions to offer.
        actions: MenuActions,
    },
    /// Hide the menu if it is visible.
    Hide,
}

/// What a mutating surface operation asks of its caller.
///
/// This replaces implicit property-observer redraws: each operation reports
/// explicitly whether the render model changed and whether the context menu
/// should be shown or hidden. Operations that turn out to be no-ops report
/// exactly what the equivalent platform handler would have done (some always
/// redraw, some only on change; see each operation's docs).
#[derive(Clone, Copy, Debug, PartialEq)]
#[must_use = "the caller is responsible for redrawing and driving the menu"]
pub struct Response {
    /// Whether the render model changed and the surface should be redrawn.
    pub redraw: bool,
    /// Menu instruction, if this operation affects the context menu.
    pub menu: Option<MenuSignal>,
}

impl Response {
    /// A pure no-op: nothing to redraw, menu untouched.
    pub const fn none() -> Self {
        Self {
            redraw: false,
            menu: None,
        }
    }

    /// Request a redraw with no menu change.
    pub const fn redraw() -> Self {
        Self {
            redraw: true,
            menu: None,
        }
    }

    /// Request a redraw along with a menu instruction.
    pub const fn redraw_with(menu: MenuSignal) -> Self {
        Self {
            redraw: true,
            menu: Some(menu),
        }
    }
}
