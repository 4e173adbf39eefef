// Copyright 2025 the Strokefield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Strokefield Surface: an interactive line-drawing surface.
//!
//! Users draw line segments with pointer gestures; the surface tracks
//! in-progress and finished strokes, selects a line on a tap near it, drags
//! a selected line during a long press, deletes via a context-menu action,
//! and clears everything on a double tap. Rendering and OS menu plumbing
//! stay outside: the surface emits a [`RenderModel`] snapshot and
//! [`MenuSignal`] instructions, and the surrounding layer draws and shows
//! menus however it likes.
//!
//! ## Where this fits
//!
//! - [`strokefield_gestures`] disambiguates raw pointer input into
//!   [`GestureEvent`](strokefield_gestures::GestureEvent)s.
//! - This crate owns the line state and interprets those events
//!   ([`StrokeSurface::apply`], or the individual `on_*` operations).
//! - [`strokefield_hit`] answers the proximity queries behind
//!   [`StrokeSurface::hit_test`].
//!
//! ## Example
//!
//! ```
//! use strokefield_surface::{MenuSignal, StrokeSurface};
//! use kurbo::Point;
//! use core::num::NonZeroU64;
//!
//! let mut surface = StrokeSurface::new();
//! let id = NonZeroU64::new(1).unwrap();
//!
//! // Draw a line, then select it with a tap.
//! let _ = surface.on_pointer_down(id, Point::new(0.0, 0.0));
//! let _ = surface.on_pointer_up(id, Point::new(100.0, 0.0));
//! let response = surface.on_single_tap(Point::new(50.0, 5.0));
//!
//! assert_eq!(surface.selected(), Some(0));
//! assert!(matches!(response.menu, Some(MenuSignal::Show { .. })));
//!
//! // The menu's delete action removes it again.
//! let _ = surface.delete_selected();
//! assert!(surface.finished_lines().is_empty());
//! ```
//!
//! ## Concurrency model
//!
//! Single-threaded and event-driven: every operation is synchronous and the
//! surface expects one writer processing events in arrival order. Multiple
//! simultaneous pointers are multiple keys in the active-stroke map, not
//! concurrent flows.

#![no_std]

extern crate alloc;

mod surface;
mod types;

pub use surface::{RenderModel, StrokeSurface};
pub use types::{Color, Line, MenuActions, MenuSignal, Response, SurfaceTheme};

// The pointer identifier is shared with the gesture dispatcher.
pub use strokefield_gestures::PointerId;
