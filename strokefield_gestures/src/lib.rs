// Copyright 2025 the Strokefield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer gesture disambiguation for drawing surfaces.
//!
//! This crate turns a stream of raw pointer samples into high-level gesture
//! events: single tap, double tap, long press, and pan-while-pressing. It
//! replaces a platform's implicit recognizer composition rules (delayed
//! touches, require-to-fail dependencies, simultaneous recognition) with an
//! explicit, timestamp-driven state machine that is deterministic and
//! testable without any windowing system.
//!
//! # Model
//!
//! Feed [`PointerEvent`]s to a [`Recognizer`] as they arrive, and call
//! [`Recognizer::on_tick`] periodically (or at least before rendering) so
//! time-based transitions can fire. Both return the [`GestureEvent`]s that
//! became unambiguous, in order. Timestamps are caller-supplied milliseconds
//! from any monotonic epoch, as in the rest of this workspace.
//!
//! The disambiguation rules mirror the classic recognizer graph:
//!
//! - A press is held back (not reported as drawing input) until it either
//!   moves beyond the tap slop or out-waits the long-press duration.
//! - A quick release becomes a tap *candidate*; it is reported as a
//!   [`GestureEvent::SingleTap`] only after the double-tap window lapses
//!   without a second tap (single tap requires double tap to fail).
//! - Two quick releases inside the window collapse into one
//!   [`GestureEvent::DoubleTap`].
//! - A held, unmoved press becomes a long press; movement while the long
//!   press is active is reported as incremental [`GestureEvent::PanChanged`]
//!   deltas rather than drawing input. Pan deltas are never emitted outside
//!   an active long press.
//!
//! ```
//! use strokefield_gestures::{GestureEvent, PointerEvent, Recognizer};
//! use kurbo::Point;
//! use core::num::NonZeroU64;
//!
//! let mut rec = Recognizer::new();
//! let id = NonZeroU64::new(1).unwrap();
//!
//! // A quick press and release: nothing is unambiguous yet.
//! assert!(rec.on_event(PointerEvent::Down { id, pos: Point::new(10.0, 10.0), time_ms: 0 }).is_empty());
//! assert!(rec.on_event(PointerEvent::Up { id, pos: Point::new(10.0, 10.0), time_ms: 40 }).is_empty());
//!
//! // Once the double-tap window lapses, the tap resolves.
//! let events = rec.on_tick(400);
//! assert!(matches!(events[..], [GestureEvent::SingleTap { .. }]));
//! ```

#![no_std]

extern crate alloc;

use core::num::NonZeroU64;

use kurbo::{Point, Vec2};

mod recognizer;

pub use recognizer::{Recognizer, RecognizerState};

/// Stable identifier for a tracked contact (finger, stylus, or mouse) over
/// its down→up lifecycle. Issued by the input layer.
pub type PointerId = NonZeroU64;

/// A raw pointer sample delivered by the platform input layer.
///
/// Timestamps are milliseconds from an arbitrary monotonic epoch and must be
/// non-decreasing across events. `Cancel` carries no payload: it models the
/// platform revoking ownership of *all* in-flight contacts at once (system
/// interruption), not a per-pointer cancellation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    /// A contact went down.
    Down {
        /// The contact that went down.
        id: PointerId,
        /// Position in surface-local coordinates.
        pos: Point,
        /// Event timestamp in milliseconds.
        time_ms: u64,
    },
    /// A tracked contact moved.
    Move {
        /// The contact that moved.
        id: PointerId,
        /// Position in surface-local coordinates.
        pos: Point,
        /// Event timestamp in milliseconds.
        time_ms: u64,
    },
    /// A tracked contact lifted.
    Up {
        /// The contact that lifted.
        id: PointerId,
        /// Position in surface-local coordinates.
        pos: Point,
        /// Event timestamp in milliseconds.
        time_ms: u64,
    },
    /// The platform revoked all in-flight contacts.
    Cancel,
}

/// A disambiguated gesture event, ready for a drawing surface to consume.
///
/// The raw `Pointer*` variants carry drawing input: they are only emitted for
/// presses that have committed to drawing (moved beyond the tap slop), so a
/// quick tap never produces a stray degenerate stroke.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureEvent {
    /// A press committed to drawing. `pos` is the original contact position.
    PointerDown {
        /// The drawing contact.
        id: PointerId,
        /// The position the contact originally went down at.
        pos: Point,
    },
    /// A drawing press moved.
    PointerMove {
        /// The drawing contact.
        id: PointerId,
        /// Current position.
        pos: Point,
    },
    /// A drawing press lifted.
    PointerUp {
        /// The drawing contact.
        id: PointerId,
        /// Release position.
        pos: Point,
    },
    /// All in-flight drawing input was revoked.
    PointerCancelled,
    /// A single tap, reported after the double-tap window lapsed.
    SingleTap {
        /// Where the tap landed.
        pos: Point,
    },
    /// Two quick taps inside the double-tap window.
    DoubleTap,
    /// A press out-waited the long-press duration without moving.
    LongPressBegin {
        /// Where the press went down.
        pos: Point,
    },
    /// The long-pressing contact lifted.
    LongPressEnd,
    /// The long-pressing contact moved.
    ///
    /// `delta` is the incremental movement since the previous sample, never
    /// an absolute offset; consumers apply it directly without maintaining
    /// their own accumulator. Only emitted while a long press is active.
    PanChanged {
        /// Incremental movement since the previous sample.
        delta: Vec2,
    },
}

/// Tunables for gesture disambiguation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureConfig {
    /// Maximum distance a press may travel and still count as a tap or
    /// long press. Movement beyond this commits the press to drawing.
    pub tap_slop: f64,
    /// How long after a tap's release a second tap may still form a double
    /// tap; the single tap is reported once this window lapses.
    pub double_tap_window_ms: u64,
    /// How long a press must be held (within slop) to become a long press.
    pub long_press_ms: u64,
}

impl Default for GestureConfig {
    /// Touch-friendly defaults: 10-unit slop, 300 ms double-tap window,
    /// 500 ms long press.
    fn default() -> Self {
        Self {
            tap_slop: 10.0,
            double_tap_window_ms: 300,
            long_press_ms: 500,
        }
    }
}
