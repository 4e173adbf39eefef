// Copyright 2025 the Strokefield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The gesture recognizer state machine.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use crate::{GestureConfig, GestureEvent, PointerEvent, PointerId};
use kurbo::Point;

/// Lifecycle of a single tracked press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PressPhase {
    /// Held back: may still become a tap, a long press, or drawing input.
    Candidate,
    /// Committed to drawing; raw pointer events are forwarded.
    Drawing,
    /// Promoted to a long press; movement is reported as pan deltas.
    LongPress,
}

#[derive(Clone, Debug)]
struct Press {
    down_pos: Point,
    down_time: u64,
    last_pos: Point,
    phase: PressPhase,
    /// Whether this long press has emitted at least one pan delta.
    panned: bool,
}

/// A released tap waiting out the double-tap window.
#[derive(Clone, Copy, Debug)]
struct PendingTap {
    pos: Point,
    deadline_ms: u64,
}

/// Coarse disambiguation state, mostly useful for tests and debugging.
///
/// Presses that committed to drawing are not part of disambiguation, so a
/// recognizer that is only forwarding drawing input reports `Idle`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecognizerState {
    /// No gesture in flight.
    Idle,
    /// One quick tap released, waiting out the double-tap window.
    TapPending,
    /// A long press is active and has not moved yet.
    LongPressActive,
    /// A long press is active and pan deltas have been emitted.
    Panning,
}

/// Timestamp-driven gesture recognizer.
///
/// Tracks every contact independently (keyed by [`PointerId`]) and maintains
/// a single tap/double-tap disambiguation track, mirroring a view-global
/// recognizer over multi-touch drawing input. See the crate docs for the
/// disambiguation rules.
#[derive(Clone, Debug)]
pub struct Recognizer {
    config: GestureConfig,
    presses: BTreeMap<PointerId, Press>,
    pending_tap: Option<PendingTap>,
}

impl Recognizer {
    /// Create a recognizer with [`GestureConfig::default`] tunables.
    pub fn new() -> Self {
        Self::with_config(GestureConfig::default())
    }

    /// Create a recognizer with explicit tunables.
    pub fn with_config(config: GestureConfig) -> Self {
        Self {
            config,
            presses: BTreeMap::new(),
            pending_tap: None,
        }
    }

    /// The tunables this recognizer was built with.
    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// Current disambiguation state.
    pub fn state(&self) -> RecognizerState {
        if let Some(p) = self
            .presses
            .values()
            .find(|p| p.phase == PressPhase::LongPress)
        {
            if p.panned {
                RecognizerState::Panning
            } else {
                RecognizerState::LongPressActive
            }
        } else if self.pending_tap.is_some() {
            RecognizerState::TapPending
        } else {
            RecognizerState::Idle
        }
    }

    /// Process one raw pointer sample.
    ///
    /// Returns the gesture events that became unambiguous, in order. Expiry
    /// of time-based gestures is checked against the sample's timestamp
    /// first, so events are never reported out of order even if
    /// [`on_tick`](Self::on_tick) is called rarely.
    pub fn on_event(&mut self, ev: PointerEvent) -> Vec<GestureEvent> {
        let mut out = Vec::new();
        match ev {
            PointerEvent::Down { id, pos, time_ms } => {
                self.expire(time_ms, &mut out);
                // A duplicate id means the upstream lost an up/cancel; the
                // stale press is silently replaced.
                self.presses.insert(
                    id,
                    Press {
                        down_pos: pos,
                        down_time: time_ms,
                        last_pos: pos,
                        phase: PressPhase::Candidate,
                        panned: false,
                    },
                );
            }
            PointerEvent::Move { id, pos, time_ms } => {
                self.expire(time_ms, &mut out);
                let slop = self.config.tap_slop;
                let Some(press) = self.presses.get_mut(&id) else {
                    return out; // Not tracked: already ended or never started.
                };
                match press.phase {
                    PressPhase::Candidate => {
                        if (pos - press.down_pos).length() > slop {
                            // Tap and long press have failed; this press is
                            // drawing. Flush the delayed down at its original
                            // position so the stroke starts where the finger
                            // did.
                            press.phase = PressPhase::Drawing;
                            out.push(GestureEvent::PointerDown {
                                id,
                                pos: press.down_pos,
                            });
                            out.push(GestureEvent::PointerMove { id, pos });
                        }
                    }
                    PressPhase::Drawing => out.push(GestureEvent::PointerMove { id, pos }),
                    PressPhase::LongPress => {
                        let delta = pos - press.last_pos;
                        if delta.x != 0.0 || delta.y != 0.0 {
                            press.panned = true;
                            out.push(GestureEvent::PanChanged { delta });
                        }
                    }
                }
                press.last_pos = pos;
            }
            PointerEvent::Up { id, pos, time_ms } => {
                self.expire(time_ms, &mut out);
                let Some(press) = self.presses.remove(&id) else {
                    return out;
                };
                match press.phase {
                    PressPhase::Candidate => {
                        // A quick release within slop. `expire` already
                        // resolved a stale pending tap, so any pending tap
                        // left here is still inside its window.
                        if self.pending_tap.take().is_some() {
                            out.push(GestureEvent::DoubleTap);
                        } else {
                            self.pending_tap = Some(PendingTap {
                                pos,
                                deadline_ms: time_ms + self.config.double_tap_window_ms,
                            });
                        }
                    }
                    PressPhase::Drawing => out.push(GestureEvent::PointerUp { id, pos }),
                    PressPhase::LongPress => out.push(GestureEvent::LongPressEnd),
                }
            }
            PointerEvent::Cancel => {
                if self
                    .presses
                    .values()
                    .any(|p| p.phase == PressPhase::LongPress)
                {
                    out.push(GestureEvent::LongPressEnd);
                }
                self.presses.clear();
                self.pending_tap = None;
                out.push(GestureEvent::PointerCancelled);
            }
        }
        out
    }

    /// Advance time without a pointer sample.
    ///
    /// This is how a lone quick tap resolves into
    /// [`GestureEvent::SingleTap`] and how a motionless press is promoted to
    /// a long press. Call it periodically (a frame callback is plenty).
    pub fn on_tick(&mut self, now_ms: u64) -> Vec<GestureEvent> {
        let mut out = Vec::new();
        self.expire(now_ms, &mut out);
        out
    }

    /// Resolve every time-based transition that is due at `now_ms`.
    fn expire(&mut self, now_ms: u64, out: &mut Vec<GestureEvent>) {
        if let Some(pending) = self.pending_tap {
            if now_ms > pending.deadline_ms {
                // The double-tap window lapsed: the tap is now a single tap.
                self.pending_tap = None;
                out.push(GestureEvent::SingleTap { pos: pending.pos });
            }
        }

        // At most one long press at a time; the earliest eligible press wins.
        let long_press_ms = self.config.long_press_ms;
        if !self
            .presses
            .values()
            .any(|p| p.phase == PressPhase::LongPress)
        {
            let due = self
                .presses
                .values_mut()
                .filter(|p| {
                    p.phase == PressPhase::Candidate
                        && now_ms.saturating_sub(p.down_time) >= long_press_ms
                })
                .min_by_key(|p| p.down_time);
            if let Some(press) = due {
                press.phase = PressPhase::LongPress;
                out.push(GestureEvent::LongPressBegin {
                    pos: press.down_pos,
                });
            }
        }
    }
}

impl Default for Recognizer {
    fn default() -> Self {
        Self::new()
    }
}
