// Copyright 2025 the Strokefield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end session: raw pointer input → gestures → surface state.
//!
//! This example shows how to wire the pieces together:
//! - `strokefield_gestures` disambiguates raw pointer samples,
//! - `strokefield_surface` interprets the resulting gesture events,
//! - the render model and menu signals drive whatever frontend you have
//!   (here, plain text).
//!
//! Run:
//! - `cargo run -p strokefield_demos --example draw_select_drag`

use std::num::NonZeroU64;

use kurbo::Point;
use strokefield_gestures::{PointerEvent, PointerId, Recognizer};
use strokefield_hit::SampledProximity;
use strokefield_surface::{MenuSignal, StrokeSurface};

/// Feed one raw event through the recognizer into the surface.
fn pump(rec: &mut Recognizer, surface: &mut StrokeSurface, ev: PointerEvent) {
    for gesture in rec.on_event(ev) {
        let response = surface.apply(&gesture);
        report(&gesture, response.menu);
    }
}

/// Resolve time-based gestures (taps waiting out the double-tap window,
/// presses becoming long presses).
fn tick(rec: &mut Recognizer, surface: &mut StrokeSurface, now_ms: u64) {
    for gesture in rec.on_tick(now_ms) {
        let response = surface.apply(&gesture);
        report(&gesture, response.menu);
    }
}

fn report(gesture: &strokefield_gestures::GestureEvent, menu: Option<MenuSignal>) {
    println!("  gesture: {gesture:?}");
    match menu {
        Some(MenuSignal::Show { anchor, actions }) => {
            println!("  menu:    show {actions:?} near {anchor:?}");
        }
        Some(MenuSignal::Hide) => println!("  menu:    hide"),
        None => {}
    }
}

fn summarize(surface: &StrokeSurface) {
    let model = surface.render_model();
    println!(
        "state: {} finished, {} active, selected = {:?}",
        model.finished.len(),
        model.active.len(),
        model.selected,
    );
    for (i, line) in model.finished.iter().enumerate() {
        println!("  [{i}] {:?} -> {:?}", line.begin, line.end);
    }
    println!();
}

fn main() {
    let mut rec = Recognizer::new();
    // A 20-unit pick radius probed at 20 samples per line.
    let mut surface = StrokeSurface::with_proximity(SampledProximity::new(20.0, 20));
    let finger: PointerId = NonZeroU64::new(1).unwrap();

    // Draw a horizontal line: press, drag past the tap slop, lift.
    println!("drawing a line:");
    for (pos, t) in [
        (Point::new(20.0, 40.0), 0),
        (Point::new(60.0, 40.0), 30),
        (Point::new(120.0, 40.0), 60),
    ] {
        let ev = if t == 0 {
            PointerEvent::Down {
                id: finger,
                pos,
                time_ms: t,
            }
        } else {
            PointerEvent::Move {
                id: finger,
                pos,
                time_ms: t,
            }
        };
        pump(&mut rec, &mut surface, ev);
    }
    pump(
        &mut rec,
        &mut surface,
        PointerEvent::Up {
            id: finger,
            pos: Point::new(160.0, 40.0),
            time_ms: 90,
        },
    );
    summarize(&surface);

    // Tap near the line: after the double-tap window lapses the tap resolves
    // and selects it, requesting the context menu.
    println!("tapping near the line:");
    pump(
        &mut rec,
        &mut surface,
        PointerEvent::Down {
            id: finger,
            pos: Point::new(90.0, 45.0),
            time_ms: 500,
        },
    );
    pump(
        &mut rec,
        &mut surface,
        PointerEvent::Up {
            id: finger,
            pos: Point::new(90.0, 45.0),
            time_ms: 540,
        },
    );
    tick(&mut rec, &mut surface, 900);
    summarize(&surface);

    // Long-press the line and drag it 40 units down.
    println!("long press and drag:");
    pump(
        &mut rec,
        &mut surface,
        PointerEvent::Down {
            id: finger,
            pos: Point::new(90.0, 42.0),
            time_ms: 1000,
        },
    );
    tick(&mut rec, &mut surface, 1600);
    for (y, t) in [(62.0, 1620), (82.0, 1640)] {
        pump(
            &mut rec,
            &mut surface,
            PointerEvent::Move {
                id: finger,
                pos: Point::new(90.0, y),
                time_ms: t,
            },
        );
    }
    pump(
        &mut rec,
        &mut surface,
        PointerEvent::Up {
            id: finger,
            pos: Point::new(90.0, 82.0),
            time_ms: 1700,
        },
    );
    summarize(&surface);

    // Double tap clears the canvas.
    println!("double tap to clear:");
    for (t_down, t_up) in [(2000, 2030), (2100, 2130)] {
        pump(
            &mut rec,
            &mut surface,
            PointerEvent::Down {
                id: finger,
                pos: Point::new(200.0, 200.0),
                time_ms: t_down,
            },
        );
        pump(
            &mut rec,
            &mut surface,
            PointerEvent::Up {
                id: finger,
                pos: Point::new(200.0, 200.0),
                time_ms: t_up,
            },
        );
    }
    summarize(&surface);
}
