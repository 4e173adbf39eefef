// Copyright 2025 the Strokefield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The stroke surface controller.

use alloc::vec::Vec;

use hashbrown::HashMap;
use kurbo::{Point, Vec2};
use smallvec::SmallVec;
use strokefield_gestures::{GestureEvent, PointerId};
use strokefield_hit::SampledProximity;

use crate::types::{Line, MenuActions, MenuSignal, Response, SurfaceTheme};

/// Read-only snapshot of what the surface looks like right now.
///
/// The drawing adapter strokes, in order: `finished` (index order,
/// `finished_color`), then `active` (any order — concurrent strokes have no
/// required relative ordering, `active_color`), then the selected line again
/// on top in `selected_color`. Every line is a round-capped segment of the
/// theme's `line_thickness`.
#[derive(Clone, Debug)]
pub struct RenderModel<'a> {
    /// Committed lines in z-order (lowest index drawn first).
    pub finished: &'a [Line],
    /// In-progress strokes, one per down pointer, in no particular order.
    pub active: SmallVec<[Line; 4]>,
    /// Index into `finished` of the selected line, if any.
    pub selected: Option<usize>,
    /// Colors and stroke width.
    pub theme: &'a SurfaceTheme,
}

impl RenderModel<'_> {
    /// The selected line itself, if any.
    pub fn selected_line(&self) -> Option<&Line> {
        self.finished.get(self.selected?)
    }
}

/// Owns all line state, interprets gesture events, and answers hit tests.
///
/// The surface is strictly single-threaded and event-driven: every operation
/// is synchronous, runs to completion, and is expected to be invoked from one
/// dispatch flow in arrival order. Multi-touch is multiple keys in the active
/// map, not concurrency.
///
/// A line lives in exactly one place: the active map while its pointer is
/// down, the finished list once it lifts. The selection, when present, always
/// indexes a live finished line; every operation that removes finished lines
/// clears the selection in the same step, so a stale index is unreachable.
///
/// Mutating operations return a [`Response`] telling the caller whether to
/// redraw and how to drive the context menu; misuse (unknown pointer ids,
/// pan or delete with no selection) is absorbed as documented no-ops.
#[derive(Clone, Debug, Default)]
pub struct StrokeSurface {
    active_strokes: HashMap<PointerId, Line>,
    finished_lines: Vec<Line>,
    selected: Option<usize>,
    theme: SurfaceTheme,
    proximity: SampledProximity,
}

impl StrokeSurface {
    /// Create an empty surface with default theme and pick tolerance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty surface with an explicit theme.
    pub fn with_theme(theme: SurfaceTheme) -> Self {
        Self {
            theme,
            ..Self::default()
        }
    }

    /// Create an empty surface with explicit hit-test parameters.
    pub fn with_proximity(proximity: SampledProximity) -> Self {
        Self {
            proximity,
            ..Self::default()
        }
    }

    /// Committed lines in z-order.
    pub fn finished_lines(&self) -> &[Line] {
        &self.finished_lines
    }

    /// The in-progress stroke for `id`, if that pointer is down.
    pub fn active_stroke(&self, id: PointerId) -> Option<&Line> {
        self.active_strokes.get(&id)
    }

    /// Number of in-progress strokes.
    pub fn active_stroke_count(&self) -> usize {
        self.active_strokes.len()
    }

    /// Index of the selected finished line, if any.
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// The rendering configuration.
    pub fn theme(&self) -> &SurfaceTheme {
        &self.theme
    }

    /// Mutable access to the rendering configuration.
    ///
    /// Theme changes are cosmetic only; the caller should redraw afterwards.
    pub fn theme_mut(&mut self) -> &mut SurfaceTheme {
        &mut self.theme
    }

    /// Assign the selection and report the menu consequence.
    ///
    /// Clearing the selection always hides the menu (whether or not it was
    /// visible); selecting does not show it by itself — only a tap does.
    fn set_selection(&mut self, selected: Option<usize>) -> Option<MenuSignal> {
        self.selected = selected;
        selected.is_none().then_some(MenuSignal::Hide)
    }

    /// A pointer went down: start a degenerate stroke at `pos`.
    ///
    /// A duplicate `id` silently replaces the prior stroke; correct upstream
    /// dispatch never produces one. Always redraws.
    pub fn on_pointer_down(&mut self, id: PointerId, pos: Point) -> Response {
        self.active_strokes.insert(id, Line::degenerate(pos));
        Response::redraw()
    }

    /// A tracked pointer moved: extend its stroke to `pos`.
    ///
    /// Unknown ids (a pointer that already ended or was never started) are
    /// ignored. Always redraws.
    pub fn on_pointer_move(&mut self, id: PointerId, pos: Point) -> Response {
        if let Some(line) = self.active_strokes.get_mut(&id) {
            line.end = pos;
        }
        Response::redraw()
    }

    /// A tracked pointer lifted: commit its stroke to the finished list.
    ///
    /// The line's end is set to `pos` and it is appended at the tail,
    /// becoming the new topmost line. Unknown ids are ignored. Always
    /// redraws.
    pub fn on_pointer_up(&mut self, id: PointerId, pos: Point) -> Response {
        if let Some(mut line) = self.active_strokes.remove(&id) {
            line.end = pos;
            self.finished_lines.push(line);
        }
        Response::redraw()
    }

    /// The platform revoked all in-flight touches: discard every in-progress
    /// stroke. Finished lines are untouched. Idempotent; always redraws.
    pub fn on_pointer_cancelled(&mut self) -> Response {
        self.active_strokes.clear();
        Response::redraw()
    }

    /// A single tap: select the line under `pos` (or clear the selection).
    ///
    /// On a hit, asks for the context menu anchored at the tap with the
    /// delete action; on a miss, asks to hide it. Always redraws.
    pub fn on_single_tap(&mut self, pos: Point) -> Response {
        let hit = self.hit_test(pos);
        let hidden = self.set_selection(hit);
        let menu = match hidden {
            None => MenuSignal::Show {
                anchor: pos,
                actions: MenuActions::DELETE,
            },
            Some(hide) => hide,
        };
        Response::redraw_with(menu)
    }

    /// A double tap: clear everything — selection, in-progress strokes, and
    /// finished lines. Always redraws and hides the menu.
    pub fn on_double_tap(&mut self) -> Response {
        // Selection goes first so no removal happens while an index is live.
        let menu = self.set_selection(None);
        self.active_strokes.clear();
        self.finished_lines.clear();
        Response {
            redraw: true,
            menu,
        }
    }

    /// A long press began: select the line under `pos` for dragging.
    ///
    /// Selecting for drag preempts drawing: on a hit, every in-progress
    /// stroke is discarded. On a miss the cleared selection hides the menu.
    /// Always redraws.
    pub fn on_long_press_begin(&mut self, pos: Point) -> Response {
        let hit = self.hit_test(pos);
        let menu = self.set_selection(hit);
        if self.selected.is_some() {
            self.active_strokes.clear();
        }
        Response {
            redraw: true,
            menu,
        }
    }

    /// The long press ended: leave the transient selected-for-drag mode.
    /// Always redraws and hides the menu.
    pub fn on_long_press_end(&mut self) -> Response {
        let menu = self.set_selection(None);
        Response {
            redraw: true,
            menu,
        }
    }

    /// The long-pressing pointer moved: drag the selected line.
    ///
    /// `delta` is incremental movement, not an absolute offset; both
    /// endpoints are translated by it. Only valid while a long press is
    /// active — the dispatcher guarantees that gating, because a tap-created
    /// selection must not be draggable by an unrelated pan. With no
    /// selection this is a pure no-op, even when called directly.
    pub fn on_pan_changed(&mut self, delta: Vec2) -> Response {
        let Some(line) = self.selected.and_then(|i| self.finished_lines.get_mut(i)) else {
            return Response::none();
        };
        line.begin += delta;
        line.end += delta;
        Response::redraw()
    }

    /// Delete the selected line, invoked by the menu's delete action.
    ///
    /// The selection is cleared before the removal shifts indices. With no
    /// selection this is a pure no-op.
    pub fn delete_selected(&mut self) -> Response {
        let Some(index) = self.selected.take() else {
            return Response::none();
        };
        // The selection invariant keeps `index` in bounds: nothing removes
        // finished lines while a selection is live.
        self.finished_lines.remove(index);
        Response::redraw_with(MenuSignal::Hide)
    }

    /// Index of the first finished line passing within the pick tolerance of
    /// `pos`, or `None` if no line qualifies (always `None` when empty).
    ///
    /// Lines are probed in index order over the sampled grid; the first
    /// match wins without searching for the closest. O(lines × samples),
    /// fine for interactive stroke counts.
    pub fn hit_test(&self, pos: Point) -> Option<usize> {
        self.proximity
            .first_hit(self.finished_lines.iter().map(Line::segment), pos)
    }

    /// A read-only snapshot for the drawing adapter. No mutation.
    pub fn render_model(&self) -> RenderModel<'_> {
        RenderModel {
            finished: &self.finished_lines,
            active: self.active_strokes.values().copied().collect(),
            selected: self.selected,
            theme: &self.theme,
        }
    }

    /// Apply a disambiguated gesture event to the surface.
    ///
    /// This is the adapter between the dispatcher's vocabulary and the
    /// operations above; each event maps onto exactly one operation.
    pub fn apply(&mut self, ev: &GestureEvent) -> Response {
        match *ev {
            GestureEvent::PointerDown { id, pos } => self.on_pointer_down(id, pos),
            GestureEvent::PointerMove { id, pos } => self.on_pointer_move(id, pos),
            GestureEvent::PointerUp { id, pos } => self.on_pointer_up(id, pos),
            GestureEvent::PointerCancelled => self.on_pointer_cancelled(),
            GestureEvent::SingleTap { pos } => self.on_single_tap(pos),
            GestureEvent::DoubleTap => self.on_double_tap(),
            GestureEvent::LongPressBegin { pos } => self.on_long_press_begin(pos),
            GestureEvent::LongPressEnd => self.on_long_press_end(),
            GestureEvent::PanChanged { delta } => self.on_pan_changed(delta),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Color;
    use core::num::NonZeroU64;

    fn id(n: u64) -> PointerId {
        NonZeroU64::new(n).unwrap()
    }

    fn pt(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    /// Draw one horizontal line from `begin` to `end` via the pointer ops.
    fn draw(surface: &mut StrokeSurface, n: u64, begin: Point, end: Point) {
        let _ = surface.on_pointer_down(id(n), begin);
        let _ = surface.on_pointer_move(id(n), end.midpoint(begin));
        let _ = surface.on_pointer_up(id(n), end);
    }

    #[test]
    fn down_then_up_commits_exactly_one_line() {
        let mut surface = StrokeSurface::new();
        let r = surface.on_pointer_down(id(1), pt(1.0, 2.0));
        assert!(r.redraw);
        assert_eq!(
            surface.active_stroke(id(1)),
            Some(&Line::degenerate(pt(1.0, 2.0)))
        );

        let r = surface.on_pointer_up(id(1), pt(30.0, 40.0));
        assert!(r.redraw);
        assert_eq!(
            surface.finished_lines(),
            &[Line::new(pt(1.0, 2.0), pt(30.0, 40.0))]
        );
        assert_eq!(surface.active_stroke(id(1)), None);
    }

    #[test]
    fn move_extends_only_the_tracked_stroke() {
        let mut surface = StrokeSurface::new();
        let _ = surface.on_pointer_down(id(1), pt(0.0, 0.0));
        let _ = surface.on_pointer_move(id(1), pt(10.0, 0.0));
        assert_eq!(
            surface.active_stroke(id(1)),
            Some(&Line::new(pt(0.0, 0.0), pt(10.0, 0.0)))
        );

        // Unknown id: ignored, nothing tracked.
        let _ = surface.on_pointer_move(id(9), pt(99.0, 99.0));
        let _ = surface.on_pointer_up(id(9), pt(99.0, 99.0));
        assert_eq!(surface.active_stroke_count(), 1);
        assert!(surface.finished_lines().is_empty());
    }

    #[test]
    fn duplicate_down_overwrites() {
        let mut surface = StrokeSurface::new();
        let _ = surface.on_pointer_down(id(1), pt(0.0, 0.0));
        let _ = surface.on_pointer_down(id(1), pt(5.0, 5.0));
        assert_eq!(surface.active_stroke_count(), 1);
        assert_eq!(
            surface.active_stroke(id(1)),
            Some(&Line::degenerate(pt(5.0, 5.0)))
        );
    }

    #[test]
    fn multi_touch_draws_concurrently() {
        let mut surface = StrokeSurface::new();
        let _ = surface.on_pointer_down(id(1), pt(0.0, 0.0));
        let _ = surface.on_pointer_down(id(2), pt(100.0, 0.0));
        let _ = surface.on_pointer_move(id(1), pt(0.0, 50.0));
        let _ = surface.on_pointer_move(id(2), pt(100.0, 50.0));
        assert_eq!(surface.active_stroke_count(), 2);

        let _ = surface.on_pointer_up(id(2), pt(100.0, 80.0));
        let _ = surface.on_pointer_up(id(1), pt(0.0, 80.0));
        // Commit order follows lift order.
        assert_eq!(
            surface.finished_lines(),
            &[
                Line::new(pt(100.0, 0.0), pt(100.0, 80.0)),
                Line::new(pt(0.0, 0.0), pt(0.0, 80.0)),
            ]
        );
    }

    #[test]
    fn cancel_discards_in_progress_only_and_is_idempotent() {
        let mut surface = StrokeSurface::new();
        draw(&mut surface, 1, pt(0.0, 0.0), pt(100.0, 0.0));
        let _ = surface.on_pointer_down(id(2), pt(0.0, 50.0));

        let r = surface.on_pointer_cancelled();
        assert!(r.redraw);
        assert_eq!(surface.active_stroke_count(), 0);
        assert_eq!(surface.finished_lines().len(), 1);

        // Second cancellation has the same effect as one.
        let _ = surface.on_pointer_cancelled();
        assert_eq!(surface.active_stroke_count(), 0);
        assert_eq!(surface.finished_lines().len(), 1);
    }

    #[test]
    fn hit_test_within_and_beyond_tolerance() {
        let mut surface = StrokeSurface::new();
        draw(&mut surface, 1, pt(0.0, 0.0), pt(100.0, 0.0));
        assert_eq!(surface.hit_test(pt(50.0, 5.0)), Some(0));
        assert_eq!(surface.hit_test(pt(50.0, 25.0)), None);
    }

    #[test]
    fn hit_test_returns_lowest_index() {
        let mut surface = StrokeSurface::new();
        draw(&mut surface, 1, pt(0.0, 0.0), pt(100.0, 0.0));
        draw(&mut surface, 1, pt(0.0, 10.0), pt(100.0, 10.0));
        // Both are within tolerance of the query; index order decides.
        assert_eq!(surface.hit_test(pt(50.0, 9.0)), Some(0));
    }

    #[test]
    fn hit_test_on_empty_surface() {
        let surface = StrokeSurface::new();
        assert_eq!(surface.hit_test(pt(0.0, 0.0)), None);
    }

    #[test]
    fn tap_on_line_selects_and_requests_menu() {
        let mut surface = StrokeSurface::new();
        draw(&mut surface, 1, pt(0.0, 0.0), pt(100.0, 0.0));

        let r = surface.on_single_tap(pt(50.0, 5.0));
        assert!(r.redraw);
        assert_eq!(surface.selected(), Some(0));
        assert_eq!(
            r.menu,
            Some(MenuSignal::Show {
                anchor: pt(50.0, 5.0),
                actions: MenuActions::DELETE,
            })
        );
    }

    #[test]
    fn tap_on_empty_space_clears_selection_and_hides_menu() {
        let mut surface = StrokeSurface::new();
        draw(&mut surface, 1, pt(0.0, 0.0), pt(100.0, 0.0));
        let _ = surface.on_single_tap(pt(50.0, 5.0));
        assert_eq!(surface.selected(), Some(0));

        let r = surface.on_single_tap(pt(500.0, 500.0));
        assert_eq!(surface.selected(), None);
        assert_eq!(r.menu, Some(MenuSignal::Hide));
    }

    #[test]
    fn delete_selected_removes_and_reindexes() {
        let mut surface = StrokeSurface::new();
        let a = Line::new(pt(0.0, 0.0), pt(100.0, 0.0));
        let b = Line::new(pt(0.0, 100.0), pt(100.0, 100.0));
        let c = Line::new(pt(0.0, 200.0), pt(100.0, 200.0));
        for line in [a, b, c] {
            draw(&mut surface, 1, line.begin, line.end);
        }

        let _ = surface.on_single_tap(pt(50.0, 100.0));
        assert_eq!(surface.selected(), Some(1));

        let r = surface.delete_selected();
        assert!(r.redraw);
        assert_eq!(r.menu, Some(MenuSignal::Hide));
        assert_eq!(surface.finished_lines(), &[a, c]);
        assert_eq!(surface.selected(), None);
    }

    #[test]
    fn delete_with_no_selection_is_a_no_op() {
        let mut surface = StrokeSurface::new();
        draw(&mut surface, 1, pt(0.0, 0.0), pt(100.0, 0.0));
        let r = surface.delete_selected();
        assert_eq!(r, Response::none());
        assert_eq!(surface.finished_lines().len(), 1);
    }

    #[test]
    fn double_tap_resets_everything() {
        let mut surface = StrokeSurface::new();
        draw(&mut surface, 1, pt(0.0, 0.0), pt(100.0, 0.0));
        draw(&mut surface, 1, pt(0.0, 50.0), pt(100.0, 50.0));
        let _ = surface.on_single_tap(pt(50.0, 5.0));
        let _ = surface.on_pointer_down(id(2), pt(0.0, 0.0));

        let r = surface.on_double_tap();
        assert!(r.redraw);
        assert_eq!(r.menu, Some(MenuSignal::Hide));
        assert!(surface.finished_lines().is_empty());
        assert_eq!(surface.active_stroke_count(), 0);
        assert_eq!(surface.selected(), None);
    }

    #[test]
    fn long_press_selects_and_discards_in_progress_strokes() {
        let mut surface = StrokeSurface::new();
        draw(&mut surface, 1, pt(0.0, 0.0), pt(100.0, 0.0));
        let _ = surface.on_pointer_down(id(2), pt(0.0, 50.0));

        let r = surface.on_long_press_begin(pt(50.0, 5.0));
        assert!(r.redraw);
        assert_eq!(r.menu, None);
        assert_eq!(surface.selected(), Some(0));
        // Select-for-drag preempts drawing.
        assert_eq!(surface.active_stroke_count(), 0);

        let r = surface.on_long_press_end();
        assert_eq!(surface.selected(), None);
        assert_eq!(r.menu, Some(MenuSignal::Hide));
    }

    #[test]
    fn long_press_miss_keeps_in_progress_strokes() {
        let mut surface = StrokeSurface::new();
        draw(&mut surface, 1, pt(0.0, 0.0), pt(100.0, 0.0));
        let _ = surface.on_pointer_down(id(2), pt(0.0, 50.0));

        let r = surface.on_long_press_begin(pt(500.0, 500.0));
        assert_eq!(surface.selected(), None);
        assert_eq!(r.menu, Some(MenuSignal::Hide));
        assert_eq!(surface.active_stroke_count(), 1);
    }

    #[test]
    fn pan_deltas_are_incremental() {
        let mut surface = StrokeSurface::new();
        draw(&mut surface, 1, pt(0.0, 0.0), pt(10.0, 0.0));
        let _ = surface.on_long_press_begin(pt(5.0, 0.0));
        assert_eq!(surface.selected(), Some(0));

        let r = surface.on_pan_changed(Vec2::new(5.0, 0.0));
        assert!(r.redraw);
        let r = surface.on_pan_changed(Vec2::new(5.0, 0.0));
        assert!(r.redraw);

        assert_eq!(
            surface.finished_lines(),
            &[Line::new(pt(10.0, 0.0), pt(20.0, 0.0))]
        );
    }

    #[test]
    fn pan_without_selection_is_a_no_op() {
        let mut surface = StrokeSurface::new();
        draw(&mut surface, 1, pt(0.0, 0.0), pt(10.0, 0.0));

        let r = surface.on_pan_changed(Vec2::new(5.0, 5.0));
        assert_eq!(r, Response::none());
        assert_eq!(
            surface.finished_lines(),
            &[Line::new(pt(0.0, 0.0), pt(10.0, 0.0))]
        );
    }

    #[test]
    fn render_model_reflects_state_and_draw_order() {
        let mut surface = StrokeSurface::new();
        draw(&mut surface, 1, pt(0.0, 0.0), pt(100.0, 0.0));
        draw(&mut surface, 1, pt(0.0, 50.0), pt(100.0, 50.0));
        let _ = surface.on_pointer_down(id(3), pt(0.0, 200.0));
        let _ = surface.on_pointer_move(id(3), pt(50.0, 200.0));
        let _ = surface.on_single_tap(pt(50.0, 45.0));

        let model = surface.render_model();
        assert_eq!(model.finished.len(), 2);
        assert_eq!(model.active.len(), 1);
        assert_eq!(model.active[0], Line::new(pt(0.0, 200.0), pt(50.0, 200.0)));
        assert_eq!(model.selected, Some(1));
        assert_eq!(
            model.selected_line(),
            Some(&Line::new(pt(0.0, 50.0), pt(100.0, 50.0)))
        );
        assert_eq!(model.theme.selected_color, Color::GREEN);
    }

    #[test]
    fn theme_is_not_behaviorally_load_bearing() {
        let mut surface = StrokeSurface::new();
        surface.theme_mut().line_thickness = 3.0;
        surface.theme_mut().finished_color = Color::rgb(0, 0, 255);
        draw(&mut surface, 1, pt(0.0, 0.0), pt(100.0, 0.0));
        // Hit testing still uses the pick tolerance, not the thickness.
        assert_eq!(surface.hit_test(pt(50.0, 5.0)), Some(0));
    }

    #[test]
    fn apply_maps_every_gesture_event() {
        let mut surface = StrokeSurface::new();
        let events = [
            GestureEvent::PointerDown {
                id: id(1),
                pos: pt(0.0, 0.0),
            },
            GestureEvent::PointerMove {
                id: id(1),
                pos: pt(60.0, 0.0),
            },
            GestureEvent::PointerUp {
                id: id(1),
                pos: pt(100.0, 0.0),
            },
        ];
        for ev in &events {
            let _ = surface.apply(ev);
        }
        assert_eq!(
            surface.finished_lines(),
            &[Line::new(pt(0.0, 0.0), pt(100.0, 0.0))]
        );

        let r = surface.apply(&GestureEvent::SingleTap { pos: pt(50.0, 5.0) });
        assert_eq!(surface.selected(), Some(0));
        assert!(matches!(r.menu, Some(MenuSignal::Show { .. })));

        let _ = surface.apply(&GestureEvent::LongPressBegin { pos: pt(50.0, 0.0) });
        let _ = surface.apply(&GestureEvent::PanChanged {
            delta: Vec2::new(0.0, 10.0),
        });
        let _ = surface.apply(&GestureEvent::LongPressEnd);
        assert_eq!(
            surface.finished_lines(),
            &[Line::new(pt(0.0, 10.0), pt(100.0, 10.0))]
        );

        let _ = surface.apply(&GestureEvent::DoubleTap);
        assert!(surface.finished_lines().is_empty());

        let _ = surface.apply(&GestureEvent::PointerDown {
            id: id(2),
            pos: pt(0.0, 0.0),
        });
        let _ = surface.apply(&GestureEvent::PointerCancelled);
        assert_eq!(surface.active_stroke_count(), 0);
    }
}
