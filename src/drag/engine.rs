use std::fmt;

use super::clamp::clamp;
use super::codec;
use super::grab::{GrabGuard, next_holder_id};
use super::session::DragSession;
use crate::drivers::mouse::{PointerEvent, PointerKind};
use crate::geometry::{BoundsBox, Position};
use crate::scene::ElementTree;
use crate::state::{HolderId, PointerShape};

pub type DragStartCallback = Box<dyn FnMut()>;
pub type DragEndCallback = Box<dyn FnMut(Position)>;

/// Everything a consumer hands to a [`DragEngine`].
pub struct DragOptions<R> {
    /// Element whose press starts a drag.
    pub handle: Option<R>,
    /// Element that gets repositioned.
    pub movable: Option<R>,
    pub initial_position: Position,
    /// Container the movable element must stay inside. `None` disables
    /// clamping.
    pub bounds: Option<R>,
    on_drag_start: Option<DragStartCallback>,
    on_drag_end: Option<DragEndCallback>,
}

impl<R> Default for DragOptions<R> {
    fn default() -> Self {
        Self {
            handle: None,
            movable: None,
            initial_position: Position::ORIGIN,
            bounds: None,
            on_drag_start: None,
            on_drag_end: None,
        }
    }
}

impl<R> DragOptions<R> {
    pub fn new(handle: Option<R>, movable: Option<R>) -> Self {
        Self {
            handle,
            movable,
            ..Self::default()
        }
    }

    pub fn with_initial_position(mut self, position: Position) -> Self {
        self.initial_position = position;
        self
    }

    pub fn with_bounds(mut self, bounds: R) -> Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn on_drag_start(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_drag_start = Some(Box::new(f));
        self
    }

    pub fn on_drag_end(mut self, f: impl FnMut(Position) + 'static) -> Self {
        self.on_drag_end = Some(Box::new(f));
        self
    }
}

impl<R: fmt::Debug> fmt::Debug for DragOptions<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DragOptions")
            .field("handle", &self.handle)
            .field("movable", &self.movable)
            .field("initial_position", &self.initial_position)
            .field("bounds", &self.bounds)
            .field("on_drag_start", &self.on_drag_start.is_some())
            .field("on_drag_end", &self.on_drag_end.is_some())
            .finish()
    }
}

/// What a consumer reads back to decide how to lay out its panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragState {
    pub current_position: Position,
    pub is_dragging: bool,
}

/// Moves one element by dragging a handle.
///
/// The engine is driven entirely by its host:
/// 1. **Binding**: `bind` attaches the engine once both element references
///    resolve in the tree; until then it stays inert and the consumer calls
///    `bind` again on its next render pass. `unbind` is the matching teardown.
/// 2. **Dispatch**: the host forwards every pointer event to `handle_event`.
///    Only the press is hit-tested against the handle. Moves and the release
///    are taken from anywhere on the surface, so a drag keeps going after the
///    pointer leaves the handle.
/// 3. **Feedback**: each move writes the new transform to the movable element
///    before returning.
#[derive(Debug)]
pub struct DragEngine<R> {
    holder: HolderId,
    options: DragOptions<R>,
    position: Position,
    session: Option<DragSession>,
    bound: bool,
}

impl<R: Copy + Eq + Ord + fmt::Debug> DragEngine<R> {
    pub fn new(mut options: DragOptions<R>) -> Self {
        options.initial_position = options.initial_position.finite_or(Position::ORIGIN);
        Self {
            holder: next_holder_id(),
            position: options.initial_position,
            options,
            session: None,
            bound: false,
        }
    }

    /// Point the engine at different elements. Takes effect on the next
    /// press; a drag in progress keeps its elements.
    pub fn set_elements(&mut self, handle: Option<R>, movable: Option<R>) {
        self.options.handle = handle;
        self.options.movable = movable;
    }

    pub fn holder_id(&self) -> HolderId {
        self.holder
    }

    pub fn is_bound(&self) -> bool {
        self.bound
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    pub fn current_position(&self) -> Position {
        self.position
    }

    pub fn state(&self) -> DragState {
        DragState {
            current_position: self.position,
            is_dragging: self.is_dragging(),
        }
    }

    /// Attach to `tree`. Returns `false` without side effects while the handle
    /// or movable element is missing. Calling it again once bound is a no-op.
    pub fn bind<T: ElementTree<R>>(&mut self, tree: &mut T) -> bool {
        if self.bound {
            return true;
        }
        let (Some(handle), Some(movable)) = (self.options.handle, self.options.movable) else {
            tracing::debug!(
                holder = self.holder,
                "drag bind deferred: missing element reference"
            );
            return false;
        };
        if tree.bounding_box(handle).is_none() || tree.bounding_box(movable).is_none() {
            tracing::debug!(
                holder = self.holder,
                ?handle,
                ?movable,
                "drag bind deferred: element not attached"
            );
            return false;
        }
        self.bound = true;
        tree.set_transform(movable, codec::encode(self.position));
        tracing::debug!(holder = self.holder, ?handle, ?movable, "drag engine bound");
        true
    }

    /// Detach from the host. A drag in progress is dropped without calling
    /// `on_drag_end`, and the surface styling is restored. Safe to call at any
    /// time, any number of times.
    pub fn unbind(&mut self) {
        if !self.bound {
            return;
        }
        self.bound = false;
        if self.session.take().is_some() {
            tracing::debug!(
                holder = self.holder,
                position = ?self.position,
                "drag torn down mid-gesture"
            );
        }
        tracing::debug!(holder = self.holder, "drag engine unbound");
    }

    /// Feed one pointer event. Returns `true` when the engine consumed it; a
    /// consumed press should not reach the host's own press handling.
    pub fn handle_event<T: ElementTree<R>>(&mut self, tree: &mut T, event: &PointerEvent) -> bool {
        if !self.bound {
            return false;
        }
        match event.kind {
            PointerKind::Down(_) => self.begin(tree, event.position),
            PointerKind::Move => self.drag_to(tree, event.position),
            PointerKind::Up(_) => self.finish(),
        }
    }

    /// Put the position back to its initial value, e.g. when a panel is
    /// reopened without having been dragged. Ignored during a drag.
    pub fn reset_position<T: ElementTree<R>>(&mut self, tree: &mut T) -> bool {
        if self.is_dragging() {
            return false;
        }
        self.position = self.options.initial_position;
        if self.bound
            && let Some(movable) = self.options.movable
        {
            tree.set_transform(movable, codec::encode(self.position));
        }
        tracing::debug!(
            holder = self.holder,
            position = ?self.position,
            "drag position reset"
        );
        true
    }

    /// Pointer shape for `point`: grabbing during a drag, grab over an idle
    /// handle.
    pub fn hover_cursor<T: ElementTree<R>>(
        &self,
        tree: &T,
        point: Position,
    ) -> Option<PointerShape> {
        if !self.bound {
            return None;
        }
        if self.is_dragging() {
            return Some(PointerShape::Grabbing);
        }
        let handle_box = tree.bounding_box(self.options.handle?)?;
        handle_box.contains(point).then_some(PointerShape::Grab)
    }

    fn begin<T: ElementTree<R>>(&mut self, tree: &mut T, pointer: Position) -> bool {
        if self.session.is_some() {
            return false;
        }
        let (Some(handle), Some(movable)) = (self.options.handle, self.options.movable) else {
            return false;
        };
        let Some(handle_box) = tree.bounding_box(handle) else {
            return false;
        };
        if !handle_box.contains(pointer) {
            return false;
        }
        let Some(grab) = GrabGuard::acquire(self.holder) else {
            tracing::debug!(
                holder = self.holder,
                "press ignored: surface held by another drag"
            );
            return false;
        };
        let offset_anchor = codec::decode(tree.transform(movable));
        self.position = offset_anchor;
        // The guard stays local until the callback returns, so a panic in it
        // still restores the surface.
        if let Some(on_start) = self.options.on_drag_start.as_mut() {
            on_start();
        }
        self.session = Some(DragSession::new(pointer, offset_anchor, grab));
        tracing::debug!(
            holder = self.holder,
            pointer = ?pointer,
            offset = ?offset_anchor,
            "drag started"
        );
        true
    }

    fn drag_to<T: ElementTree<R>>(&mut self, tree: &mut T, pointer: Position) -> bool {
        let Some(session) = self.session.as_ref() else {
            return false;
        };
        let Some(movable) = self.options.movable else {
            return false;
        };
        let raw = session.raw_offset(pointer);
        if !raw.is_finite() {
            tracing::trace!(
                holder = self.holder,
                ?pointer,
                "non-finite drag offset skipped"
            );
            return true;
        }
        // Both boxes are measured per event; the container may have resized
        // or scrolled since the last one.
        let bounds = self
            .options
            .bounds
            .and_then(|id| tree.bounding_box(id))
            .map(BoundsBox::from);
        let candidate = match tree.bounding_box(movable) {
            Some(element) => {
                let applied = codec::decode(tree.transform(movable));
                clamp(raw, element, applied, bounds)
            }
            None => raw,
        };
        self.position = candidate;
        tree.set_transform(movable, codec::encode(candidate));
        tracing::trace!(holder = self.holder, position = ?candidate, "drag moved");
        true
    }

    fn finish(&mut self) -> bool {
        let Some(session) = self.session.take() else {
            return false;
        };
        drop(session);
        let position = self.position;
        tracing::debug!(holder = self.holder, position = ?position, "drag ended");
        if let Some(on_end) = self.options.on_drag_end.as_mut() {
            on_end(position);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::panic::{AssertUnwindSafe, catch_unwind};
    use std::rc::Rc;

    use ratatui::layout::Rect;

    use super::*;
    use crate::scene::Scene;
    use crate::state::{surface_holder, surface_style};

    const PANEL: u8 = 1;
    const HEADER: u8 = 2;
    const SCREEN: u8 = 3;

    fn rect(x: u16, y: u16, width: u16, height: u16) -> Rect {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    fn scene() -> Scene<u8> {
        let mut scene = Scene::new();
        scene.set_layout(PANEL, rect(100, 100, 50, 20));
        scene.set_layout(HEADER, rect(100, 100, 50, 10));
        scene.set_parent(HEADER, Some(PANEL));
        scene.set_layout(SCREEN, rect(0, 0, 180, 1000));
        scene
    }

    fn bound_engine(scene: &mut Scene<u8>, options: DragOptions<u8>) -> DragEngine<u8> {
        let mut engine = DragEngine::new(options);
        assert!(engine.bind(scene));
        engine
    }

    #[test]
    fn drag_follows_pointer_without_bounds() {
        let mut scene = scene();
        let mut engine = bound_engine(&mut scene, DragOptions::new(Some(HEADER), Some(PANEL)));
        assert!(engine.handle_event(&mut scene, &PointerEvent::down(110.0, 105.0)));
        assert!(engine.is_dragging());
        assert!(engine.handle_event(&mut scene, &PointerEvent::moved(150.0, 140.0)));
        assert_eq!(engine.current_position(), Position::new(40.0, 35.0));
        assert_eq!(scene.transform(PANEL), Some("translate(40px, 35px)"));
    }

    #[test]
    fn drag_is_clamped_to_bounds() {
        let mut scene = scene();
        let options = DragOptions::new(Some(HEADER), Some(PANEL)).with_bounds(SCREEN);
        let mut engine = bound_engine(&mut scene, options);
        engine.handle_event(&mut scene, &PointerEvent::down(110.0, 105.0));
        engine.handle_event(&mut scene, &PointerEvent::moved(150.0, 140.0));
        assert_eq!(engine.current_position(), Position::new(30.0, 35.0));
        // Further moves measure the already-translated box.
        engine.handle_event(&mut scene, &PointerEvent::moved(170.0, 140.0));
        assert_eq!(engine.current_position(), Position::new(30.0, 35.0));
        engine.handle_event(&mut scene, &PointerEvent::moved(120.0, 140.0));
        assert_eq!(engine.current_position(), Position::new(10.0, 35.0));
    }

    #[test]
    fn move_outside_handle_keeps_dragging() {
        let mut scene = scene();
        let mut engine = bound_engine(&mut scene, DragOptions::new(Some(HEADER), Some(PANEL)));
        engine.handle_event(&mut scene, &PointerEvent::down(101.0, 101.0));
        assert!(engine.handle_event(&mut scene, &PointerEvent::moved(5.0, 500.0)));
        assert_eq!(engine.current_position(), Position::new(-96.0, 399.0));
        assert!(engine.handle_event(&mut scene, &PointerEvent::up(5.0, 500.0)));
        assert!(!engine.is_dragging());
    }

    #[test]
    fn press_outside_handle_is_ignored() {
        let mut scene = scene();
        let mut engine = bound_engine(&mut scene, DragOptions::new(Some(HEADER), Some(PANEL)));
        assert!(!engine.handle_event(&mut scene, &PointerEvent::down(105.0, 115.0)));
        assert!(!engine.is_dragging());
        assert!(!engine.handle_event(&mut scene, &PointerEvent::moved(150.0, 150.0)));
        assert!(!engine.handle_event(&mut scene, &PointerEvent::up(150.0, 150.0)));
        assert_eq!(engine.current_position(), Position::ORIGIN);
    }

    #[test]
    fn callbacks_fire_once_per_drag() {
        let starts = Rc::new(Cell::new(0));
        let ends = Rc::new(RefCell::new(Vec::new()));
        let options = DragOptions::new(Some(HEADER), Some(PANEL))
            .on_drag_start({
                let starts = Rc::clone(&starts);
                move || starts.set(starts.get() + 1)
            })
            .on_drag_end({
                let ends = Rc::clone(&ends);
                move |p| ends.borrow_mut().push(p)
            });
        let mut scene = scene();
        let mut engine = bound_engine(&mut scene, options);
        engine.handle_event(&mut scene, &PointerEvent::down(110.0, 105.0));
        // A second press during the drag changes nothing.
        assert!(!engine.handle_event(&mut scene, &PointerEvent::down(111.0, 106.0)));
        for step in 1..=5 {
            let step = step as f64;
            engine.handle_event(&mut scene, &PointerEvent::moved(110.0 + step, 105.0 - step));
        }
        engine.handle_event(&mut scene, &PointerEvent::up(0.0, 0.0));
        engine.handle_event(&mut scene, &PointerEvent::up(0.0, 0.0));
        assert_eq!(starts.get(), 1);
        assert_eq!(ends.borrow().as_slice(), &[Position::new(5.0, -5.0)]);
    }

    #[test]
    fn second_drag_starts_from_committed_position() {
        let mut scene = scene();
        let mut engine = bound_engine(&mut scene, DragOptions::new(Some(HEADER), Some(PANEL)));
        engine.handle_event(&mut scene, &PointerEvent::down(110.0, 105.0));
        engine.handle_event(&mut scene, &PointerEvent::moved(120.0, 105.0));
        engine.handle_event(&mut scene, &PointerEvent::up(120.0, 105.0));
        // The header moved with the panel, so press where it is now.
        engine.handle_event(&mut scene, &PointerEvent::down(125.0, 101.0));
        engine.handle_event(&mut scene, &PointerEvent::moved(125.0, 111.0));
        assert_eq!(engine.current_position(), Position::new(10.0, 10.0));
    }

    #[test]
    fn anchor_comes_from_stored_representation() {
        let mut scene = scene();
        let mut engine = bound_engine(&mut scene, DragOptions::new(Some(HEADER), Some(PANEL)));
        scene.set_transform(PANEL, "translate(abc, 10px)".to_string());
        engine.handle_event(&mut scene, &PointerEvent::down(110.0, 115.0));
        assert!(engine.is_dragging());
        assert_eq!(engine.current_position(), Position::new(0.0, 10.0));
        engine.handle_event(&mut scene, &PointerEvent::moved(112.0, 116.0));
        assert_eq!(engine.current_position(), Position::new(2.0, 11.0));
    }

    #[test]
    fn unbind_mid_drag_restores_surface_and_silences_callbacks() {
        let ends = Rc::new(Cell::new(0));
        let options = DragOptions::new(Some(HEADER), Some(PANEL)).on_drag_end({
            let ends = Rc::clone(&ends);
            move |_| ends.set(ends.get() + 1)
        });
        let mut scene = scene();
        let mut engine = bound_engine(&mut scene, options);
        engine.handle_event(&mut scene, &PointerEvent::down(110.0, 105.0));
        engine.handle_event(&mut scene, &PointerEvent::moved(115.0, 105.0));
        assert_eq!(surface_holder(), Some(engine.holder_id()));
        assert_eq!(surface_style().pointer, PointerShape::Grabbing);

        engine.unbind();
        assert!(!engine.is_dragging());
        assert_eq!(surface_holder(), None);
        assert_eq!(surface_style().pointer, PointerShape::Default);
        assert!(!surface_style().selection_suppressed);

        let before = engine.state();
        let transform = scene.transform(PANEL).map(str::to_string);
        assert!(!engine.handle_event(&mut scene, &PointerEvent::moved(160.0, 160.0)));
        assert!(!engine.handle_event(&mut scene, &PointerEvent::up(160.0, 160.0)));
        assert_eq!(engine.state(), before);
        assert_eq!(scene.transform(PANEL).map(str::to_string), transform);
        assert_eq!(ends.get(), 0);
        // idempotent
        engine.unbind();
    }

    #[test]
    fn dropping_engine_mid_drag_releases_surface() {
        let mut scene = scene();
        let mut engine = bound_engine(&mut scene, DragOptions::new(Some(HEADER), Some(PANEL)));
        engine.handle_event(&mut scene, &PointerEvent::down(110.0, 105.0));
        drop(engine);
        assert_eq!(surface_holder(), None);
    }

    #[test]
    fn bind_is_a_no_op_until_elements_exist() {
        let mut scene = Scene::new();
        let mut engine = DragEngine::new(DragOptions::new(Some(HEADER), Some(PANEL)));
        assert!(!engine.bind(&mut scene));
        assert!(!engine.handle_event(&mut scene, &PointerEvent::down(110.0, 105.0)));

        let mut missing = DragEngine::<u8>::new(DragOptions::new(None, Some(PANEL)));
        assert!(!missing.bind(&mut scene));

        scene.set_layout(PANEL, rect(100, 100, 50, 20));
        scene.set_layout(HEADER, rect(100, 100, 50, 10));
        assert!(engine.bind(&mut scene));
        assert!(engine.bind(&mut scene));
        assert_eq!(scene.transform(PANEL), Some("translate(0px, 0px)"));
        assert!(engine.handle_event(&mut scene, &PointerEvent::down(110.0, 105.0)));
    }

    #[test]
    fn bind_writes_initial_position() {
        let mut scene = scene();
        let options = DragOptions::new(Some(HEADER), Some(PANEL))
            .with_initial_position(Position::new(-4.0, 2.5));
        let engine = bound_engine(&mut scene, options);
        assert_eq!(engine.current_position(), Position::new(-4.0, 2.5));
        assert_eq!(scene.transform(PANEL), Some("translate(-4px, 2.5px)"));
    }

    #[test]
    fn reset_restores_initial_position_when_idle() {
        let mut scene = scene();
        let mut engine = bound_engine(&mut scene, DragOptions::new(Some(HEADER), Some(PANEL)));
        engine.handle_event(&mut scene, &PointerEvent::down(110.0, 105.0));
        engine.handle_event(&mut scene, &PointerEvent::moved(130.0, 105.0));
        assert!(!engine.reset_position(&mut scene));
        assert_eq!(engine.current_position(), Position::new(20.0, 0.0));
        engine.handle_event(&mut scene, &PointerEvent::up(130.0, 105.0));
        assert!(engine.reset_position(&mut scene));
        assert_eq!(engine.current_position(), Position::ORIGIN);
        assert_eq!(scene.transform(PANEL), Some("translate(0px, 0px)"));
    }

    #[test]
    fn panicking_start_callback_leaves_engine_idle_and_surface_free() {
        let options = DragOptions::new(Some(HEADER), Some(PANEL)).on_drag_start(|| {
            panic!("consumer failure");
        });
        let mut scene = scene();
        let mut engine = bound_engine(&mut scene, options);
        let result = catch_unwind(AssertUnwindSafe(|| {
            engine.handle_event(&mut scene, &PointerEvent::down(110.0, 105.0));
        }));
        assert!(result.is_err());
        assert!(!engine.is_dragging());
        assert_eq!(surface_holder(), None);
    }

    #[test]
    fn panicking_end_callback_still_releases_surface() {
        let options =
            DragOptions::new(Some(HEADER), Some(PANEL)).on_drag_end(|_| panic!("consumer failure"));
        let mut scene = scene();
        let mut engine = bound_engine(&mut scene, options);
        engine.handle_event(&mut scene, &PointerEvent::down(110.0, 105.0));
        let result = catch_unwind(AssertUnwindSafe(|| {
            engine.handle_event(&mut scene, &PointerEvent::up(110.0, 105.0));
        }));
        assert!(result.is_err());
        assert!(!engine.is_dragging());
        assert_eq!(surface_holder(), None);
    }

    #[test]
    fn only_one_engine_holds_the_surface() {
        let mut scene = scene();
        scene.set_layout(10, rect(0, 0, 20, 10));
        scene.set_layout(11, rect(0, 0, 20, 2));
        scene.set_parent(11, Some(10));
        let mut first = bound_engine(&mut scene, DragOptions::new(Some(HEADER), Some(PANEL)));
        let mut second = bound_engine(&mut scene, DragOptions::new(Some(11), Some(10)));
        assert!(first.handle_event(&mut scene, &PointerEvent::down(110.0, 105.0)));
        assert!(!second.handle_event(&mut scene, &PointerEvent::down(1.0, 1.0)));
        assert!(!second.is_dragging());
        first.handle_event(&mut scene, &PointerEvent::up(110.0, 105.0));
        assert!(second.handle_event(&mut scene, &PointerEvent::down(1.0, 1.0)));
    }

    #[test]
    fn hover_cursor_reflects_state() {
        let mut scene = scene();
        let mut engine = bound_engine(&mut scene, DragOptions::new(Some(HEADER), Some(PANEL)));
        let on_handle = Position::new(110.0, 105.0);
        let elsewhere = Position::new(10.0, 10.0);
        assert_eq!(
            engine.hover_cursor(&scene, on_handle),
            Some(PointerShape::Grab)
        );
        assert_eq!(engine.hover_cursor(&scene, elsewhere), None);
        engine.handle_event(&mut scene, &PointerEvent::down(110.0, 105.0));
        assert_eq!(
            engine.hover_cursor(&scene, elsewhere),
            Some(PointerShape::Grabbing)
        );
        engine.unbind();
        assert_eq!(engine.hover_cursor(&scene, on_handle), None);
    }

    #[test]
    fn bounds_detached_mid_drag_leaves_offset_unclamped() {
        let mut scene = scene();
        let options = DragOptions::new(Some(HEADER), Some(PANEL)).with_bounds(SCREEN);
        let mut engine = bound_engine(&mut scene, options);
        engine.handle_event(&mut scene, &PointerEvent::down(110.0, 105.0));
        scene.remove(SCREEN);
        engine.handle_event(&mut scene, &PointerEvent::moved(200.0, 105.0));
        assert_eq!(engine.current_position(), Position::new(90.0, 0.0));
    }
}
