//! Surface-wide pointer styling shared by every drag engine on a UI thread.
//!
//! A terminal has one pointer shape and one mouse-capture mode, so whichever
//! engine is dragging owns both for the length of its drag. Engines never
//! touch this state directly; they go through [`crate::drag::grab::GrabGuard`].
//! The host drains changes with [`take_surface_change`] and applies them to the
//! terminal.
//!
//! While nobody holds the surface the pointer shows the host's hover shape,
//! set with [`set_hover_pointer`]. Releasing a drag returns to that shape, so
//! a release over a handle ends on `Grab` rather than `Default`.

use std::cell::RefCell;

/// Pointer shape requested for the application surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerShape {
    #[default]
    Default,
    Grab,
    Grabbing,
}

impl PointerShape {
    /// Name understood by terminals implementing the OSC 22 pointer-shape
    /// request.
    pub fn css_name(self) -> &'static str {
        match self {
            PointerShape::Default => "default",
            PointerShape::Grab => "grab",
            PointerShape::Grabbing => "grabbing",
        }
    }
}

/// Snapshot of the surface styling the host should apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SurfaceStyle {
    pub pointer: PointerShape,
    pub selection_suppressed: bool,
}

/// Identifies the engine that currently holds the surface.
pub type HolderId = u64;

#[derive(Debug, Default)]
pub(crate) struct SurfaceState {
    style: SurfaceStyle,
    holder: Option<HolderId>,
    hover: PointerShape,
    dirty: bool,
}

impl SurfaceState {
    pub(crate) fn holder(&self) -> Option<HolderId> {
        self.holder
    }

    /// Claim the surface for `holder`. Fails while someone else holds it.
    pub(crate) fn acquire(&mut self, holder: HolderId) -> bool {
        match self.holder {
            Some(current) if current != holder => false,
            Some(_) => true,
            None => {
                self.holder = Some(holder);
                self.set_style(SurfaceStyle {
                    pointer: PointerShape::Grabbing,
                    selection_suppressed: true,
                });
                true
            }
        }
    }

    /// Return the surface to its defaults if `holder` owns it.
    pub(crate) fn release(&mut self, holder: HolderId) -> bool {
        if self.holder != Some(holder) {
            return false;
        }
        self.holder = None;
        self.set_style(self.idle_style());
        true
    }

    /// Remember the shape to show while idle. Applied at once unless a drag
    /// holds the surface.
    pub(crate) fn set_hover(&mut self, shape: PointerShape) {
        self.hover = shape;
        if self.holder.is_none() {
            self.set_style(self.idle_style());
        }
    }

    fn idle_style(&self) -> SurfaceStyle {
        SurfaceStyle {
            pointer: self.hover,
            selection_suppressed: false,
        }
    }

    fn set_style(&mut self, style: SurfaceStyle) {
        if self.style == style {
            return;
        }
        self.style = style;
        self.dirty = true;
    }

    fn take_change(&mut self) -> Option<SurfaceStyle> {
        if self.dirty {
            self.dirty = false;
            Some(self.style)
        } else {
            None
        }
    }
}

thread_local! {
    static SURFACE: RefCell<SurfaceState> = RefCell::new(SurfaceState::default());
}

pub(crate) fn with_surface<T>(f: impl FnOnce(&mut SurfaceState) -> T) -> T {
    SURFACE.with(|cell| f(&mut cell.borrow_mut()))
}

/// Current surface styling.
pub fn surface_style() -> SurfaceStyle {
    with_surface(|s| s.style)
}

/// Engine currently holding the surface, if any.
pub fn surface_holder() -> Option<HolderId> {
    with_surface(|s| s.holder())
}

/// Pointer shape the host wants while no drag holds the surface, usually
/// from [`crate::drag::DragEngine::hover_cursor`].
pub fn set_hover_pointer(shape: PointerShape) {
    with_surface(|s| s.set_hover(shape));
}

/// Styling changed since the last call, if it did.
pub fn take_surface_change() -> Option<SurfaceStyle> {
    with_surface(|s| s.take_change())
}
