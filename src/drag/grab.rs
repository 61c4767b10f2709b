use std::sync::atomic::{AtomicU64, Ordering};

use crate::state::{HolderId, with_surface};

static NEXT_HOLDER: AtomicU64 = AtomicU64::new(1);

pub(crate) fn next_holder_id() -> HolderId {
    NEXT_HOLDER.fetch_add(1, Ordering::Relaxed)
}

/// Scoped hold on the surface-wide pointer and selection styling.
///
/// Acquiring switches the surface to the grabbing pointer and suppresses
/// text selection. Dropping the guard puts both back, whichever way the drag
/// ended.
#[derive(Debug)]
pub struct GrabGuard {
    holder: HolderId,
}

impl GrabGuard {
    /// `None` while the surface is held, including by `holder` itself, so at
    /// most one guard exists at a time.
    pub fn acquire(holder: HolderId) -> Option<Self> {
        with_surface(|s| s.holder().is_none() && s.acquire(holder))
            .then_some(GrabGuard { holder })
    }

    pub fn holder(&self) -> HolderId {
        self.holder
    }
}

impl Drop for GrabGuard {
    fn drop(&mut self) {
        with_surface(|s| {
            s.release(self.holder);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{PointerShape, surface_holder, surface_style};

    #[test]
    fn guard_releases_on_drop() {
        let id = next_holder_id();
        {
            let guard = GrabGuard::acquire(id).expect("surface free");
            assert_eq!(guard.holder(), id);
            assert_eq!(surface_style().pointer, PointerShape::Grabbing);
            assert!(surface_style().selection_suppressed);
        }
        assert_eq!(surface_holder(), None);
        assert_eq!(surface_style().pointer, PointerShape::Default);
        assert!(!surface_style().selection_suppressed);
    }

    #[test]
    fn guard_is_exclusive() {
        let a = next_holder_id();
        let b = next_holder_id();
        let guard = GrabGuard::acquire(a).expect("surface free");
        assert!(GrabGuard::acquire(b).is_none());
        drop(guard);
        assert!(GrabGuard::acquire(b).is_some());
    }

    #[test]
    fn guard_releases_during_unwind() {
        let id = next_holder_id();
        let result = std::panic::catch_unwind(|| {
            let _guard = GrabGuard::acquire(id).expect("surface free");
            panic!("callback failed");
        });
        assert!(result.is_err());
        assert_eq!(surface_holder(), None);
    }
}
