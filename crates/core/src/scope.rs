use std::cell::Cell;
use std::rc::{Rc, Weak};

use kinetic_protocol::Rect;
use serde::{Deserialize, Serialize};

/// Stable identifier of one mounted element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(pub u64);

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "el#{}", self.0)
    }
}

#[derive(Debug)]
struct ScopeInner {
    id: ElementId,
    attached: Cell<bool>,
    bounds: Cell<Rect>,
    document_top: Cell<f64>,
}

/// Host-side handle of one mounted element.
///
/// The host keeps the geometry current (the browser bridge measures with
/// `getBoundingClientRect` and the `offsetTop` chain before each dispatch)
/// and calls [`detach`] when the element unmounts. Dropping every clone has the same effect: the
/// sampler only holds a weak reference and checks it before each dispatch.
///
/// [`detach`]: ElementScope::detach
#[derive(Debug, Clone)]
pub struct ElementScope {
    inner: Rc<ScopeInner>,
}

impl ElementScope {
    pub(crate) fn new(id: ElementId, bounds: Rect, document_top: f64) -> Self {
        Self {
            inner: Rc::new(ScopeInner {
                id,
                attached: Cell::new(true),
                bounds: Cell::new(bounds),
                document_top: Cell::new(document_top),
            }),
        }
    }

    pub fn id(&self) -> ElementId {
        self.inner.id
    }

    /// Last measured bounds, viewport-relative, with the element's current
    /// transform applied.
    pub fn bounds(&self) -> Rect {
        self.inner.bounds.get()
    }

    pub fn set_bounds(&self, bounds: Rect) {
        self.inner.bounds.set(bounds);
    }

    /// Top edge in document coordinates as laid out, ignoring any
    /// transform. Scroll-driven offsets are mapped against this, never
    /// against the rendered bounds.
    pub fn document_top(&self) -> f64 {
        self.inner.document_top.get()
    }

    pub fn set_document_top(&self, top: f64) {
        self.inner.document_top.set(top);
    }

    pub fn detach(&self) {
        self.inner.attached.set(false);
    }

    pub fn is_attached(&self) -> bool {
        self.inner.attached.get()
    }

    pub(crate) fn downgrade(&self) -> WeakScope {
        WeakScope {
            id: self.inner.id,
            inner: Rc::downgrade(&self.inner),
        }
    }
}

/// Non-owning view of an [`ElementScope`] held by subscriptions and
/// bindings.
#[derive(Debug, Clone)]
pub(crate) struct WeakScope {
    id: ElementId,
    inner: Weak<ScopeInner>,
}

impl WeakScope {
    pub(crate) fn id(&self) -> ElementId {
        self.id
    }

    /// Rendered bounds and layout top of a live, attached element.
    pub(crate) fn live_geometry(&self) -> Option<(Rect, f64)> {
        let inner = self.inner.upgrade()?;
        inner
            .attached
            .get()
            .then(|| (inner.bounds.get(), inner.document_top.get()))
    }

    pub(crate) fn is_live(&self) -> bool {
        self.live_geometry().is_some()
    }
}
