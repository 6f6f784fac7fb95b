//! Mounted DOM elements and the applier that writes their inline style.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use kinetic_core::css;
use kinetic_core::{Applier, ElementId, ElementScope, SignalSampler};
use kinetic_protocol::{
    PointerSample, Rect, ScrollSample, Signal, StyleCommand, Transition, ViewportSize,
    VisibilitySample,
};
use log::{debug, warn};
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement, IntersectionObserverEntry, Window};

/// Attribute linking a DOM element back to its scope.
pub(crate) const ID_ATTRIBUTE: &str = "data-kinetic-id";

struct Mounted {
    element: HtmlElement,
    scope: ElementScope,
    /// Live bindings on this element; it is unmounted when this hits zero.
    bindings: usize,
}

/// Shared state between the engine, its DOM listeners and the applier.
pub(crate) struct Page {
    pub(crate) sampler: SignalSampler,
    window: Window,
    mounted: RefCell<HashMap<ElementId, Mounted>>,
}

impl Page {
    pub(crate) fn new(window: Window) -> Self {
        Self {
            sampler: SignalSampler::new(),
            window,
            mounted: RefCell::new(HashMap::new()),
        }
    }

    /// The scope for `element`, mounting it on first use. Returns whether
    /// the element was newly mounted.
    pub(crate) fn mount(&self, element: &HtmlElement) -> (ElementScope, bool) {
        let mut mounted = self.mounted.borrow_mut();
        if let Some(m) = id_of(element).and_then(|id| mounted.get_mut(&id))
            && m.element == *element
        {
            m.bindings += 1;
            return (m.scope.clone(), false);
        }
        let scope = self.sampler.mount(measure(element));
        scope.set_document_top(layout_top(element));
        if element
            .set_attribute(ID_ATTRIBUTE, &scope.id().0.to_string())
            .is_err()
        {
            warn!("{}: could not tag element", scope.id());
        }
        mounted.insert(
            scope.id(),
            Mounted {
                element: element.clone(),
                scope: scope.clone(),
                bindings: 1,
            },
        );
        debug!("{}: mounted", scope.id());
        (scope, true)
    }

    /// Drop one binding's claim on `id`. When the last one goes the scope
    /// is detached and the element returned so the caller can stop
    /// observing it.
    pub(crate) fn release(&self, id: ElementId) -> Option<HtmlElement> {
        let mut mounted = self.mounted.borrow_mut();
        let m = mounted.get_mut(&id)?;
        m.bindings = m.bindings.saturating_sub(1);
        if m.bindings > 0 {
            return None;
        }
        let m = mounted.remove(&id)?;
        m.scope.detach();
        if m.element.remove_attribute(ID_ATTRIBUTE).is_err() {
            warn!("{id}: could not untag element");
        }
        debug!("{id}: unmounted");
        Some(m.element)
    }

    pub(crate) fn mounted_count(&self) -> usize {
        self.mounted.borrow().len()
    }

    /// Re-measure every mounted element. Runs before each broadcast so
    /// mappers see positions after layout and scroll.
    fn refresh_bounds(&self) {
        for m in self.mounted.borrow().values() {
            m.scope.set_bounds(measure(&m.element));
            m.scope.set_document_top(layout_top(&m.element));
        }
    }

    pub(crate) fn on_pointer_move(&self, x: f64, y: f64, timestamp_ms: f64) {
        self.refresh_bounds();
        let sample = PointerSample::new(x, y, timestamp_ms);
        self.sampler.dispatch(&Signal::PointerMove(sample));
    }

    pub(crate) fn on_pointer_leave(&self) {
        self.sampler.dispatch(&Signal::PointerLeave);
    }

    pub(crate) fn on_scroll(&self) {
        let Some(sample) = self.scroll_sample() else {
            warn!("scroll position unavailable");
            return;
        };
        self.refresh_bounds();
        self.sampler.dispatch(&Signal::Scroll(sample));
    }

    pub(crate) fn on_resize(&self) {
        if let Some(size) = self.viewport_size()
            && let Err(e) = self.sampler.set_viewport(size)
        {
            warn!("resize ignored: {e}");
        }
        self.on_scroll();
    }

    pub(crate) fn on_intersection(&self, entry: &IntersectionObserverEntry) {
        let target = entry.target();
        let scope = id_of(&target)
            .and_then(|id| self.mounted.borrow().get(&id).map(|m| m.scope.clone()));
        let Some(scope) = scope else {
            debug!("intersection for an unmounted element");
            return;
        };
        let sample = VisibilitySample::new(entry.is_intersecting(), entry.intersection_ratio());
        self.sampler.dispatch_to(&scope, &Signal::Visibility(sample));
    }

    pub(crate) fn viewport_size(&self) -> Option<ViewportSize> {
        let width = self.window.inner_width().ok()?.as_f64()?;
        let height = self.window.inner_height().ok()?.as_f64()?;
        Some(ViewportSize::new(width, height))
    }

    pub(crate) fn scroll_sample(&self) -> Option<ScrollSample> {
        let offset = self.window.scroll_y().ok()?;
        let height = self.window.inner_height().ok()?.as_f64()?;
        let document = self.window.document()?.document_element()?.scroll_height();
        Some(ScrollSample::new(offset, height, f64::from(document)))
    }

    fn element(&self, id: ElementId) -> Option<HtmlElement> {
        self.mounted.borrow().get(&id).map(|m| m.element.clone())
    }
}

fn id_of(element: &Element) -> Option<ElementId> {
    element
        .get_attribute(ID_ATTRIBUTE)?
        .parse()
        .ok()
        .map(ElementId)
}

fn measure(element: &Element) -> Rect {
    let r = element.get_bounding_client_rect();
    Rect::new(r.x(), r.y(), r.width(), r.height())
}

/// Document-relative top as laid out. Offsets ignore CSS transforms, so
/// this stays put while an effect is moving the element.
fn layout_top(element: &HtmlElement) -> f64 {
    let mut top = f64::from(element.offset_top());
    let mut parent = element.offset_parent();
    while let Some(el) = parent {
        let Ok(el) = el.dyn_into::<HtmlElement>() else {
            break;
        };
        top += f64::from(el.offset_top());
        parent = el.offset_parent();
    }
    top
}

/// Writes rendered declarations onto the element's inline style.
pub(crate) struct DomApplier {
    page: Weak<Page>,
}

impl DomApplier {
    pub(crate) fn new(page: &Rc<Page>) -> Self {
        Self {
            page: Rc::downgrade(page),
        }
    }
}

impl Applier for DomApplier {
    fn apply(&mut self, element: ElementId, command: &StyleCommand, transition: &Transition) {
        let Some(target) = self.page.upgrade().and_then(|page| page.element(element)) else {
            debug!("{element}: write for an unmounted element skipped");
            return;
        };
        let style = target.style();
        for (property, value) in css::declarations(command, transition) {
            if let Err(e) = style.set_property(property, &value) {
                warn!("{element}: {property}: {e:?}");
            }
        }
    }
}
