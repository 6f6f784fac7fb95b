mod listener;
mod page;

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use kinetic_core::{EffectBinding, ElementId, ElementScope, PresetTable, SharedApplier};
use kinetic_protocol::Signal;
use listener::Listener;
use page::{DomApplier, Page};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    HtmlElement, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit,
    MouseEvent,
};

#[wasm_bindgen(start)]
pub fn start() {
    // Route panics and log records to the browser console.
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        log::debug!("logger already installed");
    }
}

fn js_err(e: impl std::fmt::Display) -> JsError {
    JsError::new(&e.to_string())
}

fn js_value_err(e: JsValue) -> JsError {
    JsError::new(&format!("{e:?}"))
}

struct Bound {
    binding: EffectBinding,
    element: ElementId,
    anchor: Option<ElementId>,
}

/// Page-wide effect engine. Create one per document, bind elements to
/// presets by name (or inline JSON), and `free()` it to remove every
/// listener.
#[wasm_bindgen]
pub struct EffectEngine {
    page: Rc<Page>,
    applier: SharedApplier,
    table: PresetTable,
    bindings: HashMap<u32, Bound>,
    next_handle: u32,
    observer: IntersectionObserver,
    _on_intersect: Closure<dyn FnMut(js_sys::Array)>,
    _listeners: Vec<Listener>,
}

#[wasm_bindgen]
impl EffectEngine {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<EffectEngine, JsError> {
        let window = web_sys::window().ok_or_else(|| JsError::new("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsError::new("no document"))?;
        let root = document
            .document_element()
            .ok_or_else(|| JsError::new("no document element"))?;

        let page = Rc::new(Page::new(window.clone()));
        if let Some(size) = page.viewport_size() {
            page.sampler.set_viewport(size).map_err(js_err)?;
        }
        // Records the starting scroll position for mount-time priming.
        if let Some(sample) = page.scroll_sample() {
            page.sampler.dispatch(&Signal::Scroll(sample));
        }

        let listeners = vec![
            {
                let page = Rc::downgrade(&page);
                Listener::attach(&window, "mousemove", move |event| {
                    let (Some(page), Some(mouse)) = (page.upgrade(), event.dyn_ref::<MouseEvent>())
                    else {
                        return;
                    };
                    page.on_pointer_move(
                        f64::from(mouse.client_x()),
                        f64::from(mouse.client_y()),
                        event.time_stamp(),
                    );
                })
            },
            {
                let page = Rc::downgrade(&page);
                Listener::attach(&root, "mouseleave", move |_| {
                    if let Some(page) = page.upgrade() {
                        page.on_pointer_leave();
                    }
                })
            },
            {
                let page = Rc::downgrade(&page);
                Listener::attach(&window, "scroll", move |_| {
                    if let Some(page) = page.upgrade() {
                        page.on_scroll();
                    }
                })
            },
            {
                let page = Rc::downgrade(&page);
                Listener::attach(&window, "resize", move |_| {
                    if let Some(page) = page.upgrade() {
                        page.on_resize();
                    }
                })
            },
        ]
        .into_iter()
        .collect::<Result<Vec<_>, _>>()
        .map_err(js_value_err)?;

        let on_intersect = {
            let page = Rc::downgrade(&page);
            Closure::<dyn FnMut(js_sys::Array)>::new(move |entries: js_sys::Array| {
                let Some(page) = page.upgrade() else {
                    return;
                };
                for entry in entries.iter() {
                    if let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() {
                        page.on_intersection(&entry);
                    }
                }
            })
        };
        // Fire at every 5% step so each reveal can apply its own threshold.
        let thresholds: js_sys::Array = (0..=20)
            .map(|i| JsValue::from_f64(f64::from(i) / 20.0))
            .collect();
        let init = IntersectionObserverInit::new();
        init.set_threshold(&thresholds);
        let observer =
            IntersectionObserver::new_with_options(on_intersect.as_ref().unchecked_ref(), &init)
                .map_err(js_value_err)?;

        let applier: SharedApplier = Rc::new(RefCell::new(DomApplier::new(&page)));
        log::info!("kinetic engine ready");
        Ok(Self {
            page,
            applier,
            table: PresetTable::builtin(),
            bindings: HashMap::new(),
            next_handle: 1,
            observer,
            _on_intersect: on_intersect,
            _listeners: listeners,
        })
    }

    /// Merge a JSON preset table (`name → {effect, transition}`) over the
    /// builtins. Returns how many presets were loaded.
    pub fn load_presets(&mut self, json: &str) -> Result<usize, JsError> {
        self.table.load_json(json).map_err(js_err)
    }

    /// Names of every known preset, as a JSON array.
    pub fn preset_names(&self) -> Result<String, JsError> {
        let names: Vec<&str> = self.table.names().collect();
        serde_json::to_string(&names).map_err(js_err)
    }

    /// Bind `element` to a preset name or inline JSON preset. Returns a
    /// handle for [`unbind`](Self::unbind).
    pub fn bind(&mut self, element: &HtmlElement, preset: &str) -> Result<u32, JsError> {
        self.bind_inner(element, None, preset, None)
    }

    /// Bind with an extra transition delay, e.g. one word of a split
    /// heading.
    pub fn bind_delayed(
        &mut self,
        element: &HtmlElement,
        preset: &str,
        delay_ms: f64,
    ) -> Result<u32, JsError> {
        self.bind_inner(element, None, preset, Some(delay_ms))
    }

    /// Bind `element` but measure `anchor`: a magnetic button's label.
    pub fn bind_anchored(
        &mut self,
        element: &HtmlElement,
        anchor: &HtmlElement,
        preset: &str,
    ) -> Result<u32, JsError> {
        self.bind_inner(element, Some(anchor), preset, None)
    }

    /// Tear down one binding. Unknown or already-released handles are a
    /// no-op; returns whether anything was removed.
    pub fn unbind(&mut self, handle: u32) -> bool {
        let Some(bound) = self.bindings.remove(&handle) else {
            return false;
        };
        bound.binding.unbind();
        self.release(bound.element);
        if let Some(anchor) = bound.anchor {
            self.release(anchor);
        }
        log::debug!("handle {handle}: released");
        true
    }

    #[wasm_bindgen(getter)]
    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }

    #[wasm_bindgen(getter)]
    pub fn mounted_count(&self) -> usize {
        self.page.mounted_count()
    }
}

impl EffectEngine {
    fn bind_inner(
        &mut self,
        element: &HtmlElement,
        anchor: Option<&HtmlElement>,
        query: &str,
        delay_ms: Option<f64>,
    ) -> Result<u32, JsError> {
        let mut preset = self.table.resolve(query).map_err(js_err)?;
        if let Some(delay_ms) = delay_ms {
            preset = preset.with_delay(delay_ms);
        }

        let scope = self.mount(element);
        let anchor_scope = anchor.map(|a| self.mount(a));
        let result = EffectBinding::bind_anchored(
            &self.page.sampler,
            &scope,
            anchor_scope.as_ref().unwrap_or(&scope),
            &preset,
            Rc::clone(&self.applier),
        );
        let binding = match result {
            Ok(binding) => binding,
            Err(e) => {
                self.release(scope.id());
                if let Some(a) = anchor_scope {
                    self.release(a.id());
                }
                return Err(js_err(e));
            }
        };
        let handle = self.next_handle;
        self.next_handle = self.next_handle.wrapping_add(1).max(1);
        log::debug!("handle {handle}: {} on {}", preset.name, scope.id());
        self.bindings.insert(
            handle,
            Bound {
                binding,
                element: scope.id(),
                anchor: anchor_scope.map(|a| a.id()),
            },
        );
        Ok(handle)
    }

    fn mount(&self, element: &HtmlElement) -> ElementScope {
        let (scope, fresh) = self.page.mount(element);
        if fresh {
            self.observer.observe(element);
        }
        scope
    }

    fn release(&self, id: ElementId) {
        if let Some(element) = self.page.release(id) {
            self.observer.unobserve(&element);
        }
    }
}

impl Drop for EffectEngine {
    fn drop(&mut self) {
        self.observer.disconnect();
        for (_, bound) in self.bindings.drain() {
            bound.binding.unbind();
        }
        log::info!("kinetic engine stopped");
    }
}
