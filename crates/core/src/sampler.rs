//! Per-element subscriptions to the process-wide signal channels.
//!
//! One [`SignalSampler`] stands in for the document/window event targets.
//! Bindings subscribe with an [`ElementScope`]; the sampler keeps at most
//! one listener per `(element, kind)` and checks the element is still
//! mounted before every dispatch.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use kinetic_protocol::{Rect, ScrollSample, Signal, SignalKind, ViewportSize};
use log::{debug, trace, warn};

use crate::error::ConfigError;
use crate::scope::{ElementId, ElementScope, WeakScope};

/// Viewport geometry as last reported by the host, handed to every
/// callback alongside the signal.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewportState {
    pub size: ViewportSize,
    pub scroll_offset_px: f64,
    pub document_height_px: f64,
}

impl ViewportState {
    /// The current scroll position as a sample, used to prime scroll-driven
    /// bindings at mount time.
    pub fn scroll_sample(&self) -> ScrollSample {
        ScrollSample::new(
            self.scroll_offset_px,
            self.size.height,
            self.document_height_px,
        )
    }
}

pub type Callback = Box<dyn FnMut(&Signal, &ViewportState)>;

/// Outcome of a targeted dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Delivered,
    /// The element was detached; its listener was pruned and never ran.
    Dropped,
    NoSubscriber,
}

/// Counts from a broadcast dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatchReport {
    pub delivered: usize,
    pub dropped: usize,
}

type Key = (ElementId, SignalKind);

struct Entry {
    token: u64,
    scope: WeakScope,
    callback: Rc<RefCell<Callback>>,
}

#[derive(Default)]
struct Registry {
    entries: HashMap<Key, Entry>,
    /// Claim token of the binding that writes each element's transform.
    transform_owners: HashMap<ElementId, u64>,
    next_token: u64,
    next_element: u64,
    viewport: ViewportState,
}

impl Registry {
    /// Remove the entry for `key` if it still carries `token`. The entry is
    /// returned so the caller can drop it after releasing the borrow.
    fn take_if_current(&mut self, key: Key, token: u64) -> Option<Entry> {
        if self.is_current(key, token) {
            self.entries.remove(&key)
        } else {
            None
        }
    }

    fn is_current(&self, key: Key, token: u64) -> bool {
        self.entries.get(&key).is_some_and(|e| e.token == token)
    }
}

/// Shared handle to the signal channels. Cloning is cheap; all clones see
/// the same subscriptions.
#[derive(Clone, Default)]
pub struct SignalSampler {
    registry: Rc<RefCell<Registry>>,
}

impl SignalSampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a scope for a newly mounted element. `bounds` must be
    /// measured before any effect moves the element; its layout top is
    /// derived from them and the current scroll offset.
    pub fn mount(&self, bounds: Rect) -> ElementScope {
        let mut reg = self.registry.borrow_mut();
        let id = ElementId(reg.next_element);
        reg.next_element += 1;
        ElementScope::new(id, bounds, bounds.y + reg.viewport.scroll_offset_px)
    }

    pub fn viewport(&self) -> ViewportState {
        self.registry.borrow().viewport
    }

    /// Record a new viewport size. Negative or non-finite sizes are
    /// rejected.
    pub fn set_viewport(&self, size: ViewportSize) -> Result<(), ConfigError> {
        ConfigError::non_negative("viewport width", size.width)?;
        ConfigError::non_negative("viewport height", size.height)?;
        self.registry.borrow_mut().viewport.size = size;
        Ok(())
    }

    /// Attach `callback` to `kind` for `scope`. A previous listener for the
    /// same pair is replaced and will not fire again.
    pub fn subscribe(
        &self,
        kind: SignalKind,
        scope: &ElementScope,
        callback: impl FnMut(&Signal, &ViewportState) + 'static,
    ) -> Subscription {
        let key = (scope.id(), kind);
        let mut reg = self.registry.borrow_mut();
        let token = reg.next_token;
        reg.next_token += 1;
        let replaced = reg.entries.insert(
            key,
            Entry {
                token,
                scope: scope.downgrade(),
                callback: Rc::new(RefCell::new(Box::new(callback))),
            },
        );
        drop(reg);
        if replaced.is_some() {
            debug!("{} {kind}: replaced existing listener", scope.id());
        } else {
            debug!("{} {kind}: subscribed", scope.id());
        }
        Subscription {
            key,
            token,
            registry: Rc::downgrade(&self.registry),
        }
    }

    /// Reserve `scope`'s transform for a single binding. Fails while
    /// another claim on the same element is alive.
    pub fn claim_transform(&self, scope: &ElementScope) -> Result<TransformClaim, ConfigError> {
        let element = scope.id();
        let mut reg = self.registry.borrow_mut();
        if reg.transform_owners.contains_key(&element) {
            return Err(ConfigError::TransformOwned(element));
        }
        let token = reg.next_token;
        reg.next_token += 1;
        reg.transform_owners.insert(element, token);
        drop(reg);
        debug!("{element}: transform claimed");
        Ok(TransformClaim {
            element,
            token,
            registry: Rc::downgrade(&self.registry),
        })
    }

    /// Number of listeners whose element is still mounted.
    pub fn active_count(&self) -> usize {
        self.registry
            .borrow()
            .entries
            .values()
            .filter(|e| e.scope.is_live())
            .count()
    }

    /// Deliver `signal` to every listener on its channel, in subscription
    /// order.
    pub fn dispatch(&self, signal: &Signal) -> DispatchReport {
        let kind = signal.kind();
        let targets: Vec<(Key, u64)> = {
            let mut reg = self.registry.borrow_mut();
            if let Signal::Scroll(sample) = signal {
                record_scroll(&mut reg.viewport, sample);
            }
            let mut targets: Vec<(Key, u64)> = reg
                .entries
                .iter()
                .filter(|(key, _)| key.1 == kind)
                .map(|(key, e)| (*key, e.token))
                .collect();
            targets.sort_by_key(|&(_, token)| token);
            targets
        };

        let mut report = DispatchReport::default();
        for (key, token) in targets {
            match self.deliver(key, token, signal) {
                Dispatch::Delivered => report.delivered += 1,
                Dispatch::Dropped => report.dropped += 1,
                Dispatch::NoSubscriber => {}
            }
        }
        trace!(
            "{kind}: delivered {}, dropped {}",
            report.delivered, report.dropped
        );
        report
    }

    /// Deliver `signal` to `scope`'s listener only (element-local events
    /// such as intersection changes or pointer-leave).
    pub fn dispatch_to(&self, scope: &ElementScope, signal: &Signal) -> Dispatch {
        let key = (scope.id(), signal.kind());
        let token = {
            let mut reg = self.registry.borrow_mut();
            if let Signal::Scroll(sample) = signal {
                record_scroll(&mut reg.viewport, sample);
            }
            match reg.entries.get(&key) {
                Some(entry) => entry.token,
                None => return Dispatch::NoSubscriber,
            }
        };
        self.deliver(key, token, signal)
    }

    /// Run one listener. The registry borrow is released before the
    /// callback runs so callbacks may subscribe or unsubscribe.
    fn deliver(&self, key: Key, token: u64, signal: &Signal) -> Dispatch {
        let (cell, viewport) = {
            let mut reg = self.registry.borrow_mut();
            // Unsubscribed or replaced by an earlier callback in this round.
            let Some(entry) = reg.entries.get(&key).filter(|e| e.token == token) else {
                return Dispatch::NoSubscriber;
            };
            if !entry.scope.is_live() {
                let pruned = reg.take_if_current(key, token);
                drop(reg);
                drop(pruned);
                debug!("{} {}: element detached, listener pruned", key.0, key.1);
                return Dispatch::Dropped;
            }
            (Rc::clone(&entry.callback), reg.viewport)
        };

        let Ok(mut callback) = cell.try_borrow_mut() else {
            warn!("{} {}: reentrant dispatch skipped", key.0, key.1);
            return Dispatch::NoSubscriber;
        };
        (*callback)(signal, &viewport);
        Dispatch::Delivered
    }
}

fn record_scroll(viewport: &mut ViewportState, sample: &ScrollSample) {
    if sample.non_finite_field().is_some() {
        return;
    }
    viewport.scroll_offset_px = sample.offset_px;
    viewport.size.height = sample.viewport_height_px;
    viewport.document_height_px = sample.document_height_px;
}

/// Owning handle of one listener registration. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    key: Key,
    token: u64,
    registry: Weak<RefCell<Registry>>,
}

impl Subscription {
    pub fn element(&self) -> ElementId {
        self.key.0
    }

    pub fn kind(&self) -> SignalKind {
        self.key.1
    }

    /// Whether this registration is still the one the sampler would call.
    pub fn is_active(&self) -> bool {
        self.registry
            .upgrade()
            .is_some_and(|reg| reg.borrow().is_current(self.key, self.token))
    }

    /// Detach the listener. Calling this again, or after the listener was
    /// replaced, is a no-op. Returns whether anything was removed.
    pub fn unsubscribe(&self) -> bool {
        let Some(registry) = self.registry.upgrade() else {
            return false;
        };
        let Ok(mut reg) = registry.try_borrow_mut() else {
            warn!("{} {}: unsubscribe during registry update", self.key.0, self.key.1);
            return false;
        };
        let entry = reg.take_if_current(self.key, self.token);
        drop(reg);
        let removed = entry.is_some();
        drop(entry);
        if removed {
            debug!("{} {}: unsubscribed", self.key.0, self.key.1);
        }
        removed
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("element", &self.key.0)
            .field("kind", &self.key.1)
            .field("token", &self.token)
            .finish()
    }
}

/// Exclusive right to write one element's transform. Dropping it frees
/// the element for another binding.
#[must_use = "dropping a TransformClaim releases it immediately"]
pub struct TransformClaim {
    element: ElementId,
    token: u64,
    registry: Weak<RefCell<Registry>>,
}

impl TransformClaim {
    pub fn element(&self) -> ElementId {
        self.element
    }
}

impl Drop for TransformClaim {
    fn drop(&mut self) {
        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        let Ok(mut reg) = registry.try_borrow_mut() else {
            warn!("{}: transform claim released during registry update", self.element);
            return;
        };
        if reg.transform_owners.get(&self.element) == Some(&self.token) {
            reg.transform_owners.remove(&self.element);
            drop(reg);
            debug!("{}: transform released", self.element);
        }
    }
}

impl std::fmt::Debug for TransformClaim {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransformClaim")
            .field("element", &self.element)
            .field("token", &self.token)
            .finish()
    }
}
