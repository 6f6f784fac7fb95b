use std::cell::RefCell;
use std::rc::Rc;

use kinetic_protocol::{Label, Signal, StyleCommand, TransformState, Transition};
use log::{debug, warn};

use crate::applier::SharedApplier;
use crate::error::ConfigError;
use crate::preset::Preset;
use crate::runner::{Context, Runner};
use crate::sampler::{SignalSampler, Subscription, TransformClaim, ViewportState};
use crate::scope::{ElementId, ElementScope, WeakScope};

struct BindingCore {
    element: ElementId,
    preset: Label,
    transition: Transition,
    runner: Runner,
    /// Where geometry is read from: the element itself or its anchor.
    geometry: WeakScope,
    applier: SharedApplier,
}

impl BindingCore {
    fn on_signal(&mut self, signal: &Signal, viewport: &ViewportState) {
        let Some((bounds, document_top)) = self.geometry.live_geometry() else {
            debug!(
                "{} [{}]: anchor {} gone, signal ignored",
                self.element,
                self.preset,
                self.geometry.id()
            );
            return;
        };
        let ctx = Context {
            bounds,
            document_top,
            viewport: *viewport,
        };
        match self.runner.feed(signal, &ctx) {
            Ok(Some(cmd)) => self.write(&cmd),
            Ok(None) => {}
            Err(e) => warn!("{} [{}]: {e}; keeping last state", self.element, self.preset),
        }
    }

    fn write(&self, cmd: &StyleCommand) {
        match self.applier.try_borrow_mut() {
            Ok(mut applier) => applier.apply(self.element, cmd, &self.transition),
            Err(_) => warn!("{} [{}]: applier busy, write skipped", self.element, self.preset),
        }
    }
}

/// The live association between one element and one preset.
///
/// Owns its listener registration: dropping the binding (or calling
/// [`unbind`](Self::unbind)) unsubscribes before any further signal can
/// reach it. A binding whose effect writes `transform` also holds the
/// element's [`TransformClaim`] until it goes away.
pub struct EffectBinding {
    core: Rc<RefCell<BindingCore>>,
    subscription: Subscription,
    claim: Option<TransformClaim>,
}

impl EffectBinding {
    /// Validate `preset`, subscribe `scope` to its signal and write the
    /// mount-time state. Fails with [`ConfigError::TransformOwned`] if
    /// `preset` moves the element and another live binding already does.
    pub fn bind(
        sampler: &SignalSampler,
        scope: &ElementScope,
        preset: &Preset,
        applier: SharedApplier,
    ) -> Result<Self, ConfigError> {
        Self::bind_anchored(sampler, scope, scope, preset, applier)
    }

    /// Like [`bind`](Self::bind), but measure `anchor` instead of the
    /// element itself: a magnetic button's label pulls toward the button's
    /// centre.
    pub fn bind_anchored(
        sampler: &SignalSampler,
        scope: &ElementScope,
        anchor: &ElementScope,
        preset: &Preset,
        applier: SharedApplier,
    ) -> Result<Self, ConfigError> {
        let admitted = preset.validate().and_then(|()| {
            preset
                .effect
                .writes_transform()
                .then(|| sampler.claim_transform(scope))
                .transpose()
        });
        let claim = match admitted {
            Ok(claim) => claim,
            Err(e) => {
                warn!("{} [{}]: rejected: {e}", scope.id(), preset.name);
                return Err(e);
            }
        };

        let mut runner = Runner::new(preset.effect);
        let initial = runner.initial(&Context {
            bounds: anchor.bounds(),
            document_top: anchor.document_top(),
            viewport: sampler.viewport(),
        });
        let core = Rc::new(RefCell::new(BindingCore {
            element: scope.id(),
            preset: preset.name.clone(),
            transition: preset.transition,
            runner,
            geometry: anchor.downgrade(),
            applier,
        }));
        if let Some(cmd) = initial {
            core.borrow().write(&cmd);
        }

        let callback_core = Rc::clone(&core);
        let subscription = sampler.subscribe(preset.signal_kind(), scope, move |signal, viewport| {
            match callback_core.try_borrow_mut() {
                Ok(mut core) => core.on_signal(signal, viewport),
                Err(_) => warn!("reentrant signal for a busy binding dropped"),
            }
        });
        debug!(
            "{} [{}]: bound on {}",
            scope.id(),
            preset.name,
            preset.signal_kind()
        );
        Ok(Self {
            core,
            subscription,
            claim,
        })
    }

    pub fn element(&self) -> ElementId {
        self.core.borrow().element
    }

    pub fn preset(&self) -> Label {
        self.core.borrow().preset.clone()
    }

    pub fn transform(&self) -> TransformState {
        self.core.borrow().runner.transform()
    }

    pub fn last_command(&self) -> Option<StyleCommand> {
        self.core.borrow().runner.last_command().copied()
    }

    /// Whether this binding is the one allowed to move its element.
    pub fn owns_transform(&self) -> bool {
        self.claim.is_some()
    }

    /// Whether the sampler would still call this binding.
    pub fn is_active(&self) -> bool {
        self.subscription.is_active()
    }

    /// Tear down: unsubscribe and let the applier forget the element.
    pub fn unbind(self) {
        let core = self.core.borrow();
        self.subscription.unsubscribe();
        if let Ok(mut applier) = core.applier.try_borrow_mut() {
            applier.release(core.element);
        }
        debug!("{} [{}]: unbound", core.element, core.preset);
    }
}

impl std::fmt::Debug for EffectBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let core = self.core.borrow();
        f.debug_struct("EffectBinding")
            .field("element", &core.element)
            .field("preset", &core.preset)
            .field("subscription", &self.subscription)
            .finish()
    }
}
