//! Per-binding effect state: feeds samples through the preset's mapper and
//! tracks the little state some effects need (hover, reveal latch, last
//! good transform).
//!
//! A [`Runner`] has no listeners and no host. Feed it synthetic signals
//! with a [`Context`] and inspect the commands it produces.

use kinetic_protocol::{Rect, Signal, StyleCommand, TransformOrder, TransformState};

use crate::error::SampleError;
use crate::mappers::reveal::RevealLatch;
use crate::mappers::{self, cursor, glow, grid, magnetic, parallax, progress, steps, tilt};
use crate::preset::Effect;
use crate::sampler::ViewportState;

/// Geometry a runner maps against.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Context {
    /// Bounds of the element the effect measures (its own, or its anchor's),
    /// as rendered.
    pub bounds: Rect,
    /// Layout top of the same element in document coordinates, free of
    /// any transform.
    pub document_top: f64,
    pub viewport: ViewportState,
}

#[derive(Debug, Clone)]
pub struct Runner {
    effect: Effect,
    hovering: bool,
    reveal: RevealLatch,
    transform: TransformState,
    last: Option<StyleCommand>,
}

impl Runner {
    pub fn new(effect: Effect) -> Self {
        Self {
            effect,
            hovering: false,
            reveal: RevealLatch::default(),
            transform: TransformState::IDENTITY,
            last: None,
        }
    }

    pub fn effect(&self) -> &Effect {
        &self.effect
    }

    /// Current transform of the element, as last set by this runner.
    pub fn transform(&self) -> TransformState {
        self.transform
    }

    pub fn last_command(&self) -> Option<&StyleCommand> {
        self.last.as_ref()
    }

    /// The state to show at mount time, before any signal arrives.
    ///
    /// Reveals start hidden; scroll-driven effects are primed from the
    /// current scroll position.
    pub fn initial(&mut self, ctx: &Context) -> Option<StyleCommand> {
        match self.effect {
            Effect::FadeReveal(config) => {
                let cmd = self.transform_command(self.reveal.state(&config));
                Some(self.record(cmd))
            }
            Effect::Parallax(_) | Effect::ScrollProgress { .. } | Effect::StepActivation(_) => {
                let signal = Signal::Scroll(ctx.viewport.scroll_sample());
                self.feed(&signal, ctx).ok().flatten()
            }
            _ => None,
        }
    }

    /// Map one signal. On an invalid sample nothing changes and the element
    /// keeps its last good state.
    pub fn feed(
        &mut self,
        signal: &Signal,
        ctx: &Context,
    ) -> Result<Option<StyleCommand>, SampleError> {
        mappers::validate(signal)?;
        if signal.kind() != self.effect.signal_kind() {
            return Ok(None);
        }
        let cmd = match (self.effect, signal) {
            (Effect::MagneticPull(config), Signal::PointerMove(sample)) => {
                self.hover(ctx.bounds.contains(sample.position()), || {
                    magnetic::map_magnetic(sample, ctx.bounds.center(), &config)
                })
                .map(|state| self.transform_command(state))
            }
            (Effect::Tilt(config), Signal::PointerMove(sample)) => self
                .hover(ctx.bounds.contains(sample.position()), || {
                    tilt::map_tilt(sample, &ctx.bounds, &config)
                })
                .map(|state| self.transform_command(state)),
            (Effect::Glow(config), Signal::PointerMove(sample)) => {
                if ctx.bounds.contains(sample.position()) {
                    glow::map_glow(sample, &ctx.bounds).map(|position| StyleCommand::Glow {
                        position,
                        radius_px: config.radius_px,
                    })
                } else {
                    None
                }
            }
            (effect, Signal::PointerLeave) if effect.is_hover_gated() => {
                self.hovering = false;
                Some(self.transform_command(TransformState::IDENTITY))
            }
            (Effect::CursorFollow, Signal::PointerMove(sample)) => {
                Some(self.transform_command(cursor::map_cursor(sample)))
            }
            (Effect::PointerParallax(config), Signal::PointerMove(sample)) => {
                let state = grid::map_pointer_parallax(sample, &ctx.viewport.size, &config);
                Some(self.transform_command(state))
            }
            (Effect::Parallax(config), Signal::Scroll(sample)) => {
                let state = parallax::map_parallax(sample, ctx.document_top, &config);
                Some(self.transform_command(state))
            }
            (Effect::ScrollProgress { axis }, Signal::Scroll(sample)) => {
                Some(StyleCommand::Progress {
                    axis,
                    percent: progress::map_progress(sample),
                })
            }
            (Effect::StepActivation(config), Signal::Scroll(sample)) => {
                let fraction = steps::region_fraction(&ctx.bounds, sample.viewport_height_px);
                Some(StyleCommand::Steps(steps::map_steps(fraction, &config)))
            }
            (Effect::FadeReveal(config), Signal::Visibility(sample)) => self
                .reveal
                .observe(sample, &config)
                .map(|state| self.transform_command(state)),
            _ => None,
        };
        Ok(cmd.map(|cmd| self.record(cmd)))
    }

    /// Map while the pointer is over the element; reset once on exit.
    fn hover(
        &mut self,
        inside: bool,
        map: impl FnOnce() -> TransformState,
    ) -> Option<TransformState> {
        let was_inside = std::mem::replace(&mut self.hovering, inside);
        match (was_inside, inside) {
            (_, true) => Some(map()),
            (true, false) => Some(TransformState::IDENTITY),
            (false, false) => None,
        }
    }

    fn transform_command(&self, state: TransformState) -> StyleCommand {
        let (perspective_px, order) = match self.effect {
            Effect::Tilt(config) => (Some(config.perspective_px), TransformOrder::TranslateRotate),
            // The grid moves within its tilted plane.
            Effect::PointerParallax(config) => {
                (Some(config.perspective_px), TransformOrder::RotateTranslate)
            }
            _ => (None, TransformOrder::TranslateRotate),
        };
        StyleCommand::Transform {
            state: state.sanitized(),
            perspective_px,
            order,
        }
    }

    fn record(&mut self, cmd: StyleCommand) -> StyleCommand {
        if let Some(state) = cmd.transform_state() {
            self.transform = state;
        }
        self.last = Some(cmd);
        cmd
    }
}
