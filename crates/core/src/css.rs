//! CSS renderer: converts a `StyleCommand` into the style declarations a
//! host writes onto the element.

use kinetic_protocol::{StyleCommand, TransformOrder, TransformState, Transition};

/// Custom properties the host stylesheet reads for step timelines and
/// glow cards.
pub const ACTIVE_STEP_VAR: &str = "--kinetic-active-step";
pub const STEP_COUNT_VAR: &str = "--kinetic-step-count";
pub const STEP_LINE_VAR: &str = "--kinetic-step-line";
pub const GLOW_X_VAR: &str = "--kinetic-glow-x";
pub const GLOW_Y_VAR: &str = "--kinetic-glow-y";

/// One `property: value` pair.
pub type Declaration = (&'static str, String);

/// Compose a transform into a single CSS `transform` value.
///
/// Components at their identity value are omitted except the translation,
/// so identity renders as `translate(0px, 0px)` rather than `none` and the
/// host can still interpolate back to rest.
pub fn transform_value(
    state: &TransformState,
    perspective_px: Option<f64>,
    order: TransformOrder,
) -> String {
    let state = state.sanitized();
    let translate = format!(
        "translate({}px, {}px)",
        num(state.translate_x),
        num(state.translate_y)
    );
    // 3D presets always spell out both rotations so a reset animates.
    let rotate = (perspective_px.is_some()
        || state.rotate_x_deg != 0.0
        || state.rotate_y_deg != 0.0)
        .then(|| {
            format!(
                "rotateX({}deg) rotateY({}deg)",
                num(state.rotate_x_deg),
                num(state.rotate_y_deg)
            )
        });

    let mut parts = Vec::with_capacity(4);
    if let Some(p) = perspective_px {
        parts.push(format!("perspective({}px)", num(p)));
    }
    match order {
        TransformOrder::TranslateRotate => {
            parts.push(translate);
            parts.extend(rotate);
        }
        TransformOrder::RotateTranslate => {
            parts.extend(rotate);
            parts.push(translate);
        }
    }
    if state.scale != 1.0 {
        parts.push(format!("scale({})", num(state.scale)));
    }
    parts.join(" ")
}

/// Declarations for `command`, including the `transition` that tells the
/// host how to interpolate toward it.
pub fn declarations(command: &StyleCommand, transition: &Transition) -> Vec<Declaration> {
    match command {
        StyleCommand::Transform {
            state,
            perspective_px,
            order,
        } => vec![
            ("transform", transform_value(state, *perspective_px, *order)),
            ("opacity", num(state.sanitized().opacity)),
            ("transition", transition_value(transition, &["transform", "opacity"])),
        ],
        StyleCommand::Reset => vec![
            (
                "transform",
                transform_value(&TransformState::IDENTITY, None, TransformOrder::default()),
            ),
            ("opacity", "1".to_string()),
            ("transition", transition_value(transition, &["transform", "opacity"])),
        ],
        StyleCommand::Progress { axis, percent } => {
            let property = axis.css_property();
            let percent = if percent.is_finite() {
                percent.clamp(0.0, 100.0)
            } else {
                0.0
            };
            vec![
                (property, format!("{}%", num(percent))),
                ("transition", transition_value(transition, &[property])),
            ]
        }
        StyleCommand::Steps(steps) => vec![
            (ACTIVE_STEP_VAR, steps.active_step.to_string()),
            (STEP_COUNT_VAR, steps.count.to_string()),
            (STEP_LINE_VAR, format!("{}%", num(steps.line_percent()))),
        ],
        StyleCommand::Glow {
            position,
            radius_px,
        } => vec![
            (GLOW_X_VAR, format!("{}px", num(position.x - radius_px))),
            (GLOW_Y_VAR, format!("{}px", num(position.y - radius_px))),
        ],
    }
}

fn transition_value(transition: &Transition, properties: &[&str]) -> String {
    if transition.is_instant() {
        return "none".to_string();
    }
    properties
        .iter()
        .map(|p| transition.to_css(p))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Format a number for CSS: three decimals at most, no `-0`.
fn num(v: f64) -> String {
    let v = (v * 1000.0).round() / 1000.0;
    let v = if v == 0.0 { 0.0 } else { v };
    format!("{v}")
}
