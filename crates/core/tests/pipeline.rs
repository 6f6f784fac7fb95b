//! Integration test: drive whole pages through sampler → binding → surface
//! and check what ends up in each element's inline style.

use std::cell::RefCell;
use std::rc::Rc;

use kinetic_core::{
    ConfigError, EffectBinding, ElementScope, Preset, PresetTable, SignalSampler, StyleSurface,
};
use kinetic_protocol::{
    PointerSample, Rect, ScrollSample, Signal, StyleCommand, ViewportSize, VisibilitySample,
};

struct Page {
    sampler: SignalSampler,
    surface: Rc<RefCell<StyleSurface>>,
}

impl Page {
    fn new() -> Self {
        let sampler = SignalSampler::new();
        sampler
            .set_viewport(ViewportSize::new(1280.0, 800.0))
            .expect("valid viewport");
        Self {
            sampler,
            surface: StyleSurface::shared(),
        }
    }

    fn bind(&self, scope: &ElementScope, preset: &Preset) -> EffectBinding {
        EffectBinding::bind(&self.sampler, scope, preset, self.surface.clone())
            .expect("builtin preset binds")
    }

    fn pointer(&self, x: f64, y: f64) {
        self.sampler
            .dispatch(&Signal::PointerMove(PointerSample::at(x, y)));
    }

    fn scroll(&self, offset: f64) {
        self.sampler
            .dispatch(&Signal::Scroll(ScrollSample::new(offset, 800.0, 4800.0)));
    }

    fn style(&self, scope: &ElementScope, property: &str) -> Option<String> {
        self.surface
            .borrow()
            .property(scope.id(), property)
            .map(str::to_string)
    }
}

#[test]
fn magnetic_button_and_label_pull_together() {
    let page = Page::new();
    let button = page.sampler.mount(Rect::new(100.0, 100.0, 200.0, 60.0));
    let label = page.sampler.mount(Rect::new(160.0, 120.0, 80.0, 20.0));
    let _b = page.bind(&button, &Preset::magnetic_pull());
    let _l = EffectBinding::bind_anchored(
        &page.sampler,
        &label,
        &button,
        &Preset::magnetic_content(),
        page.surface.clone(),
    )
    .expect("anchored binding");

    // Button centre is (200, 130).
    page.pointer(250.0, 140.0);
    assert_eq!(
        page.style(&button, "transform").as_deref(),
        Some("translate(15px, 3px)")
    );
    assert_eq!(
        page.style(&label, "transform").as_deref(),
        Some("translate(7.5px, 1.5px)")
    );
    assert_eq!(
        page.style(&button, "transition").as_deref(),
        Some("transform 200ms ease-in-out 0ms, opacity 200ms ease-in-out 0ms")
    );

    // Pointer leaves the button: both return to rest.
    page.pointer(900.0, 700.0);
    assert!(page.surface.borrow().transform(button.id()).is_identity());
    assert!(page.surface.borrow().transform(label.id()).is_identity());
}

#[test]
fn repeated_sample_renders_identical_style() {
    let page = Page::new();
    let card = page.sampler.mount(Rect::new(0.0, 0.0, 400.0, 300.0));
    let _t = page.bind(&card, &Preset::tilt());

    page.pointer(300.0, 100.0);
    let first = page.surface.borrow().style(card.id()).cloned();
    page.pointer(300.0, 100.0);
    let second = page.surface.borrow().style(card.id()).cloned();
    assert!(first.is_some());
    assert_eq!(first, second);
}

#[test]
fn tilt_resets_when_pointer_leaves_document() {
    let page = Page::new();
    let card = page.sampler.mount(Rect::new(0.0, 0.0, 400.0, 300.0));
    let tilt = page.bind(&card, &Preset::tilt());

    page.pointer(400.0, 0.0);
    let t = tilt.transform();
    assert_eq!(t.rotate_y_deg, 10.0);
    assert_eq!(t.rotate_x_deg, 10.0);

    page.sampler.dispatch(&Signal::PointerLeave);
    assert_eq!(
        page.style(&card, "transform").as_deref(),
        Some("perspective(1000px) translate(0px, 0px) rotateX(0deg) rotateY(0deg)")
    );
}

#[test]
fn reading_progress_tracks_scroll() {
    let page = Page::new();
    let bar = page.sampler.mount(Rect::new(0.0, 0.0, 1280.0, 4.0));
    let _p = page.bind(&bar, &Preset::scroll_progress());

    // Primed at mount from the initial scroll position.
    assert_eq!(page.style(&bar, "width").as_deref(), Some("0%"));
    page.scroll(2000.0);
    assert_eq!(page.style(&bar, "width").as_deref(), Some("50%"));
    page.scroll(4000.0);
    assert_eq!(page.style(&bar, "width").as_deref(), Some("100%"));

    // A page shorter than the viewport has nothing to scroll.
    page.sampler
        .dispatch(&Signal::Scroll(ScrollSample::new(0.0, 800.0, 600.0)));
    assert_eq!(page.style(&bar, "width").as_deref(), Some("0%"));
}

#[test]
fn process_timeline_lights_steps_in_order() {
    let page = Page::new();
    let region = page.sampler.mount(Rect::new(0.0, 0.0, 1280.0, 1600.0));
    let _s = page.bind(&region, &Preset::step_activation(4));

    // Host re-measures before each scroll: bottom edge at 400px of 800px.
    region.set_bounds(Rect::new(0.0, -1200.0, 1280.0, 1600.0));
    page.scroll(1200.0);
    assert_eq!(
        page.style(&region, "--kinetic-active-step").as_deref(),
        Some("2")
    );
    assert_eq!(
        page.style(&region, "--kinetic-step-line").as_deref(),
        Some("66.667%")
    );

    // Region scrolled fully past: last step stays lit.
    region.set_bounds(Rect::new(0.0, -1700.0, 1280.0, 1600.0));
    page.scroll(1700.0);
    assert_eq!(
        page.style(&region, "--kinetic-active-step").as_deref(),
        Some("3")
    );
}

#[test]
fn section_reveal_happens_once() {
    let page = Page::new();
    let section = page.sampler.mount(Rect::new(0.0, 900.0, 1280.0, 600.0));
    let _r = page.bind(&section, &Preset::section_reveal());

    assert_eq!(page.style(&section, "opacity").as_deref(), Some("0"));
    assert_eq!(
        page.style(&section, "transform").as_deref(),
        Some("translate(0px, 80px)")
    );

    // Below the 30% threshold: still hidden.
    page.sampler.dispatch_to(
        &section,
        &Signal::Visibility(VisibilitySample::new(true, 0.2)),
    );
    assert_eq!(page.style(&section, "opacity").as_deref(), Some("0"));

    for sample in [
        VisibilitySample::new(true, 0.5),
        VisibilitySample::hidden(),
        VisibilitySample::new(true, 0.5),
    ] {
        page.sampler
            .dispatch_to(&section, &Signal::Visibility(sample));
        assert_eq!(page.style(&section, "opacity").as_deref(), Some("1"));
        assert_eq!(
            page.style(&section, "transform").as_deref(),
            Some("translate(0px, 0px)")
        );
    }
}

#[test]
fn split_heading_words_reveal_with_stagger() {
    let page = Page::new();
    let words: Vec<ElementScope> = (0..3)
        .map(|i| page.sampler.mount(Rect::new(f64::from(i) * 80.0, 200.0, 70.0, 40.0)))
        .collect();
    let _bindings: Vec<EffectBinding> = words
        .iter()
        .zip(Preset::split_text(words.len(), 0.0))
        .map(|(word, preset)| page.bind(word, &preset))
        .collect();

    for word in &words {
        page.sampler
            .dispatch_to(word, &Signal::Visibility(VisibilitySample::visible()));
    }
    let delays: Vec<Option<String>> = words
        .iter()
        .map(|w| page.style(w, "transition"))
        .collect();
    assert_eq!(
        delays,
        vec![
            Some("transform 600ms ease 0ms, opacity 600ms ease 0ms".to_string()),
            Some("transform 600ms ease 50ms, opacity 600ms ease 50ms".to_string()),
            Some("transform 600ms ease 100ms, opacity 600ms ease 100ms".to_string()),
        ]
    );
}

#[test]
fn unbound_and_unmounted_elements_stop_updating() {
    let page = Page::new();
    let ring = page.sampler.mount(Rect::default());
    let dot = page.sampler.mount(Rect::default());
    let ring_binding = page.bind(&ring, &Preset::cursor_ring());
    let _dot_binding = page.bind(&dot, &Preset::cursor_dot());

    page.pointer(10.0, 20.0);
    let writes = page.surface.borrow().writes();
    assert_eq!(writes, 2);

    ring_binding.unbind();
    assert!(page.surface.borrow().style(ring.id()).is_none());
    dot.detach();

    let report = page
        .sampler
        .dispatch(&Signal::PointerMove(PointerSample::at(500.0, 500.0)));
    assert_eq!(report.delivered, 0);
    assert_eq!(report.dropped, 1);
    assert_eq!(page.surface.borrow().writes(), writes);
    assert_eq!(page.sampler.active_count(), 0);
}

#[test]
fn corrupt_sample_keeps_last_good_style() {
    let page = Page::new();
    let ring = page.sampler.mount(Rect::default());
    let binding = page.bind(&ring, &Preset::cursor_ring());

    page.pointer(40.0, 50.0);
    let before = page.style(&ring, "transform");
    page.pointer(f64::INFINITY, 50.0);
    assert_eq!(page.style(&ring, "transform"), before);
    assert_eq!(binding.transform().translate_x, 40.0);
}

#[test]
fn host_table_overrides_and_bad_config_fails_at_bind() {
    let page = Page::new();
    let mut table = PresetTable::builtin();
    table
        .load_json(r#"{ "timeline": { "effect": { "step-activation": { "count": 5 } } } }"#)
        .expect("valid table");

    let region = page.sampler.mount(Rect::new(0.0, 0.0, 1280.0, 1600.0));
    let timeline = table.resolve("timeline").expect("known preset");
    let _s = page.bind(&region, &timeline);
    assert_eq!(
        page.style(&region, "--kinetic-step-count").as_deref(),
        Some("5")
    );

    let el = page.sampler.mount(Rect::default());
    let bad = Preset::fade_reveal(-50.0);
    let result = EffectBinding::bind(&page.sampler, &el, &bad, page.surface.clone());
    assert!(matches!(result, Err(ConfigError::Negative { .. })));
    assert!(page.surface.borrow().last_command(el.id()).is_none());
}

#[test]
fn glow_follows_pointer_inside_card_only() {
    let page = Page::new();
    let card = page.sampler.mount(Rect::new(100.0, 100.0, 300.0, 200.0));
    let _g = page.bind(&card, &Preset::glow_card());

    page.pointer(10.0, 10.0);
    assert!(page.surface.borrow().last_command(card.id()).is_none());

    page.pointer(150.0, 160.0);
    assert!(matches!(
        page.surface.borrow().last_command(card.id()),
        Some(StyleCommand::Glow { position, radius_px })
            if position.x == 50.0 && position.y == 60.0 && *radius_px == 192.0
    ));
}

#[test]
fn reveal_and_parallax_cannot_share_an_element() {
    let page = Page::new();
    let hero = page.sampler.mount(Rect::new(0.0, 900.0, 1280.0, 600.0));
    let reveal = page.bind(&hero, &Preset::fade_reveal(0.0));

    let parallax =
        EffectBinding::bind(&page.sampler, &hero, &Preset::parallax(0.5), page.surface.clone());
    assert!(matches!(parallax, Err(ConfigError::TransformOwned(id)) if id == hero.id()));

    // The rejected binding never wrote, and scrolling leaves the reveal alone.
    page.scroll(600.0);
    assert_eq!(page.style(&hero, "opacity").as_deref(), Some("0"));
    assert_eq!(
        page.style(&hero, "transform").as_deref(),
        Some("translate(0px, 20px)")
    );
    page.sampler
        .dispatch_to(&hero, &Signal::Visibility(VisibilitySample::visible()));
    assert_eq!(
        page.style(&hero, "transform").as_deref(),
        Some("translate(0px, 0px)")
    );

    // Once the reveal is gone the element is free to move with the scroll.
    reveal.unbind();
    let parallax = page.bind(&hero, &Preset::parallax(0.5));
    assert!(parallax.owns_transform());
}

#[test]
fn progress_bar_may_also_reveal() {
    let page = Page::new();
    let bar = page.sampler.mount(Rect::new(0.0, 0.0, 1280.0, 4.0));
    let _r = page.bind(&bar, &Preset::fade_reveal(0.0));
    let _p = page.bind(&bar, &Preset::scroll_progress());

    page.scroll(2000.0);
    assert_eq!(page.style(&bar, "width").as_deref(), Some("50%"));
    assert_eq!(page.style(&bar, "opacity").as_deref(), Some("0"));
}

#[test]
fn parallax_ignores_its_own_offset_when_remeasured() {
    let page = Page::new();
    let layer = page.sampler.mount(Rect::new(0.0, 200.0, 1280.0, 400.0));
    let _p = page.bind(&layer, &Preset::parallax(0.5));
    assert_eq!(
        page.style(&layer, "transform").as_deref(),
        Some("translate(0px, 100px)")
    );

    // The host re-measures mid-transition: half of the 100px offset shows
    // up in the rendered box, but the layout position has not moved.
    layer.set_bounds(Rect::new(0.0, 250.0, 1280.0, 400.0));
    for _ in 0..3 {
        page.scroll(0.0);
        assert_eq!(
            page.style(&layer, "transform").as_deref(),
            Some("translate(0px, 100px)")
        );
    }

    layer.set_bounds(Rect::new(0.0, 200.0, 1280.0, 400.0));
    page.scroll(100.0);
    assert_eq!(
        page.style(&layer, "transform").as_deref(),
        Some("translate(0px, 150px)")
    );
}
