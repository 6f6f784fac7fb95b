use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use kinetic_protocol::{StyleCommand, TransformState, Transition};

use crate::css;
use crate::scope::ElementId;

/// Writes mapped state onto an element's presentation layer.
///
/// Implementations set the target state and rely on the host's transition
/// machinery (configured from `transition`) to interpolate toward it.
pub trait Applier {
    fn apply(&mut self, element: ElementId, command: &StyleCommand, transition: &Transition);

    /// Forget an element after it unmounts.
    fn release(&mut self, _element: ElementId) {}
}

pub type SharedApplier = Rc<RefCell<dyn Applier>>;

/// The rendered inline style of one element.
pub type InlineStyle = BTreeMap<&'static str, String>;

/// In-memory presentation layer: keeps the rendered style of each element
/// plus the last command written to it. Used by native hosts and tests.
#[derive(Debug, Default)]
pub struct StyleSurface {
    styles: HashMap<ElementId, InlineStyle>,
    last: HashMap<ElementId, StyleCommand>,
    writes: usize,
}

impl StyleSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self::new()))
    }

    pub fn style(&self, element: ElementId) -> Option<&InlineStyle> {
        self.styles.get(&element)
    }

    pub fn property(&self, element: ElementId, name: &str) -> Option<&str> {
        self.styles.get(&element)?.get(name).map(String::as_str)
    }

    pub fn last_command(&self, element: ElementId) -> Option<&StyleCommand> {
        self.last.get(&element)
    }

    /// The transform most recently written to `element`, identity if none.
    pub fn transform(&self, element: ElementId) -> TransformState {
        self.last
            .get(&element)
            .and_then(StyleCommand::transform_state)
            .unwrap_or_default()
    }

    /// Total number of `apply` calls, across all elements.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl Applier for StyleSurface {
    fn apply(&mut self, element: ElementId, command: &StyleCommand, transition: &Transition) {
        let style = self.styles.entry(element).or_default();
        for (property, value) in css::declarations(command, transition) {
            style.insert(property, value);
        }
        self.last.insert(element, *command);
        self.writes += 1;
    }

    fn release(&mut self, element: ElementId) {
        self.styles.remove(&element);
        self.last.remove(&element);
    }
}
