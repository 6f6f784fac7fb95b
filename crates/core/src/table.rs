use std::collections::BTreeMap;

use kinetic_protocol::{Label, Transition};
use log::debug;
use serde::Deserialize;

use crate::error::{ConfigError, EffectError, TableError};
use crate::preset::{Effect, Preset};

/// One entry of a preset table on the wire; the name comes from its key.
#[derive(Debug, Deserialize)]
struct TableEntry {
    effect: Effect,
    #[serde(default)]
    transition: Transition,
}

/// Named presets a host can look up by string.
///
/// Starts from the builtin catalogue; hosts layer their own tuning on top
/// with [`load_json`](Self::load_json).
#[derive(Debug, Clone, Default)]
pub struct PresetTable {
    presets: BTreeMap<Label, Preset>,
}

impl PresetTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builtin() -> Self {
        let mut table = Self::new();
        for preset in Preset::builtins() {
            table.insert(preset);
        }
        table
    }

    /// Parse a JSON object of `name → {effect, transition}` entries. Every
    /// entry is validated; the first invalid one fails the whole table.
    ///
    /// ```json
    /// {
    ///   "hero-cta": { "effect": { "magnetic-pull": { "pull_factor": 0.4 } } },
    ///   "timeline": {
    ///     "effect": { "step-activation": { "count": 5 } },
    ///     "transition": { "duration_ms": 700 }
    ///   }
    /// }
    /// ```
    pub fn from_json(json: &str) -> Result<Self, TableError> {
        let mut table = Self::new();
        table.load_json(json)?;
        Ok(table)
    }

    /// Merge entries from `json`, replacing presets of the same name.
    /// Returns how many entries were loaded. Nothing is merged on error.
    pub fn load_json(&mut self, json: &str) -> Result<usize, TableError> {
        let entries: BTreeMap<String, TableEntry> = serde_json::from_str(json)?;
        let mut loaded = Vec::with_capacity(entries.len());
        for (name, entry) in entries {
            let preset = Preset::new(name.as_str(), entry.effect, entry.transition);
            if let Err(source) = preset.validate() {
                return Err(TableError::Invalid { name, source });
            }
            loaded.push(preset);
        }
        let count = loaded.len();
        for preset in loaded {
            self.insert(preset);
        }
        debug!("preset table: loaded {count} entries");
        Ok(count)
    }

    pub fn insert(&mut self, preset: Preset) -> Option<Preset> {
        self.presets.insert(preset.name.clone(), preset)
    }

    pub fn get(&self, name: &str) -> Option<&Preset> {
        self.presets.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.presets.keys().map(Label::as_str)
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    /// Resolve a host-supplied preset reference: a name from this table, or an
    /// inline JSON preset object (`{"name": .., "effect": ..}`).
    pub fn resolve(&self, query: &str) -> Result<Preset, EffectError> {
        let query = query.trim();
        if query.starts_with('{') {
            let preset: Preset = serde_json::from_str(query).map_err(TableError::from)?;
            preset.validate()?;
            return Ok(preset);
        }
        self.get(query)
            .cloned()
            .ok_or_else(|| ConfigError::UnknownPreset(query.to_string()).into())
    }
}
