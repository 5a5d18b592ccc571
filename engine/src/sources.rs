use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::creature::Creature;
use crate::definition::Definition;
use crate::error::Result;

/// Pull-based lookup of the latest definition for a creature name.
/// Implementations must be side-effect free.
pub trait DefinitionSource {
    fn lookup(&self, name: &str) -> Option<Definition>;
}

/// Oldest provider release whose definitions we understand.
pub const MIN_PROVIDER_MAJOR: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderVersion {
    pub major: u32,
    #[serde(default)]
    pub minor: u32,
    #[serde(default)]
    pub patch: u32,
}

/// The external bestiary. Handed to the reconciler explicitly; nothing reaches
/// for it through global state.
pub trait BestiaryProvider: DefinitionSource {
    /// `None` while the provider is not loaded.
    fn version(&self) -> Option<ProviderVersion>;

    /// Every record the provider knows, players included.
    fn creatures(&self) -> Vec<Definition>;

    /// Loaded and recent enough to use.
    fn is_available(&self) -> bool {
        self.version().is_some_and(|v| v.major >= MIN_PROVIDER_MAJOR)
    }

    /// Monsters only: no players, nothing opted out of bestiary listings.
    fn monsters(&self) -> Vec<Definition> {
        self.creatures()
            .into_iter()
            .filter(|d| !d.is_player() && d.bestiary != Some(false))
            .collect()
    }

    fn players(&self) -> Vec<Definition> {
        self.creatures().into_iter().filter(Definition::is_player).collect()
    }
}

/// Resolves a player by name to the richest definition the roster knows.
pub trait PlayerRoster {
    fn player_by_name(&self, name: &str) -> Option<Creature>;
}

/// A roster with no players; restores fall back to the snapshot.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRoster;

impl PlayerRoster for NoRoster {
    fn player_by_name(&self, _name: &str) -> Option<Creature> {
        None
    }
}

/// In-memory bestiary keyed by creature name, loadable from YAML or JSON lists.
#[derive(Debug, Clone)]
pub struct StaticBestiary {
    entries: IndexMap<String, Definition>,
    version: Option<ProviderVersion>,
}

impl Default for StaticBestiary {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
            version: Some(ProviderVersion {
                major: MIN_PROVIDER_MAJOR,
                minor: 0,
                patch: 0,
            }),
        }
    }
}

impl StaticBestiary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_definitions(defs: impl IntoIterator<Item = Definition>) -> Self {
        let mut bestiary = Self::default();
        for def in defs {
            bestiary.insert(def);
        }
        bestiary
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let defs: Vec<Definition> = serde_yaml::from_str(text)?;
        Ok(Self::from_definitions(defs))
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let defs: Vec<Definition> = serde_json::from_str(text)?;
        Ok(Self::from_definitions(defs))
    }

    /// Simulates a provider that is missing or too old.
    pub fn with_version(mut self, version: Option<ProviderVersion>) -> Self {
        self.version = version;
        self
    }

    /// Replaces any existing entry with the same name.
    pub fn insert(&mut self, def: Definition) -> Option<Definition> {
        self.entries.insert(def.name.clone(), def)
    }

    pub fn remove(&mut self, name: &str) -> Option<Definition> {
        self.entries.shift_remove(name)
    }

    pub fn names(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl DefinitionSource for StaticBestiary {
    fn lookup(&self, name: &str) -> Option<Definition> {
        self.entries.get(name).cloned()
    }
}

impl BestiaryProvider for StaticBestiary {
    fn version(&self) -> Option<ProviderVersion> {
        self.version
    }

    fn creatures(&self) -> Vec<Definition> {
        self.entries.values().cloned().collect()
    }
}
