use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::conditions::{ConditionRegistry, CustomCondition};
use crate::definition::Definition;
use crate::encounter::EncounterState;
use crate::error::Result;
use crate::homebrew::{HomebrewStore, Party};

/// The tracker's saved data: roster, parties, custom conditions and saved encounters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerSettings {
    #[serde(default)]
    pub players: Vec<Definition>,
    #[serde(default)]
    pub parties: Vec<Party>,
    #[serde(default)]
    pub default_party: Option<String>,
    #[serde(default)]
    pub statuses: Vec<CustomCondition>,
    #[serde(default)]
    pub encounters: IndexMap<String, EncounterState>,
}

impl TrackerSettings {
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Registry including the custom statuses. Ids missing from older data are
    /// written back so they stay stable across loads.
    pub fn condition_registry(&mut self) -> ConditionRegistry {
        let registry = ConditionRegistry::with_custom(&self.statuses);
        if self.statuses.iter().any(|s| s.id.is_none()) {
            self.statuses = registry.custom_for_settings();
        }
        registry
    }

    pub fn homebrew(&self) -> HomebrewStore {
        HomebrewStore::new(
            self.players.clone(),
            self.parties.clone(),
            self.default_party.clone(),
        )
    }

    /// Copy the roster back for saving.
    pub fn store_homebrew(&mut self, homebrew: &HomebrewStore) {
        self.players = homebrew.players().to_vec();
        self.parties = homebrew.parties().to_vec();
        self.default_party = homebrew.default_party_name().map(str::to_string);
    }

    pub fn add_encounter(&mut self, name: impl Into<String>, encounter: EncounterState) {
        self.encounters.insert(name.into(), encounter);
    }

    pub fn remove_encounter(&mut self, name: &str) -> Option<EncounterState> {
        self.encounters.shift_remove(name)
    }
}
