use std::fmt;

use serde::{Deserialize, Serialize};

use crate::conditions::ConditionRegistry;
use crate::creature::Creature;
use crate::error::{Error, Result};
use crate::patch::CreaturePatch;
use crate::snapshot::CreatureState;
use crate::sources::PlayerRoster;

/// A saved encounter as persisted between sessions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncounterState {
    #[serde(default)]
    pub creatures: Vec<CreatureState>,
    /// Whether combat is running (as opposed to paused).
    #[serde(default)]
    pub state: bool,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub round: u32,
    #[serde(default)]
    pub log_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_log: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roll: Option<bool>,
    #[serde(default, rename = "rollHP", skip_serializing_if = "Option::is_none")]
    pub roll_hp: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image_prompt: Option<String>,
}

impl EncounterState {
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// The mutation target for everything that changes live combatants.
///
/// All writers (direct edits, reconciliation, note sync) go through
/// `update_creature` so no patch can be lost between two writers.
pub trait EncounterStore {
    /// False while no encounter is loaded.
    fn is_active(&self) -> bool;

    /// Combatants in turn order.
    fn ordered_creatures(&self) -> Vec<&Creature>;

    /// Apply a patch to the creature with this id. Returns false if there is none.
    fn update_creature(&mut self, id: &str, patch: &CreaturePatch) -> bool;

    /// Persist and tell listeners the encounter changed.
    fn persist_and_notify(&mut self);
}

type Listener = Box<dyn FnMut(&EncounterState)>;

/// The running encounter.
#[derive(Default)]
pub struct Tracker {
    pub name: String,
    pub round: u32,
    pub running: bool,
    pub log_file: Option<String>,
    creatures: Vec<Creature>,
    extra: EncounterState,
    active: bool,
    dirty: bool,
    listeners: Vec<Listener>,
}

impl fmt::Debug for Tracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tracker")
            .field("name", &self.name)
            .field("round", &self.round)
            .field("running", &self.running)
            .field("creatures", &self.creatures.len())
            .field("dirty", &self.dirty)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Tracker {
    /// An idle tracker: no encounter loaded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fresh encounter with the given combatants.
    pub fn start(name: impl Into<String>, creatures: Vec<Creature>) -> Self {
        Self {
            name: name.into(),
            round: 1,
            creatures,
            active: true,
            ..Default::default()
        }
    }

    pub fn from_state(
        state: &EncounterState,
        roster: &dyn PlayerRoster,
        registry: &ConditionRegistry,
    ) -> Self {
        let creatures = state
            .creatures
            .iter()
            .map(|c| Creature::from_snapshot(c, roster, registry))
            .collect();
        Self {
            name: state.name.clone(),
            round: state.round,
            running: state.state,
            log_file: state.log_file.clone(),
            creatures,
            extra: EncounterState {
                creatures: Vec::new(),
                ..state.clone()
            },
            active: true,
            ..Default::default()
        }
    }

    pub fn to_state(&self) -> EncounterState {
        EncounterState {
            creatures: self.creatures.iter().map(Creature::to_snapshot).collect(),
            state: self.running,
            name: self.name.clone(),
            round: self.round,
            log_file: self.log_file.clone(),
            ..self.extra.clone()
        }
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&EncounterState) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Unloads the encounter; the tracker goes idle.
    pub fn end(&mut self) {
        self.creatures.clear();
        self.active = false;
        self.running = false;
        self.dirty = true;
    }

    pub fn add(&mut self, creature: Creature) {
        self.creatures.push(creature);
        self.active = true;
        self.dirty = true;
    }

    pub fn remove(&mut self, id: &str) -> Option<Creature> {
        let idx = self.creatures.iter().position(|c| c.id == id)?;
        self.dirty = true;
        Some(self.creatures.remove(idx))
    }

    pub fn creatures(&self) -> &[Creature] {
        &self.creatures
    }

    pub fn creature(&self, id: &str) -> Option<&Creature> {
        self.creatures.iter().find(|c| c.id == id)
    }

    pub fn creature_by_name(&self, name: &str) -> Option<&Creature> {
        self.creatures.iter().find(|c| c.name == name)
    }

    /// Patch the first creature with this name.
    pub fn update_by_name(&mut self, name: &str, patch: &CreaturePatch) -> Result<()> {
        let id = self
            .creature_by_name(name)
            .map(|c| c.id.clone())
            .ok_or_else(|| Error::CreatureNotFound(name.to_string()))?;
        self.update_creature(&id, patch);
        Ok(())
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

impl EncounterStore for Tracker {
    fn is_active(&self) -> bool {
        self.active
    }

    fn ordered_creatures(&self) -> Vec<&Creature> {
        let mut ordered: Vec<&Creature> = self.creatures.iter().collect();
        ordered.sort_by(|a, b| b.initiative.cmp(&a.initiative));
        ordered
    }

    fn update_creature(&mut self, id: &str, patch: &CreaturePatch) -> bool {
        match self.creatures.iter_mut().find(|c| c.id == id) {
            Some(creature) => {
                creature.update(patch);
                self.dirty = true;
                true
            }
            None => false,
        }
    }

    fn persist_and_notify(&mut self) {
        let state = self.to_state();
        for listener in &mut self.listeners {
            listener(&state);
        }
        self.dirty = false;
    }
}
