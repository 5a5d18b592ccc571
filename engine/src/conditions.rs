use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::new_id;

/// The built-in 5e conditions. Ids are stable so persisted references survive upgrades.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionKind {
    Blinded,
    Charmed,
    Deafened,
    Exhaustion,
    Frightened,
    Grappled,
    Incapacitated,
    Invisible,
    Paralyzed,
    Petrified,
    Poisoned,
    Prone,
    Restrained,
    Stunned,
    Unconscious,
}

impl ConditionKind {
    pub const ALL: [ConditionKind; 15] = [
        ConditionKind::Blinded,
        ConditionKind::Charmed,
        ConditionKind::Deafened,
        ConditionKind::Exhaustion,
        ConditionKind::Frightened,
        ConditionKind::Grappled,
        ConditionKind::Incapacitated,
        ConditionKind::Invisible,
        ConditionKind::Paralyzed,
        ConditionKind::Petrified,
        ConditionKind::Poisoned,
        ConditionKind::Prone,
        ConditionKind::Restrained,
        ConditionKind::Stunned,
        ConditionKind::Unconscious,
    ];

    pub fn name(self) -> &'static str {
        use ConditionKind::*;
        match self {
            Blinded => "Blinded",
            Charmed => "Charmed",
            Deafened => "Deafened",
            Exhaustion => "Exhaustion",
            Frightened => "Frightened",
            Grappled => "Grappled",
            Incapacitated => "Incapacitated",
            Invisible => "Invisible",
            Paralyzed => "Paralyzed",
            Petrified => "Petrified",
            Poisoned => "Poisoned",
            Prone => "Prone",
            Restrained => "Restrained",
            Stunned => "Stunned",
            Unconscious => "Unconscious",
        }
    }

    pub fn id(self) -> String {
        format!("condition-{}", self.name().to_lowercase())
    }

    pub fn description(self) -> &'static str {
        use ConditionKind::*;
        match self {
            Blinded => "Can't see; attacks against it have advantage, its attacks have disadvantage.",
            Charmed => "Can't attack the charmer; the charmer has advantage on social checks against it.",
            Deafened => "Can't hear and automatically fails checks that require hearing.",
            Exhaustion => "Cumulative levels of penalties; six levels is death.",
            Frightened => "Disadvantage on checks and attacks while the source is in sight; can't move closer to it.",
            Grappled => "Speed becomes 0.",
            Incapacitated => "Can't take actions or reactions.",
            Invisible => "Can't be seen without magic; its attacks have advantage, attacks against it disadvantage.",
            Paralyzed => "Incapacitated, can't move or speak; melee hits within 5 feet are critical.",
            Petrified => "Turned to stone; resistant to all damage and immune to poison and disease.",
            Poisoned => "Disadvantage on attack rolls and ability checks.",
            Prone => "Melee attacks against it have advantage, ranged attacks disadvantage.",
            Restrained => "Speed 0; attacks against it have advantage, its attacks and Dex saves have disadvantage.",
            Stunned => "Incapacitated, can't move, fails Str and Dex saves.",
            Unconscious => "Incapacitated and prone, drops what it holds; melee hits within 5 feet are critical.",
        }
    }

    /// Conditions that stack in levels start at one.
    pub fn starting_amount(self) -> Option<i32> {
        match self {
            ConditionKind::Exhaustion => Some(1),
            _ => None,
        }
    }

    pub fn condition(self) -> Condition {
        Condition {
            id: self.id(),
            name: self.name().to_string(),
            description: Some(self.description().to_string()),
            amount: self.starting_amount(),
        }
    }
}

/// A status effect applied to a creature. Identity is `id`; two conditions with the
/// same `name` and `amount` are treated as the same effect when adding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<i32>,
}

impl Condition {
    /// Stand-in for a name nothing in the registry knows about.
    pub fn ad_hoc(name: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            description: None,
            amount: None,
        }
    }

    pub fn same_effect(&self, other: &Condition) -> bool {
        self.name == other.name && self.amount == other.amount
    }
}

/// A user-defined condition as stored in settings; older data may lack an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomCondition {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub amount: Option<i32>,
}

/// Built-in catalog plus any custom conditions; resolves persisted names back to records.
#[derive(Debug, Clone)]
pub struct ConditionRegistry {
    builtin: Vec<Condition>,
    custom: Vec<Condition>,
}

impl Default for ConditionRegistry {
    fn default() -> Self {
        Self {
            builtin: ConditionKind::ALL.iter().map(|k| k.condition()).collect(),
            custom: Vec::new(),
        }
    }
}

impl ConditionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with custom conditions. Missing ids are backfilled from a built-in
    /// of the same name, else freshly generated.
    pub fn with_custom(custom: &[CustomCondition]) -> Self {
        let mut registry = Self::default();
        for c in custom {
            let id = c
                .id
                .clone()
                .or_else(|| registry.builtin_by_name(&c.name).map(|b| b.id.clone()))
                .unwrap_or_else(new_id);
            registry.custom.push(Condition {
                id,
                name: c.name.clone(),
                description: c.description.clone(),
                amount: c.amount,
            });
        }
        registry
    }

    fn builtin_by_name(&self, name: &str) -> Option<&Condition> {
        self.builtin.iter().find(|c| c.name == name)
    }

    /// Exact name match, built-ins first.
    pub fn resolve_by_name(&self, name: &str) -> Option<&Condition> {
        self.builtin_by_name(name)
            .or_else(|| self.custom.iter().find(|c| c.name == name))
    }

    /// Never fails: unknown names become ad-hoc conditions.
    pub fn resolve_or_ad_hoc(&self, name: &str) -> Condition {
        match self.resolve_by_name(name) {
            Some(c) => c.clone(),
            None => {
                tracing::debug!(condition = name, "unknown condition name; synthesizing");
                Condition::ad_hoc(name)
            }
        }
    }

    pub fn custom(&self) -> &[Condition] {
        &self.custom
    }

    /// Custom conditions in their settings shape, ids filled in.
    pub fn custom_for_settings(&self) -> Vec<CustomCondition> {
        self.custom
            .iter()
            .map(|c| CustomCondition {
                id: Some(c.id.clone()),
                name: c.name.clone(),
                description: c.description.clone(),
                amount: c.amount,
            })
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Condition> {
        self.builtin.iter().chain(self.custom.iter())
    }
}

/// Ordered set of conditions keyed by id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusSet {
    entries: IndexMap<String, Condition>,
}

impl StatusSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds unless an entry with the same name and amount is already present.
    pub fn add(&mut self, condition: Condition) -> bool {
        if self.entries.values().any(|c| c.same_effect(&condition)) {
            return false;
        }
        self.entries.insert(condition.id.clone(), condition);
        true
    }

    /// Set semantics by id only; used when restoring persisted state.
    pub(crate) fn insert(&mut self, condition: Condition) {
        self.entries.insert(condition.id.clone(), condition);
    }

    pub fn remove(&mut self, id: &str) -> Option<Condition> {
        self.entries.shift_remove(id)
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.entries.values().any(|c| c.name == name)
    }

    pub fn names(&self) -> Vec<String> {
        self.entries.values().map(|c| c.name.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Condition> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
