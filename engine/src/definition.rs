use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ability_mod;
use crate::numeric::{ArmorClass, ChallengeRating, Modifier, NumberInput, Source};

/// A creature as authored outside of combat: a bestiary statblock, a homebrew
/// monster or a player entry from settings. Only the fields the tracker reads are
/// modelled; everything else in the record is ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Definition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initiative: Option<NumberInput>,
    #[serde(default, rename = "static", skip_serializing_if = "Option::is_none")]
    pub static_initiative: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modifier: Option<Value>,
    /// Ability scores, STR first.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<Vec<NumberInput>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hp: Option<NumberInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_hp: Option<NumberInput>,
    #[serde(default, rename = "maxHp", skip_serializing_if = "Option::is_none")]
    pub max_hp_alt: Option<NumberInput>,
    #[serde(default, rename = "currentHP", skip_serializing_if = "Option::is_none")]
    pub current_hp_alt: Option<NumberInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_hp: Option<NumberInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ac: Option<ArmorClass>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Source>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<NumberInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub friendly: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
    /// `false` keeps an entry out of bestiary listings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bestiary: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cr: Option<ChallengeRating>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xp: Option<NumberInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hit_dice: Option<NumberInput>,
    #[serde(default, rename = "rollHP", skip_serializing_if = "Option::is_none")]
    pub roll_hp: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, rename = "statblock-link", skip_serializing_if = "Option::is_none")]
    pub statblock_link: Option<String>,
}

impl Definition {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Baseline max HP field: `max_hp`, then `maxHp`, then `hp`.
    pub fn raw_max_hp(&self) -> Option<&NumberInput> {
        self.max_hp.as_ref().or(self.max_hp_alt.as_ref()).or(self.hp.as_ref())
    }

    /// Current HP field: `currentHP`, then `current_hp`, then `hp`.
    pub fn raw_current_hp(&self) -> Option<&NumberInput> {
        self.current_hp_alt
            .as_ref()
            .or(self.current_hp.as_ref())
            .or(self.hp.as_ref())
    }

    /// Explicit modifier when one is given (unusable values count as 0),
    /// otherwise the Dexterity score's ability modifier (score 10 when absent).
    pub fn resolved_modifier(&self) -> Modifier {
        if let Some(raw) = &self.modifier {
            return Modifier::from_value(raw).unwrap_or_default();
        }
        let dex = self
            .stats
            .as_ref()
            .filter(|stats| stats.len() > 1)
            .and_then(|stats| stats[1].to_i32())
            .unwrap_or(10);
        Modifier::Flat(ability_mod(dex))
    }

    /// `hit_dice` only counts when it is text such as "2d6+2".
    pub fn hit_dice_text(&self) -> Option<&str> {
        self.hit_dice.as_ref().and_then(NumberInput::as_text)
    }

    pub fn xp_value(&self) -> Option<i64> {
        self.xp.as_ref().and_then(NumberInput::to_i64)
    }

    pub fn level_value(&self) -> Option<i32> {
        self.level.as_ref().and_then(NumberInput::to_i32)
    }

    pub fn is_player(&self) -> bool {
        self.player.unwrap_or(false)
    }
}
