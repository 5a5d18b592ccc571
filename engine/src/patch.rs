use serde::{Deserialize, Serialize};

use crate::numeric::{double_option, ArmorClass, ChallengeRating, Modifier, NumberInput, Source};

/// Partial update for a [`Creature`](crate::Creature).
///
/// `None` always means "leave untouched". For the fields where an explicit
/// `null` has its own meaning the type is `Option<Option<_>>`:
/// `max_hp: Some(None)` resets max HP to 0, `image: Some(None)` clears the image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreaturePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modifier: Option<Modifier>,

    /// Baseline max HP; also accepted under `hp`. Moves `max` and `current_max` together.
    #[serde(
        default,
        alias = "hp",
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_hp: Option<Option<NumberInput>>,
    /// Live HP; also accepted under `currentHP`. Empty or unparsable values are ignored.
    #[serde(default, alias = "currentHP", skip_serializing_if = "Option::is_none")]
    pub current_hp: Option<NumberInput>,
    /// Baseline AC; moves `ac` and `current_ac` together.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ac: Option<ArmorClass>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player: Option<bool>,
    #[serde(
        default,
        rename = "statblock-link",
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub statblock_link: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Source>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cr: Option<ChallengeRating>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xp: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hit_dice: Option<String>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub image: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<Option<String>>,

    /// In-effect max HP only; the baseline stays as it is.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_max: Option<i32>,
    /// In-effect AC only; the baseline stays as it is.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_ac: Option<ArmorClass>,
}

impl CreaturePatch {
    pub fn is_empty(&self) -> bool {
        *self == CreaturePatch::default()
    }
}
