use serde::{Deserialize, Serialize};

use crate::conditions::ConditionRegistry;
use crate::creature::Creature;
use crate::definition::Definition;
use crate::numeric::{ArmorClass, ChallengeRating, Modifier, NumberInput};
use crate::sources::PlayerRoster;

/// Persisted shape of a combatant. Baseline and in-effect HP/AC sit under
/// separate keys; conditions are reduced to their names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatureState {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    #[serde(default)]
    pub initiative: i32,
    #[serde(default, rename = "static")]
    pub static_initiative: bool,
    #[serde(default)]
    pub modifier: Modifier,
    /// Baseline max HP.
    #[serde(default)]
    pub hp: Option<i32>,
    #[serde(default, rename = "currentMaxHP")]
    pub current_max_hp: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cr: Option<ChallengeRating>,
    #[serde(default)]
    pub ac: Option<ArmorClass>,
    #[serde(default, rename = "currentAC")]
    pub current_ac: Option<ArmorClass>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker: Option<String>,
    /// Live HP.
    #[serde(default, rename = "currentHP")]
    pub current_hp: Option<i32>,
    #[serde(default, rename = "tempHP")]
    pub temp_hp: Option<i32>,
    #[serde(default)]
    pub status: Vec<String>,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<i32>,
    #[serde(default)]
    pub player: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xp: Option<i64>,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub friendly: bool,
    #[serde(default, rename = "statblock-link", skip_serializing_if = "Option::is_none")]
    pub statblock_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hit_dice: Option<String>,
    #[serde(default, rename = "rollHP", skip_serializing_if = "Option::is_none")]
    pub roll_hp: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

fn enabled_by_default() -> bool {
    true
}

impl From<&CreatureState> for Definition {
    fn from(state: &CreatureState) -> Self {
        Definition {
            name: state.name.clone(),
            display: state.display.clone(),
            id: state.id.clone(),
            initiative: Some(NumberInput::from(state.initiative)),
            static_initiative: Some(state.static_initiative),
            modifier: Some(state.modifier.to_value()),
            hp: state.hp.map(NumberInput::from),
            current_hp_alt: state.current_hp.map(NumberInput::from),
            ac: state.ac.clone(),
            note: state.note.clone(),
            path: state.path.clone(),
            marker: state.marker.clone(),
            level: state.level.map(NumberInput::from),
            player: Some(state.player),
            friendly: Some(state.friendly),
            active: Some(state.active),
            hidden: Some(state.hidden),
            cr: state.cr.clone(),
            xp: state.xp.map(|xp| NumberInput::Number(xp.into())),
            hit_dice: state.hit_dice.as_deref().map(NumberInput::from),
            roll_hp: state.roll_hp,
            image: state.image.clone(),
            image_url: state.image_url.clone(),
            statblock_link: state.statblock_link.clone(),
            ..Default::default()
        }
    }
}

impl Creature {
    pub fn to_snapshot(&self) -> CreatureState {
        CreatureState {
            name: self.name.clone(),
            display: self.display.clone(),
            initiative: self.initiative,
            static_initiative: self.static_initiative,
            modifier: self.modifier.clone(),
            hp: Some(self.max),
            current_max_hp: Some(self.current_max),
            cr: self.cr.clone(),
            ac: self.ac.clone(),
            current_ac: self.current_ac.clone(),
            note: self.note.clone(),
            path: self.path.clone(),
            id: Some(self.id.clone()),
            marker: self.marker.clone(),
            current_hp: Some(self.hp),
            temp_hp: Some(self.temp),
            status: self.status.names(),
            enabled: self.enabled,
            level: self.level,
            player: self.player,
            xp: self.xp,
            active: self.active,
            hidden: self.hidden,
            friendly: self.friendly,
            statblock_link: self.statblock_link.clone(),
            hit_dice: self.hit_dice.clone(),
            roll_hp: self.roll_hp,
            image: self.image.clone(),
            image_url: self.image_url.clone(),
        }
    }

    /// Restore a combatant. Players prefer the roster's richer definition; the
    /// live combat values in the snapshot then win over whatever was resolved.
    pub fn from_snapshot(
        state: &CreatureState,
        roster: &dyn PlayerRoster,
        registry: &ConditionRegistry,
    ) -> Self {
        let mut creature = if state.player {
            match roster.player_by_name(&state.name) {
                Some(mut known) => {
                    known.initiative = state.initiative;
                    known
                }
                None => Creature::new(&Definition::from(state), state.initiative),
            }
        } else {
            Creature::new(&Definition::from(state), state.initiative)
        };

        creature.enabled = state.enabled;
        creature.temp = state.temp_hp.unwrap_or(0);
        if let Some(current_max) = state.current_max_hp {
            creature.current_max = current_max;
        }
        if let Some(hp) = state.current_hp {
            creature.hp = hp;
        }
        creature.clamp_hp();
        creature.current_ac = state.current_ac.clone();

        creature.status.clear();
        for name in &state.status {
            creature.status.insert(registry.resolve_or_ad_hoc(name));
        }
        creature.active = state.active;

        if state.image.is_some() {
            creature.image = state.image.clone();
        }
        if state.image_url.is_some() {
            creature.image_url = state.image_url.clone();
        }
        creature
    }
}
