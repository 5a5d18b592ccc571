use crate::conditions::{Condition, StatusSet};
use crate::definition::Definition;
use crate::new_id;
use crate::numeric::{coerce_hp, ArmorClass, ChallengeRating, Modifier, NumberInput, Source};
use crate::patch::CreaturePatch;

/// One combatant's live state.
///
/// `max`/`ac` are the baseline values taken from the definition, `current_max`/
/// `current_ac` the values in effect for this encounter. `hp` never exceeds
/// `current_max`; every setter re-clamps.
#[derive(Debug, Clone, PartialEq)]
pub struct Creature {
    pub id: String,
    pub name: String,
    pub display: Option<String>,
    pub number: u32,
    pub initiative: i32,
    pub static_initiative: bool,
    pub modifier: Modifier,

    pub max: i32,
    pub current_max: i32,
    pub hp: i32,
    pub temp: i32,
    pub ac: Option<ArmorClass>,
    pub current_ac: Option<ArmorClass>,

    pub status: StatusSet,

    pub player: bool,
    pub friendly: bool,
    pub enabled: bool,
    pub hidden: bool,
    pub active: bool,

    pub note: Option<String>,
    pub path: Option<String>,
    pub marker: Option<String>,
    pub source: Option<Source>,
    pub level: Option<i32>,
    pub cr: Option<ChallengeRating>,
    pub xp: Option<i64>,
    pub hit_dice: Option<String>,
    pub roll_hp: Option<bool>,
    pub image: Option<String>,
    pub image_url: Option<String>,
    pub statblock_link: Option<String>,
}

impl Creature {
    /// Build a combatant from a definition. `initiative` is used unless the
    /// definition carries its own.
    pub fn new(def: &Definition, initiative: i32) -> Self {
        let max = coerce_hp(def.raw_max_hp());
        let hp = def
            .raw_current_hp()
            .and_then(NumberInput::to_i32)
            .unwrap_or(max)
            .min(max);

        Self {
            id: def.id.clone().unwrap_or_else(new_id),
            name: def.name.clone(),
            display: def.display.clone(),
            number: 0,
            initiative: def
                .initiative
                .as_ref()
                .and_then(NumberInput::to_i32)
                .unwrap_or(initiative),
            static_initiative: def.static_initiative.unwrap_or(false),
            modifier: def.resolved_modifier(),
            max,
            current_max: max,
            hp,
            temp: 0,
            ac: def.ac.clone(),
            current_ac: def.ac.clone(),
            status: StatusSet::new(),
            player: def.is_player(),
            friendly: def.friendly.unwrap_or(false),
            enabled: true,
            hidden: def.hidden.unwrap_or(false),
            active: def.active.unwrap_or(false),
            note: def.note.clone(),
            path: def.path.clone(),
            marker: def.marker.clone(),
            source: def.source.clone(),
            level: def.level_value(),
            cr: def.cr.clone(),
            xp: def.xp_value(),
            hit_dice: def.hit_dice_text().map(str::to_string),
            roll_hp: def.roll_hp,
            image: def.image.clone(),
            image_url: def.image_url.clone(),
            statblock_link: def.statblock_link.clone(),
        }
    }

    pub fn from_definition(def: &Definition) -> Self {
        Self::new(def, 0)
    }

    /// Same stats under a fresh id, for adding another copy to a combat.
    pub fn duplicate(&self) -> Self {
        let mut def = Definition::from(&self.to_snapshot());
        def.id = None;
        Self::new(&def, self.initiative)
    }

    /// Apply only what the patch carries. Re-applying the same patch is a no-op.
    pub fn update(&mut self, patch: &CreaturePatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(modifier) = &patch.modifier {
            self.modifier = modifier.clone();
        }
        if let Some(raw) = &patch.max_hp {
            self.set_max_hp(raw.as_ref());
        }
        if let Some(raw) = &patch.current_hp {
            self.set_current_hp(raw);
        }
        if let Some(ac) = &patch.ac {
            self.ac = Some(ac.clone());
            self.current_ac = Some(ac.clone());
        }
        if let Some(note) = &patch.note {
            self.note = Some(note.clone());
        }
        if let Some(level) = patch.level {
            self.level = Some(level);
        }
        if let Some(player) = patch.player {
            self.player = player;
        }
        if let Some(link) = &patch.statblock_link {
            self.statblock_link = link.clone();
        }
        if let Some(marker) = &patch.marker {
            self.marker = Some(marker.clone());
        }
        if let Some(source) = &patch.source {
            self.source = Some(source.clone());
        }
        if let Some(cr) = &patch.cr {
            self.cr = Some(cr.clone());
        }
        if let Some(xp) = patch.xp {
            self.xp = Some(xp);
        }
        if let Some(hit_dice) = &patch.hit_dice {
            self.hit_dice = Some(hit_dice.clone());
        }
        if let Some(image) = &patch.image {
            self.image = image.clone();
        }
        if let Some(image_url) = &patch.image_url {
            self.image_url = image_url.clone();
        }
        if let Some(current_max) = patch.current_max {
            self.current_max = current_max;
            self.clamp_hp();
        }
        if let Some(current_ac) = &patch.current_ac {
            self.current_ac = Some(current_ac.clone());
        }
    }

    fn set_max_hp(&mut self, raw: Option<&NumberInput>) {
        let max = coerce_hp(raw);
        self.max = max;
        self.current_max = max;
        self.clamp_hp();
    }

    fn set_current_hp(&mut self, raw: &NumberInput) {
        if let Some(hp) = raw.to_i32() {
            self.hp = hp;
            self.clamp_hp();
        }
    }

    pub(crate) fn clamp_hp(&mut self) {
        if self.hp > self.current_max {
            self.hp = self.current_max;
        }
    }

    pub fn add_condition(&mut self, condition: Condition) -> bool {
        self.status.add(condition)
    }

    pub fn remove_condition(&mut self, condition: &Condition) -> Option<Condition> {
        self.status.remove(&condition.id)
    }

    pub fn ac_synced(&self) -> bool {
        self.ac == self.current_ac
    }

    pub fn max_hp_synced(&self) -> bool {
        self.max == self.current_max
    }

    /// Display name, with the copy number appended for duplicates.
    pub fn get_name(&self) -> String {
        let base = self.display.as_deref().unwrap_or(&self.name);
        if self.number > 0 {
            format!("{} {}", base, self.number)
        } else {
            base.to_string()
        }
    }

    /// `#anchor` links point into the creature's note.
    pub fn statblock_link(&self) -> Option<String> {
        let link = self.statblock_link.as_deref()?;
        if link.starts_with('#') {
            Some(format!(
                "[{}]({}{})",
                self.name,
                self.note.as_deref().unwrap_or_default(),
                link
            ))
        } else {
            Some(link.to_string())
        }
    }

    /// "hp+temp/max", or nothing for creatures without HP.
    pub fn hp_display(&self) -> Option<String> {
        if self.current_max == 0 {
            return None;
        }
        Some(format!("{}/{}", self.hp + self.temp, self.current_max))
    }
}
