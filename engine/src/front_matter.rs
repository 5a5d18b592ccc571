//! Player sync from a linked note's YAML front-matter.
//!
//! Front-matter is user-authored, so whatever it states wins over what the
//! tracker holds. Missing values fall back to the stored player entry.

use serde::Deserialize;
use serde_json::Value;

use crate::definition::Definition;
use crate::error::{Error, Result};
use crate::numeric::{ArmorClass, NumberInput};
use crate::patch::CreaturePatch;

/// The front-matter keys the tracker reads. Other keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FrontMatter {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub ac: Option<ArmorClass>,
    /// In a note, `hp` is the character's live HP.
    #[serde(default)]
    pub hp: Option<NumberInput>,
    #[serde(default)]
    pub max_hp: Option<NumberInput>,
    #[serde(default, rename = "maxHp")]
    pub max_hp_alt: Option<NumberInput>,
    #[serde(default)]
    pub current_hp: Option<NumberInput>,
    #[serde(default, rename = "currentHP")]
    pub current_hp_alt: Option<NumberInput>,
    #[serde(default)]
    pub modifier: Option<Value>,
    #[serde(default)]
    pub level: Option<NumberInput>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default, rename = "statblock-link")]
    pub statblock_link: Option<String>,
}

impl FrontMatter {
    /// `Ok(None)` when the note has no (or an empty) front-matter block.
    pub fn parse(note: &str) -> Result<Option<FrontMatter>> {
        let Some(block) = extract_block(note) else {
            return Ok(None);
        };
        if block.trim().is_empty() {
            return Ok(None);
        }
        serde_yaml::from_str(block).map(Some).map_err(Error::FrontMatter)
    }

    fn raw_max_hp(&self) -> Option<&NumberInput> {
        self.max_hp.as_ref().or(self.max_hp_alt.as_ref())
    }

    fn raw_current_hp(&self) -> Option<&NumberInput> {
        self.hp
            .as_ref()
            .or(self.current_hp.as_ref())
            .or(self.current_hp_alt.as_ref())
    }
}

/// The text between a leading `---` line and the next `---` line.
pub fn extract_block(note: &str) -> Option<&str> {
    let note = note.strip_prefix('\u{feff}').unwrap_or(note);
    let mut lines = note.split_inclusive('\n');
    let first = lines.next()?;
    if first.trim_end() != "---" {
        return None;
    }
    let start = first.len();
    let mut end = start;
    for line in lines {
        if line.trim_end() == "---" {
            return Some(&note[start..end]);
        }
        end += line.len();
    }
    None
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolvedHp {
    pub max: Option<i32>,
    pub current: Option<i32>,
}

/// Max: front-matter max, stored max, front-matter current.
/// Current: front-matter current, stored current, resolved max.
/// Current is clamped down to max when both are known.
pub fn resolve_hp(fm: &FrontMatter, stored_max: Option<i32>, stored_current: Option<i32>) -> ResolvedHp {
    let parsed_max = fm.raw_max_hp().and_then(NumberInput::to_i32);
    let parsed_current = fm.raw_current_hp().and_then(NumberInput::to_i32);

    let max = parsed_max.or(stored_max).or(parsed_current);
    let mut current = parsed_current.or(stored_current).or(max);
    if let (Some(c), Some(m)) = (current, max) {
        if c > m {
            current = Some(m);
        }
    }
    ResolvedHp { max, current }
}

/// Fold the front-matter into a stored player entry and return the patch for
/// that player's live combatant.
pub fn sync_player(player: &mut Definition, fm: &FrontMatter) -> CreaturePatch {
    let stored_max = player.hp.as_ref().and_then(NumberInput::to_i32);
    let stored_current = player.current_hp_alt.as_ref().and_then(NumberInput::to_i32);
    let resolved = resolve_hp(fm, stored_max, stored_current);

    player.ac = fm.ac.clone();
    if let Some(max) = resolved.max {
        player.hp = Some(NumberInput::from(max));
        player.max_hp = Some(NumberInput::from(max));
    }
    if let Some(current) = resolved.current {
        player.current_hp_alt = Some(NumberInput::from(current));
    } else if player.current_hp_alt.is_none() && player.hp.is_some() {
        player.current_hp_alt = player.hp.clone();
    }
    player.modifier = fm.modifier.clone();
    player.level = fm.level.clone();
    if let Some(name) = fm.name.as_deref().filter(|n| !n.is_empty()) {
        player.name = name.to_string();
    }
    player.statblock_link = fm.statblock_link.clone();
    player.image = fm.image.clone();
    player.image_url = fm.image_url.clone();

    CreaturePatch {
        max_hp: player.hp.clone().map(Some),
        current_hp: player.current_hp_alt.clone(),
        ac: player.ac.clone(),
        ..Default::default()
    }
}
