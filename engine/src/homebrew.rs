use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::creature::Creature;
use crate::definition::Definition;
use crate::encounter::EncounterStore;
use crate::error::Result;
use crate::front_matter::{sync_player, FrontMatter};
use crate::numeric::NumberInput;
use crate::patch::CreaturePatch;
use crate::sources::{BestiaryProvider, DefinitionSource, PlayerRoster};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Party {
    pub name: String,
    #[serde(default)]
    pub players: Vec<String>,
}

/// Player entries kept in settings, with a ready-made combatant per player.
#[derive(Debug, Clone, Default)]
pub struct HomebrewStore {
    players: Vec<Definition>,
    parties: Vec<Party>,
    default_party: Option<String>,
    creatures: IndexMap<String, Creature>,
}

/// Missing live HP starts at max, live HP never exceeds max, `max_hp` mirrors `hp`.
pub fn normalize_player(player: &mut Definition) {
    let max = player.hp.as_ref().and_then(NumberInput::to_i32);
    if player.current_hp_alt.is_none() && player.hp.as_ref().is_some_and(NumberInput::is_number) {
        player.current_hp_alt = player.hp.clone();
    }
    let current = player.current_hp_alt.as_ref().and_then(NumberInput::to_i32);
    if let (Some(c), Some(m)) = (current, max) {
        if c > m {
            player.current_hp_alt = player.hp.clone();
        }
    }
    if player.hp.is_some() {
        player.max_hp = player.hp.clone();
    }
}

impl HomebrewStore {
    pub fn new(players: Vec<Definition>, parties: Vec<Party>, default_party: Option<String>) -> Self {
        let mut store = Self {
            players: Vec::with_capacity(players.len()),
            parties,
            default_party,
            creatures: IndexMap::new(),
        };
        for player in players {
            store.push_player(player);
        }
        store
    }

    fn push_player(&mut self, mut player: Definition) {
        normalize_player(&mut player);
        self.creatures
            .insert(player.name.clone(), Creature::from_definition(&player));
        self.players.push(player);
    }

    pub fn players(&self) -> &[Definition] {
        &self.players
    }

    pub fn parties(&self) -> &[Party] {
        &self.parties
    }

    pub fn default_party_name(&self) -> Option<&str> {
        self.default_party.as_deref()
    }

    pub fn save_player(&mut self, player: Definition) {
        self.push_player(player);
    }

    pub fn save_players(&mut self, players: impl IntoIterator<Item = Definition>) {
        for player in players {
            self.push_player(player);
        }
    }

    /// Replace `existing_name`'s entry. The cached combatant is patched in place
    /// (keeping its id) and re-keyed under the possibly new name.
    pub fn update_player(&mut self, existing_name: &str, mut player: Definition) {
        let Some(mut creature) = self.creatures.shift_remove(existing_name) else {
            self.save_player(player);
            return;
        };
        normalize_player(&mut player);
        creature.update(&patch_from_definition(&player));

        match self.players.iter().position(|p| p.name == existing_name) {
            Some(idx) => self.players[idx] = player.clone(),
            None => self.players.push(player.clone()),
        }
        self.creatures.insert(player.name.clone(), creature);
    }

    pub fn delete_player(&mut self, name: &str) -> Option<Definition> {
        self.creatures.shift_remove(name);
        let idx = self.players.iter().position(|p| p.name == name)?;
        Some(self.players.remove(idx))
    }

    pub fn party(&self, name: &str) -> Option<&Party> {
        self.parties.iter().find(|p| p.name == name)
    }

    pub fn default_party(&self) -> Option<&Party> {
        self.default_party.as_deref().and_then(|name| self.party(name))
    }

    /// Combatants for a party's members; unknown members are bare name-only creatures.
    pub fn players_for_party(&self, party: &str) -> Vec<Creature> {
        let Some(party) = self.party(party) else {
            return Vec::new();
        };
        party
            .players
            .iter()
            .map(|name| {
                self.creatures
                    .get(name)
                    .cloned()
                    .unwrap_or_else(|| Creature::from_definition(&Definition::named(name.clone())))
            })
            .collect()
    }

    pub fn on_note_renamed(&mut self, old_path: &str, new_path: &str, basename: &str) -> usize {
        let mut renamed = 0;
        for player in self.players.iter_mut().filter(|p| p.path.as_deref() == Some(old_path)) {
            player.path = Some(new_path.to_string());
            player.note = Some(basename.to_string());
            renamed += 1;
        }
        renamed
    }

    pub fn on_note_deleted(&mut self, path: &str) -> usize {
        let mut unlinked = 0;
        for player in self.players.iter_mut().filter(|p| p.path.as_deref() == Some(path)) {
            player.path = None;
            player.note = None;
            unlinked += 1;
        }
        unlinked
    }

    /// Sync every player linked to `path` from the note's front-matter, and patch
    /// their live combatants if an encounter is running. Returns how many players
    /// were synced.
    pub fn on_note_changed(
        &mut self,
        path: &str,
        note: &str,
        mut store: Option<&mut dyn EncounterStore>,
    ) -> Result<usize> {
        let linked: Vec<usize> = self
            .players
            .iter()
            .enumerate()
            .filter(|(_, p)| p.path.as_deref() == Some(path))
            .map(|(idx, _)| idx)
            .collect();
        if linked.is_empty() {
            return Ok(0);
        }
        let Some(fm) = FrontMatter::parse(note)? else {
            warn!(path, "linked note has no front-matter");
            return Ok(0);
        };

        let mut patched = 0;
        for idx in &linked {
            let old_name = self.players[*idx].name.clone();
            let patch = sync_player(&mut self.players[*idx], &fm);
            let player = &self.players[*idx];
            self.creatures.shift_remove(&old_name);
            self.creatures
                .insert(player.name.clone(), Creature::from_definition(player));
            debug!(player = %player.name, path, "synced player from note");

            if let Some(store) = store.as_deref_mut() {
                if !store.is_active() {
                    continue;
                }
                let live = store
                    .ordered_creatures()
                    .into_iter()
                    .find(|c| c.name == player.name)
                    .map(|c| c.id.clone());
                if let Some(id) = live {
                    if store.update_creature(&id, &patch) {
                        patched += 1;
                    }
                }
            }
        }
        if patched > 0 {
            if let Some(store) = store.as_deref_mut() {
                store.persist_and_notify();
            }
        }
        Ok(linked.len())
    }
}

/// Update-contract view of a stored entry. Fields the entry does not carry stay untouched.
pub fn patch_from_definition(def: &Definition) -> CreaturePatch {
    CreaturePatch {
        name: Some(def.name.clone()),
        modifier: def.modifier.is_some().then(|| def.resolved_modifier()),
        max_hp: def.raw_max_hp().cloned().map(Some),
        current_hp: def.current_hp_alt.clone().or_else(|| def.current_hp.clone()),
        ac: def.ac.clone(),
        note: def.note.clone(),
        level: def.level_value(),
        player: def.player,
        statblock_link: def.statblock_link.clone().map(Some),
        marker: def.marker.clone(),
        source: def.source.clone(),
        cr: def.cr.clone(),
        xp: def.xp_value(),
        hit_dice: def.hit_dice_text().map(str::to_string),
        image: def.image.clone().map(Some),
        image_url: def.image_url.clone().map(Some),
        ..Default::default()
    }
}

impl PlayerRoster for HomebrewStore {
    fn player_by_name(&self, name: &str) -> Option<Creature> {
        self.creatures.get(name).cloned()
    }
}

impl DefinitionSource for HomebrewStore {
    fn lookup(&self, name: &str) -> Option<Definition> {
        self.players.iter().find(|p| p.name == name).cloned()
    }
}

/// Homebrew players plus players published by the bestiary; bestiary entries win.
pub struct Roster<'a> {
    pub homebrew: &'a HomebrewStore,
    pub bestiary: Option<&'a dyn BestiaryProvider>,
}

impl<'a> Roster<'a> {
    pub fn new(homebrew: &'a HomebrewStore, bestiary: Option<&'a dyn BestiaryProvider>) -> Self {
        Self { homebrew, bestiary }
    }

    fn available_bestiary(&self) -> Option<&'a dyn BestiaryProvider> {
        self.bestiary.filter(|b| b.is_available())
    }

    /// Combatant for a definition: a known player, else the bestiary's version,
    /// else the definition itself.
    pub fn creature_for(&self, def: &Definition) -> Creature {
        if def.is_player() {
            if let Some(known) = self.homebrew.player_by_name(&def.name) {
                return known;
            }
        }
        self.available_bestiary()
            .and_then(|b| b.lookup(&def.name))
            .map(|found| Creature::from_definition(&found))
            .unwrap_or_else(|| Creature::from_definition(def))
    }
}

impl PlayerRoster for Roster<'_> {
    fn player_by_name(&self, name: &str) -> Option<Creature> {
        let from_bestiary = self.available_bestiary().and_then(|b| {
            b.players()
                .into_iter()
                .find(|p| p.name == name)
                .map(|p| Creature::from_definition(&p))
        });
        from_bestiary.or_else(|| self.homebrew.player_by_name(name))
    }
}
