//! Pushes bestiary edits into creatures that are already in combat.
//!
//! A field is only overwritten while the creature is still "synced" on it:
//! `current_ac == ac` for armor class, `current_max == max` for max HP. Once
//! combat moves the in-effect value away from the baseline, the bestiary no
//! longer touches that pair. Presentation and passive metadata always follow
//! the bestiary.

use tracing::{debug, info};

use crate::creature::Creature;
use crate::definition::Definition;
use crate::encounter::EncounterStore;
use crate::numeric::NumberInput;
use crate::patch::CreaturePatch;
use crate::sources::BestiaryProvider;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileOutcome {
    /// Creatures whose state actually changed.
    pub updated: usize,
    /// Players left to the note sync path.
    pub skipped_players: usize,
    /// Creatures with no bestiary entry (left as they are).
    pub missing: usize,
}

/// The minimal patch that brings `creature` in line with `def` without
/// undoing anything combat has changed. Empty when nothing needs to move.
pub fn plan_update(creature: &Creature, def: &Definition) -> CreaturePatch {
    let mut patch = CreaturePatch::default();

    if def.image != creature.image {
        patch.image = Some(def.image.clone());
    }
    if def.image_url != creature.image_url {
        patch.image_url = Some(def.image_url.clone());
    }

    if let Some(ac) = &def.ac {
        if creature.ac_synced() && creature.ac.as_ref() != Some(ac) {
            patch.ac = Some(ac.clone());
            patch.current_ac = Some(ac.clone());
        }
    }

    if creature.max_hp_synced() {
        if let Some(new_max) = def.hp.as_ref().and_then(NumberInput::to_i32) {
            if new_max != creature.max {
                // The max setter also pulls `hp` down when it no longer fits.
                patch.max_hp = Some(Some(NumberInput::from(new_max)));
                patch.current_max = Some(new_max);
            }
        }
    }

    let modifier = def.resolved_modifier();
    if modifier != creature.modifier {
        patch.modifier = Some(modifier);
    }

    if let Some(cr) = &def.cr {
        if creature.cr.as_ref() != Some(cr) {
            patch.cr = Some(cr.clone());
        }
    }
    if let Some(xp) = def.xp_value() {
        if creature.xp != Some(xp) {
            patch.xp = Some(xp);
        }
    }
    if let Some(hit_dice) = def.hit_dice_text() {
        if creature.hit_dice.as_deref() != Some(hit_dice) {
            patch.hit_dice = Some(hit_dice.to_string());
        }
    }
    if let Some(link) = &def.statblock_link {
        if creature.statblock_link.as_ref() != Some(link) {
            patch.statblock_link = Some(Some(link.clone()));
        }
    }

    patch
}

/// One full pass over the encounter. No-op when the bestiary is unavailable or
/// no encounter is active. Persists and notifies at most once.
pub fn reconcile_from_bestiary(
    store: &mut dyn EncounterStore,
    bestiary: &dyn BestiaryProvider,
) -> ReconcileOutcome {
    let mut outcome = ReconcileOutcome::default();
    if !bestiary.is_available() || !store.is_active() {
        return outcome;
    }

    let mut patches = Vec::new();
    for creature in store.ordered_creatures() {
        if creature.player {
            outcome.skipped_players += 1;
            continue;
        }
        let Some(def) = bestiary.lookup(&creature.name) else {
            debug!(creature = %creature.name, "no bestiary entry; leaving as is");
            outcome.missing += 1;
            continue;
        };
        let patch = plan_update(creature, &def);
        if !patch.is_empty() {
            debug!(creature = %creature.name, id = %creature.id, "bestiary changes pending");
            patches.push((creature.id.clone(), patch));
        }
    }

    for (id, patch) in &patches {
        if store.update_creature(id, patch) {
            outcome.updated += 1;
        }
    }

    if outcome.updated > 0 {
        store.persist_and_notify();
        info!(updated = outcome.updated, "updated creatures from bestiary");
    }
    outcome
}
