use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub mod conditions;
pub mod content;
pub mod creature;
pub mod definition;
pub mod encounter;
pub mod error;
pub mod front_matter;
pub mod homebrew;
pub mod numeric;
pub mod patch;
pub mod reconcile;
pub mod settings;
pub mod snapshot;
pub mod sources;

pub use conditions::{Condition, ConditionKind, ConditionRegistry, StatusSet};
pub use creature::Creature;
pub use definition::Definition;
pub use encounter::{EncounterState, EncounterStore, Tracker};
pub use error::Error;
pub use front_matter::FrontMatter;
pub use homebrew::{HomebrewStore, Party, Roster};
pub use numeric::{ArmorClass, ChallengeRating, Modifier, NumberInput, Source};
pub use patch::CreaturePatch;
pub use reconcile::{reconcile_from_bestiary, ReconcileOutcome};
pub use settings::TrackerSettings;
pub use snapshot::CreatureState;
pub use sources::{BestiaryProvider, DefinitionSource, NoRoster, PlayerRoster, StaticBestiary};

pub struct Dice { rng: ChaCha8Rng }

impl Dice {
    pub fn from_seed(seed: u64) -> Self {
        Self { rng: ChaCha8Rng::seed_from_u64(seed) }
    }

    pub fn d20(&mut self) -> i32 {
        self.rng.gen_range(1..=20)
    }
}

/// Fallback initiative: a plain d20 plus every modifier entry.
pub fn roll_initiative(dice: &mut Dice, modifier: &Modifier) -> i32 {
    dice.d20() + modifier.total()
}

/// D&D ability modifier = floor((score - 10) / 2) for integer scores.
pub fn ability_mod(score: i32) -> i32 {
    // `div_euclid` with positive divisor matches mathematical floor division.
    (score - 10).div_euclid(2)
}

/// Opaque creature/condition id: `ID_` then twelve hex nibbles.
pub fn new_id() -> String {
    let mut rng = rand::thread_rng();
    let mut id = String::from("ID_");
    for i in 0..12 {
        let r: u32 = rng.gen_range(0..16);
        let v = if i % 2 == 0 { r } else { (r & 0x3) | 0x8 };
        id.push(char::from_digit(v, 16).unwrap_or('0'));
    }
    id
}
