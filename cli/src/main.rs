use std::{cell::RefCell, fs, path::Path, path::PathBuf, rc::Rc};

use anyhow::Context;
use clap::{Parser, Subcommand};
use encoding_rs::Encoding;
use initiative_engine::{
    content, reconcile_from_bestiary, ConditionRegistry, CreaturePatch, Definition, Dice,
    EncounterState, EncounterStore, HomebrewStore, Roster, StaticBestiary, Tracker,
    TrackerSettings,
};
use tracing::Level;

#[derive(Subcommand)]
enum Cmd {
    /// List the condition catalog (built-ins plus custom statuses from settings)
    Conditions {
        /// Settings file (JSON or YAML) with custom statuses
        #[arg(long)]
        settings: Option<PathBuf>,
    },
    /// Build a new encounter from bestiary names and/or a party
    New {
        /// Bestiary file (YAML or JSON list), or `builtin:<id>`
        #[arg(long, default_value = "builtin:srd")]
        bestiary: String,
        /// Settings file providing players and parties
        #[arg(long)]
        settings: Option<PathBuf>,
        /// Party to add (defaults to the settings' default party)
        #[arg(long)]
        party: Option<String>,
        /// Encounter name
        #[arg(long, default_value = "Encounter")]
        name: String,
        /// RNG seed for initiative rolls
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Write the encounter here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
        /// Creature names to add
        creatures: Vec<String>,
    },
    /// Merge bestiary changes into a saved encounter
    Reconcile {
        /// Saved encounter (JSON)
        #[arg(long)]
        encounter: PathBuf,
        /// Bestiary file (YAML or JSON list), or `builtin:<id>`
        #[arg(long)]
        bestiary: String,
        /// Settings file providing players
        #[arg(long)]
        settings: Option<PathBuf>,
    },
    /// Sync players linked to a note from its front-matter
    SyncNote {
        /// Settings file holding the players (rewritten in place)
        #[arg(long)]
        settings: PathBuf,
        /// The note file to read
        #[arg(long)]
        note: PathBuf,
        /// Vault path the players are linked by (defaults to --note)
        #[arg(long)]
        note_path: Option<String>,
        /// Saved encounter to patch as well (rewritten in place)
        #[arg(long)]
        encounter: Option<PathBuf>,
    },
    /// Apply a JSON patch to one creature of a saved encounter
    Patch {
        /// Saved encounter (JSON), rewritten in place
        #[arg(long)]
        encounter: PathBuf,
        /// Creature name
        #[arg(long)]
        creature: String,
        /// Patch document, e.g. '{"current_hp": 3}'
        #[arg(long)]
        patch: String,
    },
    /// Print a saved encounter in turn order
    Show {
        /// Saved encounter (JSON), or `builtin:<id>`
        #[arg(long)]
        encounter: String,
    },
}

#[derive(Parser)]
#[command(name = "initiative")]
#[command(about = "Initiative tracker harness: encounters, bestiary reconciliation, note sync")]
struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    cmd: Cmd,
}

fn read_text_auto(path: &Path) -> anyhow::Result<String> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    if let Some((enc, bom_len)) = Encoding::for_bom(&bytes) {
        let (cow, _, _) = enc.decode(&bytes[bom_len..]);
        Ok(cow.into_owned())
    } else {
        Ok(String::from_utf8(bytes)?)
    }
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

fn load_bestiary(src: &str) -> anyhow::Result<StaticBestiary> {
    if let Some(id) = src.strip_prefix("builtin:") {
        return content::builtin_bestiary(id)
            .ok_or_else(|| anyhow::anyhow!("no builtin bestiary '{}'", id))?
            .with_context(|| format!("builtin bestiary '{}' is invalid", id));
    }
    let path = Path::new(src);
    let text = read_text_auto(path)?;
    let bestiary = if is_yaml(path) {
        StaticBestiary::from_yaml_str(&text)
    } else {
        StaticBestiary::from_json_str(&text)
    };
    bestiary.with_context(|| format!("failed to parse bestiary: {}", src))
}

fn load_settings(path: Option<&Path>) -> anyhow::Result<TrackerSettings> {
    let Some(path) = path else {
        return Ok(TrackerSettings::default());
    };
    let text = read_text_auto(path)?;
    let settings = if is_yaml(path) {
        TrackerSettings::from_yaml_str(&text)
    } else {
        TrackerSettings::from_json_str(&text)
    };
    settings.with_context(|| format!("failed to parse settings: {}", path.display()))
}

fn load_encounter(src: &str) -> anyhow::Result<EncounterState> {
    if let Some(id) = src.strip_prefix("builtin:") {
        return content::builtin_encounter(id)
            .ok_or_else(|| anyhow::anyhow!("no builtin encounter '{}'", id))?
            .with_context(|| format!("builtin encounter '{}' is invalid", id));
    }
    let text = read_text_auto(Path::new(src))?;
    EncounterState::from_json_str(&text).with_context(|| format!("failed to parse encounter: {}", src))
}

fn write_encounter(path: &Path, state: &EncounterState) -> anyhow::Result<()> {
    fs::write(path, state.to_json_pretty()?)
        .with_context(|| format!("failed to write encounter: {}", path.display()))
}

/// Captures whatever the tracker persists so it can be written after the pass.
fn capture(tracker: &mut Tracker) -> Rc<RefCell<Option<EncounterState>>> {
    let saved = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&saved);
    tracker.subscribe(move |state| {
        *sink.borrow_mut() = Some(state.clone());
    });
    saved
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Cmd::Conditions { settings } => {
            let mut settings = load_settings(settings.as_deref())?;
            let registry = settings.condition_registry();
            for condition in registry.iter() {
                match condition.amount {
                    Some(amount) => println!("{}\t{} ({})", condition.id, condition.name, amount),
                    None => println!("{}\t{}", condition.id, condition.name),
                }
            }
        }
        Cmd::New {
            bestiary,
            settings,
            party,
            name,
            seed,
            out,
            creatures,
        } => {
            let bestiary = load_bestiary(&bestiary)?;
            let settings = load_settings(settings.as_deref())?;
            let homebrew = settings.homebrew();
            let roster = Roster::new(&homebrew, Some(&bestiary));
            let mut dice = Dice::from_seed(seed);

            let mut combatants = match party.as_deref().or(homebrew.default_party_name()) {
                Some(party) => homebrew.players_for_party(party),
                None => Vec::new(),
            };
            for creature_name in &creatures {
                let mut creature = roster.creature_for(&Definition::named(creature_name.clone()));
                let copies = combatants.iter().filter(|c| c.name == creature.name).count();
                if copies > 0 {
                    creature.number = copies as u32 + 1;
                }
                combatants.push(creature);
            }
            for creature in combatants.iter_mut().filter(|c| !c.player) {
                creature.initiative = initiative_engine::roll_initiative(&mut dice, &creature.modifier);
            }

            let tracker = Tracker::start(name, combatants);
            let state = tracker.to_state();
            match out {
                Some(path) => write_encounter(&path, &state)?,
                None => println!("{}", state.to_json_pretty()?),
            }
        }
        Cmd::Reconcile {
            encounter,
            bestiary,
            settings,
        } => {
            let bestiary = load_bestiary(&bestiary)?;
            let mut settings = load_settings(settings.as_deref())?;
            let registry = settings.condition_registry();
            let homebrew = settings.homebrew();
            let roster = Roster::new(&homebrew, Some(&bestiary));

            let state = load_encounter(&encounter.to_string_lossy())?;
            let mut tracker = Tracker::from_state(&state, &roster, &registry);
            let saved = capture(&mut tracker);

            let outcome = reconcile_from_bestiary(&mut tracker, &bestiary);
            if let Some(state) = saved.borrow().as_ref() {
                write_encounter(&encounter, state)?;
            }
            println!(
                "updated={} skipped_players={} missing={}",
                outcome.updated, outcome.skipped_players, outcome.missing
            );
        }
        Cmd::SyncNote {
            settings: settings_path,
            note,
            note_path,
            encounter,
        } => {
            let mut settings = load_settings(Some(&settings_path))?;
            let registry = settings.condition_registry();
            let mut homebrew: HomebrewStore = settings.homebrew();
            let note_text = read_text_auto(&note)?;
            let note_path = note_path.unwrap_or_else(|| note.to_string_lossy().into_owned());

            let synced = match &encounter {
                Some(path) => {
                    let state = load_encounter(&path.to_string_lossy())?;
                    let mut tracker = Tracker::from_state(&state, &homebrew, &registry);
                    let saved = capture(&mut tracker);
                    let synced = homebrew.on_note_changed(
                        &note_path,
                        &note_text,
                        Some(&mut tracker as &mut dyn EncounterStore),
                    )?;
                    if let Some(state) = saved.borrow().as_ref() {
                        write_encounter(path, state)?;
                    }
                    synced
                }
                None => homebrew.on_note_changed(&note_path, &note_text, None)?,
            };

            settings.store_homebrew(&homebrew);
            fs::write(&settings_path, settings.to_json_pretty()?)
                .with_context(|| format!("failed to write settings: {}", settings_path.display()))?;
            println!("synced={}", synced);
        }
        Cmd::Patch {
            encounter,
            creature,
            patch,
        } => {
            let patch: CreaturePatch =
                serde_json::from_str(&patch).context("patch is not a valid creature patch")?;
            let state = load_encounter(&encounter.to_string_lossy())?;
            let homebrew = HomebrewStore::default();
            let mut tracker = Tracker::from_state(&state, &homebrew, &ConditionRegistry::new());
            tracker.update_by_name(&creature, &patch)?;
            write_encounter(&encounter, &tracker.to_state())?;
        }
        Cmd::Show { encounter } => {
            let state = load_encounter(&encounter)?;
            let homebrew = HomebrewStore::default();
            let tracker = Tracker::from_state(&state, &homebrew, &ConditionRegistry::new());
            println!("{} (round {})", tracker.name, tracker.round);
            for c in tracker.ordered_creatures() {
                let ac = c
                    .current_ac
                    .as_ref()
                    .map(|ac| ac.to_string())
                    .unwrap_or_else(|| "-".to_string());
                let hp = c.hp_display().unwrap_or_else(|| "-".to_string());
                let status = c.status.names().join(", ");
                println!(
                    "{:>3}  {:<20} HP {:<9} AC {:<4} {}",
                    c.initiative,
                    c.get_name(),
                    hp,
                    ac,
                    status
                );
            }
        }
    }
    Ok(())
}
