use std::collections::HashMap;

use crate::encounter::EncounterState;
use crate::error::Result;
use crate::sources::StaticBestiary;

pub fn builtin_bestiaries() -> HashMap<&'static str, &'static str> {
    HashMap::from([("srd", include_str!("../content/bestiary/srd.yaml"))])
}

pub fn builtin_encounters() -> HashMap<&'static str, &'static str> {
    HashMap::from([(
        "goblin_ambush",
        include_str!("../content/encounters/goblin_ambush.json"),
    )])
}

pub fn builtin_bestiary(id: &str) -> Option<Result<StaticBestiary>> {
    builtin_bestiaries()
        .get(id)
        .map(|text| StaticBestiary::from_yaml_str(text))
}

pub fn builtin_encounter(id: &str) -> Option<Result<EncounterState>> {
    builtin_encounters()
        .get(id)
        .map(|text| EncounterState::from_json_str(text))
}
