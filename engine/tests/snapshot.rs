use initiative_engine::{
    ArmorClass, ConditionKind, ConditionRegistry, Creature, CreaturePatch, CreatureState,
    Definition, HomebrewStore, NoRoster,
};
use serde_json::json;

fn wounded_goblin() -> Creature {
    let def: Definition =
        serde_json::from_value(json!({ "name": "Goblin", "hp": 7, "ac": 15, "cr": "1/4" })).unwrap();
    let mut c = Creature::new(&def, 14);
    c.update(&CreaturePatch {
        current_hp: Some(4.into()),
        current_ac: Some(ArmorClass::from(17)),
        ..Default::default()
    });
    c.temp = 2;
    c.active = true;
    c.add_condition(ConditionKind::Poisoned.condition());
    c.add_condition(ConditionKind::Prone.condition());
    c
}

#[test]
fn snapshot_uses_persisted_key_names() {
    let value = serde_json::to_value(wounded_goblin().to_snapshot()).unwrap();
    assert_eq!(value["hp"], json!(7));
    assert_eq!(value["currentMaxHP"], json!(7));
    assert_eq!(value["currentHP"], json!(4));
    assert_eq!(value["tempHP"], json!(2));
    assert_eq!(value["ac"], json!(15));
    assert_eq!(value["currentAC"], json!(17));
    assert_eq!(value["initiative"], json!(14));
    assert_eq!(value["enabled"], json!(true));
}

#[test]
fn statuses_persist_by_name_only() {
    let state = wounded_goblin().to_snapshot();
    insta::assert_snapshot!(serde_json::to_string(&state.status).unwrap(), @r#"["Poisoned","Prone"]"#);
}

#[test]
fn restore_round_trips_combat_state() {
    let before = wounded_goblin();
    let text = serde_json::to_string(&before.to_snapshot()).unwrap();
    let state: CreatureState = serde_json::from_str(&text).unwrap();
    let restored = Creature::from_snapshot(&state, &NoRoster, &ConditionRegistry::new());

    assert_eq!(restored.id, before.id);
    assert_eq!(restored.initiative, 14);
    assert_eq!((restored.max, restored.current_max, restored.hp, restored.temp), (7, 7, 4, 2));
    assert_eq!(restored.ac, Some(ArmorClass::from(15)));
    assert_eq!(restored.current_ac, Some(ArmorClass::from(17)));
    assert!(restored.active);
    assert!(restored.enabled);
    assert_eq!(restored.status.names(), before.status.names());

    let poisoned = restored.status.iter().next().unwrap();
    assert_eq!(poisoned.id, "condition-poisoned");
    assert!(poisoned.description.is_some());
}

#[test]
fn unknown_status_names_become_ad_hoc() {
    let state: CreatureState = serde_json::from_value(json!({
        "name": "Cultist",
        "initiative": 8,
        "hp": 9,
        "currentHP": 9,
        "currentMaxHP": 9,
        "status": ["Hexed", "Stunned"]
    }))
    .unwrap();
    let c = Creature::from_snapshot(&state, &NoRoster, &ConditionRegistry::new());
    let conditions: Vec<_> = c.status.iter().collect();
    assert_eq!(conditions.len(), 2);
    assert_eq!(conditions[0].name, "Hexed");
    assert!(conditions[0].id.starts_with("ID_"));
    assert_eq!(conditions[0].description, None);
    assert_eq!(conditions[1].id, "condition-stunned");
}

#[test]
fn legacy_snapshot_without_current_max() {
    let state: CreatureState = serde_json::from_value(json!({
        "name": "Wolf",
        "initiative": 12,
        "hp": 11,
        "currentHP": 20,
        "status": []
    }))
    .unwrap();
    let c = Creature::from_snapshot(&state, &NoRoster, &ConditionRegistry::new());
    assert_eq!((c.max, c.current_max, c.hp), (11, 11, 11));
    assert!(c.enabled);
    assert_eq!(c.temp, 0);
}

#[test]
fn players_restore_from_the_roster() {
    let aria: Definition = serde_json::from_value(json!({
        "name": "Aria",
        "player": true,
        "hp": 30,
        "ac": 16,
        "level": 5,
        "path": "party/Aria.md"
    }))
    .unwrap();
    let homebrew = HomebrewStore::new(vec![aria], vec![], None);
    let state: CreatureState = serde_json::from_value(json!({
        "name": "Aria",
        "player": true,
        "initiative": 14,
        "hp": 30,
        "currentHP": 12,
        "currentMaxHP": 30,
        "ac": 16,
        "currentAC": 18,
        "status": ["Blinded"]
    }))
    .unwrap();

    let c = Creature::from_snapshot(&state, &homebrew, &ConditionRegistry::new());
    assert_eq!(c.initiative, 14);
    assert_eq!(c.hp, 12);
    assert_eq!(c.current_ac, Some(ArmorClass::from(18)));
    assert_eq!(c.level, Some(5));
    assert_eq!(c.path.as_deref(), Some("party/Aria.md"));
    assert!(c.status.contains_name("Blinded"));

    let unknown = Creature::from_snapshot(&state, &NoRoster, &ConditionRegistry::new());
    assert_eq!(unknown.level, None);
    assert_eq!(unknown.hp, 12);
}
