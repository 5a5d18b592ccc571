use initiative_engine::{
    ArmorClass, Condition, ConditionKind, Creature, Definition, Modifier, StatusSet,
};
use serde_json::json;

fn def(value: serde_json::Value) -> Definition {
    serde_json::from_value(value).unwrap()
}

#[test]
fn goblin_from_plain_definition() {
    let goblin = Creature::from_definition(&def(json!({ "name": "Goblin", "hp": 7 })));
    assert_eq!(goblin.max, 7);
    assert_eq!(goblin.current_max, 7);
    assert_eq!(goblin.hp, 7);
    assert_eq!(goblin.modifier, Modifier::Flat(0));
    assert_eq!(goblin.ac, None);
    assert_eq!(goblin.current_ac, None);
    assert_eq!(goblin.temp, 0);
    assert!(goblin.enabled);
    assert!(goblin.status.is_empty());
}

#[test]
fn modifier_falls_back_to_dexterity() {
    let ogre = Creature::from_definition(&def(json!({
        "name": "Ogre",
        "hp": 59,
        "stats": [19, 8, 16, 5, 7, 7]
    })));
    assert_eq!(ogre.modifier, Modifier::Flat(-1));

    let explicit = Creature::from_definition(&def(json!({
        "name": "Ogre",
        "modifier": 3,
        "stats": [19, 8, 16, 5, 7, 7]
    })));
    assert_eq!(explicit.modifier, Modifier::Flat(3));

    let many = Creature::from_definition(&def(json!({ "name": "Hero", "modifier": [2, "1", "x"] })));
    assert_eq!(many.modifier, Modifier::Many(vec![2, 1, 0]));
    assert_eq!(many.modifier.total(), 3);
}

#[test]
fn max_hp_aliases_and_text_coercion() {
    let c = Creature::from_definition(&def(json!({ "name": "A", "hp": 7, "max_hp": 10 })));
    assert_eq!((c.max, c.hp), (10, 7));

    let c = Creature::from_definition(&def(json!({ "name": "B", "maxHp": "12", "currentHP": "20" })));
    assert_eq!((c.max, c.current_max, c.hp), (12, 12, 12));

    let c = Creature::from_definition(&def(json!({ "name": "C", "hp": "12.9" })));
    assert_eq!((c.max, c.hp), (12, 12));
}

#[test]
fn junk_hp_becomes_zero() {
    for raw in [json!(""), json!("abc"), json!(null), json!("NaN")] {
        let c = Creature::from_definition(&def(json!({ "name": "Junk", "hp": raw })));
        assert_eq!(c.max, 0, "hp {:?}", raw);
        assert_eq!(c.hp, 0, "hp {:?}", raw);
    }
    let c = Creature::from_definition(&def(json!({ "name": "Junk", "hp": "abc", "currentHP": 5 })));
    assert_eq!(c.hp, 0);
}

#[test]
fn ids_are_kept_or_generated() {
    let kept = Creature::from_definition(&def(json!({ "name": "A", "id": "ID_custom" })));
    assert_eq!(kept.id, "ID_custom");

    let fresh = Creature::from_definition(&Definition::named("A"));
    assert!(fresh.id.starts_with("ID_"));
    assert_eq!(fresh.id.len(), 15);
    assert_ne!(fresh.id, Creature::from_definition(&Definition::named("A")).id);
}

#[test]
fn initiative_prefers_definition() {
    assert_eq!(Creature::new(&Definition::named("A"), 12).initiative, 12);
    let own = def(json!({ "name": "A", "initiative": 3 }));
    assert_eq!(Creature::new(&own, 12).initiative, 3);
}

#[test]
fn metadata_is_carried() {
    let c = Creature::from_definition(&def(json!({
        "name": "Goblin",
        "ac": 15,
        "cr": "1/4",
        "xp": 50,
        "hit_dice": "2d6",
        "level": "3",
        "image": "goblin.png",
        "statblock-link": "#Goblin",
        "note": "Monsters",
        "friendly": true
    })));
    assert_eq!(c.ac, Some(ArmorClass::from(15)));
    assert_eq!(c.current_ac, c.ac);
    assert_eq!(c.cr.as_ref().map(|cr| cr.to_string()).as_deref(), Some("1/4"));
    assert_eq!(c.xp, Some(50));
    assert_eq!(c.hit_dice.as_deref(), Some("2d6"));
    assert_eq!(c.level, Some(3));
    assert_eq!(c.image.as_deref(), Some("goblin.png"));
    assert!(c.friendly);
    assert_eq!(c.statblock_link().as_deref(), Some("[Goblin](Monsters#Goblin)"));
}

#[test]
fn numeric_hit_dice_are_dropped() {
    let c = Creature::from_definition(&def(json!({ "name": "A", "hit_dice": 3 })));
    assert_eq!(c.hit_dice, None);
}

#[test]
fn same_condition_is_not_added_twice() {
    let mut c = Creature::from_definition(&Definition::named("A"));
    let poisoned = Condition { amount: Some(1), ..Condition::ad_hoc("Poisoned") };
    let again = Condition { amount: Some(1), ..Condition::ad_hoc("Poisoned") };
    assert_ne!(poisoned.id, again.id);

    assert!(c.add_condition(poisoned.clone()));
    assert!(!c.add_condition(again));
    assert_eq!(c.status.len(), 1);

    let stronger = Condition { amount: Some(2), ..Condition::ad_hoc("Poisoned") };
    assert!(c.add_condition(stronger));
    assert_eq!(c.status.len(), 2);

    assert_eq!(c.remove_condition(&poisoned).map(|p| p.id), Some(poisoned.id));
    assert_eq!(c.status.len(), 1);
}

#[test]
fn status_keeps_insertion_order() {
    let mut set = StatusSet::new();
    set.add(ConditionKind::Prone.condition());
    set.add(ConditionKind::Blinded.condition());
    set.add(ConditionKind::Exhaustion.condition());
    assert_eq!(set.names(), vec!["Prone", "Blinded", "Exhaustion"]);
    assert!(set.contains_name("Blinded"));
    assert_eq!(set.iter().last().and_then(|c| c.amount), Some(1));
}

#[test]
fn display_name_and_hp_summary() {
    let mut c = Creature::from_definition(&def(json!({ "name": "Goblin", "hp": 7, "currentHP": 4 })));
    assert_eq!(c.get_name(), "Goblin");
    c.number = 2;
    c.display = Some("Sneaky".into());
    assert_eq!(c.get_name(), "Sneaky 2");

    c.temp = 3;
    assert_eq!(c.hp_display().as_deref(), Some("7/7"));
    assert_eq!(Creature::from_definition(&Definition::named("X")).hp_display(), None);
}

#[test]
fn duplicate_gets_fresh_id_and_same_stats() {
    let mut c = Creature::new(&def(json!({ "name": "Orc", "hp": 15, "ac": 13 })), 11);
    c.add_condition(ConditionKind::Prone.condition());
    let copy = c.duplicate();
    assert_ne!(copy.id, c.id);
    assert_eq!(copy.name, "Orc");
    assert_eq!((copy.max, copy.hp), (15, 15));
    assert_eq!(copy.initiative, 11);
    assert_eq!(copy.ac, c.ac);
    assert!(copy.status.is_empty());
}
