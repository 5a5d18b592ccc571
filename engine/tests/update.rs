use initiative_engine::{ArmorClass, Creature, CreaturePatch, Definition, Modifier, NumberInput};
use serde_json::json;

fn goblin() -> Creature {
    let def: Definition = serde_json::from_value(json!({
        "name": "Goblin",
        "hp": 7,
        "ac": 15,
        "image": "goblin.png"
    }))
    .unwrap();
    Creature::from_definition(&def)
}

fn patch(value: serde_json::Value) -> CreaturePatch {
    serde_json::from_value(value).unwrap()
}

#[test]
fn empty_patch_changes_nothing() {
    let mut c = goblin();
    let before = c.clone();
    c.update(&CreaturePatch::default());
    assert_eq!(c, before);
    assert!(CreaturePatch::default().is_empty());
}

#[test]
fn lowering_max_clamps_hp_and_raising_does_not_heal() {
    let mut c = goblin();
    c.update(&CreaturePatch { max_hp: Some(Some(5.into())), ..Default::default() });
    assert_eq!((c.max, c.current_max, c.hp), (5, 5, 5));

    c.update(&CreaturePatch { max_hp: Some(Some(10.into())), ..Default::default() });
    assert_eq!((c.max, c.current_max, c.hp), (10, 10, 5));
}

#[test]
fn null_or_junk_max_means_zero() {
    let mut c = goblin();
    c.update(&CreaturePatch { max_hp: Some(None), ..Default::default() });
    assert_eq!((c.max, c.current_max, c.hp), (0, 0, 0));

    let mut c = goblin();
    c.update(&CreaturePatch { max_hp: Some(Some("".into())), ..Default::default() });
    assert_eq!((c.max, c.hp), (0, 0));
}

#[test]
fn unusable_current_hp_is_ignored() {
    let mut c = goblin();
    c.update(&CreaturePatch { current_hp: Some("3".into()), ..Default::default() });
    assert_eq!(c.hp, 3);

    for junk in ["", "abc", "NaN"] {
        c.update(&CreaturePatch { current_hp: Some(junk.into()), ..Default::default() });
        assert_eq!(c.hp, 3, "current_hp {:?}", junk);
    }

    c.update(&CreaturePatch { current_hp: Some(99.into()), ..Default::default() });
    assert_eq!(c.hp, 7);
}

#[test]
fn ac_moves_baseline_and_current_together() {
    let mut c = goblin();
    c.update(&CreaturePatch { ac: Some(ArmorClass::from(16)), ..Default::default() });
    assert_eq!(c.ac, Some(ArmorClass::from(16)));
    assert_eq!(c.current_ac, Some(ArmorClass::from(16)));
    assert!(c.ac_synced());
}

#[test]
fn in_effect_values_move_alone() {
    let mut c = goblin();
    c.update(&CreaturePatch {
        current_ac: Some(ArmorClass::from(17)),
        current_max: Some(4),
        ..Default::default()
    });
    assert_eq!(c.ac, Some(ArmorClass::from(15)));
    assert_eq!(c.current_ac, Some(ArmorClass::from(17)));
    assert_eq!((c.max, c.current_max, c.hp), (7, 4, 4));
    assert!(!c.ac_synced());
    assert!(!c.max_hp_synced());
}

#[test]
fn zero_modifier_is_applied() {
    let mut c = goblin();
    c.update(&CreaturePatch { modifier: Some(Modifier::Flat(3)), ..Default::default() });
    assert_eq!(c.modifier, Modifier::Flat(3));
    c.update(&CreaturePatch { modifier: Some(Modifier::Flat(0)), ..Default::default() });
    assert_eq!(c.modifier, Modifier::Flat(0));
}

#[test]
fn json_patch_aliases_and_explicit_null() {
    let p = patch(json!({ "hp": 12, "currentHP": "4", "image": null }));
    assert_eq!(p.max_hp, Some(Some(NumberInput::from(12))));
    assert_eq!(p.current_hp, Some(NumberInput::from("4")));
    assert_eq!(p.image, Some(None));
    assert_eq!(p.image_url, None);

    let mut c = goblin();
    c.update(&p);
    assert_eq!((c.max, c.hp), (12, 4));
    assert_eq!(c.image, None);

    assert_eq!(patch(json!({ "max_hp": null })).max_hp, Some(None));
    assert_eq!(patch(json!({})).max_hp, None);
}

#[test]
fn statblock_link_can_be_cleared() {
    let mut c = goblin();
    c.update(&patch(json!({ "statblock-link": "#Goblin" })));
    assert_eq!(c.statblock_link.as_deref(), Some("#Goblin"));
    c.update(&patch(json!({ "statblock-link": null })));
    assert_eq!(c.statblock_link, None);
}

#[test]
fn reapplying_a_patch_is_a_no_op() {
    let p = patch(json!({
        "name": "Goblin Boss",
        "hp": 21,
        "current_hp": 9,
        "ac": 17,
        "note": "Bosses",
        "level": 3,
        "cr": 1,
        "xp": 200,
        "hit_dice": "6d6",
        "current_max": 18
    }));
    let mut c = goblin();
    c.update(&p);
    let once = c.clone();
    c.update(&p);
    assert_eq!(c, once);
    assert_eq!(c.name, "Goblin Boss");
    assert_eq!((c.max, c.current_max, c.hp), (21, 18, 9));
}
