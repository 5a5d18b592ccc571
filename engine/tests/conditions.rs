use std::collections::HashSet;

use initiative_engine::conditions::CustomCondition;
use initiative_engine::{ConditionKind, ConditionRegistry};

#[test]
fn builtin_catalog_is_complete_and_unique() {
    assert_eq!(ConditionKind::ALL.len(), 15);
    let ids: HashSet<String> = ConditionKind::ALL.iter().map(|k| k.id()).collect();
    assert_eq!(ids.len(), 15);
    assert_eq!(ConditionKind::Prone.id(), "condition-prone");
    assert!(ConditionKind::ALL.iter().all(|k| !k.description().is_empty()));
}

#[test]
fn only_exhaustion_carries_an_amount() {
    for kind in ConditionKind::ALL {
        let expected = if kind == ConditionKind::Exhaustion { Some(1) } else { None };
        assert_eq!(kind.condition().amount, expected, "{}", kind.name());
    }
}

#[test]
fn resolves_builtins_by_exact_name() {
    let registry = ConditionRegistry::new();
    assert_eq!(registry.resolve_by_name("Stunned").map(|c| c.id.as_str()), Some("condition-stunned"));
    assert!(registry.resolve_by_name("stunned").is_none());
    assert!(registry.resolve_by_name("Hexed").is_none());

    let hexed = registry.resolve_or_ad_hoc("Hexed");
    assert_eq!(hexed.name, "Hexed");
    assert!(hexed.id.starts_with("ID_"));
    assert_eq!(hexed.description, None);
}

#[test]
fn custom_conditions_get_ids() {
    let custom = vec![
        CustomCondition { id: None, name: "Hexed".into(), description: Some("Cursed".into()), amount: None },
        CustomCondition { id: None, name: "Poisoned".into(), description: None, amount: None },
        CustomCondition { id: Some("ID_keep".into()), name: "Marked".into(), description: None, amount: Some(2) },
    ];
    let registry = ConditionRegistry::with_custom(&custom);

    let ids: Vec<&str> = registry.custom().iter().map(|c| c.id.as_str()).collect();
    assert!(ids[0].starts_with("ID_"));
    assert_eq!(ids[1], "condition-poisoned");
    assert_eq!(ids[2], "ID_keep");

    assert_eq!(registry.resolve_by_name("Hexed").and_then(|c| c.description.as_deref()), Some("Cursed"));
    // Built-ins win over a custom entry of the same name.
    assert!(registry.resolve_by_name("Poisoned").unwrap().description.is_some());
    assert_eq!(registry.iter().count(), 18);
    assert!(registry.custom_for_settings().iter().all(|c| c.id.is_some()));
}
