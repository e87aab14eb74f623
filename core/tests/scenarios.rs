use wealthquest_core::{
    catalog,
    deck::ScenarioDeck,
    error::GameError,
    scenario::{parse_scenarios, Scenario},
};

const GENERATED: &str = r#"```json
[
  {
    "id": 101,
    "category": "Budgeting",
    "description": "Your car needs new tires.",
    "options": [
      { "id": 1, "text": "Buy premium tires",
        "outcome": { "text": "Smooth ride.", "capitalChange": 0, "fixedCost": 900 } },
      { "id": 2, "text": "Buy used tires",
        "outcome": { "text": "They will do.", "capitalChange": 0, "fixedCost": 250, "bonus": 0 } }
    ]
  }
]
```"#;

#[test]
fn builtin_catalog_is_valid() {
    let scenarios = catalog::builtin_scenarios().unwrap();
    assert_eq!(scenarios.len(), 20);
    for scenario in &scenarios {
        scenario.validate().unwrap();
        assert_eq!(scenario.options.len(), 3, "scenario {}", scenario.id);
    }
    let mut ids: Vec<u32> = scenarios.iter().map(|s| s.id).collect();
    ids.dedup();
    assert_eq!(ids.len(), 20);
}

#[test]
fn fenced_generator_output_is_accepted() {
    let scenarios = parse_scenarios(GENERATED).unwrap();
    assert_eq!(scenarios.len(), 1);
    let s = &scenarios[0];
    assert_eq!(s.id, 101);
    assert_eq!(s.option(1).unwrap().outcome.fixed_cost, Some(900.0));
    assert_eq!(s.option(1).unwrap().outcome.bonus, None);
    assert!(s.option(3).is_none());
}

#[test]
fn malformed_entries_are_dropped_individually() {
    let text = r#"[
      { "id": 1, "category": "A", "description": "ok",
        "options": [ { "id": 1, "text": "x",
          "outcome": { "text": "y", "capitalChange": 0.1 } } ] },
      { "id": 2, "category": "B", "description": "missing options" },
      { "id": 3, "category": "C", "description": "unknown outcome field",
        "options": [ { "id": 1, "text": "x",
          "outcome": { "text": "y", "capitalChange": 0.1, "tax": 5 } } ] },
      { "id": 4, "category": "D", "description": "  ",
        "options": [ { "id": 1, "text": "x",
          "outcome": { "text": "y", "capitalChange": 0.1 } } ] },
      { "id": 5, "category": "E", "description": "duplicate ids",
        "options": [
          { "id": 1, "text": "x", "outcome": { "text": "y", "capitalChange": 0 } },
          { "id": 1, "text": "z", "outcome": { "text": "w", "capitalChange": 0 } } ] },
      { "id": 6, "category": "F", "description": "negative bonus",
        "options": [ { "id": 1, "text": "x",
          "outcome": { "text": "y", "capitalChange": 0, "bonus": -10 } } ] }
    ]"#;
    let scenarios = parse_scenarios(text).unwrap();
    let ids: Vec<u32> = scenarios.iter().map(|s| s.id).collect();
    assert_eq!(ids, [1]);
}

#[test]
fn batch_with_no_valid_entry_is_rejected() {
    let text = r#"[{ "id": 9, "category": "A", "description": "", "options": [] }]"#;
    assert!(matches!(
        parse_scenarios(text),
        Err(GameError::InvalidScenario { .. })
    ));
    assert!(matches!(
        parse_scenarios("[]"),
        Err(GameError::InvalidScenario { .. })
    ));
}

#[test]
fn non_array_output_is_a_decode_error() {
    assert!(matches!(
        parse_scenarios("Here are some scenarios for you!"),
        Err(GameError::Serialization(_))
    ));
    assert!(matches!(
        parse_scenarios(r#"{"scenarios": []}"#),
        Err(GameError::Serialization(_))
    ));
}

#[test]
fn scenario_serializes_with_wire_names() {
    let scenario = &parse_scenarios(GENERATED).unwrap()[0];
    let json = serde_json::to_string(scenario).unwrap();
    assert!(json.contains("\"capitalChange\""));
    assert!(json.contains("\"fixedCost\""));
    let back: Scenario = serde_json::from_str(&json).unwrap();
    assert_eq!(&back, scenario);
}

#[test]
fn deck_cycles_and_reports_the_wrap() {
    let mut deck = ScenarioDeck::new(catalog::builtin_scenarios().unwrap()).unwrap();
    assert_eq!(deck.current().id, 1);
    for _ in 0..19 {
        assert!(!deck.advance());
    }
    assert_eq!(deck.position(), 19);
    assert!(deck.advance(), "21st scenario is the first again");
    assert_eq!(deck.current().id, 1);
}

#[test]
fn empty_deck_is_rejected() {
    assert!(ScenarioDeck::new(Vec::new()).is_err());
    let mut deck = ScenarioDeck::new(catalog::builtin_scenarios().unwrap()).unwrap();
    assert!(deck.replace(Vec::new()).is_err());
    assert_eq!(deck.len(), 20);
}

#[test]
fn shuffle_is_seed_deterministic() {
    let scenarios = catalog::builtin_scenarios().unwrap();
    let order = |seed: u64| {
        let mut deck = ScenarioDeck::new(scenarios.clone()).unwrap();
        deck.shuffle(seed);
        deck.scenarios().iter().map(|s| s.id).collect::<Vec<_>>()
    };
    assert_eq!(order(11), order(11));
    assert_ne!(order(11), order(12));

    let mut sorted = order(11);
    sorted.sort_unstable();
    assert_eq!(sorted, (1..=20).collect::<Vec<u32>>());
}

fn write_catalog(content: &str) -> std::path::PathBuf {
    let path = std::env::temp_dir().join(format!("catalog-{}.json", uuid::Uuid::new_v4()));
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn catalog_file_loads_from_disk() {
    let path = write_catalog(
        r#"{ "scenarios": [
          { "id": 9, "category": "Saving", "description": "Tax refund arrives.",
            "options": [
              { "id": 1, "text": "Save it", "outcome": { "text": "Saved.", "capitalChange": 0, "bonus": 600 } },
              { "id": 2, "text": "Spend it", "outcome": { "text": "Fun.", "capitalChange": 0 } }
            ] }
        ] }"#,
    );
    let scenarios = catalog::load_catalog(path.to_str().unwrap()).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(scenarios.len(), 1);
    assert_eq!(scenarios[0].id, 9);
    assert_eq!(ScenarioDeck::new(scenarios).unwrap().current().options.len(), 2);
}

#[test]
fn catalog_file_with_a_bad_entry_fails_whole() {
    let path = write_catalog(
        r#"{ "scenarios": [
          { "id": 9, "category": "Saving", "description": "Tax refund arrives.",
            "options": [
              { "id": 1, "text": "Save it", "outcome": { "text": "Saved.", "capitalChange": 0 } },
              { "id": 1, "text": "Spend it", "outcome": { "text": "Fun.", "capitalChange": 0 } }
            ] }
        ] }"#,
    );
    let result = catalog::load_catalog(path.to_str().unwrap());
    std::fs::remove_file(&path).unwrap();

    let err = result.unwrap_err();
    assert!(err.to_string().contains("duplicate option id"), "{err}");
}

#[test]
fn missing_catalog_file_is_an_error() {
    let path = std::env::temp_dir().join(format!("catalog-{}.json", uuid::Uuid::new_v4()));
    let err = catalog::load_catalog(path.to_str().unwrap()).unwrap_err();
    assert!(err.to_string().starts_with("Cannot read"), "{err}");
}
