use std::fs;
use std::path::PathBuf;

use fm_squad_terminal::scorer::SquadScorer;
use fm_squad_terminal::scoring_config::ScoringConfig;
use fm_squad_terminal::squad::{PlayerRecord, Roster};

const SMALL_CONFIG: &str = r#"{
  "formations": [
    { "name": "Keeper Only", "slots": ["GK"] },
    { "name": "Keeper And Nine", "slots": ["GK", "STC"] }
  ],
  "position_attributes": {
    "GK": ["Ref"],
    "STC": ["Fin"]
  },
  "attribute_weights": { "Ref": 2.0 },
  "styles": [
    { "name": "Shot Stopping", "attributes": ["Ref"] }
  ]
}"#;

fn temp_path(name: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!("fm_squad_{}_{name}", std::process::id()));
    path
}

fn keeper() -> Roster {
    Roster::from_records([PlayerRecord {
        name: "Gloves".to_string(),
        position: "GK".to_string(),
        ca: Some(100.0),
        attributes: [("Ref".to_string(), Some(10.0))].into_iter().collect(),
        ..Default::default()
    }])
}

#[test]
fn json_file_replaces_builtin_tables() {
    let path = temp_path("config.json");
    fs::write(&path, SMALL_CONFIG).unwrap();
    let config = ScoringConfig::load(&path).expect("config should load");
    let _ = fs::remove_file(&path);

    let scorer = SquadScorer::new(config).unwrap();
    let names: Vec<&str> = scorer.formation_names().collect();
    assert_eq!(names, ["Keeper Only", "Keeper And Nine"]);

    let ranked = scorer.rank_formations(&keeper());
    // 70 + 3 * 10 = 100 for the keeper; the nine slot halves the second average.
    assert_eq!(ranked[0].name, "Keeper Only");
    assert!((ranked[0].score - 50.0).abs() < 1e-9);
    assert!((ranked[1].score - 25.0).abs() < 1e-9);

    let styles = scorer.rank_styles(&keeper());
    assert_eq!(styles.len(), 1);
    assert!((styles[0].score - 50.0).abs() < 1e-9);
}

#[test]
fn invalid_json_is_rejected_with_context() {
    let broken = SMALL_CONFIG.replace("\"STC\": [\"Fin\"]", "\"STC\": []");
    let err = ScoringConfig::from_json(&broken).unwrap_err();
    assert!(format!("{err:#}").contains("STC"));

    assert!(ScoringConfig::from_json("{ not json").is_err());
    assert!(ScoringConfig::load(&temp_path("missing.json")).is_err());
}

#[test]
fn scorer_rejects_config_without_formations() {
    let mut config = ScoringConfig::default();
    config.formations.clear();
    let err = SquadScorer::new(config).unwrap_err();
    assert!(format!("{err:#}").contains("invalid scoring config"));
}
