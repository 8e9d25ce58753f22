use std::fs;
use std::path::PathBuf;

use fm_squad_terminal::html_import::{load_squad_file, parse_player_records, parse_squad_html};

fn fixture_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

fn read_fixture(name: &str) -> String {
    fs::read_to_string(fixture_path(name)).expect("fixture file should be readable")
}

#[test]
fn parses_exported_squad_table() {
    let roster = load_squad_file(&fixture_path("sample_squad.html")).expect("fixture should parse");
    assert_eq!(roster.len(), 15);

    let first = &roster.players()[0];
    assert_eq!(first.name, "G. Keeper");
    assert_eq!(first.position, "GK");
    assert_eq!(first.ca, Some(140.0));
    assert_eq!(first.pa, Some(150.0));
    assert_eq!(first.age, Some(24.0));
    assert!(first.can_play("GK"));
}

#[test]
fn attributes_start_at_acc() {
    let records = parse_player_records(&read_fixture("sample_squad.html")).unwrap();
    let keys: Vec<&str> = records[0].attributes.keys().map(String::as_str).collect();
    assert_eq!(keys.len(), 26);
    assert!(keys.contains(&"Acc"));
    assert!(keys.contains(&"Wor"));
    assert!(!keys.contains(&"CA"));
    assert!(!keys.contains(&"Inf"));
}

#[test]
fn unreadable_numbers_stay_missing() {
    let roster = parse_squad_html(&read_fixture("sample_squad.html")).unwrap();

    let backup = roster.find("B. Backup").expect("backup keeper");
    assert_eq!(backup.pa, None);

    let winger = roster.find("X. Winger").expect("winger");
    assert!(winger.attributes.contains_key("Pac"));
    assert_eq!(winger.attribute("Pac"), None);

    let utility = roster.find("P. Utility").expect("utility");
    assert_eq!(utility.attribute("Fin"), None);
    assert!(utility.attribute("Acc").is_some());
}

#[test]
fn position_strings_are_expanded() {
    let roster = parse_squad_html(&read_fixture("sample_squad.html")).unwrap();

    let stopper = roster.find("C. Stopper").unwrap();
    for slot in ["DC", "DCL", "DCR"] {
        assert!(stopper.can_play(slot), "stopper should cover {slot}");
    }

    let kid = roster.find("T. Kid").unwrap();
    let slots: Vec<&str> = kid.positions.iter().collect();
    assert_eq!(slots, vec!["AML", "STC"]);

    let utility = roster.find("P. Utility").unwrap();
    let slots: Vec<&str> = utility.positions.iter().collect();
    assert_eq!(slots, vec!["DL", "DM", "MC", "MCL", "MCR"]);
}

#[test]
fn header_lookup_is_case_insensitive_and_accepts_player_column() {
    let html = r#"
<TABLE class="squad">
  <TR><TH>player</TH><TH>position</TH><TH>ca</TH></TR>
  <TR><TD><b>Jo&nbsp;Smith</b></TD><TD>D (C)</TD><TD>120</TD></TR>
  <TR><TD></TD><TD>GK</TD><TD>90</TD></TR>
</TABLE>"#;
    let roster = parse_squad_html(html).unwrap();
    assert_eq!(roster.len(), 1, "nameless rows are dropped");
    let p = &roster.players()[0];
    assert_eq!(p.name, "Jo Smith");
    assert_eq!(p.ca, Some(120.0));
    assert_eq!(p.pa, None);
    assert!(p.attributes.is_empty());
}

#[test]
fn missing_position_column_leaves_players_unplaceable() {
    let html = "<table><tr><th>Name</th><th>CA</th></tr><tr><td>A</td><td>100</td></tr></table>";
    let roster = parse_squad_html(html).unwrap();
    assert_eq!(roster.len(), 1);
    assert!(roster.players()[0].positions.is_empty());
}

#[test]
fn missing_table_or_name_column_is_an_error() {
    assert!(parse_squad_html("<html><body>No squad</body></html>").is_err());
    assert!(parse_squad_html("<table><tr><th>Position</th></tr></table>").is_err());
    assert!(load_squad_file(&fixture_path("does_not_exist.html")).is_err());
}
