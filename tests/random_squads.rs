use std::collections::{BTreeMap, HashSet};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use fm_squad_terminal::positions::parse_positions;
use fm_squad_terminal::scorer::SquadScorer;
use fm_squad_terminal::squad::{PlayerRecord, Roster};

const POSITIONS: &[&str] = &[
    "GK",
    "D (C)",
    "D (RL)",
    "D/WB (R)",
    "D/WB (L)",
    "DM",
    "M (C)",
    "M/AM (RL)",
    "AM (C)",
    "AM (RL), ST (C)",
    "ST (C)",
    "D (C), DM",
    "",
];

const CODES: &[&str] = &[
    "Acc", "Agg", "Ant", "Cmp", "Cro", "Dec", "Dri", "Fin", "Han", "Hea", "Jum", "Mar", "One",
    "Pac", "Pas", "Pos", "Ref", "Sta", "Str", "Tck", "Tea", "Tec", "Vis", "Wor",
];

fn random_roster(rng: &mut StdRng) -> Roster {
    let size = rng.gen_range(0..30);
    let records = (0..size).map(|i| {
        let attributes: BTreeMap<String, Option<f64>> = CODES
            .iter()
            .map(|code| {
                let value = if rng.gen_bool(0.1) {
                    None
                } else {
                    Some(rng.gen_range(1..=20) as f64)
                };
                (code.to_string(), value)
            })
            .collect();
        PlayerRecord {
            name: format!("Player {i}"),
            position: POSITIONS.choose(&mut *rng).copied().unwrap_or("GK").to_string(),
            ca: if rng.gen_bool(0.05) {
                None
            } else {
                Some(rng.gen_range(40..=200) as f64)
            },
            pa: Some(rng.gen_range(40..=200) as f64),
            age: Some(rng.gen_range(15..=38) as f64),
            attributes,
        }
    });
    Roster::from_records(records)
}

#[test]
fn random_rosters_respect_lineup_rules() {
    let mut rng = StdRng::seed_from_u64(7);
    let scorer = SquadScorer::default();

    for _ in 0..50 {
        let roster = random_roster(&mut rng);
        let ranked = scorer.rank_formations(&roster);
        assert_eq!(ranked.len(), 15);
        assert!(ranked.iter().all(|f| (0.0..=100.0).contains(&f.score)));
        for pair in ranked.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }

        for name in scorer.formation_names() {
            let xi = scorer.best_xi(&roster, name).unwrap();
            assert_eq!(xi.rows.len(), 11);

            let mut seen = HashSet::new();
            for row in &xi.rows {
                match row.player.as_deref() {
                    Some(player) => {
                        assert!(seen.insert(player), "{player} used twice in {name}");
                        let p = roster.find(player).unwrap();
                        assert!(p.can_play(&row.slot));
                        assert!(row.score >= 0.0);
                    }
                    None => assert_eq!(row.score, 0.0),
                }
            }
            let total: f64 = xi.rows.iter().map(|r| r.score).sum();
            assert!((xi.average - total / 11.0).abs() < 1e-9);
        }

        for style in scorer.rank_styles(&roster) {
            assert!((0.0..=100.0).contains(&style.score));
        }
    }
}

#[test]
fn random_position_strings_never_panic() {
    let mut rng = StdRng::seed_from_u64(42);
    let alphabet: Vec<char> = "DMAWBSTGKRLC(),/ ".chars().collect();
    for _ in 0..500 {
        let len = rng.gen_range(0..24);
        let raw: String = (0..len)
            .map(|_| alphabet[rng.gen_range(0..alphabet.len())])
            .collect();
        let set = parse_positions(&raw);
        assert!(set.iter().all(|code| !code.is_empty() && !code.contains(' ')));
    }
}
