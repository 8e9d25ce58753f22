use std::cmp::Ordering;

use serde::Serialize;

use crate::scoring_config::ScoringConfig;
use crate::squad::{Player, Roster};

pub const STYLE_SAMPLE_SIZE: usize = 11;
const ATTRIBUTE_SCALE: f64 = 20.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyleScore {
    pub name: String,
    /// 0..=100
    pub score: f64,
}

/// Stable CA-descending order; players without CA go last.
pub fn by_ability_desc(roster: &Roster) -> Vec<&Player> {
    let mut players: Vec<&Player> = roster.iter().collect();
    players.sort_by(|a, b| match (a.ca, b.ca) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    players
}

/// Mean over the sample of each attribute (missing skipped), then the mean of
/// those per-attribute means, scaled from 0..20 to 0..100.
pub fn style_score(sample: &[&Player], attributes: &[String]) -> f64 {
    let means: Vec<f64> = attributes
        .iter()
        .filter_map(|code| {
            let values: Vec<f64> = sample.iter().filter_map(|p| p.attribute(code)).collect();
            if values.is_empty() {
                None
            } else {
                Some(values.iter().sum::<f64>() / values.len() as f64)
            }
        })
        .collect();
    if means.is_empty() {
        return 0.0;
    }
    let mean = means.iter().sum::<f64>() / means.len() as f64;
    (mean / ATTRIBUTE_SCALE * 100.0).clamp(0.0, 100.0)
}

/// Score per configured style, in table order.
pub fn rank_styles(roster: &Roster, config: &ScoringConfig) -> Vec<StyleScore> {
    let top: Vec<&Player> = by_ability_desc(roster)
        .into_iter()
        .take(STYLE_SAMPLE_SIZE)
        .collect();
    config
        .styles
        .iter()
        .map(|style| StyleScore {
            name: style.name.clone(),
            score: style_score(&top, &style.attributes),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::squad::PlayerRecord;

    fn record(name: &str, ca: Option<f64>, pas: Option<f64>) -> PlayerRecord {
        PlayerRecord {
            name: name.to_string(),
            ca,
            attributes: [("Pas".to_string(), pas)].into_iter().collect(),
            ..Default::default()
        }
    }

    #[test]
    fn missing_ability_sorts_last_and_ties_are_stable() {
        let roster = Roster::from_records([
            record("NoCa", None, None),
            record("A", Some(120.0), None),
            record("B", Some(150.0), None),
            record("C", Some(120.0), None),
        ]);
        let names: Vec<&str> = by_ability_desc(&roster)
            .into_iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, vec!["B", "A", "C", "NoCa"]);
    }

    #[test]
    fn only_attributes_with_values_count() {
        let roster = Roster::from_records([
            record("A", Some(100.0), Some(10.0)),
            record("B", Some(90.0), None),
            record("C", Some(80.0), Some(20.0)),
        ]);
        let players: Vec<&Player> = roster.iter().collect();
        let attrs = vec!["Pas".to_string(), "Tec".to_string()];
        // Pas mean 15, Tec absent entirely.
        assert!((style_score(&players, &attrs) - 75.0).abs() < 1e-9);
        assert_eq!(style_score(&players, &["Tec".to_string()]), 0.0);
    }

    #[test]
    fn only_top_eleven_are_sampled() {
        let mut records: Vec<PlayerRecord> = (0..11)
            .map(|i| record(&format!("Top{i}"), Some(150.0), Some(20.0)))
            .collect();
        records.push(record("Bench", Some(60.0), Some(0.0)));
        let roster = Roster::from_records(records);
        let mut config = ScoringConfig::default();
        config.styles.retain(|s| s.name == "Tiki-Taka");
        let scores = rank_styles(&roster, &config);
        assert_eq!(scores.len(), 1);
        assert!((scores[0].score - 100.0).abs() < 1e-9);
    }
}
