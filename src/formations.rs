use serde::Serialize;

use crate::lineup::{BestXi, best_xi_for_slots};
use crate::scoring_config::ScoringConfig;
use crate::squad::Roster;

/// Raw average that maps to 100.
pub const MAX_RAW_SCORE: f64 = 200.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormationScore {
    pub name: String,
    /// 0..=100
    pub score: f64,
    pub raw_average: f64,
}

pub fn normalize_score(raw_average: f64) -> f64 {
    let scaled = raw_average / MAX_RAW_SCORE * 100.0;
    if scaled.is_finite() {
        scaled.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

/// Best XI for every configured formation, in table order.
pub fn formation_lineups<'a>(
    roster: &Roster,
    config: &'a ScoringConfig,
) -> Vec<(&'a str, BestXi)> {
    config
        .formations
        .iter()
        .map(|f| (f.name.as_str(), best_xi_for_slots(roster, &f.slots, config)))
        .collect()
}

/// Formations ordered best to worst by raw average, so lineups above the
/// clip still rank apart. The sort is stable, so equal averages keep table
/// order and the first listed formation wins a tie.
pub fn rank_formations(roster: &Roster, config: &ScoringConfig) -> Vec<FormationScore> {
    let mut ranked: Vec<FormationScore> = formation_lineups(roster, config)
        .into_iter()
        .map(|(name, xi)| FormationScore {
            name: name.to_string(),
            score: normalize_score(xi.average),
            raw_average: xi.average,
        })
        .collect();
    ranked.sort_by(|a, b| b.raw_average.total_cmp(&a.raw_average));
    ranked
}
