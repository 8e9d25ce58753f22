use std::collections::HashSet;

use serde::Serialize;

use crate::fitness::slot_fitness;
use crate::scoring_config::ScoringConfig;
use crate::squad::{Player, Roster};

pub const EMPTY_SLOT: &str = "None";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct XiRow {
    pub slot: String,
    /// `None` when nobody eligible was left for the slot.
    pub player: Option<String>,
    pub score: f64,
}

impl XiRow {
    pub fn player_label(&self) -> &str {
        self.player.as_deref().unwrap_or(EMPTY_SLOT)
    }

    pub fn is_filled(&self) -> bool {
        self.player.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BestXi {
    pub rows: Vec<XiRow>,
    /// Sum of filled slot scores over the total slot count.
    pub average: f64,
}

impl BestXi {
    pub fn filled(&self) -> usize {
        self.rows.iter().filter(|r| r.is_filled()).count()
    }
}

/// Greedy slot-by-slot assignment in listed order.
///
/// Each slot takes the highest scoring eligible player not already picked.
/// Ties keep the earlier roster entry. There is no backtracking, so an early
/// slot can take a player a later slot needed more.
pub fn best_xi_for_slots<S: AsRef<str>>(
    roster: &Roster,
    slots: &[S],
    config: &ScoringConfig,
) -> BestXi {
    let mut used: HashSet<&str> = HashSet::new();
    let mut rows = Vec::with_capacity(slots.len());
    let mut total = 0.0;

    for slot in slots {
        let slot = slot.as_ref();
        match pick_for_slot(roster, slot, &used, config) {
            Some((player, score)) => {
                used.insert(player.name.as_str());
                total += score;
                rows.push(XiRow {
                    slot: slot.to_string(),
                    player: Some(player.name.clone()),
                    score,
                });
            }
            None => rows.push(XiRow {
                slot: slot.to_string(),
                player: None,
                score: 0.0,
            }),
        }
    }

    let average = if slots.is_empty() {
        0.0
    } else {
        total / slots.len() as f64
    };
    BestXi { rows, average }
}

fn pick_for_slot<'a>(
    roster: &'a Roster,
    slot: &str,
    used: &HashSet<&str>,
    config: &ScoringConfig,
) -> Option<(&'a Player, f64)> {
    let mut best: Option<(&Player, f64)> = None;
    for player in roster {
        if used.contains(player.name.as_str()) || !player.can_play(slot) {
            continue;
        }
        let score = slot_fitness(player, slot, config);
        // Strictly greater: the first candidate seen keeps a tie.
        if best.is_none_or(|(_, s)| score > s) {
            best = Some((player, score));
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::squad::PlayerRecord;

    fn record(name: &str, position: &str, ca: f64) -> PlayerRecord {
        PlayerRecord {
            name: name.to_string(),
            position: position.to_string(),
            ca: Some(ca),
            ..Default::default()
        }
    }

    #[test]
    fn ties_go_to_the_first_roster_entry() {
        let roster = Roster::from_records([record("A", "GK", 100.0), record("B", "GK", 100.0)]);
        let xi = best_xi_for_slots(&roster, &["GK", "GK"], &ScoringConfig::default());
        assert_eq!(xi.rows[0].player.as_deref(), Some("A"));
        assert_eq!(xi.rows[1].player.as_deref(), Some("B"));
    }

    #[test]
    fn earlier_slots_pick_first() {
        // The versatile player is the better DC, so the DC slot takes them
        // even though they were the only option for DR.
        let roster = Roster::from_records([
            record("Versatile", "D (RC)", 140.0),
            record("Centre", "D (C)", 120.0),
        ]);
        let xi = best_xi_for_slots(&roster, &["DCR", "DR"], &ScoringConfig::default());
        assert_eq!(xi.rows[0].player.as_deref(), Some("Versatile"));
        assert_eq!(xi.rows[1].player, None);
        assert_eq!(xi.rows[1].player_label(), EMPTY_SLOT);
    }

    #[test]
    fn empty_slot_list_averages_zero() {
        let roster = Roster::from_records([record("A", "GK", 100.0)]);
        let xi = best_xi_for_slots::<&str>(&roster, &[], &ScoringConfig::default());
        assert!(xi.rows.is_empty());
        assert_eq!(xi.average, 0.0);
    }
}
