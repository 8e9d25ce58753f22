use std::cmp::Ordering;

use serde::Serialize;

use crate::squad::{Player, Roster};
use crate::styles::by_ability_desc;

pub const WONDERKID_MAX_AGE: f64 = 21.0;
pub const WONDERKID_MIN_PA: f64 = 150.0;
pub const REPORT_SIZE: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub name: String,
    pub ca: Option<f64>,
    pub pa: Option<f64>,
    pub age: Option<f64>,
}

impl ReportRow {
    fn from_player(p: &Player) -> Self {
        Self {
            name: p.name.clone(),
            ca: p.ca,
            pa: p.pa,
            age: p.age,
        }
    }
}

pub fn top_by_ability(roster: &Roster, n: usize) -> Vec<ReportRow> {
    by_ability_desc(roster)
        .into_iter()
        .take(n)
        .map(ReportRow::from_player)
        .collect()
}

pub fn bottom_by_ability(roster: &Roster, n: usize) -> Vec<ReportRow> {
    let mut players: Vec<&Player> = roster.iter().collect();
    players.sort_by(|a, b| match (a.ca, b.ca) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    players
        .into_iter()
        .take(n)
        .map(ReportRow::from_player)
        .collect()
}

/// Young players with a high ceiling. Both age and PA must be known.
pub fn wonderkids(roster: &Roster) -> Vec<ReportRow> {
    roster
        .iter()
        .filter(|p| {
            matches!((p.age, p.pa), (Some(age), Some(pa)) if age <= WONDERKID_MAX_AGE && pa >= WONDERKID_MIN_PA)
        })
        .map(ReportRow::from_player)
        .collect()
}
