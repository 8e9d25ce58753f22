use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::positions::{PositionSet, parse_positions};

/// One row as handed over by the squad parser. Numeric fields that could not
/// be read stay `None`; they are never coerced to zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub name: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub ca: Option<f64>,
    #[serde(default)]
    pub pa: Option<f64>,
    #[serde(default)]
    pub age: Option<f64>,
    #[serde(default)]
    pub attributes: BTreeMap<String, Option<f64>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub name: String,
    pub position: String,
    pub ca: Option<f64>,
    pub pa: Option<f64>,
    pub age: Option<f64>,
    pub attributes: BTreeMap<String, Option<f64>>,
    pub positions: PositionSet,
}

impl Player {
    pub fn from_record(record: PlayerRecord) -> Self {
        let positions = parse_positions(&record.position);
        Self {
            name: record.name,
            position: record.position,
            ca: finite(record.ca),
            pa: finite(record.pa),
            age: finite(record.age),
            attributes: record.attributes,
            positions,
        }
    }

    /// Attribute value if present and a real number.
    pub fn attribute(&self, code: &str) -> Option<f64> {
        finite(self.attributes.get(code).copied().flatten())
    }

    pub fn can_play(&self, slot: &str) -> bool {
        self.positions.contains(slot)
    }
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// Players in the order the parser produced them. That order is the
/// tie-break everywhere a "first seen wins" rule applies.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Roster {
    players: Vec<Player>,
}

impl Roster {
    pub fn from_records(records: impl IntoIterator<Item = PlayerRecord>) -> Self {
        Self {
            players: records.into_iter().map(Player::from_record).collect(),
        }
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Player> {
        self.players.iter()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn find(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.name == name)
    }

    /// Every attribute code present anywhere in the roster, sorted.
    pub fn attribute_codes(&self) -> Vec<String> {
        let codes: BTreeSet<&String> = self
            .players
            .iter()
            .flat_map(|p| p.attributes.keys())
            .collect();
        codes.into_iter().cloned().collect()
    }
}

impl<'a> IntoIterator for &'a Roster {
    type Item = &'a Player;
    type IntoIter = std::slice::Iter<'a, Player>;

    fn into_iter(self) -> Self::IntoIter {
        self.players.iter()
    }
}
