use anyhow::{Context, Result};

use crate::formations::{FormationScore, rank_formations};
use crate::lineup::{BestXi, best_xi_for_slots};
use crate::scoring_config::ScoringConfig;
use crate::squad::Roster;
use crate::styles::{StyleScore, rank_styles};

/// Entry point for display code. Holds a configuration that has already
/// passed validation; every call recomputes from the roster it is given.
#[derive(Debug, Clone)]
pub struct SquadScorer {
    config: ScoringConfig,
}

impl SquadScorer {
    pub fn new(config: ScoringConfig) -> Result<Self> {
        config.validate().context("invalid scoring config")?;
        Ok(Self { config })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(ScoringConfig::from_env()?)
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn formation_names(&self) -> impl Iterator<Item = &str> {
        self.config.formations.iter().map(|f| f.name.as_str())
    }

    pub fn rank_formations(&self, roster: &Roster) -> Vec<FormationScore> {
        rank_formations(roster, &self.config)
    }

    pub fn best_formation(&self, roster: &Roster) -> Option<FormationScore> {
        self.rank_formations(roster).into_iter().next()
    }

    /// `None` for a formation name that is not in the table.
    pub fn best_xi(&self, roster: &Roster, formation: &str) -> Option<BestXi> {
        let def = self.config.formation(formation)?;
        Some(best_xi_for_slots(roster, &def.slots, &self.config))
    }

    pub fn rank_styles(&self, roster: &Roster) -> Vec<StyleScore> {
        rank_styles(roster, &self.config)
    }
}

impl Default for SquadScorer {
    fn default() -> Self {
        Self {
            config: ScoringConfig::default(),
        }
    }
}
