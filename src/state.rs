use std::collections::VecDeque;
use std::path::PathBuf;

use crate::formations::FormationScore;
use crate::lineup::BestXi;
use crate::scorer::SquadScorer;
use crate::squad::Roster;
use crate::squad_report::{REPORT_SIZE, ReportRow, bottom_by_ability, top_by_ability, wonderkids};
use crate::styles::StyleScore;

const MAX_LOGS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SquadTab {
    Squad,
    Formations,
    Tactics,
    Best,
    Worst,
    Wonderkids,
}

impl SquadTab {
    pub const ALL: [SquadTab; 6] = [
        SquadTab::Squad,
        SquadTab::Formations,
        SquadTab::Tactics,
        SquadTab::Best,
        SquadTab::Worst,
        SquadTab::Wonderkids,
    ];

    fn index(self) -> usize {
        Self::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }
}

pub fn tab_label(tab: SquadTab) -> &'static str {
    match tab {
        SquadTab::Squad => "Squad",
        SquadTab::Formations => "Formations",
        SquadTab::Tactics => "Tactics",
        SquadTab::Best => "Best",
        SquadTab::Worst => "Worst",
        SquadTab::Wonderkids => "Wonderkids",
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct XiOverlay {
    pub formation: String,
    pub xi: BestXi,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub scorer: SquadScorer,
    pub roster: Roster,
    pub source: Option<PathBuf>,
    pub tab: SquadTab,
    pub selected: usize,
    pub formations: Vec<FormationScore>,
    pub styles: Vec<StyleScore>,
    pub best: Vec<ReportRow>,
    pub worst: Vec<ReportRow>,
    pub wonderkids: Vec<ReportRow>,
    pub xi_overlay: Option<XiOverlay>,
    pub assessment: Option<String>,
    pub assessment_loading: bool,
    pub help_overlay: bool,
    pub logs: VecDeque<String>,
}

impl AppState {
    pub fn new(scorer: SquadScorer) -> Self {
        Self {
            scorer,
            roster: Roster::default(),
            source: None,
            tab: SquadTab::Squad,
            selected: 0,
            formations: Vec::new(),
            styles: Vec::new(),
            best: Vec::new(),
            worst: Vec::new(),
            wonderkids: Vec::new(),
            xi_overlay: None,
            assessment: None,
            assessment_loading: false,
            help_overlay: false,
            logs: VecDeque::new(),
        }
    }

    /// Swap in a freshly parsed roster; every derived table is rebuilt.
    pub fn set_roster(&mut self, roster: Roster, source: Option<PathBuf>) {
        self.roster = roster;
        self.source = source;
        self.xi_overlay = None;
        self.assessment = None;
        self.recompute();
        let from = self
            .source
            .as_ref()
            .map(|p| format!(" from {}", p.display()))
            .unwrap_or_default();
        self.push_log(format!("[INFO] Loaded {} players{from}", self.roster.len()));
        if let Some(best) = self.formations.first()
            && !self.roster.is_empty()
        {
            self.push_log(format!(
                "[INFO] Best formation: {} ({:.2}/100)",
                best.name, best.score
            ));
        }
    }

    pub fn recompute(&mut self) {
        self.formations = self.scorer.rank_formations(&self.roster);
        self.styles = self.scorer.rank_styles(&self.roster);
        self.best = top_by_ability(&self.roster, REPORT_SIZE);
        self.worst = bottom_by_ability(&self.roster, REPORT_SIZE);
        self.wonderkids = wonderkids(&self.roster);
        self.clamp_selection();
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    pub fn set_tab(&mut self, tab: SquadTab) {
        if self.tab != tab {
            self.tab = tab;
            self.selected = 0;
        }
    }

    pub fn next_tab(&mut self) {
        let idx = (self.tab.index() + 1) % SquadTab::ALL.len();
        self.set_tab(SquadTab::ALL[idx]);
    }

    pub fn prev_tab(&mut self) {
        let len = SquadTab::ALL.len();
        let idx = (self.tab.index() + len - 1) % len;
        self.set_tab(SquadTab::ALL[idx]);
    }

    pub fn tab_len(&self) -> usize {
        match self.tab {
            SquadTab::Squad => self.roster.len(),
            SquadTab::Formations => self.formations.len(),
            SquadTab::Tactics => self.styles.len(),
            SquadTab::Best => self.best.len(),
            SquadTab::Worst => self.worst.len(),
            SquadTab::Wonderkids => self.wonderkids.len(),
        }
    }

    pub fn select_next(&mut self) {
        let len = self.tab_len();
        if len == 0 {
            self.selected = 0;
            return;
        }
        self.selected = (self.selected + 1).min(len - 1);
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn clamp_selection(&mut self) {
        let len = self.tab_len();
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    pub fn selected_formation(&self) -> Option<&FormationScore> {
        if self.tab != SquadTab::Formations {
            return None;
        }
        self.formations.get(self.selected)
    }

    /// Best XI for the highlighted formation row.
    pub fn open_best_xi(&mut self) {
        let Some(name) = self.selected_formation().map(|f| f.name.clone()) else {
            return;
        };
        match self.scorer.best_xi(&self.roster, &name) {
            Some(xi) => {
                self.xi_overlay = Some(XiOverlay {
                    formation: name,
                    xi,
                });
            }
            None => self.push_log(format!("[WARN] Unknown formation {name}")),
        }
    }

    pub fn close_overlays(&mut self) {
        self.xi_overlay = None;
        self.assessment = None;
        self.help_overlay = false;
    }

    pub fn has_overlay(&self) -> bool {
        self.xi_overlay.is_some() || self.assessment.is_some() || self.help_overlay
    }
}
