use std::collections::{BTreeMap, HashSet};
use std::env;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

pub const SCORING_CONFIG_ENV: &str = "SQUAD_SCORING_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormationDef {
    pub name: String,
    /// Filled in this order; earlier slots get first pick.
    pub slots: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleDef {
    pub name: String,
    pub attributes: Vec<String>,
}

/// Static tables behind every score. Formations and styles are kept as
/// ordered lists since their order decides ties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub formations: Vec<FormationDef>,
    pub position_attributes: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub attribute_weights: BTreeMap<String, f64>,
    #[serde(default)]
    pub styles: Vec<StyleDef>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            formations: DEFAULT_FORMATIONS
                .iter()
                .map(|(name, slots)| FormationDef {
                    name: name.to_string(),
                    slots: slots.iter().map(|s| s.to_string()).collect(),
                })
                .collect(),
            position_attributes: DEFAULT_POSITION_ATTRIBUTES
                .iter()
                .map(|(slot, attrs)| {
                    (
                        slot.to_string(),
                        attrs.iter().map(|a| a.to_string()).collect(),
                    )
                })
                .collect(),
            attribute_weights: DEFAULT_ATTRIBUTE_WEIGHTS
                .iter()
                .map(|(code, w)| (code.to_string(), *w))
                .collect(),
            styles: DEFAULT_STYLES
                .iter()
                .map(|(name, attrs)| StyleDef {
                    name: name.to_string(),
                    attributes: attrs.iter().map(|a| a.to_string()).collect(),
                })
                .collect(),
        }
    }
}

impl ScoringConfig {
    /// Built-in tables unless `SQUAD_SCORING_CONFIG` points at a JSON file.
    pub fn from_env() -> Result<Self> {
        let path = env::var(SCORING_CONFIG_ENV)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        match path {
            Some(path) => Self::load(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("read scoring config {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("load scoring config {}", path.display()))
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let config: ScoringConfig =
            serde_json::from_str(raw).context("parse scoring config json")?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("serialize scoring config")
    }

    pub fn formation(&self, name: &str) -> Option<&FormationDef> {
        self.formations.iter().find(|f| f.name == name)
    }

    pub fn slot_attributes(&self, slot: &str) -> &[String] {
        self.position_attributes
            .get(slot)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Unlisted attributes weigh 1.0.
    pub fn weight(&self, attribute: &str) -> f64 {
        self.attribute_weights.get(attribute).copied().unwrap_or(1.0)
    }

    /// Configuration integrity check. Anything that would otherwise surface
    /// mid-scoring is rejected here.
    pub fn validate(&self) -> Result<()> {
        if self.formations.is_empty() {
            bail!("scoring config has no formations");
        }
        let mut seen = HashSet::new();
        for formation in &self.formations {
            if formation.name.trim().is_empty() {
                bail!("formation with a blank name");
            }
            if !seen.insert(formation.name.as_str()) {
                bail!("duplicate formation {}", formation.name);
            }
            if formation.slots.is_empty() {
                bail!("formation {} has no slots", formation.name);
            }
            for slot in &formation.slots {
                if !self.position_attributes.contains_key(slot) {
                    bail!(
                        "formation {} uses slot {} which has no position attributes",
                        formation.name,
                        slot
                    );
                }
            }
        }

        for (slot, attrs) in &self.position_attributes {
            if attrs.is_empty() {
                bail!("slot {slot} has an empty attribute list");
            }
        }

        for (code, weight) in &self.attribute_weights {
            if !weight.is_finite() || *weight <= 0.0 {
                bail!("attribute weight for {code} must be positive, got {weight}");
            }
        }

        let mut seen = HashSet::new();
        for style in &self.styles {
            if !seen.insert(style.name.as_str()) {
                bail!("duplicate style {}", style.name);
            }
            if style.attributes.is_empty() {
                bail!("style {} has no attributes", style.name);
            }
        }
        Ok(())
    }
}

const DEFAULT_FORMATIONS: &[(&str, &[&str])] = &[
    ("4-3-3", &["GK", "DR", "DCR", "DCL", "DL", "DM", "MCR", "MCL", "AMR", "AML", "STC"]),
    ("4-4-2", &["GK", "DR", "DCR", "DCL", "DL", "MR", "ML", "MCR", "MCL", "STCR", "STCL"]),
    ("3-5-2", &["GK", "DCR", "DC", "DCL", "MR", "ML", "DM", "MCR", "MCL", "STCR", "STCL"]),
    ("4-2-3-1", &["GK", "DR", "DCR", "DCL", "DL", "MCR", "MCL", "AMR", "AMC", "AML", "STC"]),
    ("4-3-1-2", &["GK", "DR", "DCR", "DCL", "DL", "MCR", "MC", "MCL", "AMC", "STCR", "STCL"]),
    ("4-5-1", &["GK", "DR", "DCR", "DCL", "DL", "MR", "ML", "MCR", "MC", "MCL", "STC"]),
    ("4-1-4-1", &["GK", "DR", "DCR", "DCL", "DL", "DM", "MR", "ML", "MCR", "MCL", "STC"]),
    ("4-2-4", &["GK", "DR", "DCR", "DCL", "DL", "MCR", "MCL", "AMR", "AML", "STCR", "STCL"]),
    ("3-4-3", &["GK", "DCR", "DC", "DCL", "MR", "ML", "MCR", "MCL", "AMR", "AML", "STC"]),
    ("3-4-1-2", &["GK", "DCR", "DC", "DCL", "MR", "ML", "MCR", "MCL", "AMC", "STCR", "STCL"]),
    ("5-3-2", &["GK", "WBR", "DCR", "DC", "DCL", "WBL", "MCR", "MC", "MCL", "STCR", "STCL"]),
    ("5-4-1", &["GK", "WBR", "DCR", "DC", "DCL", "WBL", "MR", "ML", "MCR", "MCL", "STC"]),
    ("3-4-2-1", &["GK", "DCR", "DC", "DCL", "MR", "ML", "MCR", "MCL", "AMR", "AML", "STC"]),
    ("4-2-2-2", &["GK", "DR", "DCR", "DCL", "DL", "MCR", "MCL", "AMR", "AML", "STCR", "STCL"]),
    ("4-3-2-1", &["GK", "DR", "DCR", "DCL", "DL", "MCR", "MC", "MCL", "AMR", "AML", "STC"]),
];

const DEFAULT_POSITION_ATTRIBUTES: &[(&str, &[&str])] = &[
    ("GK", &["Ref", "One", "Han", "Aer"]),
    ("DL", &["Acc", "Pac", "Tck", "Mar", "Cro"]),
    ("DR", &["Acc", "Pac", "Tck", "Mar", "Cro"]),
    ("DCL", &["Tck", "Mar", "Pos", "Jum", "Hea"]),
    ("DCR", &["Tck", "Mar", "Pos", "Jum", "Hea"]),
    ("DC", &["Tck", "Mar", "Pos", "Jum", "Hea"]),
    ("DM", &["Tck", "Pos", "Tea", "Sta", "Pas"]),
    ("MCL", &["Pas", "Tec", "Sta", "Dec"]),
    ("MCR", &["Pas", "Tec", "Sta", "Dec"]),
    ("MC", &["Pas", "Tec", "Sta", "Dec"]),
    ("ML", &["Cro", "Pas", "Tec", "Sta", "Acc"]),
    ("MR", &["Cro", "Pas", "Tec", "Sta", "Acc"]),
    ("AML", &["Dri", "Pas", "Tec", "Fla", "Fin"]),
    ("AMR", &["Dri", "Pas", "Tec", "Fla", "Fin"]),
    ("AMC", &["Dri", "Pas", "Tec", "Fla", "Fin"]),
    ("STC", &["Fin", "Cmp", "Tec", "Acc", "Str"]),
    ("STCL", &["Fin", "Cmp", "Tec", "Acc", "Str"]),
    ("STCR", &["Fin", "Cmp", "Tec", "Acc", "Str"]),
    ("WBR", &["Acc", "Pac", "Cro", "Sta", "Tck"]),
    ("WBL", &["Acc", "Pac", "Cro", "Sta", "Tck"]),
];

// FM-Arena attribute testing.
const DEFAULT_ATTRIBUTE_WEIGHTS: &[(&str, f64)] = &[
    ("Pac", 2.0),
    ("Acc", 1.77),
    ("Jum", 1.46),
    ("Dri", 1.38),
    ("Bal", 1.19),
    ("Con", 1.15),
    ("Ant", 1.15),
    ("Det", 1.12),
    ("Agi", 1.12),
    ("Sta", 1.08),
    ("Str", 1.08),
    ("Fir", 1.04),
    ("Cmp", 1.04),
    ("Wor", 1.04),
    ("Fin", 1.04),
    ("Fla", 1.04),
    ("LSh", 1.04),
    ("Agg", 1.04),
    ("Hea", 1.04),
    ("OTB", 1.0),
    ("Dec", 1.0),
    ("Cro", 1.0),
    ("Vis", 1.0),
    ("Tck", 1.04),
    ("Pos", 1.04),
    ("Tec", 1.04),
    ("Mar", 1.04),
    ("Pas", 1.08),
    ("Bra", 1.04),
    ("Tea", 1.08),
];

const DEFAULT_STYLES: &[(&str, &[&str])] = &[
    ("Gegenpress", &["Wor", "Sta", "Agg"]),
    ("Tiki-Taka", &["Pas", "Tec", "Cmp"]),
    ("Vertical Tiki-Taka", &["Pas", "Tec", "Dec"]),
    ("Control Possession", &["Pas", "Dec", "Vis"]),
    ("Wing Play", &["Acc", "Pac", "Cro"]),
    ("Route One", &["Jum", "Hea", "Str"]),
    ("Fluid Counter-Attack", &["Acc", "Pac", "Dec"]),
    ("Direct Counter-Attack", &["Acc", "Pac", "Fin"]),
    ("Park the Bus", &["Tck", "Mar", "Pos"]),
    ("Catenaccio", &["Tck", "Pos", "Ant"]),
];
