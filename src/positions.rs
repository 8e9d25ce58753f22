use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Generic codes that also cover their specific variants. The generic code
/// itself stays in the set.
const EXPANSIONS: &[(&str, &[&str])] = &[
    ("DC", &["DCL", "DCR"]),
    ("MC", &["MCL", "MCR"]),
    ("AM", &["AML", "AMR", "AMC"]),
    ("ST", &["STC"]),
    ("WB", &["WBL", "WBR"]),
];

/// Slot codes a player is allowed to fill.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionSet(BTreeSet<String>);

impl PositionSet {
    pub fn contains(&self, slot: &str) -> bool {
        self.0.contains(slot)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn joined(&self) -> String {
        self.iter().collect::<Vec<_>>().join(" ")
    }
}

impl FromIterator<String> for PositionSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Parse an FM position string such as `"D/WB (R), DM, AM (RLC)"`.
///
/// Each comma separated segment is `roles (sides)` where roles are split on
/// `/` and every character inside the parentheses is a side. The codes are the
/// cross product of roles and sides. A malformed segment (more than one `(`)
/// invalidates the whole string.
pub fn parse_positions(raw: &str) -> PositionSet {
    let mut codes: BTreeSet<String> = BTreeSet::new();

    for segment in raw.split(',').map(str::trim) {
        if segment.is_empty() {
            continue;
        }
        let Some((roles_part, sides)) = split_segment(segment) else {
            return PositionSet::default();
        };
        for role in roles_part.split('/').map(str::trim) {
            for side in &sides {
                let code: String = role
                    .chars()
                    .chain(side.chars())
                    .filter(|c| !c.is_whitespace())
                    .collect();
                if !code.is_empty() {
                    codes.insert(code);
                }
            }
        }
    }

    let mut expanded = codes.clone();
    for code in &codes {
        if let Some((_, extra)) = EXPANSIONS.iter().find(|(generic, _)| generic == code) {
            expanded.extend(extra.iter().map(|c| c.to_string()));
        }
    }
    PositionSet(expanded)
}

fn split_segment(segment: &str) -> Option<(&str, Vec<String>)> {
    let mut parts = segment.split('(');
    let roles_part = parts.next().unwrap_or_default();
    let Some(sides_part) = parts.next() else {
        return Some((roles_part, vec![String::new()]));
    };
    if parts.next().is_some() {
        return None;
    }
    let sides = sides_part
        .trim_matches(')')
        .chars()
        .map(|c| c.to_string())
        .collect();
    Some((roles_part, sides))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(raw: &str) -> Vec<String> {
        parse_positions(raw).iter().map(str::to_string).collect()
    }

    #[test]
    fn sides_multiply_roles() {
        assert_eq!(codes("D/WB (R)"), vec!["DR", "WBR"]);
        assert_eq!(codes("AM (RL)"), vec!["AML", "AMR"]);
    }

    #[test]
    fn bare_generic_codes_expand() {
        let set = parse_positions("AM");
        for code in ["AM", "AML", "AMR", "AMC"] {
            assert!(set.contains(code), "missing {code}");
        }
        assert_eq!(codes("ST"), vec!["ST", "STC"]);
        assert_eq!(codes("WB"), vec!["WB", "WBL", "WBR"]);
    }

    #[test]
    fn specific_codes_do_not_expand() {
        // AMC is not the generic AM code.
        assert_eq!(codes("M/AM (C)"), vec!["AMC", "MC", "MCL", "MCR"]);
        assert_eq!(codes("ST (C)"), vec!["STC"]);
    }

    #[test]
    fn blank_and_malformed_are_empty() {
        assert!(parse_positions("").is_empty());
        assert!(parse_positions(" , ").is_empty());
        assert!(parse_positions("D (R) (L)").is_empty());
        assert!(parse_positions("GK, D (R) (L)").is_empty());
    }

    #[test]
    fn whitespace_inside_sides_is_dropped() {
        assert_eq!(codes("D (R L)"), vec!["D", "DL", "DR"]);
    }
}
