//! Reads the squad table Football Manager writes with "Print screen > Web page".
//!
//! The first `<table>` in the document is read: its first row is the header
//! and every later row is a player. Header lookup is case-insensitive.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use scraper::{ElementRef, Html, Selector};

use crate::squad::{PlayerRecord, Roster};

const NAME_HEADERS: &[&str] = &["NAME", "PLAYER"];
// Older exports label current ability as "Ability" or "Rating".
const ABILITY_HEADERS: &[&str] = &["CA", "ABILITY", "RATING"];
const FIRST_ATTRIBUTE_HEADER: &str = "ACC";
const NAME_SUFFIX: &str = " - Pick Player";

pub fn load_squad_file(path: &Path) -> Result<Roster> {
    let bytes = fs::read(path).with_context(|| format!("read squad file {}", path.display()))?;
    let html = String::from_utf8_lossy(&bytes);
    parse_squad_html(&html).with_context(|| format!("parse squad file {}", path.display()))
}

pub fn parse_squad_html(html: &str) -> Result<Roster> {
    Ok(Roster::from_records(parse_player_records(html)?))
}

pub fn parse_player_records(html: &str) -> Result<Vec<PlayerRecord>> {
    let document = Html::parse_document(html);
    let table_selector =
        Selector::parse("table").map_err(|e| anyhow!("Failed to create table selector: {}", e))?;
    let row_selector =
        Selector::parse("tr").map_err(|e| anyhow!("Failed to create row selector: {}", e))?;
    let cell_selector = Selector::parse("td, th")
        .map_err(|e| anyhow!("Failed to create cell selector: {}", e))?;

    let table = document
        .select(&table_selector)
        .next()
        .ok_or_else(|| anyhow!("no <table> found"))?;

    let mut rows = table
        .select(&row_selector)
        .map(|row| {
            row.select(&cell_selector)
                .map(cell_text)
                .collect::<Vec<String>>()
        })
        .filter(|cells| !cells.is_empty());
    let header = rows.next().ok_or_else(|| anyhow!("table has no rows"))?;
    let columns = Columns::from_header(&header)?;

    Ok(rows.filter_map(|cells| columns.record(&cells)).collect())
}

struct Columns {
    name: usize,
    position: Option<usize>,
    ca: Option<usize>,
    pa: Option<usize>,
    age: Option<usize>,
    attributes: Vec<(usize, String)>,
}

impl Columns {
    fn from_header(header: &[String]) -> Result<Self> {
        let upper: Vec<String> = header.iter().map(|h| h.to_uppercase()).collect();
        let find = |names: &[&str]| {
            names
                .iter()
                .find_map(|n| upper.iter().position(|h| h == n))
        };

        let name = find(NAME_HEADERS).ok_or_else(|| anyhow!("no Name/Player column in header"))?;
        let attributes = match find(&[FIRST_ATTRIBUTE_HEADER]) {
            Some(first) => header
                .iter()
                .enumerate()
                .skip(first)
                .map(|(idx, code)| (idx, code.clone()))
                .collect(),
            None => Vec::new(),
        };

        Ok(Self {
            name,
            position: find(&["POSITION"]),
            ca: find(ABILITY_HEADERS),
            pa: find(&["PA"]),
            age: find(&["AGE"]),
            attributes,
        })
    }

    fn record(&self, cells: &[String]) -> Option<PlayerRecord> {
        let name = cells.get(self.name)?;
        let name = name.strip_suffix(NAME_SUFFIX).unwrap_or(name).trim();
        if name.is_empty() {
            return None;
        }
        let number = |idx: Option<usize>| idx.and_then(|i| cells.get(i)).and_then(|c| parse_number(c));

        let attributes: BTreeMap<String, Option<f64>> = self
            .attributes
            .iter()
            .map(|(idx, code)| (code.clone(), cells.get(*idx).and_then(|c| parse_number(c))))
            .collect();

        Some(PlayerRecord {
            name: name.to_string(),
            position: self
                .position
                .and_then(|i| cells.get(i))
                .cloned()
                .unwrap_or_default(),
            ca: number(self.ca),
            pa: number(self.pa),
            age: number(self.age),
            attributes,
        })
    }
}

/// Text content with entities decoded and whitespace (including `&nbsp;`)
/// collapsed to single spaces.
fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Blank, `-`, scouting ranges like `12-15` and anything else non-numeric
/// become missing rather than zero.
fn parse_number(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() || s == "-" {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_text_strips_markup_and_decodes_entities() {
        let html = "<table><tr><th>Name</th></tr>\
            <tr><td> <a href=\"x\">Jo&nbsp;Smith</a>\n </td></tr>\
            <tr><td>R&amp;D</td></tr>\
            <tr><td>Jos&#233; &eacute;lan</td></tr></table>";
        let names: Vec<String> = parse_player_records(html)
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, ["Jo Smith", "R&D", "José élan"]);
    }

    #[test]
    fn numbers_never_default_to_zero() {
        assert_eq!(parse_number("142"), Some(142.0));
        assert_eq!(parse_number(" 7.5 "), Some(7.5));
        assert_eq!(parse_number("-"), None);
        assert_eq!(parse_number("12-15"), None);
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("NaN"), None);
    }

    #[test]
    fn unclosed_cells_and_rows_still_split() {
        let html = "<table><tr><th>Name<th>CA<tr><td>A<td>100<tr><td>B<td>90</table>";
        let records = parse_player_records(html).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].name, "B");
        assert_eq!(records[1].ca, Some(90.0));
    }

    #[test]
    fn ability_column_falls_back_to_older_labels() {
        let html = "<table><tr><th>Name</th><th>Rating</th></tr>\
            <tr><td>A</td><td>131</td></tr></table>";
        assert_eq!(parse_player_records(html).unwrap()[0].ca, Some(131.0));

        let html = "<table><tr><th>Name</th><th>Ability</th><th>CA</th></tr>\
            <tr><td>A</td><td>90</td><td>120</td></tr></table>";
        assert_eq!(parse_player_records(html).unwrap()[0].ca, Some(120.0));
    }
}
