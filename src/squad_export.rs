use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::scorer::SquadScorer;
use crate::squad::{Player, Roster};

pub const DEFAULT_EXPORT_PATH: &str = "squad_report.xlsx";

pub struct ExportReport {
    pub formations: usize,
    pub best_formation: Option<String>,
    pub xi_rows: usize,
    pub styles: usize,
    pub players: usize,
}

pub fn export_path_from_env() -> String {
    std::env::var("SQUAD_EXPORT_PATH")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_EXPORT_PATH.to_string())
}

pub fn export_squad_report(path: &Path, roster: &Roster, scorer: &SquadScorer) -> Result<ExportReport> {
    let ranked = scorer.rank_formations(roster);
    let styles = scorer.rank_styles(roster);

    let mut formation_rows = vec![vec![
        "Rank".to_string(),
        "Formation".to_string(),
        "Score".to_string(),
        "Raw Average".to_string(),
    ]];
    for (idx, f) in ranked.iter().enumerate() {
        formation_rows.push(vec![
            (idx + 1).to_string(),
            f.name.clone(),
            format!("{:.2}", f.score),
            format!("{:.2}", f.raw_average),
        ]);
    }

    let best_formation = ranked.first().map(|f| f.name.clone());
    let mut xi_rows = vec![vec![
        "Formation".to_string(),
        "Position".to_string(),
        "Name".to_string(),
        "Score".to_string(),
    ]];
    if let Some(name) = best_formation.as_deref()
        && let Some(xi) = scorer.best_xi(roster, name)
    {
        for row in &xi.rows {
            xi_rows.push(vec![
                name.to_string(),
                row.slot.clone(),
                row.player_label().to_string(),
                format!("{:.2}", row.score),
            ]);
        }
        xi_rows.push(vec![
            name.to_string(),
            "Average".to_string(),
            String::new(),
            format!("{:.2}", xi.average),
        ]);
    }

    let mut style_rows = vec![vec!["Style".to_string(), "Score".to_string()]];
    for s in &styles {
        style_rows.push(vec![s.name.clone(), format!("{:.2}", s.score)]);
    }

    let codes = roster.attribute_codes();
    let mut squad_header = vec![
        "Name".to_string(),
        "Position".to_string(),
        "Slots".to_string(),
        "CA".to_string(),
        "PA".to_string(),
        "Age".to_string(),
    ];
    squad_header.extend(codes.iter().cloned());
    let mut squad_rows = vec![squad_header];
    squad_rows.extend(roster.iter().map(|p| squad_row(p, &codes)));

    let generated_rows = vec![
        vec!["Generated".to_string(), chrono::Utc::now().to_rfc3339()],
        vec!["Players".to_string(), roster.len().to_string()],
    ];

    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Formations")?;
        write_rows(sheet, &formation_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("BestXI")?;
        write_rows(sheet, &xi_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Styles")?;
        write_rows(sheet, &style_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Squad")?;
        write_rows(sheet, &squad_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Generated")?;
        write_rows(sheet, &generated_rows)?;
    }

    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;

    Ok(ExportReport {
        formations: formation_rows.len().saturating_sub(1),
        best_formation,
        xi_rows: xi_rows.len().saturating_sub(1),
        styles: style_rows.len().saturating_sub(1),
        players: squad_rows.len().saturating_sub(1),
    })
}

fn squad_row(p: &Player, codes: &[String]) -> Vec<String> {
    let mut row = vec![
        p.name.clone(),
        p.position.clone(),
        p.positions.joined(),
        opt_to_string(p.ca),
        opt_to_string(p.pa),
        opt_to_string(p.age),
    ];
    row.extend(codes.iter().map(|code| opt_to_string(p.attribute(code))));
    row
}

fn opt_to_string<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}
