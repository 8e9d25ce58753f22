use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};

use fm_squad_terminal::html_import::load_squad_file;
use fm_squad_terminal::scorer::SquadScorer;

struct Args {
    path: PathBuf,
    show_xi: bool,
    show_styles: bool,
}

fn parse_args() -> Result<Args> {
    let mut path = None;
    let mut show_xi = false;
    let mut show_styles = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--xi" => show_xi = true,
            "--styles" => show_styles = true,
            "-h" | "--help" => {
                eprintln!("Usage: rank_squad <squad.html> [--xi] [--styles]");
                std::process::exit(0);
            }
            other if other.starts_with("--") => return Err(anyhow!("unknown flag {other}")),
            other => path = Some(PathBuf::from(other)),
        }
    }
    let path = path.context("missing squad html path")?;
    Ok(Args {
        path,
        show_xi,
        show_styles,
    })
}

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let args = parse_args()?;
    let scorer = SquadScorer::from_env()?;
    let roster = load_squad_file(&args.path)?;
    if roster.is_empty() {
        println!("No players found in HTML file.");
        std::process::exit(1);
    }
    let unplaceable = roster.iter().filter(|p| p.positions.is_empty()).count();
    if unplaceable > 0 {
        eprintln!("[WARN] {unplaceable} players have no usable position");
    }

    let ranked = scorer.rank_formations(&roster);
    for f in &ranked {
        println!("{}: {:.2}/100", f.name, f.score);
    }
    let Some(best) = ranked.first() else {
        return Ok(());
    };
    println!("Best formation: {} (score {:.2}/100)", best.name, best.score);

    if args.show_xi
        && let Some(xi) = scorer.best_xi(&roster, &best.name)
    {
        println!();
        println!("Best XI - {}", best.name);
        for row in &xi.rows {
            println!("{:<5} {:<28} {:>7.2}", row.slot, row.player_label(), row.score);
        }
        println!("Average: {:.2}", xi.average);
    }

    if args.show_styles {
        println!();
        for style in scorer.rank_styles(&roster) {
            println!("{}: {:.2}/100", style.name, style.score);
        }
    }

    Ok(())
}
