use std::io;
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap};

use fm_squad_terminal::assessment::{self, AssessmentConfig};
use fm_squad_terminal::html_import::load_squad_file;
use fm_squad_terminal::scorer::SquadScorer;
use fm_squad_terminal::squad_export::{export_path_from_env, export_squad_report};
use fm_squad_terminal::squad_report::ReportRow;
use fm_squad_terminal::state::{tab_label, AppState, SquadTab};

struct App {
    state: AppState,
    should_quit: bool,
    assessment_cfg: AssessmentConfig,
    assessment_tx: mpsc::Sender<Result<String, String>>,
    assessment_rx: mpsc::Receiver<Result<String, String>>,
}

impl App {
    fn new(state: AppState) -> Self {
        let (assessment_tx, assessment_rx) = mpsc::channel();
        Self {
            state,
            should_quit: false,
            assessment_cfg: AssessmentConfig::from_env(),
            assessment_tx,
            assessment_rx,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if self.state.has_overlay() {
            match key.code {
                KeyCode::Esc | KeyCode::Char('b') | KeyCode::Enter => self.state.close_overlays(),
                KeyCode::Char('q') => self.should_quit = true,
                KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Tab => self.state.next_tab(),
            KeyCode::BackTab => self.state.prev_tab(),
            KeyCode::Char(c @ '1'..='6') => {
                let idx = (c as usize) - ('1' as usize);
                self.state.set_tab(SquadTab::ALL[idx]);
            }
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
            KeyCode::Enter | KeyCode::Char('d') => self.state.open_best_xi(),
            KeyCode::Char('a') | KeyCode::Char('A') => self.request_assessment(),
            KeyCode::Char('e') | KeyCode::Char('E') => self.export(),
            KeyCode::Char('r') | KeyCode::Char('R') => self.reload(),
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            _ => {}
        }
    }

    fn reload(&mut self) {
        let Some(path) = self.state.source.clone() else {
            self.state.push_log("[INFO] No squad file to reload");
            return;
        };
        match load_squad_file(&path) {
            Ok(roster) => self.state.set_roster(roster, Some(path)),
            Err(err) => self.state.push_log(format!("[ERROR] {err:#}")),
        }
    }

    fn export(&mut self) {
        let path = PathBuf::from(export_path_from_env());
        match export_squad_report(&path, &self.state.roster, &self.state.scorer) {
            Ok(report) => self.state.push_log(format!(
                "[INFO] Exported {} formations, {} players to {}",
                report.formations,
                report.players,
                path.display()
            )),
            Err(err) => self.state.push_log(format!("[ERROR] Export failed: {err:#}")),
        }
    }

    fn request_assessment(&mut self) {
        if self.state.assessment_loading {
            self.state.push_log("[INFO] Assessment already running");
            return;
        }
        self.state.assessment_loading = true;
        self.state.push_log("[INFO] Assessment request sent");
        let cfg = self.assessment_cfg.clone();
        let roster = self.state.roster.clone();
        let tx = self.assessment_tx.clone();
        thread::spawn(move || {
            let result = assessment::assess_squad(&cfg, &roster).map_err(|err| format!("{err:#}"));
            let _ = tx.send(result);
        });
    }

    fn poll_assessment(&mut self) {
        while let Ok(result) = self.assessment_rx.try_recv() {
            self.state.assessment_loading = false;
            match result {
                Ok(text) => {
                    self.state.push_log("[INFO] Assessment ready");
                    self.state.assessment = Some(text);
                }
                Err(err) => {
                    self.state.push_log(format!("[WARN] Assessment failed: {err}"));
                    self.state.assessment = Some(format!("Error generating assessment: {err}"));
                }
            }
        }
    }
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let scorer = match SquadScorer::from_env() {
        Ok(scorer) => scorer,
        Err(err) => {
            eprintln!("error: {err:#}");
            std::process::exit(1);
        }
    };

    let mut state = AppState::new(scorer);
    match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => match load_squad_file(&path) {
            Ok(roster) => state.set_roster(roster, Some(path)),
            Err(err) => state.push_log(format!("[ERROR] {err:#}")),
        },
        None => {
            state.recompute();
            state.push_log("[INFO] No squad file given; pass an exported squad .html");
        }
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let mut app = App::new(state);
    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        app.poll_assessment();

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let state = &app.state;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(2),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(state)).block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);
    frame.render_widget(Paragraph::new(tabs_line(state.tab)), chunks[1]);

    match state.tab {
        SquadTab::Squad => render_squad(frame, chunks[2], state),
        SquadTab::Formations => render_formations(frame, chunks[2], state),
        SquadTab::Tactics => render_styles(frame, chunks[2], state),
        SquadTab::Best => render_report(frame, chunks[2], state, &state.best, "Top 5 by CA"),
        SquadTab::Worst => render_report(frame, chunks[2], state, &state.worst, "Bottom 5 by CA"),
        SquadTab::Wonderkids => render_report(
            frame,
            chunks[2],
            state,
            &state.wonderkids,
            "Age <= 21, PA >= 150",
        ),
    }

    let footer = Paragraph::new(footer_text(state)).block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[3]);

    if let Some(overlay) = &state.xi_overlay {
        render_xi_overlay(frame, frame.size(), &overlay.formation, &overlay.xi);
    }
    if let Some(text) = &state.assessment {
        render_text_overlay(frame, frame.size(), "Squad Assessment", text);
    }
    if state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let source = state
        .source
        .as_ref()
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "no squad loaded".to_string());
    let best = if state.roster.is_empty() {
        "-".to_string()
    } else {
        state
            .formations
            .first()
            .map(|f| format!("{} ({:.2}/100)", f.name, f.score))
            .unwrap_or_else(|| "-".to_string())
    };
    let line1 = format!("  FM SQUAD TERMINAL | {} | {} players", source, state.roster.len());
    let config = state.scorer.config();
    let line2 = format!(
        "  Best formation: {best} | {} formations, {} styles",
        config.formations.len(),
        config.styles.len()
    );
    format!("{line1}\n{line2}")
}

fn tabs_line(current: SquadTab) -> Line<'static> {
    let mut spans = Vec::new();
    for (idx, tab) in SquadTab::ALL.iter().enumerate() {
        let label = format!(" {} {} ", idx + 1, tab_label(*tab));
        let style = if *tab == current {
            Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(label, style));
        spans.push(Span::raw(" "));
    }
    Line::from(spans)
}

fn footer_text(state: &AppState) -> String {
    let keys = match state.tab {
        SquadTab::Formations => {
            "Tab/1-6 Tabs | j/k Move | Enter Best XI | a Assess | e Export | r Reload | ? Help | q Quit"
        }
        _ => "Tab/1-6 Tabs | j/k Move | a Assess | e Export | r Reload | ? Help | q Quit",
    };
    let last = state.logs.back().map(String::as_str).unwrap_or("");
    let busy = if state.assessment_loading { " [assessing...]" } else { "" };
    format!("{keys}{busy}\n{last}")
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

fn render_rows(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    header: Vec<&'static str>,
    widths: Vec<Constraint>,
    rows: Vec<Vec<String>>,
    selected: usize,
) {
    let block = Block::default().title(title.to_string()).borders(Borders::ALL);
    if rows.is_empty() {
        let empty = Paragraph::new("Nothing to show")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    // Borders and the header row.
    let visible = area.height.saturating_sub(3) as usize;
    let (start, end) = visible_range(selected, rows.len(), visible.max(1));
    let body: Vec<Row> = rows
        .into_iter()
        .enumerate()
        .skip(start)
        .take(end - start)
        .map(|(idx, cells)| {
            let style = if idx == selected {
                Style::default().fg(Color::White).bg(Color::DarkGray)
            } else {
                Style::default()
            };
            Row::new(cells.into_iter().map(Cell::from)).style(style)
        })
        .collect();

    let header = Row::new(header).style(Style::default().add_modifier(Modifier::BOLD));
    let table = Table::new(body, widths).header(header).block(block);
    frame.render_widget(table, area);
}

fn render_squad(frame: &mut Frame, area: Rect, state: &AppState) {
    let rows = state
        .roster
        .iter()
        .map(|p| {
            vec![
                p.name.clone(),
                p.position.clone(),
                p.positions.joined(),
                fmt_opt(p.ca),
                fmt_opt(p.pa),
                fmt_opt(p.age),
            ]
        })
        .collect();
    render_rows(
        frame,
        area,
        "Squad",
        vec!["Name", "Position", "Slots", "CA", "PA", "Age"],
        vec![
            Constraint::Percentage(24),
            Constraint::Percentage(20),
            Constraint::Percentage(32),
            Constraint::Percentage(8),
            Constraint::Percentage(8),
            Constraint::Percentage(8),
        ],
        rows,
        state.selected,
    );
}

fn render_formations(frame: &mut Frame, area: Rect, state: &AppState) {
    let rows = state
        .formations
        .iter()
        .enumerate()
        .map(|(idx, f)| {
            vec![
                (idx + 1).to_string(),
                f.name.clone(),
                format!("{:.2}", f.score),
                score_bar(f.score, 30),
            ]
        })
        .collect();
    render_rows(
        frame,
        area,
        "Formations (Enter for Best XI)",
        vec!["#", "Formation", "Score", ""],
        vec![
            Constraint::Length(4),
            Constraint::Length(12),
            Constraint::Length(8),
            Constraint::Min(10),
        ],
        rows,
        state.selected,
    );
}

fn render_styles(frame: &mut Frame, area: Rect, state: &AppState) {
    let rows = state
        .styles
        .iter()
        .map(|s| vec![s.name.clone(), format!("{:.2}", s.score), score_bar(s.score, 30)])
        .collect();
    render_rows(
        frame,
        area,
        "Tactical styles (top 11 by CA)",
        vec!["Style", "Score", ""],
        vec![
            Constraint::Length(24),
            Constraint::Length(8),
            Constraint::Min(10),
        ],
        rows,
        state.selected,
    );
}

fn render_report(frame: &mut Frame, area: Rect, state: &AppState, rows: &[ReportRow], title: &str) {
    let rows = rows
        .iter()
        .map(|r| vec![r.name.clone(), fmt_opt(r.ca), fmt_opt(r.pa), fmt_opt(r.age)])
        .collect();
    render_rows(
        frame,
        area,
        title,
        vec!["Name", "CA", "PA", "Age"],
        vec![
            Constraint::Percentage(52),
            Constraint::Percentage(16),
            Constraint::Percentage(16),
            Constraint::Percentage(16),
        ],
        rows,
        state.selected,
    );
}

fn render_xi_overlay(frame: &mut Frame, area: Rect, formation: &str, xi: &fm_squad_terminal::lineup::BestXi) {
    let popup_area = centered_rect(60, 70, area);
    frame.render_widget(Clear, popup_area);

    let mut rows: Vec<Row> = xi
        .rows
        .iter()
        .map(|r| {
            let style = if r.is_filled() {
                Style::default()
            } else {
                Style::default().fg(Color::DarkGray)
            };
            Row::new(vec![
                r.slot.clone(),
                r.player_label().to_string(),
                format!("{:.2}", r.score),
            ])
            .style(style)
        })
        .collect();
    rows.push(
        Row::new(vec![
            "Avg".to_string(),
            format!("{}/{} filled", xi.filled(), xi.rows.len()),
            format!("{:.2}", xi.average),
        ])
        .style(Style::default().add_modifier(Modifier::BOLD)),
    );

    let table = Table::new(
        rows,
        [
            Constraint::Length(6),
            Constraint::Min(12),
            Constraint::Length(8),
        ],
    )
    .header(Row::new(vec!["Position", "Name", "Score"]).style(Style::default().add_modifier(Modifier::BOLD)))
    .block(
        Block::default()
            .title(format!("Best XI - {formation}"))
            .borders(Borders::ALL),
    );
    frame.render_widget(table, popup_area);
}

fn render_text_overlay(frame: &mut Frame, area: Rect, title: &str, text: &str) {
    let popup_area = centered_rect(70, 70, area);
    frame.render_widget(Clear, popup_area);
    let body = Paragraph::new(text.to_string())
        .wrap(Wrap { trim: false })
        .block(Block::default().title(title.to_string()).borders(Borders::ALL));
    frame.render_widget(body, popup_area);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "FM Squad Terminal - Help",
        "",
        "Global:",
        "  Tab / Shift-Tab  Next / previous tab",
        "  1-6              Jump to tab",
        "  j/k or ↑/↓       Move",
        "  a                Assess squad (OPENAI_API_KEY)",
        "  e                Export workbook (SQUAD_EXPORT_PATH)",
        "  r                Reload squad file",
        "  ?                Toggle help",
        "  q                Quit",
        "",
        "Formations:",
        "  Enter / d        Best XI for the selected formation",
        "  Esc / b          Close overlay",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}

fn score_bar(score: f64, width: usize) -> String {
    let filled = ((score.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled.min(width)))
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.0}")).unwrap_or_else(|| "-".to_string())
}
