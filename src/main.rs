use std::fs::File;
use std::io::{self, stdout, Stdout};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind, MouseButton,
        MouseEvent, MouseEventKind,
    },
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};
use tracing::{debug, trace};

use blockdrop::config::{GameConfig, DEFAULT_COLS, DEFAULT_DROP_MS, DEFAULT_NARROW_BELOW, DEFAULT_ROWS};
use blockdrop::controller::{GameLoop, Status};
use blockdrop::game::GameEvent;
use blockdrop::grid::CellState;
use blockdrop::input::{key_to_command, ButtonBar, Command};
use blockdrop::piece::Shape;
use blockdrop::viewport::Viewport;

/// Input poll timeout while no tick is pending (not started, paused, over).
const IDLE_POLL: Duration = Duration::from_millis(250);

const INFO_WIDTH: u16 = 16;

// ============================================================================
// Command Line
// ============================================================================

/// Falling-block puzzle in the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "blockdrop",
    version,
    about = "Falling-block puzzle in the terminal. Clear full rows to score; every clear speeds the drop up.",
    long_about = "Falling-block puzzle in the terminal.\n\n\
        CONTROLS:\n  Left/Right  Move    Up   Rotate    Down  Soft drop\n  \
        Enter / n   Start or restart    p / Space  Pause/resume    q / Esc  Quit\n\n\
        The button bar under the board accepts mouse clicks for the same actions."
)]
struct Args {
    /// Playfield width in cells.
    #[arg(long, default_value_t = DEFAULT_COLS, value_name = "COLS")]
    cols: usize,

    /// Playfield height in cells.
    #[arg(long, default_value_t = DEFAULT_ROWS, value_name = "ROWS")]
    rows: usize,

    /// Initial drop interval in milliseconds.
    #[arg(long, default_value_t = DEFAULT_DROP_MS, value_name = "MS")]
    drop_ms: u64,

    /// Seed for the piece generator (reproducible games).
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Terminals narrower than this use the one-column-per-cell layout.
    #[arg(long, default_value_t = DEFAULT_NARROW_BELOW, value_name = "COLS")]
    narrow_below: u16,

    /// Write logs to this file (the terminal is owned by the game).
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

impl Args {
    fn game_config(&self) -> Result<GameConfig> {
        let config = GameConfig {
            cols: self.cols,
            rows: self.rows,
            initial_drop: Duration::from_millis(self.drop_ms),
            seed: self.seed,
            ..GameConfig::default()
        };
        config.validated().context("invalid game configuration")
    }
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

// ============================================================================
// Screen Layout
// ============================================================================

/// Where everything sits for one terminal size.
struct Screen {
    viewport: Viewport,
    board: Rect,
    info: Rect,
    buttons: Rect,
    help: Rect,
}

impl Screen {
    fn new(area: Rect, args: &Args) -> Self {
        let viewport = Viewport::for_terminal(area.width, args.narrow_below, args.cols);
        let (board_width, board_height) = viewport.board_size(args.cols, args.rows);
        let total_width = board_width.saturating_add(INFO_WIDTH).max(ButtonBar::width());
        let total_height = board_height.saturating_add(2);
        let main_area = centered_rect(total_width, total_height, area);

        let vertical = Layout::vertical([
            Constraint::Length(board_height),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(main_area);

        let horizontal = Layout::horizontal([
            Constraint::Length(board_width),
            Constraint::Length(INFO_WIDTH),
        ])
        .split(vertical[0]);

        Self {
            viewport,
            board: horizontal[0],
            info: horizontal[1],
            buttons: vertical[1],
            help: Rect {
                x: area.x,
                width: area.width,
                ..vertical[2]
            },
        }
    }

    fn button_at(&self, column: u16, row: u16) -> Option<Command> {
        if row != self.buttons.y || column < self.buttons.x {
            return None;
        }
        ButtonBar::hit(column - self.buttons.x)
    }
}

// ============================================================================
// Heads-up State
// ============================================================================

/// What the side panel shows, fed from the controller's events.
#[derive(Default)]
struct Hud {
    score: u32,
    message: Option<String>,
}

impl Hud {
    fn observe(&mut self, event: &GameEvent) {
        trace!(?event, "game event");
        match event {
            GameEvent::ScoreChanged(score) => self.score = *score,
            GameEvent::RowsCleared(rows) => {
                self.message = Some(format!("+{} row{}", rows, if *rows == 1 { "" } else { "s" }));
            }
            GameEvent::Started => self.message = None,
            GameEvent::GameOver => self.message = Some("Game over".to_string()),
            _ => {}
        }
    }
}

// ============================================================================
// Color Mapping
// ============================================================================

fn shape_color(shape: Shape) -> Color {
    let (r, g, b) = shape.rgb();
    Color::Rgb(r, g, b)
}

// ============================================================================
// Rendering
// ============================================================================

fn render(frame: &mut Frame, game_loop: &GameLoop, hud: &Hud, screen: &Screen) {
    render_board(frame, game_loop, screen);
    render_info(frame, game_loop, hud, screen.info);
    render_buttons(frame, screen.buttons);

    let help = Paragraph::new(Line::from(
        "←→: Move | ↑: Rotate | ↓: Drop | Enter: Start | P: Pause | Q: Quit",
    ))
    .alignment(Alignment::Center)
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, screen.help);

    let area = frame.size();
    match game_loop.status() {
        Status::Running => {}
        Status::NotStarted => render_popup(frame, area, " Ready ", "Press Enter to start", Color::Green),
        Status::Paused => render_popup(frame, area, " Paused ", "Press P to continue", Color::Yellow),
        Status::Over => {
            let score = format!("Score: {}", game_loop.score());
            render_game_over(frame, area, &score);
        }
    }
}

fn render_board(frame: &mut Frame, game_loop: &GameLoop, screen: &Screen) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Blockdrop ")
        .title_alignment(Alignment::Center);

    let inner = block.inner(screen.board);
    frame.render_widget(block, screen.board);

    let viewport = screen.viewport;
    let lines: Vec<Line> = game_loop
        .game()
        .render_grid()
        .into_iter()
        .map(|row| {
            let spans: Vec<Span> = row
                .into_iter()
                .map(|cell| match cell {
                    CellState::Empty => Span::raw(viewport.empty_symbol()),
                    CellState::Filled(shape) => Span::styled(
                        viewport.block_symbol(),
                        Style::default().fg(shape_color(shape)),
                    ),
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_info(frame: &mut Frame, game_loop: &GameLoop, hud: &Hud, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Info ")
        .title_alignment(Alignment::Center);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let interval_ms = game_loop.drop_interval().as_secs_f64() * 1000.0;
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled("Score", Style::default().fg(Color::Yellow))),
        Line::from(format!("{}", hud.score)),
        Line::from(""),
        Line::from(Span::styled("Drop", Style::default().fg(Color::Cyan))),
        Line::from(format!("{interval_ms:.0} ms")),
        Line::from(""),
    ];
    if let Some(message) = &hud.message {
        lines.push(Line::from(Span::styled(
            message.clone(),
            Style::default().fg(Color::Green),
        )));
    }

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

fn render_buttons(frame: &mut Frame, area: Rect) {
    let style = Style::default().fg(Color::Black).bg(Color::Gray);
    let mut spans = Vec::new();
    let mut x = 0;
    for (start, label) in ButtonBar::slots() {
        if start > x {
            spans.push(Span::raw(" ".repeat((start - x) as usize)));
        }
        let text = format!("[{label}]");
        x = start + text.chars().count() as u16;
        spans.push(Span::styled(text, style));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_popup(frame: &mut Frame, area: Rect, title: &str, hint: &str, color: Color) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            title.trim().to_uppercase(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(hint.to_string(), Style::default().fg(Color::DarkGray))),
        Line::from(Span::styled(
            "Press ESC to quit",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let popup_area = centered_rect(24, 7, area);
    frame.render_widget(Clear, popup_area);
    frame.render_widget(
        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .title(title.to_string())
                .title_alignment(Alignment::Center)
                .style(Style::default().bg(Color::Black)),
        ),
        popup_area,
    );
}

fn render_game_over(frame: &mut Frame, area: Rect, score: &str) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("GAME OVER", Style::default().fg(Color::Red))),
        Line::from(""),
        Line::from(score.to_string()),
        Line::from(""),
        Line::from(Span::styled(
            "Enter: play again",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(Span::styled("ESC: quit", Style::default().fg(Color::DarkGray))),
    ];

    let popup_area = centered_rect(24, 9, area);
    frame.render_widget(Clear, popup_area);
    frame.render_widget(
        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Game Over ")
                .title_alignment(Alignment::Center)
                .style(Style::default().bg(Color::Black)),
        ),
        popup_area,
    );
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let horizontal = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(width.min(area.width)),
        Constraint::Fill(1),
    ])
    .split(area);

    let vertical = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height.min(area.height)),
        Constraint::Fill(1),
    ])
    .split(horizontal[1]);

    vertical[1]
}

// ============================================================================
// Main Loop
// ============================================================================

type Tui = Terminal<CrosstermBackend<Stdout>>;

fn setup_terminal() -> Result<Tui> {
    enable_raw_mode().context("failed to enable raw mode")?;
    stdout()
        .execute(EnterAlternateScreen)
        .and_then(|out| out.execute(EnableMouseCapture))
        .context("failed to enter alternate screen")?;
    Terminal::new(CrosstermBackend::new(stdout())).context("failed to create terminal")
}

fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    stdout().execute(DisableMouseCapture)?;
    stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

fn run(terminal: &mut Tui, args: &Args, config: &GameConfig) -> Result<()> {
    let mut game_loop = GameLoop::new(config)?;
    let mut hud = Hud::default();

    loop {
        let screen = Screen::new(terminal.size()?, args);
        terminal.draw(|frame| render(frame, &game_loop, &hud, &screen))?;

        let timeout = game_loop.next_tick_in(Instant::now()).unwrap_or(IDLE_POLL);

        if event::poll(timeout)? {
            let command = match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => key_to_command(key),
                Event::Mouse(MouseEvent {
                    kind: MouseEventKind::Down(MouseButton::Left),
                    column,
                    row,
                    ..
                }) => screen.button_at(column, row),
                _ => None,
            };

            let now = Instant::now();
            match command {
                Some(Command::Quit) => break,
                Some(Command::Start) => game_loop.start(now),
                Some(Command::TogglePause) => game_loop.toggle_pause(now),
                Some(Command::Play(intent)) => {
                    game_loop.apply(intent, now);
                }
                None => {}
            }
        }

        game_loop.poll(Instant::now());

        for event in game_loop.take_events() {
            hud.observe(&event);
        }
    }

    debug!(score = game_loop.score(), "quit");
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(path) = &args.log_file {
        init_logging(path)?;
    }
    let config = args.game_config()?;

    let mut terminal = setup_terminal()?;
    let result = run(&mut terminal, &args, &config);
    restore_terminal().context("failed to restore terminal")?;

    result
}
