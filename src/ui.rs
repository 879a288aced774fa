use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::warn;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io;
use tui_textarea::TextArea;

use crate::interpreter::{Command, Reply, Session, Tone};
use crate::world::AnswerSource;

enum GameState {
    TitleScreen,
    Playing,
}

#[derive(PartialEq)]
enum MenuOption {
    NewGame,
    LoadGame,
    Quit,
}

impl MenuOption {
    fn next(&self) -> Self {
        match self {
            MenuOption::NewGame => MenuOption::LoadGame,
            MenuOption::LoadGame => MenuOption::Quit,
            MenuOption::Quit => MenuOption::NewGame,
        }
    }

    fn previous(&self) -> Self {
        match self {
            MenuOption::NewGame => MenuOption::Quit,
            MenuOption::LoadGame => MenuOption::NewGame,
            MenuOption::Quit => MenuOption::LoadGame,
        }
    }
}

struct LogLine {
    text: String,
    style: Style,
}

struct App<'a> {
    session: Session,
    input: TextArea<'a>,
    log: Vec<LogLine>,
    log_scroll: u16,
    state: GameState,
    menu_selection: MenuOption,
    notice: Option<String>,
}

fn command_input<'a>() -> TextArea<'a> {
    let mut input = TextArea::default();
    input.set_block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Command [Enter: run | PgUp/PgDn: scroll | quit] "),
    );
    input.set_cursor_line_style(Style::default());
    input.set_placeholder_text("north, take key, look, inventory, save ...");
    input
}

fn tone_style(tone: Tone) -> Style {
    match tone {
        Tone::Info => Style::default().fg(Color::White),
        Tone::Success => Style::default().fg(Color::Green),
        Tone::Failure => Style::default().fg(Color::Red),
        Tone::Error => Style::default().fg(Color::Magenta),
    }
}

impl<'a> App<'a> {
    fn new(session: Session) -> Self {
        App {
            session,
            input: command_input(),
            log: Vec::new(),
            log_scroll: 0,
            state: GameState::TitleScreen,
            menu_selection: MenuOption::NewGame,
            notice: None,
        }
    }

    fn push(&mut self, style: Style, text: &str) {
        for line in text.lines() {
            self.log.push(LogLine {
                text: line.to_string(),
                style,
            });
        }
        self.log_scroll = 0;
    }

    fn push_reply(&mut self, reply: &Reply) {
        self.push(tone_style(reply.tone), &reply.text);
    }

    fn start_game(&mut self) {
        self.state = GameState::Playing;
        self.notice = None;
        let world = self.session.world();
        let welcome = format!("Welcome to Riddle House, {}!", world.player().name);
        let here = format!("You are in the {}.", world.current_room().name);
        self.push(Style::default().fg(Color::Yellow), &welcome);
        self.push(Style::default().fg(Color::White), &here);
    }

    fn load_saved(&mut self) {
        match self.session.restore(None) {
            Ok(()) => {
                self.state = GameState::Playing;
                self.notice = None;
                let here = format!(
                    "Game loaded. You are in the {}.",
                    self.session.world().current_room().name
                );
                self.push(tone_style(Tone::Success), &here);
            }
            Err(e) => {
                warn!("load from title screen failed: {}", e);
                self.notice = Some(e.to_string());
            }
        }
    }

    /// Runs the typed command. Returns false once the player quits.
    fn run_command<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> bool {
        let line = self.input.lines().join(" ");
        self.input = command_input();
        if line.trim().is_empty() {
            return true;
        }
        self.push(Style::default().fg(Color::DarkGray), &format!("> {}", line.trim()));

        let mut prompt = TerminalPrompt {
            terminal,
            location: self.session.world().current_room().name.clone(),
            transcript: Vec::new(),
        };
        let reply = self.session.execute(&Command::parse(&line), &mut prompt);
        let transcript = prompt.transcript.join("\n");
        if !transcript.is_empty() {
            self.push(Style::default().fg(Color::Cyan), &transcript);
        }
        self.push_reply(&reply);
        reply.keep_going
    }
}

/// Riddle prompt shown on top of the game while a move waits for an answer.
struct TerminalPrompt<'t, B: Backend> {
    terminal: &'t mut Terminal<B>,
    location: String,
    transcript: Vec<String>,
}

fn riddle_input<'a>() -> TextArea<'a> {
    let mut input = TextArea::default();
    input.set_block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Your answer [Enter: answer | Esc: give up] "),
    );
    input.set_cursor_line_style(Style::default());
    input
}

impl<B: Backend> AnswerSource for TerminalPrompt<'_, B> {
    fn answer(&mut self, question: &str) -> Option<String> {
        let mut input = riddle_input();
        let answer = loop {
            let location = &self.location;
            if let Err(e) = self
                .terminal
                .draw(|f| draw_riddle(f, location, question, &input))
            {
                warn!("could not draw riddle: {}", e);
                break None;
            }
            match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Enter => break Some(input.lines().join(" ")),
                    KeyCode::Esc => break None,
                    _ => {
                        input.input(key);
                    }
                },
                Ok(_) => {}
                Err(e) => {
                    warn!("could not read riddle answer: {}", e);
                    break None;
                }
            }
        };

        self.transcript.push(format!("Riddle: {}", question));
        self.transcript.push(match &answer {
            Some(text) => format!("You answer: {}", text.trim()),
            None => "You step back from the door.".to_string(),
        });
        answer
    }
}

/// Runs the full-screen game. A `resumed` session skips the title screen.
pub fn run(session: Session, resumed: bool) -> Result<Option<String>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(session);
    if resumed {
        app.start_game();
    }
    let outcome = event_loop(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    outcome?;
    Ok(app.session.farewell())
}

fn event_loop<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| draw_ui(f, app))?;

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match app.state {
            GameState::TitleScreen => match key.code {
                KeyCode::Up | KeyCode::Char('k') => {
                    app.menu_selection = app.menu_selection.previous();
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    app.menu_selection = app.menu_selection.next();
                }
                KeyCode::Enter => match app.menu_selection {
                    MenuOption::NewGame => app.start_game(),
                    MenuOption::LoadGame => app.load_saved(),
                    MenuOption::Quit => return Ok(()),
                },
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                _ => {}
            },
            GameState::Playing => match (key.code, key.modifiers) {
                (KeyCode::Enter, _) => {
                    if !app.run_command(terminal) {
                        return Ok(());
                    }
                }
                (KeyCode::Char('c'), KeyModifiers::CONTROL) => return Ok(()),
                (KeyCode::PageUp, _) => {
                    app.log_scroll = app.log_scroll.saturating_add(3);
                }
                (KeyCode::PageDown, _) => {
                    app.log_scroll = app.log_scroll.saturating_sub(3);
                }
                (KeyCode::Esc, _) => {
                    app.push(Style::default().fg(Color::DarkGray), "Type quit to leave the house.");
                }
                _ => {
                    app.input.input(key);
                }
            },
        }
    }
}

/// Greedy word wrap so the log can be scrolled by display line.
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 || text.chars().count() <= width {
        return vec![text.to_string()];
    }
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split(' ') {
        let needed = current.chars().count() + word.chars().count() + usize::from(!current.is_empty());
        if needed > width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    lines.push(current);
    lines
}

fn draw_ui(f: &mut Frame, app: &App) {
    if matches!(app.state, GameState::TitleScreen) {
        draw_title_screen(f, app);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(3),
        ])
        .split(f.area());

    let world = app.session.world();
    let room = world.current_room();

    // Status bar
    let status = Line::from(vec![
        Span::styled(
            " RIDDLE HOUSE ",
            Style::default().fg(Color::Black).bg(Color::Yellow),
        ),
        Span::raw("  "),
        Span::styled(
            format!(" {} ", room.name),
            Style::default().fg(Color::White).bg(Color::DarkGray),
        ),
        Span::raw("  "),
        Span::styled(
            format!(" Carrying: {} ", world.player().inventory.len()),
            Style::default().fg(Color::Yellow),
        ),
        Span::raw("  "),
        Span::styled(
            format!(" Locked doors: {} ", world.locked_exit_count()),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw("  "),
        Span::styled(
            format!(" Slot: {} ", app.session.slot()),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    let status_block = Paragraph::new(status).block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(status_block, chunks[0]);

    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[1]);

    let room_panel = Paragraph::new(room.describe())
        .block(Block::default().borders(Borders::ALL).title(" The Room "))
        .wrap(Wrap { trim: false })
        .style(Style::default().fg(Color::White));
    f.render_widget(room_panel, main_chunks[0]);

    render_log(f, app, main_chunks[1]);

    f.render_widget(&app.input, chunks[2]);
}

fn render_log(f: &mut Frame, app: &App, area: Rect) {
    let width = area.width.saturating_sub(2) as usize;
    let height = area.height.saturating_sub(2);
    let lines: Vec<Line> = app
        .log
        .iter()
        .flat_map(|entry| {
            wrap_text(&entry.text, width)
                .into_iter()
                .map(move |text| Line::styled(text, entry.style))
        })
        .collect();

    let total = u16::try_from(lines.len()).unwrap_or(u16::MAX);
    let max_scroll = total.saturating_sub(height);
    let back = app.log_scroll.min(max_scroll);
    let title = if back > 0 {
        format!(" Journal [{} lines back] ", back)
    } else {
        " Journal ".to_string()
    };

    let log = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title))
        .scroll((max_scroll - back, 0));
    f.render_widget(log, area);
}

fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(height),
            Constraint::Fill(1),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

fn draw_riddle(f: &mut Frame, location: &str, question: &str, input: &TextArea) {
    let backdrop = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", location))
        .style(Style::default().fg(Color::DarkGray));
    f.render_widget(backdrop, f.area());

    let popup = centered_rect(70, 12, f.area());
    f.render_widget(Clear, popup);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .split(popup);

    let text = format!(
        "The door is locked. You need to solve a puzzle to open it.\n\n{}",
        question
    );
    let riddle = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" A Locked Door "),
        )
        .wrap(Wrap { trim: false })
        .style(Style::default().fg(Color::Cyan));
    f.render_widget(riddle, chunks[0]);
    f.render_widget(input, chunks[1]);
}

fn draw_title_screen(f: &mut Frame, app: &App) {
    let area = f.area();

    let title_art = r#"
    ╔═══════════════════════════════════════════╗
    ║                                           ║
    ║           R  I  D  D  L  E                ║
    ║              H  O  U  S  E                ║
    ║                                           ║
    ║    "Every locked door asks a question"    ║
    ║                                           ║
    ╚═══════════════════════════════════════════╝
"#;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(11),
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Min(1),
        ])
        .split(area);

    let title = Paragraph::new(title_art)
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center);
    f.render_widget(title, chunks[0]);

    let options = [
        (MenuOption::NewGame, "  NEW GAME  "),
        (MenuOption::LoadGame, "  LOAD GAME  "),
        (MenuOption::Quit, "  QUIT  "),
    ];
    for (i, (option, label)) in options.iter().enumerate() {
        let style = if *option == app.menu_selection {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        let entry = Paragraph::new(*label)
            .style(style)
            .alignment(Alignment::Center);
        f.render_widget(entry, chunks[1 + i]);
    }

    if let Some(notice) = &app.notice {
        let notice = Paragraph::new(notice.as_str())
            .style(Style::default().fg(Color::Red))
            .alignment(Alignment::Center);
        f.render_widget(notice, chunks[4]);
    }

    let help = Paragraph::new(format!(
        "↑/↓ to select  •  ENTER to confirm  •  q to quit  •  saves in {}",
        app.session.store().dir().display()
    ))
    .style(Style::default().fg(Color::DarkGray))
    .alignment(Alignment::Center);
    f.render_widget(help, chunks[5]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_keeps_short_lines() {
        assert_eq!(wrap_text("You take the Key.", 40), vec!["You take the Key."]);
        assert_eq!(wrap_text("", 10), vec![""]);
    }

    #[test]
    fn wrap_breaks_on_words() {
        assert_eq!(
            wrap_text("I speak without a mouth", 10),
            vec!["I speak", "without a", "mouth"]
        );
    }

    #[test]
    fn menu_cycles_both_ways() {
        assert!(matches!(MenuOption::Quit.next(), MenuOption::NewGame));
        assert!(matches!(MenuOption::NewGame.previous(), MenuOption::Quit));
        assert!(matches!(MenuOption::NewGame.next(), MenuOption::LoadGame));
    }
}
