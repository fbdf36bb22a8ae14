use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Terminal;

use crate::avatar::{ParameterType, Subject};
use crate::config;
use crate::rename::snapshot::Snapshot;
use crate::rename::{self, graph, menu, RenameError};
use crate::scene::{self, Scene};

enum Mode {
    Browse,
    /// Typing the new name for `from`.
    Editing { from: String, input: String },
    Confirm { from: String, to: String },
    References(String),
    /// Blocking message; any key dismisses it.
    Notice(String),
}

struct State {
    scene: Scene,
    scene_path: PathBuf,
    avatar: Option<String>,
    title: String,
    params: Vec<(String, ParameterType)>,
    selected: usize,
    mode: Mode,
    undo: Vec<Snapshot>,
    status: String,
    dirty: bool,
    quit: bool,
}

fn resolve<'a>(scene: &'a mut Scene, avatar: Option<&str>) -> anyhow::Result<Subject<'a>> {
    Ok(Subject::resolve(scene.select(avatar)?)?)
}

impl State {
    fn new(mut scene: Scene, scene_path: PathBuf, avatar: Option<&str>) -> anyhow::Result<Self> {
        let title = resolve(&mut scene, avatar)?.name.to_string();
        let mut s = Self {
            scene,
            scene_path,
            avatar: avatar.map(str::to_string),
            title,
            params: Vec::new(),
            selected: 0,
            mode: Mode::Browse,
            undo: Vec::new(),
            status: String::new(),
            dirty: false,
            quit: false,
        };
        s.refresh()?;
        Ok(s)
    }

    fn refresh(&mut self) -> anyhow::Result<()> {
        let subject = resolve(&mut self.scene, self.avatar.as_deref())?;
        self.params = subject
            .parameters
            .parameters
            .iter()
            .map(|p| (p.name.clone(), p.value_type))
            .collect();
        self.selected = self.selected.min(self.params.len().saturating_sub(1));
        Ok(())
    }

    fn selected_name(&self) -> Option<&str> {
        self.params.get(self.selected).map(|(name, _)| name.as_str())
    }

    fn notice(&mut self, err: anyhow::Error) {
        log::error!("{err:#}");
        self.mode = Mode::Notice(format!("{err:#}"));
    }

    fn show_references(&mut self) -> anyhow::Result<()> {
        let Some(name) = self.selected_name().map(str::to_string) else {
            return Ok(());
        };
        let subject = resolve(&mut self.scene, self.avatar.as_deref())?;
        self.mode = Mode::References(crate::menu_report(&subject, &name));
        Ok(())
    }

    /// Leave editing for confirmation, or report why the name is unusable.
    fn submit_name(&mut self, from: String, to: String) -> anyhow::Result<()> {
        let subject = resolve(&mut self.scene, self.avatar.as_deref())?;
        if to.trim().is_empty() {
            return Err(RenameError::EmptyName.into());
        }
        if subject.parameters.contains(&to) {
            return Err(RenameError::NameConflict(to).into());
        }
        self.mode = Mode::Confirm { from, to };
        Ok(())
    }

    fn apply_rename(&mut self, from: &str, to: &str) -> anyhow::Result<()> {
        let mut subject = resolve(&mut self.scene, self.avatar.as_deref())?;
        let working = menu::find_references(subject.menus, &subject.pages, from);
        let affected = graph::collect_all(subject.graphs, subject.blend_trees, &working);
        let snapshot = Snapshot::capture(&subject, &affected, &format!("rename {from} to {to}"));
        let outcome = rename::rename(&mut subject, &working, from, to)?;
        debug_assert!(affected.is_superset(&outcome.written()));

        self.undo.push(snapshot);
        self.dirty = true;
        self.status = format!(
            "Renamed {from} to {to} ({} fields in {} objects)",
            outcome.edits.len(),
            outcome.written().len()
        );
        self.refresh()?;
        if let Some(i) = self.params.iter().position(|(name, _)| name == to) {
            self.selected = i;
        }
        Ok(())
    }

    fn undo(&mut self) -> anyhow::Result<()> {
        let Some(snapshot) = self.undo.pop() else {
            self.status = "Nothing to undo".into();
            return Ok(());
        };
        self.status = format!("Undid {} ({} objects)", snapshot.label, snapshot.len());
        let mut subject = resolve(&mut self.scene, self.avatar.as_deref())?;
        snapshot.restore(&mut subject);
        self.dirty = true;
        self.refresh()
    }

    fn save(&mut self) -> anyhow::Result<()> {
        scene::save(&self.scene, &self.scene_path, config::backup())?;
        self.undo.clear();
        self.dirty = false;
        self.status = format!("Saved {}", self.scene_path.display());
        Ok(())
    }
}

pub fn run(path: &Path, avatar: Option<&str>) -> anyhow::Result<()> {
    let scene = scene::load(path)?;
    let mut s = State::new(scene, path.to_path_buf(), avatar)?;

    crossterm::terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let quiet = QuietLog::new(io::IsTerminal::is_terminal(&io::stderr()));
    let result = event_loop(&mut terminal, &mut s);
    drop(quiet);

    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    crossterm::terminal::disable_raw_mode()?;

    if s.dirty {
        eprintln!("Unsaved changes to {} discarded.", s.scene_path.display());
    }
    result.map_err(Into::into)
}

/// Turns logging off while alive when stderr is the terminal, where log
/// lines would draw over the alternate screen. Redirected stderr keeps
/// logging.
struct QuietLog(log::LevelFilter);

impl QuietLog {
    fn new(stderr_is_terminal: bool) -> Self {
        let prev = log::max_level();
        if stderr_is_terminal {
            log::set_max_level(log::LevelFilter::Off);
        }
        Self(prev)
    }
}

impl Drop for QuietLog {
    fn drop(&mut self) {
        log::set_max_level(self.0);
    }
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    s: &mut State,
) -> io::Result<()> {
    loop {
        render(terminal, s)?;
        if s.quit {
            break;
        }
        if !event::poll(Duration::from_millis(250))? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                handle_key(s, key.code, key.modifiers);
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Event processing
// ---------------------------------------------------------------------------

fn handle_key(s: &mut State, code: KeyCode, modifiers: KeyModifiers) {
    if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
        s.quit = true;
        return;
    }

    let mode = std::mem::replace(&mut s.mode, Mode::Browse);
    let result = match mode {
        Mode::Browse => handle_browse_key(s, code, modifiers),
        Mode::Editing { from, mut input } => match code {
            KeyCode::Esc => Ok(()),
            KeyCode::Enter => s.submit_name(from, input),
            KeyCode::Backspace => {
                input.pop();
                s.mode = Mode::Editing { from, input };
                Ok(())
            }
            KeyCode::Char(ch)
                if modifiers.is_empty() || modifiers == KeyModifiers::SHIFT =>
            {
                input.push(ch);
                s.mode = Mode::Editing { from, input };
                Ok(())
            }
            _ => {
                s.mode = Mode::Editing { from, input };
                Ok(())
            }
        },
        Mode::Confirm { from, to } => match code {
            KeyCode::Char('y') | KeyCode::Char('Y') => s.apply_rename(&from, &to),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                s.status = "Rename cancelled".into();
                Ok(())
            }
            _ => {
                s.mode = Mode::Confirm { from, to };
                Ok(())
            }
        },
        Mode::References(_) | Mode::Notice(_) => Ok(()),
    };
    if let Err(e) = result {
        s.notice(e);
    }
}

fn handle_browse_key(s: &mut State, code: KeyCode, modifiers: KeyModifiers) -> anyhow::Result<()> {
    match code {
        KeyCode::Char('q') => s.quit = true,
        KeyCode::Char('s') if modifiers.contains(KeyModifiers::CONTROL) => s.save()?,
        KeyCode::Up | KeyCode::Char('k') => s.selected = s.selected.saturating_sub(1),
        KeyCode::Down | KeyCode::Char('j') => {
            if s.selected + 1 < s.params.len() {
                s.selected += 1;
            }
        }
        KeyCode::Home => s.selected = 0,
        KeyCode::End => s.selected = s.params.len().saturating_sub(1),
        KeyCode::Enter => {
            if let Some(from) = s.selected_name().map(str::to_string) {
                s.mode = Mode::Editing {
                    input: from.clone(),
                    from,
                };
            }
        }
        KeyCode::Char('m') => s.show_references()?,
        KeyCode::Char('u') => s.undo()?,
        _ => {}
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn render(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, s: &State) -> io::Result<()> {
    terminal.draw(|frame| {
        let area = frame.area();
        let [list_area, status_area, action_area] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(area);

        let items: Vec<ListItem> = s
            .params
            .iter()
            .map(|(name, ty)| ListItem::new(format!("{name} [{}]", ty.label())))
            .collect();
        let title = if s.dirty {
            format!(" {} * ", s.title)
        } else {
            format!(" {} ", s.title)
        };
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
            .highlight_symbol("> ");
        let mut list_state = ListState::default().with_selected(Some(s.selected));
        frame.render_stateful_widget(list, list_area, &mut list_state);

        frame.render_widget(
            Paragraph::new(s.status.as_str()).style(Style::default().fg(Color::DarkGray)),
            status_area,
        );
        render_action_bar(frame, action_area, &s.mode);

        match &s.mode {
            Mode::Browse => {}
            Mode::Editing { from, input } => {
                render_text_popup(
                    frame,
                    area,
                    &format!(" Rename {from} "),
                    &format!("New name: {input}_"),
                    Color::Yellow,
                );
            }
            Mode::Confirm { from, to } => {
                render_text_popup(
                    frame,
                    area,
                    " Confirm ",
                    &format!("Rename \"{from}\" to \"{to}\"? (y/n)"),
                    Color::Yellow,
                );
            }
            Mode::References(text) => {
                render_text_popup(frame, area, " Menus ", text, Color::Cyan);
            }
            Mode::Notice(text) => {
                render_text_popup(frame, area, " Error ", text, Color::Red);
            }
        }
    })?;
    Ok(())
}

fn render_action_bar(frame: &mut ratatui::Frame, area: Rect, mode: &Mode) {
    let actions: &[(&str, &str)] = match mode {
        Mode::Browse => &[
            ("enter", "rename"),
            ("m", "menus"),
            ("u", "undo"),
            ("^s", "save"),
            ("q", "quit"),
        ],
        Mode::Editing { .. } => &[("enter", "confirm"), ("esc", "cancel")],
        Mode::Confirm { .. } => &[("y", "yes"), ("n", "no")],
        Mode::References(_) | Mode::Notice(_) => &[("any key", "close")],
    };

    let key_style = Style::default()
        .fg(Color::Black)
        .bg(Color::White)
        .add_modifier(Modifier::BOLD);
    let label_style = Style::default().fg(Color::White);

    let y = area.y;
    let mut x = area.x;
    for &(key, desc) in actions {
        if x > area.x {
            x += 1;
        }
        for (text, style) in [(format!(" {key} "), key_style), (format!(" {desc}"), label_style)] {
            for ch in text.chars() {
                if x >= area.right() {
                    return;
                }
                if let Some(c) = frame.buffer_mut().cell_mut((x, y)) {
                    c.set_char(ch);
                    c.set_style(style);
                }
                x += 1;
            }
        }
    }
}

fn render_text_popup(frame: &mut ratatui::Frame, area: Rect, title: &str, text: &str, color: Color) {
    let (width, height) = popup_size(title, text);
    let popup = centered_rect(width, height, area);
    frame.render_widget(Clear, popup);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title(title.to_string());
    frame.render_widget(
        Paragraph::new(text.trim_end().to_string())
            .block(block)
            .wrap(Wrap { trim: false }),
        popup,
    );
}

/// Outer size of a bordered popup showing `text`, measured in columns.
fn popup_size(title: &str, text: &str) -> (u16, u16) {
    let widest = text
        .lines()
        .map(|line| line.chars().count())
        .chain([title.chars().count()])
        .max()
        .unwrap_or(0);
    let width = u16::try_from(widest + 4).unwrap_or(u16::MAX).max(30);
    let height = u16::try_from(text.lines().count().max(1) + 2).unwrap_or(u16::MAX);
    (width, height)
}

/// A `width` x `height` rect centered in `area`, clamped to fit.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w)) / 2;
    let y = area.y + (area.height.saturating_sub(h)) / 2;
    Rect::new(x, y, w, h)
}
