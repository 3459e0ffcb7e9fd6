use crate::reporting::format_kb;
use crate::storage::FileRef;
use async_trait::async_trait;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame, Terminal,
};
use std::io::{self, IsTerminal};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Lets a person prune the candidate list before anything is read.
///
/// The answer keeps the selector's own order. An empty answer means the user
/// cancelled.
#[async_trait]
pub trait FileSelector: Send + Sync {
    async fn select(&self, files: Vec<FileRef>) -> Vec<FileRef>;
}

/// Keeps every candidate.
pub struct AcceptAll;

#[async_trait]
impl FileSelector for AcceptAll {
    async fn select(&self, files: Vec<FileRef>) -> Vec<FileRef> {
        files
    }
}

/// What a key press did to the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionStep {
    Continue,
    Confirm,
    Cancel,
}

/// Checkbox list behind the prompt. Every file starts checked.
pub struct SelectionList {
    files: Vec<FileRef>,
    checked: Vec<bool>,
    state: ListState,
}

impl SelectionList {
    pub fn new(files: Vec<FileRef>) -> Self {
        let mut state = ListState::default();
        if !files.is_empty() {
            state.select(Some(0));
        }
        SelectionList {
            checked: vec![true; files.len()],
            files,
            state,
        }
    }

    pub fn cursor(&self) -> Option<usize> {
        self.state.selected()
    }

    pub fn selected_count(&self) -> usize {
        self.checked.iter().filter(|c| **c).count()
    }

    pub fn next(&mut self) {
        if self.files.is_empty() {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i + 1 < self.files.len() => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        if self.files.is_empty() {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => self.files.len() - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    pub fn toggle(&mut self) {
        if let Some(checked) = self.state.selected().and_then(|i| self.checked.get_mut(i)) {
            *checked = !*checked;
        }
    }

    pub fn select_all(&mut self) {
        self.checked.iter_mut().for_each(|c| *c = true);
    }

    pub fn select_none(&mut self) {
        self.checked.iter_mut().for_each(|c| *c = false);
    }

    /// Applies one key press. Enter only confirms with something checked.
    pub fn handle_key(&mut self, key: KeyEvent) -> SelectionStep {
        if key.kind != KeyEventKind::Press {
            return SelectionStep::Continue;
        }
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return SelectionStep::Cancel
            }
            KeyCode::Esc | KeyCode::Char('q') => return SelectionStep::Cancel,
            KeyCode::Enter if self.selected_count() > 0 => return SelectionStep::Confirm,
            KeyCode::Down | KeyCode::Char('j') => self.next(),
            KeyCode::Up | KeyCode::Char('k') => self.previous(),
            KeyCode::Char(' ') => self.toggle(),
            KeyCode::Char('a') => self.select_all(),
            KeyCode::Char('n') => self.select_none(),
            _ => {}
        }
        SelectionStep::Continue
    }

    /// Checked files, in list order.
    pub fn into_selected(self) -> Vec<FileRef> {
        self.files
            .into_iter()
            .zip(self.checked)
            .filter_map(|(file, checked)| checked.then_some(file))
            .collect()
    }
}

/// Interactive checkbox prompt.
///
/// Drawn on stderr's alternate screen so stdout stays free for `--print`.
/// Without a terminal on stderr the prompt cannot be shown and counts as a
/// cancel.
pub struct PromptSelector {}

impl PromptSelector {
    pub fn new() -> Self {
        PromptSelector {}
    }
}

impl Default for PromptSelector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FileSelector for PromptSelector {
    async fn select(&self, files: Vec<FileRef>) -> Vec<FileRef> {
        if !io::stderr().is_terminal() {
            warn!("File selection needs a terminal; pass --yes to include every file");
            return Vec::new();
        }

        debug!("Prompting for {} files", files.len());
        match tokio::task::spawn_blocking(move || run_prompt(files)).await {
            Ok(Ok(selected)) => {
                info!("Selected {} files", selected.len());
                selected
            }
            Ok(Err(e)) => {
                warn!("File selection prompt failed: {}", e);
                Vec::new()
            }
            Err(e) => {
                warn!("File selection prompt stopped: {}", e);
                Vec::new()
            }
        }
    }
}

fn run_prompt(files: Vec<FileRef>) -> io::Result<Vec<FileRef>> {
    enable_raw_mode()?;
    let mut stderr = io::stderr();
    if let Err(e) = execute!(stderr, EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(e);
    }
    let mut terminal = Terminal::new(CrosstermBackend::new(stderr))?;

    let mut list = SelectionList::new(files);
    let result = drive(&mut terminal, &mut list);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    match result? {
        SelectionStep::Confirm => Ok(list.into_selected()),
        _ => {
            debug!("Selection cancelled");
            Ok(Vec::new())
        }
    }
}

fn drive<B: Backend>(
    terminal: &mut Terminal<B>,
    list: &mut SelectionList,
) -> io::Result<SelectionStep> {
    loop {
        terminal.draw(|f| draw(f, list))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                match list.handle_key(key) {
                    SelectionStep::Continue => {}
                    step => return Ok(step),
                }
            }
        }
    }
}

fn draw(f: &mut Frame, list: &mut SelectionList) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(f.area());

    let title = Paragraph::new(Span::styled(
        format!(
            "Found {} files. Select which ones to include",
            list.files.len()
        ),
        Style::default().add_modifier(Modifier::BOLD),
    ));
    f.render_widget(title, chunks[0]);

    let highlight = Style::default()
        .bg(Color::Blue)
        .fg(Color::White)
        .add_modifier(Modifier::BOLD);
    let items: Vec<ListItem> = list
        .files
        .iter()
        .zip(&list.checked)
        .map(|(file, checked)| {
            let mark = if *checked { "[✓]" } else { "[ ]" };
            let style = if *checked {
                Style::default().fg(Color::Green)
            } else {
                Style::default()
            };
            ListItem::new(Span::styled(
                format!("{} {}  ({} KB)", mark, file.path, format_kb(file.size)),
                style,
            ))
        })
        .collect();

    let files = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(format!(
            "Files ({} selected of {})",
            list.selected_count(),
            list.files.len()
        )))
        .highlight_style(highlight);
    f.render_stateful_widget(files, chunks[1], &mut list.state);

    let help = Paragraph::new(Span::styled(
        "↑/↓: Navigate | Space: Toggle | a: Select all | n: Select none | Enter: Copy selected | Esc/q: Cancel",
        Style::default().fg(Color::DarkGray),
    ));
    f.render_widget(help, chunks[2]);
}
