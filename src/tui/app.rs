use anyhow::{Context, Result};
use crossterm::event::Event;
use ratatui::{
    buffer::Buffer,
    crossterm::event::{self, KeyCode, KeyEventKind},
    layout::{Constraint, Layout, Position, Rect},
    style::{
        palette::{material::BLUE, tailwind::SLATE},
        Color, Modifier, Style, Stylize,
    },
    symbols,
    text::Line,
    widgets::{
        Block, Borders, HighlightSpacing, List, ListItem, ListState, Paragraph, StatefulWidget,
        Widget,
    },
    DefaultTerminal, Frame,
};

use crate::tasks::{Intent, TaskList};

const TODO_HEADER_STYLE: Style = Style::new().fg(SLATE.c100).bg(BLUE.c800);
const NORMAL_ROW_BG: Color = SLATE.c950;
const ALT_ROW_BG_COLOR: Color = SLATE.c900;
const SELECTED_STYLE: Style = Style::new().bg(SLATE.c800).add_modifier(Modifier::BOLD);
const TEXT_FG_COLOR: Color = SLATE.c200;
const PLACEHOLDER: &str = "Enter a new task";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputMode {
    Editing,
    Normal,
}

pub struct App {
    tasks: TaskList,
    state: ListState,
    mode: InputMode,
    exit: bool,
}

const fn alternate_colors(i: usize) -> Color {
    if i % 2 == 0 {
        NORMAL_ROW_BG
    } else {
        ALT_ROW_BG_COLOR
    }
}

fn layout(area: Rect) -> [Rect; 4] {
    Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area)
}

impl App {
    pub fn new() -> Self {
        Self {
            tasks: TaskList::new(),
            state: ListState::default(),
            mode: InputMode::Editing,
            exit: false,
        }
    }

    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        log::info!("starting task list");
        while !self.exit {
            terminal
                .draw(|frame| self.draw(frame))
                .context("drawing frame")?;
            self.handle_events()?;
        }
        log::info!("exiting with {} tasks", self.tasks.len());
        Ok(())
    }

    fn draw(&mut self, frame: &mut Frame) {
        frame.render_widget(&mut *self, frame.area());
        if self.mode == InputMode::Editing {
            let [_, input, _, _] = layout(frame.area());
            frame.set_cursor_position(self.cursor_position(input));
        }
    }

    fn cursor_position(&self, input: Rect) -> Position {
        let typed = self.tasks.pending_input().chars().count();
        let max = input.width.saturating_sub(2);
        let offset = u16::try_from(typed).unwrap_or(u16::MAX).min(max);
        Position::new(input.x + 1 + offset, input.y + 1)
    }

    fn handle_events(&mut self) -> Result<()> {
        match event::read().context("reading terminal event")? {
            Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                self.handle_key_event(key_event)
            }
            _ => Ok(()),
        }
    }

    fn handle_key_event(&mut self, key_event: event::KeyEvent) -> Result<()> {
        match self.mode {
            InputMode::Editing => self.handle_editing_key(key_event.code),
            InputMode::Normal => self.handle_normal_key(key_event.code),
        }
        Ok(())
    }

    fn handle_editing_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Enter => {
                self.dispatch(Intent::AddClicked);
            }
            KeyCode::Char(c) => {
                let mut text = self.tasks.pending_input().to_string();
                text.push(c);
                self.dispatch(Intent::InputChanged(text));
            }
            KeyCode::Backspace => {
                let mut text = self.tasks.pending_input().to_string();
                if text.pop().is_some() {
                    self.dispatch(Intent::InputChanged(text));
                }
            }
            KeyCode::Esc | KeyCode::Tab => self.mode = InputMode::Normal,
            _ => {}
        }
    }

    fn handle_normal_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.exit(),
            KeyCode::Char('i') | KeyCode::Char('a') | KeyCode::Tab => {
                self.mode = InputMode::Editing
            }
            KeyCode::Char('h') => self.select_none(),
            KeyCode::Char('j') | KeyCode::Down => self.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.select_previous(),
            KeyCode::Char('g') => self.select_first(),
            KeyCode::Char('G') => self.select_last(),
            KeyCode::Char('K') => self.on_selected(Intent::MoveUpClicked),
            KeyCode::Char('J') => self.on_selected(Intent::MoveDownClicked),
            KeyCode::Char('d') | KeyCode::Delete => self.on_selected(Intent::DeleteClicked),
            _ => {}
        }
    }

    fn on_selected(&mut self, intent: fn(usize) -> Intent) {
        if let Some(i) = self.state.selected() {
            self.dispatch(intent(i));
        }
    }

    /// Forwards an intent to the list and keeps the selection on the same task.
    fn dispatch(&mut self, intent: Intent) {
        let follow = match &intent {
            Intent::MoveUpClicked(i) => Some(i.saturating_sub(1)),
            Intent::MoveDownClicked(i) => Some(i + 1),
            Intent::DeleteClicked(i) => Some(*i),
            _ => None,
        };
        if !self.tasks.apply(intent) {
            return;
        }
        if let Some(i) = follow {
            self.select_clamped(i);
        }
    }

    fn exit(&mut self) {
        self.exit = true;
    }

    fn select_clamped(&mut self, i: usize) {
        if self.tasks.is_empty() {
            self.state.select(None);
        } else {
            self.state.select(Some(i.min(self.tasks.len() - 1)));
        }
    }

    fn select_none(&mut self) {
        self.state.select(None);
    }

    fn select_next(&mut self) {
        let next = self.state.selected().map_or(0, |i| i + 1);
        self.select_clamped(next);
    }

    fn select_previous(&mut self) {
        let previous = self.state.selected().map_or(0, |i| i.saturating_sub(1));
        self.select_clamped(previous);
    }

    fn select_first(&mut self) {
        self.select_clamped(0);
    }

    fn select_last(&mut self) {
        self.select_clamped(usize::MAX);
    }

    fn render_header(area: Rect, buf: &mut Buffer) {
        Paragraph::new("To-Do List")
            .bold()
            .centered()
            .render(area, buf);
    }

    fn render_footer(&self, area: Rect, buf: &mut Buffer) {
        let hints = match self.mode {
            InputMode::Editing => "Enter to add, Esc to edit the list",
            InputMode::Normal => "jk select, J/K move, d delete, i add, q quit",
        };
        Paragraph::new(hints).centered().render(area, buf);
    }

    fn render_input(&self, area: Rect, buf: &mut Buffer) {
        let border = match self.mode {
            InputMode::Editing => Style::new().fg(BLUE.c400),
            InputMode::Normal => Style::new().fg(SLATE.c500),
        };
        let block = Block::bordered()
            .title(Line::raw(" Tasks "))
            .border_style(border);
        let text = self.tasks.pending_input();
        let line = if text.is_empty() {
            Line::styled(
                PLACEHOLDER,
                Style::new().fg(SLATE.c500).add_modifier(Modifier::ITALIC),
            )
        } else {
            Line::styled(text, TEXT_FG_COLOR)
        };
        Paragraph::new(line).block(block).render(area, buf);
    }

    fn render_list(&mut self, area: Rect, buf: &mut Buffer) {
        let block = Block::new()
            .title(Line::raw("List").centered())
            .borders(Borders::TOP)
            .border_set(symbols::border::EMPTY)
            .border_style(TODO_HEADER_STYLE)
            .bg(NORMAL_ROW_BG);

        let items: Vec<ListItem> = self
            .tasks
            .tasks()
            .iter()
            .enumerate()
            .map(|(i, task)| {
                let line = Line::styled(format!("{}. {}", i + 1, task), TEXT_FG_COLOR);
                ListItem::new(line).bg(alternate_colors(i))
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(SELECTED_STYLE)
            .highlight_symbol(">")
            .highlight_spacing(HighlightSpacing::Always);

        // Both `Widget` and `StatefulWidget` have `render`.
        StatefulWidget::render(list, area, buf, &mut self.state);
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for &mut App {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let [header, input, list, footer] = layout(area);
        App::render_header(header, buf);
        self.render_input(input, buf);
        self.render_list(list, buf);
        self.render_footer(footer, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_text(app: &mut App, text: &str) -> Result<()> {
        for c in text.chars() {
            app.handle_key_event(KeyCode::Char(c).into())?;
        }
        Ok(())
    }

    fn app_with(tasks: &[&str]) -> Result<App> {
        let mut app = App::new();
        for task in tasks {
            type_text(&mut app, task)?;
            app.handle_key_event(KeyCode::Enter.into())?;
        }
        app.handle_key_event(KeyCode::Esc.into())?;
        Ok(app)
    }

    fn buffer_lines(buf: &Buffer) -> Vec<String> {
        buf.content
            .chunks(buf.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect())
            .collect()
    }

    #[test]
    fn typing_and_enter_add_a_task() -> Result<()> {
        let mut app = App::new();
        type_text(&mut app, "  buy milk  ")?;
        assert_eq!(app.tasks.pending_input(), "  buy milk  ");

        app.handle_key_event(KeyCode::Backspace.into())?;
        app.handle_key_event(KeyCode::Enter.into())?;
        assert_eq!(app.tasks.tasks(), ["  buy milk "]);
        assert_eq!(app.tasks.pending_input(), "");

        type_text(&mut app, "   ")?;
        app.handle_key_event(KeyCode::Enter.into())?;
        assert_eq!(app.tasks.len(), 1);
        assert_eq!(app.tasks.pending_input(), "   ");
        Ok(())
    }

    #[test]
    fn q_is_text_while_editing() -> Result<()> {
        let mut app = App::new();
        app.handle_key_event(KeyCode::Char('q').into())?;
        assert!(!app.exit);
        assert_eq!(app.tasks.pending_input(), "q");

        app.handle_key_event(KeyCode::Esc.into())?;
        app.handle_key_event(KeyCode::Char('q').into())?;
        assert!(app.exit);
        Ok(())
    }

    #[test]
    fn selection_is_clamped() -> Result<()> {
        let mut app = app_with(&["a", "b"])?;
        app.handle_key_event(KeyCode::Char('j').into())?;
        assert_eq!(app.state.selected(), Some(0));
        app.handle_key_event(KeyCode::Char('j').into())?;
        app.handle_key_event(KeyCode::Char('j').into())?;
        assert_eq!(app.state.selected(), Some(1));
        app.handle_key_event(KeyCode::Char('g').into())?;
        assert_eq!(app.state.selected(), Some(0));
        app.handle_key_event(KeyCode::Char('G').into())?;
        assert_eq!(app.state.selected(), Some(1));
        app.handle_key_event(KeyCode::Char('h').into())?;
        assert_eq!(app.state.selected(), None);
        Ok(())
    }

    #[test]
    fn moves_follow_the_task() -> Result<()> {
        let mut app = app_with(&["a", "b", "c"])?;
        app.handle_key_event(KeyCode::Char('G').into())?;
        app.handle_key_event(KeyCode::Char('K').into())?;
        assert_eq!(app.tasks.tasks(), ["a", "c", "b"]);
        assert_eq!(app.state.selected(), Some(1));

        app.handle_key_event(KeyCode::Char('K').into())?;
        app.handle_key_event(KeyCode::Char('K').into())?;
        assert_eq!(app.tasks.tasks(), ["c", "a", "b"]);
        assert_eq!(app.state.selected(), Some(0));

        app.handle_key_event(KeyCode::Char('J').into())?;
        assert_eq!(app.tasks.tasks(), ["a", "c", "b"]);
        assert_eq!(app.state.selected(), Some(1));
        Ok(())
    }

    #[test]
    fn delete_selected() -> Result<()> {
        let mut app = app_with(&["a", "b"])?;
        app.handle_key_event(KeyCode::Char('d').into())?;
        assert_eq!(app.tasks.len(), 2);

        app.handle_key_event(KeyCode::Char('G').into())?;
        app.handle_key_event(KeyCode::Char('d').into())?;
        assert_eq!(app.tasks.tasks(), ["a"]);
        assert_eq!(app.state.selected(), Some(0));

        app.handle_key_event(KeyCode::Delete.into())?;
        assert!(app.tasks.is_empty());
        assert_eq!(app.state.selected(), None);
        Ok(())
    }

    #[test]
    fn render() -> Result<()> {
        let mut app = app_with(&["wash car", " feed cat "])?;
        let mut buf = Buffer::empty(Rect::new(0, 0, 50, 8));

        (&mut app).render(buf.area, &mut buf);

        let lines = buffer_lines(&buf);
        assert!(lines[0].contains("To-Do List"));
        assert!(lines[1].contains("Tasks"));
        assert!(lines[2].contains(PLACEHOLDER));
        assert!(lines[4].contains("List"));
        assert!(lines[5].contains("1. wash car"));
        assert!(lines[6].contains("2.  feed cat "));
        assert!(lines[7].contains("q quit"));
        Ok(())
    }

    #[test]
    fn cursor_follows_input() -> Result<()> {
        let mut app = App::new();
        type_text(&mut app, "abc")?;
        let input = Rect::new(0, 1, 10, 3);
        assert_eq!(app.cursor_position(input), Position::new(4, 2));

        type_text(&mut app, "defghijkl")?;
        assert_eq!(app.cursor_position(input), Position::new(9, 2));
        Ok(())
    }
}
