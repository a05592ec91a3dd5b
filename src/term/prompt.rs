use std::collections::VecDeque;

use ratatui::Frame;
use ratatui::crossterm::event::{Event, KeyCode};
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};
use tui_input::Input;
use tui_input::backend::crossterm::EventHandler;

use crate::term::style::BORDER;

const HISTORY: usize = 32;

/// The `:` command line, with history on up/down and completion on right.
pub struct Prompt {
    input: Input,
    history: VecDeque<String>,
    recalled: Option<usize>,
    completions: &'static [&'static str],
}

pub enum Control {
    Run(String),
    Close,
}

impl Prompt {
    pub fn new(completions: &'static [&'static str]) -> Self {
        Self {
            input: Input::default(),
            history: VecDeque::with_capacity(HISTORY),
            recalled: None,
            completions,
        }
    }

    fn completion(&self) -> Option<&'static str> {
        let value = self.input.value();
        if value.is_empty() {
            return None;
        }
        self.completions
            .iter()
            .find(|c| c.starts_with(value) && c.len() > value.len())
            .copied()
    }

    fn recall(&mut self, position: usize) {
        if let Some(value) = self.history.get(position) {
            self.input = Input::new(value.clone());
            self.recalled = Some(position);
        }
    }

    fn take(&mut self) -> String {
        self.recalled = None;
        self.input.value_and_reset()
    }

    fn remember(&mut self, value: &str) {
        if self.history.back().is_some_and(|last| last == value) {
            return;
        }
        if self.history.len() == HISTORY {
            self.history.pop_front();
        }
        self.history.push_back(value.to_owned());
    }

    pub fn draw(&self, area: Rect, frame: &mut Frame) {
        let width = usize::from(area.width.saturating_sub(3));
        let scroll = self.input.visual_scroll(width);
        let value = self.input.value();
        let mut spans = vec![Span::from(":"), Span::from(value)];
        if let Some(rest) = self.completion().and_then(|c| c.strip_prefix(value)) {
            spans.push(Span::from(rest).style(Color::DarkGray));
        }
        Paragraph::new(Line::from(spans))
            .scroll((0, u16::try_from(scroll).unwrap_or(u16::MAX)))
            .style(Color::Yellow)
            .block(Block::bordered().border_style(BORDER))
            .render(area, frame.buffer_mut());

        let x = self.input.visual_cursor().max(scroll) - scroll + 2;
        let x = u16::try_from(x).unwrap_or(u16::MAX);
        frame.set_cursor_position((area.x.saturating_add(x), area.y + 1));
    }

    pub fn handle_event(&mut self, event: &Event) -> Option<Control> {
        let Event::Key(key) = event else {
            self.input.handle_event(event);
            return None;
        };
        if !key.is_press() {
            return None;
        }
        match key.code {
            KeyCode::Esc => {
                self.take();
                Some(Control::Close)
            }
            KeyCode::Enter => {
                let value = self.take();
                let value = value.trim();
                if value.is_empty() {
                    return Some(Control::Close);
                }
                self.remember(value);
                Some(Control::Run(value.to_owned()))
            }
            KeyCode::Up => {
                let position = self.recalled.unwrap_or(self.history.len());
                if position > 0 {
                    self.recall(position - 1);
                }
                None
            }
            KeyCode::Down => {
                if let Some(position) = self.recalled {
                    self.recall(position + 1);
                }
                None
            }
            KeyCode::Right | KeyCode::Tab if self.completion().is_some() => {
                if let Some(completion) = self.completion() {
                    self.input = Input::new(completion.to_owned());
                }
                None
            }
            _ => {
                if self.input.handle_event(event).is_some_and(|c| c.value) {
                    self.recalled = None;
                }
                None
            }
        }
    }
}
