mod editor;
mod grid;
mod model;
mod prompt;
mod style;

use std::path::PathBuf;

use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::crossterm::event;
use ratatui::crossterm::event::{Event, KeyCode, KeyModifiers};
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::text::Text;
use ratatui::widgets::{Block, Clear, Paragraph, Widget, Wrap};

use crate::config::Config;
use crate::term::editor::run_editor;
use crate::term::grid::Grid;
use crate::term::model::Model;
use crate::term::prompt::Prompt;
use crate::term::style::{BORDER, HIGHLIGHT};

const COMMANDS: &[&str] = &[
    "w", "wq", "submit", "reload", "reload!", "edit", "edit!", "comment", "day", "q", "q!",
];

const UNSAVED: &str = "Unsaved changes, save with :w first";

pub fn run_term(path: PathBuf, config: Config) -> std::io::Result<()> {
    let model = Model::load(path, &config)?;
    let mut terminal = ratatui::init();
    let result = App::new(config, Grid::new(model)).run(&mut terminal);
    ratatui::restore();
    result
}

pub(crate) trait View {
    fn render(&mut self, area: Rect, buf: &mut Buffer);

    #[must_use]
    fn handle_event(&mut self, e: Event) -> Option<Control>;

    fn command(&mut self, command: &str, args: &[&str]) -> Result<Option<Control>, UnknownCommand>;
}

#[derive(Eq, PartialEq)]
enum Focus {
    Input,
    View,
    Alert,
}

#[must_use]
pub(crate) enum Control {
    Quit,
    Edit,
    Reload,
    Alert(String),
}

#[derive(Debug)]
pub struct UnknownCommand;

struct App {
    focus: Focus,
    prompt: Prompt,
    grid: Grid,
    config: Config,
    alert: Option<Popup>,
}

impl App {
    fn new(config: Config, grid: Grid) -> Self {
        Self {
            focus: Focus::View,
            prompt: Prompt::new(COMMANDS),
            grid,
            config,
            alert: None,
        }
    }

    fn run(&mut self, terminal: &mut ratatui::DefaultTerminal) -> std::io::Result<()> {
        loop {
            terminal.draw(|frame| self.draw(frame))?;
            match self.handle_event(event::read()?) {
                None => {}
                Some(Control::Quit) => break,
                Some(Control::Edit) => {
                    let path = self.grid.model().path().to_path_buf();
                    if let Err(e) = run_editor(terminal, &path) {
                        self.show_alert(e.to_string());
                        continue;
                    }
                    self.reload(path);
                }
                Some(Control::Reload) => {
                    let path = self.grid.model().path().to_path_buf();
                    self.reload(path);
                }
                Some(Control::Alert(message)) => self.show_alert(message),
            }
        }
        Ok(())
    }

    fn reload(&mut self, path: PathBuf) {
        match Model::load(path, &self.config) {
            Ok(model) => self.grid.reload(model),
            Err(e) => self.show_alert(e.to_string()),
        }
    }

    fn show_alert(&mut self, message: String) {
        self.alert = Some(Popup::new(" Error ", message, " Dismiss "));
        self.focus = Focus::Alert;
    }

    fn draw(&mut self, frame: &mut Frame<'_>) {
        let view_area = if let Focus::Input = self.focus {
            let [input_area, rest] =
                Layout::vertical([Constraint::Length(3), Constraint::Min(1)]).areas(frame.area());
            self.prompt.draw(input_area, frame);
            rest
        } else {
            frame.area()
        };

        self.grid.render(view_area, frame.buffer_mut());

        if let (Focus::Alert, Some(alert)) = (&self.focus, &self.alert) {
            alert.draw(frame.area(), frame.buffer_mut());
        }
    }

    fn handle_event(&mut self, event: Event) -> Option<Control> {
        if let Event::Key(event) = event
            && event.is_press()
            && event.code == KeyCode::Char('c')
            && event.modifiers == KeyModifiers::CONTROL
        {
            return Some(Control::Quit);
        }
        match self.focus {
            Focus::Input => match self.prompt.handle_event(&event)? {
                prompt::Control::Run(command) => {
                    self.focus = Focus::View;
                    let mut iter = command.split_whitespace();
                    if let Some(command) = iter.next() {
                        let args = iter.collect::<Vec<&str>>();
                        return self.handle_command(command, &args);
                    }
                }
                prompt::Control::Close => {
                    self.focus = Focus::View;
                }
            },
            Focus::View => {
                if let Event::Key(key) = event
                    && key.code == KeyCode::Char(':')
                    && key.is_press()
                {
                    self.focus = Focus::Input;
                    return None;
                }
                let control = self.grid.handle_event(event);
                return self.guard_unsaved(control);
            }
            Focus::Alert => {
                if let Event::Key(key) = event
                    && key.is_press()
                    && matches!(key.code, KeyCode::Enter | KeyCode::Esc)
                {
                    self.alert = None;
                    self.focus = Focus::View;
                }
            }
        }
        None
    }

    /// Keeps edits in memory from being replaced by the file on disk.
    fn guard_unsaved(&self, control: Option<Control>) -> Option<Control> {
        match control {
            Some(Control::Edit | Control::Reload) if self.grid.model().is_dirty() => Some(
                Control::Alert(format!("{UNSAVED} or discard them with :edit! or :reload!")),
            ),
            control => control,
        }
    }

    fn handle_command(&mut self, command: &str, args: &[&str]) -> Option<Control> {
        match command {
            "q" if self.grid.model().is_dirty() => Some(Control::Alert(format!(
                "{UNSAVED} or discard them with :q!"
            ))),
            "q" | "q!" => Some(Control::Quit),
            "w" => self.grid.save(),
            "wq" => Some(self.grid.save().unwrap_or(Control::Quit)),
            "submit" => self.grid.submit(),
            "e" | "edit" => self.guard_unsaved(Some(Control::Edit)),
            "reload" => self.guard_unsaved(Some(Control::Reload)),
            "e!" | "edit!" => Some(Control::Edit),
            "reload!" => Some(Control::Reload),
            _ => self
                .grid
                .command(command, args)
                .unwrap_or_else(|UnknownCommand| {
                    Some(Control::Alert(format!("Unknown command: {command}")))
                }),
        }
    }
}

/// Centered box with a message and a hint on how to close it.
pub(crate) struct Popup {
    title: &'static str,
    text: String,
    button: &'static str,
}

impl Popup {
    pub fn new(title: &'static str, text: String, button: &'static str) -> Self {
        Self {
            title,
            text,
            button,
        }
    }

    fn popup_area(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
        let vertical = Layout::vertical([Constraint::Percentage(percent_y)]).flex(Flex::Center);
        let horizontal = Layout::horizontal([Constraint::Percentage(percent_x)]).flex(Flex::Center);
        let [area] = vertical.areas(area);
        let [area] = horizontal.areas(area);
        area
    }

    pub fn draw(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered()
            .title(self.title)
            .title_alignment(Alignment::Center)
            .border_style(BORDER);
        let area = Self::popup_area(area, 60, 25);
        Clear.render(area, buf);
        (&block).render(area, buf);
        let area = block.inner(area);
        let [message_area, button_area] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area);
        Paragraph::new(self.text.as_str())
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(message_area, buf);
        let button = Text::from(self.button).style(HIGHLIGHT);
        let button_area = h_center(button_area, button.width());
        button.render(button_area, buf);
    }
}

pub fn h_center(area: Rect, width: usize) -> Rect {
    let width = u16::try_from(width).unwrap_or(area.width);
    let [area] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(area);
    area
}
