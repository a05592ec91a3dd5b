use ratatui::style::{Color, Modifier, Style};

pub const LIGHT_SKY_BLUE: Color = Color::Rgb(0x87, 0xCE, 0xFA);

pub const HIGHLIGHT: Style = Style::new().bg(Color::LightCyan).fg(Color::Black);
pub const BORDER: Style = Style::new().fg(LIGHT_SKY_BLUE);
pub const PROJECT: Style = Style::new().fg(Color::LightGreen);
pub const TIME: Style = Style::new().fg(Color::LightMagenta);
pub const DATE: Style = Style::new().fg(Color::LightYellow);
pub const DAY_OFF: Style = Style::new().fg(Color::DarkGray);
pub const DISABLED: Style = Style::new().fg(Color::DarkGray).add_modifier(Modifier::DIM);
pub const SCALED: Style = Style::new().fg(Color::Red);
pub const DRAFT: Style = Style::new().bg(Color::Yellow).fg(Color::Black);
