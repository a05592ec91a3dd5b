use std::io::stdout;
use std::path::Path;

use editor_command::EditorBuilder;
use ratatui::DefaultTerminal;
use ratatui::crossterm::ExecutableCommand;
use ratatui::crossterm::terminal::{EnterAlternateScreen, disable_raw_mode, enable_raw_mode};
use tracing::debug;

/// Hands the terminal to `$VISUAL`/`$EDITOR` for the document and takes it
/// back afterwards.
pub fn run_editor(terminal: &mut DefaultTerminal, path: &Path) -> std::io::Result<()> {
    let mut command = EditorBuilder::edit_file(path).map_err(std::io::Error::other)?;
    debug!(?command, "opening editor");
    disable_raw_mode()?;
    let status = command.status();
    stdout().execute(EnterAlternateScreen)?;
    enable_raw_mode()?;
    terminal.clear()?;
    let status = status?;
    if status.success() {
        Ok(())
    } else {
        Err(std::io::Error::other(format!("Editor exited with {status}")))
    }
}
