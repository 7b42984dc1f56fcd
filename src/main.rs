use anyhow::Result;
use config::{init_logger, LogConfig};
use tui::App;

mod config;
mod tasks;
mod tui;

fn main() -> Result<()> {
    init_logger(&LogConfig::from_env()?)?;

    let mut terminal = ratatui::init();
    terminal.clear()?;
    let app_result = App::new().run(&mut terminal);
    ratatui::restore();
    app_result
}
