//! scriptdeck-tui - TUI frontend for scriptdeck using Ratatui

pub mod app;
pub mod clipboard;
pub mod components;
pub mod ui;

pub use app::App;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use scriptdeck_core::Catalog;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Run the TUI application
///
/// The metadata load starts immediately in the background; the list fills
/// in once it lands. Scripts saved with `d` go to `download_dir`.
pub async fn run(catalog: Arc<Catalog>, download_dir: PathBuf) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(catalog, download_dir);
    let mut ui = ui::Ui::new();

    app.reload();

    let result = run_loop(&mut terminal, &mut app, &mut ui).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn run_loop<B: Backend>(terminal: &mut Terminal<B>, app: &mut App, ui: &mut ui::Ui) -> Result<()>
where
    <B as Backend>::Error: Send + Sync + 'static,
{
    loop {
        app.poll();

        terminal.draw(|f| ui.render(f, app))?;

        // Poll with a short timeout so background results show up promptly
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key.code, key.modifiers);
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }

        // Let spawned fetches make progress on a current-thread runtime
        tokio::task::yield_now().await;
    }
}
