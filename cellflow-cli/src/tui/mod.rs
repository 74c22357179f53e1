//! Ratatui-based TUI for the notebook.

mod events;
mod state;
mod ui;

use std::io::Write;
use std::process::{Command, Stdio};
use std::time::Duration;

use cellflow::Notebook;
use ratatui::crossterm::event::Event as CrosstermEvent;
use tracing::debug;

use crate::config::Keybindings;
use crate::errors::Result;
use crate::render;

use events::{handle_key, Action, AppEvent, EventHandler};
use state::App;

/// Run the TUI.
pub async fn run(notebook: &mut Notebook, keybindings: &Keybindings) -> Result<()> {
    let mut terminal = ratatui::init();

    let mut app = App::new(notebook);
    let mut events = EventHandler::new(Duration::from_millis(250));

    loop {
        terminal.draw(|frame| ui::render(frame, &app, keybindings))?;

        let Some(event) = events.next().await else {
            break;
        };

        match event {
            AppEvent::Terminal(CrosstermEvent::Key(key)) => {
                let action = handle_key(key, &app, keybindings);
                debug!(?action, "key");
                match action {
                    Action::Quit => break,
                    Action::SetSampleSize(value) => {
                        let result = notebook.set_input(value);
                        app.apply(notebook, result);
                    }
                    Action::Resample => {
                        let result = notebook.resample();
                        app.apply(notebook, result);
                    }
                    Action::Reset => {
                        let result = notebook.reset();
                        app.apply(notebook, result);
                    }
                    Action::ViewReport => {
                        if let Some(snapshot) = &app.snapshot {
                            let text = render::report_text(&snapshot.report);
                            events.stop();
                            view_in_pager(&text);
                            terminal = ratatui::init();
                            events.resume();
                        }
                    }
                    Action::ToggleTimings => app.toggle_timings(),
                    Action::None => {}
                }
            }

            // Redrawn on the next iteration.
            AppEvent::Terminal(_) | AppEvent::Tick => {}
        }
    }

    events.stop();
    ratatui::restore();

    Ok(())
}

/// View text in an external pager.
fn view_in_pager(text: &str) {
    // Restore terminal before spawning pager.
    ratatui::restore();

    let pager = std::env::var("PAGER").unwrap_or_else(|_| "less".to_string());
    let mut child = match Command::new(&pager).stdin(Stdio::piped()).spawn() {
        Ok(child) => child,
        Err(_) => {
            // Fallback: just print the text.
            println!("{}", text);
            let _ = std::io::stdout().flush();
            return;
        }
    };

    if let Some(mut stdin) = child.stdin.take() {
        let _ = stdin.write_all(text.as_bytes());
    }

    let _ = child.wait();
}
