//! Event handling for the TUI.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use ratatui::crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};
use tokio::sync::mpsc;

use super::state::App;
use crate::config::Keybindings;

/// Slider steps moved by one jump.
pub const JUMP_STEPS: i64 = 5;

/// Unified event type for the TUI.
pub enum AppEvent {
    /// Terminal event from crossterm.
    Terminal(CrosstermEvent),

    /// Periodic tick so the screen is redrawn after resizes.
    Tick,
}

/// Event handler that bridges crossterm with tokio.
pub struct EventHandler {
    terminal_rx: mpsc::UnboundedReceiver<CrosstermEvent>,
    tick_rate: Duration,
    stop_flag: Arc<AtomicBool>,
    thread_handle: Option<JoinHandle<()>>,
}

fn spawn_poll_thread(
    stop_flag: Arc<AtomicBool>,
    terminal_tx: mpsc::UnboundedSender<CrosstermEvent>,
) -> JoinHandle<()> {
    std::thread::spawn(move || loop {
        if stop_flag.load(Ordering::Relaxed) {
            break;
        }
        if !event::poll(Duration::from_millis(50)).unwrap_or(false) {
            continue;
        }
        match event::read() {
            Ok(evt) => {
                if terminal_tx.send(evt).is_err() {
                    break;
                }
            }
            Err(_) => continue,
        }
    })
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (terminal_tx, terminal_rx) = mpsc::unbounded_channel();
        let stop_flag = Arc::new(AtomicBool::new(false));
        let handle = spawn_poll_thread(stop_flag.clone(), terminal_tx);

        Self {
            terminal_rx,
            tick_rate,
            stop_flag,
            thread_handle: Some(handle),
        }
    }

    /// Stop the event polling thread and wait for it to finish.
    pub fn stop(&mut self) {
        self.stop_flag.store(true, Ordering::Relaxed);
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }

    /// Resume event polling with a new thread.
    pub fn resume(&mut self) {
        self.stop_flag.store(false, Ordering::Relaxed);

        let (terminal_tx, terminal_rx) = mpsc::unbounded_channel();
        self.terminal_rx = terminal_rx;
        self.thread_handle = Some(spawn_poll_thread(self.stop_flag.clone(), terminal_tx));
    }

    pub async fn next(&mut self) -> Option<AppEvent> {
        let tick = tokio::time::sleep(self.tick_rate);

        tokio::select! {
            biased;

            event = self.terminal_rx.recv() => {
                event.map(AppEvent::Terminal)
            }

            _ = tick => {
                Some(AppEvent::Tick)
            }
        }
    }
}

/// Actions the app can take in response to events.
#[derive(Debug, PartialEq, Eq)]
pub enum Action {
    None,
    Quit,
    SetSampleSize(i64),
    Resample,
    Reset,
    ViewReport,
    ToggleTimings,
}

/// Process a key event and return the action.
///
/// Slider moves are snapped here. A move that would not change the value
/// produces no action, so no pass is run for it.
pub fn handle_key(key: KeyEvent, app: &App, kb: &Keybindings) -> Action {
    if key.kind != KeyEventKind::Press {
        return Action::None;
    }

    let (code, modifiers) = (key.code, key.modifiers);
    let config = &app.config;
    let current = app.sample_size();
    let jump = config.step.max(1).saturating_mul(JUMP_STEPS);

    let target = if kb.quit.matches(code, modifiers) {
        return Action::Quit;
    } else if kb.reseed.matches(code, modifiers) {
        return Action::Resample;
    } else if kb.reset.matches(code, modifiers) {
        return Action::Reset;
    } else if kb.view_report.matches(code, modifiers) {
        return Action::ViewReport;
    } else if kb.toggle_timings.matches(code, modifiers) {
        return Action::ToggleTimings;
    } else if kb.increase.matches(code, modifiers) {
        config.increase(current)
    } else if kb.decrease.matches(code, modifiers) {
        config.decrease(current)
    } else if kb.jump_up.matches(code, modifiers) {
        config.snap(current.saturating_add(jump))
    } else if kb.jump_down.matches(code, modifiers) {
        config.snap(current.saturating_sub(jump))
    } else {
        return Action::None;
    };

    if target == current {
        Action::None
    } else {
        Action::SetSampleSize(target)
    }
}
