//! TUI application state.

use cellflow::{Config, Notebook, PassReport, Snapshot};

/// Main application state.
///
/// Holds the last good snapshot of every cell. A failed pass only sets
/// `error`, so the panels keep showing the previous values.
pub struct App {
    pub config: Config,

    /// Last good values of all cells.
    pub snapshot: Option<Snapshot>,

    /// Dependency graph, one line per cell.
    pub graph_lines: Vec<String>,

    pub last_pass: Option<PassReport>,

    /// Message of the last failed pass.
    pub error: Option<String>,

    pub show_timings: bool,
}

impl App {
    pub fn new(notebook: &Notebook) -> Self {
        let config = notebook.config().clone();
        let show_timings = config.show_timings;
        let mut app = Self {
            config,
            snapshot: None,
            graph_lines: Vec::new(),
            last_pass: notebook.last_pass().cloned(),
            error: None,
            show_timings,
        };
        app.refresh(notebook);
        app
    }

    /// Record the outcome of a pass and re-read the cells.
    pub fn apply(&mut self, notebook: &Notebook, result: cellflow::Result<PassReport>) {
        match result {
            Ok(pass) => {
                self.last_pass = Some(pass);
                self.error = None;
                self.refresh(notebook);
            }
            Err(_) => {
                self.error = notebook.last_error().map(str::to_string);
            }
        }
    }

    fn refresh(&mut self, notebook: &Notebook) {
        match notebook.snapshot() {
            Ok(snapshot) => self.snapshot = Some(snapshot),
            Err(e) => self.error = Some(e.to_string()),
        }
        self.graph_lines = crate::render::graph_lines(notebook.graph());
    }

    /// Sample size currently shown on the slider.
    pub fn sample_size(&self) -> i64 {
        self.snapshot
            .as_ref()
            .map_or(self.config.default_sample_size, |s| s.sample_size)
    }

    /// Slider position in `[0, 1]`.
    pub fn slider_ratio(&self) -> f64 {
        let min = self.config.min_sample_size.min(self.config.max_sample_size);
        let max = self.config.min_sample_size.max(self.config.max_sample_size);
        if max == min {
            return 1.0;
        }
        let value = self.sample_size().clamp(min, max);
        (value - min) as f64 / (max - min) as f64
    }

    pub fn toggle_timings(&mut self) {
        self.show_timings = !self.show_timings;
    }
}
