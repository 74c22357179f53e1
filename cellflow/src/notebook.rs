//! The sample-size notebook: four cells wired onto a dependency graph.
//!
//! ```text
//! sample_size ──► dataset ──► statistics ──► report
//!      └──────────────────────────────────────▲
//! ```

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::Config;
use crate::dataset::{self, Dataset};
use crate::errors::{DataError, Result};
use crate::graph::{DependencyGraph, PassReport};
use crate::random::{self, FastRandSource, RandomSource};
use crate::report::{self, Report};
use crate::stats::{self, Statistics};

pub const SAMPLE_SIZE: &str = "sample_size";
pub const DATASET: &str = "dataset";
pub const STATISTICS: &str = "statistics";
pub const REPORT: &str = "report";

/// Every cell value at one point in time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub sample_size: i64,
    pub dataset: Dataset,
    pub statistics: Statistics,
    pub report: Report,
}

/// A notebook session. Owns its graph and noise source.
#[derive(Debug)]
pub struct Notebook {
    graph: DependencyGraph,
    config: Config,
    last_pass: Option<PassReport>,
    last_error: Option<String>,
}

impl Notebook {
    /// Create a notebook drawing noise from `fastrand`, seeded from the config
    /// when a seed is set.
    pub fn new(config: Config) -> Result<Self> {
        let source = FastRandSource::from_seed(config.seed);
        Self::with_source(config, source)
    }

    /// Create a notebook with an injected noise source.
    pub fn with_source(config: Config, source: impl RandomSource + Send + 'static) -> Result<Self> {
        let noise = random::shared(source);
        let mut graph = DependencyGraph::new();

        graph.register_input(SAMPLE_SIZE, config.default_sample_size)?;

        graph.register_cell(DATASET, &[SAMPLE_SIZE], move |inputs| {
            let count = sample_count(load!(inputs, sample_size as i64)?)?;
            let mut source = noise.lock();
            dataset::generate(count, &mut *source)
        })?;

        graph.register_cell(STATISTICS, &[DATASET], |inputs| {
            let data = load!(inputs, dataset as Dataset)?;
            stats::summarize(&data)
        })?;

        graph.register_cell(REPORT, &[SAMPLE_SIZE, STATISTICS], |inputs| {
            let count = sample_count(load!(inputs, sample_size as i64)?)?;
            let statistics = load!(inputs, statistics as Statistics)?;
            Ok(report::compose(count, &statistics))
        })?;

        let mut notebook = Self {
            graph,
            config,
            last_pass: None,
            last_error: None,
        };
        let warm_up = notebook.graph.evaluate_all();
        notebook.record(warm_up)?;
        Ok(notebook)
    }

    /// Set the sample size and recompute the downstream cells.
    ///
    /// Only `sample_size > 0` is enforced here; snapping to the slider range is
    /// the caller's job (see [`Config::snap`]). On failure the previous values
    /// stay in place and [`Notebook::last_error`] describes what went wrong.
    pub fn set_input(&mut self, sample_size: i64) -> Result<PassReport> {
        let result = set!(self.graph, sample_size);
        self.record(result)
    }

    /// Recompute from the current input, drawing fresh noise.
    pub fn resample(&mut self) -> Result<PassReport> {
        let sample_size = self.sample_size()?;
        self.set_input(sample_size)
    }

    /// Go back to the configured default sample size.
    pub fn reset(&mut self) -> Result<PassReport> {
        self.set_input(self.config.default_sample_size)
    }

    pub fn sample_size(&self) -> Result<i64> {
        get!(self.graph, sample_size as i64)
    }

    pub fn dataset(&self) -> Result<Dataset> {
        get!(self.graph, dataset as Dataset)
    }

    pub fn statistics(&self) -> Result<Statistics> {
        get!(self.graph, statistics as Statistics)
    }

    pub fn report(&self) -> Result<Report> {
        get!(self.graph, report as Report)
    }

    pub fn snapshot(&self) -> Result<Snapshot> {
        Ok(Snapshot {
            sample_size: self.sample_size()?,
            dataset: self.dataset()?,
            statistics: self.statistics()?,
            report: self.report()?,
        })
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The last committed pass.
    pub fn last_pass(&self) -> Option<&PassReport> {
        self.last_pass.as_ref()
    }

    /// Message of the last failed pass, cleared by the next successful one.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    fn record(&mut self, result: Result<PassReport>) -> Result<PassReport> {
        match result {
            Ok(report) => {
                info!(summary = %report.summary(), "notebook updated");
                self.last_error = None;
                self.last_pass = Some(report.clone());
                Ok(report)
            }
            Err(e) => {
                warn!(error = %e, "notebook update failed, keeping previous values");
                self.last_error = Some(e.root_cause().to_string());
                Err(e)
            }
        }
    }
}

fn sample_count(sample_size: i64) -> Result<usize> {
    usize::try_from(sample_size)
        .ok()
        .filter(|&count| count > 0)
        .ok_or_else(|| DataError::InvalidCount(sample_size).into())
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::errors::{Error, GraphError};
    use crate::report::{CorrelationStrength, SampleSize};
    use crate::test::{ConstantSource, SequenceSource};

    fn noiseless() -> Notebook {
        Notebook::with_source(Config::default(), ConstantSource(0.5)).unwrap()
    }

    #[test]
    fn starts_from_the_default_sample_size() {
        let notebook = noiseless();
        assert_eq!(notebook.sample_size().unwrap(), 50);
        assert_eq!(notebook.dataset().unwrap().len(), 50);

        let report = notebook.report().unwrap();
        assert_eq!(report.size, SampleSize::Medium);
        assert_eq!(report.strength, CorrelationStrength::VeryStrong);
        assert!(report.high_correlation_insight);
        assert!(!report.low_sample_warning);
        assert_eq!(notebook.graph().current_pass(), 1);
    }

    #[test]
    fn set_input_flows_through_every_cell() {
        let mut notebook = noiseless();
        let pass = notebook.set_input(30).unwrap();

        assert_eq!(pass.recomputed, vec![SAMPLE_SIZE, DATASET, STATISTICS, REPORT]);
        let snapshot = notebook.snapshot().unwrap();
        assert_eq!(snapshot.sample_size, 30);
        assert_eq!(snapshot.dataset.len(), 30);
        assert_eq!(snapshot.statistics.count, 30);
        assert_eq!(snapshot.report.size, SampleSize::Small);
        assert!(snapshot.report.low_sample_warning);
    }

    #[test]
    fn noiseless_data_recovers_the_model() {
        let mut notebook = noiseless();
        notebook.set_input(100).unwrap();

        let statistics = notebook.statistics().unwrap();
        let fit = statistics.fit.unwrap();
        assert_relative_eq!(fit.slope, 2.0, epsilon = 1e-2);
        assert_relative_eq!(fit.intercept, 3.0, epsilon = 1e-2);
        assert_relative_eq!(statistics.min_y, 3.0);
        assert_relative_eq!(statistics.max_y, 22.8);
        assert!(statistics.correlation.value().unwrap() > 0.999);
    }

    #[test]
    fn each_pass_draws_fresh_noise() {
        let config = Config::default().default_sample_size(10);
        let source = SequenceSource::new(vec![0.0, 1.0, 0.25]);
        let mut notebook = Notebook::with_source(config, source).unwrap();
        let first = notebook.dataset().unwrap();
        notebook.resample().unwrap();
        let second = notebook.dataset().unwrap();

        assert_eq!(first.len(), second.len());
        assert_ne!(first, second);
    }

    #[test]
    fn invalid_input_keeps_previous_values() {
        let mut notebook = noiseless();
        let before = notebook.snapshot().unwrap();

        let err = notebook.set_input(0).expect_err("zero points");
        assert!(matches!(
            err,
            Error::Graph(GraphError::ComputeFailed { ref cell, .. }) if cell == DATASET
        ));
        assert!(matches!(err.root_cause(), Error::Data(DataError::InvalidCount(0))));
        assert_eq!(notebook.snapshot().unwrap(), before);
        assert_eq!(
            notebook.last_error(),
            Some("sample count must be positive, got 0")
        );

        notebook.set_input(-20).expect_err("negative points");
        assert_eq!(notebook.sample_size().unwrap(), 50);

        notebook.set_input(70).unwrap();
        assert_eq!(notebook.last_error(), None);
        assert_eq!(notebook.report().unwrap().sample_count, 70);
    }

    #[test]
    fn reset_returns_to_the_default() {
        let mut notebook = noiseless();
        notebook.set_input(150).unwrap();
        assert_eq!(notebook.report().unwrap().size, SampleSize::Large);

        notebook.reset().unwrap();
        assert_eq!(notebook.sample_size().unwrap(), 50);
        assert_eq!(notebook.last_pass().unwrap().trigger.as_deref(), Some(SAMPLE_SIZE));
    }

    #[test]
    fn seeded_notebooks_agree() {
        let a = Notebook::new(Config::default().seed(11)).unwrap();
        let b = Notebook::new(Config::default().seed(11)).unwrap();
        assert_eq!(a.dataset().unwrap(), b.dataset().unwrap());
    }
}
