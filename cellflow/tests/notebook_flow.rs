//! Driving a notebook the way the presentation layer does.

use cellflow::notebook::{DATASET, REPORT, SAMPLE_SIZE, STATISTICS};
use cellflow::test::ConstantSource;
use cellflow::{Config, CorrelationStrength, Error, GraphError, Notebook, SampleSize};

#[test]
fn slider_session() {
    let config = Config::default();
    let mut notebook = Notebook::with_source(config.clone(), ConstantSource(0.5)).unwrap();

    let mut value = notebook.sample_size().unwrap();
    for _ in 0..3 {
        value = config.increase(value);
        notebook.set_input(value).unwrap();
    }
    assert_eq!(value, 80);
    assert_eq!(notebook.dataset().unwrap().len(), 80);
    assert_eq!(notebook.report().unwrap().size, SampleSize::Medium);

    notebook.set_input(config.snap(5_000)).unwrap();
    let snapshot = notebook.snapshot().unwrap();
    assert_eq!(snapshot.sample_size, 200);
    assert_eq!(snapshot.report.size, SampleSize::Large);
    assert_eq!(snapshot.report.strength, CorrelationStrength::VeryStrong);
    assert!(snapshot.report.high_correlation_insight);
}

#[test]
fn passes_are_observable_through_the_graph() {
    let mut notebook = Notebook::with_source(Config::default(), ConstantSource(0.5)).unwrap();
    let graph = notebook.graph();
    assert_eq!(
        graph.topological_order().unwrap(),
        vec![SAMPLE_SIZE, DATASET, STATISTICS, REPORT]
    );
    assert_eq!(graph.dependencies(REPORT).unwrap(), [SAMPLE_SIZE, STATISTICS]);
    let warm_up = graph.current_pass();

    let pass = notebook.set_input(20).unwrap();
    assert_eq!(pass.pass, warm_up + 1);
    for name in [SAMPLE_SIZE, DATASET, STATISTICS, REPORT] {
        let status = notebook.graph().status(name).unwrap();
        assert_eq!(status.last_pass, Some(pass.pass), "{name}");
    }
    assert_eq!(notebook.graph().recompute_count(DATASET).unwrap(), 2);
}

#[test]
fn rejected_input_leaves_the_session_usable() {
    let mut notebook = Notebook::with_source(Config::default(), ConstantSource(0.5)).unwrap();
    let before = notebook.snapshot().unwrap();
    let pass_before = notebook.graph().current_pass();

    let err = notebook.set_input(-1).expect_err("negative sample size");
    assert!(matches!(err, Error::Graph(GraphError::ComputeFailed { .. })));
    assert!(notebook.last_error().is_some());
    assert_eq!(notebook.snapshot().unwrap(), before);
    assert_eq!(notebook.graph().current_pass(), pass_before);

    notebook.set_input(40).unwrap();
    assert!(notebook.last_error().is_none());
    assert!(notebook.report().unwrap().low_sample_warning);
}
