//! Property tests for the generator, statistics bounds and pass ordering.

use std::collections::HashSet;

use cellflow::dataset::{self, round2, INTERCEPT, NOISE_AMPLITUDE, SLOPE, X_SPAN};
use cellflow::report::{self, SampleSize};
use cellflow::stats::{self, Correlation};
use cellflow::test::points;
use cellflow::{DependencyGraph, FastRandSource};
use proptest::prelude::*;

proptest! {
    #[test]
    fn generated_length_and_x_grid(n in 1usize..400, seed in any::<u64>()) {
        let data = dataset::generate(n, &mut FastRandSource::with_seed(seed)).unwrap();
        prop_assert_eq!(data.len(), n);
        for (i, point) in data.iter().enumerate() {
            prop_assert_eq!(point.x, round2(i as f64 / n as f64 * X_SPAN));
        }
        prop_assert!(data.windows(2).all(|w| w[0].x <= w[1].x));
    }

    #[test]
    fn generated_noise_is_bounded(n in 1usize..200, seed in any::<u64>()) {
        let data = dataset::generate(n, &mut FastRandSource::with_seed(seed)).unwrap();
        for point in &data {
            let line = SLOPE * point.x + INTERCEPT;
            // Rounding x and y moves a point by a few hundredths at most.
            prop_assert!((point.y - line).abs() <= NOISE_AMPLITUDE + 0.02, "{:?}", point);
        }
    }

    #[test]
    fn correlation_stays_in_range(
        pairs in prop::collection::vec((-1e3f64..1e3, -1e3f64..1e3), 1..64)
    ) {
        let summary = stats::summarize(&points(&pairs)).unwrap();
        match summary.correlation {
            Correlation::Defined(r) => prop_assert!((-1.0..=1.0).contains(&r)),
            Correlation::Undefined => {}
        }
        prop_assert!(summary.min_y <= summary.mean_y + 1e-9);
        prop_assert!(summary.mean_y <= summary.max_y + 1e-9);
    }

    #[test]
    fn sample_size_labels_partition_counts(count in 1usize..1000) {
        let summary = stats::summarize(&points(&[(0.0, 1.0), (1.0, 2.0)])).unwrap();
        let report = report::compose(count, &summary);
        let expected = match count {
            0..=49 => SampleSize::Small,
            50..=99 => SampleSize::Medium,
            _ => SampleSize::Large,
        };
        prop_assert_eq!(report.size, expected);
        prop_assert_eq!(report.low_sample_warning, count < 50);
    }

    #[test]
    fn every_pass_recomputes_each_cell_once(values in prop::collection::vec(-100i64..100, 1..20)) {
        let mut graph = DependencyGraph::new();
        graph.register_input("a", 0i64).unwrap();
        graph.register_cell("b", &["a"], |inputs| Ok(inputs.load::<i64>("a")? + 1)).unwrap();
        graph.register_cell("c", &["a"], |inputs| Ok(inputs.load::<i64>("a")? * 2)).unwrap();
        graph
            .register_cell("d", &["b", "c"], |inputs| {
                Ok(inputs.load::<i64>("b")? + inputs.load::<i64>("c")?)
            })
            .unwrap();
        graph.evaluate_all().unwrap();

        for value in values {
            let report = graph.set_value("a", &value).unwrap();
            let unique: HashSet<&String> = report.recomputed.iter().collect();
            prop_assert_eq!(unique.len(), report.recomputed.len());
            prop_assert_eq!(&report.recomputed, &["a", "b", "c", "d"]);
            prop_assert_eq!(graph.get_value::<i64>("d").unwrap(), value + 1 + value * 2);
        }
    }
}
