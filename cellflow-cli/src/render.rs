//! Plain-text rendering of notebook values, shared by every front end.

use cellflow::{Correlation, DependencyGraph, PassReport, Report, Statistics};

/// What a report line is, so front ends can style it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Section {
    Title,
    Summary,
    Note,
    Warning,
    Insight,
    Range,
}

/// Report laid out as titled sections, in display order.
pub fn report_sections(report: &Report) -> Vec<(Section, String)> {
    let mut sections = vec![
        (Section::Title, report.size.title().to_string()),
        (Section::Summary, summary_sentence(report)),
    ];

    let note = format!("Note: {}", report.size.advice());
    if report.low_sample_warning {
        sections.push((Section::Warning, note));
    } else {
        sections.push((Section::Note, note));
    }

    if report.high_correlation_insight {
        sections.push((
            Section::Insight,
            "Insight: The high correlation suggests a strong linear relationship, \
             consistent with the synthetic model y = 2x + 3."
                .to_string(),
        ));
    }

    sections.push((
        Section::Range,
        format!(
            "Range: y runs from {:.2} to {:.2} with a mean of {:.2}.",
            report.min_y, report.max_y, report.mean_y
        ),
    ));
    sections
}

fn summary_sentence(report: &Report) -> String {
    match report.correlation {
        Correlation::Defined(r) => format!(
            "With {} data points, we observe a {} {} correlation of {:.3} between X and Y.",
            report.sample_count,
            report.strength,
            if r < 0.0 { "negative" } else { "positive" },
            r
        ),
        Correlation::Undefined => format!(
            "With {} data points, the correlation between X and Y is undefined.",
            report.sample_count
        ),
    }
}

pub fn report_text(report: &Report) -> String {
    report_sections(report)
        .into_iter()
        .map(|(_, text)| text)
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn statistics_lines(stats: &Statistics) -> Vec<String> {
    let fit = match stats.fit {
        Some(fit) => format!("y = {:.2}x + {:.2}", fit.slope, fit.intercept),
        None => "n/a".to_string(),
    };
    vec![
        format!("Points:      {}", stats.count),
        format!("Mean x:      {:.2}", stats.mean_x),
        format!("Mean y:      {:.2}", stats.mean_y),
        format!("Correlation: {}", stats.correlation),
        format!("Min y:       {:.2}", stats.min_y),
        format!("Max y:       {:.2}", stats.max_y),
        format!("Fit:         {fit}"),
    ]
}

/// One line per cell: dependencies, last pass and recompute count.
pub fn graph_lines(graph: &DependencyGraph) -> Vec<String> {
    let width = graph.cell_names().map(str::len).max().unwrap_or(0);
    graph
        .statuses()
        .into_iter()
        .map(|status| {
            let inputs = if status.is_source {
                "[input]".to_string()
            } else {
                format!("<- {}", status.dependencies.join(", "))
            };
            let pass = status
                .last_pass
                .map_or_else(|| "-".to_string(), |p| p.to_string());
            format!(
                "{:width$}  {:<28} pass {:<4} runs {}",
                status.name,
                inputs,
                pass,
                status.recompute_count,
            )
        })
        .collect()
}

/// Format: `pass 3: sample_size -> dataset -> statistics -> report (0.21ms)`
pub fn pass_line(pass: &PassReport, show_timings: bool) -> String {
    let mut line = format!("pass {}: {}", pass.pass, pass.recomputed.join(" -> "));
    if show_timings {
        line.push_str(&format!(" ({:.2}ms)", pass.duration.as_secs_f64() * 1000.0));
    }
    line
}
