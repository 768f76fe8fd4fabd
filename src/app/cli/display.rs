//! CLI display utilities for formatting output

use crate::app::soak::SoakReport;
use colored::Colorize;

/// Width of the label column in the summary
const LABEL_WIDTH: usize = 18;

/// Render the end-of-run summary as aligned `label: value` lines
pub fn format_report(report: &SoakReport, use_color: bool) -> String {
    let rows = [
        ("Set scope", format!("'{}'", report.set_scope)),
        ("Elapsed", format!("{:.2?}", report.elapsed)),
        ("Queues created", report.queues_created.to_string()),
        ("Queues remaining", report.remaining_queues.to_string()),
        ("Items produced", report.produced.to_string()),
        ("Deliveries", report.deliveries.to_string()),
        ("Items consumed", report.consumed.to_string()),
        ("Items stranded", report.stranded.to_string()),
        (
            "Lifecycle events",
            format!(
                "{} added, {} removed, {} expired",
                report.added_events, report.removed_events, report.expired_events
            ),
        ),
    ];

    let mut lines = Vec::with_capacity(rows.len() + 1);
    let title = "Soak summary";
    lines.push(if use_color {
        title.bold().to_string()
    } else {
        title.to_string()
    });

    for (label, value) in rows {
        let label = format!("{:<width$}", format!("{}:", label), width = LABEL_WIDTH);
        if use_color {
            lines.push(format!("  {} {}", label.dimmed(), value.cyan()));
        } else {
            lines.push(format!("  {} {}", label, value));
        }
    }

    let balanced = report.deliveries == report.consumed + report.stranded;
    let status = if balanced {
        "every delivery accounted for"
    } else {
        "delivery count mismatch"
    };
    lines.push(match (use_color, balanced) {
        (false, _) => format!("  {}", status),
        (true, true) => format!("  {}", status.green()),
        (true, false) => format!("  {}", status.red().bold()),
    });

    lines.join("\n")
}

pub fn display_report(report: &SoakReport, use_color: bool) {
    println!("{}", format_report(report, use_color));
}
