//! Tests for CLI display formatting

use crate::app::cli::display::format_report;
use crate::app::soak::SoakReport;
use std::time::Duration;

fn report() -> SoakReport {
    SoakReport {
        set_scope: "Soak".to_string(),
        queues_created: 4,
        produced: 10,
        deliveries: 25,
        consumed: 20,
        stranded: 5,
        added_events: 4,
        removed_events: 0,
        expired_events: 2,
        remaining_queues: 2,
        elapsed: Duration::from_millis(1500),
    }
}

#[test]
fn test_plain_report() {
    let output = format_report(&report(), false);

    assert!(output.starts_with("Soak summary"));
    assert!(output.contains("'Soak'"));
    assert!(output.contains("Deliveries:"));
    assert!(output.contains("4 added, 0 removed, 2 expired"));
    assert!(output.contains("every delivery accounted for"));
    assert!(!output.contains('\u{1b}'));
}

#[test]
fn test_report_flags_mismatch() {
    let mut bad = report();
    bad.consumed = 19;

    let output = format_report(&bad, false);
    assert!(output.contains("delivery count mismatch"));
}
