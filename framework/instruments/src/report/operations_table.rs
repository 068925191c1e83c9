use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::stats::OperationStats;

#[derive(Tabled)]
struct OperationRow {
    operation: String,
    requests: usize,
    failures: usize,
    #[tabled(display = "float2")]
    avg_time_ms: f64,
    #[tabled(display = "float2")]
    min_time_ms: f64,
    #[tabled(display = "float2")]
    max_time_ms: f64,
    #[tabled(display = "float2")]
    requests_per_sec: f64,
}

fn float2(n: &f64) -> String {
    format!("{:.2}", n)
}

pub(crate) fn print_summary(stats: &[OperationStats]) {
    println!("\nSummary of operations");

    let rows = stats
        .iter()
        .map(|s| OperationRow {
            operation: s.name.clone(),
            requests: s.request_count,
            failures: s.failure_count,
            avg_time_ms: s.avg_time_ms,
            min_time_ms: s.min_time_ms,
            max_time_ms: s.max_time_ms,
            requests_per_sec: s.requests_per_sec,
        })
        .collect::<Vec<_>>();

    let mut table = Table::new(&rows);
    table.with(Style::modern());

    println!("{}", table);
}
