use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Utc;
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::model::ScenarioSummary;

/// Scenario summaries in the declared scenario order. Scenarios that produced no valid data
/// are simply absent, they never appear as zero rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonTable {
    scenarios: Vec<ScenarioSummary>,
}

impl ComparisonTable {
    /// `summaries` must already be in the declared scenario order, the table preserves it.
    pub(crate) fn new(summaries: Vec<ScenarioSummary>) -> Self {
        Self {
            scenarios: summaries,
        }
    }

    pub fn rows(&self) -> &[ScenarioSummary] {
        &self.scenarios
    }

    pub fn render(&self) -> String {
        let rows = self
            .scenarios
            .iter()
            .map(|summary| SummaryRow {
                scenario: summary.scenario_name.clone(),
                avg_time_ms: summary.avg_response_time_ms,
                max_time_ms: summary.max_response_time_ms,
                requests_per_sec: summary.requests_per_sec,
                total_requests: summary.total_requests,
                total_failures: summary.total_failures,
                success_pct: summary.success_percentage,
            })
            .collect::<Vec<_>>();

        let mut table = Table::new(&rows);
        table.with(Style::modern());

        table.to_string()
    }
}

#[derive(Tabled)]
struct SummaryRow {
    scenario: String,
    #[tabled(display = "opt_float2")]
    avg_time_ms: Option<f64>,
    #[tabled(display = "opt_float2")]
    max_time_ms: Option<f64>,
    #[tabled(display = "opt_float2")]
    requests_per_sec: Option<f64>,
    #[tabled(display = "opt_float2")]
    total_requests: Option<f64>,
    #[tabled(display = "opt_float2")]
    total_failures: Option<f64>,
    #[tabled(display = "opt_float2")]
    success_pct: Option<f64>,
}

fn opt_float2(n: &Option<f64>) -> String {
    match n {
        Some(n) => format!("{:.2}", n),
        None => "-".to_string(),
    }
}

/// Write the comparison table as a timestamped JSON artifact next to the charts.
pub fn write_json_report(table: &ComparisonTable, out_dir: &Path) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory {}", out_dir.display()))?;

    let path = out_dir.join(format!(
        "summary-report-{}.json",
        Utc::now().format("%Y-%m-%dT%H.%M.%S%.fZ")
    ));
    let report = std::fs::File::create_new(&path)
        .with_context(|| format!("Failed to create report file {}", path.display()))?;

    serde_json::to_writer_pretty(report, table).context("Failed to serialize the report")?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ScenarioSummary;

    #[test]
    fn render_keeps_declared_order_and_shows_missing_as_dash() {
        let mut light = ScenarioSummary::empty("light");
        light.avg_response_time_ms = Some(12.345);
        let peak = ScenarioSummary::empty("peak");

        let table = ComparisonTable::new(vec![light, peak]);
        let rendered = table.render();

        let light_pos = rendered.find("light").unwrap();
        let peak_pos = rendered.find("peak").unwrap();
        assert!(light_pos < peak_pos);
        assert!(rendered.contains("12.35"));
        assert!(rendered.contains('-'));
    }
}
