use std::path::Path;

pub mod aggregate;
pub mod chart;
pub mod load;
pub mod metric;
pub mod model;
pub mod report;

pub use report::ComparisonTable;

/// The declared scenario order. Comparison output always follows this order regardless of
/// which scenarios had data on disk.
pub const DECLARED_SCENARIOS: [&str; 3] = ["light", "moderate", "peak"];

/// Run the load → aggregate pipeline over `results_dir`, which holds one subdirectory per
/// scenario named after it.
///
/// Scenarios without valid data are omitted from the table with a warning. The only terminal
/// failure is every scenario coming up empty, which is reported instead of silently emitting
/// nothing.
pub fn analyze_scenarios(
    results_dir: &Path,
    scenarios: &[&str],
) -> anyhow::Result<ComparisonTable> {
    let mut summaries = Vec::new();

    for scenario in scenarios {
        log::info!("Processing scenario '{}'", scenario);
        let dir = results_dir.join(scenario);
        let (records, diagnostics) = load::load_scenario_runs(scenario, &dir);
        for diagnostic in &diagnostics {
            log::warn!("{}", diagnostic);
        }

        if let Some(summary) = aggregate::summarize_scenario(scenario, &records) {
            summaries.push(summary);
        }
    }

    if summaries.is_empty() {
        anyhow::bail!(
            "No scenario produced any valid data, check the result directories under {}",
            results_dir.display()
        );
    }

    Ok(ComparisonTable::new(summaries))
}
