use crate::metric::Metric;
use crate::model::{RunRecord, ScenarioSummary};

/// Reduce one scenario's run records to a summary of per-metric means.
///
/// Each metric is averaged over the runs where it is present, missing values are excluded from
/// both numerator and denominator. Returns `None` when no metric had a single valid
/// observation, in which case the scenario is dropped from the comparison.
pub fn summarize_scenario(scenario_name: &str, records: &[RunRecord]) -> Option<ScenarioSummary> {
    if records.is_empty() {
        log::warn!("No valid run data for scenario '{}', omitting it", scenario_name);
        return None;
    }

    let mut summary = ScenarioSummary::empty(scenario_name);
    let mut any_valid = false;

    for metric in Metric::ALL {
        let values = records
            .iter()
            .filter_map(|record| record.metric_value(metric))
            .collect::<Vec<_>>();

        if values.is_empty() {
            log::warn!(
                "No valid observations for metric '{}' in scenario '{}'",
                metric.label(),
                scenario_name
            );
            continue;
        }

        let mean = values.iter().sum::<f64>() / values.len() as f64;
        summary.set_metric_mean(metric, mean);
        any_valid = true;
    }

    if any_valid {
        Some(summary)
    } else {
        log::warn!(
            "No metric produced a valid mean for scenario '{}', omitting it",
            scenario_name
        );
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(avg: Option<f64>) -> RunRecord {
        RunRecord {
            scenario_name: "light".to_string(),
            run_index: 1,
            request_count: None,
            failure_count: None,
            avg_response_time_ms: avg,
            max_response_time_ms: None,
            requests_per_sec: None,
        }
    }

    #[test]
    fn missing_values_are_excluded_from_the_mean() {
        let records = vec![record(Some(10.0)), record(None), record(Some(20.0))];

        let summary = summarize_scenario("light", &records).unwrap();

        assert_eq!(summary.avg_response_time_ms, Some(15.0));
    }

    #[test]
    fn metric_with_no_observations_stays_missing() {
        let records = vec![record(Some(10.0))];

        let summary = summarize_scenario("light", &records).unwrap();

        assert_eq!(summary.max_response_time_ms, None);
        assert_eq!(summary.requests_per_sec, None);
    }

    #[test]
    fn success_percentage_is_averaged_from_per_run_values() {
        // Run one: 100% success, run two: 75%. The mean is per-run percentages averaged, not
        // a percentage of summed counts.
        let mut run1 = record(None);
        run1.request_count = Some(50.0);
        run1.failure_count = Some(0.0);
        let mut run2 = record(None);
        run2.request_count = Some(100.0);
        run2.failure_count = Some(25.0);

        let summary = summarize_scenario("light", &[run1, run2]).unwrap();

        assert_eq!(summary.success_percentage, Some(87.5));
    }

    #[test]
    fn scenario_with_no_records_is_dropped() {
        assert!(summarize_scenario("empty", &[]).is_none());
    }

    #[test]
    fn scenario_with_only_missing_values_is_dropped() {
        let records = vec![record(None), record(None)];

        assert!(summarize_scenario("hollow", &records).is_none());
    }
}
