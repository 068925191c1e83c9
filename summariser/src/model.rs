use serde::Serialize;

use crate::metric::Metric;

/// The aggregate measurements from one run statistics file.
///
/// Every metric is optional. A `None` means the value was missing from the source file and is
/// excluded from averaging, it is never treated as zero.
#[derive(Debug, Clone, PartialEq)]
pub struct RunRecord {
    pub scenario_name: String,
    pub run_index: u32,
    pub request_count: Option<f64>,
    pub failure_count: Option<f64>,
    pub avg_response_time_ms: Option<f64>,
    pub max_response_time_ms: Option<f64>,
    pub requests_per_sec: Option<f64>,
}

impl RunRecord {
    /// Percentage of requests that succeeded in this run. 100 for a run with no requests.
    /// Missing when either count is missing.
    pub fn success_percentage(&self) -> Option<f64> {
        match (self.request_count, self.failure_count) {
            (Some(requests), Some(failures)) => {
                if requests == 0.0 {
                    Some(100.0)
                } else {
                    Some(((requests - failures) / requests) * 100.0)
                }
            }
            _ => None,
        }
    }

    pub fn metric_value(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::AvgResponseTime => self.avg_response_time_ms,
            Metric::MaxResponseTime => self.max_response_time_ms,
            Metric::RequestsPerSec => self.requests_per_sec,
            Metric::TotalRequests => self.request_count,
            Metric::TotalFailures => self.failure_count,
            Metric::SuccessPercentage => self.success_percentage(),
        }
    }
}

/// Mean value per tracked metric across one scenario's runs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioSummary {
    pub scenario_name: String,
    pub avg_response_time_ms: Option<f64>,
    pub max_response_time_ms: Option<f64>,
    pub requests_per_sec: Option<f64>,
    pub total_requests: Option<f64>,
    pub total_failures: Option<f64>,
    pub success_percentage: Option<f64>,
}

impl ScenarioSummary {
    pub fn empty(scenario_name: impl Into<String>) -> Self {
        Self {
            scenario_name: scenario_name.into(),
            avg_response_time_ms: None,
            max_response_time_ms: None,
            requests_per_sec: None,
            total_requests: None,
            total_failures: None,
            success_percentage: None,
        }
    }

    pub fn metric_mean(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::AvgResponseTime => self.avg_response_time_ms,
            Metric::MaxResponseTime => self.max_response_time_ms,
            Metric::RequestsPerSec => self.requests_per_sec,
            Metric::TotalRequests => self.total_requests,
            Metric::TotalFailures => self.total_failures,
            Metric::SuccessPercentage => self.success_percentage,
        }
    }

    pub(crate) fn set_metric_mean(&mut self, metric: Metric, value: f64) {
        let slot = match metric {
            Metric::AvgResponseTime => &mut self.avg_response_time_ms,
            Metric::MaxResponseTime => &mut self.max_response_time_ms,
            Metric::RequestsPerSec => &mut self.requests_per_sec,
            Metric::TotalRequests => &mut self.total_requests,
            Metric::TotalFailures => &mut self.total_failures,
            Metric::SuccessPercentage => &mut self.success_percentage,
        };
        *slot = Some(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(request_count: Option<f64>, failure_count: Option<f64>) -> RunRecord {
        RunRecord {
            scenario_name: "light".to_string(),
            run_index: 1,
            request_count,
            failure_count,
            avg_response_time_ms: None,
            max_response_time_ms: None,
            requests_per_sec: None,
        }
    }

    #[test]
    fn success_percentage_is_100_for_an_empty_run() {
        assert_eq!(record(Some(0.0), Some(0.0)).success_percentage(), Some(100.0));
    }

    #[test]
    fn success_percentage_is_computed_from_counts() {
        assert_eq!(
            record(Some(100.0), Some(25.0)).success_percentage(),
            Some(75.0)
        );
    }

    #[test]
    fn success_percentage_is_missing_when_a_count_is_missing() {
        assert_eq!(record(Some(100.0), None).success_percentage(), None);
        assert_eq!(record(None, Some(5.0)).success_percentage(), None);
    }
}
