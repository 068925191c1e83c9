use std::collections::HashMap;
use std::time::Duration;

use crate::OperationRecord;

/// Name of the totals row in a run statistics file. The summariser looks this up by name.
pub(crate) const AGGREGATE_ROW_NAME: &str = "Aggregated";

/// Rolled-up statistics for one operation name within a run.
#[derive(Debug, Clone)]
pub(crate) struct OperationStats {
    pub name: String,
    pub kind: String,
    pub request_count: usize,
    pub failure_count: usize,
    pub avg_time_ms: f64,
    pub min_time_ms: f64,
    pub max_time_ms: f64,
    pub requests_per_sec: f64,
}

fn roll_up(name: String, kind: String, records: &[&OperationRecord], run_time: Duration) -> OperationStats {
    let request_count = records.len();
    let failure_count = records.iter().filter(|r| r.is_error()).count();

    let total_micros: u128 = records.iter().map(|r| r.duration().as_micros()).sum();
    let avg_time_ms = if request_count == 0 {
        0.0
    } else {
        (total_micros as f64 / request_count as f64) / 1000.0
    };
    let min_time_ms = records
        .iter()
        .map(|r| r.duration().as_micros())
        .min()
        .unwrap_or(0) as f64
        / 1000.0;
    let max_time_ms = records
        .iter()
        .map(|r| r.duration().as_micros())
        .max()
        .unwrap_or(0) as f64
        / 1000.0;

    let run_secs = run_time.as_secs_f64();
    let requests_per_sec = if run_secs > 0.0 {
        request_count as f64 / run_secs
    } else {
        0.0
    };

    OperationStats {
        name,
        kind,
        request_count,
        failure_count,
        avg_time_ms,
        min_time_ms,
        max_time_ms,
        requests_per_sec,
    }
}

/// Collapse raw operation records into one row per operation name, sorted by name, plus the
/// aggregate row totalling across all operations.
pub(crate) fn collect_stats(
    records: &[OperationRecord],
    run_time: Duration,
) -> (Vec<OperationStats>, OperationStats) {
    let mut by_name: HashMap<&str, Vec<&OperationRecord>> = HashMap::new();
    for record in records {
        by_name.entry(record.operation_id()).or_default().push(record);
    }

    let mut rows = by_name
        .into_iter()
        .map(|(name, group)| {
            let kind = group[0].kind().to_string();
            roll_up(name.to_string(), kind, &group, run_time)
        })
        .collect::<Vec<_>>();
    rows.sort_by(|a, b| a.name.cmp(&b.name));

    let all = records.iter().collect::<Vec<_>>();
    let aggregate = roll_up(AGGREGATE_ROW_NAME.to_string(), String::new(), &all, run_time);

    (rows, aggregate)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, is_error: bool) -> OperationRecord {
        OperationRecord::new(name, "GET").complete(is_error)
    }

    #[test]
    fn rows_are_sorted_by_name_and_aggregate_totals_counts() {
        let records = vec![
            record("list_vets", false),
            record("list_owners", true),
            record("list_owners", false),
        ];

        let (rows, aggregate) = collect_stats(&records, Duration::from_secs(10));

        assert_eq!(
            rows.iter().map(|r| r.name.as_str()).collect::<Vec<_>>(),
            vec!["list_owners", "list_vets"]
        );
        assert_eq!(rows[0].request_count, 2);
        assert_eq!(rows[0].failure_count, 1);
        assert_eq!(aggregate.name, AGGREGATE_ROW_NAME);
        assert_eq!(aggregate.request_count, 3);
        assert_eq!(aggregate.failure_count, 1);
        assert!((aggregate.requests_per_sec - 0.3).abs() < 1e-9);
    }

    #[test]
    fn empty_run_produces_zeroed_aggregate() {
        let (rows, aggregate) = collect_stats(&[], Duration::from_secs(5));

        assert!(rows.is_empty());
        assert_eq!(aggregate.request_count, 0);
        assert_eq!(aggregate.avg_time_ms, 0.0);
    }
}
