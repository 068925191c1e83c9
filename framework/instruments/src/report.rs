mod operations_table;
mod stats_file;

use std::path::PathBuf;
use std::time::Instant;

use parking_lot::Mutex;

use crate::stats::collect_stats;
use crate::OperationRecord;

/// Configures which outputs the [Reporter] produces at the end of a run.
#[derive(Debug, Default)]
pub struct ReportConfig {
    enable_summary: bool,
    stats_file: Option<StatsFileTarget>,
}

#[derive(Debug)]
struct StatsFileTarget {
    dir: PathBuf,
    run_index: u32,
}

impl ReportConfig {
    /// Print a summary-of-operations table to the console when the run finishes.
    pub fn enable_summary(mut self) -> Self {
        self.enable_summary = true;
        self
    }

    /// Write a `run<N>_stats.csv` measurement file into `dir` when the run finishes.
    pub fn enable_stats_file(mut self, dir: PathBuf, run_index: u32) -> Self {
        self.stats_file = Some(StatsFileTarget { dir, run_index });
        self
    }

    pub fn init(self) -> Reporter {
        Reporter {
            config: self,
            started: Instant::now(),
            records: Mutex::new(Vec::new()),
        }
    }
}

/// Collects [OperationRecord]s from all agents for the duration of a run.
///
/// Shared behind an `Arc` by the runner. Recording is cheap, everything else happens once in
/// [Reporter::finalize].
#[derive(Debug)]
pub struct Reporter {
    config: ReportConfig,
    started: Instant,
    records: Mutex<Vec<OperationRecord>>,
}

impl Reporter {
    pub fn add_operation(&self, record: OperationRecord) {
        self.records.lock().push(record);
    }

    /// Produce the configured outputs for the records collected so far.
    pub fn finalize(&self) -> anyhow::Result<()> {
        let records = self.records.lock();
        let run_time = self.started.elapsed();
        let (rows, aggregate) = collect_stats(&records, run_time);

        if self.config.enable_summary {
            operations_table::print_summary(&rows);
        }

        if let Some(target) = &self.config.stats_file {
            let path = stats_file::write_stats_file(&target.dir, target.run_index, &rows, &aggregate)?;
            log::info!("Wrote run statistics to {}", path.display());
        }

        Ok(())
    }
}
