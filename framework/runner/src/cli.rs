use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(about, long_about = None)]
pub struct ScenarioCli {
    /// Base URL of the service to generate load against
    #[clap(short, long)]
    pub target: Option<String>,

    /// The number of simulated agents to run
    #[clap(long)]
    pub agents: Option<usize>,

    /// Assign a behaviour to a number of agents, in the format `behaviour:count`. For example
    /// `--behaviour=browse:5`.
    ///
    /// The count is optional and defaults to 1. The flag can be repeated to assign multiple
    /// behaviours. Agents not covered by an assignment run the `default` behaviour. The total
    /// assigned count must not exceed the number of agents or the scenario will fail to start.
    #[clap(long, short, value_parser = parse_agent_behaviour)]
    pub behaviour: Vec<(String, usize)>,

    /// The number of seconds to run the scenario for
    #[clap(long)]
    pub duration: Option<u64>,

    /// Run as a soak test, ignoring any configured duration and running until stopped
    #[clap(long, default_value = "false")]
    pub soak: bool,

    /// Seed for the per-agent random sources. Runs with the same seed, agent count and target
    /// make the same sequence of decisions.
    #[clap(long)]
    pub seed: Option<u64>,

    /// Directory to write the `run<N>_stats.csv` measurement file into.
    ///
    /// When not set, no measurement file is produced and only the console summary is printed.
    #[clap(long)]
    pub stats_dir: Option<PathBuf>,

    /// Index of this run within its scenario, used in the measurement file name
    #[clap(long, default_value = "1")]
    pub run_index: u32,

    /// Do not show a progress bar on the CLI.
    ///
    /// Recommended for CI environments where the bar is just noise in the logs.
    #[clap(long, default_value = "false")]
    pub no_progress: bool,
}

fn parse_agent_behaviour(s: &str) -> anyhow::Result<(String, usize)> {
    let mut parts = s.split(':');
    let name = parts
        .next()
        .map(|s| s.to_string())
        .ok_or(anyhow::anyhow!("No name specified for behaviour"))?;

    let count = parts.next().and_then(|s| s.parse::<usize>().ok()).unwrap_or(1);

    Ok((name, count))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn behaviour_assignment_parses_name_and_count() {
        assert_eq!(
            parse_agent_behaviour("browse:5").unwrap(),
            ("browse".to_string(), 5)
        );
    }

    #[test]
    fn behaviour_assignment_count_defaults_to_one() {
        assert_eq!(
            parse_agent_behaviour("browse").unwrap(),
            ("browse".to_string(), 1)
        );
    }
}
