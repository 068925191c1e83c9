use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use url::Url;

use crate::cli::ScenarioCli;
use crate::context::{AgentContext, RunnerContext, UserValuesConstraint};

pub type HookResult = anyhow::Result<()>;

pub type GlobalHookMut<RV> = fn(&mut RunnerContext<RV>) -> HookResult;
pub type GlobalHook<RV> = fn(Arc<RunnerContext<RV>>) -> HookResult;
pub type AgentHookMut<RV, V> = fn(&mut AgentContext<RV, V>) -> HookResult;

/// The builder for a scenario definition.
///
/// Use this at the start of a scenario binary to describe the scenario you want to run.
pub struct ScenarioDefinitionBuilder<RV: UserValuesConstraint, V: UserValuesConstraint> {
    /// The name of the scenario, which should be unique within the test suite.
    ///
    /// Recommended value is `env!("CARGO_PKG_NAME")`.
    name: String,
    cli: ScenarioCli,
    default_duration_s: Option<u64>,
    default_agent_count: usize,
    pacing_ms: Option<RangeInclusive<u64>>,
    /// Global setup hook, run once before any agents start.
    setup_fn: Option<GlobalHookMut<RV>>,
    /// Per-agent setup hook, run once for each agent as it starts.
    setup_agent_fn: Option<AgentHookMut<RV, V>>,
    /// The agent behaviours for this scenario, keyed by name. A single behaviour registered
    /// with [ScenarioDefinitionBuilder::use_agent_behaviour] gets the name `default`.
    agent_behaviour: HashMap<String, AgentHookMut<RV, V>>,
    /// Per-agent teardown hook, run as each agent stops.
    teardown_agent_fn: Option<AgentHookMut<RV, V>>,
    /// Global teardown hook, run once after all agents have stopped. Best effort.
    teardown_fn: Option<GlobalHook<RV>>,
}

pub(crate) struct ScenarioDefinition<RV: UserValuesConstraint, V: UserValuesConstraint> {
    pub name: String,
    pub target_url: Url,
    pub duration_s: Option<u64>,
    pub seed: u64,
    pub no_progress: bool,
    pub stats_dir: Option<PathBuf>,
    pub run_index: u32,
    pub pacing_ms: Option<RangeInclusive<u64>>,
    /// One entry per agent, naming the behaviour that agent runs.
    pub assigned_behaviours: Vec<String>,
    pub setup_fn: Option<GlobalHookMut<RV>>,
    pub setup_agent_fn: Option<AgentHookMut<RV, V>>,
    pub agent_behaviour: HashMap<String, AgentHookMut<RV, V>>,
    pub teardown_agent_fn: Option<AgentHookMut<RV, V>>,
    pub teardown_fn: Option<GlobalHook<RV>>,
}

impl<RV: UserValuesConstraint, V: UserValuesConstraint> ScenarioDefinitionBuilder<RV, V> {
    /// Initialise a new scenario definition from the scenario name and command line arguments.
    pub fn new(name: &str, cli: ScenarioCli) -> Self {
        Self {
            name: name.to_string(),
            cli,
            default_duration_s: None,
            default_agent_count: 1,
            pacing_ms: None,
            setup_fn: None,
            setup_agent_fn: None,
            agent_behaviour: HashMap::new(),
            teardown_agent_fn: None,
            teardown_fn: None,
        }
    }

    /// Duration to use when the command line does not specify one. Without either, the
    /// scenario runs until stopped.
    pub fn with_default_duration_s(mut self, duration_s: u64) -> Self {
        self.default_duration_s = Some(duration_s);
        self
    }

    /// Number of agents to run when the command line does not specify one. Defaults to 1.
    pub fn with_default_agent_count(mut self, agents: usize) -> Self {
        self.default_agent_count = agents;
        self
    }

    /// Pause each agent between behaviour cycles for a delay drawn uniformly from this
    /// millisecond interval. Each agent draws independently on every cycle.
    pub fn with_pacing_ms(mut self, pacing: RangeInclusive<u64>) -> Self {
        self.pacing_ms = Some(pacing);
        self
    }

    /// Set the global setup hook for this scenario.
    pub fn use_setup(mut self, setup_fn: GlobalHookMut<RV>) -> Self {
        self.setup_fn = Some(setup_fn);
        self
    }

    /// Set the agent setup hook for this scenario.
    pub fn use_agent_setup(mut self, setup_agent_fn: AgentHookMut<RV, V>) -> Self {
        self.setup_agent_fn = Some(setup_agent_fn);
        self
    }

    /// Set the default agent behaviour for this scenario.
    pub fn use_agent_behaviour(self, behaviour: AgentHookMut<RV, V>) -> Self {
        self.use_named_agent_behaviour("default", behaviour)
    }

    /// Set a named agent behaviour for this scenario. Agents are assigned to named behaviours
    /// with the `--behaviour name:count` command line flag.
    pub fn use_named_agent_behaviour(mut self, name: &str, behaviour: AgentHookMut<RV, V>) -> Self {
        let previous = self.agent_behaviour.insert(name.to_string(), behaviour);

        if previous.is_some() {
            panic!("Behaviour [{}] is already defined", name);
        }

        self
    }

    /// Set the agent teardown hook for this scenario.
    pub fn use_agent_teardown(mut self, teardown_agent_fn: AgentHookMut<RV, V>) -> Self {
        self.teardown_agent_fn = Some(teardown_agent_fn);
        self
    }

    /// Set the global teardown hook for this scenario.
    pub fn use_teardown(mut self, teardown_fn: GlobalHook<RV>) -> Self {
        self.teardown_fn = Some(teardown_fn);
        self
    }

    pub(crate) fn build(self) -> anyhow::Result<ScenarioDefinition<RV, V>> {
        let target = self
            .cli
            .target
            .as_deref()
            .context("A target URL is required, provide one with --target")?;
        let target_url = Url::parse(target)
            .with_context(|| format!("Invalid target URL: {}", target))?;

        let duration_s = if self.cli.soak {
            None
        } else {
            self.cli.duration.or(self.default_duration_s)
        };

        let agents = self.cli.agents.unwrap_or(self.default_agent_count);
        let assigned_behaviours =
            resolve_assigned_behaviours(agents, &self.cli.behaviour, &self.agent_behaviour)?;

        let seed = self.cli.seed.unwrap_or_else(rand::random);

        Ok(ScenarioDefinition {
            name: self.name,
            target_url,
            duration_s,
            seed,
            no_progress: self.cli.no_progress,
            stats_dir: self.cli.stats_dir,
            run_index: self.cli.run_index,
            pacing_ms: self.pacing_ms,
            assigned_behaviours,
            setup_fn: self.setup_fn,
            setup_agent_fn: self.setup_agent_fn,
            agent_behaviour: self.agent_behaviour,
            teardown_agent_fn: self.teardown_agent_fn,
            teardown_fn: self.teardown_fn,
        })
    }
}

/// Expand the `--behaviour name:count` assignments into one behaviour name per agent, filling
/// the remainder with the `default` behaviour.
fn resolve_assigned_behaviours<RV: UserValuesConstraint, V: UserValuesConstraint>(
    agents: usize,
    assignments: &[(String, usize)],
    registered: &HashMap<String, AgentHookMut<RV, V>>,
) -> anyhow::Result<Vec<String>> {
    let mut assigned = Vec::with_capacity(agents);
    for (name, count) in assignments {
        if !registered.contains_key(name) {
            anyhow::bail!("Behaviour [{}] is not defined by this scenario", name);
        }
        assigned.extend(std::iter::repeat(name.clone()).take(*count));
    }

    if assigned.len() > agents {
        anyhow::bail!(
            "{} agents assigned to behaviours but only {} agents requested",
            assigned.len(),
            agents
        );
    }

    // A scenario without behaviours is valid, its agents only run the setup and teardown
    // hooks. Unassigned agents are only an error when behaviours exist but no default does.
    if assigned.len() < agents && !registered.is_empty() && !registered.contains_key("default") {
        anyhow::bail!(
            "{} agents have no behaviour assigned and no default behaviour is defined",
            agents - assigned.len()
        );
    }

    assigned.resize(agents, "default".to_string());

    Ok(assigned)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_: &mut AgentContext<(), ()>) -> HookResult {
        Ok(())
    }

    fn registered(names: &[&str]) -> HashMap<String, AgentHookMut<(), ()>> {
        names
            .iter()
            .map(|n| (n.to_string(), noop as AgentHookMut<(), ()>))
            .collect()
    }

    #[test]
    fn unassigned_agents_run_the_default_behaviour() {
        let assigned = resolve_assigned_behaviours(
            3,
            &[("browse".to_string(), 1)],
            &registered(&["default", "browse"]),
        )
        .unwrap();

        assert_eq!(assigned, vec!["browse", "default", "default"]);
    }

    #[test]
    fn hook_only_scenario_without_behaviours_is_accepted() {
        let assigned = resolve_assigned_behaviours(2, &[], &registered(&[])).unwrap();

        assert_eq!(assigned, vec!["default", "default"]);
    }

    #[test]
    fn unassigned_agents_without_a_default_are_rejected() {
        let result = resolve_assigned_behaviours(
            2,
            &[("browse".to_string(), 1)],
            &registered(&["browse"]),
        );

        assert!(result.is_err());
    }

    #[test]
    fn over_assignment_is_rejected() {
        let result = resolve_assigned_behaviours(
            1,
            &[("browse".to_string(), 2)],
            &registered(&["default", "browse"]),
        );

        assert!(result.is_err());
    }

    #[test]
    fn unknown_behaviour_is_rejected() {
        let result = resolve_assigned_behaviours(
            1,
            &[("missing".to_string(), 1)],
            &registered(&["default"]),
        );

        assert!(result.is_err());
    }
}
