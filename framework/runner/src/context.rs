use std::{fmt::Debug, sync::Arc};

use gust_core::prelude::{DelegatedShutdownListener, ShutdownHandle};
use gust_instruments::Reporter;
use rand::rngs::StdRng;
use url::Url;

use crate::executor::Executor;

pub trait UserValuesConstraint: Default + Debug + Send + Sync + 'static {}

impl UserValuesConstraint for () {}

/// Context shared by all agents in a run. Holds the executor, the reporter and whatever state
/// the scenario's global setup hook put in the user value.
#[derive(Debug)]
pub struct RunnerContext<RV: UserValuesConstraint> {
    executor: Arc<Executor>,
    reporter: Arc<Reporter>,
    shutdown_handle: ShutdownHandle,
    target_url: Url,
    value: RV,
}

impl<RV: UserValuesConstraint> RunnerContext<RV> {
    pub(crate) fn new(
        executor: Arc<Executor>,
        reporter: Arc<Reporter>,
        shutdown_handle: ShutdownHandle,
        target_url: Url,
    ) -> Self {
        Self {
            executor,
            reporter,
            shutdown_handle,
            target_url,
            value: Default::default(),
        }
    }

    pub fn executor(&self) -> &Arc<Executor> {
        &self.executor
    }

    pub fn reporter(&self) -> &Arc<Reporter> {
        &self.reporter
    }

    /// Base URL of the service under test.
    pub fn target_url(&self) -> &Url {
        &self.target_url
    }

    /// Stop the whole scenario, ending every agent after its current behaviour cycle.
    pub fn force_stop_scenario(&self) {
        self.shutdown_handle.shutdown();
    }

    pub fn get_mut(&mut self) -> &mut RV {
        &mut self.value
    }

    pub fn get(&self) -> &RV {
        &self.value
    }
}

/// Per-agent context handed to the agent hooks.
///
/// Each agent owns its random source, seeded from the run seed and the agent index, so a run
/// with a fixed seed makes a reproducible sequence of decisions per agent.
pub struct AgentContext<RV: UserValuesConstraint, V: UserValuesConstraint> {
    agent_id: String,
    agent_index: usize,
    runner_context: Arc<RunnerContext<RV>>,
    shutdown_listener: DelegatedShutdownListener,
    rng: StdRng,
    value: V,
}

impl<RV: UserValuesConstraint, V: UserValuesConstraint> AgentContext<RV, V> {
    pub(crate) fn new(
        agent_id: String,
        agent_index: usize,
        runner_context: Arc<RunnerContext<RV>>,
        shutdown_listener: DelegatedShutdownListener,
        rng: StdRng,
    ) -> Self {
        Self {
            agent_id,
            agent_index,
            runner_context,
            shutdown_listener,
            rng,
            value: Default::default(),
        }
    }

    pub fn agent_id(&self) -> &str {
        &self.agent_id
    }

    pub fn agent_index(&self) -> usize {
        self.agent_index
    }

    pub fn runner_context(&self) -> &Arc<RunnerContext<RV>> {
        &self.runner_context
    }

    pub fn shutdown_listener(&mut self) -> &mut DelegatedShutdownListener {
        &mut self.shutdown_listener
    }

    /// The agent's seedable random source. All task selection and parameter synthesis should
    /// draw from this rather than from ambient global state.
    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    pub fn get_mut(&mut self) -> &mut V {
        &mut self.value
    }

    pub fn get(&self) -> &V {
        &self.value
    }
}
