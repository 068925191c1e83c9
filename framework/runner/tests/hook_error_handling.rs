use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use gust_runner::prelude::{
    AgentContext, HookResult, RunnerContext, ScenarioCli, ScenarioDefinitionBuilder,
    UserValuesConstraint, run,
};

#[derive(Default, Debug)]
struct RunnerContextValue {}

impl UserValuesConstraint for RunnerContextValue {}

#[derive(Default, Debug)]
struct AgentContextValue {
    value: i32,
}

impl UserValuesConstraint for AgentContextValue {}

fn sample_cli_cfg() -> ScenarioCli {
    ScenarioCli {
        target: Some("http://localhost:8080".to_string()),
        agents: None,
        behaviour: vec![],
        duration: None,
        soak: false,
        seed: Some(1),
        stats_dir: None,
        run_index: 1,
        no_progress: true,
    }
}

#[test]
fn propagate_error_in_setup_hook() {
    fn setup(_ctx: &mut RunnerContext<RunnerContextValue>) -> HookResult {
        Err(anyhow::anyhow!("Error in setup hook"))
    }

    let scenario = ScenarioDefinitionBuilder::<RunnerContextValue, AgentContextValue>::new(
        "propagate_error_in_setup_hook",
        sample_cli_cfg(),
    )
    .with_default_duration_s(5)
    .use_setup(setup);

    let result = run(scenario);

    assert!(result.is_err());
    assert_eq!(result.unwrap_err().to_string(), "Error in setup hook");
}

#[test]
fn capture_error_in_agent_setup() {
    fn agent_setup(_ctx: &mut AgentContext<RunnerContextValue, AgentContextValue>) -> HookResult {
        Err(anyhow::anyhow!("Error in agent setup hook"))
    }

    let scenario = ScenarioDefinitionBuilder::<RunnerContextValue, AgentContextValue>::new(
        "capture_error_in_agent_setup",
        sample_cli_cfg(),
    )
    .with_default_duration_s(5)
    .use_agent_setup(agent_setup);

    let result = run(scenario);

    assert!(result.is_ok());
}

#[test]
fn hook_only_scenario_completes_without_a_behaviour() {
    static TEARDOWN_RAN: AtomicBool = AtomicBool::new(false);

    fn setup(_ctx: &mut RunnerContext<RunnerContextValue>) -> HookResult {
        Ok(())
    }

    fn teardown(_ctx: Arc<RunnerContext<RunnerContextValue>>) -> HookResult {
        TEARDOWN_RAN.store(true, Ordering::SeqCst);
        Ok(())
    }

    let scenario = ScenarioDefinitionBuilder::<RunnerContextValue, AgentContextValue>::new(
        "hook_only_scenario_completes_without_a_behaviour",
        sample_cli_cfg(),
    )
    .with_default_duration_s(5)
    .use_setup(setup)
    .use_teardown(teardown);

    let result = run(scenario);

    assert!(result.is_ok());
    assert!(TEARDOWN_RAN.load(Ordering::SeqCst));
}

#[test]
fn behaviour_runs_until_scenario_is_stopped() {
    fn agent_behaviour(
        ctx: &mut AgentContext<RunnerContextValue, AgentContextValue>,
    ) -> HookResult {
        if ctx.get().value < 5 {
            ctx.get_mut().value += 1;
        } else {
            // Save time running this test by shutting down once this has run a few times.
            ctx.runner_context().force_stop_scenario();
        }

        Ok(())
    }

    let scenario = ScenarioDefinitionBuilder::<RunnerContextValue, AgentContextValue>::new(
        "behaviour_runs_until_scenario_is_stopped",
        sample_cli_cfg(),
    )
    .with_default_duration_s(30)
    .use_agent_behaviour(agent_behaviour);

    let result = run(scenario);

    assert!(result.is_ok());
}

#[test]
fn reject_missing_target() {
    let mut cli = sample_cli_cfg();
    cli.target = None;

    let scenario = ScenarioDefinitionBuilder::<RunnerContextValue, AgentContextValue>::new(
        "reject_missing_target",
        cli,
    );

    let result = run(scenario);

    assert!(result.is_err());
}

#[test]
fn reject_invalid_target_url() {
    let mut cli = sample_cli_cfg();
    cli.target = Some("not a url".to_string());

    let scenario = ScenarioDefinitionBuilder::<RunnerContextValue, AgentContextValue>::new(
        "reject_invalid_target_url",
        cli,
    );

    let result = run(scenario);

    assert!(result.is_err());
}
