use gust_runner::prelude::*;
use reqwest::Client;

mod tasks;

#[derive(Debug)]
struct ClinicRunnerContext {
    client: Client,
}

impl Default for ClinicRunnerContext {
    fn default() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

impl UserValuesConstraint for ClinicRunnerContext {}

fn setup(ctx: &mut RunnerContext<ClinicRunnerContext>) -> HookResult {
    log::info!("Generating clinic traffic against {}", ctx.target_url());
    Ok(())
}

fn agent_behaviour(ctx: &mut AgentContext<ClinicRunnerContext, ()>) -> HookResult {
    let task = tasks::catalog().select(ctx.rng());
    let intent = task.build_intent(ctx.rng());

    let url = ctx.runner_context().target_url().join(&intent.path)?;
    let client = ctx.runner_context().get().client.clone();
    let reporter = ctx.runner_context().reporter().clone();

    let record = OperationRecord::new(task.name, intent.method.as_str());
    ctx.runner_context().executor().execute_in_place(async move {
        let mut request = client.request(intent.method, url);
        if let Some(body) = &intent.body {
            request = request.json(body);
        }

        let outcome = request.send().await;
        let is_error = match &outcome {
            Ok(response) => !response.status().is_success(),
            Err(e) => {
                log::debug!("Transport error for {}: {:?}", task.name, e);
                true
            }
        };
        reporter.add_operation(record.complete(is_error));

        // Failures are counted by the reporter, there is no retry at this layer.
        Ok(())
    })?;

    Ok(())
}

fn main() -> GustResult<()> {
    let cli = init();

    let builder = ScenarioDefinitionBuilder::<ClinicRunnerContext, ()>::new(
        env!("CARGO_PKG_NAME"),
        cli,
    )
    .with_default_duration_s(60)
    .with_default_agent_count(10)
    .with_pacing_ms(1000..=3000)
    .use_setup(setup)
    .use_agent_behaviour(agent_behaviour);

    run(builder)?;

    Ok(())
}
