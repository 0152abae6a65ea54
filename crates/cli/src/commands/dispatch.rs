use crate::commands::{http_client, load_config, migrated_pool, runtime, CommandResult};
use dinebot_core::config::LoadOptions;
use dinebot_db::repositories::Stores;
use dinebot_jobs::{wiring, DispatchOutcome};
use uuid::Uuid;

pub fn run() -> CommandResult {
    run_with(LoadOptions::default())
}

pub fn run_with(options: LoadOptions) -> CommandResult {
    let config = match load_config("dispatch", options) {
        Ok(config) => config,
        Err(result) => return result,
    };
    let runtime = match runtime("dispatch") {
        Ok(runtime) => runtime,
        Err(result) => return result,
    };

    let correlation_id = format!("cli-{}", Uuid::new_v4());
    let result = runtime.block_on(async {
        let client = http_client()?;
        let pool = migrated_pool(&config).await?;
        let worker = wiring::worker(&config, &Stores::sql(pool.clone(), &config.queue), client);

        let outcome = worker
            .dispatch_once(&correlation_id)
            .await
            .map_err(|error| ("dispatch", error.to_string(), 6u8));
        pool.close().await;
        outcome
    });

    match result {
        Ok(outcome) => {
            let message = match &outcome {
                DispatchOutcome::Idle => "queue is empty".to_string(),
                DispatchOutcome::NoMatches { cuisine, .. } => {
                    format!("no restaurants indexed for `{cuisine}`; message left on the queue")
                }
                DispatchOutcome::Delivered { email, .. } => format!("suggestion sent to {email}"),
            };
            CommandResult::success_with("dispatch", message, outcome)
        }
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("dispatch", error_class, message, exit_code)
        }
    }
}
