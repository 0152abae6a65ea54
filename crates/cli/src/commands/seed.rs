use crate::commands::{http_client, load_config, migrated_pool, runtime, CommandResult};
use dinebot_core::config::{ConfigOverrides, LoadOptions};
use dinebot_db::repositories::Stores;
use dinebot_jobs::{wiring, SeedReport};

pub fn run(cuisines: Vec<String>) -> CommandResult {
    run_with(LoadOptions { overrides: overrides(cuisines), ..LoadOptions::default() })
}

/// An empty cuisine list keeps the configured seed list.
pub fn overrides(cuisines: Vec<String>) -> ConfigOverrides {
    let cuisines: Vec<String> = cuisines
        .into_iter()
        .map(|cuisine| cuisine.trim().to_lowercase())
        .filter(|cuisine| !cuisine.is_empty())
        .collect();
    ConfigOverrides {
        cuisines: (!cuisines.is_empty()).then_some(cuisines),
        ..ConfigOverrides::default()
    }
}

pub fn run_with(options: LoadOptions) -> CommandResult {
    let config = match load_config("seed", options) {
        Ok(config) => config,
        Err(result) => return result,
    };
    let runtime = match runtime("seed") {
        Ok(runtime) => runtime,
        Err(result) => return result,
    };

    let result = runtime.block_on(async {
        let client = http_client()?;
        let pool = migrated_pool(&config).await?;
        let stores = Stores::sql(pool.clone(), &config.queue);

        let outcome = match wiring::seeder(&config, &stores, client) {
            Ok(seeder) => seeder
                .seed(&config.directory.cuisines)
                .await
                .map_err(|error| ("directory_request", error.to_string(), 6u8)),
            Err(error) => Err(("config_validation", error.to_string(), 2u8)),
        };

        pool.close().await;
        outcome
    });

    match result {
        Ok(report) => summarize(report),
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("seed", error_class, message, exit_code)
        }
    }
}

/// Listings the store rejected are counted in the report, not treated as a failed run.
fn summarize(report: SeedReport) -> CommandResult {
    let message = format!(
        "stored {} restaurants across {} cuisines ({} failed)",
        report.stored(),
        report.cuisines.len(),
        report.failed()
    );
    CommandResult::success_with("seed", message, report)
}
