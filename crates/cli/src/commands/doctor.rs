use dinebot_core::config::{AppConfig, LoadOptions};
use dinebot_db::connect_with_config;
use dinebot_db::repositories::{RestaurantStore, SqlRestaurantStore};
use serde::Serialize;

use crate::commands::CommandResult;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
pub struct DoctorCheck {
    pub name: &'static str,
    pub status: CheckStatus,
    pub details: String,
}

#[derive(Debug, Serialize)]
pub struct DoctorReport {
    pub overall_status: CheckStatus,
    pub summary: String,
    pub checks: Vec<DoctorCheck>,
}

pub fn run(json_output: bool) -> CommandResult {
    run_with(LoadOptions::default(), json_output)
}

pub fn run_with(options: LoadOptions, json_output: bool) -> CommandResult {
    let report = build_report(options);
    let exit_code = if report.overall_status == CheckStatus::Fail { 1 } else { 0 };

    let output = if json_output {
        serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\
                 \"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        })
    } else {
        render_human(&report)
    };

    CommandResult { exit_code, output }
}

pub fn build_report(options: LoadOptions) -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(options) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            checks.push(check_database(&config));
            checks.extend(check_integrations(&config));
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            checks.push(DoctorCheck {
                name: "database_connectivity",
                status: CheckStatus::Skipped,
                details: "skipped because configuration did not load".to_string(),
            });
        }
    }

    let failed = checks.iter().any(|check| check.status == CheckStatus::Fail);
    let warned = checks.iter().any(|check| check.status == CheckStatus::Warn);
    let (overall_status, summary) = match (failed, warned) {
        (true, _) => (CheckStatus::Fail, "doctor: one or more readiness checks failed"),
        (false, true) => (CheckStatus::Warn, "doctor: ready with warnings"),
        (false, false) => (CheckStatus::Pass, "doctor: all readiness checks passed"),
    };

    DoctorReport { overall_status, summary: summary.to_string(), checks }
}

/// Connects, then counts stored restaurants; an unmigrated database only warns.
fn check_database(config: &AppConfig) -> DoctorCheck {
    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return DoctorCheck {
                name: "database_connectivity",
                status: CheckStatus::Fail,
                details: format!("failed to initialize async runtime: {error}"),
            };
        }
    };

    let result = runtime.block_on(async {
        let pool = connect_with_config(&config.database)
            .await
            .map_err(|error| format!("failed to connect to database: {error}"))?;
        let count = SqlRestaurantStore::new(pool.clone()).count().await;
        pool.close().await;
        Ok::<_, String>(count)
    });

    match result {
        Ok(Ok(0)) => DoctorCheck {
            name: "database_connectivity",
            status: CheckStatus::Warn,
            details: format!(
                "connected using `{}` but no restaurants are stored; run `dinebot seed`",
                config.database.url
            ),
        },
        Ok(Ok(count)) => DoctorCheck {
            name: "database_connectivity",
            status: CheckStatus::Pass,
            details: format!("connected using `{}`; {count} restaurants", config.database.url),
        },
        Ok(Err(error)) => DoctorCheck {
            name: "database_connectivity",
            status: CheckStatus::Warn,
            details: format!("connected but schema is not ready ({error}); run `dinebot migrate`"),
        },
        Err(error) => {
            DoctorCheck { name: "database_connectivity", status: CheckStatus::Fail, details: error }
        }
    }
}

fn check_integrations(config: &AppConfig) -> Vec<DoctorCheck> {
    let dialog = match config.dialog.runtime_url.as_deref() {
        Some(url) => DoctorCheck {
            name: "dialog_engine",
            status: CheckStatus::Pass,
            details: format!(
                "bot `{}` alias `{}` at {url}",
                config.dialog.bot_name, config.dialog.bot_alias
            ),
        },
        None => DoctorCheck {
            name: "dialog_engine",
            status: CheckStatus::Warn,
            details: "dialog.runtime_url unset; chat replies with the unavailable message"
                .to_string(),
        },
    };

    let search = DoctorCheck {
        name: "search_index",
        status: CheckStatus::Pass,
        details: match config.search.url.as_deref() {
            Some(url) => format!("index `{}` at {url}", config.search.index),
            None => "search.url unset; cuisine lookups use the restaurant store".to_string(),
        },
    };

    let mail = match config.mail.require_api_url() {
        Ok(url) => DoctorCheck {
            name: "mail_transport",
            status: CheckStatus::Pass,
            details: format!("sending as {} via {url}", config.mail.sender),
        },
        Err(_) => DoctorCheck {
            name: "mail_transport",
            status: CheckStatus::Warn,
            details: "mail.api_url unset; suggestions are logged instead of sent".to_string(),
        },
    };

    let directory = match config.directory.require_api_key() {
        Ok(_) => DoctorCheck {
            name: "directory_credentials",
            status: CheckStatus::Pass,
            details: format!("seeding from {}", config.directory.base_url),
        },
        Err(error) => DoctorCheck {
            name: "directory_credentials",
            status: CheckStatus::Skipped,
            details: format!("{error}; only `dinebot seed` needs it"),
        },
    };

    vec![dialog, search, mail, directory]
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Warn => "warn",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
