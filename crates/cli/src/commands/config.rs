use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use dinebot_core::config::{AppConfig, LoadOptions};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use toml::Value;

use crate::commands::{load_config, CommandResult};

#[derive(Debug, Serialize)]
pub struct ConfigEntry {
    pub key: &'static str,
    pub value: String,
    pub source: String,
}

pub fn run() -> CommandResult {
    run_with(LoadOptions::default())
}

pub fn run_with(options: LoadOptions) -> CommandResult {
    let config_file_path = detect_config_path(options.config_path.as_deref());
    let config = match load_config("config", options) {
        Ok(config) => config,
        Err(result) => return result,
    };

    let entries = effective_entries(&config, config_file_path.as_deref());
    CommandResult::success_with(
        "config",
        "effective config (source precedence: env > file > default)",
        entries,
    )
}

pub fn effective_entries(config: &AppConfig, config_file_path: Option<&Path>) -> Vec<ConfigEntry> {
    let doc = load_config_file_doc(config_file_path);
    let sourced = |key: &'static str, env_key: &str, value: String| ConfigEntry {
        key,
        value,
        source: field_source(key, env_key, doc.as_ref(), config_file_path),
    };

    vec![
        sourced("database.url", "DINEBOT_DATABASE_URL", config.database.url.clone()),
        sourced(
            "database.max_connections",
            "DINEBOT_DATABASE_MAX_CONNECTIONS",
            config.database.max_connections.to_string(),
        ),
        sourced("dialog.bot_name", "DINEBOT_DIALOG_BOT_NAME", config.dialog.bot_name.clone()),
        sourced("dialog.bot_alias", "DINEBOT_DIALOG_BOT_ALIAS", config.dialog.bot_alias.clone()),
        sourced(
            "dialog.runtime_url",
            "DINEBOT_DIALOG_RUNTIME_URL",
            optional(config.dialog.runtime_url.as_deref()),
        ),
        sourced("dialog.api_key", "DINEBOT_DIALOG_API_KEY", redact(config.dialog.api_key.as_ref())),
        sourced(
            "dialog.timezone",
            "DINEBOT_DIALOG_TIMEZONE",
            config.dialog.timezone.name().to_string(),
        ),
        sourced("queue.name", "DINEBOT_QUEUE_NAME", config.queue.name.clone()),
        sourced(
            "queue.visibility_timeout_secs",
            "DINEBOT_QUEUE_VISIBILITY_TIMEOUT_SECS",
            config.queue.visibility_timeout_secs.to_string(),
        ),
        sourced("search.url", "DINEBOT_SEARCH_URL", optional(config.search.url.as_deref())),
        sourced("search.index", "DINEBOT_SEARCH_INDEX", config.search.index.clone()),
        sourced(
            "search.username",
            "DINEBOT_SEARCH_USERNAME",
            optional(config.search.username.as_deref()),
        ),
        sourced(
            "search.password",
            "DINEBOT_SEARCH_PASSWORD",
            redact(config.search.password.as_ref()),
        ),
        sourced("mail.api_url", "DINEBOT_MAIL_API_URL", optional(config.mail.api_url.as_deref())),
        sourced("mail.api_key", "DINEBOT_MAIL_API_KEY", redact(config.mail.api_key.as_ref())),
        sourced("mail.sender", "DINEBOT_MAIL_SENDER", config.mail.sender.clone()),
        sourced(
            "directory.base_url",
            "DINEBOT_DIRECTORY_BASE_URL",
            config.directory.base_url.clone(),
        ),
        sourced(
            "directory.api_key",
            "DINEBOT_DIRECTORY_API_KEY",
            redact(config.directory.api_key.as_ref()),
        ),
        sourced(
            "directory.location",
            "DINEBOT_DIRECTORY_LOCATION",
            config.directory.location.clone(),
        ),
        sourced(
            "directory.cuisines",
            "DINEBOT_DIRECTORY_CUISINES",
            config.directory.cuisines.join(","),
        ),
        sourced(
            "server.bind_address",
            "DINEBOT_SERVER_BIND_ADDRESS",
            config.server.bind_address.clone(),
        ),
        sourced("server.port", "DINEBOT_SERVER_PORT", config.server.port.to_string()),
        sourced(
            "server.worker_poll_secs",
            "DINEBOT_SERVER_WORKER_POLL_SECS",
            config.server.worker_poll_secs.to_string(),
        ),
        sourced("logging.level", "DINEBOT_LOGGING_LEVEL", config.logging.level.clone()),
        sourced(
            "logging.format",
            "DINEBOT_LOGGING_FORMAT",
            format!("{:?}", config.logging.format).to_lowercase(),
        ),
    ]
}

fn detect_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return path.exists().then(|| path.to_path_buf());
    }
    [PathBuf::from("dinebot.toml"), PathBuf::from("config/dinebot.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_key: &str,
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if env::var_os(env_key).is_some() {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn optional(value: Option<&str>) -> String {
    value.unwrap_or("<unset>").to_string()
}

fn redact(secret: Option<&SecretString>) -> String {
    match secret {
        Some(secret) if secret.expose_secret().trim().is_empty() => "<empty>".to_string(),
        Some(_) => "<redacted>".to_string(),
        None => "<unset>".to_string(),
    }
}
