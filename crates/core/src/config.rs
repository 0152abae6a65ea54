use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub dialog: DialogConfig,
    pub queue: QueueConfig,
    pub search: SearchConfig,
    pub mail: MailConfig,
    pub directory: DirectoryConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct DialogConfig {
    pub bot_name: String,
    pub bot_alias: String,
    pub runtime_url: Option<String>,
    pub api_key: Option<SecretString>,
    pub default_user_id: String,
    /// IANA zone that decides what "today" is for date validation.
    pub timezone: Tz,
}

#[derive(Clone, Debug)]
pub struct QueueConfig {
    pub name: String,
    pub visibility_timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct SearchConfig {
    pub url: Option<String>,
    pub index: String,
    pub username: Option<String>,
    pub password: Option<SecretString>,
    pub max_hits: u32,
}

#[derive(Clone, Debug)]
pub struct MailConfig {
    pub api_url: Option<String>,
    pub api_key: Option<SecretString>,
    pub sender: String,
}

#[derive(Clone, Debug)]
pub struct DirectoryConfig {
    pub base_url: String,
    pub api_key: Option<SecretString>,
    pub location: String,
    pub page_size: u32,
    pub pages_per_cuisine: u32,
    pub cuisines: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    pub worker_poll_secs: u64,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub database_url: Option<String>,
    pub log_level: Option<String>,
    pub dialog_runtime_url: Option<String>,
    pub search_url: Option<String>,
    pub mail_api_url: Option<String>,
    pub mail_sender: Option<String>,
    pub directory_api_key: Option<String>,
    pub cuisines: Option<Vec<String>>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

pub const MAX_PAGES_PER_CUISINE: u32 = 1_000;

pub const DEFAULT_SEED_CUISINES: &[&str] =
    &["indian", "italian", "mexican", "chinese", "japanese", "french"];

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: "sqlite://dinebot.db".to_string(),
                max_connections: 5,
                timeout_secs: 30,
            },
            dialog: DialogConfig {
                bot_name: "SuggestRestaurant".to_string(),
                bot_alias: "$LATEST".to_string(),
                runtime_url: None,
                api_key: None,
                default_user_id: "anonymous".to_string(),
                timezone: chrono_tz::America::New_York,
            },
            queue: QueueConfig { name: "Q1".to_string(), visibility_timeout_secs: 30 },
            search: SearchConfig {
                url: None,
                index: "restaurants".to_string(),
                username: None,
                password: None,
                max_hits: 10,
            },
            mail: MailConfig {
                api_url: None,
                api_key: None,
                sender: "suggestions@dinebot.local".to_string(),
            },
            directory: DirectoryConfig {
                base_url: "https://api.yelp.com/v3".to_string(),
                api_key: None,
                location: "New York".to_string(),
                page_size: 50,
                pages_per_cuisine: 20,
                cuisines: DEFAULT_SEED_CUISINES.iter().map(|value| value.to_string()).collect(),
            },
            server: ServerConfig {
                bind_address: "127.0.0.1".to_string(),
                port: 8080,
                worker_poll_secs: 0,
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

fn secret_value(value: String) -> SecretString {
    value.into()
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("dinebot.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(database) = patch.database {
            if let Some(url) = database.url {
                self.database.url = url;
            }
            if let Some(max_connections) = database.max_connections {
                self.database.max_connections = max_connections;
            }
            if let Some(timeout_secs) = database.timeout_secs {
                self.database.timeout_secs = timeout_secs;
            }
        }

        if let Some(dialog) = patch.dialog {
            if let Some(bot_name) = dialog.bot_name {
                self.dialog.bot_name = bot_name;
            }
            if let Some(bot_alias) = dialog.bot_alias {
                self.dialog.bot_alias = bot_alias;
            }
            if let Some(runtime_url) = dialog.runtime_url {
                self.dialog.runtime_url = Some(runtime_url);
            }
            if let Some(dialog_api_key_value) = dialog.api_key {
                self.dialog.api_key = Some(secret_value(dialog_api_key_value));
            }
            if let Some(default_user_id) = dialog.default_user_id {
                self.dialog.default_user_id = default_user_id;
            }
            if let Some(timezone) = dialog.timezone {
                self.dialog.timezone = timezone;
            }
        }

        if let Some(queue) = patch.queue {
            if let Some(name) = queue.name {
                self.queue.name = name;
            }
            if let Some(visibility_timeout_secs) = queue.visibility_timeout_secs {
                self.queue.visibility_timeout_secs = visibility_timeout_secs;
            }
        }

        if let Some(search) = patch.search {
            if let Some(url) = search.url {
                self.search.url = Some(url);
            }
            if let Some(index) = search.index {
                self.search.index = index;
            }
            if let Some(username) = search.username {
                self.search.username = Some(username);
            }
            if let Some(search_password_value) = search.password {
                self.search.password = Some(secret_value(search_password_value));
            }
            if let Some(max_hits) = search.max_hits {
                self.search.max_hits = max_hits;
            }
        }

        if let Some(mail) = patch.mail {
            if let Some(api_url) = mail.api_url {
                self.mail.api_url = Some(api_url);
            }
            if let Some(mail_api_key_value) = mail.api_key {
                self.mail.api_key = Some(secret_value(mail_api_key_value));
            }
            if let Some(sender) = mail.sender {
                self.mail.sender = sender;
            }
        }

        if let Some(directory) = patch.directory {
            if let Some(base_url) = directory.base_url {
                self.directory.base_url = base_url;
            }
            if let Some(directory_api_key_value) = directory.api_key {
                self.directory.api_key = Some(secret_value(directory_api_key_value));
            }
            if let Some(location) = directory.location {
                self.directory.location = location;
            }
            if let Some(page_size) = directory.page_size {
                self.directory.page_size = page_size;
            }
            if let Some(pages_per_cuisine) = directory.pages_per_cuisine {
                self.directory.pages_per_cuisine = pages_per_cuisine;
            }
            if let Some(cuisines) = directory.cuisines {
                self.directory.cuisines = cuisines;
            }
        }

        if let Some(server) = patch.server {
            if let Some(bind_address) = server.bind_address {
                self.server.bind_address = bind_address;
            }
            if let Some(port) = server.port {
                self.server.port = port;
            }
            if let Some(worker_poll_secs) = server.worker_poll_secs {
                self.server.worker_poll_secs = worker_poll_secs;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("DINEBOT_DATABASE_URL") {
            self.database.url = value;
        }
        if let Some(value) = read_env("DINEBOT_DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = parse_u32("DINEBOT_DATABASE_MAX_CONNECTIONS", &value)?;
        }
        if let Some(value) = read_env("DINEBOT_DATABASE_TIMEOUT_SECS") {
            self.database.timeout_secs = parse_u64("DINEBOT_DATABASE_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = read_env("DINEBOT_DIALOG_BOT_NAME") {
            self.dialog.bot_name = value;
        }
        if let Some(value) = read_env("DINEBOT_DIALOG_BOT_ALIAS") {
            self.dialog.bot_alias = value;
        }
        if let Some(value) = read_env("DINEBOT_DIALOG_RUNTIME_URL") {
            self.dialog.runtime_url = Some(value);
        }
        if let Some(value) = read_env("DINEBOT_DIALOG_API_KEY") {
            self.dialog.api_key = Some(secret_value(value));
        }
        if let Some(value) = read_env("DINEBOT_DIALOG_DEFAULT_USER_ID") {
            self.dialog.default_user_id = value;
        }
        if let Some(value) = read_env("DINEBOT_DIALOG_TIMEZONE") {
            self.dialog.timezone = parse_timezone("DINEBOT_DIALOG_TIMEZONE", &value)?;
        }

        if let Some(value) = read_env("DINEBOT_QUEUE_NAME") {
            self.queue.name = value;
        }
        if let Some(value) = read_env("DINEBOT_QUEUE_VISIBILITY_TIMEOUT_SECS") {
            self.queue.visibility_timeout_secs =
                parse_u64("DINEBOT_QUEUE_VISIBILITY_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = read_env("DINEBOT_SEARCH_URL") {
            self.search.url = Some(value);
        }
        if let Some(value) = read_env("DINEBOT_SEARCH_INDEX") {
            self.search.index = value;
        }
        if let Some(value) = read_env("DINEBOT_SEARCH_USERNAME") {
            self.search.username = Some(value);
        }
        if let Some(value) = read_env("DINEBOT_SEARCH_PASSWORD") {
            self.search.password = Some(secret_value(value));
        }
        if let Some(value) = read_env("DINEBOT_SEARCH_MAX_HITS") {
            self.search.max_hits = parse_u32("DINEBOT_SEARCH_MAX_HITS", &value)?;
        }

        if let Some(value) = read_env("DINEBOT_MAIL_API_URL") {
            self.mail.api_url = Some(value);
        }
        if let Some(value) = read_env("DINEBOT_MAIL_API_KEY") {
            self.mail.api_key = Some(secret_value(value));
        }
        if let Some(value) = read_env("DINEBOT_MAIL_SENDER") {
            self.mail.sender = value;
        }

        if let Some(value) = read_env("DINEBOT_DIRECTORY_BASE_URL") {
            self.directory.base_url = value;
        }
        if let Some(value) = read_env("DINEBOT_DIRECTORY_API_KEY") {
            self.directory.api_key = Some(secret_value(value));
        }
        if let Some(value) = read_env("DINEBOT_DIRECTORY_LOCATION") {
            self.directory.location = value;
        }
        if let Some(value) = read_env("DINEBOT_DIRECTORY_CUISINES") {
            self.directory.cuisines = split_list(&value);
        }

        if let Some(value) = read_env("DINEBOT_SERVER_BIND_ADDRESS") {
            self.server.bind_address = value;
        }
        if let Some(value) = read_env("DINEBOT_SERVER_PORT") {
            self.server.port = parse_u16("DINEBOT_SERVER_PORT", &value)?;
        }
        if let Some(value) = read_env("DINEBOT_SERVER_WORKER_POLL_SECS") {
            self.server.worker_poll_secs = parse_u64("DINEBOT_SERVER_WORKER_POLL_SECS", &value)?;
        }

        let log_level = read_env("DINEBOT_LOGGING_LEVEL").or_else(|| read_env("DINEBOT_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("DINEBOT_LOGGING_FORMAT").or_else(|| read_env("DINEBOT_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(database_url) = overrides.database_url {
            self.database.url = database_url;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(runtime_url) = overrides.dialog_runtime_url {
            self.dialog.runtime_url = Some(runtime_url);
        }
        if let Some(search_url) = overrides.search_url {
            self.search.url = Some(search_url);
        }
        if let Some(mail_api_url) = overrides.mail_api_url {
            self.mail.api_url = Some(mail_api_url);
        }
        if let Some(mail_sender) = overrides.mail_sender {
            self.mail.sender = mail_sender;
        }
        if let Some(directory_api_key) = overrides.directory_api_key {
            self.directory.api_key = Some(secret_value(directory_api_key));
        }
        if let Some(cuisines) = overrides.cuisines {
            self.directory.cuisines = cuisines;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_database(&self.database)?;
        validate_dialog(&self.dialog)?;
        validate_queue(&self.queue)?;
        validate_search(&self.search)?;
        validate_mail(&self.mail)?;
        validate_directory(&self.directory)?;
        validate_server(&self.server)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

impl DirectoryConfig {
    /// The seeder cannot run without credentials, but nothing else needs them.
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.api_key
            .as_ref()
            .map(|value| value.expose_secret())
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| {
                ConfigError::Validation(
                    "directory.api_key is required to seed restaurants (DINEBOT_DIRECTORY_API_KEY)"
                        .to_string(),
                )
            })
    }
}

impl MailConfig {
    pub fn require_api_url(&self) -> Result<&str, ConfigError> {
        self.api_url.as_deref().filter(|value| !value.trim().is_empty()).ok_or_else(|| {
            ConfigError::Validation(
                "mail.api_url is required to deliver suggestions (DINEBOT_MAIL_API_URL)"
                    .to_string(),
            )
        })
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("dinebot.toml"), PathBuf::from("config/dinebot.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_database(database: &DatabaseConfig) -> Result<(), ConfigError> {
    let url = database.url.trim();
    let sqlite_url =
        url.starts_with("sqlite://") || url.starts_with("sqlite::") || url == ":memory:";
    if !sqlite_url {
        return Err(ConfigError::Validation(
            "database.url must be a sqlite URL (`sqlite://...`, `sqlite::...`, or `:memory:`)"
                .to_string(),
        ));
    }

    if database.max_connections == 0 {
        return Err(ConfigError::Validation(
            "database.max_connections must be greater than zero".to_string(),
        ));
    }

    if database.timeout_secs == 0 || database.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "database.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    Ok(())
}

fn validate_dialog(dialog: &DialogConfig) -> Result<(), ConfigError> {
    if dialog.bot_name.trim().is_empty() {
        return Err(ConfigError::Validation("dialog.bot_name must not be empty".to_string()));
    }
    if dialog.default_user_id.trim().is_empty() {
        return Err(ConfigError::Validation(
            "dialog.default_user_id must not be empty".to_string(),
        ));
    }
    if let Some(runtime_url) = &dialog.runtime_url {
        validate_http_url("dialog.runtime_url", runtime_url)?;
    }
    Ok(())
}

fn validate_queue(queue: &QueueConfig) -> Result<(), ConfigError> {
    if queue.name.trim().is_empty() {
        return Err(ConfigError::Validation("queue.name must not be empty".to_string()));
    }
    if queue.visibility_timeout_secs > 43_200 {
        return Err(ConfigError::Validation(
            "queue.visibility_timeout_secs must be in range 0..=43200".to_string(),
        ));
    }
    Ok(())
}

fn validate_search(search: &SearchConfig) -> Result<(), ConfigError> {
    if search.max_hits == 0 || search.max_hits > 100 {
        return Err(ConfigError::Validation("search.max_hits must be in range 1..=100".to_string()));
    }
    if let Some(url) = &search.url {
        validate_http_url("search.url", url)?;
        if search.index.trim().is_empty() {
            return Err(ConfigError::Validation(
                "search.index is required when search.url is set".to_string(),
            ));
        }
        if search.password.is_some() && search.username.is_none() {
            return Err(ConfigError::Validation(
                "search.password is set but search.username is missing".to_string(),
            ));
        }
    }
    Ok(())
}

fn validate_mail(mail: &MailConfig) -> Result<(), ConfigError> {
    if !mail.sender.contains('@') {
        return Err(ConfigError::Validation(
            "mail.sender must be an email address".to_string(),
        ));
    }
    if let Some(api_url) = &mail.api_url {
        validate_http_url("mail.api_url", api_url)?;
    }
    Ok(())
}

fn validate_directory(directory: &DirectoryConfig) -> Result<(), ConfigError> {
    validate_http_url("directory.base_url", &directory.base_url)?;
    if directory.page_size == 0 || directory.page_size > 50 {
        return Err(ConfigError::Validation(
            "directory.page_size must be in range 1..=50".to_string(),
        ));
    }
    if directory.pages_per_cuisine == 0 || directory.pages_per_cuisine > MAX_PAGES_PER_CUISINE {
        return Err(ConfigError::Validation(format!(
            "directory.pages_per_cuisine must be in range 1..={MAX_PAGES_PER_CUISINE}"
        )));
    }
    if directory.cuisines.iter().all(|cuisine| cuisine.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "directory.cuisines must name at least one cuisine".to_string(),
        ));
    }
    Ok(())
}

fn validate_server(server: &ServerConfig) -> Result<(), ConfigError> {
    if server.port == 0 {
        return Err(ConfigError::Validation("server.port must be greater than zero".to_string()));
    }
    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn validate_http_url(key: &str, value: &str) -> Result<(), ConfigError> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::Validation(format!("{key} must start with http:// or https://")))
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|item| item.trim().to_ascii_lowercase())
        .filter(|item| !item.is_empty())
        .collect()
}

fn parse_u16(key: &str, value: &str) -> Result<u16, ConfigError> {
    value.parse::<u16>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u32(key: &str, value: &str) -> Result<u32, ConfigError> {
    value.parse::<u32>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_timezone(key: &str, value: &str) -> Result<Tz, ConfigError> {
    value.trim().parse::<Tz>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    database: Option<DatabasePatch>,
    dialog: Option<DialogPatch>,
    queue: Option<QueuePatch>,
    search: Option<SearchPatch>,
    mail: Option<MailPatch>,
    directory: Option<DirectoryPatch>,
    server: Option<ServerPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct DatabasePatch {
    url: Option<String>,
    max_connections: Option<u32>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct DialogPatch {
    bot_name: Option<String>,
    bot_alias: Option<String>,
    runtime_url: Option<String>,
    api_key: Option<String>,
    default_user_id: Option<String>,
    timezone: Option<Tz>,
}

#[derive(Debug, Default, Deserialize)]
struct QueuePatch {
    name: Option<String>,
    visibility_timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct SearchPatch {
    url: Option<String>,
    index: Option<String>,
    username: Option<String>,
    password: Option<String>,
    max_hits: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
struct MailPatch {
    api_url: Option<String>,
    api_key: Option<String>,
    sender: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct DirectoryPatch {
    base_url: Option<String>,
    api_key: Option<String>,
    location: Option<String>,
    page_size: Option<u32>,
    pages_per_cuisine: Option<u32>,
    cuisines: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerPatch {
    bind_address: Option<String>,
    port: Option<u16>,
    worker_poll_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
