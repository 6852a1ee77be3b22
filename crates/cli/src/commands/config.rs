use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use menucheck_core::config::{AppConfig, LoadOptions};
use secrecy::ExposeSecret;
use toml::Value;

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let source = |key_path: &str, env_keys: &[&str]| {
        field_source(key_path, env_keys, config_file_doc.as_ref(), config_file_path.as_deref())
    };

    let mut lines = vec![
        "effective config (source precedence: override > env > file > default):".to_string()
    ];

    lines.push(render_line(
        "venue.base_url",
        &config.venue.base_url,
        source("venue.base_url", &["MENUCHECK_VENUE_BASE_URL", "FOURSQUARE_VENUE_BASE_URL"]),
    ));
    lines.push(render_line(
        "venue.client_id",
        &redact_credential(config.venue.client_id.expose_secret()),
        source("venue.client_id", &["MENUCHECK_VENUE_CLIENT_ID", "FOURSQUARE_CLIENT_ID"]),
    ));
    lines.push(render_line(
        "venue.client_secret",
        &redact_credential(config.venue.client_secret.expose_secret()),
        source(
            "venue.client_secret",
            &["MENUCHECK_VENUE_CLIENT_SECRET", "FOURSQUARE_CLIENT_SECRET"],
        ),
    ));
    lines.push(render_line(
        "venue.version",
        config.venue.version.as_deref().unwrap_or("<today>"),
        source("venue.version", &["MENUCHECK_VENUE_VERSION"]),
    ));
    lines.push(render_line(
        "venue.timeout_secs",
        &config.venue.timeout_secs.to_string(),
        source("venue.timeout_secs", &["MENUCHECK_VENUE_TIMEOUT_SECS"]),
    ));

    lines.push(render_line(
        "filter.danger_words_path",
        &config.filter.danger_words_path.display().to_string(),
        source("filter.danger_words_path", &["MENUCHECK_FILTER_DANGER_WORDS_PATH"]),
    ));

    lines.push(render_line(
        "sms.max_message_size",
        &config.sms.max_message_size.to_string(),
        source("sms.max_message_size", &["MENUCHECK_SMS_MAX_MESSAGE_SIZE"]),
    ));
    lines.push(render_line(
        "sms.default_city",
        &config.sms.default_city,
        source("sms.default_city", &["MENUCHECK_SMS_DEFAULT_CITY"]),
    ));
    lines.push(render_line(
        "sms.default_state",
        &config.sms.default_state,
        source("sms.default_state", &["MENUCHECK_SMS_DEFAULT_STATE"]),
    ));

    lines.push(render_line(
        "server.bind_address",
        &config.server.bind_address,
        source("server.bind_address", &["MENUCHECK_SERVER_BIND_ADDRESS"]),
    ));
    lines.push(render_line(
        "server.port",
        &config.server.port.to_string(),
        source("server.port", &["MENUCHECK_SERVER_PORT", "PORT"]),
    ));
    lines.push(render_line(
        "server.graceful_shutdown_secs",
        &config.server.graceful_shutdown_secs.to_string(),
        source("server.graceful_shutdown_secs", &["MENUCHECK_SERVER_GRACEFUL_SHUTDOWN_SECS"]),
    ));

    lines.push(render_line(
        "logging.level",
        &config.logging.level,
        source("logging.level", &["MENUCHECK_LOGGING_LEVEL", "MENUCHECK_LOG_LEVEL"]),
    ));
    lines.push(render_line(
        "logging.format",
        &format!("{:?}", config.logging.format),
        source("logging.format", &["MENUCHECK_LOGGING_FORMAT", "MENUCHECK_LOG_FORMAT"]),
    ));

    lines.join("\n")
}

fn detect_config_path() -> Option<PathBuf> {
    [PathBuf::from("menucheck.toml"), PathBuf::from("config/menucheck.toml")]
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
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    let from_env = env_keys
        .iter()
        .find(|env_key| env::var(env_key).is_ok_and(|value| !value.trim().is_empty()));
    if let Some(env_key) = from_env {
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

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}

/// Keeps the first four characters so operators can tell credentials apart.
fn redact_credential(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return "<empty>".to_string();
    }

    let prefix = trimmed.chars().take(4).collect::<String>();
    if prefix.len() == trimmed.len() {
        return "<redacted>".to_string();
    }
    format!("{prefix}***")
}
