use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::governor::{DEFAULT_MAX_MESSAGE_SIZE, TRUNCATION_HEADROOM};

pub const DEFAULT_VENUE_BASE_URL: &str = "https://api.foursquare.com/v2/venues/";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub venue: VenueConfig,
    pub filter: FilterConfig,
    pub sms: SmsConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct VenueConfig {
    pub base_url: String,
    pub client_id: SecretString,
    pub client_secret: SecretString,
    pub version: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct FilterConfig {
    pub danger_words_path: PathBuf,
}

#[derive(Clone, Debug)]
pub struct SmsConfig {
    pub max_message_size: usize,
    pub default_city: String,
    pub default_state: String,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    pub graceful_shutdown_secs: u64,
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
    pub venue_base_url: Option<String>,
    pub venue_client_id: Option<String>,
    pub venue_client_secret: Option<String>,
    pub venue_version: Option<String>,
    pub danger_words_path: Option<PathBuf>,
    pub max_message_size: Option<usize>,
    pub server_port: Option<u16>,
    pub log_level: Option<String>,
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

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            venue: VenueConfig {
                base_url: DEFAULT_VENUE_BASE_URL.to_string(),
                client_id: String::new().into(),
                client_secret: String::new().into(),
                version: None,
                timeout_secs: 10,
            },
            filter: FilterConfig { danger_words_path: PathBuf::from("meat_words.txt") },
            sms: SmsConfig {
                max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
                default_city: "Irvine".to_string(),
                default_state: "CA".to_string(),
            },
            server: ServerConfig {
                bind_address: "0.0.0.0".to_string(),
                port: 8080,
                graceful_shutdown_secs: 15,
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
            let expected =
                options.config_path.unwrap_or_else(|| PathBuf::from("menucheck.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(venue) = patch.venue {
            if let Some(base_url) = venue.base_url {
                self.venue.base_url = base_url;
            }
            if let Some(client_id) = venue.client_id {
                self.venue.client_id = secret_value(client_id);
            }
            if let Some(client_secret) = venue.client_secret {
                self.venue.client_secret = secret_value(client_secret);
            }
            if let Some(version) = venue.version {
                self.venue.version = Some(version);
            }
            if let Some(timeout_secs) = venue.timeout_secs {
                self.venue.timeout_secs = timeout_secs;
            }
        }

        if let Some(filter) = patch.filter {
            if let Some(danger_words_path) = filter.danger_words_path {
                self.filter.danger_words_path = danger_words_path;
            }
        }

        if let Some(sms) = patch.sms {
            if let Some(max_message_size) = sms.max_message_size {
                self.sms.max_message_size = max_message_size;
            }
            if let Some(default_city) = sms.default_city {
                self.sms.default_city = default_city;
            }
            if let Some(default_state) = sms.default_state {
                self.sms.default_state = default_state;
            }
        }

        if let Some(server) = patch.server {
            if let Some(bind_address) = server.bind_address {
                self.server.bind_address = bind_address;
            }
            if let Some(port) = server.port {
                self.server.port = port;
            }
            if let Some(graceful_shutdown_secs) = server.graceful_shutdown_secs {
                self.server.graceful_shutdown_secs = graceful_shutdown_secs;
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
        let base_url = read_env("MENUCHECK_VENUE_BASE_URL")
            .or_else(|| read_env("FOURSQUARE_VENUE_BASE_URL"));
        if let Some(value) = base_url {
            self.venue.base_url = value;
        }
        let client_id = read_env("MENUCHECK_VENUE_CLIENT_ID")
            .or_else(|| read_env("FOURSQUARE_CLIENT_ID"));
        if let Some(value) = client_id {
            self.venue.client_id = secret_value(value);
        }
        let client_secret = read_env("MENUCHECK_VENUE_CLIENT_SECRET")
            .or_else(|| read_env("FOURSQUARE_CLIENT_SECRET"));
        if let Some(value) = client_secret {
            self.venue.client_secret = secret_value(value);
        }
        if let Some(value) = read_env("MENUCHECK_VENUE_VERSION") {
            self.venue.version = Some(value);
        }
        if let Some(value) = read_env("MENUCHECK_VENUE_TIMEOUT_SECS") {
            self.venue.timeout_secs = parse_u64("MENUCHECK_VENUE_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = read_env("MENUCHECK_FILTER_DANGER_WORDS_PATH") {
            self.filter.danger_words_path = PathBuf::from(value);
        }

        if let Some(value) = read_env("MENUCHECK_SMS_MAX_MESSAGE_SIZE") {
            self.sms.max_message_size = parse_usize("MENUCHECK_SMS_MAX_MESSAGE_SIZE", &value)?;
        }
        if let Some(value) = read_env("MENUCHECK_SMS_DEFAULT_CITY") {
            self.sms.default_city = value;
        }
        if let Some(value) = read_env("MENUCHECK_SMS_DEFAULT_STATE") {
            self.sms.default_state = value;
        }

        if let Some(value) = read_env("MENUCHECK_SERVER_BIND_ADDRESS") {
            self.server.bind_address = value;
        }
        let port = read_env("MENUCHECK_SERVER_PORT").map(|value| ("MENUCHECK_SERVER_PORT", value));
        if let Some((key, value)) = port.or_else(|| read_env("PORT").map(|value| ("PORT", value))) {
            self.server.port = parse_u16(key, &value)?;
        }
        if let Some(value) = read_env("MENUCHECK_SERVER_GRACEFUL_SHUTDOWN_SECS") {
            self.server.graceful_shutdown_secs =
                parse_u64("MENUCHECK_SERVER_GRACEFUL_SHUTDOWN_SECS", &value)?;
        }

        let log_level =
            read_env("MENUCHECK_LOGGING_LEVEL").or_else(|| read_env("MENUCHECK_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("MENUCHECK_LOGGING_FORMAT").or_else(|| read_env("MENUCHECK_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(base_url) = overrides.venue_base_url {
            self.venue.base_url = base_url;
        }
        if let Some(client_id) = overrides.venue_client_id {
            self.venue.client_id = secret_value(client_id);
        }
        if let Some(client_secret) = overrides.venue_client_secret {
            self.venue.client_secret = secret_value(client_secret);
        }
        if let Some(version) = overrides.venue_version {
            self.venue.version = Some(version);
        }
        if let Some(danger_words_path) = overrides.danger_words_path {
            self.filter.danger_words_path = danger_words_path;
        }
        if let Some(max_message_size) = overrides.max_message_size {
            self.sms.max_message_size = max_message_size;
        }
        if let Some(port) = overrides.server_port {
            self.server.port = port;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_venue(&self.venue)?;
        validate_filter(&self.filter)?;
        validate_sms(&self.sms)?;
        validate_server(&self.server)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("menucheck.toml"), PathBuf::from("config/menucheck.toml")]
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

fn validate_venue(venue: &VenueConfig) -> Result<(), ConfigError> {
    let base_url = venue.base_url.trim();
    if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
        return Err(ConfigError::Validation(
            "venue.base_url must start with http:// or https://".to_string(),
        ));
    }

    if venue.client_id.expose_secret().trim().is_empty() {
        return Err(ConfigError::Validation(
            "venue.client_id is required. Set MENUCHECK_VENUE_CLIENT_ID (or FOURSQUARE_CLIENT_ID) to your Foursquare app's client id".to_string(),
        ));
    }
    if venue.client_secret.expose_secret().trim().is_empty() {
        return Err(ConfigError::Validation(
            "venue.client_secret is required. Set MENUCHECK_VENUE_CLIENT_SECRET (or FOURSQUARE_CLIENT_SECRET) to your Foursquare app's client secret".to_string(),
        ));
    }

    if let Some(version) = &venue.version {
        let well_formed = version.len() == 8 && version.chars().all(|ch| ch.is_ascii_digit());
        if !well_formed {
            return Err(ConfigError::Validation(
                "venue.version must be a YYYYMMDD date".to_string(),
            ));
        }
    }

    if venue.timeout_secs == 0 || venue.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "venue.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    Ok(())
}

fn validate_filter(filter: &FilterConfig) -> Result<(), ConfigError> {
    if filter.danger_words_path.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "filter.danger_words_path must not be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_sms(sms: &SmsConfig) -> Result<(), ConfigError> {
    if sms.max_message_size <= TRUNCATION_HEADROOM {
        return Err(ConfigError::Validation(format!(
            "sms.max_message_size must be greater than {TRUNCATION_HEADROOM}"
        )));
    }

    if sms.default_city.trim().is_empty() || sms.default_state.trim().is_empty() {
        return Err(ConfigError::Validation(
            "sms.default_city and sms.default_state must not be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_server(server: &ServerConfig) -> Result<(), ConfigError> {
    if server.port == 0 {
        return Err(ConfigError::Validation("server.port must be greater than zero".to_string()));
    }

    if server.graceful_shutdown_secs == 0 {
        return Err(ConfigError::Validation(
            "server.graceful_shutdown_secs must be greater than zero".to_string(),
        ));
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

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u16(key: &str, value: &str) -> Result<u16, ConfigError> {
    value.parse::<u16>().map_err(|_| ConfigError::InvalidEnvOverride {
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

fn parse_usize(key: &str, value: &str) -> Result<usize, ConfigError> {
    value.parse::<usize>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    venue: Option<VenuePatch>,
    filter: Option<FilterPatch>,
    sms: Option<SmsPatch>,
    server: Option<ServerPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct VenuePatch {
    base_url: Option<String>,
    client_id: Option<String>,
    client_secret: Option<String>,
    version: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct FilterPatch {
    danger_words_path: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct SmsPatch {
    max_message_size: Option<usize>,
    default_city: Option<String>,
    default_state: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerPatch {
    bind_address: Option<String>,
    port: Option<u16>,
    graceful_shutdown_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
