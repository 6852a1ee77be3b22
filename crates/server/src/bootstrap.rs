use std::sync::Arc;

use menucheck_core::config::{AppConfig, ConfigError, LoadOptions};
use menucheck_core::errors::ProviderError;
use menucheck_core::pipeline::MenuChecker;
use menucheck_sms::inbound::LocationDefaults;
use menucheck_sms::router::SmsRouter;
use thiserror::Error;
use tracing::info;

use crate::routes::AppState;

pub struct Application {
    pub config: AppConfig,
    pub state: AppState,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("venue client setup failed: {0}")]
    VenueClient(#[source] ProviderError),
}

pub async fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config).await
}

pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let checker = MenuChecker::from_config(&config).map_err(BootstrapError::VenueClient)?;
    info!(
        event_name = "system.bootstrap.checker_ready",
        correlation_id = "bootstrap",
        venue_base_url = %config.venue.base_url,
        word_source = %checker.word_source().describe(),
        max_message_size = config.sms.max_message_size,
        "menu checker initialized"
    );

    let state = app_state(checker, &config);
    Ok(Application { config, state })
}

pub fn app_state(checker: MenuChecker, config: &AppConfig) -> AppState {
    let defaults = LocationDefaults::new(&config.sms.default_city, &config.sms.default_state);
    AppState { sms: Arc::new(SmsRouter::new(checker, defaults, config.sms.max_message_size)) }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use menucheck_core::config::{ConfigOverrides, LoadOptions};

    use crate::bootstrap::bootstrap;

    #[tokio::test]
    async fn bootstrap_fails_fast_without_venue_credentials() {
        let result = bootstrap(LoadOptions {
            overrides: ConfigOverrides {
                venue_client_id: Some("client-test".to_string()),
                venue_client_secret: Some("   ".to_string()),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        })
        .await;

        assert!(result.is_err());
        let message = result.err().map(|error| error.to_string()).unwrap_or_default();
        assert!(message.contains("venue.client_secret"));
    }

    #[tokio::test]
    async fn bootstrap_wires_configured_word_source_and_limits() {
        let app = bootstrap(LoadOptions {
            overrides: ConfigOverrides {
                venue_client_id: Some("client-test".to_string()),
                venue_client_secret: Some("secret-test".to_string()),
                danger_words_path: Some(PathBuf::from("fixtures/meat_words.txt")),
                max_message_size: Some(480),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        })
        .await
        .expect("bootstrap should succeed with valid overrides");

        let checker = app.state.sms.service();
        assert_eq!(checker.word_source().describe(), "file (fixtures/meat_words.txt)");
        assert_eq!(checker.max_message_size(), 480);
    }
}
