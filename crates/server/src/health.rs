use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use menucheck_core::words::WordSource;
use serde::Serialize;

use crate::routes::AppState;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub danger_words: HealthCheck,
    pub checked_at: String,
}

pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let danger_words = word_source_check(state.sms.service().word_source());
    let ready = danger_words.status == "ready";

    let payload = HealthResponse {
        status: if ready { "ready" } else { "degraded" },
        service: HealthCheck {
            status: "ready",
            detail: "menucheck-server runtime initialized".to_string(),
        },
        danger_words,
        checked_at: Utc::now().to_rfc3339(),
    };

    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(payload))
}

fn word_source_check(source: &dyn WordSource) -> HealthCheck {
    match source.load_words() {
        Ok(words) if words.is_empty() => HealthCheck {
            status: "degraded",
            detail: format!("{} contains no words; every dish would be kept", source.describe()),
        },
        Ok(words) => HealthCheck {
            status: "ready",
            detail: format!("{} loaded {} words", source.describe(), words.len()),
        },
        Err(error) => HealthCheck { status: "degraded", detail: error.to_string() },
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{extract::State, http::StatusCode, Json};
    use menucheck_core::config::AppConfig;
    use menucheck_core::domain::restaurant::VenueId;
    use menucheck_core::errors::ProviderError;
    use menucheck_core::pipeline::MenuChecker;
    use menucheck_core::venue::wire::{MenuResponse, VenueSearchResponse};
    use menucheck_core::venue::VenueProvider;
    use menucheck_core::words::{FileWordSource, StaticWordSource, WordSource};

    use crate::bootstrap::app_state;
    use crate::health::health;

    struct OfflineProvider;

    #[async_trait]
    impl VenueProvider for OfflineProvider {
        async fn search_venues(
            &self,
            _query: &str,
            _location: &str,
        ) -> Result<VenueSearchResponse, ProviderError> {
            Err(ProviderError::Transport("offline".to_owned()))
        }

        async fn fetch_menu(&self, _venue_id: &VenueId) -> Result<MenuResponse, ProviderError> {
            Err(ProviderError::Transport("offline".to_owned()))
        }
    }

    fn state(words: impl WordSource + 'static) -> crate::routes::AppState {
        let checker = MenuChecker::new(Arc::new(OfflineProvider), Arc::new(words), 1600);
        app_state(checker, &AppConfig::default())
    }

    #[tokio::test]
    async fn health_returns_ready_when_word_list_is_readable() {
        let (status, Json(payload)) = health(State(state(StaticWordSource::new(["beef"])))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload.status, "ready");
        assert_eq!(payload.danger_words.status, "ready");
        assert_eq!(payload.danger_words.detail, "static (1 words) loaded 1 words");
        assert_eq!(payload.service.status, "ready");
    }

    #[tokio::test]
    async fn health_returns_service_unavailable_when_word_list_is_missing() {
        let words = FileWordSource::new("definitely/missing/meat_words.txt");
        let (status, Json(payload)) = health(State(state(words))).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(payload.status, "degraded");
        assert!(payload.danger_words.detail.contains("definitely/missing/meat_words.txt"));
        assert_eq!(payload.service.status, "ready");
    }

    #[tokio::test]
    async fn health_returns_service_unavailable_when_word_list_is_empty() {
        let words = StaticWordSource::default();
        let (status, Json(payload)) = health(State(state(words))).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(payload.status, "degraded");
        assert_eq!(payload.danger_words.status, "degraded");
        assert!(payload.danger_words.detail.ends_with("contains no words; every dish would be kept"));
    }
}
