use std::sync::Arc;

use axum::extract::{Form, Query, State};
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use menucheck_core::pipeline::MenuChecker;
use menucheck_sms::inbound::InboundSms;
use menucheck_sms::router::SmsRouter;
use menucheck_sms::twiml::TWIML_CONTENT_TYPE;
use tracing::info;
use uuid::Uuid;

use crate::health;

pub const WELCOME_TEXT: &str = "Welcome to Your Personalized Menu Checker!";

#[derive(Clone)]
pub struct AppState {
    pub sms: Arc<SmsRouter<MenuChecker>>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(welcome))
        .route("/sms", get(sms_query).post(sms_form))
        .route("/health", get(health::health))
        .with_state(state)
}

pub async fn welcome() -> &'static str {
    WELCOME_TEXT
}

async fn sms_query(
    State(state): State<AppState>,
    Query(payload): Query<InboundSms>,
) -> impl IntoResponse {
    sms_reply(&state, payload).await
}

async fn sms_form(
    State(state): State<AppState>,
    Form(payload): Form<InboundSms>,
) -> impl IntoResponse {
    sms_reply(&state, payload).await
}

async fn sms_reply(state: &AppState, payload: InboundSms) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4().to_string();
    let reply = state.sms.route(&payload, &correlation_id).await;

    info!(
        event_name = "sms.reply.sent",
        correlation_id = %correlation_id,
        outcome = reply.kind.as_str(),
        truncated = reply.truncated,
        "sms reply rendered"
    );

    ([(CONTENT_TYPE, TWIML_CONTENT_TYPE)], reply.response.render())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{header::CONTENT_TYPE, Method, Request, StatusCode};
    use menucheck_core::config::AppConfig;
    use menucheck_core::domain::restaurant::VenueId;
    use menucheck_core::errors::ProviderError;
    use menucheck_core::pipeline::MenuChecker;
    use menucheck_core::venue::wire::{MenuResponse, VenueSearchResponse};
    use menucheck_core::venue::VenueProvider;
    use menucheck_core::words::StaticWordSource;
    use serde_json::json;
    use tower::ServiceExt;

    use super::{router, WELCOME_TEXT};
    use crate::bootstrap::app_state;

    struct GreenLeafProvider;

    #[async_trait]
    impl VenueProvider for GreenLeafProvider {
        async fn search_venues(
            &self,
            query: &str,
            location: &str,
        ) -> Result<VenueSearchResponse, ProviderError> {
            let venues = if query == "Green Leaf" && location == "Irvine, CA" {
                json!([{
                    "id": "V1",
                    "name": "Green Leaf Cafe",
                    "location": { "formattedAddress": ["1 Main St", "Irvine, CA 92618"] }
                }])
            } else {
                json!([])
            };
            serde_json::from_value(json!({ "response": { "venues": venues } }))
                .map_err(|error| ProviderError::Decode(error.to_string()))
        }

        async fn fetch_menu(&self, _venue_id: &VenueId) -> Result<MenuResponse, ProviderError> {
            serde_json::from_value(json!({ "response": { "menu": { "menus": {
                "count": 1,
                "items": [{ "entries": { "count": 1, "items": [{
                    "name": "Mains",
                    "entries": { "count": 2, "items": [
                        { "name": "Veggie Burger", "description": "grilled patty." },
                        { "name": "Steak & Eggs", "description": "grilled beef." }
                    ] }
                }] } }]
            } } } }))
            .map_err(|error| ProviderError::Decode(error.to_string()))
        }
    }

    fn app() -> axum::Router {
        let checker = MenuChecker::new(
            Arc::new(GreenLeafProvider),
            Arc::new(StaticWordSource::new(["beef"])),
            1600,
        );
        router(app_state(checker, &AppConfig::default()))
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body should read");
        String::from_utf8(bytes.to_vec()).expect("body should be utf-8")
    }

    #[tokio::test]
    async fn root_returns_welcome_text() {
        let response = app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).expect("request"))
            .await
            .expect("route should respond");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, WELCOME_TEXT);
    }

    #[tokio::test]
    async fn posted_sms_gets_filtered_twiml_menu() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/sms")
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("Body=Green+Leaf&FromCity=Irvine&FromState=CA&MessageSid=SM1"))
            .expect("request");

        let response = app().oneshot(request).await.expect("route should respond");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(CONTENT_TYPE).and_then(|value| value.to_str().ok()),
            Some("application/xml")
        );
        let body = body_text(response).await;
        assert!(body.contains("<Response><Message>*Green Leaf Cafe*\n- Veggie Burger: grilled patty\n</Message></Response>"));
        assert!(!body.contains("Steak"));
    }

    #[tokio::test]
    async fn query_string_sms_uses_explicit_location() {
        let request = Request::builder()
            .uri("/sms?Body=Green%20Leaf%20%40%20Tustin%2C%20CA")
            .body(Body::empty())
            .expect("request");

        let body = body_text(app().oneshot(request).await.expect("route should respond")).await;

        assert!(body.contains("No Results Found"));
    }

    #[tokio::test]
    async fn missing_body_gets_usage_reply() {
        let request = Request::builder().uri("/sms").body(Body::empty()).expect("request");

        let response = app().oneshot(request).await.expect("route should respond");

        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("Text a restaurant name"));
    }
}
