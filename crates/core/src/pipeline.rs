//! Single-request menu check: resolve the venue, fetch and flatten its menu,
//! classify the dishes and render the reply.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::domain::restaurant::Restaurant;
use crate::errors::{PipelineError, ProviderError};
use crate::filtering::{classify_menu, flatten_menu, WordLists};
use crate::governor::{render_menu, Rendering};
use crate::text::menu_lookup_url;
use crate::venue::{resolve_restaurants, FoursquareClient, VenueProvider};
use crate::words::{FileWordSource, WordSource};

pub const SEARCH_UNAVAILABLE_REPLY: &str =
    "We could not find the restaurant you are looking for. Please try again later.";
pub const NO_RESULTS_REPLY: &str =
    "No Results Found: We could not find any restaurants with the text you sent. Please try again.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MenuOutcome {
    SearchUnavailable,
    NoResults,
    MenuUnavailable { restaurant: String },
    NoMenu { restaurant: String },
    Filtered { restaurant: String, rendering: Rendering, kept: usize, dropped: usize },
}

impl MenuOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SearchUnavailable => "search_unavailable",
            Self::NoResults => "no_results",
            Self::MenuUnavailable { .. } => "menu_unavailable",
            Self::NoMenu { .. } => "no_menu",
            Self::Filtered { .. } => "filtered",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MenuReply {
    pub outcome: MenuOutcome,
    pub text: String,
}

impl MenuReply {
    fn new(outcome: MenuOutcome, text: impl Into<String>) -> Self {
        Self { outcome, text: text.into() }
    }
}

pub fn menu_unavailable_reply(restaurant_name: &str) -> String {
    format!(
        "Unfortunately, we could not create a filtered menu for {restaurant_name}. Try checking the online menu for more information. {}",
        menu_lookup_url(restaurant_name)
    )
}

pub fn no_menu_reply(restaurant: &Restaurant) -> String {
    format!(
        "Unfortunately, {} does not have a menu. Visit the restaurant for a full menu!\n{}",
        restaurant.name, restaurant.address
    )
}

/// Runs menu checks against an injected venue provider and danger-word
/// source. Holds no per-request state, so one instance is shared across
/// requests.
#[derive(Clone)]
pub struct MenuChecker {
    provider: Arc<dyn VenueProvider>,
    words: Arc<dyn WordSource>,
    max_message_size: usize,
}

impl MenuChecker {
    pub fn new(
        provider: Arc<dyn VenueProvider>,
        words: Arc<dyn WordSource>,
        max_message_size: usize,
    ) -> Self {
        Self { provider, words, max_message_size }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, ProviderError> {
        let provider = FoursquareClient::new(&config.venue)?;
        let words = FileWordSource::new(&config.filter.danger_words_path);
        Ok(Self::new(Arc::new(provider), Arc::new(words), config.sms.max_message_size))
    }

    pub fn word_source(&self) -> &dyn WordSource {
        self.words.as_ref()
    }

    pub fn max_message_size(&self) -> usize {
        self.max_message_size
    }

    pub async fn check(&self, query: &str, location: &str) -> Result<MenuReply, PipelineError> {
        let restaurants = match resolve_restaurants(self.provider.as_ref(), query, location).await
        {
            Ok(restaurants) => restaurants,
            Err(error) if error.is_transport() => {
                warn!(
                    event_name = "pipeline.search.unavailable",
                    error = %error,
                    "venue search failed"
                );
                return Ok(MenuReply::new(MenuOutcome::SearchUnavailable, SEARCH_UNAVAILABLE_REPLY));
            }
            Err(error) => return Err(malformed("search", error)),
        };

        let Some(restaurant) = restaurants.into_iter().next() else {
            info!(event_name = "pipeline.search.empty", query, location, "no venues matched");
            return Ok(MenuReply::new(MenuOutcome::NoResults, NO_RESULTS_REPLY));
        };
        debug!(
            event_name = "pipeline.search.resolved",
            venue_id = %restaurant.id,
            restaurant = %restaurant.name,
            "using first venue"
        );

        let response = match self.provider.fetch_menu(&restaurant.id).await {
            Ok(response) => response,
            Err(error) if error.is_transport() => {
                warn!(
                    event_name = "pipeline.menu.unavailable",
                    venue_id = %restaurant.id,
                    error = %error,
                    "menu fetch failed"
                );
                let text = menu_unavailable_reply(&restaurant.name);
                return Ok(MenuReply::new(
                    MenuOutcome::MenuUnavailable { restaurant: restaurant.name },
                    text,
                ));
            }
            Err(error) => return Err(malformed("menu", error)),
        };

        let menu = flatten_menu(&restaurant.name, &response)?;
        if menu.is_empty() {
            info!(event_name = "pipeline.menu.empty", venue_id = %restaurant.id, "menu has no dishes");
            let text = no_menu_reply(&restaurant);
            return Ok(MenuReply::new(MenuOutcome::NoMenu { restaurant: restaurant.name }, text));
        }

        let lists = WordLists::vegetarian(self.words.load_words()?);
        let filtered = classify_menu(&menu, &lists);
        for dropped in &filtered.dropped {
            debug!(
                event_name = "pipeline.dish.dropped",
                dish = %dropped.name,
                danger_word = %dropped.danger_word,
                "dish removed"
            );
        }

        let rendered = render_menu(&filtered.menu(), self.max_message_size);
        let outcome = MenuOutcome::Filtered {
            restaurant: restaurant.name,
            rendering: rendered.rendering,
            kept: filtered.kept.len(),
            dropped: filtered.dropped.len(),
        };
        info!(
            event_name = "pipeline.menu.filtered",
            kept = filtered.kept.len(),
            dropped = filtered.dropped.len(),
            simplified = rendered.rendering == Rendering::Simplified,
            "menu filtered"
        );

        Ok(MenuReply::new(outcome, rendered.text))
    }
}

fn malformed(stage: &'static str, error: ProviderError) -> PipelineError {
    PipelineError::MalformedResponse { stage, message: error.to_string() }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use serde_json::json;

    use super::{MenuChecker, MenuOutcome, NO_RESULTS_REPLY, SEARCH_UNAVAILABLE_REPLY};
    use crate::domain::restaurant::VenueId;
    use crate::errors::{PipelineError, ProviderError};
    use crate::governor::{Rendering, DEFAULT_MAX_MESSAGE_SIZE};
    use crate::venue::wire::{MenuResponse, VenueSearchResponse};
    use crate::venue::VenueProvider;
    use crate::words::{StaticWordSource, WordSource, WordSourceError};

    struct FakeProvider {
        search: Result<serde_json::Value, ProviderError>,
        menu: Result<serde_json::Value, ProviderError>,
        menu_calls: Mutex<Vec<VenueId>>,
    }

    impl FakeProvider {
        fn new(
            search: Result<serde_json::Value, ProviderError>,
            menu: Result<serde_json::Value, ProviderError>,
        ) -> Self {
            Self { search, menu, menu_calls: Mutex::new(Vec::new()) }
        }
    }

    fn decode<T: serde::de::DeserializeOwned>(value: &serde_json::Value) -> Result<T, ProviderError> {
        serde_json::from_value(value.clone()).map_err(|error| ProviderError::Decode(error.to_string()))
    }

    #[async_trait]
    impl VenueProvider for FakeProvider {
        async fn search_venues(
            &self,
            _query: &str,
            _location: &str,
        ) -> Result<VenueSearchResponse, ProviderError> {
            self.search.clone().and_then(|value| decode(&value))
        }

        async fn fetch_menu(&self, venue_id: &VenueId) -> Result<MenuResponse, ProviderError> {
            self.menu_calls.lock().expect("menu call log").push(venue_id.clone());
            self.menu.clone().and_then(|value| decode(&value))
        }
    }

    struct BrokenWords;

    impl WordSource for BrokenWords {
        fn load_words(&self) -> Result<Vec<String>, WordSourceError> {
            Err(WordSourceError::Unreadable {
                path: "meat_words.txt".into(),
                message: "No such file or directory".to_owned(),
            })
        }

        fn describe(&self) -> String {
            "broken".to_owned()
        }
    }

    fn venues(venues: serde_json::Value) -> serde_json::Value {
        json!({ "response": { "venues": venues } })
    }

    fn green_leaf_search() -> serde_json::Value {
        venues(json!([
            {
                "id": "V1",
                "name": "Green Leaf Cafe",
                "location": { "formattedAddress": ["1 Main St", "Irvine, CA 92618"] }
            },
            {
                "id": "V2",
                "name": "Green Leaf Express",
                "location": { "formattedAddress": ["9 Side St"] }
            }
        ]))
    }

    fn menu_with_sections(sections: serde_json::Value) -> serde_json::Value {
        let count = sections.as_array().map(Vec::len).unwrap_or_default();
        json!({ "response": { "menu": { "menus": {
            "count": 1,
            "items": [{ "entries": { "count": count, "items": sections } }]
        } } } })
    }

    fn green_leaf_menu() -> serde_json::Value {
        menu_with_sections(json!([
            {
                "name": "Mains",
                "entries": { "count": 2, "items": [
                    { "name": "Veggie Burger", "description": "grilled patty." },
                    { "name": "Steak", "description": "grilled beef." }
                ] }
            },
            {
                "name": "Drinks",
                "entries": { "count": 1, "items": [{ "name": "Lemonade" }] }
            }
        ]))
    }

    fn checker(provider: FakeProvider, words: impl WordSource + 'static) -> MenuChecker {
        MenuChecker::new(Arc::new(provider), Arc::new(words), DEFAULT_MAX_MESSAGE_SIZE)
    }

    #[tokio::test]
    async fn green_leaf_keeps_veggie_burger_and_drops_steak() {
        let provider = Arc::new(FakeProvider::new(Ok(green_leaf_search()), Ok(green_leaf_menu())));
        let checker = MenuChecker::new(
            provider.clone(),
            Arc::new(StaticWordSource::new(["beef"])),
            DEFAULT_MAX_MESSAGE_SIZE,
        );

        let reply = checker.check("Green Leaf", "Irvine, CA").await.expect("check should succeed");

        assert!(reply.text.contains("Veggie Burger: grilled patty"));
        assert!(!reply.text.contains("Steak"));
        assert!(!reply.text.contains("Lemonade"));
        assert_eq!(reply.text, "*Green Leaf Cafe*\n- Veggie Burger: grilled patty\n");
        assert_eq!(
            reply.outcome,
            MenuOutcome::Filtered {
                restaurant: "Green Leaf Cafe".to_owned(),
                rendering: Rendering::Full,
                kept: 1,
                dropped: 1,
            }
        );
        let calls = provider.menu_calls.lock().expect("menu call log");
        assert_eq!(*calls, vec![VenueId("V1".to_owned())]);
    }

    #[tokio::test]
    async fn zero_venues_reply_is_exact() {
        let provider = FakeProvider::new(Ok(venues(json!([]))), Ok(green_leaf_menu()));
        let reply = checker(provider, StaticWordSource::default())
            .check("Nowhere", "Irvine, CA")
            .await
            .expect("check should succeed");

        assert_eq!(reply.outcome, MenuOutcome::NoResults);
        assert_eq!(reply.text, NO_RESULTS_REPLY);
    }

    #[tokio::test]
    async fn zero_dishes_reply_includes_address() {
        let provider = FakeProvider::new(
            Ok(green_leaf_search()),
            Ok(json!({ "response": { "menu": { "menus": { "count": 0 } } } })),
        );
        let reply = checker(provider, StaticWordSource::default())
            .check("Green Leaf", "Irvine, CA")
            .await
            .expect("check should succeed");

        assert_eq!(
            reply.text,
            "Unfortunately, Green Leaf Cafe does not have a menu. Visit the restaurant for a full menu!\n1 Main St\nIrvine, CA 92618"
        );
        assert!(matches!(reply.outcome, MenuOutcome::NoMenu { .. }));
    }

    #[tokio::test]
    async fn drinks_only_menu_counts_as_no_menu() {
        let provider = FakeProvider::new(
            Ok(green_leaf_search()),
            Ok(menu_with_sections(json!([{
                "name": "Beverages",
                "entries": { "count": 1, "items": [{ "name": "Tea" }] }
            }]))),
        );
        let reply = checker(provider, StaticWordSource::default())
            .check("Green Leaf", "Irvine, CA")
            .await
            .expect("check should succeed");

        assert!(matches!(reply.outcome, MenuOutcome::NoMenu { .. }));
    }

    #[tokio::test]
    async fn search_transport_failure_is_a_reply_not_an_error() {
        let provider = FakeProvider::new(
            Err(ProviderError::Transport("connection refused".to_owned())),
            Ok(green_leaf_menu()),
        );
        let reply = checker(provider, StaticWordSource::default())
            .check("Green Leaf", "Irvine, CA")
            .await
            .expect("check should succeed");

        assert_eq!(reply.outcome, MenuOutcome::SearchUnavailable);
        assert_eq!(reply.text, SEARCH_UNAVAILABLE_REPLY);
    }

    #[tokio::test]
    async fn menu_status_failure_points_at_online_menu() {
        let provider = FakeProvider::new(
            Ok(green_leaf_search()),
            Err(ProviderError::Status { status: 404 }),
        );
        let reply = checker(provider, StaticWordSource::default())
            .check("Green Leaf", "Irvine, CA")
            .await
            .expect("check should succeed");

        assert_eq!(
            reply.text,
            "Unfortunately, we could not create a filtered menu for Green Leaf Cafe. Try checking the online menu for more information. places.singleplatform.com/green-leaf-cafe/menu"
        );
    }

    #[tokio::test]
    async fn malformed_search_response_escapes_as_error() {
        let provider = FakeProvider::new(
            Ok(json!({ "response": { "meta": {} } })),
            Ok(green_leaf_menu()),
        );
        let error = checker(provider, StaticWordSource::default())
            .check("Green Leaf", "Irvine, CA")
            .await
            .expect_err("malformed search should fail");

        assert!(matches!(error, PipelineError::MalformedResponse { stage: "search", .. }));
    }

    #[tokio::test]
    async fn unreadable_word_list_fails_the_check() {
        let provider = FakeProvider::new(Ok(green_leaf_search()), Ok(green_leaf_menu()));
        let error = checker(provider, BrokenWords)
            .check("Green Leaf", "Irvine, CA")
            .await
            .expect_err("missing word list should fail");

        assert!(matches!(error, PipelineError::WordSource(_)));
    }

    #[tokio::test]
    async fn oversized_menu_falls_back_to_simplified_rendering() {
        let items = (0..40)
            .map(|index| {
                json!({
                    "name": format!("Garden Plate {index}"),
                    "description": "roasted seasonal vegetables with herbs and a lemon dressing."
                })
            })
            .collect::<Vec<_>>();
        let provider = FakeProvider::new(
            Ok(green_leaf_search()),
            Ok(menu_with_sections(json!([{
                "name": "Plates",
                "entries": { "count": items.len(), "items": items }
            }]))),
        );
        let reply = checker(provider, StaticWordSource::new(["beef"]))
            .check("Green Leaf", "Irvine, CA")
            .await
            .expect("check should succeed");

        assert!(reply.text.starts_with("Green Leaf Cafe: Garden Plate 0; Garden Plate 1"));
        assert!(matches!(
            reply.outcome,
            MenuOutcome::Filtered { rendering: Rendering::Simplified, kept: 40, .. }
        ));
    }
}
