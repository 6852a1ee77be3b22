pub mod foursquare;
pub mod wire;

use async_trait::async_trait;

use crate::domain::restaurant::{Restaurant, VenueId};
use crate::errors::ProviderError;
use crate::venue::wire::{MenuResponse, VenueSearchResponse};

pub use foursquare::FoursquareClient;

#[async_trait]
pub trait VenueProvider: Send + Sync {
    async fn search_venues(
        &self,
        query: &str,
        location: &str,
    ) -> Result<VenueSearchResponse, ProviderError>;

    async fn fetch_menu(&self, venue_id: &VenueId) -> Result<MenuResponse, ProviderError>;
}

/// Maps every venue in a search response to a restaurant, preserving the
/// provider's order.
pub fn restaurants_from_search(response: VenueSearchResponse) -> Vec<Restaurant> {
    response
        .response
        .venues
        .into_iter()
        .map(|venue| {
            Restaurant::new(venue.id, venue.name, venue.location.formatted_address.join("\n"))
        })
        .collect()
}

pub async fn resolve_restaurants(
    provider: &dyn VenueProvider,
    query: &str,
    location: &str,
) -> Result<Vec<Restaurant>, ProviderError> {
    let response = provider.search_venues(query, location).await?;
    Ok(restaurants_from_search(response))
}
