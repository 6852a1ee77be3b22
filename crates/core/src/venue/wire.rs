//! Response shapes returned by the venue provider.
//!
//! Only the fields the pipeline reads are modelled. A missing required field
//! fails deserialization, which the pipeline reports as a malformed response.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenueSearchResponse {
    pub response: VenueSearchBody,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenueSearchBody {
    pub venues: Vec<VenueRecord>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenueRecord {
    pub id: String,
    pub name: String,
    pub location: VenueLocation,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VenueLocation {
    pub formatted_address: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuResponse {
    pub response: MenuResponseBody,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuResponseBody {
    pub menu: MenuEnvelope,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuEnvelope {
    pub menus: Counted<MenuRecord>,
}

/// A provider list with its advertised count. `items` is only guaranteed to
/// be present when `count` is positive.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counted<T> {
    pub count: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<T>>,
}

impl<T> Counted<T> {
    pub fn is_positive(&self) -> bool {
        self.count > 0
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuRecord {
    pub entries: Counted<SectionRecord>,
}

/// Beverage sections may arrive without `entries`; kept sections must carry it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionRecord {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entries: Option<Counted<EntryRecord>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryRecord {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
