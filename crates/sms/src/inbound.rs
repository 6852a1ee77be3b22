use serde::Deserialize;
use thiserror::Error;

/// Separator between the restaurant query and an explicit location.
pub const LOCATION_SEPARATOR: &str = " @ ";

/// The webhook fields the checker reads. Twilio sends many more; they are
/// ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct InboundSms {
    pub body: Option<String>,
    pub from_city: Option<String>,
    pub from_state: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocationDefaults {
    pub city: String,
    pub state: String,
}

impl LocationDefaults {
    pub fn new(city: impl Into<String>, state: impl Into<String>) -> Self {
        Self { city: city.into(), state: state.into() }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MenuQuery {
    pub query: String,
    pub location: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InboundError {
    #[error("inbound message has no body")]
    EmptyBody,
    #[error("inbound message names a location but no restaurant")]
    MissingQuery,
}

/// Splits an inbound text into the restaurant query and the search location.
///
/// `"Green Leaf @ Irvine, CA"` searches for `Green Leaf` near `Irvine, CA`.
/// With several separators only the last one marks the location. Without a
/// separator, or with nothing after it, the sender's city and state are used,
/// falling back to `defaults` when the carrier did not supply them.
pub fn parse_menu_query(
    payload: &InboundSms,
    defaults: &LocationDefaults,
) -> Result<MenuQuery, InboundError> {
    let body = payload.body.as_deref().unwrap_or_default();
    if body.trim().is_empty() {
        return Err(InboundError::EmptyBody);
    }

    let (query, explicit_location) = match body.rsplit_once(LOCATION_SEPARATOR) {
        Some((query, location)) => (query.trim(), non_blank(Some(location))),
        None => (body.trim(), None),
    };
    if query.is_empty() {
        return Err(InboundError::MissingQuery);
    }

    let location = match explicit_location {
        Some(location) => location.to_owned(),
        None => {
            let city = non_blank(payload.from_city.as_deref()).unwrap_or(&defaults.city);
            let state = non_blank(payload.from_state.as_deref()).unwrap_or(&defaults.state);
            format!("{city}, {state}")
        }
    };

    Ok(MenuQuery { query: query.to_owned(), location })
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}
