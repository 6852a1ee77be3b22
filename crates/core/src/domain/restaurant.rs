use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VenueId(pub String);

impl fmt::Display for VenueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A venue returned by the search provider. `address` holds the provider's
/// formatted address lines joined with newlines.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: VenueId,
    pub name: String,
    pub address: String,
}

impl Restaurant {
    pub fn new(id: impl Into<String>, name: impl Into<String>, address: impl Into<String>) -> Self {
        Self { id: VenueId(id.into()), name: name.into(), address: address.into() }
    }
}

impl fmt::Display for Restaurant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n{}", self.name, self.address)
    }
}

#[cfg(test)]
mod tests {
    use super::Restaurant;

    #[test]
    fn display_puts_address_below_name() {
        let restaurant =
            Restaurant::new("V1", "Green Leaf Cafe", "1 Main St\nIrvine, CA 92618");
        assert_eq!(restaurant.to_string(), "Green Leaf Cafe\n1 Main St\nIrvine, CA 92618");
    }
}
