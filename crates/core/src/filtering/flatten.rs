use std::collections::HashSet;

use thiserror::Error;

use crate::domain::menu::{Dish, Menu};
use crate::text::clean_description;
use crate::venue::wire::{Counted, MenuResponse};

/// Sections whose name contains any of these markers never contribute dishes.
pub const EXCLUDED_SECTION_MARKERS: [&str; 2] = ["Drinks", "Beverages"];

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FlattenError {
    #[error("{level} advertises {count} entries but carries no items")]
    MissingItems { level: &'static str, count: i64 },
    #[error("section `{section}` carries no entries")]
    MissingEntries { section: String },
}

pub fn is_excluded_section(name: &str) -> bool {
    EXCLUDED_SECTION_MARKERS.iter().any(|marker| name.contains(marker))
}

/// Walks menus, sections and entries into one ordered dish list.
///
/// Dishes are deduplicated by exact name across the whole pass; the first
/// occurrence wins. An empty result means the restaurant has no usable menu.
pub fn flatten_menu(restaurant_name: &str, response: &MenuResponse) -> Result<Menu, FlattenError> {
    let mut flat_menu = Menu::new(restaurant_name);
    let mut seen = HashSet::new();

    for menu in positive_items(&response.response.menu.menus, "menu list")? {
        for section in positive_items(&menu.entries, "menu")? {
            if is_excluded_section(&section.name) {
                continue;
            }
            let entries = section
                .entries
                .as_ref()
                .ok_or_else(|| FlattenError::MissingEntries { section: section.name.clone() })?;
            for entry in positive_items(entries, "section")? {
                if !seen.insert(entry.name.as_str()) {
                    continue;
                }
                let info = entry.description.as_deref().map(clean_description).unwrap_or_default();
                flat_menu.add_dish(Dish::new(entry.name.clone(), info));
            }
        }
    }

    Ok(flat_menu)
}

fn positive_items<'a, T>(
    list: &'a Counted<T>,
    level: &'static str,
) -> Result<&'a [T], FlattenError> {
    if !list.is_positive() {
        return Ok(&[]);
    }
    list.items
        .as_deref()
        .ok_or(FlattenError::MissingItems { level, count: list.count })
}
