/// Lower-cases text and trims surrounding whitespace. Internal whitespace is
/// left as-is.
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Rewrites a dish description into a compact single line: whitespace runs
/// become one space, periods become semicolons, and trailing separators are
/// dropped.
pub fn format_dish(info: &str) -> String {
    let collapsed = info.split_whitespace().collect::<Vec<_>>().join(" ");
    let separated = collapsed.replace('.', ";");
    // "grilled ." collapses to "grilled ;", so trailing spaces left behind by
    // the semicolon strip have to go as well.
    separated.trim_end_matches(|ch: char| ch == ';' || ch.is_whitespace()).to_string()
}

/// Cleans a raw provider description the way the flattener stores it.
pub fn clean_description(raw: &str) -> String {
    raw.to_lowercase().trim().trim_end_matches('.').to_string()
}

/// Builds the best-effort external menu lookup path for a restaurant name.
pub fn menu_lookup_url(restaurant_name: &str) -> String {
    let slug = restaurant_name.to_lowercase().split_whitespace().collect::<Vec<_>>().join("-");
    format!("places.singleplatform.com/{slug}/menu")
}
