//! Known subscription categories and their display colors.

/// Bucket used for records without a category.
pub const OTHER_CATEGORY: &str = "Other";

/// Categories offered to users when recording a subscription.
pub const KNOWN_CATEGORIES: [&str; 13] = [
    "Streaming",
    "Software",
    "Fitness",
    "Music",
    "News",
    "Gaming",
    "Productivity",
    "Cloud Storage",
    "Education",
    "Finance",
    "Food & Delivery",
    "Transportation",
    OTHER_CATEGORY,
];

const CATEGORY_COLORS: [(&str, &str); 13] = [
    ("Streaming", "#E50914"),
    ("Software", "#007AFF"),
    ("Fitness", "#FF6B35"),
    ("Music", "#1DB954"),
    ("News", "#FF6B6B"),
    ("Gaming", "#9146FF"),
    ("Productivity", "#34C759"),
    ("Cloud Storage", "#007AFF"),
    ("Education", "#FF9500"),
    ("Finance", "#30D158"),
    ("Food & Delivery", "#FF3B30"),
    ("Transportation", "#5856D6"),
    (OTHER_CATEGORY, "#8E8E93"),
];

/// Resolves the grouping key for a free-text category.
///
/// Absent, empty, and whitespace-only values all land in [`OTHER_CATEGORY`].
pub fn effective_category(category: Option<&str>) -> &str {
    match category.map(str::trim) {
        Some(name) if !name.is_empty() => name,
        _ => OTHER_CATEGORY,
    }
}

/// Returns the hex color associated with a category name.
///
/// Categories outside the catalog share the color of [`OTHER_CATEGORY`].
pub fn category_color(name: &str) -> &'static str {
    let name = name.trim();
    CATEGORY_COLORS
        .iter()
        .find(|(known, _)| *known == name)
        .or_else(|| CATEGORY_COLORS.last())
        .map(|(_, color)| *color)
        .unwrap_or("#8E8E93")
}

pub fn is_known_category(name: &str) -> bool {
    KNOWN_CATEGORIES.contains(&name.trim())
}
