//! Map deep-links for a menu's stored location.
//!
//! A stored location is classified once, at normalization time, into a
//! [`LocationRef`]. The checks run in a fixed order so that every
//! non-empty string lands in exactly one class: absolute URL, then
//! map-service link, then `"lat, lng"` pair, then free text.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

use crate::config::LinkConfig;
use crate::model::{DisplayMenu, LocationRef};
use crate::urls::encode_component;

static ABSOLUTE_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^https?://\S+").expect("valid url regex"));
static COORDINATE_PAIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*[+-]?\d+(\.\d+)?\s*,\s*[+-]?\d+(\.\d+)?\s*$").expect("valid coordinate regex")
});

/// Substrings that identify a map-service link written without a scheme
const MAP_SERVICE_MARKERS: &[&str] = &[
    "google.com/maps",
    "maps.google.",
    "goo.gl/maps",
    "maps.app.goo.gl",
];

impl LocationRef {
    /// Classify a stored value. Matching ignores surrounding whitespace;
    /// the value itself is kept exactly as stored.
    pub fn classify(value: Option<&str>) -> Self {
        let Some(value) = value.filter(|v| !v.trim().is_empty()) else {
            return LocationRef::Absent;
        };
        let trimmed = value.trim();

        if ABSOLUTE_URL.is_match(trimmed) {
            LocationRef::DirectUrl(value.to_string())
        } else if MAP_SERVICE_MARKERS
            .iter()
            .any(|marker| trimmed.to_ascii_lowercase().contains(marker))
        {
            LocationRef::MapServiceUrl(value.to_string())
        } else if COORDINATE_PAIR.is_match(trimmed) {
            LocationRef::Coordinates(value.to_string())
        } else {
            LocationRef::FreeText(value.to_string())
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkKind {
    Direct,
    Coordinate,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationLink {
    pub kind: LinkKind,
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct LocationLinkResolver {
    map_search_base: String,
}

impl Default for LocationLinkResolver {
    fn default() -> Self {
        Self::new(&LinkConfig::default())
    }
}

impl LocationLinkResolver {
    pub fn new(config: &LinkConfig) -> Self {
        Self {
            map_search_base: config.map_search_base.clone(),
        }
    }

    /// Link that opens the menu's location in the map service.
    ///
    /// Stored links are used verbatim, coordinates become a search for the
    /// pair, and anything else searches for the restaurant by name (the
    /// menu name when the restaurant name is unknown).
    pub fn resolve(&self, menu: &DisplayMenu) -> LocationLink {
        match &menu.location {
            LocationRef::DirectUrl(url) | LocationRef::MapServiceUrl(url) => LocationLink {
                kind: LinkKind::Direct,
                url: url.clone(),
            },
            LocationRef::Coordinates(pair) => LocationLink {
                kind: LinkKind::Coordinate,
                url: self.search_url(pair),
            },
            LocationRef::FreeText(_) | LocationRef::Absent => {
                let query = if menu.restaurant_name.is_empty() {
                    &menu.name
                } else {
                    &menu.restaurant_name
                };
                LocationLink {
                    kind: LinkKind::Fallback,
                    url: self.search_url(query),
                }
            }
        }
    }

    fn search_url(&self, query: &str) -> String {
        format!("{}{}", self.map_search_base, encode_component(query))
    }
}

/// [`LocationLinkResolver::resolve`] with the default map service.
pub fn resolve_location_link(menu: &DisplayMenu) -> LocationLink {
    LocationLinkResolver::default().resolve(menu)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RawMenuRecord;
    use crate::normalize::MenuNormalizer;
    use serde_json::json;

    fn menu(value: serde_json::Value) -> DisplayMenu {
        MenuNormalizer::default().normalize(&RawMenuRecord::from_value(value), None)
    }

    #[test]
    fn test_classification_is_ordered() {
        assert_eq!(LocationRef::classify(None), LocationRef::Absent);
        assert_eq!(LocationRef::classify(Some("   ")), LocationRef::Absent);
        assert_eq!(
            LocationRef::classify(Some("https://maps.google.com/?q=-0.91,100.41")),
            LocationRef::DirectUrl("https://maps.google.com/?q=-0.91,100.41".into())
        );
        assert_eq!(
            LocationRef::classify(Some("maps.app.goo.gl/AbC123")),
            LocationRef::MapServiceUrl("maps.app.goo.gl/AbC123".into())
        );
        assert_eq!(
            LocationRef::classify(Some("-0.91, 100.41")),
            LocationRef::Coordinates("-0.91, 100.41".into())
        );
        assert_eq!(
            LocationRef::classify(Some("+3.5,98")),
            LocationRef::Coordinates("+3.5,98".into())
        );
        assert_eq!(
            LocationRef::classify(Some("Jl. Sudirman No. 5, Padang")),
            LocationRef::FreeText("Jl. Sudirman No. 5, Padang".into())
        );
    }

    #[test]
    fn test_coordinate_pattern_is_strict() {
        for loose in ["-0.91, 100.41, 3", "-0.91 100.41", "-0.91,", ".5, 1", "1,2a", "--1, 2"] {
            assert!(
                !matches!(LocationRef::classify(Some(loose)), LocationRef::Coordinates(_)),
                "{loose:?} should not be a coordinate pair"
            );
        }
    }

    #[test]
    fn test_coordinate_link() {
        let link = resolve_location_link(&menu(json!({ "maps_latlong": "-0.91, 100.41" })));
        assert_eq!(link.kind, LinkKind::Coordinate);
        assert!(link.url.contains("-0.91%2C%20100.41"));
        assert!(link.url.starts_with("https://www.google.com/maps/search/?api=1&query="));
    }

    #[test]
    fn test_direct_link_verbatim() {
        let link = resolve_location_link(&menu(json!({ "mapsLink": "https://maps.example/x" })));
        assert_eq!(link.kind, LinkKind::Direct);
        assert_eq!(link.url, "https://maps.example/x");

        let link = resolve_location_link(&menu(json!({ "mapsLatLong": "goo.gl/maps/xyz" })));
        assert_eq!(link.kind, LinkKind::Direct);
        assert_eq!(link.url, "goo.gl/maps/xyz");
    }

    #[test]
    fn test_direct_link_keeps_surrounding_whitespace() {
        let link = resolve_location_link(&menu(json!({ "mapsLink": "  https://maps.example/x " })));
        assert_eq!(link.kind, LinkKind::Direct);
        assert_eq!(link.url, "  https://maps.example/x ");
    }

    #[test]
    fn test_fallback_uses_restaurant_then_menu_name() {
        let link = resolve_location_link(&menu(json!({
            "name": "Pecel",
            "restaurant_name": "Warung Sehat"
        })));
        assert_eq!(link.kind, LinkKind::Fallback);
        assert!(link.url.contains("Warung%20Sehat"));

        let link = resolve_location_link(&menu(json!({
            "name": "Warung Sehat",
            "maps_latlong": "dekat pasar"
        })));
        assert_eq!(link.kind, LinkKind::Fallback);
        assert!(link.url.ends_with("Warung%20Sehat"));
    }

    #[test]
    fn test_custom_map_base() {
        let config = LinkConfig {
            map_search_base: "https://maps.example/search?q=".into(),
            ..LinkConfig::default()
        };
        let link = LocationLinkResolver::new(&config).resolve(&menu(json!({ "maps_latlong": "1,2" })));
        assert_eq!(link.url, "https://maps.example/search?q=1%2C2");
    }
}
