pub mod category;
pub mod config;
pub mod contact;
pub mod error;
pub mod feed;
pub mod image;
pub mod location;
pub mod model;
pub mod normalize;
pub mod slug;
pub mod urls;

use log::debug;
use serde::Serialize;

// Re-export commonly used types
pub use category::{group_by_claim, Category, CategoryTaxonomy, MenuGroup};
pub use config::AppConfig;
pub use contact::{build_contact_url, resolve_contact, ContactResolver, NO_CONTACT_NOTICE};
pub use error::MenuError;
pub use feed::{load_feed, FeedQuery, FeedSource, FeedTicket, FeedView, HttpFeedSource};
pub use location::{resolve_location_link, LinkKind, LocationLink, LocationLinkResolver};
pub use model::{DisplayMenu, LocationRef, RawMenuRecord, RestaurantContext};
pub use normalize::{calories_or_placeholder, MenuNormalizer};
pub use slug::slugify;

/// Everything a menu card needs, derived from one [`DisplayMenu`].
#[derive(Debug, Clone, Serialize)]
pub struct MenuCard<'a> {
    pub menu: &'a DisplayMenu,
    pub calories: u32,
    pub menu_path: String,
    pub restaurant_path: Option<String>,
    pub location: LocationLink,
    /// `None` when the menu has no reachable contact
    pub contact_url: Option<String>,
}

/// Normalizer, taxonomy and link resolvers configured from one [`AppConfig`].
///
/// Build it once at startup; all methods take `&self` and are safe to
/// call from anywhere.
pub struct MenuKit {
    normalizer: MenuNormalizer,
    taxonomy: CategoryTaxonomy,
    locations: LocationLinkResolver,
    contacts: ContactResolver,
}

impl Default for MenuKit {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

impl MenuKit {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            normalizer: MenuNormalizer::from_config(config),
            taxonomy: CategoryTaxonomy::from_config(&config.taxonomy),
            locations: LocationLinkResolver::new(&config.links),
            contacts: ContactResolver::new(&config.links),
        }
    }

    pub fn normalizer(&self) -> &MenuNormalizer {
        &self.normalizer
    }

    pub fn taxonomy(&self) -> &CategoryTaxonomy {
        &self.taxonomy
    }

    pub fn normalize(&self, raw: &RawMenuRecord, context: Option<&RestaurantContext>) -> DisplayMenu {
        self.normalizer.normalize(raw, context)
    }

    pub fn group<'a>(&'a self, menus: &'a [DisplayMenu]) -> Vec<MenuGroup<'a>> {
        group_by_claim(menus, &self.taxonomy)
    }

    pub fn location_link(&self, menu: &DisplayMenu) -> LocationLink {
        self.locations.resolve(menu)
    }

    pub fn contact_url(&self, menu: &DisplayMenu) -> Option<String> {
        self.contacts.build_url(menu)
    }

    /// Query for a category page, looked up by the category's slug.
    pub fn category_query(&self, slug: &str) -> Result<FeedQuery, MenuError> {
        let category = self
            .taxonomy
            .by_slug(slug)
            .ok_or_else(|| MenuError::UnknownCategory(slug.to_string()))?;
        let backend_key = category
            .backend_key
            .clone()
            .ok_or_else(|| MenuError::UnqueryableCategory(category.display_name.clone()))?;
        debug!("Category '{}' maps to claim '{}'", slug, backend_key);
        Ok(FeedQuery::ByCategory { backend_key })
    }

    pub fn card<'a>(&self, menu: &'a DisplayMenu) -> MenuCard<'a> {
        MenuCard {
            menu,
            calories: calories_or_placeholder(menu),
            menu_path: urls::menu_path(menu),
            restaurant_path: urls::restaurant_path(menu),
            location: self.location_link(menu),
            contact_url: self.contact_url(menu),
        }
    }
}
