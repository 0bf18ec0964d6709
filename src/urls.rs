//! In-app navigation paths and URL encoding shared by the link resolvers.
//!
//! Routing itself belongs to the presentation layer; this module only
//! produces the path strings it expects.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::category::Category;
use crate::model::DisplayMenu;

/// Navigation path prefixes.
mod paths {
    pub const MENU: &str = "/menu";
    pub const RESTAURANT: &str = "/restaurant";
    pub const CATEGORY: &str = "/category";
}

/// Characters left alone by JavaScript's `encodeURIComponent`
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode a query value or path segment.
pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

/// `/menu/<id>`, or `/menu/<slug>` when the menu has no id.
pub fn menu_path(menu: &DisplayMenu) -> String {
    let target = if menu.id.is_empty() { &menu.slug } else { &menu.id };
    format!("{}/{}", paths::MENU, encode_component(target))
}

/// `/restaurant/<slug>`, or `/restaurant/<id>` when there is no slug.
///
/// `None` when the menu carries neither.
pub fn restaurant_path(menu: &DisplayMenu) -> Option<String> {
    let target = if menu.restaurant_slug.is_empty() {
        menu.restaurant_id.as_deref().filter(|id| !id.is_empty())?
    } else {
        menu.restaurant_slug.as_str()
    };
    Some(format!("{}/{}", paths::RESTAURANT, encode_component(target)))
}

pub fn category_path(category: &Category) -> String {
    format!("{}/{}", paths::CATEGORY, category.slug)
}
