//! Conversion from loosely-typed API records to [`DisplayMenu`].
//!
//! Every attribute is resolved through a fixed candidate list where the
//! first non-empty value wins, followed by a documented fallback. Nothing
//! in here returns an error: malformed numbers degrade to 0 and missing
//! fields take their fallback.

use log::debug;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

use crate::config::{AppConfig, NormalizerConfig};
use crate::image::ImageResolver;
use crate::model::{DisplayMenu, LocationRef, RawMenuRecord, RawRestaurant, RestaurantContext};
use crate::slug::slugify;

/// Status value that marks a menu as verified by the platform
const APPROVED_STATUS: &str = "disetujui";
const APPROVED_STATUS_EN: &str = "approved";

/// Range for [`placeholder_calories`]
pub const PLACEHOLDER_CALORIES_MIN: u32 = 250;
pub const PLACEHOLDER_CALORIES_MAX: u32 = 550;

// Rupiah written with `.` as thousands separator, e.g. "25.000" or "1.250.000"
static THOUSANDS_GROUPED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d{1,3}(\.\d{3})+$").expect("valid thousands regex"));
// Zero-valued cents or dash written after a Rupiah amount: "25.000,00", "15.000,-"
static RUPIAH_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",(0{1,2}|-)\s*$").expect("valid rupiah suffix regex"));

pub struct MenuNormalizer {
    config: NormalizerConfig,
    placeholder_image: String,
    images: Option<ImageResolver>,
}

impl Default for MenuNormalizer {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

impl MenuNormalizer {
    /// Normalizer that leaves image references untouched
    pub fn new(config: NormalizerConfig, placeholder_image: impl Into<String>) -> Self {
        Self {
            config,
            placeholder_image: placeholder_image.into(),
            images: None,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.normalizer.clone(), config.images.placeholder.clone())
            .with_image_resolver(ImageResolver::new(&config.images.base_url))
    }

    pub fn with_image_resolver(mut self, resolver: ImageResolver) -> Self {
        self.images = Some(resolver);
        self
    }

    /// Build the canonical menu for one raw record.
    ///
    /// `context` fills restaurant fields the record itself lacks.
    pub fn normalize(
        &self,
        raw: &RawMenuRecord,
        context: Option<&RestaurantContext>,
    ) -> DisplayMenu {
        let restaurant = raw.nested_restaurant();

        let name = first_text(&[&raw.name, &raw.nama]).unwrap_or_else(|| {
            debug!("Menu record has no name, using placeholder");
            self.config.placeholder_name.clone()
        });
        let slug = first_text(&[&raw.slug])
            .map(|explicit| slugify(&explicit))
            .unwrap_or_else(|| slugify(&name));
        let id = first_text(&[&raw.id, &raw.underscore_id, &raw.menu_id]).unwrap_or_else(|| {
            debug!("Menu '{}' has no id, falling back to its slug", name);
            slug.clone()
        });

        let price_minor = first_present(&[&raw.price, &raw.harga])
            .map(parse_price)
            .unwrap_or(0);
        let rating = first_present(&[&raw.rating, &raw.penilaian])
            .map(parse_rating)
            .unwrap_or(0.0);
        let calories = first_present(&[&raw.calories, &raw.kalori]).map(parse_calories);

        let image = match first_text(&[&raw.image, &raw.foto]) {
            Some(reference) => match &self.images {
                Some(resolver) => resolver.resolve(&reference),
                None => reference,
            },
            None => self.placeholder_image.clone(),
        };
        let description = first_text(&[&raw.description, &raw.deskripsi])
            .unwrap_or_else(|| self.config.fallback_description.clone());

        let (restaurant_id, restaurant_name, restaurant_slug) =
            resolve_restaurant(raw, &restaurant, context);

        let location = LocationRef::classify(
            first_verbatim(&[
                &raw.maps_latlong,
                &raw.maps_link,
                &raw.maps_lat_long,
                &restaurant.maps_latlong,
                &restaurant.maps_link,
                &restaurant.maps_lat_long,
            ])
            .as_deref(),
        );

        DisplayMenu {
            id,
            name,
            slug,
            price_minor,
            rating,
            calories,
            is_verified: is_verified(raw),
            image,
            description,
            restaurant_id,
            restaurant_name,
            restaurant_slug,
            location,
            contact_raw: contact_candidates(raw, &restaurant),
            claims: parse_claims(&[&raw.claims, &raw.klaim]),
        }
    }

    /// Normalize a whole feed, keeping fetch order.
    pub fn normalize_all(
        &self,
        records: &[RawMenuRecord],
        context: Option<&RestaurantContext>,
    ) -> Vec<DisplayMenu> {
        records
            .iter()
            .map(|raw| self.normalize(raw, context))
            .collect()
    }
}

/// Stand-in calorie count for menus that don't declare one.
///
/// Derived from the menu id so repeated renders of the same item show the
/// same number.
pub fn placeholder_calories(menu: &DisplayMenu) -> u32 {
    let key = if menu.id.is_empty() { &menu.name } else { &menu.id };
    // FNV-1a
    let hash = key.bytes().fold(0xcbf2_9ce4_8422_2325_u64, |acc, byte| {
        (acc ^ u64::from(byte)).wrapping_mul(0x0100_0000_01b3)
    });
    let span = u64::from(PLACEHOLDER_CALORIES_MAX - PLACEHOLDER_CALORIES_MIN + 1);
    PLACEHOLDER_CALORIES_MIN + (hash % span) as u32
}

/// Calories as declared, or the placeholder when the record has none
pub fn calories_or_placeholder(menu: &DisplayMenu) -> u32 {
    menu.calories.unwrap_or_else(|| placeholder_calories(menu))
}

fn resolve_restaurant(
    raw: &RawMenuRecord,
    restaurant: &RawRestaurant,
    context: Option<&RestaurantContext>,
) -> (Option<String>, String, String) {
    let id = first_text(&[&restaurant.id, &restaurant.underscore_id, &raw.restaurant_id])
        .or_else(|| context.and_then(|c| c.id.clone()));
    let name = first_text(&[
        &restaurant.name,
        &restaurant.nama,
        &raw.restaurant_name,
        &raw.nama_restoran,
    ])
    .or_else(|| context.and_then(|c| c.name.clone()))
    .unwrap_or_default();
    let slug = first_text(&[&restaurant.slug, &raw.restaurant_slug])
        .or_else(|| context.and_then(|c| c.slug.clone()))
        .map(|explicit| slugify(&explicit))
        .unwrap_or_else(|| slugify(&name));

    (id, name, slug)
}

fn contact_candidates(raw: &RawMenuRecord, restaurant: &RawRestaurant) -> Vec<String> {
    [
        &raw.whatsapp,
        &raw.no_wa,
        &raw.telepon,
        &raw.phone,
        &raw.phone_admin,
        &raw.primary_phone,
        &restaurant.whatsapp,
        &restaurant.telepon,
        &restaurant.phone,
        &restaurant.phone_admin,
    ]
    .into_iter()
    .filter_map(|candidate| candidate.as_ref().and_then(text_of))
    .collect()
}

fn is_verified(raw: &RawMenuRecord) -> bool {
    let flagged = [&raw.is_verified, &raw.is_verified_camel, &raw.verified]
        .into_iter()
        .flatten()
        .any(|flag| parse_flag(flag) == Some(true));

    flagged
        || raw
            .status_verifikasi
            .as_ref()
            .and_then(text_of)
            .is_some_and(|status| {
                status.eq_ignore_ascii_case(APPROVED_STATUS)
                    || status.eq_ignore_ascii_case(APPROVED_STATUS_EN)
            })
}

/// Trimmed display text for strings and numbers; `None` for anything empty.
pub(crate) fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn first_text(candidates: &[&Option<Value>]) -> Option<String> {
    candidates
        .iter()
        .find_map(|candidate| candidate.as_ref().and_then(text_of))
}

/// Like `first_text`, but returns the winning string exactly as stored
fn first_verbatim(candidates: &[&Option<Value>]) -> Option<String> {
    candidates.iter().find_map(|candidate| match candidate {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
        Some(other) => text_of(other),
        None => None,
    })
}

/// First candidate that is present and not an empty string
fn first_present<'a>(candidates: &[&'a Option<Value>]) -> Option<&'a Value> {
    candidates.iter().copied().find_map(|candidate| match candidate {
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(value) => Some(value),
        None => None,
    })
}

fn number_of(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let stripped: String = RUPIAH_SUFFIX
                .replace(s, "")
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
                .collect();
            let stripped = stripped.as_str();
            if THOUSANDS_GROUPED.is_match(stripped) {
                stripped.replace('.', "").parse().ok()
            } else {
                stripped.parse().ok()
            }
        }
        _ => None,
    };
    parsed.filter(|n| n.is_finite())
}

/// Price in whole Rupiah. Unparseable or negative input yields 0.
///
/// A trailing `,00` or `,-` is dropped first, then strings keep only
/// digits, `.` and `-` before parsing. Dots that split the number into
/// 3-digit groups are thousands separators.
///
/// ```
/// use menu_kit::normalize::parse_price;
/// use serde_json::json;
///
/// assert_eq!(parse_price(&json!("Rp 25.000")), 25000);
/// assert_eq!(parse_price(&json!(18000)), 18000);
/// assert_eq!(parse_price(&json!("gratis")), 0);
/// ```
pub fn parse_price(value: &Value) -> u64 {
    number_of(value)
        .map(|n| n.round().max(0.0) as u64)
        .unwrap_or(0)
}

pub fn parse_rating(value: &Value) -> f64 {
    let parsed = match value {
        Value::String(s) => s.trim().replace(',', ".").parse::<f64>().ok(),
        other => number_of(other),
    };
    parsed
        .filter(|n| n.is_finite())
        .map(|n| n.clamp(0.0, 5.0))
        .unwrap_or(0.0)
}

/// Declared calories; malformed values degrade to 0.
pub fn parse_calories(value: &Value) -> u32 {
    number_of(value)
        .map(|n| n.round().clamp(0.0, f64::from(u32::MAX)) as u32)
        .unwrap_or(0)
}

fn parse_flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|n| n != 0.0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "ya" => Some(true),
            "false" | "0" | "no" | "tidak" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Claim tags from the first candidate that is a non-empty array.
///
/// Any other shape, including a single string, means "no claims".
fn parse_claims(candidates: &[&Option<Value>]) -> Vec<String> {
    candidates
        .iter()
        .find_map(|candidate| match candidate {
            Some(Value::Array(items)) if !items.is_empty() => Some(items),
            _ => None,
        })
        .map(|items| {
            items
                .iter()
                .filter_map(|item| match item {
                    Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default()
}
