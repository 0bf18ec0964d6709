use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A menu record as the API sends it.
///
/// Every known synonym gets its own field so that a record carrying both
/// `name` and `nama` still decodes; precedence between them is decided by
/// the normalizer. Values stay untyped because the API mixes strings,
/// numbers and nulls freely.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMenuRecord {
    pub id: Option<Value>,
    #[serde(rename = "_id")]
    pub underscore_id: Option<Value>,
    pub menu_id: Option<Value>,

    pub name: Option<Value>,
    pub nama: Option<Value>,
    pub slug: Option<Value>,

    pub price: Option<Value>,
    pub harga: Option<Value>,

    pub image: Option<Value>,
    pub foto: Option<Value>,

    pub description: Option<Value>,
    pub deskripsi: Option<Value>,

    pub calories: Option<Value>,
    pub kalori: Option<Value>,

    pub rating: Option<Value>,
    pub penilaian: Option<Value>,

    pub is_verified: Option<Value>,
    #[serde(rename = "isVerified")]
    pub is_verified_camel: Option<Value>,
    pub verified: Option<Value>,
    pub status_verifikasi: Option<Value>,

    pub claims: Option<Value>,
    pub klaim: Option<Value>,

    pub maps_latlong: Option<Value>,
    #[serde(rename = "mapsLink")]
    pub maps_link: Option<Value>,
    #[serde(rename = "mapsLatLong")]
    pub maps_lat_long: Option<Value>,

    pub whatsapp: Option<Value>,
    pub no_wa: Option<Value>,
    pub telepon: Option<Value>,
    pub phone: Option<Value>,
    pub phone_admin: Option<Value>,
    pub primary_phone: Option<Value>,

    pub restaurant: Option<Value>,
    pub restoran: Option<Value>,
    pub restaurant_id: Option<Value>,
    pub restaurant_name: Option<Value>,
    pub nama_restoran: Option<Value>,
    pub restaurant_slug: Option<Value>,
}

impl RawMenuRecord {
    /// Decode one feed item. Anything that is not an object decodes to an
    /// empty record rather than failing the whole feed.
    pub fn from_value(value: Value) -> Self {
        if !value.is_object() {
            warn!("Menu record is not an object, treating it as empty");
            return Self::default();
        }
        serde_json::from_value(value).unwrap_or_else(|e| {
            warn!("Failed to decode menu record: {}", e);
            Self::default()
        })
    }

    /// Restaurant-level fields from `restaurant`, then `restoran`.
    ///
    /// A bare string is read as the restaurant name.
    pub fn nested_restaurant(&self) -> RawRestaurant {
        [&self.restaurant, &self.restoran]
            .into_iter()
            .flatten()
            .find_map(RawRestaurant::from_value)
            .unwrap_or_default()
    }
}

/// Restaurant data embedded in a menu record
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRestaurant {
    pub id: Option<Value>,
    #[serde(rename = "_id")]
    pub underscore_id: Option<Value>,
    pub name: Option<Value>,
    pub nama: Option<Value>,
    pub slug: Option<Value>,

    pub whatsapp: Option<Value>,
    pub telepon: Option<Value>,
    pub phone: Option<Value>,
    pub phone_admin: Option<Value>,

    pub maps_latlong: Option<Value>,
    #[serde(rename = "mapsLink")]
    pub maps_link: Option<Value>,
    #[serde(rename = "mapsLatLong")]
    pub maps_lat_long: Option<Value>,
}

impl RawRestaurant {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Object(_) => serde_json::from_value(value.clone()).ok(),
            Value::String(name) if !name.trim().is_empty() => Some(RawRestaurant {
                name: Some(Value::String(name.clone())),
                ..Default::default()
            }),
            _ => None,
        }
    }
}

/// What a call site already knows about the restaurant owning the records,
/// e.g. the merchant's own store when listing "my store".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestaurantContext {
    pub id: Option<String>,
    pub name: Option<String>,
    pub slug: Option<String>,
}

/// Stored location value, classified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum LocationRef {
    Absent,
    /// Absolute http(s) URL
    DirectUrl(String),
    /// Map-service link without a scheme, e.g. `maps.app.goo.gl/abc`
    MapServiceUrl(String),
    /// `"lat, lng"`
    Coordinates(String),
    /// Place name or address
    FreeText(String),
}

/// Canonical menu used by presentation and by the link resolvers.
///
/// Built fresh from a [`RawMenuRecord`] on every fetch and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayMenu {
    pub id: String,
    pub name: String,
    pub slug: String,
    /// Rupiah; the currency has no minor unit
    pub price_minor: u64,
    /// Always within 0..=5
    pub rating: f64,
    pub calories: Option<u32>,
    pub is_verified: bool,
    pub image: String,
    pub description: String,
    pub restaurant_id: Option<String>,
    pub restaurant_name: String,
    pub restaurant_slug: String,
    pub location: LocationRef,
    /// Candidate contact strings, menu-level first
    pub contact_raw: Vec<String>,
    pub claims: Vec<String>,
}
