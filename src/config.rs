use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    /// Remote menu API settings
    #[serde(default)]
    pub api: ApiConfig,
    /// Image URL resolution
    #[serde(default)]
    pub images: ImageConfig,
    /// Map and messaging deep-link settings
    #[serde(default)]
    pub links: LinkConfig,
    /// Fallback values applied while normalizing records
    #[serde(default)]
    pub normalizer: NormalizerConfig,
    /// Category taxonomy override. Empty means the built-in taxonomy.
    #[serde(default)]
    pub taxonomy: Vec<CategoryConfig>,
}

/// Configuration for the remote menu API
#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    /// Base URL, e.g. "https://api.example.id/v1"
    #[serde(default = "default_api_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_base_url(),
            timeout: default_timeout(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ImageConfig {
    /// Prefix joined onto bare image filenames
    #[serde(default = "default_image_base_url")]
    pub base_url: String,
    /// Local asset used when a record has no image
    #[serde(default = "default_placeholder_image")]
    pub placeholder: String,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            base_url: default_image_base_url(),
            placeholder: default_placeholder_image(),
        }
    }
}

/// Deep-link configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LinkConfig {
    /// Map search URL; the encoded query is appended verbatim
    #[serde(default = "default_map_search_base")]
    pub map_search_base: String,
    /// Messaging URL; digits are appended after it
    #[serde(default = "default_messaging_base")]
    pub messaging_base: String,
    /// Country calling code replacing a local leading zero
    #[serde(default = "default_country_code")]
    pub country_code: String,
    /// Pre-filled message. `{menu}` and `{restaurant}` are substituted.
    #[serde(default = "default_message_template")]
    pub message_template: String,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            map_search_base: default_map_search_base(),
            messaging_base: default_messaging_base(),
            country_code: default_country_code(),
            message_template: default_message_template(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct NormalizerConfig {
    /// Name used when a record carries none
    #[serde(default = "default_placeholder_name")]
    pub placeholder_name: String,
    /// Description used when a record carries none
    #[serde(default = "default_fallback_description")]
    pub fallback_description: String,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            placeholder_name: default_placeholder_name(),
            fallback_description: default_fallback_description(),
        }
    }
}

/// One taxonomy entry as written in the config file
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CategoryConfig {
    pub name: String,
    /// Derived from `name` when omitted
    #[serde(default)]
    pub slug: Option<String>,
    /// Claim key understood by the menu API
    #[serde(default)]
    pub backend_key: Option<String>,
}

// Default value functions
fn default_api_base_url() -> String {
    "http://localhost:5000/api".to_string()
}

fn default_timeout() -> u64 {
    15
}

fn default_image_base_url() -> String {
    "http://localhost:5000/uploads".to_string()
}

fn default_placeholder_image() -> String {
    "/images/menu-placeholder.png".to_string()
}

fn default_map_search_base() -> String {
    "https://www.google.com/maps/search/?api=1&query=".to_string()
}

fn default_messaging_base() -> String {
    "https://wa.me/".to_string()
}

fn default_country_code() -> String {
    "62".to_string()
}

fn default_message_template() -> String {
    "Halo {restaurant}, saya tertarik dengan menu {menu}. Apakah masih tersedia?".to_string()
}

fn default_placeholder_name() -> String {
    "Menu Tanpa Nama".to_string()
}

fn default_fallback_description() -> String {
    "Menu sehat pilihan dari mitra lokal kami.".to_string()
}

impl AppConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with MENU_KIT__ prefix
    /// 2. menu-kit.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: MENU_KIT__LINKS__COUNTRY_CODE
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }
}

/// Load configuration from file and environment variables
///
/// See [`AppConfig::load`] for the precedence rules.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_with_environment(environment())
}

// Use double underscore for nested: MENU_KIT__API__BASE_URL
fn environment() -> Environment {
    Environment::with_prefix("MENU_KIT")
        .separator("__")
        .try_parsing(true)
}

fn load_with_environment(environment: Environment) -> Result<AppConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("menu-kit").required(false))
        .add_source(environment)
        .build()?;

    settings.try_deserialize()
}
