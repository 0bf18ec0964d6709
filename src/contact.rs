use log::debug;

use crate::config::LinkConfig;
use crate::model::DisplayMenu;
use crate::urls::encode_component;

/// Shown to the shopper when no candidate yields a usable number
pub const NO_CONTACT_NOTICE: &str = "Nomor kontak belum tersedia";

/// Builds messaging deep-links from a menu's contact candidates.
#[derive(Debug, Clone)]
pub struct ContactResolver {
    country_code: String,
    messaging_base: String,
    message_template: String,
}

impl Default for ContactResolver {
    fn default() -> Self {
        Self::new(&LinkConfig::default())
    }
}

impl ContactResolver {
    pub fn new(config: &LinkConfig) -> Self {
        Self {
            country_code: config.country_code.clone(),
            messaging_base: config.messaging_base.clone(),
            message_template: config.message_template.clone(),
        }
    }

    /// Digits-only recipient for the messaging service.
    ///
    /// The first non-empty candidate in precedence order is the contact; if
    /// it holds no digits there is no contact at all. A local `0…` or bare
    /// `8…` mobile number is rewritten to international form, anything else
    /// is passed through.
    pub fn resolve(&self, menu: &DisplayMenu) -> Option<String> {
        let digits = digits_only(menu.contact_raw.first()?);
        if digits.is_empty() {
            return None;
        }
        Some(self.internationalize(digits))
    }

    /// Messaging URL with a pre-filled message about the menu.
    ///
    /// `None` means there is nothing to contact; callers should show
    /// [`NO_CONTACT_NOTICE`] instead of opening anything.
    pub fn build_url(&self, menu: &DisplayMenu) -> Option<String> {
        let Some(digits) = self.resolve(menu) else {
            debug!("No contact number for menu '{}'", menu.id);
            return None;
        };
        let message = self
            .message_template
            .replace("{menu}", &menu.name)
            .replace("{restaurant}", &menu.restaurant_name);

        Some(format!(
            "{}{}?text={}",
            self.messaging_base,
            digits,
            encode_component(&message)
        ))
    }

    fn internationalize(&self, digits: String) -> String {
        if let Some(local) = digits.strip_prefix('0') {
            format!("{}{}", self.country_code, local)
        } else if digits.starts_with('8') {
            format!("{}{}", self.country_code, digits)
        } else {
            digits
        }
    }
}

fn digits_only(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

/// [`ContactResolver::resolve`] with the default country code.
pub fn resolve_contact(menu: &DisplayMenu) -> Option<String> {
    ContactResolver::default().resolve(menu)
}

/// [`ContactResolver::build_url`] with the default messaging service.
pub fn build_contact_url(menu: &DisplayMenu) -> Option<String> {
    ContactResolver::default().build_url(menu)
}
