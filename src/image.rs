/// Turns the image references stored by the API (bare filenames, relative
/// paths or full URLs) into URLs a client can load.
#[derive(Debug, Clone)]
pub struct ImageResolver {
    base_url: String,
}

impl ImageResolver {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn resolve(&self, reference: &str) -> String {
        let reference = reference.trim();
        let lowered = reference.to_ascii_lowercase();
        if lowered.starts_with("http://")
            || lowered.starts_with("https://")
            || lowered.starts_with("data:")
            || self.base_url.is_empty()
        {
            return reference.to_string();
        }
        format!("{}/{}", self.base_url, reference.trim_start_matches('/'))
    }
}
