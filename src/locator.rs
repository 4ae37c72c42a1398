use crate::config::StudioConfig;

/// URL template for the hosted image service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatorTemplate {
    base_url: String,
    model: String,
    safe: bool,
    api_key: Option<String>,
}

impl LocatorTemplate {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            safe: true,
            api_key: None,
        }
    }

    pub fn from_config(config: &StudioConfig) -> Self {
        let template = Self::new(&config.base_url, &config.model).with_safe(config.safe);
        match &config.api_key {
            Some(key) => template.with_api_key(key),
            None => template,
        }
    }

    pub fn with_safe(mut self, safe: bool) -> Self {
        self.safe = safe;
        self
    }

    /// Optional override; the default flow never sets it.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn locator(&self, prompt: &str, width: u32, height: u32, seed: i64) -> String {
        let mut url = format!(
            "{}/prompt/{}?width={}&height={}&model={}&n=1&safe={}&seed={}",
            self.base_url,
            urlencoding::encode(prompt),
            width,
            height,
            urlencoding::encode(&self.model),
            self.safe,
            seed
        );
        if let Some(key) = &self.api_key {
            url.push_str("&token=");
            url.push_str(&urlencoding::encode(key));
        }
        url
    }
}

impl Default for LocatorTemplate {
    fn default() -> Self {
        Self::from_config(&StudioConfig::default())
    }
}
