// Widget and service configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_HEADING: &str = "Book Your Stay";

/// Settings the booking widget is placed with.
///
/// `flow_api_name` switches the post-booking behaviour from a plain message to
/// a workflow hand-off; `campaign_type` switches on date-window restrictions.
/// Blank values count as not configured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    pub heading: String,
    pub flow_api_name: Option<String>,
    pub campaign_type: Option<String>,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            heading: DEFAULT_HEADING.to_string(),
            flow_api_name: None,
            campaign_type: None,
        }
    }
}

impl WidgetConfig {
    pub fn flow_api_name(&self) -> Option<&str> {
        non_blank(&self.flow_api_name)
    }

    pub fn campaign_type(&self) -> Option<&str> {
        non_blank(&self.campaign_type)
    }

    pub fn campaign_aware(&self) -> bool {
        self.campaign_type().is_some()
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|value| !value.is_empty())
}

// Connection settings for HttpBookingApi
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpClientConfig {
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_timeout_ms() -> u64 {
    10_000
}

impl HttpClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: String::new(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub widget: WidgetConfig,
    pub service: HttpClientConfig,
}

impl AppConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let base_url = self.service.base_url.trim();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "service.base_url must be an http(s) URL, got '{}'",
                self.service.base_url
            )));
        }
        if self.service.timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "service.timeout_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
