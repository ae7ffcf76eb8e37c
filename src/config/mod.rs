#[cfg(feature = "cli")]
pub mod cli;
pub mod profile;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use profile::SiteProfile;

use crate::domain::ports::ConfigProvider;
use crate::utils::error::{Result, SchemaError};
use crate::utils::validation::{self, Validate};
use url::Url;

/// Resolved settings for one run over a site directory.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub input_path: String,
    pub output_path: String,
    /// Public URL the site is served from; page URLs are joined onto it.
    pub base_url: Option<Url>,
    pub profile: SiteProfile,
    pub stamp_year: bool,
}

impl SiteConfig {
    pub fn new(input_path: impl Into<String>, output_path: impl Into<String>) -> Self {
        Self {
            input_path: input_path.into(),
            output_path: output_path.into(),
            base_url: None,
            profile: SiteProfile::default(),
            stamp_year: false,
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        validation::validate_url("base_url", base_url)?;
        self.base_url = Some(Url::parse(base_url)?);
        Ok(self)
    }

    pub fn with_profile(mut self, profile: SiteProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn with_stamp_year(mut self, stamp_year: bool) -> Self {
        self.stamp_year = stamp_year;
        self
    }
}

impl ConfigProvider for SiteConfig {
    fn input_path(&self) -> &str {
        &self.input_path
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn base_url(&self) -> Option<&Url> {
        self.base_url.as_ref()
    }

    fn profile(&self) -> &SiteProfile {
        &self.profile
    }

    fn stamp_year(&self) -> bool {
        self.stamp_year
    }
}

impl Validate for SiteConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("input_path", &self.input_path)?;
        validation::validate_path("output_path", &self.output_path)?;

        if let Some(url) = &self.base_url {
            if !matches!(url.scheme(), "http" | "https") {
                return Err(SchemaError::InvalidConfigValueError {
                    field: "base_url".to_string(),
                    value: url.to_string(),
                    reason: format!("Unsupported URL scheme: {}", url.scheme()),
                });
            }
        }

        self.profile.validate()
    }
}
