use crate::config::{SiteConfig, SiteProfile};
use crate::utils::error::Result;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "site-schema")]
#[command(about = "Injects schema.org JSON-LD into the pages of a static site")]
pub struct CliConfig {
    /// Directory containing the rendered HTML pages
    #[arg(short, long, default_value = "./site")]
    pub input: String,

    /// Where processed pages are written (defaults to rewriting the input in place)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Public URL the site is served from, e.g. https://www.example.com
    #[arg(long)]
    pub base_url: Option<String>,

    /// TOML profile with business details and catalogs
    #[arg(long)]
    pub profile: Option<String>,

    /// Replace the text of #year elements with the current year
    #[arg(long)]
    pub stamp_year: bool,

    /// Process pages and print the report without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Print the built-in profile as TOML and exit
    #[arg(long)]
    pub print_profile: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_log: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    pub fn to_site_config(&self) -> Result<SiteConfig> {
        let profile = match &self.profile {
            Some(path) => {
                tracing::info!("📁 Loading profile from: {}", path);
                SiteProfile::from_file(path)?
            }
            None => SiteProfile::default(),
        };

        let output = self.output.clone().unwrap_or_else(|| self.input.clone());
        let mut config = SiteConfig::new(self.input.clone(), output)
            .with_profile(profile)
            .with_stamp_year(self.stamp_year);

        if let Some(base_url) = &self.base_url {
            config = config.with_base_url(base_url)?;
        }

        Ok(config)
    }
}
