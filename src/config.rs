use crate::error::{Error, Result};
use secrecy::SecretString;
use std::path::PathBuf;

pub const DEFAULT_LEGISTAR_BASE_URL: &str = "https://webapi.legistar.com/v1/sfgov";
pub const DEFAULT_RECORD_VIEWER_URL: &str = "https://sfgov.legistar.com/LegislationDetail.aspx";
pub const DEFAULT_NOTION_API_URL: &str = "https://api.notion.com/v1/pages";
pub const DEFAULT_NOTION_VERSION: &str = "2022-06-28";

/// What to do with a matter id seen earlier in the same fetched list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Process only the first occurrence of each matter id
    #[default]
    SkipSeen,
    /// Process every entry, exporting repeats again
    ExportAll,
}

impl From<&str> for DuplicatePolicy {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "export" | "export-all" | "all" => DuplicatePolicy::ExportAll,
            _ => DuplicatePolicy::SkipSeen,
        }
    }
}

/// Configuration for one monitor run
#[derive(Debug)]
pub struct Config {
    pub legistar_base_url: String,
    pub record_viewer_url: String,
    pub notion_api_url: String,
    pub notion_version: String,
    pub notion_token: Option<SecretString>,
    pub notion_database_id: Option<String>,
    pub duplicate_policy: DuplicatePolicy,
    pub rules_path: Option<PathBuf>,
}

impl Config {
    /// Create a configuration with the San Francisco defaults and no credentials
    pub fn new() -> Self {
        Self {
            legistar_base_url: DEFAULT_LEGISTAR_BASE_URL.to_string(),
            record_viewer_url: DEFAULT_RECORD_VIEWER_URL.to_string(),
            notion_api_url: DEFAULT_NOTION_API_URL.to_string(),
            notion_version: DEFAULT_NOTION_VERSION.to_string(),
            notion_token: None,
            notion_database_id: None,
            duplicate_policy: DuplicatePolicy::SkipSeen,
            rules_path: None,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        use secrecy::ExposeSecret;

        let token_present = self
            .notion_token
            .as_ref()
            .is_some_and(|t| !t.expose_secret().trim().is_empty());
        let database_present = self
            .notion_database_id
            .as_deref()
            .is_some_and(|id| !id.trim().is_empty());

        if !token_present || !database_present {
            return Err(Error::Config(
                "Missing NOTION_TOKEN or NOTION_DATABASE_ID".to_string(),
            ));
        }

        for (name, value) in [
            ("Legistar base URL", &self.legistar_base_url),
            ("record viewer URL", &self.record_viewer_url),
            ("Notion API URL", &self.notion_api_url),
            ("Notion version", &self.notion_version),
        ] {
            if value.trim().is_empty() {
                return Err(Error::Config(format!("{} must not be empty", name)));
            }
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for creating configurations
#[derive(Debug)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self {
            config: Config::new(),
        }
    }

    /// Set the Legistar client API root, e.g. `https://webapi.legistar.com/v1/sfgov`
    pub fn legistar_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.legistar_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the public detail page used to build record links
    pub fn record_viewer_url(mut self, url: impl Into<String>) -> Self {
        self.config.record_viewer_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn notion_api_url(mut self, url: impl Into<String>) -> Self {
        self.config.notion_api_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn notion_version(mut self, version: impl Into<String>) -> Self {
        self.config.notion_version = version.into();
        self
    }

    pub fn notion_token(mut self, token: impl Into<String>) -> Self {
        self.config.notion_token = Some(SecretString::from(token.into()));
        self
    }

    pub fn notion_database_id(mut self, id: impl Into<String>) -> Self {
        self.config.notion_database_id = Some(id.into());
        self
    }

    /// Set the duplicate policy
    pub fn duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.config.duplicate_policy = policy;
        self
    }

    /// Load rule tables from this YAML file instead of the built-in ones
    pub fn rules_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.rules_path = Some(path.into());
        self
    }

    /// Build the final configuration
    pub fn build(self) -> Result<Config> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_requires_both_credentials() {
        assert!(matches!(ConfigBuilder::new().build(), Err(Error::Config(_))));
        assert!(matches!(
            ConfigBuilder::new().notion_token("secret").build(),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            ConfigBuilder::new().notion_database_id("db").build(),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            ConfigBuilder::new()
                .notion_token("  ")
                .notion_database_id("db")
                .build(),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn build_with_credentials_uses_defaults() {
        let config = ConfigBuilder::new()
            .notion_token("secret")
            .notion_database_id("db")
            .build()
            .unwrap();
        assert_eq!(config.legistar_base_url, DEFAULT_LEGISTAR_BASE_URL);
        assert_eq!(config.notion_version, DEFAULT_NOTION_VERSION);
        assert_eq!(config.duplicate_policy, DuplicatePolicy::SkipSeen);
        assert!(config.rules_path.is_none());
    }

    #[test]
    fn urls_are_trimmed() {
        let config = ConfigBuilder::new()
            .legistar_base_url("https://webapi.legistar.com/v1/oakland/")
            .record_viewer_url("https://oakland.legistar.com/LegislationDetail.aspx/")
            .notion_token("secret")
            .notion_database_id("db")
            .build()
            .unwrap();
        assert_eq!(
            config.legistar_base_url,
            "https://webapi.legistar.com/v1/oakland"
        );
        assert_eq!(
            config.record_viewer_url,
            "https://oakland.legistar.com/LegislationDetail.aspx"
        );
    }

    #[test]
    fn empty_base_url_is_rejected() {
        let result = ConfigBuilder::new()
            .legistar_base_url("/")
            .notion_token("secret")
            .notion_database_id("db")
            .build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn duplicate_policy_from_str() {
        assert_eq!(DuplicatePolicy::from("export"), DuplicatePolicy::ExportAll);
        assert_eq!(DuplicatePolicy::from("ALL"), DuplicatePolicy::ExportAll);
        assert_eq!(DuplicatePolicy::from("skip"), DuplicatePolicy::SkipSeen);
        assert_eq!(DuplicatePolicy::from("anything"), DuplicatePolicy::SkipSeen);
    }

    #[test]
    fn builder_sets_duplicate_policy() {
        let config = ConfigBuilder::new()
            .duplicate_policy(DuplicatePolicy::ExportAll)
            .notion_token("secret")
            .notion_database_id("db")
            .build()
            .unwrap();
        assert_eq!(config.duplicate_policy, DuplicatePolicy::ExportAll);
    }

    #[test]
    fn debug_output_redacts_the_token() {
        let config = ConfigBuilder::new()
            .notion_token("super-secret-token")
            .notion_database_id("db")
            .build()
            .unwrap();
        assert!(!format!("{:?}", config).contains("super-secret-token"));
    }
}
