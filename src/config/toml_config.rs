use crate::core::{ConfigProvider, FailurePolicy};
use crate::utils::error::{Result, SitemapError};
use crate::utils::validation::{validate_provider, Validate};
use regex::{Captures, Regex};
use serde::Deserialize;
use std::fmt;
use std::path::Path;

pub const DEFAULT_API_VERSION: &str = "2023-07";
pub const DEFAULT_OUTPUT_PATH: &str = "sitemap.xml";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_PRODUCT_PAGE_SIZE: usize = 250;
pub const DEFAULT_COLLECTION_PAGE_SIZE: usize = 100;
pub const DEFAULT_IMAGE_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Deserialize)]
pub struct TomlConfig {
    pub store: StoreConfig,
    #[serde(default)]
    pub static_pages: StaticPagesConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Clone, Deserialize)]
pub struct StoreConfig {
    pub domain: String,
    pub access_token: String,
    pub api_version: Option<String>,
    pub api_endpoint: Option<String>,
    pub site_url: Option<String>,
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("domain", &self.domain)
            .field("access_token", &"<redacted>")
            .field("api_version", &self.api_version)
            .field("api_endpoint", &self.api_endpoint)
            .field("site_url", &self.site_url)
            .finish()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StaticPagesConfig {
    pub url: Option<String>,
    pub on_failure: Option<FailurePolicy>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogConfig {
    pub product_page_size: Option<usize>,
    pub collection_page_size: Option<usize>,
    pub image_page_size: Option<usize>,
    pub on_failure: Option<FailurePolicy>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HttpConfig {
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    pub verbose: Option<bool>,
    pub json: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| SitemapError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SHOPIFY_STOREFRONT_TOKEN})；未設定的保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| SitemapError::ConfigError {
            message: format!("invalid placeholder pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    pub fn verbose(&self) -> bool {
        self.logging.verbose.unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.logging.json.unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn store_domain(&self) -> &str {
        &self.store.domain
    }

    fn access_token(&self) -> &str {
        &self.store.access_token
    }

    fn api_version(&self) -> &str {
        self.store.api_version.as_deref().unwrap_or(DEFAULT_API_VERSION)
    }

    fn api_endpoint_override(&self) -> Option<&str> {
        self.store.api_endpoint.as_deref()
    }

    fn site_url_override(&self) -> Option<&str> {
        self.store.site_url.as_deref()
    }

    fn static_source_url(&self) -> Option<&str> {
        self.static_pages.url.as_deref()
    }

    fn output_path(&self) -> &str {
        self.output.path.as_deref().unwrap_or(DEFAULT_OUTPUT_PATH)
    }

    fn timeout_seconds(&self) -> u64 {
        self.http.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS)
    }

    fn product_page_size(&self) -> usize {
        self.catalog
            .product_page_size
            .unwrap_or(DEFAULT_PRODUCT_PAGE_SIZE)
    }

    fn collection_page_size(&self) -> usize {
        self.catalog
            .collection_page_size
            .unwrap_or(DEFAULT_COLLECTION_PAGE_SIZE)
    }

    fn image_page_size(&self) -> usize {
        self.catalog.image_page_size.unwrap_or(DEFAULT_IMAGE_PAGE_SIZE)
    }

    fn static_failure_policy(&self) -> FailurePolicy {
        self.static_pages.on_failure.unwrap_or(FailurePolicy::Degrade)
    }

    fn catalog_failure_policy(&self) -> FailurePolicy {
        self.catalog.on_failure.unwrap_or(FailurePolicy::Abort)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_minimal_config_uses_defaults() {
        let toml_content = r#"
[store]
domain = "theluxeveil.com"
access_token = "token-123"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(
            config.graphql_endpoint(),
            "https://theluxeveil.com/api/2023-07/graphql.json"
        );
        assert_eq!(config.site_url(), "https://theluxeveil.com");
        assert_eq!(config.static_source_url(), None);
        assert_eq!(config.output_path(), "sitemap.xml");
        assert_eq!(config.timeout_seconds(), 30);
        assert_eq!(config.product_page_size(), 250);
        assert_eq!(config.collection_page_size(), 100);
        assert_eq!(config.image_page_size(), 10);
        assert_eq!(config.static_failure_policy(), FailurePolicy::Degrade);
        assert_eq!(config.catalog_failure_policy(), FailurePolicy::Abort);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[store]
domain = "shop.example"
access_token = "token-123"
api_version = "2024-01"
site_url = "https://www.shop.example"

[static_pages]
url = "https://www.shop.example/static-pages.json"
on_failure = "abort"

[catalog]
product_page_size = 100
image_page_size = 20
on_failure = "degrade"

[output]
path = "public/sitemap.xml"

[http]
timeout_seconds = 10

[logging]
json = true
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(
            config.graphql_endpoint(),
            "https://shop.example/api/2024-01/graphql.json"
        );
        assert_eq!(config.site_url(), "https://www.shop.example");
        assert_eq!(config.static_failure_policy(), FailurePolicy::Abort);
        assert_eq!(config.catalog_failure_policy(), FailurePolicy::Degrade);
        assert_eq!(config.product_page_size(), 100);
        assert_eq!(config.image_page_size(), 20);
        assert_eq!(config.output_path(), "public/sitemap.xml");
        assert!(config.json_logs());
        assert!(!config.verbose());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("TEST_SITEMAP_TOKEN", "from-env");

        let toml_content = r#"
[store]
domain = "shop.example"
access_token = "${TEST_SITEMAP_TOKEN}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.access_token(), "from-env");

        std::env::remove_var("TEST_SITEMAP_TOKEN");
    }

    #[test]
    fn test_unresolved_token_fails_validation() {
        let toml_content = r#"
[store]
domain = "shop.example"
access_token = "${TEST_SITEMAP_TOKEN_NOT_SET}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        let err = config.validate().unwrap_err();
        assert!(!err.to_string().contains("TEST_SITEMAP_TOKEN_NOT_SET"));
    }

    #[test]
    fn test_invalid_static_url_fails_validation() {
        let toml_content = r#"
[store]
domain = "shop.example"
access_token = "token"

[static_pages]
url = "not-a-url"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_failure_policy_is_rejected() {
        let toml_content = r#"
[store]
domain = "shop.example"
access_token = "token"

[catalog]
on_failure = "retry"
"#;

        assert!(TomlConfig::from_toml_str(toml_content).is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[store]
domain = "file.example"
access_token = "token"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.store_domain(), "file.example");
    }
}
