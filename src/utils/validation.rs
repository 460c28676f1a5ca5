use crate::domain::ports::ConfigProvider;
use crate::utils::error::{Result, SitemapError};
use url::Url;

/// Largest `first:` page size the Storefront API accepts.
pub const MAX_PAGE_SIZE: usize = 250;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(SitemapError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(SitemapError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(SitemapError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(SitemapError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(SitemapError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(SitemapError::MissingConfigError {
            field: field_name.to_string(),
        });
    }
    Ok(())
}

/// Rejects values that are still `${VAR}` placeholders after substitution.
pub fn validate_resolved(field_name: &str, value: &str) -> Result<()> {
    if value.contains("${") {
        return Err(SitemapError::ConfigValidationError {
            field: field_name.to_string(),
            message: format!("unresolved environment placeholder in '{}'", value),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(SitemapError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// Checks shared by every [`ConfigProvider`].
pub fn validate_provider<C: ConfigProvider + ?Sized>(config: &C) -> Result<()> {
    validate_non_empty_string("store_domain", config.store_domain())?;
    validate_non_empty_string("access_token", config.access_token())?;
    // Never echo the token itself.
    if config.access_token().contains("${") {
        return Err(SitemapError::ConfigValidationError {
            field: "access_token".to_string(),
            message: "unresolved environment placeholder".to_string(),
        });
    }
    validate_resolved("store_domain", config.store_domain())?;
    validate_url("api_endpoint", &config.graphql_endpoint())?;
    validate_url("site_url", &config.site_url())?;
    if let Some(url) = config.static_source_url() {
        validate_resolved("static_source_url", url)?;
        validate_url("static_source_url", url)?;
    }
    validate_path("output_path", config.output_path())?;
    validate_range("timeout_seconds", config.timeout_seconds(), 1, 600)?;
    validate_range("product_page_size", config.product_page_size(), 1, MAX_PAGE_SIZE)?;
    validate_range(
        "collection_page_size",
        config.collection_page_size(),
        1,
        MAX_PAGE_SIZE,
    )?;
    validate_range("image_page_size", config.image_page_size(), 1, MAX_PAGE_SIZE)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("static_source_url", "https://example.com/pages.json").is_ok());
        assert!(validate_url("static_source_url", "http://example.com").is_ok());
        assert!(validate_url("static_source_url", "").is_err());
        assert!(validate_url("static_source_url", "invalid-url").is_err());
        assert!(validate_url("static_source_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("product_page_size", 250, 1, MAX_PAGE_SIZE).is_ok());
        assert!(validate_range("product_page_size", 0, 1, MAX_PAGE_SIZE).is_err());
        assert!(validate_range("product_page_size", 251, 1, MAX_PAGE_SIZE).is_err());
    }

    #[test]
    fn test_validate_resolved() {
        assert!(validate_resolved("store_domain", "shop.example").is_ok());
        assert!(validate_resolved("store_domain", "${SHOPIFY_DOMAIN}").is_err());
    }

    #[test]
    fn test_validate_path() {
        assert!(validate_path("output_path", "sitemap.xml").is_ok());
        assert!(validate_path("output_path", "  ").is_err());
        assert!(validate_path("output_path", "a\0b").is_err());
    }
}
