use crate::config::types::DocketConfig;
use crate::errors::ConfigError;

/// Validate a merged configuration.
///
/// Checks that the base URL uses an HTTP scheme and that numeric settings
/// are non-zero where zero would make the client unusable.
pub fn validate_config(config: &DocketConfig) -> Result<(), ConfigError> {
    if let Some(url) = &config.server.base_url
        && !(url.starts_with("http://") || url.starts_with("https://"))
    {
        return Err(ConfigError::InvalidBaseUrl { url: url.clone() });
    }

    if config.server.timeout_secs == Some(0) {
        return Err(ConfigError::InvalidConfiguration {
            message: "server.timeout_secs must be greater than 0".to_string(),
        });
    }

    if config.filters.per_page == Some(0) {
        return Err(ConfigError::InvalidConfiguration {
            message: "filters.per_page must be greater than 0".to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&DocketConfig::default()).is_ok());
    }

    #[test]
    fn test_rejects_non_http_url() {
        let mut config = DocketConfig::default();
        config.server.base_url = Some("localhost:8000".to_string());
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn test_rejects_zero_timeout_and_page_size() {
        let mut config = DocketConfig::default();
        config.server.timeout_secs = Some(0);
        assert!(validate_config(&config).is_err());

        let mut config = DocketConfig::default();
        config.filters.per_page = Some(0);
        assert!(validate_config(&config).is_err());
    }
}
