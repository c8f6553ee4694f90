use crate::config::types::{Config, CrawlerConfig, OutputConfig, TargetConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Upper bound on simultaneous fetches against a single site
const MAX_CONCURRENT_FETCHES: usize = 32;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    validate_target_config(&config.target)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max-pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    if config.max_concurrent_fetches < 1 || config.max_concurrent_fetches > MAX_CONCURRENT_FETCHES
    {
        return Err(ConfigError::Validation(format!(
            "max-concurrent-fetches must be between 1 and {}, got {}",
            MAX_CONCURRENT_FETCHES, config.max_concurrent_fetches
        )));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "request-timeout-secs must be >= 1".to_string(),
        ));
    }

    if config.connect_timeout_secs < 1 || config.connect_timeout_secs > config.request_timeout_secs
    {
        return Err(ConfigError::Validation(format!(
            "connect-timeout-secs must be between 1 and request-timeout-secs ({}), got {}",
            config.request_timeout_secs, config.connect_timeout_secs
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler-name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler-name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    if config.crawler_version.trim().is_empty() {
        return Err(ConfigError::Validation(
            "crawler-version cannot be empty".to_string(),
        ));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact-url: {}", e)))?;

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database-path cannot be empty".to_string(),
        ));
    }

    if config.report_path.is_empty() {
        return Err(ConfigError::Validation(
            "report-path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates the optional target site
fn validate_target_config(config: &TargetConfig) -> Result<(), ConfigError> {
    let Some(target) = &config.url else {
        return Ok(());
    };

    let url = Url::parse(target)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid target url '{}': {}", target, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "Target url '{}' must use http or https",
            target
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_concurrency_bounds() {
        let mut config = Config::default();
        config.crawler.max_concurrent_fetches = 0;
        assert!(validate(&config).is_err());

        config.crawler.max_concurrent_fetches = MAX_CONCURRENT_FETCHES + 1;
        assert!(validate(&config).is_err());

        config.crawler.max_concurrent_fetches = MAX_CONCURRENT_FETCHES;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_validate_timeouts() {
        let mut config = Config::default();
        config.crawler.request_timeout_secs = 5;
        config.crawler.connect_timeout_secs = 10;
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));

        config.crawler.connect_timeout_secs = 5;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_zero_politeness_delay_allowed() {
        let mut config = Config::default();
        config.crawler.politeness_delay_ms = 0;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_validate_crawler_name() {
        let mut config = Config::default();
        config.user_agent.crawler_name = "Bad Name!".to_string();
        assert!(validate(&config).is_err());

        config.user_agent.crawler_name = String::new();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_validate_contact_url() {
        let mut config = Config::default();
        config.user_agent.contact_url = "not a url".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));
    }

    #[test]
    fn test_validate_target_url() {
        let mut config = Config::default();
        config.target.url = Some("ftp://example.com/".to_string());
        assert!(matches!(validate(&config), Err(ConfigError::Validation(_))));

        config.target.url = Some("https://example.com/".to_string());
        assert!(validate(&config).is_ok());
    }
}
