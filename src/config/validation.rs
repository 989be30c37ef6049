use crate::config::types::{CacheConfig, Config, CrawlerConfig, UserAgentConfig};
use crate::ConfigError;

/// Longest politeness pause accepted, in seconds
pub const MAX_DELAY_SECONDS: f64 = 3600.0;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_cache_config(&config.cache)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    // max_pages and per_domain_limit use 0 for "unlimited", so any value is valid

    if !config.delay_seconds.is_finite() || config.delay_seconds < 0.0 {
        return Err(ConfigError::Validation(format!(
            "delay-seconds must be a non-negative number, got {}",
            config.delay_seconds
        )));
    }

    if config.delay_seconds > MAX_DELAY_SECONDS {
        return Err(ConfigError::Validation(format!(
            "delay-seconds must be at most {}, got {}",
            MAX_DELAY_SECONDS, config.delay_seconds
        )));
    }

    if config.request_timeout_seconds < 1 {
        return Err(ConfigError::Validation(format!(
            "request-timeout-seconds must be >= 1, got {}",
            config.request_timeout_seconds
        )));
    }

    if config.max_retries > 10 {
        return Err(ConfigError::Validation(format!(
            "max-retries must be between 0 and 10, got {}",
            config.max_retries
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Crawler name doubles as the robots.txt product token: alphanumeric + hyphens only
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

    Ok(())
}

/// Validates cache configuration
fn validate_cache_config(config: &CacheConfig) -> Result<(), ConfigError> {
    if !config.enabled {
        return Ok(());
    }

    if config.path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "cache path cannot be empty when the cache is enabled".to_string(),
        ));
    }

    if config.ttl_seconds < 1 {
        return Err(ConfigError::Validation(format!(
            "cache ttl-seconds must be >= 1, got {}",
            config.ttl_seconds
        )));
    }

    Ok(())
}
