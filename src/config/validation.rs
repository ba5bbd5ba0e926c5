use crate::config::types::{ClassifierConfig, Config, CrawlerConfig, RenderConfig, UserAgentConfig};
use crate::url::{parse_seed, SegmentPattern};
use crate::{ConfigError, ConfigResult};

/// Validates the entire configuration
///
/// An empty seed list is accepted here because seeds may also come from the
/// command line; the coordinator rejects an empty batch.
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_seeds(&config.seeds)?;
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_classifier_config(&config.classifier)?;
    validate_render_config(&config.render)?;
    Ok(())
}

/// Validates that every seed is an absolute HTTP(S) URL
pub fn validate_seeds(seeds: &[String]) -> ConfigResult<()> {
    for seed in seeds {
        parse_seed(seed).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", seed, e))
        })?;
    }
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> ConfigResult<()> {
    if config.concurrency < 1 || config.concurrency > 100 {
        return Err(ConfigError::Validation(format!(
            "concurrency must be between 1 and 100, got {}",
            config.concurrency
        )));
    }

    if config.request_timeout == 0 {
        return Err(ConfigError::Validation(
            "request_timeout must be > 0ms".to_string(),
        ));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> ConfigResult<()> {
    if config.enabled && config.value.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user agent value cannot be empty when enabled".to_string(),
        ));
    }

    Ok(())
}

/// Validates classifier patterns and exclusions
fn validate_classifier_config(config: &ClassifierConfig) -> ConfigResult<()> {
    if config.patterns.is_empty() {
        return Err(ConfigError::Validation(
            "classifier needs at least one pattern".to_string(),
        ));
    }

    for pattern in &config.patterns {
        SegmentPattern::parse(pattern)?;
    }

    if config.exclusions.iter().any(|e| e.is_empty()) {
        return Err(ConfigError::Validation(
            "exclusion substrings cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates rendered-phase timing
fn validate_render_config(config: &RenderConfig) -> ConfigResult<()> {
    if config.navigation_timeout == 0 {
        return Err(ConfigError::Validation(
            "navigation_timeout must be > 0ms".to_string(),
        ));
    }

    if config.idle_window == 0 || config.idle_window > config.navigation_timeout {
        return Err(ConfigError::Validation(format!(
            "idle_window must be between 1ms and navigation_timeout ({}ms), got {}ms",
            config.navigation_timeout, config.idle_window
        )));
    }

    if config.max_scroll_iterations < 1 {
        return Err(ConfigError::Validation(
            "max_scroll_iterations must be >= 1".to_string(),
        ));
    }

    Ok(())
}
