/// Timing and retry configuration for the content script
use serde::{Deserialize, Serialize};

/// localStorage key that may hold a JSON override of [`FilterConfig`]
pub const CONFIG_STORAGE_KEY: &str = "yt-unwatched-config";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Interval of the location poll
    pub nav_poll_interval_ms: u32,
    /// Debounce window applied to navigation checks
    pub nav_debounce_ms: u32,
    /// Debounce window applied to DOM mutation bursts
    pub mutation_debounce_ms: u32,
    /// Debounce window applied to scroll events
    pub scroll_debounce_ms: u32,
    /// Wait before the toggle button is injected after load or navigation
    pub inject_delay_ms: u32,
    /// Wait between injection and the first filter pass after navigation
    pub post_inject_filter_delay_ms: u32,
    /// Wait between a toggle and its filter pass
    pub settle_delay_ms: u32,
    /// Wait between failed button insertions
    pub retry_delay_ms: u32,
    /// Button insertion attempts before giving up
    pub max_insert_attempts: u32,
    /// Force every tab flag to OFF on each page load
    pub reset_on_load: bool,
}

impl Default for FilterConfig {
    fn default() -> Self {
        FilterConfig {
            nav_poll_interval_ms: 1000,
            nav_debounce_ms: 500,
            mutation_debounce_ms: 300,
            scroll_debounce_ms: 300,
            inject_delay_ms: 1000,
            post_inject_filter_delay_ms: 500,
            settle_delay_ms: 100,
            retry_delay_ms: 1000,
            max_insert_attempts: 15,
            reset_on_load: false,
        }
    }
}

impl FilterConfig {
    /// Parse an override, falling back to defaults when absent or malformed
    pub fn from_override(raw: Option<&str>) -> FilterConfig {
        match raw {
            None => FilterConfig::default(),
            Some(json) => match serde_json::from_str::<FilterConfig>(json) {
                Ok(config) => config.sanitized(),
                Err(e) => {
                    log::warn!("Unwatched filter: ignoring malformed config override: {}", e);
                    FilterConfig::default()
                }
            },
        }
    }

    // A zero ceiling would never insert the button at all.
    fn sanitized(mut self) -> FilterConfig {
        if self.max_insert_attempts == 0 {
            self.max_insert_attempts = 1;
        }
        self
    }
}
