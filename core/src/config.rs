//! Binder configuration.
//!
//! There is no process-global state: the zone used for zone-less timestamps
//! is carried by a [`BindConfig`] threaded through every binding call.

use chrono_tz::Tz;
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur while loading a [`BindConfig`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The configured default zone is not a known IANA zone.
    #[error("{variable}: unknown time zone `{zone}`")]
    UnknownZone {
        /// Where the value came from.
        variable: &'static str,
        /// The rejected value.
        zone: String,
    },
}

/// Settings shared by every field of a binding call.
///
/// # Examples
///
/// ```
/// use formbind_core::BindConfig;
///
/// let config = BindConfig::default().with_default_zone(chrono_tz::Europe::Berlin);
/// assert_eq!(config.default_zone, chrono_tz::Europe::Berlin);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BindConfig {
    /// Zone for timestamps that carry no offset and have no `time_location`.
    pub default_zone: Tz,
}

impl BindConfig {
    /// Environment variable read by [`BindConfig::from_env`].
    pub const DEFAULT_ZONE_VAR: &'static str = "FORMBIND_DEFAULT_ZONE";

    /// Configuration interpreting zone-less timestamps as UTC.
    #[must_use]
    pub const fn utc() -> Self {
        Self {
            default_zone: Tz::UTC,
        }
    }

    /// Replace the default zone.
    #[must_use]
    pub const fn with_default_zone(mut self, zone: Tz) -> Self {
        self.default_zone = zone;
        self
    }

    /// Load from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownZone`] when `FORMBIND_DEFAULT_ZONE`
    /// names an unknown zone.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load from an arbitrary variable lookup; unset variables keep defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownZone`] for an unknown zone name.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(zone) = lookup(Self::DEFAULT_ZONE_VAR) {
            config.default_zone = zone.parse().map_err(|_| ConfigError::UnknownZone {
                variable: Self::DEFAULT_ZONE_VAR,
                zone,
            })?;
            tracing::debug!(zone = %config.default_zone, "default time zone configured");
        }
        Ok(config)
    }
}

impl Default for BindConfig {
    fn default() -> Self {
        Self::utc()
    }
}
