//! Engine configuration
//!
//! Centralizes pagination bounds, defaults and the strict-mode switch.
//! Defaults live here as explicit values rather than fallbacks buried in
//! parsing logic.

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Configuration for parsing and pagination behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagerConfig {
    /// Maximum allowed items per page
    pub max_per_page: u64,
    /// Default items per page when not specified
    pub default_per_page: u64,
    /// Default page number when not specified
    pub default_page: u64,
    /// Minimum allowed items per page
    pub min_per_page: u64,
    /// If true, unknown filter/sort fields fail the request instead of
    /// being silently skipped
    pub strict_mode: bool,
    /// If false, pages beyond `max_page` are rejected
    pub allow_deep_pagination: bool,
    /// Maximum allowed page number, `None` for unlimited
    pub max_page: Option<u64>,
}

impl Default for PagerConfig {
    fn default() -> Self {
        Self {
            max_per_page: 100,
            default_per_page: 10,
            default_page: 1,
            min_per_page: 1,
            strict_mode: false,
            allow_deep_pagination: true,
            max_page: None,
        }
    }
}

impl PagerConfig {
    /// Strict mode configuration: unknown fields fail the request.
    pub fn strict() -> Self {
        Self {
            strict_mode: true,
            ..Self::default()
        }
    }

    /// Configuration that limits deep pagination.
    pub fn limited_pagination(max_page: u64, max_per_page: u64) -> Self {
        Self {
            max_page: Some(max_page),
            max_per_page,
            allow_deep_pagination: false,
            ..Self::default()
        }
    }

    /// Configuration for high-volume APIs.
    pub fn high_volume(max_per_page: u64, default_per_page: u64) -> Self {
        Self {
            max_per_page,
            default_per_page,
            ..Self::default()
        }
    }

    /// Check the configuration values for consistency.
    pub fn validate(&self) -> Result<(), Error> {
        if self.max_per_page < 1 {
            return Err(Error::Config("max_per_page must be >= 1".into()));
        }
        if self.default_per_page < 1 {
            return Err(Error::Config("default_per_page must be >= 1".into()));
        }
        if self.default_per_page > self.max_per_page {
            return Err(Error::Config(
                "default_per_page cannot exceed max_per_page".into(),
            ));
        }
        if self.min_per_page < 1 {
            return Err(Error::Config("min_per_page must be >= 1".into()));
        }
        if self.min_per_page > self.max_per_page {
            return Err(Error::Config(
                "min_per_page cannot exceed max_per_page".into(),
            ));
        }
        if self.default_page < 1 {
            return Err(Error::Config("default_page must be >= 1".into()));
        }
        if let Some(max_page) = self.max_page
            && max_page < 1
        {
            return Err(Error::Config("max_page must be >= 1 or None".into()));
        }
        Ok(())
    }

    /// Validate and constrain a page number.
    ///
    /// Pages below 1 fall back to the default page; pages beyond `max_page`
    /// are rejected when deep pagination is disallowed.
    pub fn validate_page(&self, page: u64) -> Result<u64, Error> {
        if page < 1 {
            return Ok(self.default_page);
        }
        if !self.allow_deep_pagination
            && let Some(max_page) = self.max_page
            && page > max_page
        {
            return Err(Error::invalid_parameter(
                "page",
                page.to_string(),
                format!("exceeds maximum allowed page {}", max_page),
            ));
        }
        Ok(page)
    }

    /// Constrain items per page to the configured bounds.
    pub fn validate_per_page(&self, per_page: u64) -> u64 {
        per_page.clamp(self.min_per_page, self.max_per_page)
    }
}
