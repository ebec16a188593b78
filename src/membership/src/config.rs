//! Resolver configuration

use serde::{Deserialize, Serialize};

/// Environment variable toggling name trimming
pub const ENV_TRIM_NAMES: &str = "ADSIM_TRIM_NAMES";

/// Environment variable holding the maximum principal name length
pub const ENV_MAX_NAME_LEN: &str = "ADSIM_MAX_NAME_LEN";

/// Name validation settings applied by `MembershipGraph`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Strip surrounding whitespace from names before validation and lookup
    #[serde(default = "default_true")]
    pub trim_names: bool,

    /// Maximum name length in characters (`None` = unlimited)
    #[serde(default)]
    pub max_name_len: Option<usize>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            trim_names: true,
            max_name_len: None,
        }
    }
}

impl ResolverConfig {
    /// Load configuration from the environment, falling back to defaults
    ///
    /// - `ADSIM_TRIM_NAMES` - `true` / `false` (default: true)
    /// - `ADSIM_MAX_NAME_LEN` - positive integer (default: unlimited)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub(crate) fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let trim_names = lookup(ENV_TRIM_NAMES)
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.trim_names);

        let max_name_len = lookup(ENV_MAX_NAME_LEN)
            .and_then(|s| s.trim().parse::<usize>().ok())
            .filter(|len| *len > 0)
            .or(defaults.max_name_len);

        Self {
            trim_names,
            max_name_len,
        }
    }

    /// Disable trimming
    pub fn without_trimming(mut self) -> Self {
        self.trim_names = false;
        self
    }

    /// Limit name length
    pub fn with_max_name_len(mut self, max: usize) -> Self {
        self.max_name_len = Some(max);
        self
    }
}

fn default_true() -> bool {
    true
}
