//! Planner configuration.
//!
//! Three tunables with defaults, loadable from a struct or environment
//! variables and validated via a `Validate`-derived struct plus a `from_env`
//! constructor that falls back to defaults per field.

use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;
use validator::Validate;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("parse error for {field}: {value:?} - {source}")]
    Parse {
        field: String,
        value: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Planner tunables. All three guard the length of the rendered
/// `typeClause`/tag clauses in the [`crate::index_emitter`]; exceeding either
/// is a [`crate::error::PlannerError::LimitsExceeded`].
#[derive(Clone, Debug, Validate, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Maximum candidate-set size a single plan is expected to return.
    #[validate(range(min = 1, message = "max result size must be positive"))]
    pub max_result_size: usize,

    /// Maximum length, in bytes, of the rendered `typeClause`.
    #[validate(range(min = 1, message = "max type clause length must be positive"))]
    pub max_query_str_length_types: usize,

    /// Maximum length, in bytes, of the rendered tag/filter clause.
    #[validate(range(min = 1, message = "max tag clause length must be positive"))]
    pub max_query_str_length_tags: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_result_size: 150,
            max_query_str_length_types: 512,
            max_query_str_length_tags: 512,
        }
    }
}

impl PlannerConfig {
    /// Build from environment variables, falling back to [`Default`] per
    /// field when unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            max_result_size: parse_env_var("HSP_MAX_RESULT_SIZE", defaults.max_result_size)?,
            max_query_str_length_types: parse_env_var(
                "HSP_MAX_QUERY_STR_LENGTH_TYPES",
                defaults.max_query_str_length_types,
            )?,
            max_query_str_length_tags: parse_env_var(
                "HSP_MAX_QUERY_STR_LENGTH_TAGS",
                defaults.max_query_str_length_tags,
            )?,
        };
        config.validate()?;
        Ok(config)
    }
}

fn parse_env_var<T: std::str::FromStr + ToString>(key: &str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(value) => value.parse().map_err(|e| ConfigError::Parse {
            field: key.to_string(),
            value,
            source: Box::new(e),
        }),
        Err(_) => Ok(default),
    }
}
