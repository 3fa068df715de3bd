use crate::data::FacultyId;
use std::env;
use std::net::{AddrParseError, SocketAddr};
use thiserror::Error;

pub const ADDR_VAR: &str = "TIMETABLE_ADDR";
pub const FACULTY_POOL_VAR: &str = "TIMETABLE_FACULTY_POOL";

const DEFAULT_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_FACULTY_POOL: &str = "F1,F2,F3";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {var} '{value}': {source}")]
    InvalidAddr {
        var: &'static str,
        value: String,
        #[source]
        source: AddrParseError,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    /// Substitutes offered when neither the request nor the tenant's users
    /// supply any.
    pub default_faculty_pool: Vec<FacultyId>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            default_faculty_pool: parse_pool(DEFAULT_FACULTY_POOL),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let addr_value = env::var(ADDR_VAR).unwrap_or_else(|_| DEFAULT_ADDR.to_string());
        let addr = addr_value.parse::<SocketAddr>().map_err(|source| ConfigError::InvalidAddr {
            var: ADDR_VAR,
            value: addr_value.clone(),
            source,
        })?;
        let pool = env::var(FACULTY_POOL_VAR).unwrap_or_else(|_| DEFAULT_FACULTY_POOL.to_string());

        Ok(Self {
            addr,
            default_faculty_pool: parse_pool(&pool),
        })
    }
}

/// Splits a comma-separated list, dropping blanks.
pub fn parse_pool(raw: &str) -> Vec<FacultyId> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pool() {
        assert_eq!(parse_pool(" F1, F2 ,,F3 "), vec!["F1", "F2", "F3"]);
        assert!(parse_pool("").is_empty());
    }

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.addr.to_string(), DEFAULT_ADDR);
        assert_eq!(config.default_faculty_pool, vec!["F1", "F2", "F3"]);
    }
}
