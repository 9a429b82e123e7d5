// ⚙️ Runtime configuration, read from the environment
//
//   EXPENSES_DB          SQLite file (default: expenses.db)
//   EXPENSES_BIND        listen address for the API server (default: 0.0.0.0:8001)
//   EXPENSES_CATEGORIES  comma-separated category labels (default: built-in set)

use crate::entities::CategoryRegistry;
use anyhow::{anyhow, Context, Result};
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DB_PATH_VAR: &str = "EXPENSES_DB";
pub const BIND_VAR: &str = "EXPENSES_BIND";
pub const CATEGORIES_VAR: &str = "EXPENSES_CATEGORIES";

pub const DEFAULT_DB_PATH: &str = "expenses.db";
pub const DEFAULT_BIND: &str = "0.0.0.0:8001";

#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: PathBuf,
    pub bind_addr: SocketAddr,
    pub categories: CategoryRegistry,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (tests pass a closure instead of touching the environment)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let db_path = lookup(DB_PATH_VAR)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH));

        let bind_raw = lookup(BIND_VAR).unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind_addr: SocketAddr = bind_raw
            .trim()
            .parse()
            .with_context(|| format!("{} is not a valid socket address: {}", BIND_VAR, bind_raw))?;

        let categories = match lookup(CATEGORIES_VAR) {
            Some(raw) => CategoryRegistry::from_labels(raw.split(','))
                .map_err(|e| anyhow!("{}: {}", CATEGORIES_VAR, e))?,
            None => CategoryRegistry::with_defaults(),
        };

        Ok(Config {
            db_path,
            bind_addr,
            categories,
        })
    }
}
