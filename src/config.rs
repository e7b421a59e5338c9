// src/config.rs
//
// Runtime configuration from the environment (and an optional .env file)

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Context;

use crate::db::{default_database_path, DEFAULT_POOL_SIZE};

/// Which backend serves the catalog
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum RepositoryKind {
    Memory,
    Database,
}

impl FromStr for RepositoryKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "database" => Ok(Self::Database),
            other => {
                anyhow::bail!("unknown repository kind '{other}', expected memory or database")
            }
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub repository: RepositoryKind,
    pub data_path: PathBuf,
    pub database_path: PathBuf,
    /// Truncate and reload an already populated database
    pub repopulate: bool,
    pub pool_size: u32,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any variable source
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let repository = match var("MOVIEHUB_REPOSITORY") {
            Some(raw) => raw.parse().context("MOVIEHUB_REPOSITORY")?,
            None => RepositoryKind::Memory,
        };

        let data_path = var("MOVIEHUB_DATA_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("data"));

        let database_path = match var("MOVIEHUB_DATABASE_PATH") {
            Some(path) => PathBuf::from(path),
            None => default_database_path().context("MOVIEHUB_DATABASE_PATH")?,
        };

        let repopulate = var("MOVIEHUB_REPOPULATE")
            .map(|v| v.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let pool_size: u32 = match var("MOVIEHUB_POOL_SIZE") {
            Some(raw) => raw.trim().parse().context("MOVIEHUB_POOL_SIZE")?,
            None => DEFAULT_POOL_SIZE,
        };

        Ok(Self {
            repository,
            data_path,
            database_path,
            repopulate,
            pool_size,
        })
    }
}
