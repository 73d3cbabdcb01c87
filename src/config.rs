// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Environment-driven runtime configuration.

use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use tracing::{info, warn};
use url::Url;

pub const BACKEND_URL: &str = "CAMPUSSHARE_BACKEND_URL";
pub const ANON_KEY: &str = "CAMPUSSHARE_ANON_KEY";
pub const BUCKET: &str = "CAMPUSSHARE_BUCKET";
pub const WORKERS: &str = "CAMPUSSHARE_WORKERS";
pub const DOWNLOAD_DIR: &str = "CAMPUSSHARE_DOWNLOAD_DIR";

pub const DEFAULT_BUCKET: &str = "resources";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub backend_url: Url,
    pub anon_key: String,
    pub bucket: String,
    pub workers: usize,
    pub download_dir: PathBuf,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key/value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let raw_url = lookup(BACKEND_URL)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| anyhow!("{BACKEND_URL} is not set"))?;
        let backend_url = Url::parse(raw_url.trim())
            .with_context(|| format!("Invalid {BACKEND_URL} value {raw_url:?}"))?;

        let anon_key = lookup(ANON_KEY).unwrap_or_else(|| {
            warn!("{ANON_KEY} not set, anonymous requests will be rejected");
            String::new()
        });

        Ok(Self {
            backend_url,
            anon_key,
            bucket: or_default(&lookup, BUCKET, DEFAULT_BUCKET.to_string()),
            workers: or_default(&lookup, WORKERS, default_workers()).max(1),
            download_dir: or_default(&lookup, DOWNLOAD_DIR, PathBuf::from(".")),
        })
    }
}

fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get().max(2))
        .unwrap_or(2)
}

fn or_default<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + std::fmt::Debug,
    T::Err: Display,
{
    let Some(raw) = lookup(key) else {
        info!("{key} not set, using default: {default:?}");
        return default;
    };
    raw.trim().parse().unwrap_or_else(|e| {
        warn!("Invalid {key} value {raw:?}: {e}, using default: {default:?}");
        default
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_fill_optional_keys() {
        let cfg = config(&[(BACKEND_URL, "https://abc.supabase.co")]).unwrap();
        assert_eq!(cfg.backend_url.as_str(), "https://abc.supabase.co/");
        assert_eq!(cfg.bucket, DEFAULT_BUCKET);
        assert_eq!(cfg.download_dir, PathBuf::from("."));
        assert!(cfg.workers >= 2);
        assert!(cfg.anon_key.is_empty());
    }

    #[test]
    fn explicit_values_win() {
        let cfg = config(&[
            (BACKEND_URL, "http://localhost:54321"),
            (ANON_KEY, "anon"),
            (BUCKET, "files"),
            (WORKERS, "3"),
            (DOWNLOAD_DIR, "/tmp/dl"),
        ])
        .unwrap();
        assert_eq!(cfg.anon_key, "anon");
        assert_eq!(cfg.bucket, "files");
        assert_eq!(cfg.workers, 3);
        assert_eq!(cfg.download_dir, PathBuf::from("/tmp/dl"));
    }

    #[test]
    fn malformed_worker_count_falls_back() {
        let cfg = config(&[(BACKEND_URL, "http://localhost"), (WORKERS, "many")]).unwrap();
        assert_eq!(cfg.workers, default_workers());
        let zero = config(&[(BACKEND_URL, "http://localhost"), (WORKERS, "0")]).unwrap();
        assert_eq!(zero.workers, 1);
    }

    #[test]
    fn backend_url_is_required_and_validated() {
        assert!(config(&[]).is_err());
        assert!(config(&[(BACKEND_URL, "  ")]).is_err());
        let err = config(&[(BACKEND_URL, "not a url")]).unwrap_err();
        assert!(err.to_string().contains(BACKEND_URL));
    }
}
