use std::{fmt::Display, str::FromStr, time::Duration};

use anyhow::{anyhow, bail, Result};

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_DIMENSION: u32 = 4096;

#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    /// Origin echoed by the CORS layer. `None` disables the layer.
    pub cors_origin: Option<String>,
    pub shutdown_timeout: Duration,
    pub max_concurrent_jobs: usize,
    pub max_dimension: u32,
    pub legacy_error_status: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            cors_origin: None,
            shutdown_timeout: Duration::from_secs(DEFAULT_SHUTDOWN_TIMEOUT_SECS),
            max_concurrent_jobs: default_jobs(),
            max_dimension: DEFAULT_MAX_DIMENSION,
            legacy_error_status: false,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Settings::default();

        let max_concurrent_jobs =
            parse_var(&lookup, "IPR_MAX_CONCURRENT_JOBS", defaults.max_concurrent_jobs)?;
        if max_concurrent_jobs == 0 {
            bail!("IPR_MAX_CONCURRENT_JOBS must be at least 1");
        }
        let max_dimension = parse_var(&lookup, "IPR_MAX_DIMENSION", defaults.max_dimension)?;
        if max_dimension == 0 {
            bail!("IPR_MAX_DIMENSION must be at least 1");
        }

        Ok(Self {
            host: lookup("IPR_HOST")
                .filter(|h| !h.is_empty())
                .unwrap_or(defaults.host),
            port: parse_var(&lookup, "IPR_PORT", defaults.port)?,
            cors_origin: lookup("IPR_CORS_ORIGIN").filter(|o| !o.is_empty()),
            shutdown_timeout: Duration::from_secs(parse_var(
                &lookup,
                "IPR_SHUTDOWN_TIMEOUT_SECS",
                DEFAULT_SHUTDOWN_TIMEOUT_SECS,
            )?),
            max_concurrent_jobs,
            max_dimension,
            legacy_error_status: parse_flag(&lookup, "IPR_LEGACY_ERROR_STATUS")?,
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_jobs() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("invalid {key}={raw:?}: {e}")),
        _ => Ok(default),
    }
}

fn parse_flag<F>(lookup: &F, key: &str) -> Result<bool>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).as_deref().map(str::trim) {
        None | Some("") => Ok(false),
        Some("1") | Some("true") | Some("TRUE") | Some("yes") => Ok(true),
        Some("0") | Some("false") | Some("FALSE") | Some("no") => Ok(false),
        Some(other) => bail!("invalid {key}={other:?}: expected true or false"),
    }
}
