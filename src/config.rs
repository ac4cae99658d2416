use crate::services::credential_service::{
    DEFAULT_BCRYPT_COST, MAX_BCRYPT_COST, MIN_BCRYPT_COST,
};
use anyhow::{Context, Result, bail};
use clap::Parser;
use std::{env, str::FromStr, time::Duration};

/// Centralized application configuration.
/// Combines environment variables and CLI arguments.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub bcrypt_cost: u32,
    pub request_timeout: Duration,
}

/// Command-line + environment configuration.
#[derive(Parser, Debug, Default)]
#[command(author, version, about = "Mock cloud control plane for users and S3 buckets")]
pub struct Args {
    /// Host to bind to (overrides TERRASPOOF_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (overrides TERRASPOOF_PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Database URL (overrides TERRASPOOF_DATABASE_URL)
    #[arg(long)]
    pub database_url: Option<String>,

    /// bcrypt work factor, 4-31 (overrides TERRASPOOF_BCRYPT_COST)
    #[arg(long)]
    pub bcrypt_cost: Option<u32>,

    /// Deadline for a single store call in seconds (overrides TERRASPOOF_REQUEST_TIMEOUT_SECS)
    #[arg(long)]
    pub request_timeout_secs: Option<u64>,

    /// Run migrations and exit
    #[arg(long)]
    pub migrate: bool,
}

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig and migrate flag.
    pub fn from_env_and_args() -> Result<(Self, bool)> {
        let args = Args::parse();
        let migrate = args.migrate;
        let cfg = Self::from_sources(args, |key| env::var(key).ok())?;
        Ok((cfg, migrate))
    }

    /// Merge `args` over values found through `lookup`, falling back to defaults.
    pub fn from_sources(args: Args, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let env_host = lookup("TERRASPOOF_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let env_port = parse_var(&lookup, "TERRASPOOF_PORT")?.unwrap_or(8080);
        let env_db = lookup("TERRASPOOF_DATABASE_URL")
            .unwrap_or_else(|| "sqlite://./data/terraspoof.db".into());
        let env_cost =
            parse_var(&lookup, "TERRASPOOF_BCRYPT_COST")?.unwrap_or(DEFAULT_BCRYPT_COST);
        let env_timeout = parse_var(&lookup, "TERRASPOOF_REQUEST_TIMEOUT_SECS")?.unwrap_or(10);

        let cfg = Self {
            host: args.host.unwrap_or(env_host),
            port: args.port.unwrap_or(env_port),
            database_url: args.database_url.unwrap_or(env_db),
            bcrypt_cost: args.bcrypt_cost.unwrap_or(env_cost),
            request_timeout: Duration::from_secs(
                args.request_timeout_secs.unwrap_or(env_timeout),
            ),
        };

        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&cfg.bcrypt_cost) {
            bail!(
                "bcrypt cost {} outside {}..={}",
                cfg.bcrypt_cost,
                MIN_BCRYPT_COST,
                MAX_BCRYPT_COST
            );
        }
        if cfg.request_timeout.is_zero() {
            bail!("request timeout must be at least one second");
        }

        Ok(cfg)
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    lookup(key)
        .map(|value| {
            value
                .parse::<T>()
                .with_context(|| format!("parsing {} value `{}`", key, value))
        })
        .transpose()
}
