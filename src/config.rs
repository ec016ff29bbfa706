use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, ValueEnum};
use std::{env, fmt};

const MAX_PAGE_SIZE: u32 = 1000;

/// Centralized application configuration.
/// Combines environment variables and CLI arguments; CLI wins.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub storage: StorageConfig,
    /// Production mode hides error details from HTTP responses.
    pub production: bool,
    pub cors_origins: Vec<String>,
    pub log_format: LogFormat,
}

/// Connection settings for the S3-compatible store.
#[derive(Clone)]
pub struct StorageConfig {
    pub endpoint: String,
    pub region: String,
    pub access_key: String,
    pub secret_key: String,
    pub bucket: String,
    /// Objects requested per listing page (1..=1000).
    pub page_size: u32,
}

// Keeps credentials out of the startup log line.
impl fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageConfig")
            .field("endpoint", &self.endpoint)
            .field("region", &self.region)
            .field("access_key", &"<redacted>")
            .field("secret_key", &"<redacted>")
            .field("bucket", &self.bucket)
            .field("page_size", &self.page_size)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

/// Command-line + environment configuration.
#[derive(Parser, Debug, Default)]
#[command(author, version, about = "Bucket inventory API for the school dashboard")]
pub struct Args {
    /// Host to bind to (overrides INVENTORY_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (overrides INVENTORY_PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// S3-compatible endpoint URL (overrides S3_ENDPOINT)
    #[arg(long)]
    pub s3_endpoint: Option<String>,

    /// Storage region (overrides S3_REGION)
    #[arg(long)]
    pub s3_region: Option<String>,

    /// Access key (overrides S3_ACCESS_KEY)
    #[arg(long)]
    pub s3_access_key: Option<String>,

    /// Secret key (overrides S3_SECRET_KEY)
    #[arg(long)]
    pub s3_secret_key: Option<String>,

    /// Bucket to inventory (overrides S3_BUCKET_NAME)
    #[arg(long)]
    pub s3_bucket: Option<String>,

    /// Objects per listing page, 1-1000 (overrides S3_PAGE_SIZE)
    #[arg(long)]
    pub page_size: Option<u32>,

    /// Hide error details in responses (also enabled by APP_ENV=production)
    #[arg(long)]
    pub production: bool,

    /// Allowed CORS origin; repeatable (overrides CORS_ALLOW_ORIGINS)
    #[arg(long = "cors-origin")]
    pub cors_origins: Vec<String>,

    /// Log output format (overrides LOG_FORMAT)
    #[arg(long, value_enum)]
    pub log_format: Option<LogFormat>,
}

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig.
    pub fn from_env_and_args() -> Result<Self> {
        Self::resolve(Args::parse(), |name| env::var(name).ok())
    }

    /// Merge parsed args with values from `lookup` (the process environment
    /// outside of tests).
    pub fn resolve(args: Args, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        // --- Environment fallback ---
        let env_port = match lookup("INVENTORY_PORT") {
            Some(value) => Some(
                value
                    .parse::<u16>()
                    .with_context(|| format!("parsing INVENTORY_PORT value `{}`", value))?,
            ),
            None => None,
        };
        let env_page_size = match lookup("S3_PAGE_SIZE") {
            Some(value) => Some(
                value
                    .parse::<u32>()
                    .with_context(|| format!("parsing S3_PAGE_SIZE value `{}`", value))?,
            ),
            None => None,
        };
        let env_log_format = match lookup("LOG_FORMAT") {
            Some(value) => Some(
                LogFormat::from_str(&value, true)
                    .map_err(|_| anyhow!("LOG_FORMAT must be `text` or `json`, got `{}`", value))?,
            ),
            None => None,
        };
        let env_production = lookup("APP_ENV")
            .map(|v| v.eq_ignore_ascii_case("production"))
            .unwrap_or(false);
        let env_cors = lookup("CORS_ALLOW_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();

        let required = |arg: Option<String>, flag: &str, var: &str| -> Result<String> {
            match arg.or_else(|| lookup(var)) {
                Some(value) if !value.trim().is_empty() => Ok(value),
                _ => bail!("missing {}: pass --{} or set {}", var, flag, var),
            }
        };

        let page_size = args.page_size.or(env_page_size).unwrap_or(MAX_PAGE_SIZE);
        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            bail!("page size must be between 1 and {}, got {}", MAX_PAGE_SIZE, page_size);
        }

        // --- Merge ---
        let storage = StorageConfig {
            endpoint: required(args.s3_endpoint, "s3-endpoint", "S3_ENDPOINT")?,
            region: args
                .s3_region
                .or_else(|| lookup("S3_REGION"))
                .unwrap_or_else(|| "us-east-1".into()),
            access_key: required(args.s3_access_key, "s3-access-key", "S3_ACCESS_KEY")?,
            secret_key: required(args.s3_secret_key, "s3-secret-key", "S3_SECRET_KEY")?,
            bucket: required(args.s3_bucket, "s3-bucket", "S3_BUCKET_NAME")?,
            page_size,
        };

        Ok(Self {
            host: args
                .host
                .or_else(|| lookup("INVENTORY_HOST"))
                .unwrap_or_else(|| "0.0.0.0".into()),
            port: args.port.or(env_port).unwrap_or(3000),
            storage,
            production: args.production || env_production,
            cors_origins: if args.cors_origins.is_empty() {
                env_cors
            } else {
                args.cors_origins
            },
            log_format: args.log_format.or(env_log_format).unwrap_or(LogFormat::Text),
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
