use std::env;

/// Runtime configuration, read once at startup (after `dotenv`).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub cors_allowed_origins: Vec<String>,
    pub s3: S3Config,
}

#[derive(Debug, Clone)]
pub struct S3Config {
    pub bucket: String,
    pub region: String,
    /// Custom endpoint (MinIO, LocalStack). `None` means AWS.
    pub endpoint: Option<String>,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub key_prefix: String,
    pub presign_expires_secs: u64,
}

fn required(name: &str) -> Result<String, String> {
    env::var(name).map_err(|_| format!("{} must be set", name))
}

fn optional(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parse_number<T: std::str::FromStr>(name: &str, raw: &str) -> Result<T, String> {
    raw.trim()
        .parse()
        .map_err(|_| format!("{} must be a number, got '{}'", name, raw))
}

pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().trim_end_matches('/').to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            host: optional("HOST", "0.0.0.0"),
            port: parse_number("PORT", &optional("PORT", "3002"))?,
            database_url: required("DATABASE_URL")?,
            cors_allowed_origins: parse_origins(&optional("CORS_ALLOWED_ORIGINS", "http://localhost:3000")),
            s3: S3Config::from_env()?,
        })
    }
}

impl S3Config {
    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            bucket: required("S3_BUCKET")?,
            region: optional("S3_REGION", "ap-northeast-2"),
            endpoint: env::var("S3_ENDPOINT").ok().filter(|s| !s.trim().is_empty()),
            access_key_id: required("AWS_ACCESS_KEY_ID")?,
            secret_access_key: required("AWS_SECRET_ACCESS_KEY")?,
            key_prefix: optional("S3_KEY_PREFIX", "uploads").trim_matches('/').to_string(),
            presign_expires_secs: parse_number(
                "S3_PRESIGN_EXPIRES_SECS",
                &optional("S3_PRESIGN_EXPIRES_SECS", "300"),
            )?,
        })
    }
}
