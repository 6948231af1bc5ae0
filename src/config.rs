//! Process configuration (flags with environment fallbacks)

use clap::Parser;
use object_tree::S3Config;
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "appdrive", version, about = "Multi-tenant file drive on an S3 bucket")]
pub struct Config {
    /// Address the HTTP API listens on
    #[arg(long, env = "LISTEN_ADDR", default_value = "127.0.0.1:3000")]
    pub listen_addr: SocketAddr,

    /// SQLite-compatible database file holding apps and API keys
    #[arg(long, env = "DATABASE_PATH", default_value = "appdrive.db")]
    pub database_path: PathBuf,

    /// Password accepted by the login endpoint
    #[arg(long, env = "APP_PASSWORD", hide_env_values = true)]
    pub app_password: String,

    /// Key used to sign session cookies
    #[arg(long, env = "SESSION_SECRET", hide_env_values = true)]
    pub session_secret: String,

    /// Mark session cookies `Secure`
    #[arg(long, env = "SECURE_COOKIES", default_value_t = false)]
    pub secure_cookies: bool,

    /// Host serving public object links (`https://<host>/<key>`)
    #[arg(long, env = "PUBLIC_HOST")]
    pub public_host: String,

    /// Keep objects in process memory instead of S3
    #[arg(long, default_value_t = false)]
    pub memory_store: bool,

    #[arg(long, env = "S3_ENDPOINT")]
    pub s3_endpoint: Option<String>,

    #[arg(long, env = "S3_REGION", default_value = "auto")]
    pub s3_region: String,

    #[arg(long, env = "S3_BUCKET", default_value = "")]
    pub s3_bucket: String,

    #[arg(long, env = "S3_ACCESS_KEY", default_value = "", hide_env_values = true)]
    pub s3_access_key: String,

    #[arg(long, env = "S3_SECRET_KEY", default_value = "", hide_env_values = true)]
    pub s3_secret_key: String,

    #[arg(long, env = "S3_FORCE_PATH_STYLE", default_value_t = true, action = clap::ArgAction::Set)]
    pub s3_force_path_style: bool,

    /// Attempts per store call, including the first
    #[arg(long, env = "S3_MAX_ATTEMPTS", default_value_t = 3)]
    pub s3_max_attempts: u32,

    /// Upload objects with the `public-read` canned ACL
    #[arg(long, env = "S3_PUBLIC_READ", default_value_t = false)]
    pub s3_public_read: bool,
}

impl Config {
    pub fn s3(&self) -> S3Config {
        S3Config {
            bucket: self.s3_bucket.clone(),
            access_key_id: self.s3_access_key.clone(),
            secret_access_key: self.s3_secret_key.clone(),
            region: self.s3_region.clone(),
            endpoint_url: self.s3_endpoint.clone(),
            force_path_style: self.s3_force_path_style,
            max_attempts: self.s3_max_attempts,
            public_read: self.s3_public_read,
        }
    }

    /// Reject settings the server cannot start with.
    pub fn validate(&self) -> Result<(), String> {
        if self.app_password.is_empty() {
            return Err("APP_PASSWORD must not be empty".to_string());
        }
        if self.session_secret.len() < 16 {
            return Err("SESSION_SECRET must be at least 16 bytes".to_string());
        }
        if !self.memory_store && self.s3_bucket.is_empty() {
            return Err("S3_BUCKET is required unless --memory-store is set".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        let mut argv = vec!["appdrive"];
        argv.extend_from_slice(args);
        Config::parse_from(argv)
    }

    #[test]
    fn s3_settings_flow_into_store_config() {
        let config = parse(&[
            "--app-password",
            "pw",
            "--session-secret",
            "0123456789abcdef",
            "--public-host",
            "files.example.com",
            "--s3-bucket",
            "drive",
            "--s3-endpoint",
            "https://s3.example.com",
            "--s3-max-attempts",
            "5",
        ]);

        let s3 = config.s3();
        assert_eq!(s3.bucket, "drive");
        assert_eq!(s3.endpoint_url.as_deref(), Some("https://s3.example.com"));
        assert_eq!(s3.max_attempts, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn short_secret_is_rejected() {
        let config = parse(&[
            "--app-password",
            "pw",
            "--session-secret",
            "short",
            "--public-host",
            "h",
            "--memory-store",
        ]);
        assert!(config.validate().is_err());
    }
}
