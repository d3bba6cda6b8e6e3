use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use tracing_subscriber::EnvFilter;
use voxgate_core::AppError;

use crate::boundary::AccessBoundaryConfig;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub database_url: String,
    pub public_site_url: String,
    pub exchange_token: String,
    pub api_host: String,
    pub api_port: u16,
    pub cookie_secure: bool,
    pub access_boundary: AccessBoundaryConfig,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let migrate_only = env::args().nth(1).as_deref() == Some("migrate");

        let database_url = required_env("DATABASE_URL")?;
        let public_site_url = env::var("PUBLIC_SITE_URL")
            .unwrap_or_else(|_| "http://localhost:3000".to_owned())
            .trim_end_matches('/')
            .to_owned();
        let exchange_token = required_non_empty_env("AUTH_EXCHANGE_TOKEN")?;

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let api_port = env::var("API_PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3001);
        let cookie_secure = env::var("SESSION_COOKIE_SECURE")
            .unwrap_or_else(|_| "false".to_owned())
            .eq_ignore_ascii_case("true");

        let access_check_timeout_ms = match env::var("ACCESS_CHECK_TIMEOUT_MS") {
            Ok(value) => value.trim().parse::<u64>().map_err(|error| {
                AppError::Validation(format!("invalid ACCESS_CHECK_TIMEOUT_MS: {error}"))
            })?,
            Err(_) => 2_000,
        };
        if access_check_timeout_ms == 0 {
            return Err(AppError::Validation(
                "ACCESS_CHECK_TIMEOUT_MS must be greater than zero".to_owned(),
            ));
        }

        let access_boundary = AccessBoundaryConfig {
            dashboard_prefix: path_env("DASHBOARD_PATH_PREFIX", "/dashboard")?,
            admin_prefix: path_env("ADMIN_PATH_PREFIX", "/admin")?,
            sign_in_path: path_env("SIGN_IN_PATH", "/signin")?,
            landing_path: path_env("LANDING_PATH", "/")?,
            evaluation_timeout: Duration::from_millis(access_check_timeout_ms),
        };

        Ok(Self {
            migrate_only,
            database_url,
            public_site_url,
            exchange_token,
            api_host,
            api_port,
            cookie_secure,
            access_boundary,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_env(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}

fn required_non_empty_env(name: &str) -> Result<String, AppError> {
    let value = required_env(name)?;
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} must not be empty")));
    }

    Ok(value)
}

fn path_env(name: &str, default: &str) -> Result<String, AppError> {
    let value = env::var(name)
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_owned());

    normalize_path(name, value.as_str())
}

fn normalize_path(name: &str, value: &str) -> Result<String, AppError> {
    if !value.starts_with('/') || value.starts_with("//") {
        return Err(AppError::Validation(format!(
            "{name} must be a site-relative path starting with '/', got '{value}'"
        )));
    }

    if value == "/" {
        return Ok(value.to_owned());
    }

    Ok(value.trim_end_matches('/').to_owned())
}
