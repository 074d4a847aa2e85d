use std::env;
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use axum::http::HeaderValue;

const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:5173,http://localhost:8787";

/// Which key-value backend the service talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Spanner,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StoreBackend::Memory),
            "spanner" => Ok(StoreBackend::Spanner),
            other => bail!("KV_BACKEND must be one of: memory, spanner, got '{}'", other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SpannerConfig {
    pub emulator_host: Option<String>,
    pub project: String,
    pub instance: String,
    pub database: String,
}

impl SpannerConfig {
    pub fn database_path(&self) -> String {
        format!(
            "projects/{}/instances/{}/databases/{}",
            self.project, self.instance, self.database
        )
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub backend: StoreBackend,
    pub spanner: Option<SpannerConfig>,
    pub service_port: u16,
    pub service_host: String,
    pub allowed_origins: Vec<HeaderValue>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend = lookup("KV_BACKEND")
            .map(|raw| raw.parse::<StoreBackend>())
            .transpose()?
            .unwrap_or(StoreBackend::Spanner);

        let spanner = match backend {
            StoreBackend::Spanner => Some(SpannerConfig {
                emulator_host: lookup("SPANNER_EMULATOR_HOST"),
                project: lookup("SPANNER_PROJECT")
                    .context("SPANNER_PROJECT environment variable is required")?,
                instance: lookup("SPANNER_INSTANCE")
                    .context("SPANNER_INSTANCE environment variable is required")?,
                database: lookup("SPANNER_DATABASE")
                    .context("SPANNER_DATABASE environment variable is required")?,
            }),
            StoreBackend::Memory => None,
        };

        let service_port = lookup("SERVICE_PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse::<u16>()
            .context("SERVICE_PORT must be a valid port number (0-65535)")?;

        let service_host = lookup("SERVICE_HOST").unwrap_or_else(|| "0.0.0.0".to_string());

        let allowed_origins = parse_origins(
            &lookup("CORS_ALLOWED_ORIGINS").unwrap_or_else(|| DEFAULT_ALLOWED_ORIGINS.to_string()),
        )?;

        Ok(Config {
            backend,
            spanner,
            service_port,
            service_host,
            allowed_origins,
        })
    }

    pub fn log_startup(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Store backend: {:?}", self.backend);
        if let Some(spanner) = &self.spanner {
            tracing::info!(
                "  Spanner emulator: {}",
                spanner
                    .emulator_host
                    .as_deref()
                    .unwrap_or("disabled (using production)")
            );
            tracing::info!("  Spanner database: {}", spanner.database_path());
        }
        tracing::info!("  CORS origins: {:?}", self.allowed_origins);
        tracing::info!("  Service listening on: {}:{}", self.service_host, self.service_port);
    }
}

fn parse_origins(raw: &str) -> Result<Vec<HeaderValue>> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(|origin| {
            if origin == "*" {
                bail!("CORS_ALLOWED_ORIGINS must list explicit origins, '*' is not allowed");
            }
            HeaderValue::from_str(origin)
                .with_context(|| format!("CORS_ALLOWED_ORIGINS contains an invalid origin: '{}'", origin))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    const SPANNER_VARS: [(&str, &str); 3] = [
        ("SPANNER_PROJECT", "test-project"),
        ("SPANNER_INSTANCE", "test-instance"),
        ("SPANNER_DATABASE", "test-database"),
    ];

    #[test]
    fn test_config_with_all_vars() {
        let mut vars = SPANNER_VARS.to_vec();
        vars.extend([
            ("SPANNER_EMULATOR_HOST", "localhost:9010"),
            ("SERVICE_PORT", "8080"),
            ("SERVICE_HOST", "127.0.0.1"),
            ("CORS_ALLOWED_ORIGINS", "https://ikut.io, https://www.ikut.io"),
        ]);

        let config = load(&vars).unwrap();

        assert_eq!(config.backend, StoreBackend::Spanner);
        let spanner = config.spanner.unwrap();
        assert_eq!(spanner.emulator_host, Some("localhost:9010".to_string()));
        assert_eq!(
            spanner.database_path(),
            "projects/test-project/instances/test-instance/databases/test-database"
        );
        assert_eq!(config.service_port, 8080);
        assert_eq!(config.service_host, "127.0.0.1");
        assert_eq!(
            config.allowed_origins,
            vec![
                HeaderValue::from_static("https://ikut.io"),
                HeaderValue::from_static("https://www.ikut.io"),
            ]
        );
    }

    #[test]
    fn test_config_with_defaults() {
        let config = load(&SPANNER_VARS).unwrap();

        assert_eq!(config.backend, StoreBackend::Spanner);
        assert_eq!(config.spanner.unwrap().emulator_host, None);
        assert_eq!(config.service_port, 3000);
        assert_eq!(config.service_host, "0.0.0.0");
        assert_eq!(config.allowed_origins.len(), 2);
    }

    #[test]
    fn test_memory_backend_needs_no_spanner_vars() {
        let config = load(&[("KV_BACKEND", "Memory")]).unwrap();

        assert_eq!(config.backend, StoreBackend::Memory);
        assert!(config.spanner.is_none());
    }

    #[test]
    fn test_unknown_backend() {
        let error = load(&[("KV_BACKEND", "redis")]).unwrap_err();
        assert!(error.to_string().contains("KV_BACKEND"));
    }

    #[test]
    fn test_missing_required_var() {
        let error = load(&SPANNER_VARS[..2]).unwrap_err();
        assert!(error.to_string().contains("SPANNER_DATABASE"));
    }

    #[test]
    fn test_invalid_port() {
        let error = load(&[("KV_BACKEND", "memory"), ("SERVICE_PORT", "not-a-number")]).unwrap_err();
        assert!(error.to_string().contains("SERVICE_PORT"));
    }

    #[test]
    fn test_port_out_of_range() {
        assert!(load(&[("KV_BACKEND", "memory"), ("SERVICE_PORT", "99999")]).is_err());
    }

    #[test]
    fn test_wildcard_origin_rejected() {
        let error = load(&[("KV_BACKEND", "memory"), ("CORS_ALLOWED_ORIGINS", "*")]).unwrap_err();
        assert!(error.to_string().contains("CORS_ALLOWED_ORIGINS"));
    }

    #[test]
    fn test_invalid_origin() {
        let error = load(&[("KV_BACKEND", "memory"), ("CORS_ALLOWED_ORIGINS", "https://ok.io,bad\norigin")])
            .unwrap_err();
        assert!(error.to_string().contains("CORS_ALLOWED_ORIGINS"));
    }
}
