use std::time::Duration;

use anyhow::{bail, Context, Result};

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_OLLAMA_HOST: &str = "127.0.0.1";
const DEFAULT_OLLAMA_PORT: u16 = 11434;
const DEFAULT_MODEL: &str = "gemma3:1b";
const DEFAULT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_CONNECT_RETRIES: u32 = 1;
const MAX_CONNECT_RETRIES: u32 = 3;
const DEFAULT_MAX_RESUME_CHARS: usize = 50_000;

/// Application configuration loaded from environment variables.
/// Read once at startup and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub ollama_host: String,
    pub ollama_port: u16,
    pub model: String,
    pub model_timeout: Duration,
    pub connect_retries: u32,
    pub max_resume_chars: usize,
    /// `None` means permissive CORS.
    pub cors_allowed_origins: Option<Vec<String>>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. Unset and blank values
    /// fall back to defaults; present but invalid values are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let model_timeout_secs: u64 = parse_or(&get, "MODEL_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
        if model_timeout_secs == 0 {
            bail!("MODEL_TIMEOUT_SECS must be greater than zero");
        }

        let connect_retries: u32 =
            parse_or(&get, "MODEL_CONNECT_RETRIES", DEFAULT_CONNECT_RETRIES)?;
        if connect_retries > MAX_CONNECT_RETRIES {
            bail!("MODEL_CONNECT_RETRIES must be at most {MAX_CONNECT_RETRIES}");
        }

        let max_resume_chars: usize =
            parse_or(&get, "MAX_RESUME_CHARS", DEFAULT_MAX_RESUME_CHARS)?;
        if max_resume_chars == 0 {
            bail!("MAX_RESUME_CHARS must be greater than zero");
        }

        let cors_allowed_origins = get("CORS_ALLOWED_ORIGINS").map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(String::from)
                .collect::<Vec<_>>()
        });
        if cors_allowed_origins.as_ref().is_some_and(Vec::is_empty) {
            bail!("CORS_ALLOWED_ORIGINS is set but names no origins");
        }

        Ok(Config {
            port: parse_or(&get, "PORT", DEFAULT_PORT)?,
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            ollama_host: get("OLLAMA_HOST").unwrap_or_else(|| DEFAULT_OLLAMA_HOST.to_string()),
            ollama_port: parse_or(&get, "OLLAMA_PORT", DEFAULT_OLLAMA_PORT)?,
            model: get("OLLAMA_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            model_timeout: Duration::from_secs(model_timeout_secs),
            connect_retries,
            max_resume_chars,
            cors_allowed_origins,
        })
    }

    /// Base URL of the inference backend, e.g. `http://127.0.0.1:11434`.
    pub fn ollama_base_url(&self) -> String {
        let host = self.ollama_host.trim_end_matches('/');
        if host.starts_with("http://") || host.starts_with("https://") {
            format!("{host}:{}", self.ollama_port)
        } else {
            format!("http://{host}:{}", self.ollama_port)
        }
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw:?}")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.port, 8000);
        assert_eq!(config.rust_log, "info");
        assert_eq!(config.model, "gemma3:1b");
        assert_eq!(config.model_timeout, Duration::from_secs(60));
        assert_eq!(config.connect_retries, 1);
        assert_eq!(config.max_resume_chars, 50_000);
        assert!(config.cors_allowed_origins.is_none());
        assert_eq!(config.ollama_base_url(), "http://127.0.0.1:11434");
    }

    #[test]
    fn test_overrides_are_applied() {
        let config = config_from(&[
            ("PORT", "9000"),
            ("OLLAMA_HOST", "inference.local"),
            ("OLLAMA_PORT", "8081"),
            ("OLLAMA_MODEL", "llama3.2"),
            ("MODEL_TIMEOUT_SECS", "5"),
            ("MODEL_CONNECT_RETRIES", "0"),
            ("MAX_RESUME_CHARS", "1000"),
            ("CORS_ALLOWED_ORIGINS", "http://localhost:5173, http://127.0.0.1:5173,"),
        ])
        .unwrap();

        assert_eq!(config.port, 9000);
        assert_eq!(config.model, "llama3.2");
        assert_eq!(config.model_timeout, Duration::from_secs(5));
        assert_eq!(config.connect_retries, 0);
        assert_eq!(config.max_resume_chars, 1000);
        assert_eq!(config.ollama_base_url(), "http://inference.local:8081");
        assert_eq!(
            config.cors_allowed_origins.unwrap(),
            vec!["http://localhost:5173", "http://127.0.0.1:5173"]
        );
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let config = config_from(&[("OLLAMA_MODEL", "  "), ("PORT", "")]).unwrap();
        assert_eq!(config.model, "gemma3:1b");
        assert_eq!(config.port, 8000);
    }

    #[test]
    fn test_scheme_in_host_is_kept() {
        let config = config_from(&[("OLLAMA_HOST", "https://gpu-box/")]).unwrap();
        assert_eq!(config.ollama_base_url(), "https://gpu-box:11434");
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let err = config_from(&[("OLLAMA_PORT", "not-a-port")]).unwrap_err();
        assert!(err.to_string().contains("OLLAMA_PORT"));
    }

    #[test]
    fn test_origin_list_without_origins_is_rejected() {
        let err = config_from(&[("CORS_ALLOWED_ORIGINS", " , ,")]).unwrap_err();
        assert!(err.to_string().contains("CORS_ALLOWED_ORIGINS"));
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        assert!(config_from(&[("MODEL_TIMEOUT_SECS", "0")]).is_err());
    }

    #[test]
    fn test_too_many_retries_is_rejected() {
        assert!(config_from(&[("MODEL_CONNECT_RETRIES", "10")]).is_err());
    }

    #[test]
    fn test_zero_max_resume_chars_is_rejected() {
        assert!(config_from(&[("MAX_RESUME_CHARS", "0")]).is_err());
    }
}
