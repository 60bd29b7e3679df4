use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

/// Application-level constants
pub const APP_NAME: &str = "Carebridge";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8501";

const ENV_API_KEY: &str = "OPENAI_API_KEY";
const ENV_BASE_URL: &str = "OPENAI_BASE_URL";
const ENV_MODEL: &str = "CAREBRIDGE_MODEL";
const ENV_TIMEOUT: &str = "CAREBRIDGE_TIMEOUT_SECS";
const ENV_BIND_ADDR: &str = "CAREBRIDGE_BIND_ADDR";
const ENV_FONTS_DIR: &str = "CAREBRIDGE_FONTS_DIR";
const ENV_EXPORT_DIR: &str = "CAREBRIDGE_EXPORT_DIR";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not set")]
    MissingApiKey(&'static str),

    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

/// Default tracing filter when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "carebridge=info,carebridge_lib=info,tower_http=warn"
}

/// Per-user data directory (`~/.local/share/Carebridge` on Linux).
pub fn app_data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|d| d.join(APP_NAME))
}

/// Fonts directory used when `CAREBRIDGE_FONTS_DIR` is unset.
///
/// A `fonts/` directory next to the working directory wins; otherwise the
/// per-user data directory is used.
pub fn default_fonts_dir() -> PathBuf {
    let local = PathBuf::from("fonts");
    if local.is_dir() {
        return local;
    }
    app_data_dir()
        .map(|d| d.join("fonts"))
        .unwrap_or(local)
}

/// Runtime configuration, resolved once at startup and handed to the
/// collaborators that need it.
#[derive(Clone)]
pub struct AppConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
    pub bind_addr: SocketAddr,
    pub fonts_dir: PathBuf,
    pub export_dir: Option<PathBuf>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .field("bind_addr", &self.bind_addr)
            .field("fonts_dir", &self.fonts_dir)
            .field("export_dir", &self.export_dir)
            .finish_non_exhaustive()
    }
}

impl AppConfig {
    /// Load from the process environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "Loaded .env file");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_key = get(ENV_API_KEY).ok_or(ConfigError::MissingApiKey(ENV_API_KEY))?;

        let base_url = get(ENV_BASE_URL)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                key: ENV_BASE_URL,
                value: base_url,
            });
        }

        let model = get(ENV_MODEL).unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let timeout_secs = match get(ENV_TIMEOUT) {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: ENV_TIMEOUT,
                        value: raw,
                    })
                }
            },
            None => DEFAULT_TIMEOUT_SECS,
        };

        let bind_raw = get(ENV_BIND_ADDR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidValue {
                key: ENV_BIND_ADDR,
                value: bind_raw.clone(),
            })?;

        let fonts_dir = get(ENV_FONTS_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(default_fonts_dir);
        let export_dir = get(ENV_EXPORT_DIR).map(PathBuf::from);

        Ok(Self {
            api_key,
            base_url,
            model,
            timeout_secs,
            bind_addr,
            fonts_dir,
            export_dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_key_is_set() {
        let config = AppConfig::from_lookup(lookup(&[("OPENAI_API_KEY", "sk-test")])).unwrap();
        assert_eq!(config.api_key, "sk-test");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.bind_addr.to_string(), DEFAULT_BIND_ADDR);
        assert!(config.export_dir.is_none());
    }

    #[test]
    fn missing_key_is_rejected() {
        let err = AppConfig::from_lookup(lookup(&[])).unwrap_err();
        assert_eq!(err, ConfigError::MissingApiKey("OPENAI_API_KEY"));
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let err = AppConfig::from_lookup(lookup(&[("OPENAI_API_KEY", "   ")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey(_)));
    }

    #[test]
    fn overrides_are_read() {
        let config = AppConfig::from_lookup(lookup(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_BASE_URL", "http://localhost:9000/v1/"),
            ("CAREBRIDGE_MODEL", "gpt-4o-mini"),
            ("CAREBRIDGE_TIMEOUT_SECS", "15"),
            ("CAREBRIDGE_BIND_ADDR", "0.0.0.0:9090"),
            ("CAREBRIDGE_FONTS_DIR", "/opt/fonts"),
            ("CAREBRIDGE_EXPORT_DIR", "/tmp/reports"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "http://localhost:9000/v1");
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.timeout_secs, 15);
        assert_eq!(config.bind_addr.port(), 9090);
        assert_eq!(config.fonts_dir, PathBuf::from("/opt/fonts"));
        assert_eq!(config.export_dir, Some(PathBuf::from("/tmp/reports")));
    }

    #[test]
    fn invalid_timeout_is_rejected() {
        for bad in ["abc", "0", "-5"] {
            let err = AppConfig::from_lookup(lookup(&[
                ("OPENAI_API_KEY", "sk-test"),
                ("CAREBRIDGE_TIMEOUT_SECS", bad),
            ]))
            .unwrap_err();
            assert!(matches!(err, ConfigError::InvalidValue { key: "CAREBRIDGE_TIMEOUT_SECS", .. }));
        }
    }

    #[test]
    fn invalid_bind_addr_is_rejected() {
        let err = AppConfig::from_lookup(lookup(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("CAREBRIDGE_BIND_ADDR", "localhost"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "CAREBRIDGE_BIND_ADDR", .. }));
    }

    #[test]
    fn non_http_base_url_is_rejected() {
        let err = AppConfig::from_lookup(lookup(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_BASE_URL", "ftp://example.com"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "OPENAI_BASE_URL", .. }));
    }

    #[test]
    fn debug_output_hides_api_key() {
        let config = AppConfig::from_lookup(lookup(&[("OPENAI_API_KEY", "sk-secret")])).unwrap();
        assert!(!format!("{config:?}").contains("sk-secret"));
    }

    #[test]
    fn app_name_is_carebridge() {
        assert_eq!(APP_NAME, "Carebridge");
    }
}
