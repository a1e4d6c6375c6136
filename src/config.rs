//! Startup configuration read from the process environment.
//!
//! Both binaries load a `.env` file first, so every variable below can also
//! live there.

use std::{
    env, fs, io,
    net::{Ipv4Addr, SocketAddr},
    path::{Path, PathBuf},
};

use axum::http::HeaderValue;
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_STORE_URI: &str = "memory://";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000/api/tasks";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("PORT must be a port number, got `{0}`")]
    InvalidPort(String),
    #[error("CORS_ORIGIN is not a valid header value: `{0}`")]
    InvalidOrigin(String),
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub store_uri: String,
    pub port: u16,
    pub cors_origin: Option<HeaderValue>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any variable source; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let store_uri = var("STORE_URI").unwrap_or_else(|| DEFAULT_STORE_URI.to_string());

        let port = match var("PORT") {
            Some(port) => port
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(port))?,
            None => DEFAULT_PORT,
        };

        let cors_origin = match var("CORS_ORIGIN") {
            Some(origin) if origin.trim() == "*" => None,
            Some(origin) => Some(
                HeaderValue::from_str(origin.trim())
                    .map_err(|_| ConfigError::InvalidOrigin(origin))?,
            ),
            None => None,
        };

        Ok(ServerConfig {
            store_uri,
            port,
            cors_origin,
        })
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }
}

// Optional settings file for the terminal client
#[derive(Debug, Default, Deserialize)]
struct ClientFile {
    backend_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub backend_url: String,
}

impl ClientConfig {
    /// `BACKEND_URL`, then `backend_url` from the config file, then the default.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(env::var("BACKEND_URL").ok(), Self::config_path().as_deref())
    }

    /// The file at `path` is only read when `from_env` is unset or blank.
    fn load_from(from_env: Option<String>, path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(url) = from_env.filter(|url| !url.trim().is_empty()) {
            return Ok(Self::resolve(Some(url), None));
        }
        let file = match path {
            Some(path) => Self::read_file(path)?,
            None => None,
        };
        Ok(Self::resolve(None, file))
    }

    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("task-tracker").join("config.toml"))
    }

    fn read_file(path: &Path) -> Result<Option<String>, ConfigError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let file: ClientFile = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(file.backend_url)
    }

    fn resolve(from_env: Option<String>, from_file: Option<String>) -> Self {
        let backend_url = from_env
            .into_iter()
            .chain(from_file)
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .find(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string());
        ClientConfig { backend_url }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_server_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.store_uri, "memory://");
        assert_eq!(config.port, 5000);
        assert_eq!(config.cors_origin, None);
        assert_eq!(config.listen_addr().to_string(), "0.0.0.0:5000");
    }

    #[test]
    fn test_server_reads_variables() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("STORE_URI", "file:///var/lib/tasks.json"),
            ("PORT", " 8080 "),
            ("CORS_ORIGIN", "http://localhost:3000"),
        ]))
        .unwrap();

        assert_eq!(config.store_uri, "file:///var/lib/tasks.json");
        assert_eq!(config.port, 8080);
        assert_eq!(
            config.cors_origin,
            Some(HeaderValue::from_static("http://localhost:3000"))
        );
    }

    #[test]
    fn test_server_rejects_bad_port() {
        let err = ServerConfig::from_lookup(lookup(&[("PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort(port) if port == "eighty"));
    }

    #[test]
    fn test_server_wildcard_origin_means_any() {
        let config = ServerConfig::from_lookup(lookup(&[("CORS_ORIGIN", "*")])).unwrap();
        assert_eq!(config.cors_origin, None);
    }

    #[test]
    fn test_client_prefers_environment_over_file() {
        let config = ClientConfig::resolve(
            Some("http://tasks.local/api/tasks/".to_string()),
            Some("http://other/api/tasks".to_string()),
        );
        assert_eq!(config.backend_url, "http://tasks.local/api/tasks");

        let config = ClientConfig::resolve(None, Some("http://other/api/tasks".to_string()));
        assert_eq!(config.backend_url, "http://other/api/tasks");

        let config = ClientConfig::resolve(Some("  ".to_string()), None);
        assert_eq!(config.backend_url, DEFAULT_BACKEND_URL);
    }

    #[test]
    fn test_client_skips_config_file_when_variable_is_set() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "backend_url = [").unwrap();

        let config =
            ClientConfig::load_from(Some("http://tasks.local/api/tasks".to_string()), Some(&path))
                .unwrap();
        assert_eq!(config.backend_url, "http://tasks.local/api/tasks");

        assert!(matches!(
            ClientConfig::load_from(None, Some(&path)),
            Err(ConfigError::Parse { .. })
        ));
        assert!(matches!(
            ClientConfig::load_from(Some(" ".to_string()), Some(&path)),
            Err(ConfigError::Parse { .. })
        ));

        fs::write(&path, "backend_url = \"http://other/api/tasks\"\n").unwrap();
        let config = ClientConfig::load_from(None, Some(&path)).unwrap();
        assert_eq!(config.backend_url, "http://other/api/tasks");
        let config = ClientConfig::load_from(None, None).unwrap();
        assert_eq!(config.backend_url, DEFAULT_BACKEND_URL);
    }

    #[test]
    fn test_client_reads_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        assert_eq!(ClientConfig::read_file(&path).unwrap(), None);

        fs::write(&path, "backend_url = \"http://tasks.local/api/tasks\"\n").unwrap();
        assert_eq!(
            ClientConfig::read_file(&path).unwrap().as_deref(),
            Some("http://tasks.local/api/tasks")
        );

        fs::write(&path, "backend_url = [").unwrap();
        assert!(matches!(
            ClientConfig::read_file(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}
