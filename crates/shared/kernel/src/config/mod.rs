use atlas_domain::constants::{CONFIG_ENV_PREFIX, CONFIG_PATH_ENV, PORT_ENV};
use config::{Config, Environment, File, Map};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::info;

/// Default file stem; any extension `config` understands is accepted (`server.toml`, ...).
const DEFAULT_CONFIG_FILE: &str = "server";

/// Custom error type for config loading.
#[atlas_derive::atlas_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// A reusable configuration loader that combines file-based settings with environment overrides.
///
/// Layers, lowest precedence first:
/// 1. **Base File**: `path` if given, else the file named by `ATLAS_CONFIG`, else an optional
///    `server` file in the working directory. An explicitly named file must exist.
/// 2. **Environment Overrides**: variables prefixed with `ATLAS__`. Nested keys use double
///    underscores (`ATLAS__DATABASE__URL` maps to `database.url`).
/// 3. **`PORT`**: the conventional hosting variable overrides `server.port`.
///
/// # Errors
/// Returns an error if a named file is missing, a value cannot be parsed, or the merged
/// document does not match `T`.
///
/// # Example
/// ```rust
/// use atlas_kernel::config::load_config;
///
/// #[derive(Default, serde::Deserialize)]
/// struct AppConfig {
///     port: u16,
/// }
///
/// let cfg: AppConfig = load_config(Some("config/local")).unwrap_or_default();
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let vars: Map<String, String> = std::env::vars().collect();
    load_config_with_env(path, &vars)
}

/// [`load_config`] reading variables from `vars` instead of the process environment.
///
/// # Errors
/// Same as [`load_config`].
pub fn load_config_with_env<T>(
    path: Option<impl AsRef<Path>>,
    vars: &Map<String, String>,
) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let (effective_path, required) = match path {
        Some(p) => (p.as_ref().to_path_buf(), true),
        None => vars
            .get(CONFIG_PATH_ENV)
            .map_or_else(|| (PathBuf::from(DEFAULT_CONFIG_FILE), false), |p| {
                (PathBuf::from(p), true)
            }),
    };

    info!(path = %effective_path.display(), required, "Loading config");

    let config = Config::builder()
        .add_source(File::from(effective_path.as_path()).required(required))
        .add_source(
            Environment::with_prefix(CONFIG_ENV_PREFIX)
                .separator("__")
                .convert_case(config::Case::Snake)
                .try_parsing(true)
                .source(Some(vars.clone())),
        )
        .set_override_option("server.port", vars.get(PORT_ENV).cloned())
        .context("Applying PORT override")?
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use atlas_domain::config::ApiConfig;
    use std::fs;

    fn vars(pairs: &[(&str, &str)]) -> Map<String, String> {
        pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect()
    }

    #[test]
    fn defaults_without_file_or_env() {
        let cfg: ApiConfig = load_config_with_env(None::<&Path>, &Map::new()).expect("defaults");
        assert_eq!(cfg.server.port, 3000);
        assert_eq!(cfg.database.url, "mem://");
        assert!(cfg.cache.enabled);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let result: Result<ApiConfig, _> = load_config_with_env(Some("definitely-not-here"), &Map::new());
        assert!(matches!(result, Err(ConfigError::Config { .. })));
    }

    #[test]
    fn file_values_are_loaded() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("server.toml");
        fs::write(
            &path,
            "[server]\nport = 8081\n\n[database]\nurl = \"ws://db:8000\"\nseed = true\n\n[cache]\nttl_seconds = 5\n",
        )
        .expect("write config");

        let cfg: ApiConfig = load_config_with_env(Some(&path), &Map::new()).expect("load");
        assert_eq!(cfg.server.port, 8081);
        assert_eq!(cfg.database.url, "ws://db:8000");
        assert!(cfg.database.seed);
        assert_eq!(cfg.cache.ttl_seconds, 5);
        assert_eq!(cfg.database.namespace, "atlas");
    }

    #[test]
    fn config_path_env_names_the_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("custom.toml");
        fs::write(&path, "[cache]\nenabled = false\n").expect("write config");

        let env = vars(&[(CONFIG_PATH_ENV, path.to_str().expect("utf-8 path"))]);
        let cfg: ApiConfig = load_config_with_env(None::<&Path>, &env).expect("load");
        assert!(!cfg.cache.enabled);
    }

    #[test]
    fn environment_overrides_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("server.toml");
        fs::write(&path, "[database]\nnamespace = \"from-file\"\n").expect("write config");

        let env = vars(&[
            ("ATLAS__DATABASE__NAMESPACE", "from-env"),
            ("ATLAS__CACHE__TTL_SECONDS", "15"),
        ]);
        let cfg: ApiConfig = load_config_with_env(Some(&path), &env).expect("load");
        assert_eq!(cfg.database.namespace, "from-env");
        assert_eq!(cfg.cache.ttl_seconds, 15);
    }

    #[test]
    fn port_variable_wins() {
        let env = vars(&[("ATLAS__SERVER__PORT", "4000"), (PORT_ENV, "5000")]);
        let cfg: ApiConfig = load_config_with_env(None::<&Path>, &env).expect("load");
        assert_eq!(cfg.server.port, 5000);
    }

    #[test]
    fn malformed_port_is_rejected() {
        let env = vars(&[(PORT_ENV, "not-a-port")]);
        let result: Result<ApiConfig, _> = load_config_with_env(None::<&Path>, &env);
        assert!(result.is_err());
    }
}
