//! Configuration loader.

use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;

use crate::error::ConfigError;
use crate::schema::Config;

/// Project-local configuration file.
pub const LOCAL_CONFIG_PATH: &str = "config/default.toml";

/// Configuration loader with environment variable substitution.
///
/// `${VAR}` is replaced by the value of `VAR` and fails when it is unset;
/// `${VAR:-fallback}` uses `fallback` instead of failing.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(path)?;
        Self::load_str(&content)
    }

    /// Load configuration from a string.
    pub fn load_str(content: &str) -> Result<Config, ConfigError> {
        let expanded = Self::expand_env_vars(content)?;
        let config: Config = toml::from_str(&expanded)?;
        Ok(config)
    }

    /// Load `explicit` if given, else the first existing file among
    /// [`ConfigLoader::search_paths`], else defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<(Config, Option<PathBuf>), ConfigError> {
        if let Some(path) = explicit {
            return Ok((Self::load(path)?, Some(path.to_path_buf())));
        }
        for path in Self::search_paths() {
            if path.is_file() {
                return Ok((Self::load(&path)?, Some(path)));
            }
        }
        Ok((Config::default(), None))
    }

    /// Candidate config locations, most specific first.
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG_PATH)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("deskhand").join("config.toml"));
        }
        paths
    }

    /// Expand environment variables in the format `${VAR}` or `${VAR:-default}`.
    fn expand_env_vars(content: &str) -> Result<String, ConfigError> {
        let re = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .map_err(|e| ConfigError::InvalidFormat(e.to_string()))?;

        let mut result = String::with_capacity(content.len());
        let mut last = 0;
        for cap in re.captures_iter(content) {
            let Some(whole) = cap.get(0) else { continue };
            let var_name = &cap[1];
            let value = match (std::env::var(var_name), cap.get(2)) {
                (Ok(value), _) => value,
                (Err(_), Some(fallback)) => fallback.as_str().to_string(),
                (Err(_), None) => return Err(ConfigError::EnvVarNotSet(var_name.to_string())),
            };
            result.push_str(&content[last..whole.start()]);
            result.push_str(&value);
            last = whole.end();
        }
        result.push_str(&content[last..]);

        Ok(result)
    }

    /// Expand shell-style paths (e.g., `~/.deskhand`).
    pub fn expand_path(path: &str) -> String {
        shellexpand::tilde(path).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::BackendKind;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_empty_config() {
        let config = ConfigLoader::load_str("").unwrap();
        assert_eq!(config.server.port, 8765);
    }

    #[test]
    fn test_load_full_config() {
        let content = r#"
            [server]
            host = "0.0.0.0"
            port = 3000

            [backend]
            kind = "dry_run"

            [snapshot]
            after_action = false
            max_pixels = 250000

            [autopress]
            min_interval_ms = 50

            [sequence]
            max_delay_ms = 5000

            [logging]
            level = "debug"
            file = true
            dir = "/var/log/deskhand"
        "#;
        let config = ConfigLoader::load_str(content).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.backend.kind, BackendKind::DryRun);
        assert!(!config.snapshot.after_action);
        assert_eq!(config.snapshot.max_pixels, 250_000);
        assert_eq!(config.autopress.min_interval_ms, 50);
        assert_eq!(config.sequence.max_delay_ms, 5000);
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.file);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[server]").unwrap();
        writeln!(file, "port = 5000").unwrap();

        let config = ConfigLoader::load(file.path()).unwrap();
        assert_eq!(config.server.port, 5000);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = ConfigLoader::load(Path::new("/nonexistent/path/deskhand.toml"));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_invalid_toml() {
        let result = ConfigLoader::load_str("port = [unclosed");
        assert!(matches!(result, Err(ConfigError::TomlParse(_))));
    }

    #[test]
    fn test_discover_explicit_path() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[sequence]\nmax_delay_ms = 10").unwrap();

        let (config, source) = ConfigLoader::discover(Some(file.path())).unwrap();
        assert_eq!(config.sequence.max_delay_ms, 10);
        assert_eq!(source.as_deref(), Some(file.path()));
    }

    #[test]
    fn test_discover_explicit_missing_fails() {
        let result = ConfigLoader::discover(Some(Path::new("/nonexistent/deskhand.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_search_paths_start_local() {
        let paths = ConfigLoader::search_paths();
        assert_eq!(paths[0], PathBuf::from(LOCAL_CONFIG_PATH));
    }

    #[test]
    fn test_expand_env_vars() {
        // SAFETY: This test runs in isolation and sets a unique test-only env var
        unsafe {
            std::env::set_var("DESKHAND_TEST_PORT", "9100");
        }
        let expanded = ConfigLoader::expand_env_vars("port = ${DESKHAND_TEST_PORT}").unwrap();
        assert_eq!(expanded, "port = 9100");
        unsafe {
            std::env::remove_var("DESKHAND_TEST_PORT");
        }
    }

    #[test]
    fn test_expand_env_vars_not_set() {
        let result = ConfigLoader::expand_env_vars("value = \"${DESKHAND_UNSET_VAR_12345}\"");
        assert!(matches!(result, Err(ConfigError::EnvVarNotSet(name)) if name == "DESKHAND_UNSET_VAR_12345"));
    }

    #[test]
    fn test_expand_env_vars_fallback() {
        let expanded =
            ConfigLoader::expand_env_vars("host = \"${DESKHAND_UNSET_HOST_12345:-0.0.0.0}\"").unwrap();
        assert_eq!(expanded, "host = \"0.0.0.0\"");
    }

    #[test]
    fn test_expand_env_vars_no_vars() {
        let content = "value = \"no variables here\"";
        let expanded = ConfigLoader::expand_env_vars(content).unwrap();
        assert_eq!(expanded, content);
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let expanded = ConfigLoader::expand_path("~/test");
        assert!(!expanded.starts_with('~'));
        assert!(expanded.ends_with("/test"));
    }

    #[test]
    fn test_expand_path_no_tilde() {
        assert_eq!(ConfigLoader::expand_path("/usr/local/bin"), "/usr/local/bin");
    }
}
