//! Configuration file support for vizboot
//!
//! The config file is optional: it only supplies defaults for flags the user
//! would otherwise type on every run. CLI flags always win.

use crate::bootstrap::{DEFAULT_PROJECT, DEFAULT_SITE};
use crate::error::{Error, Result};
use dirs::home_dir;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration directory name
const CONFIG_DIR: &str = "vizboot";

/// Configuration file name
const CONFIG_FILE: &str = "config.toml";

/// Optional defaults loaded from `~/.config/vizboot/config.toml`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    /// Server address, e.g. `https://analytics.example.com`
    pub server: Option<String>,
    /// Username to sign in with
    pub username: Option<String>,
    /// Site name to target instead of "Default"
    pub site: Option<String>,
    /// Project name to target instead of "Default"
    pub project: Option<String>,
}

/// Get the configuration directory
pub fn get_config_dir() -> Result<PathBuf> {
    let home =
        home_dir().ok_or_else(|| Error::Config("Cannot determine home directory".to_string()))?;
    Ok(home.join(".config").join(CONFIG_DIR))
}

/// Get the configuration file path
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join(CONFIG_FILE))
}

/// Load configuration from the default location; a missing file yields an
/// all-default config
pub fn load_config() -> Result<ConfigFile> {
    load_config_from(&get_config_path()?)
}

/// Load configuration from an explicit path
pub fn load_config_from(path: &Path) -> Result<ConfigFile> {
    if !path.exists() {
        return Ok(ConfigFile::default());
    }

    let content = fs::read_to_string(path).map_err(|e| Error::InvalidConfig {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&content).map_err(|e| Error::InvalidConfig {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    validate_config(&config)?;
    Ok(config)
}

/// Validate configuration
pub fn validate_config(config: &ConfigFile) -> Result<()> {
    if let Some(server) = &config.server {
        if !server.starts_with("http://") && !server.starts_with("https://") {
            return Err(Error::Config(format!(
                "Server address must start with http:// or https:// (got '{}')",
                server
            )));
        }
    }

    if let Some(site) = &config.site {
        if site.is_empty() {
            return Err(Error::Config("Site name cannot be empty".to_string()));
        }
    }

    if let Some(project) = &config.project {
        if project.is_empty() {
            return Err(Error::Config("Project name cannot be empty".to_string()));
        }
    }

    Ok(())
}

/// Check if a configuration file exists at the default location
pub fn config_exists() -> bool {
    get_config_path().map(|p| p.exists()).unwrap_or(false)
}

/// Bootstrap targets after merging CLI flags over the config file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTargets {
    pub server: String,
    pub username: String,
    pub site: String,
    pub project: String,
}

/// Merge CLI flags over the config file: a flag always wins, the config
/// fills gaps, and site/project fall back to "Default". Server and username
/// must come from one of the two.
pub fn resolve_targets(
    config: &ConfigFile,
    server: Option<&str>,
    username: Option<&str>,
    site: Option<&str>,
    project: Option<&str>,
) -> Result<ResolvedTargets> {
    let server = server
        .map(str::to_string)
        .or_else(|| config.server.clone())
        .ok_or_else(|| {
            Error::Config(
                "Server address required (pass --server or set it in the config file)".to_string(),
            )
        })?;

    let username = username
        .map(str::to_string)
        .or_else(|| config.username.clone())
        .ok_or_else(|| {
            Error::Config(
                "Username required (pass --username or set it in the config file)".to_string(),
            )
        })?;

    let site = site
        .map(str::to_string)
        .or_else(|| config.site.clone())
        .unwrap_or_else(|| DEFAULT_SITE.to_string());

    let project = project
        .map(str::to_string)
        .or_else(|| config.project.clone())
        .unwrap_or_else(|| DEFAULT_PROJECT.to_string());

    Ok(ResolvedTargets {
        server,
        username,
        site,
        project,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load_config_from(&dir.path().join("config.toml")).unwrap();
        assert!(config.server.is_none());
        assert!(config.username.is_none());
    }

    #[test]
    fn test_load_partial_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "server = \"https://analytics.example.com\"\nusername = \"admin\"\n",
        )
        .unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.server.as_deref(), Some("https://analytics.example.com"));
        assert_eq!(config.username.as_deref(), Some("admin"));
        assert!(config.site.is_none());
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "server = [not toml").unwrap();

        assert!(load_config_from(&path).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_server_scheme() {
        let config = ConfigFile {
            server: Some("analytics.example.com".to_string()),
            ..Default::default()
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_rejects_empty_site() {
        let config = ConfigFile {
            site: Some(String::new()),
            ..Default::default()
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_accepts_all_defaults() {
        assert!(validate_config(&ConfigFile::default()).is_ok());
    }

    fn populated_config() -> ConfigFile {
        ConfigFile {
            server: Some("https://config.example.com".to_string()),
            username: Some("config-user".to_string()),
            site: Some("ConfigSite".to_string()),
            project: Some("ConfigProject".to_string()),
        }
    }

    #[test]
    fn test_flags_win_over_populated_config() {
        let targets = resolve_targets(
            &populated_config(),
            Some("https://flag.example.com"),
            Some("flag-user"),
            Some("FlagSite"),
            Some("FlagProject"),
        )
        .unwrap();

        assert_eq!(targets.server, "https://flag.example.com");
        assert_eq!(targets.username, "flag-user");
        assert_eq!(targets.site, "FlagSite");
        assert_eq!(targets.project, "FlagProject");
    }

    #[test]
    fn test_config_fills_missing_flags() {
        let targets = resolve_targets(&populated_config(), None, None, None, None).unwrap();

        assert_eq!(targets.server, "https://config.example.com");
        assert_eq!(targets.username, "config-user");
        assert_eq!(targets.site, "ConfigSite");
        assert_eq!(targets.project, "ConfigProject");
    }

    #[test]
    fn test_site_and_project_default_when_unset_everywhere() {
        let config = ConfigFile {
            server: Some("https://config.example.com".to_string()),
            username: Some("config-user".to_string()),
            ..Default::default()
        };

        let targets = resolve_targets(&config, None, None, None, None).unwrap();
        assert_eq!(targets.site, "Default");
        assert_eq!(targets.project, "Default");
    }

    #[test]
    fn test_missing_server_is_an_error() {
        let err = resolve_targets(
            &ConfigFile::default(),
            None,
            Some("admin"),
            None,
            None,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_missing_username_is_an_error() {
        let err = resolve_targets(
            &ConfigFile::default(),
            Some("https://analytics.example.com"),
            None,
            None,
            None,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
