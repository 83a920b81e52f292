use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::chunker::{DEFAULT_CHUNK_SIZE, MAX_CHUNK_SIZE};

/// Published clint report for the neovim sources.
pub const DEFAULT_REPORT_URL: &str =
    "https://raw.githubusercontent.com/neovim/doc/gh-pages/reports/clint/errors.json";

/// Settings for one run, loaded from `~/.config/errsplit/config.toml`.
/// Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    /// Location of the JSON-lines error report.
    pub url: String,
    /// Read size for the line chunker and libcurl's receive buffer.
    pub chunk_size: usize,
    /// Seconds allowed for the TCP/TLS connect.
    pub connect_timeout_secs: u64,
    /// Seconds allowed for a whole request.
    pub timeout_secs: u64,
    /// `User-Agent` sent with both requests.
    pub user_agent: String,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_REPORT_URL.to_string(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            connect_timeout_secs: 15,
            timeout_secs: 300,
            user_agent: concat!("errsplit/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl SplitConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Reject settings that would only fail later inside libcurl.
    pub fn validate(&self) -> Result<()> {
        let parsed = url::Url::parse(&self.url)
            .with_context(|| format!("invalid report URL: {}", self.url))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            bail!("report URL must be http or https: {}", self.url);
        }
        if self.chunk_size == 0 {
            bail!("chunk_size must be greater than zero");
        }
        if self.chunk_size > MAX_CHUNK_SIZE {
            bail!(
                "chunk_size {} exceeds the maximum of {} bytes",
                self.chunk_size,
                MAX_CHUNK_SIZE
            );
        }
        Ok(())
    }
}

/// Config file location under the XDG config home, if one exists.
pub fn config_path() -> Result<Option<PathBuf>> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("errsplit")?;
    Ok(xdg_dirs.find_config_file("config.toml"))
}

/// Parse a config file.
pub fn load_from(path: &Path) -> Result<SplitConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let cfg: SplitConfig =
        toml::from_str(&data).with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}

/// Load `explicit` if given, else the XDG file if present, else defaults.
/// Never writes anything.
pub fn load(explicit: Option<&Path>) -> Result<SplitConfig> {
    if let Some(path) = explicit {
        return load_from(path);
    }
    match config_path()? {
        Some(path) => {
            tracing::debug!("loading config from {}", path.display());
            load_from(&path)
        }
        None => Ok(SplitConfig::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = SplitConfig::default();
        assert_eq!(cfg.url, DEFAULT_REPORT_URL);
        assert_eq!(cfg.chunk_size, 8192);
        assert_eq!(cfg.connect_timeout_secs, 15);
        assert!(cfg.user_agent.starts_with("errsplit/"));
        cfg.validate().unwrap();
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = SplitConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: SplitConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn config_toml_partial_keeps_defaults() {
        let toml = r#"
            url = "http://127.0.0.1:8080/errors.json"
            chunk_size = 1024
        "#;
        let cfg: SplitConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.url, "http://127.0.0.1:8080/errors.json");
        assert_eq!(cfg.chunk_size, 1024);
        assert_eq!(cfg.timeout_secs, 300);
        cfg.validate().unwrap();
    }

    #[test]
    fn validate_rejects_bad_scheme_and_zero_chunk() {
        let mut cfg = SplitConfig {
            url: "ftp://example.org/errors.json".to_string(),
            ..SplitConfig::default()
        };
        assert!(cfg.validate().is_err());
        cfg.url = "not a url".to_string();
        assert!(cfg.validate().is_err());
        cfg.url = DEFAULT_REPORT_URL.to_string();
        cfg.chunk_size = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_bounds_chunk_size() {
        let mut cfg = SplitConfig {
            chunk_size: MAX_CHUNK_SIZE,
            ..SplitConfig::default()
        };
        cfg.validate().unwrap();
        cfg.chunk_size = MAX_CHUNK_SIZE + 1;
        assert!(cfg.validate().is_err());
        cfg.chunk_size = 1_099_511_627_776;
        let err = cfg.validate().unwrap_err().to_string();
        assert!(err.contains("exceeds the maximum"), "{}", err);
    }

    #[test]
    fn load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "timeout_secs = 5\n").unwrap();
        let cfg = load(Some(&path)).unwrap();
        assert_eq!(cfg.timeout_secs, 5);
        assert_eq!(cfg.url, DEFAULT_REPORT_URL);
    }

    #[test]
    fn load_explicit_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load(Some(&dir.path().join("absent.toml"))).is_err());
    }
}
