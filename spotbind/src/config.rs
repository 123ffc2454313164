//! Where to find the native library.
//!
//! Config file lives at `~/.config/spotbind/config.toml`. The
//! `LIBSPOTIFY_BIN` environment variable names an explicit library path and
//! wins over the file.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Environment variable holding an explicit library path.
pub const LIBRARY_ENV: &str = "LIBSPOTIFY_BIN";

/// Framework location used by the macOS distribution of the library.
pub const FRAMEWORK_PATH: &str = "/Library/Frameworks/libspotify.framework/libspotify";

/// Installation instructions shown when no candidate loads.
pub const INSTALL_HINT: &str = "https://github.com/Burgestrand/Hallon/wiki/How-to-install-libspotify";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    /// Explicit path to the shared library. Tried first.
    pub library_path: Option<PathBuf>,
    /// Additional locations tried after the platform defaults.
    pub extra_search_paths: Vec<PathBuf>,
}

pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("spotbind")
}

pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

impl LibraryConfig {
    /// Load the default config file; a missing or unreadable file yields defaults.
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match std::fs::read_to_string(path) {
            Ok(s) => match toml::from_str(&s) {
                Ok(c) => return c,
                Err(e) => tracing::warn!("bad config file {}: {e}", path.display()),
            },
            Err(e) => tracing::warn!("can't read {}: {e}", path.display()),
        }
        Self::default()
    }

    /// Apply the `LIBSPOTIFY_BIN` override from the process environment.
    pub fn with_env(self) -> Self {
        self.with_env_value(std::env::var_os(LIBRARY_ENV).map(PathBuf::from))
    }

    /// Apply an explicit library path override, if one is given.
    pub fn with_env_value(mut self, value: Option<PathBuf>) -> Self {
        if let Some(path) = value.filter(|p| !p.as_os_str().is_empty()) {
            self.library_path = Some(path);
        }
        self
    }

    /// Library locations in the order they are tried.
    pub fn candidates(&self) -> Vec<PathBuf> {
        let mut out = Vec::new();
        if let Some(ref path) = self.library_path {
            out.push(path.clone());
        }
        out.push(PathBuf::from(libloading::library_filename("spotify")));
        out.push(PathBuf::from(FRAMEWORK_PATH));
        out.extend(self.extra_search_paths.iter().cloned());
        let mut seen = HashSet::new();
        out.retain(|p| seen.insert(p.clone()));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_candidates() {
        let cfg = LibraryConfig::default();
        let c = cfg.candidates();
        assert_eq!(c.len(), 2);
        assert!(c[0].to_string_lossy().contains("spotify"));
        assert_eq!(c[1], PathBuf::from(FRAMEWORK_PATH));
    }

    #[test]
    fn test_explicit_path_first_extras_last() {
        let cfg = LibraryConfig {
            library_path: Some(PathBuf::from("/opt/lib/libspotify.so.12")),
            extra_search_paths: vec![PathBuf::from("/usr/local/lib/libspotify.so")],
        };
        let c = cfg.candidates();
        assert_eq!(c.first().unwrap(), &PathBuf::from("/opt/lib/libspotify.so.12"));
        assert_eq!(c.last().unwrap(), &PathBuf::from("/usr/local/lib/libspotify.so"));
    }

    #[test]
    fn test_candidates_listed_once() {
        let cfg = LibraryConfig {
            library_path: Some(PathBuf::from("/opt/lib/libspotify.so.12")),
            extra_search_paths: vec![
                PathBuf::from("/usr/local/lib/libspotify.so"),
                PathBuf::from("/opt/lib/libspotify.so.12"),
                PathBuf::from(FRAMEWORK_PATH),
            ],
        };
        let c = cfg.candidates();
        assert_eq!(c.len(), 4);
        assert_eq!(c[0], PathBuf::from("/opt/lib/libspotify.so.12"));
        assert_eq!(c[2], PathBuf::from(FRAMEWORK_PATH));
        assert_eq!(c[3], PathBuf::from("/usr/local/lib/libspotify.so"));
    }

    #[test]
    fn test_env_overrides_file() {
        let cfg = LibraryConfig {
            library_path: Some(PathBuf::from("/from/file")),
            ..Default::default()
        }
        .with_env_value(Some(PathBuf::from("/from/env")));
        assert_eq!(cfg.library_path, Some(PathBuf::from("/from/env")));
    }

    #[test]
    fn test_empty_env_ignored() {
        let cfg = LibraryConfig {
            library_path: Some(PathBuf::from("/from/file")),
            ..Default::default()
        }
        .with_env_value(Some(PathBuf::new()));
        assert_eq!(cfg.library_path, Some(PathBuf::from("/from/file")));
    }

    #[test]
    fn test_parse_toml() {
        let cfg: LibraryConfig = toml::from_str(
            r#"
library_path = "/opt/libspotify.so"
extra_search_paths = ["/a", "/b"]
"#,
        )
        .unwrap();
        assert_eq!(cfg.library_path, Some(PathBuf::from("/opt/libspotify.so")));
        assert_eq!(cfg.extra_search_paths.len(), 2);

        let empty: LibraryConfig = toml::from_str("").unwrap();
        assert_eq!(empty, LibraryConfig::default());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let cfg = LibraryConfig::load_from(Path::new("/nonexistent/spotbind/config.toml"));
        assert_eq!(cfg, LibraryConfig::default());
    }
}
