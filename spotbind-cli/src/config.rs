//! Library location for the CLI.
//!
//! Merges CLI flags > `LIBSPOTIFY_BIN` > config file > defaults.

use std::path::PathBuf;

use spotbind::config::{config_path, LibraryConfig, LIBRARY_ENV};

/// Resolve the effective library config.
pub fn resolve(cli: &super::Cli) -> LibraryConfig {
    let path = cli.config.clone().unwrap_or_else(config_path);
    let file = LibraryConfig::load_from(&path);
    merge(cli.library.clone(), std::env::var_os(LIBRARY_ENV).map(PathBuf::from), file)
}

/// Merge: CLI override > environment > config file.
pub fn merge(cli_library: Option<PathBuf>, env: Option<PathBuf>, file: LibraryConfig) -> LibraryConfig {
    let config = file.with_env_value(env);
    match cli_library {
        Some(path) => LibraryConfig {
            library_path: Some(path),
            ..config
        },
        None => config,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file() -> LibraryConfig {
        LibraryConfig {
            library_path: Some(PathBuf::from("/file/libspotify.so")),
            extra_search_paths: vec![PathBuf::from("/extra")],
        }
    }

    #[test]
    fn test_cli_wins() {
        let cfg = merge(
            Some(PathBuf::from("/cli/libspotify.so")),
            Some(PathBuf::from("/env/libspotify.so")),
            file(),
        );
        assert_eq!(cfg.library_path, Some(PathBuf::from("/cli/libspotify.so")));
        assert_eq!(cfg.extra_search_paths, vec![PathBuf::from("/extra")]);
    }

    #[test]
    fn test_env_beats_file() {
        let cfg = merge(None, Some(PathBuf::from("/env/libspotify.so")), file());
        assert_eq!(cfg.library_path, Some(PathBuf::from("/env/libspotify.so")));
    }

    #[test]
    fn test_file_then_defaults() {
        let cfg = merge(None, None, file());
        assert_eq!(cfg.library_path, Some(PathBuf::from("/file/libspotify.so")));

        let cfg = merge(None, None, LibraryConfig::default());
        assert_eq!(cfg, LibraryConfig::default());
    }
}
