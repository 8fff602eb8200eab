//! # Configuration
//!
//! Pasteboard configuration is managed by [`clapfig`], which handles layered
//! loading from TOML files, environment variables, and compiled defaults.
//!
//! ## Storage Hierarchy
//!
//! Configuration is resolved in priority order:
//! 1. **Environment variables**: `PASTEBOARD__PAGE_SIZE`, `PASTEBOARD__NAV_WINDOW`, etc.
//! 2. **Data dir config**: `<data dir>/pasteboard.toml`.
//! 3. **Compiled Defaults**: Built-in fallbacks via `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `database` | `<data dir>/pasteboard.sqlite` | SQLite database file |
//! | `page_size` | `50` | Pastes per browse page |
//! | `home_page_size` | `10` | Pastes on the front page |
//! | `nav_window` | `3` | Page links shown either side of the current page |

use confique::Config;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use crate::browse;
use crate::error::Result;

pub const CONFIG_FILENAME: &str = "pasteboard.toml";
pub const DATABASE_FILENAME: &str = "pasteboard.sqlite";

/// Configuration for pasteboard, stored in `pasteboard.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PasteConfig {
    /// SQLite database file. When absent, `pasteboard.sqlite` in the data dir.
    pub database: Option<PathBuf>,

    /// Pastes per browse page.
    #[config(default = 50)]
    pub page_size: usize,

    /// Pastes listed on the front page.
    #[config(default = 10)]
    pub home_page_size: usize,

    /// Radius of the page-number navigation window.
    #[config(default = 3)]
    pub nav_window: usize,
}

impl Default for PasteConfig {
    fn default() -> Self {
        Self {
            database: None,
            page_size: 50,
            home_page_size: 10,
            nav_window: 3,
        }
    }
}

impl PasteConfig {
    /// The database file, resolved against `data_dir` when relative or unset.
    pub fn database_path(&self, data_dir: &Path) -> PathBuf {
        match &self.database {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => data_dir.join(path),
            None => data_dir.join(DATABASE_FILENAME),
        }
    }

    pub fn page_size(&self) -> Result<NonZeroUsize> {
        browse::page_size(self.page_size)
    }

    pub fn home_page_size(&self) -> Result<NonZeroUsize> {
        browse::page_size(self.home_page_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PasteError;

    #[test]
    fn test_default_config() {
        let config = PasteConfig::default();
        assert_eq!(config.database, None);
        assert_eq!(config.page_size().unwrap().get(), 50);
        assert_eq!(config.home_page_size().unwrap().get(), 10);
        assert_eq!(config.nav_window, 3);
    }

    #[test]
    fn test_database_path_default() {
        let config = PasteConfig::default();
        assert_eq!(
            config.database_path(Path::new("/var/lib/pb")),
            PathBuf::from("/var/lib/pb/pasteboard.sqlite")
        );
    }

    #[test]
    fn test_database_path_relative_and_absolute() {
        let relative = PasteConfig {
            database: Some(PathBuf::from("db/pastes.db")),
            ..Default::default()
        };
        assert_eq!(
            relative.database_path(Path::new("/data")),
            PathBuf::from("/data/db/pastes.db")
        );

        let absolute = PasteConfig {
            database: Some(PathBuf::from("/srv/pastes.db")),
            ..Default::default()
        };
        assert_eq!(
            absolute.database_path(Path::new("/data")),
            PathBuf::from("/srv/pastes.db")
        );
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let config = PasteConfig {
            page_size: 0,
            ..Default::default()
        };
        assert!(matches!(config.page_size(), Err(PasteError::InvalidPageSize)));
    }

    #[test]
    fn test_serde_roundtrip_keeps_fields() {
        let config = PasteConfig {
            database: Some(PathBuf::from("x.db")),
            page_size: 20,
            home_page_size: 5,
            nav_window: 2,
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: PasteConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
