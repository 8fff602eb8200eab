//! # Startup
//!
//! [`initialize`] builds everything a process needs to serve pastes: the data
//! directory, the configuration loaded from it, the SQLite store and the API
//! facade over that store. It runs once at startup and the resulting
//! [`PasteContext`] is held for the life of the process.
//!
//! ## Data Directory Resolution
//!
//! 1. The explicit `data_override` argument, if given.
//! 2. The `PASTEBOARD_DATA` environment variable, if set and non-empty.
//! 3. The OS data directory for pasteboard (via the `directories` crate).
//!
//! The config file `pasteboard.toml` is looked up in that directory. A missing
//! or unreadable config falls back to the compiled defaults.

use crate::api::{BrowseSettings, PasteApi};
use crate::config::{PasteConfig, CONFIG_FILENAME};
use crate::error::{PasteError, Result};
use crate::store::sqlite::SqliteStore;
use clapfig::{Clapfig, SearchMode, SearchPath};
use directories::ProjectDirs;
use std::path::PathBuf;
use tracing::info;

pub const DATA_DIR_ENV: &str = "PASTEBOARD_DATA";

pub struct PasteContext {
    pub api: PasteApi<SqliteStore>,
    pub config: PasteConfig,
    pub data_dir: PathBuf,
}

/// Pick the data directory from the override, then the env value, then the OS default.
pub fn resolve_data_dir(
    data_override: Option<PathBuf>,
    env_value: Option<String>,
) -> Result<PathBuf> {
    if let Some(path) = data_override {
        return Ok(path);
    }
    if let Some(value) = env_value.filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(value));
    }
    ProjectDirs::from("com", "pasteboard", "pasteboard")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| PasteError::Config("could not determine a data directory".to_string()))
}

/// Load `pasteboard.toml` from `data_dir`, or defaults.
pub fn load_config(data_dir: PathBuf) -> PasteConfig {
    Clapfig::builder()
        .app_name("pasteboard")
        .file_name(CONFIG_FILENAME)
        .search_paths(vec![SearchPath::Path(data_dir)])
        .search_mode(SearchMode::Merge)
        .load()
        .unwrap_or_default()
}

/// Initialize the pasteboard context: data dir, config, store and API.
pub fn initialize(data_override: Option<PathBuf>) -> Result<PasteContext> {
    let data_dir = resolve_data_dir(data_override, std::env::var(DATA_DIR_ENV).ok())?;
    let config = load_config(data_dir.clone());
    let settings = BrowseSettings::from_config(&config)?;

    let db_path = config.database_path(&data_dir);
    let store = SqliteStore::open(&db_path)?;
    info!(
        target: "pasteboard::init",
        data_dir = %data_dir.display(),
        database = %db_path.display(),
        "pasteboard initialized"
    );

    Ok(PasteContext {
        api: PasteApi::new(store, settings),
        config,
        data_dir,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PasteForm;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_prefers_override() {
        let dir = resolve_data_dir(Some(PathBuf::from("/a")), Some("/b".into())).unwrap();
        assert_eq!(dir, PathBuf::from("/a"));
    }

    #[test]
    fn test_resolve_uses_env_value() {
        let dir = resolve_data_dir(None, Some("/b".into())).unwrap();
        assert_eq!(dir, PathBuf::from("/b"));
    }

    #[test]
    fn test_resolve_ignores_empty_env_value() {
        // Falls through to the OS default, which is never the empty path
        if let Ok(dir) = resolve_data_dir(None, Some(String::new())) {
            assert_ne!(dir, PathBuf::new());
        }
    }

    #[test]
    fn test_initialize_with_defaults() {
        let temp = TempDir::new().unwrap();
        let mut ctx = initialize(Some(temp.path().to_path_buf())).unwrap();

        assert_eq!(ctx.config.page_size, 50);
        assert_eq!(ctx.data_dir, temp.path());
        assert!(temp.path().join("pasteboard.sqlite").exists());

        let loc = ctx.api.create_paste(PasteForm::new("hello")).unwrap();
        assert_eq!(ctx.api.raw(&loc.id.to_string()).unwrap(), "hello");
    }

    #[test]
    fn test_initialize_reads_config_file() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("pasteboard.toml"),
            "page_size = 7\ndatabase = \"pastes.db\"\n",
        )
        .unwrap();

        let ctx = initialize(Some(temp.path().to_path_buf())).unwrap();
        assert_eq!(ctx.config.page_size, 7);
        assert_eq!(ctx.api.settings().page_size.get(), 7);
        assert!(temp.path().join("pastes.db").exists());
    }

    #[test]
    fn test_initialize_rejects_zero_page_size() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("pasteboard.toml"), "page_size = 0\n").unwrap();
        assert!(matches!(
            initialize(Some(temp.path().to_path_buf())),
            Err(PasteError::InvalidPageSize)
        ));
    }
}
