use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::difficulty::DifficultyTable;
use crate::error::{Error, Result};
use crate::motion::{BarGeometry, DEFAULT_BAR_WIDTH, DEFAULT_CURSOR_PADDING};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub bar_width: u32,
    /// Distance the cursor keeps from either bar edge at its turning points
    pub cursor_horizontal_offset: u32,
    pub difficulties: DifficultyTable,
    pub gauge_outer_color: [u8; 3],
    pub gauge_inner_color: [u8; 3],
    /// Suppress configuration diagnostics
    pub disable_debug: bool,
    pub tick_rate_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bar_width: DEFAULT_BAR_WIDTH,
            cursor_horizontal_offset: DEFAULT_CURSOR_PADDING,
            difficulties: DifficultyTable::default(),
            gauge_outer_color: [254, 255, 0],
            gauge_inner_color: [60, 255, 0],
            disable_debug: false,
            tick_rate_ms: 16,
        }
    }
}

impl Config {
    pub fn geometry(&self) -> BarGeometry {
        BarGeometry::new(self.bar_width, self.cursor_horizontal_offset)
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "sweetspot") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("sweetspot_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load, distinguishing a missing file (defaults) from a broken one (error)
    pub fn try_load(&self) -> Result<Config> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Config::default()),
            Err(source) => {
                return Err(Error::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        serde_json::from_slice::<Config>(&bytes).map_err(|source| Error::Parse {
            path: self.path.clone(),
            source,
        })
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        match self.try_load() {
            Ok(cfg) => cfg,
            Err(e) => {
                log::warn!("{e}; using default configuration");
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> Result<()> {
        let io_err = |source| Error::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data).map_err(io_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::difficulty::DifficultyEntry;
    use assert_matches::assert_matches;
    use tempfile::tempdir;

    #[test]
    fn roundtrip_default_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config::default();
        store.save(&cfg).unwrap();
        let loaded = store.load();
        assert_eq!(cfg, loaded);
    }

    #[test]
    fn save_and_load_custom_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config {
            bar_width: 300,
            cursor_horizontal_offset: 4,
            difficulties: DifficultyTable::empty().with("normal", DifficultyEntry::new(50, 3)),
            gauge_outer_color: [1, 2, 3],
            gauge_inner_color: [4, 5, 6],
            disable_debug: true,
            tick_rate_ms: 33,
        };
        store.save(&cfg).unwrap();
        assert_eq!(store.try_load().unwrap(), cfg);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let store = FileConfigStore::with_path(dir.path().join("absent.json"));
        assert_eq!(store.try_load().unwrap(), Config::default());
    }

    #[test]
    fn corrupt_file_is_a_parse_error_but_load_falls_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, b"{ not json").unwrap();
        let store = FileConfigStore::with_path(&path);

        assert_matches!(store.try_load(), Err(Error::Parse { .. }));
        assert_eq!(store.load(), Config::default());
    }

    #[test]
    fn partial_file_fills_remaining_fields() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, br#"{ "bar_width": 400, "disable_debug": true }"#).unwrap();
        let cfg = FileConfigStore::with_path(&path).try_load().unwrap();

        assert_eq!(cfg.bar_width, 400);
        assert!(cfg.disable_debug);
        assert_eq!(cfg.cursor_horizontal_offset, 10);
        assert_eq!(cfg.difficulties, DifficultyTable::default());
        assert_eq!(cfg.geometry(), BarGeometry::new(400, 10));
    }
}
