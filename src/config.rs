use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ArenaError, Result};

const APP_DIR_NAME: &str = "snake-arena";
const CONFIG_FILE_NAME: &str = "config.json";

/// Default number of agents in a session.
pub const DEFAULT_NUM_AGENTS: usize = 4;

/// Default number of food items kept on the grid.
pub const DEFAULT_NUM_FOOD: usize = 2;

/// Default grid rows.
pub const DEFAULT_GRID_ROWS: u16 = 100;

/// Default grid columns.
pub const DEFAULT_GRID_COLS: u16 = 100;

/// Occupied fraction above which food respawn logs a warning.
pub const DEFAULT_OCCUPANCY_WARN_THRESHOLD: f64 = 0.9;

/// Upper bound on agents, so the doubled cell encoding fits in `i32`.
pub const MAX_AGENTS: usize = 1 << 24;

/// Logical grid dimensions.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct GridSize {
    pub rows: u16,
    pub cols: u16,
}

impl GridSize {
    #[must_use]
    pub fn new(rows: u16, cols: u16) -> Self {
        Self { rows, cols }
    }

    /// Returns the total number of cells in the grid.
    #[must_use]
    pub fn total_cells(self) -> usize {
        usize::from(self.rows) * usize::from(self.cols)
    }
}

impl Default for GridSize {
    fn default() -> Self {
        Self {
            rows: DEFAULT_GRID_ROWS,
            cols: DEFAULT_GRID_COLS,
        }
    }
}

/// Construction parameters for one arena session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub num_agents: usize,
    pub num_food: usize,
    pub grid_size: GridSize,
    /// Accepted and stored, but dead bodies are never converted to food.
    pub dead_to_food: bool,
    pub occupancy_warn_threshold: f64,
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            num_agents: DEFAULT_NUM_AGENTS,
            num_food: DEFAULT_NUM_FOOD,
            grid_size: GridSize::default(),
            dead_to_food: false,
            occupancy_warn_threshold: DEFAULT_OCCUPANCY_WARN_THRESHOLD,
            seed: None,
        }
    }
}

impl SessionConfig {
    /// Checks that a session with this configuration can be constructed.
    pub fn validate(&self) -> Result<()> {
        if self.num_agents == 0 {
            return Err(ArenaError::InvalidConfig(
                "at least one agent is required".to_string(),
            ));
        }
        if self.num_agents > MAX_AGENTS {
            return Err(ArenaError::InvalidConfig(format!(
                "at most {MAX_AGENTS} agents are supported, got {}",
                self.num_agents
            )));
        }
        if self.grid_size.rows == 0 || self.grid_size.cols == 0 {
            return Err(ArenaError::InvalidConfig(format!(
                "grid dimensions must be positive, got {}x{}",
                self.grid_size.rows, self.grid_size.cols
            )));
        }

        let needed = self.num_agents + self.num_food;
        let available = self.grid_size.total_cells();
        if needed > available {
            return Err(ArenaError::InvalidConfig(format!(
                "{} agents and {} food need {needed} cells, grid has {available}",
                self.num_agents, self.num_food
            )));
        }
        if !(0.0..=1.0).contains(&self.occupancy_warn_threshold) {
            return Err(ArenaError::InvalidConfig(format!(
                "occupancy warn threshold must be within [0, 1], got {}",
                self.occupancy_warn_threshold
            )));
        }

        Ok(())
    }
}

/// Returns the platform-correct default configuration path.
#[must_use]
pub fn config_path() -> PathBuf {
    let mut base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push(APP_DIR_NAME);
    base.push(CONFIG_FILE_NAME);
    base
}

/// Loads the configuration from the default path.
///
/// Returns the defaults when the file does not exist yet. Returns `Err` when
/// the file exists but cannot be read or parsed.
pub fn load_config() -> Result<SessionConfig> {
    match load_config_from_path(&config_path()) {
        Err(ArenaError::ConfigIo(error)) if error.kind() == io::ErrorKind::NotFound => {
            Ok(SessionConfig::default())
        }
        other => other,
    }
}

/// Loads the configuration from an explicit path; a missing file is an error.
pub fn load_config_from_path(path: &Path) -> Result<SessionConfig> {
    let raw = fs::read_to_string(path)?;
    let config = serde_json::from_str::<SessionConfig>(&raw)?;
    Ok(config)
}

/// Saves the configuration, creating parent directories when needed.
pub fn save_config_to_path(path: &Path, config: &SessionConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(config)?;
    fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::{GridSize, SessionConfig, load_config_from_path, save_config_to_path};
    use crate::error::ArenaError;

    #[test]
    fn default_config_is_valid() {
        assert!(SessionConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_agents_is_rejected() {
        let config = SessionConfig {
            num_agents: 0,
            ..SessionConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ArenaError::InvalidConfig(_))
        ));
    }

    #[test]
    fn overfull_grid_is_rejected() {
        let config = SessionConfig {
            num_agents: 3,
            num_food: 2,
            grid_size: GridSize::new(2, 2),
            ..SessionConfig::default()
        };
        assert!(config.validate().is_err());

        let exact = SessionConfig {
            num_food: 1,
            ..config
        };
        assert!(exact.validate().is_ok());
    }

    #[test]
    fn config_round_trips_through_file() {
        let path = unique_test_path("round_trip");
        let config = SessionConfig {
            num_agents: 7,
            dead_to_food: true,
            seed: Some(99),
            ..SessionConfig::default()
        };

        save_config_to_path(&path, &config).expect("config save should succeed");
        let loaded = load_config_from_path(&path).expect("load should succeed");

        assert_eq!(loaded, config);
        cleanup_test_path(&path);
    }

    #[test]
    fn partial_config_file_uses_defaults() {
        let path = unique_test_path("partial");
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("test parent directory should be creatable");
        }
        fs::write(&path, r#"{ "num_agents": 9 }"#).expect("test file write should succeed");

        let loaded = load_config_from_path(&path).expect("partial file should parse");

        assert_eq!(loaded.num_agents, 9);
        assert_eq!(loaded.grid_size, GridSize::default());
        cleanup_test_path(&path);
    }

    #[test]
    fn malformed_config_file_returns_error() {
        let path = unique_test_path("malformed");
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("test parent directory should be creatable");
        }
        fs::write(&path, "not-json").expect("test file write should succeed");

        assert!(matches!(
            load_config_from_path(&path),
            Err(ArenaError::ConfigParse(_))
        ));

        cleanup_test_path(&path);
    }

    fn unique_test_path(label: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time should be after epoch")
            .as_nanos();

        std::env::temp_dir()
            .join(format!("snake-arena-config-{label}-{nanos}"))
            .join("config.json")
    }

    fn cleanup_test_path(path: &PathBuf) {
        let _ = fs::remove_file(path);
        if let Some(parent) = path.parent() {
            let _ = fs::remove_dir(parent);
        }
    }
}
