use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{ConfigError, Result};

pub const DEFAULT_CATALOG_PATH: &str = "data/bundle.json";
pub const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BestPlanConfig {
    #[serde(default)]
    pub catalog: CatalogSection,
    #[serde(default)]
    pub selection: SelectionSection,
    #[serde(default)]
    pub logging: LoggingSection,
    /// Directory relative catalog paths are resolved against. Set by the loader.
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

impl BestPlanConfig {
    pub fn resolve_path<P: AsRef<Path>>(&self, candidate: P) -> PathBuf {
        let path = candidate.as_ref();
        match &self.base_dir {
            Some(base) if !path.is_absolute() => base.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Absolute (or cwd-relative when no base dir is known) catalog location.
    pub fn catalog_path(&self) -> PathBuf {
        self.resolve_path(&self.catalog.path)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogSection {
    pub path: PathBuf,
}

impl Default for CatalogSection {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_CATALOG_PATH),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SelectionSection {
    /// Upper bound on enumerated combinations. `None` means unbounded.
    pub max_combinations: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSection {
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

pub fn load_bestplan_config<P: AsRef<Path>>(path: P) -> Result<BestPlanConfig> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        source,
        path: path.to_path_buf(),
    })?;
    let mut config = parse_config(&content, path)?;
    config.base_dir = Some(
        path.parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")),
    );
    Ok(config)
}

fn parse_config(content: &str, path: &Path) -> Result<BestPlanConfig> {
    let config: BestPlanConfig = toml::from_str(content).map_err(|source| ConfigError::Parse {
        source,
        path: path.to_path_buf(),
    })?;
    if config.selection.max_combinations == Some(0) {
        return Err(ConfigError::Invalid {
            field: "selection.max_combinations",
            reason: "must be greater than zero".to_string(),
            path: path.to_path_buf(),
        });
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_shipped_config() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../configs/bestplan.toml");
        let config = load_bestplan_config(&path).expect("config should parse");
        assert_eq!(config.logging.level, "warn");
        assert!(config.selection.max_combinations.is_none());
        assert!(config.catalog_path().ends_with("data/bundle.json"));
        assert!(config.catalog_path().exists());
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let config = parse_config("", Path::new("empty.toml")).unwrap();
        assert_eq!(config.catalog.path, PathBuf::from(DEFAULT_CATALOG_PATH));
        assert_eq!(config.logging.level, DEFAULT_LOG_LEVEL);
        assert_eq!(config.catalog_path(), PathBuf::from(DEFAULT_CATALOG_PATH));
    }

    #[test]
    fn zero_combination_cap_is_rejected() {
        let err = parse_config("[selection]\nmax_combinations = 0\n", Path::new("cap.toml"))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "selection.max_combinations",
                ..
            }
        ));
    }

    #[test]
    fn absolute_catalog_path_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = dir.path().join("plans.json");
        let config_path = dir.path().join("bestplan.toml");
        std::fs::write(
            &config_path,
            format!("[catalog]\npath = {:?}\n", catalog.display().to_string()),
        )
        .unwrap();
        let config = load_bestplan_config(&config_path).unwrap();
        assert_eq!(config.catalog_path(), catalog);
    }

    #[test]
    fn unreadable_config_reports_path() {
        let err = load_bestplan_config("does/not/exist.toml").unwrap_err();
        assert!(err.to_string().contains("does/not/exist.toml"));
    }
}
