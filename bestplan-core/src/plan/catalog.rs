use std::path::{Path, PathBuf};

use tracing::debug;

use super::error::{PlanError, PlanResult};
use super::models::Catalog;

/// Anything able to hand over the full plan catalog.
pub trait CatalogSource {
    fn load(&self) -> PlanResult<Catalog>;
}

impl CatalogSource for Catalog {
    fn load(&self) -> PlanResult<Catalog> {
        validate(self)?;
        Ok(self.clone())
    }
}

/// Reads a `{"plans": [{"name", "cost", "features"}, ...]}` document.
#[derive(Debug, Clone)]
pub struct JsonCatalogSource {
    path: PathBuf,
}

impl JsonCatalogSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CatalogSource for JsonCatalogSource {
    fn load(&self) -> PlanResult<Catalog> {
        let content = std::fs::read_to_string(&self.path).map_err(|source| PlanError::Io {
            path: self.path.clone(),
            source,
        })?;
        let catalog = parse_catalog(&content, &self.path)?;
        debug!(
            target: "plan.catalog",
            path = %self.path.display(),
            plans = catalog.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }
}

pub fn parse_catalog(content: &str, origin: &Path) -> PlanResult<Catalog> {
    let catalog: Catalog = serde_json::from_str(content).map_err(|source| PlanError::Serde {
        path: origin.to_path_buf(),
        source,
    })?;
    validate(&catalog)?;
    Ok(catalog)
}

fn validate(catalog: &Catalog) -> PlanResult<()> {
    for (position, plan) in catalog.plans().iter().enumerate() {
        if plan.name.trim().is_empty() {
            return Err(PlanError::InvalidPlan {
                position,
                reason: "name is empty".to_string(),
            });
        }
        if !plan.cost.is_finite() || plan.cost < 0.0 {
            return Err(PlanError::InvalidCost {
                name: plan.name.clone(),
                cost: plan.cost,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::models::Plan;

    #[test]
    fn parses_plan_records() {
        let catalog = parse_catalog(
            r#"{"plans": [{"name": "P1", "cost": 2.0, "features": ["F1", "F2"]}]}"#,
            Path::new("inline.json"),
        )
        .unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.plans()[0].features, vec!["F1", "F2"]);
    }

    #[test]
    fn missing_cost_is_fatal() {
        let err = parse_catalog(
            r#"{"plans": [{"name": "P1", "features": ["F1"]}]}"#,
            Path::new("broken.json"),
        )
        .unwrap_err();
        assert!(matches!(err, PlanError::Serde { .. }));
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn missing_features_is_fatal() {
        let err = parse_catalog(
            r#"{"plans": [{"name": "P1", "cost": 1.0}]}"#,
            Path::new("broken.json"),
        )
        .unwrap_err();
        assert!(matches!(err, PlanError::Serde { .. }));
    }

    #[test]
    fn negative_cost_is_rejected() {
        let catalog = Catalog::new(vec![Plan::new("cheap", -1.0, ["F1"])]);
        let err = catalog.load().unwrap_err();
        assert!(matches!(err, PlanError::InvalidCost { ref name, .. } if name == "cheap"));
    }

    #[test]
    fn blank_name_is_rejected() {
        let catalog = Catalog::new(vec![
            Plan::new("ok", 1.0, ["F1"]),
            Plan::new("  ", 1.0, ["F2"]),
        ]);
        let err = catalog.load().unwrap_err();
        assert!(matches!(err, PlanError::InvalidPlan { position: 1, .. }));
    }

    #[test]
    fn json_source_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bundle.json");
        std::fs::write(
            &path,
            r#"{"plans": [{"name": "solo", "cost": 0.0, "features": []}]}"#,
        )
        .unwrap();
        let catalog = JsonCatalogSource::new(&path).load().unwrap();
        assert_eq!(catalog.find("solo").map(Plan::feature_count), Some(0));
    }

    #[test]
    fn json_source_missing_file() {
        let source = JsonCatalogSource::new("nowhere/bundle.json");
        assert!(matches!(source.load(), Err(PlanError::Io { .. })));
    }
}
