pub mod config;
pub mod error;
pub mod plan;

pub use config::{
    load_bestplan_config, BestPlanConfig, CatalogSection, LoggingSection, SelectionSection,
};
pub use error::{ConfigError, Result};
pub use plan::{
    build_feature_index, combination_count, enumerate_combinations, is_cheaper, parse_catalog,
    select, BestPlan, Catalog, CatalogSource, Combination, FeatureIndex, JsonCatalogSource, Plan,
    PlanError, PlanResult, PlanSelector, SelectionReport, NO_MATCH_MESSAGE,
};
