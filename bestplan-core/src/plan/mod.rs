pub mod catalog;
pub mod error;
pub mod models;
pub mod report;
pub mod selection;

pub use catalog::{parse_catalog, CatalogSource, JsonCatalogSource};
pub use error::{PlanError, PlanResult};
pub use models::{Catalog, Combination, Plan};
pub use report::{BestPlan, SelectionReport, NO_MATCH_MESSAGE};
pub use selection::{
    build_feature_index, combination_count, enumerate_combinations, is_cheaper, select,
    FeatureIndex, PlanSelector,
};
