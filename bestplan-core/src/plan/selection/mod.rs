use std::collections::HashMap;

use tracing::{debug, info};

use super::error::{PlanError, PlanResult};
use super::models::{Catalog, Combination, Plan};

/// Feature name to every plan declaring it, in catalog order.
#[derive(Debug, Clone, Default)]
pub struct FeatureIndex<'a> {
    entries: HashMap<&'a str, Vec<&'a Plan>>,
}

impl<'a> FeatureIndex<'a> {
    /// Plans providing `feature`; empty when no plan declares it.
    pub fn plans_for(&self, feature: &str) -> &[&'a Plan] {
        self.entries
            .get(feature)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub fn build_feature_index(catalog: &Catalog) -> FeatureIndex<'_> {
    let mut entries: HashMap<&str, Vec<&Plan>> = HashMap::new();
    for plan in catalog.plans() {
        for feature in &plan.features {
            entries.entry(feature.as_str()).or_default().push(plan);
        }
    }
    FeatureIndex { entries }
}

/// Number of cross-product elements a request expands to.
///
/// Zero whenever the request is empty or any feature is unmatched.
pub fn combination_count<S: AsRef<str>>(index: &FeatureIndex<'_>, requested: &[S]) -> u128 {
    if requested.is_empty() {
        return 0;
    }
    requested.iter().fold(1u128, |total, feature| {
        total.saturating_mul(index.plans_for(feature.as_ref()).len() as u128)
    })
}

/// Every way of covering `requested`, one pick per feature, folded left to
/// right as a cartesian product and collapsed to distinct plans.
///
/// A feature without candidates empties the product, so the whole result
/// is empty no matter where that feature sits in the request.
pub fn enumerate_combinations<'a, S: AsRef<str>>(
    index: &FeatureIndex<'a>,
    requested: &[S],
) -> Vec<Combination<'a>> {
    let Some((first, rest)) = requested.split_first() else {
        return Vec::new();
    };

    let seed: Vec<Vec<&'a Plan>> = index
        .plans_for(first.as_ref())
        .iter()
        .map(|plan| vec![*plan])
        .collect();

    let picks = rest.iter().fold(seed, |partials, feature| {
        let candidates = index.plans_for(feature.as_ref());
        partials
            .iter()
            .flat_map(|partial| {
                candidates.iter().map(move |plan| {
                    let mut next = Vec::with_capacity(partial.len() + 1);
                    next.extend_from_slice(partial);
                    next.push(*plan);
                    next
                })
            })
            .collect()
    });

    picks.into_iter().map(Combination::from_picks).collect()
}

/// Whether `candidate` should replace `best`.
///
/// Lower total cost wins; at equal cost the larger summed feature count
/// wins. Anything else keeps the incumbent.
pub fn is_cheaper(candidate: &Combination<'_>, best: Option<&Combination<'_>>) -> bool {
    let Some(best) = best else {
        return true;
    };
    let cost = candidate.total_cost();
    let best_cost = best.total_cost();
    cost < best_cost || (cost == best_cost && candidate.feature_count() > best.feature_count())
}

/// Cheapest combination covering `requested`, or `None` when no combination exists.
pub fn select<'a, S: AsRef<str>>(catalog: &'a Catalog, requested: &[S]) -> Option<Combination<'a>> {
    let index = build_feature_index(catalog);
    pick_best(enumerate_combinations(&index, requested))
}

fn pick_best(combinations: Vec<Combination<'_>>) -> Option<Combination<'_>> {
    combinations.into_iter().fold(None, |best, candidate| {
        if is_cheaper(&candidate, best.as_ref()) {
            Some(candidate)
        } else {
            best
        }
    })
}

/// Selection over one catalog with an optional bound on enumeration size.
#[derive(Debug, Clone)]
pub struct PlanSelector<'a> {
    catalog: &'a Catalog,
    index: FeatureIndex<'a>,
    max_combinations: Option<usize>,
}

impl<'a> PlanSelector<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self {
            catalog,
            index: build_feature_index(catalog),
            max_combinations: None,
        }
    }

    pub fn with_max_combinations(mut self, limit: Option<usize>) -> Self {
        self.max_combinations = limit;
        self
    }

    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    pub fn index(&self) -> &FeatureIndex<'a> {
        &self.index
    }

    pub fn combinations<S: AsRef<str>>(&self, requested: &[S]) -> PlanResult<Vec<Combination<'a>>> {
        let required = combination_count(&self.index, requested);
        if let Some(limit) = self.max_combinations {
            if required > limit as u128 {
                return Err(PlanError::EnumerationLimit { limit, required });
            }
        }
        if required == 0 {
            return Ok(Vec::new());
        }
        Ok(enumerate_combinations(&self.index, requested))
    }

    pub fn select<S: AsRef<str>>(&self, requested: &[S]) -> PlanResult<Option<Combination<'a>>> {
        let combinations = self.combinations(requested)?;
        let enumerated = combinations.len();
        let best = pick_best(combinations);
        match &best {
            Some(combination) => info!(
                target: "plan.selection",
                requested = requested.len(),
                enumerated,
                plans = ?combination.names(),
                cost = combination.total_cost(),
                "best combination selected"
            ),
            None => debug!(
                target: "plan.selection",
                requested = requested.len(),
                "no combination covers the request"
            ),
        }
        Ok(best)
    }
}
