use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A priced offering providing a set of named features.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Plan {
    pub name: String,
    pub cost: f64,
    pub features: Vec<String>,
}

impl Plan {
    pub fn new<I, S>(name: impl Into<String>, cost: f64, features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            cost,
            features: features.into_iter().map(Into::into).collect(),
        }
    }

    /// Number of features this plan declares.
    pub fn feature_count(&self) -> usize {
        self.features.len()
    }

    pub fn provides(&self, feature: &str) -> bool {
        self.features.iter().any(|item| item == feature)
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (${:.2}): {}",
            self.name,
            self.cost,
            self.features.join(", ")
        )
    }
}

/// Ordered, read-only collection of every available plan.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Catalog {
    plans: Vec<Plan>,
}

impl Catalog {
    pub fn new(plans: Vec<Plan>) -> Self {
        Self { plans }
    }

    pub fn plans(&self) -> &[Plan] {
        &self.plans
    }

    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }

    pub fn find(&self, name: &str) -> Option<&Plan> {
        self.plans.iter().find(|plan| plan.name == name)
    }

    /// Distinct features in first-seen catalog order.
    pub fn features(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.plans
            .iter()
            .flat_map(|plan| plan.features.iter())
            .filter(|feature| seen.insert(feature.as_str()))
            .map(String::as_str)
            .collect()
    }
}

/// A set of distinct plans borrowed from a catalog.
///
/// Members keep the order in which they were first picked during
/// enumeration; the same plan never appears twice.
#[derive(Debug, Clone, PartialEq)]
pub struct Combination<'a> {
    plans: Vec<&'a Plan>,
}

impl<'a> Combination<'a> {
    /// Builds a combination from raw per-feature picks, dropping repeated plans.
    ///
    /// Plans are compared by identity, so two catalog entries with equal
    /// contents still count as separate members.
    pub fn from_picks<I>(picks: I) -> Self
    where
        I: IntoIterator<Item = &'a Plan>,
    {
        let mut plans: Vec<&'a Plan> = Vec::new();
        for pick in picks {
            if !plans.iter().any(|existing| std::ptr::eq(*existing, pick)) {
                plans.push(pick);
            }
        }
        Self { plans }
    }

    pub fn plans(&self) -> &[&'a Plan] {
        &self.plans
    }

    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }

    /// Plain `f64` sum of member costs in member order.
    ///
    /// Selection compares these sums with exact binary-float equality, so
    /// 0.1 + 0.2 does not tie with 0.3 even though both print as $0.30.
    pub fn total_cost(&self) -> f64 {
        self.plans.iter().map(|plan| plan.cost).sum()
    }

    /// Sum of each member's declared feature count. Features shared by
    /// several members are counted once per member.
    pub fn feature_count(&self) -> usize {
        self.plans.iter().map(|plan| plan.feature_count()).sum()
    }

    pub fn names(&self) -> Vec<&'a str> {
        self.plans.iter().map(|plan| plan.name.as_str()).collect()
    }

    /// True when every requested feature is provided by at least one member.
    pub fn covers<S: AsRef<str>>(&self, features: &[S]) -> bool {
        features
            .iter()
            .all(|feature| self.plans.iter().any(|plan| plan.provides(feature.as_ref())))
    }
}
