use std::fmt;

use serde::Serialize;

use super::models::Combination;

pub const NO_MATCH_MESSAGE: &str = "No matching plan for your features";

/// Outcome of one selection run, renderable as the user-facing summary line.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SelectionReport {
    pub requested: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best: Option<BestPlan>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BestPlan {
    pub plans: Vec<String>,
    pub total_cost: f64,
    pub feature_count: usize,
}

impl SelectionReport {
    pub fn new<S: AsRef<str>>(requested: &[S], best: Option<&Combination<'_>>) -> Self {
        Self {
            requested: requested
                .iter()
                .map(|feature| feature.as_ref().to_string())
                .collect(),
            best: best.map(|combination| BestPlan {
                plans: combination
                    .names()
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
                total_cost: round_cents(combination.total_cost()),
                feature_count: combination.feature_count(),
            }),
        }
    }

    pub fn is_match(&self) -> bool {
        self.best.is_some()
    }
}

impl fmt::Display for SelectionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.best {
            Some(best) => {
                f.write_str("Best Plan: ")?;
                for name in &best.plans {
                    write!(f, "{name} ")?;
                }
                write!(f, "for ${:.2}", best.total_cost)
            }
            None => f.write_str(NO_MATCH_MESSAGE),
        }
    }
}

fn round_cents(cost: f64) -> f64 {
    (cost * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::models::Plan;

    #[test]
    fn single_plan_line() {
        let p1 = Plan::new("P1", 2.0, ["F1", "F2"]);
        let combination = Combination::from_picks([&p1]);
        let report = SelectionReport::new(&["F1"], Some(&combination));
        assert!(report.is_match());
        assert_eq!(report.to_string(), "Best Plan: P1 for $2.00");
    }

    #[test]
    fn multi_plan_line_sums_cost() {
        let p1 = Plan::new("P1", 2.0, ["F1", "F2"]);
        let p6 = Plan::new("P6", 2.0, ["F1", "F3"]);
        let combination = Combination::from_picks([&p1, &p6]);
        let report = SelectionReport::new(&["F1", "F2", "F3"], Some(&combination));
        assert_eq!(report.to_string(), "Best Plan: P1 P6 for $4.00");
        assert_eq!(report.best.as_ref().map(|best| best.feature_count), Some(4));
    }

    #[test]
    fn cost_is_rounded_to_cents() {
        let a = Plan::new("A", 0.1, ["F1"]);
        let b = Plan::new("B", 0.2, ["F2"]);
        let combination = Combination::from_picks([&a, &b]);
        let report = SelectionReport::new(&["F1", "F2"], Some(&combination));
        assert_eq!(report.to_string(), "Best Plan: A B for $0.30");
    }

    #[test]
    fn json_carries_rounded_cost() {
        let a = Plan::new("A", 0.1, ["F1"]);
        let b = Plan::new("B", 0.2, ["F2", "F3"]);
        let combination = Combination::from_picks([&a, &b]);
        let report = SelectionReport::new(&["F1", "F2"], Some(&combination));
        let best = report.best.as_ref().unwrap();
        assert_eq!(best.total_cost, 0.3);
        assert_eq!(report.to_string(), "Best Plan: A B for $0.30");
    }

    #[test]
    fn no_match_line() {
        let report = SelectionReport::new::<&str>(&[], None);
        assert!(!report.is_match());
        assert_eq!(report.to_string(), NO_MATCH_MESSAGE);
    }

    #[test]
    fn json_omits_missing_best() {
        let report = SelectionReport::new(&["F"], None);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json, serde_json::json!({ "requested": ["F"] }));
    }
}
