//! Imputation primitives: mean fill, constant fill, and the ordered
//! exertion → training-stress rule table.

use serde::Serialize;

/// Result of a mean fill over one column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FillOutcome {
    /// Mean of the present values, `None` when the column had none.
    pub mean: Option<f64>,
    pub filled: usize,
}

impl FillOutcome {
    pub fn all_missing(&self) -> bool {
        self.mean.is_none()
    }
}

/// Replace every missing cell with the mean of the present cells.
///
/// A column with no present values is left as-is.
pub fn fill_mean(values: &mut [Option<f64>]) -> FillOutcome {
    let (sum, n) = values
        .iter()
        .flatten()
        .fold((0.0_f64, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        return FillOutcome { mean: None, filled: 0 };
    }

    let mean = sum / n as f64;
    let filled = fill_constant(values, mean);
    FillOutcome {
        mean: Some(mean),
        filled,
    }
}

/// Replace every missing cell with `value`; returns how many were filled.
pub fn fill_constant(values: &mut [Option<f64>], value: f64) -> usize {
    let mut filled = 0;
    for cell in values.iter_mut().filter(|c| c.is_none()) {
        *cell = Some(value);
        filled += 1;
    }
    filled
}

/// Exertion-rating condition of one stress rule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExertionBand {
    Equals(f64),
    /// Inclusive on both ends.
    Between(f64, f64),
    /// Strictly greater than.
    Above(f64),
}

impl ExertionBand {
    pub fn contains(self, exertion: f64) -> bool {
        match self {
            ExertionBand::Equals(v) => exertion == v,
            ExertionBand::Between(lo, hi) => exertion >= lo && exertion <= hi,
            ExertionBand::Above(v) => exertion > v,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StressRule {
    pub when: ExertionBand,
    pub value: f64,
}

/// Ordered rule table; the first rule whose band contains the exertion
/// rating wins, otherwise `fallback` applies.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StressLookup {
    pub rules: Vec<StressRule>,
    pub fallback: f64,
}

impl Default for StressLookup {
    fn default() -> Self {
        Self {
            rules: vec![
                StressRule { when: ExertionBand::Equals(0.0), value: 0.0 },
                StressRule { when: ExertionBand::Between(0.1, 3.0), value: 41.0 },
                StressRule { when: ExertionBand::Between(3.1, 5.0), value: 53.0 },
                StressRule { when: ExertionBand::Between(5.1, 7.0), value: 77.0 },
                StressRule { when: ExertionBand::Above(7.0), value: 85.0 },
            ],
            fallback: 0.0,
        }
    }
}

impl StressLookup {
    /// The first matching rule's value, or `None` when no rule matches.
    pub fn matching(&self, exertion: f64) -> Option<f64> {
        self.rules
            .iter()
            .find(|rule| rule.when.contains(exertion))
            .map(|rule| rule.value)
    }

    pub fn lookup(&self, exertion: f64) -> f64 {
        self.matching(exertion).unwrap_or(self.fallback)
    }
}

/// Counts from a stress imputation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StressOutcome {
    pub by_rule: usize,
    pub by_fallback: usize,
}

/// Fill missing stress scores from the exertion rating of the same row.
///
/// Rows that already carry a score are left untouched. A row whose exertion
/// rating is itself missing takes the fallback.
pub fn impute_stress(stress: &mut [Option<f64>], exertion: &[Option<f64>], lookup: &StressLookup) -> StressOutcome {
    let mut outcome = StressOutcome::default();
    for (score, rating) in stress.iter_mut().zip(exertion) {
        if score.is_some() {
            continue;
        }
        match rating.and_then(|r| lookup.matching(r)) {
            Some(v) => {
                *score = Some(v);
                outcome.by_rule += 1;
            }
            None => {
                *score = Some(lookup.fallback);
                outcome.by_fallback += 1;
            }
        }
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_mean_uses_present_values_only() {
        let mut col = vec![Some(1.0), None, Some(3.0), None];
        let out = fill_mean(&mut col);
        assert_eq!(out.mean, Some(2.0));
        assert_eq!(out.filled, 2);
        assert_eq!(col, vec![Some(1.0), Some(2.0), Some(3.0), Some(2.0)]);
    }

    #[test]
    fn fill_mean_is_idempotent() {
        let mut col = vec![Some(1.5), None, Some(4.0), Some(7.25), None];
        fill_mean(&mut col);
        let once = col.clone();
        let again = fill_mean(&mut col);
        assert_eq!(again.filled, 0);
        assert_eq!(col, once);
    }

    #[test]
    fn fill_mean_all_missing_is_noop() {
        let mut col: Vec<Option<f64>> = vec![None, None];
        let out = fill_mean(&mut col);
        assert!(out.all_missing());
        assert_eq!(out.filled, 0);
        assert_eq!(col, vec![None, None]);
    }

    #[test]
    fn fill_constant_counts() {
        let mut col = vec![None, Some(5.0), None];
        assert_eq!(fill_constant(&mut col, 0.0), 2);
        assert_eq!(col, vec![Some(0.0), Some(5.0), Some(0.0)]);
    }

    #[test]
    fn default_lookup_table_values() {
        let lookup = StressLookup::default();
        for (exertion, expected) in [(0.0, 0.0), (2.0, 41.0), (4.0, 53.0), (6.0, 77.0), (8.0, 85.0)] {
            assert_eq!(lookup.lookup(exertion), expected, "exertion={exertion}");
        }
    }

    #[test]
    fn lookup_bounds_are_inclusive() {
        let lookup = StressLookup::default();
        assert_eq!(lookup.matching(0.1), Some(41.0));
        assert_eq!(lookup.matching(3.0), Some(41.0));
        assert_eq!(lookup.matching(3.1), Some(53.0));
        assert_eq!(lookup.matching(5.0), Some(53.0));
        assert_eq!(lookup.matching(7.0), Some(77.0));
        assert_eq!(lookup.matching(7.01), Some(85.0));
    }

    #[test]
    fn unmatched_ratings_take_fallback() {
        let lookup = StressLookup {
            fallback: -1.0,
            ..StressLookup::default()
        };
        assert_eq!(lookup.matching(-2.0), None);
        assert_eq!(lookup.matching(3.05), None);
        assert_eq!(lookup.lookup(-2.0), -1.0);
        assert_eq!(lookup.lookup(0.05), -1.0);
    }

    #[test]
    fn first_match_wins() {
        let lookup = StressLookup {
            rules: vec![
                StressRule { when: ExertionBand::Between(0.0, 10.0), value: 1.0 },
                StressRule { when: ExertionBand::Equals(5.0), value: 2.0 },
            ],
            fallback: 0.0,
        };
        assert_eq!(lookup.lookup(5.0), 1.0);
    }

    #[test]
    fn impute_stress_leaves_present_scores() {
        let lookup = StressLookup::default();
        let mut stress = vec![Some(100.0), None, None, None];
        let exertion = vec![Some(8.0), Some(4.0), Some(-1.0), None];
        let out = impute_stress(&mut stress, &exertion, &lookup);
        assert_eq!(stress, vec![Some(100.0), Some(53.0), Some(0.0), Some(0.0)]);
        assert_eq!(out, StressOutcome { by_rule: 1, by_fallback: 2 });
    }
}
