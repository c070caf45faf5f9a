use super::error::ScoringError;
use super::rank::{check_entrants, rank_descending, Lane, Normalization, RankedEntry};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Numeric stats for one boat.
///
/// `start` (ST) and `expo` (exhibition time) are times: lower is better.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DetailInput {
    pub motor: f64,
    pub local: f64,
    pub start: f64,
    pub expo: f64,
}

impl Default for DetailInput {
    fn default() -> Self {
        Self {
            motor: 5.0,
            local: 5.0,
            start: 0.18,
            expo: 6.90,
        }
    }
}

/// Emphasis multipliers, 0..=5 each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WeightConfig {
    pub motor: u32,
    pub local: u32,
    pub start: u32,
    pub expo: u32,
}

impl WeightConfig {
    pub const MAX_WEIGHT: u32 = 5;

    pub fn validate(&self) -> Result<(), ScoringError> {
        for (name, value) in [
            ("motor", self.motor),
            ("local", self.local),
            ("start", self.start),
            ("expo", self.expo),
        ] {
            if value > Self::MAX_WEIGHT {
                return Err(ScoringError::invalid(
                    format!("weights.{}", name),
                    format!("{} is above the maximum of {}", value, Self::MAX_WEIGHT),
                ));
            }
        }
        Ok(())
    }
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            motor: 2,
            local: 2,
            start: 2,
            expo: 2,
        }
    }
}

impl DetailInput {
    fn validate(&self, lane: Lane) -> Result<(), ScoringError> {
        let field = |name: &str| format!("lane {} {}", lane, name);

        for (name, value) in [
            ("motor", self.motor),
            ("local", self.local),
            ("start", self.start),
            ("expo", self.expo),
        ] {
            if !value.is_finite() {
                return Err(ScoringError::invalid(field(name), "must be a finite number"));
            }
        }
        if self.motor < 0.0 {
            return Err(ScoringError::invalid(field("motor"), "must not be negative"));
        }
        if self.local < 0.0 {
            return Err(ScoringError::invalid(field("local"), "must not be negative"));
        }
        if self.start <= 0.0 {
            return Err(ScoringError::invalid(field("start"), "must be greater than 0"));
        }
        if self.expo <= 0.0 {
            return Err(ScoringError::invalid(field("expo"), "must be greater than 0"));
        }
        Ok(())
    }

    /// Weighted score; the time fields count through their reciprocals.
    pub fn score(&self, weights: &WeightConfig) -> f64 {
        self.motor * f64::from(weights.motor)
            + self.local * f64::from(weights.local)
            + (1.0 / self.start) * f64::from(weights.start)
            + (1.0 / self.expo) * f64::from(weights.expo)
    }
}

/// Rank entrants by weighted stats, normalized by sum or by maximum.
pub fn rank_detail(
    inputs: &BTreeMap<Lane, DetailInput>,
    weights: &WeightConfig,
    mode: Normalization,
) -> Result<Vec<RankedEntry>, ScoringError> {
    check_entrants(inputs)?;
    weights.validate()?;

    let mut scores = Vec::with_capacity(inputs.len());
    for (lane, input) in inputs {
        input.validate(*lane)?;
        scores.push((*lane, input.score(weights)));
    }

    let ranked = rank_descending(scores, mode);
    tracing::debug!(
        entrants = ranked.len(),
        top = ranked[0].lane,
        mode = ?mode,
        "detail ranking computed"
    );
    Ok(ranked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn stats(motor: f64, local: f64, start: f64, expo: f64) -> DetailInput {
        DetailInput {
            motor,
            local,
            start,
            expo,
        }
    }

    #[test]
    fn test_score_formula() {
        let weights = WeightConfig {
            motor: 1,
            local: 2,
            start: 3,
            expo: 4,
        };
        let score = stats(6.0, 5.0, 0.20, 8.0).score(&weights);
        assert!((score - (6.0 + 10.0 + 15.0 + 0.5)).abs() < 1e-9);
    }

    #[test]
    fn test_lower_start_ranks_higher() {
        let mut inputs = BTreeMap::new();
        inputs.insert(1, stats(5.0, 5.0, 0.20, 6.90));
        inputs.insert(2, stats(5.0, 5.0, 0.10, 6.90));
        let ranked = rank_detail(&inputs, &WeightConfig::default(), Normalization::Sum).unwrap();
        assert_eq!(ranked[0].lane, 2);
    }

    #[test]
    fn test_zero_start_rejected() {
        let mut inputs = BTreeMap::new();
        inputs.insert(1, DetailInput::default());
        inputs.insert(4, stats(5.0, 5.0, 0.0, 6.90));
        let err = rank_detail(&inputs, &WeightConfig::default(), Normalization::Sum).unwrap_err();
        assert_eq!(
            err,
            ScoringError::invalid("lane 4 start", "must be greater than 0")
        );
    }

    #[test]
    fn test_negative_expo_rejected() {
        let mut inputs = BTreeMap::new();
        inputs.insert(2, stats(5.0, 5.0, 0.15, -6.9));
        assert!(rank_detail(&inputs, &WeightConfig::default(), Normalization::Max).is_err());
    }

    #[test]
    fn test_nan_rejected() {
        let mut inputs = BTreeMap::new();
        inputs.insert(1, stats(f64::NAN, 5.0, 0.15, 6.9));
        assert!(rank_detail(&inputs, &WeightConfig::default(), Normalization::Sum).is_err());
    }

    #[test]
    fn test_weight_above_five_rejected() {
        let mut inputs = BTreeMap::new();
        inputs.insert(1, DetailInput::default());
        let weights = WeightConfig {
            motor: 6,
            ..WeightConfig::default()
        };
        let err = rank_detail(&inputs, &weights, Normalization::Sum).unwrap_err();
        assert!(err.to_string().contains("weights.motor"));
    }

    #[test]
    fn test_all_zero_weights_give_zero_percent() {
        let mut inputs = BTreeMap::new();
        inputs.insert(1, DetailInput::default());
        inputs.insert(2, stats(9.0, 9.0, 0.05, 6.0));
        let weights = WeightConfig {
            motor: 0,
            local: 0,
            start: 0,
            expo: 0,
        };
        for mode in [Normalization::Sum, Normalization::Max] {
            let ranked = rank_detail(&inputs, &weights, mode).unwrap();
            assert!(ranked.iter().all(|r| r.percent == 0.0));
            assert_eq!(ranked[0].lane, 1);
        }
    }

    #[test]
    fn test_max_mode_top_is_100() {
        let mut inputs = BTreeMap::new();
        inputs.insert(1, stats(7.5, 6.2, 0.14, 6.75));
        inputs.insert(2, stats(4.0, 5.1, 0.19, 6.88));
        inputs.insert(3, stats(5.5, 3.0, 0.22, 6.95));
        let ranked = rank_detail(&inputs, &WeightConfig::default(), Normalization::Max).unwrap();
        assert_eq!(ranked[0].lane, 1);
        assert!((ranked[0].percent - 100.0).abs() < 1e-9);
        assert!(ranked[1..].iter().all(|r| r.percent < 100.0));
    }

    fn any_stats() -> impl Strategy<Value = DetailInput> {
        (0.0..=10.0f64, 0.0..=10.0f64, 0.05..=0.30f64, 6.0..=8.0f64)
            .prop_map(|(motor, local, start, expo)| stats(motor, local, start, expo))
    }

    fn any_weights() -> impl Strategy<Value = WeightConfig> {
        (0..=5u32, 0..=5u32, 0..=5u32, 0..=5u32).prop_map(|(motor, local, start, expo)| {
            WeightConfig {
                motor,
                local,
                start,
                expo,
            }
        })
    }

    fn lanes(inputs: Vec<DetailInput>) -> BTreeMap<Lane, DetailInput> {
        inputs
            .into_iter()
            .enumerate()
            .map(|(i, input)| (i as Lane + 1, input))
            .collect()
    }

    proptest! {
        #[test]
        fn prop_sum_mode_totals_100(
            inputs in prop::collection::vec(any_stats(), 1..=6),
            weights in any_weights(),
        ) {
            let ranked = rank_detail(&lanes(inputs), &weights, Normalization::Sum).unwrap();
            let total: f64 = ranked.iter().map(|r| r.percent).sum();
            let raw: f64 = ranked.iter().map(|r| r.score).sum();
            if raw > 0.0 {
                prop_assert!((total - 100.0).abs() < 1e-6);
            } else {
                prop_assert!(ranked.iter().all(|r| r.percent == 0.0));
            }
        }

        #[test]
        fn prop_max_mode_top_is_100(
            inputs in prop::collection::vec(any_stats(), 1..=6),
            weights in any_weights(),
        ) {
            let ranked = rank_detail(&lanes(inputs), &weights, Normalization::Max).unwrap();
            if ranked[0].score > 0.0 {
                prop_assert!((ranked[0].percent - 100.0).abs() < 1e-9);
            }
            prop_assert!(ranked.iter().all(|r| r.percent <= 100.0 + 1e-9));
        }
    }
}
