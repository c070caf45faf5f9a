use super::error::ScoringError;
use super::marks::{Mark, MarkTable};
use super::rank::{check_entrants, rank_descending, Lane, Normalization, RankedEntry};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Four marks given to one boat.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SimpleInput {
    pub motor: Mark,
    pub local: Mark,
    pub start: Mark,
    pub expo: Mark,
}

impl SimpleInput {
    pub fn uniform(mark: Mark) -> Self {
        Self {
            motor: mark,
            local: mark,
            start: mark,
            expo: mark,
        }
    }

    pub fn marks(&self) -> [Mark; 4] {
        [self.motor, self.local, self.start, self.expo]
    }

    pub fn raw_score(&self, table: &MarkTable) -> Result<u32, ScoringError> {
        self.marks()
            .iter()
            .map(|m| table.weight(*m))
            .sum::<Result<u32, _>>()
    }
}

/// Rank entrants by the sum of their mark weights.
///
/// Percentages are always percent-of-sum.
pub fn rank_simple(
    inputs: &BTreeMap<Lane, SimpleInput>,
    table: &MarkTable,
) -> Result<Vec<RankedEntry>, ScoringError> {
    check_entrants(inputs)?;

    let mut scores = Vec::with_capacity(inputs.len());
    for (lane, input) in inputs {
        let raw = input.raw_score(table).map_err(|e| match e {
            ScoringError::InvalidInput { message, .. } => {
                ScoringError::invalid(format!("lane {} marks", lane), message)
            }
        })?;
        scores.push((*lane, f64::from(raw)));
    }

    let ranked = rank_descending(scores, Normalization::Sum);
    tracing::debug!(entrants = ranked.len(), top = ranked[0].lane, "simple ranking computed");
    Ok(ranked)
}
