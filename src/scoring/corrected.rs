use super::error::ScoringError;
use super::rank::{check_entrants, Lane};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

pub const LAP_FACTOR: f64 = 0.10;
pub const STRAIGHT_FACTOR: f64 = 0.05;
pub const TURN_FACTOR: f64 = 0.02;

/// Added to lane 1's time: the inside lane is handicapped by convention.
pub const INSIDE_LANE_PENALTY: f64 = 0.05;

/// Exhibition measurements for one boat.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CorrectionInput {
    pub expo: f64,
    pub straight: f64,
    pub lap: f64,
    pub turn: f64,
}

impl CorrectionInput {
    fn validate(&self, lane: Lane) -> Result<(), ScoringError> {
        for (name, value) in [
            ("expo", self.expo),
            ("straight", self.straight),
            ("lap", self.lap),
            ("turn", self.turn),
        ] {
            if !value.is_finite() {
                return Err(ScoringError::invalid(
                    format!("lane {} {}", lane, name),
                    "must be a finite number",
                ));
            }
        }
        Ok(())
    }

    /// Corrected time before the lane penalty and venue bias.
    pub fn base_time(&self) -> f64 {
        self.expo + self.lap * LAP_FACTOR
            - self.straight * STRAIGHT_FACTOR
            - self.turn * TURN_FACTOR
    }

    pub fn corrected_time(&self, lane: Lane, bias: f64) -> f64 {
        let mut time = self.base_time();
        if lane == 1 {
            time += INSIDE_LANE_PENALTY;
        }
        time + bias
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CorrectedEntry {
    pub lane: Lane,
    pub time: f64,
}

/// Corrected time per lane, in lane order.
pub fn corrected_times(
    inputs: &BTreeMap<Lane, CorrectionInput>,
    bias: f64,
) -> Result<BTreeMap<Lane, f64>, ScoringError> {
    check_entrants(inputs)?;
    if !bias.is_finite() {
        return Err(ScoringError::invalid("bias", "must be a finite number"));
    }

    let mut times = BTreeMap::new();
    for (lane, input) in inputs {
        input.validate(*lane)?;
        times.insert(*lane, input.corrected_time(*lane, bias));
    }
    Ok(times)
}

/// Rank entrants by corrected time, fastest first.
pub fn rank_corrected(
    inputs: &BTreeMap<Lane, CorrectionInput>,
    bias: f64,
) -> Result<Vec<CorrectedEntry>, ScoringError> {
    let mut ranked: Vec<CorrectedEntry> = corrected_times(inputs, bias)?
        .into_iter()
        .map(|(lane, time)| CorrectedEntry { lane, time })
        .collect();

    ranked.sort_by(|a, b| a.time.partial_cmp(&b.time).unwrap_or(Ordering::Equal));
    tracing::debug!(
        entrants = ranked.len(),
        bias,
        top = ranked[0].lane,
        "corrected ranking computed"
    );
    Ok(ranked)
}
