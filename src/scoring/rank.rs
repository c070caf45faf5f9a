use super::error::ScoringError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Lane number of an entrant, unique within a race.
pub type Lane = u8;

/// How raw scores are turned into percentages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Normalization {
    /// score / sum(scores) * 100
    #[default]
    Sum,
    /// score / max(scores) * 100
    Max,
}

/// One row of a descending ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    pub lane: Lane,
    pub score: f64,
    pub percent: f64,
}

impl RankedEntry {
    pub fn band(&self) -> Band {
        Band::classify(self.percent)
    }
}

/// Presentation band derived from a percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Band {
    TopPick,
    Recommended,
    None,
}

impl Band {
    pub const TOP_PICK_THRESHOLD: f64 = 30.0;
    pub const RECOMMENDED_THRESHOLD: f64 = 20.0;

    pub fn classify(percent: f64) -> Self {
        if percent >= Self::TOP_PICK_THRESHOLD {
            Band::TopPick
        } else if percent >= Self::RECOMMENDED_THRESHOLD {
            Band::Recommended
        } else {
            Band::None
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Band::TopPick => "top pick",
            Band::Recommended => "recommended",
            Band::None => "",
        }
    }

    /// Badge shown on a rank card.
    pub fn badge(&self) -> &'static str {
        match self {
            Band::TopPick => "💮 本命",
            Band::Recommended => "✨ おすすめ",
            Band::None => "",
        }
    }
}

/// Reject an empty entrant set and lane 0.
pub(crate) fn check_entrants<T>(inputs: &BTreeMap<Lane, T>) -> Result<(), ScoringError> {
    if inputs.is_empty() {
        return Err(ScoringError::invalid("entrants", "at least one entrant is required"));
    }
    if inputs.contains_key(&0) {
        return Err(ScoringError::invalid("entrants", "lane numbers start at 1"));
    }
    Ok(())
}

/// Normalize `(lane, score)` pairs and sort them descending.
///
/// Input must be in ascending lane order; the sort is stable, so equal scores
/// keep that order.
pub(crate) fn rank_descending(scores: Vec<(Lane, f64)>, mode: Normalization) -> Vec<RankedEntry> {
    let denominator = match mode {
        Normalization::Sum => scores.iter().map(|(_, s)| s).sum::<f64>(),
        Normalization::Max => scores.iter().map(|(_, s)| *s).fold(0.0, f64::max),
    };

    let mut ranked: Vec<RankedEntry> = scores
        .into_iter()
        .map(|(lane, score)| RankedEntry {
            lane,
            score,
            percent: if denominator > 0.0 {
                score / denominator * 100.0
            } else {
                0.0
            },
        })
        .collect();

    ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    ranked
}
