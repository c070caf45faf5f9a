use crate::bias::{BiasStore, DEFAULT_WINDOW};
use crate::scoring::{Mark, MarkTable, Normalization, ScoringError, WeightConfig};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_VENUES: [&str; 8] = [
    "蒲郡", "常滑", "浜名湖", "津", "大村", "住之江", "若松", "芦屋",
];

/// Tool configuration.
///
/// Every field is optional; missing fields fall back to the built-in
/// defaults through the accessor methods.
///
/// Example YAML:
/// ```yaml
/// marks: { "☆": 6, "◎": 5, "〇": 4, "□": 3, "△": 2, "×": 1 }
/// weights: { motor: 3, local: 2, start: 2, expo: 1 }
/// normalize: max
/// bias:
///   window: 30
///   history_limit: 0
/// venues: ["蒲郡", "常滑"]
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Mark symbol -> weight used by simple scoring
    #[serde(default)]
    pub marks: Option<BTreeMap<String, u32>>,

    /// Default emphasis for detail scoring, 0-5 each
    #[serde(default)]
    pub weights: Option<WeightConfig>,

    /// Percentage mode for detail scoring: "sum" or "max"
    #[serde(default)]
    pub normalize: Option<Normalization>,

    #[serde(default)]
    pub bias: Option<BiasConfig>,

    /// Venues a race sheet may name
    #[serde(default)]
    pub venues: Option<Vec<String>>,
}

/// Venue bias settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BiasConfig {
    /// How many recent deltas are averaged (default: 30)
    #[serde(default)]
    pub window: Option<usize>,

    /// Deltas kept per venue; 0 keeps everything (default: same as window)
    #[serde(default)]
    pub history_limit: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            marks: Some(
                Mark::ALL
                    .iter()
                    .map(|m| (m.symbol().to_string(), m.default_weight()))
                    .collect(),
            ),
            weights: Some(WeightConfig::default()),
            normalize: Some(Normalization::Sum),
            bias: Some(BiasConfig {
                window: Some(DEFAULT_WINDOW),
                history_limit: Some(DEFAULT_WINDOW),
            }),
            venues: Some(DEFAULT_VENUES.iter().map(|v| v.to_string()).collect()),
        }
    }
}

impl Config {
    pub fn mark_table(&self) -> Result<MarkTable, ScoringError> {
        match self.marks {
            Some(ref symbols) => MarkTable::from_symbols(symbols),
            None => Ok(MarkTable::default()),
        }
    }

    pub fn weights(&self) -> WeightConfig {
        self.weights.unwrap_or_default()
    }

    pub fn normalization(&self) -> Normalization {
        self.normalize.unwrap_or_default()
    }

    pub fn venues(&self) -> Vec<String> {
        self.venues
            .clone()
            .unwrap_or_else(|| DEFAULT_VENUES.iter().map(|v| v.to_string()).collect())
    }

    /// A fresh, empty bias store for one session.
    pub fn bias_store(&self) -> BiasStore {
        let window = self
            .bias
            .as_ref()
            .and_then(|b| b.window)
            .unwrap_or(DEFAULT_WINDOW);
        let history_limit = self
            .bias
            .as_ref()
            .and_then(|b| b.history_limit)
            .unwrap_or(window);
        BiasStore::new(window, history_limit)
    }
}
