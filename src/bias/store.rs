use crate::scoring::{Lane, ScoringError};
use std::collections::{BTreeMap, HashMap, VecDeque};

pub const DEFAULT_WINDOW: usize = 30;

/// Per-venue history of corrected-time deviations for one session.
///
/// Created when a session starts and dropped when it ends; nothing here
/// is written to disk.
#[derive(Debug, Clone)]
pub struct BiasStore {
    window: usize,
    /// 0 keeps every delta.
    history_limit: usize,
    histories: HashMap<String, VecDeque<f64>>,
}

impl Default for BiasStore {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW, DEFAULT_WINDOW)
    }
}

impl BiasStore {
    /// `window` is how many recent deltas `current_bias` averages;
    /// `history_limit` caps what is kept per venue (0 = unlimited). A
    /// nonzero limit is raised to the window so every read sees a full window.
    pub fn new(window: usize, history_limit: usize) -> Self {
        let window = window.max(1);
        let history_limit = if history_limit == 0 {
            0
        } else {
            history_limit.max(window)
        };
        Self {
            window,
            history_limit,
            histories: HashMap::new(),
        }
    }

    /// Record a confirmed race: append each entrant's deviation from the
    /// race mean, in lane order.
    pub fn record_race(
        &mut self,
        venue: &str,
        corrected_times: &BTreeMap<Lane, f64>,
    ) -> Result<(), ScoringError> {
        if corrected_times.is_empty() {
            return Err(ScoringError::invalid(
                "corrected times",
                "at least one entrant is required",
            ));
        }
        if let Some((lane, _)) = corrected_times.iter().find(|(_, t)| !t.is_finite()) {
            return Err(ScoringError::invalid(
                format!("lane {} corrected time", lane),
                "must be a finite number",
            ));
        }

        let mean = corrected_times.values().sum::<f64>() / corrected_times.len() as f64;
        let history = self.histories.entry(venue.to_string()).or_default();
        history.extend(corrected_times.values().map(|t| t - mean));

        if self.history_limit > 0 {
            while history.len() > self.history_limit {
                history.pop_front();
            }
        }

        tracing::debug!(venue, mean, retained = history.len(), "race recorded");
        Ok(())
    }

    /// Mean of the most recent `window` deltas, or 0 for an unseen venue.
    pub fn current_bias(&self, venue: &str) -> f64 {
        match self.histories.get(venue) {
            Some(history) if !history.is_empty() => {
                let take = history.len().min(self.window);
                history.iter().rev().take(take).sum::<f64>() / take as f64
            }
            _ => 0.0,
        }
    }

    pub fn history(&self, venue: &str) -> Option<&VecDeque<f64>> {
        self.histories.get(venue)
    }

    /// Venues with recorded history, sorted by name.
    pub fn venues(&self) -> Vec<&str> {
        let mut venues: Vec<&str> = self.histories.keys().map(String::as_str).collect();
        venues.sort_unstable();
        venues
    }

    pub fn window(&self) -> usize {
        self.window
    }
}
