use super::schema::Config;
use crate::bias::DEFAULT_WINDOW;
use crate::scoring::{Mark, WeightConfig};

/// Validate configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(ref marks) = config.marks {
        let mut seen = Vec::new();
        for symbol in marks.keys() {
            match Mark::parse(symbol) {
                Ok(mark) => {
                    if seen.contains(&mark) {
                        errors.push(format!("marks.{}: duplicates mark {}", symbol, mark));
                    }
                    seen.push(mark);
                }
                Err(e) => errors.push(format!("marks.{}: {}", symbol, e)),
            }
        }
        for mark in Mark::ALL {
            if !seen.contains(&mark) {
                errors.push(format!("marks: missing weight for {}", mark));
            }
        }
    }

    if let Some(ref weights) = config.weights {
        for (name, value) in [
            ("motor", weights.motor),
            ("local", weights.local),
            ("start", weights.start),
            ("expo", weights.expo),
        ] {
            if value > WeightConfig::MAX_WEIGHT {
                errors.push(format!(
                    "weights.{}: {} is above the maximum of {}",
                    name,
                    value,
                    WeightConfig::MAX_WEIGHT
                ));
            }
        }
    }

    if let Some(ref bias) = config.bias {
        if bias.window == Some(0) {
            errors.push("bias.window: must be at least 1".to_string());
        }
        if let Some(limit) = bias.history_limit {
            let window = bias.window.unwrap_or(DEFAULT_WINDOW);
            if limit > 0 && limit < window {
                errors.push(format!(
                    "bias.history_limit: {} keeps fewer deltas than the window of {}",
                    limit, window
                ));
            }
        }
    }

    if let Some(ref venues) = config.venues {
        if venues.is_empty() {
            errors.push("venues: at least one venue is required".to_string());
        }
        for (i, venue) in venues.iter().enumerate() {
            if venue.trim().is_empty() {
                errors.push(format!("venues[{}]: must not be empty", i));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
