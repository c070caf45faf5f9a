use super::context::RaceContext;
use crate::scoring::{CorrectionInput, DetailInput, Lane, SimpleInput, WeightConfig};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

pub const MAX_LANE: Lane = 6;

/// A YAML file of races, processed in order within one session.
///
/// Example:
/// ```yaml
/// races:
///   - venue: 蒲郡
///     race: 5
///     date: "2026-10-19"
///     simple:
///       1: { motor: "☆", local: "◎", start: "〇", expo: "□" }
///     detail:
///       1: { motor: 6.5, local: 7.1, start: 0.14, expo: 6.78 }
///     weights: { motor: 3, local: 2, start: 2, expo: 1 }
///     correction:
///       1: { expo: 6.78, straight: 7.02, lap: 37.1, turn: 5 }
///     confirmed: true
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RaceSheet {
    pub races: Vec<RaceEntry>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RaceEntry {
    /// Defaults to today
    #[serde(default)]
    pub date: Option<NaiveDate>,

    pub venue: String,

    pub race: u8,

    #[serde(default)]
    pub simple: Option<BTreeMap<Lane, SimpleInput>>,

    #[serde(default)]
    pub detail: Option<BTreeMap<Lane, DetailInput>>,

    /// Overrides the configured detail weights for this race
    #[serde(default)]
    pub weights: Option<WeightConfig>,

    #[serde(default)]
    pub correction: Option<BTreeMap<Lane, CorrectionInput>>,

    /// The result is committed: feed this race's corrected times into the
    /// venue bias once it has been ranked.
    #[serde(default)]
    pub confirmed: bool,
}

impl RaceEntry {
    pub fn context(&self, today: NaiveDate) -> RaceContext {
        RaceContext {
            date: self.date.unwrap_or(today),
            venue: self.venue.clone(),
            race: self.race,
        }
    }
}

fn check_lanes<T>(prefix: &str, block: &Option<BTreeMap<Lane, T>>, errors: &mut Vec<String>) {
    if let Some(ref lanes) = block {
        if lanes.is_empty() {
            errors.push(format!("{}: at least one lane is required", prefix));
        }
        for lane in lanes.keys() {
            if *lane == 0 || *lane > MAX_LANE {
                errors.push(format!("{}.{}: lane must be 1-{}", prefix, lane, MAX_LANE));
            }
        }
    }
}

/// Validate every race in a sheet against the known venues.
/// Returns all validation errors at once (not just the first).
pub fn validate_sheet(
    sheet: &RaceSheet,
    venues: &[String],
    today: NaiveDate,
) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if sheet.races.is_empty() {
        errors.push("races: the sheet has no races".to_string());
    }

    for (i, race) in sheet.races.iter().enumerate() {
        let prefix = format!("races[{}]", i);

        if let Err(context_errors) = race.context(today).validate(venues) {
            errors.extend(context_errors.into_iter().map(|e| format!("{}.{}", prefix, e)));
        }

        if race.simple.is_none() && race.detail.is_none() && race.correction.is_none() {
            errors.push(format!(
                "{}: needs at least one of simple, detail, correction",
                prefix
            ));
        }

        check_lanes(&format!("{}.simple", prefix), &race.simple, &mut errors);
        check_lanes(&format!("{}.detail", prefix), &race.detail, &mut errors);
        check_lanes(&format!("{}.correction", prefix), &race.correction, &mut errors);

        if let Some(ref weights) = race.weights {
            if let Err(e) = weights.validate() {
                errors.push(format!("{}: {}", prefix, e));
            }
        }

        if race.confirmed && race.correction.is_none() {
            errors.push(format!(
                "{}.confirmed: a confirmed race needs a correction block",
                prefix
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Load a race sheet from a YAML file.
pub fn load_sheet(path: &Path) -> Result<RaceSheet> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read race sheet at {}", path.display()))?;

    let sheet: RaceSheet = serde_saphyr::from_str(&content).with_context(|| {
        format!(
            "Failed to parse race sheet: invalid YAML in {}",
            path.display()
        )
    })?;

    tracing::debug!(path = %path.display(), races = sheet.races.len(), "race sheet loaded");
    Ok(sheet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::Mark;
    use std::env;

    const SHEET: &str = r#"
races:
  - venue: 蒲郡
    race: 5
    date: "2026-10-19"
    simple:
      1: { motor: "☆", local: "◎", start: "〇", expo: "□" }
      2: { motor: "×", local: "△", start: "□", expo: "〇" }
    detail:
      1: { motor: 6.5, local: 7.1, start: 0.14, expo: 6.78 }
    weights: { motor: 3, local: 2, start: 2, expo: 1 }
    correction:
      1: { expo: 6.78, straight: 7.02, lap: 37.1, turn: 5 }
    confirmed: true
  - venue: 津
    race: 1
    correction:
      3: { expo: 6.9, straight: 6.9, lap: 37.4, turn: 3 }
"#;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn venues() -> Vec<String> {
        crate::config::DEFAULT_VENUES.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_parse_sheet() {
        let sheet: RaceSheet = serde_saphyr::from_str(SHEET).unwrap();
        assert_eq!(sheet.races.len(), 2);

        let first = &sheet.races[0];
        assert_eq!(first.venue, "蒲郡");
        assert_eq!(first.date, Some(today()));
        assert!(first.confirmed);
        let simple = first.simple.as_ref().unwrap();
        assert_eq!(simple[&1].motor, Mark::Star);
        assert_eq!(simple[&2].expo, Mark::Circle);
        assert_eq!(first.weights.unwrap().motor, 3);
        assert_eq!(first.correction.as_ref().unwrap()[&1].lap, 37.1);

        let second = &sheet.races[1];
        assert!(second.date.is_none());
        assert!(!second.confirmed);
        assert!(validate_sheet(&sheet, &venues(), today()).is_ok());
    }

    #[test]
    fn test_date_defaults_to_today() {
        let sheet: RaceSheet = serde_saphyr::from_str(SHEET).unwrap();
        let context = sheet.races[1].context(today());
        assert_eq!(context.date, today());
        assert_eq!(context.to_string(), "2026-10-19　津 1R");
    }

    #[test]
    fn test_unknown_mark_fails_to_parse() {
        let yaml = r#"
races:
  - venue: 津
    race: 1
    simple:
      1: { motor: "▲", local: "◎", start: "〇", expo: "□" }
"#;
        let result: Result<RaceSheet, _> = serde_saphyr::from_str(yaml);
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_collects_errors() {
        let yaml = r#"
races:
  - venue: 平和島
    race: 13
    confirmed: true
  - venue: 津
    race: 2
    correction:
      7: { expo: 6.9, straight: 6.9, lap: 37.4, turn: 3 }
    weights: { motor: 9, local: 2, start: 2, expo: 2 }
"#;
        let sheet: RaceSheet = serde_saphyr::from_str(yaml).unwrap();
        let errors = validate_sheet(&sheet, &venues(), today()).unwrap_err();
        assert_eq!(errors.len(), 6);
        assert!(errors.iter().any(|e| e.starts_with("races[0].race")));
        assert!(errors.iter().any(|e| e.starts_with("races[0].venue")));
        assert!(errors.iter().any(|e| e.contains("needs at least one of")));
        assert!(errors.iter().any(|e| e.starts_with("races[0].confirmed")));
        assert!(errors.iter().any(|e| e.starts_with("races[1].correction.7")));
        assert!(errors.iter().any(|e| e.contains("weights.motor")));
    }

    #[test]
    fn test_empty_sheet_invalid() {
        let sheet = RaceSheet { races: vec![] };
        assert!(validate_sheet(&sheet, &venues(), today()).is_err());
    }

    #[test]
    fn test_load_sheet_from_file() {
        let path = env::temp_dir().join("kyotei_rank_test_sheet.yaml");
        fs::write(&path, SHEET).unwrap();

        let sheet = load_sheet(&path).unwrap();
        assert_eq!(sheet.races.len(), 2);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_missing_sheet() {
        let path = env::temp_dir().join("kyotei_rank_test_missing_sheet.yaml");
        let _ = fs::remove_file(&path);
        let err = load_sheet(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to read race sheet"));
    }
}
