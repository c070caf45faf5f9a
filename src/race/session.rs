use super::context::RaceContext;
use super::sheet::RaceEntry;
use crate::bias::BiasStore;
use crate::scoring::{
    comparison_table, rank_corrected, rank_detail, rank_simple, ComparisonRow, CorrectedEntry,
    MarkTable, Normalization, RankedEntry, ScoringError, WeightConfig,
};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Which rankings to compute for a race.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Board {
    Simple,
    Detail,
    Corrected,
    #[default]
    All,
}

impl Board {
    fn includes(&self, other: Board) -> bool {
        *self == Board::All || *self == other
    }
}

/// Settings shared by every race in a session.
#[derive(Debug, Clone)]
pub struct RankSettings {
    pub marks: MarkTable,
    pub weights: WeightConfig,
    pub normalization: Normalization,
    pub board: Board,
    pub today: NaiveDate,
}

/// Everything computed for one race.
#[derive(Debug, Clone, Serialize)]
pub struct RaceOutcome {
    pub context: RaceContext,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub simple: Option<Vec<RankedEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<Vec<RankedEntry>>,
    pub normalization: Normalization,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corrected: Option<Vec<CorrectedEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<Vec<ComparisonRow>>,
    /// Venue bias applied to the corrected times
    pub bias: f64,
    /// Whether this race's times were added to the venue history
    pub recorded: bool,
}

/// Rank one race and, when it is confirmed, feed its corrected times into
/// the session's bias store.
///
/// The bias is read before the race is recorded, so a race never corrects
/// itself.
pub fn process_race(
    entry: &RaceEntry,
    settings: &RankSettings,
    store: &mut BiasStore,
) -> Result<RaceOutcome, ScoringError> {
    let context = entry.context(settings.today);
    let bias = store.current_bias(&context.venue);

    let simple = match entry.simple {
        Some(ref inputs) if settings.board.includes(Board::Simple) => {
            Some(rank_simple(inputs, &settings.marks)?)
        }
        _ => None,
    };

    let weights = entry.weights.unwrap_or(settings.weights);
    let detail = match entry.detail {
        Some(ref inputs) if settings.board.includes(Board::Detail) => {
            Some(rank_detail(inputs, &weights, settings.normalization)?)
        }
        _ => None,
    };

    let show_corrected = settings.board.includes(Board::Corrected);
    let ranked = match entry.correction {
        Some(ref inputs) if show_corrected || entry.confirmed => {
            Some(rank_corrected(inputs, bias)?)
        }
        _ => None,
    };
    let comparison = match entry.correction {
        Some(ref inputs) if show_corrected => Some(comparison_table(inputs, bias)?),
        _ => None,
    };

    let mut recorded = false;
    if entry.confirmed {
        if let Some(ref ranked) = ranked {
            let times: BTreeMap<_, _> = ranked.iter().map(|e| (e.lane, e.time)).collect();
            store.record_race(&context.venue, &times)?;
            recorded = true;
            tracing::info!(race = %context, "result committed to venue bias");
        }
    }
    let corrected = ranked.filter(|_| show_corrected);

    Ok(RaceOutcome {
        context,
        simple,
        detail,
        normalization: settings.normalization,
        corrected,
        comparison,
        bias,
        recorded,
    })
}
