pub mod corrected;
pub mod detail;
pub mod error;
pub mod highlight;
pub mod marks;
pub mod rank;
pub mod simple;

pub use corrected::{corrected_times, rank_corrected, CorrectedEntry, CorrectionInput};
pub use detail::{rank_detail, DetailInput, WeightConfig};
pub use error::ScoringError;
pub use highlight::{comparison_table, highlight_top2, Column, ComparisonRow, Direction, Highlight};
pub use marks::{Mark, MarkTable};
pub use rank::{Band, Lane, Normalization, RankedEntry};
pub use simple::{rank_simple, SimpleInput};
