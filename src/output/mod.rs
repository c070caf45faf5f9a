pub mod export;
pub mod formatter;

pub use export::{save_export, to_json};
pub use formatter::{
    format_comparison_table, format_corrected, format_corrected_tsv, format_race_header,
    format_rank_cards, format_tsv, rank_icon, should_use_colors,
};
