pub mod context;
pub mod session;
pub mod sheet;

pub use context::RaceContext;
pub use session::{process_race, RaceOutcome};
pub use sheet::{load_sheet, validate_sheet, RaceEntry, RaceSheet};
