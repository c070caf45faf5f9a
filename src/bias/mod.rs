pub mod store;

pub use store::{BiasStore, DEFAULT_WINDOW};
