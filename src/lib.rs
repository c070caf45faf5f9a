pub mod bias;
pub mod config;
pub mod logging;
pub mod output;
pub mod race;
pub mod scoring;
