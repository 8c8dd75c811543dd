pub mod backfill;
pub mod config;
pub mod dataset;
pub mod docket;
pub mod error;
pub mod io;
pub mod merge;
pub mod paths;
pub mod refresh;
pub mod registry;
pub mod types;

pub use error::{Result, TrackerError};
