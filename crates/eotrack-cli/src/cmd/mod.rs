pub mod backfill;
pub mod config;
pub mod list;
pub mod refresh;
pub mod sync;
