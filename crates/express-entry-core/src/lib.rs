//! # Express Entry Core
//!
//! Pure logic for Express Entry Draws: draw models, upstream normalization,
//! filtering, statistics, and the snapshot store abstraction.
//!
//! This crate contains no tokio runtime, HTTP, or filesystem I/O. Every
//! function outside [`store`] is a synchronous transform over data that is
//! already in memory.

pub mod error;
pub mod models;
pub mod normalize;
pub mod query;
pub mod stats;
pub mod store;

pub use error::DrawError;
