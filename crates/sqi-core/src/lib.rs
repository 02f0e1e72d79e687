//! sqi-core: Student Quality Index scoring, aggregation, and ranking.
//!
//! This crate defines the attempt data model, the SQI scorer, the
//! topic/concept breakdown, the concept ranker, and the export payload
//! that the rest of the sqi workspace builds on.

pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod parser;
pub mod ranking;
pub mod report;
pub mod scoring;

pub use engine::{compute_breakdown, SqiBreakdown, SqiEngine};
pub use model::{Attempt, StudentData};
pub use scoring::score_attempts;
