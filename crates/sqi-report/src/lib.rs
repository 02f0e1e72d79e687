//! sqi-report: output renderers for SQI summary payloads.

pub mod json;
pub mod markdown;
