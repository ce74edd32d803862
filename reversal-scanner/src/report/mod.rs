//! Text report generation for ranked risk reversals.

pub mod formatter;

pub use formatter::{format_report, AnalysisResult, TopRow, TOP_N};
