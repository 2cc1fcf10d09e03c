//! Segment summarization: builds the analysis request for a segment and
//! hands it to a text-generation backend.

pub mod analyzer;
pub mod request;

pub use analyzer::{HttpAnalyzer, SegmentAnalyzer};
pub use request::{AnalysisOutput, AnalysisRequest, DEFAULT_SAMPLE_SIZE};
