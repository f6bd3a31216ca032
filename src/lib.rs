//! Client for the CT study analysis service.
//!
//! Picks a ZIP of a DICOM series, streams it to `POST /analyze` with progress
//! and shows the returned verdict, either in a desktop window or headless.

pub mod app;
pub mod config;
pub mod error;
pub mod upload;
pub mod utils;

pub use config::ClientConfig;
pub use error::{AnalyzerError, Result, ValidationError, MAX_UPLOAD_BYTES};
pub use upload::{validate, AnalysisResult, AnalyzerClient, CandidateFile};
