mod progress;
mod transport;
mod types;
mod validator;

pub use progress::ProgressReporter;
pub use transport::{AnalyzerClient, FILE_FIELD};
pub use types::{AnalysisResult, CandidateFile, HealthStatus, UploadEvent, UploadEventKind};
pub use validator::validate;
