use crate::error::AnalyzerError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// The single file currently picked for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
}

impl CandidateFile {
    pub fn new(path: impl Into<PathBuf>, name: impl Into<String>, size: u64) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            size,
        }
    }

    /// Reads name and size from disk.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let metadata = std::fs::metadata(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        Ok(Self::new(path, name, metadata.len()))
    }
}

/// Body of a successful `POST /analyze`.
///
/// Any well-formed JSON decodes; absent, null or mistyped fields fall back to
/// their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value")]
pub struct AnalysisResult {
    pub job_id: String,
    pub series_uid: String,
    pub label: String,
    pub score: f64,
    pub routed_to_3d: bool,
    pub warnings: Vec<String>,
    pub report_path: String,
}

#[derive(Serialize)]
struct ResultSummary<'a> {
    job_id: &'a str,
    series_uid: &'a str,
    label: &'a str,
    score: f64,
    routed_to_3d: bool,
}

fn text_field(value: &Value, key: &str) -> String {
    match value.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

impl From<Value> for AnalysisResult {
    fn from(value: Value) -> Self {
        let warnings = value
            .get("warnings")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter(|w| !w.is_null())
                    .map(|w| match w {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            job_id: text_field(&value, "job_id"),
            series_uid: text_field(&value, "series_uid"),
            label: text_field(&value, "label"),
            score: value.get("score").and_then(Value::as_f64).unwrap_or_default(),
            routed_to_3d: value
                .get("routed_to_3d")
                .and_then(Value::as_bool)
                .unwrap_or_default(),
            warnings,
            report_path: text_field(&value, "report_path"),
        }
    }
}

impl AnalysisResult {
    pub fn is_normal(&self) -> bool {
        self.label == "normal"
    }

    /// Pretty JSON of the identifying fields shown in the result card.
    pub fn summary_json(&self) -> String {
        let summary = ResultSummary {
            job_id: &self.job_id,
            series_uid: &self.series_uid,
            label: &self.label,
            score: self.score,
            routed_to_3d: self.routed_to_3d,
        };
        serde_json::to_string_pretty(&summary).unwrap_or_default()
    }

    pub fn warning_lines(&self) -> Vec<String> {
        self.warnings.iter().map(|w| format!("• {}", w)).collect()
    }
}

/// Body of `GET /health`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    #[serde(default)]
    pub ok: bool,
}

#[derive(Debug)]
pub enum UploadEventKind {
    Progress(f32),
    Finished(Result<AnalysisResult, AnalyzerError>),
}

/// Message from the upload worker back to the window
#[derive(Debug)]
pub struct UploadEvent {
    pub generation: u64,
    pub kind: UploadEventKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    const NORMAL_BODY: &str = r#"{"job_id":"j1","series_uid":"s1","label":"normal","score":0.1,"routed_to_3d":false,"warnings":[],"report_path":"/r/j1"}"#;

    #[test]
    fn test_decode_full_body() {
        let result: AnalysisResult = serde_json::from_str(NORMAL_BODY).unwrap();
        assert_eq!(result.job_id, "j1");
        assert_eq!(result.report_path, "/r/j1");
        assert!(result.is_normal());
        assert!(result.warning_lines().is_empty());
    }

    #[test]
    fn test_missing_warnings_default_to_empty() {
        let result: AnalysisResult =
            serde_json::from_str(r#"{"job_id":"j2","label":"pathology","score":0.9}"#).unwrap();
        assert!(result.warnings.is_empty());
        assert!(!result.is_normal());
    }

    #[test]
    fn test_null_and_mistyped_fields_fall_back() {
        let result: AnalysisResult = serde_json::from_str(
            r#"{"job_id":7,"series_uid":null,"label":"normal","score":"high","routed_to_3d":"yes","warnings":null,"report_path":"/r/7"}"#,
        )
        .unwrap();
        assert_eq!(result.job_id, "7");
        assert_eq!(result.series_uid, "");
        assert_eq!(result.score, 0.0);
        assert!(!result.routed_to_3d);
        assert!(result.warnings.is_empty());
        assert_eq!(result.report_path, "/r/7");
    }

    #[test]
    fn test_non_string_warnings_are_stringified() {
        let result: AnalysisResult =
            serde_json::from_str(r#"{"warnings":["low dose",3,null]}"#).unwrap();
        assert_eq!(result.warnings, vec!["low dose".to_string(), "3".to_string()]);
    }

    #[test]
    fn test_invalid_json_still_fails() {
        assert!(serde_json::from_str::<AnalysisResult>("<html>oops</html>").is_err());
    }

    #[test]
    fn test_summary_has_only_identifying_fields() {
        let result: AnalysisResult = serde_json::from_str(NORMAL_BODY).unwrap();
        let summary: serde_json::Value = serde_json::from_str(&result.summary_json()).unwrap();
        let keys: Vec<&str> = summary
            .as_object()
            .unwrap()
            .keys()
            .map(|k| k.as_str())
            .collect();
        assert_eq!(keys.len(), 5);
        assert!(!keys.contains(&"warnings"));
        assert!(!keys.contains(&"report_path"));
        assert!(result.summary_json().contains("\n  \"job_id\": \"j1\""));
    }

    #[test]
    fn test_warning_lines_keep_order() {
        let result = AnalysisResult {
            warnings: vec!["low dose".into(), "motion artifact".into()],
            ..Default::default()
        };
        assert_eq!(
            result.warning_lines(),
            vec!["• low dose".to_string(), "• motion artifact".to_string()]
        );
    }
}
