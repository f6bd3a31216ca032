use crate::error::{AnalyzerError, Result};
use reqwest::Url;

/// Where the analysis service lives.
///
/// Supplied once at start-up; the library never reads the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    api_base: Url,
}

impl ClientConfig {
    pub fn new(api_base: &str) -> Result<Self> {
        let trimmed = api_base.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(AnalyzerError::config("API base URL is empty"));
        }

        let mut url = Url::parse(trimmed)
            .map_err(|e| AnalyzerError::config(format!("invalid API base URL '{}': {}", trimmed, e)))?;

        match url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(AnalyzerError::config(format!(
                    "unsupported URL scheme '{}', expected http or https",
                    other
                )))
            }
        }

        // Relative report paths resolve under the base, so its path must end in '/'.
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        Ok(Self { api_base: url })
    }

    pub fn api_base(&self) -> &str {
        self.api_base.as_str().trim_end_matches('/')
    }

    pub fn analyze_url(&self) -> String {
        format!("{}/analyze", self.api_base())
    }

    pub fn health_url(&self) -> String {
        format!("{}/health", self.api_base())
    }

    /// Absolute links pass through; paths like `/reports/x.xlsx` hang off the base.
    pub fn report_url(&self, report_path: &str) -> Result<String> {
        if let Ok(absolute) = Url::parse(report_path) {
            return Ok(absolute.to_string());
        }

        self.api_base
            .join(report_path)
            .map(|u| u.to_string())
            .map_err(|e| AnalyzerError::config(format!("invalid report path '{}': {}", report_path, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_ignore_trailing_slash() {
        let config = ClientConfig::new("http://localhost:8000/").unwrap();
        assert_eq!(config.analyze_url(), "http://localhost:8000/analyze");
        assert_eq!(config.health_url(), "http://localhost:8000/health");
    }

    #[test]
    fn test_base_with_path_prefix() {
        let config = ClientConfig::new("https://ct.example.org/api").unwrap();
        assert_eq!(config.api_base(), "https://ct.example.org/api");
        assert_eq!(config.analyze_url(), "https://ct.example.org/api/analyze");
        assert_eq!(
            config.report_url("reports/j1.xlsx").unwrap(),
            "https://ct.example.org/api/reports/j1.xlsx"
        );

        let config = ClientConfig::new("https://ct.example.org/api/").unwrap();
        assert_eq!(
            config.report_url("reports/j1.xlsx").unwrap(),
            "https://ct.example.org/api/reports/j1.xlsx"
        );
    }

    #[test]
    fn test_rejects_bad_base() {
        assert!(matches!(
            ClientConfig::new(""),
            Err(AnalyzerError::Config { .. })
        ));
        assert!(matches!(
            ClientConfig::new("not a url"),
            Err(AnalyzerError::Config { .. })
        ));
        assert!(matches!(
            ClientConfig::new("ftp://files.example.org"),
            Err(AnalyzerError::Config { .. })
        ));
    }

    #[test]
    fn test_report_url_resolution() {
        let config = ClientConfig::new("http://localhost:8000").unwrap();
        assert_eq!(
            config.report_url("/reports/j1.xlsx").unwrap(),
            "http://localhost:8000/reports/j1.xlsx"
        );
        assert_eq!(
            config.report_url("https://cdn.example.org/r/j1.xlsx").unwrap(),
            "https://cdn.example.org/r/j1.xlsx"
        );
    }
}
