use crate::config::ClientConfig;
use crate::error::{AnalyzerError, Result};
use crate::upload::progress::ProgressReporter;
use crate::upload::types::{AnalysisResult, CandidateFile, HealthStatus};
use futures::stream::{self, Stream};
use log::{debug, info, warn};
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Response};
use serde::de::DeserializeOwned;
use std::sync::mpsc::Sender;
use tokio::io::AsyncReadExt;

/// Multipart field the service reads the archive from.
pub const FILE_FIELD: &str = "file";

const CHUNK_SIZE: usize = 64 * 1024;

/// Talks to the analysis service: one request per call, no retry, no timeout.
#[derive(Debug, Clone)]
pub struct AnalyzerClient {
    config: ClientConfig,
    http: reqwest::Client,
}

impl AnalyzerClient {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Streams `file` to `POST /analyze` and decodes the answer.
    ///
    /// Progress fractions go to `progress` while the body is being sent;
    /// every tick is delivered before this returns.
    pub async fn upload(
        &self,
        file: &CandidateFile,
        progress: Option<Sender<f32>>,
    ) -> Result<AnalysisResult> {
        let url = self.config.analyze_url();

        let source = tokio::fs::File::open(&file.path).await?;
        let size = source.metadata().await?.len();
        info!("Uploading '{}' ({} bytes) to {}", file.name, size, url);

        let reporter = ProgressReporter::new(size, progress);
        let body = Body::wrap_stream(chunk_stream(source, reporter));
        let part = Part::stream_with_length(body, size).file_name(file.name.clone());
        let form = Form::new().part(FILE_FIELD, part);

        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| AnalyzerError::network(format!("failed to send request: {}", e)))?;

        let result: AnalysisResult = read_json(response).await?;
        info!(
            "Analysis finished: job {} label '{}' score {}",
            result.job_id, result.label, result.score
        );
        Ok(result)
    }

    pub async fn health(&self) -> Result<HealthStatus> {
        let url = self.config.health_url();
        debug!("Checking service health at {}", url);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| AnalyzerError::network(format!("failed to send request: {}", e)))?;

        read_json(response).await
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    debug!("Service answered with status {}", status);

    let text = match response.text().await {
        Ok(text) => text,
        Err(e) if !status.is_success() => {
            warn!("Could not read body of {} response: {}", status.as_u16(), e);
            String::new()
        }
        Err(e) => {
            return Err(AnalyzerError::network(format!(
                "failed to read response: {}",
                e
            )))
        }
    };

    if !status.is_success() {
        warn!("Request rejected with status {}", status.as_u16());
        return Err(AnalyzerError::http(status.as_u16(), text));
    }

    serde_json::from_str(&text).map_err(|e| AnalyzerError::malformed(e.to_string()))
}

fn chunk_stream(
    source: tokio::fs::File,
    reporter: ProgressReporter,
) -> impl Stream<Item = std::io::Result<Vec<u8>>> + Send + Sync + 'static {
    stream::try_unfold(
        (source, reporter),
        |(mut source, mut reporter)| async move {
            let mut buffer = vec![0u8; CHUNK_SIZE];
            let n = source.read(&mut buffer).await?;
            if n == 0 {
                return Ok::<_, std::io::Error>(None);
            }

            buffer.truncate(n);
            reporter.advance(n as u64);
            Ok(Some((buffer, (source, reporter))))
        },
    )
}
