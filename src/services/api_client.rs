use std::time::Instant;

use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

use crate::config::Config;
use crate::error::AppError;
use crate::models::{AnalyzeResponse, ErrorBody, FileMetadata};
use crate::services::file_intake::SelectedFile;

pub const UPLOAD_PATH: &str = "upload-excel";
pub const ANALYZE_PATH: &str = "analyze";
pub const REPORT_PATH: &str = "generate-report";

/// HTTP client for the Analysis Service. One request per call, no retries,
/// no client-side timeout.
#[derive(Debug, Clone)]
pub struct AnalysisClient {
    http: Client,
    config: Config,
}

impl AnalysisClient {
    pub fn new(config: Config) -> Result<Self, AppError> {
        let http = Client::builder()
            .build()
            .map_err(|e| AppError::Transport(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { http, config })
    }

    pub fn base_url(&self) -> &str {
        &self.config.api_base_url
    }

    /// `GET /`, any 2xx counts as reachable.
    pub async fn probe(&self) -> Result<(), AppError> {
        let url = self.config.endpoint("");
        tracing::debug!("Probing {}", url);
        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }
        Ok(())
    }

    pub async fn upload_excel(&self, file: &SelectedFile) -> Result<FileMetadata, AppError> {
        let response = self.post_file(UPLOAD_PATH, file).await?;
        decode_json(response).await
    }

    pub async fn analyze(&self, file: &SelectedFile) -> Result<AnalyzeResponse, AppError> {
        let response = self.post_file(ANALYZE_PATH, file).await?;
        decode_json(response).await
    }

    /// Raw PDF bytes.
    pub async fn generate_report(&self, file: &SelectedFile) -> Result<Bytes, AppError> {
        let response = self.post_file(REPORT_PATH, file).await?;
        response
            .bytes()
            .await
            .map_err(|e| AppError::Transport(format!("Failed to read report bytes: {}", e)))
    }

    async fn post_file(&self, path: &str, file: &SelectedFile) -> Result<Response, AppError> {
        let url = self.config.endpoint(path);
        let start = Instant::now();
        tracing::info!("POST {} with {} ({}KB)", url, file.name(), file.size() / 1024);

        let part = Part::bytes(file.content().to_vec())
            .file_name(file.name().to_string())
            .mime_str(file.mime_type())?;
        let form = Form::new().part("file", part);

        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Request to {} failed: {}", url, e);
                AppError::Transport(format!("Failed to reach {}: {}", url, e))
            })?;

        tracing::info!("POST {} -> {} in {:?}", url, response.status(), start.elapsed());

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }
        Ok(response)
    }
}

async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T, AppError> {
    let body = response.bytes().await?;
    serde_json::from_slice(&body).map_err(|e| {
        tracing::error!("Unexpected response body: {}", e);
        AppError::Decode(e.to_string())
    })
}

/// Pulls `detail` out of an error body; an unreadable body means no detail.
async fn error_from_response(response: Response) -> AppError {
    let status = response.status().as_u16();
    let detail = match response.bytes().await {
        Ok(body) => serde_json::from_slice::<ErrorBody>(&body)
            .ok()
            .and_then(ErrorBody::into_detail),
        Err(e) => {
            tracing::warn!("Failed to read error body: {}", e);
            None
        }
    };
    tracing::error!("Service responded {} (detail: {:?})", status, detail);
    AppError::Service { status, detail }
}
