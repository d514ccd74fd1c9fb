use std::time::Duration;

use reader_logging::{reader_debug, reader_trace};
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use url::Url;

use crate::types::{CreatedJobs, ErrorBody};
use crate::{FailureKind, JobId, JobReport, ServiceError, ServiceLimits, UploadFile};

#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    /// Applies to every request; uploads carry whole documents.
    pub request_timeout: Duration,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(60),
        }
    }
}

/// The extraction service's HTTP surface as used by the controller.
#[async_trait::async_trait]
pub trait ServiceClient: Send + Sync {
    async fn limits(&self) -> Result<ServiceLimits, ServiceError>;

    async fn create_jobs(
        &self,
        files: &[UploadFile],
        only_aztec: bool,
    ) -> Result<Vec<JobId>, ServiceError>;

    async fn job_status(&self, job_id: &str) -> Result<JobReport, ServiceError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestServiceClient {
    base_url: Url,
    client: reqwest::Client,
}

impl ReqwestServiceClient {
    pub fn new(settings: ServiceSettings) -> Result<Self, ServiceError> {
        let mut base_url = Url::parse(&settings.base_url)
            .map_err(|err| ServiceError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ServiceError::new(
                FailureKind::InvalidUrl,
                format!("{} cannot be used as a base url", settings.base_url),
            ));
        }
        // Keep any path prefix when joining `api/...`.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ServiceError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ServiceError> {
        self.base_url
            .join(path)
            .map_err(|err| ServiceError::new(FailureKind::InvalidUrl, err.to_string()))
    }
}

#[async_trait::async_trait]
impl ServiceClient for ReqwestServiceClient {
    async fn limits(&self) -> Result<ServiceLimits, ServiceError> {
        let response = self
            .client
            .get(self.endpoint("api/limits")?)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }
        decode_body(response).await
    }

    async fn create_jobs(
        &self,
        files: &[UploadFile],
        only_aztec: bool,
    ) -> Result<Vec<JobId>, ServiceError> {
        let mut form = Form::new();
        for file in files {
            let bytes = tokio::fs::read(&file.path).await.map_err(|err| {
                ServiceError::new(
                    FailureKind::Io,
                    format!("{}: {err}", file.path.display()),
                )
            })?;
            reader_trace!("Attaching {} ({} bytes)", file.name, bytes.len());
            let part = Part::bytes(bytes)
                .file_name(file.name.clone())
                .mime_str("application/pdf")
                .map_err(map_reqwest_error)?;
            form = form.part("files", part);
        }
        form = form.text("only_aztec", if only_aztec { "true" } else { "false" });

        let response = self
            .client
            .post(self.endpoint("api/jobs")?)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            let detail = serde_json::from_slice::<ErrorBody>(&body)
                .ok()
                .and_then(|body| body.detail)
                .map(|detail| match detail {
                    serde_json::Value::String(text) => text,
                    other => other.to_string(),
                });
            reader_debug!("Upload rejected with {} detail={:?}", status, detail);
            return Err(ServiceError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            )
            .with_detail(detail));
        }

        let created: CreatedJobs = decode_body(response).await?;
        Ok(created.job_ids)
    }

    async fn job_status(&self, job_id: &str) -> Result<JobReport, ServiceError> {
        let mut url = self.endpoint("api/jobs/")?;
        url.path_segments_mut()
            .map_err(|_| ServiceError::new(FailureKind::InvalidUrl, "base url has no path"))?
            .pop_if_empty()
            .push(job_id);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }
        decode_body(response).await
    }
}

async fn decode_body<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ServiceError> {
    let body = response.bytes().await.map_err(map_reqwest_error)?;
    serde_json::from_slice(&body).map_err(|err| ServiceError::new(FailureKind::Decode, err.to_string()))
}

fn map_reqwest_error(err: reqwest::Error) -> ServiceError {
    if err.is_timeout() {
        return ServiceError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return ServiceError::new(FailureKind::Decode, err.to_string());
    }
    ServiceError::new(FailureKind::Network, err.to_string())
}
