use std::sync::{
    atomic::{AtomicU8, Ordering},
    Arc,
};
use std::time::Duration;

use reqwest::{multipart, Body, Client, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};

use crate::domain::preflight::validate_file;
use crate::entities::image::{ImageRecord, RecordUploadRequest};
use crate::entities::upload::{HostUploadResponse, SelectedFile, UploadCredentials};
use crate::errors::UploadError;

const UPLOAD_CHUNK_SIZE: usize = 64 * 1024;
const REQUEST_TIMEOUT_SECS: u64 = 120;

/// Progress milestones, in percent.
const AFTER_PREFLIGHT: u8 = 10;
const AFTER_CREDENTIALS: u8 = 20;
const AFTER_TRANSFER: u8 = 90;
const COMPLETE: u8 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum UploadPhase {
    Idle = 0,
    Preparing = 1,
    Uploading = 2,
    Saving = 3,
    Complete = 4,
    Failed = 5,
}

impl UploadPhase {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => UploadPhase::Preparing,
            2 => UploadPhase::Uploading,
            3 => UploadPhase::Saving,
            4 => UploadPhase::Complete,
            5 => UploadPhase::Failed,
            _ => UploadPhase::Idle,
        }
    }
}

/// Shared progress state, safe to poll from another task while an upload runs.
#[derive(Debug, Default)]
pub struct UploadProgress {
    percent: AtomicU8,
    phase: AtomicU8,
}

impl UploadProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn percent(&self) -> u8 {
        self.percent.load(Ordering::Relaxed)
    }

    pub fn phase(&self) -> UploadPhase {
        UploadPhase::from_u8(self.phase.load(Ordering::Relaxed))
    }

    fn advance(&self, phase: UploadPhase, percent: u8) {
        self.phase.store(phase as u8, Ordering::Relaxed);
        self.percent.store(percent.min(COMPLETE), Ordering::Relaxed);
    }

    fn fail(&self) {
        self.phase.store(UploadPhase::Failed as u8, Ordering::Relaxed);
        self.percent.store(0, Ordering::Relaxed);
    }
}

/// Maps bytes handed to the transport onto the 20..=90 band.
pub fn transfer_percent(sent: u64, total: u64) -> u8 {
    if total == 0 {
        return AFTER_TRANSFER;
    }
    let span = (AFTER_TRANSFER - AFTER_CREDENTIALS) as u64;
    let done = (sent.min(total) * span + total / 2) / total;
    AFTER_CREDENTIALS + done as u8
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    success: bool,
    data: Option<T>,
    error: Option<String>,
}

/// Client-side upload workflow: pre-flight, signed credentials, direct transfer
/// to the media host, then the metadata record on the service.
#[derive(Clone)]
pub struct UploadClient {
    http: Client,
    service_url: String,
    media_api_base: String,
}

impl UploadClient {
    pub fn new(service_url: &str, media_api_base: &str) -> Result<Self, UploadError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| UploadError::Transfer(e.to_string()))?;

        Ok(UploadClient {
            http,
            service_url: service_url.trim_end_matches('/').to_string(),
            media_api_base: media_api_base.trim_end_matches('/').to_string(),
        })
    }

    pub async fn upload(&self, file: SelectedFile) -> Result<ImageRecord, UploadError> {
        self.upload_with_progress(file, Arc::new(UploadProgress::new())).await
    }

    pub async fn upload_with_progress(
        &self,
        file: SelectedFile,
        progress: Arc<UploadProgress>,
    ) -> Result<ImageRecord, UploadError> {
        progress.advance(UploadPhase::Preparing, 0);

        let result = self.run(file, &progress).await;
        match &result {
            Ok(record) => {
                progress.advance(UploadPhase::Complete, COMPLETE);
                tracing::info!(public_id = %record.cloudinary_public_id, "Upload recorded");
            }
            Err(e) => {
                progress.fail();
                tracing::warn!(error = %e, "Upload failed");
            }
        }
        result
    }

    async fn run(&self, file: SelectedFile, progress: &Arc<UploadProgress>) -> Result<ImageRecord, UploadError> {
        validate_file(&file)?;
        progress.advance(UploadPhase::Preparing, AFTER_PREFLIGHT);

        let credentials = self.request_credentials().await?;
        progress.advance(UploadPhase::Uploading, AFTER_CREDENTIALS);

        let uploaded = self.transfer(file, &credentials, progress).await?;
        progress.advance(UploadPhase::Saving, AFTER_TRANSFER);

        self.record(uploaded).await
    }

    async fn request_credentials(&self) -> Result<UploadCredentials, UploadError> {
        let response = self.http
            .post(format!("{}/api/v1/uploads/signature", self.service_url))
            .send()
            .await
            .map_err(|e| UploadError::Credentials(e.to_string()))?;

        unwrap_envelope(response).await.map_err(UploadError::Credentials)
    }

    async fn transfer(
        &self,
        file: SelectedFile,
        credentials: &UploadCredentials,
        progress: &Arc<UploadProgress>,
    ) -> Result<HostUploadResponse, UploadError> {
        let SelectedFile { file_name, mime_type, bytes } = file;
        let total = bytes.len() as u64;

        let chunks: Vec<Vec<u8>> = bytes.chunks(UPLOAD_CHUNK_SIZE).map(<[u8]>::to_vec).collect();
        let tracker = Arc::clone(progress);
        let mut sent = 0u64;
        let stream = futures_util::stream::iter(chunks.into_iter().map(move |chunk| {
            sent += chunk.len() as u64;
            tracker.advance(UploadPhase::Uploading, transfer_percent(sent, total));
            Ok::<_, std::io::Error>(chunk)
        }));

        let part = multipart::Part::stream_with_length(Body::wrap_stream(stream), total)
            .file_name(file_name)
            .mime_str(&mime_type)
            .map_err(|e| UploadError::Transfer(e.to_string()))?;

        let form = multipart::Form::new()
            .part("file", part)
            .text("timestamp", credentials.timestamp.to_string())
            .text("folder", credentials.folder.clone())
            .text("signature", credentials.signature.clone())
            .text("api_key", credentials.api_key.clone());

        let response = self.http
            .post(format!("{}/{}/image/upload", self.media_api_base, credentials.cloud_name))
            .multipart(form)
            .send()
            .await
            .map_err(|e| UploadError::Transfer(e.to_string()))?;

        if response.status() != StatusCode::OK {
            return Err(UploadError::HostRejected(response.status().as_u16()));
        }

        response
            .json::<HostUploadResponse>()
            .await
            .map_err(|e| UploadError::Transfer(e.to_string()))
    }

    async fn record(&self, uploaded: HostUploadResponse) -> Result<ImageRecord, UploadError> {
        let request = RecordUploadRequest {
            cloudinary_public_id: uploaded.public_id,
            image_url: uploaded.secure_url,
        };

        let response = self.http
            .post(format!("{}/api/v1/images", self.service_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| UploadError::Record(e.to_string()))?;

        unwrap_envelope(response).await.map_err(UploadError::Record)
    }
}

async fn unwrap_envelope<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, String> {
    let status = response.status();
    let envelope: Envelope<T> = response
        .json()
        .await
        .map_err(|e| format!("unreadable response ({status}): {e}"))?;

    match envelope {
        Envelope { success: true, data: Some(data), .. } => Ok(data),
        Envelope { error, .. } => Err(error.unwrap_or_else(|| format!("request failed ({status})"))),
    }
}
