use std::{collections::BTreeMap, time::Duration};

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use sha1::{Digest, Sha1};
use zeroize::Zeroizing;

use crate::entities::upload::{DeletionOutcome, UploadCredentials};
use crate::errors::MediaHostError;
use crate::repositories::media_host::MediaHost;
use crate::settings::AppConfig;

const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

/// Signed-upload and destroy client for a Cloudinary-compatible media host.
#[derive(Clone)]
pub struct CloudinaryClient {
    http: reqwest::Client,
    cloud_name: String,
    api_key: String,
    api_secret: Zeroizing<String>,
    folder: String,
    api_base: String,
}

impl CloudinaryClient {
    pub fn new(config: &AppConfig) -> Result<Self, MediaHostError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(CloudinaryClient {
            http,
            cloud_name: config.cloudinary_cloud_name.trim().to_string(),
            api_key: config.cloudinary_api_key.trim().to_string(),
            api_secret: Zeroizing::new(config.cloudinary_api_secret.clone()),
            folder: config.cloudinary_upload_folder.trim().to_string(),
            api_base: config.cloudinary_api_base.trim_end_matches('/').to_string(),
        })
    }

    fn is_configured(&self) -> bool {
        !self.cloud_name.is_empty() && !self.api_key.is_empty() && !self.api_secret.is_empty()
    }

    /// `{api_base}/{cloud_name}/image/{action}`
    pub fn endpoint(&self, action: &str) -> String {
        format!("{}/{}/image/{}", self.api_base, self.cloud_name, action)
    }

    pub fn sign(&self, params: &BTreeMap<&str, String>) -> String {
        sign_params(params, &self.api_secret)
    }
}

/// Request signature expected by the media host: parameters sorted by name,
/// joined as `name=value` pairs with `&`, secret appended, SHA-1, lowercase hex.
/// Empty values are left out of the signed string.
pub fn sign_params(params: &BTreeMap<&str, String>, api_secret: &str) -> String {
    let to_sign = params
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha1::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

#[async_trait]
impl MediaHost for CloudinaryClient {
    fn upload_credentials(&self) -> Result<UploadCredentials, MediaHostError> {
        if !self.is_configured() {
            return Err(MediaHostError::NotConfigured);
        }

        let timestamp = Utc::now().timestamp();
        let params = BTreeMap::from([
            ("folder", self.folder.clone()),
            ("timestamp", timestamp.to_string()),
        ]);

        Ok(UploadCredentials {
            signature: self.sign(&params),
            timestamp,
            folder: self.folder.clone(),
            cloud_name: self.cloud_name.clone(),
            api_key: self.api_key.clone(),
        })
    }

    async fn delete_asset(&self, public_id: &str) -> Result<DeletionOutcome, MediaHostError> {
        if !self.is_configured() {
            return Err(MediaHostError::NotConfigured);
        }

        let timestamp = Utc::now().timestamp().to_string();
        let params = BTreeMap::from([
            ("public_id", public_id.to_string()),
            ("timestamp", timestamp.clone()),
        ]);
        let signature = self.sign(&params);

        let response = self.http
            .post(self.endpoint("destroy"))
            .form(&[
                ("public_id", public_id),
                ("timestamp", timestamp.as_str()),
                ("api_key", self.api_key.as_str()),
                ("signature", signature.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MediaHostError::Status(status.as_u16(), body));
        }

        let body: DestroyResponse = response
            .json()
            .await
            .map_err(|e| MediaHostError::UnexpectedResponse(e.to_string()))?;

        match body.result.as_str() {
            "ok" => Ok(DeletionOutcome::Deleted),
            "not found" => {
                tracing::debug!(public_id, "Asset already absent at media host");
                Ok(DeletionOutcome::NotFound)
            }
            other => Err(MediaHostError::Rejected(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_covers_sorted_params_and_secret() {
        let params = BTreeMap::from([
            ("timestamp", "1700000000".to_string()),
            ("folder", "anonstreak".to_string()),
        ]);

        let expected = hex::encode(Sha1::digest(b"folder=anonstreak&timestamp=1700000000shh"));

        assert_eq!(sign_params(&params, "shh"), expected);
    }

    #[test]
    fn signature_changes_with_any_parameter() {
        let base = BTreeMap::from([
            ("folder", "anonstreak".to_string()),
            ("timestamp", "1700000000".to_string()),
        ]);
        let other_folder = BTreeMap::from([
            ("folder", "elsewhere".to_string()),
            ("timestamp", "1700000000".to_string()),
        ]);
        let other_time = BTreeMap::from([
            ("folder", "anonstreak".to_string()),
            ("timestamp", "1700000001".to_string()),
        ]);

        let signature = sign_params(&base, "shh");

        assert_eq!(signature.len(), 40);
        assert_ne!(signature, sign_params(&other_folder, "shh"));
        assert_ne!(signature, sign_params(&other_time, "shh"));
        assert_ne!(signature, sign_params(&base, "other-secret"));
    }

    #[test]
    fn empty_values_are_not_signed() {
        let with_empty = BTreeMap::from([
            ("folder", "anonstreak".to_string()),
            ("tags", String::new()),
            ("timestamp", "1700000000".to_string()),
        ]);
        let without = BTreeMap::from([
            ("folder", "anonstreak".to_string()),
            ("timestamp", "1700000000".to_string()),
        ]);

        assert_eq!(sign_params(&with_empty, "shh"), sign_params(&without, "shh"));
    }
}
