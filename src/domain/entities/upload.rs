use serde::{Deserialize, Serialize};

/// Signed parameters a client needs to post a file straight to the media host.
/// Field names follow what browser clients already expect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadCredentials {
    pub signature: String,
    pub timestamp: i64,
    pub folder: String,
    pub cloud_name: String,
    pub api_key: String,
}

/// What the media host answers after a successful upload.
#[derive(Debug, Clone, Deserialize)]
pub struct HostUploadResponse {
    pub public_id: String,
    pub secure_url: String,
}

/// Outcome of an asset deletion at the media host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletionOutcome {
    Deleted,
    /// The asset was already gone.
    NotFound,
}

/// A file picked by the visitor, before anything leaves the machine.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        SelectedFile {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Builds a file whose type is read from its magic bytes rather than declared by the caller.
    pub fn sniffed(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let mime_type = infer::get(&bytes)
            .map(|kind| kind.mime_type().to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());

        SelectedFile::new(file_name, mime_type, bytes)
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}
