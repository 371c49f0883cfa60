//! Registrar backend response envelope.
//!
//! Every list endpoint of the registrar backend wraps its payload in the same
//! paginated envelope:
//!
//! ```json
//! {
//!   "success": true,
//!   "message": "OK",
//!   "data": { "content": [ ... ], "totalElements": 3 }
//! }
//! ```
//!
//! A response without `success`, with `success: false`, or without
//! `data.content` carries no data and decodes to an empty list. A body that is
//! not JSON, or whose content does not match the entity schema, is a
//! [`EnvelopeError::Decode`].

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum EnvelopeError {
    #[error("Malformed response envelope: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default = "Option::default")]
    pub data: Option<PageContent<T>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageContent<T> {
    #[serde(default = "Option::default")]
    pub content: Option<Vec<T>>,
    #[serde(default)]
    pub total_elements: Option<u64>,
}

impl<T> ApiEnvelope<T> {
    /// Extracts the content list, treating any missing piece as "no data".
    pub fn into_content(self) -> Vec<T> {
        if self.success != Some(true) {
            debug!(
                success = ?self.success,
                message = ?self.message,
                "Envelope not marked successful, treating as empty"
            );
            return Vec::new();
        }

        match self.data.and_then(|data| data.content) {
            Some(content) => content,
            None => {
                debug!("Envelope has no data.content, treating as empty");
                Vec::new()
            }
        }
    }
}

/// Decodes an envelope body into its content list.
pub fn decode_content<T>(body: &[u8]) -> Result<Vec<T>, EnvelopeError>
where
    T: DeserializeOwned,
{
    let envelope: ApiEnvelope<T> = serde_json::from_slice(body)?;
    Ok(envelope.into_content())
}
