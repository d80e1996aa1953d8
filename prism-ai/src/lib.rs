// This defines what PRISM sends to the image model and the JSON we accept back
// Parse and validate it
// Convert the reply into an ImageRef the editor can push into history

pub mod backend;
pub mod compose;
pub mod progress;
pub mod prompt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use backend::{EditRequest, GenerateRequest, GenerationBackend};
pub use compose::{compose, SCENE_INSTRUCTION};
pub use progress::Progress;
pub use prompt::{build_edit_prompt, composition_prompt, generation_prompt, EditAction, EditParams};

/// Handle to an image produced by the model or picked by the user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageRef {
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

impl ImageRef {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            width: None,
            height: None,
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }
}

/// Image reply from the model.
#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImageResponseV1 {
    pub image_uri: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub notes: Option<String>,
}

/// Text reply from the model (scene descriptions).
#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DescriptionResponseV1 {
    pub description: String,
}

pub fn parse_image_response(json: &str) -> Result<ImageRef, AiError> {
    let response: ImageResponseV1 = serde_json::from_str(json)?;
    if response.image_uri.trim().is_empty() {
        tracing::error!("model reply has an empty image_uri");
        return Err(AiError::EmptyImageUri);
    }
    if let Some(notes) = &response.notes {
        tracing::debug!(notes = %notes, "model notes");
    }

    Ok(ImageRef {
        uri: response.image_uri,
        width: response.width,
        height: response.height,
    })
}

pub fn parse_description_response(json: &str) -> Result<String, AiError> {
    let response: DescriptionResponseV1 = serde_json::from_str(json)?;
    let description = response.description.trim();
    if description.is_empty() {
        return Err(AiError::EmptyDescription);
    }
    Ok(description.to_string())
}

#[derive(Debug, Error)]
pub enum AiError {
    #[error("prompt cannot be empty")]
    EmptyPrompt,

    #[error("{action} needs a '{param}' parameter")]
    MissingParam {
        action: &'static str,
        param: &'static str,
    },

    #[error("invalid model response: {0}")]
    InvalidResponse(#[from] serde_json::Error),

    #[error("model response has no image")]
    EmptyImageUri,

    #[error("model returned an empty scene description")]
    EmptyDescription,

    #[error("backend request failed: {message}")]
    Backend { message: String },
}
