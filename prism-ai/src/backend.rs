//! Requests to the generative image service and the trait a transport implements.
//!
//! PRISM does not ship an HTTP client. The host app implements
//! [`GenerationBackend`] over whatever provider it talks to and hands it to
//! the editor.

use serde::{Deserialize, Serialize};

use crate::{build_edit_prompt, AiError, EditAction, EditParams, ImageRef, Progress};

/// Text-to-image (or image+text-to-image) request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub prompt: String,
    /// Reference images sent alongside the prompt, in order.
    pub images: Vec<ImageRef>,
}

impl GenerateRequest {
    pub fn new(prompt: impl Into<String>, images: Vec<ImageRef>) -> Result<Self, AiError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            tracing::error!("generate request with empty prompt");
            return Err(AiError::EmptyPrompt);
        }
        Ok(Self { prompt, images })
    }
}

/// Edit of a single existing image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditRequest {
    pub action: EditAction,
    pub image: ImageRef,
    #[serde(default)]
    pub params: EditParams,
}

impl EditRequest {
    pub fn new(action: EditAction, image: ImageRef, params: EditParams) -> Self {
        Self {
            action,
            image,
            params,
        }
    }

    /// Prompt text for this edit. Fails when the action's required parameter is missing.
    pub fn prompt(&self) -> Result<String, AiError> {
        build_edit_prompt(self.action, &self.params)
    }
}

/// A generative image service.
///
/// Implementations report progress through `progress` as they go; callers
/// decide whether to call [`Progress::finish`].
pub trait GenerationBackend {
    fn generate(
        &self,
        request: &GenerateRequest,
        progress: &mut Progress<'_>,
    ) -> Result<ImageRef, AiError>;

    fn edit(&self, request: &EditRequest, progress: &mut Progress<'_>)
        -> Result<ImageRef, AiError>;

    /// Ask the model for a text answer about `image`.
    fn describe(&self, image: &ImageRef, instruction: &str) -> Result<String, AiError>;
}

impl<B: GenerationBackend + ?Sized> GenerationBackend for &B {
    fn generate(
        &self,
        request: &GenerateRequest,
        progress: &mut Progress<'_>,
    ) -> Result<ImageRef, AiError> {
        (**self).generate(request, progress)
    }

    fn edit(
        &self,
        request: &EditRequest,
        progress: &mut Progress<'_>,
    ) -> Result<ImageRef, AiError> {
        (**self).edit(request, progress)
    }

    fn describe(&self, image: &ImageRef, instruction: &str) -> Result<String, AiError> {
        (**self).describe(image, instruction)
    }
}
