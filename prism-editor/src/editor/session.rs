// Edit session: one source image, its edit history and the services that change it.

use prism_ai::{
    compose, generation_prompt, AiError, EditAction, EditParams, EditRequest, GenerateRequest,
    GenerationBackend, ImageRef, Progress,
};
use prism_core::{HistoryAction, HistoryState};
use prism_gallery::{save_image, ImageRecord, PersistenceBackend, StoreError};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::EditorConfig;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("no image loaded in the editor")]
    NoImage,

    #[error(transparent)]
    Ai(#[from] AiError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Drives a [`HistoryState`] from completed model calls.
///
/// Only successful results are pushed. A failed call leaves the history
/// exactly as it was.
pub struct EditSession<B, S> {
    backend: B,
    store: S,
    history: HistoryState<ImageRef>,
    default_style: Option<String>,
    // prompt paired with the history position of the result it produced
    last_prompt: Option<(usize, String)>,
}

impl<B: GenerationBackend, S: PersistenceBackend> EditSession<B, S> {
    pub fn new(backend: B, store: S, config: &EditorConfig) -> Self {
        info!(
            capacity = config.history.capacity,
            default_style = ?config.default_style,
            "starting edit session"
        );
        Self {
            backend,
            store,
            history: HistoryState::from_config(None, &config.history),
            default_style: config.default_style.clone(),
            last_prompt: None,
        }
    }

    /// Start over from a newly picked image. Previous history is dropped.
    pub fn load_source(&mut self, image: ImageRef) {
        info!(uri = %image.uri, "loading source image");
        self.history.dispatch(HistoryAction::SetInitial(Some(image)));
        self.last_prompt = None;
    }

    pub fn clear(&mut self) {
        info!("clearing edit session");
        self.history.dispatch(HistoryAction::SetInitial(None));
        self.last_prompt = None;
    }

    /// Generate a new image from `prompt` and optional reference images.
    pub fn generate(
        &mut self,
        prompt: &str,
        images: Vec<ImageRef>,
        progress: &mut Progress<'_>,
    ) -> Result<ImageRef, EditorError> {
        let prompt = generation_prompt(prompt, self.default_style.as_deref())?;
        let request = GenerateRequest::new(prompt, images)?;
        debug!(prompt = %request.prompt, images = request.images.len(), "generate");

        let image = self
            .backend
            .generate(&request, progress)
            .map_err(|e| failed("generate", e))?;

        Ok(self.commit(image, Some(request.prompt), progress))
    }

    /// Run an edit on the image currently shown.
    pub fn apply_edit(
        &mut self,
        action: EditAction,
        mut params: EditParams,
        progress: &mut Progress<'_>,
    ) -> Result<ImageRef, EditorError> {
        let image = self.present().cloned().ok_or(EditorError::NoImage)?;

        let style_missing = params
            .style
            .as_deref()
            .map_or(true, |s| s.trim().is_empty());
        if action == EditAction::StyleTransfer && style_missing {
            params.style = self.default_style.clone();
        }
        let request = EditRequest::new(action, image, params);
        let prompt = request.prompt()?;
        debug!(action = action.label(), "apply edit");

        let edited = self
            .backend
            .edit(&request, progress)
            .map_err(|e| failed(action.label(), e))?;

        Ok(self.commit(edited, Some(prompt), progress))
    }

    /// Drop `subject` into the image currently shown.
    pub fn compose(
        &mut self,
        subject: &ImageRef,
        progress: &mut Progress<'_>,
    ) -> Result<ImageRef, EditorError> {
        let scene = self.present().cloned().ok_or(EditorError::NoImage)?;

        let composed =
            compose(&self.backend, subject, &scene, progress).map_err(|e| failed("compose", e))?;

        Ok(self.commit(composed, None, progress))
    }

    pub fn undo(&mut self) -> Option<&ImageRef> {
        self.history.dispatch(HistoryAction::Undo);
        self.present()
    }

    pub fn redo(&mut self) -> Option<&ImageRef> {
        self.history.dispatch(HistoryAction::Redo);
        self.present()
    }

    pub fn present(&self) -> Option<&ImageRef> {
        self.history.present()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn history(&self) -> &HistoryState<ImageRef> {
        &self.history
    }

    /// Prompt behind the image currently shown, when it is the latest result.
    pub fn last_prompt(&self) -> Option<&str> {
        match (&self.last_prompt, self.history.cursor()) {
            (Some((at, prompt)), Some(cursor)) if *at == cursor => Some(prompt.as_str()),
            _ => None,
        }
    }

    /// Upload the image currently shown and record it for `owner_id`.
    pub fn save_present(&self, owner_id: &str) -> Result<ImageRecord, EditorError> {
        let image = self.present().ok_or(EditorError::NoImage)?;
        let prompt = self.last_prompt().map(str::to_string);
        let record = save_image(&self.store, image, owner_id, prompt)?;
        Ok(record)
    }

    fn commit(
        &mut self,
        image: ImageRef,
        prompt: Option<String>,
        progress: &mut Progress<'_>,
    ) -> ImageRef {
        progress.finish();
        self.history.dispatch(HistoryAction::Push(image.clone()));
        // a push leaves the cursor on the new entry; later pushes replace this
        self.last_prompt = self.history.cursor().zip(prompt);
        debug!(
            cursor = ?self.history.cursor(),
            len = self.history.len(),
            "edit committed"
        );
        image
    }
}

fn failed(operation: &str, err: AiError) -> AiError {
    warn!(operation, error = %err, "model call failed, history unchanged");
    err
}
