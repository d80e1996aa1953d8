//! Prompt text sent to the image model.
//!
//! Prompts are plain sentences. Each edit action has a fixed instruction and
//! optionally takes a style or a free-form instruction from the user.

use serde::{Deserialize, Serialize};

use crate::AiError;

/// Edits the editor offers on an existing image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditAction {
    RemoveBackground,
    /// Needs `instruction`: what the new background should be.
    ReplaceBackground,
    /// Needs `style`.
    StyleTransfer,
    Enhance,
    /// Needs `instruction`: sent as-is.
    Custom,
}

impl EditAction {
    pub fn label(&self) -> &'static str {
        match self {
            EditAction::RemoveBackground => "remove_background",
            EditAction::ReplaceBackground => "replace_background",
            EditAction::StyleTransfer => "style_transfer",
            EditAction::Enhance => "enhance",
            EditAction::Custom => "custom",
        }
    }
}

/// Optional inputs for an edit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditParams {
    pub style: Option<String>,
    pub instruction: Option<String>,
}

impl EditParams {
    pub fn style(style: impl Into<String>) -> Self {
        Self {
            style: Some(style.into()),
            instruction: None,
        }
    }

    pub fn instruction(instruction: impl Into<String>) -> Self {
        Self {
            style: None,
            instruction: Some(instruction.into()),
        }
    }
}

fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(|s| s.trim()).filter(|s| !s.is_empty())
}

fn require<'a>(
    value: Option<&'a String>,
    action: EditAction,
    param: &'static str,
) -> Result<&'a str, AiError> {
    non_blank(value).ok_or_else(|| {
        tracing::error!(action = action.label(), param, "edit parameter missing");
        AiError::MissingParam {
            action: action.label(),
            param,
        }
    })
}

/// Build the prompt for an edit.
pub fn build_edit_prompt(action: EditAction, params: &EditParams) -> Result<String, AiError> {
    let mut prompt = match action {
        EditAction::RemoveBackground => {
            "Remove the background from this image. Keep the main subject intact and \
             output it on a transparent background."
                .to_string()
        }
        EditAction::ReplaceBackground => {
            let scene = require(params.instruction.as_ref(), action, "instruction")?;
            return Ok(format!(
                "Replace the background of this image with: {scene}. \
                 Keep the main subject unchanged and match the lighting."
            ));
        }
        EditAction::StyleTransfer => {
            let style = require(params.style.as_ref(), action, "style")?;
            format!(
                "Redraw this image in the style of {style}. \
                 Preserve the composition and the subject."
            )
        }
        EditAction::Enhance => "Enhance this photo: improve sharpness, lighting and color \
                                balance without changing its content."
            .to_string(),
        EditAction::Custom => {
            let instruction = require(params.instruction.as_ref(), action, "instruction")?;
            return Ok(instruction.to_string());
        }
    };

    if let Some(extra) = non_blank(params.instruction.as_ref()) {
        prompt.push_str(" Additional instructions: ");
        prompt.push_str(extra);
    }

    tracing::trace!(action = action.label(), prompt = %prompt, "edit prompt built");
    Ok(prompt)
}

/// Build a text-to-image prompt, optionally pinned to a style.
pub fn generation_prompt(user_prompt: &str, style: Option<&str>) -> Result<String, AiError> {
    let user_prompt = user_prompt.trim();
    if user_prompt.is_empty() {
        return Err(AiError::EmptyPrompt);
    }

    Ok(match style.map(str::trim).filter(|s| !s.is_empty()) {
        Some(style) => format!("{user_prompt}, in the style of {style}"),
        None => user_prompt.to_string(),
    })
}

/// Prompt for placing the first image's subject into a scene described by text.
pub fn composition_prompt(scene_description: &str) -> String {
    format!(
        "Place the main subject of the first image into the scene of the second image. \
         Scene: {}. Match perspective, scale, lighting and shadows so the result looks \
         like a single photograph.",
        scene_description.trim()
    )
}
