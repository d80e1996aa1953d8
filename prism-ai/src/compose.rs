//! Drag-and-drop composition: put a subject image into a scene image.
//!
//! Two model calls: first a text description of the scene, then a generation
//! that receives both images plus that description.

use tracing::{debug, info, warn};

use crate::{composition_prompt, AiError, GenerateRequest, GenerationBackend, ImageRef, Progress};

pub const SCENE_INSTRUCTION: &str =
    "Describe this scene in one paragraph: setting, lighting, perspective and mood.";

// Share of the progress bar spent on the description call.
const DESCRIBE_DONE: u8 = 30;

pub fn compose<B: GenerationBackend + ?Sized>(
    backend: &B,
    subject: &ImageRef,
    scene: &ImageRef,
    progress: &mut Progress<'_>,
) -> Result<ImageRef, AiError> {
    info!(subject = %subject.uri, scene = %scene.uri, "composing images");
    progress.report(5);

    let description = backend.describe(scene, SCENE_INSTRUCTION)?;
    let description = description.trim();
    if description.is_empty() {
        warn!(scene = %scene.uri, "scene description came back empty");
        return Err(AiError::EmptyDescription);
    }
    debug!(description = %description, "scene described");
    progress.report(DESCRIBE_DONE);

    let request = GenerateRequest::new(
        composition_prompt(description),
        vec![subject.clone(), scene.clone()],
    )?;
    let composed = {
        let mut step = progress.scoped(DESCRIBE_DONE, 100);
        backend.generate(&request, &mut step)?
    };

    progress.finish();
    info!(result = %composed.uri, "composition complete");
    Ok(composed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EditRequest;
    use std::cell::RefCell;

    #[derive(Default)]
    struct FakeBackend {
        description: String,
        fail_generate: bool,
        prompts: RefCell<Vec<String>>,
        image_counts: RefCell<Vec<usize>>,
    }

    impl GenerationBackend for FakeBackend {
        fn generate(
            &self,
            request: &GenerateRequest,
            progress: &mut Progress<'_>,
        ) -> Result<ImageRef, AiError> {
            self.prompts.borrow_mut().push(request.prompt.clone());
            self.image_counts.borrow_mut().push(request.images.len());
            progress.report(50);
            if self.fail_generate {
                return Err(AiError::Backend {
                    message: "quota exceeded".into(),
                });
            }
            progress.report(100);
            Ok(ImageRef::new("composed.png"))
        }

        fn edit(
            &self,
            _request: &EditRequest,
            _progress: &mut Progress<'_>,
        ) -> Result<ImageRef, AiError> {
            unreachable!("compose never edits")
        }

        fn describe(&self, _image: &ImageRef, instruction: &str) -> Result<String, AiError> {
            assert_eq!(instruction, SCENE_INSTRUCTION);
            Ok(self.description.clone())
        }
    }

    #[test]
    fn test_compose_calls_describe_then_generate() {
        let backend = FakeBackend {
            description: "a sunny beach with long shadows".into(),
            ..Default::default()
        };
        let mut seen = Vec::new();
        let result = {
            let mut progress = Progress::new(|p| seen.push(p));
            compose(
                &backend,
                &ImageRef::new("dog.png"),
                &ImageRef::new("beach.png"),
                &mut progress,
            )
        };

        assert_eq!(result.unwrap(), ImageRef::new("composed.png"));
        assert_eq!(*backend.image_counts.borrow(), vec![2]);
        assert!(backend.prompts.borrow()[0].contains("a sunny beach with long shadows"));
        assert_eq!(seen, vec![5, 30, 65, 100]);
    }

    #[test]
    fn test_compose_failure_does_not_finish() {
        let backend = FakeBackend {
            description: "a forest".into(),
            fail_generate: true,
            ..Default::default()
        };
        let mut progress = Progress::silent();
        let result = compose(
            &backend,
            &ImageRef::new("cat.png"),
            &ImageRef::new("forest.png"),
            &mut progress,
        );

        assert!(matches!(result, Err(AiError::Backend { .. })));
        assert!(!progress.is_finished());
    }

    #[test]
    fn test_compose_rejects_blank_description() {
        let backend = FakeBackend {
            description: "   ".into(),
            ..Default::default()
        };
        let result = compose(
            &backend,
            &ImageRef::new("cat.png"),
            &ImageRef::new("forest.png"),
            &mut Progress::silent(),
        );
        assert!(matches!(result, Err(AiError::EmptyDescription)));
        assert!(backend.prompts.borrow().is_empty());
    }
}
