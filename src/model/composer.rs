//! Create-post form
//!
//! The composer validates the draft and walks through the phases of a submission. A draft
//! with an image first resolves that image to a URL (by upload or generation) and only then
//! creates the post. Every step that needs the network is handed back to the caller as a
//! [`Step`].

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::{
    post::{NewPost, Post, PostId, Visibility},
    text::{count_words, parse_tags},
};

pub const MIN_TITLE_CHARS: usize = 10;
pub const MIN_CONTENT_WORDS: usize = 100;
pub const MAX_CONTENT_WORDS: usize = 3000;

/// Where the main image comes from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ImageSource {
    #[default]
    None,
    /// A local file uploaded to the blog API
    Upload(PathBuf),
    /// A prompt for the image generation API
    Generate(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub title: String,
    pub content: String,
    /// Comma-separated tag list as typed
    pub tags: String,
    pub visibility: Visibility,
    pub image: ImageSource,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Title must be more than {} characters.", MIN_TITLE_CHARS)]
    TitleTooShort,
    #[error(
        "Content must be between {} and {} words (got {words}).",
        MIN_CONTENT_WORDS,
        MAX_CONTENT_WORDS
    )]
    ContentLength { words: usize },
    #[error("Image prompt must not be empty.")]
    EmptyImagePrompt,
}

impl Draft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().chars().count() <= MIN_TITLE_CHARS {
            return Err(ValidationError::TitleTooShort);
        }
        let words = count_words(&self.content);
        if !(MIN_CONTENT_WORDS..=MAX_CONTENT_WORDS).contains(&words) {
            return Err(ValidationError::ContentLength { words });
        }
        if let ImageSource::Generate(prompt) = &self.image {
            if prompt.trim().is_empty() {
                return Err(ValidationError::EmptyImagePrompt);
            }
        }
        Ok(())
    }

    pub fn to_new_post(&self, main_image_url: Option<String>) -> NewPost {
        NewPost {
            title: self.title.trim().to_string(),
            content: self.content.clone(),
            visibility: self.visibility,
            tags: parse_tags(&self.tags),
            main_image_url,
            sub_images: vec![],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Editing,
    UploadingImage,
    GeneratingImage,
    Submitting,
    Created(PostId),
    Failed(String),
}

/// Network work the composer is waiting for
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    UploadImage(PathBuf),
    GenerateImage(String),
    CreatePost(NewPost),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    DraftChanged(Draft),
    Submitted { authenticated: bool },
    ImageResolved(String),
    Created(Post),
    Failed(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Composer {
    draft: Draft,
    phase: Phase,
}

impl Composer {
    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_busy(&self) -> bool {
        matches!(
            self.phase,
            Phase::UploadingImage | Phase::GeneratingImage | Phase::Submitting
        )
    }

    pub fn update(&mut self, message: Message) -> Option<Step> {
        match message {
            Message::DraftChanged(draft) => {
                if !self.is_busy() {
                    self.draft = draft;
                    self.phase = Phase::Editing;
                }
                None
            }
            Message::Submitted { authenticated } => {
                if self.is_busy() {
                    return None;
                }
                if !authenticated {
                    self.phase = Phase::Failed("You must be logged in to create a blog.".into());
                    return None;
                }
                if let Err(e) = self.draft.validate() {
                    self.phase = Phase::Failed(e.to_string());
                    return None;
                }
                match &self.draft.image {
                    ImageSource::None => {
                        self.phase = Phase::Submitting;
                        Some(Step::CreatePost(self.draft.to_new_post(None)))
                    }
                    ImageSource::Upload(path) => {
                        self.phase = Phase::UploadingImage;
                        Some(Step::UploadImage(path.clone()))
                    }
                    ImageSource::Generate(prompt) => {
                        self.phase = Phase::GeneratingImage;
                        Some(Step::GenerateImage(prompt.trim().to_string()))
                    }
                }
            }
            Message::ImageResolved(url) => match self.phase {
                Phase::UploadingImage | Phase::GeneratingImage => {
                    self.phase = Phase::Submitting;
                    Some(Step::CreatePost(self.draft.to_new_post(Some(url))))
                }
                _ => None,
            },
            Message::Created(post) => {
                self.draft = Draft::default();
                self.phase = Phase::Created(post.id);
                None
            }
            Message::Failed(error) => {
                self.phase = Phase::Failed(error);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::*;

    use super::*;

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    #[fixture]
    fn draft() -> Draft {
        Draft {
            title: "A walk in the park".into(),
            content: words(120),
            tags: "nature, walking".into(),
            ..Draft::default()
        }
    }

    fn composer_with(draft: Draft) -> Composer {
        let mut composer = Composer::default();
        composer.update(Message::DraftChanged(draft));
        composer
    }

    #[rstest]
    #[case("0123456789", false)]
    #[case("01234567890", true)]
    #[case("  0123456789  ", false)]
    fn test_title_boundary(mut draft: Draft, #[case] title: &str, #[case] valid: bool) {
        draft.title = title.into();
        assert_eq!(draft.validate().is_ok(), valid);
    }

    #[rstest]
    #[case(99, false)]
    #[case(100, true)]
    #[case(3000, true)]
    #[case(3001, false)]
    fn test_content_boundary(mut draft: Draft, #[case] n: usize, #[case] valid: bool) {
        draft.content = words(n);
        assert_eq!(draft.validate().is_ok(), valid);
    }

    #[rstest]
    fn test_new_post_parses_tags(draft: Draft) {
        let post = draft.to_new_post(None);
        assert_eq!(post.tags, vec!["nature", "walking"]);
        assert_eq!(post.visibility, Visibility::Public);
        assert!(post.sub_images.is_empty());
    }

    #[rstest]
    fn test_submit_requires_login(draft: Draft) {
        let mut composer = composer_with(draft);
        assert_eq!(composer.update(Message::Submitted { authenticated: false }), None);
        assert_eq!(
            composer.phase(),
            &Phase::Failed("You must be logged in to create a blog.".into())
        );
    }

    #[rstest]
    fn test_submit_invalid_draft(mut draft: Draft) {
        draft.title = "short".into();
        let mut composer = composer_with(draft);
        assert_eq!(composer.update(Message::Submitted { authenticated: true }), None);
        assert_eq!(
            composer.phase(),
            &Phase::Failed("Title must be more than 10 characters.".into())
        );
    }

    #[rstest]
    fn test_submit_without_image(draft: Draft) {
        let mut composer = composer_with(draft.clone());
        let step = composer.update(Message::Submitted { authenticated: true });

        assert_eq!(step, Some(Step::CreatePost(draft.to_new_post(None))));
        assert_eq!(composer.phase(), &Phase::Submitting);

        composer.update(Message::Created(Post::new(5, "A walk in the park")));
        assert_eq!(composer.phase(), &Phase::Created(PostId(5)));
        assert_eq!(composer.draft(), &Draft::default());
    }

    #[rstest]
    fn test_submit_with_upload(mut draft: Draft) {
        draft.image = ImageSource::Upload(PathBuf::from("/tmp/cat.png"));
        let mut composer = composer_with(draft.clone());

        let step = composer.update(Message::Submitted { authenticated: true });
        assert_eq!(step, Some(Step::UploadImage(PathBuf::from("/tmp/cat.png"))));
        assert_eq!(composer.phase(), &Phase::UploadingImage);

        let step = composer.update(Message::ImageResolved("/static/cat.png".into()));
        assert_eq!(
            step,
            Some(Step::CreatePost(
                draft.to_new_post(Some("/static/cat.png".into()))
            ))
        );
    }

    #[rstest]
    fn test_submit_with_generated_image(mut draft: Draft) {
        draft.image = ImageSource::Generate("  a cat  ".into());
        let mut composer = composer_with(draft);

        let step = composer.update(Message::Submitted { authenticated: true });
        assert_eq!(step, Some(Step::GenerateImage("a cat".into())));
        assert_eq!(composer.phase(), &Phase::GeneratingImage);
    }

    #[rstest]
    fn test_busy_composer_ignores_resubmit(draft: Draft) {
        let mut composer = composer_with(draft);
        composer.update(Message::Submitted { authenticated: true });
        assert!(composer.is_busy());
        assert_eq!(composer.update(Message::Submitted { authenticated: true }), None);
    }

    #[rstest]
    fn test_image_resolved_outside_image_phase_is_ignored(draft: Draft) {
        let mut composer = composer_with(draft);
        assert_eq!(composer.update(Message::ImageResolved("x".into())), None);
        assert_eq!(composer.phase(), &Phase::Editing);
    }

    #[rstest]
    fn test_failure_keeps_draft(draft: Draft) {
        let mut composer = composer_with(draft.clone());
        composer.update(Message::Submitted { authenticated: true });
        composer.update(Message::Failed("Network Error".into()));

        assert_eq!(composer.phase(), &Phase::Failed("Network Error".into()));
        assert_eq!(composer.draft(), &draft);
    }
}
