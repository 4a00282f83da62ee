//! Publishing a single transcript line.

use std::path::Path;

use rand::Rng;
use tracing::{debug, warn};

use crate::error::{PlatformError, Result, ShowcastError};
use crate::platforms::Platform;
use crate::transcript::TranscriptLine;

/// Invisible in rendered posts; defeats duplicate-content detection for
/// recurring lines.
const ZERO_WIDTH_SPACE: char = '\u{200B}';

/// Outcome of one publish attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Content is live.
    Posted { post_id: String, with_image: bool },
    /// The platform refused the text as duplicate content; the line is
    /// treated as delivered, since retrying can never succeed.
    Duplicate,
    /// Blank line: nothing to publish, but the index is still consumed.
    Skipped,
}

/// Publishes transcript lines through one platform.
pub struct Poster {
    platform: Box<dyn Platform>,
    dedup_space: bool,
}

impl Poster {
    pub fn new(platform: Box<dyn Platform>, dedup_space: bool) -> Self {
        Self {
            platform,
            dedup_space,
        }
    }

    pub fn platform_name(&self) -> &str {
        self.platform.name()
    }

    /// Publish one parsed line.
    ///
    /// A line with an image reference looks for `<index>.jpg` inside
    /// `image_dir`; a missing file downgrades to text-only rather than
    /// failing. There is no partial success; either the content is live
    /// or nothing was posted.
    pub async fn publish(&self, line: &TranscriptLine, image_dir: &Path) -> Result<Dispatch> {
        if line.is_blank() {
            return Ok(Dispatch::Skipped);
        }

        let text = if self.dedup_space {
            insert_zero_width_space(&line.text)
        } else {
            line.text.clone()
        };

        let result = match line.image_index {
            Some(index) => {
                let image = image_dir.join(format!("{}.jpg", index));
                if image.is_file() {
                    self.platform
                        .post_with_image(&text, &image)
                        .await
                        .map(|post_id| (post_id, true))
                } else {
                    debug!(image = %image.display(), "image missing, posting text-only");
                    self.platform.post(&text).await.map(|post_id| (post_id, false))
                }
            }
            None => self.platform.post(&text).await.map(|post_id| (post_id, false)),
        };

        match result {
            Ok((post_id, with_image)) => Ok(Dispatch::Posted {
                post_id,
                with_image,
            }),
            Err(ShowcastError::Platform(PlatformError::Duplicate(detail))) => {
                warn!(%detail, "duplicate content, treating the line as delivered");
                Ok(Dispatch::Duplicate)
            }
            Err(e) => Err(e),
        }
    }
}

fn insert_zero_width_space(text: &str) -> String {
    if text.is_empty() {
        return text.to_string();
    }
    let boundaries: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
    let at = boundaries[rand::thread_rng().gen_range(0..boundaries.len())];

    let mut out = String::with_capacity(text.len() + ZERO_WIDTH_SPACE.len_utf8());
    out.push_str(&text[..at]);
    out.push(ZERO_WIDTH_SPACE);
    out.push_str(&text[at..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platforms::mock::MockPlatform;
    use crate::transcript::TranscriptLine;
    use tempfile::tempdir;

    fn line(raw: &str) -> TranscriptLine {
        TranscriptLine::parse(raw)
    }

    #[tokio::test]
    async fn test_publish_text_only() {
        let platform = MockPlatform::success("mock");
        let posts = platform.posts();
        let poster = Poster::new(Box::new(platform), false);
        let dir = tempdir().expect("tempdir");

        let dispatch = poster
            .publish(&line("Hello there"), dir.path())
            .await
            .expect("publish");

        assert!(matches!(dispatch, Dispatch::Posted { with_image: false, .. }));
        assert_eq!(posts.lock().unwrap()[0].text, "Hello there");
    }

    #[tokio::test]
    async fn test_publish_with_image() {
        let platform = MockPlatform::success("mock");
        let posts = platform.posts();
        let poster = Poster::new(Box::new(platform), false);

        let dir = tempdir().expect("tempdir");
        let image = dir.path().join("3.jpg");
        std::fs::write(&image, b"\xff\xd8fake").expect("write image");

        let dispatch = poster
            .publish(&line("img 3 Hello there"), dir.path())
            .await
            .expect("publish");

        assert!(matches!(dispatch, Dispatch::Posted { with_image: true, .. }));
        let recorded = posts.lock().unwrap();
        assert_eq!(recorded[0].text, "Hello there");
        assert_eq!(recorded[0].image.as_deref(), Some(image.as_path()));
    }

    #[tokio::test]
    async fn test_missing_image_falls_back_to_text() {
        let platform = MockPlatform::success("mock");
        let posts = platform.posts();
        let poster = Poster::new(Box::new(platform), false);
        let dir = tempdir().expect("tempdir");

        let dispatch = poster
            .publish(&line("img 5 Still fine"), dir.path())
            .await
            .expect("publish");

        assert!(matches!(dispatch, Dispatch::Posted { with_image: false, .. }));
        let recorded = posts.lock().unwrap();
        assert_eq!(recorded[0].text, "Still fine");
        assert_eq!(recorded[0].image, None);
    }

    #[tokio::test]
    async fn test_blank_line_is_skipped() {
        let platform = MockPlatform::success("mock");
        let posts = platform.posts();
        let poster = Poster::new(Box::new(platform), false);
        let dir = tempdir().expect("tempdir");

        let dispatch = poster.publish(&line("   "), dir.path()).await.expect("publish");

        assert_eq!(dispatch, Dispatch::Skipped);
        assert!(posts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failure_propagates() {
        let platform = MockPlatform::failing(
            "mock",
            PlatformError::Network("connection refused".to_string()),
        );
        let poster = Poster::new(Box::new(platform), false);
        let dir = tempdir().expect("tempdir");

        let result = poster.publish(&line("Hello"), dir.path()).await;
        assert!(matches!(
            result,
            Err(ShowcastError::Platform(PlatformError::Network(_)))
        ));
    }

    #[tokio::test]
    async fn test_duplicate_treated_as_delivered() {
        let platform = MockPlatform::failing(
            "mock",
            PlatformError::Duplicate("same text".to_string()),
        );
        let poster = Poster::new(Box::new(platform), false);
        let dir = tempdir().expect("tempdir");

        let dispatch = poster.publish(&line("Hello"), dir.path()).await.expect("publish");
        assert_eq!(dispatch, Dispatch::Duplicate);
    }

    #[tokio::test]
    async fn test_dedup_space_inserted() {
        let platform = MockPlatform::success("mock");
        let posts = platform.posts();
        let poster = Poster::new(Box::new(platform), true);
        let dir = tempdir().expect("tempdir");

        poster.publish(&line("Hello"), dir.path()).await.expect("publish");

        let recorded = posts.lock().unwrap();
        let posted = &recorded[0].text;
        assert_eq!(posted.chars().count(), 6);
        assert_eq!(posted.replace(ZERO_WIDTH_SPACE, ""), "Hello");
    }

    #[test]
    fn test_insert_zero_width_space() {
        assert_eq!(insert_zero_width_space(""), "");

        let salted = insert_zero_width_space("abc");
        assert_eq!(salted.chars().count(), 4);
        assert_eq!(salted.replace(ZERO_WIDTH_SPACE, ""), "abc");

        // Multi-byte text must stay on char boundaries.
        let salted = insert_zero_width_space("héllo wörld");
        assert_eq!(salted.replace(ZERO_WIDTH_SPACE, ""), "héllo wörld");
    }
}
