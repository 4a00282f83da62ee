//! Mock platform implementation for testing
//!
//! A configurable platform that records what would have been published,
//! so the poster and runner can be exercised without credentials or
//! network access.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::{PlatformError, Result};
use crate::platforms::Platform;

/// One recorded publish call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockPost {
    pub text: String,
    pub image: Option<PathBuf>,
}

/// Mock platform for testing
pub struct MockPlatform {
    name: String,
    /// Number of initial post calls that fail before the mock starts
    /// succeeding. `usize::MAX` fails forever.
    fail_first: usize,
    post_error: PlatformError,
    character_limit: Option<usize>,
    post_calls: Arc<Mutex<usize>>,
    posted: Arc<Mutex<Vec<MockPost>>>,
}

impl MockPlatform {
    /// A platform on which every publish succeeds.
    pub fn success(name: &str) -> Self {
        Self {
            name: name.to_string(),
            fail_first: 0,
            post_error: PlatformError::Posting("mock posting failed".to_string()),
            character_limit: None,
            post_calls: Arc::new(Mutex::new(0)),
            posted: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A platform on which every publish fails with `error`.
    pub fn failing(name: &str, error: PlatformError) -> Self {
        Self {
            fail_first: usize::MAX,
            post_error: error,
            ..Self::success(name)
        }
    }

    /// A platform that fails the first `failures` publishes, then succeeds.
    pub fn flaky(name: &str, failures: usize, error: PlatformError) -> Self {
        Self {
            fail_first: failures,
            post_error: error,
            ..Self::success(name)
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.character_limit = Some(limit);
        self
    }

    /// Handle onto the recorded posts; stays valid after the platform is
    /// boxed and handed to a poster.
    pub fn posts(&self) -> Arc<Mutex<Vec<MockPost>>> {
        self.posted.clone()
    }

    pub fn post_call_count(&self) -> usize {
        *self.post_calls.lock().unwrap()
    }

    fn record(&self, text: &str, image: Option<&Path>) -> Result<String> {
        let mut calls = self.post_calls.lock().unwrap();
        *calls += 1;
        if *calls <= self.fail_first {
            return Err(self.post_error.clone().into());
        }

        let mut posted = self.posted.lock().unwrap();
        posted.push(MockPost {
            text: text.to_string(),
            image: image.map(Path::to_path_buf),
        });
        Ok(format!("{}:mock-{}", self.name, posted.len()))
    }
}

#[async_trait]
impl Platform for MockPlatform {
    async fn authenticate(&mut self) -> Result<()> {
        Ok(())
    }

    async fn post(&self, text: &str) -> Result<String> {
        self.record(text, None)
    }

    async fn post_with_image(&self, text: &str, image: &Path) -> Result<String> {
        self.record(text, Some(image))
    }

    fn validate_content(&self, text: &str) -> Result<()> {
        if let Some(limit) = self.character_limit {
            if text.chars().count() > limit {
                return Err(PlatformError::Validation(format!(
                    "Content exceeds {} character limit (got {} characters)",
                    limit,
                    text.chars().count()
                ))
                .into());
            }
        }
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn character_limit(&self) -> Option<usize> {
        self.character_limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_records_posts() {
        let platform = MockPlatform::success("test");
        let posts = platform.posts();

        let id = platform.post("First line").await.expect("post");
        assert_eq!(id, "test:mock-1");
        platform
            .post_with_image("Second line", Path::new("/img/3.jpg"))
            .await
            .expect("post");

        let recorded = posts.lock().unwrap();
        assert_eq!(recorded.len(), 2);
        assert_eq!(recorded[0].text, "First line");
        assert_eq!(recorded[0].image, None);
        assert_eq!(recorded[1].image, Some(PathBuf::from("/img/3.jpg")));
    }

    #[tokio::test]
    async fn test_mock_failing() {
        let platform = MockPlatform::failing(
            "test",
            PlatformError::Network("connection refused".to_string()),
        );

        let result = platform.post("anything").await;
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("connection refused"));
        assert_eq!(platform.post_call_count(), 1);
        assert!(platform.posts().lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_mock_flaky_recovers() {
        let platform = MockPlatform::flaky(
            "test",
            1,
            PlatformError::RateLimit("slow down".to_string()),
        );

        assert!(platform.post("again").await.is_err());
        assert!(platform.post("again").await.is_ok());
        assert_eq!(platform.post_call_count(), 2);
        assert_eq!(platform.posts().lock().unwrap().len(), 1);
    }

    #[test]
    fn test_mock_character_limit() {
        let platform = MockPlatform::success("test").with_limit(10);

        assert!(platform.validate_content("short").is_ok());
        assert!(platform.validate_content("way past the limit").is_err());
    }
}
