//! Platform abstraction and implementations
//!
//! The posting loop only ever talks to the [`Platform`] trait; the concrete
//! client handles authentication, publishing, and content validation for
//! one social platform.

use std::path::Path;

use async_trait::async_trait;

use crate::error::Result;

pub mod oauth;
pub mod twitter;

// Mock platform is available for all builds (not just tests) to support
// integration tests.
pub mod mock;

/// Unified interface for one outbound social platform.
#[async_trait]
pub trait Platform: Send + Sync {
    /// Verify that the configured credentials are usable.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Authentication` when the platform rejects
    /// the credentials, or a network variant when it cannot be reached.
    async fn authenticate(&mut self) -> Result<()>;

    /// Publish a text-only post. Returns the platform-specific post ID.
    async fn post(&self, text: &str) -> Result<String>;

    /// Publish a post with one attached image. Returns the post ID.
    ///
    /// The caller is responsible for only passing paths that exist; an
    /// unreadable file surfaces as `PlatformError::Posting`.
    async fn post_with_image(&self, text: &str, image: &Path) -> Result<String>;

    /// Check content against platform rules (length and the like) without
    /// touching the network.
    fn validate_content(&self, text: &str) -> Result<()>;

    /// Lowercase platform identifier, e.g. "twitter".
    fn name(&self) -> &str;

    /// Maximum characters per post, if the platform has a hard limit.
    fn character_limit(&self) -> Option<usize>;
}
