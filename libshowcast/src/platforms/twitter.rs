//! X/Twitter platform implementation
//!
//! Publishes through the v2 tweet-creation endpoint; images go through the
//! v1.1 media upload endpoint first. Both calls are signed with OAuth 1.0a
//! user context.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::credentials::TwitterCredentials;
use crate::error::{PlatformError, Result};
use crate::platforms::{oauth, Platform};

const TWEETS_URL: &str = "https://api.twitter.com/2/tweets";
const MEDIA_UPLOAD_URL: &str = "https://upload.twitter.com/1.1/media/upload.json";
const VERIFY_URL: &str = "https://api.twitter.com/1.1/account/verify_credentials.json";

/// Hard limit for standard accounts.
const CHARACTER_LIMIT: usize = 280;

/// A hung publish call must not block the loop indefinitely.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct TwitterClient {
    http: reqwest::Client,
    credentials: TwitterCredentials,
}

#[derive(Debug, Deserialize)]
struct TweetResponse {
    data: TweetData,
}

#[derive(Debug, Deserialize)]
struct TweetData {
    id: String,
}

#[derive(Debug, Deserialize)]
struct MediaUploadResponse {
    media_id_string: String,
}

impl TwitterClient {
    pub fn new(credentials: TwitterCredentials) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| PlatformError::Network(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { http, credentials })
    }

    async fn upload_media(&self, image: &Path) -> Result<String> {
        let bytes = tokio::fs::read(image).await.map_err(|e| {
            PlatformError::Posting(format!("Failed to read image {}: {}", image.display(), e))
        })?;
        debug!(image = %image.display(), size = bytes.len(), "uploading media");

        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name("image.jpg")
            .mime_str("image/jpeg")
            .map_err(|e| PlatformError::Posting(format!("Failed to build upload body: {}", e)))?;
        let form = reqwest::multipart::Form::new().part("media", part);

        let auth = oauth::authorization_header(&self.credentials, "POST", MEDIA_UPLOAD_URL, &[])?;
        let response = self
            .http
            .post(MEDIA_UPLOAD_URL)
            .header(AUTHORIZATION, auth)
            .multipart(form)
            .send()
            .await
            .map_err(|e| map_transport_error(e, "media upload"))?;
        let response = check_status(response, "media upload").await?;

        let parsed: MediaUploadResponse = response.json().await.map_err(|e| {
            PlatformError::Posting(format!("Media upload response parse error: {}", e))
        })?;
        Ok(parsed.media_id_string)
    }

    async fn create_tweet(&self, body: serde_json::Value, context: &str) -> Result<String> {
        let auth = oauth::authorization_header(&self.credentials, "POST", TWEETS_URL, &[])?;
        let response = self
            .http
            .post(TWEETS_URL)
            .header(AUTHORIZATION, auth)
            .json(&body)
            .send()
            .await
            .map_err(|e| map_transport_error(e, context))?;
        let response = check_status(response, context).await?;

        let parsed: TweetResponse = response.json().await.map_err(|e| {
            PlatformError::Posting(format!("Tweet response parse error ({}): {}", context, e))
        })?;
        debug!(id = %parsed.data.id, "tweet created");
        Ok(parsed.data.id)
    }
}

#[async_trait]
impl Platform for TwitterClient {
    async fn authenticate(&mut self) -> Result<()> {
        let auth = oauth::authorization_header(&self.credentials, "GET", VERIFY_URL, &[])?;
        let response = self
            .http
            .get(VERIFY_URL)
            .header(AUTHORIZATION, auth)
            .send()
            .await
            .map_err(|e| map_transport_error(e, "verify credentials"))?;
        check_status(response, "verify credentials").await?;
        Ok(())
    }

    async fn post(&self, text: &str) -> Result<String> {
        self.validate_content(text)?;
        self.create_tweet(json!({ "text": text }), "post tweet").await
    }

    async fn post_with_image(&self, text: &str, image: &Path) -> Result<String> {
        self.validate_content(text)?;
        let media_id = self.upload_media(image).await?;
        self.create_tweet(
            json!({ "text": text, "media": { "media_ids": [media_id] } }),
            "post tweet with media",
        )
        .await
    }

    fn validate_content(&self, text: &str) -> Result<()> {
        let char_count = text.chars().count();
        if char_count > CHARACTER_LIMIT {
            return Err(PlatformError::Validation(format!(
                "Content exceeds the {} character limit (current: {} characters)",
                CHARACTER_LIMIT, char_count
            ))
            .into());
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "twitter"
    }

    fn character_limit(&self) -> Option<usize> {
        Some(CHARACTER_LIMIT)
    }
}

async fn check_status(response: reqwest::Response, context: &str) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(map_status_error(status, &body, context).into())
}

/// Map an HTTP error response to the tagged failure taxonomy.
fn map_status_error(status: StatusCode, body: &str, context: &str) -> PlatformError {
    match status.as_u16() {
        401 => PlatformError::Authentication(format!(
            "Twitter rejected the credentials ({}): {}",
            context, body
        )),
        403 if body.to_lowercase().contains("duplicate") => PlatformError::Duplicate(format!(
            "Twitter refused the content as a duplicate ({}): {}",
            context, body
        )),
        403 => PlatformError::Authentication(format!(
            "Twitter denied the request ({}): {}. Check that the app has write permission.",
            context, body
        )),
        400 | 422 => PlatformError::Validation(format!(
            "Twitter rejected the request ({}): {}",
            context, body
        )),
        429 => PlatformError::RateLimit(format!(
            "Twitter rate limit hit ({}): {}",
            context, body
        )),
        500..=599 => PlatformError::Network(format!(
            "Twitter server error {} ({}): {}",
            status, context, body
        )),
        _ => PlatformError::Posting(format!(
            "Twitter returned {} ({}): {}",
            status, context, body
        )),
    }
}

fn map_transport_error(error: reqwest::Error, context: &str) -> PlatformError {
    if error.is_timeout() {
        PlatformError::Network(format!("Request timed out ({}): {}", context, error))
    } else {
        PlatformError::Network(format!("Request failed ({}): {}", context, error))
    }
}
