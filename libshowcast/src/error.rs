//! Error types for Showcast

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ShowcastError>;

#[derive(Error, Debug)]
pub enum ShowcastError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Cursor error: {0}")]
    Cursor(#[from] CursorError),

    #[error("Archive error: {0}")]
    Archive(#[from] ArchiveError),

    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl ShowcastError {
    /// Returns the appropriate exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            ShowcastError::InvalidInput(_) => 3,
            ShowcastError::Platform(PlatformError::Authentication(_)) => 2,
            ShowcastError::Platform(_) => 1,
            ShowcastError::Config(_) => 1,
            ShowcastError::Cursor(_) => 1,
            ShowcastError::Archive(_) => 1,
        }
    }

    /// True when the error marks the normal end of the archive rather than a failure.
    pub fn is_out_of_range(&self) -> bool {
        matches!(
            self,
            ShowcastError::Archive(ArchiveError::OutOfRange { .. })
        )
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Missing required environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

#[derive(Error, Debug)]
pub enum CursorError {
    #[error("State file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Malformed state file {}: {reason}", .path.display())]
    Malformed { path: PathBuf, reason: String },

    #[error("Failed to read state file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write state file {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("Position out of range: season {season}, episode {episode}")]
    OutOfRange { season: u32, episode: u32 },

    #[error("Failed to read transcript {}: {source}", .path.display())]
    TranscriptRead {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Error, Debug, Clone)]
pub enum PlatformError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Content validation failed: {0}")]
    Validation(String),

    #[error("Posting failed: {0}")]
    Posting(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    #[error("Duplicate content rejected: {0}")]
    Duplicate(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_invalid_input() {
        let error = ShowcastError::InvalidInput("bad arguments".to_string());
        assert_eq!(error.exit_code(), 3);
    }

    #[test]
    fn test_exit_code_authentication_error() {
        let error = ShowcastError::Platform(PlatformError::Authentication("bad token".to_string()));
        assert_eq!(error.exit_code(), 2);
    }

    #[test]
    fn test_exit_code_other_platform_errors() {
        for platform_error in [
            PlatformError::Validation("too long".to_string()),
            PlatformError::Posting("rejected".to_string()),
            PlatformError::Network("timeout".to_string()),
            PlatformError::RateLimit("slow down".to_string()),
            PlatformError::Duplicate("already posted".to_string()),
        ] {
            assert_eq!(ShowcastError::Platform(platform_error).exit_code(), 1);
        }
    }

    #[test]
    fn test_exit_code_config_error() {
        let error = ShowcastError::Config(ConfigError::MissingField("archive.root".to_string()));
        assert_eq!(error.exit_code(), 1);
    }

    #[test]
    fn test_out_of_range_detection() {
        let out_of_range = ShowcastError::Archive(ArchiveError::OutOfRange {
            season: 10,
            episode: 1,
        });
        assert!(out_of_range.is_out_of_range());

        let other = ShowcastError::InvalidInput("nope".to_string());
        assert!(!other.is_out_of_range());
    }

    #[test]
    fn test_error_message_formatting() {
        let error = ShowcastError::Config(ConfigError::MissingEnv("API_KEY"));
        assert_eq!(
            format!("{}", error),
            "Configuration error: Missing required environment variable: API_KEY"
        );

        let error = ShowcastError::Archive(ArchiveError::OutOfRange {
            season: 10,
            episode: 2,
        });
        assert_eq!(
            format!("{}", error),
            "Archive error: Position out of range: season 10, episode 2"
        );
    }

    #[test]
    fn test_cursor_error_includes_path() {
        let error = CursorError::Malformed {
            path: PathBuf::from("/tmp/cursor"),
            reason: "expected three integers".to_string(),
        };
        let message = format!("{}", error);
        assert!(message.contains("/tmp/cursor"));
        assert!(message.contains("expected three integers"));
    }

    #[test]
    fn test_platform_error_clone() {
        let original = PlatformError::Network("connection refused".to_string());
        let cloned = original.clone();
        assert_eq!(format!("{}", original), format!("{}", cloned));
    }
}
