//! Showcast - posts a show's transcripts, one line at a time
//!
//! This library provides the core functionality for walking a season/episode
//! script archive and publishing it line by line on a fixed schedule,
//! persisting the playback position between runs.

pub mod archive;
pub mod config;
pub mod credentials;
pub mod cursor;
pub mod error;
pub mod platforms;
pub mod poster;
pub mod runner;
pub mod transcript;

// Re-export commonly used types
pub use archive::{EpisodePaths, ScriptArchive, Transcript};
pub use config::Config;
pub use credentials::TwitterCredentials;
pub use cursor::{Cursor, CursorStore, ShowShape};
pub use error::{Result, ShowcastError};
pub use poster::{Dispatch, Poster};
pub use runner::{Runner, Step};
pub use transcript::TranscriptLine;
