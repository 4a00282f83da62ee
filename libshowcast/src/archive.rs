//! Script archive layout and transcript reading.
//!
//! The archive is an external, read-only tree keyed by season and episode:
//! `<root>/<season>/<episode>/<episode>.txt` holds the transcript and
//! `<root>/<season>/<episode>/img/` the numbered image assets.

use std::path::{Path, PathBuf};

use crate::cursor::ShowShape;
use crate::error::{ArchiveError, Result};

/// Resolved locations for one episode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodePaths {
    pub transcript: PathBuf,
    pub image_dir: PathBuf,
}

/// Locates episode files under a configured root.
pub struct ScriptArchive {
    root: PathBuf,
}

impl ScriptArchive {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve the transcript and image directory for a position.
    ///
    /// Purely a path join plus a bounds check against the show shape; file
    /// existence is deferred to read time.
    pub fn resolve(&self, season: u32, episode: u32, shape: &ShowShape) -> Result<EpisodePaths> {
        if !shape.in_bounds(season, episode) {
            return Err(ArchiveError::OutOfRange { season, episode }.into());
        }

        let episode_dir = self
            .root
            .join(season.to_string())
            .join(episode.to_string());
        Ok(EpisodePaths {
            transcript: episode_dir.join(format!("{}.txt", episode)),
            image_dir: episode_dir.join("img"),
        })
    }
}

/// The ordered lines of one episode's transcript file.
///
/// Every line of the file is kept, blank separators included, so that line
/// index N is literally the N-th line of the file. Operators rely on that
/// when seeking by hand.
#[derive(Debug, Clone)]
pub struct Transcript {
    lines: Vec<String>,
}

impl Transcript {
    pub fn read(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|source| ArchiveError::TranscriptRead {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self {
            lines: content.lines().map(str::to_owned).collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }
}
