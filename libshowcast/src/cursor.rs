//! Playback position and its on-disk store.
//!
//! The cursor always records the last *completed* line; `line == -1` means
//! nothing has been posted yet in the episode. The state file is a single
//! line of three space-separated integers so an operator can correct it
//! with any text editor.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{CursorError, Result};

/// The triple (season, episode, line) marking the current playback position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    /// 1-based season number.
    pub season: u32,
    /// 1-based episode number within the season.
    pub episode: u32,
    /// 0-based index of the last completed line; -1 before the first line.
    pub line: i64,
}

impl Cursor {
    pub fn new(season: u32, episode: u32, line: i64) -> Self {
        Self {
            season,
            episode,
            line,
        }
    }

    /// Position before the first line of an episode.
    pub fn start_of(season: u32, episode: u32) -> Self {
        Self::new(season, episode, -1)
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "season {} episode {} line {}",
            self.season, self.episode, self.line
        )
    }
}

/// Per-season episode counts, in season order. Immutable for the process
/// lifetime; used only for bounds checks during rollover.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowShape(Vec<u32>);

impl ShowShape {
    pub fn new(seasons: Vec<u32>) -> Self {
        Self(seasons)
    }

    pub fn season_count(&self) -> u32 {
        self.0.len() as u32
    }

    /// Episode count of a 1-based season, or `None` when the season is out
    /// of range.
    pub fn episodes_in(&self, season: u32) -> Option<u32> {
        if season == 0 {
            return None;
        }
        self.0.get(season as usize - 1).copied()
    }

    pub fn in_bounds(&self, season: u32, episode: u32) -> bool {
        match self.episodes_in(season) {
            Some(count) => episode >= 1 && episode <= count,
            None => false,
        }
    }
}

/// Loads and saves the cursor state file.
pub struct CursorStore {
    path: PathBuf,
}

impl CursorStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted cursor.
    ///
    /// An absent file is [`CursorError::NotFound`]; anything that does not
    /// hold exactly three integers in range is [`CursorError::Malformed`].
    /// The caller decides the fallback.
    pub fn load(&self) -> Result<Cursor> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                return Err(CursorError::NotFound(self.path.clone()).into());
            }
            Err(source) => {
                return Err(CursorError::Read {
                    path: self.path.clone(),
                    source,
                }
                .into());
            }
        };

        self.parse(&content)
    }

    fn parse(&self, content: &str) -> Result<Cursor> {
        let malformed = |reason: String| CursorError::Malformed {
            path: self.path.clone(),
            reason,
        };

        let fields: Vec<&str> = content.split_whitespace().collect();
        if fields.len() != 3 {
            return Err(malformed(format!(
                "expected three integers (season episode line), found {} field(s)",
                fields.len()
            ))
            .into());
        }

        let season: u32 = fields[0]
            .parse()
            .map_err(|_| malformed(format!("season is not an integer: '{}'", fields[0])))?;
        let episode: u32 = fields[1]
            .parse()
            .map_err(|_| malformed(format!("episode is not an integer: '{}'", fields[1])))?;
        let line: i64 = fields[2]
            .parse()
            .map_err(|_| malformed(format!("line is not an integer: '{}'", fields[2])))?;

        if season < 1 || episode < 1 {
            return Err(malformed("season and episode are 1-based".to_string()).into());
        }
        if line < -1 {
            return Err(malformed(format!("line must be >= -1, found {}", line)).into());
        }

        Ok(Cursor::new(season, episode, line))
    }

    /// Persist the cursor with a full rewrite.
    ///
    /// Writes a sibling temp file first and renames it over the state file,
    /// so a crash mid-write cannot leave a truncated cursor behind.
    pub fn save(&self, cursor: &Cursor) -> Result<()> {
        let write_error = |source: std::io::Error| CursorError::Write {
            path: self.path.clone(),
            source,
        };

        let content = format!("{} {} {}\n", cursor.season, cursor.episode, cursor.line);
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, content).map_err(write_error)?;
        std::fs::rename(&tmp, &self.path).map_err(write_error)?;
        Ok(())
    }
}
