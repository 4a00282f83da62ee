//! The posting loop.
//!
//! One `step` advances the cursor to the next line (rolling over episodes
//! and seasons per the show shape), locates and parses it, and dispatches
//! it. The loop around it sleeps the tweet interval after a success and the
//! recovery interval after a failure, retrying the same position without
//! advancing. At-least-once delivery, with no backoff curve.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::archive::{ScriptArchive, Transcript};
use crate::cursor::{Cursor, CursorStore, ShowShape};
use crate::error::{Result, ShowcastError};
use crate::poster::{Dispatch, Poster};
use crate::transcript::TranscriptLine;

/// Outcome of a single loop iteration.
#[derive(Debug)]
pub enum Step {
    /// A line was consumed; the cursor advanced to it. `paced` is false for
    /// blank lines, which do not earn a tweet-interval pause.
    Posted { cursor: Cursor, paced: bool },
    /// Dispatch failed; the cursor did not move.
    Failed(ShowcastError),
    /// The show shape is exhausted. The only normal way out.
    Finished,
}

struct Located {
    cursor: Cursor,
    raw: String,
    image_dir: PathBuf,
}

pub struct Runner {
    archive: ScriptArchive,
    shape: ShowShape,
    store: CursorStore,
    poster: Poster,
    cursor: Cursor,
    tweet_interval: Duration,
    recovery_interval: Duration,
    shutdown: Arc<AtomicBool>,
}

impl Runner {
    pub fn new(
        archive: ScriptArchive,
        shape: ShowShape,
        store: CursorStore,
        poster: Poster,
        cursor: Cursor,
        tweet_interval: Duration,
        recovery_interval: Duration,
    ) -> Self {
        Self {
            archive,
            shape,
            store,
            poster,
            cursor,
            tweet_interval,
            recovery_interval,
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Share a shutdown flag; the loop exits promptly once it is set.
    pub fn with_shutdown(mut self, shutdown: Arc<AtomicBool>) -> Self {
        self.shutdown = shutdown;
        self
    }

    /// Last completed position.
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Find the line after the current cursor.
    ///
    /// Rollover per the advancement rule: past the end of the transcript
    /// means the next episode from its first line; past the season's
    /// episode count means the next season. `None` once the position leaves
    /// the show shape.
    fn locate_next(&self) -> Result<Option<Located>> {
        let mut season = self.cursor.season;
        let mut episode = self.cursor.episode;
        let mut next = self.cursor.line + 1;

        loop {
            let paths = match self.archive.resolve(season, episode, &self.shape) {
                Ok(paths) => paths,
                Err(e) if e.is_out_of_range() => return Ok(None),
                Err(e) => return Err(e),
            };

            let transcript = Transcript::read(&paths.transcript)?;
            if let Some(raw) = transcript.line(next as usize) {
                return Ok(Some(Located {
                    cursor: Cursor::new(season, episode, next),
                    raw: raw.to_string(),
                    image_dir: paths.image_dir,
                }));
            }

            // Episode exhausted.
            if episode >= self.shape.episodes_in(season).unwrap_or(0) {
                season += 1;
                episode = 1;
            } else {
                episode += 1;
            }
            next = 0;
        }
    }

    /// Run a single locate, parse, dispatch, persist iteration.
    pub async fn step(&mut self) -> Step {
        let located = match self.locate_next() {
            Ok(Some(located)) => located,
            Ok(None) => return Step::Finished,
            Err(e) => return Step::Failed(e),
        };

        let line = TranscriptLine::parse(&located.raw);
        debug!(position = %located.cursor, "dispatching");

        match self.poster.publish(&line, &located.image_dir).await {
            Ok(dispatch) => {
                self.cursor = located.cursor;
                if let Err(e) = self.store.save(&self.cursor) {
                    // Losing the cursor risks duplicate posts after a
                    // restart; keep going, but say so loudly.
                    error!(error = %e, "failed to persist cursor");
                }

                let paced = match dispatch {
                    Dispatch::Posted { post_id, with_image } => {
                        info!(
                            position = %self.cursor,
                            post_id = %post_id,
                            with_image,
                            "posted"
                        );
                        true
                    }
                    Dispatch::Duplicate => true,
                    Dispatch::Skipped => {
                        debug!(position = %self.cursor, "blank line, advancing");
                        false
                    }
                };
                Step::Posted {
                    cursor: self.cursor,
                    paced,
                }
            }
            Err(e) => Step::Failed(e),
        }
    }

    /// Run until the archive is exhausted or shutdown is requested.
    pub async fn run(&mut self) -> Result<()> {
        info!(
            platform = self.poster.platform_name(),
            cursor = %self.cursor,
            "runner starting"
        );

        loop {
            if self.shutdown.load(Ordering::Relaxed) {
                info!("shutdown requested, stopping");
                return Ok(());
            }

            match self.step().await {
                Step::Posted { paced, .. } => {
                    if paced {
                        self.pause(self.tweet_interval).await;
                    }
                }
                Step::Failed(e) => {
                    warn!(
                        error = %e,
                        retry_in_secs = self.recovery_interval.as_secs(),
                        "dispatch failed, will retry at the same position"
                    );
                    self.pause(self.recovery_interval).await;
                }
                Step::Finished => {
                    info!("show shape exhausted, nothing left to post");
                    return Ok(());
                }
            }
        }
    }

    /// Process a single line, then return. Failures are reported instead of
    /// retried.
    pub async fn run_once(&mut self) -> Result<()> {
        match self.step().await {
            Step::Posted { .. } => Ok(()),
            Step::Finished => {
                info!("show shape exhausted, nothing left to post");
                Ok(())
            }
            Step::Failed(e) => Err(e),
        }
    }

    /// Sleep in one-second slices so a shutdown signal interrupts promptly.
    async fn pause(&self, duration: Duration) {
        let mut remaining = duration.as_secs();
        while remaining > 0 {
            if self.shutdown.load(Ordering::Relaxed) {
                return;
            }
            sleep(Duration::from_secs(1)).await;
            remaining -= 1;
        }
    }
}
