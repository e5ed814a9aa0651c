//! Error types for the `mov2mp4` crate.
//!
//! This module defines [`Mov2Mp4Error`], the unified error type returned by
//! all fallible operations in the crate. Variants carry the program, tool, or
//! token involved so the CLI can report them without extra context.

use std::io::Error as IoError;

use thiserror::Error;

/// The unified error type for all `mov2mp4` operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Mov2Mp4Error {
    /// The compression level token is not a prefix of any known level.
    #[error("invalid compression level: {0}")]
    InvalidCompressionLevel(String),

    /// The compression level token is a prefix of more than one level.
    #[error("ambiguous compression level: {input} (could be {})", .candidates.join(", "))]
    AmbiguousCompressionLevel {
        /// The token as supplied on the command line.
        input: String,
        /// Every level name the token is a prefix of.
        candidates: Vec<&'static str>,
    },

    /// A required external executable could not be located.
    #[error("{tool} not found in path: {reason}")]
    ToolNotFound {
        /// Program name or path that was looked up.
        tool: String,
        /// Why the lookup failed.
        reason: String,
    },

    /// An external process could not be started at all.
    #[error("failed to start {program}: {source}")]
    SpawnFailed {
        /// Program that was being launched.
        program: String,
        /// Underlying OS error.
        #[source]
        source: IoError,
    },

    /// The duration probe ran but did not yield a usable duration.
    #[error("cannot get video duration: {0}")]
    ProbeFailed(String),

    /// The transcoder exited unsuccessfully.
    ///
    /// `code` is `None` when the child was terminated by a signal.
    #[error("transcode failed ({})", describe_exit(.code))]
    TranscodeFailed {
        /// Exit code reported by the child, if any.
        code: Option<i32>,
    },
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit status {code}"),
        None => "terminated by signal".to_string(),
    }
}

impl Mov2Mp4Error {
    /// Process exit status the CLI should terminate with for this error.
    ///
    /// A failed transcode forwards the child's own non-zero code; everything
    /// else maps to `1`.
    pub fn exit_code(&self) -> i32 {
        match self {
            Mov2Mp4Error::TranscodeFailed { code: Some(code) } if *code != 0 => *code,
            _ => 1,
        }
    }
}
