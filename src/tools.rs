//! Locating the external ffmpeg and ffprobe executables.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use crate::error::Mov2Mp4Error;

/// Default transcoder program name.
pub const FFMPEG: &str = "ffmpeg";
/// Default probe program name.
pub const FFPROBE: &str = "ffprobe";

/// The pair of external programs a run depends on.
///
/// Each entry is either a bare program name, looked up on the search path,
/// or a path to an executable. [`ToolSet::verify`] turns both into the
/// absolute paths that were found, so the checked binaries are the ones
/// that get launched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolSet {
    pub ffmpeg: PathBuf,
    pub ffprobe: PathBuf,
}

impl Default for ToolSet {
    fn default() -> Self {
        Self::new(FFMPEG, FFPROBE)
    }
}

impl ToolSet {
    pub fn new<A: Into<PathBuf>, B: Into<PathBuf>>(ffmpeg: A, ffprobe: B) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
            ffprobe: ffprobe.into(),
        }
    }

    /// Resolve both tools on the process search path.
    ///
    /// Returns a `ToolSet` holding the resolved paths.
    ///
    /// # Errors
    ///
    /// Returns [`Mov2Mp4Error::ToolNotFound`] naming the first tool that is
    /// missing.
    pub fn verify(&self) -> Result<ToolSet, Mov2Mp4Error> {
        self.resolve_with(|program| which::which(program))
    }

    /// Like [`verify`](ToolSet::verify), but searches `paths` (a
    /// `PATH`-style list) instead of the process environment.
    pub fn verify_in<P: AsRef<OsStr>>(&self, paths: P, cwd: &Path) -> Result<ToolSet, Mov2Mp4Error> {
        self.resolve_with(|program| which::which_in(program, Some(paths.as_ref()), cwd))
    }

    fn resolve_with<F>(&self, lookup: F) -> Result<ToolSet, Mov2Mp4Error>
    where
        F: Fn(&Path) -> Result<PathBuf, which::Error>,
    {
        let resolve = |program: &Path| -> Result<PathBuf, Mov2Mp4Error> {
            let found = lookup(program).map_err(|error| Mov2Mp4Error::ToolNotFound {
                tool: program.display().to_string(),
                reason: error.to_string(),
            })?;
            log::debug!("Resolved {} to {}", program.display(), found.display());
            Ok(found)
        };

        Ok(ToolSet {
            ffmpeg: resolve(&self.ffmpeg)?,
            ffprobe: resolve(&self.ffprobe)?,
        })
    }
}
