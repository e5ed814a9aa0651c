//! Run configuration.
//!
//! [`RunConfig`] is a builder that carries the input and output paths, the
//! bitrate [`CompressionLevel`], and the trim amounts through probing and
//! command construction without widening every function signature.
//!
//! # Example
//!
//! ```
//! use mov2mp4::{CompressionLevel, RunConfig};
//!
//! let config = RunConfig::new("screencap.mov")
//!     .with_compression(CompressionLevel::Med)
//!     .with_skip_seconds(5);
//!
//! assert_eq!(config.output().to_str(), Some("screencap.mp4"));
//! assert!(config.wants_trim());
//! ```

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::Mov2Mp4Error;

/// Extension of every file this crate produces.
pub const OUTPUT_EXTENSION: &str = "mp4";

/// Suffix inserted before the extension when the input is already an `.mp4`.
const DISAMBIGUATION_SUFFIX: &str = "_1";

/// Target video bitrate cap selection.
///
/// Parsed from the command line by case-insensitive prefix, so `l`, `lo` and
/// `LOW` all select [`CompressionLevel::Low`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CompressionLevel {
    /// No bitrate cap; the encoder picks. This is the default.
    #[default]
    None,
    /// Cap video at 1000 kbps.
    Low,
    /// Cap video at 500 kbps.
    Med,
    /// Cap video at 250 kbps.
    High,
}

impl CompressionLevel {
    /// Every level, in declaration order.
    pub const ALL: [CompressionLevel; 4] = [
        CompressionLevel::None,
        CompressionLevel::Low,
        CompressionLevel::Med,
        CompressionLevel::High,
    ];

    /// Canonical lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            CompressionLevel::None => "none",
            CompressionLevel::Low => "low",
            CompressionLevel::Med => "med",
            CompressionLevel::High => "high",
        }
    }

    /// Video bitrate argument for this level, or `None` when no cap applies.
    pub fn video_bitrate(self) -> Option<&'static str> {
        match self {
            CompressionLevel::None => None,
            CompressionLevel::Low => Some("1000k"),
            CompressionLevel::Med => Some("500k"),
            CompressionLevel::High => Some("250k"),
        }
    }

    /// Resolve a possibly abbreviated level name.
    ///
    /// An exact name always wins. Otherwise the token must be a prefix of
    /// exactly one name. The empty token resolves to the first declared level
    /// ([`CompressionLevel::None`]).
    ///
    /// # Errors
    ///
    /// - [`Mov2Mp4Error::InvalidCompressionLevel`] if no name matches.
    /// - [`Mov2Mp4Error::AmbiguousCompressionLevel`] if several names match.
    pub fn parse_prefix(token: &str) -> Result<Self, Mov2Mp4Error> {
        let lowered = token.trim().to_ascii_lowercase();
        if lowered.is_empty() {
            return Ok(CompressionLevel::None);
        }

        if let Some(level) = Self::ALL.iter().find(|level| level.name() == lowered) {
            return Ok(*level);
        }

        let matches: Vec<CompressionLevel> = Self::ALL
            .iter()
            .copied()
            .filter(|level| level.name().starts_with(&lowered))
            .collect();

        match matches.as_slice() {
            [level] => Ok(*level),
            [] => Err(Mov2Mp4Error::InvalidCompressionLevel(lowered)),
            _ => Err(Mov2Mp4Error::AmbiguousCompressionLevel {
                input: lowered,
                candidates: matches.iter().map(|level| level.name()).collect(),
            }),
        }
    }
}

impl FromStr for CompressionLevel {
    type Err = Mov2Mp4Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_prefix(s)
    }
}

impl Display for CompressionLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.name())
    }
}

/// Derive the default output path for `input`.
///
/// The final extension is replaced with `.mp4` (or appended when the file has
/// none). When the input already carries an `.mp4` extension, compared
/// ASCII case-insensitively, `_1` is inserted before the extension so the
/// output never overwrites the source.
///
/// ```
/// use std::path::Path;
///
/// use mov2mp4::derive_output_path;
///
/// assert_eq!(derive_output_path(Path::new("cap.mov")), Path::new("cap.mp4"));
/// assert_eq!(derive_output_path(Path::new("cap.mp4")), Path::new("cap_1.mp4"));
/// ```
pub fn derive_output_path(input: &Path) -> PathBuf {
    let already_mp4 = input
        .extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| extension.eq_ignore_ascii_case(OUTPUT_EXTENSION));

    if !already_mp4 {
        return input.with_extension(OUTPUT_EXTENSION);
    }

    let mut file_name = input.file_stem().unwrap_or_default().to_os_string();
    file_name.push(DISAMBIGUATION_SUFFIX);
    file_name.push(".");
    file_name.push(OUTPUT_EXTENSION);
    input.with_file_name(file_name)
}

/// Everything a single run needs.
///
/// Created from parsed flags and not mutated after it is handed to a
/// [`Transcoder`](crate::Transcoder).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    input: PathBuf,
    output: PathBuf,
    compression: CompressionLevel,
    skip_seconds: u64,
    truncate_seconds: u64,
}

impl RunConfig {
    /// Create a configuration for `input` with the derived output path, no
    /// bitrate cap, and no trimming.
    pub fn new<P: Into<PathBuf>>(input: P) -> Self {
        let input = input.into();
        let output = derive_output_path(&input);
        Self {
            input,
            output,
            compression: CompressionLevel::None,
            skip_seconds: 0,
            truncate_seconds: 0,
        }
    }

    /// Override the output path.
    #[must_use]
    pub fn with_output<P: Into<PathBuf>>(mut self, output: P) -> Self {
        self.output = output.into();
        self
    }

    /// Set the bitrate compression level.
    #[must_use]
    pub fn with_compression(mut self, level: CompressionLevel) -> Self {
        self.compression = level;
        self
    }

    /// Seconds to cut from the start of the video.
    #[must_use]
    pub fn with_skip_seconds(mut self, seconds: u64) -> Self {
        self.skip_seconds = seconds;
        self
    }

    /// Seconds to cut from the end of the video.
    #[must_use]
    pub fn with_truncate_seconds(mut self, seconds: u64) -> Self {
        self.truncate_seconds = seconds;
        self
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    pub fn compression(&self) -> CompressionLevel {
        self.compression
    }

    pub fn skip_seconds(&self) -> u64 {
        self.skip_seconds
    }

    pub fn truncate_seconds(&self) -> u64 {
        self.truncate_seconds
    }

    /// Returns `true` if either trim amount is non-zero, which is also the
    /// condition for probing the input's duration.
    pub fn wants_trim(&self) -> bool {
        self.skip_seconds > 0 || self.truncate_seconds > 0
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::{CompressionLevel, RunConfig, derive_output_path};
    use crate::error::Mov2Mp4Error;

    #[test]
    fn prefixes_resolve_to_levels() {
        assert_eq!(CompressionLevel::parse_prefix("l").unwrap(), CompressionLevel::Low);
        assert_eq!(CompressionLevel::parse_prefix("m").unwrap(), CompressionLevel::Med);
        assert_eq!(CompressionLevel::parse_prefix("h").unwrap(), CompressionLevel::High);
        assert_eq!(CompressionLevel::parse_prefix("n").unwrap(), CompressionLevel::None);
        assert_eq!(CompressionLevel::parse_prefix("").unwrap(), CompressionLevel::None);
    }

    #[test]
    fn prefixes_are_case_insensitive() {
        assert_eq!(CompressionLevel::parse_prefix("HIGH").unwrap(), CompressionLevel::High);
        assert_eq!(CompressionLevel::parse_prefix("Me").unwrap(), CompressionLevel::Med);
    }

    #[test]
    fn unknown_prefix_is_rejected() {
        let error = CompressionLevel::parse_prefix("ultra").unwrap_err();
        assert!(matches!(error, Mov2Mp4Error::InvalidCompressionLevel(ref token) if token == "ultra"));

        // Longer than the name it starts like.
        assert!(CompressionLevel::parse_prefix("lowest").is_err());
    }

    #[test]
    fn bitrate_table() {
        assert_eq!(CompressionLevel::None.video_bitrate(), None);
        assert_eq!(CompressionLevel::Low.video_bitrate(), Some("1000k"));
        assert_eq!(CompressionLevel::Med.video_bitrate(), Some("500k"));
        assert_eq!(CompressionLevel::High.video_bitrate(), Some("250k"));
    }

    #[test]
    fn output_replaces_final_extension() {
        assert_eq!(derive_output_path(Path::new("a/b/cap.mov")), Path::new("a/b/cap.mp4"));
        assert_eq!(derive_output_path(Path::new("cap.final.mkv")), Path::new("cap.final.mp4"));
        assert_eq!(derive_output_path(Path::new("cap")), Path::new("cap.mp4"));
    }

    #[test]
    fn output_ignores_dots_in_directories() {
        assert_eq!(
            derive_output_path(Path::new("v1.2/recording")),
            Path::new("v1.2/recording.mp4"),
        );
    }

    #[test]
    fn output_disambiguates_existing_mp4() {
        assert_eq!(derive_output_path(Path::new("dir/cap.mp4")), Path::new("dir/cap_1.mp4"));
        assert_eq!(derive_output_path(Path::new("cap.MP4")), Path::new("cap_1.mp4"));
    }

    #[cfg(unix)]
    #[test]
    fn output_keeps_non_utf8_stem_bytes() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let input = Path::new(OsStr::from_bytes(b"cap\xff.MP4"));
        let output = derive_output_path(input);
        assert_eq!(output.as_os_str().as_bytes(), b"cap\xff_1.mp4");

        let input = Path::new(OsStr::from_bytes(b"cap\xff.mov"));
        assert_eq!(derive_output_path(input).as_os_str().as_bytes(), b"cap\xff.mp4");
    }

    #[test]
    fn run_config_defaults() {
        let config = RunConfig::new("cap.mov");
        assert_eq!(config.output(), Path::new("cap.mp4"));
        assert_eq!(config.compression(), CompressionLevel::None);
        assert!(!config.wants_trim());

        let config = config.with_output("out.mp4").with_truncate_seconds(3);
        assert_eq!(config.output(), Path::new("out.mp4"));
        assert!(config.wants_trim());
    }
}
