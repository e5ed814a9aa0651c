//! # mov2mp4
//!
//! Compress large `.mov` screen captures into small `.mp4` files.
//!
//! `mov2mp4` does no media processing of its own. It builds ffmpeg and
//! ffprobe command lines and runs them: H.264 video scaled to 720 lines, AAC
//! audio, `yuv420p` pixels, faststart metadata, an optional video bitrate cap,
//! and optional trimming from either end of the input.
//!
//! ## Quick Start
//!
//! ```no_run
//! use mov2mp4::{CompressionLevel, RunConfig, ToolSet, Transcoder, SystemRunner};
//!
//! let tools = ToolSet::default().verify()?;
//!
//! let config = RunConfig::new("screencap.mov")
//!     .with_compression(CompressionLevel::Med)
//!     .with_skip_seconds(3)
//!     .with_truncate_seconds(5);
//!
//! Transcoder::new(&config, &tools, SystemRunner).run()?;
//! # Ok::<(), mov2mp4::Mov2Mp4Error>(())
//! ```
//!
//! ## Building Commands Without Running Them
//!
//! ```
//! use mov2mp4::{RunConfig, ToolSet, build_transcode_command};
//!
//! let config = RunConfig::new("screencap.mov").with_truncate_seconds(10);
//! let command = build_transcode_command(&ToolSet::default(), &config, Some(60.0));
//! assert_eq!(
//!     command.value_of("-vf"),
//!     Some("trim=start=0:end=50,setpts=PTS-STARTPTS,scale=-1:720"),
//! );
//! ```
//!
//! ## Requirements
//!
//! `ffmpeg` and `ffprobe` must be installed and on the search path, or
//! named explicitly through [`ToolSet`].

pub mod configuration;
pub mod error;
pub mod probe;
pub mod process;
pub mod tools;
pub mod transcode;
pub mod trim;

pub use configuration::{CompressionLevel, OUTPUT_EXTENSION, RunConfig, derive_output_path};
pub use error::Mov2Mp4Error;
pub use probe::{parse_duration, probe_command, probe_duration, probe_duration_or_warn};
pub use process::{CommandSpec, ExitOutcome, OutputMode, ProcessOutput, ProcessRunner, SystemRunner};
pub use tools::ToolSet;
pub use transcode::{TranscodePlan, Transcoder, build_transcode_command};
pub use trim::{END_TRIM_FRAME_RATE, TrimWindow, end_trim_frame_rate};
