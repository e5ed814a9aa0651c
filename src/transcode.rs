//! H.264/AAC transcoding through ffmpeg.
//!
//! [`build_transcode_command`] assembles the ffmpeg argument list from a
//! [`RunConfig`] and an optional probed duration. [`Transcoder`] strings the
//! steps of a run together: probe when trimming, build, then execute with
//! ffmpeg's output going straight to the terminal.
//!
//! # Example
//!
//! ```no_run
//! use mov2mp4::{CompressionLevel, RunConfig, SystemRunner, ToolSet, Transcoder};
//!
//! let config = RunConfig::new("screencap.mov").with_compression(CompressionLevel::Low);
//! let tools = ToolSet::default();
//! Transcoder::new(&config, &tools, SystemRunner).run()?;
//! # Ok::<(), mov2mp4::Mov2Mp4Error>(())
//! ```

use crate::configuration::RunConfig;
use crate::error::Mov2Mp4Error;
use crate::probe::probe_duration_or_warn;
use crate::process::{CommandSpec, OutputMode, ProcessRunner, SystemRunner};
use crate::tools::ToolSet;
use crate::trim::TrimWindow;

const AUDIO_CODEC: &str = "aac";
const VIDEO_CODEC: &str = "libx264";
/// 8-bit 4:2:0, playable nearly everywhere.
const PIXEL_FORMAT: &str = "yuv420p";
/// 720 lines tall, width follows the aspect ratio.
const SCALE_FILTER: &str = "scale=-1:720";

/// Build the ffmpeg invocation for `config`.
///
/// `duration` is the probed input length in seconds, or `None` when it was
/// not probed or the probe failed. The result depends only on the arguments,
/// so equal inputs give identical commands.
///
/// Argument order: overwrite flag, input, codecs, pixel format, filter graph,
/// faststart, then the optional bitrate cap and frame rate, and the output
/// path last.
pub fn build_transcode_command(
    tools: &ToolSet,
    config: &RunConfig,
    duration: Option<f64>,
) -> CommandSpec {
    let window = config.wants_trim().then(|| {
        TrimWindow::new(config.skip_seconds(), config.truncate_seconds(), duration)
    });

    let filter_graph = match &window {
        Some(window) => format!("{},{SCALE_FILTER}", window.filter()),
        None => SCALE_FILTER.to_string(),
    };

    // No -b:a: ffmpeg rejects an audio bitrate when the input has no audio.
    let mut command = CommandSpec::new(&tools.ffmpeg)
        .arg("-y")
        .arg("-i")
        .arg(config.input())
        .args(["-c:a", AUDIO_CODEC])
        .args(["-c:v", VIDEO_CODEC])
        .args(["-pix_fmt", PIXEL_FORMAT])
        .arg("-vf")
        .arg(filter_graph)
        .args(["-movflags", "+faststart"]);

    if let Some(bitrate) = config.compression().video_bitrate() {
        command = command.args(["-b:v", bitrate]);
    }

    if let Some(rate) = window.and_then(|window| window.forced_frame_rate()) {
        command = command.arg("-r").arg(rate.to_string());
    }

    command.arg(config.output())
}

/// Everything decided before ffmpeg is launched.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscodePlan {
    /// Probed input duration in seconds. `None` when no trim was requested
    /// or the probe failed.
    pub duration: Option<f64>,
    /// The ffmpeg invocation.
    pub command: CommandSpec,
}

/// Drives one transcode run.
///
/// Probing and transcoding go through the same [`ProcessRunner`], one child
/// at a time.
pub struct Transcoder<'a, R: ProcessRunner = SystemRunner> {
    config: &'a RunConfig,
    tools: &'a ToolSet,
    runner: R,
}

impl<'a, R: ProcessRunner> Transcoder<'a, R> {
    pub fn new(config: &'a RunConfig, tools: &'a ToolSet, runner: R) -> Self {
        Self {
            config,
            tools,
            runner,
        }
    }

    /// Probe the input if a trim was requested, then build the command.
    ///
    /// A failed probe is logged and planned around; it never fails the plan.
    /// The start cut still applies, while a requested end cut is dropped
    /// with a warning.
    pub fn plan(&self) -> TranscodePlan {
        let duration = if self.config.wants_trim() {
            probe_duration_or_warn(&self.runner, self.tools, self.config.input())
        } else {
            None
        };

        if duration.is_none() && self.config.truncate_seconds() > 0 {
            log::warn!(
                "Duration unknown; ignoring request to truncate {}s from the end",
                self.config.truncate_seconds()
            );
        }

        TranscodePlan {
            duration,
            command: build_transcode_command(self.tools, self.config, duration),
        }
    }

    /// Run the planned ffmpeg command, sharing this process's stdout and
    /// stderr, and wait for it.
    ///
    /// # Errors
    ///
    /// - [`Mov2Mp4Error::SpawnFailed`] if ffmpeg cannot be started.
    /// - [`Mov2Mp4Error::TranscodeFailed`] if ffmpeg exits unsuccessfully.
    pub fn execute(&self, plan: &TranscodePlan) -> Result<(), Mov2Mp4Error> {
        log::info!(
            "Transcoding {} to {} (compression={})",
            self.config.input().display(),
            self.config.output().display(),
            self.config.compression()
        );

        let output = self.runner.run(&plan.command, OutputMode::Inherit)?;
        if !output.status.success() {
            return Err(Mov2Mp4Error::TranscodeFailed {
                code: output.status.code,
            });
        }
        Ok(())
    }

    /// [`plan`](Transcoder::plan) followed by [`execute`](Transcoder::execute).
    pub fn run(self) -> Result<TranscodePlan, Mov2Mp4Error> {
        let plan = self.plan();
        self.execute(&plan)?;
        Ok(plan)
    }
}
