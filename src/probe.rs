//! Container duration probing through ffprobe.
//!
//! Only the container-level duration is requested, printed as a bare number.
//! A failed probe is not fatal to a run: [`probe_duration_or_warn`] logs the
//! failure and reports the duration as unknown, and trimming degrades to a
//! start-only cut.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use mov2mp4::{SystemRunner, ToolSet, probe_duration};
//!
//! let seconds = probe_duration(&SystemRunner, &ToolSet::default(), Path::new("input.mov"))?;
//! println!("{seconds:.2}s");
//! # Ok::<(), mov2mp4::Mov2Mp4Error>(())
//! ```

use std::path::Path;

use crate::error::Mov2Mp4Error;
use crate::process::{CommandSpec, OutputMode, ProcessRunner};
use crate::tools::ToolSet;

/// Build the ffprobe invocation that prints only the container duration.
pub fn probe_command(tools: &ToolSet, input: &Path) -> CommandSpec {
    CommandSpec::new(&tools.ffprobe)
        .args(["-v", "error"])
        .args(["-show_entries", "format=duration"])
        .args(["-of", "default=noprint_wrappers=1:nokey=1"])
        .arg(input)
}

/// Parse ffprobe's bare-number output into seconds.
///
/// # Errors
///
/// Returns [`Mov2Mp4Error::ProbeFailed`] unless the text is a finite,
/// non-negative number (ffprobe prints `N/A` for streams without a duration).
pub fn parse_duration(text: &str) -> Result<f64, Mov2Mp4Error> {
    let trimmed = text.trim();
    let seconds = trimmed
        .parse::<f64>()
        .map_err(|_| Mov2Mp4Error::ProbeFailed(format!("unparseable duration {trimmed:?}")))?;

    if !seconds.is_finite() || seconds < 0.0 {
        return Err(Mov2Mp4Error::ProbeFailed(format!(
            "out-of-range duration {trimmed:?}"
        )));
    }
    Ok(seconds)
}

/// Run ffprobe on `input` and return the duration in seconds.
///
/// # Errors
///
/// - [`Mov2Mp4Error::SpawnFailed`] if ffprobe cannot be started.
/// - [`Mov2Mp4Error::ProbeFailed`] if it exits unsuccessfully or prints
///   something other than a duration.
pub fn probe_duration<R: ProcessRunner>(
    runner: &R,
    tools: &ToolSet,
    input: &Path,
) -> Result<f64, Mov2Mp4Error> {
    let command = probe_command(tools, input);
    log::debug!("Probing duration of {}", input.display());

    let output = runner.run(&command, OutputMode::Capture)?;
    if !output.status.success() {
        let program = command.program_name();
        let diagnostic = output.stderr.trim();
        return Err(Mov2Mp4Error::ProbeFailed(match output.status.code {
            Some(code) if diagnostic.is_empty() => format!("{program} exited with status {code}"),
            Some(code) => format!("{program} exited with status {code}: {diagnostic}"),
            None => format!("{program} was terminated by a signal"),
        }));
    }

    let seconds = parse_duration(&output.stdout)?;
    log::debug!("{} lasts {:.3}s", input.display(), seconds);
    Ok(seconds)
}

/// [`probe_duration`], with any failure logged as a warning and reported as
/// an unknown (`None`) duration.
pub fn probe_duration_or_warn<R: ProcessRunner>(
    runner: &R,
    tools: &ToolSet,
    input: &Path,
) -> Option<f64> {
    match probe_duration(runner, tools, input) {
        Ok(seconds) => Some(seconds),
        Err(error) => {
            log::warn!("{error}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::{parse_duration, probe_command};
    use crate::tools::ToolSet;

    #[test]
    fn probe_command_requests_bare_duration() {
        let command = probe_command(&ToolSet::default(), Path::new("clip.mov"));
        assert_eq!(
            command.tokens(),
            [
                "ffprobe",
                "-v",
                "error",
                "-show_entries",
                "format=duration",
                "-of",
                "default=noprint_wrappers=1:nokey=1",
                "clip.mov",
            ]
        );
    }

    #[test]
    fn parses_trailing_newline() {
        assert_eq!(parse_duration("60.042000\n").unwrap(), 60.042);
    }

    #[test]
    fn rejects_non_numbers() {
        assert!(parse_duration("N/A\n").is_err());
        assert!(parse_duration("").is_err());
        assert!(parse_duration("inf").is_err());
        assert!(parse_duration("-1.0").is_err());
    }
}
