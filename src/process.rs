//! External process invocation.
//!
//! Both external tools are driven through one seam: a [`CommandSpec`] goes
//! into a [`ProcessRunner`], and a [`ProcessOutput`] carrying the exit status
//! (and, in [`OutputMode::Capture`], the child's output) comes back. The
//! default [`SystemRunner`] uses [`std::process::Command`]; tests substitute a
//! recording fake.

use std::borrow::Cow;
use std::ffi::{OsStr, OsString};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::process::{Command, Stdio};

use crate::error::Mov2Mp4Error;

/// An external process invocation: program name followed by its arguments.
///
/// Tokens are kept as [`OsString`] so file names reach the child byte for
/// byte, whatever their encoding.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandSpec {
    /// Program to launch, resolved through the search path by the OS.
    pub program: OsString,
    /// Arguments, in order.
    pub args: Vec<OsString>,
}

impl CommandSpec {
    pub fn new<S: Into<OsString>>(program: S) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append one argument.
    #[must_use]
    pub fn arg<S: AsRef<OsStr>>(mut self, arg: S) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    /// Append several arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|arg| arg.as_ref().to_os_string()));
        self
    }

    /// Program name for messages. Lossy for non-UTF-8 names.
    pub fn program_name(&self) -> Cow<'_, str> {
        self.program.to_string_lossy()
    }

    /// Program followed by arguments, lossily converted for display.
    pub fn tokens(&self) -> Vec<String> {
        std::iter::once(&self.program)
            .chain(self.args.iter())
            .map(|token| token.to_string_lossy().into_owned())
            .collect()
    }

    /// The raw argument following `flag`, if the flag is present.
    pub fn value_of_os(&self, flag: &str) -> Option<&OsStr> {
        self.args
            .iter()
            .position(|arg| arg == flag)
            .and_then(|index| self.args.get(index + 1))
            .map(OsString::as_os_str)
    }

    /// Like [`value_of_os`](CommandSpec::value_of_os), for UTF-8 values.
    pub fn value_of(&self, flag: &str) -> Option<&str> {
        self.value_of_os(flag).and_then(OsStr::to_str)
    }
}

impl Display for CommandSpec {
    /// Render as a line that can be pasted into a POSIX shell.
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let rendered: Vec<String> = self.tokens().iter().map(|token| quote_sh(token)).collect();
        f.write_str(&rendered.join(" "))
    }
}

fn is_simple_word(s: &str) -> bool {
    !s.is_empty()
        && s.chars().all(|c| {
            matches!(c,
                'a'..='z' | 'A'..='Z' | '0'..='9' | '_' | '-' | '.' | '/' | ':' | '+' | '%' | '@' | '=' | ',')
        })
}

fn quote_sh(s: &str) -> String {
    if is_simple_word(s) {
        return s.to_string();
    }
    format!("'{}'", s.replace('\'', "'\"'\"'"))
}

/// Where the child's standard output and error go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Collect both streams into [`ProcessOutput`].
    Capture,
    /// Share the parent's streams; nothing is collected.
    Inherit,
}

/// How a child process terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitOutcome {
    /// Exit code, or `None` if the child was killed by a signal.
    pub code: Option<i32>,
}

impl ExitOutcome {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Result of running a [`CommandSpec`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    pub status: ExitOutcome,
    /// Captured standard output. Empty in [`OutputMode::Inherit`].
    pub stdout: String,
    /// Captured standard error. Empty in [`OutputMode::Inherit`].
    pub stderr: String,
}

/// Runs external processes to completion.
///
/// Implementations block until the child exits. A child that starts and then
/// fails is reported through [`ProcessOutput::status`], not as an `Err`.
pub trait ProcessRunner {
    /// Run `command` and wait for it to exit.
    ///
    /// # Errors
    ///
    /// Returns [`Mov2Mp4Error::SpawnFailed`] if the process cannot be started.
    fn run(&self, command: &CommandSpec, mode: OutputMode) -> Result<ProcessOutput, Mov2Mp4Error>;
}

impl<R: ProcessRunner + ?Sized> ProcessRunner for &R {
    fn run(&self, command: &CommandSpec, mode: OutputMode) -> Result<ProcessOutput, Mov2Mp4Error> {
        (**self).run(command, mode)
    }
}

/// [`ProcessRunner`] backed by the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, command: &CommandSpec, mode: OutputMode) -> Result<ProcessOutput, Mov2Mp4Error> {
        log::debug!("Running {} ({:?})", command, mode);

        let stdio = || match mode {
            OutputMode::Capture => Stdio::piped(),
            OutputMode::Inherit => Stdio::inherit(),
        };

        let output = Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::null())
            .stdout(stdio())
            .stderr(stdio())
            .output()
            .map_err(|source| Mov2Mp4Error::SpawnFailed {
                program: command.program_name().into_owned(),
                source,
            })?;

        log::debug!("{} exited with {:?}", command.program_name(), output.status.code());

        Ok(ProcessOutput {
            status: ExitOutcome {
                code: output.status.code(),
            },
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
