use std::io::Write;
use std::path::PathBuf;

use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use colored::{ColoredString, Colorize};
use log::{Level, LevelFilter};
use mov2mp4::{CompressionLevel, Mov2Mp4Error, RunConfig, SystemRunner, ToolSet, Transcoder};
use serde_json::json;

const CLI_AFTER_HELP: &str = "simplest example:\n    mov2mp4 -i screencap.mov";

#[derive(Debug, Parser)]
#[command(
    name = "mov2mp4",
    version,
    about = "utility to compress large .mov screen captures into small .mp4 files",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    /// Input file path.
    #[arg(short, long, required_unless_present = "completions")]
    input: Option<PathBuf>,

    /// Output file path (default: <input file>.mp4).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Bitrate compression level: 'none' (default), 'low', 'med', 'high'.
    #[arg(short = 'c', long, default_value_t = CompressionLevel::None)]
    bitrate_compression_level: CompressionLevel,

    /// Seconds to skip at start (default: 0).
    #[arg(short, long, default_value_t = 0)]
    skip: u64,

    /// Seconds to remove from end (default: 0).
    #[arg(short, long, default_value_t = 0)]
    truncate: u64,

    /// ffmpeg executable to use.
    #[arg(long, env = "MOV2MP4_FFMPEG", default_value = mov2mp4::tools::FFMPEG)]
    ffmpeg: PathBuf,

    /// ffprobe executable to use.
    #[arg(long, env = "MOV2MP4_FFPROBE", default_value = mov2mp4::tools::FFPROBE)]
    ffprobe: PathBuf,

    /// Print the ffmpeg command without running it.
    #[arg(long)]
    dry_run: bool,

    /// With --dry-run, print the plan as JSON.
    #[arg(long, requires = "dry_run")]
    json: bool,

    /// Show additional logging output.
    #[arg(short, long)]
    verbose: bool,

    /// Print a shell completion script and exit.
    #[arg(long, value_enum, value_name = "SHELL")]
    completions: Option<Shell>,
}

/// Label printed before each log message.
fn level_label(level: Level) -> ColoredString {
    match level {
        Level::Error => "error:".red().bold(),
        Level::Warn => "warning:".yellow().bold(),
        Level::Info => "info:".normal(),
        Level::Debug => "debug:".dimmed(),
        Level::Trace => "trace:".dimmed(),
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format(|buf, record| writeln!(buf, "{} {}", level_label(record.level()), record.args()))
        .target(env_logger::Target::Stderr)
        .try_init();
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Some(shell) = cli.completions {
        let mut command = Cli::command();
        clap_complete::generate(shell, &mut command, "mov2mp4", &mut std::io::stdout());
        return Ok(());
    }

    let input = cli.input.ok_or("missing required argument --input")?;
    let mut config = RunConfig::new(input)
        .with_compression(cli.bitrate_compression_level)
        .with_skip_seconds(cli.skip)
        .with_truncate_seconds(cli.truncate);
    if let Some(output) = cli.output {
        config = config.with_output(output);
    }

    let tools = ToolSet::new(cli.ffmpeg, cli.ffprobe).verify()?;

    let transcoder = Transcoder::new(&config, &tools, SystemRunner);
    let plan = transcoder.plan();

    if cli.json {
        let payload = json!({
            "input": config.input().to_string_lossy(),
            "output": config.output().to_string_lossy(),
            "compression": config.compression().name(),
            "duration_seconds": plan.duration,
            "command": plan.command.tokens(),
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    println!("{} {}", "Command:".bold(), plan.command.to_string().bright_green());
    if cli.dry_run {
        return Ok(());
    }

    transcoder.execute(&plan)?;
    Ok(())
}

fn main() {
    if let Err(error) = run() {
        eprintln!("{} {error}", "error:".red().bold());
        let code = error
            .downcast_ref::<Mov2Mp4Error>()
            .map_or(1, Mov2Mp4Error::exit_code);
        std::process::exit(code);
    }
}
