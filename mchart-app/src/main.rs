mod app;
mod script;

use std::path::PathBuf;

use anyhow::Result;
use app::{App, AppOptions, ModeArg};
use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "mchart")]
#[command(about = "Replays an M-Chart session script and exports the trial log")]
struct Cli {
    /// JSON session script: an event list, or an object with `events`.
    script: PathBuf,
    /// JSON session config; overrides the one named in the script.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,
    /// CSV output path. Defaults to the mode's log file name.
    #[arg(long)]
    csv: Option<PathBuf>,
    #[arg(long)]
    json: Option<PathBuf>,
    /// Directory for one PNG per event.
    #[arg(long)]
    frames: Option<PathBuf>,
    #[arg(long, default_value_t = 800)]
    width: u32,
    #[arg(long, default_value_t = 800)]
    height: u32,
    /// Replay with a manual clock starting here ("%Y-%m-%d %H:%M:%S").
    #[arg(long)]
    start: Option<String>,
    /// Manual clock advance per confirmation, in seconds.
    #[arg(long, default_value_t = 1)]
    tick: i64,
    /// Quantize slider values to the configured step.
    #[arg(long)]
    snap: bool,
    /// Abort on the first rejected event instead of skipping it.
    #[arg(long)]
    strict: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let options = AppOptions {
        script: cli.script,
        config: cli.config,
        mode: cli.mode,
        csv: cli.csv,
        json: cli.json,
        frames: cli.frames,
        frame_size: (cli.width, cli.height),
        start: cli.start,
        tick_seconds: cli.tick,
        snap: cli.snap,
        strict: cli.strict,
    };

    let app = App::new(options)?;
    app.run()?;

    Ok(())
}
