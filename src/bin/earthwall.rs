use std::{io::BufRead as _, path::PathBuf, sync::Arc, time::Duration};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use earthwall::{
    Config, CycleOutcome, DisplayStatus, FillMode, LoopState, NoopSink, Pipeline, PollLoop,
    StalenessTracker, StatusBoard, StatusReporter, WallpaperSink, detect_desktop, select_sink,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "earthwall", version)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Poll on an interval and keep the wallpaper current. Reads commands from stdin.
    Run,
    /// Run a single cycle and exit.
    Once,
    /// Print the detected desktop environment and wallpaper backend.
    Detect,
    /// Print the effective configuration as JSON.
    Config,
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// Config JSON; defaults apply to every field it omits.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output PNG path (default: OS temp dir).
    #[arg(long, global = true)]
    out: Option<PathBuf>,

    /// Poll interval in seconds.
    #[arg(long, global = true)]
    interval: Option<u64>,

    /// Tiles per grid edge.
    #[arg(long, global = true)]
    grid_size: Option<u32>,

    /// How the desktop should fit the image.
    #[arg(long, global = true)]
    fill_mode: Option<FillMode>,

    /// Write the file but never touch the desktop.
    #[arg(long, global = true, default_value_t = false)]
    no_sink: bool,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let cfg = load_config(&cli.common)?;
    match cli.cmd {
        Command::Run => cmd_run(&cfg, &cli.common),
        Command::Once => cmd_once(&cfg, &cli.common),
        Command::Detect => cmd_detect(),
        Command::Config => {
            println!("{}", serde_json::to_string_pretty(&cfg)?);
            Ok(())
        }
    }
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("earthwall=info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_config(args: &CommonArgs) -> anyhow::Result<Config> {
    let mut cfg = match &args.config {
        Some(path) => Config::from_path(path)?,
        None => Config::default(),
    };
    if let Some(out) = &args.out {
        cfg.output_path = Some(
            std::path::absolute(out)
                .with_context(|| format!("resolve output path '{}'", out.display()))?,
        );
    }
    if let Some(secs) = args.interval {
        cfg.poll_interval_secs = secs;
    }
    if let Some(n) = args.grid_size {
        cfg.grid_size = n;
    }
    if let Some(mode) = args.fill_mode {
        cfg.fill_mode = mode;
    }
    cfg.validate()?;
    Ok(cfg)
}

fn sink_for(args: &CommonArgs) -> Arc<dyn WallpaperSink> {
    if args.no_sink {
        Arc::new(NoopSink)
    } else {
        select_sink(detect_desktop())
    }
}

fn cmd_once(cfg: &Config, args: &CommonArgs) -> anyhow::Result<()> {
    let board = Arc::new(StatusBoard::new());
    let pipeline = Pipeline::from_config(
        cfg,
        sink_for(args),
        Arc::new(StalenessTracker::new()),
        board.clone(),
    )?;
    let outcome = pipeline.run_cycle();
    println!("{}", board.current());
    match outcome {
        CycleOutcome::Applied { .. } | CycleOutcome::Unchanged { .. } => {
            eprintln!("{outcome}");
            Ok(())
        }
        other => anyhow::bail!("{other}"),
    }
}

fn cmd_detect() -> anyhow::Result<()> {
    let desktop = detect_desktop();
    println!("desktop: {desktop}");
    println!("backend: {}", select_sink(desktop).name());
    Ok(())
}

/// Prints the date line whenever it changes.
struct ConsoleStatus {
    board: StatusBoard,
}

impl StatusReporter for ConsoleStatus {
    fn report(&self, status: DisplayStatus) {
        if self.board.current() != status {
            println!("{status}");
        }
        self.board.report(status);
    }
}

fn cmd_run(cfg: &Config, args: &CommonArgs) -> anyhow::Result<()> {
    let status = Arc::new(ConsoleStatus {
        board: StatusBoard::new(),
    });
    let tracker = Arc::new(StalenessTracker::new());
    let pipeline = Arc::new(Pipeline::from_config(
        cfg,
        sink_for(args),
        Arc::clone(&tracker),
        status.clone(),
    )?);
    eprintln!(
        "writing {} every {}s; commands: toggle, start, stop, status, quit",
        pipeline.output_path().display(),
        cfg.poll_interval_secs
    );

    let mut poll = PollLoop::start(pipeline, Duration::from_secs(cfg.poll_interval_secs))?;
    print_state(poll.state());

    for line in std::io::stdin().lock().lines() {
        let line = line.context("read stdin")?;
        match line.trim() {
            "" => {}
            "t" | "toggle" => print_state(poll.toggle()?),
            "start" => {
                poll.resume()?;
                print_state(poll.state());
            }
            "stop" => {
                poll.stop();
                print_state(poll.state());
            }
            "s" | "status" => {
                print_state(poll.state());
                println!("{}", status.board.current());
                print_applied(&tracker);
            }
            "q" | "quit" | "exit" => break,
            other => eprintln!("unknown command '{other}'"),
        }
    }

    poll.stop();
    Ok(())
}

fn print_state(state: LoopState) {
    println!("Latest Image: {state}");
}

fn print_applied(tracker: &StalenessTracker) {
    println!(
        "Last applied: {}",
        tracker.display_date().as_deref().unwrap_or("none")
    );
}
