use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use std::future::Future;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;
use zip_rename_dl::{
    Config, ConsoleNotifier, Control, Controller, DirectorySink, Event, Result, Session,
    pause_on_interrupt,
};

/// Rename the files of a ZIP archive and save them one at a time.
///
/// Press Ctrl+C during delivery to pause after the current file, and again at
/// the continue prompt to quit.
#[derive(Parser, Debug)]
#[command(name = "zip-rename-dl", version, about)]
struct Args {
    /// ZIP archive to load
    archive: PathBuf,

    /// Directory delivered files are written to
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Rename an entry, as INDEX=NAME (applied after duplicates)
    #[arg(long = "rename", value_name = "INDEX=NAME", value_parser = parse_rename)]
    renames: Vec<(usize, String)>,

    /// Append a copy of an entry (by index)
    #[arg(long = "duplicate", value_name = "INDEX")]
    duplicates: Vec<usize>,

    /// Wait between files, in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Suffix added to duplicated entries' names
    #[arg(long)]
    suffix: Option<String>,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the entries and exit without delivering
    #[arg(long)]
    list: bool,
}

fn parse_rename(raw: &str) -> std::result::Result<(usize, String), String> {
    let (index, name) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected INDEX=NAME, got '{}'", raw))?;
    let index = index
        .trim()
        .parse::<usize>()
        .map_err(|e| format!("invalid index '{}': {}", index, e))?;
    Ok((index, name.to_string()))
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match run(args).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("✗ {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::from_json_file(path).await?,
        None => Config::default(),
    };

    if let Some(dir) = &args.output_dir {
        config.delivery.output_dir = dir.clone();
    }
    if let Some(ms) = args.delay_ms {
        config.delivery.step_delay = Duration::from_millis(ms);
    }
    if let Some(suffix) = &args.suffix {
        config.session.duplicate_suffix = suffix.clone();
    }

    config.validate()?;
    Ok(config)
}

fn print_entries(session: &Session) {
    println!("{} file(s):", session.len());
    for (index, entry) in session.entries().iter().enumerate() {
        if entry.display_name == entry.original_name {
            println!("  [{}] {}", index, entry.display_name);
        } else {
            println!(
                "  [{}] {}  (from {})",
                index, entry.display_name, entry.original_name
            );
        }
    }
}

/// Resolves on the next Ctrl+C, or never if the signal cannot be watched
async fn interrupted() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}

/// Read the answer to the continue prompt
///
/// Enter continues. `q`, end of input or `interrupt` firing first quits.
async fn wants_to_continue<R>(
    lines: &mut Lines<R>,
    interrupt: impl Future<Output = ()>,
) -> Result<bool>
where
    R: AsyncBufRead + Unpin,
{
    tokio::select! {
        line = lines.next_line() => {
            Ok(matches!(line?, Some(answer) if !answer.trim().eq_ignore_ascii_case("q")))
        }
        _ = interrupt => Ok(false),
    }
}

async fn run(args: Args) -> Result<ExitCode> {
    let config = load_config(&args).await?;
    let sink = DirectorySink::new(config.output_dir().clone());
    let mut controller = Controller::new(&config, Box::new(sink), ConsoleNotifier);

    if controller.choose_archive(&args.archive).await.is_none() {
        return Ok(ExitCode::FAILURE);
    }

    for index in &args.duplicates {
        controller.duplicate(*index)?;
    }
    for (index, name) in &args.renames {
        controller.rename(*index, name.clone())?;
    }

    print_entries(controller.session());

    if args.list {
        return Ok(ExitCode::SUCCESS);
    }
    if controller.controls().is_none() {
        return Ok(ExitCode::SUCCESS);
    }

    let mut events = controller.subscribe();
    let printer = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(Event::Delivered {
                    index, name, bytes, ..
                }) => println!("  ↓ [{}] {} ({} bytes)", index, name, bytes),
                Ok(Event::Paused { at }) => println!("⏸ paused before entry {}", at),
                Ok(_) => {}
                Err(tokio::sync::broadcast::error::RecvError::Lagged(_)) => continue,
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    let shutdown = CancellationToken::new();
    let listener = tokio::spawn(pause_on_interrupt(
        controller.pause_handle(),
        shutdown.clone(),
    ));

    let mut stdin = BufReader::new(tokio::io::stdin()).lines();

    let failed = loop {
        let failed = controller.activate().await.is_err();

        if controller.controls() != Some(Control::Continue) {
            break failed;
        }

        println!("Press Enter to continue, or q (or Ctrl+C) to quit:");
        if !wants_to_continue(&mut stdin, interrupted()).await? {
            break failed;
        }
    };

    shutdown.cancel();
    listener.await.ok();
    drop(controller);
    printer.await.ok();

    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
