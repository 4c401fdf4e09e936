/// Cadence - playlist streaming coordinator
use anyhow::Context;
use cadence::{config::AppConfig, setup};
use cadence_catalog::LoadProgress;
use cadence_playback::{execute, Command, PlaybackCoordinator, PlaybackEvent, HELP};
use clap::{Parser, Subcommand};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{broadcast, mpsc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "cadence")]
#[command(about = "Streams playlists through a single output channel", long_about = None)]
struct Cli {
    /// Configuration file path (default: ./cadence.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read playback commands from stdin
    Run,
    /// Load a playlist into the cache and print its tracks
    Load {
        /// Playlist URL
        url: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref())?;
    init_tracing(config.log_file.as_deref())?;

    match cli.command {
        Commands::Run => {
            config.validate()?;
            run(&config).await?;
        }
        Commands::Load { url } => {
            load(&config, &url).await?;
        }
    }

    Ok(())
}

fn init_tracing(log_file: Option<&Path>) -> anyhow::Result<()> {
    let file_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("opening log file {}", path.display()))?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Arc::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "cadence=info,cadence_playback=info,cadence_catalog=info,cadence_output=warn".into()
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    Ok(())
}

async fn run(config: &AppConfig) -> anyhow::Result<()> {
    let coordinator = setup::build_coordinator(config)?;
    tokio::spawn(announce(coordinator.subscribe()));

    tracing::info!(channel = %config.playback.channel, "Cadence ready");
    println!("{}", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if matches!(line, "quit" | "exit") {
                    break;
                }
                respond(&coordinator, line).await;
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted");
                break;
            }
        }
    }

    coordinator.stop().await;
    tracing::info!("Cadence stopped");
    Ok(())
}

async fn respond(coordinator: &PlaybackCoordinator, line: &str) {
    match line.parse::<Command>() {
        Ok(command) => println!("{}", execute(coordinator, command).await),
        Err(e) => println!("{}", e),
    }
}

/// Print track changes as they happen
async fn announce(mut events: broadcast::Receiver<PlaybackEvent>) {
    loop {
        match events.recv().await {
            Ok(PlaybackEvent::TrackStarted { position, title }) => {
                println!("▶ Now playing {}: {}", position + 1, title);
            }
            Ok(PlaybackEvent::TrackUnresolvable { position, title }) => {
                println!("Skipping unplayable track {}: {}", position + 1, title);
            }
            Ok(PlaybackEvent::Exhausted { attempts }) => {
                println!("None of the {} tracks could be played", attempts);
            }
            Ok(PlaybackEvent::Disconnected) => println!("Output disconnected"),
            Ok(_) => {}
            Err(broadcast::error::RecvError::Lagged(missed)) => {
                tracing::debug!(missed, "Event listener lagged");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

async fn load(config: &AppConfig, url: &str) -> anyhow::Result<()> {
    let loader = setup::build_loader(config)?;
    let (progress_tx, mut progress_rx) = mpsc::channel(16);

    let reporter = tokio::spawn(async move {
        while let Some(progress) = progress_rx.recv().await {
            match progress {
                LoadProgress::CacheHit { tracks } => eprintln!("Cached: {} tracks", tracks),
                LoadProgress::FetchingCatalog { entries } => {
                    eprintln!("Listing catalog: {} entries", entries);
                }
                LoadProgress::Resolving { done, total } => {
                    eprintln!("Resolving: {}/{}", done, total);
                }
                LoadProgress::Complete { tracks } => eprintln!("Loaded {} tracks", tracks),
            }
        }
    });

    let result = loader.load_with_progress(url, Some(&progress_tx)).await;
    drop(progress_tx);
    let _ = reporter.await;

    let playlist = result.with_context(|| format!("loading {}", url))?;
    for (index, track) in playlist.tracks.iter().enumerate() {
        println!("{}. {} <{}>", index + 1, track.title, track.source_url);
    }
    if playlist.dropped > 0 {
        eprintln!("{} entries could not be resolved", playlist.dropped);
    }

    Ok(())
}
