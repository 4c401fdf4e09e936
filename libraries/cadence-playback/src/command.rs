//! Text command surface
//!
//! Parses user commands and renders every outcome as a short status line.

use crate::coordinator::{PlayReport, PlaybackCoordinator};
use crate::error::PlaybackError;
use std::fmt::Write as _;
use std::str::FromStr;
use thiserror::Error;

/// A user command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Play(Option<String>),
    Skip,
    Goto(usize),
    Stop,
    NowPlaying,
    List,
    Random(Option<String>),
    Leave,
    Help,
}

/// Why a command line could not be parsed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandParseError {
    #[error("Empty command")]
    Empty,

    #[error("Unknown command '{0}', try 'help'")]
    Unknown(String),

    #[error("Usage: goto <track number>")]
    MissingTrackNumber,

    #[error("'{0}' is not a track number")]
    InvalidTrackNumber(String),
}

impl FromStr for Command {
    type Err = CommandParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut parts = line.split_whitespace();
        let name = parts.next().ok_or(CommandParseError::Empty)?.to_lowercase();
        let argument = parts.next().map(str::to_string);

        match name.as_str() {
            "play" | "p" => Ok(Self::Play(argument)),
            "skip" | "next" | "s" => Ok(Self::Skip),
            "goto" | "jump" => {
                let raw = argument.ok_or(CommandParseError::MissingTrackNumber)?;
                raw.parse()
                    .map(Self::Goto)
                    .map_err(|_| CommandParseError::InvalidTrackNumber(raw))
            }
            "stop" => Ok(Self::Stop),
            "now" | "nowplaying" | "np" => Ok(Self::NowPlaying),
            "list" | "playlist" | "ls" => Ok(Self::List),
            "random" | "shuffle" => Ok(Self::Random(argument)),
            "leave" => Ok(Self::Leave),
            "help" | "?" => Ok(Self::Help),
            other => Err(CommandParseError::Unknown(other.to_string())),
        }
    }
}

pub const HELP: &str = "\
Commands:
  play [url]     load a playlist and start playing
  random [url]   load a playlist, shuffle it and start playing
  skip           skip to the next track
  goto <n>       jump to track number n
  now            show the current track
  list           show the playlist
  stop           stop playback and disconnect
  leave          leave the channel
  quit           exit";

/// Run a command and describe the outcome
pub async fn execute(coordinator: &PlaybackCoordinator, command: Command) -> String {
    match command {
        Command::Play(source) => match coordinator.play(source.as_deref()).await {
            Ok(report) => describe_start(&report, false),
            Err(e) => describe_error(&e),
        },
        Command::Random(source) => match coordinator.randomize(source.as_deref()).await {
            Ok(report) => describe_start(&report, true),
            Err(e) => describe_error(&e),
        },
        Command::Skip => match coordinator.skip().await {
            Ok(Some(next)) => format!("Skipped, up next: {}", next.title),
            Ok(None) => "Skipped".to_string(),
            Err(e) => describe_error(&e),
        },
        Command::Goto(number) => match coordinator.goto(number).await {
            Ok(track) => format!("Jumping to {}: {}", number, track.title),
            Err(e) => describe_error(&e),
        },
        Command::Stop => {
            coordinator.stop().await;
            "Playback stopped".to_string()
        }
        Command::NowPlaying => match coordinator.now_playing().await {
            Some(now) => format!("Now playing: {} ({}/{})", now.track.title, now.number, now.total),
            None => "Nothing is playing".to_string(),
        },
        Command::List => {
            let entries = coordinator.list_playlist().await;
            if entries.is_empty() {
                return "Playlist is empty".to_string();
            }
            let mut out = String::from("Playlist:");
            for entry in entries {
                let marker = if entry.is_current { "▶ " } else { "" };
                let _ = write!(out, "\n{}. {}{}", entry.number, marker, entry.title);
            }
            out
        }
        Command::Leave => match coordinator.leave().await {
            Ok(()) => "Left the channel".to_string(),
            Err(e) => describe_error(&e),
        },
        Command::Help => HELP.to_string(),
    }
}

fn describe_start(report: &PlayReport, shuffled: bool) -> String {
    let origin = if report.from_cache { " from cache" } else { "" };
    let mut out = format!("Loaded {} tracks{}", report.tracks, origin);
    if shuffled {
        out.push_str(", shuffled");
    }
    match &report.now_playing {
        Some(track) => {
            let _ = write!(out, ". Now playing: {}", track.title);
        }
        None => out.push_str(". No track could be played"),
    }
    out
}

/// Status line for a failed operation
pub fn describe_error(error: &PlaybackError) -> String {
    match error {
        PlaybackError::AlreadyLoading => "A playlist is already loading, please wait".to_string(),
        PlaybackError::AlreadyPlaying => "Already playing, use 'stop' first".to_string(),
        PlaybackError::SkipCooldown { remaining } => {
            format!("Skipping too fast, wait {:.1}s", remaining.as_secs_f64())
        }
        PlaybackError::NotPlaying => "Nothing is playing".to_string(),
        PlaybackError::EmptyPlaylist => "Playlist is empty".to_string(),
        PlaybackError::InvalidTrackNumber { len, .. } => {
            format!("Invalid track number, expected 1-{}", len)
        }
        PlaybackError::AlreadyCurrent(number) => format!("Track {} is already playing", number),
        PlaybackError::NoSourceConfigured => {
            "No playlist given and none configured".to_string()
        }
        PlaybackError::NotConnected => "Not connected to a channel".to_string(),
        PlaybackError::Transport(e) => format!("Could not connect: {}", e),
        PlaybackError::LoadFailed(e) => format!("Could not load playlist: {}", e),
        PlaybackError::Exhausted { attempts } => {
            format!("None of the {} tracks could be played", attempts)
        }
        PlaybackError::Superseded => "Cancelled".to_string(),
    }
}
