use anyhow::Context;
use clap::{Parser, Subcommand};
use moodmix::{
    aggregate_emotions, recommend, EmotionScore, ErrorResponse, PlaylistAssembler,
    PlaylistConfig, Ranker, Track,
};
use serde::Serialize;
use std::io::Read;
use std::process::ExitCode;
use tracing::{debug, info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Mood-matched, diversified playlists from audio features
#[derive(Parser, Debug)]
#[command(name = "moodmix")]
#[command(about = "Build mood-matched playlists from audio features", long_about = None)]
struct Args {
    /// Log level (logs go to stderr; RUST_LOG takes precedence)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a balanced playlist for a mood
    Invoke {
        /// Target mood; unknown moods fall back to calm
        mood: String,

        /// JSON array of tracks, `@path` to read a file, or `-` for stdin
        tracks: String,

        /// Playlist size
        #[arg(long, default_value_t = 30)]
        size: usize,
    },

    /// Rank tracks by mood match without clustering
    Rank {
        mood: String,

        /// JSON array of tracks, `@path` to read a file, or `-` for stdin
        tracks: String,

        /// Number of tracks to return (all when omitted)
        #[arg(long)]
        top_n: Option<usize>,
    },

    /// Fold emotion-label scores (`[{"label", "score"}]`) into a mood
    Classify {
        /// JSON array of label scores, `@path` to read a file, or `-` for stdin
        emotions: String,
    },
}

#[derive(Serialize)]
struct RankResponse {
    success: bool,
    tracks: Vec<moodmix::RankedTrack>,
    total_analyzed: usize,
    mood: String,
}

fn init_logging(log_level: &str) -> anyhow::Result<()> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
        return Ok(());
    }

    let log_level = match log_level {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Resolve a JSON argument: inline text, `@file`, or `-` for `stdin`
fn read_json_arg(arg: &str, stdin: &mut dyn Read) -> anyhow::Result<String> {
    if arg == "-" {
        let mut buf = String::new();
        stdin
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        return Ok(buf);
    }
    if let Some(path) = arg.strip_prefix('@') {
        return std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path));
    }
    Ok(arg.to_string())
}

fn run(command: Command, stdin: &mut dyn Read) -> anyhow::Result<String> {
    let output = match command {
        Command::Invoke { mood, tracks, size } => {
            let json = read_json_arg(&tracks, stdin)?;
            let assembler = PlaylistAssembler::new(PlaylistConfig {
                size,
                ..PlaylistConfig::default()
            })?;
            let response = recommend(&assembler, &mood, &json, size)?;
            info!(
                "Selected {} of {} tracks for mood '{}'",
                response.tracks.len(),
                response.total_analyzed,
                mood
            );
            serde_json::to_string(&response)?
        }
        Command::Rank { mood, tracks, top_n } => {
            let tracks = Track::parse_batch(&read_json_arg(&tracks, stdin)?)?;
            let total_analyzed = tracks.len();
            let ranked = Ranker::new().rank(tracks, &mood, top_n.unwrap_or(total_analyzed))?;
            serde_json::to_string(&RankResponse {
                success: true,
                tracks: ranked,
                total_analyzed,
                mood,
            })?
        }
        Command::Classify { emotions } => {
            let scores: Vec<EmotionScore> = serde_json::from_str(&read_json_arg(&emotions, stdin)?)?;
            let prediction = aggregate_emotions(&scores)?;
            debug!("Classified {} labels as {}", scores.len(), prediction.mood);
            serde_json::to_string(&prediction)?
        }
    };
    Ok(output)
}

/// Final stdout line and whether the command succeeded
fn respond(result: anyhow::Result<String>) -> (String, bool) {
    match result {
        Ok(output) => (output, true),
        Err(err) => (error_json(ErrorResponse::new(&err)), false),
    }
}

fn error_json(error: ErrorResponse) -> String {
    serde_json::to_string(&error).unwrap_or_else(|_| r#"{"error":"unknown error"}"#.to_string())
}

fn usage_error(err: &clap::Error) -> String {
    error_json(ErrorResponse {
        error: err.to_string().trim().to_string(),
    })
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) if !err.use_stderr() => {
            // --help / --version
            let _ = err.print();
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            println!("{}", usage_error(&err));
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_logging(&args.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let (output, ok) = respond(run(args.command, &mut std::io::stdin()));
    println!("{}", output);
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
