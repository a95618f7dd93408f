//! JSON shapes written at the process boundary.

use moodmix_core::Track;
use moodmix_similarity::{PlaylistAssembler, RankedTrack};
use serde::Serialize;

/// Successful playlist response
#[derive(Debug, Clone, Serialize)]
pub struct PlaylistResponse {
    pub success: bool,
    pub tracks: Vec<RankedTrack>,
    pub total_analyzed: usize,
    /// The mood as requested, even when it fell back to calm
    pub mood: String,
}

/// Any failure, reported once and with nothing else on stdout
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(err: &anyhow::Error) -> Self {
        Self {
            error: format!("{:#}", err),
        }
    }
}

/// Parse a JSON track array and build a playlist for `mood`
pub fn recommend(
    assembler: &PlaylistAssembler,
    mood: &str,
    tracks_json: &str,
    size: usize,
) -> anyhow::Result<PlaylistResponse> {
    let tracks = Track::parse_batch(tracks_json)?;
    let total_analyzed = tracks.len();
    let tracks = assembler.build_playlist_with_size(tracks, mood, size)?;

    Ok(PlaylistResponse {
        success: true,
        tracks,
        total_analyzed,
        mood: mood.to_string(),
    })
}
