//! Turns Plex video sessions into canonical session records.

use super::models::{PlexSessions, PlexVideoSession};
use crate::server::metrics;
use crate::sessions::{Bitrate, SessionRecord, UpstreamFamily};
use crate::upstream::FieldExtractionError;
use tracing::{debug, warn};

/// `streamType` of subtitle streams.
const SUBTITLE_STREAM_TYPE: &str = "3";

/// Normalizes one `<Video>` session. Every listed video is active playback.
pub fn normalize_video(video: &PlexVideoSession) -> SessionRecord {
    let bitrate = match parse_bitrate(video) {
        Ok(bitrate) => bitrate,
        Err(e) => {
            warn!("Error processing Plex stream bitrate for {:?}: {}", video.title, e);
            metrics::record_field_extraction_error(UpstreamFamily::Plex, e.field());
            Bitrate::Unparseable
        }
    };

    SessionRecord {
        user: video
            .user
            .as_ref()
            .map(|u| u.title.clone())
            .unwrap_or_default(),
        title: video.title.clone(),
        bitrate,
        play_method: video
            .active_part()
            .map(|p| p.decision.clone())
            .unwrap_or_default(),
        subtitle: subtitle_title(video),
        device: video
            .player
            .as_ref()
            .map(|p| p.device.clone())
            .unwrap_or_default(),
    }
}

pub fn normalize_sessions(sessions: &PlexSessions) -> Vec<SessionRecord> {
    let records: Vec<SessionRecord> = sessions.videos.iter().map(normalize_video).collect();
    debug!("Plex reported {} video sessions", records.len());
    records
}

/// Media bitrate in kbps, falling back to the part's, converted to Mbps.
fn parse_bitrate(video: &PlexVideoSession) -> Result<Bitrate, FieldExtractionError> {
    let raw = video
        .active_media()
        .and_then(|m| m.bitrate.as_deref())
        .or_else(|| video.active_part().and_then(|p| p.bitrate.as_deref()))
        .unwrap_or("");

    raw.parse::<i64>()
        .map(Bitrate::from_kbps)
        .map_err(|source| FieldExtractionError::InvalidNumber {
            field: "bitrate",
            value: raw.to_string(),
            source,
        })
}

/// Later subtitle streams override earlier ones.
fn subtitle_title(video: &PlexVideoSession) -> Option<String> {
    video
        .active_part()?
        .streams
        .iter()
        .rev()
        .find(|s| s.stream_type == SUBTITLE_STREAM_TYPE)
        .map(|s| s.extended_display_title.clone())
}
