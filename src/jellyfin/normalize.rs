//! Turns Jellyfin sessions into canonical session records.

use super::models::{JellyfinSession, MediaSource, MediaStream, NowPlayingItem, QueueItem};
use crate::sessions::{Bitrate, SessionRecord};
use tracing::{debug, warn};

/// What a single `/Sessions` entry turned out to be.
#[derive(Debug)]
pub enum JellyfinPlayback<'a> {
    /// Playback driven from a queue; the first queued item is what's playing.
    Queue {
        item: &'a QueueItem,
        source: &'a MediaSource,
    },
    /// Playback of a single now-playing item (mobile clients, mostly).
    SingleItem { item: &'a NowPlayingItem },
    /// Looks like queue playback but the queued item has no media source.
    Malformed,
    /// A connected device that isn't playing anything, or is paused.
    Idle,
}

/// Decides which shape `session` has.
///
/// The queue shape is checked first and wins outright; a session is never
/// evaluated against both shapes. Only the single-item shape looks at the
/// paused flag.
pub fn classify(session: &JellyfinSession) -> JellyfinPlayback<'_> {
    let play_method = session.play_method();

    if let Some(item) = session.now_playing_queue_full_items.first() {
        if !play_method.is_empty() {
            return match item.media_sources.first() {
                Some(source) => JellyfinPlayback::Queue { item, source },
                None => JellyfinPlayback::Malformed,
            };
        }
    }

    if !session.container().is_empty() && !play_method.is_empty() && !session.play_state.is_paused {
        if let Some(item) = session.playing_item() {
            return JellyfinPlayback::SingleItem { item };
        }
    }

    JellyfinPlayback::Idle
}

/// Normalizes one session, or `None` if it isn't active playback.
pub fn normalize_session(session: &JellyfinSession) -> Option<SessionRecord> {
    let subtitle_index = session.play_state.subtitle_stream_index;

    let (title, bitrate, subtitle) = match classify(session) {
        JellyfinPlayback::Queue { item, source } => (
            source.name.clone().unwrap_or_default(),
            Bitrate::from_bps(source.bitrate.unwrap_or(0)),
            subtitle_title(&item.media_streams, subtitle_index),
        ),
        JellyfinPlayback::SingleItem { item } => (
            item.name.clone().unwrap_or_default(),
            video_bitrate(&item.media_streams),
            subtitle_title(&item.media_streams, subtitle_index),
        ),
        JellyfinPlayback::Malformed => {
            warn!(
                "Dropping Jellyfin session of {:?} on {:?}: queued item has no media source",
                session.user_name, session.device_name
            );
            return None;
        }
        JellyfinPlayback::Idle => return None,
    };

    Some(SessionRecord {
        user: session.user_name.clone().unwrap_or_default(),
        title,
        bitrate,
        play_method: session.play_method().to_string(),
        subtitle,
        device: session.device_name.clone().unwrap_or_default(),
    })
}

/// Normalizes a whole `/Sessions` response, skipping idle entries.
pub fn normalize_sessions(sessions: &[JellyfinSession]) -> Vec<SessionRecord> {
    let records: Vec<SessionRecord> = sessions.iter().filter_map(normalize_session).collect();
    debug!(
        "Jellyfin reported {} sessions, {} actively playing",
        sessions.len(),
        records.len()
    );
    records
}

/// Bit rate of the first video stream. Absent only when there is no video stream.
fn video_bitrate(streams: &[MediaStream]) -> Bitrate {
    streams
        .iter()
        .find(|s| s.is_video())
        .map_or(Bitrate::Absent, |s| Bitrate::from_bps(s.bit_rate.unwrap_or(0)))
}

fn subtitle_title(streams: &[MediaStream], index: Option<usize>) -> Option<String> {
    index
        .and_then(|i| streams.get(i))
        .map(|stream| stream.display_title.clone().unwrap_or_default())
}
