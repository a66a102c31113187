//! Models for the Jellyfin `/Sessions` response.
//!
//! Only the fields the exporter reads are modeled; everything else in the
//! payload is ignored. Jellyfin reports both real playback sessions and
//! "device is connected" entries through the same endpoint, and playback
//! itself comes in two shapes depending on the client (see `normalize`).

use serde::{Deserialize, Deserializer};

/// One element of the `/Sessions` JSON array.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct JellyfinSession {
    pub user_name: Option<String>,
    pub device_name: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub play_state: PlayState,
    /// Populated by clients that play from a queue.
    #[serde(deserialize_with = "null_as_default")]
    pub now_playing_queue_full_items: Vec<QueueItem>,
    pub full_now_playing_item: Option<NowPlayingItem>,
    pub now_playing_item: Option<NowPlayingItem>,
}

impl JellyfinSession {
    /// Container of the single now-playing item, if any.
    pub fn container(&self) -> &str {
        [&self.full_now_playing_item, &self.now_playing_item]
            .into_iter()
            .flatten()
            .filter_map(|item| item.container.as_deref())
            .find(|c| !c.is_empty())
            .unwrap_or("")
    }

    /// The single now-playing item, preferring the one that carries streams.
    pub fn playing_item(&self) -> Option<&NowPlayingItem> {
        self.now_playing_item
            .as_ref()
            .or(self.full_now_playing_item.as_ref())
    }

    pub fn play_method(&self) -> &str {
        self.play_state.play_method.as_deref().unwrap_or("")
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct PlayState {
    pub play_method: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub is_paused: bool,
    /// Jellyfin sends `-1` for "no subtitle"; that and anything else negative
    /// become `None` here so nothing downstream sees the sentinel.
    #[serde(deserialize_with = "stream_index")]
    pub subtitle_stream_index: Option<usize>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct QueueItem {
    pub name: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub media_sources: Vec<MediaSource>,
    #[serde(deserialize_with = "null_as_default")]
    pub media_streams: Vec<MediaStream>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct MediaSource {
    pub name: Option<String>,
    /// Bits per second.
    pub bitrate: Option<i64>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct NowPlayingItem {
    pub name: Option<String>,
    pub container: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub media_streams: Vec<MediaStream>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct MediaStream {
    /// "Video", "Audio", "Subtitle", ...
    #[serde(rename = "Type")]
    pub stream_type: Option<String>,
    pub display_title: Option<String>,
    /// Bits per second.
    pub bit_rate: Option<i64>,
}

impl MediaStream {
    pub fn is_video(&self) -> bool {
        self.stream_type.as_deref() == Some("Video")
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn stream_index<'de, D>(deserializer: D) -> Result<Option<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<i64>::deserialize(deserializer)?;
    Ok(raw.and_then(|index| usize::try_from(index).ok()))
}
