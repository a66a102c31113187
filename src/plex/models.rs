//! Models for the Plex `/status/sessions` XML response.

use serde::Deserialize;

/// Root `<MediaContainer>` element.
///
/// Only `<Video>` children are playback sessions the exporter reports;
/// music (`<Track>`) and photo entries are skipped by the deserializer.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename = "MediaContainer")]
pub struct PlexSessions {
    #[serde(rename = "Video", default)]
    pub videos: Vec<PlexVideoSession>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct PlexVideoSession {
    #[serde(rename = "@title", default)]
    pub title: String,
    #[serde(rename = "User", default)]
    pub user: Option<PlexUser>,
    #[serde(rename = "Player", default)]
    pub player: Option<PlexPlayer>,
    #[serde(rename = "Media", default)]
    pub media: Vec<PlexMedia>,
}

impl PlexVideoSession {
    /// The media version being played. Plex lists only the active one in
    /// session payloads.
    pub fn active_media(&self) -> Option<&PlexMedia> {
        self.media.first()
    }

    pub fn active_part(&self) -> Option<&PlexPart> {
        self.active_media().and_then(|media| media.parts.first())
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct PlexUser {
    #[serde(rename = "@title", default)]
    pub title: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct PlexPlayer {
    #[serde(rename = "@device", default)]
    pub device: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct PlexMedia {
    /// Kilobits per second, as a string.
    #[serde(rename = "@bitrate", default)]
    pub bitrate: Option<String>,
    #[serde(rename = "Part", default)]
    pub parts: Vec<PlexPart>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct PlexPart {
    /// "transcode", "directplay" or "copy".
    #[serde(rename = "@decision", default)]
    pub decision: String,
    #[serde(rename = "@bitrate", default)]
    pub bitrate: Option<String>,
    #[serde(rename = "Stream", default)]
    pub streams: Vec<PlexStream>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct PlexStream {
    /// "1" video, "2" audio, "3" subtitle.
    #[serde(rename = "@streamType", default)]
    pub stream_type: String,
    #[serde(rename = "@extendedDisplayTitle", default)]
    pub extended_display_title: String,
}

impl PlexSessions {
    pub fn from_xml(xml: &str) -> Result<Self, quick_xml::de::DeError> {
        quick_xml::de::from_str(xml)
    }
}
