//! Upstream payloads served by the fake media servers

#![allow(dead_code)]

/// One queue-shaped session with an English subtitle selected.
pub const JELLYFIN_QUEUE_SESSION: &str = r#"[
  {
    "Id": "5f1c",
    "UserName": "alice",
    "Client": "Jellyfin Android TV",
    "DeviceName": "Living Room TV",
    "PlayState": {
      "PositionTicks": 12000000,
      "IsPaused": false,
      "PlayMethod": "DirectPlay",
      "SubtitleStreamIndex": 0
    },
    "NowPlayingQueueFullItems": [
      {
        "Name": "Big Buck Bunny (2008)",
        "MediaSources": [{"Name": "Big Buck Bunny", "Bitrate": 8500000}],
        "MediaStreams": [
          {"Type": "Subtitle", "DisplayTitle": "English - SRT"},
          {"Type": "Video", "DisplayTitle": "1080p H264", "BitRate": 8000000},
          {"Type": "Audio", "DisplayTitle": "AAC - Stereo"}
        ]
      }
    ]
  },
  {
    "Id": "77aa",
    "UserName": "carol",
    "Client": "Jellyfin Web",
    "DeviceName": "Firefox",
    "PlayState": {"IsPaused": false, "SubtitleStreamIndex": -1}
  }
]"#;

/// One single-item session transcoding without subtitles.
pub const JELLYFIN_SINGLE_ITEM_SESSION: &str = r#"[
  {
    "UserName": "bob",
    "DeviceName": "Pixel 8",
    "PlayState": {"IsPaused": false, "PlayMethod": "Transcode", "SubtitleStreamIndex": -1},
    "NowPlayingItem": {
      "Name": "Sintel",
      "Container": "mkv",
      "MediaStreams": [
        {"Type": "Audio", "DisplayTitle": "Opus - 5.1", "BitRate": 384000},
        {"Type": "Video", "DisplayTitle": "4K HEVC", "BitRate": 2500000}
      ]
    }
  }
]"#;

pub const JELLYFIN_NO_SESSIONS: &str = "[]";

pub const PLEX_SESSION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<MediaContainer size="1">
  <Video title="Tears of Steel" type="movie" duration="734000">
    <Media bitrate="12500" videoResolution="1080" container="mkv">
      <Part decision="transcode" file="/media/tos.mkv">
        <Stream streamType="1" codec="h264" extendedDisplayTitle="1080p (H.264)"/>
        <Stream streamType="2" codec="aac" extendedDisplayTitle="English (AAC Stereo)"/>
        <Stream streamType="3" codec="srt" extendedDisplayTitle="English (SRT)"/>
      </Part>
    </Media>
    <User id="1" title="dave"/>
    <Player address="10.0.0.12" device="Apple TV" product="Plex for Apple TV"/>
  </Video>
</MediaContainer>"#;

pub const PLEX_BAD_BITRATE_SESSION: &str = r#"<MediaContainer size="1">
  <Video title="Elephants Dream">
    <Media bitrate="abc">
      <Part decision="directplay"/>
    </Media>
    <User title="erin"/>
    <Player device="Chrome"/>
  </Video>
</MediaContainer>"#;

pub const PLEX_NO_SESSIONS: &str = r#"<MediaContainer size="0"></MediaContainer>"#;
