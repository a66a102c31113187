//! Canonical, upstream-independent view of an active playback session.

mod snapshot;

pub use snapshot::{SessionSnapshot, SessionsCollector};

use std::fmt;

/// Label names attached to every session series, in tuple order.
pub const SESSION_LABELS: [&str; 6] = [
    "user_name",
    "name",
    "bitrate",
    "play_method",
    "substream",
    "device_name",
];

/// Rendered in place of a subtitle track when none is active.
pub const NO_SUBTITLE: &str = "None";

/// Rendered in place of a bitrate that the upstream reported but we could not parse.
pub const BITRATE_ERROR: &str = "Error";

/// The media server families the exporter knows how to poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpstreamFamily {
    Jellyfin,
    Plex,
}

impl UpstreamFamily {
    /// Name of the gauge family exposing this upstream's sessions.
    pub fn metric_name(&self) -> &'static str {
        match self {
            UpstreamFamily::Jellyfin => "jellyfin_active_sessions",
            UpstreamFamily::Plex => "plex_active_sessions",
        }
    }

    pub fn metric_help(&self) -> &'static str {
        match self {
            UpstreamFamily::Jellyfin => "Active playback sessions reported by Jellyfin",
            UpstreamFamily::Plex => "Active playback sessions reported by Plex",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UpstreamFamily::Jellyfin => "jellyfin",
            UpstreamFamily::Plex => "plex",
        }
    }
}

impl fmt::Display for UpstreamFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpstreamFamily::Jellyfin => write!(f, "Jellyfin"),
            UpstreamFamily::Plex => write!(f, "Plex"),
        }
    }
}

/// Stream bitrate as exposed in the `bitrate` label.
#[derive(Debug, Clone, PartialEq)]
pub enum Bitrate {
    /// Megabits per second.
    Mbps(f64),
    /// The upstream did not report one (e.g. no video stream).
    Absent,
    /// The upstream reported a value that is not a number.
    Unparseable,
}

impl Bitrate {
    /// Converts a bits-per-second figure.
    pub fn from_bps(bps: i64) -> Self {
        Bitrate::Mbps(bps as f64 / 1_000_000.0)
    }

    /// Converts a kilobits-per-second figure.
    pub fn from_kbps(kbps: i64) -> Self {
        Bitrate::Mbps(kbps as f64 / 1000.0)
    }

    /// Label value: shortest decimal representation, empty when absent.
    pub fn label_value(&self) -> String {
        match self {
            // f64's Display is the shortest round-tripping form and never
            // switches to exponent notation.
            Bitrate::Mbps(mbps) => format!("{}", mbps),
            Bitrate::Absent => String::new(),
            Bitrate::Unparseable => BITRATE_ERROR.to_string(),
        }
    }
}

/// One active playback session, normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRecord {
    pub user: String,
    pub title: String,
    pub bitrate: Bitrate,
    pub play_method: String,
    pub subtitle: Option<String>,
    pub device: String,
}

impl SessionRecord {
    /// Label values in the order of [`SESSION_LABELS`].
    pub fn labels(&self) -> SessionLabels {
        SessionLabels([
            self.user.clone(),
            self.title.clone(),
            self.bitrate.label_value(),
            self.play_method.clone(),
            self.subtitle
                .clone()
                .unwrap_or_else(|| NO_SUBTITLE.to_string()),
            self.device.clone(),
        ])
    }
}

/// The full label tuple identifying one session series.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionLabels(pub [String; 6]);

impl SessionLabels {
    pub fn as_strs(&self) -> [&str; 6] {
        let [user, title, bitrate, play_method, subtitle, device] = &self.0;
        [
            user.as_str(),
            title.as_str(),
            bitrate.as_str(),
            play_method.as_str(),
            subtitle.as_str(),
            device.as_str(),
        ]
    }
}
