//! Shared data types for the interaction engine
//!
//! Tracks and clips are read-only snapshots supplied by the host on every
//! gesture. Selections are the values the engine produces.

use std::fmt;

/// Clip identifier, unique within its track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClipId(pub u64);

impl fmt::Display for ClipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "clip#{}", self.0)
    }
}

/// How a track renders its clips
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackViewMode {
    /// Waveform only (no spectral selection)
    #[default]
    Waveform,
    /// Spectrogram over the whole clip body
    Spectrogram,
    /// Spectrogram in the top half, waveform in the bottom half
    Split,
}

impl TrackViewMode {
    /// Whether clips on this track accept spectral selections
    pub fn supports_spectral(self) -> bool {
        matches!(self, Self::Spectrogram | Self::Split)
    }
}

/// Stereo channel sub-area of a spectral view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Left,
    Right,
}

/// Clip on a track (times in seconds)
#[derive(Debug, Clone, PartialEq)]
pub struct Clip {
    pub id: ClipId,
    pub start: f64,
    pub duration: f64,
}

impl Clip {
    pub fn new(id: u64, start: f64, duration: f64) -> Self {
        Self {
            id: ClipId(id),
            start,
            duration,
        }
    }

    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

/// Track snapshot as seen by the interaction engine
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub id: u64,
    pub view_mode: TrackViewMode,
    /// Fraction of the spectral area given to the left channel (stereo only)
    pub channel_split_ratio: Option<f64>,
    pub clips: Vec<Clip>,
}

impl Track {
    pub fn new(id: u64, view_mode: TrackViewMode) -> Self {
        Self {
            id,
            view_mode,
            channel_split_ratio: None,
            clips: Vec::new(),
        }
    }

    /// Builder: add a clip
    pub fn with_clip(mut self, clip: Clip) -> Self {
        self.clips.push(clip);
        self
    }

    /// Builder: mark as stereo with the given L/R split
    pub fn with_channel_split(mut self, ratio: f64) -> Self {
        self.channel_split_ratio = Some(ratio.clamp(0.0, 1.0));
        self
    }

    pub fn clip(&self, id: ClipId) -> Option<&Clip> {
        self.clips.iter().find(|c| c.id == id)
    }
}

/// Selected time range spanning whole tracks
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeSelection {
    pub start_time: f64,
    pub end_time: f64,
}

impl TimeSelection {
    pub fn new(start_time: f64, end_time: f64) -> Self {
        Self {
            start_time,
            end_time,
        }
    }

    /// Order the bounds and clamp both to `>= 0`
    pub fn normalized(self) -> Self {
        let a = self.start_time.max(0.0);
        let b = self.end_time.max(0.0);
        Self {
            start_time: a.min(b),
            end_time: a.max(b),
        }
    }

    pub fn duration(&self) -> f64 {
        (self.end_time - self.start_time).abs()
    }
}

/// Time x normalized-frequency rectangle bound to one clip
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectralSelection {
    pub track_index: usize,
    pub clip_id: ClipId,
    pub start_time: f64,
    pub end_time: f64,
    /// Normalized frequency (0.0 = bottom, 1.0 = top of the spectral area)
    pub min_frequency: f64,
    pub max_frequency: f64,
}

impl SpectralSelection {
    /// Clamp frequencies to [0, 1] and order both bound pairs
    pub fn normalized(self) -> Self {
        let f0 = self.min_frequency.clamp(0.0, 1.0);
        let f1 = self.max_frequency.clamp(0.0, 1.0);
        Self {
            start_time: self.start_time.min(self.end_time),
            end_time: self.start_time.max(self.end_time),
            min_frequency: f0.min(f1),
            max_frequency: f0.max(f1),
            ..self
        }
    }

    pub fn time_range(&self) -> TimeSelection {
        TimeSelection::new(self.start_time, self.end_time)
    }

    /// Whether this selection is bound to the given clip
    pub fn is_on_clip(&self, track_index: usize, clip_id: ClipId) -> bool {
        self.track_index == track_index && self.clip_id == clip_id
    }
}

/// Pointer icon requested by the interaction layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorStyle {
    #[default]
    Default,
    EwResize,
    NsResize,
    NwseResize,
    NeswResize,
    Move,
    Grab,
    Grabbing,
    Text,
    Pointer,
    Crosshair,
}

impl CursorStyle {
    /// CSS cursor keyword
    pub fn as_css(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::EwResize => "ew-resize",
            Self::NsResize => "ns-resize",
            Self::NwseResize => "nwse-resize",
            Self::NeswResize => "nesw-resize",
            Self::Move => "move",
            Self::Grab => "grab",
            Self::Grabbing => "grabbing",
            Self::Text => "text",
            Self::Pointer => "pointer",
            Self::Crosshair => "crosshair",
        }
    }
}

impl fmt::Display for CursorStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_css())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_selection_normalized() {
        let sel = TimeSelection::new(5.0, 2.0).normalized();
        assert_eq!(sel, TimeSelection::new(2.0, 5.0));

        let sel = TimeSelection::new(-1.0, 3.0).normalized();
        assert_eq!(sel.start_time, 0.0);
        assert_eq!(sel.end_time, 3.0);
    }

    #[test]
    fn test_spectral_selection_normalized() {
        let sel = SpectralSelection {
            track_index: 0,
            clip_id: ClipId(1),
            start_time: 4.0,
            end_time: 1.0,
            min_frequency: 1.3,
            max_frequency: 0.2,
        }
        .normalized();

        assert_eq!(sel.start_time, 1.0);
        assert_eq!(sel.end_time, 4.0);
        assert_eq!(sel.min_frequency, 0.2);
        assert_eq!(sel.max_frequency, 1.0);
    }

    #[test]
    fn test_view_mode_spectral_support() {
        assert!(!TrackViewMode::Waveform.supports_spectral());
        assert!(TrackViewMode::Spectrogram.supports_spectral());
        assert!(TrackViewMode::Split.supports_spectral());
    }

    #[test]
    fn test_cursor_css() {
        assert_eq!(CursorStyle::NwseResize.as_css(), "nwse-resize");
        assert_eq!(CursorStyle::default().to_string(), "default");
    }
}
