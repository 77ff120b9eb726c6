//! Coordinate mapping between model space and canvas pixels
//!
//! All functions are pure. Pixel coordinates are relative to the top-left of
//! the selection container, already corrected for scrolling by the caller.
//!
//! ```text
//! initial_gap
//! ┌──────────────────────────────────────────────┐ ← track_top_y(0)
//! │ clip header (clip_header_height)             │
//! ├──────────────────────────────────────────────┤ ← clip body top
//! │ spectral area (whole body, or top half when  │
//! │ the track is in split view)                  │
//! └──────────────────────────────────────────────┘
//! track_gap
//! ┌──────────────────────────────────────────────┐ ← track_top_y(1)
//! ```

use crate::types::{Channel, Clip, ClipId, Track, TrackViewMode};

/// Lowest editable envelope gain (dB)
pub const MIN_DB: f64 = -60.0;
/// Highest editable envelope gain (dB)
pub const MAX_DB: f64 = 12.0;
const DB_RANGE: f64 = MAX_DB - MIN_DB;

/// Error type for invalid timeline geometry
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    #[error("pixels per second must be positive and finite, got {0}")]
    InvalidScale(f64),

    #[error("{name} must be non-negative and finite, got {value}")]
    InvalidSpacing { name: &'static str, value: f64 },

    #[error("track {index} has invalid height {height}")]
    InvalidTrackHeight { index: usize, height: f64 },
}

/// Axis-aligned pixel rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Inclusive containment test
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.contains_x(x) && self.contains_y(y)
    }

    pub fn contains_x(&self, x: f64) -> bool {
        x >= self.left && x <= self.right
    }

    pub fn contains_y(&self, y: f64) -> bool {
        y >= self.top && y <= self.bottom
    }
}

/// Scale and vertical layout of the multi-track canvas
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineGeometry {
    pub pixels_per_second: f64,
    /// Horizontal offset of time zero (left padding)
    pub content_offset: f64,
    pub track_heights: Vec<f64>,
    pub track_gap: f64,
    /// Space above the first track
    pub initial_gap: f64,
    pub clip_header_height: f64,
}

impl TimelineGeometry {
    /// Create a validated geometry
    pub fn new(
        pixels_per_second: f64,
        content_offset: f64,
        track_heights: Vec<f64>,
        track_gap: f64,
        initial_gap: f64,
        clip_header_height: f64,
    ) -> Result<Self, LayoutError> {
        if !(pixels_per_second.is_finite() && pixels_per_second > 0.0) {
            return Err(LayoutError::InvalidScale(pixels_per_second));
        }

        for (name, value) in [
            ("content_offset", content_offset),
            ("track_gap", track_gap),
            ("initial_gap", initial_gap),
            ("clip_header_height", clip_header_height),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(LayoutError::InvalidSpacing { name, value });
            }
        }

        if let Some((index, &height)) = track_heights
            .iter()
            .enumerate()
            .find(|(_, h)| !(h.is_finite() && **h >= 0.0))
        {
            return Err(LayoutError::InvalidTrackHeight { index, height });
        }

        Ok(Self {
            pixels_per_second,
            content_offset,
            track_heights,
            track_gap,
            initial_gap,
            clip_header_height,
        })
    }

    pub fn time_to_x(&self, time: f64) -> f64 {
        self.content_offset + time * self.pixels_per_second
    }

    /// Inverse of [`time_to_x`](Self::time_to_x); not clamped
    pub fn x_to_time(&self, x: f64) -> f64 {
        (x - self.content_offset) / self.pixels_per_second
    }

    pub fn track_count(&self) -> usize {
        self.track_heights.len()
    }

    pub fn track_height(&self, track_index: usize) -> f64 {
        self.track_heights.get(track_index).copied().unwrap_or(0.0)
    }

    pub fn track_top_y(&self, track_index: usize) -> f64 {
        self.initial_gap
            + self
                .track_heights
                .iter()
                .take(track_index)
                .map(|h| h + self.track_gap)
                .sum::<f64>()
    }

    /// Track under a y coordinate
    ///
    /// The gap below a track belongs to that track. Positions above the first
    /// track map to 0; positions past the last track return `track_count()`.
    pub fn track_index_at(&self, y: f64) -> usize {
        let mut bottom = self.initial_gap;
        for (i, height) in self.track_heights.iter().enumerate() {
            bottom += height + self.track_gap;
            if y < bottom {
                return i;
            }
        }
        self.track_heights.len()
    }

    /// Clamp a track index to the last existing track
    pub fn clamp_track_index(&self, track_index: usize) -> Option<usize> {
        self.track_count()
            .checked_sub(1)
            .map(|last| track_index.min(last))
    }

    /// Pixel rectangle of a clip's body (below its header)
    pub fn clip_body_rect(&self, track_index: usize, clip: &Clip) -> Rect {
        let top = self.track_top_y(track_index);
        Rect::new(
            self.time_to_x(clip.start),
            top + self.clip_header_height,
            self.time_to_x(clip.end()),
            top + self.track_height(track_index),
        )
    }
}

/// Geometry paired with the track snapshot for one gesture
#[derive(Debug, Clone, Copy)]
pub struct TimelineLayout<'a> {
    pub geometry: &'a TimelineGeometry,
    pub tracks: &'a [Track],
    /// Whether spectral selection is enabled at all
    pub spectral_enabled: bool,
}

impl<'a> TimelineLayout<'a> {
    pub fn new(geometry: &'a TimelineGeometry, tracks: &'a [Track]) -> Self {
        Self {
            geometry,
            tracks,
            spectral_enabled: true,
        }
    }

    pub fn with_spectral(mut self, enabled: bool) -> Self {
        self.spectral_enabled = enabled;
        self
    }

    pub fn track(&self, track_index: usize) -> Option<&'a Track> {
        self.tracks.get(track_index)
    }

    pub fn clip(&self, track_index: usize, clip_id: ClipId) -> Option<&'a Clip> {
        self.track(track_index).and_then(|t| t.clip(clip_id))
    }

    /// Spectral area of a clip, or None if its track has no spectral view
    pub fn spectral_area_rect(&self, track_index: usize, clip: &Clip) -> Option<Rect> {
        let track = self.track(track_index)?;
        if !track.view_mode.supports_spectral() {
            return None;
        }
        let body = self.geometry.clip_body_rect(track_index, clip);
        let bottom = match track.view_mode {
            TrackViewMode::Split => body.top + body.height() / 2.0,
            _ => body.bottom,
        };
        Some(Rect::new(body.left, body.top, body.right, bottom))
    }

    /// Sub-rectangle for one stereo channel of a spectral area
    fn channel_rect(&self, track_index: usize, area: Rect, channel: Option<Channel>) -> Rect {
        let Some(channel) = channel else {
            return area;
        };
        let ratio = self
            .track(track_index)
            .and_then(|t| t.channel_split_ratio)
            .unwrap_or(0.5);
        let split_y = area.top + area.height() * ratio;
        match channel {
            Channel::Left => Rect::new(area.left, area.top, area.right, split_y),
            Channel::Right => Rect::new(area.left, split_y, area.right, area.bottom),
        }
    }

    /// Vertical span used for frequency mapping on a track
    ///
    /// Frequency mapping does not depend on the clip, only on the track, so
    /// the span is derived from the track rows directly.
    fn frequency_span(&self, track_index: usize, channel: Option<Channel>) -> Option<Rect> {
        let probe = Clip::new(0, 0.0, 0.0);
        let area = self.spectral_area_rect(track_index, &probe)?;
        Some(self.channel_rect(track_index, area, channel))
    }

    /// Map a normalized frequency (1.0 = top) to a y coordinate
    pub fn frequency_to_y(
        &self,
        frequency: f64,
        track_index: usize,
        channel: Option<Channel>,
    ) -> Option<f64> {
        let span = self.frequency_span(track_index, channel)?;
        Some(span.top + (1.0 - frequency) * span.height())
    }

    /// Exact inverse of [`frequency_to_y`](Self::frequency_to_y), clamped to [0, 1]
    pub fn y_to_frequency(&self, y: f64, track_index: usize, channel: Option<Channel>) -> Option<f64> {
        let span = self.frequency_span(track_index, channel)?;
        if span.height() <= 0.0 {
            return Some(0.0);
        }
        Some((1.0 - (y - span.top) / span.height()).clamp(0.0, 1.0))
    }

    /// Clip whose body contains the point, with its track index
    pub fn clip_at(&self, x: f64, y: f64) -> Option<(usize, &'a Clip)> {
        let track_index = self.geometry.track_index_at(y);
        let track = self.track(track_index)?;
        track
            .clips
            .iter()
            .find(|clip| self.geometry.clip_body_rect(track_index, clip).contains(x, y))
            .map(|clip| (track_index, clip))
    }

    /// Clip whose spectral area contains the point
    pub fn spectral_clip_at(&self, x: f64, y: f64) -> Option<(usize, &'a Clip)> {
        let (track_index, clip) = self.clip_at(x, y)?;
        self.spectral_area_rect(track_index, clip)
            .filter(|area| area.contains(x, y))
            .map(|_| (track_index, clip))
    }
}

/// Map a gain in dB to a y coordinate using the cubic envelope curve
///
/// The bottom pixel of `height` is reserved for -inf. Values below
/// [`MIN_DB`] land there as well; values above [`MAX_DB`] clamp to the top.
pub fn db_to_y(db: f64, top: f64, height: f64) -> f64 {
    if db.is_nan() || db < MIN_DB {
        return top + height;
    }
    let usable = (height - 1.0).max(0.0);
    let linear = ((db - MIN_DB) / DB_RANGE).clamp(0.0, 1.0);
    top + usable - linear.powi(3) * usable
}

/// Inverse of [`db_to_y`]
///
/// Returns -inf inside the reserved bottom pixel (strictly below the usable
/// area), otherwise a value clamped to [`MIN_DB`, `MAX_DB`].
pub fn y_to_db(y: f64, top: f64, height: f64) -> f64 {
    let usable = (height - 1.0).max(0.0);
    let floor = top + usable;
    if y > floor || usable <= 0.0 {
        return f64::NEG_INFINITY;
    }
    let ratio = ((floor - y) / usable).clamp(0.0, 1.0);
    (MIN_DB + ratio.cbrt() * DB_RANGE).clamp(MIN_DB, MAX_DB)
}

/// Treat -inf as the floor of the editable range, for delta arithmetic
pub fn finite_db(db: f64) -> f64 {
    if db.is_finite() {
        db.clamp(MIN_DB, MAX_DB)
    } else {
        MIN_DB
    }
}

/// Convert a normalized frequency to Hz on a linear scale
pub fn normalized_to_hz(normalized: f64, max_hz: f64) -> f64 {
    normalized.clamp(0.0, 1.0) * max_hz
}

/// Convert Hz to a normalized frequency on a linear scale
pub fn hz_to_normalized(hz: f64, max_hz: f64) -> f64 {
    if max_hz <= 0.0 {
        return 0.0;
    }
    (hz / max_hz).clamp(0.0, 1.0)
}
